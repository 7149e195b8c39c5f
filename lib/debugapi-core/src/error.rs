/// Where a declared parameter lives in the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, derive_more::Display)]
pub enum ParamLocation {
    /// A `{name}` placeholder of the path template.
    #[display("path")]
    Path,
    /// A query string key.
    #[display("query")]
    Query,
}

/// The stage of a parameter's transform pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, derive_more::Display)]
pub enum TransformStage {
    /// The endpoint-specific transform that runs before the model transform.
    #[display("pre-transform")]
    Pre,
    /// The transform carried by the parameter model.
    #[display("model transform")]
    Model,
    /// The endpoint-specific transform that runs after the model transform.
    #[display("post-transform")]
    Post,
}

/// Failure reported by a single transform stage.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Error, derive_more::Display)]
pub enum TransformError {
    /// The value is not an IPv4 or IPv6 address.
    #[display("invalid IP address: {input:?}")]
    InvalidIp {
        /// The rejected value.
        input: String,
    },

    /// The value is not a base-10 integer.
    #[display("invalid integer: {input:?}")]
    InvalidInteger {
        /// The rejected value.
        input: String,
    },

    /// A custom transform rejected the value.
    #[display("{message}")]
    Rejected {
        /// Why the value was rejected.
        message: String,
    },
}

impl TransformError {
    /// Creates a [`TransformError::Rejected`] with the given message.
    pub fn rejected(message: impl Into<String>) -> Self {
        Self::Rejected {
            message: message.into(),
        }
    }
}

/// Errors returned when building a request from an endpoint definition.
///
/// Building is fail-fast: the first failure aborts the whole build and is the
/// only error reported.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Error, derive_more::Display)]
pub enum BuildError {
    /// A path placeholder, or a required query parameter, has no value.
    #[display("Missing required {location} parameter '{name}' for '{template}'")]
    MissingRequiredParam {
        /// Whether the binding was a path placeholder or a query key.
        location: ParamLocation,
        /// The path template of the endpoint being built.
        template: String,
        /// The missing parameter name.
        name: String,
    },

    /// A transform stage rejected the value of a parameter.
    #[display("Invalid parameter '{name}' ({stage}): {source}")]
    InvalidParam {
        /// The offending parameter name.
        name: String,
        /// The stage that failed.
        stage: TransformStage,
        /// The stage error.
        source: TransformError,
    },
}

/// Syntax errors in a path template.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Error, derive_more::Display)]
pub enum TemplateError {
    /// A `{` has no matching `}`.
    #[display("Unclosed placeholder at offset {offset} in '{template}'")]
    UnclosedPlaceholder {
        /// The template being parsed.
        template: String,
        /// Byte offset of the opening brace.
        offset: usize,
    },

    /// A `}` appears outside of a placeholder.
    #[display("Unexpected '}}' at offset {offset} in '{template}'")]
    UnexpectedClosingBrace {
        /// The template being parsed.
        template: String,
        /// Byte offset of the closing brace.
        offset: usize,
    },

    /// A placeholder name is empty or contains non-word characters.
    #[display("Invalid placeholder name {name:?} in '{template}'")]
    InvalidPlaceholderName {
        /// The template being parsed.
        template: String,
        /// The rejected name.
        name: String,
    },
}

/// Definition-time invariant violations of an endpoint catalog.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Error, derive_more::Display)]
pub enum CatalogError {
    /// Two endpoints share the same identifier.
    #[display("Duplicate endpoint id '{id}'")]
    DuplicateEndpoint {
        /// The duplicated identifier.
        id: String,
    },

    /// Two parameters of the same list share a name.
    #[display("Endpoint '{id}' declares {location} parameter '{name}' more than once")]
    DuplicateParam {
        /// The endpoint identifier.
        id: String,
        /// The list holding the duplicate.
        location: ParamLocation,
        /// The duplicated name.
        name: String,
    },

    /// A placeholder of the path template has no declared path parameter.
    #[display("Endpoint '{id}' uses placeholder '{name}' without a matching path parameter")]
    UndeclaredPlaceholder {
        /// The endpoint identifier.
        id: String,
        /// The placeholder name.
        name: String,
    },

    /// A declared path parameter does not appear in the path template.
    #[display("Endpoint '{id}' declares path parameter '{name}' that the path never uses")]
    UnusedPathParam {
        /// The endpoint identifier.
        id: String,
        /// The parameter name.
        name: String,
    },

    /// The path template could not be parsed.
    #[display("Endpoint '{id}' has an invalid path: {source}")]
    Template {
        /// The endpoint identifier.
        id: String,
        /// The template syntax error.
        source: TemplateError,
    },
}

/// Errors raised while loading a declarative catalog configuration.
#[derive(Debug, derive_more::Error, derive_more::Display, derive_more::From)]
pub enum ConfigError {
    /// JSON configuration could not be deserialized.
    #[display("Failed to deserialize catalog JSON at '{path}': {source}")]
    #[from(skip)]
    Json {
        /// The path inside the document where deserialization failed.
        path: String,
        /// The underlying JSON error.
        source: serde_json::Error,
    },

    /// YAML configuration could not be deserialized.
    #[cfg(feature = "yaml")]
    #[display("Failed to deserialize catalog YAML: {message}")]
    #[from(skip)]
    Yaml {
        /// The YAML parser report.
        message: String,
    },

    /// A parameter refers to a model type that does not exist.
    #[display("Endpoint '{endpoint}' parameter '{param}' uses unknown model type '{model}'")]
    #[from(skip)]
    UnknownModel {
        /// The endpoint identifier.
        endpoint: String,
        /// The parameter name.
        param: String,
        /// The unknown type tag.
        model: String,
    },

    /// The configured endpoints violate a catalog invariant.
    #[display("{_0}")]
    Catalog(CatalogError),
}
