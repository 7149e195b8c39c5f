//! Declarative catalog configuration.
//!
//! Endpoint catalogs can be described as data instead of code. Transforms cannot be
//! serialized, so a parameter refers to its model by type tag and declares the stock
//! transforms it needs:
//!
//! - `default`: pre-transform synthesizing a value when none was supplied,
//! - `append_port`: post-transform appending `:<port>`,
//! - `escape`: post-transform percent-encoding the value as a single path segment.
//!
//! When both `append_port` and `escape` are set, the port is appended first.
//!
//! # Example
//!
//! ```rust
//! use debugapi_core::{CatalogConfig, EndpointCatalog};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = CatalogConfig::from_json_str(r#"{
//!     "endpoints": [{
//!         "id": "pd_region",
//!         "component": "pd",
//!         "path": "/pd/api/v1/region/id/{id}",
//!         "path_params": [{ "name": "id", "model": "int" }]
//!     }]
//! }"#)?;
//! let catalog = EndpointCatalog::try_from(config)?;
//!
//! assert!(catalog.get("pd_region").is_some());
//! # Ok(())
//! # }
//! ```

use serde::Deserialize;

use crate::catalog::EndpointCatalog;
use crate::endpoint::{EndpointDefinition, EndpointMethod, NodeKind};
use crate::error::ConfigError;
use crate::model::ParamModel;
use crate::param::Param;
use crate::transform::Transform;

/// A declarative list of endpoints.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CatalogConfig {
    /// The endpoints, in catalog order.
    #[serde(default)]
    pub endpoints: Vec<EndpointConfig>,
}

/// A declarative endpoint.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EndpointConfig {
    /// The endpoint identifier.
    pub id: String,
    /// The targeted node kind.
    pub component: NodeKind,
    /// The HTTP method, `GET` by default.
    #[serde(default)]
    pub method: EndpointMethod,
    /// The path template.
    pub path: String,
    /// Parameters bound to path placeholders.
    #[serde(default)]
    pub path_params: Vec<ParamConfig>,
    /// Parameters encoded in the query string.
    #[serde(default)]
    pub query_params: Vec<ParamConfig>,
}

/// A declarative parameter.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ParamConfig {
    /// The parameter name.
    pub name: String,
    /// Whether a query parameter must be present.
    #[serde(default)]
    pub required: bool,
    /// The model type tag, `text` by default.
    #[serde(default = "default_model")]
    pub model: String,
    /// Value used when none is supplied.
    #[serde(default)]
    pub default: Option<String>,
    /// Port appended to the value.
    #[serde(default)]
    pub append_port: Option<u16>,
    /// Whether to percent-encode the value as a path segment.
    #[serde(default)]
    pub escape: bool,
}

fn default_model() -> String {
    "text".to_string()
}

impl CatalogConfig {
    /// Parses a JSON catalog configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Json`] with the location of the invalid value.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let deserializer = &mut serde_json::Deserializer::from_str(json);
        serde_path_to_error::deserialize(deserializer).map_err(|err| ConfigError::Json {
            path: err.path().to_string(),
            source: err.into_inner(),
        })
    }

    /// Parses a YAML catalog configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the document is invalid.
    #[cfg(feature = "yaml")]
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        serde_saphyr::from_str(yaml).map_err(|err| ConfigError::Yaml {
            message: err.to_string(),
        })
    }
}

impl ParamConfig {
    fn into_param(self, endpoint: &str) -> Result<Param, ConfigError> {
        let Self {
            name,
            required,
            model,
            default,
            append_port,
            escape,
        } = self;

        let Some(param_model) = ParamModel::from_kind(&model) else {
            return Err(ConfigError::UnknownModel {
                endpoint: endpoint.to_string(),
                param: name,
                model,
            });
        };

        let mut param = Param::new(name, param_model).with_required(required);
        if let Some(default) = default {
            param = param.with_pre_transform(Transform::default_value(default));
        }
        let post = [
            append_port.map(Transform::append_port),
            escape.then(Transform::escape_path_segment),
        ]
        .into_iter()
        .flatten()
        .reduce(Transform::then);
        if let Some(post) = post {
            param = param.with_post_transform(post);
        }

        Ok(param)
    }
}

impl TryFrom<EndpointConfig> for EndpointDefinition {
    type Error = ConfigError;

    fn try_from(value: EndpointConfig) -> Result<Self, Self::Error> {
        let EndpointConfig {
            id,
            component,
            method,
            path,
            path_params,
            query_params,
        } = value;

        let mut builder = EndpointDefinition::builder(id.clone(), component, path).method(method);
        for param in path_params {
            builder = builder.path_param(param.into_param(&id)?);
        }
        for param in query_params {
            builder = builder.query_param(param.into_param(&id)?);
        }

        let definition = builder.build()?;
        Ok(definition)
    }
}

impl TryFrom<CatalogConfig> for EndpointCatalog {
    type Error = ConfigError;

    fn try_from(value: CatalogConfig) -> Result<Self, Self::Error> {
        let definitions = value
            .endpoints
            .into_iter()
            .map(EndpointDefinition::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        let catalog = EndpointCatalog::new(definitions)?;
        Ok(catalog)
    }
}
