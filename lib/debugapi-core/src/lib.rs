//! # Debug API Core
//!
//! Declarative request building for the debug/admin HTTP endpoints exposed by cluster
//! components.
//!
//! Each endpoint is described once, as an [`EndpointDefinition`]: a path template, an
//! HTTP method and the declared path and query [`Param`]eters. A single generic
//! builder then turns caller-supplied raw strings into a validated [`Request`] against
//! a given host and port.
//!
//! ## Quick Start
//!
//! ```rust
//! use debugapi_core::{EndpointDefinition, NodeKind, Param, ParamModel, Transform};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let profile = EndpointDefinition::builder("tidb_pprof", NodeKind::Tidb, "/debug/pprof/{kind}")
//!     .path_param(Param::new("kind", ParamModel::text()))
//!     .query_param(
//!         Param::required("seconds", ParamModel::int())
//!             .with_pre_transform(Transform::default_value("10")),
//!     )
//!     .build()?;
//!
//! let request = profile.build_request("10.0.0.1", 10080, &[("kind", "profile")])?;
//! assert_eq!(request.path, "/debug/pprof/profile");
//! assert_eq!(request.query, "seconds=10");
//! # Ok(())
//! # }
//! ```
//!
//! ## Transform pipeline
//!
//! Every parameter value runs through up to three [`Transform`]s, in order:
//!
//! 1. the parameter pre-transform (the only one that sees a missing value, as `""`),
//! 2. the [`ParamModel`] transform (e.g. IP address validation),
//! 3. the parameter post-transform (e.g. appending a fixed port).
//!
//! The first failing stage aborts the build with [`BuildError::InvalidParam`].
//! A value that is, or becomes, empty is *absent*: the remaining stages are skipped,
//! an optional query key is omitted, while a path placeholder or a required query
//! parameter fails with [`BuildError::MissingRequiredParam`].
//!
//! ## Path templates
//!
//! Templates such as `/stats/dump/{db}/{table}` are tokenized when the definition is
//! built, and the definition is rejected unless placeholders and declared path
//! parameters match exactly. Values are substituted verbatim: use
//! [`Transform::escape_path_segment`] for values that may contain reserved characters.
//!
//! ## Catalogs
//!
//! An [`EndpointCatalog`] is an immutable lookup table built once at startup, either
//! from code, from [`EndpointCatalog::builtin`], or from a [`CatalogConfig`] document
//! (JSON, or YAML with the `yaml` feature).
//!
//! ## Logging
//!
//! The crate emits [`tracing`] events (`debug` per built request and per absent
//! parameter, `info` per catalog) and never installs a subscriber. Validation
//! failures are returned, not logged.

mod builtin;
pub use self::builtin::tidb_endpoints;

mod catalog;
pub use self::catalog::{EndpointCatalog, EndpointCatalogBuilder};

mod config;
pub use self::config::{CatalogConfig, EndpointConfig, ParamConfig};

mod endpoint;
pub use self::endpoint::{
    EndpointDefinition, EndpointDefinitionBuilder, EndpointMethod, NodeKind, build,
};

mod error;
pub use self::error::{
    BuildError, CatalogError, ConfigError, ParamLocation, TemplateError, TransformError,
    TransformStage,
};

mod model;
pub use self::model::ParamModel;

mod param;
pub use self::param::{Param, ParamValues};

mod query;

mod request;
pub use self::request::Request;

mod template;
pub use self::template::{PathTemplate, Segment};

mod transform;
pub use self::transform::Transform;
