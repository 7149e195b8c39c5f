use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{BuildError, CatalogError, ParamLocation};
use crate::param::{Param, ParamValues, transform_values};
use crate::query::encode_query;
use crate::request::Request;
use crate::template::PathTemplate;

/// The kind of cluster node an endpoint targets.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, derive_more::Display,
)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    /// SQL-layer node.
    #[display("tidb")]
    Tidb,
    /// Storage node.
    #[display("tikv")]
    Tikv,
    /// Placement/coordination node.
    #[display("pd")]
    Pd,
    /// Columnar storage node.
    #[display("tiflash")]
    Tiflash,
}

/// HTTP method of an endpoint.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    derive_more::Display,
)]
#[serde(rename_all = "UPPERCASE")]
pub enum EndpointMethod {
    /// `GET`
    #[default]
    #[display("GET")]
    Get,
    /// `POST`
    #[display("POST")]
    Post,
    /// `PUT`
    #[display("PUT")]
    Put,
    /// `DELETE`
    #[display("DELETE")]
    Delete,
}

impl From<EndpointMethod> for http::Method {
    fn from(value: EndpointMethod) -> Self {
        match value {
            EndpointMethod::Get => Self::GET,
            EndpointMethod::Post => Self::POST,
            EndpointMethod::Put => Self::PUT,
            EndpointMethod::Delete => Self::DELETE,
        }
    }
}

/// A catalog entry describing one debug/admin HTTP endpoint.
///
/// Definitions are created through [`EndpointDefinition::builder`], which checks once
/// that the path placeholders and the declared path parameters match exactly. They
/// are immutable afterwards and can be shared between threads.
///
/// # Example
///
/// ```rust
/// use debugapi_core::{EndpointDefinition, NodeKind, Param, ParamModel};
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let endpoint = EndpointDefinition::builder("tidb_schema_db_table", NodeKind::Tidb, "/schema/{db}/{table}")
///     .path_param(Param::new("db", ParamModel::db()))
///     .path_param(Param::new("table", ParamModel::table()))
///     .build()?;
///
/// let request = endpoint.build_request("10.0.0.1", 10080, &[("db", "test"), ("table", "t1")])?;
/// assert_eq!(request.path, "/schema/test/t1");
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Serialize)]
pub struct EndpointDefinition {
    id: String,
    component: NodeKind,
    path: PathTemplate,
    method: EndpointMethod,
    path_params: Vec<Param>,
    query_params: Vec<Param>,
}

impl EndpointDefinition {
    /// Starts the definition of an endpoint.
    pub fn builder(
        id: impl Into<String>,
        component: NodeKind,
        path: impl Into<String>,
    ) -> EndpointDefinitionBuilder {
        EndpointDefinitionBuilder {
            id: id.into(),
            component,
            path: path.into(),
            method: EndpointMethod::default(),
            path_params: Vec::new(),
            query_params: Vec::new(),
        }
    }

    /// The endpoint identifier.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// The targeted node kind.
    pub fn component(&self) -> NodeKind {
        self.component
    }

    /// The HTTP method.
    pub fn method(&self) -> EndpointMethod {
        self.method
    }

    /// The path template.
    pub fn path(&self) -> &PathTemplate {
        &self.path
    }

    /// Parameters bound to path placeholders.
    pub fn path_params(&self) -> &[Param] {
        &self.path_params
    }

    /// Parameters encoded in the query string.
    pub fn query_params(&self) -> &[Param] {
        &self.query_params
    }

    /// Builds a request against `host:port` from raw parameter values.
    ///
    /// Path parameters go through their transform pipeline and are substituted in the
    /// path template, then query parameters go through theirs and are encoded. Values
    /// supplied for names that are not declared are ignored.
    ///
    /// This is a pure function of its inputs: the same arguments always produce the
    /// same request.
    ///
    /// # Errors
    ///
    /// Returns the first failure met:
    /// - [`BuildError::InvalidParam`] when a transform stage rejects a value,
    /// - [`BuildError::MissingRequiredParam`] when a placeholder or a required query
    ///   parameter has no value.
    pub fn build_request<V>(
        &self,
        host: impl Into<String>,
        port: u16,
        values: &V,
    ) -> Result<Request, BuildError>
    where
        V: ParamValues + ?Sized,
    {
        let path_values = transform_values(&self.path_params, values)?;
        let path = self.path.resolve(&path_values)?;

        let query_values = transform_values(&self.query_params, values)?;
        let query = encode_query(self.path.as_str(), &self.query_params, &query_values)?;

        let request = Request {
            method: self.method,
            host: host.into(),
            port,
            path,
            query,
        };
        debug!(
            id = %self.id,
            host = %request.host,
            port,
            path = %request.path,
            "request built"
        );
        Ok(request)
    }
}

/// Builds a request for `definition`. See [`EndpointDefinition::build_request`].
///
/// # Errors
///
/// Returns the [`BuildError`] of the first failing parameter.
pub fn build<V>(
    definition: &EndpointDefinition,
    host: impl Into<String>,
    port: u16,
    values: &V,
) -> Result<Request, BuildError>
where
    V: ParamValues + ?Sized,
{
    definition.build_request(host, port, values)
}

/// Builder for [`EndpointDefinition`].
#[derive(Debug, Clone)]
pub struct EndpointDefinitionBuilder {
    id: String,
    component: NodeKind,
    path: String,
    method: EndpointMethod,
    path_params: Vec<Param>,
    query_params: Vec<Param>,
}

impl EndpointDefinitionBuilder {
    /// Sets the HTTP method (`GET` by default).
    #[must_use]
    pub fn method(mut self, method: EndpointMethod) -> Self {
        self.method = method;
        self
    }

    /// Declares a path parameter.
    #[must_use]
    pub fn path_param(mut self, param: Param) -> Self {
        self.path_params.push(param);
        self
    }

    /// Declares a query parameter.
    #[must_use]
    pub fn query_param(mut self, param: Param) -> Self {
        self.query_params.push(param);
        self
    }

    /// Parses the path template and checks the definition invariants.
    ///
    /// # Errors
    ///
    /// - [`CatalogError::Template`] if the path template is malformed,
    /// - [`CatalogError::DuplicateParam`] if a name is declared twice in one list,
    /// - [`CatalogError::UndeclaredPlaceholder`] if a placeholder has no path parameter,
    /// - [`CatalogError::UnusedPathParam`] if a path parameter has no placeholder.
    pub fn build(self) -> Result<EndpointDefinition, CatalogError> {
        let Self {
            id,
            component,
            path,
            method,
            path_params,
            query_params,
        } = self;

        let path = PathTemplate::parse(path).map_err(|source| CatalogError::Template {
            id: id.clone(),
            source,
        })?;

        check_unique(&id, ParamLocation::Path, &path_params)?;
        check_unique(&id, ParamLocation::Query, &query_params)?;

        let placeholders: HashSet<&str> = path.placeholders().collect();
        if let Some(name) = path
            .placeholders()
            .find(|name| !path_params.iter().any(|param| param.name() == *name))
        {
            return Err(CatalogError::UndeclaredPlaceholder {
                id,
                name: name.to_string(),
            });
        }
        if let Some(param) = path_params
            .iter()
            .find(|param| !placeholders.contains(param.name()))
        {
            return Err(CatalogError::UnusedPathParam {
                id,
                name: param.name().to_string(),
            });
        }

        Ok(EndpointDefinition {
            id,
            component,
            path,
            method,
            path_params,
            query_params,
        })
    }
}

fn check_unique(id: &str, location: ParamLocation, params: &[Param]) -> Result<(), CatalogError> {
    let mut seen = HashSet::with_capacity(params.len());
    for param in params {
        if !seen.insert(param.name()) {
            return Err(CatalogError::DuplicateParam {
                id: id.to_string(),
                location,
                name: param.name().to_string(),
            });
        }
    }
    Ok(())
}
