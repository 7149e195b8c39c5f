use indexmap::IndexMap;
use indexmap::map::Entry;
use serde::{Serialize, Serializer};
use tracing::info;

use crate::builtin;
use crate::endpoint::{EndpointDefinition, NodeKind};
use crate::error::CatalogError;

/// An immutable lookup table of endpoint definitions, keyed by endpoint id.
///
/// The catalog is built once during initialization and then passed by reference (or
/// inside an `Arc`) to every request handler. Lookups need no synchronization.
///
/// # Example
///
/// ```rust
/// use debugapi_core::{EndpointCatalog, NodeKind};
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let catalog = EndpointCatalog::builtin()?;
///
/// let endpoint = catalog.get("tidb_schema_db").ok_or("unknown endpoint")?;
/// let request = endpoint.build_request("10.0.0.1", 10080, &[("db", "test")])?;
/// assert_eq!(request.path, "/schema/test");
///
/// assert!(catalog.by_component(NodeKind::Tidb).count() > 0);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Default)]
pub struct EndpointCatalog {
    endpoints: IndexMap<String, EndpointDefinition>,
}

impl EndpointCatalog {
    /// Starts an empty catalog builder.
    pub fn builder() -> EndpointCatalogBuilder {
        EndpointCatalogBuilder::default()
    }

    /// Creates a catalog from definitions, keeping their order.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::DuplicateEndpoint`] if two definitions share an id.
    pub fn new(
        definitions: impl IntoIterator<Item = EndpointDefinition>,
    ) -> Result<Self, CatalogError> {
        let mut endpoints = IndexMap::new();
        for definition in definitions {
            match endpoints.entry(definition.id().to_string()) {
                Entry::Occupied(entry) => {
                    return Err(CatalogError::DuplicateEndpoint {
                        id: entry.key().clone(),
                    });
                }
                Entry::Vacant(entry) => {
                    entry.insert(definition);
                }
            }
        }

        info!(endpoints = endpoints.len(), "endpoint catalog ready");
        Ok(Self { endpoints })
    }

    /// The built-in catalog of SQL-layer debug endpoints.
    ///
    /// # Errors
    ///
    /// Returns a [`CatalogError`] if a built-in definition is inconsistent.
    pub fn builtin() -> Result<Self, CatalogError> {
        Self::new(builtin::tidb_endpoints()?)
    }

    /// Looks up an endpoint by id.
    pub fn get(&self, id: &str) -> Option<&EndpointDefinition> {
        self.endpoints.get(id)
    }

    /// Iterates over the endpoints in catalog order.
    pub fn iter(&self) -> impl Iterator<Item = &EndpointDefinition> + '_ {
        self.endpoints.values()
    }

    /// Iterates over the endpoints targeting the given node kind.
    pub fn by_component(&self, component: NodeKind) -> impl Iterator<Item = &EndpointDefinition> + '_ {
        self.iter()
            .filter(move |endpoint| endpoint.component() == component)
    }

    /// The number of endpoints.
    pub fn len(&self) -> usize {
        self.endpoints.len()
    }

    /// Whether the catalog has no endpoint.
    pub fn is_empty(&self) -> bool {
        self.endpoints.is_empty()
    }
}

impl<'a> IntoIterator for &'a EndpointCatalog {
    type Item = &'a EndpointDefinition;
    type IntoIter = indexmap::map::Values<'a, String, EndpointDefinition>;

    fn into_iter(self) -> Self::IntoIter {
        self.endpoints.values()
    }
}

impl Serialize for EndpointCatalog {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.endpoints.values())
    }
}

/// Builder for [`EndpointCatalog`].
#[derive(Debug, Clone, Default)]
pub struct EndpointCatalogBuilder {
    definitions: Vec<EndpointDefinition>,
}

impl EndpointCatalogBuilder {
    /// Adds one endpoint.
    #[must_use]
    pub fn add(mut self, definition: EndpointDefinition) -> Self {
        self.definitions.push(definition);
        self
    }

    /// Adds several endpoints.
    #[must_use]
    pub fn add_all(mut self, definitions: impl IntoIterator<Item = EndpointDefinition>) -> Self {
        self.definitions.extend(definitions);
        self
    }

    /// Builds the catalog.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::DuplicateEndpoint`] if two definitions share an id.
    pub fn build(self) -> Result<EndpointCatalog, CatalogError> {
        EndpointCatalog::new(self.definitions)
    }
}
