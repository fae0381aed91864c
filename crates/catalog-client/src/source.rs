//! Catalog source trait

use async_trait::async_trait;

use crate::Result;
use crate::model::{ComponentIndex, ComponentSpec};

/// Anything that can serve the component catalog.
///
/// [`HttpCatalog`](crate::HttpCatalog) is the production implementation;
/// tests swap in in-memory sources.
#[async_trait]
pub trait CatalogSource: Send + Sync {
    /// Fetch the component index.
    async fn fetch_index(&self) -> Result<ComponentIndex>;

    /// Fetch the full specification document for one component.
    ///
    /// Any failure status from the remote is reported as
    /// [`Error::ComponentNotFound`](crate::Error::ComponentNotFound).
    async fn fetch_component_spec(&self, name: &str) -> Result<ComponentSpec>;
}
