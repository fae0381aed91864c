//! Remote component catalog access
//!
//! Fetches the component index and per-component specification documents
//! from a raw-file host, and filters the index for keyword searches.
//!
//! Nothing fetched here is cached: every call issues a fresh request and
//! returns an immutable snapshot.

pub mod error;
pub mod http;
pub mod model;
pub mod search;
pub mod source;

pub use error::{Error, Result};
pub use http::{DEFAULT_BASE_URL, DEFAULT_TIMEOUT, HttpCatalog};
pub use model::{ComponentIndex, ComponentSpec, ComponentSummary};
pub use search::search_components;
pub use source::CatalogSource;
