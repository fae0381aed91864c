//! HTTP-backed catalog source

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Url};

use crate::model::{ComponentIndex, ComponentSpec};
use crate::source::CatalogSource;
use crate::{Error, Result};

/// Raw-file location of the published component specs.
pub const DEFAULT_BASE_URL: &str =
    "https://raw.githubusercontent.com/evgenyshkuratov-rgb/ios-components/main/specs";

/// Per-request deadline applied when none is configured.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Catalog source that issues a single GET per call against a fixed base URL.
///
/// Layout expected on the host:
///
/// ```text
/// {base}/index.json
/// {base}/components/{name}.json
/// ```
#[derive(Debug, Clone)]
pub struct HttpCatalog {
    client: Client,
    base: Url,
}

impl HttpCatalog {
    /// Create a client for the catalog rooted at `base_url`.
    ///
    /// # Errors
    /// Returns [`Error::InvalidBaseUrl`] if the URL does not parse or cannot
    /// carry path segments (e.g. `mailto:`), and [`Error::Network`] if the
    /// HTTP client cannot be built.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let base = Url::parse(base_url).map_err(|_| Error::InvalidBaseUrl {
            url: base_url.to_string(),
        })?;
        if base.cannot_be_a_base() {
            return Err(Error::InvalidBaseUrl {
                url: base_url.to_string(),
            });
        }

        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::Network {
                message: format!("failed to create HTTP client: {e}"),
            })?;

        Ok(Self { client, base })
    }

    /// Base URL all catalog paths are resolved against.
    pub fn base_url(&self) -> &Url {
        &self.base
    }

    /// Append path segments to the base URL, percent-encoding each one.
    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| Error::InvalidBaseUrl {
                url: self.base.to_string(),
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// URL of the specification document for `name`.
    pub fn component_url(&self, name: &str) -> Result<Url> {
        let file_name = format!("{name}.json");
        self.endpoint(&["components", &file_name])
    }

    /// URL of the component index.
    pub fn index_url(&self) -> Result<Url> {
        self.endpoint(&["index.json"])
    }
}

#[async_trait]
impl CatalogSource for HttpCatalog {
    async fn fetch_index(&self) -> Result<ComponentIndex> {
        let url = self.index_url()?;
        tracing::debug!(%url, "Fetching component index");

        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            tracing::warn!(status = status.as_u16(), "Component index request failed");
            return Err(Error::RemoteUnavailable {
                status: status.as_u16(),
                status_text: status.canonical_reason().unwrap_or("").to_string(),
            });
        }

        let index: ComponentIndex = response.json().await?;
        tracing::debug!(count = index.components.len(), "Fetched component index");
        Ok(index)
    }

    async fn fetch_component_spec(&self, name: &str) -> Result<ComponentSpec> {
        let url = self.component_url(name)?;
        tracing::debug!(%url, component = %name, "Fetching component spec");

        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            tracing::debug!(status = status.as_u16(), component = %name, "Component not served");
            return Err(Error::ComponentNotFound {
                name: name.to_string(),
            });
        }

        Ok(response.json().await?)
    }
}
