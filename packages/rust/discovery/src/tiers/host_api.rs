//! Tier 3: ask the hosting provider's contents API for the documents directory.
//!
//! Only applies when the viewer is served from a recognized static-hosting
//! domain. The owner comes from the first path segment of the page URL and
//! the repository name is fixed by configuration.

use async_trait::async_trait;
use mdnotes_shared::{DocumentDescriptor, HostApiConfig, MdNotesError, Origin, Result};
use tracing::{debug, info, instrument};
use url::Url;

use super::DiscoveryTier;
use crate::client::SiteClient;
use crate::parser::contents_listing;

pub struct HostApiTier {
    page_url: Url,
    documents_dir: String,
    config: HostApiConfig,
}

impl HostApiTier {
    pub fn new(page_url: Url, documents_dir: impl Into<String>, config: HostApiConfig) -> Self {
        Self {
            page_url,
            documents_dir: documents_dir.into(),
            config,
        }
    }

    /// Whether the page is served from the configured hosting suffix.
    fn applies(&self) -> bool {
        let suffix = self.config.hosting_suffix.as_str();
        self.page_url.host_str().is_some_and(|host| {
            host == suffix
                || host
                    .strip_suffix(suffix)
                    .is_some_and(|rest| rest.ends_with('.'))
        })
    }

    /// Owner read from the first path segment, or the configured default.
    fn owner(&self) -> String {
        self.page_url
            .path_segments()
            .and_then(|mut segments| segments.next())
            .filter(|segment| !segment.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| self.config.default_owner.clone())
    }

    fn contents_url(&self) -> Result<Url> {
        let raw = format!(
            "{}/repos/{}/{}/contents/{}",
            self.config.api_base.trim_end_matches('/'),
            self.owner(),
            self.config.repository,
            self.documents_dir
        );
        Url::parse(&raw)
            .map_err(|e| MdNotesError::validation(format!("invalid contents API URL '{raw}': {e}")))
    }
}

#[async_trait]
impl DiscoveryTier for HostApiTier {
    fn origin(&self) -> Origin {
        Origin::HostApi
    }

    #[instrument(skip_all, fields(page = %self.page_url))]
    async fn discover(&self, site: &SiteClient) -> Result<Vec<DocumentDescriptor>> {
        if !self.applies() {
            debug!(suffix = %self.config.hosting_suffix, "not on a recognized host, skipping");
            return Ok(Vec::new());
        }

        let url = self.contents_url()?;
        info!(%url, "querying contents API");

        let body = site.get_text(&url).await?;
        let documents = contents_listing(&body)?
            .into_iter()
            .map(|name| {
                let path = format!("{}/{name}", self.documents_dir);
                DocumentDescriptor::new(name, path, Origin::HostApi)
            })
            .collect();

        Ok(documents)
    }
}
