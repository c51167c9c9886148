//! Tier 1: scan the documents directory's HTML index.

use async_trait::async_trait;
use mdnotes_shared::{DocumentDescriptor, Origin, Result};
use tracing::{debug, info, instrument};

use super::DiscoveryTier;
use crate::client::SiteClient;
use crate::parser::{basename, listing_links};

/// Reads `{documents_dir}/` as a directory listing and verifies every
/// linked document before reporting it.
pub struct ListingTier {
    documents_dir: String,
}

impl ListingTier {
    pub fn new(documents_dir: impl Into<String>) -> Self {
        Self {
            documents_dir: documents_dir.into(),
        }
    }
}

#[async_trait]
impl DiscoveryTier for ListingTier {
    fn origin(&self) -> Origin {
        Origin::DirectoryListing
    }

    #[instrument(skip_all, fields(dir = %self.documents_dir))]
    async fn discover(&self, site: &SiteClient) -> Result<Vec<DocumentDescriptor>> {
        let listing_path = format!("{}/", self.documents_dir);
        let html = site.fetch_text(&listing_path).await?;

        let links = listing_links(&html);
        debug!(links = links.len(), "directory listing parsed");

        let mut documents = Vec::new();
        for href in links {
            let name = basename(&href);
            let path = format!("{}/{name}", self.documents_dir);

            if site.exists(&path).await {
                info!(%path, "verified document");
                documents.push(DocumentDescriptor::new(name, path, Origin::DirectoryListing));
            } else {
                debug!(%path, "listed document not accessible");
            }
        }

        Ok(documents)
    }
}
