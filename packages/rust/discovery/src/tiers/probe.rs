//! Tier 2: probe a fixed matrix of directories × file names.

use async_trait::async_trait;
use mdnotes_shared::{DocumentDescriptor, Origin, Result};
use tracing::{debug, info, instrument};

use super::DiscoveryTier;
use crate::client::SiteClient;

/// Requests every `{directory}{file}` cell in order. Every cell is tried;
/// misses and network errors are skipped silently.
pub struct ProbeTier {
    directories: Vec<String>,
    files: Vec<String>,
}

impl ProbeTier {
    pub fn new(directories: Vec<String>, files: Vec<String>) -> Self {
        Self { directories, files }
    }

    /// Candidate paths in probe order (directory-major).
    fn candidates(&self) -> impl Iterator<Item = (&str, String)> + '_ {
        self.directories.iter().flat_map(move |dir| {
            self.files
                .iter()
                .map(move |file| (file.as_str(), format!("{dir}{file}")))
        })
    }
}

#[async_trait]
impl DiscoveryTier for ProbeTier {
    fn origin(&self) -> Origin {
        Origin::Probe
    }

    #[instrument(skip_all, fields(cells = self.directories.len() * self.files.len()))]
    async fn discover(&self, site: &SiteClient) -> Result<Vec<DocumentDescriptor>> {
        let mut documents = Vec::new();

        for (name, path) in self.candidates() {
            if site.exists(&path).await {
                info!(%path, "found");
                documents.push(DocumentDescriptor::new(name, path, Origin::Probe));
            } else {
                debug!(%path, "miss");
            }
        }

        Ok(documents)
    }
}
