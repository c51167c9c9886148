//! Tier 4: the built-in demo documents shipped alongside the viewer.

use async_trait::async_trait;
use mdnotes_shared::{DocumentDescriptor, Origin, Result};

use super::DiscoveryTier;
use crate::client::SiteClient;

/// Demo document names, in display order.
const DEMO_DOCUMENTS: [&str; 2] = ["demo.md", "example.md"];

/// The fixed demo descriptors.
pub fn demo_documents() -> Vec<DocumentDescriptor> {
    DEMO_DOCUMENTS
        .iter()
        .map(|name| DocumentDescriptor::new(*name, *name, Origin::Demo))
        .collect()
}

/// Always succeeds with [`demo_documents`].
pub struct DemoTier;

#[async_trait]
impl DiscoveryTier for DemoTier {
    fn origin(&self) -> Origin {
        Origin::Demo
    }

    async fn discover(&self, _site: &SiteClient) -> Result<Vec<DocumentDescriptor>> {
        Ok(demo_documents())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exactly_two_demo_documents() {
        let docs = demo_documents();
        assert_eq!(docs.len(), 2);
        assert_eq!(docs[0].path(), "demo.md");
        assert_eq!(docs[1].path(), "example.md");
        assert!(docs.iter().all(|d| d.origin() == Origin::Demo));
        assert_eq!(docs[0].description(), "Markdown formatting examples and syntax guide");
    }
}
