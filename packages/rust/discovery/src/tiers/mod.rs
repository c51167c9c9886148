//! Discovery tier trait and the built-in tiers.
//!
//! Tiers are tried in priority order by [`Cascade`](crate::Cascade); the
//! demo tier is the always-last fallback.

mod demo;
mod host_api;
mod listing;
mod probe;

use async_trait::async_trait;
use mdnotes_shared::{DocumentDescriptor, Origin, Result};

use crate::client::SiteClient;

pub use demo::{DemoTier, demo_documents};
pub use host_api::HostApiTier;
pub use listing::ListingTier;
pub use probe::ProbeTier;

/// One strategy in the discovery cascade.
#[async_trait]
pub trait DiscoveryTier: Send + Sync {
    /// Origin stamped on this tier's descriptors.
    fn origin(&self) -> Origin;

    /// Produce descriptors in discovery order. An empty vector or an error
    /// both mean "fall through to the next tier".
    async fn discover(&self, site: &SiteClient) -> Result<Vec<DocumentDescriptor>>;
}
