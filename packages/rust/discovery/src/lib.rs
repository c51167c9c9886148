//! Document discovery across an unknown hosting environment.
//!
//! A static server may expose a directory listing, may only serve files it
//! is asked for by name, or may sit behind a provider with a contents API.
//! The [`Cascade`] tries progressively weaker strategies in order and the
//! first tier that finds anything wins:
//!
//! 1. directory listing of the documents directory
//! 2. brute-force probe of a fixed directory × file-name matrix
//! 3. hosting-provider contents API (recognized hosts only)
//! 4. built-in demo documents

mod client;
mod parser;
pub mod tiers;

use std::collections::HashSet;

use mdnotes_shared::{DiscoveryOptions, DocumentDescriptor};
use tracing::{debug, info, instrument, warn};

pub use client::SiteClient;
pub use tiers::{
    DemoTier, DiscoveryTier, HostApiTier, ListingTier, ProbeTier, demo_documents,
};

// ---------------------------------------------------------------------------
// Cascade
// ---------------------------------------------------------------------------

/// Ordered list of discovery tiers.
pub struct Cascade {
    tiers: Vec<Box<dyn DiscoveryTier>>,
}

impl Cascade {
    /// The standard four-tier cascade for the given options.
    pub fn new(opts: &DiscoveryOptions) -> Self {
        Self {
            tiers: vec![
                Box::new(ListingTier::new(opts.documents_dir.clone())),
                Box::new(ProbeTier::new(
                    opts.probe_directories.clone(),
                    opts.probe_files.clone(),
                )),
                Box::new(HostApiTier::new(
                    opts.page_url.clone(),
                    opts.documents_dir.clone(),
                    opts.host_api.clone(),
                )),
                Box::new(DemoTier),
            ],
        }
    }

    /// A cascade over caller-supplied tiers, tried in the given order.
    pub fn with_tiers(tiers: Vec<Box<dyn DiscoveryTier>>) -> Self {
        Self { tiers }
    }

    /// Run tiers in order until one yields documents.
    ///
    /// Tier errors are logged and treated as an empty result. If every tier
    /// comes up empty the demo documents are returned, so the result is
    /// never empty. Paths are unique within the result.
    #[instrument(skip_all, fields(base = %site.base_url()))]
    pub async fn run(&self, site: &SiteClient) -> Vec<DocumentDescriptor> {
        for tier in &self.tiers {
            let origin = tier.origin();
            debug!(tier = %origin, "trying tier");

            match tier.discover(site).await {
                Ok(found) if !found.is_empty() => {
                    let documents = dedupe_by_path(found);
                    info!(tier = %origin, count = documents.len(), "discovery complete");
                    return documents;
                }
                Ok(_) => debug!(tier = %origin, "tier found nothing"),
                Err(e) => warn!(tier = %origin, error = %e, "tier failed"),
            }
        }

        info!("no tier produced documents, using demo documents");
        demo_documents()
    }
}

/// Drop later descriptors whose path was already seen, keeping order.
fn dedupe_by_path(documents: Vec<DocumentDescriptor>) -> Vec<DocumentDescriptor> {
    let mut seen = HashSet::new();
    documents
        .into_iter()
        .filter(|doc| seen.insert(doc.path().to_string()))
        .collect()
}

// ---------------------------------------------------------------------------
// Main entry point
// ---------------------------------------------------------------------------

/// Discover the documents available on the site described by `opts`.
///
/// Never fails: if the HTTP client cannot even be built, the demo documents
/// are returned.
pub async fn discover(opts: &DiscoveryOptions) -> Vec<DocumentDescriptor> {
    info!(base = %opts.base_url, "starting file discovery");

    match SiteClient::new(opts) {
        Ok(site) => Cascade::new(opts).run(&site).await,
        Err(e) => {
            warn!(error = %e, "cannot build HTTP client, using demo documents");
            demo_documents()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use mdnotes_shared::{MdNotesError, Origin, Result};
    use url::Url;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn fixture(name: &str) -> String {
        let path = std::path::Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("../../../fixtures")
            .join(name);
        std::fs::read_to_string(&path)
            .unwrap_or_else(|e| panic!("failed to read fixture {}: {e}", path.display()))
    }

    async fn serve(server: &MockServer, at: &str, status: u16, body: &str) {
        Mock::given(method("GET"))
            .and(path(at))
            .respond_with(ResponseTemplate::new(status).set_body_string(body))
            .mount(server)
            .await;
    }

    fn paths(docs: &[DocumentDescriptor]) -> Vec<&str> {
        docs.iter().map(|d| d.path()).collect()
    }

    // -----------------------------------------------------------------------
    // Stub tiers
    // -----------------------------------------------------------------------

    struct FixedTier(Origin, Vec<&'static str>);

    #[async_trait]
    impl DiscoveryTier for FixedTier {
        fn origin(&self) -> Origin {
            self.0
        }

        async fn discover(&self, _site: &SiteClient) -> Result<Vec<DocumentDescriptor>> {
            Ok(self
                .1
                .iter()
                .map(|p| DocumentDescriptor::new(*p, *p, self.0))
                .collect())
        }
    }

    struct MustNotRun;

    #[async_trait]
    impl DiscoveryTier for MustNotRun {
        fn origin(&self) -> Origin {
            Origin::Probe
        }

        async fn discover(&self, _site: &SiteClient) -> Result<Vec<DocumentDescriptor>> {
            panic!("tier ran after an earlier tier succeeded");
        }
    }

    struct Failing;

    #[async_trait]
    impl DiscoveryTier for Failing {
        fn origin(&self) -> Origin {
            Origin::DirectoryListing
        }

        async fn discover(&self, _site: &SiteClient) -> Result<Vec<DocumentDescriptor>> {
            Err(MdNotesError::Network("connection refused".into()))
        }
    }

    fn offline_site() -> SiteClient {
        let opts = DiscoveryOptions::for_site("http://127.0.0.1:9/").unwrap();
        SiteClient::new(&opts).unwrap()
    }

    #[tokio::test]
    async fn first_successful_tier_wins() {
        let cascade = Cascade::with_tiers(vec![
            Box::new(FixedTier(Origin::DirectoryListing, vec!["docs/a.md"])),
            Box::new(MustNotRun),
            Box::new(MustNotRun),
            Box::new(MustNotRun),
        ]);

        let docs = cascade.run(&offline_site()).await;
        assert_eq!(paths(&docs), vec!["docs/a.md"]);
        assert_eq!(docs[0].origin(), Origin::DirectoryListing);
    }

    #[tokio::test]
    async fn failing_tier_falls_through() {
        let cascade = Cascade::with_tiers(vec![
            Box::new(Failing),
            Box::new(FixedTier(Origin::Probe, vec![])),
            Box::new(FixedTier(Origin::HostApi, vec!["docs/b.md"])),
            Box::new(MustNotRun),
        ]);

        let docs = cascade.run(&offline_site()).await;
        assert_eq!(paths(&docs), vec!["docs/b.md"]);
        assert_eq!(docs[0].origin(), Origin::HostApi);
    }

    #[tokio::test]
    async fn exhausted_cascade_returns_demo() {
        let cascade = Cascade::with_tiers(vec![Box::new(Failing)]);
        let docs = cascade.run(&offline_site()).await;
        assert_eq!(paths(&docs), vec!["demo.md", "example.md"]);
    }

    #[tokio::test]
    async fn winning_tier_is_deduplicated() {
        let cascade = Cascade::with_tiers(vec![Box::new(FixedTier(
            Origin::Probe,
            vec!["docs/a.md", "docs/b.md", "docs/a.md"],
        ))]);
        let docs = cascade.run(&offline_site()).await;
        assert_eq!(paths(&docs), vec!["docs/a.md", "docs/b.md"]);
    }

    // -----------------------------------------------------------------------
    // End-to-end against a mock server
    // -----------------------------------------------------------------------

    #[tokio::test]
    async fn listing_rejects_traversal_link() {
        let server = MockServer::start().await;
        let listing = r#"<html><body>
            <a href="guide.md">guide.md</a>
            <a href="../secret.md">secret.md</a>
        </body></html>"#;

        serve(&server, "/docs/", 200, listing).await;
        serve(&server, "/docs/guide.md", 200, "# Guide").await;
        serve(&server, "/secret.md", 200, "top secret").await;

        let opts = DiscoveryOptions::for_site(&server.uri()).unwrap();
        let docs = discover(&opts).await;

        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].name(), "guide.md");
        assert_eq!(docs[0].path(), "docs/guide.md");
        assert_eq!(docs[0].origin(), Origin::DirectoryListing);
        assert_eq!(docs[0].description(), "User guide and instructions");
    }

    #[tokio::test]
    async fn listing_fixture_verifies_each_link() {
        let server = MockServer::start().await;

        serve(&server, "/docs/", 200, &fixture("html/docs-listing.html")).await;
        serve(&server, "/docs/README.md", 200, "# Readme").await;
        serve(&server, "/docs/deploy-notes.md", 200, "# Deploy").await;
        // setup.md is listed but 404s

        let opts = DiscoveryOptions::for_site(&server.uri()).unwrap();
        let docs = discover(&opts).await;

        assert_eq!(paths(&docs), vec!["docs/README.md", "docs/deploy-notes.md"]);
        assert_eq!(
            docs[1].description(),
            "Markdown documentation: deploy-notes.md"
        );
    }

    #[tokio::test]
    async fn probe_runs_when_listing_missing() {
        let server = MockServer::start().await;

        serve(&server, "/docs/", 403, "forbidden").await;
        serve(&server, "/notes/cheatsheet.md", 200, "# Cheats").await;
        serve(&server, "/docs/README.md", 200, "# Readme").await;
        serve(&server, "/guide.md", 200, "# Guide").await;

        let opts = DiscoveryOptions::for_site(&server.uri()).unwrap();
        let docs = discover(&opts).await;

        // Matrix order: docs/ before notes/ before the site root.
        assert_eq!(
            paths(&docs),
            vec!["docs/README.md", "notes/cheatsheet.md", "guide.md"]
        );
        assert!(docs.iter().all(|d| d.origin() == Origin::Probe));
    }

    #[tokio::test]
    async fn host_api_used_on_recognized_host() {
        let server = MockServer::start().await;

        serve(
            &server,
            "/repos/alice/md_notes/contents/docs",
            200,
            &fixture("json/contents.json"),
        )
        .await;

        let mut opts = DiscoveryOptions::for_site(&server.uri())
            .unwrap()
            .with_page_url(Url::parse("https://pages.github.io/alice/index.html").unwrap());
        opts.host_api.api_base = server.uri();

        let docs = discover(&opts).await;

        assert_eq!(paths(&docs), vec!["docs/aliases.md", "docs/zshrc.md"]);
        assert!(docs.iter().all(|d| d.origin() == Origin::HostApi));
        assert_eq!(docs[1].description(), "ZSH configuration and settings");
    }

    #[tokio::test]
    async fn host_api_skipped_elsewhere() {
        let server = MockServer::start().await;

        // Would succeed, but the page is not on a recognized host.
        serve(
            &server,
            "/repos/nali-v1/md_notes/contents/docs",
            200,
            &fixture("json/contents.json"),
        )
        .await;

        let mut opts = DiscoveryOptions::for_site(&server.uri()).unwrap();
        opts.host_api.api_base = server.uri();

        let docs = discover(&opts).await;
        assert!(docs.iter().all(|d| d.origin() == Origin::Demo));
    }

    #[tokio::test]
    async fn malformed_api_response_falls_to_demo() {
        let server = MockServer::start().await;

        serve(
            &server,
            "/repos/alice/md_notes/contents/docs",
            200,
            "{\"message\": \"API rate limit exceeded\"}",
        )
        .await;

        let mut opts = DiscoveryOptions::for_site(&server.uri())
            .unwrap()
            .with_page_url(Url::parse("https://pages.github.io/alice/").unwrap());
        opts.host_api.api_base = server.uri();

        let docs = discover(&opts).await;
        assert_eq!(paths(&docs), vec!["demo.md", "example.md"]);
    }

    #[tokio::test]
    async fn unreachable_site_yields_demo() {
        let mut opts = DiscoveryOptions::for_site("http://127.0.0.1:9/").unwrap();
        opts.probe_directories = vec!["docs/".into()];
        opts.probe_files = vec!["README.md".into()];

        let docs = discover(&opts).await;
        assert_eq!(docs.len(), 2);
        assert!(docs.iter().all(|d| d.origin() == Origin::Demo));
    }
}
