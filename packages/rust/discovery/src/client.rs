//! HTTP access to the site being browsed.

use mdnotes_shared::{DiscoveryOptions, MdNotesError, Result};
use reqwest::Client;
use tracing::debug;
use url::Url;

/// Maximum number of redirects to follow.
const MAX_REDIRECTS: usize = 3;

/// Maximum response size we accept for listings and documents (10 MB).
const MAX_RESPONSE_SIZE: u64 = 10 * 1024 * 1024;

/// User-Agent string for discovery and document requests.
const USER_AGENT: &str = concat!("mdnotes/", env!("CARGO_PKG_VERSION"));

/// A reqwest client bound to the site's base URL.
///
/// Relative paths resolve against the base; absolute URLs pass through.
#[derive(Debug, Clone)]
pub struct SiteClient {
    client: Client,
    base_url: Url,
}

impl SiteClient {
    /// Build a client with the timeout and base URL from `opts`.
    pub fn new(opts: &DiscoveryOptions) -> Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .redirect(reqwest::redirect::Policy::limited(MAX_REDIRECTS))
            .timeout(opts.timeout)
            .build()
            .map_err(|e| MdNotesError::Network(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: opts.base_url.clone(),
        })
    }

    /// The base URL relative paths resolve against.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Resolve a document path against the base URL.
    pub fn resolve(&self, path: &str) -> Result<Url> {
        self.base_url
            .join(path)
            .map_err(|e| MdNotesError::validation(format!("cannot resolve '{path}': {e}")))
    }

    /// Fetch a path (relative to the base) as text. Non-2xx is a network error.
    pub async fn fetch_text(&self, path: &str) -> Result<String> {
        let url = self.resolve(path)?;
        self.get_text(&url).await
    }

    /// Whether a GET of `path` succeeds with a 2xx status.
    ///
    /// Any failure, including a bad path, counts as "does not exist".
    pub async fn exists(&self, path: &str) -> bool {
        let Ok(url) = self.resolve(path) else {
            return false;
        };

        match self.client.get(url).send().await {
            Ok(response) => response.status().is_success(),
            Err(e) => {
                debug!(path, error = %e, "verification request failed");
                false
            }
        }
    }

    /// GET an absolute URL as text.
    pub async fn get_text(&self, url: &Url) -> Result<String> {
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| MdNotesError::Network(format!("{url}: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(MdNotesError::Network(format!(
                "HTTP {}: {}",
                status.as_u16(),
                status.canonical_reason().unwrap_or("Unknown")
            )));
        }

        if let Some(len) = response.content_length() {
            if len > MAX_RESPONSE_SIZE {
                return Err(MdNotesError::validation(format!(
                    "{url}: response too large ({len} bytes, max {MAX_RESPONSE_SIZE})"
                )));
            }
        }

        response
            .text()
            .await
            .map_err(|e| MdNotesError::Network(format!("{url}: failed to read body: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client_for(base: &str) -> SiteClient {
        let opts = DiscoveryOptions::for_site(base).unwrap();
        SiteClient::new(&opts).unwrap()
    }

    #[test]
    fn resolve_relative_and_absolute() {
        let site = client_for("https://notes.example.com/viewer");
        assert_eq!(
            site.resolve("docs/README.md").unwrap().as_str(),
            "https://notes.example.com/viewer/docs/README.md"
        );
        assert_eq!(
            site.resolve("https://cdn.example.com/a.md").unwrap().as_str(),
            "https://cdn.example.com/a.md"
        );
    }

    #[tokio::test]
    async fn fetch_text_reports_status() {
        let server = wiremock::MockServer::start().await;

        wiremock::Mock::given(wiremock::matchers::method("GET"))
            .and(wiremock::matchers::path("/docs/missing.md"))
            .respond_with(wiremock::ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let site = client_for(&server.uri());
        let err = site.fetch_text("docs/missing.md").await.unwrap_err();
        assert_eq!(err.to_string(), "network error: HTTP 404: Not Found");
    }

    #[tokio::test]
    async fn exists_follows_status() {
        let server = wiremock::MockServer::start().await;

        wiremock::Mock::given(wiremock::matchers::method("GET"))
            .and(wiremock::matchers::path("/guide.md"))
            .respond_with(wiremock::ResponseTemplate::new(200).set_body_string("# Guide"))
            .mount(&server)
            .await;

        let site = client_for(&server.uri());
        assert!(site.exists("guide.md").await);
        assert!(!site.exists("nope.md").await);
    }
}
