//! The document viewer: `?file=` selection, fetch, render, error page.

use mdnotes_discovery::SiteClient;
use mdnotes_markdown::Converter;
use mdnotes_shared::{MdNotesError, Result, escape_html};
use tracing::{info, instrument, warn};
use url::form_urlencoded;

/// Query parameter naming the document to show.
const FILE_PARAM: &str = "file";

/// Title used when no document is shown.
const DEFAULT_TITLE: &str = "md_notes";

/// Index page the error block links back to.
const INDEX_PAGE: &str = "index.html";

const NO_FILE_MESSAGE: &str = "No file specified in URL. Please select a file from the browser.";

/// A rendered viewer page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewerPage {
    /// Document title, `"{file} - md_notes"` on success.
    pub title: String,
    /// HTML for the content area.
    pub body_html: String,
    /// Whether `body_html` is the error block.
    pub is_error: bool,
}

impl ViewerPage {
    /// Wrap the page in a minimal standalone HTML document.
    pub fn to_html(&self) -> String {
        format!(
            "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<title>{}</title>\n</head>\n<body>\n<main id=\"markdownContent\">\n{}\n</main>\n</body>\n</html>\n",
            escape_html(self.title.as_str()),
            self.body_html
        )
    }
}

/// Pick the document path out of a query string such as `?file=docs%2Fa.md`.
///
/// The first `file` value wins. A missing or empty value is a
/// [`MdNotesError::UserFacing`] error.
pub fn select_document(query: &str) -> Result<String> {
    let query = query.strip_prefix('?').unwrap_or(query);
    form_urlencoded::parse(query.as_bytes())
        .find(|(key, _)| key == FILE_PARAM)
        .map(|(_, value)| value.into_owned())
        .filter(|value| !value.is_empty())
        .ok_or_else(|| MdNotesError::user_facing(NO_FILE_MESSAGE))
}

/// The error block shown in place of a document.
pub fn error_block(message: &str) -> String {
    format!(
        "<div class=\"error\">\n<h3>Error</h3>\n<p>{}</p>\n<a href=\"{INDEX_PAGE}\" class=\"back-link\">← Back to files</a>\n</div>",
        escape_html(message)
    )
}

/// Text shown to the reader for a failed load.
fn reader_detail(err: &MdNotesError) -> String {
    match err {
        MdNotesError::Network(msg) | MdNotesError::Render(msg) => msg.clone(),
        MdNotesError::UserFacing { message } => message.clone(),
        other => other.to_string(),
    }
}

/// Fetches documents from the site and renders them.
pub struct Viewer {
    site: SiteClient,
    converter: Converter,
}

impl Viewer {
    pub fn new(site: SiteClient, converter: Converter) -> Self {
        Self { site, converter }
    }

    /// Fetch the raw Markdown at `path`, relative to the site base.
    pub async fn load_document(&self, path: &str) -> Result<String> {
        self.site.fetch_text(path).await
    }

    /// Render the page for a query string. Never fails; problems become
    /// the error block.
    pub async fn open(&self, query: &str) -> ViewerPage {
        match select_document(query) {
            Ok(path) => self.view(&path).await,
            Err(e) => Self::error_page(&reader_detail(&e)),
        }
    }

    /// Fetch and render one document.
    #[instrument(skip(self))]
    pub async fn view(&self, path: &str) -> ViewerPage {
        match self.load_document(path).await {
            Ok(markdown) => {
                info!(bytes = markdown.len(), "document loaded");
                ViewerPage {
                    title: format!("{path} - {DEFAULT_TITLE}"),
                    body_html: self.converter.convert(&markdown),
                    is_error: false,
                }
            }
            Err(e) => {
                warn!(error = %e, "failed to load document");
                Self::error_page(&format!(
                    "Failed to load \"{path}\". Error: {}",
                    reader_detail(&e)
                ))
            }
        }
    }

    fn error_page(message: &str) -> ViewerPage {
        ViewerPage {
            title: DEFAULT_TITLE.to_string(),
            body_html: error_block(message),
            is_error: true,
        }
    }
}
