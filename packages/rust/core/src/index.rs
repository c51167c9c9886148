//! The file index: filtering and rendering of discovered documents.

use mdnotes_shared::{DocumentDescriptor, escape_html};
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use tracing::debug;

/// Page that displays a single document.
const VIEWER_PAGE: &str = "viewer.html";

/// Characters left unescaped in a query component, as browsers do for
/// `encodeURIComponent`.
const COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Link to the viewer page for a document path.
pub fn viewer_href(path: &str) -> String {
    format!("{VIEWER_PAGE}?file={}", utf8_percent_encode(path, COMPONENT))
}

/// Discovered documents plus the currently visible (filtered) subset.
#[derive(Debug, Clone, Default)]
pub struct FileIndex {
    all: Vec<DocumentDescriptor>,
    visible: Vec<DocumentDescriptor>,
}

impl FileIndex {
    pub fn new(files: Vec<DocumentDescriptor>) -> Self {
        Self {
            visible: files.clone(),
            all: files,
        }
    }

    /// Every discovered document, unfiltered.
    pub fn all(&self) -> &[DocumentDescriptor] {
        &self.all
    }

    /// Documents matching the last filter.
    pub fn visible(&self) -> &[DocumentDescriptor] {
        &self.visible
    }

    /// Keep the documents whose name or description contains `query`,
    /// ignoring case. A blank query shows everything again.
    pub fn filter(&mut self, query: &str) {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            self.visible = self.all.clone();
            return;
        }

        self.visible = self
            .all
            .iter()
            .filter(|doc| {
                doc.name().to_lowercase().contains(&needle)
                    || doc.description().to_lowercase().contains(&needle)
            })
            .cloned()
            .collect();
        debug!(query, matched = self.visible.len(), "filtered file index");
    }

    /// Summary line shown above the list.
    pub fn count_line(&self) -> String {
        match self.visible.len() {
            0 => "No files found".to_string(),
            1 => "1 markdown file found".to_string(),
            n => format!("{n} markdown files found"),
        }
    }

    /// `<li>` items for the visible documents.
    pub fn render_list(&self) -> String {
        if self.visible.is_empty() {
            return r#"<li class="error">No markdown files found</li>"#.to_string();
        }

        self.visible
            .iter()
            .map(|doc| {
                format!(
                    r#"<li><a href="{}" class="file-link"><span class="file-icon">📄</span>{}</a></li>"#,
                    viewer_href(doc.path()),
                    escape_html(doc.name())
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}
