//! Parsers for the two listing formats discovery understands:
//! HTML directory indexes and the host contents API's JSON array.

use std::sync::LazyLock;

use mdnotes_shared::{DOCUMENT_EXTENSION, MdNotesError, Result};
use scraper::{Html, Selector};
use serde::Deserialize;

// ---------------------------------------------------------------------------
// Directory listing (HTML)
// ---------------------------------------------------------------------------

/// Anchors whose target ends in the document extension.
static DOC_LINK_SEL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(r#"a[href$=".md"]"#).expect("doc link selector"));

/// Extract document link targets from a directory-listing page, in document order.
///
/// Targets containing a `..` segment are rejected. HTML parsing is lenient,
/// so a malformed page simply yields fewer (or no) links.
pub(crate) fn listing_links(html: &str) -> Vec<String> {
    let doc = Html::parse_document(html);

    doc.select(&DOC_LINK_SEL)
        .filter_map(|el| el.value().attr("href"))
        .filter(|href| !href.contains(".."))
        .map(str::to_string)
        .collect()
}

/// Basename of a link target (`/a/b/notes.md` → `notes.md`).
pub(crate) fn basename(href: &str) -> &str {
    href.rsplit('/').next().unwrap_or(href)
}

// ---------------------------------------------------------------------------
// Host contents API (JSON)
// ---------------------------------------------------------------------------

/// One entry of a contents-API listing. Unknown fields are ignored.
#[derive(Debug, Deserialize)]
struct ContentEntry {
    #[serde(rename = "type")]
    kind: String,
    name: String,
}

/// Parse a contents-API response into document file names, in response order.
///
/// Only `type == "file"` entries with the document extension are kept.
pub(crate) fn contents_listing(body: &str) -> Result<Vec<String>> {
    let entries: Vec<ContentEntry> = serde_json::from_str(body)
        .map_err(|e| MdNotesError::parse(format!("contents listing: {e}")))?;

    Ok(entries
        .into_iter()
        .filter(|entry| entry.kind == "file" && entry.name.ends_with(DOCUMENT_EXTENSION))
        .map(|entry| entry.name)
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn load_fixture(name: &str) -> String {
        let path = std::path::Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("../../../fixtures")
            .join(name);
        std::fs::read_to_string(&path)
            .unwrap_or_else(|e| panic!("failed to read fixture {}: {e}", path.display()))
    }

    #[test]
    fn parse_listing_fixture() {
        let html = load_fixture("html/docs-listing.html");
        let links = listing_links(&html);

        assert_eq!(links, vec!["README.md", "setup.md", "/docs/deploy-notes.md"]);
    }

    #[test]
    fn listing_rejects_parent_traversal() {
        let html = r#"<ul><li><a href="ok.md">ok</a></li><li><a href="../secret.md">x</a></li></ul>"#;
        assert_eq!(listing_links(html), vec!["ok.md"]);
    }

    #[test]
    fn listing_ignores_other_extensions() {
        let html = r#"<a href="a.txt">a</a><a href="b.md.bak">b</a><a href="c.md">c</a><a>none</a>"#;
        assert_eq!(listing_links(html), vec!["c.md"]);
    }

    #[test]
    fn listing_of_garbage_is_empty() {
        assert!(listing_links("<<<not html at all").is_empty());
        assert!(listing_links("").is_empty());
    }

    #[test]
    fn basename_strips_directories() {
        assert_eq!(basename("/docs/deploy-notes.md"), "deploy-notes.md");
        assert_eq!(basename("README.md"), "README.md");
    }

    #[test]
    fn parse_contents_fixture() {
        let body = load_fixture("json/contents.json");
        let names = contents_listing(&body).unwrap();
        assert_eq!(names, vec!["aliases.md", "zshrc.md"]);
    }

    #[test]
    fn contents_malformed_is_parse_error() {
        let err = contents_listing(r#"{"message": "Not Found"}"#).unwrap_err();
        assert!(matches!(err, MdNotesError::Parse { .. }));
    }

    #[test]
    fn contents_empty_array() {
        assert!(contents_listing("[]").unwrap().is_empty());
    }
}
