//! Markdown-to-HTML conversion for the document viewer.
//!
//! A [`Converter`] delegates to an injected [`ExternalRenderer`] (normally
//! [`PulldownRenderer`]). When none is configured, or when it fails, the
//! built-in converter in [`fallback`] takes over, so conversion never fails.
//! An optional [`Highlighter`] then runs once per rendered code block.

mod fallback;
mod pulldown;

use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::LazyLock;

use mdnotes_shared::{RenderEngine, Result};
use regex::{Captures, Regex};
use tracing::{debug, instrument, warn};

pub use pulldown::PulldownRenderer;

// ---------------------------------------------------------------------------
// Public types
// ---------------------------------------------------------------------------

/// Options handed to an external renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderOptions {
    /// Soft line breaks render as `<br>`.
    pub line_breaks: bool,
    /// GitHub-flavored extensions (tables, strikethrough, task lists).
    pub extended_syntax: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            line_breaks: true,
            extended_syntax: true,
        }
    }
}

/// A conformant Markdown implementation the converter can delegate to.
pub trait ExternalRenderer: Send + Sync {
    /// Human-readable renderer name for tracing.
    fn name(&self) -> &str;

    /// Render `markdown` to HTML.
    fn render(&self, markdown: &str, opts: &RenderOptions) -> Result<String>;
}

/// Syntax highlighter applied to each rendered code block.
pub trait Highlighter: Send + Sync {
    fn name(&self) -> &str;

    /// Highlight one block. `code` is already HTML-escaped and the result is
    /// inserted as HTML in its place.
    fn highlight(&self, language: &str, code: &str) -> Result<String>;
}

// ---------------------------------------------------------------------------
// Converter
// ---------------------------------------------------------------------------

/// Markdown-to-HTML converter with an optional external renderer.
///
/// Stateless between calls; one instance can serve concurrent conversions.
pub struct Converter {
    external: Option<Box<dyn ExternalRenderer>>,
    highlighter: Option<Box<dyn Highlighter>>,
}

/// A `<pre><code>` block from either renderer. Group 1 is the language,
/// group 2 the escaped body.
static CODE_BLOCK_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?s)<pre><code(?: class="language-([^"]*)")?>(.*?)</code></pre>"#)
        .expect("valid regex")
});

impl Converter {
    /// Converter that only uses the built-in stages.
    pub fn builtin() -> Self {
        Self {
            external: None,
            highlighter: None,
        }
    }

    /// Converter that delegates to `renderer` first.
    pub fn with_renderer(renderer: Box<dyn ExternalRenderer>) -> Self {
        Self {
            external: Some(renderer),
            highlighter: None,
        }
    }

    /// Run `highlighter` over every code block after rendering.
    pub fn with_highlighter(mut self, highlighter: Box<dyn Highlighter>) -> Self {
        self.highlighter = Some(highlighter);
        self
    }

    /// Converter backed by pulldown-cmark.
    pub fn pulldown() -> Self {
        Self::with_renderer(Box::new(PulldownRenderer))
    }

    /// Converter for the configured engine.
    pub fn for_engine(engine: RenderEngine) -> Self {
        match engine {
            RenderEngine::Pulldown => Self::pulldown(),
            RenderEngine::Builtin => Self::builtin(),
        }
    }

    /// Name of the external renderer, if one is configured.
    pub fn external_name(&self) -> Option<&str> {
        self.external.as_deref().map(|r| r.name())
    }

    /// Convert Markdown to HTML. Never fails.
    ///
    /// Empty or whitespace-only input yields `<p>No content</p>`. An external
    /// renderer that errors or panics is logged and replaced by the built-in
    /// converter.
    #[instrument(skip_all, fields(len = markdown.len()))]
    pub fn convert(&self, markdown: &str) -> String {
        if markdown.trim().is_empty() {
            return fallback::EMPTY_PLACEHOLDER.to_string();
        }

        let html = self
            .render_external(markdown)
            .unwrap_or_else(|| fallback::render(markdown));
        self.highlight_blocks(html)
    }

    fn render_external(&self, markdown: &str) -> Option<String> {
        let renderer = self.external.as_deref()?;
        let opts = RenderOptions::default();

        match catch_unwind(AssertUnwindSafe(|| renderer.render(markdown, &opts))) {
            Ok(Ok(html)) => {
                debug!(renderer = renderer.name(), "rendered by external renderer");
                Some(html)
            }
            Ok(Err(e)) => {
                warn!(renderer = renderer.name(), error = %e, "external renderer failed, using built-in converter");
                None
            }
            Err(_) => {
                warn!(renderer = renderer.name(), "external renderer panicked, using built-in converter");
                None
            }
        }
    }

    /// Best-effort: a block the highlighter rejects is left as rendered.
    fn highlight_blocks(&self, html: String) -> String {
        let Some(highlighter) = self.highlighter.as_deref() else {
            debug!("no syntax highlighter configured");
            return html;
        };

        CODE_BLOCK_RE
            .replace_all(&html, |caps: &Captures| {
                let (Some(whole), Some(body)) = (caps.get(0), caps.get(2)) else {
                    return caps[0].to_string();
                };
                let language = caps
                    .get(1)
                    .map(|m| m.as_str())
                    .filter(|lang| !lang.is_empty())
                    .unwrap_or(fallback::DEFAULT_LANGUAGE);

                match catch_unwind(AssertUnwindSafe(|| highlighter.highlight(language, body.as_str()))) {
                    Ok(Ok(highlighted)) => format!(
                        "{}{highlighted}{}",
                        &html[whole.start()..body.start()],
                        &html[body.end()..whole.end()]
                    ),
                    Ok(Err(e)) => {
                        debug!(highlighter = highlighter.name(), language, error = %e, "highlighting skipped");
                        whole.as_str().to_string()
                    }
                    Err(_) => {
                        warn!(highlighter = highlighter.name(), language, "highlighter panicked");
                        whole.as_str().to_string()
                    }
                }
            })
            .into_owned()
    }
}

impl Default for Converter {
    fn default() -> Self {
        Self::pulldown()
    }
}

/// Convert with the default (pulldown-backed) converter.
pub fn convert(markdown: &str) -> String {
    Converter::default().convert(markdown)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
