//! Conformant rendering via `pulldown-cmark`.

use mdnotes_shared::Result;
use pulldown_cmark::{Event, Options, Parser, html};

use crate::{ExternalRenderer, RenderOptions};

/// CommonMark renderer with the GitHub-flavored extensions.
#[derive(Debug, Clone, Copy, Default)]
pub struct PulldownRenderer;

impl PulldownRenderer {
    fn parser_options(opts: &RenderOptions) -> Options {
        let mut options = Options::empty();
        if opts.extended_syntax {
            options.insert(Options::ENABLE_TABLES);
            options.insert(Options::ENABLE_STRIKETHROUGH);
            options.insert(Options::ENABLE_TASKLISTS);
            options.insert(Options::ENABLE_FOOTNOTES);
        }
        options
    }
}

impl ExternalRenderer for PulldownRenderer {
    fn name(&self) -> &str {
        "pulldown-cmark"
    }

    fn render(&self, markdown: &str, opts: &RenderOptions) -> Result<String> {
        let line_breaks = opts.line_breaks;
        let events = Parser::new_ext(markdown, Self::parser_options(opts)).map(|event| match event {
            Event::SoftBreak if line_breaks => Event::HardBreak,
            other => other,
        });

        let mut out = String::with_capacity(markdown.len() * 3 / 2);
        html::push_html(&mut out, events);
        Ok(out)
    }
}
