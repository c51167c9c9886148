//! Built-in Markdown-to-HTML converter, used when no conformant renderer
//! is available or it fails.
//!
//! The converter is an ordered list of text-rewriting stages. Each stage
//! sees the output of the previous one. Code fences and inline code are
//! swapped for opaque placeholders as soon as they are recognized, so no
//! later stage can rewrite their contents; the paragraph stage puts them
//! back.

use std::sync::LazyLock;

use mdnotes_shared::escape_html;
use regex::{Captures, Regex};
use tracing::trace;

/// Output for empty or whitespace-only input.
pub(crate) const EMPTY_PLACEHOLDER: &str = "<p>No content</p>";

/// Language tag used when a fence names none.
pub(crate) const DEFAULT_LANGUAGE: &str = "plaintext";

/// Delimiters around a stash index. Private-use code points, stripped from
/// the input up front so they cannot be forged.
const STASH_OPEN: char = '\u{E000}';
const STASH_CLOSE: char = '\u{E001}';

// ---------------------------------------------------------------------------
// Stash
// ---------------------------------------------------------------------------

/// Rendered fragments that later stages must not touch.
#[derive(Debug, Default)]
struct Stash {
    fragments: Vec<String>,
}

impl Stash {
    /// Store a rendered fragment and return its placeholder.
    fn hold(&mut self, html: String) -> String {
        let index = self.fragments.len();
        self.fragments.push(html);
        format!("{STASH_OPEN}{index}{STASH_CLOSE}")
    }

    /// Replace every placeholder with its fragment, including placeholders
    /// nested inside restored fragments.
    ///
    /// A fragment only ever holds placeholders issued before it, so the
    /// nesting depth is bounded by the number of fragments.
    fn restore(&self, text: &str) -> String {
        static PLACEHOLDER_RE: LazyLock<Regex> =
            LazyLock::new(|| Regex::new("\u{E000}(\\d+)\u{E001}").expect("valid regex"));

        let mut result = text.to_string();
        for _ in 0..=self.fragments.len() {
            if !PLACEHOLDER_RE.is_match(&result) {
                break;
            }
            result = PLACEHOLDER_RE
                .replace_all(&result, |caps: &Captures| {
                    caps[1]
                        .parse::<usize>()
                        .ok()
                        .and_then(|i| self.fragments.get(i))
                        .cloned()
                        .unwrap_or_default()
                })
                .into_owned();
        }
        result
    }
}

// ---------------------------------------------------------------------------
// Pipeline
// ---------------------------------------------------------------------------

type Stage = fn(&str, &mut Stash) -> String;

/// The stages, in the order they run.
const PIPELINE: [(&str, Stage); 8] = [
    ("code_fences", extract_code_fences),
    ("inline_code", extract_inline_code),
    ("headings", headings),
    ("emphasis", emphasis),
    ("links", links),
    ("blockquotes", blockquotes),
    ("lists", lists),
    ("paragraphs", paragraphs),
];

/// Convert Markdown to HTML with the built-in stages. Never fails.
pub(crate) fn render(markdown: &str) -> String {
    if markdown.trim().is_empty() {
        return EMPTY_PLACEHOLDER.to_string();
    }

    let mut text = markdown
        .replace("\r\n", "\n")
        .replace([STASH_OPEN, STASH_CLOSE], "");
    let mut stash = Stash::default();

    for (name, stage) in PIPELINE {
        text = stage(&text, &mut stash);
        trace!(stage = name, len = text.len(), "stage applied");
    }

    text
}

// ---------------------------------------------------------------------------
// Stage 1: Code fences
// ---------------------------------------------------------------------------

/// Fence forms, tried in order. Whatever an earlier form extracts is
/// already a placeholder when the next form runs.
static FENCE_RES: LazyLock<[Regex; 4]> = LazyLock::new(|| {
    [
        // ```lang\nbody\n```
        Regex::new(r"(?s)```(\w+)?[ \t]*\n(.*?)\n```").expect("valid regex"),
        // ```lang\nbody```
        Regex::new(r"(?s)```(\w+)?[ \t]*\n(.*?)```").expect("valid regex"),
        // ```lang body``` on one line
        Regex::new(r"```(\w+)?[ \t]+([^`\n]+)```").expect("valid regex"),
        // anything else between two fences
        Regex::new(r"(?s)```()(.*?)```").expect("valid regex"),
    ]
});

/// `` ```lang … ``` `` → `<div class="code-block-wrapper"><pre><code class="language-lang">…</code></pre></div>`
///
/// The body is escaped, leading blank lines and trailing whitespace are
/// dropped. Unterminated fences are left as they are.
fn extract_code_fences(text: &str, stash: &mut Stash) -> String {
    let mut result = text.to_string();

    for re in FENCE_RES.iter() {
        result = re
            .replace_all(&result, |caps: &Captures| {
                let language = caps
                    .get(1)
                    .map(|m| m.as_str().trim())
                    .filter(|lang| !lang.is_empty())
                    .unwrap_or(DEFAULT_LANGUAGE);
                let body = caps[2].trim_start_matches('\n').trim_end();

                stash.hold(code_block(language, body))
            })
            .into_owned();
    }

    result
}

fn code_block(language: &str, body: &str) -> String {
    format!(
        "<div class=\"code-block-wrapper\"><pre><code class=\"language-{language}\">{}</code></pre></div>",
        escape_html(body)
    )
}

// ---------------------------------------------------------------------------
// Stage 2: Inline code
// ---------------------------------------------------------------------------

/// `` `code` `` → `<code class="inline">code</code>` (escaped).
fn extract_inline_code(text: &str, stash: &mut Stash) -> String {
    static INLINE_RE: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"`([^`]+)`").expect("valid regex"));

    INLINE_RE
        .replace_all(text, |caps: &Captures| {
            stash.hold(format!(
                "<code class=\"inline\">{}</code>",
                escape_html(&caps[1])
            ))
        })
        .into_owned()
}

// ---------------------------------------------------------------------------
// Stage 3: Headings
// ---------------------------------------------------------------------------

/// `# h` / `## h` / `### h` at line start → `<h1>`…`<h3>`.
///
/// Four or more `#` never match and stay literal text.
fn headings(text: &str, _stash: &mut Stash) -> String {
    static HEADING_RE: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"(?m)^(#{1,3}) (.*)$").expect("valid regex"));

    HEADING_RE
        .replace_all(text, |caps: &Captures| {
            let level = caps[1].len();
            format!("<h{level}>{}</h{level}>", &caps[2])
        })
        .into_owned()
}

// ---------------------------------------------------------------------------
// Stage 4: Emphasis
// ---------------------------------------------------------------------------

/// `**x**` → `<strong>x</strong>`, then `*x*` → `<em>x</em>`.
fn emphasis(text: &str, _stash: &mut Stash) -> String {
    static STRONG_RE: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"\*\*(.*?)\*\*").expect("valid regex"));
    static EM_RE: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"\*(.*?)\*").expect("valid regex"));

    let strong = STRONG_RE.replace_all(text, "<strong>$1</strong>");
    EM_RE.replace_all(&strong, "<em>$1</em>").into_owned()
}

// ---------------------------------------------------------------------------
// Stage 5: Links
// ---------------------------------------------------------------------------

/// `[label](target)` → anchor opening in a new browsing context.
fn links(text: &str, _stash: &mut Stash) -> String {
    static LINK_RE: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"\[([^\]]+)\]\(([^)]+)\)").expect("valid regex"));

    LINK_RE
        .replace_all(text, |caps: &Captures| {
            format!(
                "<a href=\"{}\" target=\"_blank\" rel=\"noopener noreferrer\">{}</a>",
                escape_html(&caps[2]),
                &caps[1]
            )
        })
        .into_owned()
}

// ---------------------------------------------------------------------------
// Stage 6: Blockquotes
// ---------------------------------------------------------------------------

/// Each `> ` line becomes its own `<blockquote>`.
fn blockquotes(text: &str, _stash: &mut Stash) -> String {
    static QUOTE_RE: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"(?m)^> (.*)$").expect("valid regex"));

    QUOTE_RE
        .replace_all(text, "<blockquote>$1</blockquote>")
        .into_owned()
}

// ---------------------------------------------------------------------------
// Stage 7: Lists
// ---------------------------------------------------------------------------

/// `- item` → `<ul>` items, `1. item` → `<ol>` items; adjacent lists of the
/// same kind are merged.
fn lists(text: &str, _stash: &mut Stash) -> String {
    static UL_ITEM_RE: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"(?m)^- (.+)$").expect("valid regex"));
    static UL_JOIN_RE: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"</ul>\s*<ul>").expect("valid regex"));
    static OL_ITEM_RE: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"(?m)^\d+\. (.+)$").expect("valid regex"));
    static OL_JOIN_RE: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"</ol>\s*<ol>").expect("valid regex"));

    let result = UL_ITEM_RE.replace_all(text, "<ul><li>$1</li></ul>");
    let result = UL_JOIN_RE.replace_all(&result, "");
    let result = OL_ITEM_RE.replace_all(&result, "<ol><li>$1</li></ol>");
    OL_JOIN_RE.replace_all(&result, "").into_owned()
}

// ---------------------------------------------------------------------------
// Stage 8: Paragraphs
// ---------------------------------------------------------------------------

/// Split on blank lines. Blocks that already read as an element pass
/// through; everything else becomes `<p>` with `<br>` for single newlines.
/// Stashed fragments are restored here.
fn paragraphs(text: &str, stash: &mut Stash) -> String {
    static BLANK_LINE_RE: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"\n\s*\n").expect("valid regex"));

    BLANK_LINE_RE
        .split(text)
        .map(str::trim)
        .filter(|block| !block.is_empty())
        .map(|block| {
            let restored = stash.restore(block);
            if is_element(&restored) {
                restored
            } else {
                stash.restore(&format!("<p>{}</p>", block.replace('\n', "<br>")))
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Starts with a tag and either ends with one or contains a closing tag.
fn is_element(block: &str) -> bool {
    block.starts_with('<') && (block.ends_with('>') || block.contains("</"))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
