//! HTML escaping for user-sourced text.

/// Escape `&`, `<`, `>`, `"` and `'` for safe insertion into HTML.
///
/// Accepts either a `&str` or an `Option<&str>`; `None` yields an empty
/// string. Applying it twice double-escapes.
pub fn escape_html<'a>(input: impl Into<Option<&'a str>>) -> String {
    let Some(text) = input.into() else {
        return String::new();
    };

    let mut out = String::with_capacity(text.len() + text.len() / 8);
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#039;"),
            _ => out.push(ch),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_all_special_characters() {
        assert_eq!(
            escape_html(r#"<a href="x">Tom & 'Jerry'</a>"#),
            "&lt;a href=&quot;x&quot;&gt;Tom &amp; &#039;Jerry&#039;&lt;/a&gt;"
        );
    }

    #[test]
    fn output_has_no_raw_specials() {
        let out = escape_html("<<>>&&\"\"''");
        // Only the '&' that starts each entity may remain.
        let stripped = out
            .replace("&amp;", "")
            .replace("&lt;", "")
            .replace("&gt;", "")
            .replace("&quot;", "")
            .replace("&#039;", "");
        assert!(!stripped.contains(['&', '<', '>', '"', '\'']));
    }

    #[test]
    fn missing_input_is_empty() {
        assert_eq!(escape_html(None), "");
    }

    #[test]
    fn not_idempotent() {
        assert_eq!(escape_html(escape_html("&").as_str()), "&amp;amp;");
    }

    #[test]
    fn plain_text_unchanged() {
        assert_eq!(escape_html("print(1)"), "print(1)");
    }
}
