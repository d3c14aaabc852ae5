//! Markdown to HTML via pulldown-cmark.

use std::panic::{self, AssertUnwindSafe};

use pulldown_cmark::{Options, Parser, html};

use super::Convert;

/// Markdown converter. Never fails: a panic inside the parser becomes an
/// error fragment in the page.
#[derive(Debug, Clone)]
pub struct Markdown {
    options: Options,
}

impl Markdown {
    /// Tables, footnotes, strikethrough, task lists and `{#id}` heading
    /// attributes on top of CommonMark.
    pub fn new() -> Self {
        let options = Options::ENABLE_TABLES
            | Options::ENABLE_FOOTNOTES
            | Options::ENABLE_STRIKETHROUGH
            | Options::ENABLE_TASKLISTS
            | Options::ENABLE_HEADING_ATTRIBUTES;
        Self { options }
    }

    fn to_html(&self, markdown: &str) -> String {
        let parser = Parser::new_ext(markdown, self.options);
        let mut out = String::with_capacity(markdown.len() * 3 / 2);
        html::push_html(&mut out, parser);
        out
    }
}

impl Default for Markdown {
    fn default() -> Self {
        Self::new()
    }
}

impl Convert for Markdown {
    fn convert(&self, markdown: &str) -> String {
        match panic::catch_unwind(AssertUnwindSafe(|| self.to_html(markdown))) {
            Ok(html) => html,
            Err(payload) => {
                let reason = payload
                    .downcast_ref::<&str>()
                    .map(|s| (*s).to_string())
                    .or_else(|| payload.downcast_ref::<String>().cloned())
                    .unwrap_or_else(|| "unknown error".to_string());
                error_fragment(&reason)
            }
        }
    }
}

fn error_fragment(reason: &str) -> String {
    let escaped = reason
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;");
    format!("<pre class=\"render-error\">markdown conversion failed: {escaped}</pre>\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn convert(md: &str) -> String {
        Markdown::default().convert(md)
    }

    #[test]
    fn test_heading() {
        assert_eq!(convert("# Hi"), "<h1>Hi</h1>\n");
    }

    #[test]
    fn test_paragraph_and_emphasis() {
        assert_eq!(convert("Hello *world*"), "<p>Hello <em>world</em></p>\n");
    }

    #[test]
    fn test_extensions_enabled() {
        let html = convert("| a | b |\n|---|---|\n| 1 | 2 |\n\n~~gone~~\n\n- [x] done");
        assert!(html.contains("<table>"));
        assert!(html.contains("<del>gone</del>"));
        assert!(html.contains("checkbox"));
    }

    #[test]
    fn test_heading_attributes() {
        assert!(convert("# Title {#custom}").contains("id=\"custom\""));
    }

    #[test]
    fn test_error_fragment_escapes() {
        let html = error_fragment("<bad>");
        assert!(html.starts_with("<pre class=\"render-error\">"));
        assert!(html.contains("&lt;bad&gt;"));
    }
}
