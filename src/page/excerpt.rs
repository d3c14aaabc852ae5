//! Plain-text excerpt from the first paragraph of a markdown body.

use pulldown_cmark::{Event, Parser, Tag, TagEnd};

/// Maximum excerpt length in characters, before the ellipsis.
pub const MAX_EXCERPT_CHARS: usize = 160;

/// First paragraph as plain text, truncated on a word boundary.
pub fn derive(body: &str) -> String {
    let mut text = String::new();
    let mut in_paragraph = false;

    for event in Parser::new(body) {
        match event {
            Event::Start(Tag::Paragraph) => in_paragraph = true,
            Event::End(TagEnd::Paragraph) if in_paragraph => {
                if !text.trim().is_empty() {
                    break;
                }
                in_paragraph = false;
            }
            Event::Text(t) | Event::Code(t) if in_paragraph => text.push_str(&t),
            Event::SoftBreak | Event::HardBreak if in_paragraph => text.push(' '),
            _ => {}
        }
    }

    truncate(text.trim(), MAX_EXCERPT_CHARS)
}

fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }

    let cut: String = text.chars().take(max).collect();
    let head = match cut.rfind(char::is_whitespace) {
        Some(idx) if idx > 0 => &cut[..idx],
        _ => cut.as_str(),
    };
    format!("{}…", head.trim_end())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_paragraph() {
        let body = "# Title\n\nFirst *para* with `code`.\nSecond line.\n\nSecond para.";
        assert_eq!(derive(body), "First para with code. Second line.");
    }

    #[test]
    fn test_no_paragraph() {
        assert_eq!(derive("# Only a heading\n"), "");
        assert_eq!(derive(""), "");
    }

    #[test]
    fn test_truncates_on_word_boundary() {
        let body = "word ".repeat(60);
        let excerpt = derive(&body);
        assert!(excerpt.ends_with('…'));
        assert!(excerpt.chars().count() <= MAX_EXCERPT_CHARS + 1);
        assert!(excerpt.trim_end_matches('…').ends_with("word"));
    }

    #[test]
    fn test_truncate_without_spaces() {
        let long = "x".repeat(200);
        let excerpt = truncate(&long, 10);
        assert_eq!(excerpt, format!("{}…", "x".repeat(10)));
    }
}
