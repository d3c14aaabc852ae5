//! Live reload bootstrap injection.

/// Insert `snippet` before the last `</body>` (any case), or append it when
/// the page has no closing body tag.
pub fn inject_livereload(html: &str, snippet: &str) -> String {
    const PATTERN: &[u8] = b"</body>";

    let bytes = html.as_bytes();
    let mut result = String::with_capacity(html.len() + snippet.len());

    // ASCII pattern, so a match always starts on a char boundary
    match bytes
        .windows(PATTERN.len())
        .rposition(|w| w.eq_ignore_ascii_case(PATTERN))
    {
        Some(pos) => {
            result.push_str(&html[..pos]);
            result.push_str(snippet);
            result.push_str(&html[pos..]);
        }
        None => {
            result.push_str(html);
            result.push_str(snippet);
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    const SNIPPET: &str = "<script>reload()</script>";

    #[test]
    fn test_inject_before_body_close() {
        let html = "<html><body><p>hi</p></body></html>";
        assert_eq!(
            inject_livereload(html, SNIPPET),
            "<html><body><p>hi</p><script>reload()</script></body></html>"
        );
    }

    #[test]
    fn test_inject_case_insensitive() {
        let out = inject_livereload("<BODY>x</BODY>", SNIPPET);
        assert_eq!(out, "<BODY>x<script>reload()</script></BODY>");
    }

    #[test]
    fn test_inject_uses_last_body_close() {
        let html = "<body><pre>&lt;/body&gt; </body></pre></body>";
        let out = inject_livereload(html, SNIPPET);
        assert!(out.ends_with("<script>reload()</script></body>"));
    }

    #[test]
    fn test_append_without_body() {
        assert_eq!(inject_livereload("<p>frag</p>", SNIPPET), "<p>frag</p><script>reload()</script>");
    }

    #[test]
    fn test_multibyte_content() {
        let out = inject_livereload("<body>日本語</body>", SNIPPET);
        assert_eq!(out, "<body>日本語<script>reload()</script></body>");
    }
}
