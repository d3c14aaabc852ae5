//! Content-Type lookup for files served from the output directory.

use std::path::Path;

pub mod types {
    pub const HTML: &str = "text/html; charset=utf-8";
    pub const PLAIN: &str = "text/plain; charset=utf-8";
    pub const OCTET_STREAM: &str = "application/octet-stream";
}

/// Lowercase extension to Content-Type. Anything missing is served as
/// `application/octet-stream`.
const BY_EXTENSION: &[(&str, &str)] = &[
    ("html", types::HTML),
    ("htm", types::HTML),
    ("txt", types::PLAIN),
    ("md", types::PLAIN),
    ("css", "text/css; charset=utf-8"),
    ("js", "text/javascript; charset=utf-8"),
    ("mjs", "text/javascript; charset=utf-8"),
    ("json", "application/json"),
    ("xml", "application/xml"),
    ("rss", "application/rss+xml"),
    ("atom", "application/atom+xml"),
    ("png", "image/png"),
    ("jpg", "image/jpeg"),
    ("jpeg", "image/jpeg"),
    ("gif", "image/gif"),
    ("webp", "image/webp"),
    ("avif", "image/avif"),
    ("svg", "image/svg+xml"),
    ("ico", "image/x-icon"),
    ("woff", "font/woff"),
    ("woff2", "font/woff2"),
    ("pdf", "application/pdf"),
];

pub fn from_path(path: &Path) -> &'static str {
    let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
        return types::OCTET_STREAM;
    };
    BY_EXTENSION
        .iter()
        .find(|(known, _)| known.eq_ignore_ascii_case(ext))
        .map_or(types::OCTET_STREAM, |&(_, mime)| mime)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_path() {
        assert_eq!(from_path(Path::new("post.html")), types::HTML);
        assert_eq!(from_path(Path::new("POST.HTM")), types::HTML);
        assert_eq!(from_path(Path::new("feed.rss")), "application/rss+xml");
        assert_eq!(from_path(Path::new("img/cover.JPG")), "image/jpeg");
        assert_eq!(from_path(Path::new("archive.tar.xz")), types::OCTET_STREAM);
        assert_eq!(from_path(Path::new("CNAME")), types::OCTET_STREAM);
    }
}
