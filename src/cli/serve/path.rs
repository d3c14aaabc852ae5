//! URL to filesystem path resolution.

use std::path::{Path, PathBuf};

use percent_encoding::percent_decode_str;

/// Resolve a request URL to a file under `serve_root`.
///
/// Tries the path itself, `<dir>/index.html` for directories, then
/// `<path>.html` so `/hello` finds `hello.html`. Anything that resolves
/// outside `serve_root` (through `..` or symlinks) is rejected.
pub fn resolve_path(url: &str, serve_root: &Path) -> Option<PathBuf> {
    let clean = request_path(url);
    let relative = clean.trim_matches('/');
    if relative.split('/').any(|segment| segment == "..") {
        return None;
    }

    let root = serve_root.canonicalize().ok()?;
    let local = root.join(relative);

    let candidates = [
        Some(local.clone()),
        Some(local.join("index.html")),
        (!relative.is_empty() && local.extension().is_none()).then(|| local.with_extension("html")),
    ];

    candidates
        .into_iter()
        .flatten()
        .filter_map(|candidate| candidate.canonicalize().ok())
        .find(|candidate| candidate.starts_with(&root) && candidate.is_file())
}

/// Percent-decoded path of a request URL, without query or fragment.
pub fn request_path(url: &str) -> String {
    let end = url.find(['?', '#']).unwrap_or(url.len());
    percent_decode_str(&url[..end])
        .decode_utf8()
        .map(std::borrow::Cow::into_owned)
        .unwrap_or_default()
}
