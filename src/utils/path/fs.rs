//! Path helpers shared by config loading and the build.

use std::path::{Path, PathBuf};

/// Absolute form of `path`, resolved through symlinks when it exists.
///
/// Paths that do not exist yet (an output directory before the first build)
/// are made absolute against the working directory instead.
pub fn normalize_path(path: &Path) -> PathBuf {
    if let Ok(real) = path.canonicalize() {
        return real;
    }
    if path.is_absolute() {
        return path.to_path_buf();
    }
    match std::env::current_dir() {
        Ok(cwd) => cwd.join(path),
        Err(_) => path.to_path_buf(),
    }
}

/// Render a path with `/` separators regardless of platform.
pub fn to_slash(path: &Path) -> String {
    path.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_missing_path_is_absolute() {
        assert_eq!(
            normalize_path(Path::new("/no/such/quire/dir")),
            PathBuf::from("/no/such/quire/dir")
        );
        assert!(normalize_path(Path::new("not-built-yet/public")).is_absolute());
    }

    #[test]
    fn test_normalize_existing_path_resolves_dots() {
        let dir = tempfile::TempDir::new().unwrap();
        std::fs::create_dir(dir.path().join("content")).unwrap();
        let dotted = dir.path().join("content").join("..").join("content");
        assert_eq!(
            normalize_path(&dotted),
            dir.path().canonicalize().unwrap().join("content")
        );
    }

    #[test]
    fn test_to_slash() {
        assert_eq!(to_slash(Path::new("content/post.md")), "content/post.md");
        assert_eq!(to_slash(Path::new("post.md")), "post.md");
    }
}
