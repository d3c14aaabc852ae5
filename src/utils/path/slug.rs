//! Slugs and display titles derived from file names.

use std::path::Path;

/// Unicode → ASCII, lowercase, every run of non-alphanumerics becomes one `-`.
///
/// Falls back to `"index"` when nothing survives.
pub fn slugify(text: &str) -> String {
    let ascii = deunicode::deunicode(text);
    let mut slug = String::with_capacity(ascii.len());
    let mut pending_dash = false;

    for c in ascii.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(c.to_ascii_lowercase());
        } else {
            pending_dash = true;
        }
    }

    if slug.is_empty() {
        "index".to_string()
    } else {
        slug
    }
}

/// `first-post_draft` → `First Post Draft`
pub fn title_from_stem(stem: &str) -> String {
    stem.split(['-', '_', ' '])
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

/// File stem as UTF-8, lossy.
pub fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("first-post"), "first-post");
        assert_eq!(slugify("Hello, World!"), "hello-world");
        assert_eq!(slugify("  spaces  and__underscores "), "spaces-and-underscores");
        assert_eq!(slugify("Café Crème"), "cafe-creme");
        assert_eq!(slugify("---"), "index");
    }

    #[test]
    fn test_title_from_stem() {
        assert_eq!(title_from_stem("first-post"), "First Post");
        assert_eq!(title_from_stem("my_second__post"), "My Second Post");
        assert_eq!(title_from_stem("already Titled"), "Already Titled");
        assert_eq!(title_from_stem(""), "");
    }

    #[test]
    fn test_file_stem() {
        assert_eq!(file_stem(Path::new("content/first-post.md")), "first-post");
        assert_eq!(file_stem(Path::new("")), "");
    }
}
