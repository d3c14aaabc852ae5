//! `[build]` section configuration.
//!
//! # Example
//!
//! ```toml
//! [build]
//! content = "content"         # Source directory for .md files (relative to site root)
//! output = "public"           # Output directory for generated HTML (relative to site root)
//! templates = "templates"     # Directory of *.html page templates
//! template = "page"           # Template used for every document
//! extension = "md"            # Recognized content extension
//! fingerprint = "content"     # content (blake3 digest) | stat (size + mtime)
//! livereload = true           # Inject the live-reload bootstrap into pages
//! ```
//!
//! `fingerprint = "stat"` is cheaper but misses an edit that keeps the byte
//! length and lands within the same second as the previous build.

use crate::config::{ConfigDiagnostics, FieldPath};
use crate::freshness::Strategy;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildSectionConfig {
    /// Content source directory (markdown files, non-recursive).
    pub content: PathBuf,

    /// Build output directory.
    pub output: PathBuf,

    /// Directory holding user page templates.
    pub templates: PathBuf,

    /// Named template rendered for every document.
    pub template: String,

    /// Recognized content extension, without the dot.
    pub extension: String,

    /// Change-detection strategy.
    pub fingerprint: Strategy,

    /// Inject the live-reload bootstrap fragment into generated pages.
    pub livereload: bool,

    /// Rebuild everything, ignoring the cache (CLI only).
    #[serde(skip)]
    pub force: bool,

    /// Remove the output directory before building (CLI only).
    #[serde(skip)]
    pub clean: bool,
}

impl Default for BuildSectionConfig {
    fn default() -> Self {
        Self {
            content: "content".into(),
            output: "public".into(),
            templates: "templates".into(),
            template: "page".into(),
            extension: "md".into(),
            fingerprint: Strategy::default(),
            livereload: true,
            force: false,
            clean: false,
        }
    }
}

impl BuildSectionConfig {
    /// Template file name, with `.html` appended when no extension is given.
    pub fn template_name(&self) -> String {
        if std::path::Path::new(&self.template).extension().is_some() {
            self.template.clone()
        } else {
            format!("{}.html", self.template)
        }
    }

    /// Validate build settings.
    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        let ext = self.extension.trim();
        if ext.is_empty() {
            diag.error(FieldPath::new("build.extension"), "must not be empty");
        } else if ext.contains(['.', '/', '\\']) {
            diag.error_with_hint(
                FieldPath::new("build.extension"),
                format!("invalid extension `{ext}`"),
                "write the extension without a dot, e.g. `md`",
            );
        }

        if self.template.trim().is_empty() {
            diag.error(FieldPath::new("build.template"), "must not be empty");
        }

        if self.content == self.output {
            diag.error_with_hint(
                FieldPath::new("build.output"),
                "output directory must differ from the content directory",
                "use `public`",
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::config::test_parse_config;
    use crate::freshness::Strategy;

    #[test]
    fn test_build_config_defaults() {
        let config = test_parse_config("");

        assert_eq!(config.build.content, std::path::PathBuf::from("content"));
        assert_eq!(config.build.output, std::path::PathBuf::from("public"));
        assert_eq!(config.build.extension, "md");
        assert_eq!(config.build.fingerprint, Strategy::Content);
        assert!(config.build.livereload);
    }

    #[test]
    fn test_build_config_stat_fingerprint() {
        let config = test_parse_config("[build]\nfingerprint = \"stat\"");
        assert_eq!(config.build.fingerprint, Strategy::Stat);
    }

    #[test]
    fn test_template_name() {
        let mut config = test_parse_config("[build]\ntemplate = \"post\"");
        assert_eq!(config.build.template_name(), "post.html");

        config.build.template = "post.jinja".into();
        assert_eq!(config.build.template_name(), "post.jinja");
    }

    #[test]
    fn test_validate_rejects_dotted_extension() {
        let config = test_parse_config("[build]\nextension = \".md\"");
        let mut diag = crate::config::ConfigDiagnostics::new();
        config.build.validate(&mut diag);
        assert_eq!(diag.problems().len(), 1);
    }

    #[test]
    fn test_validate_rejects_same_dirs() {
        let config = test_parse_config("[build]\ncontent = \"site\"\noutput = \"site\"");
        let mut diag = crate::config::ConfigDiagnostics::new();
        config.build.validate(&mut diag);
        assert!(!diag.is_empty());
    }
}
