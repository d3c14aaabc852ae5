//! Site configuration management for `quire.toml`.
//!
//! # Module Structure
//!
//! ```text
//! config/
//! ├── section/       # [build] and [serve]
//! ├── types/         # ConfigError, diagnostics, field paths
//! ├── util.rs        # config file lookup
//! └── mod.rs         # SiteConfig (this file)
//! ```
//!
//! The config file is optional. Without one, defaults apply and the
//! current directory is the project root.

pub mod section;
pub mod types;
mod util;

use util::find_config_file;

pub use section::{BuildSectionConfig, ServeConfig};
pub use types::{ConfigDiagnostics, ConfigError, FieldPath};

use crate::{
    cli::{BuildArgs, Cli, Commands},
    log,
    utils::path::normalize_path,
};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

/// Side-car cache file, relative to the project root.
pub const CACHE_FILE: &str = ".quire/cache.json";

/// Everything `quire.toml` controls, with CLI flags already applied.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SiteConfig {
    /// Where the config file is, or would be.
    #[serde(skip)]
    pub config_path: PathBuf,

    /// Directory holding the config file. All relative paths start here.
    #[serde(skip)]
    pub root: PathBuf,

    #[serde(default)]
    pub build: BuildSectionConfig,

    #[serde(default)]
    pub serve: ServeConfig,
}

impl SiteConfig {
    /// Find `quire.toml` at or above the working directory, read it, apply
    /// the command line, and validate the result.
    pub fn load(cli: &Cli) -> Result<Self> {
        let cwd = std::env::current_dir().context("cannot determine working directory")?;

        let mut config = match find_config_file(&cli.config) {
            Some(path) => {
                let mut config = Self::read(&path)?;
                config.config_path = path;
                config
            }
            None => {
                crate::debug!("config"; "no {} found, using defaults", cli.config.display());
                Self {
                    config_path: cwd.join(&cli.config),
                    ..Self::default()
                }
            }
        };

        let root = match config.config_path.parent() {
            Some(dir) => dir.to_path_buf(),
            None => cwd,
        };
        config.apply_cli(cli);
        config.normalize_paths(&root);
        config.validate()?;

        Ok(config)
    }

    /// Parse one config file. Unknown keys are reported, not rejected.
    fn read(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let (config, unknown) = Self::parse_with_ignored(&text)?;
        if !unknown.is_empty() {
            let name = path.file_name().unwrap_or(path.as_os_str()).to_string_lossy();
            log!("warning"; "{name}: unknown keys ignored: {}", unknown.join(", "));
        }
        Ok(config)
    }

    /// Deserialize `text`, returning the dotted paths of keys nothing used.
    fn parse_with_ignored(text: &str) -> Result<(Self, Vec<String>), ConfigError> {
        let mut unknown = Vec::new();
        let deserializer = toml::Deserializer::new(text);
        let config = serde_ignored::deserialize(deserializer, |key: serde_ignored::Path| {
            unknown.push(key.to_string());
        })?;
        Ok((config, unknown))
    }

    /// Command-line flags win over the file.
    fn apply_cli(&mut self, cli: &Cli) {
        override_with(&mut self.build.content, cli.content.as_ref());
        override_with(&mut self.build.output, cli.output.as_ref());

        let build_args = match &cli.command {
            Commands::Build { build_args } => build_args,
            Commands::Serve {
                build_args,
                interface,
                port,
                watch,
                poll,
            } => {
                override_with(&mut self.serve.interface, interface.as_ref());
                override_with(&mut self.serve.port, port.as_ref());
                override_with(&mut self.serve.watch, watch.as_ref());
                self.serve.poll |= *poll;
                build_args
            }
        };
        self.apply_build_args(build_args);
    }

    fn apply_build_args(&mut self, args: &BuildArgs) {
        crate::logger::set_verbose(args.verbose);
        self.build.force = args.force;
        self.build.clean = args.clean;
    }

    /// Make every configured directory absolute under `root`.
    pub fn normalize_paths(&mut self, root: &Path) {
        let root = normalize_path(root);
        let under_root = |p: &Path| normalize_path(&root.join(p));

        self.config_path = normalize_path(&self.config_path);
        self.build.content = under_root(&self.build.content);
        self.build.output = under_root(&self.build.output);
        self.build.templates = under_root(&self.build.templates);
        self.root = root;
    }

    /// Check every section, reporting all problems in one error.
    pub fn validate(&self) -> Result<()> {
        let mut diag = ConfigDiagnostics::new();
        self.build.validate(&mut diag);
        diag.into_result()?;
        Ok(())
    }

    pub fn get_root(&self) -> &Path {
        &self.root
    }

    pub fn cache_path(&self) -> PathBuf {
        self.root.join(CACHE_FILE)
    }

    /// `path` without the root prefix, for log lines. Paths outside the
    /// root come back unchanged.
    pub fn root_relative(&self, path: impl AsRef<Path>) -> PathBuf {
        let path = path.as_ref();
        path.strip_prefix(&self.root).unwrap_or(path).to_path_buf()
    }
}

fn override_with<T: Clone>(value: &mut T, flag: Option<&T>) {
    if let Some(flag) = flag {
        *value = flag.clone();
    }
}

// ============================================================================
// Test Helpers (available to all modules via `use crate::config::test_*`)
// ============================================================================

/// Parse config, panicking on unknown fields (to catch typos in tests).
#[cfg(test)]
pub fn test_parse_config(content: &str) -> SiteConfig {
    let (parsed, ignored) = SiteConfig::parse_with_ignored(content).unwrap();
    assert!(
        ignored.is_empty(),
        "test config has unknown fields: {:?}",
        ignored
    );
    parsed
}

/// Config rooted at `root` with default layout, paths resolved.
#[cfg(test)]
pub fn test_site_config(root: &Path) -> SiteConfig {
    let mut config = SiteConfig::default();
    config.config_path = root.join("quire.toml");
    config.normalize_paths(root);
    config
}

// ============================================================================
// tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_toml_is_parse_error() {
        let result = SiteConfig::parse_with_ignored("[build\ncontent = \"posts\"");
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_unknown_fields_detected() {
        let content = "[build]\ncontent = \"posts\"\n[unknown_section]\nfield = \"value\"";
        let (config, ignored) = SiteConfig::parse_with_ignored(content).unwrap();

        assert_eq!(config.build.content, PathBuf::from("posts"));
        assert!(ignored.iter().any(|f| f.contains("unknown_section")));
    }

    #[test]
    fn test_normalize_paths_resolves_against_root() {
        let dir = tempfile::TempDir::new().unwrap();
        let config = test_site_config(dir.path());
        let root = normalize_path(dir.path());

        assert_eq!(config.get_root(), root);
        assert_eq!(config.build.content, root.join("content"));
        assert_eq!(config.build.output, root.join("public"));
        assert_eq!(config.cache_path(), root.join(".quire/cache.json"));
    }

    #[test]
    fn test_root_relative() {
        let mut config = SiteConfig::default();
        config.root = PathBuf::from("/site");
        assert_eq!(
            config.root_relative("/site/content/a.md"),
            PathBuf::from("content/a.md")
        );
        assert_eq!(config.root_relative("/elsewhere/b.md"), PathBuf::from("/elsewhere/b.md"));
    }
}
