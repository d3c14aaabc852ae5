//! Incremental site build.
//!
//! ```text
//! scan ──► changed files ──► read ─► front matter ─► convert ─► render
//!   │                                                              │
//!   └─ prune stale pages            cache.update ◄── write ◄── inject
//! ```

mod error;
mod gate;
mod process;
mod report;
pub mod scan;


use std::fs;

pub use error::BuildError;
pub use gate::BuildGate;
pub use process::Orchestrator;
pub use report::BuildReport;

use crate::config::SiteConfig;
use crate::embed::serve::livereload_snippet;
use crate::freshness::BuildCache;
use crate::render::{Markdown, TemplateStore};
use crate::debug;

/// Per-run switches. Only the first build of a `serve` session honors them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BuildOptions {
    /// Forget every fingerprint before scanning.
    pub force: bool,
    /// Delete the output directory first. Implies `force`.
    pub clean: bool,
}

impl BuildOptions {
    pub fn from_config(config: &SiteConfig) -> Self {
        Self {
            force: config.build.force,
            clean: config.build.clean,
        }
    }
}

/// Build the site with the markdown converter and the configured templates.
pub fn build_site(
    config: &SiteConfig,
    cache: &BuildCache,
    options: BuildOptions,
) -> Result<BuildReport, BuildError> {
    let output = &config.build.output;
    if options.clean && output.exists() {
        debug!("build"; "removing {}", output.display());
        fs::remove_dir_all(output).map_err(|source| BuildError::Write {
            path: output.clone(),
            source,
        })?;
    }
    if options.force || options.clean {
        cache.clear();
    }

    let templates = TemplateStore::load(&config.build.templates)?;
    let markdown = Markdown::new();
    let snippet = config.build.livereload.then(livereload_snippet);

    Orchestrator::new(&config.build, cache, &markdown, &templates)
        .with_snippet(snippet)
        .run()
}

/// Open the project's cache file and load it.
pub fn open_cache(config: &SiteConfig) -> BuildCache {
    let cache = BuildCache::new(
        config.get_root(),
        config.cache_path(),
        config.build.fingerprint,
    );
    cache.load();
    cache
}

/// Persist the cache, mapping I/O failures to [`BuildError::Cache`].
pub fn save_cache(cache: &BuildCache) -> Result<(), BuildError> {
    cache.save().map_err(|source| BuildError::Cache {
        path: cache.file().to_path_buf(),
        source,
    })
}
