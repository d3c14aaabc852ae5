//! `quire build`: one incremental pass, then persist the cache.

use crate::{
    build::{self, BuildError, BuildOptions, BuildReport},
    config::SiteConfig,
    log,
};

/// Run one build and save the cache.
///
/// Per-file failures do not stop the other files, but turn the command's
/// result into [`BuildError::Incomplete`] once the cache is saved.
pub fn run_build(config: &SiteConfig) -> Result<BuildReport, BuildError> {
    let cache = build::open_cache(config);
    let report = build::build_site(config, &cache, BuildOptions::from_config(config))?;

    log!("build"; "{}", report.summary());

    build::save_cache(&cache)?;

    if report.is_success() {
        Ok(report)
    } else {
        Err(BuildError::Incomplete {
            failed: report.failed.len(),
            changed: report.changed,
        })
    }
}
