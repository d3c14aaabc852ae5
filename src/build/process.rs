//! Process phase: turn changed files into pages.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Instant;

use rayon::prelude::*;

use super::scan::{self, remove_if_exists};
use super::{BuildError, BuildReport};
use crate::config::BuildSectionConfig;
use crate::freshness::{BuildCache, Fingerprint, Strategy};
use crate::page::Document;
use crate::render::{Convert, PageData, Render, inject_livereload};
use crate::{debug, log};

/// What happened to one changed file.
#[derive(Debug)]
enum Outcome {
    Written(PathBuf),
    Draft { removed: bool },
    Failed(PathBuf, String),
}

/// Two-phase incremental build over one content directory.
pub struct Orchestrator<'a, C, R> {
    build: &'a BuildSectionConfig,
    cache: &'a BuildCache,
    converter: &'a C,
    renderer: &'a R,
    /// Live reload fragment injected into every page.
    snippet: Option<String>,
}

impl<'a, C: Convert, R: Render> Orchestrator<'a, C, R> {
    pub fn new(
        build: &'a BuildSectionConfig,
        cache: &'a BuildCache,
        converter: &'a C,
        renderer: &'a R,
    ) -> Self {
        Self {
            build,
            cache,
            converter,
            renderer,
            snippet: None,
        }
    }

    pub fn with_snippet(mut self, snippet: Option<String>) -> Self {
        self.snippet = snippet;
        self
    }

    /// Scan, then process every changed file in parallel.
    ///
    /// Listing failures and template errors abort the run. Per-file read and
    /// write failures are logged, reported, and leave the cache entry alone.
    pub fn run(&self) -> Result<BuildReport, BuildError> {
        let start = Instant::now();

        let scanned = scan::scan(&self.build.content, &self.build.extension, self.cache)?;
        let mut report = BuildReport {
            total: scanned.total,
            changed: scanned.changed.len() + scanned.collisions.len(),
            removed: scan::prune_stale(self.cache, &self.build.output, &scanned.claimed),
            ..Default::default()
        };
        for (path, reason) in scanned.collisions {
            log!("error"; "{}", reason);
            report.failed.push((path, reason));
        }

        if scanned.changed.is_empty() {
            report.elapsed = start.elapsed();
            return Ok(report);
        }

        fs::create_dir_all(&self.build.output).map_err(|source| BuildError::Write {
            path: self.build.output.clone(),
            source,
        })?;

        let template = self.build.template_name();
        let outcomes = scanned
            .changed
            .par_iter()
            .map(|path| self.process(path, &template))
            .collect::<Result<Vec<_>, BuildError>>()?;

        for outcome in outcomes {
            match outcome {
                Outcome::Written(_) => report.written += 1,
                Outcome::Draft { removed } => {
                    report.skipped_drafts += 1;
                    report.removed += usize::from(removed);
                }
                Outcome::Failed(path, reason) => report.failed.push((path, reason)),
            }
        }

        report.elapsed = start.elapsed();
        Ok(report)
    }

    fn process(&self, path: &Path, template: &str) -> Result<Outcome, BuildError> {
        match self.process_file(path, template) {
            Ok(outcome) => Ok(outcome),
            Err(e) if e.is_fatal() => Err(e),
            Err(e) => {
                let reason = e.describe();
                log!("error"; "{}", reason);
                Ok(Outcome::Failed(path.to_path_buf(), reason))
            }
        }
    }

    fn process_file(&self, path: &Path, template: &str) -> Result<Outcome, BuildError> {
        let (content, fingerprint) = self.read_source(path).map_err(|source| BuildError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let doc = Document::from_source(path, &content);
        let output = self.build.output.join(doc.output_name());

        if doc.draft {
            let removed = remove_if_exists(&output).map_err(|source| BuildError::Write {
                path: output.clone(),
                source,
            })?;
            self.cache.record(path, fingerprint);
            debug!("draft"; "{}", path.display());
            return Ok(Outcome::Draft { removed });
        }

        let fragment = self.converter.convert(&doc.body);
        let html = self.renderer.render(template, &PageData::new(&doc, &fragment))?;
        let html = match &self.snippet {
            Some(snippet) => inject_livereload(&html, snippet),
            None => html,
        };

        fs::write(&output, html).map_err(|source| BuildError::Write {
            path: output.clone(),
            source,
        })?;
        self.cache.record(path, fingerprint);

        debug!("build"; "{} -> {}", path.display(), output.display());
        Ok(Outcome::Written(output))
    }

    /// Source text plus the fingerprint of exactly those bytes.
    ///
    /// The stat fingerprint is taken before reading, so an edit racing the
    /// read leaves the entry older than the file and the next scan sees it.
    fn read_source(&self, path: &Path) -> io::Result<(String, Fingerprint)> {
        let stat = match self.cache.strategy() {
            Strategy::Stat => Some(Fingerprint::stat(path)?),
            Strategy::Content => None,
        };
        let bytes = fs::read(path)?;
        let fingerprint = stat.unwrap_or_else(|| Fingerprint::of_bytes(&bytes));
        let content =
            String::from_utf8(bytes).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        Ok((content, fingerprint))
    }
}
