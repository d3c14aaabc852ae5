//! Build summary.

use std::path::PathBuf;
use std::time::Duration;

use crate::utils::plural_count;

#[derive(Debug, Default, Clone)]
pub struct BuildReport {
    /// Content files seen by the scan.
    pub total: usize,
    /// Files the cache flagged for processing.
    pub changed: usize,
    pub written: usize,
    pub skipped_drafts: usize,
    /// Output pages deleted (stale sources and drafts).
    pub removed: usize,
    /// Per-file failures with a readable reason.
    pub failed: Vec<(PathBuf, String)>,
    pub elapsed: Duration,
}

impl BuildReport {
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }

    /// Nothing written, nothing removed.
    pub fn is_noop(&self) -> bool {
        self.written == 0 && self.removed == 0 && self.failed.is_empty()
    }

    /// One-line summary, e.g. `2 of 5 files changed, 2 written in 12ms`.
    pub fn summary(&self) -> String {
        let mut line = format!(
            "{} of {} changed, {} written",
            self.changed,
            plural_count(self.total, "file"),
            self.written
        );
        if self.skipped_drafts > 0 {
            line.push_str(&format!(", {} skipped", plural_count(self.skipped_drafts, "draft")));
        }
        if self.removed > 0 {
            line.push_str(&format!(", {} removed", self.removed));
        }
        if !self.failed.is_empty() {
            line.push_str(&format!(", {} failed", self.failed.len()));
        }
        line.push_str(&format!(" in {}ms", self.elapsed.as_millis()));
        line
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary() {
        let report = BuildReport {
            total: 5,
            changed: 2,
            written: 1,
            skipped_drafts: 1,
            removed: 0,
            failed: vec![],
            elapsed: Duration::from_millis(12),
        };
        assert_eq!(report.summary(), "2 of 5 files changed, 1 written, 1 draft skipped in 12ms");
        assert!(report.is_success());
        assert!(!report.is_noop());
    }

    #[test]
    fn test_summary_failures() {
        let report = BuildReport {
            total: 1,
            changed: 1,
            failed: vec![(PathBuf::from("a.md"), "boom".into())],
            ..Default::default()
        };
        assert_eq!(report.summary(), "1 of 1 file changed, 0 written, 1 failed in 0ms");
        assert!(!report.is_success());
    }
}
