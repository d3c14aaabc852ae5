//! Persistent change-detection cache.
//!
//! Maps root-relative content paths to the fingerprint recorded at the last
//! successful write. One `RwLock` covers the whole map; every method takes
//! the lock for the duration of a single call.

use std::collections::BTreeMap;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use parking_lot::RwLock;
use rustc_hash::FxHashMap;
use tempfile::NamedTempFile;

use super::{Fingerprint, Strategy};
use crate::utils::path::to_slash;
use crate::{debug, log};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheEntry {
    pub fingerprint: Fingerprint,
    /// `None` for entries restored from disk.
    pub built_at: Option<DateTime<Local>>,
}

pub struct BuildCache {
    /// Project root; keys are relative to it.
    root: PathBuf,
    /// Side-car file.
    file: PathBuf,
    strategy: Strategy,
    entries: RwLock<FxHashMap<String, CacheEntry>>,
}

impl BuildCache {
    pub fn new(root: impl Into<PathBuf>, file: impl Into<PathBuf>, strategy: Strategy) -> Self {
        Self {
            root: root.into(),
            file: file.into(),
            strategy,
            entries: RwLock::new(FxHashMap::default()),
        }
    }

    pub fn strategy(&self) -> Strategy {
        self.strategy
    }

    pub fn file(&self) -> &Path {
        &self.file
    }

    /// Cache key for a content path: root-relative, `/`-separated.
    pub fn key(&self, path: &Path) -> String {
        to_slash(path.strip_prefix(&self.root).unwrap_or(path))
    }

    /// Absolute source path for a cache key.
    pub fn source_path(&self, key: &str) -> PathBuf {
        self.root.join(key)
    }

    /// Whether `path` must be reprocessed.
    ///
    /// True when the file cannot be fingerprinted, has no stored entry, or
    /// its fingerprint differs from the stored one.
    pub fn needs_rebuild(&self, path: &Path) -> bool {
        let Ok(current) = Fingerprint::compute(path, self.strategy) else {
            return true;
        };
        let key = self.key(path);
        match self.entries.read().get(&key) {
            Some(entry) => entry.fingerprint != current,
            None => true,
        }
    }

    /// Fingerprint `path` as it is on disk now and record it as built.
    pub fn update_file(&self, path: &Path) -> io::Result<()> {
        let fingerprint = Fingerprint::compute(path, self.strategy)?;
        self.record(path, fingerprint);
        Ok(())
    }

    /// Record `fingerprint` as the state of `path` that was just built.
    ///
    /// The fingerprint must describe the bytes the page was rendered from,
    /// not whatever is on disk by the time the page is written.
    pub fn record(&self, path: &Path, fingerprint: Fingerprint) {
        let key = self.key(path);
        debug!("cache"; "{} -> {}", key, fingerprint);
        self.entries.write().insert(
            key,
            CacheEntry {
                fingerprint,
                built_at: Some(Local::now()),
            },
        );
    }

    pub fn get(&self, path: &Path) -> Option<CacheEntry> {
        self.entries.read().get(&self.key(path)).cloned()
    }

    pub fn remove(&self, key: &str) -> Option<CacheEntry> {
        self.entries.write().remove(key)
    }

    pub fn clear(&self) {
        self.entries.write().clear();
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// Keys whose source file no longer exists on disk.
    pub fn stale_keys(&self) -> Vec<String> {
        let mut stale: Vec<String> = self
            .entries
            .read()
            .keys()
            .filter(|key| !self.source_path(key).is_file())
            .cloned()
            .collect();
        stale.sort();
        stale
    }

    /// Sorted `key -> fingerprint` view, the persisted shape.
    pub fn snapshot(&self) -> BTreeMap<String, String> {
        self.entries
            .read()
            .iter()
            .map(|(key, entry)| (key.clone(), entry.fingerprint.as_str().to_owned()))
            .collect()
    }

    /// Replace the in-memory map with the side-car file's contents.
    ///
    /// A missing or unreadable file yields an empty cache. Returns the
    /// number of entries loaded.
    pub fn load(&self) -> usize {
        let restored = match fs::read(&self.file) {
            Ok(bytes) => match serde_json::from_slice::<BTreeMap<String, String>>(&bytes) {
                Ok(map) => map,
                Err(e) => {
                    log!("cache"; "ignoring corrupt {}: {}", self.file.display(), e);
                    BTreeMap::new()
                }
            },
            Err(e) if e.kind() == io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => {
                log!("cache"; "ignoring unreadable {}: {}", self.file.display(), e);
                BTreeMap::new()
            }
        };

        let count = restored.len();
        let mut entries = self.entries.write();
        entries.clear();
        entries.extend(restored.into_iter().map(|(key, fp)| {
            (
                key,
                CacheEntry {
                    fingerprint: Fingerprint::from(fp),
                    built_at: None,
                },
            )
        }));
        debug!("cache"; "loaded {} entries", count);
        count
    }

    /// Write the map to the side-car file atomically.
    pub fn save(&self) -> io::Result<()> {
        let dir = self
            .file
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        fs::create_dir_all(dir)?;

        let json = serde_json::to_vec_pretty(&self.snapshot()).map_err(io::Error::other)?;
        let mut tmp = NamedTempFile::new_in(dir)?;
        tmp.write_all(&json)?;
        tmp.flush()?;
        tmp.persist(&self.file).map_err(|e| e.error)?;
        Ok(())
    }
}
