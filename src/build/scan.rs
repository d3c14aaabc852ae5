//! Scan phase: list content, ask the cache what changed, prune stale output.

use std::collections::hash_map::Entry;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use rustc_hash::{FxHashMap, FxHashSet};

use crate::build::BuildError;
use crate::debug;
use crate::freshness::BuildCache;
use crate::page;

/// Files found by a scan.
#[derive(Debug, Default)]
pub struct ScanResult {
    /// Content files with the recognized extension.
    pub total: usize,
    /// Files whose fingerprint differs from the cache, sorted.
    pub changed: Vec<PathBuf>,
    /// Files whose page name is already taken by an earlier file, with
    /// the reason. Never processed.
    pub collisions: Vec<(PathBuf, String)>,
    /// Page names owned by a listed file, changed or not.
    pub claimed: FxHashSet<String>,
}

/// Non-directory entries of `dir` with extension `ext`, sorted. Not recursive.
pub fn list_content(dir: &Path, ext: &str) -> Result<Vec<PathBuf>, BuildError> {
    let list_err = |source| BuildError::ListContent {
        dir: dir.to_path_buf(),
        source,
    };

    let mut files = Vec::new();
    for entry in fs::read_dir(dir).map_err(list_err)? {
        let entry = entry.map_err(list_err)?;
        let path = entry.path();
        if path.is_dir() || !has_extension(&path, ext) {
            continue;
        }
        files.push(path);
    }
    files.sort();
    Ok(files)
}

/// Read-only pass over the cache.
///
/// Stems that slugify alike (`a b.md`, `a-b.md`) would share one page. The
/// first file in sorted order owns it; the others are collisions.
pub fn scan(dir: &Path, ext: &str, cache: &BuildCache) -> Result<ScanResult, BuildError> {
    let files = list_content(dir, ext)?;
    let total = files.len();

    let mut owners: FxHashMap<String, PathBuf> = FxHashMap::default();
    let mut collisions = Vec::new();
    let mut changed = Vec::new();
    for path in files {
        let name = page::output_name(&page::slug_for(&path));
        match owners.entry(name) {
            Entry::Occupied(owner) => {
                let reason = format!(
                    "{}: {} is already generated from {}",
                    path.display(),
                    owner.key(),
                    owner.get().display()
                );
                collisions.push((path, reason));
            }
            Entry::Vacant(slot) => {
                if cache.needs_rebuild(&path) {
                    changed.push(path.clone());
                }
                slot.insert(path);
            }
        }
    }

    debug!("scan"; "{} of {} changed", changed.len(), total);
    Ok(ScanResult {
        total,
        changed,
        collisions,
        claimed: owners.into_keys().collect(),
    })
}

/// Drop cache entries whose source is gone, deleting their generated page
/// unless a listed file still claims it.
///
/// Returns the number of pages deleted.
pub fn prune_stale(cache: &BuildCache, output: &Path, claimed: &FxHashSet<String>) -> usize {
    let mut removed = 0;
    for key in cache.stale_keys() {
        let name = page::output_name(&page::slug_for(Path::new(&key)));
        if claimed.contains(&name) {
            debug!("prune"; "{} gone, {} kept for its sibling", key, name);
            cache.remove(&key);
            continue;
        }
        let target = output.join(&name);
        match remove_if_exists(&target) {
            Ok(true) => {
                debug!("prune"; "{} -> removed {}", key, target.display());
                removed += 1;
            }
            Ok(false) => {}
            Err(e) => {
                // keep the entry so the next run retries
                crate::log!("prune"; "cannot remove {}: {}", target.display(), e);
                continue;
            }
        }
        cache.remove(&key);
    }
    removed
}

/// `Ok(true)` when a file was deleted.
pub fn remove_if_exists(path: &Path) -> io::Result<bool> {
    match fs::remove_file(path) {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(e),
    }
}

/// Case-insensitive extension match.
pub fn has_extension(path: &Path, ext: &str) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case(ext))
}
