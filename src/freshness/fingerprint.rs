//! File fingerprints for change detection.
//!
//! Two strategies:
//!
//! - **content**: blake3 digest of the file bytes. Changes iff the bytes change.
//! - **stat**: `<byteLength>-<modTimeSeconds>`. No read required, but an edit
//!   that keeps the length and lands in the same second goes unnoticed.

use std::fmt;
use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::Path;
use std::time::UNIX_EPOCH;

use serde::{Deserialize, Serialize};

/// Fingerprint strategy, selected by `build.fingerprint`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    /// blake3 digest of the file bytes.
    #[default]
    Content,
    /// Byte length plus modification time in whole seconds.
    Stat,
}

/// Opaque fingerprint string as stored in the cache file.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Fingerprint(String);

impl Fingerprint {
    /// Compute the fingerprint of `path` with the given strategy.
    ///
    /// Fails when the file cannot be stat'ed or read.
    pub fn compute(path: &Path, strategy: Strategy) -> io::Result<Self> {
        match strategy {
            Strategy::Content => Self::digest(path),
            Strategy::Stat => Self::stat(path),
        }
    }

    /// Baseline fingerprint from size and whole-second mtime.
    pub fn stat(path: &Path) -> io::Result<Self> {
        let meta = path.metadata()?;
        let secs = meta
            .modified()?
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0);
        Ok(Self::from_stat(meta.len(), secs))
    }

    pub fn from_stat(len: u64, mtime_secs: u64) -> Self {
        Self(format!("{len}-{mtime_secs}"))
    }

    /// blake3 digest of the file contents.
    pub fn digest(path: &Path) -> io::Result<Self> {
        let file = File::open(path)?;
        let mut reader = BufReader::with_capacity(64 * 1024, file);
        let mut hasher = blake3::Hasher::new();
        let mut buffer = [0u8; 64 * 1024];

        loop {
            match reader.read(&mut buffer) {
                Ok(0) => break,
                Ok(n) => {
                    hasher.update(&buffer[..n]);
                }
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }
        }

        Ok(Self::from_digest(hasher.finalize().as_bytes()))
    }

    /// Content fingerprint of bytes already in memory.
    pub fn of_bytes(bytes: &[u8]) -> Self {
        Self::from_digest(blake3::hash(bytes).as_bytes())
    }

    pub fn from_digest(bytes: &[u8; 32]) -> Self {
        Self(format!("blake3:{}", hex::encode(bytes)))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for Fingerprint {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // digests are long; the prefix is enough for logs
        let short: String = self.0.chars().take(23).collect();
        f.write_str(&short)
    }
}
