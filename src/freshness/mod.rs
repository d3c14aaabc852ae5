//! Freshness detection: per-file fingerprints and the persistent build cache.

mod cache;
mod fingerprint;

pub use cache::BuildCache;
pub use fingerprint::{Fingerprint, Strategy};
