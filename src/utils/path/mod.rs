//! Path utilities.
//!
//! Pure functions for path manipulation. No side effects.
//!
//! - [`fs`]: filesystem path normalization
//! - [`slug`]: slugs and titles derived from file names

pub mod fs;
pub mod slug;

pub use fs::{normalize_path, to_slash};
pub use slug::{file_stem, slugify, title_from_stem};
