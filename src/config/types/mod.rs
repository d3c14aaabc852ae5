//! Config errors and the field paths they point at.

mod error;

pub use error::{ConfigDiagnostics, ConfigError, FieldPath};
