//! Build error types.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors that abort a build, plus the per-file I/O failures recorded in
/// the build report.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("cannot list content directory `{dir}`")]
    ListContent {
        dir: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("cannot read `{path}`")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("cannot write `{path}`")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("template `{name}` not found")]
    TemplateMissing { name: String },

    #[error("failed to render template `{name}`: {message}")]
    Render { name: String, message: String },

    #[error("cannot persist build cache `{path}`")]
    Cache {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("{failed} of {changed} changed files failed to build")]
    Incomplete { failed: usize, changed: usize },
}

impl BuildError {
    /// Aborts the remaining work of the run. Per-file read and write
    /// failures only fail their own file.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, Self::Read { .. } | Self::Write { .. })
    }

    /// Message with every source in the chain, `a: b: c`.
    pub fn describe(&self) -> String {
        let mut message = self.to_string();
        let mut source = std::error::Error::source(self);
        while let Some(e) = source {
            message.push_str(": ");
            message.push_str(&e.to_string());
            source = e.source();
        }
        message
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_describe_includes_source() {
        let err = BuildError::Read {
            path: PathBuf::from("content/a.md"),
            source: io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        };
        assert_eq!(err.describe(), "cannot read `content/a.md`: denied");
    }

    #[test]
    fn test_fatality() {
        assert!(BuildError::TemplateMissing { name: "page.html".into() }.is_fatal());
        assert!(
            !BuildError::Write {
                path: PathBuf::from("public/a.html"),
                source: io::Error::other("full"),
            }
            .is_fatal()
        );
    }
}
