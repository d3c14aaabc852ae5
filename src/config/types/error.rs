//! Errors raised while loading `quire.toml`.

use owo_colors::OwoColorize;
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config file `{}`", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid TOML in config file")]
    Parse(#[from] toml::de::Error),

    // no #[source]: the anyhow chain would print every problem twice
    #[error("{0}")]
    Invalid(ConfigDiagnostics),
}

/// Dotted key of a config value, e.g. `build.extension`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldPath(&'static str);

impl FieldPath {
    pub const fn new(path: &'static str) -> Self {
        Self(path)
    }

    pub const fn as_str(self) -> &'static str {
        self.0
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.cyan())
    }
}

/// One rejected value.
#[derive(Debug, Clone)]
pub struct Problem {
    pub field: FieldPath,
    pub message: String,
    pub hint: Option<String>,
}

/// Every rejected value in the file, so one run reports them all.
#[derive(Debug, Default)]
pub struct ConfigDiagnostics {
    problems: Vec<Problem>,
}

impl ConfigDiagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn error(&mut self, field: FieldPath, message: impl Into<String>) {
        self.push(field, message.into(), None);
    }

    pub fn error_with_hint(
        &mut self,
        field: FieldPath,
        message: impl Into<String>,
        hint: impl Into<String>,
    ) {
        self.push(field, message.into(), Some(hint.into()));
    }

    fn push(&mut self, field: FieldPath, message: String, hint: Option<String>) {
        self.problems.push(Problem {
            field,
            message,
            hint,
        });
    }

    pub fn is_empty(&self) -> bool {
        self.problems.is_empty()
    }

    pub fn problems(&self) -> &[Problem] {
        &self.problems
    }

    pub fn into_result(self) -> Result<(), ConfigError> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Invalid(self))
        }
    }
}

impl fmt::Display for ConfigDiagnostics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let count = self.problems.len();
        write!(f, "{} ", "invalid config:".red().bold())?;
        if count > 1 {
            write!(f, "{count} problems")?;
        }
        for problem in &self.problems {
            write!(f, "\n  {}: {}", problem.field, problem.message)?;
            if let Some(hint) = &problem.hint {
                write!(f, "\n    {} {hint}", "hint:".yellow())?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Error, ErrorKind};

    #[test]
    fn test_read_error_names_file() {
        let err = ConfigError::Read {
            path: PathBuf::from("quire.toml"),
            source: Error::new(ErrorKind::PermissionDenied, "denied"),
        };
        assert!(err.to_string().contains("quire.toml"));
    }

    #[test]
    fn test_diagnostics_collects_all_problems() {
        let mut diag = ConfigDiagnostics::new();
        assert!(diag.is_empty());

        diag.error(FieldPath::new("build.extension"), "must not be empty");
        diag.error_with_hint(
            FieldPath::new("build.output"),
            "same as content",
            "use `public`",
        );

        let Err(ConfigError::Invalid(diag)) = diag.into_result() else {
            panic!("expected invalid config");
        };
        assert_eq!(diag.problems().len(), 2);
        assert_eq!(diag.problems()[1].hint.as_deref(), Some("use `public`"));

        let shown = diag.to_string();
        assert!(shown.contains("2 problems"));
        assert!(shown.contains("build.extension"));
        assert!(shown.contains("use `public`"));
    }

    #[test]
    fn test_empty_diagnostics_is_ok() {
        assert!(ConfigDiagnostics::new().into_result().is_ok());
    }
}
