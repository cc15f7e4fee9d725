//! Engine errors and non-fatal warnings

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Errors surfaced to the caller of an engine operation.
///
/// Only manifest loading and the replace pass can fail an operation; every
/// other failure is downgraded to a [`Warning`].
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Failed to read {}: {source}", .path.display())]
    ManifestRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Error when reading template.manifest {}: {source}", .path.display())]
    ManifestParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to render {}: {source}", .path.display())]
    Render {
        path: PathBuf,
        #[source]
        source: RenderError,
    },

    #[error("Failed to update {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write output: {0}")]
    Output(#[source] std::io::Error),
}

pub type Result<T, E = EngineError> = std::result::Result<T, E>;

/// A template rendering failure, located by the line of the offending tag
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("line {line}: {kind}")]
pub struct RenderError {
    pub line: usize,
    pub kind: RenderErrorKind,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RenderErrorKind {
    #[error("'{0}' is not defined")]
    Undefined(String),

    #[error("invalid expression '{0}'")]
    InvalidExpression(String),

    #[error("unclosed tag")]
    UnclosedTag,

    #[error("scriptlet tags are not supported: '{0}'")]
    Scriptlet(String),
}

/// Something went wrong but the operation carried on
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Warning {
    /// A rule filter is not a valid glob; the rule was skipped
    InvalidFilter { filter: String, message: String },
    /// A rename pattern is not a valid regular expression; the rule was skipped
    InvalidPattern { pattern: String, message: String },
    /// A rename target placeholder has no value; the rule was skipped
    UnresolvedPlaceholder { target: String, placeholder: String },
    RenameFailed {
        from: PathBuf,
        to: PathBuf,
        message: String,
    },
    /// An attributes rule mode is not a valid permission value; the rule was skipped
    InvalidMode { filter: String, mode: String },
    ChmodFailed { path: PathBuf, message: String },
    /// A file matched by a replace rule is not UTF-8 text and was left alone
    NotText { path: PathBuf },
    /// A script exited with a non-zero status
    ScriptFailed { command: String, code: Option<i32> },
    ScriptSpawnFailed { command: String, message: String },
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Warning::InvalidFilter { filter, message } => {
                write!(f, "Invalid filter '{}': {}", filter, message)
            }
            Warning::InvalidPattern { pattern, message } => {
                write!(f, "Invalid rename pattern '{}': {}", pattern, message)
            }
            Warning::UnresolvedPlaceholder {
                target,
                placeholder,
            } => write!(
                f,
                "Cannot resolve {} in rename target '{}'",
                placeholder, target
            ),
            Warning::RenameFailed { from, to, message } => write!(
                f,
                "Cannot rename {} to {}: {}",
                from.display(),
                to.display(),
                message
            ),
            Warning::InvalidMode { filter, mode } => {
                write!(f, "Invalid mode {} for '{}'", mode, filter)
            }
            Warning::NotText { path } => {
                write!(f, "Skipping {}: not a text file", path.display())
            }
            Warning::ChmodFailed { path, message } => {
                write!(f, "Cannot change mode of {}: {}", path.display(), message)
            }
            Warning::ScriptFailed { command, code } => match code {
                Some(code) => write!(f, "Script '{}' exited with code {}", command, code),
                None => write!(f, "Script '{}' was terminated by a signal", command),
            },
            Warning::ScriptSpawnFailed { command, message } => {
                write!(f, "Cannot run script '{}': {}", command, message)
            }
        }
    }
}
