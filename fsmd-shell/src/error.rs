//! Shell error types.

use crate::config::ConfigError;
use std::path::PathBuf;
use thiserror::Error;

/// Shell errors.
#[derive(Debug, Error)]
pub enum ShellError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Core(#[from] fsmd_core::CoreError),

    #[error("persistence failure: {0}")]
    Storage(#[from] fsmd_storage::StorageError),

    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("line editor error: {0}")]
    Readline(#[from] rustyline::error::ReadlineError),

    #[error("Cannot read file {}: {source}", path.display())]
    UnreadableScript {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("no {0} specified")]
    MissingArgument(&'static str),

    #[error("invalid transition '{0}': expected <symbol> <from> <to>")]
    MalformedTransition(String),

    #[error("could not write to log file: {0}")]
    SessionLog(std::io::Error),
}

impl ShellError {
    /// Returns whether this error should stop the process.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            ShellError::Config(_) | ShellError::UnreadableScript { .. } | ShellError::Readline(_)
        )
    }
}
