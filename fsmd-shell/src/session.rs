//! Session log.
//!
//! Records every dispatched command line and every message it produced to a
//! file chosen with `LOG <file>`.

use crate::error::ShellError;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Session log writer. Inactive until [`SessionLog::start`] is called.
#[derive(Default)]
pub struct SessionLog {
    active: Option<(PathBuf, BufWriter<File>)>,
}

impl SessionLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts logging to `path`, truncating it. A previously active log is
    /// closed first.
    pub fn start(&mut self, path: impl AsRef<Path>) -> Result<(), ShellError> {
        self.stop()?;

        let path = path.as_ref().to_path_buf();
        let file = File::create(&path)?;
        tracing::debug!("Session log opened at {}", path.display());
        self.active = Some((path, BufWriter::new(file)));
        Ok(())
    }

    /// Stops logging. Returns the path of the closed log, if one was active.
    pub fn stop(&mut self) -> Result<Option<PathBuf>, ShellError> {
        match self.active.take() {
            Some((path, mut writer)) => {
                writer.flush().map_err(ShellError::SessionLog)?;
                tracing::debug!("Session log closed at {}", path.display());
                Ok(Some(path))
            }
            None => Ok(None),
        }
    }

    /// Appends a line to the log if logging is active.
    pub fn record(&mut self, line: &str) -> Result<(), ShellError> {
        if let Some((_, writer)) = &mut self.active {
            writeln!(writer, "{}", line).map_err(ShellError::SessionLog)?;
            writer.flush().map_err(ShellError::SessionLog)?;
        }
        Ok(())
    }

    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    /// Returns the path of the active log.
    pub fn path(&self) -> Option<&Path> {
        self.active.as_ref().map(|(path, _)| path.as_path())
    }
}
