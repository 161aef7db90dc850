//! Batch script loader.
//!
//! A script is a sequence of `;`-terminated commands. Lines are trimmed,
//! blank lines and lines starting with `;` are skipped, and the remaining
//! lines are joined with a space until one contains a `;`.

use crate::error::ShellError;
use crate::handler::{CommandHandler, Message, Reply};
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

/// Iterator over the statements of a script.
pub struct Statements<R> {
    reader: R,
    buffer: String,
    leftover: Option<String>,
}

impl<R: BufRead> Statements<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            buffer: String::new(),
            leftover: None,
        }
    }

    /// Returns the unterminated text left at end of input, once the iterator
    /// is exhausted.
    pub fn leftover(&self) -> Option<&str> {
        self.leftover.as_deref()
    }
}

impl<R: BufRead> Iterator for Statements<R> {
    type Item = io::Result<String>;

    fn next(&mut self) -> Option<Self::Item> {
        let mut line = String::new();
        loop {
            line.clear();
            match self.reader.read_line(&mut line) {
                Ok(0) => {
                    if !self.buffer.is_empty() {
                        self.leftover = Some(std::mem::take(&mut self.buffer));
                    }
                    return None;
                }
                Ok(_) => {}
                Err(e) => return Some(Err(e)),
            }

            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with(';') {
                continue;
            }

            if !self.buffer.is_empty() {
                self.buffer.push(' ');
            }
            self.buffer.push_str(trimmed);

            if trimmed.contains(';') {
                return Some(Ok(std::mem::take(&mut self.buffer)));
            }
        }
    }
}

/// Summary of a script run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScriptSummary {
    /// Number of statements dispatched.
    pub commands: usize,
    /// Whether the script stopped at `EXIT`.
    pub exited: bool,
}

/// Runs a script file through the handler, passing every reply to `emit`.
pub fn run_script(
    handler: &mut CommandHandler,
    path: impl AsRef<Path>,
    mut emit: impl FnMut(&Reply),
) -> Result<ScriptSummary, ShellError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| ShellError::UnreadableScript {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::info!("Running script {}", path.display());

    let mut summary = ScriptSummary::default();
    let mut statements = Statements::new(BufReader::new(file));

    for statement in statements.by_ref() {
        let statement = statement?;
        let Some(reply) = handler.handle_line(&statement) else {
            continue;
        };
        summary.commands += 1;
        emit(&reply);

        if reply.exit {
            summary.exited = true;
            return Ok(summary);
        }
    }

    if let Some(rest) = statements.leftover() {
        tracing::warn!("Discarding unterminated statement at end of {}", path.display());
        emit(&Reply {
            messages: vec![Message::warning(format!(
                "Missing ';' at end of file, ignored: '{}'",
                rest
            ))],
            exit: false,
        });
    }

    Ok(summary)
}
