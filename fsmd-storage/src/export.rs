//! Plain-text export.

use crate::error::StorageError;
use fsmd_core::Automaton;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Writes the human-readable rendering of the automaton to `path`,
/// replacing any existing file.
pub fn export_text(path: impl AsRef<Path>, automaton: &Automaton) -> Result<(), StorageError> {
    let path = path.as_ref();
    let mut writer = BufWriter::new(File::create(path)?);
    writeln!(writer, "{}", automaton)?;
    writer.flush()?;

    tracing::debug!("Exported automaton to {}", path.display());
    Ok(())
}
