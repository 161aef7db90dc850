//! Automaton snapshots.
//!
//! A snapshot file has the following format:
//!
//! ```text
//! +----------+----------+----------+----------+----------+----------+
//! | magic    | version  | flags    | reserved | length   | crc32c   |
//! | 4 bytes  | 1 byte   | 1 byte   | 2 bytes  | 4 bytes  | 4 bytes  |
//! +----------+----------+----------+----------+----------+----------+
//! | payload (JSON-encoded raw automaton)                             |
//! | length bytes                                                     |
//! +-------------------------------------------------------------------+
//! ```
//!
//! Decoding rebuilds the automaton through [`Automaton::from_raw`], so a
//! snapshot that passes the checksum but breaks an invariant is still rejected.

use crate::error::StorageError;
use bytes::{Buf, BufMut, Bytes, BytesMut};
use fsmd_core::{Automaton, AutomatonRaw};
use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

/// Magic bytes for snapshot files: "FSMS"
pub const SNAPSHOT_MAGIC: [u8; 4] = *b"FSMS";

/// Current snapshot format version.
pub const SNAPSHOT_VERSION: u8 = 1;

/// Size of the fixed snapshot header.
pub const HEADER_SIZE: usize = 16;

/// Maximum payload size (16 MiB).
pub const MAX_PAYLOAD_SIZE: usize = 16 * 1024 * 1024;

/// Encodes an automaton into snapshot bytes.
pub fn encode(automaton: &Automaton) -> Result<Bytes, StorageError> {
    let payload = serde_json::to_vec(&automaton.to_raw())?;
    if payload.len() > MAX_PAYLOAD_SIZE {
        return Err(StorageError::TooLarge {
            size: payload.len(),
            max: MAX_PAYLOAD_SIZE,
        });
    }

    let mut buf = BytesMut::with_capacity(HEADER_SIZE + payload.len());
    buf.put_slice(&SNAPSHOT_MAGIC);
    buf.put_u8(SNAPSHOT_VERSION);
    // Flags
    buf.put_u8(0);
    // Reserved
    buf.put_u16(0);
    buf.put_u32(payload.len() as u32);
    buf.put_u32(crc32c::crc32c(&payload));
    buf.put_slice(&payload);

    Ok(buf.freeze())
}

/// Decodes snapshot bytes into an automaton.
pub fn decode(mut buf: &[u8]) -> Result<Automaton, StorageError> {
    if buf.len() < HEADER_SIZE {
        return Err(StorageError::InvalidHeader {
            reason: format!("truncated header: {} bytes", buf.len()),
        });
    }

    let mut magic = [0u8; 4];
    buf.copy_to_slice(&mut magic);
    if magic != SNAPSHOT_MAGIC {
        return Err(StorageError::InvalidHeader {
            reason: format!("invalid magic: {:?}", magic),
        });
    }

    let version = buf.get_u8();
    if version != SNAPSHOT_VERSION {
        return Err(StorageError::UnsupportedVersion(version));
    }
    let _flags = buf.get_u8();
    let _reserved = buf.get_u16();
    let payload_len = buf.get_u32() as usize;
    let crc_expected = buf.get_u32();

    if payload_len > MAX_PAYLOAD_SIZE {
        return Err(StorageError::TooLarge {
            size: payload_len,
            max: MAX_PAYLOAD_SIZE,
        });
    }
    if buf.len() != payload_len {
        return Err(StorageError::Corruption(format!(
            "payload length mismatch: header says {}, found {}",
            payload_len,
            buf.len()
        )));
    }

    let crc_actual = crc32c::crc32c(buf);
    if crc_actual != crc_expected {
        return Err(StorageError::Corruption(format!(
            "checksum mismatch (expected {:#x}, got {:#x})",
            crc_expected, crc_actual
        )));
    }

    let raw: AutomatonRaw = serde_json::from_slice(buf)?;
    Ok(Automaton::from_raw(raw)?)
}

/// Metadata about a written snapshot.
#[derive(Debug, Clone)]
pub struct SnapshotMeta {
    pub path: PathBuf,
    pub size_bytes: u64,
    pub checksum: String,
}

/// Snapshot store resolving snapshot names against a base directory.
pub struct SnapshotStore {
    dir: PathBuf,
}

impl SnapshotStore {
    /// Opens or creates a snapshot store at the given directory.
    pub fn open(dir: impl AsRef<Path>) -> Result<Self, StorageError> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    /// Returns the base directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Resolves a snapshot name. Absolute paths are used as given.
    pub fn resolve(&self, name: impl AsRef<Path>) -> PathBuf {
        self.dir.join(name)
    }

    /// Writes a snapshot of the automaton.
    pub fn save(
        &self,
        name: impl AsRef<Path>,
        automaton: &Automaton,
    ) -> Result<SnapshotMeta, StorageError> {
        let data = encode(automaton)?;
        let path = self.resolve(name);

        let mut file = File::create(&path)?;
        file.write_all(&data)?;
        file.sync_all()?;

        let checksum = format!("{:08x}", crc32c::crc32c(&data[HEADER_SIZE..]));
        tracing::info!(
            "Compiled automaton to {} ({} bytes, checksum {})",
            path.display(),
            data.len(),
            checksum
        );

        Ok(SnapshotMeta {
            path,
            size_bytes: data.len() as u64,
            checksum,
        })
    }

    /// Reads a snapshot. The returned automaton is fully validated.
    pub fn load(&self, name: impl AsRef<Path>) -> Result<Automaton, StorageError> {
        let path = self.resolve(name);
        if !path.is_file() {
            return Err(StorageError::SnapshotNotFound(path.display().to_string()));
        }

        let mut file = File::open(&path)?;
        let mut data = Vec::new();
        file.read_to_end(&mut data)?;

        let automaton = decode(&data)?;
        tracing::info!("Loaded automaton from {}", path.display());
        Ok(automaton)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn sample_automaton() -> Automaton {
        let mut a = Automaton::new();
        for s in ["0", "1"] {
            a.declare_symbol(s).unwrap();
        }
        for s in ["A", "B", "C"] {
            a.declare_state(s).unwrap();
        }
        a.set_initial_state("B").unwrap();
        a.add_final_state("C").unwrap();
        a.add_final_state("A").unwrap();
        a.add_transition("0", "A", "B").unwrap();
        a.add_transition("1", "B", "C").unwrap();
        a.add_transition("0", "A", "C").unwrap();
        a
    }

    #[test]
    fn test_snapshot_roundtrip() {
        let automaton = sample_automaton();
        let bytes = encode(&automaton).unwrap();
        assert_eq!(&bytes[..4], b"FSMS");

        let decoded = decode(&bytes).unwrap();
        assert_eq!(decoded.to_raw(), automaton.to_raw());
        assert_eq!(
            decoded.initial_state().map(|s| s.as_str()),
            Some("B")
        );
    }

    #[test]
    fn test_empty_roundtrip() {
        let decoded = decode(&encode(&Automaton::new()).unwrap()).unwrap();
        assert!(decoded.is_empty());
        assert!(decoded.initial_state().is_none());
    }

    #[test]
    fn test_corrupted_payload_detection() {
        let mut bytes = encode(&sample_automaton()).unwrap().to_vec();
        let len = bytes.len();
        bytes[len - 2] ^= 0xFF;

        let result = decode(&bytes);
        assert!(matches!(result, Err(StorageError::Corruption(_))));
    }

    #[test]
    fn test_invalid_magic() {
        let mut bytes = encode(&sample_automaton()).unwrap().to_vec();
        bytes[0] = b'X';
        assert!(matches!(
            decode(&bytes),
            Err(StorageError::InvalidHeader { .. })
        ));
    }

    #[test]
    fn test_truncated_snapshot() {
        let bytes = encode(&sample_automaton()).unwrap();
        assert!(matches!(
            decode(&bytes[..8]),
            Err(StorageError::InvalidHeader { .. })
        ));
        assert!(matches!(
            decode(&bytes[..bytes.len() - 1]),
            Err(StorageError::Corruption(_))
        ));
    }

    #[test]
    fn test_unsupported_version() {
        let mut bytes = encode(&sample_automaton()).unwrap().to_vec();
        bytes[4] = 9;
        assert!(matches!(
            decode(&bytes),
            Err(StorageError::UnsupportedVersion(9))
        ));
    }

    #[test]
    fn test_checksum_valid_but_invariant_broken() {
        let payload = serde_json::to_vec(&serde_json::json!({
            "symbols": ["0"],
            "states": ["A"],
            "initial": "B",
            "finals": [],
            "transitions": []
        }))
        .unwrap();

        let mut buf = BytesMut::new();
        buf.put_slice(&SNAPSHOT_MAGIC);
        buf.put_u8(SNAPSHOT_VERSION);
        buf.put_u8(0);
        buf.put_u16(0);
        buf.put_u32(payload.len() as u32);
        buf.put_u32(crc32c::crc32c(&payload));
        buf.put_slice(&payload);

        assert!(matches!(decode(&buf), Err(StorageError::Core(_))));
    }

    #[test]
    fn test_store_save_and_load() {
        let dir = TempDir::new().unwrap();
        let store = SnapshotStore::open(dir.path()).unwrap();

        let automaton = sample_automaton();
        let meta = store.save("machine.fsm", &automaton).unwrap();
        assert_eq!(meta.path, dir.path().join("machine.fsm"));
        assert!(meta.size_bytes > HEADER_SIZE as u64);
        assert_eq!(meta.checksum.len(), 8);

        let loaded = store.load("machine.fsm").unwrap();
        assert_eq!(loaded.to_raw(), automaton.to_raw());
    }

    #[test]
    fn test_store_absolute_path() {
        let dir = TempDir::new().unwrap();
        let other = TempDir::new().unwrap();
        let store = SnapshotStore::open(dir.path()).unwrap();

        let path = other.path().join("abs.fsm");
        store.save(&path, &sample_automaton()).unwrap();
        assert!(path.is_file());
        assert!(store.load(&path).is_ok());
    }

    #[test]
    fn test_store_missing_snapshot() {
        let dir = TempDir::new().unwrap();
        let store = SnapshotStore::open(dir.path()).unwrap();
        assert!(matches!(
            store.load("missing.fsm"),
            Err(StorageError::SnapshotNotFound(_))
        ));
    }
}
