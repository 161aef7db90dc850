//! # fsmd-storage
//!
//! Storage layer for fsmd.
//!
//! This crate provides:
//! - Binary snapshot encoding and decoding (`COMPILE` / `LOAD`)
//! - A snapshot store resolving file names against a directory
//! - Plain-text export of an automaton (`PRINT <file>`)

pub mod error;
pub mod export;
pub mod snapshot;

pub use error::StorageError;
pub use export::export_text;
pub use snapshot::{SnapshotMeta, SnapshotStore};
