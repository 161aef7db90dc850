//! # fsmd-shell
//!
//! Command shell for fsmd.
//!
//! This crate provides:
//! - Parsing of the textual command language
//! - Command dispatch against a single automaton
//! - Semicolon-delimited batch scripts
//! - The session log (`LOG`)
//! - Configuration loading and the interactive REPL

pub mod command;
pub mod config;
pub mod error;
pub mod handler;
pub mod loader;
pub mod repl;
pub mod session;

pub use command::Command;
pub use config::{Config, ConfigError};
pub use error::ShellError;
pub use handler::{CommandHandler, Level, Message, Reply};
pub use loader::{run_script, ScriptSummary, Statements};
pub use session::SessionLog;
