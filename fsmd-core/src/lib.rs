//! # fsmd-core
//!
//! Automaton model and execution engine for fsmd.
//!
//! This crate provides:
//! - Symbol and state declaration with incremental validation
//! - A functional transition relation with last-write-wins redefinition
//! - Step-by-step execution producing a trace and an accept/reject verdict
//! - A raw, serializable form used by snapshots

pub mod automaton;
pub mod engine;
pub mod error;

pub use automaton::{Automaton, AutomatonRaw, Declared, Designation, State, Symbol, Transition};
pub use engine::{Execution, Verdict};
pub use error::CoreError;
