//! Core error types.

use thiserror::Error;

/// Errors from the automaton model and the execution engine.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    #[error("no {what} specified")]
    EmptyArgument { what: &'static str },

    #[error("invalid symbol '{token}': a symbol must be a single alphanumeric character")]
    InvalidSymbol { token: String },

    #[error("invalid state '{name}': a state name must be alphanumeric")]
    InvalidState { name: String },

    #[error("symbol '{symbol}' is not declared")]
    UndeclaredSymbol { symbol: String },

    #[error("state '{state}' is not declared")]
    UndeclaredState { state: String },

    #[error("automaton has no initial state")]
    Uninitialized,

    #[error("no input string specified")]
    NullInput,

    #[error("invalid symbol '{symbol}' in input")]
    UndeclaredInputSymbol { symbol: char },

    #[error("no transition from state '{state}' on symbol '{symbol}'")]
    NoTransition { state: String, symbol: char },

    #[error("invalid automaton definition: {reason}")]
    InvalidDefinition { reason: String },
}

impl CoreError {
    /// Returns a stable error code name.
    pub fn error_code(&self) -> &'static str {
        match self {
            CoreError::EmptyArgument { .. } => "EMPTY_ARGUMENT",
            CoreError::InvalidSymbol { .. } => "INVALID_SYMBOL_FORMAT",
            CoreError::InvalidState { .. } => "INVALID_STATE_FORMAT",
            CoreError::UndeclaredSymbol { .. } => "UNDECLARED_REFERENCE",
            CoreError::UndeclaredState { .. } => "UNDECLARED_REFERENCE",
            CoreError::Uninitialized => "UNINITIALIZED_AUTOMATON",
            CoreError::NullInput => "EMPTY_ARGUMENT",
            CoreError::UndeclaredInputSymbol { .. } => "UNDECLARED_SYMBOL_IN_INPUT",
            CoreError::NoTransition { .. } => "NO_TRANSITION_AVAILABLE",
            CoreError::InvalidDefinition { .. } => "INVALID_DEFINITION",
        }
    }
}
