//! Execution engine - runs input strings against an automaton.

use crate::automaton::{Automaton, State, Symbol};
use crate::error::CoreError;
use std::fmt;

/// Outcome of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Accept,
    Reject,
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Verdict::Accept => f.write_str("YES"),
            Verdict::Reject => f.write_str("NO"),
        }
    }
}

/// Result of running an input string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Execution {
    /// States visited, starting with the initial state.
    pub trace: Vec<State>,
    pub verdict: Verdict,
    /// Set when the run stopped early.
    pub error: Option<CoreError>,
}

impl Execution {
    fn rejected(trace: Vec<State>, error: CoreError) -> Self {
        Self {
            trace,
            verdict: Verdict::Reject,
            error: Some(error),
        }
    }

    /// Returns true if the input was accepted.
    pub fn is_accepted(&self) -> bool {
        self.verdict == Verdict::Accept
    }

    /// Returns the visited state names.
    pub fn path(&self) -> Vec<&str> {
        self.trace.iter().map(State::as_str).collect()
    }
}

/// Renders as the visited states followed by `YES` or `NO`.
impl fmt::Display for Execution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for state in &self.trace {
            write!(f, "{} ", state)?;
        }
        write!(f, "{}", self.verdict)
    }
}

impl Automaton {
    /// Runs `input` through the automaton.
    ///
    /// The run stops at the first character that is not a declared symbol or
    /// that has no transition from the current state; both cases reject with
    /// the trace visited so far. Passing `None` rejects with
    /// [`CoreError::NullInput`].
    pub fn execute<'a>(&self, input: impl Into<Option<&'a str>>) -> Execution {
        let Some(initial) = self.initial_state() else {
            return Execution::rejected(Vec::new(), CoreError::Uninitialized);
        };
        let Some(input) = input.into() else {
            return Execution::rejected(Vec::new(), CoreError::NullInput);
        };

        let mut current = initial;
        let mut trace = vec![current.clone()];

        for ch in input.chars() {
            let symbol = Symbol::from_input(ch);
            if !self.has_symbol(symbol) {
                tracing::debug!("Run aborted: '{}' is not a declared symbol", ch);
                return Execution::rejected(
                    trace,
                    CoreError::UndeclaredInputSymbol { symbol: ch },
                );
            }

            let Some(next) = self.next_state(symbol, current) else {
                tracing::debug!("Run stopped: no transition from {} on {}", current, symbol);
                return Execution::rejected(
                    trace,
                    CoreError::NoTransition {
                        state: current.to_string(),
                        symbol: symbol.as_char(),
                    },
                );
            };

            current = next;
            trace.push(current.clone());
        }

        let verdict = if self.is_final(current) {
            Verdict::Accept
        } else {
            Verdict::Reject
        };

        Execution {
            trace,
            verdict,
            error: None,
        }
    }
}
