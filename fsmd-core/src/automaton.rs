//! Automaton model.
//!
//! An automaton is built incrementally from declarations:
//!
//! ```text
//! SYMBOLS 0 1
//! STATES A B
//! FINAL-STATES B
//! TRANSITIONS 0 A A, 1 A B, 0 B B, 1 B A
//! ```
//!
//! Symbols and state names are case-insensitive and stored uppercased. Every
//! mutator validates its arguments first and leaves the automaton untouched on
//! failure. The transition relation is functional: redefining the transition
//! for a `(symbol, state)` pair replaces the previous one.

use crate::error::CoreError;
use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};
use std::fmt;

/// An input symbol: one uppercase ASCII letter or digit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Symbol(char);

impl Symbol {
    /// Parses a declared symbol token.
    pub fn parse(token: &str) -> Result<Self, CoreError> {
        let token = token.trim();
        if token.is_empty() {
            return Err(CoreError::EmptyArgument { what: "symbol" });
        }

        let upper = token.to_uppercase();
        let mut chars = upper.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) if c.is_ascii_alphanumeric() => Ok(Self(c)),
            _ => Err(CoreError::InvalidSymbol { token: upper }),
        }
    }

    /// Normalizes a character read from an input string. The result is only
    /// meaningful if the automaton declares it.
    pub fn from_input(ch: char) -> Self {
        Self(ch.to_ascii_uppercase())
    }

    pub fn as_char(self) -> char {
        self.0
    }

    fn is_well_formed(self) -> bool {
        self.0.is_ascii_digit() || self.0.is_ascii_uppercase()
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A state name: one or more uppercase ASCII letters or digits.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct State(String);

impl State {
    /// Parses a state name.
    pub fn parse(name: &str) -> Result<Self, CoreError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(CoreError::EmptyArgument { what: "state" });
        }

        let upper = name.to_uppercase();
        if upper.chars().all(|c| c.is_ascii_alphanumeric()) {
            Ok(Self(upper))
        } else {
            Err(CoreError::InvalidState { name: upper })
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn is_well_formed(&self) -> bool {
        !self.0.is_empty()
            && self
                .0
                .chars()
                .all(|c| c.is_ascii_digit() || c.is_ascii_uppercase())
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A transition `symbol: from -> to`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Transition {
    pub symbol: Symbol,
    pub from: State,
    pub to: State,
}

impl fmt::Display for Transition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} -> {}", self.symbol, self.from, self.to)
    }
}

/// Result of a symbol or state declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Declared {
    /// The name was added.
    New,
    /// The name was already declared; nothing changed.
    Existing,
}

/// Result of designating a state as initial or final.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Designation {
    /// The state was not declared and has been declared implicitly.
    pub auto_declared: bool,
    /// The designation changed the automaton.
    pub changed: bool,
}

/// Raw automaton as stored in snapshots.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AutomatonRaw {
    pub symbols: Vec<Symbol>,
    pub states: Vec<State>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub initial: Option<State>,
    pub finals: Vec<State>,
    pub transitions: Vec<Transition>,
}

/// A deterministic finite automaton under construction.
///
/// Equality is order-sensitive: declarations and transitions must match in
/// display order, not only as sets.
#[derive(Debug, Clone, Default)]
pub struct Automaton {
    symbols: IndexSet<Symbol>,
    states: IndexSet<State>,
    initial: Option<State>,
    finals: IndexSet<State>,
    /// Transitions indexed by (symbol, from_state) -> to_state, in definition order.
    transitions: IndexMap<(Symbol, State), State>,
}

impl Automaton {
    /// Creates an empty automaton.
    pub fn new() -> Self {
        Self::default()
    }

    // =========================================================================
    // Declarations
    // =========================================================================

    /// Declares an input symbol.
    pub fn declare_symbol(&mut self, token: &str) -> Result<Declared, CoreError> {
        let symbol = Symbol::parse(token)?;
        if !self.symbols.insert(symbol) {
            tracing::warn!("Symbol '{}' already declared", symbol);
            return Ok(Declared::Existing);
        }
        Ok(Declared::New)
    }

    /// Declares a state. The first state declared while no initial state is
    /// set becomes the initial state.
    pub fn declare_state(&mut self, name: &str) -> Result<Declared, CoreError> {
        let state = State::parse(name)?;
        let declared = self.insert_state(state);
        if declared == Declared::Existing {
            tracing::warn!("State '{}' already declared", name.to_uppercase());
        }
        Ok(declared)
    }

    /// Sets the initial state, declaring it first if needed.
    pub fn set_initial_state(&mut self, name: &str) -> Result<Designation, CoreError> {
        let state = Self::parse_designated(name, "initial state")?;
        let auto_declared = self.insert_state(state.clone()) == Declared::New;
        if auto_declared {
            tracing::warn!("State '{}' was not declared; declared it", state);
        }

        let changed = self.initial.as_ref() != Some(&state);
        self.initial = Some(state);
        Ok(Designation {
            auto_declared,
            changed,
        })
    }

    /// Marks a state as final, declaring it first if needed.
    pub fn add_final_state(&mut self, name: &str) -> Result<Designation, CoreError> {
        let state = Self::parse_designated(name, "final state")?;
        let auto_declared = self.insert_state(state.clone()) == Declared::New;
        if auto_declared {
            tracing::warn!("State '{}' was not declared; declared it", state);
        }

        let changed = self.finals.insert(state.clone());
        if !changed {
            tracing::warn!("State '{}' already declared as a final state", state);
        }
        Ok(Designation {
            auto_declared,
            changed,
        })
    }

    /// Adds a transition, replacing any transition for the same
    /// `(symbol, from)` pair. Returns the target of the replaced transition.
    pub fn add_transition(
        &mut self,
        symbol: &str,
        from: &str,
        to: &str,
    ) -> Result<Option<State>, CoreError> {
        let symbol = self
            .lookup_symbol(symbol)
            .ok_or_else(|| CoreError::UndeclaredSymbol {
                symbol: symbol.to_uppercase(),
            })?;
        let from = self
            .lookup_state(from)
            .ok_or_else(|| CoreError::UndeclaredState {
                state: from.to_uppercase(),
            })?;
        let to = self
            .lookup_state(to)
            .ok_or_else(|| CoreError::UndeclaredState {
                state: to.to_uppercase(),
            })?;

        // Remove then append so a redefined transition moves to the end.
        let key = (symbol, from);
        let replaced = self.transitions.shift_remove(&key);
        if let Some(previous) = &replaced {
            tracing::debug!(
                "Replacing transition {} {} -> {} with -> {}",
                key.0,
                key.1,
                previous,
                to
            );
        }
        self.transitions.insert(key, to);

        Ok(replaced)
    }

    /// Removes the transition for `(symbol, from)`, returning its target.
    pub fn remove_transition(&mut self, symbol: Symbol, from: &State) -> Option<State> {
        self.transitions.shift_remove(&(symbol, from.clone()))
    }

    /// Resets the automaton to empty, including the initial state.
    pub fn clear(&mut self) {
        self.symbols.clear();
        self.states.clear();
        self.finals.clear();
        self.transitions.clear();
        self.initial = None;
    }

    // =========================================================================
    // Read-only views
    // =========================================================================

    pub fn symbols(&self) -> impl ExactSizeIterator<Item = &Symbol> + '_ {
        self.symbols.iter()
    }

    pub fn states(&self) -> impl ExactSizeIterator<Item = &State> + '_ {
        self.states.iter()
    }

    pub fn final_states(&self) -> impl ExactSizeIterator<Item = &State> + '_ {
        self.finals.iter()
    }

    /// Returns the transitions in definition order.
    pub fn transitions(&self) -> impl ExactSizeIterator<Item = Transition> + '_ {
        self.transitions.iter().map(|((symbol, from), to)| Transition {
            symbol: *symbol,
            from: from.clone(),
            to: to.clone(),
        })
    }

    /// Returns the initial state, or `None` if unset.
    pub fn initial_state(&self) -> Option<&State> {
        self.initial.as_ref()
    }

    /// Looks up the transition target for the given symbol and state.
    pub fn next_state(&self, symbol: Symbol, state: &State) -> Option<&State> {
        self.transitions.get(&(symbol, state.clone()))
    }

    pub fn has_symbol(&self, symbol: Symbol) -> bool {
        self.symbols.contains(&symbol)
    }

    pub fn has_state(&self, state: &State) -> bool {
        self.states.contains(state)
    }

    pub fn is_final(&self, state: &State) -> bool {
        self.finals.contains(state)
    }

    /// Returns true if nothing has been declared.
    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty() && self.states.is_empty() && self.transitions.is_empty()
    }

    // =========================================================================
    // Raw form
    // =========================================================================

    /// Returns the raw form of the automaton.
    pub fn to_raw(&self) -> AutomatonRaw {
        AutomatonRaw {
            symbols: self.symbols.iter().copied().collect(),
            states: self.states.iter().cloned().collect(),
            initial: self.initial.clone(),
            finals: self.finals.iter().cloned().collect(),
            transitions: self.transitions().collect(),
        }
    }

    /// Rebuilds an automaton from its raw form, checking every invariant the
    /// mutators maintain.
    pub fn from_raw(raw: AutomatonRaw) -> Result<Self, CoreError> {
        let mut automaton = Self::new();

        for symbol in raw.symbols {
            if !symbol.is_well_formed() {
                return Err(invalid(format!("malformed symbol '{}'", symbol)));
            }
            if !automaton.symbols.insert(symbol) {
                return Err(invalid(format!("duplicate symbol '{}'", symbol)));
            }
        }

        for state in raw.states {
            if !state.is_well_formed() {
                return Err(invalid(format!("malformed state '{}'", state)));
            }
            if automaton.states.contains(&state) {
                return Err(invalid(format!("duplicate state '{}'", state)));
            }
            automaton.states.insert(state);
        }

        match raw.initial {
            Some(initial) if !automaton.states.contains(&initial) => {
                return Err(invalid(format!(
                    "initial state '{}' not in states list",
                    initial
                )));
            }
            None if !automaton.states.is_empty() => {
                return Err(invalid("states declared without an initial state".to_string()));
            }
            initial => automaton.initial = initial,
        }

        for state in raw.finals {
            if !automaton.states.contains(&state) {
                return Err(invalid(format!(
                    "final state '{}' not in states list",
                    state
                )));
            }
            if !automaton.finals.insert(state.clone()) {
                return Err(invalid(format!("duplicate final state '{}'", state)));
            }
        }

        for t in raw.transitions {
            if !automaton.symbols.contains(&t.symbol) {
                return Err(invalid(format!(
                    "transition symbol '{}' not in symbols list",
                    t.symbol
                )));
            }
            if !automaton.states.contains(&t.from) {
                return Err(invalid(format!(
                    "transition source '{}' not in states list",
                    t.from
                )));
            }
            if !automaton.states.contains(&t.to) {
                return Err(invalid(format!(
                    "transition target '{}' not in states list",
                    t.to
                )));
            }

            let key = (t.symbol, t.from);
            if automaton.transitions.contains_key(&key) {
                return Err(invalid(format!(
                    "duplicate transition from '{}' on symbol '{}'",
                    key.1, key.0
                )));
            }
            automaton.transitions.insert(key, t.to);
        }

        Ok(automaton)
    }

    // =========================================================================
    // Internals
    // =========================================================================

    fn insert_state(&mut self, state: State) -> Declared {
        if self.states.contains(&state) {
            return Declared::Existing;
        }
        if self.initial.is_none() {
            self.initial = Some(state.clone());
        }
        self.states.insert(state);
        Declared::New
    }

    fn parse_designated(name: &str, what: &'static str) -> Result<State, CoreError> {
        if name.trim().is_empty() {
            return Err(CoreError::EmptyArgument { what });
        }
        State::parse(name)
    }

    fn lookup_symbol(&self, token: &str) -> Option<Symbol> {
        Symbol::parse(token)
            .ok()
            .filter(|symbol| self.symbols.contains(symbol))
    }

    fn lookup_state(&self, name: &str) -> Option<State> {
        State::parse(name)
            .ok()
            .filter(|state| self.states.contains(state))
    }
}

fn invalid(reason: String) -> CoreError {
    CoreError::InvalidDefinition { reason }
}

impl PartialEq for Automaton {
    fn eq(&self, other: &Self) -> bool {
        self.initial == other.initial
            && self.symbols.iter().eq(other.symbols.iter())
            && self.states.iter().eq(other.states.iter())
            && self.finals.iter().eq(other.finals.iter())
            && self.transitions.iter().eq(other.transitions.iter())
    }
}

impl Eq for Automaton {}

impl fmt::Display for Automaton {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        const NONE: &str = "(none)";

        write!(f, "SYMBOLS:")?;
        if self.symbols.is_empty() {
            write!(f, " {}", NONE)?;
        }
        for symbol in &self.symbols {
            write!(f, " {}", symbol)?;
        }
        writeln!(f)?;

        write!(f, "STATES:")?;
        if self.states.is_empty() {
            write!(f, " {}", NONE)?;
        }
        for state in &self.states {
            write!(f, " {}", state)?;
            if self.initial.as_ref() == Some(state) {
                write!(f, " (initial)")?;
            }
            if self.finals.contains(state) {
                write!(f, " (final)")?;
            }
        }
        writeln!(f)?;

        match &self.initial {
            Some(initial) => writeln!(f, "INITIAL STATE: {}", initial)?,
            None => writeln!(f, "INITIAL STATE: {}", NONE)?,
        }

        write!(f, "FINAL STATES:")?;
        if self.finals.is_empty() {
            write!(f, " {}", NONE)?;
        }
        for state in &self.finals {
            write!(f, " {}", state)?;
        }
        writeln!(f)?;

        write!(f, "TRANSITIONS:")?;
        if self.transitions.is_empty() {
            write!(f, " {}", NONE)?;
        }
        for t in self.transitions() {
            write!(f, "\n  {}", t)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state(name: &str) -> State {
        State::parse(name).unwrap()
    }

    fn sym(token: &str) -> Symbol {
        Symbol::parse(token).unwrap()
    }

    fn sample_automaton() -> Automaton {
        let mut a = Automaton::new();
        a.declare_symbol("0").unwrap();
        a.declare_symbol("1").unwrap();
        a.declare_state("A").unwrap();
        a.declare_state("B").unwrap();
        a.add_final_state("B").unwrap();
        a.add_transition("0", "A", "A").unwrap();
        a.add_transition("1", "A", "B").unwrap();
        a.add_transition("0", "B", "B").unwrap();
        a.add_transition("1", "B", "A").unwrap();
        a
    }

    #[test]
    fn test_symbol_validation() {
        let mut a = Automaton::new();

        assert_eq!(a.declare_symbol("x").unwrap(), Declared::New);
        assert_eq!(a.symbols().next(), Some(&sym("X")));

        assert!(matches!(
            a.declare_symbol(""),
            Err(CoreError::EmptyArgument { .. })
        ));
        assert!(matches!(
            a.declare_symbol("ab"),
            Err(CoreError::InvalidSymbol { .. })
        ));
        assert!(matches!(
            a.declare_symbol("#"),
            Err(CoreError::InvalidSymbol { .. })
        ));
        assert_eq!(a.symbols().len(), 1);
    }

    #[test]
    fn test_duplicate_symbol_is_noop() {
        let mut a = Automaton::new();
        a.declare_symbol("a").unwrap();
        assert_eq!(a.declare_symbol("A").unwrap(), Declared::Existing);
        assert_eq!(a.symbols().len(), 1);
    }

    #[test]
    fn test_state_validation() {
        let mut a = Automaton::new();
        assert!(matches!(
            a.declare_state("q-1"),
            Err(CoreError::InvalidState { .. })
        ));
        assert!(matches!(
            a.declare_state("  "),
            Err(CoreError::EmptyArgument { .. })
        ));
        assert_eq!(a.states().len(), 0);
        assert!(a.initial_state().is_none());

        a.declare_state("q10").unwrap();
        assert_eq!(a.states().next(), Some(&state("Q10")));
    }

    #[test]
    fn test_duplicate_state_keeps_order() {
        let mut a = Automaton::new();
        a.declare_state("A").unwrap();
        a.declare_state("B").unwrap();
        assert_eq!(a.declare_state("a").unwrap(), Declared::Existing);

        let names: Vec<_> = a.states().map(State::as_str).collect();
        assert_eq!(names, vec!["A", "B"]);
    }

    #[test]
    fn test_first_state_becomes_initial() {
        let mut a = Automaton::new();
        a.declare_state("S").unwrap();
        a.declare_state("T").unwrap();
        assert_eq!(a.initial_state(), Some(&state("S")));

        let designation = a.set_initial_state("t").unwrap();
        assert!(!designation.auto_declared);
        assert!(designation.changed);
        assert_eq!(a.initial_state(), Some(&state("T")));
    }

    #[test]
    fn test_set_initial_auto_declares() {
        let mut a = Automaton::new();
        a.declare_state("A").unwrap();

        let designation = a.set_initial_state("Q9").unwrap();
        assert!(designation.auto_declared);
        assert!(a.has_state(&state("Q9")));
        assert_eq!(a.initial_state(), Some(&state("Q9")));
    }

    #[test]
    fn test_set_initial_rejects_empty() {
        let mut a = Automaton::new();
        assert_eq!(
            a.set_initial_state(""),
            Err(CoreError::EmptyArgument {
                what: "initial state"
            })
        );
        assert!(a.is_empty());
    }

    #[test]
    fn test_add_final_auto_declares() {
        let mut a = Automaton::new();
        let designation = a.add_final_state("q9").unwrap();
        assert!(designation.auto_declared);
        assert!(designation.changed);
        assert!(a.has_state(&state("Q9")));
        assert!(a.is_final(&state("Q9")));
        // Auto-declared as first state, so it is also initial.
        assert_eq!(a.initial_state(), Some(&state("Q9")));
    }

    #[test]
    fn test_add_final_rejects_empty() {
        let mut a = Automaton::new();
        assert_eq!(
            a.add_final_state("  "),
            Err(CoreError::EmptyArgument {
                what: "final state"
            })
        );
        assert!(a.is_empty());
    }

    #[test]
    fn test_malformed_designation_is_not_declared() {
        let mut a = Automaton::new();
        a.declare_state("A").unwrap();

        assert_eq!(
            a.set_initial_state("q-1"),
            Err(CoreError::InvalidState {
                name: "Q-1".to_string()
            })
        );
        assert_eq!(
            a.add_final_state("q-1"),
            Err(CoreError::InvalidState {
                name: "Q-1".to_string()
            })
        );
        assert_eq!(a.states().len(), 1);
        assert_eq!(a.initial_state(), Some(&state("A")));
        assert_eq!(a.final_states().len(), 0);
    }

    #[test]
    fn test_equality_is_order_sensitive() {
        let mut ab = Automaton::new();
        ab.declare_state("A").unwrap();
        ab.declare_state("B").unwrap();
        ab.set_initial_state("A").unwrap();

        let mut ba = Automaton::new();
        ba.declare_state("B").unwrap();
        ba.declare_state("A").unwrap();
        ba.set_initial_state("A").unwrap();

        assert_ne!(ab, ba);
        assert_eq!(ab, ab.clone());

        let mut first = sample_automaton();
        let mut second = sample_automaton();
        // Same relation, but the redefined transition moves to the end.
        second.add_transition("0", "A", "A").unwrap();
        assert_ne!(first.to_raw().transitions, second.to_raw().transitions);
        assert_ne!(first, second);

        first.add_transition("0", "A", "A").unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_duplicate_final_state() {
        let mut a = Automaton::new();
        a.add_final_state("F").unwrap();
        let designation = a.add_final_state("f").unwrap();
        assert!(!designation.auto_declared);
        assert!(!designation.changed);
        assert_eq!(a.final_states().len(), 1);
    }

    #[test]
    fn test_transition_requires_declarations() {
        let mut a = Automaton::new();
        a.declare_symbol("0").unwrap();
        a.declare_state("A").unwrap();

        assert_eq!(
            a.add_transition("1", "A", "A"),
            Err(CoreError::UndeclaredSymbol {
                symbol: "1".to_string()
            })
        );
        assert_eq!(
            a.add_transition("0", "x", "A"),
            Err(CoreError::UndeclaredState {
                state: "X".to_string()
            })
        );
        assert_eq!(
            a.add_transition("0", "A", "y"),
            Err(CoreError::UndeclaredState {
                state: "Y".to_string()
            })
        );
        // Symbol is checked first.
        assert!(matches!(
            a.add_transition("9", "x", "y"),
            Err(CoreError::UndeclaredSymbol { .. })
        ));
        assert_eq!(a.transitions().len(), 0);
    }

    #[test]
    fn test_transition_redefinition_replaces() {
        let mut a = sample_automaton();
        assert_eq!(a.transitions().len(), 4);

        let replaced = a.add_transition("0", "a", "b").unwrap();
        assert_eq!(replaced, Some(state("A")));
        assert_eq!(a.transitions().len(), 4);
        assert_eq!(a.next_state(sym("0"), &state("A")), Some(&state("B")));

        // Redefined transition moves to the end.
        let last = a.transitions().last().unwrap();
        assert_eq!(last.to_string(), "0 A -> B");
    }

    #[test]
    fn test_remove_transition() {
        let mut a = sample_automaton();
        assert_eq!(
            a.remove_transition(sym("0"), &state("B")),
            Some(state("B"))
        );
        assert!(a.next_state(sym("0"), &state("B")).is_none());
        assert!(a.remove_transition(sym("0"), &state("B")).is_none());
    }

    #[test]
    fn test_clear_is_total() {
        let mut a = sample_automaton();
        a.clear();

        assert!(a.is_empty());
        assert_eq!(a.symbols().len(), 0);
        assert_eq!(a.states().len(), 0);
        assert_eq!(a.final_states().len(), 0);
        assert_eq!(a.transitions().len(), 0);
        assert!(a.initial_state().is_none());

        // The next declared state becomes initial again.
        a.declare_state("Z").unwrap();
        assert_eq!(a.initial_state(), Some(&state("Z")));
    }

    #[test]
    fn test_raw_roundtrip() {
        let a = sample_automaton();
        let raw = a.to_raw();
        let restored = Automaton::from_raw(raw.clone()).unwrap();
        assert_eq!(restored.to_raw(), raw);
        assert_eq!(restored, a);
    }

    #[test]
    fn test_from_raw_rejects_broken_invariants() {
        let base = sample_automaton().to_raw();

        let mut raw = base.clone();
        raw.initial = Some(state("C"));
        assert!(matches!(
            Automaton::from_raw(raw),
            Err(CoreError::InvalidDefinition { .. })
        ));

        let mut raw = base.clone();
        raw.transitions.push(Transition {
            symbol: sym("0"),
            from: state("A"),
            to: state("B"),
        });
        assert!(matches!(
            Automaton::from_raw(raw),
            Err(CoreError::InvalidDefinition { .. })
        ));

        let mut raw = base.clone();
        raw.states.push(state("A"));
        assert!(matches!(
            Automaton::from_raw(raw),
            Err(CoreError::InvalidDefinition { .. })
        ));

        let mut raw = base;
        raw.initial = None;
        assert!(matches!(
            Automaton::from_raw(raw),
            Err(CoreError::InvalidDefinition { .. })
        ));
    }

    #[test]
    fn test_from_raw_rejects_malformed_names() {
        let json = serde_json::json!({
            "symbols": ["a"],
            "states": [],
            "finals": [],
            "transitions": []
        });
        let raw: AutomatonRaw = serde_json::from_value(json).unwrap();
        assert!(matches!(
            Automaton::from_raw(raw),
            Err(CoreError::InvalidDefinition { .. })
        ));
    }

    #[test]
    fn test_display() {
        let a = sample_automaton();
        let text = a.to_string();
        assert_eq!(
            text,
            "SYMBOLS: 0 1\n\
             STATES: A (initial) B (final)\n\
             INITIAL STATE: A\n\
             FINAL STATES: B\n\
             TRANSITIONS:\n  0 A -> A\n  1 A -> B\n  0 B -> B\n  1 B -> A"
        );

        let empty = Automaton::new().to_string();
        assert!(empty.starts_with("SYMBOLS: (none)\n"));
        assert!(empty.ends_with("TRANSITIONS: (none)"));
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;
        use std::collections::HashMap;

        const SYMBOLS: [&str; 4] = ["0", "1", "2", "9"];
        const STATES: [&str; 4] = ["A", "B", "C", "Z"];

        fn base() -> Automaton {
            let mut a = Automaton::new();
            for s in &SYMBOLS[..3] {
                a.declare_symbol(s).unwrap();
            }
            for s in &STATES[..3] {
                a.declare_state(s).unwrap();
            }
            a
        }

        proptest! {
            #[test]
            fn transitions_stay_functional(
                ops in proptest::collection::vec((0usize..4, 0usize..4, 0usize..4), 0..64)
            ) {
                let mut a = base();
                let mut expected: HashMap<(&str, &str), &str> = HashMap::new();

                for (s, from, to) in ops {
                    let result = a.add_transition(SYMBOLS[s], STATES[from], STATES[to]);
                    let valid = s < 3 && from < 3 && to < 3;
                    prop_assert_eq!(result.is_ok(), valid);
                    if valid {
                        expected.insert((SYMBOLS[s], STATES[from]), STATES[to]);
                    }
                }

                prop_assert_eq!(a.transitions().len(), expected.len());
                for s in &SYMBOLS[..3] {
                    for from in &STATES[..3] {
                        let actual = a.next_state(sym(s), &state(from)).map(State::as_str);
                        prop_assert_eq!(actual, expected.get(&(*s, *from)).copied());
                    }
                }
            }

            #[test]
            fn state_declaration_is_idempotent(
                names in proptest::collection::vec("[a-c][0-2]?", 1..16)
            ) {
                let mut once = Automaton::new();
                let mut twice = Automaton::new();
                for name in &names {
                    once.declare_state(name).unwrap();
                    twice.declare_state(name).unwrap();
                    twice.declare_state(name).unwrap();
                }
                prop_assert_eq!(once.to_raw(), twice.to_raw());
            }
        }
    }
}
