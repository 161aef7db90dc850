//! Command handler.
//!
//! Owns the automaton and dispatches parsed commands against it. Every
//! command produces a [`Reply`]; failures become `Error:` lines and never
//! leave the command loop.

use crate::command::{statement_text, Command};
use crate::error::ShellError;
use crate::session::SessionLog;
use colored::Colorize;
use fsmd_core::{Automaton, CoreError, Declared};
use fsmd_storage::{export_text, SnapshotStore};
use std::fmt;
use std::path::{Path, PathBuf};

/// Severity of a reply line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Info,
    Warning,
    Error,
}

/// A single line of output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub level: Level,
    pub text: String,
    /// Stable code of the core error behind an `Error:` line.
    pub code: Option<&'static str>,
}

impl Message {
    pub fn info(text: impl Into<String>) -> Self {
        Self {
            level: Level::Info,
            text: text.into(),
            code: None,
        }
    }

    pub fn warning(text: impl Into<String>) -> Self {
        Self {
            level: Level::Warning,
            text: text.into(),
            code: None,
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            level: Level::Error,
            text: text.into(),
            code: None,
        }
    }

    /// Builds an error line from a core error, keeping its code.
    pub fn from_core(e: &CoreError) -> Self {
        tracing::debug!("Command failed with {}: {}", e.error_code(), e);
        Self {
            level: Level::Error,
            text: e.to_string(),
            code: Some(e.error_code()),
        }
    }

    /// Renders the message for the terminal.
    pub fn render(&self) -> String {
        match self.level {
            Level::Info => self.text.clone(),
            Level::Warning => format!("{}: {}", "Warning".yellow(), self.text),
            Level::Error => format!("{}: {}", "Error".red(), self.text),
        }
    }
}

/// Plain rendering, as written to the session log.
impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.level {
            Level::Info => write!(f, "{}", self.text),
            Level::Warning => write!(f, "Warning: {}", self.text),
            Level::Error => write!(f, "Error: {}", self.text),
        }
    }
}

/// Output of one command.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Reply {
    pub messages: Vec<Message>,
    /// Set by `EXIT`.
    pub exit: bool,
}

impl Reply {
    fn push(&mut self, message: Message) {
        self.messages.push(message);
    }

    /// Returns true if any line is an error.
    pub fn has_errors(&self) -> bool {
        self.messages.iter().any(|m| m.level == Level::Error)
    }
}

/// Command handler.
pub struct CommandHandler {
    automaton: Automaton,
    store: SnapshotStore,
    session: SessionLog,
}

impl CommandHandler {
    /// Creates a handler with an empty automaton.
    pub fn new(store: SnapshotStore) -> Self {
        Self {
            automaton: Automaton::new(),
            store,
            session: SessionLog::new(),
        }
    }

    /// Returns the automaton being designed.
    pub fn automaton(&self) -> &Automaton {
        &self.automaton
    }

    /// Starts the session log, as `LOG <file>` does.
    pub fn start_session_log(&mut self, path: impl AsRef<Path>) -> Result<(), ShellError> {
        self.session.start(path)
    }

    /// Parses and dispatches one command line, recording it and its output
    /// to the session log. Returns `None` for blank lines.
    pub fn handle_line(&mut self, line: &str) -> Option<Reply> {
        let command = Command::parse(line)?;

        let mut log_failure = self.session.record(statement_text(line)).err();
        let mut reply = self.handle(command);

        for message in &reply.messages {
            if log_failure.is_some() {
                break;
            }
            log_failure = self.session.record(&message.to_string()).err();
        }
        if let Some(e) = log_failure {
            tracing::warn!("Session log write failed: {}", e);
            reply.push(Message::error(e.to_string()));
        }

        Some(reply)
    }

    /// Dispatches a parsed command.
    pub fn handle(&mut self, command: Command) -> Reply {
        tracing::debug!("Dispatching {}", command.verb());

        let mut reply = Reply::default();
        let result = match command {
            Command::Symbols(tokens) => self.handle_symbols(&tokens, &mut reply),
            Command::States(names) => self.handle_states(&names, &mut reply),
            Command::InitialState(name) => self.handle_initial_state(name.as_deref(), &mut reply),
            Command::FinalStates(names) => self.handle_final_states(&names, &mut reply),
            Command::Transitions(triples) => self.handle_transitions(&triples, &mut reply),
            Command::Execute(input) => self.handle_execute(input.as_deref(), &mut reply),
            Command::Print(path) => self.handle_print(path, &mut reply),
            Command::Clear => {
                self.automaton.clear();
                reply.push(Message::info("FSM cleared."));
                Ok(())
            }
            Command::Log(path) => self.handle_log(path, &mut reply),
            Command::Compile(path) => self.handle_compile(path, &mut reply),
            Command::Load(path) => self.handle_load(path, &mut reply),
            Command::Exit => {
                reply.push(Message::info("TERMINATED BY USER"));
                reply.exit = true;
                Ok(())
            }
            Command::Unknown(verb) => {
                reply.push(Message::warning(format!("Invalid command '{}'", verb)));
                Ok(())
            }
        };

        match result {
            Ok(()) => {}
            Err(ShellError::Core(e)) => reply.push(Message::from_core(&e)),
            Err(e) => reply.push(Message::error(e.to_string())),
        }
        reply
    }

    fn handle_symbols(&mut self, tokens: &[String], reply: &mut Reply) -> Result<(), ShellError> {
        if tokens.is_empty() {
            let listed = join(self.automaton.symbols());
            reply.push(Message::info(format!("SYMBOLS: {}", listed)));
            return Ok(());
        }

        let mut declared = Vec::new();
        for token in tokens {
            match self.automaton.declare_symbol(token) {
                Ok(Declared::New) => declared.push(token.to_uppercase()),
                Ok(Declared::Existing) => reply.push(Message::warning(format!(
                    "Symbol '{}' already declared",
                    token.to_uppercase()
                ))),
                Err(e) => reply.push(Message::from_core(&e)),
            }
        }
        if !declared.is_empty() {
            reply.push(Message::info(format!(
                "Declared symbols: {}",
                declared.join(" ")
            )));
        }
        Ok(())
    }

    fn handle_states(&mut self, names: &[String], reply: &mut Reply) -> Result<(), ShellError> {
        if names.is_empty() {
            let listed = join(self.automaton.states());
            reply.push(Message::info(format!("STATES: {}", listed)));
            return Ok(());
        }

        let mut declared = Vec::new();
        for name in names {
            match self.automaton.declare_state(name) {
                Ok(Declared::New) => declared.push(name.to_uppercase()),
                Ok(Declared::Existing) => reply.push(Message::warning(format!(
                    "State '{}' already declared",
                    name.to_uppercase()
                ))),
                Err(e) => reply.push(Message::from_core(&e)),
            }
        }
        if !declared.is_empty() {
            reply.push(Message::info(format!(
                "Declared states: {}",
                declared.join(" ")
            )));
        }
        Ok(())
    }

    fn handle_initial_state(
        &mut self,
        name: Option<&str>,
        reply: &mut Reply,
    ) -> Result<(), ShellError> {
        let Some(name) = name else {
            let initial = self
                .automaton
                .initial_state()
                .map(|s| s.to_string())
                .unwrap_or_else(|| "(none)".to_string());
            reply.push(Message::info(format!("INITIAL STATE: {}", initial)));
            return Ok(());
        };

        let designation = self.automaton.set_initial_state(name)?;
        let state = name.to_uppercase();
        if designation.auto_declared {
            reply.push(Message::warning(format!(
                "State '{}' was not declared; declared it",
                state
            )));
        }
        reply.push(Message::info(format!("Initial state: {}", state)));
        Ok(())
    }

    fn handle_final_states(
        &mut self,
        names: &[String],
        reply: &mut Reply,
    ) -> Result<(), ShellError> {
        if names.is_empty() {
            let listed = join(self.automaton.final_states());
            reply.push(Message::info(format!("FINAL STATES: {}", listed)));
            return Ok(());
        }

        let mut marked = Vec::new();
        for name in names {
            let state = name.to_uppercase();
            match self.automaton.add_final_state(name) {
                Ok(designation) => {
                    if designation.auto_declared {
                        reply.push(Message::warning(format!(
                            "State '{}' was not declared; declared it",
                            state
                        )));
                    }
                    if designation.changed {
                        marked.push(state);
                    } else {
                        reply.push(Message::warning(format!(
                            "State '{}' already declared as a final state",
                            state
                        )));
                    }
                }
                Err(e) => reply.push(Message::from_core(&e)),
            }
        }
        if !marked.is_empty() {
            reply.push(Message::info(format!(
                "Declared final states: {}",
                marked.join(" ")
            )));
        }
        Ok(())
    }

    fn handle_transitions(
        &mut self,
        triples: &[String],
        reply: &mut Reply,
    ) -> Result<(), ShellError> {
        if triples.is_empty() {
            if self.automaton.transitions().len() == 0 {
                reply.push(Message::info("TRANSITIONS: (none)"));
            } else {
                reply.push(Message::info("TRANSITIONS:"));
                for t in self.automaton.transitions() {
                    reply.push(Message::info(format!("  {}", t)));
                }
            }
            return Ok(());
        }

        for triple in triples {
            let parts: Vec<&str> = triple.split_whitespace().collect();
            let &[symbol, from, to] = parts.as_slice() else {
                let e = ShellError::MalformedTransition(triple.clone());
                reply.push(Message::error(e.to_string()));
                continue;
            };

            match self.automaton.add_transition(symbol, from, to) {
                Ok(replaced) => {
                    let (symbol, from, to) =
                        (symbol.to_uppercase(), from.to_uppercase(), to.to_uppercase());
                    if let Some(previous) = replaced {
                        reply.push(Message::warning(format!(
                            "Transition {} {} -> {} replaced",
                            symbol, from, previous
                        )));
                    }
                    reply.push(Message::info(format!(
                        "Transition {} {} -> {} defined",
                        symbol, from, to
                    )));
                }
                Err(e) => reply.push(Message::from_core(&e)),
            }
        }
        Ok(())
    }

    fn handle_execute(&mut self, input: Option<&str>, reply: &mut Reply) -> Result<(), ShellError> {
        let execution = self.automaton.execute(input);
        if let Some(e) = &execution.error {
            reply.push(Message::from_core(e));
        }
        reply.push(Message::info(execution.to_string()));
        Ok(())
    }

    fn handle_print(&mut self, path: Option<PathBuf>, reply: &mut Reply) -> Result<(), ShellError> {
        match path {
            None => {
                for line in self.automaton.to_string().lines() {
                    reply.push(Message::info(line));
                }
            }
            Some(path) => {
                let path = self.store.resolve(path);
                export_text(&path, &self.automaton)?;
                reply.push(Message::info(format!("Printed to '{}'", path.display())));
            }
        }
        Ok(())
    }

    fn handle_log(&mut self, path: Option<PathBuf>, reply: &mut Reply) -> Result<(), ShellError> {
        match path {
            Some(path) => {
                self.session.start(&path)?;
                reply.push(Message::info(format!(
                    "Started logging to '{}'",
                    path.display()
                )));
            }
            None => match self.session.stop()? {
                Some(_) => reply.push(Message::info("Stopped logging.")),
                None => reply.push(Message::warning("Logging is not active")),
            },
        }
        Ok(())
    }

    fn handle_compile(&mut self, path: Option<PathBuf>, reply: &mut Reply) -> Result<(), ShellError> {
        let path = path.ok_or(ShellError::MissingArgument("file name"))?;
        let meta = self.store.save(&path, &self.automaton)?;
        reply.push(Message::info(format!(
            "Compiled to '{}' ({} bytes)",
            meta.path.display(),
            meta.size_bytes
        )));
        Ok(())
    }

    fn handle_load(&mut self, path: Option<PathBuf>, reply: &mut Reply) -> Result<(), ShellError> {
        let path = path.ok_or(ShellError::MissingArgument("file name"))?;
        self.automaton = self.store.load(&path)?;
        reply.push(Message::info(format!(
            "Loaded '{}'",
            self.store.resolve(&path).display()
        )));
        Ok(())
    }
}

fn join<T: fmt::Display>(items: impl ExactSizeIterator<Item = T>) -> String {
    if items.len() == 0 {
        return "(none)".to_string();
    }
    items.map(|i| i.to_string()).collect::<Vec<_>>().join(" ")
}
