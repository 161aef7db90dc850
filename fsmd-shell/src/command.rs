//! Command language.
//!
//! A command line is cut at its first `;`, trimmed and split on whitespace.
//! The first word is the verb (case-insensitive), the rest are arguments.

use std::path::PathBuf;

/// A parsed command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// `SYMBOLS <tok>*` - declare symbols, or list them without arguments.
    Symbols(Vec<String>),
    /// `STATES <name>*` - declare states, or list them without arguments.
    States(Vec<String>),
    /// `INITIAL-STATE <name>?` - set the initial state, or show it.
    InitialState(Option<String>),
    /// `FINAL-STATES <name>*` - mark final states, or list them.
    FinalStates(Vec<String>),
    /// `TRANSITIONS <sym> <from> <to>, ...` - one entry per comma-separated
    /// triple, as written. Lists transitions without arguments.
    Transitions(Vec<String>),
    /// `EXECUTE <input>?`
    Execute(Option<String>),
    /// `PRINT <file>?` - text export to stdout, or to a file resolved like
    /// snapshot names.
    Print(Option<PathBuf>),
    /// `CLEAR`
    Clear,
    /// `LOG <file>?` - start the session log, or stop it.
    Log(Option<PathBuf>),
    /// `COMPILE <file>` - write a snapshot.
    Compile(Option<PathBuf>),
    /// `LOAD <file>` - restore a snapshot.
    Load(Option<PathBuf>),
    /// `EXIT`
    Exit,
    /// Anything else; holds the uppercased verb.
    Unknown(String),
}

impl Command {
    /// Parses a command line. Returns `None` if nothing precedes the first `;`.
    pub fn parse(line: &str) -> Option<Self> {
        let mut tokens = statement_text(line).split_whitespace();
        let verb = tokens.next()?.to_uppercase();
        let args: Vec<&str> = tokens.collect();

        let owned = |args: &[&str]| args.iter().map(|s| s.to_string()).collect::<Vec<_>>();
        let first = args.first().map(|s| s.to_string());
        let first_path = args.first().map(|s| PathBuf::from(*s));

        let command = match verb.as_str() {
            "SYMBOLS" => Command::Symbols(owned(&args)),
            "STATES" => Command::States(owned(&args)),
            "INITIAL-STATE" => Command::InitialState(first),
            "FINAL-STATES" => Command::FinalStates(owned(&args)),
            "TRANSITIONS" => Command::Transitions(
                args.join(" ")
                    .split(',')
                    .map(str::trim)
                    .filter(|triple| !triple.is_empty())
                    .map(str::to_string)
                    .collect(),
            ),
            "EXECUTE" => Command::Execute(first),
            "PRINT" => Command::Print(first_path),
            "CLEAR" => Command::Clear,
            "LOG" => Command::Log(first_path),
            "COMPILE" => Command::Compile(first_path),
            "LOAD" => Command::Load(first_path),
            "EXIT" => Command::Exit,
            _ => Command::Unknown(verb),
        };

        Some(command)
    }

    /// Returns the verb as written in the command language.
    pub fn verb(&self) -> &str {
        match self {
            Command::Symbols(_) => "SYMBOLS",
            Command::States(_) => "STATES",
            Command::InitialState(_) => "INITIAL-STATE",
            Command::FinalStates(_) => "FINAL-STATES",
            Command::Transitions(_) => "TRANSITIONS",
            Command::Execute(_) => "EXECUTE",
            Command::Print(_) => "PRINT",
            Command::Clear => "CLEAR",
            Command::Log(_) => "LOG",
            Command::Compile(_) => "COMPILE",
            Command::Load(_) => "LOAD",
            Command::Exit => "EXIT",
            Command::Unknown(verb) => verb,
        }
    }
}

/// Returns the trimmed text of a line before its first `;`.
pub fn statement_text(line: &str) -> &str {
    match line.find(';') {
        Some(end) => line[..end].trim(),
        None => line.trim(),
    }
}
