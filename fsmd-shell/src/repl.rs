//! Interactive REPL.

use crate::config::ShellConfig;
use crate::error::ShellError;
use crate::handler::{CommandHandler, Reply};
use colored::Colorize;
use rustyline::error::ReadlineError;
use rustyline::history::DefaultHistory;
use rustyline::{Config, Editor};

/// Prints every line of a reply to stdout.
pub fn print_reply(reply: &Reply) {
    for message in &reply.messages {
        println!("{}", message.render());
    }
}

/// Runs the interactive loop until `EXIT` or end of input.
pub fn run(handler: &mut CommandHandler, config: &ShellConfig) -> Result<(), ShellError> {
    let rl_config = Config::builder()
        .history_ignore_space(true)
        .auto_add_history(true)
        .build();
    let mut rl: Editor<(), DefaultHistory> = Editor::with_config(rl_config)?;

    let history_path = config.history_path();
    if let Some(path) = &history_path {
        if rl.load_history(path).is_err() {
            tracing::debug!("No history loaded from {}", path.display());
        }
    }

    loop {
        match rl.readline(&config.prompt) {
            Ok(line) => {
                let Some(reply) = handler.handle_line(&line) else {
                    continue;
                };
                print_reply(&reply);
                if reply.exit {
                    break;
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("^C");
                continue;
            }
            Err(ReadlineError::Eof) => {
                println!("^D");
                break;
            }
            Err(err) => {
                println!("{}: {:?}", "Error".red(), err);
                break;
            }
        }
    }

    if let Some(path) = &history_path {
        if let Err(e) = rl.save_history(path) {
            tracing::warn!("Failed to save history to {}: {}", path.display(), e);
        }
    }

    Ok(())
}
