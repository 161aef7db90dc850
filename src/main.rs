//! fsmd - FSM Designer
//!
//! Interactive and batch designer for deterministic finite-state automata.

use clap::Parser;
use colored::Colorize;
use fsmd_shell::{repl, run_script, CommandHandler, Config};
use fsmd_storage::SnapshotStore;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "fsmd")]
#[command(about = "Design and run deterministic finite-state automata")]
#[command(version)]
struct Cli {
    /// Script of `;`-terminated commands to run instead of the prompt
    script: Option<PathBuf>,

    /// Configuration file
    #[arg(short, long, env = "FSMD_CONFIG")]
    config: Option<PathBuf>,

    /// Start a session log immediately
    #[arg(short, long)]
    log: Option<PathBuf>,

    /// Disable colored output
    #[arg(long)]
    no_color: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Load configuration (file from --config or FSMD_CONFIG, then env overrides)
    let config = match Config::load(cli.config.as_deref()) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("{}: {}", "Error".red(), e);
            std::process::exit(1);
        }
    };

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.log.level)),
        )
        .with_writer(std::io::stderr)
        .init();

    if cli.no_color || !config.shell.color {
        colored::control::set_override(false);
    }

    println!(
        "{} {} {}",
        "FSM DESIGNER".bold(),
        env!("CARGO_PKG_VERSION"),
        chrono::Local::now().format("%B %-d, %Y %H:%M")
    );

    let store = SnapshotStore::open(&config.storage.snapshot_dir)?;
    tracing::debug!("Snapshot directory: {}", store.dir().display());
    let mut handler = CommandHandler::new(store);

    if let Some(path) = cli.log.as_ref().or(config.log.session_file.as_ref()) {
        match handler.start_session_log(path) {
            Ok(()) => println!("Started logging to '{}'", path.display()),
            Err(e) => eprintln!("{}: {}", "Error".red(), e),
        }
    }

    match &cli.script {
        Some(script) => {
            if let Err(e) = run_script(&mut handler, script, repl::print_reply) {
                eprintln!("{}: {}", "Error".red(), e);
                if e.is_fatal() {
                    std::process::exit(1);
                }
            }
        }
        None => repl::run(&mut handler, &config.shell)?,
    }

    Ok(())
}
