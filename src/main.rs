//! Replays a JSON action script against a session config and prints the
//! resulting editor state.

use std::path::{Path, PathBuf};

use clap::{Parser, ValueEnum};
use region_annotator::{Action, Annotator, ConfigError, EditorState, LogLevel, SessionConfig};

#[derive(Parser)]
#[command(
    name = "annotator-replay",
    version,
    about = "Replay annotation editor actions against a session"
)]
struct Cli {
    /// Session configuration (JSON).
    #[arg(long, value_name = "PATH")]
    session: PathBuf,

    /// Action script: a JSON array of actions.
    #[arg(long, value_name = "PATH")]
    actions: PathBuf,

    /// Log level (overrides the one in the session file).
    #[arg(long = "log-level", value_enum)]
    log_level: Option<LogLevelArg>,

    /// Print the history entry names after the final state.
    #[arg(long)]
    show_history: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevelArg> for LogLevel {
    fn from(level: LogLevelArg) -> Self {
        match level {
            LogLevelArg::Error => LogLevel::Error,
            LogLevelArg::Warn => LogLevel::Warn,
            LogLevelArg::Info => LogLevel::Info,
            LogLevelArg::Debug => LogLevel::Debug,
            LogLevelArg::Trace => LogLevel::Trace,
        }
    }
}

fn load_actions(path: &Path) -> Result<Vec<Action>, ConfigError> {
    let json = std::fs::read_to_string(path).map_err(|e| ConfigError::io(path, e))?;
    Ok(serde_json::from_str(&json)?)
}

/// Print a terminal callback as one JSON line.
fn emit(callback: &str, state: &EditorState) {
    let line = serde_json::json!({ "callback": callback, "state": state });
    println!("{line}");
}

fn run(cli: &Cli) -> Result<(), ConfigError> {
    let config = SessionConfig::load(&cli.session)?;
    let level = cli.log_level.map(LogLevel::from).unwrap_or(config.log_level);
    env_logger::Builder::new()
        .filter_level(level.to_level_filter())
        .init();

    let actions = load_actions(&cli.actions)?;
    let mut annotator = Annotator::try_new(&config)?
        .on_exit(|state| emit("onExit", &state))
        .on_next_image(|state| emit("onNextImage", &state))
        .on_prev_image(|state| emit("onPrevImage", &state));

    if let Some(text) = annotator.placeholder() {
        eprintln!("{text}");
        return Ok(());
    }

    log::info!("Replaying {} actions", actions.len());
    for action in &actions {
        annotator.dispatch(action);
    }

    println!("{}", serde_json::to_string_pretty(annotator.state())?);
    if cli.show_history {
        for (index, entry) in annotator.history().entries().iter().enumerate() {
            println!("{index}: {}", entry.name);
        }
    }
    Ok(())
}

fn main() {
    let cli = Cli::parse();
    let exit_code = match run(&cli) {
        Ok(()) => 0,
        Err(error) => {
            eprintln!("error: {error}");
            1
        }
    };
    std::process::exit(exit_code);
}
