use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use chatline::config::Config;
use chatline::history::HistoryStore;
use chatline::{dispatch, handler, tui, ui, App, ChatClient};

#[derive(Parser)]
#[command(name = "chatline")]
#[command(about = "Chat with a remote assistant from the terminal", version)]
struct Cli {
    /// Chat endpoint to POST messages to
    #[arg(short, long, global = true)]
    endpoint: Option<String>,
    /// History file (defaults to the user data directory)
    #[arg(long, global = true)]
    history: Option<PathBuf>,
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Forget the saved conversation
    Clear,
    /// Show where settings live and what is in effect
    Config {
        /// Save the effective settings to the config file
        #[arg(long)]
        write: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = Config::load().unwrap_or_else(|e| {
        eprintln!("Ignoring unreadable config: {}", e);
        Config::new()
    });
    if cli.endpoint.is_some() {
        config.endpoint = cli.endpoint;
    }
    if cli.history.is_some() {
        config.history_path = cli.history;
    }

    match cli.command {
        None => run_chat(&config).await,
        Some(Commands::Clear) => {
            let store = config.history_store()?;
            store.clear()?;
            println!("Cleared {}", store.path().display());
            Ok(())
        }
        Some(Commands::Config { write }) => {
            if write {
                config.save()?;
            }
            println!("config file: {}", Config::get_config_path()?.display());
            println!("endpoint:    {}", config.endpoint());
            println!("history:     {}", config.history_path()?.display());
            println!("title:       {}", config.title());
            println!("greeting:    {}", config.greeting());
            Ok(())
        }
    }
}

fn log_path() -> Result<PathBuf> {
    Ok(HistoryStore::default_path()?.with_file_name("chatline.log"))
}

/// Log to a file, the terminal belongs to the UI
fn init_logging(log_path: &Path) -> Result<()> {
    if let Some(parent) = log_path.parent() {
        fs::create_dir_all(parent)?;
    }
    let log_file = File::options()
        .create(true)
        .append(true)
        .open(log_path)
        .with_context(|| format!("opening {}", log_path.display()))?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_ansi(false)
        .with_writer(Mutex::new(log_file))
        .init();
    Ok(())
}

async fn run_chat(config: &Config) -> Result<()> {
    // The chat still works without a log file
    if let Err(e) = log_path().and_then(|path| init_logging(&path)) {
        eprintln!("Logging disabled: {:#}", e);
    }

    let store = config.history_store()?;
    tracing::info!(history = %store.path().display(), endpoint = config.endpoint(), "starting chat");

    let mut app = App::new(store, config.title());
    let client = ChatClient::new(config.endpoint());

    tui::install_panic_hook();
    let mut terminal = tui::init()?;
    let mut events = tui::EventHandler::new();

    let result = async {
        while !app.should_quit {
            terminal.draw(|frame| ui::render(&mut app, frame))?;

            let Some(event) = events.next().await else {
                break;
            };
            if let Some(effect) = handler::handle_event(&mut app, event) {
                dispatch::spawn(client.clone(), effect, events.sender());
            }
        }
        Ok::<(), anyhow::Error>(())
    }
    .await;

    tui::restore()?;
    tracing::info!("chat closed");
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_unopenable_log_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        // A directory can't be opened for appending
        assert!(init_logging(dir.path()).is_err());
    }

    #[test]
    fn test_config_subcommand_flags() {
        let cli = Cli::try_parse_from(["chatline", "config", "--write"]).unwrap();
        assert!(matches!(cli.command, Some(Commands::Config { write: true })));

        let cli = Cli::try_parse_from(["chatline", "--endpoint", "http://x/chat"]).unwrap();
        assert!(cli.command.is_none());
        assert_eq!(cli.endpoint.as_deref(), Some("http://x/chat"));
    }
}
