use std::path::{Path, PathBuf};

use alarm_core::storage::Config;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "alarm-cli", version, about = "Alarm scheduling demo")]
struct Cli {
    /// Configuration file (default: <config_dir>/alarm-demo/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Alarm file, overrides `store_path` from the configuration
    #[arg(long, global = true)]
    store: Option<PathBuf>,
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the scripted demo (default when no subcommand is given)
    Demo,
    /// Alarm management for one user
    Alarm {
        #[command(subcommand)]
        action: commands::alarm::AlarmAction,
    },
    /// Configuration file management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(
    config_path: Option<&Path>,
    store: Option<&Path>,
) -> Result<Config, Box<dyn std::error::Error>> {
    let mut config = match config_path {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    if let Some(store) = store {
        config.store_path = store.to_path_buf();
    }
    tracing::debug!(store = %config.store_path.display(), "configuration loaded");
    Ok(config)
}

fn main() {
    init_logging();

    let Cli {
        config,
        store,
        command,
    } = Cli::parse();
    let result = match command {
        Some(Commands::Config { action }) => {
            commands::config::run(action, config.as_deref(), store.as_deref())
        }
        None | Some(Commands::Demo) => {
            load_config(config.as_deref(), store.as_deref()).and_then(|c| commands::demo::run(&c))
        }
        Some(Commands::Alarm { action }) => load_config(config.as_deref(), store.as_deref())
            .and_then(|c| commands::alarm::run(action, &c)),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
