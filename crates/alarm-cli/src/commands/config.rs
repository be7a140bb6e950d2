//! Configuration file commands for CLI.

use std::path::{Path, PathBuf};

use alarm_core::storage::Config;
use clap::Subcommand;

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Write a configuration file holding the default values
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
    /// Print the configuration file location
    Path,
}

/// `config_path` is the global `--config`; `store` the global `--store`.
pub fn run(
    action: ConfigAction,
    config_path: Option<&Path>,
    store: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    let path = match config_path {
        Some(path) => path.to_path_buf(),
        None => Config::default_path()?,
    };

    match action {
        ConfigAction::Init { force } => {
            if path.exists() && !force {
                return Err(format!(
                    "{} already exists (use --force to overwrite)",
                    path.display()
                )
                .into());
            }
            let mut config = Config::default();
            if let Some(store) = store {
                config.store_path = PathBuf::from(store);
            }
            config.save_to(&path)?;
            println!("config written to {}", path.display());
        }
        ConfigAction::Path => {
            println!("{}", path.display());
        }
    }
    Ok(())
}
