//! CLI command implementations

use anyhow::Result;
use clap::{ArgMatches, Command};

pub mod commands;

/// Main CLI application
pub struct CliApp;

impl CliApp {
    /// Create the CLI application
    pub fn app() -> Command {
        Command::new("append-resource-version")
            .version(env!("CARGO_PKG_VERSION"))
            .about("Pin manifests to the live resourceVersion before apply")
            .subcommand(commands::patch::command())
            .subcommand(commands::inspect::command())
    }

    /// Run the CLI application
    pub async fn run(matches: &ArgMatches) -> Result<()> {
        match matches.subcommand() {
            Some(("patch", sub_matches)) => commands::patch::run(sub_matches).await,
            Some(("inspect", sub_matches)) => commands::inspect::run(sub_matches).await,
            // As a bare pipeline step everything comes from the environment
            _ => commands::patch::run_from_env().await,
        }
    }
}

/// Common CLI utilities
pub mod utils {
    use anyhow::Result;
    use std::path::PathBuf;
    use tracing::{debug, info};

    use crate::PatcherConfig;

    /// `--config` and `--manifest-dir`, shared by every command
    pub fn common_args(command: clap::Command) -> clap::Command {
        command
            .arg(
                clap::Arg::new("config")
                    .short('c')
                    .long("config")
                    .help("Configuration file path")
                    .value_name("FILE"),
            )
            .arg(
                clap::Arg::new("manifest-dir")
                    .short('d')
                    .long("manifest-dir")
                    .help("Directory of manifests to patch [default: $MANIFEST_DIR]")
                    .value_name("DIR"),
            )
    }

    /// Configuration file to use: the explicit one, else the first default
    /// location that exists
    pub fn get_config_path(explicit: Option<&String>) -> Option<PathBuf> {
        if let Some(config_path) = explicit {
            return Some(PathBuf::from(config_path));
        }

        let mut default_paths = vec![
            PathBuf::from(".append-resource-version.yaml"),
            PathBuf::from(".append-resource-version.yml"),
        ];
        if let Ok(config_dir) = crate::utils::get_config_dir() {
            default_paths.push(config_dir.join("config.yaml"));
        }

        default_paths.into_iter().find(|path| path.exists())
    }

    /// Defaults, then the config file, then the environment
    pub fn base_config(explicit: Option<&String>) -> Result<PatcherConfig> {
        let mut config = match get_config_path(explicit) {
            Some(path) => {
                info!("Loading configuration from {:?}", path);
                PatcherConfig::from_file(&path)?
            }
            None => {
                debug!("No configuration file found, using defaults");
                PatcherConfig::default()
            }
        };

        config.apply_env();
        Ok(config)
    }

    /// Load configuration for a command, with its flags applied last
    pub fn load_config(matches: &clap::ArgMatches) -> Result<PatcherConfig> {
        let mut config = base_config(matches.get_one::<String>("config"))?;

        if let Some(dir) = matches.get_one::<String>("manifest-dir") {
            config.manifest_dir = PathBuf::from(dir);
        }

        Ok(config)
    }
}
