//! Snapgram CLI - command-line front end for the Snapgram client layer.
//!
//! Every backend operation the application performs (accounts, posts,
//! saves, media and user lookups) is reachable from here, which makes the
//! CLI useful for scripting, seeding a project, and debugging sessions.

mod commands;

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use tracing::info;

use sg_core::config::{AppConfig, ConfigHandle};
use sg_core::error::SgResult;
use sg_core::logging;

/// Snapgram - social feed client backed by Appwrite.
#[derive(Parser)]
#[command(
    name = "snapgram",
    version,
    about = "Snapgram client CLI",
    long_about = "A command-line interface for the Snapgram client layer.\n\
                   Register, sign in, publish posts and browse the feed from a terminal."
)]
struct Cli {
    /// Path to the configuration file.
    #[arg(short, long, global = true)]
    config: Option<String>,

    /// Enable verbose logging (debug level).
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Log warnings to stderr only, without a log file.
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    /// Output format (text, json).
    #[arg(short = 'f', long, global = true, default_value = "text")]
    format: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

/// Output format for CLI responses.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output.
    Text,
    /// JSON output for scripting.
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Register, sign in and inspect the current session.
    Account {
        #[command(subcommand)]
        action: commands::account::AccountAction,
    },
    /// Publish, browse and manage posts.
    Posts {
        #[command(subcommand)]
        action: commands::posts::PostsAction,
    },
    /// Bookmark posts.
    Saves {
        #[command(subcommand)]
        action: commands::saves::SavesAction,
    },
    /// Upload, preview and delete media files.
    Files {
        #[command(subcommand)]
        action: commands::files::FilesAction,
    },
    /// Browse user profiles.
    Users {
        #[command(subcommand)]
        action: commands::users::UsersAction,
    },
    /// View or create the configuration file.
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
}

fn load_config(path: Option<&Path>) -> SgResult<(AppConfig, PathBuf)> {
    let path = match path {
        Some(p) => p.to_path_buf(),
        None => AppConfig::default_config_path()?,
    };
    let mut config = if path.exists() {
        AppConfig::load_from_file(&path)?
    } else {
        AppConfig::default()
    };
    config.apply_env_overrides();
    Ok((config, path))
}

#[tokio::main]
async fn main() -> SgResult<()> {
    let cli = Cli::parse();

    let (config, config_path) = load_config(cli.config.as_deref().map(Path::new))?;

    let _guard = if cli.quiet {
        logging::init_console_logging("warn");
        None
    } else {
        let log_dir = config
            .effective_log_dir()
            .unwrap_or_else(|_| PathBuf::from("logs"));
        Some(logging::init_from_config(&config.logging, &log_dir, cli.verbose)?)
    };

    let config_handle = ConfigHandle::new(config);

    info!("Snapgram CLI v{}", sg_core::constants::APP_VERSION);

    match cli.command {
        Commands::Account { action } => {
            commands::account::run(config_handle, action, cli.format).await
        }
        Commands::Posts { action } => {
            commands::posts::run(config_handle, action, cli.format).await
        }
        Commands::Saves { action } => {
            commands::saves::run(config_handle, action, cli.format).await
        }
        Commands::Files { action } => {
            commands::files::run(config_handle, action, cli.format).await
        }
        Commands::Users { action } => {
            commands::users::run(config_handle, action, cli.format).await
        }
        Commands::Config { action } => {
            commands::config::run(config_handle, &config_path, action, cli.format).await
        }
    }
}
