//! Configuration commands.

use std::path::Path;

use clap::Subcommand;
use console::style;
use dialoguer::{Confirm, Input};

use sg_core::config::{AppConfig, ConfigHandle};
use sg_core::error::{SgError, SgResult};
use crate::OutputFormat;

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show the effective configuration.
    Show,
    /// Write a configuration file, prompting for missing backend ids.
    Init {
        /// Backend endpoint URL.
        #[arg(long)]
        endpoint: Option<String>,
        /// Project ID.
        #[arg(long)]
        project_id: Option<String>,
        /// Database ID.
        #[arg(long)]
        database_id: Option<String>,
        /// Storage bucket ID.
        #[arg(long)]
        storage_id: Option<String>,
        /// Overwrite an existing file without asking.
        #[arg(long)]
        force: bool,
    },
}

fn prompt(label: &str, current: &str) -> SgResult<String> {
    Input::new()
        .with_prompt(label)
        .with_initial_text(current)
        .allow_empty(true)
        .interact_text()
        .map_err(|e| SgError::Internal(e.to_string()))
}

pub async fn run(
    config: ConfigHandle,
    path: &Path,
    action: ConfigAction,
    format: OutputFormat,
) -> SgResult<()> {
    match action {
        ConfigAction::Show => {
            let cfg = config.read().await;
            match format {
                OutputFormat::Json => super::print_json(&*cfg),
                OutputFormat::Text => {
                    println!("{} {}", style("Config file:").bold(), path.display());
                    let missing = cfg.backend.missing_fields();
                    if !missing.is_empty() {
                        println!(
                            "{} missing backend fields: {}",
                            style("!!").yellow().bold(),
                            missing.join(", ")
                        );
                    }
                    let rendered = toml::to_string_pretty(&*cfg)
                        .map_err(|e| SgError::Serialization(e.to_string()))?;
                    println!("\n{rendered}");
                }
            }
        }
        ConfigAction::Init { endpoint, project_id, database_id, storage_id, force } => {
            if path.exists() && !force {
                let overwrite = Confirm::new()
                    .with_prompt(format!("  {} exists. Overwrite?", path.display()))
                    .default(false)
                    .interact()
                    .unwrap_or(false);
                if !overwrite {
                    println!("  Init cancelled.");
                    return Ok(());
                }
            }

            let mut cfg = config.write().await;
            let endpoint = match endpoint {
                Some(e) => e,
                None => prompt("Endpoint", &cfg.backend.endpoint)?,
            };
            cfg.backend.endpoint = AppConfig::sanitize_endpoint(&endpoint);
            cfg.backend.project_id = match project_id {
                Some(p) => p,
                None => prompt("Project ID", &cfg.backend.project_id)?,
            };
            cfg.backend.database_id = match database_id {
                Some(d) => d,
                None => prompt("Database ID", &cfg.backend.database_id)?,
            };
            cfg.backend.storage_id = match storage_id {
                Some(s) => s,
                None => prompt("Storage bucket ID", &cfg.backend.storage_id)?,
            };
            cfg.save_to_file(path)?;

            println!("{} Wrote {}.", style("OK").green().bold(), path.display());
            let missing = cfg.backend.missing_fields();
            if !missing.is_empty() {
                println!("  Still to fill in: {}", missing.join(", "));
            }
        }
    }

    Ok(())
}
