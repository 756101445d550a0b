//! Media file commands.

use std::path::PathBuf;
use std::time::Duration;

use clap::Subcommand;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};

use sg_core::config::ConfigHandle;
use sg_core::error::SgResult;
use sg_models::FileUpload;
use crate::OutputFormat;

#[derive(Subcommand)]
pub enum FilesAction {
    /// Upload a local file to the media bucket.
    Upload {
        /// Path of the file to upload.
        path: PathBuf,
    },
    /// Print the preview URL of a stored file.
    Preview {
        /// File ID.
        id: String,
    },
    /// Delete a stored file.
    Delete {
        /// File ID.
        id: String,
    },
}

/// Spinner shown while a file is uploading.
pub fn upload_spinner(name: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("  Uploading {spinner} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message(name.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

pub async fn run(config: ConfigHandle, action: FilesAction, format: OutputFormat) -> SgResult<()> {
    let registry = super::connect(&config).await?;

    match action {
        FilesAction::Upload { path } => {
            let upload = FileUpload::from_path(&path)?;
            let pb = upload_spinner(&upload.file_name);
            let result = registry.media.try_upload_file(upload).await;
            pb.finish_and_clear();
            let info = result?;

            match format {
                OutputFormat::Json => super::print_json(&info),
                OutputFormat::Text => {
                    println!(
                        "{} Uploaded {} ({} bytes) as {}.",
                        style("OK").green().bold(),
                        info.name,
                        info.size_original,
                        style(&info.id).cyan()
                    );
                }
            }
        }
        FilesAction::Preview { id } => {
            let url = registry.media.try_get_file_preview(&id)?;
            match format {
                OutputFormat::Json => super::print_json(&serde_json::json!({ "id": id, "url": url.as_str() })),
                OutputFormat::Text => println!("{url}"),
            }
        }
        FilesAction::Delete { id } => {
            registry.media.try_delete_file(&id).await?;
            match format {
                OutputFormat::Json => super::print_json(&serde_json::json!({ "deleted": id })),
                OutputFormat::Text => println!("{} Deleted file {id}.", style("OK").green().bold()),
            }
        }
    }

    Ok(())
}
