//! Save (bookmark) commands.

use clap::Subcommand;
use console::style;

use sg_core::config::ConfigHandle;
use sg_core::error::SgResult;
use crate::OutputFormat;

#[derive(Subcommand)]
pub enum SavesAction {
    /// Bookmark a post.
    Add {
        /// Post ID.
        post_id: String,
        /// Profile ID to save for (defaults to the signed-in user).
        #[arg(short, long)]
        user: Option<String>,
    },
    /// Remove a bookmark by its save record ID.
    Remove {
        /// Save record ID.
        save_id: String,
    },
}

pub async fn run(config: ConfigHandle, action: SavesAction, format: OutputFormat) -> SgResult<()> {
    let registry = super::connect(&config).await?;

    match action {
        SavesAction::Add { post_id, user } => {
            let user_id = match user {
                Some(u) => u,
                None => super::current_user_id(&registry).await?,
            };
            let save = registry.saves.try_save_post(&user_id, &post_id).await?;

            match format {
                OutputFormat::Json => super::print_json(&save),
                OutputFormat::Text => println!(
                    "{} Saved post {} (save {}).",
                    style("OK").green().bold(),
                    post_id,
                    style(&save.id).dim()
                ),
            }
        }
        SavesAction::Remove { save_id } => {
            registry.saves.try_delete_saved_post(&save_id).await?;
            match format {
                OutputFormat::Json => super::print_json(&serde_json::json!({ "deleted": save_id })),
                OutputFormat::Text => println!("{} Removed save {save_id}.", style("OK").green().bold()),
            }
        }
    }

    Ok(())
}
