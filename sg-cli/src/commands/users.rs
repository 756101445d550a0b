//! User profile commands.

use clap::Subcommand;

use sg_core::config::ConfigHandle;
use sg_core::constants::DEFAULT_USERS_LIMIT;
use sg_core::error::SgResult;
use crate::OutputFormat;

#[derive(Subcommand)]
pub enum UsersAction {
    /// List the newest users.
    List {
        /// Maximum number of users.
        #[arg(short = 'n', long, default_value_t = DEFAULT_USERS_LIMIT)]
        limit: u32,
    },
    /// Show one user profile.
    Get {
        /// Profile document ID.
        id: String,
    },
}

pub async fn run(config: ConfigHandle, action: UsersAction, format: OutputFormat) -> SgResult<()> {
    let registry = super::connect(&config).await?;

    match action {
        UsersAction::List { limit } => {
            let users = registry.users.try_get_users(limit).await?;
            match format {
                OutputFormat::Json => super::print_json(&users),
                OutputFormat::Text => {
                    if users.is_empty() {
                        println!("No users found.");
                    } else {
                        let mut table = super::new_table(vec!["ID", "Name", "Username", "Email", "Joined"]);
                        for doc in &users.documents {
                            let joined = doc
                                .created_at
                                .map(|d| d.format("%Y-%m-%d").to_string())
                                .unwrap_or_else(|| "-".into());
                            table.add_row(vec![
                                doc.id.clone(),
                                super::truncate(&doc.data.name, 30),
                                doc.data.username.clone().unwrap_or_else(|| "-".into()),
                                doc.data.email.clone(),
                                joined,
                            ]);
                        }
                        println!("{table}");
                        println!("\n{} of {} users", users.documents.len(), users.total);
                    }
                }
            }
        }
        UsersAction::Get { id } => {
            let user = registry.users.try_get_user_by_id(&id).await?;
            match format {
                OutputFormat::Json => super::print_json(&user),
                OutputFormat::Text => super::print_user(&user),
            }
        }
    }

    Ok(())
}
