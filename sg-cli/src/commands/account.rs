//! Account commands: registration, sessions and the auth check.

use clap::Subcommand;
use console::style;

use sg_core::config::ConfigHandle;
use sg_core::error::SgResult;
use sg_models::{NewUser, UserProfile};
use sg_services::AuthState;
use crate::OutputFormat;

#[derive(Subcommand)]
pub enum AccountAction {
    /// Create an account and its profile document.
    Register {
        /// Display name.
        #[arg(long)]
        name: String,
        /// Unique handle.
        #[arg(short, long)]
        username: String,
        /// Email address.
        #[arg(short, long)]
        email: String,
        /// Password (prompted when omitted).
        #[arg(short, long)]
        password: Option<String>,
    },
    /// Open an email/password session.
    Login {
        /// Email address.
        #[arg(short, long)]
        email: String,
        /// Password (prompted when omitted).
        #[arg(short, long)]
        password: Option<String>,
    },
    /// Delete the current session.
    Logout,
    /// Show the signed-in user's profile.
    Whoami,
    /// Run the startup auth check and report the resolved state.
    Check,
}

pub async fn run(config: ConfigHandle, action: AccountAction, format: OutputFormat) -> SgResult<()> {
    let registry = super::connect(&config).await?;

    match action {
        AccountAction::Register { name, username, email, password } => {
            let password = super::password_or_prompt(password, "Password")?;
            let user = registry
                .users
                .try_create_user_account(NewUser { name, username, email, password })
                .await?;

            match format {
                OutputFormat::Json => super::print_json(&user),
                OutputFormat::Text => {
                    println!("{} Registered {}.", style("OK").green().bold(), user.data.name);
                    super::print_user(&user);
                }
            }
        }
        AccountAction::Login { email, password } => {
            let password = super::password_or_prompt(password, "Password")?;
            let session = registry.users.sign_in_account(&email, &password).await?;

            match format {
                OutputFormat::Json => super::print_json(&session),
                OutputFormat::Text => {
                    println!(
                        "{} Signed in as {} (session {}).",
                        style("OK").green().bold(),
                        email,
                        style(&session.id).dim()
                    );
                }
            }
        }
        AccountAction::Logout => {
            registry.users.try_sign_out_account().await?;
            match format {
                OutputFormat::Json => super::print_json(&serde_json::json!({ "signed_out": true })),
                OutputFormat::Text => println!("{} Signed out.", style("OK").green().bold()),
            }
        }
        AccountAction::Whoami => {
            let user = registry.users.try_get_current_user().await?;
            match format {
                OutputFormat::Json => super::print_json(&UserProfile::from_document(&user)),
                OutputFormat::Text => super::print_user(&user),
            }
        }
        AccountAction::Check => {
            let authenticated = registry.auth.mount().await;
            let state = registry.auth.state().await;

            match format {
                OutputFormat::Json => super::print_json(&serde_json::json!({
                    "is_authenticated": authenticated,
                    "user": registry.auth.user().await,
                })),
                OutputFormat::Text => match state {
                    AuthState::Authenticated(profile) => {
                        println!(
                            "{} Authenticated as {} (@{}).",
                            style("OK").green().bold(),
                            profile.name,
                            profile.username
                        );
                    }
                    _ => {
                        println!(
                            "{} Not signed in. Run `snapgram account login`.",
                            style("!!").yellow().bold()
                        );
                    }
                },
            }
        }
    }

    Ok(())
}
