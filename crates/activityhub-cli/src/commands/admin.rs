//! Administrator account management commands.

use clap::{Args, Subcommand};

use activityhub_core::config::DatabaseProvider;
use activityhub_core::error::AppError;
use activityhub_database::Stores;
use activityhub_integrations::Integrations;
use activityhub_service::Services;

use super::Cli;
use crate::output;

/// Arguments for admin commands
#[derive(Debug, Args)]
pub struct AdminArgs {
    /// Admin subcommand
    #[command(subcommand)]
    pub command: AdminCommand,
}

/// Admin subcommands
#[derive(Debug, Subcommand)]
pub enum AdminCommand {
    /// Create a new administrator account
    Create {
        /// Email
        #[arg(short, long)]
        email: Option<String>,
        /// Password (will prompt if not provided)
        #[arg(short, long)]
        password: Option<String>,
        /// Full name
        #[arg(short, long)]
        name: Option<String>,
    },
}

/// Execute admin commands
pub async fn execute(args: &AdminArgs, cli: &Cli) -> Result<(), AppError> {
    let config = cli.load_config()?;
    config.validate()?;

    if config.database.provider == DatabaseProvider::Memory {
        output::print_warning("The memory provider does not persist; the account is discarded on exit.");
    }

    let stores = Stores::connect(&config.database).await?;
    let services = Services::new(&stores, &Integrations::logging(), &config);

    match &args.command {
        AdminCommand::Create {
            email,
            password,
            name,
        } => {
            let email = match email {
                Some(e) => e.clone(),
                None => dialoguer::Input::new()
                    .with_prompt("Admin email")
                    .interact_text()
                    .map_err(input_error)?,
            };

            let name = match name {
                Some(n) => n.clone(),
                None => dialoguer::Input::new()
                    .with_prompt("Full name")
                    .interact_text()
                    .map_err(input_error)?,
            };

            let password = match password {
                Some(p) => p.clone(),
                None => dialoguer::Password::new()
                    .with_prompt("Password")
                    .with_confirmation("Confirm password", "Passwords do not match")
                    .interact()
                    .map_err(input_error)?,
            };

            let user = services.auth.create_admin(&email, &password, &name).await?;

            output::print_success(&format!("Administrator '{}' created", user.email));
            output::print_kv("ID", &user.id.to_string());
            output::print_kv("Name", &user.full_name);
        }
    }

    if let Some(pool) = stores.pool() {
        pool.close().await;
    }
    Ok(())
}

fn input_error(e: dialoguer::Error) -> AppError {
    AppError::internal(format!("Input error: {e}"))
}
