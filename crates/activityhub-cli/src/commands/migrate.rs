//! Database migration management commands.

use clap::{Args, Subcommand};

use activityhub_core::config::DatabaseProvider;
use activityhub_core::error::AppError;
use activityhub_database::DatabasePool;
use activityhub_database::migration::run_migrations;

use super::Cli;
use crate::output;

/// Arguments for the migrate command
#[derive(Debug, Args)]
pub struct MigrateArgs {
    /// Migration subcommand
    #[command(subcommand)]
    pub command: MigrateCommand,
}

/// Migration subcommands
#[derive(Debug, Subcommand)]
pub enum MigrateCommand {
    /// Run all pending migrations
    Run,
}

/// Execute migration commands
pub async fn execute(args: &MigrateArgs, cli: &Cli) -> Result<(), AppError> {
    let config = cli.load_config()?;

    match &args.command {
        MigrateCommand::Run => {
            if config.database.provider == DatabaseProvider::Memory {
                output::print_warning("The memory provider has no schema; nothing to migrate.");
                return Ok(());
            }

            let pool = DatabasePool::connect(&config.database).await?;
            println!("Running database migrations...");
            run_migrations(pool.pool()).await?;
            pool.close().await;
            output::print_success("All migrations applied successfully.");
        }
    }

    Ok(())
}
