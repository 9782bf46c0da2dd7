//! CLI command definitions and dispatch.

pub mod admin;
pub mod config;
pub mod migrate;
pub mod serve;

use clap::{Parser, Subcommand};

use activityhub_core::config::AppConfig;
use activityhub_core::error::AppError;

use crate::output::OutputFormat;

/// ActivityHub: marketplace for bookable leisure activities
#[derive(Debug, Parser)]
#[command(name = "activityhub", version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "config/default.toml")]
    pub config: String,

    /// Environment overlay (`config/{env}.toml`)
    #[arg(short, long, env = "ACTIVITYHUB_ENV", default_value = "development")]
    pub env: String,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Start the ActivityHub server
    Serve(serve::ServeArgs),
    /// Database migration management
    Migrate(migrate::MigrateArgs),
    /// Configuration management
    Config(config::ConfigArgs),
    /// Administrator account management
    Admin(admin::AdminArgs),
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(&self) -> Result<(), AppError> {
        match &self.command {
            Commands::Serve(args) => serve::execute(args, self).await,
            Commands::Migrate(args) => migrate::execute(args, self).await,
            Commands::Config(args) => config::execute(args, self).await,
            Commands::Admin(args) => admin::execute(args, self).await,
        }
    }

    /// Load configuration from the selected file and environment.
    pub fn load_config(&self) -> Result<AppConfig, AppError> {
        AppConfig::load(&self.config, &self.env)
    }
}
