//! Configuration management CLI commands.

use clap::{Args, Subcommand};
use tabled::Tabled;

use activityhub_core::config::{AppConfig, EndpointConfig};
use activityhub_core::error::AppError;
use activityhub_database::connection::mask_password;

use super::Cli;
use crate::output::{self, OutputFormat};

/// Arguments for config commands
#[derive(Debug, Args)]
pub struct ConfigArgs {
    /// Config subcommand
    #[command(subcommand)]
    pub command: ConfigCommand,
}

/// Config subcommands
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show the effective configuration with secrets masked
    Show,
    /// Validate configuration and environment
    Validate,
}

/// One row of `config show`.
#[derive(Debug, Tabled, serde::Serialize)]
struct ConfigEntry {
    #[tabled(rename = "Setting")]
    key: &'static str,
    #[tabled(rename = "Value")]
    value: String,
}

/// Execute config commands
pub async fn execute(args: &ConfigArgs, cli: &Cli) -> Result<(), AppError> {
    let config = cli.load_config()?;

    match &args.command {
        ConfigCommand::Show => match cli.format {
            OutputFormat::Table => output::print_list(&entries(&config), cli.format),
            OutputFormat::Json => output::print_item(&redacted(config), cli.format),
        },
        ConfigCommand::Validate => match config.validate() {
            Ok(warnings) => {
                output::print_success(&format!("Configuration '{}' is valid", cli.config));
                for warning in &warnings {
                    output::print_warning(warning);
                }
            }
            Err(e) => {
                output::print_error(&e.message);
                return Err(AppError::configuration("Configuration is invalid"));
            }
        },
    }

    Ok(())
}

fn entries(config: &AppConfig) -> Vec<ConfigEntry> {
    let database = match config.database.connection_string() {
        Some(url) => mask_password(&url),
        None => "(not configured)".to_string(),
    };
    let endpoint = |e: &EndpointConfig| {
        if e.is_remote() {
            e.base_url.clone()
        } else {
            "(log only)".to_string()
        }
    };

    vec![
        ConfigEntry { key: "server.address", value: config.server.bind_address() },
        ConfigEntry { key: "server.environment", value: config.server.environment.clone() },
        ConfigEntry {
            key: "server.cors.allowed_origins",
            value: config.server.cors.allowed_origins.join(", "),
        },
        ConfigEntry {
            key: "database.provider",
            value: format!("{:?}", config.database.provider).to_lowercase(),
        },
        ConfigEntry { key: "database.connection", value: database },
        ConfigEntry {
            key: "auth.jwt_access_ttl_minutes",
            value: config.auth.jwt_access_ttl_minutes.to_string(),
        },
        ConfigEntry {
            key: "integrations.payment",
            value: endpoint(&config.integrations.payment),
        },
        ConfigEntry {
            key: "integrations.email",
            value: endpoint(&config.integrations.email),
        },
        ConfigEntry {
            key: "integrations.loyalty",
            value: endpoint(&config.integrations.loyalty),
        },
        ConfigEntry {
            key: "loyalty.enabled",
            value: config.loyalty.enabled.to_string(),
        },
        ConfigEntry { key: "logging.level", value: config.logging.level.clone() },
        ConfigEntry { key: "logging.format", value: config.logging.format.clone() },
    ]
}

/// The configuration with every secret replaced.
fn redacted(mut config: AppConfig) -> AppConfig {
    const MASK: &str = "****";
    config.auth.jwt_secret = MASK.to_string();
    config.database.url = config.database.url.as_deref().map(mask_password);
    if config.database.password.is_some() {
        config.database.password = Some(MASK.to_string());
    }
    for endpoint in [
        &mut config.integrations.payment,
        &mut config.integrations.email,
        &mut config.integrations.loyalty,
        &mut config.integrations.analytics,
        &mut config.integrations.gift_card,
    ] {
        if endpoint.api_key.is_some() {
            endpoint.api_key = Some(MASK.to_string());
        }
    }
    for client in [&mut config.oauth.google, &mut config.oauth.facebook] {
        if client.client_secret.is_some() {
            client.client_secret = Some(MASK.to_string());
        }
    }
    config
}
