//! Start the ActivityHub server.

use clap::Args;

use activityhub_core::error::AppError;

use super::Cli;
use crate::output;

/// Arguments for the serve command
#[derive(Debug, Args)]
pub struct ServeArgs {
    /// Override the server port
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Override the server host
    #[arg(long)]
    pub host: Option<String>,

    /// Skip pending migrations on startup
    #[arg(long)]
    pub no_migrate: bool,
}

/// Execute the serve command
pub async fn execute(args: &ServeArgs, cli: &Cli) -> Result<(), AppError> {
    let mut config = cli.load_config()?;

    if let Some(port) = args.port {
        config.server.port = port;
    }
    if let Some(ref host) = args.host {
        config.server.host = host.clone();
    }
    if args.no_migrate {
        config.database.run_migrations = false;
    }

    for warning in config.validate()? {
        output::print_warning(&warning);
    }

    println!("Starting ActivityHub server...");
    output::print_kv("Address", &config.server.bind_address());
    output::print_kv("Environment", &config.server.environment);

    activityhub_api::run_server(config).await
}
