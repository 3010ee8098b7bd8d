//! Dhan CLI - Personal finance tracker
//!
//! Usage:
//!   dhan init                       Initialize database
//!   dhan register --email --name    Create a user account
//!   dhan import --file dump.json    Import transactions for a user
//!   dhan summary --email EMAIL      Print the financial summary
//!   dhan serve --port 3000          Start web server

mod cli;
mod commands;

#[cfg(test)]
mod tests;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::*;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).compact())
        .init();

    let db_path = cli.db.unwrap_or_else(commands::default_db_path);

    match cli.command {
        Commands::Init => commands::cmd_init(&db_path, cli.no_encrypt),
        Commands::Register { email, name } => {
            commands::cmd_register(&db_path, &email, &name, cli.no_encrypt)
        }
        Commands::Import { file, email } => {
            commands::cmd_import(&db_path, &file, &email, cli.no_encrypt)
        }
        Commands::Serve { port, host } => {
            commands::cmd_serve(&db_path, &host, port, cli.no_encrypt).await
        }
        Commands::Summary { email } => commands::cmd_summary(&db_path, &email, cli.no_encrypt),
        Commands::Status => commands::cmd_status(&db_path, cli.no_encrypt),
    }
}
