//! CLI argument definitions using clap
//!
//! This module contains all the clap structs and enums for parsing CLI arguments.
//! The actual command implementations are in the `commands` module.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Dhan - Self-hosted personal finance tracker and coach
#[derive(Parser)]
#[command(name = "dhan")]
#[command(about = "Self-hosted personal finance tracker", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Database path (defaults to the platform data directory)
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable database encryption (not recommended for production)
    ///
    /// By default, the database is encrypted using SQLCipher.
    /// Set DHAN_DB_KEY environment variable with your passphrase.
    /// Use --no-encrypt only for development or testing.
    #[arg(long, global = true)]
    pub no_encrypt: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the database
    Init,

    /// Register a new user account
    Register {
        /// Email address (unique per user)
        #[arg(short, long)]
        email: String,

        /// Full name
        #[arg(short, long)]
        name: String,
    },

    /// Import transactions from a JSON file
    Import {
        /// JSON file to import (bare array or {"data": [...]})
        #[arg(short, long)]
        file: PathBuf,

        /// Email of the user to import into
        #[arg(short, long)]
        email: String,
    },

    /// Start the web server
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "3000")]
        port: u16,

        /// Host to bind to
        #[arg(long, default_value = "127.0.0.1")]
        host: String,
    },

    /// Print the financial summary for a user
    Summary {
        /// Email of the user to summarize
        #[arg(short, long)]
        email: String,
    },

    /// Show database status (encryption, size, etc.)
    Status,
}
