//! Core command implementations and shared utilities
//!
//! This module contains:
//! - `default_db_path` / `open_db` - Shared database utilities
//! - `require_user` - Resolve an email to a user or fail
//! - `cmd_init` - Initialize the database
//! - `cmd_register` - Create a user account from the terminal

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use dhan_core::db::Database;
use dhan_core::models::{NewUser, User};

/// Default database location: the platform data directory, falling back
/// to the working directory when none is available
pub fn default_db_path() -> PathBuf {
    match dirs::data_dir() {
        Some(dir) => dir.join("dhan").join("dhan.db"),
        None => PathBuf::from("dhan.db"),
    }
}

/// Open database with encryption by default, or unencrypted if --no-encrypt
pub fn open_db(db_path: &Path, no_encrypt: bool) -> Result<Database> {
    tracing::debug!("Opening database at {}", db_path.display());
    let path_str = db_path
        .to_str()
        .context("Database path must be valid UTF-8")?;
    if no_encrypt {
        Database::new_unencrypted(path_str).context("Failed to open database (unencrypted)")
    } else {
        Database::new(path_str).context("Failed to open database")
    }
}

/// Resolve an email to a stored user, with a hint when it does not exist
pub fn require_user(db: &Database, email: &str) -> Result<User> {
    db.find_user_by_email(email)?.ok_or_else(|| {
        anyhow::anyhow!(
            "No user with email {}. Create one with: dhan register --email {} --name \"...\"",
            email,
            email
        )
    })
}

pub fn cmd_init(db_path: &Path, no_encrypt: bool) -> Result<()> {
    println!("🔧 Initializing database at {}...", db_path.display());

    if let Some(parent) = db_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
    }

    let _db = open_db(db_path, no_encrypt)?;

    if no_encrypt {
        println!("   ⚠️  Encryption: DISABLED (--no-encrypt)");
    } else {
        println!("   🔒 Encryption: ENABLED");
    }

    println!("✅ Database initialized successfully!");
    println!();
    println!("Next steps:");
    println!("  1. Create a user: dhan register --email you@example.com --name \"Your Name\"");
    println!("  2. Start the API: dhan serve");

    Ok(())
}

pub fn cmd_register(db_path: &Path, email: &str, name: &str, no_encrypt: bool) -> Result<()> {
    let email = email.trim().to_lowercase();
    if !email.contains('@') {
        anyhow::bail!("Invalid email address: {}", email);
    }
    if name.trim().is_empty() {
        anyhow::bail!("Name must not be empty");
    }

    print!("Password (min 8 characters): ");
    io::stdout().flush()?;
    let mut password = String::new();
    io::stdin().read_line(&mut password)?;
    let password = password.trim_end_matches(['\r', '\n']);
    if password.len() < 8 {
        anyhow::bail!("Password must be at least 8 characters");
    }

    let db = open_db(db_path, no_encrypt)?;
    let password_hash = dhan_core::auth::hash_password(password)?;
    let user = db.create_user(&NewUser {
        email,
        password_hash,
        full_name: name.trim().to_string(),
    })?;

    println!("✅ Registered {} ({})", user.full_name, user.email);
    println!("   Log in via POST /api/auth/token to get an API token.");

    Ok(())
}
