//! Transaction import command

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use anyhow::{Context, Result};
use dhan_core::models::TransactionBatch;

use super::{open_db, require_user};

/// Import a JSON transaction dump for one user
///
/// Accepts both wire shapes the API produces: a bare array of transactions
/// or an object wrapping the array under a `data` key.
pub fn cmd_import(db_path: &Path, file: &Path, email: &str, no_encrypt: bool) -> Result<()> {
    let json_file =
        File::open(file).with_context(|| format!("Failed to open file: {}", file.display()))?;
    let batch: TransactionBatch = serde_json::from_reader(BufReader::new(json_file))
        .with_context(|| format!("Failed to parse {}", file.display()))?;
    let transactions = batch.into_inner();

    if transactions.is_empty() {
        println!("Nothing to import: {} contains no transactions", file.display());
        return Ok(());
    }

    println!("📥 Importing {} from {}...", email, file.display());
    println!("   Found {} transactions", transactions.len());

    let db = open_db(db_path, no_encrypt)?;
    let user = require_user(&db, email)?;

    let ids = db
        .insert_transactions(user.id, &transactions)
        .context("Failed to insert transactions")?;

    println!("✅ Import complete!");
    println!("   Imported: {}", ids.len());

    Ok(())
}
