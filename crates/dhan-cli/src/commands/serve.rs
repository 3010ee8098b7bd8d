//! Server command implementation

use std::path::Path;

use anyhow::{Context, Result};

use super::open_db;

pub async fn cmd_serve(db_path: &Path, host: &str, port: u16, no_encrypt: bool) -> Result<()> {
    println!("🚀 Starting Dhan API server...");
    println!("   Database: {}", db_path.display());
    println!("   Listening: http://{}:{}", host, port);

    if no_encrypt {
        println!("   ⚠️  Encryption DISABLED (--no-encrypt)");
    }

    let config = dhan_server::ServerConfig::from_env()
        .context("Server configuration incomplete")?;

    match std::env::var("AI_BACKEND").as_deref() {
        Ok("mock") => println!("   🤖 Coach backend: mock (canned replies)"),
        Ok(backend) => println!("   🤖 Coach backend: {}", backend),
        Err(_) => println!("   💡 Tip: Set AI_BACKEND=ollama and OLLAMA_HOST for a live coach"),
    }
    println!();
    println!("   Press Ctrl+C to stop");

    let db = open_db(db_path, no_encrypt)?;
    dhan_server::serve(db, host, port, config).await?;

    Ok(())
}
