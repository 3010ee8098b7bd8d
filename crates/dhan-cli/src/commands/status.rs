//! Status and summary command implementations

use std::path::Path;

use anyhow::Result;
use chrono::Utc;
use dhan_core::db::TransactionQuery;
use dhan_core::metrics::{compute_summary, GoalView};
use dhan_core::models::GoalStatus;

use super::{open_db, require_user};

pub fn cmd_status(db_path: &Path, no_encrypt: bool) -> Result<()> {
    use dhan_core::db::DB_KEY_ENV;
    use std::fs;

    println!();
    println!("📊 Dhan Status");
    println!("   ─────────────────────────────────────────────────────────────");

    // Database path
    println!("   Database: {}", db_path.display());

    // Check if database file exists and get size
    if db_path.exists() {
        if let Ok(metadata) = fs::metadata(db_path) {
            let size_kb = metadata.len() as f64 / 1024.0;
            if size_kb < 1024.0 {
                println!("   Size: {:.1} KB", size_kb);
            } else {
                println!("   Size: {:.1} MB", size_kb / 1024.0);
            }
        }
    } else {
        println!("   Size: (database not initialized)");
    }

    // Check encryption status
    let has_key = std::env::var(DB_KEY_ENV).is_ok();
    if no_encrypt {
        println!("   ⚠️  Encryption: DISABLED (--no-encrypt)");
    } else if has_key {
        println!("   🔒 Encryption: ENABLED ({}=***)", DB_KEY_ENV);
    } else {
        println!("   ❌ Encryption: REQUIRED but {} not set", DB_KEY_ENV);
    }

    // Try to open the database and show stats
    if db_path.exists() {
        match open_db(db_path, no_encrypt) {
            Ok(db) => {
                if let Ok(stats) = db.stats() {
                    println!();
                    println!("   Users: {}", stats.users);
                    println!("   Transactions: {}", stats.transactions);
                    println!("   Goals: {}", stats.goals);
                    println!("   Holdings: {}", stats.holdings);
                }
            }
            Err(e) => {
                println!();
                println!("   ❌ Error opening database: {}", e);
                if !no_encrypt && !has_key {
                    println!("      Set {} or use --no-encrypt", DB_KEY_ENV);
                } else if has_key {
                    println!("      (Check if {} is correct)", DB_KEY_ENV);
                }
            }
        }
    }

    println!();
    Ok(())
}

pub fn cmd_summary(db_path: &Path, email: &str, no_encrypt: bool) -> Result<()> {
    let db = open_db(db_path, no_encrypt)?;
    let user = require_user(&db, email)?;

    let transactions = db.list_transactions(user.id, &TransactionQuery::all())?;
    let goals = db.list_goals(user.id, Some(GoalStatus::Active))?;
    let summary = compute_summary(&transactions, goals.len());

    println!();
    println!("╭─────────────────────────────────────────╮");
    println!("│           💰 Dhan Summary               │");
    println!("╰─────────────────────────────────────────╯");
    println!();
    println!("  User:            {} ({})", user.full_name, user.email);
    println!("  Transactions:    {}", transactions.len());
    println!();
    println!("  Income:          ₹{:.2}", summary.total_income);
    println!("  Expenses:        ₹{:.2}", summary.total_expenses);
    println!("  Balance:         ₹{:.2}", summary.current_balance);
    println!("  Savings rate:    {:.1}%", summary.savings_rate);
    println!();
    println!(
        "  ❤️  Health score: {:.1}/10 ({:.0}%)",
        summary.financial_health_score, summary.overall_health_percent
    );

    if !goals.is_empty() {
        let now = Utc::now();
        println!();
        println!("  🎯 Active goals:");
        for goal in &goals {
            let view = GoalView::compute(goal, now);
            println!(
                "     {}: ₹{:.0}/₹{:.0} ({:.0}%), {} days left, ₹{:.0}/mo to stay on track",
                view.name,
                view.current_amount,
                view.target_amount,
                view.progress_percent,
                view.days_left,
                view.monthly_target
            );
        }
    }

    println!();
    Ok(())
}
