//! CLI command tests
//!
//! This module contains all tests for the CLI commands.

use std::io::Write;
use std::path::PathBuf;

use dhan_core::db::Database;
use dhan_core::models::NewUser;
use tempfile::TempDir;

use crate::commands;

/// Create a temp directory plus a database path inside it
fn setup_test_db() -> (TempDir, PathBuf) {
    let dir = TempDir::new().unwrap();
    let db_path = dir.path().join("test.db");
    (dir, db_path)
}

fn create_test_user(db_path: &PathBuf, email: &str) -> i64 {
    let db = Database::new_unencrypted(db_path.to_str().unwrap()).unwrap();
    let user = db
        .create_user(&NewUser {
            email: email.to_string(),
            password_hash: "not-a-real-hash".to_string(),
            full_name: "Test User".to_string(),
        })
        .unwrap();
    user.id
}

fn write_json(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    let mut file = std::fs::File::create(&path).unwrap();
    file.write_all(content.as_bytes()).unwrap();
    path
}

// ========== Init Command Tests ==========

#[test]
fn test_cmd_init_creates_database() {
    let (_dir, db_path) = setup_test_db();

    let result = commands::cmd_init(&db_path, true);
    assert!(result.is_ok());
    assert!(db_path.exists());
}

#[test]
fn test_cmd_init_creates_parent_directories() {
    let dir = TempDir::new().unwrap();
    let db_path = dir.path().join("nested").join("deeper").join("test.db");

    let result = commands::cmd_init(&db_path, true);
    assert!(result.is_ok());
    assert!(db_path.exists());
}

// ========== Import Command Tests ==========

#[test]
fn test_cmd_import_bare_array() {
    let (dir, db_path) = setup_test_db();
    let user_id = create_test_user(&db_path, "alice@example.com");

    let file = write_json(
        &dir,
        "dump.json",
        r#"[
            {"amount": 50000.0, "category": "income", "description": "Salary"},
            {"amount": -2500.0, "category": "food", "necessity": "needs"}
        ]"#,
    );

    let result = commands::cmd_import(&db_path, &file, "alice@example.com", true);
    assert!(result.is_ok());

    let db = Database::new_unencrypted(db_path.to_str().unwrap()).unwrap();
    let txs = db
        .list_transactions(user_id, &Default::default())
        .unwrap();
    assert_eq!(txs.len(), 2);
}

#[test]
fn test_cmd_import_wrapped_object() {
    let (dir, db_path) = setup_test_db();
    let user_id = create_test_user(&db_path, "alice@example.com");

    let file = write_json(
        &dir,
        "dump.json",
        r#"{"data": [{"amount": -1500.0, "category": "transportation"}]}"#,
    );

    let result = commands::cmd_import(&db_path, &file, "alice@example.com", true);
    assert!(result.is_ok());

    let db = Database::new_unencrypted(db_path.to_str().unwrap()).unwrap();
    let txs = db
        .list_transactions(user_id, &Default::default())
        .unwrap();
    assert_eq!(txs.len(), 1);
    assert_eq!(txs[0].amount, -1500.0);
}

#[test]
fn test_cmd_import_empty_file_is_noop() {
    let (dir, db_path) = setup_test_db();

    let file = write_json(&dir, "empty.json", "[]");

    // No user needed: an empty dump returns before touching the database
    let result = commands::cmd_import(&db_path, &file, "nobody@example.com", true);
    assert!(result.is_ok());
}

#[test]
fn test_cmd_import_unknown_user() {
    let (dir, db_path) = setup_test_db();
    create_test_user(&db_path, "alice@example.com");

    let file = write_json(&dir, "dump.json", r#"[{"amount": -10.0}]"#);

    let result = commands::cmd_import(&db_path, &file, "bob@example.com", true);
    assert!(result.is_err());
    assert!(result
        .unwrap_err()
        .to_string()
        .contains("dhan register"));
}

#[test]
fn test_cmd_import_malformed_json() {
    let (dir, db_path) = setup_test_db();

    let file = write_json(&dir, "bad.json", "{not json");

    let result = commands::cmd_import(&db_path, &file, "alice@example.com", true);
    assert!(result.is_err());
}

// ========== Summary Command Tests ==========

#[test]
fn test_cmd_summary_with_transactions() {
    let (dir, db_path) = setup_test_db();
    create_test_user(&db_path, "alice@example.com");

    let file = write_json(
        &dir,
        "dump.json",
        r#"[{"amount": 50000.0}, {"amount": -4000.0, "category": "food"}]"#,
    );
    commands::cmd_import(&db_path, &file, "alice@example.com", true).unwrap();

    let result = commands::cmd_summary(&db_path, "alice@example.com", true);
    assert!(result.is_ok());
}

#[test]
fn test_cmd_summary_unknown_user() {
    let (_dir, db_path) = setup_test_db();
    create_test_user(&db_path, "alice@example.com");

    let result = commands::cmd_summary(&db_path, "bob@example.com", true);
    assert!(result.is_err());
}

// ========== Status Command Tests ==========

#[test]
fn test_cmd_status_uninitialized() {
    let (_dir, db_path) = setup_test_db();

    // Status on a missing database reports, it never fails
    let result = commands::cmd_status(&db_path, true);
    assert!(result.is_ok());
}

#[test]
fn test_cmd_status_initialized() {
    let (_dir, db_path) = setup_test_db();
    create_test_user(&db_path, "alice@example.com");

    let result = commands::cmd_status(&db_path, true);
    assert!(result.is_ok());
}

// ========== Shared Utility Tests ==========

#[test]
fn test_default_db_path_ends_with_dhan_db() {
    let path = commands::default_db_path();
    assert!(path.ends_with("dhan/dhan.db") || path.ends_with("dhan.db"));
}
