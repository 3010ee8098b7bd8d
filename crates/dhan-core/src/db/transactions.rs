//! Transaction operations

use rusqlite::{params, OptionalExtension};

use super::{parse_datetime, Database};
use crate::error::{Error, Result};
use crate::models::{Category, Necessity, NewTransaction, Transaction};

/// Stored timestamp format, matching SQLite's CURRENT_TIMESTAMP output
///
/// `ORDER BY COALESCE(timestamp, created_at)` compares the two columns as
/// strings, so client-supplied timestamps must be written in the same shape
/// the `created_at` default produces.
const STORED_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Filters for listing transactions
///
/// Defaults list the newest 100 transactions with no category filter.
#[derive(Debug, Clone)]
pub struct TransactionQuery {
    pub limit: i64,
    pub offset: i64,
    pub category: Option<Category>,
}

impl Default for TransactionQuery {
    fn default() -> Self {
        Self {
            limit: 100,
            offset: 0,
            category: None,
        }
    }
}

impl TransactionQuery {
    /// Unbounded query for metric computation
    ///
    /// The summary and aggregation figures are defined over the user's whole
    /// history; a page-sized slice would silently skew them once the history
    /// outgrows the page. SQLite treats a negative LIMIT as "no limit".
    pub fn all() -> Self {
        Self {
            limit: -1,
            offset: 0,
            category: None,
        }
    }
}

impl Database {
    /// Insert a transaction for a user, returns the new transaction ID
    pub fn insert_transaction(&self, user_id: i64, tx: &NewTransaction) -> Result<i64> {
        let conn = self.conn()?;

        conn.execute(
            r#"
            INSERT INTO transactions (user_id, amount, category, necessity, description, timestamp)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
            params![
                user_id,
                tx.amount,
                tx.category.as_str(),
                tx.necessity.as_str(),
                tx.description,
                tx.timestamp.map(|t| t.format(STORED_FORMAT).to_string()),
            ],
        )?;

        Ok(conn.last_insert_rowid())
    }

    /// Insert a batch of transactions in one pooled connection, returns new IDs
    /// in input order
    pub fn insert_transactions(&self, user_id: i64, txs: &[NewTransaction]) -> Result<Vec<i64>> {
        let conn = self.conn()?;
        let mut ids = Vec::with_capacity(txs.len());

        for tx in txs {
            conn.execute(
                r#"
                INSERT INTO transactions (user_id, amount, category, necessity, description, timestamp)
                VALUES (?, ?, ?, ?, ?, ?)
                "#,
                params![
                    user_id,
                    tx.amount,
                    tx.category.as_str(),
                    tx.necessity.as_str(),
                    tx.description,
                    tx.timestamp.map(|t| t.format(STORED_FORMAT).to_string()),
                ],
            )?;
            ids.push(conn.last_insert_rowid());
        }

        Ok(ids)
    }

    /// List a user's transactions, newest first
    pub fn list_transactions(&self, user_id: i64, query: &TransactionQuery) -> Result<Vec<Transaction>> {
        let conn = self.conn()?;

        let mut conditions = vec!["user_id = ?".to_string()];
        let mut params: Vec<Box<dyn rusqlite::ToSql>> = vec![Box::new(user_id)];

        if let Some(cat) = &query.category {
            conditions.push("category = ?".to_string());
            params.push(Box::new(cat.as_str().to_string()));
        }

        let sql = format!(
            r#"
            SELECT id, user_id, amount, category, necessity, description, timestamp
            FROM transactions
            WHERE {}
            ORDER BY COALESCE(timestamp, created_at) DESC, id DESC
            LIMIT ? OFFSET ?
            "#,
            conditions.join(" AND ")
        );
        params.push(Box::new(query.limit));
        params.push(Box::new(query.offset));

        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map(rusqlite::params_from_iter(params.iter()), row_to_transaction)?;

        let mut transactions = Vec::new();
        for row in rows {
            transactions.push(row?);
        }
        Ok(transactions)
    }

    /// Get a single transaction, scoped to the owning user
    pub fn get_transaction(&self, user_id: i64, id: i64) -> Result<Transaction> {
        let conn = self.conn()?;

        conn.query_row(
            r#"
            SELECT id, user_id, amount, category, necessity, description, timestamp
            FROM transactions
            WHERE id = ? AND user_id = ?
            "#,
            params![id, user_id],
            row_to_transaction,
        )
        .optional()?
        .ok_or_else(|| Error::NotFound(format!("Transaction {} not found", id)))
    }

    /// Delete a transaction, scoped to the owning user
    pub fn delete_transaction(&self, user_id: i64, id: i64) -> Result<()> {
        let conn = self.conn()?;

        let affected = conn.execute(
            "DELETE FROM transactions WHERE id = ? AND user_id = ?",
            params![id, user_id],
        )?;
        if affected == 0 {
            return Err(Error::NotFound(format!("Transaction {} not found", id)));
        }
        Ok(())
    }
}

fn row_to_transaction(row: &rusqlite::Row) -> rusqlite::Result<Transaction> {
    let category: String = row.get(3)?;
    let necessity: String = row.get(4)?;
    let timestamp: Option<String> = row.get(6)?;
    Ok(Transaction {
        id: row.get(0)?,
        user_id: row.get(1)?,
        amount: row.get(2)?,
        category: Category::from(category.as_str()),
        necessity: Necessity::from(necessity.as_str()),
        description: row.get(5)?,
        timestamp: timestamp.map(|s| parse_datetime(&s)),
    })
}
