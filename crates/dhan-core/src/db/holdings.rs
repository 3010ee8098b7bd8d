//! Portfolio holding operations

use rusqlite::{params, OptionalExtension};

use super::{parse_datetime, Database};
use crate::error::{Error, Result};
use crate::models::{Holding, NewHolding, PortfolioSummary};

impl Database {
    /// Add a holding, merging into any existing position for the same symbol
    ///
    /// Merging keeps the combined quantity and the quantity-weighted average
    /// cost. Symbols are matched case-insensitively and stored uppercased.
    pub fn upsert_holding(&self, user_id: i64, new: &NewHolding) -> Result<Holding> {
        if new.quantity <= 0.0 || new.avg_cost < 0.0 {
            return Err(Error::InvalidData(
                "Holding quantity must be positive and cost non-negative".to_string(),
            ));
        }

        let symbol = new.symbol.trim().to_uppercase();
        if symbol.is_empty() {
            return Err(Error::InvalidData("Holding symbol is required".to_string()));
        }

        let conn = self.conn()?;

        let existing: Option<(i64, f64, f64)> = conn
            .query_row(
                "SELECT id, quantity, avg_cost FROM holdings WHERE user_id = ? AND symbol = ?",
                params![user_id, symbol],
                |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
            )
            .optional()?;

        let id = match existing {
            Some((id, qty, cost)) => {
                let total_qty = qty + new.quantity;
                let merged_cost = (qty * cost + new.quantity * new.avg_cost) / total_qty;
                conn.execute(
                    "UPDATE holdings SET quantity = ?, avg_cost = ? WHERE id = ?",
                    params![total_qty, merged_cost, id],
                )?;
                id
            }
            None => {
                conn.execute(
                    "INSERT INTO holdings (user_id, symbol, quantity, avg_cost) VALUES (?, ?, ?, ?)",
                    params![user_id, symbol, new.quantity, new.avg_cost],
                )?;
                conn.last_insert_rowid()
            }
        };

        self.get_holding(user_id, id)
    }

    /// List a user's holdings ordered by symbol
    pub fn list_holdings(&self, user_id: i64) -> Result<Vec<Holding>> {
        let conn = self.conn()?;

        let mut stmt = conn.prepare(
            r#"
            SELECT id, user_id, symbol, quantity, avg_cost, created_at
            FROM holdings
            WHERE user_id = ?
            ORDER BY symbol ASC
            "#,
        )?;
        let rows = stmt.query_map(params![user_id], row_to_holding)?;

        let mut holdings = Vec::new();
        for row in rows {
            holdings.push(row?);
        }
        Ok(holdings)
    }

    /// Portfolio summary: positions plus total value at average cost
    pub fn portfolio_summary(&self, user_id: i64) -> Result<PortfolioSummary> {
        let positions = self.list_holdings(user_id)?;
        let total_value = positions.iter().map(|h| h.quantity * h.avg_cost).sum();
        Ok(PortfolioSummary {
            total_value,
            positions,
        })
    }

    fn get_holding(&self, user_id: i64, id: i64) -> Result<Holding> {
        let conn = self.conn()?;

        conn.query_row(
            r#"
            SELECT id, user_id, symbol, quantity, avg_cost, created_at
            FROM holdings
            WHERE id = ? AND user_id = ?
            "#,
            params![id, user_id],
            row_to_holding,
        )
        .optional()?
        .ok_or_else(|| Error::NotFound(format!("Holding {} not found", id)))
    }

    /// Remove a position by symbol (case-insensitive)
    pub fn delete_holding(&self, user_id: i64, symbol: &str) -> Result<()> {
        let conn = self.conn()?;

        let affected = conn.execute(
            "DELETE FROM holdings WHERE user_id = ? AND symbol = ?",
            params![user_id, symbol.trim().to_uppercase()],
        )?;
        if affected == 0 {
            return Err(Error::NotFound(format!("Holding {} not found", symbol)));
        }
        Ok(())
    }
}

fn row_to_holding(row: &rusqlite::Row) -> rusqlite::Result<Holding> {
    let created_at: String = row.get(5)?;
    Ok(Holding {
        id: row.get(0)?,
        user_id: row.get(1)?,
        symbol: row.get(2)?,
        quantity: row.get(3)?,
        avg_cost: row.get(4)?,
        created_at: parse_datetime(&created_at),
    })
}
