//! Savings goal operations

use rusqlite::{params, OptionalExtension};

use super::{parse_datetime, Database};
use crate::error::{Error, Result};
use crate::models::{Goal, GoalStatus, GoalUpdate, NewGoal};

impl Database {
    /// Create a goal for a user
    ///
    /// Target amounts must be positive. The goal starts active with zero saved.
    pub fn create_goal(&self, user_id: i64, new: &NewGoal) -> Result<Goal> {
        if new.target_amount <= 0.0 {
            return Err(Error::InvalidData(
                "Goal target amount must be positive".to_string(),
            ));
        }

        let conn = self.conn()?;
        conn.execute(
            r#"
            INSERT INTO goals (user_id, name, target_amount, current_amount, target_date, status)
            VALUES (?, ?, ?, 0, ?, ?)
            "#,
            params![
                user_id,
                new.name,
                new.target_amount,
                new.target_date.to_rfc3339(),
                GoalStatus::Active.as_str(),
            ],
        )?;

        self.get_goal(user_id, conn.last_insert_rowid())
    }

    /// List a user's goals, optionally filtered by status, soonest deadline first
    pub fn list_goals(&self, user_id: i64, status: Option<GoalStatus>) -> Result<Vec<Goal>> {
        let conn = self.conn()?;

        let mut conditions = vec!["user_id = ?".to_string()];
        let mut params: Vec<Box<dyn rusqlite::ToSql>> = vec![Box::new(user_id)];

        if let Some(status) = status {
            conditions.push("status = ?".to_string());
            params.push(Box::new(status.as_str()));
        }

        let sql = format!(
            r#"
            SELECT id, user_id, name, target_amount, current_amount, target_date, status, created_at
            FROM goals
            WHERE {}
            ORDER BY target_date ASC, id ASC
            "#,
            conditions.join(" AND ")
        );

        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map(rusqlite::params_from_iter(params.iter()), row_to_goal)?;

        let mut goals = Vec::new();
        for row in rows {
            goals.push(row?);
        }
        Ok(goals)
    }

    /// Get a single goal, scoped to the owning user
    pub fn get_goal(&self, user_id: i64, id: i64) -> Result<Goal> {
        let conn = self.conn()?;

        conn.query_row(
            r#"
            SELECT id, user_id, name, target_amount, current_amount, target_date, status, created_at
            FROM goals
            WHERE id = ? AND user_id = ?
            "#,
            params![id, user_id],
            row_to_goal,
        )
        .optional()?
        .ok_or_else(|| Error::NotFound(format!("Goal {} not found", id)))
    }

    /// Apply a partial update to a goal
    ///
    /// A goal whose saved amount reaches its target is marked completed, even
    /// when the update did not touch status.
    pub fn update_goal(&self, user_id: i64, id: i64, update: &GoalUpdate) -> Result<Goal> {
        let mut goal = self.get_goal(user_id, id)?;

        if let Some(name) = &update.name {
            goal.name = name.clone();
        }
        if let Some(target) = update.target_amount {
            if target <= 0.0 {
                return Err(Error::InvalidData(
                    "Goal target amount must be positive".to_string(),
                ));
            }
            goal.target_amount = target;
        }
        if let Some(current) = update.current_amount {
            if current < 0.0 {
                return Err(Error::InvalidData(
                    "Goal saved amount cannot be negative".to_string(),
                ));
            }
            goal.current_amount = current;
        }
        if let Some(date) = update.target_date {
            goal.target_date = date;
        }
        if let Some(status) = update.status {
            goal.status = status;
        }
        if goal.current_amount >= goal.target_amount {
            goal.status = GoalStatus::Completed;
        }

        let conn = self.conn()?;
        conn.execute(
            r#"
            UPDATE goals
            SET name = ?, target_amount = ?, current_amount = ?, target_date = ?, status = ?
            WHERE id = ? AND user_id = ?
            "#,
            params![
                goal.name,
                goal.target_amount,
                goal.current_amount,
                goal.target_date.to_rfc3339(),
                goal.status.as_str(),
                id,
                user_id,
            ],
        )?;

        self.get_goal(user_id, id)
    }

    /// Add a contribution to a goal
    ///
    /// The amount must be positive. Reaching the target marks the goal completed.
    /// The increment and the status check are one statement, so concurrent
    /// contributions cannot read the same starting amount and overwrite each
    /// other.
    pub fn contribute_to_goal(&self, user_id: i64, id: i64, amount: f64) -> Result<Goal> {
        if amount <= 0.0 {
            return Err(Error::InvalidData(
                "Contribution amount must be positive".to_string(),
            ));
        }

        let conn = self.conn()?;
        let affected = conn.execute(
            r#"
            UPDATE goals
            SET current_amount = current_amount + ?1,
                status = CASE
                    WHEN current_amount + ?1 >= target_amount THEN 'completed'
                    ELSE status
                END
            WHERE id = ?2 AND user_id = ?3
            "#,
            params![amount, id, user_id],
        )?;
        if affected == 0 {
            return Err(Error::NotFound(format!("Goal {} not found", id)));
        }

        self.get_goal(user_id, id)
    }

    /// Delete a goal, scoped to the owning user
    pub fn delete_goal(&self, user_id: i64, id: i64) -> Result<()> {
        let conn = self.conn()?;

        let affected = conn.execute(
            "DELETE FROM goals WHERE id = ? AND user_id = ?",
            params![id, user_id],
        )?;
        if affected == 0 {
            return Err(Error::NotFound(format!("Goal {} not found", id)));
        }
        Ok(())
    }
}

fn row_to_goal(row: &rusqlite::Row) -> rusqlite::Result<Goal> {
    let target_date: String = row.get(5)?;
    let status: String = row.get(6)?;
    let created_at: String = row.get(7)?;
    Ok(Goal {
        id: row.get(0)?,
        user_id: row.get(1)?,
        name: row.get(2)?,
        target_amount: row.get(3)?,
        current_amount: row.get(4)?,
        target_date: parse_datetime(&target_date),
        status: status.parse().unwrap_or(GoalStatus::Active),
        created_at: parse_datetime(&created_at),
    })
}
