//! Coach chat history operations

use rusqlite::params;

use super::{parse_datetime, Database};
use crate::error::Result;
use crate::models::{ChatMessage, ChatRole};

impl Database {
    /// Append a message to a user's conversation
    pub fn append_chat_message(
        &self,
        user_id: i64,
        role: ChatRole,
        content: &str,
    ) -> Result<ChatMessage> {
        let conn = self.conn()?;

        conn.execute(
            "INSERT INTO chat_messages (user_id, role, content) VALUES (?, ?, ?)",
            params![user_id, role.as_str(), content],
        )?;
        let id = conn.last_insert_rowid();

        conn.query_row(
            r#"
            SELECT id, user_id, role, content, created_at
            FROM chat_messages
            WHERE id = ?
            "#,
            params![id],
            row_to_message,
        )
        .map_err(Into::into)
    }

    /// Last `limit` messages of a user's conversation, oldest first
    pub fn chat_history(&self, user_id: i64, limit: i64) -> Result<Vec<ChatMessage>> {
        let conn = self.conn()?;

        // Newest N, then flipped back into chronological order
        let mut stmt = conn.prepare(
            r#"
            SELECT id, user_id, role, content, created_at
            FROM chat_messages
            WHERE user_id = ?
            ORDER BY id DESC
            LIMIT ?
            "#,
        )?;
        let rows = stmt.query_map(params![user_id, limit], row_to_message)?;

        let mut messages = Vec::new();
        for row in rows {
            messages.push(row?);
        }
        messages.reverse();
        Ok(messages)
    }

    /// Delete a user's entire conversation, returns how many messages were removed
    pub fn clear_chat_history(&self, user_id: i64) -> Result<usize> {
        let conn = self.conn()?;
        let affected = conn.execute(
            "DELETE FROM chat_messages WHERE user_id = ?",
            params![user_id],
        )?;
        Ok(affected)
    }
}

fn row_to_message(row: &rusqlite::Row) -> rusqlite::Result<ChatMessage> {
    let role: String = row.get(2)?;
    let created_at: String = row.get(4)?;
    Ok(ChatMessage {
        id: row.get(0)?,
        user_id: row.get(1)?,
        role: role.parse().unwrap_or(ChatRole::User),
        content: row.get(3)?,
        created_at: parse_datetime(&created_at),
    })
}
