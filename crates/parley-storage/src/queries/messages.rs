// SPDX-FileCopyrightText: 2026 Parley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Transcript persistence.

use std::str::FromStr;

use parley_core::ParleyError;
use parley_core::types::ChatRole;

use crate::database::{Database, map_tr_err};
use crate::models::Message;

pub async fn append_message(db: &Database, message: &Message) -> Result<(), ParleyError> {
    let row = message.clone();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO messages (id, chat_room_id, role, content, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                (
                    &row.id,
                    &row.chat_room_id,
                    row.role.to_string(),
                    &row.content,
                    &row.created_at,
                ),
            )?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)
}

/// Transcript rows in creation order.
pub async fn messages_for_room(
    db: &Database,
    chat_room_id: &str,
) -> Result<Vec<Message>, ParleyError> {
    let chat_room_id = chat_room_id.to_string();
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT id, chat_room_id, role, content, created_at FROM messages
                 WHERE chat_room_id = ?1 ORDER BY created_at, rowid",
            )?;
            let messages = stmt
                .query_map([&chat_room_id], |row| {
                    let role: String = row.get(2)?;
                    Ok(Message {
                        id: row.get(0)?,
                        chat_room_id: row.get(1)?,
                        role: ChatRole::from_str(&role).map_err(|e| {
                            rusqlite::Error::FromSqlConversionFailure(
                                2,
                                rusqlite::types::Type::Text,
                                Box::new(e),
                            )
                        })?,
                        content: row.get(3)?,
                        created_at: row.get(4)?,
                    })
                })?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(messages)
        })
        .await
        .map_err(map_tr_err)
}
