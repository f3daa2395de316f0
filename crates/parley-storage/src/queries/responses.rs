// SPDX-FileCopyrightText: 2026 Parley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Qualification response slots.

use parley_core::ParleyError;
use rusqlite::OptionalExtension;

use crate::database::{Database, map_tr_err};
use crate::models::CustomerResponse;

/// The first slot with no recorded answer, ordered by question text ascending.
pub async fn first_unanswered_response(
    db: &Database,
    customer_id: &str,
) -> Result<Option<CustomerResponse>, ParleyError> {
    let customer_id = customer_id.to_string();
    db.connection()
        .call(move |conn| {
            let slot = conn
                .query_row(
                    "SELECT id, customer_id, question, answered FROM customer_responses
                     WHERE customer_id = ?1 AND answered IS NULL
                     ORDER BY question ASC LIMIT 1",
                    [&customer_id],
                    |row| {
                        Ok(CustomerResponse {
                            id: row.get(0)?,
                            customer_id: row.get(1)?,
                            question: row.get(2)?,
                            answered: row.get(3)?,
                        })
                    },
                )
                .optional()?;
            Ok(slot)
        })
        .await
        .map_err(map_tr_err)
}

pub async fn record_answer(
    db: &Database,
    response_id: &str,
    answer: &str,
) -> Result<(), ParleyError> {
    let response_id = response_id.to_string();
    let id = response_id.clone();
    let answer = answer.to_string();
    let changed = db
        .connection()
        .call(move |conn| {
            let n = conn.execute(
                "UPDATE customer_responses SET answered = ?2 WHERE id = ?1",
                (&id, &answer),
            )?;
            Ok(n)
        })
        .await
        .map_err(map_tr_err)?;
    if changed == 0 {
        return Err(ParleyError::NotFound {
            entity: "customer response",
            id: response_id,
        });
    }
    Ok(())
}
