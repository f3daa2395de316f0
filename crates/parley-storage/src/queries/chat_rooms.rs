// SPDX-FileCopyrightText: 2026 Parley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Chat room flag flips: `live` for operator handoff, `mailed` for the
//! at-most-once escalation notice.

use parley_core::ParleyError;

use crate::database::{Database, map_tr_err};

/// Marks a room as escalated to a human operator.
pub async fn set_room_live(db: &Database, chat_room_id: &str) -> Result<(), ParleyError> {
    let chat_room_id = chat_room_id.to_string();
    let id = chat_room_id.clone();
    let changed = db
        .connection()
        .call(move |conn| {
            let n = conn.execute("UPDATE chat_rooms SET live = 1 WHERE id = ?1", [&id])?;
            Ok(n)
        })
        .await
        .map_err(map_tr_err)?;
    if changed == 0 {
        return Err(ParleyError::NotFound {
            entity: "chat room",
            id: chat_room_id,
        });
    }
    Ok(())
}

/// Compare-and-set on the `mailed` flag. Exactly one caller per room ever
/// sees `true`; `mailed` is never reset.
pub async fn claim_notification(db: &Database, chat_room_id: &str) -> Result<bool, ParleyError> {
    let chat_room_id = chat_room_id.to_string();
    let changed = db
        .connection()
        .call(move |conn| {
            let n = conn.execute(
                "UPDATE chat_rooms SET mailed = 1 WHERE id = ?1 AND mailed = 0",
                [&chat_room_id],
            )?;
            Ok(n)
        })
        .await
        .map_err(map_tr_err)?;
    Ok(changed > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::queries::customers::{create_customer, find_customer};
    use crate::queries::test_support::{open_temp_db, seed_domain};

    #[tokio::test]
    async fn set_room_live_flips_flag() {
        let (_dir, db) = open_temp_db().await;
        let (_user, domain_id) = seed_domain(&db, "owner@example.test", "Acme").await;
        let record = create_customer(&db, &domain_id, "bob@x.com", &[]).await.unwrap();

        set_room_live(&db, &record.chat_room.id).await.unwrap();

        let reread = find_customer(&db, &domain_id, "bob@x.com")
            .await
            .unwrap()
            .unwrap();
        assert!(reread.chat_room.live);
    }

    #[tokio::test]
    async fn set_room_live_errors_on_unknown_room() {
        let (_dir, db) = open_temp_db().await;
        let err = set_room_live(&db, "no-such-room").await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn claim_notification_succeeds_exactly_once() {
        let (_dir, db) = open_temp_db().await;
        let (_user, domain_id) = seed_domain(&db, "owner@example.test", "Acme").await;
        let record = create_customer(&db, &domain_id, "bob@x.com", &[]).await.unwrap();

        assert!(claim_notification(&db, &record.chat_room.id).await.unwrap());
        assert!(!claim_notification(&db, &record.chat_room.id).await.unwrap());
        assert!(!claim_notification(&db, &record.chat_room.id).await.unwrap());
    }

    #[tokio::test]
    async fn claim_notification_on_unknown_room_is_false() {
        let (_dir, db) = open_temp_db().await;
        assert!(!claim_notification(&db, "ghost").await.unwrap());
    }
}
