// SPDX-FileCopyrightText: 2026 Parley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Marketing campaign bookkeeping.

use chrono::Utc;
use parley_core::ParleyError;
use rusqlite::OptionalExtension;
use uuid::Uuid;

use crate::database::{Database, map_tr_err};
use crate::models::Campaign;

pub async fn create_campaign(
    db: &Database,
    user_id: &str,
    name: &str,
) -> Result<Campaign, ParleyError> {
    let campaign = Campaign {
        id: Uuid::new_v4().to_string(),
        user_id: user_id.to_string(),
        name: name.to_string(),
        template: None,
        created_at: Utc::now().to_rfc3339(),
    };
    let row = campaign.clone();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO campaigns (id, user_id, name, created_at) VALUES (?1, ?2, ?3, ?4)",
                (&row.id, &row.user_id, &row.name, &row.created_at),
            )?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)?;
    Ok(campaign)
}

pub async fn get_campaign(
    db: &Database,
    campaign_id: &str,
) -> Result<Option<Campaign>, ParleyError> {
    let campaign_id = campaign_id.to_string();
    db.connection()
        .call(move |conn| {
            let campaign = conn
                .query_row(
                    "SELECT id, user_id, name, template, created_at
                     FROM campaigns WHERE id = ?1",
                    [&campaign_id],
                    |row| {
                        Ok(Campaign {
                            id: row.get(0)?,
                            user_id: row.get(1)?,
                            name: row.get(2)?,
                            template: row.get(3)?,
                            created_at: row.get(4)?,
                        })
                    },
                )
                .optional()?;
            Ok(campaign)
        })
        .await
        .map_err(map_tr_err)
}

pub async fn save_campaign_template(
    db: &Database,
    campaign_id: &str,
    template: &str,
) -> Result<(), ParleyError> {
    let campaign_id = campaign_id.to_string();
    let id = campaign_id.clone();
    let template = template.to_string();
    let changed = db
        .connection()
        .call(move |conn| {
            let n = conn.execute(
                "UPDATE campaigns SET template = ?2 WHERE id = ?1",
                (&id, &template),
            )?;
            Ok(n)
        })
        .await
        .map_err(map_tr_err)?;
    if changed == 0 {
        return Err(ParleyError::NotFound {
            entity: "campaign",
            id: campaign_id,
        });
    }
    Ok(())
}

/// Attaches customers to a campaign; already-attached ids are ignored.
pub async fn add_campaign_customers(
    db: &Database,
    campaign_id: &str,
    customer_ids: &[String],
) -> Result<(), ParleyError> {
    let campaign_id = campaign_id.to_string();
    let customer_ids = customer_ids.to_vec();
    db.connection()
        .call(move |conn| {
            let tx = conn.transaction()?;
            for customer_id in &customer_ids {
                tx.execute(
                    "INSERT OR IGNORE INTO campaign_customers (campaign_id, customer_id)
                     VALUES (?1, ?2)",
                    (&campaign_id, customer_id),
                )?;
            }
            tx.commit()?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)
}

/// Distinct recipient emails for a campaign.
pub async fn campaign_recipients(
    db: &Database,
    campaign_id: &str,
) -> Result<Vec<String>, ParleyError> {
    let campaign_id = campaign_id.to_string();
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT DISTINCT c.email FROM campaign_customers cc
                 JOIN customers c ON c.id = cc.customer_id
                 WHERE cc.campaign_id = ?1 ORDER BY c.email",
            )?;
            let emails = stmt
                .query_map([&campaign_id], |row| row.get(0))?
                .collect::<Result<Vec<String>, _>>()?;
            Ok(emails)
        })
        .await
        .map_err(map_tr_err)
}
