// SPDX-FileCopyrightText: 2026 Parley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Customer intake and lookup.
//!
//! Emails are normalized to lower case before any write or lookup, so the
//! UNIQUE (domain_id, email) constraint and `find_customer` agree on identity.

use parley_core::ParleyError;
use rusqlite::OptionalExtension;
use uuid::Uuid;

use crate::database::{Database, map_tr_err};
use crate::models::{ChatRoom, Customer, CustomerRecord};

/// Exact-match lookup by normalized email, joined with the customer's room.
pub async fn find_customer(
    db: &Database,
    domain_id: &str,
    email: &str,
) -> Result<Option<CustomerRecord>, ParleyError> {
    let domain_id = domain_id.to_string();
    let email = email.trim().to_lowercase();
    db.connection()
        .call(move |conn| {
            let record = conn
                .query_row(
                    "SELECT c.id, c.domain_id, c.email, r.id, r.live, r.mailed
                     FROM customers c
                     JOIN chat_rooms r ON r.customer_id = c.id
                     WHERE c.domain_id = ?1 AND c.email = ?2",
                    (&domain_id, &email),
                    |row| {
                        let customer_id: String = row.get(0)?;
                        Ok(CustomerRecord {
                            customer: Customer {
                                id: customer_id.clone(),
                                domain_id: row.get(1)?,
                                email: row.get(2)?,
                            },
                            chat_room: ChatRoom {
                                id: row.get(3)?,
                                customer_id,
                                live: row.get::<_, i64>(4)? != 0,
                                mailed: row.get::<_, i64>(5)? != 0,
                            },
                        })
                    },
                )
                .optional()?;
            Ok(record)
        })
        .await
        .map_err(map_tr_err)
}

/// Creates the customer, one response slot per domain question, and an empty
/// chat room in a single transaction.
pub async fn create_customer(
    db: &Database,
    domain_id: &str,
    email: &str,
    questions: &[String],
) -> Result<CustomerRecord, ParleyError> {
    let customer = Customer {
        id: Uuid::new_v4().to_string(),
        domain_id: domain_id.to_string(),
        email: email.trim().to_lowercase(),
    };
    let chat_room = ChatRoom {
        id: Uuid::new_v4().to_string(),
        customer_id: customer.id.clone(),
        live: false,
        mailed: false,
    };
    let row_customer = customer.clone();
    let row_room = chat_room.clone();
    let questions = questions.to_vec();
    db.connection()
        .call(move |conn| {
            let tx = conn.transaction()?;
            tx.execute(
                "INSERT INTO customers (id, domain_id, email) VALUES (?1, ?2, ?3)",
                (&row_customer.id, &row_customer.domain_id, &row_customer.email),
            )?;
            for question in &questions {
                tx.execute(
                    "INSERT INTO customer_responses (id, customer_id, question)
                     VALUES (?1, ?2, ?3)",
                    (Uuid::new_v4().to_string(), &row_customer.id, question),
                )?;
            }
            tx.execute(
                "INSERT INTO chat_rooms (id, customer_id) VALUES (?1, ?2)",
                (&row_room.id, &row_room.customer_id),
            )?;
            tx.commit()?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)?;
    Ok(CustomerRecord {
        customer,
        chat_room,
    })
}

/// All customers under a domain, for the marketing surface.
pub async fn domain_customers(
    db: &Database,
    domain_id: &str,
) -> Result<Vec<Customer>, ParleyError> {
    let domain_id = domain_id.to_string();
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT id, domain_id, email FROM customers
                 WHERE domain_id = ?1 ORDER BY rowid",
            )?;
            let customers = stmt
                .query_map([&domain_id], |row| {
                    Ok(Customer {
                        id: row.get(0)?,
                        domain_id: row.get(1)?,
                        email: row.get(2)?,
                    })
                })?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(customers)
        })
        .await
        .map_err(map_tr_err)
}
