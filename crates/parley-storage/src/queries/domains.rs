// SPDX-FileCopyrightText: 2026 Parley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Tenant onboarding: users, domains, filter questions, knowledge base.

use parley_core::ParleyError;
use rusqlite::OptionalExtension;
use uuid::Uuid;

use crate::database::{Database, map_tr_err};
use crate::models::{Domain, DomainProfile, KnowledgeBaseEntry, User};

pub async fn create_user(db: &Database, email: &str) -> Result<User, ParleyError> {
    let id = Uuid::new_v4().to_string();
    let email = email.to_lowercase();
    let user = User {
        id: id.clone(),
        email: email.clone(),
    };
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO users (id, email) VALUES (?1, ?2)",
                (&id, &email),
            )?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)?;
    Ok(user)
}

pub async fn create_domain(db: &Database, user_id: &str, name: &str) -> Result<Domain, ParleyError> {
    let id = Uuid::new_v4().to_string();
    let user_id = user_id.to_string();
    let name = name.to_string();
    let row_id = id.clone();
    let row_user = user_id.clone();
    let row_name = name.clone();
    let welcome = db
        .connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO domains (id, user_id, name) VALUES (?1, ?2, ?3)",
                (&row_id, &row_user, &row_name),
            )?;
            let welcome: String = conn.query_row(
                "SELECT welcome_message FROM domains WHERE id = ?1",
                [&row_id],
                |row| row.get(0),
            )?;
            Ok(welcome)
        })
        .await
        .map_err(map_tr_err)?;
    Ok(Domain {
        id,
        user_id,
        name,
        welcome_message: welcome,
        icon: None,
        text_color: None,
        background: None,
        helpdesk: false,
    })
}

pub async fn get_domain(db: &Database, domain_id: &str) -> Result<Option<Domain>, ParleyError> {
    let domain_id = domain_id.to_string();
    db.connection()
        .call(move |conn| {
            let domain = conn
                .query_row(
                    "SELECT id, user_id, name, welcome_message, icon, text_color, background, helpdesk
                     FROM domains WHERE id = ?1",
                    [&domain_id],
                    map_domain_row,
                )
                .optional()?;
            Ok(domain)
        })
        .await
        .map_err(map_tr_err)
}

pub async fn add_filter_question(
    db: &Database,
    domain_id: &str,
    question: &str,
) -> Result<(), ParleyError> {
    let id = Uuid::new_v4().to_string();
    let domain_id = domain_id.to_string();
    let question = question.to_string();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO filter_questions (id, domain_id, question) VALUES (?1, ?2, ?3)",
                (&id, &domain_id, &question),
            )?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)
}

pub async fn add_knowledge_entry(
    db: &Database,
    domain_id: &str,
    title: &str,
    content: &str,
) -> Result<KnowledgeBaseEntry, ParleyError> {
    let entry = KnowledgeBaseEntry {
        id: Uuid::new_v4().to_string(),
        domain_id: domain_id.to_string(),
        title: title.to_string(),
        content: content.to_string(),
    };
    let row = entry.clone();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO knowledge_base (id, domain_id, title, content) VALUES (?1, ?2, ?3, ?4)",
                (&row.id, &row.domain_id, &row.title, &row.content),
            )?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)?;
    Ok(entry)
}

/// The per-call slice of domain config the orchestrator reads: domain name,
/// questions still missing an answer at the domain level, and the knowledge
/// base. `None` when the domain does not exist.
pub async fn domain_profile(
    db: &Database,
    domain_id: &str,
) -> Result<Option<DomainProfile>, ParleyError> {
    let domain_id = domain_id.to_string();
    db.connection()
        .call(move |conn| {
            let header = conn
                .query_row(
                    "SELECT id, name FROM domains WHERE id = ?1",
                    [&domain_id],
                    |row| Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?)),
                )
                .optional()?;
            let Some((id, name)) = header else {
                return Ok(None);
            };

            let mut stmt = conn.prepare(
                "SELECT question FROM filter_questions
                 WHERE domain_id = ?1 AND answered IS NULL
                 ORDER BY rowid",
            )?;
            let unanswered_questions = stmt
                .query_map([&domain_id], |row| row.get(0))?
                .collect::<Result<Vec<String>, _>>()?;

            let mut stmt = conn.prepare(
                "SELECT id, domain_id, title, content FROM knowledge_base
                 WHERE domain_id = ?1 ORDER BY rowid",
            )?;
            let knowledge_base = stmt
                .query_map([&domain_id], |row| {
                    Ok(KnowledgeBaseEntry {
                        id: row.get(0)?,
                        domain_id: row.get(1)?,
                        title: row.get(2)?,
                        content: row.get(3)?,
                    })
                })?
                .collect::<Result<Vec<_>, _>>()?;

            Ok(Some(DomainProfile {
                id,
                name,
                unanswered_questions,
                knowledge_base,
            }))
        })
        .await
        .map_err(map_tr_err)
}

/// The owning user's email for escalation notices.
pub async fn domain_owner_email(
    db: &Database,
    domain_id: &str,
) -> Result<Option<String>, ParleyError> {
    let domain_id = domain_id.to_string();
    db.connection()
        .call(move |conn| {
            let email = conn
                .query_row(
                    "SELECT u.email FROM users u
                     JOIN domains d ON d.user_id = u.id
                     WHERE d.id = ?1",
                    [&domain_id],
                    |row| row.get(0),
                )
                .optional()?;
            Ok(email)
        })
        .await
        .map_err(map_tr_err)
}

fn map_domain_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Domain> {
    Ok(Domain {
        id: row.get(0)?,
        user_id: row.get(1)?,
        name: row.get(2)?,
        welcome_message: row.get(3)?,
        icon: row.get(4)?,
        text_color: row.get(5)?,
        background: row.get(6)?,
        helpdesk: row.get::<_, i64>(7)? != 0,
    })
}
