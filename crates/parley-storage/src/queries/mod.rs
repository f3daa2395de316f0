// SPDX-FileCopyrightText: 2026 Parley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Query modules, one per table cluster.
//!
//! Every function takes `&Database` and runs on the single background
//! connection thread. Row mapping stays next to the SQL that produces it.

pub mod campaigns;
pub mod chat_rooms;
pub mod customers;
pub mod domains;
pub mod messages;
pub mod responses;

#[cfg(test)]
pub(crate) mod test_support {
    use crate::database::Database;
    use tempfile::TempDir;

    /// Opens a fresh migrated database in a tempdir. The dir must outlive
    /// the handle, so both are returned.
    pub async fn open_temp_db() -> (TempDir, Database) {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("test.db");
        let db = Database::open(path.to_str().unwrap()).await.unwrap();
        (dir, db)
    }

    /// Seeds a user and a domain, returning (user_id, domain_id).
    pub async fn seed_domain(db: &Database, owner_email: &str, name: &str) -> (String, String) {
        let user = super::domains::create_user(db, owner_email).await.unwrap();
        let domain = super::domains::create_domain(db, &user.id, name)
            .await
            .unwrap();
        (user.id, domain.id)
    }
}
