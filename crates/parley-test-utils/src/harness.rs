// SPDX-FileCopyrightText: 2026 Parley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Storage fixture for integration testing.
//!
//! `StorageFixture` opens a migrated SQLite database in a temp directory and
//! seeds a tenant, so orchestrator tests start from a realistic state.

use std::sync::Arc;

use parley_config::model::StorageConfig;
use parley_core::{ParleyError, StorageAdapter};
use parley_storage::SqliteStorage;

/// A migrated temp-file SQLite database with one seeded tenant.
///
/// The temp directory lives as long as the fixture; dropping it deletes
/// the database.
pub struct StorageFixture {
    _temp_dir: tempfile::TempDir,
    pub storage: Arc<dyn StorageAdapter>,
    pub user_id: String,
    pub domain_id: String,
}

impl StorageFixture {
    /// Creates a fixture with a domain named `Acme` owned by
    /// `owner@example.test`, with no questions or knowledge base.
    pub async fn new() -> Result<Self, ParleyError> {
        let temp_dir = tempfile::TempDir::new().map_err(|e| ParleyError::Storage {
            source: Box::new(e),
        })?;
        let db_path = temp_dir.path().join("fixture.db");

        let storage = SqliteStorage::new(StorageConfig {
            database_path: db_path.to_string_lossy().into_owned(),
            wal_mode: true,
        });
        storage.initialize().await?;

        let user = storage.create_user("owner@example.test").await?;
        let domain = storage.create_domain(&user.id, "Acme").await?;

        Ok(Self {
            _temp_dir: temp_dir,
            storage: Arc::new(storage),
            user_id: user.id,
            domain_id: domain.id,
        })
    }

    /// Adds a qualification question to the seeded domain.
    pub async fn add_question(&self, question: &str) -> Result<(), ParleyError> {
        self.storage
            .add_filter_question(&self.domain_id, question)
            .await
    }

    /// Adds a knowledge-base entry to the seeded domain.
    pub async fn add_knowledge(&self, title: &str, content: &str) -> Result<(), ParleyError> {
        self.storage
            .add_knowledge_entry(&self.domain_id, title, content)
            .await?;
        Ok(())
    }
}
