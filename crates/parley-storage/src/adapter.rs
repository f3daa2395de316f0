// SPDX-FileCopyrightText: 2026 Parley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite implementation of the StorageAdapter trait.

use async_trait::async_trait;
use tokio::sync::OnceCell;
use tracing::debug;

use parley_config::model::StorageConfig;
use parley_core::types::{
    Campaign, Customer, CustomerRecord, CustomerResponse, Domain, DomainProfile,
    KnowledgeBaseEntry, Message, User,
};
use parley_core::{AdapterType, HealthStatus, ParleyError, PluginAdapter, StorageAdapter};

use crate::database::Database;
use crate::queries;

/// SQLite-backed storage adapter.
///
/// Wraps a [`Database`] handle and delegates all query operations to the
/// typed query modules. The database is lazily initialized on the first
/// call to [`StorageAdapter::initialize`].
pub struct SqliteStorage {
    config: StorageConfig,
    db: OnceCell<Database>,
}

impl SqliteStorage {
    /// Create a new SqliteStorage with the given configuration.
    ///
    /// The database connection is not opened until [`initialize`] is called.
    pub fn new(config: StorageConfig) -> Self {
        Self {
            config,
            db: OnceCell::new(),
        }
    }

    fn db(&self) -> Result<&Database, ParleyError> {
        self.db.get().ok_or_else(|| ParleyError::Storage {
            source: "storage not initialized -- call initialize() first".into(),
        })
    }
}

#[async_trait]
impl PluginAdapter for SqliteStorage {
    fn name(&self) -> &str {
        "sqlite"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Storage
    }

    async fn health_check(&self) -> Result<HealthStatus, ParleyError> {
        let db = self.db()?;
        db.connection()
            .call(|conn| {
                conn.execute_batch("SELECT 1;")?;
                Ok(())
            })
            .await
            .map_err(crate::database::map_tr_err)?;
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), ParleyError> {
        if let Some(db) = self.db.get() {
            db.close().await?;
            debug!("shutdown: storage closed");
        }
        Ok(())
    }
}

#[async_trait]
impl StorageAdapter for SqliteStorage {
    async fn initialize(&self) -> Result<(), ParleyError> {
        let path = self.config.database_path.clone();
        let db = Database::open_with_options(&path, self.config.wal_mode).await?;
        self.db.set(db).map_err(|_| ParleyError::Storage {
            source: "storage already initialized".into(),
        })?;
        debug!(path = %self.config.database_path, "SQLite storage initialized");
        Ok(())
    }

    async fn close(&self) -> Result<(), ParleyError> {
        self.db()?.close().await
    }

    // --- Tenant onboarding ---

    async fn create_user(&self, email: &str) -> Result<User, ParleyError> {
        queries::domains::create_user(self.db()?, email).await
    }

    async fn create_domain(&self, user_id: &str, name: &str) -> Result<Domain, ParleyError> {
        queries::domains::create_domain(self.db()?, user_id, name).await
    }

    async fn get_domain(&self, domain_id: &str) -> Result<Option<Domain>, ParleyError> {
        queries::domains::get_domain(self.db()?, domain_id).await
    }

    async fn add_filter_question(
        &self,
        domain_id: &str,
        question: &str,
    ) -> Result<(), ParleyError> {
        queries::domains::add_filter_question(self.db()?, domain_id, question).await
    }

    async fn add_knowledge_entry(
        &self,
        domain_id: &str,
        title: &str,
        content: &str,
    ) -> Result<KnowledgeBaseEntry, ParleyError> {
        queries::domains::add_knowledge_entry(self.db()?, domain_id, title, content).await
    }

    // --- Orchestrator reads ---

    async fn domain_profile(
        &self,
        domain_id: &str,
    ) -> Result<Option<DomainProfile>, ParleyError> {
        queries::domains::domain_profile(self.db()?, domain_id).await
    }

    async fn domain_owner_email(
        &self,
        domain_id: &str,
    ) -> Result<Option<String>, ParleyError> {
        queries::domains::domain_owner_email(self.db()?, domain_id).await
    }

    async fn find_customer(
        &self,
        domain_id: &str,
        email: &str,
    ) -> Result<Option<CustomerRecord>, ParleyError> {
        queries::customers::find_customer(self.db()?, domain_id, email).await
    }

    // --- Orchestrator writes ---

    async fn create_customer(
        &self,
        domain_id: &str,
        email: &str,
        questions: &[String],
    ) -> Result<CustomerRecord, ParleyError> {
        queries::customers::create_customer(self.db()?, domain_id, email, questions).await
    }

    async fn append_message(&self, message: &Message) -> Result<(), ParleyError> {
        queries::messages::append_message(self.db()?, message).await
    }

    async fn messages_for_room(
        &self,
        chat_room_id: &str,
    ) -> Result<Vec<Message>, ParleyError> {
        queries::messages::messages_for_room(self.db()?, chat_room_id).await
    }

    async fn set_room_live(&self, chat_room_id: &str) -> Result<(), ParleyError> {
        queries::chat_rooms::set_room_live(self.db()?, chat_room_id).await
    }

    async fn claim_notification(&self, chat_room_id: &str) -> Result<bool, ParleyError> {
        queries::chat_rooms::claim_notification(self.db()?, chat_room_id).await
    }

    async fn first_unanswered_response(
        &self,
        customer_id: &str,
    ) -> Result<Option<CustomerResponse>, ParleyError> {
        queries::responses::first_unanswered_response(self.db()?, customer_id).await
    }

    async fn record_answer(&self, response_id: &str, answer: &str) -> Result<(), ParleyError> {
        queries::responses::record_answer(self.db()?, response_id, answer).await
    }

    // --- Marketing ---

    async fn create_campaign(&self, user_id: &str, name: &str) -> Result<Campaign, ParleyError> {
        queries::campaigns::create_campaign(self.db()?, user_id, name).await
    }

    async fn get_campaign(&self, campaign_id: &str) -> Result<Option<Campaign>, ParleyError> {
        queries::campaigns::get_campaign(self.db()?, campaign_id).await
    }

    async fn save_campaign_template(
        &self,
        campaign_id: &str,
        template: &str,
    ) -> Result<(), ParleyError> {
        queries::campaigns::save_campaign_template(self.db()?, campaign_id, template).await
    }

    async fn add_campaign_customers(
        &self,
        campaign_id: &str,
        customer_ids: &[String],
    ) -> Result<(), ParleyError> {
        queries::campaigns::add_campaign_customers(self.db()?, campaign_id, customer_ids).await
    }

    async fn campaign_recipients(
        &self,
        campaign_id: &str,
    ) -> Result<Vec<String>, ParleyError> {
        queries::campaigns::campaign_recipients(self.db()?, campaign_id).await
    }

    async fn domain_customers(&self, domain_id: &str) -> Result<Vec<Customer>, ParleyError> {
        queries::customers::domain_customers(self.db()?, domain_id).await
    }
}
