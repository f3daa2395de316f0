// SPDX-FileCopyrightText: 2026 Parley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Storage adapter trait for the persistence gateway.

use async_trait::async_trait;

use crate::error::ParleyError;
use crate::traits::adapter::PluginAdapter;
use crate::types::{
    Campaign, Customer, CustomerRecord, CustomerResponse, Domain, DomainProfile,
    KnowledgeBaseEntry, Message, User,
};

/// Adapter for the relational persistence gateway.
///
/// Covers the CRUD surface the orchestrator, gateway, and CLI need: tenant
/// onboarding, customer intake, transcript appends, chat room flag flips,
/// and campaign bookkeeping.
#[async_trait]
pub trait StorageAdapter: PluginAdapter {
    /// Initializes the storage backend (migrations, connection, etc.).
    async fn initialize(&self) -> Result<(), ParleyError>;

    /// Closes the storage backend, flushing pending writes.
    async fn close(&self) -> Result<(), ParleyError>;

    // --- Tenant onboarding ---

    async fn create_user(&self, email: &str) -> Result<User, ParleyError>;

    async fn create_domain(&self, user_id: &str, name: &str) -> Result<Domain, ParleyError>;

    async fn get_domain(&self, domain_id: &str) -> Result<Option<Domain>, ParleyError>;

    async fn add_filter_question(
        &self,
        domain_id: &str,
        question: &str,
    ) -> Result<(), ParleyError>;

    async fn add_knowledge_entry(
        &self,
        domain_id: &str,
        title: &str,
        content: &str,
    ) -> Result<KnowledgeBaseEntry, ParleyError>;

    // --- Orchestrator reads ---

    /// The per-call slice of domain config: name, unanswered questions,
    /// knowledge-base entries. `None` when the domain does not exist.
    async fn domain_profile(&self, domain_id: &str)
        -> Result<Option<DomainProfile>, ParleyError>;

    /// The owning user's registered email, for escalation notices.
    async fn domain_owner_email(&self, domain_id: &str)
        -> Result<Option<String>, ParleyError>;

    /// Exact-match customer lookup by normalized (lower-cased) email.
    async fn find_customer(
        &self,
        domain_id: &str,
        email: &str,
    ) -> Result<Option<CustomerRecord>, ParleyError>;

    // --- Orchestrator writes ---

    /// Creates a customer, one response slot per question, and an empty chat
    /// room, atomically.
    async fn create_customer(
        &self,
        domain_id: &str,
        email: &str,
        questions: &[String],
    ) -> Result<CustomerRecord, ParleyError>;

    /// Appends one transcript row. No blank-message guard here; that lives
    /// in the conversation store.
    async fn append_message(&self, message: &Message) -> Result<(), ParleyError>;

    /// Transcript rows for a room in creation order.
    async fn messages_for_room(&self, chat_room_id: &str)
        -> Result<Vec<Message>, ParleyError>;

    /// Marks a chat room as escalated to a human operator.
    async fn set_room_live(&self, chat_room_id: &str) -> Result<(), ParleyError>;

    /// Compare-and-set on the room's `mailed` flag. Returns true for exactly
    /// one caller per room; the winner sends the notification email.
    async fn claim_notification(&self, chat_room_id: &str) -> Result<bool, ParleyError>;

    /// The customer's first response slot with no recorded answer, ordered by
    /// question text ascending.
    async fn first_unanswered_response(
        &self,
        customer_id: &str,
    ) -> Result<Option<CustomerResponse>, ParleyError>;

    /// Records an answer into a response slot.
    async fn record_answer(&self, response_id: &str, answer: &str)
        -> Result<(), ParleyError>;

    // --- Marketing ---

    async fn create_campaign(&self, user_id: &str, name: &str)
        -> Result<Campaign, ParleyError>;

    /// Campaign row by id, `None` when it does not exist.
    async fn get_campaign(&self, campaign_id: &str) -> Result<Option<Campaign>, ParleyError>;

    async fn save_campaign_template(
        &self,
        campaign_id: &str,
        template: &str,
    ) -> Result<(), ParleyError>;

    async fn add_campaign_customers(
        &self,
        campaign_id: &str,
        customer_ids: &[String],
    ) -> Result<(), ParleyError>;

    /// Distinct recipient emails for a campaign.
    async fn campaign_recipients(&self, campaign_id: &str)
        -> Result<Vec<String>, ParleyError>;

    /// All customers under a domain, for the marketing surface.
    async fn domain_customers(&self, domain_id: &str) -> Result<Vec<Customer>, ParleyError>;
}
