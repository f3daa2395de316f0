// SPDX-FileCopyrightText: 2026 Parley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Row types persisted by this crate.
//!
//! The entity structs themselves live in `parley-core` so the orchestrator and
//! gateway can use them without depending on storage. This module re-exports
//! them for query code.

pub use parley_core::types::{
    Campaign, ChatRoom, Customer, CustomerRecord, CustomerResponse, Domain, DomainProfile,
    KnowledgeBaseEntry, Message, User,
};
