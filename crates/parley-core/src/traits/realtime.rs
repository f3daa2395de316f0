// SPDX-FileCopyrightText: 2026 Parley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Realtime publisher trait for live chat room fan-out.

use async_trait::async_trait;

use crate::error::ParleyError;
use crate::traits::adapter::PluginAdapter;
use crate::types::RoomEvent;

/// Adapter for publishing messages to live chat room subscribers.
///
/// Publishing to a room with no subscribers is not an error; the transcript
/// in storage remains the source of truth.
#[async_trait]
pub trait RealtimePublisher: PluginAdapter {
    /// Publishes an event to all subscribers of `event.chat_room_id`.
    async fn publish(&self, event: RoomEvent) -> Result<(), ParleyError>;
}
