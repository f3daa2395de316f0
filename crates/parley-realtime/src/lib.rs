// SPDX-FileCopyrightText: 2026 Parley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-process realtime fan-out for live chat rooms.
//!
//! One broadcast channel per chat room, created lazily on first subscribe or
//! publish. The transcript in storage stays the source of truth; these events
//! only feed connected WebSocket clients.

use async_trait::async_trait;
use dashmap::DashMap;
use tokio::sync::broadcast;
use tracing::debug;

use parley_core::types::RoomEvent;
use parley_core::{AdapterType, HealthStatus, ParleyError, PluginAdapter, RealtimePublisher};

/// Buffered events per room channel before lagging subscribers drop messages.
const CHANNEL_CAPACITY: usize = 64;

/// Broadcast hub keyed by chat room id.
pub struct RealtimeHub {
    channels: DashMap<String, broadcast::Sender<RoomEvent>>,
}

impl RealtimeHub {
    pub fn new() -> Self {
        Self {
            channels: DashMap::new(),
        }
    }

    /// Subscribe to a room's events, creating the channel if needed.
    pub fn subscribe(&self, chat_room_id: &str) -> broadcast::Receiver<RoomEvent> {
        self.channels
            .entry(chat_room_id.to_string())
            .or_insert_with(|| broadcast::channel(CHANNEL_CAPACITY).0)
            .subscribe()
    }

    /// Drops a room's channel once its last subscriber is gone.
    pub fn prune(&self, chat_room_id: &str) {
        self.channels
            .remove_if(chat_room_id, |_, sender| sender.receiver_count() == 0);
    }
}

impl Default for RealtimeHub {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PluginAdapter for RealtimeHub {
    fn name(&self) -> &str {
        "broadcast-hub"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Realtime
    }

    async fn health_check(&self) -> Result<HealthStatus, ParleyError> {
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), ParleyError> {
        self.channels.clear();
        Ok(())
    }
}

#[async_trait]
impl RealtimePublisher for RealtimeHub {
    async fn publish(&self, event: RoomEvent) -> Result<(), ParleyError> {
        if let Some(sender) = self.channels.get(&event.chat_room_id) {
            // send() errors only when there are no receivers; not a failure.
            let delivered = sender.send(event.clone()).unwrap_or(0);
            debug!(
                chat_room_id = %event.chat_room_id,
                delivered,
                "room event published"
            );
        } else {
            debug!(chat_room_id = %event.chat_room_id, "no subscribers for room event");
        }
        Ok(())
    }
}
