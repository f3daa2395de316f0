// SPDX-FileCopyrightText: 2026 Parley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Bounded in-memory store for per-conversation chat sessions.
//!
//! The chat endpoint is unauthenticated, so callers can mint arbitrary
//! conversation ids and the map must not grow without limit. Entries expire
//! after an idle TTL; once the store passes its capacity an insert sweeps
//! stale entries and, if the store is still over, drops the stalest.

use std::time::{Duration, Instant};

use dashmap::DashMap;
use parley_bot::ChatSession;

/// Resident sessions before an insert triggers a sweep.
const MAX_SESSIONS: usize = 10_000;

/// Idle time after which a session may be evicted.
const SESSION_TTL: Duration = Duration::from_secs(30 * 60);

struct SessionEntry {
    session: ChatSession,
    last_seen: Instant,
}

/// Session map keyed by conversation id, with TTL and capacity eviction.
///
/// Eviction only costs the visitor their captured email; a dropped session
/// re-resolves on the next message that carries one.
pub struct SessionStore {
    entries: DashMap<String, SessionEntry>,
    capacity: usize,
    ttl: Duration,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::with_limits(MAX_SESSIONS, SESSION_TTL)
    }

    /// A store with explicit limits. [`SessionStore::new`] uses the defaults.
    pub fn with_limits(capacity: usize, ttl: Duration) -> Self {
        Self {
            entries: DashMap::new(),
            capacity,
            ttl,
        }
    }

    /// Looks up a session and refreshes its idle clock.
    pub fn get(&self, conversation_id: &str) -> Option<ChatSession> {
        self.entries.get_mut(conversation_id).map(|mut entry| {
            entry.last_seen = Instant::now();
            entry.session.clone()
        })
    }

    /// Stores a session, sweeping once the store is over capacity.
    pub fn insert(&self, conversation_id: String, session: ChatSession) {
        self.entries.insert(
            conversation_id,
            SessionEntry {
                session,
                last_seen: Instant::now(),
            },
        );
        if self.entries.len() > self.capacity {
            self.sweep();
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn sweep(&self) {
        let now = Instant::now();
        self.entries
            .retain(|_, entry| now.duration_since(entry.last_seen) < self.ttl);
        // A burst of fresh sessions can still exceed capacity; drop the
        // stalest until bounded.
        while self.entries.len() > self.capacity {
            let stalest = self
                .entries
                .iter()
                .min_by_key(|entry| entry.value().last_seen)
                .map(|entry| entry.key().clone());
            match stalest {
                Some(key) => {
                    self.entries.remove(&key);
                }
                None => break,
            }
        }
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}
