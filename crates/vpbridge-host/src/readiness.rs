use std::collections::BTreeSet;

use serde::Serialize;
use vpbridge_protocol::PlayerId;

/// Readiness of one player as known to the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PlayerState {
    /// No ready message seen.
    Unknown,
    /// Ready; terminal for the life of the page.
    Ready,
}

/// Players that have reported ready.
///
/// Entries are only ever added.
#[derive(Debug, Clone, Default)]
pub struct ReadinessTable {
    ready: BTreeSet<PlayerId>,
}

impl ReadinessTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `id` as ready. Returns true if it was not ready before.
    pub fn mark_ready(&mut self, id: PlayerId) -> bool {
        self.ready.insert(id)
    }

    pub fn is_ready(&self, id: &PlayerId) -> bool {
        self.ready.contains(id)
    }

    pub fn state(&self, id: &PlayerId) -> PlayerState {
        if self.is_ready(id) {
            PlayerState::Ready
        } else {
            PlayerState::Unknown
        }
    }

    pub fn len(&self) -> usize {
        self.ready.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ready.is_empty()
    }

    /// Ready players in id order.
    pub fn iter(&self) -> impl Iterator<Item = &PlayerId> {
        self.ready.iter()
    }
}
