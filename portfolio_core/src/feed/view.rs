use serde::{Deserialize, Serialize};
use std::cmp::Reverse;

use crate::models::Message;
use crate::store::Snapshot;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedStats {
    pub total: usize,
    pub unread: usize,
    pub read: usize,
}

impl FeedStats {
    pub fn from_messages(messages: &[Message]) -> Self {
        let read = messages.iter().filter(|m| m.read).count();
        Self {
            total: messages.len(),
            unread: messages.len() - read,
            read,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedStatus {
    /// Waiting for the first snapshot.
    Loading,
    Live,
    /// The subscription ended with an error; the last good list is kept.
    Failed(String),
}

/// The operator's current view of the collection.
#[derive(Debug, Clone, PartialEq)]
pub struct FeedView {
    pub messages: Vec<Message>,
    pub stats: FeedStats,
    pub status: FeedStatus,
}

impl Default for FeedView {
    fn default() -> Self {
        Self::loading()
    }
}

impl FeedView {
    pub fn loading() -> Self {
        Self {
            messages: Vec::new(),
            stats: FeedStats::default(),
            status: FeedStatus::Loading,
        }
    }

    pub fn from_snapshot(snapshot: Snapshot) -> Self {
        let mut view = Self::loading();
        view.apply_snapshot(snapshot);
        view
    }

    /// Fully replaces the list and counters.
    pub fn apply_snapshot(&mut self, mut snapshot: Snapshot) {
        sort_newest_first(&mut snapshot);
        self.stats = FeedStats::from_messages(&snapshot);
        self.messages = snapshot;
        self.status = FeedStatus::Live;
    }

    pub fn fail(&mut self, reason: impl Into<String>) {
        self.status = FeedStatus::Failed(reason.into());
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

/// Newest first by parsed timestamp, ties by ascending id, unparseable
/// timestamps after every parseable one.
pub fn sort_newest_first(messages: &mut [Message]) {
    messages.sort_by_cached_key(|m| {
        let timestamp = m.parsed_timestamp();
        (timestamp.is_none(), Reverse(timestamp), m.id.clone())
    });
}
