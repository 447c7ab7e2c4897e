//! Message detail overlay: fetch-once view and the mark-as-read action.

use parking_lot::Mutex;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::models::{Message, MessageId, MessagePatch};
use crate::store::{MessageStore, StoreError};

#[derive(Debug, Clone, PartialEq)]
pub enum Overlay {
    Closed,
    Open(Message),
}

impl Overlay {
    pub fn is_open(&self) -> bool {
        matches!(self, Overlay::Open(_))
    }
}

/// How the operator dismissed the overlay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dismissal {
    CloseButton,
    Backdrop,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkReadOutcome {
    Marked,
    /// The record was already read; no write was issued.
    AlreadyRead,
}

pub struct DetailViewer {
    store: Arc<dyn MessageStore>,
    overlay: Mutex<Overlay>,
}

impl DetailViewer {
    pub fn new(store: Arc<dyn MessageStore>) -> Self {
        Self {
            store,
            overlay: Mutex::new(Overlay::Closed),
        }
    }

    pub fn overlay(&self) -> Overlay {
        self.overlay.lock().clone()
    }

    /// Opens the overlay when the record exists. A missing record or a store
    /// error leaves the overlay as it was.
    pub async fn view(&self, id: &MessageId) -> Overlay {
        match self.store.fetch_once(id).await {
            Ok(Some(message)) => {
                debug!("Opening message {}", id);
                *self.overlay.lock() = Overlay::Open(message);
            }
            Ok(None) => debug!("Message {} not found, overlay unchanged", id),
            Err(e) => warn!("Failed to fetch message {}: {}", id, e),
        }
        self.overlay()
    }

    /// Sets `read = true`. Success closes the overlay; on failure the
    /// overlay is left untouched and the caller alerts the operator.
    pub async fn mark_read(&self, id: &MessageId) -> Result<MarkReadOutcome, StoreError> {
        let current = self
            .store
            .fetch_once(id)
            .await?
            .ok_or_else(|| StoreError::NotFound(id.clone()))?;

        let outcome = if current.read {
            MarkReadOutcome::AlreadyRead
        } else {
            self.store.update(id, MessagePatch::MarkRead).await?;
            info!("Message {} marked as read", id);
            MarkReadOutcome::Marked
        };

        *self.overlay.lock() = Overlay::Closed;
        Ok(outcome)
    }

    pub fn dismiss(&self, how: Dismissal) {
        debug!("Overlay dismissed via {:?}", how);
        *self.overlay.lock() = Overlay::Closed;
    }

    pub fn close(&self) {
        self.dismiss(Dismissal::CloseButton);
    }
}
