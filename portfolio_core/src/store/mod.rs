//! The remote message store and its backends.

pub mod memory;
pub mod push_id;
pub mod rtdb;
pub mod sse;
pub mod subscription;

use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

use crate::models::{Message, MessageId, MessagePatch, NewMessage};

pub use memory::MemoryStore;
pub use rtdb::RtdbStore;
pub use subscription::Subscription;

/// The whole collection, as delivered on every change.
pub type Snapshot = Vec<Message>;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum StoreError {
    #[error("permission denied")]
    PermissionDenied,

    #[error("message {0} not found")]
    NotFound(MessageId),

    #[error("credential revoked by the store")]
    AuthRevoked,

    #[error("network error: {0}")]
    Network(String),

    #[error("unexpected response ({status}): {body}")]
    Http { status: u16, body: String },

    #[error("malformed store data: {0}")]
    Malformed(String),

    #[error("subscription closed by the store")]
    Closed,
}

impl From<reqwest::Error> for StoreError {
    fn from(err: reqwest::Error) -> Self {
        StoreError::Network(err.to_string())
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        StoreError::Malformed(err.to_string())
    }
}

#[async_trait]
pub trait MessageStore: Send + Sync {
    fn backend_name(&self) -> &'static str;

    /// Long-lived listener delivering the full collection on every change.
    /// Ends on drop, on `unsubscribe`, or after yielding a terminal error.
    async fn subscribe(&self) -> Result<Subscription, StoreError>;

    /// Single point-in-time read of one record.
    async fn fetch_once(&self, id: &MessageId) -> Result<Option<Message>, StoreError>;

    async fn update(&self, id: &MessageId, patch: MessagePatch) -> Result<(), StoreError>;

    async fn push(&self, message: NewMessage) -> Result<MessageId, StoreError>;

    /// A handle whose calls carry the operator's id token.
    fn authorized(&self, id_token: &str) -> Arc<dyn MessageStore>;
}
