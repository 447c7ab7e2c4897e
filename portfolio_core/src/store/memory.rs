//! In-process message store with the same listener semantics as the hosted
//! realtime database. Used for development and tests.

use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::debug;

use super::push_id::PushIdGenerator;
use super::{MessageStore, Snapshot, StoreError, Subscription};
use crate::models::{Message, MessageId, MessagePatch, NewMessage, StoredMessage};

/// Toggles mirroring the hosted store's security rules. Reads and updates
/// always require a credential; pushes never do.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AccessRules {
    pub reads_denied: bool,
    pub updates_denied: bool,
    pub pushes_denied: bool,
}

struct MemoryInner {
    records: RwLock<BTreeMap<MessageId, StoredMessage>>,
    rules: RwLock<AccessRules>,
    changes: watch::Sender<u64>,
    ids: PushIdGenerator,
}

impl MemoryInner {
    fn notify(&self) {
        self.changes.send_modify(|version| *version += 1);
    }

    fn check_read(&self, authorized: bool) -> Result<(), StoreError> {
        if !authorized || self.rules.read().reads_denied {
            return Err(StoreError::PermissionDenied);
        }
        Ok(())
    }

    fn snapshot(&self) -> Snapshot {
        self.records
            .read()
            .iter()
            .map(|(id, stored)| Message::from_stored(id.clone(), stored.clone()))
            .collect()
    }
}

#[derive(Clone)]
pub struct MemoryStore {
    inner: Arc<MemoryInner>,
    credential: Option<String>,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        let (changes, _) = watch::channel(0);
        Self {
            inner: Arc::new(MemoryInner {
                records: RwLock::new(BTreeMap::new()),
                rules: RwLock::new(AccessRules::default()),
                changes,
                ids: PushIdGenerator::new(),
            }),
            credential: None,
        }
    }

    pub fn set_access_rules(&self, rules: AccessRules) {
        *self.inner.rules.write() = rules;
        self.inner.notify();
    }

    pub fn access_rules(&self) -> AccessRules {
        *self.inner.rules.read()
    }

    /// Writes a record directly, bypassing access rules.
    pub fn insert(&self, id: MessageId, stored: StoredMessage) {
        self.inner.records.write().insert(id, stored);
        self.inner.notify();
    }

    pub fn len(&self) -> usize {
        self.inner.records.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Every record, bypassing access rules.
    pub fn all(&self) -> Snapshot {
        self.inner.snapshot()
    }

    /// Number of live subscriptions.
    pub fn listener_count(&self) -> usize {
        self.inner.changes.receiver_count()
    }

    fn is_authorized(&self) -> bool {
        self.credential.as_deref().map_or(false, |token| !token.is_empty())
    }
}

#[async_trait]
impl MessageStore for MemoryStore {
    fn backend_name(&self) -> &'static str {
        "memory"
    }

    async fn subscribe(&self) -> Result<Subscription, StoreError> {
        let authorized = self.is_authorized();
        self.inner.check_read(authorized)?;

        let inner = self.inner.clone();
        let mut changes = inner.changes.subscribe();

        Ok(Subscription::spawn(move |tx| async move {
            loop {
                drop(changes.borrow_and_update());

                let result = inner.check_read(authorized).map(|_| inner.snapshot());
                let terminal = result.is_err();
                if let Ok(snapshot) = &result {
                    debug!("Memory store emitting snapshot of {} messages", snapshot.len());
                }

                if tx.send(result).await.is_err() || terminal {
                    break;
                }
                if changes.changed().await.is_err() {
                    break;
                }
            }
        }))
    }

    async fn fetch_once(&self, id: &MessageId) -> Result<Option<Message>, StoreError> {
        self.inner.check_read(self.is_authorized())?;
        let records = self.inner.records.read();
        Ok(records
            .get(id)
            .map(|stored| Message::from_stored(id.clone(), stored.clone())))
    }

    async fn update(&self, id: &MessageId, patch: MessagePatch) -> Result<(), StoreError> {
        if !self.is_authorized() || self.inner.rules.read().updates_denied {
            return Err(StoreError::PermissionDenied);
        }

        {
            let mut records = self.inner.records.write();
            let stored = records
                .get_mut(id)
                .ok_or_else(|| StoreError::NotFound(id.clone()))?;
            patch.apply(stored);
        }

        self.inner.notify();
        Ok(())
    }

    async fn push(&self, message: NewMessage) -> Result<MessageId, StoreError> {
        if self.inner.rules.read().pushes_denied {
            return Err(StoreError::PermissionDenied);
        }

        let id = MessageId::from_store(self.inner.ids.generate());
        self.inner
            .records
            .write()
            .insert(id.clone(), message.into_stored());
        self.inner.notify();
        Ok(id)
    }

    fn authorized(&self, id_token: &str) -> Arc<dyn MessageStore> {
        Arc::new(Self {
            inner: self.inner.clone(),
            credential: Some(id_token.to_string()),
        })
    }
}
