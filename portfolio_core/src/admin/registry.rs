use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

use super::context::AdminContext;
use super::driver::run_feed;
use crate::auth::{ResolvedSession, SessionManager};
use crate::feed::FeedRenderer;
use crate::store::MessageStore;
use crate::websocket::WebSocketManager;

/// One `AdminContext` per signed-in session. Each context lives exactly as
/// long as its feed driver.
#[derive(Clone)]
pub struct AdminRegistry {
    contexts: Arc<RwLock<HashMap<Uuid, AdminContext>>>,
    store: Arc<dyn MessageStore>,
    sessions: SessionManager,
    renderer: FeedRenderer,
    websocket: WebSocketManager,
}

impl AdminRegistry {
    pub fn new(
        store: Arc<dyn MessageStore>,
        sessions: SessionManager,
        renderer: FeedRenderer,
        websocket: WebSocketManager,
    ) -> Self {
        Self {
            contexts: Arc::new(RwLock::new(HashMap::new())),
            store,
            sessions,
            renderer,
            websocket,
        }
    }

    /// Returns the session's context, starting its feed driver on first use.
    pub async fn attach(&self, session: &ResolvedSession) -> AdminContext {
        let mut contexts = self.contexts.write().await;
        if let Some(existing) = contexts.get(&session.id) {
            return existing.clone();
        }

        let context = AdminContext::new(
            session,
            &self.store,
            self.sessions.clone(),
            self.renderer,
            self.websocket.clone(),
        );
        contexts.insert(session.id, context.clone());
        drop(contexts);

        let registry = self.clone();
        let driver_context = context.clone();
        let session_id = session.id;
        tokio::spawn(async move {
            run_feed(driver_context).await;
            registry.detach(session_id).await;
        });

        debug!("Admin context attached for session {}", session_id);
        context
    }

    pub async fn get(&self, session_id: Uuid) -> Option<AdminContext> {
        self.contexts.read().await.get(&session_id).cloned()
    }

    pub async fn detach(&self, session_id: Uuid) {
        if self.contexts.write().await.remove(&session_id).is_some() {
            debug!("Admin context detached for session {}", session_id);
        }
    }

    pub async fn active_count(&self) -> usize {
        self.contexts.read().await.len()
    }
}
