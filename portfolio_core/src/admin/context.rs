//! Per-session admin panel state, shared by the HTTP handlers, the live
//! socket and the feed driver.

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{watch, Notify};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::auth::{Operator, ResolvedSession, SessionManager};
use crate::detail::{DetailViewer, Dismissal, MarkReadOutcome, Overlay};
use crate::feed::{FeedRenderer, FeedStatus, FeedView};
use crate::locale::Text;
use crate::models::MessageId;
use crate::store::{MessageStore, Snapshot, StoreError};
use crate::websocket::{WebSocketEvent, WebSocketManager, WebSocketMessage};

struct AdminInner {
    session_id: Uuid,
    operator: Operator,
    store: Arc<dyn MessageStore>,
    sessions: SessionManager,
    renderer: FeedRenderer,
    feed: watch::Sender<FeedView>,
    detail: DetailViewer,
    websocket: WebSocketManager,
    retry: Notify,
    alert: Mutex<Option<String>>,
}

#[derive(Clone)]
pub struct AdminContext {
    inner: Arc<AdminInner>,
}

impl AdminContext {
    /// `store` is the unauthorized handle; the context keeps one carrying
    /// the session's id token.
    pub fn new(
        session: &ResolvedSession,
        store: &Arc<dyn MessageStore>,
        sessions: SessionManager,
        renderer: FeedRenderer,
        websocket: WebSocketManager,
    ) -> Self {
        let store = store.authorized(&session.id_token);
        let (feed, _) = watch::channel(FeedView::loading());
        Self {
            inner: Arc::new(AdminInner {
                session_id: session.id,
                operator: session.operator.clone(),
                detail: DetailViewer::new(store.clone()),
                store,
                sessions,
                renderer,
                feed,
                websocket,
                retry: Notify::new(),
                alert: Mutex::new(None),
            }),
        }
    }

    pub fn session_id(&self) -> Uuid {
        self.inner.session_id
    }

    pub fn operator(&self) -> &Operator {
        &self.inner.operator
    }

    pub fn renderer(&self) -> &FeedRenderer {
        &self.inner.renderer
    }

    pub(crate) fn store(&self) -> &Arc<dyn MessageStore> {
        &self.inner.store
    }

    pub(crate) fn sessions(&self) -> &SessionManager {
        &self.inner.sessions
    }

    pub fn feed(&self) -> FeedView {
        self.inner.feed.borrow().clone()
    }

    pub fn subscribe_feed(&self) -> watch::Receiver<FeedView> {
        self.inner.feed.subscribe()
    }

    /// Waits up to `timeout` for the first snapshot (or failure), then
    /// returns whatever the feed holds.
    pub async fn wait_until_loaded(&self, timeout: Duration) -> FeedView {
        let mut feed = self.inner.feed.subscribe();
        let loaded = tokio::time::timeout(
            timeout,
            feed.wait_for(|view| view.status != FeedStatus::Loading),
        )
        .await
        .is_ok();
        if !loaded {
            debug!("Feed for session {} still loading", self.session_id());
        }
        self.feed()
    }

    pub fn overlay(&self) -> Overlay {
        self.inner.detail.overlay()
    }

    pub fn overlay_html(&self, now: DateTime<Utc>) -> Option<String> {
        match self.overlay() {
            Overlay::Open(message) => Some(self.inner.renderer.render_detail(&message, now)),
            Overlay::Closed => None,
        }
    }

    /// Pending blocking alert, shown once.
    pub fn take_alert(&self) -> Option<String> {
        self.inner.alert.lock().take()
    }

    pub fn feed_message(&self, now: DateTime<Utc>) -> WebSocketMessage {
        let view = self.feed();
        match &view.status {
            FeedStatus::Failed(_) => WebSocketMessage::FeedFailed {
                message: self.text(Text::FeedFailed).to_string(),
            },
            FeedStatus::Loading | FeedStatus::Live => self.rendered_event(&view, now).into(),
        }
    }

    fn rendered_event(&self, view: &FeedView, now: DateTime<Utc>) -> WebSocketEvent {
        WebSocketEvent::FeedRendered {
            stats: view.stats,
            rows_html: self.inner.renderer.render_rows(&view.messages, now),
            table_html: self.inner.renderer.render_table(view, now),
        }
    }

    fn text(&self, key: Text) -> &'static str {
        self.inner.renderer.locale().text(key)
    }

    async fn publish(&self, event: WebSocketEvent) {
        self.inner
            .websocket
            .broadcast_to_session(self.session_id(), event)
            .await;
    }

    pub(crate) async fn apply_snapshot(&self, snapshot: Snapshot) {
        debug!(
            "Session {} received snapshot of {} messages",
            self.session_id(),
            snapshot.len()
        );
        self.inner.feed.send_modify(|view| view.apply_snapshot(snapshot));
        let view = self.feed();
        self.publish(self.rendered_event(&view, Utc::now())).await;
    }

    pub(crate) async fn fail_feed(&self, err: &StoreError) {
        self.inner.feed.send_modify(|view| view.fail(err.to_string()));
        self.publish(WebSocketEvent::FeedFailed(self.text(Text::FeedFailed).to_string()))
            .await;
    }

    pub(crate) async fn retry_requested(&self) {
        self.inner.retry.notified().await;
    }

    pub(crate) async fn signed_out(&self) {
        self.publish(WebSocketEvent::SignedOut).await;
    }

    /// Asks the driver to re-acquire the subscription. Only honoured while
    /// the feed is in the failed state; the feed reads as loading until the
    /// next snapshot or failure.
    pub fn retry_feed(&self) -> bool {
        let requested = self.inner.feed.send_if_modified(|view| {
            if !matches!(view.status, FeedStatus::Failed(_)) {
                return false;
            }
            view.status = FeedStatus::Loading;
            true
        });
        if requested {
            self.inner.retry.notify_one();
        }
        requested
    }

    pub async fn view(&self, id: &MessageId) -> Overlay {
        let overlay = self.inner.detail.view(id).await;
        if let Overlay::Open(message) = &overlay {
            let html = self.inner.renderer.render_detail(message, Utc::now());
            self.publish(WebSocketEvent::OverlayOpened(html)).await;
        }
        overlay
    }

    /// Failures raise the blocking alert and leave the overlay as it was.
    pub async fn mark_read(&self, id: &MessageId) -> Result<MarkReadOutcome, StoreError> {
        match self.inner.detail.mark_read(id).await {
            Ok(outcome) => {
                self.publish(WebSocketEvent::OverlayClosed).await;
                Ok(outcome)
            }
            Err(e) => {
                warn!("Failed to mark message {} as read: {}", id, e);
                let message = self.text(Text::MarkReadFailed).to_string();
                *self.inner.alert.lock() = Some(message.clone());
                self.publish(WebSocketEvent::Alert(message)).await;
                Err(e)
            }
        }
    }

    pub async fn dismiss_overlay(&self, how: Dismissal) {
        self.inner.detail.dismiss(how);
        self.publish(WebSocketEvent::OverlayClosed).await;
    }
}
