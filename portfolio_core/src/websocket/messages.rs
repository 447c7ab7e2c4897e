use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::feed::FeedStats;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum WebSocketMessage {
    Connected { connection_id: Uuid },
    FeedRendered {
        stats: FeedStats,
        rows_html: String,
        table_html: String,
        empty: bool,
    },
    FeedFailed { message: String },
    OverlayOpened { html: String },
    OverlayClosed,
    Alert { message: String },
    SignedOut,

    View { id: String },
    MarkRead { id: String },
    CloseOverlay,
    DismissOverlay,
    RetryFeed,

    Ping,
    Pong,
    Error { message: String },
}

/// Something that happened to an operator session's admin panel.
#[derive(Debug, Clone)]
pub enum WebSocketEvent {
    /// `table_html` is the whole table, or the placeholder when there are no rows.
    FeedRendered {
        stats: FeedStats,
        rows_html: String,
        table_html: String,
    },
    FeedFailed(String),
    OverlayOpened(String),
    OverlayClosed,
    Alert(String),
    SignedOut,
}

impl From<WebSocketEvent> for WebSocketMessage {
    fn from(event: WebSocketEvent) -> Self {
        match event {
            WebSocketEvent::FeedRendered {
                stats,
                rows_html,
                table_html,
            } => WebSocketMessage::FeedRendered {
                empty: stats.total == 0,
                stats,
                rows_html,
                table_html,
            },
            WebSocketEvent::FeedFailed(message) => WebSocketMessage::FeedFailed { message },
            WebSocketEvent::OverlayOpened(html) => WebSocketMessage::OverlayOpened { html },
            WebSocketEvent::OverlayClosed => WebSocketMessage::OverlayClosed,
            WebSocketEvent::Alert(message) => WebSocketMessage::Alert { message },
            WebSocketEvent::SignedOut => WebSocketMessage::SignedOut,
        }
    }
}

impl WebSocketMessage {
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
