use axum::{
    extract::{
        ws::{WebSocket, WebSocketUpgrade},
        State,
    },
    response::Response,
};
use tracing::{info, warn};

use crate::admin::AdminContext;
use crate::middleware::session::AdminSession;
use crate::websocket::manager::WebSocketManager;
use crate::AppState;

/// `GET /admin/feed`: live feed for the session named by the cookie.
pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<AppState>,
    AdminSession(context): AdminSession,
) -> Response {
    info!(
        "WebSocket connection request received for session {}",
        context.session_id()
    );

    let ws_manager = state.websocket_manager.clone();
    ws.on_upgrade(move |socket| handle_socket(socket, ws_manager, context))
}

async fn handle_socket(socket: WebSocket, ws_manager: WebSocketManager, context: AdminContext) {
    info!("WebSocket connection established");

    if let Err(e) = ws_manager.handle_connection(socket, context).await {
        warn!("WebSocket connection error: {}", e);
    }

    info!("WebSocket connection closed");
}
