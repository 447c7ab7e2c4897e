//! Liveness endpoint

use axum::{extract::State, response::IntoResponse, Json};

use crate::{models::ApiResponse, AppState};

pub async fn handle_health(State(state): State<AppState>) -> impl IntoResponse {
    Json(ApiResponse::success(serde_json::json!({
        "status": "healthy",
        "app": state.app_name,
        "version": state.version,
        "timestamp": chrono::Utc::now().timestamp(),
        "store_backend": state.store.backend_name(),
        "auth_backend": state.sessions.provider_name(),
        "google_sign_in": state.google.is_some(),
        "active_sessions": state.sessions.active_count().await,
        "admin_feeds": state.admin.active_count().await,
        "websocket_connections": state.websocket_manager.connection_count().await,
    })))
}
