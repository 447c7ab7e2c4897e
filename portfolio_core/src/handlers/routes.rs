//! Route table

use axum::{
    routing::{get, post},
    Router,
};

use super::{admin, health, site};
use crate::{config::AppConfig, middleware::cors::cors_layer_from_config, websocket, AppState};

pub fn create_routes(config: &AppConfig) -> Router<AppState> {
    Router::new()
        .route("/", get(site::handle_home))
        .route("/contact", post(site::handle_contact_form))
        .route(
            "/api/contact",
            post(site::handle_contact_api).layer(cors_layer_from_config(&config.cors)),
        )
        .route("/assets/site.css", get(site::handle_stylesheet))
        .route("/health", get(health::handle_health))
        .route("/admin", get(admin::handle_admin))
        .route("/admin/login", post(admin::handle_login))
        .route("/admin/login/google", get(admin::handle_google_login))
        .route(
            "/admin/login/google/callback",
            get(admin::handle_google_callback),
        )
        .route("/admin/logout", post(admin::handle_logout))
        .route("/admin/messages/:id", get(admin::handle_view_message))
        .route("/admin/messages/:id/read", post(admin::handle_mark_read))
        .route("/admin/overlay/close", post(admin::handle_close_overlay))
        .route("/admin/overlay/dismiss", post(admin::handle_dismiss_overlay))
        .route("/admin/feed/retry", post(admin::handle_retry_feed))
        .route("/admin/feed", get(websocket::websocket_handler))
}
