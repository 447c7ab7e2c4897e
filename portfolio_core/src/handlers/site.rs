//! Public portfolio page and contact submissions

use axum::{
    extract::{Form, State},
    http::{header, StatusCode},
    response::{Html, IntoResponse},
    Json,
};
use chrono::Utc;
use tracing::info;

use crate::{
    contact::ContactError,
    error::Result,
    extractors::ApiJson,
    models::{ApiResponse, ContactSubmission, SubmittedMessage},
    site::{self, ContactOutcome},
    AppState,
};

pub async fn handle_home(State(state): State<AppState>) -> Html<String> {
    Html(site::render_home(&state.config.site, None, Utc::now()))
}

/// Re-renders the page with a toast. On failure the submitted values are
/// written back into the form.
pub async fn handle_contact_form(
    State(state): State<AppState>,
    Form(submission): Form<ContactSubmission>,
) -> impl IntoResponse {
    info!("POST /contact");

    let (status, outcome) = match state.contact.submit(&submission).await {
        Ok(_) => (StatusCode::OK, ContactOutcome::Sent),
        Err(ContactError::Invalid(_)) => (
            StatusCode::UNPROCESSABLE_ENTITY,
            ContactOutcome::failed(submission),
        ),
        Err(ContactError::Store(_)) => (
            StatusCode::BAD_GATEWAY,
            ContactOutcome::failed(submission),
        ),
    };

    (
        status,
        Html(site::render_home(&state.config.site, Some(&outcome), Utc::now())),
    )
}

pub async fn handle_contact_api(
    State(state): State<AppState>,
    ApiJson(submission): ApiJson<ContactSubmission>,
) -> Result<impl IntoResponse> {
    info!("POST /api/contact");

    let id = state.contact.submit(&submission).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(SubmittedMessage { id })),
    ))
}

pub async fn handle_stylesheet() -> impl IntoResponse {
    (
        [
            (header::CONTENT_TYPE, "text/css; charset=utf-8"),
            (header::CACHE_CONTROL, "public, max-age=3600"),
        ],
        site::STYLESHEET,
    )
}
