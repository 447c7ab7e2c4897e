//! Admin panel: sign-in flows, the dashboard and the overlay actions

use axum::{
    extract::{Form, Path, Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::{Cookie, CookieJar};
use chrono::Utc;
use std::time::Duration;
use tracing::{info, warn};

use crate::{
    admin::page,
    auth::{generate_token, AuthError, AuthErrorCode, EstablishedSession, FederatedCredential, GoogleOAuth},
    detail::Dismissal,
    middleware::session::{
        expired_cookie, oauth_state_cookie, session_cookie, AdminSession, OptionalAdminSession,
        OAUTH_STATE_COOKIE, SESSION_COOKIE,
    },
    models::{LoginForm, MessageId, OAuthCallbackQuery},
    AppState,
};

/// How long a page render waits for the feed to settle.
const FEED_SETTLE_TIMEOUT: Duration = Duration::from_millis(1500);

fn login_page(state: &AppState, status: StatusCode, error: Option<&AuthError>, email: &str) -> Response {
    let locale = state.config.site.locale;
    let html = page::render_login(
        locale,
        error.map(|e| e.message(locale)),
        email,
        state.google.is_some(),
    );
    (status, Html(html)).into_response()
}

fn back_to_dashboard() -> Redirect {
    Redirect::to("/admin")
}

/// `GET /admin`: the dashboard when signed in, the login page otherwise.
pub async fn handle_admin(
    State(state): State<AppState>,
    OptionalAdminSession(context): OptionalAdminSession,
) -> Response {
    let Some(context) = context else {
        return login_page(&state, StatusCode::OK, None, "");
    };

    let view = context.wait_until_loaded(FEED_SETTLE_TIMEOUT).await;
    let alert = context.take_alert();
    Html(page::render_dashboard(&context, &view, alert.as_deref(), Utc::now())).into_response()
}

async fn start_session(state: &AppState, jar: CookieJar, session: EstablishedSession) -> Response {
    state.admin.attach(&session.resolved()).await;
    let jar = jar.add(session_cookie(session.token, &state.config));
    (jar, back_to_dashboard()).into_response()
}

pub async fn handle_login(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<LoginForm>,
) -> Response {
    info!("POST /admin/login");

    match state
        .sessions
        .sign_in_with_password(form.email.trim(), &form.password)
        .await
    {
        Ok(session) => {
            info!("Operator {} signed in", session.operator.email);
            start_session(&state, jar, session).await
        }
        Err(e) => {
            warn!("Password sign-in failed: {}", e);
            login_page(&state, StatusCode::UNAUTHORIZED, Some(&e), form.email.trim())
        }
    }
}

pub async fn handle_google_login(State(state): State<AppState>, jar: CookieJar) -> Response {
    let Some(google) = &state.google else {
        let err = AuthError::new(AuthErrorCode::OperationNotAllowed, "google sign-in is not configured");
        return login_page(&state, StatusCode::NOT_FOUND, Some(&err), "");
    };

    let oauth_state = generate_token();
    let jar = jar.add(oauth_state_cookie(oauth_state.clone(), &state.config));
    (jar, Redirect::to(google.authorize_url(&oauth_state).as_str())).into_response()
}

pub async fn handle_google_callback(
    State(state): State<AppState>,
    jar: CookieJar,
    Query(query): Query<OAuthCallbackQuery>,
) -> Response {
    let expected_state = jar.get(OAUTH_STATE_COOKIE).map(|c| c.value().to_string());
    let jar = jar.add(expired_cookie(OAUTH_STATE_COOKIE));

    let Some(google) = &state.google else {
        let err = AuthError::new(AuthErrorCode::OperationNotAllowed, "google sign-in is not configured");
        return (jar, login_page(&state, StatusCode::NOT_FOUND, Some(&err), "")).into_response();
    };

    match federated_sign_in(&state, google, &query, expected_state.as_deref()).await {
        Ok(session) => {
            info!("Operator {} signed in with Google", session.operator.email);
            start_session(&state, jar, session).await
        }
        Err(e) => {
            warn!("Google sign-in failed: {}", e);
            (jar, login_page(&state, StatusCode::UNAUTHORIZED, Some(&e), "")).into_response()
        }
    }
}

async fn federated_sign_in(
    state: &AppState,
    google: &GoogleOAuth,
    query: &OAuthCallbackQuery,
    expected_state: Option<&str>,
) -> Result<EstablishedSession, AuthError> {
    let code = GoogleOAuth::callback_code(query, expected_state)?;
    let id_token = google.exchange_code(&code).await?;
    state
        .sessions
        .sign_in_with_federated(FederatedCredential::GoogleIdToken(id_token))
        .await
}

pub async fn handle_logout(State(state): State<AppState>, jar: CookieJar) -> Response {
    let token = jar.get(SESSION_COOKIE).map(Cookie::value).unwrap_or_default();
    if let Some(session) = state.sessions.resolve(token).await {
        state.sessions.sign_out(session.id).await;
    }

    let jar = jar.add(expired_cookie(SESSION_COOKIE));
    (jar, back_to_dashboard()).into_response()
}

/// Unparseable ids cannot name a record and are treated like missing ones.
pub async fn handle_view_message(
    AdminSession(context): AdminSession,
    Path(id): Path<String>,
) -> Redirect {
    match MessageId::parse(&id) {
        Ok(id) => {
            context.view(&id).await;
        }
        Err(e) => warn!("Ignoring view of invalid message id: {}", e),
    }
    back_to_dashboard()
}

pub async fn handle_mark_read(
    AdminSession(context): AdminSession,
    Path(id): Path<String>,
) -> Redirect {
    match MessageId::parse(&id) {
        Ok(id) => {
            let _ = context.mark_read(&id).await;
        }
        Err(e) => warn!("Ignoring mark-read of invalid message id: {}", e),
    }
    back_to_dashboard()
}

pub async fn handle_close_overlay(AdminSession(context): AdminSession) -> Redirect {
    context.dismiss_overlay(Dismissal::CloseButton).await;
    back_to_dashboard()
}

pub async fn handle_dismiss_overlay(AdminSession(context): AdminSession) -> Redirect {
    context.dismiss_overlay(Dismissal::Backdrop).await;
    back_to_dashboard()
}

pub async fn handle_retry_feed(AdminSession(context): AdminSession) -> Redirect {
    if context.retry_feed() {
        info!("Feed retry requested for session {}", context.session_id());
    }
    back_to_dashboard()
}
