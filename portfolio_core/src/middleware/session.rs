//! Operator session cookie and the extractors built on it.

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::request::Parts,
    response::Redirect,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use time::Duration;

use crate::admin::AdminContext;
use crate::config::AppConfig;
use crate::AppState;

pub const SESSION_COOKIE: &str = "admin_session";
pub const OAUTH_STATE_COOKIE: &str = "oauth_state";

/// Cookies are marked `Secure` when the site is served over https, judged
/// by the configured OAuth redirect.
pub fn cookie_secure(config: &AppConfig) -> bool {
    config
        .auth
        .google
        .as_ref()
        .map_or(false, |google| google.redirect_uri.starts_with("https://"))
}

fn build_cookie(name: &'static str, value: String, max_age: Duration, secure: bool) -> Cookie<'static> {
    Cookie::build((name, value))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(secure)
        .max_age(max_age)
        .build()
}

pub fn session_cookie(token: String, config: &AppConfig) -> Cookie<'static> {
    build_cookie(
        SESSION_COOKIE,
        token,
        Duration::hours(config.auth.session_ttl_hours as i64),
        cookie_secure(config),
    )
}

pub fn oauth_state_cookie(state: String, config: &AppConfig) -> Cookie<'static> {
    build_cookie(OAUTH_STATE_COOKIE, state, Duration::minutes(10), cookie_secure(config))
}

/// A cookie that, once added to a jar, removes `name` from the browser.
pub fn expired_cookie(name: &'static str) -> Cookie<'static> {
    Cookie::build((name, ""))
        .path("/")
        .max_age(Duration::ZERO)
        .build()
}

async fn resolve_context(parts: &Parts, state: &AppState) -> Option<AdminContext> {
    let jar = CookieJar::from_headers(&parts.headers);
    let token = jar.get(SESSION_COOKIE).map(Cookie::value)?;
    if token.is_empty() {
        return None;
    }
    let session = state.sessions.resolve(token).await?;
    Some(state.admin.attach(&session).await)
}

/// The signed-in operator's admin context. Requests without a live session
/// are sent back to the login page.
pub struct AdminSession(pub AdminContext);

#[async_trait]
impl FromRequestParts<AppState> for AdminSession {
    type Rejection = Redirect;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        resolve_context(parts, state)
            .await
            .map(AdminSession)
            .ok_or_else(|| Redirect::to("/admin"))
    }
}

pub struct OptionalAdminSession(pub Option<AdminContext>);

#[async_trait]
impl FromRequestParts<AppState> for OptionalAdminSession {
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        Ok(OptionalAdminSession(resolve_context(parts, state).await))
    }
}
