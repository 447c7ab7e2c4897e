use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    response::Response,
    Router,
};
use portfolio_core::{
    config::AppConfig,
    create_app,
    locale::Locale,
    models::{MessageId, StoredMessage},
    store::memory::AccessRules,
    AppState, LocalAuthProvider, MemoryStore,
};
use std::{sync::Arc, time::Duration};
use tower::ServiceExt;

const EMAIL: &str = "admin@example.com";
const PASSWORD: &str = "correct horse";

fn setup() -> (Router, AppState, MemoryStore) {
    let mut config = AppConfig::default();
    config.site.locale = Locale::En;

    let store = MemoryStore::new();
    let provider = Arc::new(LocalAuthProvider::with_password(EMAIL, PASSWORD).unwrap());
    let state = AppState::new(config, Arc::new(store.clone()), provider).unwrap();

    (create_app(state.clone()), state, store)
}

fn seed(store: &MemoryStore, id: &str, name: &str, timestamp: &str) -> MessageId {
    let id = MessageId::parse(id).unwrap();
    store.insert(
        id.clone(),
        StoredMessage {
            name: name.to_string(),
            email: format!("{}@example.org", name.to_lowercase()),
            message: format!("Hello from {}", name),
            timestamp: timestamp.to_string(),
            read: false,
        },
    );
    id
}

async fn body_string(response: Response) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

async fn send(app: &Router, method: Method, uri: &str, cookie: Option<&str>) -> Response {
    let mut request = Request::builder().method(method).uri(uri);
    if let Some(cookie) = cookie {
        request = request.header(header::COOKIE, cookie);
    }
    app.clone()
        .oneshot(request.body(Body::empty()).unwrap())
        .await
        .unwrap()
}

async fn post_login(app: &Router, email: &str, password: &str) -> Response {
    let body = format!(
        "email={}&password={}",
        email.replace('@', "%40"),
        password.replace(' ', "+")
    );
    let request = Request::builder()
        .method(Method::POST)
        .uri("/admin/login")
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(body))
        .unwrap();
    app.clone().oneshot(request).await.unwrap()
}

/// Signs in and returns the `name=value` pair to send back as a cookie.
async fn login(app: &Router) -> String {
    let response = post_login(app, EMAIL, PASSWORD).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers().get(header::LOCATION).unwrap(), "/admin");

    let set_cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .unwrap()
        .to_str()
        .unwrap();
    assert!(set_cookie.contains("HttpOnly"));
    set_cookie.split(';').next().unwrap().to_string()
}

async fn dashboard(app: &Router, cookie: &str) -> String {
    let response = send(app, Method::GET, "/admin", Some(cookie)).await;
    assert_eq!(response.status(), StatusCode::OK);
    body_string(response).await
}

async fn eventually<F, Fut>(what: &str, check: F)
where
    F: Fn() -> Fut,
    Fut: std::future::Future<Output = bool>,
{
    for _ in 0..200 {
        if check().await {
            return;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("timed out waiting for {}", what);
}

#[tokio::test]
async fn test_signed_out_visitor_sees_login_page() {
    let (app, _, _) = setup();

    let html = body_string(send(&app, Method::GET, "/admin", None).await).await;

    assert!(html.contains(r#"id="login-container""#));
    assert!(html.contains(r#"id="login-form""#));
    assert!(!html.contains(r#"id="admin-panel""#));
    // Google sign-in is not configured
    assert!(!html.contains(r#"id="google-login-btn""#));
}

#[tokio::test]
async fn test_wrong_password_reports_provider_message() {
    let (app, state, _) = setup();

    let response = post_login(&app, EMAIL, "nope").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert!(response.headers().get(header::SET_COOKIE).is_none());

    let html = body_string(response).await;
    assert!(html.contains(r#"id="login-error""#));
    assert!(html.contains("Incorrect password"));
    assert!(html.contains(EMAIL));
    assert_eq!(state.sessions.active_count().await, 0);
}

#[tokio::test]
async fn test_admin_actions_require_a_session() {
    let (app, _, _) = setup();

    for uri in [
        "/admin/overlay/close",
        "/admin/overlay/dismiss",
        "/admin/feed/retry",
        "/admin/messages/-Nabc/read",
    ] {
        let response = send(&app, Method::POST, uri, None).await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER, "{}", uri);
        assert_eq!(response.headers().get(header::LOCATION).unwrap(), "/admin");
    }

    let response = send(&app, Method::GET, "/admin", Some("admin_session=forged")).await;
    let html = body_string(response).await;
    assert!(html.contains(r#"id="login-form""#));
}

#[tokio::test]
async fn test_dashboard_view_mark_read_and_logout() {
    let (app, state, store) = setup();
    let older = seed(&store, "-Nolder", "Ana", "2026-10-17T09:00:00.000Z");
    seed(&store, "-Nnewer", "Luis", "2026-10-18T09:00:00.000Z");

    let cookie = login(&app).await;

    let html = dashboard(&app, &cookie).await;
    assert!(html.contains(r#"id="admin-panel""#));
    assert!(html.contains(r#"data-feed-socket="/admin/feed""#));
    assert!(html.contains(r#"<section id="feed-table">"#));
    assert!(html.contains("new WebSocket("));
    assert!(html.contains(EMAIL));
    assert!(html.contains(r#"id="total-messages">2<"#));
    assert!(html.contains(r#"id="unread-messages">2<"#));
    assert!(html.contains(r#"id="read-messages">0<"#));
    let luis = html.find("Luis").unwrap();
    let ana = html.find("Ana").unwrap();
    assert!(luis < ana, "newest message should be listed first");
    assert!(!html.contains(r#"id="message-modal""#));
    assert_eq!(store.listener_count(), 1);

    let response = send(&app, Method::GET, &format!("/admin/messages/{}", older), Some(&cookie)).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    let html = dashboard(&app, &cookie).await;
    assert!(html.contains(r#"id="message-modal""#));
    assert!(html.contains("Hello from Ana"));

    let response = send(
        &app,
        Method::POST,
        &format!("/admin/messages/{}/read", older),
        Some(&cookie),
    )
    .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert!(store.all().iter().any(|m| m.id == older && m.read));

    let (app_ref, cookie_ref) = (&app, cookie.as_str());
    eventually("read count to update", || async move {
        dashboard(app_ref, cookie_ref).await.contains(r#"id="read-messages">1<"#)
    })
    .await;
    let html = dashboard(&app, &cookie).await;
    assert!(!html.contains(r#"id="message-modal""#));
    assert!(html.contains(r#"id="unread-messages">1<"#));

    let (store_ref, admin) = (&store, &state.admin);
    let response = send(&app, Method::POST, "/admin/logout", Some(&cookie)).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    let set_cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .unwrap()
        .to_str()
        .unwrap();
    assert!(set_cookie.starts_with("admin_session=;"));
    assert!(set_cookie.contains("Max-Age=0"));

    eventually("listener release", || async move { store_ref.listener_count() == 0 }).await;
    eventually("registry drain", || async move { admin.active_count().await == 0 }).await;
    assert_eq!(state.sessions.active_count().await, 0);

    let html = dashboard(&app, &cookie).await;
    assert!(html.contains(r#"id="login-form""#));
}

#[tokio::test]
async fn test_repeated_sign_in_cycles_leave_no_listeners() {
    let (app, state, store) = setup();
    seed(&store, "-Nonly", "Ana", "2026-10-18T09:00:00.000Z");
    let (store_ref, admin) = (&store, &state.admin);

    for _ in 0..3 {
        let cookie = login(&app).await;
        dashboard(&app, &cookie).await;
        assert_eq!(store.listener_count(), 1);

        send(&app, Method::POST, "/admin/logout", Some(&cookie)).await;
        eventually("listener release", || async move { store_ref.listener_count() == 0 }).await;
    }

    eventually("registry drain", || async move { admin.active_count().await == 0 }).await;
}

#[tokio::test]
async fn test_failed_mark_read_shows_alert_once() {
    let (app, _, store) = setup();
    let id = seed(&store, "-Nfail", "Ana", "2026-10-18T09:00:00.000Z");
    let cookie = login(&app).await;
    dashboard(&app, &cookie).await;

    store.set_access_rules(AccessRules {
        updates_denied: true,
        ..AccessRules::default()
    });

    send(&app, Method::GET, &format!("/admin/messages/{}", id), Some(&cookie)).await;
    send(&app, Method::POST, &format!("/admin/messages/{}/read", id), Some(&cookie)).await;

    let html = dashboard(&app, &cookie).await;
    assert!(html.contains(r#"role="alertdialog""#));
    assert!(html.contains("Could not mark the message, try again."));
    assert!(html.contains(r#"href="/admin">OK</a>"#));
    assert!(html.contains(r#"id="message-modal""#));
    assert!(store.all().iter().all(|m| !m.read));

    let html = dashboard(&app, &cookie).await;
    assert!(!html.contains(r#"role="alertdialog""#));
    assert!(html.contains(r#"id="message-modal""#));

    let response = send(&app, Method::POST, "/admin/overlay/close", Some(&cookie)).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    let html = dashboard(&app, &cookie).await;
    assert!(!html.contains(r#"id="message-modal""#));
}

#[tokio::test]
async fn test_invalid_message_id_is_ignored() {
    let (app, _, store) = setup();
    seed(&store, "-Nonly", "Ana", "2026-10-18T09:00:00.000Z");
    let cookie = login(&app).await;

    let response = send(&app, Method::GET, "/admin/messages/bad.id", Some(&cookie)).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    let html = dashboard(&app, &cookie).await;
    assert!(!html.contains(r#"id="message-modal""#));
    assert!(!html.contains(r#"role="alertdialog""#));
}

#[tokio::test]
async fn test_google_login_is_unavailable_without_configuration() {
    let (app, _, _) = setup();

    let response = send(&app, Method::GET, "/admin/login/google", None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let html = body_string(response).await;
    assert!(html.contains(r#"id="login-error""#));
}

#[tokio::test]
async fn test_health_reports_backends_and_sessions() {
    let (app, _, _) = setup();
    let cookie = login(&app).await;
    dashboard(&app, &cookie).await;

    let response = send(&app, Method::GET, "/health", None).await;
    assert_eq!(response.status(), StatusCode::OK);

    let body: serde_json::Value = serde_json::from_str(&body_string(response).await).unwrap();
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["status"], "healthy");
    assert_eq!(body["data"]["store_backend"], "memory");
    assert_eq!(body["data"]["auth_backend"], "local");
    assert_eq!(body["data"]["google_sign_in"], false);
    assert_eq!(body["data"]["active_sessions"], 1);
    assert_eq!(body["data"]["admin_feeds"], 1);
}
