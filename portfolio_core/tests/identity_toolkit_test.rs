use portfolio_core::{
    auth::{AuthErrorCode, AuthProvider, FederatedCredential, SessionManager, SessionTokens},
    config::GoogleOAuthConfig,
    GoogleOAuth, IdentityToolkitProvider,
};
use serde_json::json;
use std::{sync::Arc, time::Duration};
use wiremock::matchers::{body_partial_json, body_string_contains, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const TIMEOUT: Duration = Duration::from_secs(5);

fn provider(server: &MockServer) -> IdentityToolkitProvider {
    IdentityToolkitProvider::with_base_url(&server.uri(), "test-key", TIMEOUT).unwrap()
}

fn signed_in_body(email: &str) -> serde_json::Value {
    json!({
        "localId": "uid-1",
        "email": email,
        "idToken": "id-token-1",
        "refreshToken": "refresh-1",
        "expiresIn": "3600",
    })
}

#[tokio::test]
async fn test_password_sign_in_returns_operator_and_id_token() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/accounts:signInWithPassword"))
        .and(query_param("key", "test-key"))
        .and(body_partial_json(json!({
            "email": "admin@example.com",
            "password": "secret",
            "returnSecureToken": true,
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(signed_in_body("Admin@Example.com")))
        .expect(1)
        .mount(&server)
        .await;

    let signed_in = provider(&server)
        .sign_in_with_password(" admin@example.com ", "secret")
        .await
        .unwrap();

    assert_eq!(signed_in.operator.uid, "uid-1");
    assert_eq!(signed_in.operator.email, "admin@example.com");
    assert_eq!(signed_in.id_token, "id-token-1");
}

#[tokio::test]
async fn test_service_errors_map_to_provider_codes() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/accounts:signInWithPassword"))
        .and(body_partial_json(json!({"email": "admin@example.com"})))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": {"code": 400, "message": "INVALID_PASSWORD"}
        })))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/v1/accounts:signInWithPassword"))
        .and(body_partial_json(json!({"email": "ghost@example.com"})))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": {"code": 400, "message": "EMAIL_NOT_FOUND"}
        })))
        .mount(&server)
        .await;

    let provider = provider(&server);

    let err = provider
        .sign_in_with_password("admin@example.com", "wrong")
        .await
        .unwrap_err();
    assert_eq!(err.code(), &AuthErrorCode::WrongPassword);

    let err = provider
        .sign_in_with_password("ghost@example.com", "wrong")
        .await
        .unwrap_err();
    assert_eq!(err.code(), &AuthErrorCode::UserNotFound);
}

#[tokio::test]
async fn test_non_operator_account_is_rejected() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/accounts:signInWithPassword"))
        .respond_with(ResponseTemplate::new(200).set_body_json(signed_in_body("someone@else.com")))
        .mount(&server)
        .await;

    let err = provider(&server)
        .with_allowed_email("admin@example.com")
        .sign_in_with_password("someone@else.com", "secret")
        .await
        .unwrap_err();
    assert_eq!(err.code(), &AuthErrorCode::InvalidCredential);
}

#[tokio::test]
async fn test_google_code_exchange_feeds_federated_sign_in() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/token"))
        .and(body_string_contains("code=auth-code"))
        .and(body_string_contains("grant_type=authorization_code"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "access",
            "id_token": "google-id-token",
            "token_type": "Bearer",
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/v1/accounts:signInWithIdp"))
        .and(body_string_contains("id_token=google-id-token"))
        .and(body_partial_json(json!({
            "requestUri": "http://localhost",
            "returnSecureToken": true,
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(signed_in_body("admin@example.com")))
        .expect(1)
        .mount(&server)
        .await;

    let google = GoogleOAuth::with_endpoints(
        &GoogleOAuthConfig {
            client_id: "client".to_string(),
            client_secret: "secret".to_string(),
            redirect_uri: "http://localhost:3000/admin/login/google/callback".to_string(),
        },
        &format!("{}/authorize", server.uri()),
        &format!("{}/token", server.uri()),
        TIMEOUT,
    )
    .unwrap();

    let sessions = SessionManager::new(
        Arc::new(provider(&server).with_allowed_email("admin@example.com")),
        SessionTokens::new("0d6b1f9a8c7e5d3b2a1f0e9d8c7b6a5f", chrono::Duration::hours(1)).unwrap(),
    );

    let id_token = google.exchange_code("auth-code").await.unwrap();
    let session = sessions
        .sign_in_with_federated(FederatedCredential::GoogleIdToken(id_token))
        .await
        .unwrap();

    assert_eq!(session.operator.email, "admin@example.com");
    assert_eq!(session.id_token, "id-token-1");

    let resolved = sessions.resolve(&session.token).await.unwrap();
    assert_eq!(resolved.id, session.id);

    sessions.sign_out(session.id).await;
    assert!(sessions.resolve(&session.token).await.is_none());
}

#[tokio::test]
async fn test_failed_code_exchange_is_invalid_credential() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/token"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({"error": "invalid_grant"})))
        .mount(&server)
        .await;

    let google = GoogleOAuth::with_endpoints(
        &GoogleOAuthConfig {
            client_id: "client".to_string(),
            client_secret: "secret".to_string(),
            redirect_uri: "http://localhost:3000/admin/login/google/callback".to_string(),
        },
        &format!("{}/authorize", server.uri()),
        &format!("{}/token", server.uri()),
        TIMEOUT,
    )
    .unwrap();

    let err = google.exchange_code("stale").await.unwrap_err();
    assert_eq!(err.code(), &AuthErrorCode::InvalidCredential);
}
