use std::sync::Arc;

use chrono::Duration;
use uuid::Uuid;

use crate::auth::{
    AuthErrorCode, AuthProvider, FederatedCredential, LocalAuthProvider, SessionManager,
    SessionState, SessionTokens,
};

const SECRET: &str = "d85735aadb9a3e089ae7a06f417ed32080376f24";

fn provider() -> Arc<LocalAuthProvider> {
    Arc::new(LocalAuthProvider::with_password("admin@example.com", "correct horse").unwrap())
}

fn manager(provider: Arc<LocalAuthProvider>) -> SessionManager {
    SessionManager::new(provider, SessionTokens::new(SECRET, Duration::hours(1)).unwrap())
}

#[test]
fn test_session_token_round_trip() {
    let tokens = SessionTokens::new(SECRET, Duration::hours(1)).unwrap();
    let sid = Uuid::new_v4();

    let token = tokens.issue("admin@example.com", sid).unwrap();
    let claims = tokens.validate(&token).unwrap();
    assert_eq!(claims.sub, "admin@example.com");
    assert_eq!(claims.sid, sid);
    assert!(claims.exp > claims.iat);
}

#[test]
fn test_session_token_rejects_short_secret_and_tampering() {
    assert!(SessionTokens::new("short", Duration::hours(1)).is_err());

    let tokens = SessionTokens::new(SECRET, Duration::hours(1)).unwrap();
    let other = SessionTokens::new("cccb02dcfa1318ea49f54c76211210b822f8542d", Duration::hours(1)).unwrap();
    let token = other.issue("admin@example.com", Uuid::new_v4()).unwrap();
    assert_eq!(
        tokens.validate(&token).unwrap_err().code(),
        &AuthErrorCode::InvalidCredential
    );
}

#[test]
fn test_expired_session_token() {
    let tokens = SessionTokens::new(SECRET, Duration::hours(-2)).unwrap();
    let token = tokens.issue("admin@example.com", Uuid::new_v4()).unwrap();
    assert_eq!(
        tokens.validate(&token).unwrap_err().code(),
        &AuthErrorCode::SessionExpired
    );
}

#[tokio::test]
async fn test_local_provider_error_codes() {
    let provider = provider();

    let err = provider.sign_in_with_password("not-an-email", "x").await.unwrap_err();
    assert_eq!(err.code(), &AuthErrorCode::InvalidEmail);

    let err = provider.sign_in_with_password("other@example.com", "x").await.unwrap_err();
    assert_eq!(err.code(), &AuthErrorCode::UserNotFound);

    let err = provider.sign_in_with_password("admin@example.com", "wrong").await.unwrap_err();
    assert_eq!(err.code(), &AuthErrorCode::WrongPassword);

    let err = provider
        .sign_in_with_federated(FederatedCredential::GoogleIdToken("t".into()))
        .await
        .unwrap_err();
    assert_eq!(err.code(), &AuthErrorCode::OperationNotAllowed);
}

#[tokio::test]
async fn test_local_provider_accepts_operator_case_insensitively() {
    let provider = provider();
    let signed_in = provider
        .sign_in_with_password(" Admin@Example.com ", "correct horse")
        .await
        .unwrap();
    assert_eq!(signed_in.operator.email, "admin@example.com");
    assert_eq!(provider.active_tokens(), 1);

    provider.sign_out(&signed_in.id_token).await.unwrap();
    assert_eq!(provider.active_tokens(), 0);
    assert!(provider.sign_out(&signed_in.id_token).await.is_err());
}

#[tokio::test]
async fn test_session_lifecycle_notifies_watchers() {
    let manager = manager(provider());

    let session = manager
        .sign_in_with_password("admin@example.com", "correct horse")
        .await
        .unwrap();
    let mut state = manager.watch(session.id).await;
    assert!(state.borrow_and_update().is_signed_in());

    let resolved = manager.resolve(&session.token).await.unwrap();
    assert_eq!(resolved.id, session.id);
    assert_eq!(resolved.operator.email, "admin@example.com");

    manager.sign_out(session.id).await;
    state.changed().await.unwrap();
    assert_eq!(*state.borrow(), SessionState::SignedOut);

    assert!(manager.resolve(&session.token).await.is_none());
    assert_eq!(manager.active_count().await, 0);
}

#[tokio::test]
async fn test_sign_out_is_best_effort() {
    let provider = provider();
    let manager = manager(provider.clone());

    let session = manager
        .sign_in_with_password("admin@example.com", "correct horse")
        .await
        .unwrap();

    // Revoke upstream first so the provider call inside sign_out fails.
    provider.sign_out(&session.id_token).await.unwrap();

    manager.sign_out(session.id).await;
    assert_eq!(manager.active_count().await, 0);
    assert_eq!(*manager.watch(session.id).await.borrow(), SessionState::SignedOut);
}

#[tokio::test]
async fn test_session_signs_out_when_lifetime_ends() {
    let manager = SessionManager::new(
        provider(),
        SessionTokens::new(SECRET, Duration::milliseconds(50)).unwrap(),
    );
    let session = manager
        .sign_in_with_password("admin@example.com", "correct horse")
        .await
        .unwrap();
    let mut state = manager.watch(session.id).await;
    assert!(state.borrow_and_update().is_signed_in());

    tokio::time::timeout(
        std::time::Duration::from_secs(2),
        state.wait_for(|state| *state == SessionState::SignedOut),
    )
    .await
    .unwrap()
    .unwrap();
    assert_eq!(manager.active_count().await, 0);
}

#[tokio::test]
async fn test_failed_sign_in_creates_no_session() {
    let manager = manager(provider());
    let err = manager
        .sign_in_with_password("admin@example.com", "nope")
        .await
        .unwrap_err();
    assert_eq!(err.code(), &AuthErrorCode::WrongPassword);
    assert_eq!(manager.active_count().await, 0);
}
