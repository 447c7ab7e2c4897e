//! Server-side operator sessions and their state notifications.

use chrono::{DateTime, Utc};
use rand::Rng;
use std::collections::HashMap;
use std::fmt::Write;
use std::sync::Arc;
use tokio::sync::{watch, RwLock};
use tracing::{info, warn};
use uuid::Uuid;

use super::errors::AuthError;
use super::jwt::SessionTokens;
use super::provider::{AuthProvider, FederatedCredential, Operator, SignIn};

/// Random 32-byte hex token.
pub fn generate_token() -> String {
    let bytes: [u8; 32] = rand::thread_rng().gen();
    let mut token = String::with_capacity(64);
    for byte in bytes {
        let _ = write!(token, "{:02x}", byte);
    }
    token
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    SignedOut,
    SignedIn(Operator),
}

impl SessionState {
    pub fn is_signed_in(&self) -> bool {
        matches!(self, SessionState::SignedIn(_))
    }
}

struct SessionEntry {
    operator: Operator,
    id_token: String,
    expires_at: DateTime<Utc>,
    state: watch::Sender<SessionState>,
}

/// A session created by a successful sign-in. `token` goes into the cookie.
#[derive(Debug, Clone)]
pub struct EstablishedSession {
    pub id: Uuid,
    pub token: String,
    pub operator: Operator,
    pub id_token: String,
}

impl EstablishedSession {
    pub fn resolved(&self) -> ResolvedSession {
        ResolvedSession {
            id: self.id,
            operator: self.operator.clone(),
            id_token: self.id_token.clone(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ResolvedSession {
    pub id: Uuid,
    pub operator: Operator,
    pub id_token: String,
}

#[derive(Clone)]
pub struct SessionManager {
    provider: Arc<dyn AuthProvider>,
    tokens: SessionTokens,
    sessions: Arc<RwLock<HashMap<Uuid, SessionEntry>>>,
}

impl SessionManager {
    pub fn new(provider: Arc<dyn AuthProvider>, tokens: SessionTokens) -> Self {
        Self {
            provider,
            tokens,
            sessions: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    pub fn provider_name(&self) -> &'static str {
        self.provider.backend_name()
    }

    pub async fn sign_in_with_password(&self, email: &str, password: &str) -> Result<EstablishedSession, AuthError> {
        let signed_in = self.provider.sign_in_with_password(email, password).await?;
        self.establish(signed_in).await
    }

    pub async fn sign_in_with_federated(&self, credential: FederatedCredential) -> Result<EstablishedSession, AuthError> {
        let signed_in = self.provider.sign_in_with_federated(credential).await?;
        self.establish(signed_in).await
    }

    async fn establish(&self, signed_in: SignIn) -> Result<EstablishedSession, AuthError> {
        let id = Uuid::new_v4();
        let token = self.tokens.issue(&signed_in.operator.email, id)?;
        let (state, _) = watch::channel(SessionState::SignedIn(signed_in.operator.clone()));

        let entry = SessionEntry {
            operator: signed_in.operator.clone(),
            id_token: signed_in.id_token.clone(),
            expires_at: Utc::now() + self.tokens.ttl(),
            state,
        };
        self.sessions.write().await.insert(id, entry);
        info!("Session {} started for {}", id, signed_in.operator.email);
        self.schedule_expiry(id);

        Ok(EstablishedSession {
            id,
            token,
            operator: signed_in.operator,
            id_token: signed_in.id_token,
        })
    }

    /// Signs the session out once its lifetime runs out, whether or not its
    /// cookie is ever presented again.
    fn schedule_expiry(&self, id: Uuid) {
        let lifetime = self.tokens.ttl().to_std().unwrap_or_default();
        let manager = self.clone();
        tokio::spawn(async move {
            tokio::time::sleep(lifetime).await;
            if manager.sessions.read().await.contains_key(&id) {
                info!("Session {} expired", id);
                manager.sign_out(id).await;
            }
        });
    }

    /// Resolves a cookie token to a live session. Tokens whose session was
    /// signed out or has expired resolve to `None`.
    pub async fn resolve(&self, token: &str) -> Option<ResolvedSession> {
        let claims = self.tokens.validate(token).ok()?;

        let expired = {
            let sessions = self.sessions.read().await;
            let entry = sessions.get(&claims.sid)?;
            if entry.operator.email != claims.sub {
                return None;
            }
            if entry.expires_at > Utc::now() {
                return Some(ResolvedSession {
                    id: claims.sid,
                    operator: entry.operator.clone(),
                    id_token: entry.id_token.clone(),
                });
            }
            true
        };

        if expired {
            info!("Session {} expired", claims.sid);
            self.sign_out(claims.sid).await;
        }
        None
    }

    /// Yields the current state immediately and every transition after it.
    /// Unknown sessions read as signed out.
    pub async fn watch(&self, id: Uuid) -> watch::Receiver<SessionState> {
        match self.sessions.read().await.get(&id) {
            Some(entry) => entry.state.subscribe(),
            None => watch::channel(SessionState::SignedOut).1,
        }
    }

    /// Best effort: provider failures are logged, the local session is always
    /// discarded.
    pub async fn sign_out(&self, id: Uuid) {
        let Some(entry) = self.sessions.write().await.remove(&id) else {
            return;
        };

        entry.state.send_replace(SessionState::SignedOut);
        info!("Session {} signed out for {}", id, entry.operator.email);

        if let Err(e) = self.provider.sign_out(&entry.id_token).await {
            warn!("Provider sign-out failed for session {}: {}", id, e);
        }
    }

    pub async fn active_count(&self) -> usize {
        self.sessions.read().await.len()
    }
}
