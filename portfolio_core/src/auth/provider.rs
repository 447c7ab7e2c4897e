use async_trait::async_trait;
use serde::Serialize;

use super::errors::AuthError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Operator {
    pub uid: String,
    pub email: String,
}

/// Outcome of a successful sign-in. The id token authorizes store calls
/// made on the operator's behalf.
#[derive(Debug, Clone)]
pub struct SignIn {
    pub operator: Operator,
    pub id_token: String,
}

#[derive(Debug, Clone)]
pub enum FederatedCredential {
    /// An OpenID Connect id token issued by Google.
    GoogleIdToken(String),
}

#[async_trait]
pub trait AuthProvider: Send + Sync {
    fn backend_name(&self) -> &'static str;

    async fn sign_in_with_password(&self, email: &str, password: &str) -> Result<SignIn, AuthError>;

    async fn sign_in_with_federated(&self, credential: FederatedCredential) -> Result<SignIn, AuthError>;

    async fn sign_out(&self, id_token: &str) -> Result<(), AuthError>;
}

/// Loose shape check used before contacting any backend.
pub fn looks_like_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
        && !email.chars().any(char::is_whitespace)
        && !domain.contains('@')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_shape() {
        assert!(looks_like_email("a@b.com"));
        assert!(!looks_like_email("a@b"));
        assert!(!looks_like_email("@b.com"));
        assert!(!looks_like_email("a b@c.com"));
        assert!(!looks_like_email("a@b@c.com"));
    }
}
