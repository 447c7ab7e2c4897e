//! Single-operator provider backed by an Argon2 password hash.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::HashSet;
use tracing::{debug, info};

use super::errors::{AuthError, AuthErrorCode};
use super::provider::{looks_like_email, AuthProvider, FederatedCredential, Operator, SignIn};
use super::session::generate_token;
use crate::config::AuthConfig;

pub struct LocalAuthProvider {
    operator: Operator,
    password_hash: String,
    argon2: Argon2<'static>,
    issued_tokens: Mutex<HashSet<String>>,
}

impl LocalAuthProvider {
    pub fn new(email: &str, password_hash: &str) -> Result<Self, AuthError> {
        PasswordHash::new(password_hash).map_err(|e| {
            AuthError::new(
                AuthErrorCode::Other("invalid-configuration".to_string()),
                format!("Invalid operator password hash: {}", e),
            )
        })?;

        let email = email.trim().to_lowercase();
        Ok(Self {
            operator: Operator {
                uid: format!("local:{}", email),
                email,
            },
            password_hash: password_hash.to_string(),
            argon2: Argon2::default(),
            issued_tokens: Mutex::new(HashSet::new()),
        })
    }

    pub fn with_password(email: &str, password: &str) -> Result<Self, AuthError> {
        let hash = Self::hash_password(password)?;
        Self::new(email, &hash)
    }

    pub fn from_config(config: &AuthConfig) -> Result<Self, AuthError> {
        let email = config.operator_email.as_deref().unwrap_or_default();
        match (&config.operator_password_hash, &config.operator_password) {
            (Some(hash), _) => Self::new(email, hash),
            (None, Some(password)) => Self::with_password(email, password),
            (None, None) => Err(AuthError::new(
                AuthErrorCode::Other("invalid-configuration".to_string()),
                "No operator password configured",
            )),
        }
    }

    pub fn hash_password(password: &str) -> Result<String, AuthError> {
        let salt = SaltString::generate(&mut OsRng);
        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| {
                AuthError::new(
                    AuthErrorCode::Other("internal-error".to_string()),
                    format!("Failed to hash password: {}", e),
                )
            })
    }

    fn verify_password(&self, password: &str) -> bool {
        match PasswordHash::new(&self.password_hash) {
            Ok(parsed) => self
                .argon2
                .verify_password(password.as_bytes(), &parsed)
                .is_ok(),
            Err(_) => false,
        }
    }

    pub fn active_tokens(&self) -> usize {
        self.issued_tokens.lock().len()
    }
}

#[async_trait]
impl AuthProvider for LocalAuthProvider {
    fn backend_name(&self) -> &'static str {
        "local"
    }

    async fn sign_in_with_password(&self, email: &str, password: &str) -> Result<SignIn, AuthError> {
        let email = email.trim().to_lowercase();
        if !looks_like_email(&email) {
            return Err(AuthError::new(AuthErrorCode::InvalidEmail, "malformed email"));
        }
        if email != self.operator.email {
            return Err(AuthError::new(AuthErrorCode::UserNotFound, "unknown operator"));
        }
        if !self.verify_password(password) {
            return Err(AuthError::new(AuthErrorCode::WrongPassword, "password mismatch"));
        }

        let id_token = generate_token();
        self.issued_tokens.lock().insert(id_token.clone());
        info!("Local operator {} signed in", self.operator.email);

        Ok(SignIn {
            operator: self.operator.clone(),
            id_token,
        })
    }

    async fn sign_in_with_federated(&self, _credential: FederatedCredential) -> Result<SignIn, AuthError> {
        Err(AuthError::new(
            AuthErrorCode::OperationNotAllowed,
            "federated sign-in is not available with the local provider",
        ))
    }

    async fn sign_out(&self, id_token: &str) -> Result<(), AuthError> {
        if self.issued_tokens.lock().remove(id_token) {
            debug!("Revoked local id token");
            Ok(())
        } else {
            Err(AuthError::session_expired())
        }
    }
}
