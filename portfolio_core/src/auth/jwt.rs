use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::errors::{AuthError, AuthErrorCode};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionClaims {
    /// Operator email.
    pub sub: String,
    pub sid: Uuid,
    pub iat: usize,
    pub exp: usize,
}

/// Issues and validates the HS256 token kept in the admin session cookie.
#[derive(Clone)]
pub struct SessionTokens {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    ttl: Duration,
}

impl SessionTokens {
    pub fn new(secret: &str, ttl: Duration) -> Result<Self, AuthError> {
        if secret.len() < 32 {
            return Err(AuthError::new(
                AuthErrorCode::Other("invalid-configuration".to_string()),
                "Session secret must be at least 32 characters long",
            ));
        }

        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            ttl,
        })
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn issue(&self, email: &str, sid: Uuid) -> Result<String, AuthError> {
        let now = Utc::now();
        let claims = SessionClaims {
            sub: email.to_string(),
            sid,
            iat: now.timestamp() as usize,
            exp: (now + self.ttl).timestamp() as usize,
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key).map_err(|e| {
            AuthError::new(
                AuthErrorCode::Other("internal-error".to_string()),
                format!("Failed to issue session token: {}", e),
            )
        })
    }

    pub fn validate(&self, token: &str) -> Result<SessionClaims, AuthError> {
        let validation = Validation::new(Algorithm::HS256);

        decode::<SessionClaims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::session_expired(),
                _ => AuthError::new(
                    AuthErrorCode::InvalidCredential,
                    format!("Session token validation failed: {}", e),
                ),
            })
    }
}
