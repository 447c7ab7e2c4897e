//! Hosted identity service over the Google Identity Toolkit REST API.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;
use tracing::{info, warn};
use url::Url;

use super::errors::{AuthError, AuthErrorCode};
use super::provider::{AuthProvider, FederatedCredential, Operator, SignIn};
use crate::config::AuthConfig;

const DEFAULT_BASE_URL: &str = "https://identitytoolkit.googleapis.com/";

pub struct IdentityToolkitProvider {
    client: Client,
    base_url: Url,
    api_key: String,
    allowed_email: Option<String>,
    request_uri: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SignInResponse {
    local_id: String,
    #[serde(default)]
    email: Option<String>,
    id_token: String,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

/// Maps the service's `error.message` (e.g. `EMAIL_NOT_FOUND` or
/// `TOO_MANY_ATTEMPTS_TRY_LATER : detail`) onto a provider code.
pub fn map_error_message(message: &str) -> AuthErrorCode {
    let key = message.split(" : ").next().unwrap_or(message).trim();
    match key {
        "EMAIL_NOT_FOUND" => AuthErrorCode::UserNotFound,
        "INVALID_PASSWORD" => AuthErrorCode::WrongPassword,
        "USER_DISABLED" => AuthErrorCode::UserDisabled,
        "INVALID_EMAIL" | "MISSING_EMAIL" => AuthErrorCode::InvalidEmail,
        "INVALID_LOGIN_CREDENTIALS" | "INVALID_IDP_RESPONSE" | "INVALID_ID_TOKEN" => {
            AuthErrorCode::InvalidCredential
        }
        "OPERATION_NOT_ALLOWED" | "PASSWORD_LOGIN_DISABLED" => AuthErrorCode::OperationNotAllowed,
        other => AuthErrorCode::Other(other.to_lowercase().replace('_', "-")),
    }
}

impl IdentityToolkitProvider {
    pub fn new(api_key: &str, request_timeout: Duration) -> Result<Self, AuthError> {
        Self::with_base_url(DEFAULT_BASE_URL, api_key, request_timeout)
    }

    pub fn with_base_url(base_url: &str, api_key: &str, request_timeout: Duration) -> Result<Self, AuthError> {
        let mut base_url = Url::parse(base_url).map_err(|e| {
            AuthError::new(
                AuthErrorCode::Other("invalid-configuration".to_string()),
                format!("Invalid identity service url: {}", e),
            )
        })?;
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        let client = Client::builder()
            .timeout(request_timeout)
            .build()
            .map_err(AuthError::network)?;

        Ok(Self {
            client,
            base_url,
            api_key: api_key.to_string(),
            allowed_email: None,
            request_uri: "http://localhost".to_string(),
        })
    }

    pub fn from_config(config: &AuthConfig, request_timeout: Duration) -> Result<Self, AuthError> {
        let api_key = config.api_key.as_deref().unwrap_or_default();
        let mut provider = Self::new(api_key, request_timeout)?;
        provider.allowed_email = config.operator_email.clone();
        if let Some(google) = &config.google {
            provider.request_uri = google.redirect_uri.clone();
        }
        Ok(provider)
    }

    /// Restricts sign-in to a single operator account.
    pub fn with_allowed_email(mut self, email: impl Into<String>) -> Self {
        self.allowed_email = Some(email.into());
        self
    }

    fn endpoint(&self, method: &str) -> Result<Url, AuthError> {
        let mut url = self
            .base_url
            .join(&format!("v1/accounts:{}", method))
            .map_err(|e| AuthError::new(AuthErrorCode::Other("internal-error".to_string()), e.to_string()))?;
        url.query_pairs_mut().append_pair("key", &self.api_key);
        Ok(url)
    }

    async fn call(&self, method: &str, body: serde_json::Value) -> Result<SignIn, AuthError> {
        let response = self
            .client
            .post(self.endpoint(method)?)
            .json(&body)
            .send()
            .await
            .map_err(AuthError::network)?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let code = match serde_json::from_str::<ErrorEnvelope>(&text) {
                Ok(envelope) => map_error_message(&envelope.error.message),
                Err(_) => AuthErrorCode::Other(format!("http-{}", status.as_u16())),
            };
            warn!("Identity service rejected {}: {}", method, code);
            return Err(AuthError::new(code, text));
        }

        let signed_in: SignInResponse = response.json().await.map_err(AuthError::network)?;
        let email = signed_in.email.unwrap_or_default().to_lowercase();

        if let Some(allowed) = &self.allowed_email {
            if !allowed.trim().eq_ignore_ascii_case(&email) {
                warn!("Rejected sign-in for non-operator account {}", email);
                return Err(AuthError::new(
                    AuthErrorCode::InvalidCredential,
                    "account is not the configured operator",
                ));
            }
        }

        info!("Operator {} signed in via identity service", email);
        Ok(SignIn {
            operator: Operator {
                uid: signed_in.local_id,
                email,
            },
            id_token: signed_in.id_token,
        })
    }
}

#[async_trait]
impl AuthProvider for IdentityToolkitProvider {
    fn backend_name(&self) -> &'static str {
        "identity_toolkit"
    }

    async fn sign_in_with_password(&self, email: &str, password: &str) -> Result<SignIn, AuthError> {
        self.call(
            "signInWithPassword",
            json!({
                "email": email.trim(),
                "password": password,
                "returnSecureToken": true,
            }),
        )
        .await
    }

    async fn sign_in_with_federated(&self, credential: FederatedCredential) -> Result<SignIn, AuthError> {
        let FederatedCredential::GoogleIdToken(id_token) = credential;
        let post_body = url::form_urlencoded::Serializer::new(String::new())
            .append_pair("id_token", &id_token)
            .append_pair("providerId", "google.com")
            .finish();

        self.call(
            "signInWithIdp",
            json!({
                "postBody": post_body,
                "requestUri": self.request_uri,
                "returnSecureToken": true,
                "returnIdpCredential": true,
            }),
        )
        .await
    }

    /// Id tokens are bearer credentials that expire on their own; there is
    /// nothing to revoke upstream.
    async fn sign_out(&self, _id_token: &str) -> Result<(), AuthError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn service_messages_map_to_codes() {
        assert_eq!(map_error_message("EMAIL_NOT_FOUND"), AuthErrorCode::UserNotFound);
        assert_eq!(map_error_message("INVALID_PASSWORD"), AuthErrorCode::WrongPassword);
        assert_eq!(map_error_message("USER_DISABLED"), AuthErrorCode::UserDisabled);
        assert_eq!(map_error_message("INVALID_EMAIL"), AuthErrorCode::InvalidEmail);
        assert_eq!(
            map_error_message("INVALID_LOGIN_CREDENTIALS"),
            AuthErrorCode::InvalidCredential
        );
        assert_eq!(
            map_error_message("TOO_MANY_ATTEMPTS_TRY_LATER : Access disabled"),
            AuthErrorCode::Other("too-many-attempts-try-later".to_string())
        );
    }

    #[test]
    fn endpoint_carries_api_key() {
        let provider =
            IdentityToolkitProvider::with_base_url("http://127.0.0.1:9099", "key-123", Duration::from_secs(1))
                .unwrap();
        assert_eq!(
            provider.endpoint("signInWithPassword").unwrap().as_str(),
            "http://127.0.0.1:9099/v1/accounts:signInWithPassword?key=key-123"
        );
    }
}
