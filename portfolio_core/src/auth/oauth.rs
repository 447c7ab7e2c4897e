//! Google OAuth authorization-code flow, used as the server-side stand-in
//! for the federated sign-in popup.

use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use url::Url;

use super::errors::{AuthError, AuthErrorCode};
use crate::config::GoogleOAuthConfig;
use crate::models::OAuthCallbackQuery;

const AUTHORIZE_URL: &str = "https://accounts.google.com/o/oauth2/v2/auth";
const TOKEN_URL: &str = "https://oauth2.googleapis.com/token";

#[derive(Debug, Clone)]
pub struct GoogleOAuth {
    client: Client,
    client_id: String,
    client_secret: String,
    redirect_uri: String,
    authorize_url: Url,
    token_url: Url,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    id_token: String,
}

fn config_error(detail: impl Into<String>) -> AuthError {
    AuthError::new(AuthErrorCode::Other("invalid-configuration".to_string()), detail)
}

impl GoogleOAuth {
    pub fn new(config: &GoogleOAuthConfig, request_timeout: Duration) -> Result<Self, AuthError> {
        Self::with_endpoints(config, AUTHORIZE_URL, TOKEN_URL, request_timeout)
    }

    pub fn with_endpoints(
        config: &GoogleOAuthConfig,
        authorize_url: &str,
        token_url: &str,
        request_timeout: Duration,
    ) -> Result<Self, AuthError> {
        let client = Client::builder()
            .timeout(request_timeout)
            .build()
            .map_err(AuthError::network)?;

        Ok(Self {
            client,
            client_id: config.client_id.clone(),
            client_secret: config.client_secret.clone(),
            redirect_uri: config.redirect_uri.clone(),
            authorize_url: Url::parse(authorize_url).map_err(|e| config_error(e.to_string()))?,
            token_url: Url::parse(token_url).map_err(|e| config_error(e.to_string()))?,
        })
    }

    pub fn authorize_url(&self, state: &str) -> Url {
        let mut url = self.authorize_url.clone();
        url.query_pairs_mut()
            .append_pair("client_id", &self.client_id)
            .append_pair("redirect_uri", &self.redirect_uri)
            .append_pair("response_type", "code")
            .append_pair("scope", "openid email")
            .append_pair("state", state)
            .append_pair("prompt", "select_account");
        url
    }

    /// Validates the callback against the state issued at the start of the
    /// flow and returns the authorization code.
    pub fn callback_code(query: &OAuthCallbackQuery, expected_state: Option<&str>) -> Result<String, AuthError> {
        if let Some(error) = &query.error {
            let code = if error == "access_denied" {
                AuthErrorCode::PopupClosedByUser
            } else {
                AuthErrorCode::Other(error.replace('_', "-"))
            };
            return Err(AuthError::new(code, error.clone()));
        }

        let state_matches = match (query.state.as_deref(), expected_state) {
            (Some(received), Some(expected)) => !expected.is_empty() && received == expected,
            _ => false,
        };
        if !state_matches {
            return Err(AuthError::new(
                AuthErrorCode::CancelledPopupRequest,
                "oauth state mismatch",
            ));
        }

        query
            .code
            .clone()
            .filter(|code| !code.is_empty())
            .ok_or_else(|| AuthError::new(AuthErrorCode::CancelledPopupRequest, "missing authorization code"))
    }

    /// Exchanges an authorization code for the provider's id token.
    pub async fn exchange_code(&self, code: &str) -> Result<String, AuthError> {
        let response = self
            .client
            .post(self.token_url.clone())
            .form(&[
                ("code", code),
                ("client_id", self.client_id.as_str()),
                ("client_secret", self.client_secret.as_str()),
                ("redirect_uri", self.redirect_uri.as_str()),
                ("grant_type", "authorization_code"),
            ])
            .send()
            .await
            .map_err(AuthError::network)?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AuthError::new(
                AuthErrorCode::InvalidCredential,
                format!("token exchange failed ({}): {}", status, body),
            ));
        }

        let token: TokenResponse = response.json().await.map_err(AuthError::network)?;
        Ok(token.id_token)
    }
}
