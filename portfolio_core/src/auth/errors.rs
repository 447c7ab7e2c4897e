use std::fmt;
use thiserror::Error;

use crate::locale::Locale;

/// Provider error codes, in the `auth/<code>` vocabulary of the hosted
/// identity service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthErrorCode {
    InvalidEmail,
    UserDisabled,
    UserNotFound,
    WrongPassword,
    InvalidCredential,
    PopupClosedByUser,
    CancelledPopupRequest,
    OperationNotAllowed,
    NetworkRequestFailed,
    SessionExpired,
    Other(String),
}

impl AuthErrorCode {
    /// Accepts codes with or without the `auth/` prefix.
    pub fn parse(raw: &str) -> Self {
        let code = raw.trim();
        let code = code.strip_prefix("auth/").unwrap_or(code);
        match code {
            "invalid-email" => Self::InvalidEmail,
            "user-disabled" => Self::UserDisabled,
            "user-not-found" => Self::UserNotFound,
            "wrong-password" => Self::WrongPassword,
            "invalid-credential" => Self::InvalidCredential,
            "popup-closed-by-user" => Self::PopupClosedByUser,
            "cancelled-popup-request" => Self::CancelledPopupRequest,
            "operation-not-allowed" => Self::OperationNotAllowed,
            "network-request-failed" => Self::NetworkRequestFailed,
            "user-token-expired" => Self::SessionExpired,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::InvalidEmail => "invalid-email",
            Self::UserDisabled => "user-disabled",
            Self::UserNotFound => "user-not-found",
            Self::WrongPassword => "wrong-password",
            Self::InvalidCredential => "invalid-credential",
            Self::PopupClosedByUser => "popup-closed-by-user",
            Self::CancelledPopupRequest => "cancelled-popup-request",
            Self::OperationNotAllowed => "operation-not-allowed",
            Self::NetworkRequestFailed => "network-request-failed",
            Self::SessionExpired => "user-token-expired",
            Self::Other(code) => code,
        }
    }

    /// Message shown on the login page. Codes without a dedicated entry get
    /// the generic retry message.
    pub fn message(&self, locale: Locale) -> &'static str {
        match (self, locale) {
            (Self::InvalidEmail, Locale::En) => "Invalid email",
            (Self::InvalidEmail, Locale::Es) => "El correo electrónico no es válido",
            (Self::UserDisabled, Locale::En) => "This account has been disabled",
            (Self::UserDisabled, Locale::Es) => "Esta cuenta ha sido deshabilitada",
            (Self::UserNotFound, Locale::En) => "No account exists with this email",
            (Self::UserNotFound, Locale::Es) => "No existe una cuenta con este correo",
            (Self::WrongPassword, Locale::En) => "Incorrect password",
            (Self::WrongPassword, Locale::Es) => "Contraseña incorrecta",
            (Self::InvalidCredential, Locale::En) => "Invalid credentials",
            (Self::InvalidCredential, Locale::Es) => "Credenciales inválidas",
            (Self::PopupClosedByUser | Self::CancelledPopupRequest, Locale::En) => "Sign-in cancelled",
            (Self::PopupClosedByUser | Self::CancelledPopupRequest, Locale::Es) => {
                "Inicio de sesión cancelado"
            }
            (_, Locale::En) => "Login failed. Please try again.",
            (_, Locale::Es) => "Error al iniciar sesión. Intenta de nuevo.",
        }
    }
}

impl fmt::Display for AuthErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "auth/{}", self.as_str())
    }
}

/// Maps a raw provider code straight to its login-page message.
pub fn auth_error_message(code: &str, locale: Locale) -> &'static str {
    AuthErrorCode::parse(code).message(locale)
}

#[derive(Debug, Clone, PartialEq, Error)]
#[error("{code}: {detail}")]
pub struct AuthError {
    code: AuthErrorCode,
    detail: String,
}

impl AuthError {
    pub fn new(code: AuthErrorCode, detail: impl Into<String>) -> Self {
        Self {
            code,
            detail: detail.into(),
        }
    }

    pub fn code(&self) -> &AuthErrorCode {
        &self.code
    }

    pub fn detail(&self) -> &str {
        &self.detail
    }

    pub fn message(&self, locale: Locale) -> &'static str {
        self.code.message(locale)
    }

    pub fn network(err: impl fmt::Display) -> Self {
        Self::new(AuthErrorCode::NetworkRequestFailed, err.to_string())
    }

    pub fn session_expired() -> Self {
        Self::new(AuthErrorCode::SessionExpired, "session is no longer valid")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_codes_map_with_or_without_prefix() {
        assert_eq!(
            auth_error_message("auth/wrong-password", Locale::Es),
            "Contraseña incorrecta"
        );
        assert_eq!(
            auth_error_message("user-not-found", Locale::Es),
            "No existe una cuenta con este correo"
        );
        assert_eq!(
            auth_error_message("auth/invalid-credential", Locale::En),
            "Invalid credentials"
        );
    }

    #[test]
    fn both_popup_codes_read_as_cancelled() {
        assert_eq!(
            auth_error_message("auth/popup-closed-by-user", Locale::Es),
            auth_error_message("auth/cancelled-popup-request", Locale::Es)
        );
    }

    #[test]
    fn unknown_codes_fall_back_to_generic_message() {
        let message = auth_error_message("auth/network-failed", Locale::Es);
        assert_eq!(message, "Error al iniciar sesión. Intenta de nuevo.");
        assert!(!auth_error_message("", Locale::En).is_empty());
        assert_eq!(
            AuthErrorCode::parse("auth/network-failed"),
            AuthErrorCode::Other("network-failed".to_string())
        );
    }

    #[test]
    fn display_uses_prefixed_code() {
        assert_eq!(AuthErrorCode::WrongPassword.to_string(), "auth/wrong-password");
        let err = AuthError::new(AuthErrorCode::UserDisabled, "USER_DISABLED");
        assert_eq!(err.to_string(), "auth/user-disabled: USER_DISABLED");
    }
}
