pub mod errors;
pub mod identity_toolkit;
pub mod jwt;
pub mod local;
pub mod oauth;
pub mod provider;
pub mod session;

#[cfg(test)]
mod tests;

pub use errors::{auth_error_message, AuthError, AuthErrorCode};
pub use identity_toolkit::IdentityToolkitProvider;
pub use jwt::{SessionClaims, SessionTokens};
pub use local::LocalAuthProvider;
pub use oauth::GoogleOAuth;
pub use provider::{AuthProvider, FederatedCredential, Operator, SignIn};
pub use session::{generate_token, EstablishedSession, ResolvedSession, SessionManager, SessionState};
