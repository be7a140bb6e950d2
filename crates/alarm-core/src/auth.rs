//! Mock credential check.
//!
//! Stands in for an identity provider: the password is compared against a
//! single expected value. No retries, lockout or rate limiting.

use uuid::Uuid;

use crate::error::AuthError;

/// Password accepted when no configuration overrides it.
pub const DEFAULT_EXPECTED_PASSWORD: &str = "correct_password";

/// Produced by a successful credential check. Lives in memory only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub username: String,
    pub token: String,
}

pub struct CredentialCheck {
    expected_password: String,
}

impl Default for CredentialCheck {
    fn default() -> Self {
        Self::new(DEFAULT_EXPECTED_PASSWORD)
    }
}

impl CredentialCheck {
    pub fn new(expected_password: impl Into<String>) -> Self {
        Self {
            expected_password: expected_password.into(),
        }
    }

    /// Verify `password` and open a session for `username`.
    ///
    /// # Errors
    /// Returns [`AuthError::InvalidCredentials`] when the password does not match.
    pub fn authenticate(&self, username: &str, password: &str) -> Result<Session, AuthError> {
        tracing::info!(username, "authenticating user");

        if password != self.expected_password {
            tracing::warn!(username, "authentication failed: wrong password");
            return Err(AuthError::InvalidCredentials {
                username: username.to_string(),
            });
        }

        tracing::info!(username, "authentication succeeded");
        Ok(Session {
            username: username.to_string(),
            token: format!("mock-{}", Uuid::new_v4()),
        })
    }
}
