//! Authentication errors.

use shopfront_commerce::services::{ServiceError, ServiceErrorKind};
use shopfront_commerce::CommerceError;
use thiserror::Error;

/// Authentication error type.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// Credentials failed local validation; nothing was sent.
    #[error("invalid credentials: {0}")]
    InvalidCredentials(String),

    /// Verification was attempted without a code.
    #[error("verification code is required")]
    MissingCode,

    /// The operation does not apply to the current session state.
    #[error("cannot {action} while {state}")]
    InvalidState { state: String, action: String },

    /// A session is already active.
    #[error("already signed in")]
    AlreadySignedIn,

    /// The identity provider failed or refused the call.
    #[error("identity service error: {0}")]
    Identity(ServiceError),

    /// Signed in, but the cart or wishlist could not be synchronized.
    #[error("store sync failed: {0}")]
    Commerce(#[from] CommerceError),
}

impl AuthError {
    /// Check if this is an authentication failure.
    pub fn is_auth_failure(&self) -> bool {
        match self {
            AuthError::InvalidCredentials(_) | AuthError::MissingCode => true,
            AuthError::Identity(e) => matches!(
                e.kind,
                ServiceErrorKind::Rejected | ServiceErrorKind::Unauthorized
            ),
            _ => false,
        }
    }

    /// Check if retrying the same call may succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            AuthError::Identity(e) => e.is_transient(),
            AuthError::Commerce(e) => e.is_retryable(),
            _ => false,
        }
    }
}

impl From<ServiceError> for AuthError {
    fn from(e: ServiceError) -> Self {
        AuthError::Identity(e)
    }
}
