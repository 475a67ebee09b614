//! Identity provider contract.
//!
//! The provider's protocol (second-factor delivery, email codes) is opaque;
//! each call only reports where the sign-in or sign-up now stands.

use crate::credentials::{Credentials, SignUpProfile};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use shopfront_commerce::ids::SessionId;
use shopfront_commerce::services::ServiceError;

/// Outcome of an identity call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum AuthStatus {
    /// Signed in; the session is active.
    Complete { session_id: SessionId },
    /// Credentials accepted; a second-factor code is required.
    NeedsSecondFactor,
    /// Account created; the email address must be verified with a code.
    NeedsEmailVerification,
}

impl AuthStatus {
    pub fn is_complete(&self) -> bool {
        matches!(self, AuthStatus::Complete { .. })
    }
}

/// Remote identity provider.
#[async_trait]
pub trait IdentityService: Send + Sync {
    /// Sign in with an identifier and password.
    async fn create_session(&self, credentials: &Credentials) -> Result<AuthStatus, ServiceError>;

    /// Finish a sign-in that needed a second factor.
    async fn verify_second_factor(&self, code: &str) -> Result<AuthStatus, ServiceError>;

    /// Register a new account.
    async fn create_account(&self, profile: &SignUpProfile) -> Result<AuthStatus, ServiceError>;

    /// Finish a sign-up by verifying the emailed code.
    async fn verify_email(&self, code: &str) -> Result<AuthStatus, ServiceError>;

    /// End the active session.
    async fn end_session(&self) -> Result<(), ServiceError>;
}
