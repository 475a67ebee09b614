//! Session lifecycle.
//!
//! A [`StorefrontSession`] binds one cart store and one wishlist store to the
//! shopper's identity. Stores are synchronized only once a sign-in or
//! sign-up completes, and discarded locally on sign-out.

use crate::credentials::{validate_code, Credentials, SignUpProfile};
use crate::identity::{AuthStatus, IdentityService};
use crate::AuthError;
use futures::future::try_join;
use serde::{Deserialize, Serialize};
use shopfront_commerce::cart::CartStore;
use shopfront_commerce::ids::SessionId;
use shopfront_commerce::wishlist::WishlistStore;
use std::sync::Arc;
use tokio::sync::{watch, Mutex};
use tracing::{debug, info, warn};

/// Where the shopper's identity stands.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum SessionState {
    #[default]
    SignedOut,
    /// Sign-in accepted, waiting for a second-factor code.
    AwaitingSecondFactor,
    /// Account created, waiting for the emailed code.
    AwaitingEmailVerification,
    Active(SessionId),
}

impl SessionState {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionState::SignedOut => "signed_out",
            SessionState::AwaitingSecondFactor => "awaiting_second_factor",
            SessionState::AwaitingEmailVerification => "awaiting_email_verification",
            SessionState::Active(_) => "active",
        }
    }
}

impl From<AuthStatus> for SessionState {
    fn from(status: AuthStatus) -> Self {
        match status {
            AuthStatus::Complete { session_id } => SessionState::Active(session_id),
            AuthStatus::NeedsSecondFactor => SessionState::AwaitingSecondFactor,
            AuthStatus::NeedsEmailVerification => SessionState::AwaitingEmailVerification,
        }
    }
}

/// One shopper's session and the stores it owns.
pub struct StorefrontSession {
    identity: Arc<dyn IdentityService>,
    cart: Arc<CartStore>,
    wishlist: Arc<WishlistStore>,
    state: watch::Sender<SessionState>,
    transition: Mutex<()>,
}

impl StorefrontSession {
    pub fn new(
        identity: Arc<dyn IdentityService>,
        cart: Arc<CartStore>,
        wishlist: Arc<WishlistStore>,
    ) -> Self {
        let (state, _) = watch::channel(SessionState::SignedOut);
        Self {
            identity,
            cart,
            wishlist,
            state,
            transition: Mutex::new(()),
        }
    }

    /// Sign in. A second factor may be required before the session is active.
    pub async fn sign_in(&self, credentials: &Credentials) -> Result<AuthStatus, AuthError> {
        credentials.validate()?;
        let _guard = self.transition.lock().await;
        self.ensure_signed_out()?;

        let status = self.identity.create_session(credentials).await.map_err(|e| {
            warn!(error = %e, "sign-in failed");
            AuthError::Identity(e)
        })?;
        self.apply(status).await
    }

    /// Create an account. The email address usually needs verifying next.
    pub async fn sign_up(&self, profile: &SignUpProfile) -> Result<AuthStatus, AuthError> {
        profile.validate()?;
        let _guard = self.transition.lock().await;
        self.ensure_signed_out()?;

        let status = self.identity.create_account(profile).await.map_err(|e| {
            warn!(error = %e, "sign-up failed");
            AuthError::Identity(e)
        })?;
        self.apply(status).await
    }

    /// Submit the second-factor code of a pending sign-in.
    pub async fn verify_second_factor(&self, code: &str) -> Result<AuthStatus, AuthError> {
        let code = validate_code(code)?;
        let _guard = self.transition.lock().await;
        self.ensure_state(&SessionState::AwaitingSecondFactor, "verify a second factor")?;

        let status = self.identity.verify_second_factor(code).await.map_err(|e| {
            warn!(error = %e, "second-factor verification failed");
            AuthError::Identity(e)
        })?;
        self.apply(status).await
    }

    /// Submit the emailed code of a pending sign-up.
    pub async fn verify_email(&self, code: &str) -> Result<AuthStatus, AuthError> {
        let code = validate_code(code)?;
        let _guard = self.transition.lock().await;
        self.ensure_state(&SessionState::AwaitingEmailVerification, "verify an email")?;

        let status = self.identity.verify_email(code).await.map_err(|e| {
            warn!(error = %e, "email verification failed");
            AuthError::Identity(e)
        })?;
        self.apply(status).await
    }

    /// Sign out and discard the cart and wishlist held locally.
    ///
    /// Abandoning a pending sign-in or sign-up needs no remote call. If the
    /// provider fails to end an active session, the session stays active.
    pub async fn sign_out(&self) -> Result<(), AuthError> {
        let _guard = self.transition.lock().await;
        let current = self.state();
        if current == SessionState::SignedOut {
            return Ok(());
        }

        if let SessionState::Active(session_id) = &current {
            self.identity.end_session().await.map_err(|e| {
                warn!(session_id = %session_id, error = %e, "sign-out failed");
                AuthError::Identity(e)
            })?;
        }

        self.cart.discard().await;
        self.wishlist.discard().await;
        self.state.send_replace(SessionState::SignedOut);
        info!(previous = current.as_str(), "signed out");
        Ok(())
    }

    /// Resynchronize both stores from their services.
    pub async fn refresh(&self) -> Result<(), AuthError> {
        let _guard = self.transition.lock().await;
        if !self.is_signed_in() {
            return Err(AuthError::InvalidState {
                state: self.state().as_str().to_string(),
                action: "refresh stores".to_string(),
            });
        }
        self.sync_stores().await
    }

    pub fn state(&self) -> SessionState {
        self.state.borrow().clone()
    }

    pub fn is_signed_in(&self) -> bool {
        matches!(*self.state.borrow(), SessionState::Active(_))
    }

    pub fn session_id(&self) -> Option<SessionId> {
        match &*self.state.borrow() {
            SessionState::Active(id) => Some(id.clone()),
            _ => None,
        }
    }

    /// Subscribe to session state changes.
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state.subscribe()
    }

    pub fn cart(&self) -> &Arc<CartStore> {
        &self.cart
    }

    pub fn wishlist(&self) -> &Arc<WishlistStore> {
        &self.wishlist
    }

    /// Record the provider's answer. A completed session is committed before
    /// the stores load, so a failed load leaves the shopper signed in and
    /// [`StorefrontSession::refresh`] can retry it.
    async fn apply(&self, status: AuthStatus) -> Result<AuthStatus, AuthError> {
        let next = SessionState::from(status.clone());
        debug!(state = next.as_str(), "identity status received");
        self.state.send_replace(next);

        if let AuthStatus::Complete { session_id } = &status {
            info!(session_id = %session_id, "session active");
            self.sync_stores().await?;
        }
        Ok(status)
    }

    async fn sync_stores(&self) -> Result<(), AuthError> {
        try_join(self.cart.load(), self.wishlist.load())
            .await
            .map_err(|e| {
                warn!(error = %e, "store sync after sign-in failed");
                AuthError::Commerce(e)
            })?;
        debug!(
            cart_lines = self.cart.line_count(),
            wishlist_entries = self.wishlist.len(),
            "stores synchronized"
        );
        Ok(())
    }

    fn ensure_signed_out(&self) -> Result<(), AuthError> {
        match &*self.state.borrow() {
            SessionState::Active(_) => Err(AuthError::AlreadySignedIn),
            _ => Ok(()),
        }
    }

    fn ensure_state(&self, expected: &SessionState, action: &str) -> Result<(), AuthError> {
        let current = self.state.borrow();
        if *current == *expected {
            return Ok(());
        }
        Err(AuthError::InvalidState {
            state: current.as_str().to_string(),
            action: action.to_string(),
        })
    }
}
