//! Sign-in and sign-up forms, checked before they reach the identity service.

use crate::AuthError;
use serde::Deserialize;
use std::fmt;

/// Shortest password the forms accept.
pub const MIN_PASSWORD_LEN: usize = 6;

/// Identifier and password for signing in.
#[derive(Clone, PartialEq, Eq, Deserialize)]
pub struct Credentials {
    /// Email address or username.
    pub identifier: String,
    pub password: String,
}

impl Credentials {
    pub fn new(identifier: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            password: password.into(),
        }
    }

    pub fn validate(&self) -> Result<(), AuthError> {
        require("identifier", &self.identifier)?;
        check_password(&self.password)
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("identifier", &self.identifier)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// New account details.
#[derive(Clone, PartialEq, Eq, Deserialize)]
pub struct SignUpProfile {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
}

impl SignUpProfile {
    pub fn validate(&self) -> Result<(), AuthError> {
        require("first name", &self.first_name)?;
        require("last name", &self.last_name)?;
        require("email", &self.email)?;
        check_password(&self.password)
    }
}

impl fmt::Debug for SignUpProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SignUpProfile")
            .field("first_name", &self.first_name)
            .field("last_name", &self.last_name)
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Check a one-time code before sending it for verification.
pub fn validate_code(code: &str) -> Result<&str, AuthError> {
    let code = code.trim();
    if code.is_empty() {
        return Err(AuthError::MissingCode);
    }
    Ok(code)
}

fn require(field: &str, value: &str) -> Result<(), AuthError> {
    if value.trim().is_empty() {
        return Err(AuthError::InvalidCredentials(format!("{} is required", field)));
    }
    Ok(())
}

fn check_password(password: &str) -> Result<(), AuthError> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(AuthError::InvalidCredentials(format!(
            "password must be at least {} characters",
            MIN_PASSWORD_LEN
        )));
    }
    Ok(())
}
