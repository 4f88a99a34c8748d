//! Error types for the domain layer.

use thiserror::Error;

/// Error raised when constructing value objects.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Validation failed (e.g., invalid field values)
    #[error("Validation failed: {0}")]
    Validation(String),
}

impl DomainError {
    /// Creates a validation error for a violated value-object constraint.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }
}

/// Why a credential could not be turned into a principal.
///
/// Every variant is recoverable: the connection stays unauthenticated and
/// may submit another credential.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// Signature, format or expiry check failed.
    #[error("Invalid credential")]
    InvalidCredential,

    /// The credential is valid but the directory has no such principal.
    #[error("Principal not found")]
    PrincipalNotFound,

    /// The user directory could not be queried.
    #[error("User directory unavailable: {0}")]
    DirectoryUnavailable(String),

    /// Resolution did not finish within the configured bound.
    #[error("Credential resolution timed out")]
    Timeout,
}

impl AuthError {
    /// Reason sent to the client alongside the unauthorized signal.
    pub fn client_reason(&self) -> &'static str {
        match self {
            AuthError::InvalidCredential => "Unauthorized: Invalid token",
            AuthError::PrincipalNotFound => "User profile not found",
            AuthError::DirectoryUnavailable(_) => "Unauthorized: Identity lookup failed",
            AuthError::Timeout => "Unauthorized: Identity lookup timed out",
        }
    }
}

/// Errors raised while building an event from producer input.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EventError {
    #[error("Unknown event kind: {0}")]
    UnknownKind(String),

    #[error("Invalid event payload: {0}")]
    InvalidPayload(String),
}

impl EventError {
    pub fn invalid_payload(msg: impl Into<String>) -> Self {
        Self::InvalidPayload(msg.into())
    }
}
