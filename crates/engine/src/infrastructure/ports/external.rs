//! External collaborator port traits (credential verification, user directory).

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use ordercast_domain::{AuthError, PrincipalId, Role};

use super::error::DirectoryError;

// =============================================================================
// Credential verification
// =============================================================================

/// Verifies an opaque bearer credential and extracts the principal it names.
///
/// Verification is local (signature + expiry), so the port is synchronous.
#[cfg_attr(test, mockall::automock)]
pub trait TokenVerifierPort: Send + Sync {
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredential` for any integrity, format or
    /// expiry failure.
    fn verify(&self, credential: &str) -> Result<PrincipalId, AuthError>;
}

// =============================================================================
// User directory
// =============================================================================

/// A user as recorded by the external user directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectoryRecord {
    pub id: PrincipalId,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    /// Raw role value; see `Role::from_directory_value`.
    pub role: String,
}

impl DirectoryRecord {
    pub fn role(&self) -> Role {
        Role::from_directory_value(&self.role)
    }
}

/// Authoritative source of a principal's current role.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserDirectoryPort: Send + Sync {
    /// Look up a principal. `Ok(None)` means the directory has no record.
    async fn find(&self, id: PrincipalId) -> Result<Option<DirectoryRecord>, DirectoryError>;
}
