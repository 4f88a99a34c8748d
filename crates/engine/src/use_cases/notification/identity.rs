//! Credential resolution.

use std::sync::Arc;
use std::time::Duration;

use ordercast_domain::{AuthError, Principal};

use crate::infrastructure::ports::{TokenVerifierPort, UserDirectoryPort};

/// Turns a bearer credential into a principal.
///
/// The token names the principal; the role always comes from the user
/// directory, never from the token.
pub struct IdentityResolver {
    verifier: Arc<dyn TokenVerifierPort>,
    directory: Arc<dyn UserDirectoryPort>,
    timeout: Duration,
}

impl IdentityResolver {
    pub fn new(
        verifier: Arc<dyn TokenVerifierPort>,
        directory: Arc<dyn UserDirectoryPort>,
        timeout: Duration,
    ) -> Self {
        Self {
            verifier,
            directory,
            timeout,
        }
    }

    /// Resolve a credential, bounded by the configured timeout.
    pub async fn resolve(&self, credential: &str) -> Result<Principal, AuthError> {
        match tokio::time::timeout(self.timeout, self.resolve_inner(credential)).await {
            Ok(result) => result,
            Err(_) => {
                tracing::warn!(
                    timeout_ms = self.timeout.as_millis() as u64,
                    "Credential resolution timed out"
                );
                Err(AuthError::Timeout)
            }
        }
    }

    async fn resolve_inner(&self, credential: &str) -> Result<Principal, AuthError> {
        let principal_id = self.verifier.verify(credential)?;

        let record = self.directory.find(principal_id).await.map_err(|e| {
            tracing::error!(principal_id = %principal_id, error = %e, "User directory lookup failed");
            AuthError::DirectoryUnavailable(e.to_string())
        })?;

        let Some(record) = record else {
            tracing::info!(principal_id = %principal_id, "Credential names an unknown principal");
            return Err(AuthError::PrincipalNotFound);
        };

        Ok(Principal::new(principal_id, record.role()))
    }
}
