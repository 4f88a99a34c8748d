//! Authenticate a connection and subscribe it to its role group.

use std::sync::Arc;

use ordercast_domain::{AuthError, ConnectionId, GroupName, Principal};

use super::identity::IdentityResolver;
use crate::api::connections::{ConnectionRegistry, RegistryError};

/// Outcome of a successful authentication.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedConnection {
    pub principal: Principal,
    pub group: GroupName,
}

/// Use case for the authenticate message.
///
/// Resolution runs with no registry lock held; the state transition and the
/// group join are applied afterwards.
pub struct AuthenticateConnection {
    resolver: Arc<IdentityResolver>,
    registry: Arc<ConnectionRegistry>,
}

impl AuthenticateConnection {
    pub fn new(resolver: Arc<IdentityResolver>, registry: Arc<ConnectionRegistry>) -> Self {
        Self { resolver, registry }
    }

    pub async fn execute(
        &self,
        connection_id: ConnectionId,
        credential: &str,
    ) -> Result<AuthenticatedConnection, AuthenticateError> {
        match self.registry.get(connection_id).await {
            None => return Err(AuthenticateError::UnknownConnection),
            Some(info) if info.is_authenticated() => {
                return Err(AuthenticateError::AlreadyAuthenticated)
            }
            Some(_) => {}
        }

        let principal = self.resolver.resolve(credential).await.map_err(|e| {
            tracing::info!(connection_id = %connection_id, error = %e, "Authentication rejected");
            AuthenticateError::Auth(e)
        })?;

        // A concurrent authenticate on the same connection may have won the race.
        self.registry
            .authenticate(connection_id, principal)
            .await
            .map_err(|e| match e {
                RegistryError::AlreadyAuthenticated => AuthenticateError::AlreadyAuthenticated,
                RegistryError::UnknownConnection => AuthenticateError::UnknownConnection,
            })?;

        let group = principal.role.group();
        if !self.registry.join(connection_id, group.clone()).await {
            tracing::debug!(
                connection_id = %connection_id,
                "Connection closed before joining its group"
            );
            return Err(AuthenticateError::UnknownConnection);
        }

        Ok(AuthenticatedConnection { principal, group })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthenticateError {
    #[error(transparent)]
    Auth(#[from] AuthError),
    #[error("Connection already authenticated")]
    AlreadyAuthenticated,
    #[error("Connection not found")]
    UnknownConnection,
}
