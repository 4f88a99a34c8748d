//! Application state and composition.

use std::sync::Arc;
use std::time::Duration;

use crate::api::connections::ConnectionRegistry;
use crate::infrastructure::ports::{ClockPort, TokenVerifierPort, UserDirectoryPort};
use crate::use_cases;
use crate::use_cases::notification::{
    AuthenticateConnection, EventGateway, GroupRouter, IdentityResolver,
};

/// Main application state.
///
/// Holds the connection registry and use cases.
/// Passed to HTTP/WebSocket handlers via Axum state.
pub struct App {
    pub connections: Arc<ConnectionRegistry>,
    pub use_cases: UseCases,
}

/// Container for all use cases.
pub struct UseCases {
    pub notification: use_cases::NotificationUseCases,
}

impl App {
    /// Create a new App with all dependencies wired up.
    pub fn new(
        verifier: Arc<dyn TokenVerifierPort>,
        directory: Arc<dyn UserDirectoryPort>,
        clock: Arc<dyn ClockPort>,
        auth_resolve_timeout: Duration,
    ) -> Self {
        let connections = Arc::new(ConnectionRegistry::new(clock));

        let resolver = Arc::new(IdentityResolver::new(
            verifier,
            directory,
            auth_resolve_timeout,
        ));
        let authenticate = Arc::new(AuthenticateConnection::new(
            resolver,
            connections.clone(),
        ));

        let router = Arc::new(GroupRouter::new(connections.clone()));
        let gateway = Arc::new(EventGateway::new(router));

        let notification = use_cases::NotificationUseCases::new(authenticate, gateway);

        Self {
            connections,
            use_cases: UseCases { notification },
        }
    }
}
