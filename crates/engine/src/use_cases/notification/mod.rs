//! Notification use cases.
//!
//! Authenticating subscribers into their role group and publishing order
//! events to the groups that should see them.

use std::sync::Arc;

mod authenticate;
mod gateway;
mod identity;
mod router;

pub use authenticate::{AuthenticateConnection, AuthenticateError, AuthenticatedConnection};
pub use gateway::{EventGateway, GatewayError, PublishReport, RoutingTable};
pub use identity::IdentityResolver;
pub use router::{DeliveryError, DeliveryFailure, DeliveryReport, GroupRouter};

/// Container for notification use cases.
pub struct NotificationUseCases {
    pub authenticate: Arc<AuthenticateConnection>,
    pub gateway: Arc<EventGateway>,
}

impl NotificationUseCases {
    pub fn new(authenticate: Arc<AuthenticateConnection>, gateway: Arc<EventGateway>) -> Self {
        Self {
            authenticate,
            gateway,
        }
    }
}
