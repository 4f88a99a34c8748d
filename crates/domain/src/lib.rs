//! Ordercast Domain - vocabulary shared by the broadcast engine and its clients.
//!
//! - `ids` - connection and principal identifiers
//! - `principal` - principals and roles
//! - `group` - broadcast group names
//! - `events` - order event kinds and payload validation
//! - `error` - domain error types

pub mod error;
pub mod events;
pub mod group;
pub mod ids;
pub mod principal;

pub use error::{AuthError, DomainError, EventError};
pub use events::{EntityRef, Event, EventKind, OrderPlaced, OrderStatusChanged};
pub use group::{GroupName, ADMIN_ROOM, USER_ROOM};
pub use ids::{ConnectionId, PrincipalId};
pub use principal::{Principal, Role};
