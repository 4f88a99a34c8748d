//! WebSocket message types between the broadcast engine and its clients
//!
//! Clients send `ClientMessage` (authenticate, publish, heartbeat) and receive
//! `ServerMessage` (authentication outcome, delivered events, acks, errors).

use serde::{Deserialize, Serialize};
use serde_json::Value;

use ordercast_domain::{EventKind, GroupName, PrincipalId, Role};

// =============================================================================
// Client Messages (client → engine)
// =============================================================================

/// Messages from a client connection to the engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ClientMessage {
    /// Submit a bearer credential after the socket is open
    Authenticate { token: String },
    /// Publish an order event (no publisher authorization). `kind` is checked
    /// by the engine so an unknown kind is an `INVALID_EVENT`, not a parse error.
    Publish { kind: String, payload: Value },
    /// Keep-alive
    Heartbeat,
}

// =============================================================================
// Server Messages (engine → client)
// =============================================================================

/// Messages from the engine to a client connection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ServerMessage {
    /// Credential accepted; the connection now receives the group's events
    Authenticated {
        principal_id: PrincipalId,
        role: Role,
        group: GroupName,
    },
    /// Credential rejected; the connection stays unauthenticated and may retry
    Unauthorized { reason: String },
    /// A broadcast event, payload exactly as published
    Event { kind: EventKind, payload: Value },
    /// Ack for an event published over this connection
    PublishAccepted {
        kind: EventKind,
        attempted: usize,
        succeeded: usize,
    },
    /// Request-level error
    Error { code: String, message: String },
    /// Heartbeat response
    Pong,
}

impl ServerMessage {
    pub fn error(code: &str, message: impl Into<String>) -> Self {
        ServerMessage::Error {
            code: code.to_string(),
            message: message.into(),
        }
    }
}

/// Error codes carried by `ServerMessage::Error`.
pub mod error_codes {
    pub const PARSE_ERROR: &str = "PARSE_ERROR";
    pub const ALREADY_AUTHENTICATED: &str = "ALREADY_AUTHENTICATED";
    pub const INVALID_EVENT: &str = "INVALID_EVENT";
}
