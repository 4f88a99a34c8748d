//! Order lifecycle events.
//!
//! Events are transient: they are validated on publish and forwarded to the
//! currently joined connections with the payload left exactly as published.
//! The typed views below are only used to check the payload shape.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::EventError;

/// Kinds of events producers may publish.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EventKind {
    /// A purchase was confirmed at checkout.
    OrderPlaced,
    /// An admin moved an order to a new status.
    OrderStatusChanged,
}

impl EventKind {
    pub const ALL: [EventKind; 2] = [EventKind::OrderPlaced, EventKind::OrderStatusChanged];

    /// Wire name of the kind.
    pub fn as_str(self) -> &'static str {
        match self {
            EventKind::OrderPlaced => "orderPlaced",
            EventKind::OrderStatusChanged => "orderStatusChanged",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EventKind {
    type Err = EventError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EventKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s.trim())
            .ok_or_else(|| EventError::UnknownKind(s.to_string()))
    }
}

/// Reference to a product or user.
///
/// Storefront screens send route parameters as strings and database ids as
/// numbers, so both are accepted.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum EntityRef {
    Number(i64),
    Text(String),
}

impl EntityRef {
    fn check(&self, field: &'static str) -> Result<(), EventError> {
        match self {
            EntityRef::Text(text) if text.trim().is_empty() => {
                Err(EventError::invalid_payload(format!("{field} cannot be empty")))
            }
            _ => Ok(()),
        }
    }
}

/// Shape of an `orderPlaced` payload.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderPlaced {
    pub product_id: EntityRef,
    pub user_id: EntityRef,
    /// Snapshot of the product at checkout time.
    #[serde(default)]
    pub product_details: Option<Value>,
}

/// Shape of an `orderStatusChanged` payload.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderStatusChanged {
    pub product_id: EntityRef,
    pub status: String,
}

/// A validated event ready for fan-out.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub kind: EventKind,
    pub payload: Value,
}

impl Event {
    /// Build an event after checking that `payload` has the shape `kind` requires.
    ///
    /// # Errors
    ///
    /// Returns `EventError::InvalidPayload` if the payload is not an object,
    /// misses a required field, or carries an empty identifier or status.
    pub fn new(kind: EventKind, payload: Value) -> Result<Self, EventError> {
        validate_payload(kind, &payload)?;
        Ok(Self { kind, payload })
    }
}

fn validate_payload(kind: EventKind, payload: &Value) -> Result<(), EventError> {
    if !payload.is_object() {
        return Err(EventError::invalid_payload("payload must be a JSON object"));
    }

    match kind {
        EventKind::OrderPlaced => {
            let view = OrderPlaced::deserialize(payload)
                .map_err(|e| EventError::invalid_payload(e.to_string()))?;
            view.product_id.check("productId")?;
            view.user_id.check("userId")
        }
        EventKind::OrderStatusChanged => {
            let view = OrderStatusChanged::deserialize(payload)
                .map_err(|e| EventError::invalid_payload(e.to_string()))?;
            view.product_id.check("productId")?;
            if view.status.trim().is_empty() {
                return Err(EventError::invalid_payload("status cannot be empty"));
            }
            Ok(())
        }
    }
}
