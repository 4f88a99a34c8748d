//! HTTP request/response bodies.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use ordercast_domain::{EventKind, GroupName};

/// Body of `POST /api/events`.
///
/// `kind` stays a string and `payload` defaults to null so that unknown kinds
/// and missing payloads are reported as request errors instead of body
/// rejections.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublishRequest {
    pub kind: String,
    #[serde(default)]
    pub payload: Value,
}

/// Per-group outcome of a publish.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupDeliveryData {
    pub group: GroupName,
    pub attempted: usize,
    pub succeeded: usize,
}

/// Response of `POST /api/events`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublishResponse {
    pub kind: EventKind,
    pub attempted: usize,
    pub succeeded: usize,
    pub groups: Vec<GroupDeliveryData>,
}

/// Member count of one group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupStatsData {
    pub name: GroupName,
    pub members: usize,
}

/// Response of `GET /api/connections`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionStatsData {
    pub total: usize,
    pub authenticated: usize,
    pub unauthenticated: usize,
    pub groups: Vec<GroupStatsData>,
}
