//! Event Gateway - the single entry point for producers.
//!
//! Producers publish an event kind with a payload; the gateway validates the
//! payload for that kind, looks up the target groups in the routing table and
//! hands the event to the router for each group. Publishers are not
//! authorized: any socket or HTTP caller may publish, while receiving is
//! restricted to authenticated group members.

use std::str::FromStr;
use std::sync::Arc;

use serde_json::Value;
use tokio::sync::Mutex;

use ordercast_domain::{Event, EventError, EventKind, GroupName};

use super::router::{DeliveryReport, GroupRouter};

/// Static mapping from event kind to target groups.
#[derive(Debug, Clone, Copy, Default)]
pub struct RoutingTable;

impl RoutingTable {
    pub fn targets(&self, kind: EventKind) -> Vec<GroupName> {
        match kind {
            EventKind::OrderPlaced => vec![GroupName::admin_room()],
            EventKind::OrderStatusChanged => vec![GroupName::user_room()],
        }
    }
}

/// Aggregated outcome of one publish.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishReport {
    pub kind: EventKind,
    pub deliveries: Vec<DeliveryReport>,
}

impl PublishReport {
    pub fn attempted(&self) -> usize {
        self.deliveries.iter().map(|d| d.attempted).sum()
    }

    pub fn succeeded(&self) -> usize {
        self.deliveries.iter().map(|d| d.succeeded).sum()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GatewayError {
    #[error("Unknown event kind: {0}")]
    UnknownKind(String),
    #[error("Invalid event payload: {0}")]
    InvalidPayload(String),
}

impl From<EventError> for GatewayError {
    fn from(e: EventError) -> Self {
        match e {
            EventError::UnknownKind(kind) => GatewayError::UnknownKind(kind),
            EventError::InvalidPayload(msg) => GatewayError::InvalidPayload(msg),
        }
    }
}

pub struct EventGateway {
    router: Arc<GroupRouter>,
    routes: RoutingTable,
    /// Serializes fan-outs so every member sees events in publish order.
    dispatch: Mutex<()>,
}

impl EventGateway {
    pub fn new(router: Arc<GroupRouter>) -> Self {
        Self {
            router,
            routes: RoutingTable,
            dispatch: Mutex::new(()),
        }
    }

    /// Publish an event given its wire kind name (HTTP producers).
    pub async fn publish_named(
        &self,
        kind: &str,
        payload: Value,
    ) -> Result<PublishReport, GatewayError> {
        let kind = EventKind::from_str(kind)?;
        self.publish(kind, payload).await
    }

    /// Validate and fan out an event to every group routed for its kind.
    pub async fn publish(
        &self,
        kind: EventKind,
        payload: Value,
    ) -> Result<PublishReport, GatewayError> {
        let event = Event::new(kind, payload).map_err(|e| {
            tracing::info!(kind = %kind, error = %e, "Rejected event publish");
            GatewayError::from(e)
        })?;

        let _guard = self.dispatch.lock().await;
        let mut deliveries = Vec::new();
        for group in self.routes.targets(kind) {
            deliveries.push(self.router.deliver_to_group(&group, &event).await);
        }

        let report = PublishReport { kind, deliveries };
        tracing::info!(
            kind = %kind,
            attempted = report.attempted(),
            succeeded = report.succeeded(),
            "Event published"
        );
        Ok(report)
    }
}
