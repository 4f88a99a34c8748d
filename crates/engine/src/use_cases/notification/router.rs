//! Best-effort fan-out of an event to one group.

use std::sync::Arc;

use tokio::sync::mpsc::error::TrySendError;

use ordercast_domain::{ConnectionId, Event, GroupName};
use ordercast_protocol::ServerMessage;

use crate::api::connections::{ConnectionRegistry, GroupMember};

/// Why a single member did not get the event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum DeliveryError {
    /// The member disconnected after the snapshot was taken.
    #[error("Connection closed")]
    Closed,
    /// The member's outbound buffer is full.
    #[error("Outbound buffer full")]
    Full,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryFailure {
    pub connection_id: ConnectionId,
    pub error: DeliveryError,
}

/// Outcome of one group delivery. Failures are never retried.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryReport {
    pub group: GroupName,
    pub attempted: usize,
    pub succeeded: usize,
    pub failures: Vec<DeliveryFailure>,
}

impl DeliveryReport {
    fn empty(group: GroupName) -> Self {
        Self {
            group,
            attempted: 0,
            succeeded: 0,
            failures: Vec::new(),
        }
    }
}

/// Sends events to the current members of a group.
pub struct GroupRouter {
    registry: Arc<ConnectionRegistry>,
}

impl GroupRouter {
    pub fn new(registry: Arc<ConnectionRegistry>) -> Self {
        Self { registry }
    }

    /// Deliver an event to everyone in the group right now.
    ///
    /// Members that join after the snapshot do not receive this event.
    pub async fn deliver_to_group(&self, group: &GroupName, event: &Event) -> DeliveryReport {
        let members = self.registry.snapshot_group(group).await;
        Self::deliver(group, &members, event)
    }

    /// Enqueue the event on each member's outbound channel without waiting.
    pub fn deliver(group: &GroupName, members: &[GroupMember], event: &Event) -> DeliveryReport {
        let mut report = DeliveryReport::empty(group.clone());
        if members.is_empty() {
            tracing::debug!(group = %group, kind = %event.kind, "No members to deliver to");
            return report;
        }

        let message = ServerMessage::Event {
            kind: event.kind,
            payload: event.payload.clone(),
        };

        for member in members {
            report.attempted += 1;
            match member.sender.try_send(message.clone()) {
                Ok(()) => report.succeeded += 1,
                Err(e) => {
                    let error = match e {
                        TrySendError::Closed(_) => DeliveryError::Closed,
                        TrySendError::Full(_) => DeliveryError::Full,
                    };
                    tracing::warn!(
                        connection_id = %member.connection_id,
                        group = %group,
                        kind = %event.kind,
                        error = %error,
                        "Failed to deliver event"
                    );
                    report.failures.push(DeliveryFailure {
                        connection_id: member.connection_id,
                        error,
                    });
                }
            }
        }

        tracing::debug!(
            group = %group,
            kind = %event.kind,
            attempted = report.attempted,
            succeeded = report.succeeded,
            "Group delivery finished"
        );
        report
    }
}
