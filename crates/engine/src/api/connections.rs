//! Connection registry for WebSocket clients.
//!
//! Tracks live connections, their authentication state and their broadcast
//! group memberships. This is the only owner of the membership map; other
//! components go through the operations below.
//!
//! # Connection Lifecycle
//!
//! 1. Socket opens: `register` adds an unauthenticated connection
//! 2. Client submits a credential; once resolved, `authenticate` records the
//!    principal (exactly once per connection)
//! 3. `join` adds the connection to its role group (`adminRoom` / `userRoom`)
//! 4. Socket closes: `unregister` drops the connection and every membership

use std::collections::{BTreeSet, HashMap, HashSet};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::{mpsc, RwLock};

use ordercast_domain::{ConnectionId, GroupName, Principal};
use ordercast_protocol::ServerMessage;

use crate::infrastructure::ports::ClockPort;

/// Outbound channel to a single connection's socket writer.
pub type ConnectionSender = mpsc::Sender<ServerMessage>;

/// Authentication state of a connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthState {
    Unauthenticated,
    Authenticated(Principal),
}

/// Information about a connected client.
#[derive(Debug, Clone)]
pub struct ConnectionInfo {
    /// Unique ID for this connection
    pub connection_id: ConnectionId,
    pub state: AuthState,
    /// Groups this connection currently belongs to
    pub groups: BTreeSet<GroupName>,
    pub connected_at: DateTime<Utc>,
    pub authenticated_at: Option<DateTime<Utc>>,
}

impl ConnectionInfo {
    pub fn principal(&self) -> Option<Principal> {
        match self.state {
            AuthState::Authenticated(principal) => Some(principal),
            AuthState::Unauthenticated => None,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self.state, AuthState::Authenticated(_))
    }
}

/// A group member as captured for one delivery.
#[derive(Debug, Clone)]
pub struct GroupMember {
    pub connection_id: ConnectionId,
    pub sender: ConnectionSender,
}

struct ConnectionEntry {
    info: ConnectionInfo,
    sender: ConnectionSender,
}

#[derive(Default)]
struct RegistryState {
    connections: HashMap<ConnectionId, ConnectionEntry>,
    groups: HashMap<GroupName, HashSet<ConnectionId>>,
}

impl RegistryState {
    fn remove_membership(&mut self, connection_id: ConnectionId, group: &GroupName) -> bool {
        let Some(members) = self.groups.get_mut(group) else {
            return false;
        };
        let removed = members.remove(&connection_id);
        if members.is_empty() {
            self.groups.remove(group);
            tracing::debug!(group = %group, "Group has no more members, removed");
        }
        removed
    }
}

/// Manages all live connections and their group memberships.
pub struct ConnectionRegistry {
    state: RwLock<RegistryState>,
    clock: Arc<dyn ClockPort>,
}

impl ConnectionRegistry {
    /// Create a new, empty registry.
    pub fn new(clock: Arc<dyn ClockPort>) -> Self {
        Self {
            state: RwLock::new(RegistryState::default()),
            clock,
        }
    }

    /// Register a new unauthenticated connection.
    ///
    /// Connection ids are unique per transport; a duplicate registration
    /// keeps the first entry.
    pub async fn register(&self, connection_id: ConnectionId, sender: ConnectionSender) {
        let mut state = self.state.write().await;
        if state.connections.contains_key(&connection_id) {
            tracing::warn!(connection_id = %connection_id, "Duplicate connection registration ignored");
            return;
        }

        let info = ConnectionInfo {
            connection_id,
            state: AuthState::Unauthenticated,
            groups: BTreeSet::new(),
            connected_at: self.clock.now(),
            authenticated_at: None,
        };
        state
            .connections
            .insert(connection_id, ConnectionEntry { info, sender });
        tracing::debug!(connection_id = %connection_id, "Connection registered");
    }

    /// Mark a connection as authenticated with the given principal.
    ///
    /// The transition happens once; the role is fixed for the rest of the
    /// connection's life.
    pub async fn authenticate(
        &self,
        connection_id: ConnectionId,
        principal: Principal,
    ) -> Result<(), RegistryError> {
        let now = self.clock.now();
        let mut state = self.state.write().await;
        let entry = state
            .connections
            .get_mut(&connection_id)
            .ok_or(RegistryError::UnknownConnection)?;

        if entry.info.is_authenticated() {
            return Err(RegistryError::AlreadyAuthenticated);
        }

        entry.info.state = AuthState::Authenticated(principal);
        entry.info.authenticated_at = Some(now);
        tracing::info!(
            connection_id = %connection_id,
            principal_id = %principal.id,
            role = %principal.role,
            "Connection authenticated"
        );
        Ok(())
    }

    /// Add a connection to a group, creating the group if needed.
    ///
    /// Returns whether the connection is a member afterwards. Unknown
    /// (already disconnected) and unauthenticated connections are logged and
    /// left alone. Joining a role group first leaves any other role group.
    pub async fn join(&self, connection_id: ConnectionId, group: GroupName) -> bool {
        let mut state = self.state.write().await;

        let previous_role_groups: Vec<GroupName> = {
            let Some(entry) = state.connections.get(&connection_id) else {
                tracing::debug!(
                    connection_id = %connection_id,
                    group = %group,
                    "Join ignored, connection no longer registered"
                );
                return false;
            };
            if !entry.info.is_authenticated() {
                tracing::warn!(
                    connection_id = %connection_id,
                    group = %group,
                    "Join ignored, connection not authenticated"
                );
                return false;
            }
            if entry.info.groups.contains(&group) {
                return true;
            }
            if group.is_role_group() {
                entry
                    .info
                    .groups
                    .iter()
                    .filter(|g| g.is_role_group())
                    .cloned()
                    .collect()
            } else {
                Vec::new()
            }
        };

        for old in &previous_role_groups {
            state.remove_membership(connection_id, old);
        }

        state
            .groups
            .entry(group.clone())
            .or_default()
            .insert(connection_id);

        if let Some(entry) = state.connections.get_mut(&connection_id) {
            for old in &previous_role_groups {
                entry.info.groups.remove(old);
            }
            entry.info.groups.insert(group.clone());
        }

        tracing::info!(connection_id = %connection_id, group = %group, "Connection joined group");
        true
    }

    /// Remove a connection from a group.
    ///
    /// Returns whether a membership was removed; repeating the call is a no-op.
    pub async fn leave(&self, connection_id: ConnectionId, group: &GroupName) -> bool {
        let mut state = self.state.write().await;

        let Some(entry) = state.connections.get_mut(&connection_id) else {
            tracing::debug!(
                connection_id = %connection_id,
                group = %group,
                "Leave ignored, connection no longer registered"
            );
            return false;
        };
        if !entry.info.groups.remove(group) {
            return false;
        }

        state.remove_membership(connection_id, group);
        tracing::info!(connection_id = %connection_id, group = %group, "Connection left group");
        true
    }

    /// Remove a connection and all of its memberships (on disconnect).
    pub async fn unregister(&self, connection_id: ConnectionId) -> Option<ConnectionInfo> {
        let mut state = self.state.write().await;
        let entry = state.connections.remove(&connection_id)?;

        for group in &entry.info.groups {
            state.remove_membership(connection_id, group);
        }

        tracing::debug!(
            connection_id = %connection_id,
            groups = entry.info.groups.len(),
            "Connection unregistered"
        );
        Some(entry.info)
    }

    /// Get connection info by ID.
    pub async fn get(&self, connection_id: ConnectionId) -> Option<ConnectionInfo> {
        let state = self.state.read().await;
        state
            .connections
            .get(&connection_id)
            .map(|entry| entry.info.clone())
    }

    /// Get all connection IDs in a group.
    pub async fn group_members(&self, group: &GroupName) -> Vec<ConnectionId> {
        self.state
            .read()
            .await
            .groups
            .get(group)
            .map(|members| members.iter().copied().collect())
            .unwrap_or_default()
    }

    /// Copy out the current members of a group together with their senders.
    ///
    /// The registry lock is released before the caller sends anything.
    pub async fn snapshot_group(&self, group: &GroupName) -> Vec<GroupMember> {
        let state = self.state.read().await;
        let Some(members) = state.groups.get(group) else {
            return Vec::new();
        };
        members
            .iter()
            .filter_map(|id| {
                state.connections.get(id).map(|entry| GroupMember {
                    connection_id: *id,
                    sender: entry.sender.clone(),
                })
            })
            .collect()
    }

    /// Get statistics about the registry.
    pub async fn stats(&self) -> RegistryStats {
        let state = self.state.read().await;

        let total = state.connections.len();
        let authenticated = state
            .connections
            .values()
            .filter(|entry| entry.info.is_authenticated())
            .count();

        let mut groups: Vec<GroupStats> = state
            .groups
            .iter()
            .map(|(name, members)| GroupStats {
                name: name.clone(),
                members: members.len(),
            })
            .collect();
        groups.sort_by(|a, b| a.name.cmp(&b.name));

        RegistryStats {
            total,
            authenticated,
            unauthenticated: total - authenticated,
            groups,
        }
    }
}

/// Member count of one group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupStats {
    pub name: GroupName,
    pub members: usize,
}

/// Statistics about the registry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistryStats {
    pub total: usize,
    pub authenticated: usize,
    pub unauthenticated: usize,
    pub groups: Vec<GroupStats>,
}

/// Errors that can occur during registry operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    #[error("Connection not found")]
    UnknownConnection,
    #[error("Connection already authenticated")]
    AlreadyAuthenticated,
}
