//! Broadcast group names.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::DomainError;

const MAX_GROUP_NAME_LENGTH: usize = 100;

/// Name of the group every admin connection joins.
pub const ADMIN_ROOM: &str = "adminRoom";
/// Name of the group every non-admin connection joins.
pub const USER_ROOM: &str = "userRoom";

/// A validated broadcast group name (non-empty, <=100 chars, trimmed).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct GroupName(String);

impl GroupName {
    /// Create a new validated group name.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if the name is empty after trimming
    /// or exceeds 100 characters.
    pub fn new(name: impl Into<String>) -> Result<Self, DomainError> {
        let name = name.into();
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(DomainError::validation("Group name cannot be empty"));
        }
        if trimmed.len() > MAX_GROUP_NAME_LENGTH {
            return Err(DomainError::validation(format!(
                "Group name cannot exceed {} characters",
                MAX_GROUP_NAME_LENGTH
            )));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn admin_room() -> Self {
        Self(ADMIN_ROOM.to_string())
    }

    pub fn user_room() -> Self {
        Self(USER_ROOM.to_string())
    }

    /// Whether this is one of the groups derived from a role.
    ///
    /// A connection is a member of at most one role group at a time.
    pub fn is_role_group(&self) -> bool {
        self.0 == ADMIN_ROOM || self.0 == USER_ROOM
    }

    /// Returns the name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for GroupName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for GroupName {
    type Error = DomainError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl From<GroupName> for String {
    fn from(name: GroupName) -> String {
        name.0
    }
}

impl AsRef<str> for GroupName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
