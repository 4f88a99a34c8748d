//! Principals and their roles.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::group::GroupName;
use crate::ids::PrincipalId;

/// Role of an authenticated principal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Admin,
    User,
}

impl Role {
    /// Map a role value as stored in the user directory.
    ///
    /// Only the exact value `admin` grants the admin role; every other value
    /// (including `Admin` or padded variants) is a plain user.
    pub fn from_directory_value(value: &str) -> Self {
        if value == "admin" {
            Role::Admin
        } else {
            Role::User
        }
    }

    /// The broadcast group a connection with this role joins.
    pub fn group(self) -> GroupName {
        match self {
            Role::Admin => GroupName::admin_room(),
            Role::User => GroupName::user_room(),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Admin => write!(f, "admin"),
            Role::User => write!(f, "user"),
        }
    }
}

/// The identity behind an authenticated connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    pub id: PrincipalId,
    pub role: Role,
}

impl Principal {
    pub fn new(id: PrincipalId, role: Role) -> Self {
        Self { id, role }
    }
}
