//! Membership Entity and Role
//!
//! A membership grants one user one role on one list. At most one
//! membership exists per (list, user) pair; the store enforces this with a
//! UNIQUE constraint.

use serde::{Deserialize, Serialize};

use super::entity::Entity;

/// Access role on a list. Greater roles contain all lower ones:
/// viewer < editor < owner (derived from variant order).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// May view the list, its todos and its members
    #[default]
    Viewer,
    /// May additionally create/update/delete todos and rename the list
    Editor,
    /// May additionally manage members and delete the list
    Owner,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Viewer => "viewer",
            Role::Editor => "editor",
            Role::Owner => "owner",
        }
    }

    /// Strict parse: anything outside the three known roles is rejected
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "viewer" => Some(Role::Viewer),
            "editor" => Some(Role::Editor),
            "owner" => Some(Role::Owner),
            _ => None,
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One user's role on one list
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Membership {
    pub id: u32,
    pub list_id: u32,
    /// Provider-issued user id
    pub user_id: String,
    pub role: Role,
}

impl Entity for Membership {
    type Id = u32;

    fn id(&self) -> Self::Id {
        self.id
    }
}

impl Membership {
    pub fn new(id: u32, list_id: u32, user_id: String, role: Role) -> Self {
        Self {
            id,
            list_id,
            user_id,
            role,
        }
    }
}
