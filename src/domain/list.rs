//! List domain entity

use serde::{Deserialize, Serialize};

use super::entity::Entity;

/// A shared task list
///
/// Owned by exactly one user at creation time; ownership never transfers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct List {
    pub id: u32,
    /// Provider-issued id of the owning user
    pub owner: String,
    pub name: String,
    /// Creation time, UTC milliseconds
    pub created_at: i64,
}

impl Entity for List {
    type Id = u32;

    fn id(&self) -> Self::Id {
        self.id
    }
}

impl List {
    pub fn new(id: u32, owner: String, name: String, created_at: i64) -> Self {
        Self {
            id,
            owner,
            name,
            created_at,
        }
    }
}
