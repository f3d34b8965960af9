//! Todo domain entity

use serde::{Deserialize, Serialize};

use super::entity::Entity;

/// A task belonging to exactly one list
///
/// Deleted together with its list (store-level cascade).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Todo {
    pub id: u32,
    pub list_id: u32,
    pub task: String,
    pub completed: bool,
    /// Creation time, UTC milliseconds
    pub inserted_at: i64,
}

impl Entity for Todo {
    type Id = u32;

    fn id(&self) -> Self::Id {
        self.id
    }
}

impl Todo {
    pub fn new(id: u32, list_id: u32, task: String) -> Self {
        Self {
            id,
            list_id,
            task,
            completed: false,
            inserted_at: 0,
        }
    }
}
