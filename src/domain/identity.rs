//! Identity resolved from the identity provider
//!
//! Not an `Entity`: the id is issued by the external auth service, never by
//! our store.

use serde::{Deserialize, Serialize};

/// A verified user: stable provider-issued id plus email
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub id: String,
    pub email: String,
}

impl Identity {
    pub fn new(id: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            email: email.into(),
        }
    }
}
