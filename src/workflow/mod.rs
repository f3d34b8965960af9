//! Workflow Layer
//!
//! Multi-step orchestrations composing the auth subsystem with the
//! repositories.

mod invite;
mod members;

pub use invite::{InviteOutcome, InviteWorkflow};
pub use members::MemberAdmin;
