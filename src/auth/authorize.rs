//! Authorization Engine
//!
//! A fixed rule set over three roles. `decide` is the pure decision
//! procedure; `AuthorizationEngine` feeds it the current membership
//! snapshot for (list, user). Every mutating or listing route goes through
//! here before touching the store.

use crate::domain::{DomainError, DomainResult, Role};
use crate::repository::MembershipRepository;

/// Operations gated by a minimum role
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    ViewList,
    ViewTodos,
    CreateTodo,
    UpdateTodo,
    DeleteTodo,
    RenameList,
    InviteMember,
    ChangeRole,
    RemoveMember,
    DeleteList,
}

impl Action {
    /// Minimum role required for this action
    pub fn required_role(&self) -> Role {
        match self {
            Action::ViewList | Action::ViewTodos => Role::Viewer,
            Action::CreateTodo
            | Action::UpdateTodo
            | Action::DeleteTodo
            | Action::RenameList => Role::Editor,
            Action::InviteMember
            | Action::ChangeRole
            | Action::RemoveMember
            | Action::DeleteList => Role::Owner,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Deny(&'static str),
}

/// Pure decision procedure: membership role (if any) against the action's
/// minimum under viewer < editor < owner. No side effects, deterministic.
pub fn decide(role: Option<Role>, action: Action) -> Decision {
    let required = action.required_role();
    match role {
        None => Decision::Deny("not a member"),
        Some(role) if role >= required => Decision::Allow,
        Some(_) => Decision::Deny(match required {
            Role::Viewer => "requires viewer role",
            Role::Editor => "requires editor role",
            Role::Owner => "requires owner role",
        }),
    }
}

/// Looks up the membership snapshot and applies `decide`
#[derive(Clone)]
pub struct AuthorizationEngine {
    members: MembershipRepository,
}

impl AuthorizationEngine {
    pub fn new(members: MembershipRepository) -> Self {
        Self { members }
    }

    /// Err(Forbidden) unless the user's role on the list permits `action`
    pub async fn authorize(
        &self,
        user_id: &str,
        list_id: u32,
        action: Action,
    ) -> DomainResult<()> {
        let membership = self.members.find(list_id, user_id).await?;
        match decide(membership.map(|m| m.role), action) {
            Decision::Allow => Ok(()),
            Decision::Deny(reason) => Err(DomainError::Forbidden(reason.to_string())),
        }
    }
}
