//! Listshare Backend
//!
//! Layered architecture:
//! - domain: Core entities and business rules
//! - repository: Data access abstractions and implementations
//! - auth: Identity provider client, token resolution, authorization engine
//! - workflow: Invite orchestration
//! - api: HTTP handlers

use std::sync::Arc;

pub mod api;
pub mod auth;
pub mod config;
pub mod domain;
pub mod repository;
pub mod workflow;

use auth::{AuthorizationEngine, IdentityProvider, TokenResolver};
use repository::{Db, ListRepository, MembershipRepository, TodoRepository};
use workflow::{InviteWorkflow, MemberAdmin};

/// Application state shared across handlers
pub struct AppState {
    pub lists: ListRepository,
    pub todos: TodoRepository,
    pub members: MembershipRepository,
    pub resolver: TokenResolver,
    pub authz: AuthorizationEngine,
    pub invites: InviteWorkflow,
    pub member_admin: MemberAdmin,
}

impl AppState {
    /// Wire the components together; everything downstream borrows from
    /// these instances, nothing is constructed at module load.
    pub fn new(db: Db, provider: Arc<dyn IdentityProvider>) -> Self {
        let lists = ListRepository::new(db.clone());
        let members = MembershipRepository::new(db.clone());
        let authz = AuthorizationEngine::new(members.clone());
        Self {
            todos: TodoRepository::new(db),
            resolver: TokenResolver::new(provider.clone()),
            invites: InviteWorkflow::new(provider, members.clone(), authz.clone()),
            member_admin: MemberAdmin::new(lists.clone(), members.clone(), authz.clone()),
            lists,
            members,
            authz,
        }
    }
}
