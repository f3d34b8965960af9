//! Invite Workflow
//!
//! Adds a user to a list by email: authorize the requester, resolve the
//! target through the provider's privileged lookup, then insert the
//! membership. The owner check runs before the lookup so callers without
//! the owner role learn nothing about which emails exist.
//!
//! Idempotent from the caller's perspective: inviting an existing member
//! returns the membership that is already there.

use std::sync::Arc;

use tracing::info;

use crate::auth::{Action, AuthorizationEngine, IdentityProvider};
use crate::domain::{DomainError, DomainResult, Identity, Membership, Role};
use crate::repository::MembershipRepository;

#[derive(Debug, Clone)]
pub enum InviteOutcome {
    Created(Membership),
    AlreadyMember(Membership),
}

#[derive(Clone)]
pub struct InviteWorkflow {
    provider: Arc<dyn IdentityProvider>,
    members: MembershipRepository,
    authz: AuthorizationEngine,
}

impl InviteWorkflow {
    pub fn new(
        provider: Arc<dyn IdentityProvider>,
        members: MembershipRepository,
        authz: AuthorizationEngine,
    ) -> Self {
        Self {
            provider,
            members,
            authz,
        }
    }

    pub async fn invite(
        &self,
        requester: &Identity,
        list_id: u32,
        email: &str,
        role: Role,
    ) -> DomainResult<InviteOutcome> {
        let email = email.trim().to_lowercase();
        if email.is_empty() {
            return Err(DomainError::InvalidInput("Email required".to_string()));
        }

        self.authz
            .authorize(&requester.id, list_id, Action::InviteMember)
            .await?;

        let target = self
            .provider
            .lookup_by_email(&email)
            .await?
            .ok_or_else(|| DomainError::NotFound("user".to_string()))?;

        if target.id == requester.id {
            return Err(DomainError::InvalidInput(
                "Cannot invite yourself".to_string(),
            ));
        }

        if let Some(existing) = self.members.find(list_id, &target.id).await? {
            return Ok(InviteOutcome::AlreadyMember(existing));
        }

        match self.members.insert(list_id, &target.id, role).await {
            Ok(membership) => {
                info!(
                    "user {} invited to list {} as {}",
                    target.id, list_id, role
                );
                Ok(InviteOutcome::Created(membership))
            }
            // Lost the race against a concurrent invite of the same user;
            // surface the row that won.
            Err(DomainError::Conflict(_)) => {
                let existing = self.members.find(list_id, &target.id).await?.ok_or_else(|| {
                    DomainError::Internal("membership missing after conflict".to_string())
                })?;
                Ok(InviteOutcome::AlreadyMember(existing))
            }
            Err(e) => Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::{init_db, ListRepository};
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::path::Path;

    /// In-memory provider: a fixed directory of known users
    struct FakeProvider {
        users: HashMap<String, Identity>,
    }

    impl FakeProvider {
        fn with_users(users: &[(&str, &str)]) -> Self {
            Self {
                users: users
                    .iter()
                    .map(|(id, email)| (email.to_string(), Identity::new(*id, *email)))
                    .collect(),
            }
        }
    }

    #[async_trait]
    impl IdentityProvider for FakeProvider {
        async fn verify(&self, _token: &str) -> crate::domain::DomainResult<Identity> {
            Err(DomainError::Unauthorized("not used".to_string()))
        }

        async fn lookup_by_email(
            &self,
            email: &str,
        ) -> crate::domain::DomainResult<Option<Identity>> {
            Ok(self.users.get(email).cloned())
        }
    }

    /// Provider whose privileged path is unreachable
    struct DownProvider;

    #[async_trait]
    impl IdentityProvider for DownProvider {
        async fn verify(&self, _token: &str) -> crate::domain::DomainResult<Identity> {
            Err(DomainError::Unavailable("down".to_string()))
        }

        async fn lookup_by_email(
            &self,
            _email: &str,
        ) -> crate::domain::DomainResult<Option<Identity>> {
            Err(DomainError::Unavailable("user lookup failed".to_string()))
        }
    }

    struct Setup {
        lists: ListRepository,
        members: MembershipRepository,
        workflow: InviteWorkflow,
    }

    fn setup(provider: Arc<dyn IdentityProvider>) -> Setup {
        let conn = init_db(Path::new(":memory:")).expect("Failed to init test DB");
        let members = MembershipRepository::new(conn.clone());
        let authz = AuthorizationEngine::new(members.clone());
        Setup {
            lists: ListRepository::new(conn),
            members: members.clone(),
            workflow: InviteWorkflow::new(provider, members, authz),
        }
    }

    fn owner() -> Identity {
        Identity::new("owner-1", "owner@example.com")
    }

    #[tokio::test]
    async fn owner_invites_known_user_as_editor() {
        let s = setup(Arc::new(FakeProvider::with_users(&[("user-a", "a@x.com")])));
        let list = s.lists.create(&owner().id, "Groceries").await.unwrap();

        let outcome = s
            .workflow
            .invite(&owner(), list.id, "a@x.com", Role::Editor)
            .await
            .unwrap();

        match outcome {
            InviteOutcome::Created(m) => {
                assert_eq!(m.list_id, list.id);
                assert_eq!(m.user_id, "user-a");
                assert_eq!(m.role, Role::Editor);
            }
            other => panic!("expected Created, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn repeated_invite_returns_same_membership() {
        let s = setup(Arc::new(FakeProvider::with_users(&[("user-a", "a@x.com")])));
        let list = s.lists.create(&owner().id, "Groceries").await.unwrap();

        let first = s
            .workflow
            .invite(&owner(), list.id, "a@x.com", Role::Editor)
            .await
            .unwrap();
        let second = s
            .workflow
            .invite(&owner(), list.id, "a@x.com", Role::Editor)
            .await
            .unwrap();

        let created = match first {
            InviteOutcome::Created(m) => m,
            other => panic!("expected Created, got {:?}", other),
        };
        match second {
            InviteOutcome::AlreadyMember(m) => assert_eq!(m.id, created.id),
            other => panic!("expected AlreadyMember, got {:?}", other),
        }

        // still exactly one membership row for the target
        let members = s.members.list_for_list(list.id).await.unwrap();
        assert_eq!(
            members.iter().filter(|m| m.user_id == "user-a").count(),
            1
        );
    }

    #[tokio::test]
    async fn editor_cannot_invite() {
        let s = setup(Arc::new(FakeProvider::with_users(&[
            ("user-a", "a@x.com"),
            ("user-b", "b@x.com"),
        ])));
        let list = s.lists.create(&owner().id, "Groceries").await.unwrap();
        s.members
            .insert(list.id, "user-a", Role::Editor)
            .await
            .unwrap();

        let editor = Identity::new("user-a", "a@x.com");
        let err = s
            .workflow
            .invite(&editor, list.id, "b@x.com", Role::Viewer)
            .await
            .unwrap_err();

        assert!(matches!(err, DomainError::Forbidden(_)));
        assert!(s.members.find(list.id, "user-b").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn non_member_cannot_invite() {
        let s = setup(Arc::new(FakeProvider::with_users(&[("user-a", "a@x.com")])));
        let list = s.lists.create(&owner().id, "Groceries").await.unwrap();

        let stranger = Identity::new("stranger", "s@x.com");
        let err = s
            .workflow
            .invite(&stranger, list.id, "a@x.com", Role::Viewer)
            .await
            .unwrap_err();

        assert!(matches!(err, DomainError::Forbidden(_)));
    }

    #[tokio::test]
    async fn unknown_email_is_not_found() {
        let s = setup(Arc::new(FakeProvider::with_users(&[("user-a", "a@x.com")])));
        let list = s.lists.create(&owner().id, "Groceries").await.unwrap();

        let err = s
            .workflow
            .invite(&owner(), list.id, "nobody@x.com", Role::Viewer)
            .await
            .unwrap_err();

        assert!(matches!(err, DomainError::NotFound(_)));
        assert_eq!(s.members.list_for_list(list.id).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn self_invite_is_rejected() {
        let s = setup(Arc::new(FakeProvider::with_users(&[(
            "owner-1",
            "owner@example.com",
        )])));
        let list = s.lists.create(&owner().id, "Groceries").await.unwrap();

        let err = s
            .workflow
            .invite(&owner(), list.id, "owner@example.com", Role::Owner)
            .await
            .unwrap_err();

        assert!(matches!(err, DomainError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn empty_email_is_rejected() {
        let s = setup(Arc::new(FakeProvider::with_users(&[])));
        let list = s.lists.create(&owner().id, "Groceries").await.unwrap();

        let err = s
            .workflow
            .invite(&owner(), list.id, "   ", Role::Viewer)
            .await
            .unwrap_err();

        assert!(matches!(err, DomainError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn email_is_normalized_before_lookup() {
        let s = setup(Arc::new(FakeProvider::with_users(&[("user-a", "a@x.com")])));
        let list = s.lists.create(&owner().id, "Groceries").await.unwrap();

        let outcome = s
            .workflow
            .invite(&owner(), list.id, "  A@X.COM ", Role::Viewer)
            .await
            .unwrap();

        assert!(matches!(outcome, InviteOutcome::Created(_)));
    }

    #[tokio::test]
    async fn unauthorized_caller_never_reaches_the_lookup() {
        // A provider that is down distinguishes the two paths: a non-owner
        // must see Forbidden, not the lookup failure.
        let s = setup(Arc::new(DownProvider));
        let list = s.lists.create(&owner().id, "Groceries").await.unwrap();

        let stranger = Identity::new("stranger", "s@x.com");
        let err = s
            .workflow
            .invite(&stranger, list.id, "a@x.com", Role::Viewer)
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Forbidden(_)));

        // the owner does reach the lookup and sees the provider failure
        let err = s
            .workflow
            .invite(&owner(), list.id, "a@x.com", Role::Viewer)
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Unavailable(_)));
    }

    #[tokio::test]
    async fn invite_racing_an_existing_row_settles_to_already_member() {
        let s = setup(Arc::new(FakeProvider::with_users(&[("user-a", "a@x.com")])));
        let list = s.lists.create(&owner().id, "Groceries").await.unwrap();

        // A concurrent invite already inserted the row. Whether the
        // workflow sees it at the duplicate check or collides with the
        // UNIQUE constraint on insert, the caller gets the winning row.
        let winner = s
            .members
            .insert(list.id, "user-a", Role::Viewer)
            .await
            .unwrap();

        let outcome = s
            .workflow
            .invite(&owner(), list.id, "a@x.com", Role::Editor)
            .await
            .unwrap();

        match outcome {
            InviteOutcome::AlreadyMember(m) => {
                assert_eq!(m.id, winner.id);
                assert_eq!(m.role, Role::Viewer);
            }
            other => panic!("expected AlreadyMember, got {:?}", other),
        }
    }
}
