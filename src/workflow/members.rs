//! Member Administration
//!
//! Owner-side role changes and removals. The founding owner's membership
//! is untouchable: demoting or removing it would leave the list without an
//! administrator.

use crate::auth::{Action, AuthorizationEngine};
use crate::domain::{DomainError, DomainResult, Identity, Membership, Role};
use crate::repository::{ListRepository, MembershipRepository};

#[derive(Clone)]
pub struct MemberAdmin {
    lists: ListRepository,
    members: MembershipRepository,
    authz: AuthorizationEngine,
}

impl MemberAdmin {
    pub fn new(
        lists: ListRepository,
        members: MembershipRepository,
        authz: AuthorizationEngine,
    ) -> Self {
        Self {
            lists,
            members,
            authz,
        }
    }

    async fn guard_founding_owner(
        &self,
        list_id: u32,
        user_id: &str,
        what: &str,
    ) -> DomainResult<()> {
        let list = self
            .lists
            .find_by_id(list_id)
            .await?
            .ok_or_else(|| DomainError::NotFound(format!("list {}", list_id)))?;
        if list.owner == user_id {
            return Err(DomainError::InvalidInput(format!(
                "Cannot {} the owner",
                what
            )));
        }
        Ok(())
    }

    pub async fn change_role(
        &self,
        requester: &Identity,
        list_id: u32,
        user_id: &str,
        role: Role,
    ) -> DomainResult<Membership> {
        self.authz
            .authorize(&requester.id, list_id, Action::ChangeRole)
            .await?;
        self.guard_founding_owner(list_id, user_id, "demote").await?;

        self.members.update_role(list_id, user_id, role).await?;
        self.members
            .find(list_id, user_id)
            .await?
            .ok_or_else(|| DomainError::NotFound("membership".to_string()))
    }

    pub async fn remove(
        &self,
        requester: &Identity,
        list_id: u32,
        user_id: &str,
    ) -> DomainResult<()> {
        self.authz
            .authorize(&requester.id, list_id, Action::RemoveMember)
            .await?;
        self.guard_founding_owner(list_id, user_id, "remove").await?;

        self.members.remove(list_id, user_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::init_db;
    use std::path::Path;

    struct Setup {
        lists: ListRepository,
        members: MembershipRepository,
        admin: MemberAdmin,
    }

    fn setup() -> Setup {
        let conn = init_db(Path::new(":memory:")).expect("Failed to init test DB");
        let lists = ListRepository::new(conn.clone());
        let members = MembershipRepository::new(conn);
        let authz = AuthorizationEngine::new(members.clone());
        Setup {
            admin: MemberAdmin::new(lists.clone(), members.clone(), authz),
            lists,
            members,
        }
    }

    fn owner() -> Identity {
        Identity::new("owner-1", "owner@example.com")
    }

    #[tokio::test]
    async fn owner_changes_member_role() {
        let s = setup();
        let list = s.lists.create(&owner().id, "Groceries").await.unwrap();
        s.members
            .insert(list.id, "user-a", Role::Viewer)
            .await
            .unwrap();

        let updated = s
            .admin
            .change_role(&owner(), list.id, "user-a", Role::Editor)
            .await
            .unwrap();
        assert_eq!(updated.role, Role::Editor);
    }

    #[tokio::test]
    async fn founding_owner_cannot_be_demoted() {
        let s = setup();
        let list = s.lists.create(&owner().id, "Groceries").await.unwrap();

        let err = s
            .admin
            .change_role(&owner(), list.id, "owner-1", Role::Viewer)
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::InvalidInput(_)));

        let membership = s.members.find(list.id, "owner-1").await.unwrap().unwrap();
        assert_eq!(membership.role, Role::Owner);
    }

    #[tokio::test]
    async fn founding_owner_cannot_be_removed() {
        let s = setup();
        let list = s.lists.create(&owner().id, "Groceries").await.unwrap();

        let err = s
            .admin
            .remove(&owner(), list.id, "owner-1")
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::InvalidInput(_)));
        assert!(s.members.find(list.id, "owner-1").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn editor_cannot_manage_members() {
        let s = setup();
        let list = s.lists.create(&owner().id, "Groceries").await.unwrap();
        s.members
            .insert(list.id, "user-a", Role::Editor)
            .await
            .unwrap();
        s.members
            .insert(list.id, "user-b", Role::Viewer)
            .await
            .unwrap();

        let editor = Identity::new("user-a", "a@x.com");
        let err = s
            .admin
            .change_role(&editor, list.id, "user-b", Role::Editor)
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Forbidden(_)));

        let err = s.admin.remove(&editor, list.id, "user-b").await.unwrap_err();
        assert!(matches!(err, DomainError::Forbidden(_)));
    }

    #[tokio::test]
    async fn owner_removes_member() {
        let s = setup();
        let list = s.lists.create(&owner().id, "Groceries").await.unwrap();
        s.members
            .insert(list.id, "user-a", Role::Viewer)
            .await
            .unwrap();

        s.admin.remove(&owner(), list.id, "user-a").await.unwrap();
        assert!(s.members.find(list.id, "user-a").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn a_second_owner_may_manage_but_not_touch_the_founder() {
        let s = setup();
        let list = s.lists.create(&owner().id, "Groceries").await.unwrap();
        s.members
            .insert(list.id, "user-a", Role::Owner)
            .await
            .unwrap();
        s.members
            .insert(list.id, "user-b", Role::Viewer)
            .await
            .unwrap();

        let second_owner = Identity::new("user-a", "a@x.com");
        s.admin
            .change_role(&second_owner, list.id, "user-b", Role::Editor)
            .await
            .unwrap();

        let err = s
            .admin
            .remove(&second_owner, list.id, "owner-1")
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::InvalidInput(_)));
    }
}
