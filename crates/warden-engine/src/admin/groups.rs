//! Group and membership administration.

use tracing::{info, instrument};
use warden_core::{
    AccessResult, AuthorizationContext, Group, GroupId, Membership, Page, Role, UserId,
};

use super::AccessAdmin;
use crate::operation::Operation;

impl AccessAdmin {
    /// Create a group; `manager` becomes its first member at `Manager`.
    #[instrument(skip(self))]
    pub async fn create_group(
        &self,
        ctx: &AuthorizationContext,
        group: &GroupId,
        manager: &UserId,
    ) -> AccessResult<Group> {
        self.authorize(ctx, Operation::CreateGroup)?;
        let record = self.store.create_group(group, manager).await?;
        info!(group = %group, manager = %manager, "Group created");
        Ok(record)
    }

    /// Remove a group with its memberships and references. Grants of its
    /// members are kept.
    #[instrument(skip(self))]
    pub async fn remove_group(&self, ctx: &AuthorizationContext, group: &GroupId) -> AccessResult<()> {
        self.authorize(ctx, Operation::RemoveGroup)?;
        self.store.remove_group(group).await?;
        info!(group = %group, "Group removed");
        Ok(())
    }

    /// Add a registered user to a group.
    #[instrument(skip(self))]
    pub async fn add_member(
        &self,
        ctx: &AuthorizationContext,
        group: &GroupId,
        user: &UserId,
        role: Role,
    ) -> AccessResult<Membership> {
        self.authorize(ctx, Operation::AddMember)?;
        let membership = self.store.add_member(group, user, role).await?;
        info!(group = %group, user = %user, role = %role, "Member added");
        Ok(membership)
    }

    /// Remove a user from a group.
    #[instrument(skip(self))]
    pub async fn remove_member(
        &self,
        ctx: &AuthorizationContext,
        group: &GroupId,
        user: &UserId,
    ) -> AccessResult<()> {
        self.authorize(ctx, Operation::RemoveMember)?;
        self.store.remove_member(group, user).await?;
        info!(group = %group, user = %user, "Member removed");
        Ok(())
    }

    /// Change a member's in-group role and return the previous one.
    #[instrument(skip(self))]
    pub async fn change_member_role(
        &self,
        ctx: &AuthorizationContext,
        group: &GroupId,
        user: &UserId,
        role: Role,
    ) -> AccessResult<Role> {
        self.authorize(ctx, Operation::ChangeMemberRole)?;
        let previous = self.store.change_member_role(group, user, role).await?;
        info!(group = %group, user = %user, from = %previous, to = %role, "Member role changed");
        Ok(previous)
    }

    /// Maximum role of a member: the in-group role capped by the ceiling.
    ///
    /// Unlike the resolver, this fails with `EntityNotFound` when the user is
    /// not a member.
    #[instrument(skip(self))]
    pub async fn maximum_role(
        &self,
        ctx: &AuthorizationContext,
        group: &GroupId,
        user: &UserId,
    ) -> AccessResult<Role> {
        self.authorize(ctx, Operation::MaximumRole)?;
        let membership = self.store.membership(group, user).await?;
        let ceiling = self.store.user(user).await?.role_ceiling;
        Ok(membership.role.min(ceiling))
    }

    /// All groups.
    #[instrument(skip(self))]
    pub async fn list_groups(&self, ctx: &AuthorizationContext, page: Page) -> AccessResult<Vec<Group>> {
        self.authorize(ctx, Operation::ListGroups)?;
        self.store.list_groups(page).await
    }

    /// Members of a group.
    #[instrument(skip(self))]
    pub async fn list_members(
        &self,
        ctx: &AuthorizationContext,
        group: &GroupId,
        page: Page,
    ) -> AccessResult<Vec<Membership>> {
        self.authorize(ctx, Operation::ListMembers)?;
        self.store.list_members(group, page).await
    }

    /// Members who effectively manage a group.
    #[instrument(skip(self))]
    pub async fn list_managers(
        &self,
        ctx: &AuthorizationContext,
        group: &GroupId,
        page: Page,
    ) -> AccessResult<Vec<Membership>> {
        self.authorize(ctx, Operation::ListManagers)?;
        self.store.list_managers(group, page).await
    }

    /// Memberships of a user, optionally only those reaching `min_role`.
    #[instrument(skip(self))]
    pub async fn memberships_of(
        &self,
        ctx: &AuthorizationContext,
        user: &UserId,
        min_role: Option<Role>,
        page: Page,
    ) -> AccessResult<Vec<Membership>> {
        self.authorize(ctx, Operation::MembershipsOf)?;
        self.store.memberships_of(user, min_role, page).await
    }
}

#[cfg(test)]
mod tests {
    use crate::config::EngineConfig;
    use crate::AccessAdmin;
    use std::sync::Arc;
    use warden_core::{AccessError, AuthorizationContext, Page, Role};
    use warden_store::{AccessGraphStore, MemoryAccessStore};

    async fn setup() -> (Arc<MemoryAccessStore>, AccessAdmin, AuthorizationContext) {
        let store = Arc::new(MemoryAccessStore::new());
        store
            .register_user(&"root".into(), Role::Administrator)
            .await
            .unwrap();
        store
            .register_user(&"alice".into(), Role::Member)
            .await
            .unwrap();
        let admin = AccessAdmin::new(store.clone(), EngineConfig::default());
        let ctx = AuthorizationContext::new("root", "system", Role::Administrator);
        (store, admin, ctx)
    }

    #[tokio::test]
    async fn test_create_group_requires_administrator() {
        let (store, admin, ctx) = setup().await;
        let manager = ctx.with_role(Role::Manager);

        let err = admin
            .create_group(&manager, &"staff".into(), &"root".into())
            .await
            .unwrap_err();
        assert_eq!(err, AccessError::unauthorized(Role::Administrator, Role::Manager));
        assert_eq!(store.stats().await.groups, 0);

        admin
            .create_group(&ctx, &"staff".into(), &"root".into())
            .await
            .unwrap();
        let managers = admin
            .list_managers(&ctx, &"staff".into(), Page::all())
            .await
            .unwrap();
        assert_eq!(managers.len(), 1);
        assert_eq!(managers[0].role, Role::Manager);
    }

    #[tokio::test]
    async fn test_maximum_role_capped_by_ceiling() {
        let (_, admin, ctx) = setup().await;
        admin
            .create_group(&ctx, &"staff".into(), &"root".into())
            .await
            .unwrap();
        admin
            .add_member(&ctx, &"staff".into(), &"alice".into(), Role::Administrator)
            .await
            .unwrap();

        let role = admin
            .maximum_role(&ctx, &"staff".into(), &"alice".into())
            .await
            .unwrap();
        assert_eq!(role, Role::Member);

        admin
            .remove_member(&ctx, &"staff".into(), &"alice".into())
            .await
            .unwrap();
        let err = admin
            .maximum_role(&ctx, &"staff".into(), &"alice".into())
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_change_member_role() {
        let (_, admin, ctx) = setup().await;
        admin
            .create_group(&ctx, &"staff".into(), &"root".into())
            .await
            .unwrap();
        admin
            .add_member(&ctx, &"staff".into(), &"alice".into(), Role::Guest)
            .await
            .unwrap();

        let previous = admin
            .change_member_role(&ctx, &"staff".into(), &"alice".into(), Role::Member)
            .await
            .unwrap();
        assert_eq!(previous, Role::Guest);

        let members = admin
            .list_members(&ctx, &"staff".into(), Page::all())
            .await
            .unwrap();
        let alice = members
            .iter()
            .find(|m| m.user_id.as_str() == "alice")
            .unwrap();
        assert_eq!(alice.role, Role::Member);
    }

    #[tokio::test]
    async fn test_memberships_filtered_before_paging() {
        let (_, admin, ctx) = setup().await;
        for (group, role) in [("a", Role::Guest), ("b", Role::Member), ("c", Role::Member)] {
            admin
                .create_group(&ctx, &group.into(), &"root".into())
                .await
                .unwrap();
            admin
                .add_member(&ctx, &group.into(), &"alice".into(), role)
                .await
                .unwrap();
        }

        let page = admin
            .memberships_of(&ctx, &"alice".into(), Some(Role::Member), Page::new(0, 1))
            .await
            .unwrap();
        assert_eq!(page.len(), 1);
        assert_eq!(page[0].group_id.as_str(), "b");

        let all = admin
            .memberships_of(&ctx, &"alice".into(), None, Page::new(-1, 0))
            .await
            .unwrap();
        assert_eq!(all.len(), 3);
    }

    #[tokio::test]
    async fn test_list_groups_needs_member() {
        let (_, admin, ctx) = setup().await;
        let guest = ctx.with_role(Role::Guest);
        assert!(admin
            .list_groups(&guest, Page::all())
            .await
            .unwrap_err()
            .is_unauthorized());
        assert!(admin
            .list_groups(&ctx.with_role(Role::Member), Page::all())
            .await
            .unwrap()
            .is_empty());
    }
}
