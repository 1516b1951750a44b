//! Access graph store abstraction
//!
//! The persistence boundary of the engine. Implementations must apply every
//! mutation atomically and serve each resolution from one consistent read.
//! Stores do not authorize anything; callers guard first.

use async_trait::async_trait;
use warden_core::{
    AccessResult, Grant, Group, GroupId, Membership, Page, Reference, Resource, ResourceId, Role,
    RoleInputs, User, UserId,
};

/// Store statistics.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StoreStats {
    /// Registered users
    pub users: usize,
    /// Existing groups
    pub groups: usize,
    /// Membership rows
    pub memberships: usize,
    /// Registered resources
    pub resources: usize,
    /// Reference rows
    pub references: usize,
    /// Grant rows
    pub grants: usize,
}

/// Access graph store trait.
#[async_trait]
pub trait AccessGraphStore: Send + Sync {
    // ---------------------------------------------------------------- users

    /// Register a user with the given ceiling.
    async fn register_user(&self, user: &UserId, role_ceiling: Role) -> AccessResult<User>;

    /// Look up a user.
    async fn user(&self, user: &UserId) -> AccessResult<User>;

    /// Set a user's ceiling and return the previous one.
    async fn set_user_ceiling(&self, user: &UserId, role_ceiling: Role) -> AccessResult<Role>;

    // --------------------------------------------------------------- groups

    /// Create a group with `manager` as its first member at `Manager`.
    ///
    /// Fails with `EntityNotFound` when the manager is not registered and
    /// with `EntityAlreadyExists` when the group exists.
    async fn create_group(&self, group: &GroupId, manager: &UserId) -> AccessResult<Group>;

    /// Remove a group together with its memberships and references.
    async fn remove_group(&self, group: &GroupId) -> AccessResult<()>;

    /// Look up a group.
    async fn group(&self, group: &GroupId) -> AccessResult<Group>;

    /// Add a registered user to a group.
    async fn add_member(&self, group: &GroupId, user: &UserId, role: Role)
        -> AccessResult<Membership>;

    /// Remove a user from a group.
    async fn remove_member(&self, group: &GroupId, user: &UserId) -> AccessResult<()>;

    /// Change a member's in-group role and return the previous one.
    async fn change_member_role(
        &self,
        group: &GroupId,
        user: &UserId,
        role: Role,
    ) -> AccessResult<Role>;

    /// Look up a membership; `EntityNotFound` when the user is not a member.
    async fn membership(&self, group: &GroupId, user: &UserId) -> AccessResult<Membership>;

    /// All groups, ordered by id.
    async fn list_groups(&self, page: Page) -> AccessResult<Vec<Group>>;

    /// Members of a group, ordered by user id.
    async fn list_members(&self, group: &GroupId, page: Page) -> AccessResult<Vec<Membership>>;

    /// Members whose in-group role and ceiling both reach `Manager`.
    async fn list_managers(&self, group: &GroupId, page: Page) -> AccessResult<Vec<Membership>>;

    /// Memberships of a user, ordered by group id.
    ///
    /// With `min_role`, only memberships where both the in-group role and the
    /// user's ceiling reach it. Filtering happens before pagination.
    async fn memberships_of(
        &self,
        user: &UserId,
        min_role: Option<Role>,
        page: Page,
    ) -> AccessResult<Vec<Membership>>;

    // ------------------------------------------------------------ resources

    /// Register a resource with grants disallowed.
    async fn register_resource(&self, resource: &ResourceId) -> AccessResult<Resource>;

    /// Register a resource and reference it from `group` in one step.
    async fn register_resource_for_group(
        &self,
        resource: &ResourceId,
        group: &GroupId,
        restriction: Role,
    ) -> AccessResult<Resource>;

    /// Register a resource, allow grants up to `grants_ceiling` and grant
    /// `grant_role` to `user`, in one step.
    async fn register_resource_with_grant(
        &self,
        resource: &ResourceId,
        user: &UserId,
        grant_role: Role,
        grants_ceiling: Role,
    ) -> AccessResult<Resource>;

    /// Remove a resource together with its references and grants.
    async fn remove_resource(&self, resource: &ResourceId) -> AccessResult<()>;

    /// Look up a resource.
    async fn resource(&self, resource: &ResourceId) -> AccessResult<Resource>;

    // ----------------------------------------------------------- references

    /// Reference a resource from a group.
    async fn create_reference(
        &self,
        resource: &ResourceId,
        group: &GroupId,
        restriction: Role,
    ) -> AccessResult<Reference>;

    /// Delete a reference.
    async fn delete_reference(&self, resource: &ResourceId, group: &GroupId) -> AccessResult<()>;

    /// Change a reference restriction and return the previous one.
    async fn set_reference_restriction(
        &self,
        resource: &ResourceId,
        group: &GroupId,
        restriction: Role,
    ) -> AccessResult<Role>;

    /// Look up a reference.
    async fn reference(&self, resource: &ResourceId, group: &GroupId) -> AccessResult<Reference>;

    /// References of a resource, ordered by group id.
    async fn references_of(&self, resource: &ResourceId, page: Page)
        -> AccessResult<Vec<Reference>>;

    // --------------------------------------------------------------- grants

    /// Allow grants up to `ceiling`, or update the ceiling when already
    /// allowed. Existing grants above the ceiling are lowered to it.
    async fn allow_grants(&self, resource: &ResourceId, ceiling: Role) -> AccessResult<()>;

    /// Change the grants ceiling and return the previous one.
    ///
    /// `InvalidState` when grants are disallowed. Existing grants above the
    /// new ceiling are lowered to it.
    async fn set_grants_ceiling(&self, resource: &ResourceId, ceiling: Role) -> AccessResult<Role>;

    /// Grant a role on a resource to a user.
    ///
    /// `InvalidState` when grants are disallowed or `role` exceeds the grants
    /// ceiling.
    async fn add_grant(&self, resource: &ResourceId, user: &UserId, role: Role)
        -> AccessResult<Grant>;

    /// Change an existing grant and return the previous role.
    async fn change_grant(&self, resource: &ResourceId, user: &UserId, role: Role)
        -> AccessResult<Role>;

    /// Revoke one grant.
    async fn revoke_grant(&self, resource: &ResourceId, user: &UserId) -> AccessResult<()>;

    /// Revoke every grant and disallow grants, atomically. Returns the number
    /// of revoked grants.
    async fn revoke_all_and_disallow_grants(&self, resource: &ResourceId) -> AccessResult<usize>;

    /// Look up a user's grant; `None` when the user holds none.
    ///
    /// `InvalidState` when grants are disallowed.
    async fn grant(&self, resource: &ResourceId, user: &UserId) -> AccessResult<Option<Grant>>;

    /// Grants on a resource, ordered by user id. Empty when grants are
    /// disallowed.
    async fn grants_of(&self, resource: &ResourceId, page: Page) -> AccessResult<Vec<Grant>>;

    // ----------------------------------------------------------- resolution

    /// Read the four resolution inputs for a triple from one snapshot.
    ///
    /// `EntityNotFound` when the resource is absent. Unknown users resolve to
    /// a `NoAccess` ceiling.
    async fn resolution_inputs(
        &self,
        resource: &ResourceId,
        user: &UserId,
        group: &GroupId,
    ) -> AccessResult<RoleInputs>;

    /// Read the ceiling and in-group role for a user acting as a group.
    async fn membership_inputs(&self, user: &UserId, group: &GroupId) -> AccessResult<RoleInputs>;

    /// Users whose effective role on the resource reaches `min_role` through
    /// any of their groups or through their grant alone, ordered by id.
    async fn authorized_users(&self, resource: &ResourceId, min_role: Role)
        -> AccessResult<Vec<UserId>>;

    /// Groups whose reference restriction reaches `min_role`, ordered by id.
    async fn authorized_groups(
        &self,
        resource: &ResourceId,
        min_role: Role,
    ) -> AccessResult<Vec<GroupId>>;

    /// Get store statistics.
    async fn stats(&self) -> StoreStats;
}
