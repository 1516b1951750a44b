//! Resource, reference and grant administration.
//!
//! Registration is authorized by the caller's precomputed role. Everything
//! that targets an existing resource is authorized by the caller's effective
//! role on that resource, so a missing resource reports `EntityNotFound`
//! before any role comparison.

use tracing::{info, instrument};
use warden_core::{
    AccessError, AccessResult, AuthorizationContext, Grant, GroupId, Page, Reference, ReferenceId,
    Resource, ResourceId, Role, UserId,
};

use super::AccessAdmin;
use crate::operation::Operation;

impl AccessAdmin {
    // -------------------------------------------------------- registration

    /// Register a resource with no references and grants disallowed.
    #[instrument(skip(self))]
    pub async fn register_resource(
        &self,
        ctx: &AuthorizationContext,
        resource: &ResourceId,
    ) -> AccessResult<Resource> {
        self.authorize(ctx, Operation::RegisterResource)?;
        let record = self.store.register_resource(resource).await?;
        info!(resource = %resource, "Resource registered");
        Ok(record)
    }

    /// Register a resource owned by a group, referenced at `restriction`.
    #[instrument(skip(self))]
    pub async fn register_resource_for_group(
        &self,
        ctx: &AuthorizationContext,
        resource: &ResourceId,
        group: &GroupId,
        restriction: Role,
    ) -> AccessResult<Resource> {
        self.authorize(ctx, Operation::RegisterResourceForGroup)?;
        let record = self
            .store
            .register_resource_for_group(resource, group, restriction)
            .await?;
        info!(resource = %resource, group = %group, restriction = %restriction, "Resource registered for group");
        Ok(record)
    }

    /// Register a resource owned by a single user through a grant.
    #[instrument(skip(self))]
    pub async fn register_resource_with_grant(
        &self,
        ctx: &AuthorizationContext,
        resource: &ResourceId,
        user: &UserId,
        grant_role: Role,
        grants_ceiling: Role,
    ) -> AccessResult<Resource> {
        self.authorize(ctx, Operation::RegisterResourceWithGrant)?;
        let record = self
            .store
            .register_resource_with_grant(resource, user, grant_role, grants_ceiling)
            .await?;
        info!(resource = %resource, user = %user, role = %grant_role, "Resource registered with grant");
        Ok(record)
    }

    /// Remove a resource with all its references and grants.
    #[instrument(skip(self))]
    pub async fn remove_resource(
        &self,
        ctx: &AuthorizationContext,
        resource: &ResourceId,
    ) -> AccessResult<()> {
        self.authorize_on(ctx, Operation::RemoveResource, resource)
            .await?;
        self.store.remove_resource(resource).await?;
        info!(resource = %resource, "Resource removed");
        Ok(())
    }

    // ---------------------------------------------------------- references

    /// Reference a resource from a group.
    #[instrument(skip(self))]
    pub async fn create_reference(
        &self,
        ctx: &AuthorizationContext,
        reference: &ReferenceId,
        restriction: Role,
    ) -> AccessResult<Reference> {
        self.authorize_on(ctx, Operation::CreateReference, &reference.resource_id)
            .await?;
        let record = self
            .store
            .create_reference(&reference.resource_id, &reference.group_id, restriction)
            .await?;
        info!(reference = %reference, restriction = %restriction, "Reference created");
        Ok(record)
    }

    /// Delete a reference.
    #[instrument(skip(self))]
    pub async fn delete_reference(
        &self,
        ctx: &AuthorizationContext,
        reference: &ReferenceId,
    ) -> AccessResult<()> {
        self.authorize_on(ctx, Operation::DeleteReference, &reference.resource_id)
            .await?;
        self.store
            .delete_reference(&reference.resource_id, &reference.group_id)
            .await?;
        info!(reference = %reference, "Reference deleted");
        Ok(())
    }

    /// Change a reference restriction and return the previous one.
    #[instrument(skip(self))]
    pub async fn change_reference_restriction(
        &self,
        ctx: &AuthorizationContext,
        reference: &ReferenceId,
        restriction: Role,
    ) -> AccessResult<Role> {
        self.authorize_on(ctx, Operation::ChangeReferenceRestriction, &reference.resource_id)
            .await?;
        let previous = self
            .store
            .set_reference_restriction(&reference.resource_id, &reference.group_id, restriction)
            .await?;
        info!(reference = %reference, from = %previous, to = %restriction, "Reference restriction changed");
        Ok(previous)
    }

    /// The restriction of a reference.
    #[instrument(skip(self))]
    pub async fn reference_restriction(
        &self,
        ctx: &AuthorizationContext,
        reference: &ReferenceId,
    ) -> AccessResult<Role> {
        self.authorize_on(ctx, Operation::ReferenceRestriction, &reference.resource_id)
            .await?;
        let record = self
            .store
            .reference(&reference.resource_id, &reference.group_id)
            .await?;
        Ok(record.restriction)
    }

    /// References of a resource.
    #[instrument(skip(self))]
    pub async fn references_of(
        &self,
        ctx: &AuthorizationContext,
        resource: &ResourceId,
        page: Page,
    ) -> AccessResult<Vec<Reference>> {
        self.authorize_on(ctx, Operation::ReferencesOf, resource)
            .await?;
        self.store.references_of(resource, page).await
    }

    // -------------------------------------------------------------- grants

    /// Allow grants up to `ceiling`, or update the ceiling when already
    /// allowed.
    #[instrument(skip(self))]
    pub async fn allow_grants(
        &self,
        ctx: &AuthorizationContext,
        resource: &ResourceId,
        ceiling: Role,
    ) -> AccessResult<()> {
        self.authorize_on(ctx, Operation::AllowGrants, resource)
            .await?;
        self.store.allow_grants(resource, ceiling).await?;
        info!(resource = %resource, ceiling = %ceiling, "Grants allowed");
        Ok(())
    }

    /// Check if a resource currently allows grants.
    #[instrument(skip(self))]
    pub async fn grants_allowed(
        &self,
        ctx: &AuthorizationContext,
        resource: &ResourceId,
    ) -> AccessResult<bool> {
        self.authorize_on(ctx, Operation::GrantsAllowed, resource)
            .await?;
        Ok(self.store.resource(resource).await?.grants_allowed)
    }

    /// The grants ceiling of a resource; `InvalidState` when grants are
    /// disallowed.
    #[instrument(skip(self))]
    pub async fn grants_ceiling(
        &self,
        ctx: &AuthorizationContext,
        resource: &ResourceId,
    ) -> AccessResult<Role> {
        self.authorize_on(ctx, Operation::GrantsCeiling, resource)
            .await?;
        let record = self.store.resource(resource).await?;
        if !record.grants_allowed {
            return Err(AccessError::invalid_state(format!(
                "grants are not allowed for resource {resource}"
            )));
        }
        Ok(record.grants_ceiling)
    }

    /// Change the grants ceiling and return the previous one. Grants above
    /// the new ceiling are lowered to it.
    #[instrument(skip(self))]
    pub async fn change_grants_ceiling(
        &self,
        ctx: &AuthorizationContext,
        resource: &ResourceId,
        ceiling: Role,
    ) -> AccessResult<Role> {
        self.authorize_on(ctx, Operation::ChangeGrantsCeiling, resource)
            .await?;
        let previous = self.store.set_grants_ceiling(resource, ceiling).await?;
        info!(resource = %resource, from = %previous, to = %ceiling, "Grants ceiling changed");
        Ok(previous)
    }

    /// Grant a role on a resource to a user.
    #[instrument(skip(self))]
    pub async fn add_grant(
        &self,
        ctx: &AuthorizationContext,
        resource: &ResourceId,
        user: &UserId,
        role: Role,
    ) -> AccessResult<Grant> {
        self.authorize_on(ctx, Operation::AddGrant, resource)
            .await?;
        let grant = self.store.add_grant(resource, user, role).await?;
        info!(resource = %resource, user = %user, role = %role, "Grant added");
        Ok(grant)
    }

    /// Change a grant and return the previous role.
    #[instrument(skip(self))]
    pub async fn change_grant(
        &self,
        ctx: &AuthorizationContext,
        resource: &ResourceId,
        user: &UserId,
        role: Role,
    ) -> AccessResult<Role> {
        self.authorize_on(ctx, Operation::ChangeGrant, resource)
            .await?;
        let previous = self.store.change_grant(resource, user, role).await?;
        info!(resource = %resource, user = %user, from = %previous, to = %role, "Grant changed");
        Ok(previous)
    }

    /// Revoke a user's grant.
    #[instrument(skip(self))]
    pub async fn revoke_grant(
        &self,
        ctx: &AuthorizationContext,
        resource: &ResourceId,
        user: &UserId,
    ) -> AccessResult<()> {
        self.authorize_on(ctx, Operation::RevokeGrant, resource)
            .await?;
        self.store.revoke_grant(resource, user).await?;
        info!(resource = %resource, user = %user, "Grant revoked");
        Ok(())
    }

    /// Revoke every grant on a resource and disallow new ones.
    #[instrument(skip(self))]
    pub async fn revoke_all_and_disallow_grants(
        &self,
        ctx: &AuthorizationContext,
        resource: &ResourceId,
    ) -> AccessResult<usize> {
        self.authorize_on(ctx, Operation::RevokeAllAndDisallowGrants, resource)
            .await?;
        let revoked = self.store.revoke_all_and_disallow_grants(resource).await?;
        info!(resource = %resource, revoked, "Grants revoked and disallowed");
        Ok(revoked)
    }

    /// Role granted to a user on a resource, `NoAccess` without a grant.
    #[instrument(skip(self))]
    pub async fn grant_role(
        &self,
        ctx: &AuthorizationContext,
        resource: &ResourceId,
        user: &UserId,
    ) -> AccessResult<Role> {
        self.authorize_on(ctx, Operation::GrantRole, resource)
            .await?;
        let grant = self.store.grant(resource, user).await?;
        Ok(grant.map(|g| g.role).unwrap_or_default())
    }

    /// Grants on a resource.
    #[instrument(skip(self))]
    pub async fn grants_of(
        &self,
        ctx: &AuthorizationContext,
        resource: &ResourceId,
        page: Page,
    ) -> AccessResult<Vec<Grant>> {
        self.authorize_on(ctx, Operation::GrantsOf, resource)
            .await?;
        self.store.grants_of(resource, page).await
    }

    /// Users reaching `min_role` on a resource.
    #[instrument(skip(self))]
    pub async fn authorized_users(
        &self,
        ctx: &AuthorizationContext,
        resource: &ResourceId,
        min_role: Role,
    ) -> AccessResult<Vec<UserId>> {
        self.authorize_on(ctx, Operation::AuthorizedUsers, resource)
            .await?;
        self.store.authorized_users(resource, min_role).await
    }

    /// Groups whose reference reaches `min_role` on a resource.
    #[instrument(skip(self))]
    pub async fn authorized_groups(
        &self,
        ctx: &AuthorizationContext,
        resource: &ResourceId,
        min_role: Role,
    ) -> AccessResult<Vec<GroupId>> {
        self.authorize_on(ctx, Operation::AuthorizedGroups, resource)
            .await?;
        self.store.authorized_groups(resource, min_role).await
    }
}
