//! Store-backed role resolution.

use std::sync::Arc;
use tracing::debug;
use warden_core::{AccessResult, AuthorizationContext, GroupId, ResourceId, Role, UserId};
use warden_store::AccessGraphStore;

/// Resolves roles against the access graph.
///
/// Each resolution reads its inputs from one store snapshot and then applies
/// the pure algebra, so concurrent resolutions need no locking of their own.
#[derive(Clone)]
pub struct RoleResolver {
    store: Arc<dyn AccessGraphStore>,
}

impl std::fmt::Debug for RoleResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RoleResolver").finish_non_exhaustive()
    }
}

impl RoleResolver {
    /// Create a resolver over a store.
    pub fn new(store: Arc<dyn AccessGraphStore>) -> Self {
        Self { store }
    }

    /// Effective role of a user acting for a group on a resource.
    ///
    /// Fails with `EntityNotFound` when the resource is not registered.
    pub async fn effective_role(
        &self,
        resource: &ResourceId,
        user: &UserId,
        group: &GroupId,
    ) -> AccessResult<Role> {
        let inputs = self.store.resolution_inputs(resource, user, group).await?;
        let role = inputs.effective_role();
        debug!(resource = %resource, user = %user, group = %group, role = %role, "Resolved effective role");
        Ok(role)
    }

    /// Most privileged role a user can reach while acting for a group.
    ///
    /// `NoAccess` when the user is not a member or not registered.
    pub async fn maximum_role(&self, user: &UserId, group: &GroupId) -> AccessResult<Role> {
        let inputs = self.store.membership_inputs(user, group).await?;
        Ok(inputs.maximum_role())
    }

    /// Build the context a session layer hands to guarded calls.
    pub async fn context_for(
        &self,
        user: &UserId,
        group: &GroupId,
    ) -> AccessResult<AuthorizationContext> {
        let role = self.maximum_role(user, group).await?;
        Ok(AuthorizationContext::new(user.clone(), group.clone(), role))
    }
}
