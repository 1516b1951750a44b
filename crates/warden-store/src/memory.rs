//! In-memory access graph store
//!
//! The whole graph sits behind one `RwLock`: every mutation runs under a
//! single write guard and every resolution under a single read guard, which
//! gives all-or-nothing mutations and consistent snapshots. Collections are
//! ordered maps so paged queries are deterministic.

use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;
use warden_core::{
    AccessError, AccessResult, Grant, Group, GroupId, Membership, Page, Reference, ReferenceId,
    Resource, ResourceId, Role, RoleInputs, User, UserId,
};

use crate::store::{AccessGraphStore, StoreStats};

#[derive(Debug, Default)]
struct Graph {
    users: BTreeMap<UserId, User>,
    groups: BTreeMap<GroupId, Group>,
    memberships: BTreeMap<(GroupId, UserId), Membership>,
    resources: BTreeMap<ResourceId, Resource>,
    references: BTreeMap<(ResourceId, GroupId), Reference>,
    grants: BTreeMap<(ResourceId, UserId), Grant>,
}

impl Graph {
    fn require_user(&self, user: &UserId) -> AccessResult<&User> {
        self.users
            .get(user)
            .ok_or_else(|| AccessError::not_found(format!("user {user}")))
    }

    fn require_group(&self, group: &GroupId) -> AccessResult<&Group> {
        self.groups
            .get(group)
            .ok_or_else(|| AccessError::not_found(format!("group {group}")))
    }

    fn require_resource(&self, resource: &ResourceId) -> AccessResult<&Resource> {
        self.resources
            .get(resource)
            .ok_or_else(|| AccessError::not_found(format!("resource {resource}")))
    }

    fn require_new_resource(&self, resource: &ResourceId) -> AccessResult<()> {
        if self.resources.contains_key(resource) {
            return Err(AccessError::already_exists(format!("resource {resource}")));
        }
        Ok(())
    }

    /// The resource, provided it currently allows grants.
    fn require_grantable(&self, resource: &ResourceId) -> AccessResult<&Resource> {
        let found = self.require_resource(resource)?;
        if !found.grants_allowed {
            return Err(AccessError::invalid_state(format!(
                "grants are not allowed for resource {resource}"
            )));
        }
        Ok(found)
    }

    fn ceiling_of(&self, user: &UserId) -> Role {
        self.users
            .get(user)
            .map(|u| u.role_ceiling)
            .unwrap_or_default()
    }

    fn members_of<'a>(&'a self, group: &'a GroupId) -> impl Iterator<Item = &'a Membership> + 'a {
        self.memberships
            .range((group.clone(), UserId::new(""))..)
            .take_while(move |((g, _), _)| g == group)
            .map(|(_, membership)| membership)
    }

    fn references_for<'a>(
        &'a self,
        resource: &'a ResourceId,
    ) -> impl Iterator<Item = &'a Reference> + 'a {
        self.references
            .range((resource.clone(), GroupId::new(""))..)
            .take_while(move |((r, _), _)| r == resource)
            .map(|(_, reference)| reference)
    }

    fn grants_for<'a>(&'a self, resource: &'a ResourceId) -> impl Iterator<Item = &'a Grant> + 'a {
        self.grants
            .range((resource.clone(), UserId::new(""))..)
            .take_while(move |((r, _), _)| r == resource)
            .map(|(_, grant)| grant)
    }

    fn membership_inputs(&self, user: &UserId, group: &GroupId) -> RoleInputs {
        RoleInputs {
            role_ceiling: self.ceiling_of(user),
            group_role: self
                .memberships
                .get(&(group.clone(), user.clone()))
                .map(|m| m.role),
            ..RoleInputs::default()
        }
    }

    fn resolution_inputs(
        &self,
        resource: &ResourceId,
        user: &UserId,
        group: &GroupId,
    ) -> AccessResult<RoleInputs> {
        self.require_resource(resource)?;

        let mut inputs = self.membership_inputs(user, group);
        inputs.reference_restriction = self
            .references
            .get(&(resource.clone(), group.clone()))
            .map(|r| r.restriction);
        inputs.grant_role = self
            .grants
            .get(&(resource.clone(), user.clone()))
            .map(|g| g.role);
        Ok(inputs)
    }

    fn check_new_reference(&self, resource: &ResourceId, group: &GroupId) -> AccessResult<()> {
        self.require_group(group)?;
        if self
            .references
            .contains_key(&(resource.clone(), group.clone()))
        {
            return Err(AccessError::already_exists(format!(
                "reference {}",
                ReferenceId::new(resource.clone(), group.clone())
            )));
        }
        Ok(())
    }

    fn check_grant_role(resource: &ResourceId, role: Role, ceiling: Role) -> AccessResult<()> {
        if role > ceiling {
            return Err(AccessError::invalid_state(format!(
                "grant role {role} exceeds grants ceiling {ceiling} of resource {resource}"
            )));
        }
        Ok(())
    }

    /// Lower grants above `ceiling` to it. Returns how many were lowered.
    fn cap_grants(&mut self, resource: &ResourceId, ceiling: Role) -> usize {
        let mut lowered = 0;
        for ((r, _), grant) in self.grants.iter_mut() {
            if r == resource && grant.role > ceiling {
                grant.role = ceiling;
                lowered += 1;
            }
        }
        lowered
    }

    fn reference_mut(
        &mut self,
        resource: &ResourceId,
        group: &GroupId,
    ) -> AccessResult<&mut Reference> {
        self.require_resource(resource)?;
        self.references
            .get_mut(&(resource.clone(), group.clone()))
            .ok_or_else(|| {
                AccessError::not_found(format!(
                    "reference {}",
                    ReferenceId::new(resource.clone(), group.clone())
                ))
            })
    }

    fn grant_mut(&mut self, resource: &ResourceId, user: &UserId) -> AccessResult<&mut Grant> {
        self.grants
            .get_mut(&(resource.clone(), user.clone()))
            .ok_or_else(|| {
                AccessError::not_found(format!("grant for user {user} on resource {resource}"))
            })
    }

    fn membership_mut(&mut self, group: &GroupId, user: &UserId) -> AccessResult<&mut Membership> {
        self.require_group(group)?;
        self.memberships
            .get_mut(&(group.clone(), user.clone()))
            .ok_or_else(|| {
                AccessError::not_found(format!("membership of user {user} in group {group}"))
            })
    }
}

/// In-memory access graph store.
///
/// Suitable for single-process embedding and testing. Clones share the same
/// graph.
#[derive(Clone, Default)]
pub struct MemoryAccessStore {
    graph: Arc<RwLock<Graph>>,
}

impl std::fmt::Debug for MemoryAccessStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryAccessStore").finish_non_exhaustive()
    }
}

impl MemoryAccessStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AccessGraphStore for MemoryAccessStore {
    async fn register_user(&self, user: &UserId, role_ceiling: Role) -> AccessResult<User> {
        let mut graph = self.graph.write().await;
        if graph.users.contains_key(user) {
            return Err(AccessError::already_exists(format!("user {user}")));
        }

        let record = User::new(user.clone(), role_ceiling);
        graph.users.insert(user.clone(), record.clone());
        debug!(user = %user, ceiling = %role_ceiling, "Registered user");
        Ok(record)
    }

    async fn user(&self, user: &UserId) -> AccessResult<User> {
        let graph = self.graph.read().await;
        graph.require_user(user).cloned()
    }

    async fn set_user_ceiling(&self, user: &UserId, role_ceiling: Role) -> AccessResult<Role> {
        let mut graph = self.graph.write().await;
        let record = graph
            .users
            .get_mut(user)
            .ok_or_else(|| AccessError::not_found(format!("user {user}")))?;

        let previous = std::mem::replace(&mut record.role_ceiling, role_ceiling);
        debug!(user = %user, from = %previous, to = %role_ceiling, "Changed user ceiling");
        Ok(previous)
    }

    async fn create_group(&self, group: &GroupId, manager: &UserId) -> AccessResult<Group> {
        let mut graph = self.graph.write().await;
        graph.require_user(manager)?;
        if graph.groups.contains_key(group) {
            return Err(AccessError::already_exists(format!("group {group}")));
        }

        let record = Group::new(group.clone());
        graph.groups.insert(group.clone(), record.clone());
        graph.memberships.insert(
            (group.clone(), manager.clone()),
            Membership::new(group.clone(), manager.clone(), Role::Manager),
        );
        debug!(group = %group, manager = %manager, "Created group");
        Ok(record)
    }

    async fn remove_group(&self, group: &GroupId) -> AccessResult<()> {
        let mut graph = self.graph.write().await;
        graph.require_group(group)?;

        graph.groups.remove(group);
        graph.memberships.retain(|(g, _), _| g != group);
        graph.references.retain(|(_, g), _| g != group);
        debug!(group = %group, "Removed group with memberships and references");
        Ok(())
    }

    async fn group(&self, group: &GroupId) -> AccessResult<Group> {
        let graph = self.graph.read().await;
        graph.require_group(group).cloned()
    }

    async fn add_member(
        &self,
        group: &GroupId,
        user: &UserId,
        role: Role,
    ) -> AccessResult<Membership> {
        let mut graph = self.graph.write().await;
        graph.require_group(group)?;
        graph.require_user(user)?;

        let key = (group.clone(), user.clone());
        if graph.memberships.contains_key(&key) {
            return Err(AccessError::already_exists(format!(
                "membership of user {user} in group {group}"
            )));
        }

        let membership = Membership::new(group.clone(), user.clone(), role);
        graph.memberships.insert(key, membership.clone());
        debug!(group = %group, user = %user, role = %role, "Added member");
        Ok(membership)
    }

    async fn remove_member(&self, group: &GroupId, user: &UserId) -> AccessResult<()> {
        let mut graph = self.graph.write().await;
        graph.membership_mut(group, user)?;
        graph.memberships.remove(&(group.clone(), user.clone()));
        debug!(group = %group, user = %user, "Removed member");
        Ok(())
    }

    async fn change_member_role(
        &self,
        group: &GroupId,
        user: &UserId,
        role: Role,
    ) -> AccessResult<Role> {
        let mut graph = self.graph.write().await;
        let membership = graph.membership_mut(group, user)?;
        let previous = std::mem::replace(&mut membership.role, role);
        debug!(group = %group, user = %user, from = %previous, to = %role, "Changed member role");
        Ok(previous)
    }

    async fn membership(&self, group: &GroupId, user: &UserId) -> AccessResult<Membership> {
        let graph = self.graph.read().await;
        graph.require_group(group)?;
        graph
            .memberships
            .get(&(group.clone(), user.clone()))
            .cloned()
            .ok_or_else(|| {
                AccessError::not_found(format!("membership of user {user} in group {group}"))
            })
    }

    async fn list_groups(&self, page: Page) -> AccessResult<Vec<Group>> {
        let graph = self.graph.read().await;
        Ok(page.apply(graph.groups.values().cloned()))
    }

    async fn list_members(&self, group: &GroupId, page: Page) -> AccessResult<Vec<Membership>> {
        let graph = self.graph.read().await;
        graph.require_group(group)?;
        Ok(page.apply(graph.members_of(group).cloned()))
    }

    async fn list_managers(&self, group: &GroupId, page: Page) -> AccessResult<Vec<Membership>> {
        let graph = self.graph.read().await;
        graph.require_group(group)?;

        let managers = graph.members_of(group).filter(|m| {
            m.role.at_least(Role::Manager) && graph.ceiling_of(&m.user_id).at_least(Role::Manager)
        });
        Ok(page.apply(managers.cloned()))
    }

    async fn memberships_of(
        &self,
        user: &UserId,
        min_role: Option<Role>,
        page: Page,
    ) -> AccessResult<Vec<Membership>> {
        let graph = self.graph.read().await;
        let ceiling = graph.require_user(user)?.role_ceiling;

        let memberships = graph
            .memberships
            .values()
            .filter(|m| &m.user_id == user)
            .filter(|m| match min_role {
                Some(min) => m.role.at_least(min) && ceiling.at_least(min),
                None => true,
            });
        Ok(page.apply(memberships.cloned()))
    }

    async fn register_resource(&self, resource: &ResourceId) -> AccessResult<Resource> {
        let mut graph = self.graph.write().await;
        graph.require_new_resource(resource)?;

        let record = Resource::new(resource.clone());
        graph.resources.insert(resource.clone(), record.clone());
        debug!(resource = %resource, "Registered resource");
        Ok(record)
    }

    async fn register_resource_for_group(
        &self,
        resource: &ResourceId,
        group: &GroupId,
        restriction: Role,
    ) -> AccessResult<Resource> {
        let mut graph = self.graph.write().await;
        graph.require_new_resource(resource)?;
        graph.check_new_reference(resource, group)?;

        let record = Resource::new(resource.clone());
        graph.resources.insert(resource.clone(), record.clone());
        graph.references.insert(
            (resource.clone(), group.clone()),
            Reference::new(resource.clone(), group.clone(), restriction),
        );
        debug!(resource = %resource, group = %group, restriction = %restriction, "Registered resource for group");
        Ok(record)
    }

    async fn register_resource_with_grant(
        &self,
        resource: &ResourceId,
        user: &UserId,
        grant_role: Role,
        grants_ceiling: Role,
    ) -> AccessResult<Resource> {
        let mut graph = self.graph.write().await;
        graph.require_new_resource(resource)?;
        graph.require_user(user)?;
        Graph::check_grant_role(resource, grant_role, grants_ceiling)?;

        let record = Resource::new(resource.clone()).with_grants(grants_ceiling);
        graph.resources.insert(resource.clone(), record.clone());
        graph.grants.insert(
            (resource.clone(), user.clone()),
            Grant::new(resource.clone(), user.clone(), grant_role),
        );
        debug!(resource = %resource, user = %user, role = %grant_role, "Registered resource with grant");
        Ok(record)
    }

    async fn remove_resource(&self, resource: &ResourceId) -> AccessResult<()> {
        let mut graph = self.graph.write().await;
        graph.require_resource(resource)?;

        graph.resources.remove(resource);
        graph.references.retain(|(r, _), _| r != resource);
        graph.grants.retain(|(r, _), _| r != resource);
        debug!(resource = %resource, "Removed resource with references and grants");
        Ok(())
    }

    async fn resource(&self, resource: &ResourceId) -> AccessResult<Resource> {
        let graph = self.graph.read().await;
        graph.require_resource(resource).cloned()
    }

    async fn create_reference(
        &self,
        resource: &ResourceId,
        group: &GroupId,
        restriction: Role,
    ) -> AccessResult<Reference> {
        let mut graph = self.graph.write().await;
        graph.require_resource(resource)?;
        graph.check_new_reference(resource, group)?;

        let reference = Reference::new(resource.clone(), group.clone(), restriction);
        graph
            .references
            .insert((resource.clone(), group.clone()), reference.clone());
        debug!(resource = %resource, group = %group, restriction = %restriction, "Created reference");
        Ok(reference)
    }

    async fn delete_reference(&self, resource: &ResourceId, group: &GroupId) -> AccessResult<()> {
        let mut graph = self.graph.write().await;
        graph.reference_mut(resource, group)?;
        graph.references.remove(&(resource.clone(), group.clone()));
        debug!(resource = %resource, group = %group, "Deleted reference");
        Ok(())
    }

    async fn set_reference_restriction(
        &self,
        resource: &ResourceId,
        group: &GroupId,
        restriction: Role,
    ) -> AccessResult<Role> {
        let mut graph = self.graph.write().await;
        let reference = graph.reference_mut(resource, group)?;
        let previous = std::mem::replace(&mut reference.restriction, restriction);
        debug!(resource = %resource, group = %group, from = %previous, to = %restriction, "Changed reference restriction");
        Ok(previous)
    }

    async fn reference(&self, resource: &ResourceId, group: &GroupId) -> AccessResult<Reference> {
        let graph = self.graph.read().await;
        graph.require_resource(resource)?;
        graph
            .references
            .get(&(resource.clone(), group.clone()))
            .cloned()
            .ok_or_else(|| {
                AccessError::not_found(format!(
                    "reference {}",
                    ReferenceId::new(resource.clone(), group.clone())
                ))
            })
    }

    async fn references_of(
        &self,
        resource: &ResourceId,
        page: Page,
    ) -> AccessResult<Vec<Reference>> {
        let graph = self.graph.read().await;
        graph.require_resource(resource)?;
        Ok(page.apply(graph.references_for(resource).cloned()))
    }

    async fn allow_grants(&self, resource: &ResourceId, ceiling: Role) -> AccessResult<()> {
        let mut graph = self.graph.write().await;
        let record = graph
            .resources
            .get_mut(resource)
            .ok_or_else(|| AccessError::not_found(format!("resource {resource}")))?;

        record.grants_allowed = true;
        record.grants_ceiling = ceiling;
        let lowered = graph.cap_grants(resource, ceiling);
        debug!(resource = %resource, ceiling = %ceiling, lowered, "Allowed grants");
        Ok(())
    }

    async fn set_grants_ceiling(&self, resource: &ResourceId, ceiling: Role) -> AccessResult<Role> {
        let mut graph = self.graph.write().await;
        graph.require_grantable(resource)?;

        let previous = match graph.resources.get_mut(resource) {
            Some(record) => std::mem::replace(&mut record.grants_ceiling, ceiling),
            None => return Err(AccessError::not_found(format!("resource {resource}"))),
        };
        let lowered = graph.cap_grants(resource, ceiling);
        debug!(resource = %resource, from = %previous, to = %ceiling, lowered, "Changed grants ceiling");
        Ok(previous)
    }

    async fn add_grant(
        &self,
        resource: &ResourceId,
        user: &UserId,
        role: Role,
    ) -> AccessResult<Grant> {
        let mut graph = self.graph.write().await;
        let ceiling = graph.require_grantable(resource)?.grants_ceiling;
        graph.require_user(user)?;
        Graph::check_grant_role(resource, role, ceiling)?;

        let key = (resource.clone(), user.clone());
        if graph.grants.contains_key(&key) {
            return Err(AccessError::already_exists(format!(
                "grant for user {user} on resource {resource}"
            )));
        }

        let grant = Grant::new(resource.clone(), user.clone(), role);
        graph.grants.insert(key, grant.clone());
        debug!(resource = %resource, user = %user, role = %role, "Added grant");
        Ok(grant)
    }

    async fn change_grant(
        &self,
        resource: &ResourceId,
        user: &UserId,
        role: Role,
    ) -> AccessResult<Role> {
        let mut graph = self.graph.write().await;
        let ceiling = graph.require_grantable(resource)?.grants_ceiling;
        Graph::check_grant_role(resource, role, ceiling)?;

        let grant = graph.grant_mut(resource, user)?;
        let previous = std::mem::replace(&mut grant.role, role);
        debug!(resource = %resource, user = %user, from = %previous, to = %role, "Changed grant");
        Ok(previous)
    }

    async fn revoke_grant(&self, resource: &ResourceId, user: &UserId) -> AccessResult<()> {
        let mut graph = self.graph.write().await;
        graph.require_grantable(resource)?;
        graph.grant_mut(resource, user)?;
        graph.grants.remove(&(resource.clone(), user.clone()));
        debug!(resource = %resource, user = %user, "Revoked grant");
        Ok(())
    }

    async fn revoke_all_and_disallow_grants(&self, resource: &ResourceId) -> AccessResult<usize> {
        let mut graph = self.graph.write().await;
        graph.require_resource(resource)?;

        let before = graph.grants.len();
        graph.grants.retain(|(r, _), _| r != resource);
        let revoked = before - graph.grants.len();

        if let Some(record) = graph.resources.get_mut(resource) {
            record.grants_allowed = false;
            record.grants_ceiling = Role::NoAccess;
        }
        debug!(resource = %resource, revoked, "Revoked all grants and disallowed grants");
        Ok(revoked)
    }

    async fn grant(&self, resource: &ResourceId, user: &UserId) -> AccessResult<Option<Grant>> {
        let graph = self.graph.read().await;
        graph.require_grantable(resource)?;
        Ok(graph.grants.get(&(resource.clone(), user.clone())).cloned())
    }

    async fn grants_of(&self, resource: &ResourceId, page: Page) -> AccessResult<Vec<Grant>> {
        let graph = self.graph.read().await;
        if !graph.require_resource(resource)?.grants_allowed {
            return Ok(Vec::new());
        }
        Ok(page.apply(graph.grants_for(resource).cloned()))
    }

    async fn resolution_inputs(
        &self,
        resource: &ResourceId,
        user: &UserId,
        group: &GroupId,
    ) -> AccessResult<RoleInputs> {
        let graph = self.graph.read().await;
        graph.resolution_inputs(resource, user, group)
    }

    async fn membership_inputs(&self, user: &UserId, group: &GroupId) -> AccessResult<RoleInputs> {
        let graph = self.graph.read().await;
        Ok(graph.membership_inputs(user, group))
    }

    async fn authorized_users(
        &self,
        resource: &ResourceId,
        min_role: Role,
    ) -> AccessResult<Vec<UserId>> {
        let graph = self.graph.read().await;
        graph.require_resource(resource)?;

        let mut best: BTreeMap<UserId, Role> = BTreeMap::new();
        for grant in graph.grants_for(resource) {
            let role = RoleInputs::new(graph.ceiling_of(&grant.user_id))
                .with_grant(grant.role)
                .effective_role();
            let entry = best.entry(grant.user_id.clone()).or_default();
            *entry = (*entry).max(role);
        }
        for reference in graph.references_for(resource) {
            for membership in graph.members_of(&reference.group_id) {
                let role = graph
                    .resolution_inputs(resource, &membership.user_id, &reference.group_id)?
                    .effective_role();
                let entry = best.entry(membership.user_id.clone()).or_default();
                *entry = (*entry).max(role);
            }
        }

        Ok(best
            .into_iter()
            .filter(|(_, role)| role.at_least(min_role))
            .map(|(user, _)| user)
            .collect())
    }

    async fn authorized_groups(
        &self,
        resource: &ResourceId,
        min_role: Role,
    ) -> AccessResult<Vec<GroupId>> {
        let graph = self.graph.read().await;
        graph.require_resource(resource)?;

        Ok(graph
            .references_for(resource)
            .filter(|r| r.restriction.at_least(min_role))
            .map(|r| r.group_id.clone())
            .collect())
    }

    async fn stats(&self) -> StoreStats {
        let graph = self.graph.read().await;
        StoreStats {
            users: graph.users.len(),
            groups: graph.groups.len(),
            memberships: graph.memberships.len(),
            resources: graph.resources.len(),
            references: graph.references.len(),
            grants: graph.grants.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn seeded() -> MemoryAccessStore {
        let store = MemoryAccessStore::new();
        store
            .register_user(&"admin".into(), Role::Administrator)
            .await
            .unwrap();
        store
            .register_user(&"alice".into(), Role::Manager)
            .await
            .unwrap();
        store
            .register_user(&"bob".into(), Role::Member)
            .await
            .unwrap();
        store
            .create_group(&"staff".into(), &"admin".into())
            .await
            .unwrap();
        store
    }

    #[tokio::test]
    async fn test_create_group_adds_manager() {
        let store = seeded().await;
        let membership = store
            .membership(&"staff".into(), &"admin".into())
            .await
            .unwrap();
        assert_eq!(membership.role, Role::Manager);

        let err = store
            .create_group(&"staff".into(), &"alice".into())
            .await
            .unwrap_err();
        assert!(matches!(err, AccessError::EntityAlreadyExists(_)));
    }

    #[tokio::test]
    async fn test_create_group_requires_manager_user() {
        let store = seeded().await;
        let err = store
            .create_group(&"ops".into(), &"nobody".into())
            .await
            .unwrap_err();
        assert!(err.is_not_found());
        assert!(store.group(&"ops".into()).await.is_err());
    }

    #[tokio::test]
    async fn test_duplicate_user() {
        let store = seeded().await;
        let err = store
            .register_user(&"alice".into(), Role::Guest)
            .await
            .unwrap_err();
        assert!(matches!(err, AccessError::EntityAlreadyExists(_)));
    }

    #[tokio::test]
    async fn test_remove_group_cascades() {
        let store = seeded().await;
        store
            .add_member(&"staff".into(), &"bob".into(), Role::Member)
            .await
            .unwrap();
        store
            .register_resource_for_group(&"doc".into(), &"staff".into(), Role::Member)
            .await
            .unwrap();
        store.allow_grants(&"doc".into(), Role::Manager).await.unwrap();
        store
            .add_grant(&"doc".into(), &"bob".into(), Role::Guest)
            .await
            .unwrap();

        store.remove_group(&"staff".into()).await.unwrap();

        let stats = store.stats().await;
        assert_eq!(stats.groups, 0);
        assert_eq!(stats.memberships, 0);
        assert_eq!(stats.references, 0);
        assert_eq!(stats.grants, 1);
    }

    #[tokio::test]
    async fn test_remove_resource_cascades() {
        let store = seeded().await;
        store
            .register_resource_with_grant(&"doc".into(), &"bob".into(), Role::Member, Role::Manager)
            .await
            .unwrap();
        store
            .create_reference(&"doc".into(), &"staff".into(), Role::Guest)
            .await
            .unwrap();

        store.remove_resource(&"doc".into()).await.unwrap();

        let stats = store.stats().await;
        assert_eq!(stats.resources, 0);
        assert_eq!(stats.references, 0);
        assert_eq!(stats.grants, 0);
        assert!(store
            .resolution_inputs(&"doc".into(), &"bob".into(), &"staff".into())
            .await
            .unwrap_err()
            .is_not_found());
    }

    #[tokio::test]
    async fn test_duplicate_reference() {
        let store = seeded().await;
        store
            .register_resource_for_group(&"doc".into(), &"staff".into(), Role::Guest)
            .await
            .unwrap();
        let err = store
            .create_reference(&"doc".into(), &"staff".into(), Role::Member)
            .await
            .unwrap_err();
        assert!(matches!(err, AccessError::EntityAlreadyExists(_)));
    }

    #[tokio::test]
    async fn test_grant_rules() {
        let store = seeded().await;
        store.register_resource(&"doc".into()).await.unwrap();

        let err = store
            .add_grant(&"doc".into(), &"bob".into(), Role::Guest)
            .await
            .unwrap_err();
        assert!(matches!(err, AccessError::InvalidState(_)));

        store.allow_grants(&"doc".into(), Role::Member).await.unwrap();
        let err = store
            .add_grant(&"doc".into(), &"bob".into(), Role::Manager)
            .await
            .unwrap_err();
        assert!(matches!(err, AccessError::InvalidState(_)));

        store
            .add_grant(&"doc".into(), &"bob".into(), Role::Member)
            .await
            .unwrap();
        let err = store
            .add_grant(&"doc".into(), &"bob".into(), Role::Guest)
            .await
            .unwrap_err();
        assert!(matches!(err, AccessError::EntityAlreadyExists(_)));

        let err = store
            .change_grant(&"doc".into(), &"alice".into(), Role::Guest)
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_lowering_ceiling_caps_grants() {
        let store = seeded().await;
        store
            .register_resource_with_grant(&"doc".into(), &"bob".into(), Role::Manager, Role::Manager)
            .await
            .unwrap();

        let previous = store
            .set_grants_ceiling(&"doc".into(), Role::Guest)
            .await
            .unwrap();
        assert_eq!(previous, Role::Manager);

        let grant = store
            .grant(&"doc".into(), &"bob".into())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(grant.role, Role::Guest);
    }

    #[tokio::test]
    async fn test_revoke_all_and_disallow() {
        let store = seeded().await;
        store
            .register_resource_with_grant(&"doc".into(), &"bob".into(), Role::Member, Role::Member)
            .await
            .unwrap();
        store
            .add_grant(&"doc".into(), &"alice".into(), Role::Guest)
            .await
            .unwrap();

        let revoked = store
            .revoke_all_and_disallow_grants(&"doc".into())
            .await
            .unwrap();
        assert_eq!(revoked, 2);

        let resource = store.resource(&"doc".into()).await.unwrap();
        assert!(!resource.grants_allowed);
        assert!(store
            .grants_of(&"doc".into(), Page::all())
            .await
            .unwrap()
            .is_empty());
        assert!(matches!(
            store.grant(&"doc".into(), &"bob".into()).await,
            Err(AccessError::InvalidState(_))
        ));
    }

    #[tokio::test]
    async fn test_resolution_inputs_snapshot() {
        let store = seeded().await;
        store
            .add_member(&"staff".into(), &"bob".into(), Role::Member)
            .await
            .unwrap();
        store
            .register_resource_for_group(&"doc".into(), &"staff".into(), Role::Guest)
            .await
            .unwrap();

        let inputs = store
            .resolution_inputs(&"doc".into(), &"bob".into(), &"staff".into())
            .await
            .unwrap();
        assert_eq!(inputs.role_ceiling, Role::Member);
        assert_eq!(inputs.group_role, Some(Role::Member));
        assert_eq!(inputs.reference_restriction, Some(Role::Guest));
        assert_eq!(inputs.grant_role, None);

        let unknown = store
            .resolution_inputs(&"doc".into(), &"ghost".into(), &"staff".into())
            .await
            .unwrap();
        assert_eq!(unknown.role_ceiling, Role::NoAccess);
    }

    #[tokio::test]
    async fn test_paged_queries() {
        let store = seeded().await;
        for name in ["g1", "g2", "g3"] {
            store
                .create_group(&name.into(), &"alice".into())
                .await
                .unwrap();
        }

        let all = store.list_groups(Page::all()).await.unwrap();
        assert_eq!(all.len(), 4);

        let window = store.list_groups(Page::new(1, 2)).await.unwrap();
        let ids: Vec<_> = window.iter().map(|g| g.id.as_str()).collect();
        assert_eq!(ids, vec!["g2", "g3"]);

        let from_start = store.list_groups(Page::new(-3, 1)).await.unwrap();
        assert_eq!(from_start[0].id.as_str(), "g1");

        let memberships = store
            .memberships_of(&"alice".into(), Some(Role::Manager), Page::new(0, -1))
            .await
            .unwrap();
        assert_eq!(memberships.len(), 3);
    }

    #[tokio::test]
    async fn test_list_managers_respects_ceiling() {
        let store = seeded().await;
        store
            .add_member(&"staff".into(), &"bob".into(), Role::Manager)
            .await
            .unwrap();
        store
            .add_member(&"staff".into(), &"alice".into(), Role::Manager)
            .await
            .unwrap();

        let managers = store
            .list_managers(&"staff".into(), Page::all())
            .await
            .unwrap();
        let ids: Vec<_> = managers.iter().map(|m| m.user_id.as_str()).collect();
        assert_eq!(ids, vec!["admin", "alice"]);
    }

    #[tokio::test]
    async fn test_authorized_users_and_groups() {
        let store = seeded().await;
        store
            .add_member(&"staff".into(), &"bob".into(), Role::Member)
            .await
            .unwrap();
        store
            .register_resource_for_group(&"doc".into(), &"staff".into(), Role::Member)
            .await
            .unwrap();
        store.allow_grants(&"doc".into(), Role::Manager).await.unwrap();
        store
            .add_grant(&"doc".into(), &"alice".into(), Role::Manager)
            .await
            .unwrap();

        let users = store
            .authorized_users(&"doc".into(), Role::Member)
            .await
            .unwrap();
        let ids: Vec<_> = users.iter().map(|u| u.as_str()).collect();
        assert_eq!(ids, vec!["admin", "alice", "bob"]);

        let managers = store
            .authorized_users(&"doc".into(), Role::Manager)
            .await
            .unwrap();
        assert_eq!(managers, vec![UserId::from("alice")]);

        let groups = store
            .authorized_groups(&"doc".into(), Role::Manager)
            .await
            .unwrap();
        assert!(groups.is_empty());
    }
}
