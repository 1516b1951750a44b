//! Access graph records
//!
//! Users, groups, memberships, resources, references and grants. These are
//! plain records; the store owns them and only the administration façade
//! mutates them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ids::{GroupId, ReferenceId, ResourceId, UserId};
use crate::role::Role;

/// A registered user.
///
/// `role_ceiling` is the hard upper bound on any role the user may hold
/// anywhere. Users are never deleted; a ceiling of `NoAccess` deactivates
/// them.
///
/// # Examples
///
/// ```
/// use warden_core::{Role, User};
///
/// let user = User::new("alice", Role::Manager);
/// assert!(user.is_active());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct User {
    /// User ID
    pub id: UserId,

    /// Highest role this user may ever hold
    pub role_ceiling: Role,

    /// When the user was registered
    pub registered_at: DateTime<Utc>,
}

impl User {
    /// Creates a new user record.
    pub fn new(id: impl Into<UserId>, role_ceiling: Role) -> Self {
        Self {
            id: id.into(),
            role_ceiling,
            registered_at: Utc::now(),
        }
    }

    /// Check if the user may hold any role at all.
    pub fn is_active(&self) -> bool {
        self.role_ceiling.has_access()
    }
}

/// A group of users.
///
/// Memberships are stored separately (see [`Membership`]); the group record
/// only carries identity and creation time.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Group {
    /// Group ID
    pub id: GroupId,

    /// When the group was created
    pub created_at: DateTime<Utc>,
}

impl Group {
    /// Creates a new group record.
    pub fn new(id: impl Into<GroupId>) -> Self {
        Self {
            id: id.into(),
            created_at: Utc::now(),
        }
    }
}

/// Membership linking a user to a group with an in-group role.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Membership {
    /// Group ID
    pub group_id: GroupId,

    /// User ID
    pub user_id: UserId,

    /// Role within the group
    pub role: Role,

    /// When the user joined
    pub joined_at: DateTime<Utc>,
}

impl Membership {
    /// Creates a new membership.
    pub fn new(group_id: impl Into<GroupId>, user_id: impl Into<UserId>, role: Role) -> Self {
        Self {
            group_id: group_id.into(),
            user_id: user_id.into(),
            role,
            joined_at: Utc::now(),
        }
    }
}

/// A securable resource.
///
/// `grants_allowed` toggles whether individual user grants may exist for the
/// resource; `grants_ceiling` bounds the role any single grant may confer.
/// Freshly registered resources disallow grants.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Resource {
    /// Resource ID
    pub id: ResourceId,

    /// Whether individual grants may exist
    pub grants_allowed: bool,

    /// Upper bound for any grant on this resource
    pub grants_ceiling: Role,

    /// When the resource was registered
    pub registered_at: DateTime<Utc>,
}

impl Resource {
    /// Creates a new resource with grants disallowed.
    pub fn new(id: impl Into<ResourceId>) -> Self {
        Self {
            id: id.into(),
            grants_allowed: false,
            grants_ceiling: Role::NoAccess,
            registered_at: Utc::now(),
        }
    }

    /// Allow grants up to `ceiling`.
    pub fn with_grants(mut self, ceiling: Role) -> Self {
        self.grants_allowed = true;
        self.grants_ceiling = ceiling;
        self
    }
}

/// Group access to a resource, capped at `restriction`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Reference {
    /// Resource ID
    pub resource_id: ResourceId,

    /// Group ID
    pub group_id: GroupId,

    /// Highest role the group may obtain on the resource
    pub restriction: Role,
}

impl Reference {
    /// Creates a new reference.
    pub fn new(
        resource_id: impl Into<ResourceId>,
        group_id: impl Into<GroupId>,
        restriction: Role,
    ) -> Self {
        Self {
            resource_id: resource_id.into(),
            group_id: group_id.into(),
            restriction,
        }
    }

    /// The key of this reference.
    pub fn id(&self) -> ReferenceId {
        ReferenceId::new(self.resource_id.clone(), self.group_id.clone())
    }
}

/// Individual access of a user to a resource, independent of groups.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Grant {
    /// Resource ID
    pub resource_id: ResourceId,

    /// User ID of the grantee
    pub user_id: UserId,

    /// Granted role
    pub role: Role,

    /// When the grant was created
    pub granted_at: DateTime<Utc>,
}

impl Grant {
    /// Creates a new grant.
    pub fn new(resource_id: impl Into<ResourceId>, user_id: impl Into<UserId>, role: Role) -> Self {
        Self {
            resource_id: resource_id.into(),
            user_id: user_id.into(),
            role,
            granted_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_creation() {
        let user = User::new("alice", Role::Member);
        assert_eq!(user.id, UserId::from("alice"));
        assert_eq!(user.role_ceiling, Role::Member);
        assert!(user.is_active());

        let deactivated = User::new("bob", Role::NoAccess);
        assert!(!deactivated.is_active());
    }

    #[test]
    fn test_resource_defaults_disallow_grants() {
        let resource = Resource::new("doc-1");
        assert!(!resource.grants_allowed);
        assert_eq!(resource.grants_ceiling, Role::NoAccess);

        let resource = resource.with_grants(Role::Member);
        assert!(resource.grants_allowed);
        assert_eq!(resource.grants_ceiling, Role::Member);
    }

    #[test]
    fn test_reference_id() {
        let reference = Reference::new("doc-1", "staff", Role::Guest);
        assert_eq!(reference.id(), ReferenceId::new("doc-1", "staff"));
    }

    #[test]
    fn test_membership_creation() {
        let membership = Membership::new("staff", "alice", Role::Manager);
        assert_eq!(membership.group_id, GroupId::from("staff"));
        assert_eq!(membership.user_id, UserId::from("alice"));
        assert_eq!(membership.role, Role::Manager);
    }
}
