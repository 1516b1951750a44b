//! Authorization context
//!
//! The caller identity handed to every guarded call: the acting user, the
//! group the user acts for, and the role the session layer resolved for that
//! pair once per request.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::ids::{GroupId, UserId};
use crate::role::Role;

/// Immutable caller context.
///
/// Switching group or role means building a new value; a context is never
/// mutated after construction, so it can be shared across threads freely.
///
/// # Examples
///
/// ```
/// use warden_core::{AuthorizationContext, Role};
///
/// let ctx = AuthorizationContext::new("alice", "staff", Role::Member);
/// let narrowed = ctx.with_role(Role::Guest);
/// assert_eq!(ctx.precomputed_role(), Role::Member);
/// assert_eq!(narrowed.precomputed_role(), Role::Guest);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct AuthorizationContext {
    user: UserId,
    group: GroupId,
    precomputed_role: Role,
}

impl AuthorizationContext {
    /// Creates a new context.
    ///
    /// # Arguments
    ///
    /// * `user` - The acting user
    /// * `group` - The group the user acts for
    /// * `precomputed_role` - The maximum role of the user in that group
    pub fn new(user: impl Into<UserId>, group: impl Into<GroupId>, precomputed_role: Role) -> Self {
        Self {
            user: user.into(),
            group: group.into(),
            precomputed_role,
        }
    }

    /// The acting user.
    pub fn user(&self) -> &UserId {
        &self.user
    }

    /// The acting group.
    pub fn group(&self) -> &GroupId {
        &self.group
    }

    /// The role resolved by the session layer for this user and group.
    pub fn precomputed_role(&self) -> Role {
        self.precomputed_role
    }

    /// Derive a context with a different precomputed role.
    pub fn with_role(&self, role: Role) -> Self {
        Self {
            precomputed_role: role,
            ..self.clone()
        }
    }

    /// Derive a context acting for a different group.
    ///
    /// The precomputed role belongs to the old group, so it has to be
    /// supplied again.
    pub fn with_group(&self, group: impl Into<GroupId>, precomputed_role: Role) -> Self {
        Self {
            user: self.user.clone(),
            group: group.into(),
            precomputed_role,
        }
    }
}

impl fmt::Display for AuthorizationContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{} ({})", self.user, self.group, self.precomputed_role)
    }
}
