//! Role resolution algebra
//!
//! Combines the four independently administered permission sources into one
//! effective role:
//!
//! ```text
//! group_path = min(group_role, reference_restriction)
//! combined   = max(grant_role, group_path)
//! effective  = min(combined, role_ceiling)
//! ```
//!
//! Absent sources count as `NoAccess`. The order min, max, min is part of
//! the contract: a grant extends access beyond the group path, and nothing
//! exceeds the user's ceiling.

use serde::{Deserialize, Serialize};

use crate::role::Role;

/// The rows touched by one resolution, read from a consistent snapshot.
///
/// # Examples
///
/// ```
/// use warden_core::{Role, RoleInputs};
///
/// let inputs = RoleInputs::new(Role::Manager)
///     .with_group_role(Role::Manager)
///     .with_reference(Role::Guest)
///     .with_grant(Role::Member);
/// assert_eq!(inputs.effective_role(), Role::Member);
/// ```
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct RoleInputs {
    /// The acting user's global ceiling (`NoAccess` for unknown users)
    pub role_ceiling: Role,

    /// The user's in-group role in the acting group, if a member
    pub group_role: Option<Role>,

    /// The acting group's reference restriction on the resource, if any
    pub reference_restriction: Option<Role>,

    /// The user's individual grant on the resource, if any
    pub grant_role: Option<Role>,
}

impl RoleInputs {
    /// Inputs with only a ceiling and no access sources.
    pub fn new(role_ceiling: Role) -> Self {
        Self {
            role_ceiling,
            ..Self::default()
        }
    }

    /// Set the in-group role.
    pub fn with_group_role(mut self, role: Role) -> Self {
        self.group_role = Some(role);
        self
    }

    /// Set the reference restriction.
    pub fn with_reference(mut self, restriction: Role) -> Self {
        self.reference_restriction = Some(restriction);
        self
    }

    /// Set the grant role.
    pub fn with_grant(mut self, role: Role) -> Self {
        self.grant_role = Some(role);
        self
    }

    /// Effective role on the resource.
    pub fn effective_role(&self) -> Role {
        effective_role(
            self.grant_role.unwrap_or_default(),
            self.group_role.unwrap_or_default(),
            self.reference_restriction.unwrap_or_default(),
            self.role_ceiling,
        )
    }

    /// Resource-independent maximum role.
    pub fn maximum_role(&self) -> Role {
        maximum_role(self.role_ceiling, self.group_role)
    }

    /// Check if any access source is present for this triple.
    pub fn has_access_record(&self) -> bool {
        self.reference_restriction.is_some() || self.grant_role.is_some()
    }
}

/// Effective role of a (user, group, resource) triple.
///
/// `min(max(grant_role, min(group_role, reference_restriction)), role_ceiling)`
pub fn effective_role(
    grant_role: Role,
    group_role: Role,
    reference_restriction: Role,
    role_ceiling: Role,
) -> Role {
    let group_path = group_role.min(reference_restriction);
    let combined = grant_role.max(group_path);
    combined.min(role_ceiling)
}

/// Most privileged role a user can reach while acting for a group, before any
/// resource is considered. Non-members get `NoAccess`.
pub fn maximum_role(role_ceiling: Role, group_role: Option<Role>) -> Role {
    group_role.unwrap_or_default().min(role_ceiling)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exhaustive_closed_form() {
        for grant in Role::ALL {
            for group in Role::ALL {
                for reference in Role::ALL {
                    for ceiling in Role::ALL {
                        let expected = std::cmp::min(
                            std::cmp::max(grant, std::cmp::min(group, reference)),
                            ceiling,
                        );
                        let inputs = RoleInputs::new(ceiling)
                            .with_grant(grant)
                            .with_group_role(group)
                            .with_reference(reference);

                        assert_eq!(
                            inputs.effective_role(),
                            expected,
                            "grant={grant} group={group} reference={reference} ceiling={ceiling}"
                        );
                        assert!(inputs.effective_role() <= ceiling);
                    }
                }
            }
        }
    }

    #[test]
    fn test_no_sources_means_no_access() {
        let inputs = RoleInputs::new(Role::Administrator).with_group_role(Role::Administrator);
        assert_eq!(inputs.effective_role(), Role::NoAccess);
        assert!(!inputs.has_access_record());
    }

    #[test]
    fn test_grant_extends_beyond_weak_reference() {
        let inputs = RoleInputs::new(Role::Administrator)
            .with_group_role(Role::Manager)
            .with_reference(Role::Guest)
            .with_grant(Role::Manager);
        assert_eq!(inputs.effective_role(), Role::Manager);
    }

    #[test]
    fn test_group_path_takes_weaker_side() {
        let inputs = RoleInputs::new(Role::Administrator)
            .with_group_role(Role::Guest)
            .with_reference(Role::Manager);
        assert_eq!(inputs.effective_role(), Role::Guest);
    }

    #[test]
    fn test_ceiling_caps_grant() {
        let inputs = RoleInputs::new(Role::Member).with_grant(Role::Administrator);
        assert_eq!(inputs.effective_role(), Role::Member);
    }

    #[test]
    fn test_maximum_role() {
        assert_eq!(maximum_role(Role::Manager, Some(Role::Administrator)), Role::Manager);
        assert_eq!(maximum_role(Role::Administrator, Some(Role::Member)), Role::Member);
        assert_eq!(maximum_role(Role::Administrator, None), Role::NoAccess);
    }
}
