//! Role lattice
//!
//! This module defines the totally ordered role vocabulary shared by every
//! other part of the engine. A role is used both as a requirement (the
//! minimum an operation needs) and as a grant (the maximum a source gives).

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Access role.
///
/// Roles are hierarchical, with each role including the privileges of all
/// lower roles. The hierarchy is:
/// NoAccess < Guest < Member < Manager < Administrator
///
/// The discriminants are the persisted ordinals and must never change.
///
/// # Examples
///
/// ```
/// use warden_core::Role;
///
/// assert!(Role::Manager > Role::Member);
/// assert_eq!(Role::Manager.min(Role::Guest), Role::Guest);
/// assert_eq!(Role::Guest.max(Role::Member), Role::Member);
/// assert!(Role::Administrator.at_least(Role::Manager));
/// ```
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    /// No access at all
    NoAccess = 0,

    /// Read-only visibility
    Guest = 1,

    /// Regular group member
    Member = 2,

    /// Can administer a group or resource
    Manager = 3,

    /// Full system administration
    Administrator = 4,
}

impl Role {
    /// All roles in ascending order.
    pub const ALL: [Role; 5] = [
        Role::NoAccess,
        Role::Guest,
        Role::Member,
        Role::Manager,
        Role::Administrator,
    ];

    /// Stable ordinal used when the role crosses a storage boundary.
    pub fn ordinal(&self) -> u8 {
        *self as u8
    }

    /// Map a persisted ordinal back to a role.
    ///
    /// # Returns
    ///
    /// `None` for ordinals outside `0..=4`
    pub fn from_ordinal(ordinal: u8) -> Option<Self> {
        Self::ALL.get(ordinal as usize).copied()
    }

    /// Check if this role satisfies a requirement.
    pub fn at_least(&self, required: Role) -> bool {
        *self >= required
    }

    /// Check if this role is strictly below another role.
    pub fn less_than(&self, other: Role) -> bool {
        *self < other
    }

    /// Check if this role grants any access.
    pub fn has_access(&self) -> bool {
        *self > Role::NoAccess
    }

    /// Get string representation of the role.
    ///
    /// # Examples
    ///
    /// ```
    /// use warden_core::Role;
    ///
    /// assert_eq!(Role::NoAccess.as_str(), "NO_ACCESS");
    /// ```
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NoAccess => "NO_ACCESS",
            Self::Guest => "GUEST",
            Self::Member => "MEMBER",
            Self::Manager => "MANAGER",
            Self::Administrator => "ADMINISTRATOR",
        }
    }

    /// Get a human-readable display name for the role.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::NoAccess => "No access",
            Self::Guest => "Guest",
            Self::Member => "Member",
            Self::Manager => "Manager",
            Self::Administrator => "Administrator",
        }
    }
}

impl Default for Role {
    fn default() -> Self {
        Self::NoAccess
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a textual role name is not recognized.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown role: {0}")]
pub struct RoleParseError(pub String);

impl FromStr for Role {
    type Err = RoleParseError;

    /// Parse a role name (case-insensitive, `_`, `-` and space are equivalent).
    ///
    /// # Examples
    ///
    /// ```
    /// use warden_core::Role;
    ///
    /// assert_eq!("manager".parse::<Role>(), Ok(Role::Manager));
    /// assert_eq!("no-access".parse::<Role>(), Ok(Role::NoAccess));
    /// assert!("owner".parse::<Role>().is_err());
    /// ```
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .trim()
            .chars()
            .map(|c| match c {
                '-' | ' ' => '_',
                c => c.to_ascii_uppercase(),
            })
            .collect();

        match normalized.as_str() {
            "NO_ACCESS" | "NOACCESS" => Ok(Self::NoAccess),
            "GUEST" => Ok(Self::Guest),
            "MEMBER" => Ok(Self::Member),
            "MANAGER" => Ok(Self::Manager),
            "ADMINISTRATOR" | "ADMIN" => Ok(Self::Administrator),
            _ => Err(RoleParseError(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_hierarchy() {
        assert!(Role::Administrator > Role::Manager);
        assert!(Role::Manager > Role::Member);
        assert!(Role::Member > Role::Guest);
        assert!(Role::Guest > Role::NoAccess);
    }

    #[test]
    fn test_min_max() {
        assert_eq!(Role::Manager.min(Role::Member), Role::Member);
        assert_eq!(Role::Guest.max(Role::Administrator), Role::Administrator);
        assert_eq!(Role::NoAccess.min(Role::NoAccess), Role::NoAccess);
    }

    #[test]
    fn test_ordinal_is_stable() {
        for (expected, role) in Role::ALL.iter().enumerate() {
            assert_eq!(role.ordinal() as usize, expected);
            assert_eq!(Role::from_ordinal(role.ordinal()), Some(*role));
        }
        assert_eq!(Role::from_ordinal(5), None);
    }

    #[test]
    fn test_role_parse() {
        assert_eq!("ADMINISTRATOR".parse::<Role>(), Ok(Role::Administrator));
        assert_eq!("guest".parse::<Role>(), Ok(Role::Guest));
        assert_eq!(" No_Access ".parse::<Role>(), Ok(Role::NoAccess));
        assert_eq!(
            "owner".parse::<Role>(),
            Err(RoleParseError("owner".to_string()))
        );
    }

    #[test]
    fn test_display_round_trips_through_parse() {
        for role in Role::ALL {
            assert_eq!(role.to_string().parse::<Role>(), Ok(role));
        }
    }

    #[test]
    fn test_serde_uses_screaming_names() {
        let json = serde_json::to_string(&Role::NoAccess).unwrap();
        assert_eq!(json, "\"NO_ACCESS\"");

        let role: Role = serde_json::from_str("\"MANAGER\"").unwrap();
        assert_eq!(role, Role::Manager);
    }

    #[test]
    fn test_comparison_helpers() {
        assert!(Role::Member.at_least(Role::Member));
        assert!(!Role::Guest.at_least(Role::Member));
        assert!(Role::Guest.less_than(Role::Member));
        assert!(!Role::NoAccess.has_access());
        assert!(Role::Guest.has_access());
    }
}
