//! # Operations
//!
//! Every administrative operation together with the fixed role it requires.
//! Resource-scoped operations are checked against the caller's effective
//! role on the target resource; all others against the context's
//! precomputed role.

use serde::{Deserialize, Serialize};
use std::fmt;
use warden_core::Role;

/// Administrative operations.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    // Users
    /// Register a user with a ceiling no higher than the caller's role
    RegisterUser,
    /// Read a user's ceiling
    UserCeiling,
    /// Change a user's ceiling
    SetUserCeiling,
    /// Lower a user's ceiling to `NoAccess`
    DeactivateUser,

    // Groups
    /// Create a group with its first manager
    CreateGroup,
    /// Remove a group with its memberships and references
    RemoveGroup,
    /// Add a user to a group
    AddMember,
    /// Remove a user from a group
    RemoveMember,
    /// Change a member's in-group role
    ChangeMemberRole,
    /// Read a member's in-group role capped by the ceiling
    MaximumRole,
    /// List all groups
    ListGroups,
    /// List the members of a group
    ListMembers,
    /// List the members who manage a group
    ListManagers,
    /// List the memberships of a user
    MembershipsOf,

    // Resources and references
    /// Register a resource with no reference or grant
    RegisterResource,
    /// Register a resource referenced by a group
    RegisterResourceForGroup,
    /// Register a resource with a grant for one user
    RegisterResourceWithGrant,
    /// Remove a resource with its references and grants
    RemoveResource,
    /// Reference a resource from a group
    CreateReference,
    /// Delete a group's reference to a resource
    DeleteReference,
    /// Change the restriction of a reference
    ChangeReferenceRestriction,
    /// Read the restriction of a reference
    ReferenceRestriction,
    /// List the references to a resource
    ReferencesOf,

    // Grants
    /// Allow grants on a resource up to a ceiling
    AllowGrants,
    /// Check whether a resource allows grants
    GrantsAllowed,
    /// Read the grants ceiling of a resource
    GrantsCeiling,
    /// Change the grants ceiling of a resource
    ChangeGrantsCeiling,
    /// Grant a user a role on a resource
    AddGrant,
    /// Change the role of an existing grant
    ChangeGrant,
    /// Revoke one grant
    RevokeGrant,
    /// Revoke every grant and disallow new ones
    RevokeAllAndDisallowGrants,
    /// Read a user's grant role on a resource
    GrantRole,
    /// List the grants on a resource
    GrantsOf,
    /// List users whose effective role reaches a minimum
    AuthorizedUsers,
    /// List groups whose restriction reaches a minimum
    AuthorizedGroups,
}

impl Operation {
    /// All operations.
    pub const ALL: [Operation; 35] = [
        Operation::RegisterUser,
        Operation::UserCeiling,
        Operation::SetUserCeiling,
        Operation::DeactivateUser,
        Operation::CreateGroup,
        Operation::RemoveGroup,
        Operation::AddMember,
        Operation::RemoveMember,
        Operation::ChangeMemberRole,
        Operation::MaximumRole,
        Operation::ListGroups,
        Operation::ListMembers,
        Operation::ListManagers,
        Operation::MembershipsOf,
        Operation::RegisterResource,
        Operation::RegisterResourceForGroup,
        Operation::RegisterResourceWithGrant,
        Operation::RemoveResource,
        Operation::CreateReference,
        Operation::DeleteReference,
        Operation::ChangeReferenceRestriction,
        Operation::ReferenceRestriction,
        Operation::ReferencesOf,
        Operation::AllowGrants,
        Operation::GrantsAllowed,
        Operation::GrantsCeiling,
        Operation::ChangeGrantsCeiling,
        Operation::AddGrant,
        Operation::ChangeGrant,
        Operation::RevokeGrant,
        Operation::RevokeAllAndDisallowGrants,
        Operation::GrantRole,
        Operation::GrantsOf,
        Operation::AuthorizedUsers,
        Operation::AuthorizedGroups,
    ];

    /// Role the caller must hold to perform the operation.
    pub fn required_role(&self) -> Role {
        match self {
            Operation::SetUserCeiling
            | Operation::DeactivateUser
            | Operation::CreateGroup
            | Operation::RemoveGroup
            | Operation::RegisterResource => Role::Administrator,
            Operation::UserCeiling | Operation::ListGroups | Operation::ReferenceRestriction => {
                Role::Member
            }
            _ => Role::Manager,
        }
    }

    /// Check if the operation is authorized against a target resource.
    pub fn is_resource_scoped(&self) -> bool {
        matches!(
            self,
            Operation::RemoveResource
                | Operation::CreateReference
                | Operation::DeleteReference
                | Operation::ChangeReferenceRestriction
                | Operation::ReferenceRestriction
                | Operation::ReferencesOf
                | Operation::AllowGrants
                | Operation::GrantsAllowed
                | Operation::GrantsCeiling
                | Operation::ChangeGrantsCeiling
                | Operation::AddGrant
                | Operation::ChangeGrant
                | Operation::RevokeGrant
                | Operation::RevokeAllAndDisallowGrants
                | Operation::GrantRole
                | Operation::GrantsOf
                | Operation::AuthorizedUsers
                | Operation::AuthorizedGroups
        )
    }

    /// Get the string representation of the operation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::RegisterUser => "register_user",
            Operation::UserCeiling => "user_ceiling",
            Operation::SetUserCeiling => "set_user_ceiling",
            Operation::DeactivateUser => "deactivate_user",
            Operation::CreateGroup => "create_group",
            Operation::RemoveGroup => "remove_group",
            Operation::AddMember => "add_member",
            Operation::RemoveMember => "remove_member",
            Operation::ChangeMemberRole => "change_member_role",
            Operation::MaximumRole => "maximum_role",
            Operation::ListGroups => "list_groups",
            Operation::ListMembers => "list_members",
            Operation::ListManagers => "list_managers",
            Operation::MembershipsOf => "memberships_of",
            Operation::RegisterResource => "register_resource",
            Operation::RegisterResourceForGroup => "register_resource_for_group",
            Operation::RegisterResourceWithGrant => "register_resource_with_grant",
            Operation::RemoveResource => "remove_resource",
            Operation::CreateReference => "create_reference",
            Operation::DeleteReference => "delete_reference",
            Operation::ChangeReferenceRestriction => "change_reference_restriction",
            Operation::ReferenceRestriction => "reference_restriction",
            Operation::ReferencesOf => "references_of",
            Operation::AllowGrants => "allow_grants",
            Operation::GrantsAllowed => "grants_allowed",
            Operation::GrantsCeiling => "grants_ceiling",
            Operation::ChangeGrantsCeiling => "change_grants_ceiling",
            Operation::AddGrant => "add_grant",
            Operation::ChangeGrant => "change_grant",
            Operation::RevokeGrant => "revoke_grant",
            Operation::RevokeAllAndDisallowGrants => "revoke_all_and_disallow_grants",
            Operation::GrantRole => "grant_role",
            Operation::GrantsOf => "grants_of",
            Operation::AuthorizedUsers => "authorized_users",
            Operation::AuthorizedGroups => "authorized_groups",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_unique_names() {
        let names: HashSet<_> = Operation::ALL.iter().map(|op| op.as_str()).collect();
        assert_eq!(names.len(), Operation::ALL.len());
    }

    #[test]
    fn test_administrator_operations() {
        let admin: Vec<_> = Operation::ALL
            .iter()
            .filter(|op| op.required_role() == Role::Administrator)
            .collect();
        assert_eq!(
            admin,
            vec![
                &Operation::SetUserCeiling,
                &Operation::DeactivateUser,
                &Operation::CreateGroup,
                &Operation::RemoveGroup,
                &Operation::RegisterResource
            ]
        );
    }

    #[test]
    fn test_grant_operations_need_manager_on_resource() {
        for op in [
            Operation::AddGrant,
            Operation::ChangeGrant,
            Operation::RevokeGrant,
            Operation::RevokeAllAndDisallowGrants,
        ] {
            assert_eq!(op.required_role(), Role::Manager);
            assert!(op.is_resource_scoped());
        }
    }

    #[test]
    fn test_registration_is_not_resource_scoped() {
        assert!(!Operation::RegisterResource.is_resource_scoped());
        assert!(!Operation::RegisterResourceForGroup.is_resource_scoped());
        assert!(!Operation::RegisterResourceWithGrant.is_resource_scoped());
    }

    #[test]
    fn test_serialization() {
        let json = serde_json::to_string(&Operation::RevokeAllAndDisallowGrants).unwrap();
        assert_eq!(json, "\"revoke_all_and_disallow_grants\"");
    }
}
