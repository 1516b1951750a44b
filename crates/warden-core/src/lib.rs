//! # Warden Core
//!
//! Vocabulary of the Warden access-control engine: the role lattice, the
//! access graph records and the pure role resolution algebra.
//!
//! ## Overview
//!
//! The warden-core crate handles:
//! - **Roles**: A totally ordered lattice `NoAccess < Guest < Member < Manager < Administrator`
//! - **Identifiers**: Opaque user, group and resource ids
//! - **Access graph**: Users, groups, memberships, resources, references and grants
//! - **Resolution**: Combining ceiling, membership, reference and grant into one role
//! - **Context**: The immutable caller identity passed to every guarded call
//!
//! ## Resolution
//!
//! ```text
//! effective = min(max(grant, min(group_role, reference)), ceiling)
//! maximum   = min(group_role, ceiling)
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use warden_core::{Role, RoleInputs};
//!
//! // A member whose group only has guest access, with a member grant
//! let inputs = RoleInputs::new(Role::Administrator)
//!     .with_group_role(Role::Member)
//!     .with_reference(Role::Guest)
//!     .with_grant(Role::Member);
//! assert_eq!(inputs.effective_role(), Role::Member);
//!
//! // Roles parse from their stored names
//! let role: Role = "manager".parse().unwrap();
//! assert!(role.at_least(Role::Member));
//! ```

pub mod algebra;
pub mod context;
pub mod entities;
pub mod error;
pub mod ids;
pub mod page;
pub mod role;

// Re-export main types for convenience
pub use algebra::{effective_role, maximum_role, RoleInputs};
pub use context::AuthorizationContext;
pub use entities::{Grant, Group, Membership, Reference, Resource, User};
pub use error::{AccessError, AccessResult};
pub use ids::{GroupId, ReferenceId, ResourceId, UserId};
pub use page::Page;
pub use role::{Role, RoleParseError};
