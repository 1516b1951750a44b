//! # Warden Store
//!
//! The access graph store: users, groups, memberships, resources, references
//! and grants, with atomic mutations and snapshot reads for role resolution.
//!
//! ## Overview
//!
//! - [`AccessGraphStore`]: the async persistence boundary
//! - [`MemoryAccessStore`]: an in-memory implementation for embedding and tests
//!
//! Stores never authorize. The engine guards every call before it reaches
//! the store.
//!
//! ## Usage
//!
//! ```rust
//! use warden_core::{Role, UserId, GroupId};
//! use warden_store::{AccessGraphStore, MemoryAccessStore};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> Result<(), warden_core::AccessError> {
//! let store = MemoryAccessStore::new();
//! store.register_user(&UserId::from("alice"), Role::Manager).await?;
//! store.create_group(&GroupId::from("staff"), &UserId::from("alice")).await?;
//!
//! let inputs = store
//!     .membership_inputs(&UserId::from("alice"), &GroupId::from("staff"))
//!     .await?;
//! assert_eq!(inputs.maximum_role(), Role::Manager);
//! # Ok(())
//! # }
//! ```

pub mod memory;
pub mod store;

// Re-export main types for convenience
pub use memory::MemoryAccessStore;
pub use store::{AccessGraphStore, StoreStats};
