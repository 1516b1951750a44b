//! # Warden Engine
//!
//! Role resolution, enforcement and administration on top of an access
//! graph store.
//!
//! ## Overview
//!
//! The warden-engine crate handles:
//! - **Resolution**: [`RoleResolver`] reads one snapshot per triple and applies the algebra
//! - **Enforcement**: [`Enforcer`] guards single calls and filters result collections
//! - **Administration**: [`AccessAdmin`] mutates the graph, each operation guarded by a fixed role
//! - **Configuration**: [`EngineConfig`] loaded from the environment
//!
//! ## Enforcement
//!
//! ```text
//! guard(ctx, role)                 precomputed role >= role
//! guard_resource(ctx, res, role)   resource exists, then effective role >= role
//! filter(ctx, role, items)         items whose effective role >= role, input order kept
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use std::sync::Arc;
//! use warden_core::{Role, ResourceId, UserId};
//! use warden_engine::{AccessAdmin, EngineConfig, RoleResolver};
//! use warden_store::{AccessGraphStore, MemoryAccessStore};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> Result<(), warden_core::AccessError> {
//! let store = Arc::new(MemoryAccessStore::new());
//! store.register_user(&UserId::from("root"), Role::Administrator).await?;
//! store.create_group(&"staff".into(), &"root".into()).await?;
//!
//! // The session layer resolves the context once per request
//! let resolver = RoleResolver::new(store.clone());
//! let ctx = resolver.context_for(&"root".into(), &"staff".into()).await?;
//!
//! let admin = AccessAdmin::new(store, EngineConfig::default());
//! admin
//!     .register_resource_for_group(&ctx, &"doc-1".into(), &"staff".into(), Role::Member)
//!     .await?;
//!
//! let visible = admin
//!     .enforcer()
//!     .filter(&ctx, Role::Guest, vec![ResourceId::from("doc-1"), ResourceId::from("doc-2")])
//!     .await?;
//! assert_eq!(visible, vec![ResourceId::from("doc-1")]);
//! # Ok(())
//! # }
//! ```

pub mod admin;
pub mod config;
pub mod enforcer;
pub mod operation;
pub mod resolver;

// Re-export main types for convenience
pub use admin::AccessAdmin;
pub use config::{ConfigError, EngineConfig};
pub use enforcer::{Enforcer, Securable};
pub use operation::Operation;
pub use resolver::RoleResolver;
