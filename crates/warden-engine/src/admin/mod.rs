//! Administration façade
//!
//! The externally callable mutations and queries of the access graph. Every
//! operation authorizes first with the fixed role from [`Operation`] and only
//! then touches the store, so a denied call never changes state.
//!
//! Operations are grouped by the entity they manage:
//! - [`users`]: registration and ceilings
//! - [`groups`]: groups and memberships
//! - [`resources`]: resources, references and grants

pub mod groups;
pub mod resources;
pub mod users;

use std::sync::Arc;
use tracing::debug;
use warden_core::{AccessResult, AuthorizationContext, ResourceId};
use warden_store::AccessGraphStore;

use crate::config::EngineConfig;
use crate::enforcer::Enforcer;
use crate::operation::Operation;

/// Administration façade over an access graph store.
///
/// # Example
///
/// ```rust
/// use std::sync::Arc;
/// use warden_core::{AuthorizationContext, Role, UserId};
/// use warden_engine::{AccessAdmin, EngineConfig};
/// use warden_store::{AccessGraphStore, MemoryAccessStore};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() -> Result<(), warden_core::AccessError> {
/// let store = Arc::new(MemoryAccessStore::new());
/// store.register_user(&UserId::from("root"), Role::Administrator).await?;
///
/// let admin = AccessAdmin::new(store, EngineConfig::default());
/// let ctx = AuthorizationContext::new("root", "system", Role::Administrator);
/// admin.create_group(&ctx, &"staff".into(), &"root".into()).await?;
///
/// let guest = ctx.with_role(Role::Guest);
/// assert!(admin.create_group(&guest, &"ops".into(), &"root".into()).await.is_err());
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct AccessAdmin {
    store: Arc<dyn AccessGraphStore>,
    enforcer: Enforcer,
}

impl std::fmt::Debug for AccessAdmin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccessAdmin")
            .field("enforcer", &self.enforcer)
            .finish_non_exhaustive()
    }
}

impl AccessAdmin {
    /// Create a façade over a store.
    pub fn new(store: Arc<dyn AccessGraphStore>, config: EngineConfig) -> Self {
        Self {
            enforcer: Enforcer::new(store.clone(), config),
            store,
        }
    }

    /// The enforcer guarding this façade.
    pub fn enforcer(&self) -> &Enforcer {
        &self.enforcer
    }

    /// Authorize a non resource-scoped operation.
    fn authorize(&self, ctx: &AuthorizationContext, operation: Operation) -> AccessResult<()> {
        debug!(operation = %operation, required = %operation.required_role(), "Authorizing");
        self.enforcer.guard(ctx, operation.required_role())
    }

    /// Authorize a resource-scoped operation on `resource`.
    async fn authorize_on(
        &self,
        ctx: &AuthorizationContext,
        operation: Operation,
        resource: &ResourceId,
    ) -> AccessResult<()> {
        debug!(operation = %operation, resource = %resource, required = %operation.required_role(), "Authorizing");
        self.enforcer
            .guard_resource(ctx, resource, operation.required_role())
            .await
    }
}
