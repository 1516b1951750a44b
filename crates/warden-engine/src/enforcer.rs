//! Enforcement layer
//!
//! `guard` checks the context's precomputed role, `guard_resource` checks
//! the freshly resolved role on one resource, and `filter` narrows a
//! collection to the items the caller may access.
//!
//! Contexts acting for the configured system group are authorized on
//! resources by their membership in that group instead of by references.

use std::sync::Arc;
use tracing::{debug, warn};
use warden_core::{AccessError, AccessResult, AuthorizationContext, Resource, ResourceId, Role};
use warden_store::AccessGraphStore;

use crate::config::EngineConfig;
use crate::resolver::RoleResolver;

/// Items that identify a securable resource.
///
/// Implement this for result types that should pass through
/// [`Enforcer::filter`].
pub trait Securable {
    /// The resource this item stands for.
    fn resource_id(&self) -> &ResourceId;
}

impl Securable for ResourceId {
    fn resource_id(&self) -> &ResourceId {
        self
    }
}

impl Securable for Resource {
    fn resource_id(&self) -> &ResourceId {
        &self.id
    }
}

/// Authorization guard and result filter.
#[derive(Clone)]
pub struct Enforcer {
    store: Arc<dyn AccessGraphStore>,
    resolver: RoleResolver,
    config: EngineConfig,
}

impl std::fmt::Debug for Enforcer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Enforcer")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl Enforcer {
    /// Create an enforcer over a store.
    pub fn new(store: Arc<dyn AccessGraphStore>, config: EngineConfig) -> Self {
        Self {
            resolver: RoleResolver::new(store.clone()),
            store,
            config,
        }
    }

    /// The resolver used for resource checks.
    pub fn resolver(&self) -> &RoleResolver {
        &self.resolver
    }

    /// The engine configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Fail unless the context's precomputed role reaches `required`.
    pub fn guard(&self, ctx: &AuthorizationContext, required: Role) -> AccessResult<()> {
        let actual = ctx.precomputed_role();
        if actual.less_than(required) {
            return Err(self.deny(ctx, None, required, actual));
        }
        Ok(())
    }

    /// Fail unless the caller's role on `resource` reaches `required`.
    ///
    /// A missing resource fails with `EntityNotFound` before any role is
    /// compared.
    pub async fn guard_resource(
        &self,
        ctx: &AuthorizationContext,
        resource: &ResourceId,
        required: Role,
    ) -> AccessResult<()> {
        let actual = self.resource_role(ctx, resource).await?;
        if actual.less_than(required) {
            return Err(self.deny(ctx, Some(resource), required, actual));
        }
        Ok(())
    }

    /// Guard several resources. Every resource is checked for existence
    /// before any role is compared.
    pub async fn guard_resources(
        &self,
        ctx: &AuthorizationContext,
        resources: &[ResourceId],
        required: Role,
    ) -> AccessResult<()> {
        for resource in resources {
            self.store.resource(resource).await?;
        }
        for resource in resources {
            self.guard_resource(ctx, resource, required).await?;
        }
        Ok(())
    }

    /// Keep the candidates whose resource the caller may access at
    /// `required`, in input order.
    ///
    /// Candidates without any access record for the caller, including
    /// unregistered resources, are dropped without error.
    pub async fn filter<T, I>(
        &self,
        ctx: &AuthorizationContext,
        required: Role,
        candidates: I,
    ) -> AccessResult<Vec<T>>
    where
        T: Securable,
        I: IntoIterator<Item = T>,
    {
        let system_role = if self.config.is_system_group(ctx.group()) {
            Some(self.resolver.maximum_role(ctx.user(), ctx.group()).await?)
        } else {
            None
        };

        let mut total = 0usize;
        let mut kept = Vec::new();
        for candidate in candidates {
            total += 1;
            let resource = candidate.resource_id();

            let role = match system_role {
                Some(role) => match self.store.resource(resource).await {
                    Ok(_) => role,
                    Err(e) if e.is_not_found() => continue,
                    Err(e) => return Err(e),
                },
                None => match self
                    .store
                    .resolution_inputs(resource, ctx.user(), ctx.group())
                    .await
                {
                    Ok(inputs) if inputs.has_access_record() => inputs.effective_role(),
                    Ok(_) => continue,
                    Err(e) if e.is_not_found() => continue,
                    Err(e) => return Err(e),
                },
            };

            if role.at_least(required) {
                kept.push(candidate);
            }
        }

        debug!(
            user = %ctx.user(),
            group = %ctx.group(),
            required = %required,
            total,
            kept = kept.len(),
            "Filtered resources"
        );
        Ok(kept)
    }

    async fn resource_role(
        &self,
        ctx: &AuthorizationContext,
        resource: &ResourceId,
    ) -> AccessResult<Role> {
        if self.config.is_system_group(ctx.group()) {
            self.store.resource(resource).await?;
            return self.resolver.maximum_role(ctx.user(), ctx.group()).await;
        }
        self.resolver
            .effective_role(resource, ctx.user(), ctx.group())
            .await
    }

    fn deny(
        &self,
        ctx: &AuthorizationContext,
        resource: Option<&ResourceId>,
        required: Role,
        actual: Role,
    ) -> AccessError {
        let resource = resource.map(|r| r.as_str());
        if self.config.log_denials {
            warn!(user = %ctx.user(), group = %ctx.group(), resource = ?resource, required = %required, actual = %actual, "Access denied");
        } else {
            debug!(user = %ctx.user(), group = %ctx.group(), resource = ?resource, required = %required, actual = %actual, "Access denied");
        }
        AccessError::unauthorized(required, actual)
    }
}
