//! User administration.
//!
//! Users are never deleted. Deactivation sets the ceiling to `NoAccess`,
//! which caps every role the user holds anywhere.

use tracing::{info, instrument};
use warden_core::{AccessResult, AuthorizationContext, Role, User, UserId};

use super::AccessAdmin;
use crate::operation::Operation;

impl AccessAdmin {
    /// Register a user with the given ceiling.
    ///
    /// The ceiling may not exceed the caller's precomputed role.
    #[instrument(skip(self))]
    pub async fn register_user(
        &self,
        ctx: &AuthorizationContext,
        user: &UserId,
        role_ceiling: Role,
    ) -> AccessResult<User> {
        self.authorize(ctx, Operation::RegisterUser)?;
        self.enforcer.guard(ctx, role_ceiling)?;
        let record = self.store.register_user(user, role_ceiling).await?;
        info!(user = %user, ceiling = %role_ceiling, "User registered");
        Ok(record)
    }

    /// The ceiling of a user.
    #[instrument(skip(self))]
    pub async fn user_ceiling(&self, ctx: &AuthorizationContext, user: &UserId) -> AccessResult<Role> {
        self.authorize(ctx, Operation::UserCeiling)?;
        Ok(self.store.user(user).await?.role_ceiling)
    }

    /// Change a user's ceiling and return the previous one. Setting the same
    /// value again is a no-op.
    #[instrument(skip(self))]
    pub async fn set_user_ceiling(
        &self,
        ctx: &AuthorizationContext,
        user: &UserId,
        role_ceiling: Role,
    ) -> AccessResult<Role> {
        self.authorize(ctx, Operation::SetUserCeiling)?;
        let previous = self.store.set_user_ceiling(user, role_ceiling).await?;
        if previous != role_ceiling {
            info!(user = %user, from = %previous, to = %role_ceiling, "User ceiling changed");
        }
        Ok(previous)
    }

    /// Deactivate a user by lowering the ceiling to `NoAccess`.
    #[instrument(skip(self))]
    pub async fn deactivate_user(
        &self,
        ctx: &AuthorizationContext,
        user: &UserId,
    ) -> AccessResult<Role> {
        self.authorize(ctx, Operation::DeactivateUser)?;
        let previous = self.store.set_user_ceiling(user, Role::NoAccess).await?;
        info!(user = %user, "User deactivated");
        Ok(previous)
    }
}
