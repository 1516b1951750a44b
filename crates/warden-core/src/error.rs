//! Error types for access control operations
//!
//! Four structured failure kinds are the only information that crosses back
//! to callers. None of them is retried internally: every failure is a
//! deterministic function of the graph state and the caller.

use thiserror::Error;

use crate::role::Role;

/// Access control error types.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AccessError {
    /// Caller role is below the operation's requirement
    #[error("Unauthorized: role {actual} is below required role {required}")]
    Unauthorized {
        /// Role the operation requires
        required: Role,
        /// Role the caller holds
        actual: Role,
    },

    /// Referenced user, group, resource, reference or grant is absent
    #[error("Entity not found: {0}")]
    EntityNotFound(String),

    /// Duplicate creation attempt
    #[error("Entity already exists: {0}")]
    EntityAlreadyExists(String),

    /// Structurally disallowed mutation
    #[error("Invalid state: {0}")]
    InvalidState(String),
}

/// Result type for access control operations.
pub type AccessResult<T> = Result<T, AccessError>;

impl AccessError {
    /// Shorthand for an authorization failure.
    pub fn unauthorized(required: Role, actual: Role) -> Self {
        AccessError::Unauthorized { required, actual }
    }

    /// Shorthand for a missing entity.
    pub fn not_found(what: impl Into<String>) -> Self {
        AccessError::EntityNotFound(what.into())
    }

    /// Shorthand for a duplicate entity.
    pub fn already_exists(what: impl Into<String>) -> Self {
        AccessError::EntityAlreadyExists(what.into())
    }

    /// Shorthand for a disallowed mutation.
    pub fn invalid_state(why: impl Into<String>) -> Self {
        AccessError::InvalidState(why.into())
    }

    /// Check if this error is a missing entity.
    pub fn is_not_found(&self) -> bool {
        matches!(self, AccessError::EntityNotFound(_))
    }

    /// Check if this error is an authorization failure.
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, AccessError::Unauthorized { .. })
    }

    /// Get HTTP status code for this error.
    pub fn status_code(&self) -> u16 {
        match self {
            AccessError::Unauthorized { .. } => 403,
            AccessError::EntityNotFound(_) => 404,
            AccessError::EntityAlreadyExists(_) => 409,
            AccessError::InvalidState(_) => 422,
        }
    }

    /// Get error code for API responses.
    pub fn error_code(&self) -> &'static str {
        match self {
            AccessError::Unauthorized { .. } => "UNAUTHORIZED",
            AccessError::EntityNotFound(_) => "ENTITY_NOT_FOUND",
            AccessError::EntityAlreadyExists(_) => "ENTITY_ALREADY_EXISTS",
            AccessError::InvalidState(_) => "INVALID_STATE",
        }
    }
}
