//! Identifiers
//!
//! Opaque, globally unique string identifiers for the principals and
//! resources of the access graph.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Wrap an identifier string.
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Borrow the identifier string.
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consume the identifier and return the string.
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_string())
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

string_id! {
    /// Identifier of a user (principal).
    UserId
}

string_id! {
    /// Identifier of a group.
    GroupId
}

string_id! {
    /// Identifier of a securable resource.
    ///
    /// # Examples
    ///
    /// ```
    /// use warden_core::ResourceId;
    ///
    /// let a = ResourceId::generate();
    /// let b = ResourceId::generate();
    /// assert_ne!(a, b);
    /// ```
    ResourceId
}

impl ResourceId {
    /// Generate a fresh, time-ordered resource identifier.
    pub fn generate() -> Self {
        Self(Uuid::now_v7().to_string())
    }
}

/// Key of a group reference on a resource.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ReferenceId {
    /// The referenced resource
    pub resource_id: ResourceId,

    /// The group holding the reference
    pub group_id: GroupId,
}

impl ReferenceId {
    /// Creates a reference key.
    pub fn new(resource_id: impl Into<ResourceId>, group_id: impl Into<GroupId>) -> Self {
        Self {
            resource_id: resource_id.into(),
            group_id: group_id.into(),
        }
    }
}

impl fmt::Display for ReferenceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.resource_id, self.group_id)
    }
}
