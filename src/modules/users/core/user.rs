// User domain types.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::shared::core::permission::PermissionSet;

/// A registered user row as the store holds it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub external_id: String,
    pub provider: String,
    pub name: String,
    pub email: String,
    pub permissions: PermissionSet,
}

/// The calling identity after resolution. Immutable; produced once per request
/// and cached by the resolver, never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedUser {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub permissions: PermissionSet,
}

impl From<User> for ResolvedUser {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            permissions: user.permissions,
        }
    }
}

/// Raw identity claims as the identity source hands them over.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentityClaims {
    pub provider: String,
    pub external_id: String,
    pub name: String,
    pub email: String,
}

/// Registration payload for a first-time caller.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub external_id: String,
    pub provider: String,
    pub name: String,
    pub email: String,
    pub permissions: PermissionSet,
}
