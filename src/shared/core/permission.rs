// Ordinal permission model.
//
// Purpose
// - One permission level per resource axis; axes are never folded into a single scalar.
//
// Responsibilities
// - Expose the two derived predicates (`can_read`, `can_modify`) every use case checks.

use serde::{Deserialize, Serialize};

/// Permission level for a single resource axis.
///
/// Ordinal: `None < Read < ReadAndModify`. The derives keep the ordering
/// structural so `can_modify` implies `can_read` by construction.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum UserPermission {
    #[default]
    None,
    Read,
    ReadAndModify,
}

impl UserPermission {
    pub fn can_read(self) -> bool {
        self >= UserPermission::Read
    }

    pub fn can_modify(self) -> bool {
        self == UserPermission::ReadAndModify
    }
}

/// The four independent permission axes carried by every user.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionSet {
    pub entries: UserPermission,
    pub exports: UserPermission,
    pub projects: UserPermission,
    pub users: UserPermission,
}

impl PermissionSet {
    /// Full `ReadAndModify` on all four axes. The first registered admin gets this.
    pub fn full() -> Self {
        Self {
            entries: UserPermission::ReadAndModify,
            exports: UserPermission::ReadAndModify,
            projects: UserPermission::ReadAndModify,
            users: UserPermission::ReadAndModify,
        }
    }

    /// Default grant for a self-registered user: own entries only.
    pub fn entries_only() -> Self {
        Self {
            entries: UserPermission::ReadAndModify,
            exports: UserPermission::None,
            projects: UserPermission::None,
            users: UserPermission::None,
        }
    }

    pub fn is_full(&self) -> bool {
        *self == Self::full()
    }
}
