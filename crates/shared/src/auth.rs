//! Caller identity and role hierarchy.
//!
//! Session verification happens upstream; requests arrive with an
//! already-verified `{user_id, role}` pair. This module only defines
//! the role ordering that permission checks rely on.

use serde::{Deserialize, Serialize};

use crate::types::UserId;

/// User role in the diocese hierarchy.
///
/// Roles are ordered from lowest to highest privilege.
/// Higher roles can perform all actions of lower roles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Can only view records and balances.
    Viewer = 0,
    /// Parish secretary: can create and manage own pending records.
    Secretary = 1,
    /// Parish priest: can create and manage own pending records.
    Priest = 2,
    /// Diocese accountant: can approve/reject and run payroll.
    Accountant = 3,
    /// Full access, including receipt cancellation.
    SuperAdmin = 4,
}

impl Role {
    /// Parses a role from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "viewer" => Some(Self::Viewer),
            "secretary" => Some(Self::Secretary),
            "priest" => Some(Self::Priest),
            "accountant" => Some(Self::Accountant),
            "super_admin" => Some(Self::SuperAdmin),
            _ => None,
        }
    }

    /// Returns the string representation of the role.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Viewer => "viewer",
            Self::Secretary => "secretary",
            Self::Priest => "priest",
            Self::Accountant => "accountant",
            Self::SuperAdmin => "super_admin",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Verified caller identity attached to every request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Caller {
    /// The authenticated user.
    pub user_id: UserId,
    /// The user's role.
    pub role: Role,
}

impl Caller {
    /// Creates a caller identity.
    #[must_use]
    pub const fn new(user_id: UserId, role: Role) -> Self {
        Self { user_id, role }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_parse() {
        assert_eq!(Role::parse("viewer"), Some(Role::Viewer));
        assert_eq!(Role::parse("SECRETARY"), Some(Role::Secretary));
        assert_eq!(Role::parse("Priest"), Some(Role::Priest));
        assert_eq!(Role::parse("accountant"), Some(Role::Accountant));
        assert_eq!(Role::parse("super_admin"), Some(Role::SuperAdmin));
        assert_eq!(Role::parse("bishop"), None);
    }

    #[test]
    fn test_role_round_trip() {
        for role in [
            Role::Viewer,
            Role::Secretary,
            Role::Priest,
            Role::Accountant,
            Role::SuperAdmin,
        ] {
            assert_eq!(Role::parse(role.as_str()), Some(role));
        }
    }

    #[test]
    fn test_role_ordering() {
        assert!(Role::Viewer < Role::Secretary);
        assert!(Role::Secretary < Role::Priest);
        assert!(Role::Priest < Role::Accountant);
        assert!(Role::Accountant < Role::SuperAdmin);
    }
}
