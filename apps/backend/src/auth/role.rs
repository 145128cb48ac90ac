//! Roles and the authorities they grant.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The two fixed privilege levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    Admin,
    User,
}

/// Authority granted to a principal. Compared against a route's role set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Authority {
    RoleAdmin,
    RoleUser,
}

impl Role {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "ADMIN",
            Role::User => "USER",
        }
    }

    /// Authorities granted by this role. No role implies another's.
    pub const fn authorities(self) -> &'static [Authority] {
        match self {
            Role::Admin => &[Authority::RoleAdmin],
            Role::User => &[Authority::RoleUser],
        }
    }

    /// The authority a route must see to admit this role.
    pub const fn authority(self) -> Authority {
        match self {
            Role::Admin => Authority::RoleAdmin,
            Role::User => Authority::RoleUser,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Authority {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Authority::RoleAdmin => "ROLE_ADMIN",
            Authority::RoleUser => "ROLE_USER",
        }
    }
}

impl fmt::Display for Authority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
