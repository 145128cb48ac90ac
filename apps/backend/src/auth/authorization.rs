//! Route-level role sets.
//!
//! A handler declares the roles it admits by its extractor type, e.g.
//! `Authorized<AdminOnly>`. The check compares the principal's authorities
//! with the authorities of the listed roles; there is no role hierarchy.

use crate::auth::principal::Principal;
use crate::auth::role::Role;

pub trait RoleSet {
    const ROLES: &'static [Role];
}

/// `{ADMIN}`
#[derive(Debug)]
pub struct AdminOnly;

/// `{ADMIN, USER}`
#[derive(Debug)]
pub struct AnyRole;

impl RoleSet for AdminOnly {
    const ROLES: &'static [Role] = &[Role::Admin];
}

impl RoleSet for AnyRole {
    const ROLES: &'static [Role] = &[Role::Admin, Role::User];
}

pub fn is_permitted(principal: &Principal, roles: &[Role]) -> bool {
    roles
        .iter()
        .any(|role| principal.has_authority(role.authority()))
}
