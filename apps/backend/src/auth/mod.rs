//! Authentication and authorization pipeline.

pub mod authenticator;
pub mod authorization;
pub mod claims;
pub mod identity;
pub mod password;
pub mod principal;
pub mod role;
pub mod token;

pub use authenticator::{AuthOutcome, RequestAuthenticator};
pub use authorization::{AdminOnly, AnyRole, RoleSet};
pub use identity::{AuthError, IdentityResolver};
pub use principal::Principal;
pub use role::{Authority, Role};
pub use token::{TokenCodec, TokenError};
