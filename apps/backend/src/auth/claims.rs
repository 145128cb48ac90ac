//! Claims carried by backend-issued bearer tokens.

use serde::{Deserialize, Serialize};

/// JWT payload. `sub` is the username.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Claims {
    pub sub: String,
    /// Issued-at (seconds since epoch)
    pub iat: i64,
    /// Expiry (seconds since epoch)
    pub exp: i64,
}
