//! Error codes for the deal backend API.
//!
//! Add new codes here; never pass ad-hoc strings as error codes.
//! All codes are SCREAMING_SNAKE_CASE and map 1:1 to the strings that
//! appear in HTTP responses.

use core::fmt;

/// Centralized error codes for the deal backend API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // Authentication & Authorization
    /// Authentication required (missing, invalid or expired credential)
    Unauthorized,
    /// Login failed (unknown user, wrong password or disabled account)
    InvalidCredentials,
    /// Caller's role is not in the route's role set
    Forbidden,

    // Request Validation
    /// Malformed resource identifier
    InvalidId,
    /// Field-level validation failure
    ValidationError,
    /// General bad request error
    BadRequest,

    // Resource Not Found
    DealNotFound,
    UserNotFound,
    NotFound,

    // Conflicts
    UsernameTaken,
    EmailTaken,
    Conflict,

    // System Errors
    /// Backing store unavailable
    StoreUnavailable,
    /// Internal server error
    Internal,
    /// Configuration error
    ConfigError,
}

impl ErrorCode {
    /// Returns the canonical SCREAMING_SNAKE_CASE string for this error code.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Unauthorized => "UNAUTHORIZED",
            Self::InvalidCredentials => "INVALID_CREDENTIALS",
            Self::Forbidden => "FORBIDDEN",

            Self::InvalidId => "INVALID_ID",
            Self::ValidationError => "VALIDATION_ERROR",
            Self::BadRequest => "BAD_REQUEST",

            Self::DealNotFound => "DEAL_NOT_FOUND",
            Self::UserNotFound => "USER_NOT_FOUND",
            Self::NotFound => "NOT_FOUND",

            Self::UsernameTaken => "USERNAME_TAKEN",
            Self::EmailTaken => "EMAIL_TAKEN",
            Self::Conflict => "CONFLICT",

            Self::StoreUnavailable => "STORE_UNAVAILABLE",
            Self::Internal => "INTERNAL",
            Self::ConfigError => "CONFIG_ERROR",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
