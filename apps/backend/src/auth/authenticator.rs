//! Per-request authentication: bearer token → verified claims → principal.
//!
//! Every path through [`RequestAuthenticator::authenticate`] ends in an
//! [`AuthOutcome`]; nothing here returns an error to the transport. Anything
//! short of `Authenticated` leaves the request without a principal and the
//! extractors reject it at the protected boundary.

use std::time::SystemTime;

use crate::auth::identity::{AuthError, IdentityResolver};
use crate::auth::principal::Principal;
use crate::auth::token::{TokenCodec, TokenError};

const BEARER_PREFIX: &str = "Bearer ";

#[derive(Debug)]
pub enum AuthOutcome {
    /// No usable bearer credential on the request.
    NoToken,
    /// A token was presented but did not verify.
    TokenRejected(TokenError),
    /// Token verified but the identity could not be resolved.
    IdentityRejected(AuthError),
    Authenticated(Principal),
}

impl AuthOutcome {
    pub fn into_principal(self) -> Option<Principal> {
        match self {
            AuthOutcome::Authenticated(principal) => Some(principal),
            AuthOutcome::NoToken
            | AuthOutcome::TokenRejected(_)
            | AuthOutcome::IdentityRejected(_) => None,
        }
    }

    /// Short label for logs. Never includes the token or username.
    pub fn label(&self) -> &'static str {
        match self {
            AuthOutcome::NoToken => "no_token",
            AuthOutcome::TokenRejected(TokenError::Expired) => "token_expired",
            AuthOutcome::TokenRejected(TokenError::BadSignature) => "token_bad_signature",
            AuthOutcome::TokenRejected(_) => "token_malformed",
            AuthOutcome::IdentityRejected(AuthError::AccountDisabled) => "account_disabled",
            AuthOutcome::IdentityRejected(AuthError::Store(_)) => "store_error",
            AuthOutcome::IdentityRejected(_) => "identity_not_found",
            AuthOutcome::Authenticated(_) => "authenticated",
        }
    }
}

/// Pull the token out of an `Authorization` header value. Only the literal
/// `Bearer ` scheme is accepted; an empty token counts as absent.
pub fn bearer_token(header: Option<&str>) -> Option<&str> {
    let token = header?.strip_prefix(BEARER_PREFIX)?.trim();
    (!token.is_empty()).then_some(token)
}

pub struct RequestAuthenticator<'a> {
    codec: &'a TokenCodec,
    resolver: IdentityResolver<'a>,
}

impl<'a> RequestAuthenticator<'a> {
    pub fn new(codec: &'a TokenCodec, resolver: IdentityResolver<'a>) -> Self {
        Self { codec, resolver }
    }

    pub async fn authenticate(&self, authorization: Option<&str>, now: SystemTime) -> AuthOutcome {
        let Some(token) = bearer_token(authorization) else {
            return AuthOutcome::NoToken;
        };

        let claims = match self.codec.verify(token, now) {
            Ok(claims) => claims,
            Err(e) => return AuthOutcome::TokenRejected(e),
        };

        match self.resolver.resolve(&claims.sub).await {
            Ok(principal) => AuthOutcome::Authenticated(principal),
            Err(e) => AuthOutcome::IdentityRejected(e),
        }
    }
}
