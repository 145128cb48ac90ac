//! Protected-boundary extractors.
//!
//! A handler that takes [`Principal`] requires authentication; one that takes
//! [`Authorized<P>`] additionally requires the principal to hold a role in
//! `P`. A missing principal is always the same bare 401, whatever the reason
//! the authenticator had for not attaching one.

use std::marker::PhantomData;
use std::ops::Deref;

use actix_web::dev::Payload;
use actix_web::{FromRequest, HttpMessage, HttpRequest};
use futures_util::future::{ready, Ready};
use tracing::warn;

use crate::auth::authorization::{is_permitted, RoleSet};
use crate::auth::principal::Principal;
use crate::error::AppError;

fn principal_from(req: &HttpRequest) -> Result<Principal, AppError> {
    req.extensions()
        .get::<Principal>()
        .cloned()
        .ok_or_else(AppError::unauthorized)
}

impl FromRequest for Principal {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(principal_from(req))
    }
}

/// Principal whose role is in the set `P`.
#[derive(Debug, Clone)]
pub struct Authorized<P: RoleSet> {
    principal: Principal,
    _roles: PhantomData<P>,
}

impl<P: RoleSet> Authorized<P> {
    pub fn into_inner(self) -> Principal {
        self.principal
    }
}

impl<P: RoleSet> Deref for Authorized<P> {
    type Target = Principal;

    fn deref(&self) -> &Self::Target {
        &self.principal
    }
}

impl<P: RoleSet> FromRequest for Authorized<P> {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(principal_from(req).and_then(|principal| {
            if is_permitted(&principal, P::ROLES) {
                Ok(Authorized {
                    principal,
                    _roles: PhantomData,
                })
            } else {
                warn!(
                    user_id = %principal.user_id,
                    role = %principal.role,
                    path = %req.path(),
                    "access denied"
                );
                Err(AppError::forbidden())
            }
        }))
    }
}
