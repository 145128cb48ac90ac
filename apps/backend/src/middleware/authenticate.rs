//! Request authentication stage.
//!
//! Runs once per request, before any handler. On success the resolved
//! [`Principal`] is inserted into the request's extensions; on any failure
//! the request simply continues without one. This stage never rejects a
//! request itself. Rejection happens at the extractor boundary.

use std::rc::Rc;

use actix_web::dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::http::header;
use actix_web::{web, Error, HttpMessage};
use futures_util::future::{ready, LocalBoxFuture, Ready};
use tracing::{debug, warn};

use crate::auth::authenticator::{AuthOutcome, RequestAuthenticator};
use crate::auth::identity::{AuthError, IdentityResolver};
use crate::auth::principal::Principal;
use crate::state::app_state::AppState;

pub struct Authenticate;

impl<S, B> Transform<S, ServiceRequest> for Authenticate
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = AuthenticateMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AuthenticateMiddleware {
            service: Rc::new(service),
        }))
    }
}

pub struct AuthenticateMiddleware<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for AuthenticateMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);

        let authorization = req
            .headers()
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .map(str::to_owned);
        let state = req.app_data::<web::Data<AppState>>().cloned();

        Box::pin(async move {
            if let Some(principal) = authenticate(authorization, state).await {
                req.extensions_mut().insert(principal);
            }
            service.call(req).await
        })
    }
}

async fn authenticate(
    authorization: Option<String>,
    state: Option<web::Data<AppState>>,
) -> Option<Principal> {
    // No header means nothing to verify; skip the state lookup entirely.
    authorization.as_ref()?;

    let Some(state) = state else {
        warn!("application state missing; request left unauthenticated");
        return None;
    };

    let resolver = IdentityResolver::new(state.users.as_ref(), &state.passwords);
    let outcome = RequestAuthenticator::new(&state.tokens, resolver)
        .authenticate(authorization.as_deref(), state.clock.now())
        .await;

    match &outcome {
        AuthOutcome::Authenticated(principal) => {
            debug!(user_id = %principal.user_id, role = %principal.role, "request authenticated");
        }
        AuthOutcome::IdentityRejected(AuthError::Store(e)) => {
            warn!(error = %e, "credential store failed during authentication");
        }
        other => debug!(outcome = other.label(), "request not authenticated"),
    }

    outcome.into_principal()
}
