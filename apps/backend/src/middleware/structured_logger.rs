//! Access log. One `request_completed` line per request, levelled by status
//! class, naming the caller when the request was authenticated.
//!
//! Registered outside `Authenticate`, so by the time the response comes back
//! the principal (if any) is in the request's extensions. Headers, tokens and
//! bodies are never logged.

use std::time::Instant;

use actix_web::dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::http::StatusCode;
use actix_web::{Error, HttpMessage};
use futures_util::future::{ready, LocalBoxFuture, Ready};
use tracing::{error, info, warn};
use uuid::Uuid;

use super::request_trace::trace_id_of;
use crate::auth::principal::Principal;
use crate::auth::role::Role;

pub struct StructuredLogger;

impl<S, B> Transform<S, ServiceRequest> for StructuredLogger
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = StructuredLoggerMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(StructuredLoggerMiddleware { service }))
    }
}

pub struct StructuredLoggerMiddleware<S> {
    service: S,
}

/// What the access log records about a finished request.
#[derive(Debug, Clone, PartialEq, Eq)]
struct AccessRecord {
    method: String,
    path: String,
    trace_id: String,
    status: StatusCode,
    duration_us: u64,
    caller: Option<(Uuid, Role)>,
}

impl AccessRecord {
    fn caller_id(&self) -> String {
        self.caller
            .map(|(id, _)| id.to_string())
            .unwrap_or_else(|| "anonymous".to_string())
    }

    fn caller_role(&self) -> &'static str {
        self.caller.map(|(_, role)| role.as_str()).unwrap_or("-")
    }

    fn emit(&self) {
        let method = &self.method;
        let path = &self.path;
        let trace_id = &self.trace_id;
        let duration_us = self.duration_us;
        let status = self.status.as_u16();
        let caller = self.caller_id();
        let role = self.caller_role();

        macro_rules! line {
            ($level:ident) => {
                $level!(
                    http.method = %method,
                    url.path = %path,
                    http.status_code = status,
                    duration_us,
                    trace_id = %trace_id,
                    caller = %caller,
                    role,
                    "request_completed"
                )
            };
        }

        if self.status.is_server_error() {
            line!(error);
        } else if self.status.is_client_error() {
            line!(warn);
        } else {
            line!(info);
        }
    }
}

impl<S, B> Service<ServiceRequest> for StructuredLoggerMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let start = Instant::now();
        let method = req.method().to_string();
        let path = req.path().to_string();
        let trace_id = trace_id_of(&req);

        let fut = self.service.call(req);

        Box::pin(async move {
            let result = fut.await;

            let (status, caller) = match &result {
                Ok(res) => (
                    res.status(),
                    res.request()
                        .extensions()
                        .get::<Principal>()
                        .map(|p| (p.user_id, p.role)),
                ),
                Err(err) => (err.as_response_error().status_code(), None),
            };

            AccessRecord {
                method,
                path,
                trace_id,
                status,
                duration_us: u64::try_from(start.elapsed().as_micros()).unwrap_or(u64::MAX),
                caller,
            }
            .emit();

            result
        })
    }
}
