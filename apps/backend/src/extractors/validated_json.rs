use std::future::Future;
use std::ops::Deref;
use std::pin::Pin;

use actix_web::dev::Payload;
use actix_web::{FromRequest, HttpRequest};
use bytes::BytesMut;
use futures_util::StreamExt;
use serde::de::DeserializeOwned;
use serde_json::error::Category;
use tracing::debug;

use crate::error::AppError;
use crate::errors::ErrorCode;

/// Request bodies larger than this are rejected before parsing.
const MAX_BODY_BYTES: usize = 64 * 1024;

/// JSON body extractor whose failures render as Problem Details
/// (`400 BAD_REQUEST`) instead of actix's plain-text errors.
#[derive(Debug)]
pub struct ValidatedJson<T>(pub T);

impl<T> ValidatedJson<T> {
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T> Deref for ValidatedJson<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<T> FromRequest for ValidatedJson<T>
where
    T: DeserializeOwned + 'static,
{
    type Error = AppError;
    type Future = Pin<Box<dyn Future<Output = Result<Self, Self::Error>>>>;

    fn from_request(_req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let mut payload = payload.take();

        Box::pin(async move {
            let mut body = BytesMut::new();
            while let Some(chunk) = payload.next().await {
                let chunk = chunk.map_err(|e| {
                    debug!(error = %e, "failed to read request body");
                    AppError::bad_request(ErrorCode::BadRequest, "Failed to read request body")
                })?;
                if body.len() + chunk.len() > MAX_BODY_BYTES {
                    return Err(AppError::bad_request(
                        ErrorCode::BadRequest,
                        "Request body too large",
                    ));
                }
                body.extend_from_slice(&chunk);
            }

            // Field values (passwords included) never reach the log.
            serde_json::from_slice::<T>(&body)
                .map(ValidatedJson)
                .map_err(|e| {
                    debug!(category = ?e.classify(), body_size = body.len(), "JSON body rejected");
                    AppError::bad_request(ErrorCode::BadRequest, describe(&e))
                })
        })
    }
}

fn describe(error: &serde_json::Error) -> String {
    match error.classify() {
        Category::Syntax => format!("Invalid JSON at line {}", error.line()),
        Category::Eof => "Invalid JSON: unexpected end of input".to_string(),
        Category::Data => "Invalid JSON: missing or mistyped fields".to_string(),
        Category::Io => "Invalid JSON: could not read body".to_string(),
    }
}
