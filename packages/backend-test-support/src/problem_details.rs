//! Problem Details test helpers for backend testing
//!
//! Utilities for asserting Problem Details responses in integration tests
//! without depending on backend types.

use actix_web::http::header::HeaderMap;
use actix_web::http::StatusCode;
use serde::{Deserialize, Serialize};

/// Local ProblemDetails struct that matches the backend's structure
#[derive(Debug, Deserialize, Serialize)]
pub struct ProblemDetailsLike {
    #[serde(rename = "type")]
    pub type_: String,
    pub title: String,
    pub status: u16,
    pub detail: String,
    pub code: String,
    pub trace_id: String,
}

/// Assert that an error response conforms to the stable error contract.
///
/// Validates:
/// - HTTP status matches expected
/// - `Content-Type` is `application/problem+json`
/// - `x-trace-id` header exists and matches the body's `trace_id`
/// - `WWW-Authenticate: Bearer` is present on 401 and absent otherwise
/// - `code` and `detail` match expected values
pub fn assert_problem_details_from_parts(
    status: StatusCode,
    headers: &HeaderMap,
    body_bytes: &[u8],
    expected_status: StatusCode,
    expected_code: &str,
    expected_detail: &str,
) -> ProblemDetailsLike {
    assert_eq!(status, expected_status);

    let content_type = headers
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();
    assert!(
        content_type.starts_with("application/problem+json"),
        "Content-Type must be application/problem+json (got {content_type})"
    );

    let body_str =
        std::str::from_utf8(body_bytes).expect("Response body should be valid UTF-8");
    let problem: ProblemDetailsLike = serde_json::from_str(body_str).unwrap_or_else(|_| {
        panic!("Failed to parse error body as ProblemDetails. Raw body: {body_str}")
    });

    let trace_id_header = headers
        .get("x-trace-id")
        .expect("x-trace-id header should be present")
        .to_str()
        .expect("x-trace-id header should be valid UTF-8");
    assert_eq!(
        problem.trace_id, trace_id_header,
        "trace_id in body should match x-trace-id header"
    );

    let www_auth = headers.get("www-authenticate");
    if expected_status == StatusCode::UNAUTHORIZED {
        let www_auth = www_auth.expect("401 responses must have WWW-Authenticate header");
        assert_eq!(www_auth.to_str().unwrap(), "Bearer");
    } else {
        assert!(
            www_auth.is_none(),
            "{expected_status} responses must not have WWW-Authenticate header"
        );
    }

    assert_eq!(problem.code, expected_code);
    assert_eq!(problem.detail, expected_detail);
    assert_eq!(problem.status, expected_status.as_u16());
    assert!(
        problem.type_.ends_with(expected_code),
        "type should end with the error code (got {})",
        problem.type_
    );

    problem
}

/// Assert that a `ServiceResponse` conforms to the stable error contract.
pub async fn assert_problem_details(
    resp: actix_web::dev::ServiceResponse<actix_web::body::BoxBody>,
    expected_status: StatusCode,
    expected_code: &str,
    expected_detail: &str,
) -> ProblemDetailsLike {
    let status = resp.status();
    let headers = resp.headers().clone();
    let body = actix_web::test::read_body(resp).await;

    assert_problem_details_from_parts(
        status,
        &headers,
        &body,
        expected_status,
        expected_code,
        expected_detail,
    )
}
