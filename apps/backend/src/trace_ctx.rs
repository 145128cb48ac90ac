//! Task-local trace context for web requests.
//!
//! `RequestTrace` scopes the trace id around the downstream future so that
//! error responses rendered anywhere inside the request (handlers,
//! extractors) can stamp the same id into their Problem Details body.
//!
//! Only the trace id lives here. Request identity travels in request
//! extensions, never in task-local or global state.

use tokio::task_local;

const UNKNOWN: &str = "unknown";

task_local! {
    static TRACE_ID: String;
}

/// Get the trace_id for the current task, or `"unknown"` outside a request.
pub fn trace_id() -> String {
    TRACE_ID
        .try_with(|id| id.clone())
        .unwrap_or_else(|_| UNKNOWN.to_string())
}

/// Run a future within a trace context.
pub async fn with_trace_id<F, R>(trace_id: String, future: F) -> R
where
    F: std::future::Future<Output = R>,
{
    TRACE_ID.scope(trace_id, future).await
}
