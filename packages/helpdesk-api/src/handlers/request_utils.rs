//! Request utilities for HTTP endpoints.

use http_body_util::BodyExt;
use hyper::header::HeaderMap;
use hyper::{body::Bytes, Request};
use percent_encoding::percent_decode_str;
use serde_json::{Map, Value};
use tokio::task::JoinHandle;
use tokio::time;

use crate::router::RouterError;
use helpdesk_core::{DeskError, Session};

/// Header carrying the calling user.
pub const USER_HEADER: &str = "x-helpdesk-user";

/// User of requests without [`USER_HEADER`].
pub const GUEST_USER: &str = "Guest";

/// Reads the request body, failing with `Timeout` after `timeout_ms`.
pub async fn read_request_body_with_timeout(
    req: Request<hyper::body::Incoming>,
    timeout_ms: u64,
) -> Result<Bytes, RouterError> {
    let timeout_duration = time::Duration::from_millis(timeout_ms);
    let body = time::timeout(timeout_duration, req.collect())
        .await
        .map_err(|_| RouterError::Timeout)?
        .map_err(|e| RouterError::InternalError(format!("Failed to read request body: {}", e)))?;
    Ok(body.to_bytes())
}

/// Waits for a blocking task, failing with `Timeout` after `timeout_ms`.
///
/// A task that times out keeps running to completion; only its result is dropped.
pub async fn wait_for_task_with_timeout<T>(
    task: JoinHandle<T>,
    timeout_ms: u64,
) -> Result<T, RouterError> {
    let timeout_duration = time::Duration::from_millis(timeout_ms);
    time::timeout(timeout_duration, task)
        .await
        .map_err(|_| RouterError::Timeout)?
        .map_err(|e| RouterError::InternalError(format!("Method task failed: {}", e)))
}

/// Maps a `DeskError` onto the HTTP error it answers with.
pub fn map_desk_error_to_router_error(e: DeskError) -> RouterError {
    match e {
        DeskError::PermissionDenied { .. } => RouterError::Forbidden(e.to_string()),
        DeskError::DocTypeNotFound { .. } | DeskError::RecordNotFound { .. } => {
            RouterError::NotFound(e.to_string())
        }
        DeskError::ValidationError(_) | DeskError::DuplicateEntry { .. } => {
            RouterError::BadRequest(e.to_string())
        }
        _ => RouterError::InternalError(format!("Helpdesk error: {}", e)),
    }
}

/// Session of the user named in [`USER_HEADER`], or the guest session.
pub fn session_from_headers(headers: &HeaderMap) -> Session {
    let user = headers
        .get(USER_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|user| !user.is_empty())
        .unwrap_or(GUEST_USER);
    Session::new(user)
}

/// Parses method arguments from a URL query string.
///
/// Each value is parsed as JSON and kept as a string when that fails.
pub fn parse_query_params(query_str: Option<&str>) -> Map<String, Value> {
    let mut params = Map::new();
    let Some(query_str) = query_str else {
        return params;
    };

    for pair in query_str.split('&') {
        let Some((key, encoded_value)) = pair.split_once('=') else {
            continue;
        };
        let key = decode_component(key);
        if key.is_empty() {
            continue;
        }
        let decoded_value = decode_component(encoded_value);
        let json_value = serde_json::from_str(&decoded_value)
            .unwrap_or_else(|_| Value::String(decoded_value.clone()));
        params.insert(key, json_value);
    }
    params
}

fn decode_component(component: &str) -> String {
    percent_decode_str(&component.replace('+', " "))
        .decode_utf8_lossy()
        .into_owned()
}

/// Parses method arguments from a JSON body. An empty body means no arguments.
pub fn parse_body_params(body: &[u8]) -> Result<Map<String, Value>, RouterError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(Map::new());
    }
    match serde_json::from_slice(body) {
        Ok(Value::Object(params)) => Ok(params),
        Ok(_) => Err(RouterError::BadRequest(
            "Request body must be a JSON object".to_string(),
        )),
        Err(e) => Err(RouterError::BadRequest(format!(
            "Failed to parse JSON params: {}",
            e
        ))),
    }
}
