//! HTTP endpoint implementations.

pub mod request_utils;
pub mod response;
pub mod rpc_handlers;

use hyper::{body::Bytes, Response};
use serde_json::json;

use crate::router::RouterError;

pub use response::{error_json_response, json_response};
pub use rpc_handlers::{call_method, dispatch, WhitelistedMethod};

/// Health check.
///
/// # Endpoint
/// `GET /health`
pub fn health() -> Result<Response<Bytes>, RouterError> {
    json_response(200, json!({"status": "ok"}))
}
