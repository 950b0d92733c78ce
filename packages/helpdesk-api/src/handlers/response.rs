//! JSON envelopes and response builders.

use hyper::{body::Bytes, Response};
use serde::Serialize;

use crate::router::RouterError;

/// Success envelope: `{"success": true, "data": ...}`.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: T,
}

/// Error body inside [`ErrorResponse`].
#[derive(Debug, Serialize)]
pub struct ApiError {
    /// HTTP status code as string
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// Error envelope: `{"success": false, "error": {...}}`.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: ApiError,
}

pub fn success_response<T: Serialize>(data: T) -> ApiResponse<T> {
    ApiResponse {
        success: true,
        data,
    }
}

pub fn error_response(code: u16, message: String, details: Option<String>) -> ErrorResponse {
    ErrorResponse {
        success: false,
        error: ApiError {
            code: code.to_string(),
            message,
            details,
        },
    }
}

/// Serializes `data` into a success envelope with the given status.
pub fn json_response<T: Serialize>(status: u16, data: T) -> Result<Response<Bytes>, RouterError> {
    let body = serde_json::to_vec(&success_response(data))
        .map_err(|e| RouterError::InternalError(format!("Failed to serialize response: {}", e)))?;
    Response::builder()
        .status(status)
        .header("Content-Type", "application/json")
        .body(Bytes::from(body))
        .map_err(|e| RouterError::InternalError(format!("Failed to build response: {}", e)))
}

/// Builds an error envelope response. Falls back to a plain 500 if the
/// envelope itself cannot be built.
pub fn error_json_response(status: u16, message: String, details: Option<String>) -> Response<Bytes> {
    let body = serde_json::to_vec(&error_response(status, message, details)).unwrap_or_else(|e| {
        format!(
            "{{\"success\":false,\"error\":{{\"code\":\"500\",\"message\":\"Failed to serialize error: {}\"}}}}",
            e
        )
        .into_bytes()
    });

    let mut response = Response::new(Bytes::from(body));
    match hyper::StatusCode::from_u16(status) {
        Ok(code) => *response.status_mut() = code,
        Err(_) => *response.status_mut() = hyper::StatusCode::INTERNAL_SERVER_ERROR,
    }
    response.headers_mut().insert(
        hyper::header::CONTENT_TYPE,
        hyper::header::HeaderValue::from_static("application/json"),
    );
    response
}
