//! Whitelisted RPC method handlers.

use hyper::{body::Bytes, Method, Request, Response};
use serde_json::{Map, Value};

use crate::router::{AppState, RouterError};
use helpdesk_core::ops::{self, ListRequest};
use helpdesk_core::{DeskError, Services, Session};

use super::request_utils::{
    map_desk_error_to_router_error, parse_body_params, parse_query_params,
    read_request_body_with_timeout, session_from_headers, wait_for_task_with_timeout,
};
use super::response::json_response;

/// Dotted prefix callers may put in front of a method name.
pub const METHOD_PREFIX: &str = "helpdesk.api.doc.";

/// Methods callable over `/api/method/{method}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WhitelistedMethod {
    GetFilterableFields,
    GetListData,
    GetTicketsList,
    SortOptions,
}

impl WhitelistedMethod {
    /// Resolves a method name, with or without [`METHOD_PREFIX`].
    pub fn resolve(name: &str) -> Option<Self> {
        match name.strip_prefix(METHOD_PREFIX).unwrap_or(name) {
            "get_filterable_fields" => Some(Self::GetFilterableFields),
            "get_list_data" => Some(Self::GetListData),
            "get_tickets_list" => Some(Self::GetTicketsList),
            "sort_options" => Some(Self::SortOptions),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::GetFilterableFields => "get_filterable_fields",
            Self::GetListData => "get_list_data",
            Self::GetTicketsList => "get_tickets_list",
            Self::SortOptions => "sort_options",
        }
    }
}

/// Calls a whitelisted method.
///
/// # Endpoint
/// `GET /api/method/{method}?doctype=HD+Ticket`
/// `POST /api/method/{method}` with a JSON object body
///
/// The caller is named by the `x-helpdesk-user` header; requests without it
/// run as `Guest`.
///
/// # Response
/// - **200 OK**: `{"success": true, "data": ...}` with the method result
///
/// # Errors
/// - **400 Bad Request**: malformed arguments, filters, ordering or layout
/// - **403 Forbidden**: caller lacks read permission on the doctype
/// - **404 Not Found**: unknown method or doctype
/// - **408 Request Timeout**: body or method exceeded its timeout
///
/// # Example
/// ```bash
/// curl -X POST http://localhost:8080/api/method/get_list_data \
///   -H "x-helpdesk-user: agent@example.com" \
///   -d '{"doctype": "HD Ticket", "filters": {"status": "Open"}}'
/// ```
pub async fn call_method(
    req: Request<hyper::body::Incoming>,
    method: &str,
    state: AppState,
) -> Result<Response<Bytes>, RouterError> {
    let whitelisted = WhitelistedMethod::resolve(method)
        .ok_or_else(|| RouterError::NotFound(format!("Method '{}' is not whitelisted", method)))?;
    let session = session_from_headers(req.headers());

    let args = if req.method() == Method::GET {
        parse_query_params(req.uri().query())
    } else {
        let body = read_request_body_with_timeout(req, state.config.request_timeout_ms).await?;
        parse_body_params(&body)?
    };

    tracing::debug!(
        "{} called {} with {} argument(s)",
        session.user,
        whitelisted.as_str(),
        args.len()
    );

    let services = state.services.clone();
    let default_page_length = state.config.default_page_length;
    let task = tokio::task::spawn_blocking(move || {
        dispatch(&services, &session, whitelisted, args, default_page_length)
    });
    let result = wait_for_task_with_timeout(task, state.config.response_timeout_ms).await?;

    let data = result.map_err(map_desk_error_to_router_error)?;
    json_response(200, data)
}

/// Runs a whitelisted method against the services and serializes its result.
///
/// # Errors
/// `ValidationError` when `doctype` is missing or the arguments do not form a
/// list request, plus whatever the operation itself returns.
pub fn dispatch(
    services: &Services,
    session: &Session,
    method: WhitelistedMethod,
    args: Map<String, Value>,
    default_page_length: usize,
) -> helpdesk_core::Result<Value> {
    let doctype = args
        .get("doctype")
        .and_then(Value::as_str)
        .filter(|doctype| !doctype.trim().is_empty())
        .map(str::to_string)
        .ok_or_else(|| DeskError::validation("doctype is required"))?;

    let value = match method {
        WhitelistedMethod::GetFilterableFields => {
            serde_json::to_value(ops::get_filterable_fields(services, session, &doctype)?)?
        }
        WhitelistedMethod::SortOptions => {
            serde_json::to_value(ops::sort_options(services, session, &doctype)?)?
        }
        WhitelistedMethod::GetListData => {
            let request = list_request(args, default_page_length)?;
            serde_json::to_value(ops::get_list_data(services, session, &request)?)?
        }
        WhitelistedMethod::GetTicketsList => {
            let request = list_request(args, default_page_length)?;
            serde_json::to_value(ops::get_tickets_list(services, session, &request)?)?
        }
    };
    Ok(value)
}

fn list_request(
    args: Map<String, Value>,
    default_page_length: usize,
) -> helpdesk_core::Result<ListRequest> {
    let mut request: ListRequest = serde_json::from_value(Value::Object(args))
        .map_err(|e| DeskError::validation(format!("invalid list arguments: {}", e)))?;
    if request.page_length.is_none() {
        request.page_length = Some(default_page_length);
    }
    Ok(request)
}
