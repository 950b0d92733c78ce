//! Matchit routing configuration.

use std::sync::Arc;

use hyper::{body::Bytes, Method, Request, Response};
use matchit::Router as MatchitRouter;

use crate::handlers;
use helpdesk_core::config::DeskConfig;
use helpdesk_core::Services;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Collaborators handed to every operation
    pub services: Services,
    /// Service configuration
    pub config: Arc<DeskConfig>,
}

/// HTTP request router.
pub struct Router {
    inner: MatchitRouter<RouteHandler>,
    state: AppState,
}

impl Router {
    /// Creates a router serving the health check and the RPC methods.
    ///
    /// # Errors
    /// `InternalError` if a route pattern is rejected.
    pub fn new(services: Services, config: Arc<DeskConfig>) -> Result<Self, RouterError> {
        let mut router = MatchitRouter::new();
        for (path, handler) in [
            ("/health", RouteHandler::Health),
            ("/api/method/{method}", RouteHandler::Method),
        ] {
            router.insert(path, handler).map_err(|e| {
                RouterError::InternalError(format!("Failed to insert {} route: {}", path, e))
            })?;
        }

        Ok(Self {
            inner: router,
            state: AppState { services, config },
        })
    }

    /// Routes an incoming request to its handler.
    ///
    /// Unknown paths answer 404 directly; handler failures are returned as
    /// `RouterError` for the server to render.
    pub async fn route(
        &self,
        req: Request<hyper::body::Incoming>,
    ) -> Result<Response<Bytes>, RouterError> {
        let path = req.uri().path().to_string();

        match self.inner.at(&path) {
            Ok(matched) => {
                let handler = *matched.value;
                handler.handle(req, matched.params, self.state.clone()).await
            }
            Err(_) => {
                tracing::debug!("No route for {} {}", req.method(), path);
                Err(RouterError::NotFound(format!("No route found for {}", path)))
            }
        }
    }
}

/// Route handler.
#[derive(Debug, Clone, Copy)]
enum RouteHandler {
    Health,
    Method,
}

impl RouteHandler {
    async fn handle(
        &self,
        req: Request<hyper::body::Incoming>,
        params: matchit::Params<'_, '_>,
        state: AppState,
    ) -> Result<Response<Bytes>, RouterError> {
        match self {
            RouteHandler::Health => {
                if req.method() == Method::GET {
                    handlers::health()
                } else {
                    Err(RouterError::MethodNotAllowed)
                }
            }
            RouteHandler::Method => {
                if req.method() == Method::GET || req.method() == Method::POST {
                    let method = params.get("method").unwrap_or_default().to_string();
                    handlers::call_method(req, &method, state).await
                } else {
                    Err(RouterError::MethodNotAllowed)
                }
            }
        }
    }
}

/// Router error type.
#[derive(Debug, Clone, PartialEq)]
pub enum RouterError {
    MethodNotAllowed,
    InternalError(String),
    Timeout,
    BadRequest(String),
    NotFound(String),
    Forbidden(String),
}

impl RouterError {
    /// HTTP status of the error.
    pub fn status(&self) -> u16 {
        match self {
            RouterError::BadRequest(_) => 400,
            RouterError::Forbidden(_) => 403,
            RouterError::NotFound(_) => 404,
            RouterError::MethodNotAllowed => 405,
            RouterError::Timeout => 408,
            RouterError::InternalError(_) => 500,
        }
    }
}

impl std::fmt::Display for RouterError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RouterError::MethodNotAllowed => write!(f, "Method Not Allowed"),
            RouterError::InternalError(msg) => write!(f, "Internal Error: {}", msg),
            RouterError::Timeout => write!(f, "Request Timeout"),
            RouterError::BadRequest(msg) => write!(f, "Bad Request: {}", msg),
            RouterError::NotFound(msg) => write!(f, "Not Found: {}", msg),
            RouterError::Forbidden(msg) => write!(f, "Forbidden: {}", msg),
        }
    }
}

impl std::error::Error for RouterError {}

impl From<RouterError> for Response<Bytes> {
    fn from(err: RouterError) -> Self {
        let message = match &err {
            RouterError::MethodNotAllowed => "Method Not Allowed".to_string(),
            RouterError::Timeout => "Request Timeout".to_string(),
            RouterError::InternalError(msg)
            | RouterError::BadRequest(msg)
            | RouterError::NotFound(msg)
            | RouterError::Forbidden(msg) => msg.clone(),
        };
        handlers::error_json_response(err.status(), message, None)
    }
}
