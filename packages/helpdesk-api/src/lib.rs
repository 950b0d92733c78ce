//! HTTP server for the helpdesk list operations.
//!
//! Exposes the whitelisted RPC methods under `/api/method/{method}` and a
//! health check, with JSON request and response bodies.

pub mod handlers;
pub mod router;
pub mod server;

pub use router::{AppState, Router, RouterError};
pub use server::{serve_listener, Server};
