//! Integration tests for the helpdesk HTTP server.
//!
//! Each test binds a server on an ephemeral port and talks raw HTTP/1.1 to it.

pub mod helpers;
pub mod http_tests;
