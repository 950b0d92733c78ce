//! Core of the helpdesk list service.
//!
//! Provides doctype schemas, an in-memory record store, permission checks,
//! the list operations exposed over RPC, ticket type seeding and snapshot
//! persistence.

pub mod cache;
pub mod config;
pub mod database;
pub mod error;
pub mod fixtures;
pub mod meta;
pub mod ops;
pub mod permission;
pub mod persistence;
pub mod query;
pub mod seed;
pub mod services;
pub mod store;
pub mod view;

pub use error::{DeskError, Result};
pub use permission::Session;
pub use services::{Services, Site};
