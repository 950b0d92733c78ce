//! Integration tests for the helpdesk core.
//!
//! Sections:
//! 1. Field catalog
//! 2. List views
//! 3. Ticket type seeding
//! 4. Snapshot persistence

pub mod field_catalog_tests;
pub mod helpers;
pub mod list_view_tests;
pub mod persistence_tests;
pub mod ticket_type_seed_tests;
