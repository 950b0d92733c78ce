//! Shared site setup for integration tests.

use serde_json::Value;

use helpdesk_core::config::DeskConfig;
use helpdesk_core::fixtures;
use helpdesk_core::store::{Record, RecordStore};
use helpdesk_core::{Session, Site};

pub const AGENT: &str = "agent@example.com";
pub const MANAGER: &str = "manager@example.com";

pub fn record(value: Value) -> Record {
    value.as_object().cloned().expect("record literal must be an object")
}

/// Site with the built-in fixtures and one agent user.
pub fn site() -> Site {
    let site = Site::new(&DeskConfig::default());
    fixtures::install(&site).unwrap();
    site.permissions.assign_role(AGENT, "Agent").unwrap();
    site
}

pub fn agent() -> Session {
    Session::new(AGENT)
}

/// Inserts `count` tickets named "1".."count", modified one minute apart.
pub fn insert_tickets(site: &Site, count: usize) {
    for i in 1..=count {
        let status = if i % 3 == 0 { "Closed" } else { "Open" };
        site.database
            .insert(
                "HD Ticket",
                record(serde_json::json!({
                    "name": i.to_string(),
                    "subject": format!("Ticket {}", i),
                    "status": status,
                    "raised_by": format!("customer{}@example.com", i),
                    "modified": format!("2024-01-01 10:{:02}:00.000000", i % 60),
                })),
            )
            .unwrap();
    }
}
