//! Snapshot persistence tests.

use std::fs;

use ntest::timeout;
use serde_json::json;
use tempfile::tempdir;

use helpdesk_core::config::DeskConfig;
use helpdesk_core::meta::{DocField, FieldType, SchemaRegistry};
use helpdesk_core::ops::{get_list_data, ListRequest};
use helpdesk_core::persistence::SnapshotManager;
use helpdesk_core::seed::{create_ootb_ticket_types, TICKET_TYPE_DOCTYPE};
use helpdesk_core::store::RecordStore;
use helpdesk_core::DeskError;

use super::helpers::{agent, insert_tickets, AGENT};

fn config(dir: &std::path::Path) -> DeskConfig {
    DeskConfig {
        data_dir: dir.to_path_buf(),
        persistence_retry_delay_ms: 0,
        ..Default::default()
    }
}

#[timeout(5000)]
#[test]
fn test_missing_snapshot_bootstraps_fixtures() {
    let temp_dir = tempdir().unwrap();
    let config = config(temp_dir.path());
    let manager = SnapshotManager::new(&config);

    assert!(manager.load().unwrap().is_none());
    let site = manager.open_site(&config).unwrap();
    assert!(site.registry.get_meta("HD Ticket").is_ok());
    assert!(site.registry.controller("HD Ticket").is_some());
}

#[timeout(5000)]
#[test]
fn test_snapshot_survives_restart() {
    let temp_dir = tempdir().unwrap();
    let config = config(temp_dir.path());
    let manager = SnapshotManager::new(&config);

    let site = manager.open_site(&config).unwrap();
    site.permissions.assign_role(AGENT, "Agent").unwrap();
    site.registry
        .add_custom_field("HD Ticket", DocField::new("region", FieldType::Data, "Region"))
        .unwrap();
    insert_tickets(&site, 4);
    create_ootb_ticket_types(site.database.as_ref()).unwrap();
    manager.save(&site).unwrap();
    assert!(!temp_dir.path().join("site.json.tmp").exists());

    let restored = manager.open_site(&config).unwrap();
    assert_eq!(restored.database.record_count("HD Ticket"), 4);
    assert!(restored.database.exists(TICKET_TYPE_DOCTYPE, "Incident").unwrap());
    assert!(restored
        .registry
        .get_meta("HD Ticket")
        .unwrap()
        .get_field("region")
        .is_some());

    // Grants and controllers are back: the agent gets the ticket layout.
    let payload =
        get_list_data(&restored.services(), &agent(), &ListRequest::new("HD Ticket")).unwrap();
    assert_eq!(payload.columns[0].key, "subject");
    assert_eq!(payload.total_count, 4);
}

#[timeout(5000)]
#[test]
fn test_corrupted_snapshot_is_rejected() {
    let temp_dir = tempdir().unwrap();
    let config = config(temp_dir.path());
    let manager = SnapshotManager::new(&config);

    let site = manager.open_site(&config).unwrap();
    insert_tickets(&site, 2);
    manager.save(&site).unwrap();

    let contents = fs::read_to_string(manager.path()).unwrap();
    let mut snapshot: serde_json::Value = serde_json::from_str(&contents).unwrap();
    snapshot["records"]["HD Ticket"][0]["subject"] = json!("tampered");
    fs::write(manager.path(), serde_json::to_string(&snapshot).unwrap()).unwrap();

    let result = manager.open_site(&config);
    assert!(matches!(result, Err(DeskError::DataCorruption(_))));
}

#[timeout(5000)]
#[test]
fn test_unsupported_version() {
    let temp_dir = tempdir().unwrap();
    let config = config(temp_dir.path());
    let manager = SnapshotManager::new(&config);
    fs::write(
        manager.path(),
        r#"{"version": 2, "doctypes": [], "records": {}, "checksum": 0}"#,
    )
    .unwrap();
    assert!(matches!(
        manager.load(),
        Err(DeskError::SerializationError(_))
    ));
}
