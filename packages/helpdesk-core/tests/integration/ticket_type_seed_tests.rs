//! Ticket type seeding tests.

use ntest::timeout;
use serde_json::json;

use helpdesk_core::query::{ListQuery, Predicate};
use helpdesk_core::seed::{
    create_fallback_ticket_type, create_ootb_ticket_types, disable_ticket_types, DisableReport,
    DEFAULT_TICKET_TYPE, PARENT_TICKET_TYPE_DOCTYPE, TICKET_TYPES, TICKET_TYPE_DOCTYPE,
};
use helpdesk_core::store::RecordStore;

use super::helpers::{record, site};

fn names(store: &dyn RecordStore, doctype: &str, predicate: Predicate) -> Vec<String> {
    let query = ListQuery {
        fields: vec!["name".to_string()],
        predicate,
        order_by: helpdesk_core::query::OrderBy::parse("name asc").unwrap(),
        page_length: None,
    };
    store
        .get_list(doctype, &query)
        .unwrap()
        .iter()
        .map(|r| r["name"].as_str().unwrap().to_string())
        .collect()
}

#[timeout(5000)]
#[test]
fn test_ootb_types_twice_leave_exact_set() {
    let site = site();
    let store = site.database.as_ref();
    store
        .insert(TICKET_TYPE_DOCTYPE, record(json!({"name": "Bug", "is_system": 0})))
        .unwrap();

    create_ootb_ticket_types(store).unwrap();
    create_ootb_ticket_types(store).unwrap();

    let mut expected: Vec<String> = TICKET_TYPES.iter().map(|t| t.to_string()).collect();
    expected.sort();
    assert_eq!(names(store, TICKET_TYPE_DOCTYPE, Predicate::All), expected);
}

#[timeout(5000)]
#[test]
fn test_fallback_type_is_system() {
    let site = site();
    let store = site.database.as_ref();
    assert!(create_fallback_ticket_type(store).unwrap());
    assert!(!create_fallback_ticket_type(store).unwrap());
    assert_eq!(
        names(store, TICKET_TYPE_DOCTYPE, Predicate::eq("is_system", 1)),
        vec![DEFAULT_TICKET_TYPE.to_string()]
    );
}

#[timeout(5000)]
#[test]
fn test_disable_uses_each_doctypes_own_records() {
    let site = site();
    let store = site.database.as_ref();
    for parent in ["Funds", "Legacy", "Monitoring", "Old Stuff"] {
        store
            .insert(PARENT_TICKET_TYPE_DOCTYPE, record(json!({"name": parent, "disabled": 0})))
            .unwrap();
    }
    for child in ["Add Funds", "Server", "Fax", "API"] {
        store
            .insert(TICKET_TYPE_DOCTYPE, record(json!({"name": child, "disabled": 0})))
            .unwrap();
    }

    let report = disable_ticket_types(store).unwrap();
    assert_eq!(
        report,
        DisableReport {
            parent_types_disabled: 2,
            ticket_types_disabled: 1,
        }
    );
    assert_eq!(
        names(store, PARENT_TICKET_TYPE_DOCTYPE, Predicate::eq("disabled", 1)),
        vec!["Legacy".to_string(), "Old Stuff".to_string()]
    );
    assert_eq!(
        names(store, TICKET_TYPE_DOCTYPE, Predicate::eq("disabled", 1)),
        vec!["Fax".to_string()]
    );
}

#[timeout(5000)]
#[test]
fn test_disable_on_empty_tables() {
    let site = site();
    let report = disable_ticket_types(site.database.as_ref()).unwrap();
    assert_eq!(report, DisableReport::default());
}
