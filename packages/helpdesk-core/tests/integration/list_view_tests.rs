//! List view tests: layout resolution, fetch and the manager view.

use ntest::timeout;
use serde_json::json;

use helpdesk_core::ops::{
    get_filterable_fields, get_list_data, get_tickets_list, sort_options, ListRequest,
};
use helpdesk_core::store::RecordStore;
use helpdesk_core::view::ListPayload;
use helpdesk_core::{DeskError, Session};

use super::helpers::{agent, insert_tickets, record, site, MANAGER};

const STANDARD_ROWS: [&str; 6] = ["name", "creation", "modified", "modified_by", "_assign", "owner"];

fn assert_rows_cover_columns(payload: &ListPayload) {
    assert!(payload.rows.iter().any(|row| row == "name"));
    for column in &payload.columns {
        assert!(
            payload.rows.contains(&column.key),
            "rows lack column key {}",
            column.key
        );
    }
    for standard in STANDARD_ROWS {
        assert!(payload.rows.iter().any(|row| row == standard));
    }
}

#[timeout(5000)]
#[test]
fn test_default_layout_comes_from_controller() {
    let site = site();
    insert_tickets(&site, 5);

    let request = ListRequest::new("HD Ticket").with_page_length(2);
    let payload = get_list_data(&site.services(), &agent(), &request).unwrap();

    assert_eq!(payload.columns[0].key, "subject");
    assert_eq!(&payload.rows[..2], &["name", "subject"]);
    assert_rows_cover_columns(&payload);
    assert_eq!(payload.row_count, 2);
    assert_eq!(payload.data.len(), 2);
    assert_eq!(payload.total_count, 5);

    // modified desc: ticket 5 is the most recent.
    assert_eq!(payload.data[0]["name"], json!("5"));
    assert_eq!(payload.data[0]["subject"], json!("Ticket 5"));
    // Standard rows added after the fetch are not projected.
    assert!(payload.data[0].get("owner").is_none());
}

#[timeout(5000)]
#[test]
fn test_builtin_default_without_controller() {
    let site = site();
    let payload =
        get_list_data(&site.services(), &agent(), &ListRequest::new("HD Ticket Type")).unwrap();

    let keys: Vec<&str> = payload.columns.iter().map(|c| c.key.as_str()).collect();
    assert_eq!(keys, vec!["name", "modified"]);
    assert_eq!(payload.columns[0].width, "16rem");
    assert_eq!(&payload.rows[..2], &["name", "modified"]);
    assert_eq!(payload.row_count, 0);
    assert_eq!(payload.total_count, 0);
}

#[timeout(5000)]
#[test]
fn test_caller_layout_overrides_defaults() {
    let site = site();
    insert_tickets(&site, 3);

    let request = ListRequest::new("HD Ticket").with_layout(
        json!("[{\"label\": \"Status\", \"type\": \"Select\", \"key\": \"status\", \"width\": \"8rem\"}]"),
        json!(["raised_by"]),
    );
    let payload = get_list_data(&site.services(), &agent(), &request).unwrap();

    assert_eq!(payload.columns.len(), 1);
    assert_eq!(&payload.rows[..3], &["raised_by", "status", "name"]);
    assert_rows_cover_columns(&payload);
    let first = &payload.data[0];
    assert_eq!(first.len(), 3);
    assert!(first.contains_key("raised_by"));
}

#[timeout(5000)]
#[test]
fn test_half_supplied_layout_is_rejected() {
    let site = site();
    let request = ListRequest::new("HD Ticket").with_layout(json!(["subject"]), json!(null));
    let result = get_list_data(&site.services(), &agent(), &request);
    assert!(matches!(result, Err(DeskError::ValidationError(_))));

    let malformed = ListRequest::new("HD Ticket").with_layout(json!("[{"), json!("[\"name\"]"));
    let result = get_list_data(&site.services(), &agent(), &malformed);
    assert!(matches!(result, Err(DeskError::ValidationError(_))));
}

#[timeout(5000)]
#[test]
fn test_unknown_fields_are_rejected() {
    let site = site();
    let bad_row = ListRequest::new("HD Ticket").with_layout(json!([]), json!(null));
    // Empty array and null both count as absent.
    assert!(get_list_data(&site.services(), &agent(), &bad_row).is_ok());

    let bad_row = ListRequest::new("HD Ticket").with_layout(
        json!([{"label": "X", "type": "Data", "key": "no_such_field"}]),
        json!(["name"]),
    );
    assert!(matches!(
        get_list_data(&site.services(), &agent(), &bad_row),
        Err(DeskError::ValidationError(_))
    ));

    let bad_filter =
        ListRequest::new("HD Ticket").with_filters(json!({"no_such_field": "x"}));
    assert!(matches!(
        get_list_data(&site.services(), &agent(), &bad_filter),
        Err(DeskError::ValidationError(_))
    ));

    let bad_order = ListRequest::new("HD Ticket").with_order_by("modified; drop");
    assert!(matches!(
        get_list_data(&site.services(), &agent(), &bad_order),
        Err(DeskError::ValidationError(_))
    ));
}

#[timeout(5000)]
#[test]
fn test_filters_and_counts() {
    let site = site();
    insert_tickets(&site, 9);

    let request = ListRequest::new("HD Ticket")
        .with_filters(json!("{\"status\": \"Open\"}"))
        .with_order_by("name asc")
        .with_page_length(4);
    let payload = get_list_data(&site.services(), &agent(), &request).unwrap();
    assert_eq!(payload.total_count, 6);
    assert_eq!(payload.row_count, 4);
    assert!(payload.total_count >= payload.row_count);

    let request = ListRequest::new("HD Ticket")
        .with_filters(json!([["HD Ticket", "subject", "like", "%ticket 1%"]]))
        .with_page_length(0);
    let payload = get_list_data(&site.services(), &agent(), &request).unwrap();
    assert_eq!(payload.total_count, 1);
    assert_eq!(payload.row_count, 1);
}

#[timeout(5000)]
#[test]
fn test_fields_include_standard_descriptors_once() {
    let site = site();
    let payload = get_list_data(&site.services(), &agent(), &ListRequest::new("HD Ticket")).unwrap();

    let values: Vec<&str> = payload.fields.iter().map(|f| f.value.as_str()).collect();
    assert!(!values.contains(&"sla_section"));
    assert!(!values.contains(&"column_break_1"));
    assert!(values.contains(&"feedback_rating"));
    for standard in STANDARD_ROWS {
        assert_eq!(
            values.iter().filter(|v| **v == standard).count(),
            1,
            "{} listed more than once",
            standard
        );
    }

    let json = serde_json::to_value(&payload.fields).unwrap();
    let owner = json
        .as_array()
        .unwrap()
        .iter()
        .find(|f| f["value"] == "owner")
        .unwrap();
    assert_eq!(owner, &json!({"label": "Owner", "type": "Link", "value": "owner", "options": "User"}));
}

#[timeout(5000)]
#[test]
fn test_list_requires_permission() {
    let site = site();
    let result = get_list_data(
        &site.services(),
        &Session::new("nobody@example.com"),
        &ListRequest::new("HD Ticket"),
    );
    assert!(matches!(result, Err(DeskError::PermissionDenied { .. })));
}

fn seed_manager_view(site: &helpdesk_core::Site) {
    insert_tickets(site, 6);
    let db = &site.database;
    db.insert(
        "HD Ticket",
        record(json!({"name": "own", "raised_by": MANAGER, "modified": "2024-02-01 00:00:00"})),
    )
    .unwrap();
    db.insert(
        "Employee",
        record(json!({"name": "customer2@example.com", "reports_to_email": MANAGER})),
    )
    .unwrap();
    db.insert(
        "Employee",
        record(json!({"name": "customer3@example.com", "reports_to_email": "someone@example.com"})),
    )
    .unwrap();
    db.insert(
        "ToDo",
        record(json!({
            "name": "todo-1",
            "allocated_to": MANAGER,
            "reference_type": "HD Ticket",
            "reference_name": "4",
            "status": "Open"
        })),
    )
    .unwrap();
}

#[timeout(5000)]
#[test]
fn test_manager_view() {
    let site = site();
    seed_manager_view(&site);

    let request = ListRequest::new("HD Ticket")
        .with_filters(json!({"owner": MANAGER}))
        .with_order_by("name asc");
    let payload = get_tickets_list(&site.services(), &agent(), &request).unwrap();

    let names: Vec<&str> = payload
        .data
        .iter()
        .map(|r| r["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["2", "4", "own"]);
    assert_eq!(payload.total_count, 0);
    assert_eq!(payload.row_count, 3);
    // Whole records come back.
    assert!(payload.data[0].contains_key("owner"));
    assert_rows_cover_columns(&payload);
}

#[timeout(5000)]
#[test]
fn test_manager_view_needs_owner() {
    let site = site();
    let request = ListRequest::new("HD Ticket").with_filters(json!({"status": "Open"}));
    let result = get_tickets_list(&site.services(), &agent(), &request);
    assert!(matches!(result, Err(DeskError::ValidationError(_))));

    let request = ListRequest::new("HD Ticket").with_filters(json!({"owner": 5}));
    let result = get_tickets_list(&site.services(), &agent(), &request);
    assert!(matches!(result, Err(DeskError::ValidationError(_))));
}

#[timeout(5000)]
#[test]
fn test_sort_options_end_with_standard_keys() {
    let site = site();
    let options = sort_options(&site.services(), &agent(), "ToDo").unwrap();
    let values: Vec<&str> = options.iter().map(|o| o.value.as_str()).collect();
    assert_eq!(
        values,
        vec![
            "status",
            "priority",
            "allocated_to",
            "description",
            "reference_type",
            "reference_name",
            "name",
            "creation",
            "modified",
            "modified_by",
            "owner"
        ]
    );
}

#[timeout(5000)]
#[test]
fn test_unknown_doctype_is_not_found_for_agents() {
    let site = site();
    let services = site.services();

    let list = get_list_data(&services, &agent(), &ListRequest::new("HD Nothing"));
    assert!(matches!(list, Err(DeskError::DocTypeNotFound { .. })), "{:?}", list);

    let manager_view = get_tickets_list(
        &services,
        &agent(),
        &ListRequest::new("HD Nothing").with_filters(json!({"owner": MANAGER})),
    );
    assert!(matches!(manager_view, Err(DeskError::DocTypeNotFound { .. })));

    let fields = get_filterable_fields(&services, &agent(), "HD Nothing");
    assert!(matches!(fields, Err(DeskError::DocTypeNotFound { .. })), "{:?}", fields);

    let options = sort_options(&services, &agent(), "HD Nothing");
    assert!(matches!(options, Err(DeskError::DocTypeNotFound { .. })), "{:?}", options);

    // Known doctypes still require the grant.
    let denied = sort_options(&services, &Session::new("nobody@example.com"), "HD Ticket");
    assert!(matches!(denied, Err(DeskError::PermissionDenied { .. })));
}
