//! Field catalog tests.

use ntest::timeout;

use helpdesk_core::meta::{DocField, FieldType};
use helpdesk_core::ops::get_filterable_fields;
use helpdesk_core::{DeskError, Session};

use super::helpers::{agent, site};

#[timeout(5000)]
#[test]
fn test_catalog_keeps_visible_filterable_fields_in_order() {
    let site = site();
    site.registry
        .add_custom_field(
            "HD Ticket",
            DocField::new("region", FieldType::Link, "Region")
                .with_options("Region")
                .after("subject"),
        )
        .unwrap();
    site.registry
        .add_custom_field(
            "HD Ticket",
            DocField::new("internal_note", FieldType::SmallText, "Internal Note").hidden(),
        )
        .unwrap();
    site.registry
        .add_custom_field(
            "HD Ticket",
            DocField::new("due_on", FieldType::Date, "Due On"),
        )
        .unwrap();

    let fields = get_filterable_fields(&site.services(), &agent(), "HD Ticket").unwrap();
    let names: Vec<&str> = fields.iter().map(|f| f.fieldname.as_str()).collect();

    // Base fields first, custom fields after them regardless of insert_after.
    assert_eq!(
        names,
        vec![
            "subject",
            "raised_by",
            "status",
            "priority",
            "ticket_type",
            "agent_group",
            "customer",
            "description",
            "contact",
            "region",
            "_assign",
            "name",
        ]
    );
    assert_eq!(fields[9].name, "HD Ticket-region");
}

#[timeout(5000)]
#[test]
fn test_catalog_requires_read_permission() {
    let site = site();
    let result = get_filterable_fields(&site.services(), &Session::new("Guest"), "HD Ticket");
    assert_eq!(
        result.unwrap_err(),
        DeskError::PermissionDenied {
            user: "Guest".to_string(),
            doctype: "HD Ticket".to_string(),
            ptype: "read",
        }
    );
}

#[timeout(5000)]
#[test]
fn test_catalog_unknown_doctype() {
    let site = site();
    let result = get_filterable_fields(&site.services(), &Session::administrator(), "HD Nothing");
    assert!(matches!(result, Err(DeskError::DocTypeNotFound { .. })));
}

#[timeout(5000)]
#[test]
fn test_catalog_serializes_null_options() {
    let site = site();
    let fields = get_filterable_fields(&site.services(), &agent(), "HD Parent Ticket Type").unwrap();
    let json = serde_json::to_value(&fields).unwrap();
    assert_eq!(
        json[0],
        serde_json::json!({
            "fieldname": "description",
            "fieldtype": "Small Text",
            "label": "Description",
            "name": "HD Parent Ticket Type-description",
            "options": null
        })
    );
    assert_eq!(json.as_array().unwrap().len(), 4);
}
