//! Ticket type seeding and the ticket type allow-list.

use std::collections::BTreeSet;

use serde::Serialize;
use serde_json::{json, Value};

use crate::error::Result;
use crate::query::{ListQuery, Operator, OrderBy, Predicate};
use crate::store::{Record, RecordStore};
use crate::view::IDENTITY_FIELD;

/// Doctype of ticket types (sub-categories).
pub const TICKET_TYPE_DOCTYPE: &str = "HD Ticket Type";

/// Doctype of parent ticket types (categories).
pub const PARENT_TICKET_TYPE_DOCTYPE: &str = "HD Parent Ticket Type";

/// Ticket type assigned when a ticket has none.
pub const DEFAULT_TICKET_TYPE: &str = "Unspecified";

/// Ticket types shipped with every site.
pub const TICKET_TYPES: [&str; 3] = ["Question", "Bug", "Incident"];

/// Parent ticket types that stay enabled, each with its enabled ticket types.
pub const ENABLED_TICKET_TYPES: &[(&str, &[&str])] = &[
    ("Funds", &["Add Funds", "Withdrawal Funds"]),
    (
        "Email Issue",
        &["Contract Mail", "Mail password reset", "Margin Statement Mail"],
    ),
    (
        "Employee",
        &[
            "Employee creation",
            "CTCL related",
            "Other Modifications",
            "Salary/Incentive related",
            "Location related",
        ],
    ),
    (
        "Investment Products",
        &[
            "Mutual Fund",
            "Wealth Basket / PMS",
            "IPO",
            "Unlisted Shares",
            "SLBM",
            "Insurance",
            "Corporate Bonds, NCD, SGB",
        ],
    ),
    ("Monitoring", &["Server", "Services", "Websites"]),
    (
        "My Account",
        &[
            "Account Opening",
            "Account Modification",
            "Account Closure",
            "Brokerage related",
            "Reactivation",
            "Transfer of Securities (DIS)",
            "Transfer of Securities (DRF)",
            "Branch related issue",
            "Ledger related",
            "Deposite related",
            "Payout related",
            "Service Related issue",
        ],
    ),
    (
        "Partner Related",
        &[
            "Brokerage sharing related",
            "My registration related",
            "Brokerage payout related",
            "Tech Excel Support",
            "Space related",
            "Service Related issue",
        ],
    ),
    (
        "Platform and Tools",
        &[
            "Jainam Web Trading",
            "Jainam App Trading",
            "Trading Software EXE based",
            "Back Office App",
            "Jainam Portal Reports & back office",
            "API",
            "Backoffice related",
            "Trading Software related",
            "Smart Greek",
            "Smart RMS",
            "Smart Delta",
            "Server related issue",
        ],
    ),
    (
        "Technical Support",
        &[
            "CPU NOT WORKING",
            "KEYBOARD & MOUSE NOT WORKING",
            "MONITOR NOT WORKING",
            "New System",
            "Other Query",
            "PRINTER NOT WORKING",
            "Provide System",
            "Software Installation",
            "System Issue",
            "System Shifting",
            "TechExcel - Backoffice",
            "TechExcel API",
            "Virtual Server",
            "Development/Devops",
        ],
    ),
    (
        "Trading related",
        &[
            "Auction",
            "Corporate Action",
            "Pledge",
            "Unpledge",
            "Limit",
            "Penalty & Charges",
        ],
    ),
];

/// Outcome of [`disable_ticket_types`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DisableReport {
    /// Parent ticket types disabled
    pub parent_types_disabled: usize,
    /// Ticket types disabled
    pub ticket_types_disabled: usize,
}

/// Creates the [`DEFAULT_TICKET_TYPE`] system type unless it already exists.
///
/// # Returns
/// `true` if the type was inserted.
pub fn create_fallback_ticket_type(store: &dyn RecordStore) -> Result<bool> {
    if store.exists(TICKET_TYPE_DOCTYPE, DEFAULT_TICKET_TYPE)? {
        tracing::debug!("Fallback ticket type already present");
        return Ok(false);
    }
    store.insert(TICKET_TYPE_DOCTYPE, ticket_type(DEFAULT_TICKET_TYPE, true))?;
    tracing::info!("Created fallback ticket type {}", DEFAULT_TICKET_TYPE);
    Ok(true)
}

/// Creates every built-in ticket type that does not exist yet.
///
/// Each type is checked on its own, so types missing after an earlier
/// partial run are still created.
///
/// # Returns
/// Names of the inserted types.
pub fn create_ootb_ticket_types(store: &dyn RecordStore) -> Result<Vec<String>> {
    let mut created = Vec::new();
    for name in TICKET_TYPES {
        if store.exists(TICKET_TYPE_DOCTYPE, name)? {
            continue;
        }
        store.insert(TICKET_TYPE_DOCTYPE, ticket_type(name, false))?;
        created.push(name.to_string());
    }
    tracing::info!("Created {} built-in ticket types", created.len());
    Ok(created)
}

/// Disables parent ticket types and ticket types missing from
/// [`ENABLED_TICKET_TYPES`].
///
/// Each doctype is updated in one atomic batch built from its own query.
pub fn disable_ticket_types(store: &dyn RecordStore) -> Result<DisableReport> {
    let parents: BTreeSet<&str> = ENABLED_TICKET_TYPES
        .iter()
        .map(|(parent, _)| *parent)
        .collect();
    let children: BTreeSet<&str> = ENABLED_TICKET_TYPES
        .iter()
        .flat_map(|(_, children)| children.iter().copied())
        .collect();

    let report = DisableReport {
        parent_types_disabled: disable_outside(store, PARENT_TICKET_TYPE_DOCTYPE, &parents)?,
        ticket_types_disabled: disable_outside(store, TICKET_TYPE_DOCTYPE, &children)?,
    };
    tracing::info!(
        "Disabled {} parent ticket types and {} ticket types",
        report.parent_types_disabled,
        report.ticket_types_disabled
    );
    Ok(report)
}

/// Sets `disabled = 1` on every `doctype` record not named in `enabled`.
fn disable_outside(
    store: &dyn RecordStore,
    doctype: &str,
    enabled: &BTreeSet<&str>,
) -> Result<usize> {
    let query = ListQuery {
        fields: vec![IDENTITY_FIELD.to_string()],
        predicate: Predicate::condition(
            IDENTITY_FIELD,
            Operator::NotIn,
            Value::Array(enabled.iter().map(|name| json!(name)).collect()),
        )?,
        order_by: OrderBy::default(),
        page_length: None,
    };
    let names: Vec<String> = store
        .get_list(doctype, &query)?
        .iter()
        .filter_map(|record| record.get(IDENTITY_FIELD)?.as_str().map(str::to_string))
        .collect();
    if names.is_empty() {
        return Ok(0);
    }
    store.set_value_many(doctype, &names, "disabled", json!(1))
}

fn ticket_type(name: &str, is_system: bool) -> Record {
    let mut record = Record::new();
    record.insert(IDENTITY_FIELD.to_string(), json!(name));
    record.insert("is_system".to_string(), json!(is_system as u8));
    record.insert("disabled".to_string(), json!(0));
    record
}
