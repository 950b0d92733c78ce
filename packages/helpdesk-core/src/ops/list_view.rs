//! List view projection: column and row resolution, record fetch and the
//! field metadata list views render with.
//!
//! Two entry points share the layout pipeline:
//! - [`get_list_data`] fetches through the generic record listing
//! - [`get_tickets_list`] fetches the tickets visible to a manager

use std::sync::Arc;

use serde::de::{DeserializeOwned, Error as _};
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::error::{DeskError, Result};
use crate::meta::{DocMeta, FieldType};
use crate::permission::{check_permission, PermissionType, Session};
use crate::query::{ListQuery, Operator, OrderBy, Predicate, DEFAULT_ORDER_BY};
use crate::services::Services;
use crate::store::Record;
use crate::view::{ColumnSpec, ListField, ListPayload, RowSpec, IDENTITY_FIELD};

/// Page length used when a request does not carry one.
pub const DEFAULT_PAGE_LENGTH: usize = 20;

/// Doctype whose `reports_to_email` links staff to their manager.
pub const EMPLOYEE_DOCTYPE: &str = "Employee";

/// Doctype of pending assignments.
pub const TODO_DOCTYPE: &str = "ToDo";

/// Parameters of a list-view request.
///
/// `filters`, `columns` and `rows` accept either JSON values or JSON text.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ListRequest {
    pub doctype: String,
    #[serde(default)]
    pub filters: Value,
    #[serde(default)]
    pub order_by: Option<String>,
    /// Zero lifts the limit
    #[serde(default, deserialize_with = "lenient_page_length")]
    pub page_length: Option<usize>,
    #[serde(default)]
    pub columns: Value,
    #[serde(default)]
    pub rows: Value,
}

impl ListRequest {
    /// Request with every optional parameter left at its default.
    pub fn new(doctype: &str) -> Self {
        Self {
            doctype: doctype.to_string(),
            filters: Value::Null,
            order_by: None,
            page_length: None,
            columns: Value::Null,
            rows: Value::Null,
        }
    }

    pub fn with_filters(mut self, filters: Value) -> Self {
        self.filters = filters;
        self
    }

    pub fn with_order_by(mut self, order_by: &str) -> Self {
        self.order_by = Some(order_by.to_string());
        self
    }

    pub fn with_page_length(mut self, page_length: usize) -> Self {
        self.page_length = Some(page_length);
        self
    }

    pub fn with_layout(mut self, columns: Value, rows: Value) -> Self {
        self.columns = columns;
        self.rows = rows;
        self
    }

    fn limit(&self) -> Option<usize> {
        match self.page_length.unwrap_or(DEFAULT_PAGE_LENGTH) {
            0 => None,
            n => Some(n),
        }
    }

    fn order(&self) -> Result<OrderBy> {
        OrderBy::parse(self.order_by.as_deref().unwrap_or(DEFAULT_ORDER_BY))
    }
}

/// Accepts a number, a numeric string or null.
fn lenient_page_length<'de, D>(deserializer: D) -> std::result::Result<Option<usize>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(n)) => n
            .as_u64()
            .map(|n| Some(n as usize))
            .ok_or_else(|| D::Error::custom(format!("invalid page_length {}", n))),
        Some(Value::String(s)) if s.trim().is_empty() => Ok(None),
        Some(Value::String(s)) => s
            .trim()
            .parse::<usize>()
            .map(Some)
            .map_err(|_| D::Error::custom(format!("invalid page_length '{}'", s))),
        Some(other) => Err(D::Error::custom(format!("invalid page_length {}", other))),
    }
}

/// Columns and rows after defaults and reconciliation, before the standard
/// fields are appended.
#[derive(Debug)]
struct ResolvedLayout {
    meta: Arc<DocMeta>,
    columns: Vec<ColumnSpec>,
    rows: RowSpec,
}

/// Lists records of a doctype with the layout a list view renders them in.
///
/// # Errors
/// `PermissionDenied` without read access, `DocTypeNotFound` for unknown
/// doctypes, `ValidationError` for malformed filters, ordering, columns or rows.
pub fn get_list_data(
    services: &Services,
    session: &Session,
    request: &ListRequest,
) -> Result<ListPayload> {
    let meta = services.schema.get_meta(&request.doctype)?;
    check_permission(
        services.permissions.as_ref(),
        session,
        &request.doctype,
        PermissionType::Read,
    )?;
    let layout = resolve_layout(services, meta, request)?;

    let predicate = Predicate::from_filters(&request.filters)?;
    predicate.validate(&layout.meta)?;
    let order_by = request.order()?;
    order_by.validate(&layout.meta)?;

    let query = ListQuery {
        fields: layout.rows.as_slice().to_vec(),
        predicate,
        order_by,
        page_length: request.limit(),
    };
    let data = services.store.get_list(&request.doctype, &query)?;
    let total_count = services.store.count(&request.doctype, &query.predicate)?;

    tracing::debug!(
        "Listed {} of {} {} records",
        data.len(),
        total_count,
        request.doctype
    );
    Ok(finish(layout, data, total_count))
}

/// Lists the tickets visible to a manager.
///
/// The manager is the `owner` equality in `filters`. Visible are records
/// raised by the manager, raised by an employee reporting to the manager, or
/// referenced by a ToDo allocated to the manager. Other filters are ignored.
/// Records come back whole and `total_count` is always 0.
///
/// # Errors
/// As [`get_list_data`], plus `ValidationError` when `filters.owner` is
/// missing or not a string.
pub fn get_tickets_list(
    services: &Services,
    session: &Session,
    request: &ListRequest,
) -> Result<ListPayload> {
    let meta = services.schema.get_meta(&request.doctype)?;
    check_permission(
        services.permissions.as_ref(),
        session,
        &request.doctype,
        PermissionType::Read,
    )?;

    let filters = Predicate::from_filters(&request.filters)?;
    let manager = filters
        .equality_value("owner")
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| DeskError::validation("filters.owner must name the manager"))?;

    let layout = resolve_layout(services, meta, request)?;
    let order_by = request.order()?;
    order_by.validate(&layout.meta)?;

    let query = ListQuery {
        fields: Vec::new(),
        predicate: manager_predicate(services, &manager)?,
        order_by,
        page_length: request.limit(),
    };
    let data = services.store.get_list(&request.doctype, &query)?;

    tracing::debug!(
        "Manager {} sees {} {} records",
        manager,
        data.len(),
        request.doctype
    );
    Ok(finish(layout, data, 0))
}

/// `raised_by = manager OR raised_by IN reports OR name IN allocated ToDos`.
fn manager_predicate(services: &Services, manager: &str) -> Result<Predicate> {
    let reports = column_values(
        services,
        EMPLOYEE_DOCTYPE,
        IDENTITY_FIELD,
        Predicate::eq("reports_to_email", manager),
    )?;
    let allocated = column_values(
        services,
        TODO_DOCTYPE,
        "reference_name",
        Predicate::eq("allocated_to", manager),
    )?;

    Ok(Predicate::or(vec![
        Predicate::condition("raised_by", Operator::In, Value::Array(reports))?,
        Predicate::condition(IDENTITY_FIELD, Operator::In, Value::Array(allocated))?,
        Predicate::eq("raised_by", manager),
    ]))
}

/// Non-null values of one field over the records matching `predicate`.
fn column_values(
    services: &Services,
    doctype: &str,
    field: &str,
    predicate: Predicate,
) -> Result<Vec<Value>> {
    let query = ListQuery {
        fields: vec![field.to_string()],
        predicate,
        order_by: OrderBy::default(),
        page_length: None,
    };
    Ok(services
        .store
        .get_list(doctype, &query)?
        .into_iter()
        .filter_map(|mut record| record.remove(field))
        .filter(|value| !value.is_null())
        .collect())
}

/// Resolves columns and rows: caller layout, built-in defaults or the
/// doctype's own defaults, then every column key and the identity field
/// added to rows.
fn resolve_layout(
    services: &Services,
    meta: Arc<DocMeta>,
    request: &ListRequest,
) -> Result<ResolvedLayout> {
    let has_columns = is_supplied(&request.columns);
    let has_rows = is_supplied(&request.rows);
    if has_columns != has_rows {
        return Err(DeskError::validation(
            "columns and rows must be supplied together",
        ));
    }
    let is_default = !has_columns;

    let (mut columns, mut rows): (Vec<ColumnSpec>, Vec<String>) = if is_default {
        (Vec::new(), Vec::new())
    } else {
        (
            parse_input(&request.columns, "columns")?,
            parse_input(&request.rows, "rows")?,
        )
    };
    if columns.is_empty() {
        columns = default_columns();
    }
    if rows.is_empty() {
        rows = vec![IDENTITY_FIELD.to_string()];
    }

    if is_default {
        if let Some(controller) = services.schema.controller(&request.doctype) {
            let defaults = controller.default_list_data();
            tracing::debug!("Using default list layout of {}", request.doctype);
            columns = defaults.columns;
            rows = defaults.rows;
        }
    }

    let mut rows = RowSpec::new(rows);
    for column in &columns {
        rows.ensure(&column.key);
    }
    rows.ensure(IDENTITY_FIELD);

    if let Some(unknown) = rows
        .as_slice()
        .iter()
        .find(|row| !meta.is_valid_fieldname(row))
    {
        return Err(DeskError::validation(format!(
            "Unknown field '{}' in rows for '{}'",
            unknown, meta.name
        )));
    }

    Ok(ResolvedLayout {
        meta,
        columns,
        rows,
    })
}

/// Builds the payload: describable schema fields plus the standard fields.
fn finish(layout: ResolvedLayout, data: Vec<Record>, total_count: usize) -> ListPayload {
    let ResolvedLayout {
        meta,
        columns,
        mut rows,
    } = layout;

    let mut fields: Vec<ListField> = meta
        .all_fields()
        .into_iter()
        .filter(|field| !field.fieldtype.is_no_value() && field.is_describable())
        .map(|field| ListField {
            label: field.label().unwrap_or_default().to_string(),
            field_type: field.fieldtype.clone(),
            value: field.fieldname.clone(),
            options: field.options.clone(),
        })
        .collect();

    for standard in standard_fields() {
        rows.ensure(&standard.value);
        if !fields.contains(&standard) {
            fields.push(standard);
        }
    }

    ListPayload {
        row_count: data.len(),
        data,
        columns,
        rows: rows.into_vec(),
        fields,
        total_count,
    }
}

/// Null, blank text and empty arrays count as not supplied.
fn is_supplied(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::String(text) => !text.trim().is_empty(),
        Value::Array(items) => !items.is_empty(),
        _ => true,
    }
}

fn parse_input<T: DeserializeOwned>(value: &Value, what: &str) -> Result<T> {
    let parsed = match value {
        Value::String(text) => serde_json::from_str(text),
        other => serde_json::from_value(other.clone()),
    };
    parsed.map_err(|e| DeskError::validation(format!("Malformed {}: {}", what, e)))
}

/// Columns used when neither the caller nor the doctype provides any.
pub fn default_columns() -> Vec<ColumnSpec> {
    vec![
        ColumnSpec::new("Name", FieldType::Data, IDENTITY_FIELD, "16rem"),
        ColumnSpec::new("Last Modified", FieldType::Datetime, "modified", "8rem"),
    ]
}

/// Bookkeeping fields every list view can show.
pub fn standard_fields() -> [ListField; 6] {
    [
        ListField::new("Name", FieldType::Data, IDENTITY_FIELD),
        ListField::new("Created On", FieldType::Datetime, "creation"),
        ListField::new("Last Modified", FieldType::Datetime, "modified"),
        ListField::new("Modified By", FieldType::Link, "modified_by").with_options("User"),
        ListField::new("Assigned To", FieldType::Text, "_assign"),
        ListField::new("Owner", FieldType::Link, "owner").with_options("User"),
    ]
}
