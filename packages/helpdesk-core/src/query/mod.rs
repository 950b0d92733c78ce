//! Filters, ordering and paging for record listings.

mod order;
mod predicate;
mod value;

pub use order::{OrderBy, SortKey, DEFAULT_ORDER_BY};
pub use predicate::{Condition, Operator, Predicate};

use crate::store::Record;

/// Parameters of a record listing.
#[derive(Debug, Clone, Default)]
pub struct ListQuery {
    /// Fields to project; empty returns whole records
    pub fields: Vec<String>,
    /// Record filter
    pub predicate: Predicate,
    /// Result ordering
    pub order_by: OrderBy,
    /// Maximum number of records to return
    pub page_length: Option<usize>,
}

impl ListQuery {
    /// Projects a record onto the requested fields. Absent fields come back as null.
    pub fn project(&self, record: &Record) -> Record {
        if self.fields.is_empty() {
            return record.clone();
        }
        self.fields
            .iter()
            .map(|field| {
                let value = record.get(field).cloned().unwrap_or(serde_json::Value::Null);
                (field.clone(), value)
            })
            .collect()
    }
}
