//! Record store interface.

use serde_json::Value;

use crate::error::Result;
use crate::query::{ListQuery, Predicate};

/// A record: field name to JSON value. The identity field is `name`.
pub type Record = serde_json::Map<String, Value>;

/// Storage of records grouped by doctype.
pub trait RecordStore: Send + Sync {
    /// Lists records of `doctype` matching the query, ordered and paged.
    ///
    /// An empty result is not an error.
    fn get_list(&self, doctype: &str, query: &ListQuery) -> Result<Vec<Record>>;

    /// Counts records of `doctype` matching `predicate`, ignoring paging.
    fn count(&self, doctype: &str, predicate: &Predicate) -> Result<usize>;

    /// Returns true if a record named `name` exists in `doctype`.
    fn exists(&self, doctype: &str, name: &str) -> Result<bool>;

    /// Inserts a new record, stamping bookkeeping fields that are missing.
    ///
    /// # Errors
    /// `DuplicateEntry` if the name is taken, `ValidationError` if it has no name.
    fn insert(&self, doctype: &str, record: Record) -> Result<()>;

    /// Sets `field` to `value` on every named record as one atomic batch.
    ///
    /// Either every record is updated or, if any name is missing, none is.
    ///
    /// # Returns
    /// Number of records updated.
    fn set_value_many(&self, doctype: &str, names: &[String], field: &str, value: Value)
        -> Result<usize>;

    /// Names of the doctypes holding at least one record, sorted.
    fn doctype_names(&self) -> Result<Vec<String>>;
}
