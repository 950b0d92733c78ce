//! `ORDER BY` expressions for list queries.

use std::cmp::Ordering;

use serde_json::Value;

use super::value::sort_cmp;
use crate::error::{DeskError, Result};
use crate::meta::DocMeta;
use crate::store::Record;

/// Default ordering: most recently modified first.
pub const DEFAULT_ORDER_BY: &str = "modified desc";

/// One sort term.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortKey {
    pub field: String,
    pub descending: bool,
}

/// Ordered list of sort terms.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderBy(Vec<SortKey>);

impl OrderBy {
    /// Parses `"field [asc|desc], ..."`.
    ///
    /// Table qualifiers (`` `tabHD Ticket`.modified ``) are stripped. An empty
    /// expression yields [`DEFAULT_ORDER_BY`].
    ///
    /// # Errors
    /// `ValidationError` for anything that is not a plain field reference with
    /// an optional direction.
    pub fn parse(expression: &str) -> Result<Self> {
        let expression = if expression.trim().is_empty() {
            DEFAULT_ORDER_BY
        } else {
            expression
        };

        let mut keys = Vec::new();
        for term in expression.split(',') {
            let term = term.trim();
            // Only the last token can be a direction; qualifiers may contain spaces.
            let (field, descending) = match term.rsplit_once(char::is_whitespace) {
                Some((field, direction)) if direction.eq_ignore_ascii_case("desc") => {
                    (field.trim(), true)
                }
                Some((field, direction)) if direction.eq_ignore_ascii_case("asc") => {
                    (field.trim(), false)
                }
                _ => (term, false),
            };
            keys.push(SortKey {
                field: unqualify(field)?,
                descending,
            });
        }
        Ok(Self(keys))
    }

    pub fn keys(&self) -> &[SortKey] {
        &self.0
    }

    /// Compares two records by the sort terms in order.
    pub fn compare(&self, a: &Record, b: &Record) -> Ordering {
        for key in &self.0 {
            let left = a.get(&key.field).unwrap_or(&Value::Null);
            let right = b.get(&key.field).unwrap_or(&Value::Null);
            let ordering = sort_cmp(left, right);
            let ordering = if key.descending {
                ordering.reverse()
            } else {
                ordering
            };
            if ordering != Ordering::Equal {
                return ordering;
            }
        }
        Ordering::Equal
    }

    /// Checks that every sort field exists on `meta`.
    pub fn validate(&self, meta: &DocMeta) -> Result<()> {
        for key in &self.0 {
            if !meta.is_valid_fieldname(&key.field) {
                return Err(DeskError::validation(format!(
                    "Unknown field '{}' in order by for '{}'",
                    key.field, meta.name
                )));
            }
        }
        Ok(())
    }
}

impl Default for OrderBy {
    fn default() -> Self {
        Self(vec![SortKey {
            field: "modified".to_string(),
            descending: true,
        }])
    }
}

/// Strips an optional table qualifier and backticks from a field reference.
fn unqualify(reference: &str) -> Result<String> {
    let field = reference
        .rsplit('.')
        .next()
        .unwrap_or(reference)
        .trim_matches('`');
    let valid = !field.is_empty()
        && field
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_');
    if !valid {
        return Err(DeskError::validation(format!(
            "Invalid field reference '{}' in order by",
            reference
        )));
    }
    Ok(field.to_string())
}
