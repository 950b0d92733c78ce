//! Optional per-doctype list behaviour.

use crate::view::ColumnSpec;

/// Columns and rows a doctype prefers when the caller supplies neither.
#[derive(Debug, Clone, PartialEq)]
pub struct DefaultListData {
    pub columns: Vec<ColumnSpec>,
    pub rows: Vec<String>,
}

/// Capability implemented by doctype controllers that ship their own default
/// list layout.
pub trait HasDefaultListData: Send + Sync {
    fn default_list_data(&self) -> DefaultListData;
}
