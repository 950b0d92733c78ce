//! Shapes exchanged with list-view callers: columns, rows, field descriptors
//! and the list payload.

use serde::{Deserialize, Serialize};

use crate::meta::{DocField, FieldType};
use crate::store::Record;

/// Identity field present on every record.
pub const IDENTITY_FIELD: &str = "name";

/// One filterable field as returned by the field catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDescriptor {
    pub fieldname: String,
    pub fieldtype: FieldType,
    pub label: String,
    pub name: String,
    pub options: Option<String>,
}

impl From<&DocField> for FieldDescriptor {
    fn from(field: &DocField) -> Self {
        Self {
            fieldname: field.fieldname.clone(),
            fieldtype: field.fieldtype.clone(),
            label: field.label.clone().unwrap_or_default(),
            name: field.name.clone(),
            options: field.options.clone(),
        }
    }
}

/// One rendered column of a list view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnSpec {
    pub label: String,
    #[serde(rename = "type")]
    pub column_type: FieldType,
    pub key: String,
    #[serde(default)]
    pub width: String,
}

impl ColumnSpec {
    pub fn new(label: &str, column_type: FieldType, key: &str, width: &str) -> Self {
        Self {
            label: label.to_string(),
            column_type,
            key: key.to_string(),
            width: width.to_string(),
        }
    }
}

/// Ordered, duplicate-free set of field keys to fetch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RowSpec(Vec<String>);

impl RowSpec {
    /// Builds a row spec, dropping repeated keys while keeping first positions.
    pub fn new<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut rows = Self::default();
        for key in keys {
            rows.ensure(&key.into());
        }
        rows
    }

    /// Appends `key` unless it is already present.
    pub fn ensure(&mut self, key: &str) {
        if !self.contains(key) {
            self.0.push(key.to_string());
        }
    }

    pub fn contains(&self, key: &str) -> bool {
        self.0.iter().any(|row| row == key)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn into_vec(self) -> Vec<String> {
        self.0
    }
}

/// Describable field of a list payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListField {
    pub label: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    pub value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<String>,
}

impl ListField {
    pub fn new(label: &str, field_type: FieldType, value: &str) -> Self {
        Self {
            label: label.to_string(),
            field_type,
            value: value.to_string(),
            options: None,
        }
    }

    pub fn with_options(mut self, options: &str) -> Self {
        self.options = Some(options.to_string());
        self
    }
}

/// `{label, value}` pair offered as a sort key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortOption {
    pub label: String,
    pub value: String,
}

impl SortOption {
    pub fn new(label: &str, value: &str) -> Self {
        Self {
            label: label.to_string(),
            value: value.to_string(),
        }
    }
}

/// Result of a list-view request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListPayload {
    pub data: Vec<Record>,
    pub columns: Vec<ColumnSpec>,
    pub rows: Vec<String>,
    pub fields: Vec<ListField>,
    pub total_count: usize,
    pub row_count: usize,
}
