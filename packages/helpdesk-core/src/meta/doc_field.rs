//! Field definition within a doctype.

use serde::{Deserialize, Serialize};

use super::FieldType;

/// Field definition within a doctype, either from the base schema or attached
/// later as a custom field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocField {
    /// Column name records are keyed by
    pub fieldname: String,
    /// Field kind
    pub fieldtype: FieldType,
    /// Human readable label
    #[serde(default)]
    pub label: Option<String>,
    /// Kind-specific options (link target, select choices)
    #[serde(default)]
    pub options: Option<String>,
    /// Hidden fields are never offered as filters
    #[serde(default)]
    pub hidden: bool,
    /// Row identity of the field definition itself
    #[serde(default)]
    pub name: String,
    /// Anchor field a custom field is placed after
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub insert_after: Option<String>,
}

impl DocField {
    /// Creates a visible field with a label.
    ///
    /// # Arguments
    /// * `fieldname` - Column name
    /// * `fieldtype` - Field kind
    /// * `label` - Display label
    pub fn new(fieldname: &str, fieldtype: FieldType, label: &str) -> Self {
        Self {
            fieldname: fieldname.to_string(),
            fieldtype,
            label: Some(label.to_string()),
            options: None,
            hidden: false,
            name: String::new(),
            insert_after: None,
        }
    }

    /// Creates an unlabelled layout field (section or column break).
    pub fn layout(fieldname: &str, fieldtype: FieldType) -> Self {
        Self {
            label: None,
            ..Self::new(fieldname, fieldtype, "")
        }
    }

    /// Sets the options string.
    pub fn with_options(mut self, options: &str) -> Self {
        self.options = Some(options.to_string());
        self
    }

    /// Marks the field hidden.
    pub fn hidden(mut self) -> Self {
        self.hidden = true;
        self
    }

    /// Places a custom field after the given anchor.
    pub fn after(mut self, anchor: &str) -> Self {
        self.insert_after = Some(anchor.to_string());
        self
    }

    /// Label, treating an empty label as missing.
    pub fn label(&self) -> Option<&str> {
        self.label.as_deref().filter(|label| !label.is_empty())
    }

    /// True when the field has both a label and a fieldname.
    pub fn is_describable(&self) -> bool {
        self.label().is_some() && !self.fieldname.is_empty()
    }
}
