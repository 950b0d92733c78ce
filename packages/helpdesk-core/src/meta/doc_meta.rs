//! Doctype schema: base fields plus custom fields.

use serde::{Deserialize, Serialize};

use super::DocField;
use crate::error::{DeskError, Result};

/// Bookkeeping columns every record carries regardless of its schema.
pub const STANDARD_FIELDNAMES: [&str; 11] = [
    "name",
    "owner",
    "creation",
    "modified",
    "modified_by",
    "docstatus",
    "idx",
    "_assign",
    "_user_tags",
    "_comments",
    "_liked_by",
];

/// Schema of one doctype.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocMeta {
    /// Doctype name (e.g. "HD Ticket")
    pub name: String,
    /// Fields from the base schema, in declaration order
    pub fields: Vec<DocField>,
    /// Fields attached outside the base schema
    #[serde(default)]
    pub custom_fields: Vec<DocField>,
}

impl DocMeta {
    /// Creates a doctype schema from its base fields.
    ///
    /// Fields without a row identity get `"<doctype>-<fieldname>"`.
    pub fn new(name: &str, fields: Vec<DocField>) -> Self {
        let fields = fields
            .into_iter()
            .map(|mut field| {
                if field.name.is_empty() {
                    field.name = format!("{}-{}", name, field.fieldname);
                }
                field
            })
            .collect();
        Self {
            name: name.to_string(),
            fields,
            custom_fields: Vec::new(),
        }
    }

    /// Attaches a custom field.
    ///
    /// # Errors
    /// `ValidationError` if the fieldname is empty or already used by this doctype.
    pub fn add_custom_field(&mut self, mut field: DocField) -> Result<()> {
        if field.fieldname.is_empty() {
            return Err(DeskError::validation(format!(
                "Custom field on '{}' needs a fieldname",
                self.name
            )));
        }
        if self.get_field(&field.fieldname).is_some() {
            return Err(DeskError::validation(format!(
                "Field '{}' already exists in '{}'",
                field.fieldname, self.name
            )));
        }
        if field.name.is_empty() {
            field.name = format!("{}-{}", self.name, field.fieldname);
        }
        self.custom_fields.push(field);
        Ok(())
    }

    /// Looks up a base or custom field by fieldname.
    pub fn get_field(&self, fieldname: &str) -> Option<&DocField> {
        self.fields
            .iter()
            .chain(self.custom_fields.iter())
            .find(|field| field.fieldname == fieldname)
    }

    /// Returns true if `fieldname` can be selected, filtered or sorted on.
    pub fn is_valid_fieldname(&self, fieldname: &str) -> bool {
        STANDARD_FIELDNAMES.contains(&fieldname) || self.get_field(fieldname).is_some()
    }

    /// Full field list: base fields with every custom field placed after its
    /// `insert_after` anchor. Custom fields whose anchor is unknown go last.
    pub fn all_fields(&self) -> Vec<&DocField> {
        let mut ordered: Vec<&DocField> = self.fields.iter().collect();
        let mut trailing = Vec::new();

        for custom in &self.custom_fields {
            let anchor = custom.insert_after.as_deref().and_then(|anchor| {
                ordered
                    .iter()
                    .position(|field| field.fieldname == anchor)
            });
            match anchor {
                Some(index) => ordered.insert(index + 1, custom),
                None => trailing.push(custom),
            }
        }

        ordered.extend(trailing);
        ordered
    }
}
