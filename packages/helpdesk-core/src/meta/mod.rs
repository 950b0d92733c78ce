//! Doctype schemas, field kinds and the schema registry.

mod controller;
mod doc_field;
mod doc_meta;
mod field_type;
mod registry;

pub use controller::{DefaultListData, HasDefaultListData};
pub use doc_field::DocField;
pub use doc_meta::{DocMeta, STANDARD_FIELDNAMES};
pub use field_type::FieldType;
pub use registry::{InMemorySchemaRegistry, SchemaRegistry};
