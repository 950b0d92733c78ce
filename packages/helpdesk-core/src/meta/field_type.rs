//! Field kinds and the kind-based rules used by list resolution.

use serde::{Deserialize, Serialize};

/// Kind of a doctype field, serialized under its display name (e.g. `"Long Text"`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum FieldType {
    Check,
    Data,
    Float,
    Int,
    Currency,
    Percent,
    Link,
    DynamicLink,
    LongText,
    Select,
    SmallText,
    TextEditor,
    Text,
    Date,
    Datetime,
    Time,
    Duration,
    Rating,
    Attach,
    AttachImage,
    Table,
    TableMultiSelect,
    SectionBreak,
    ColumnBreak,
    TabBreak,
    Html,
    Button,
    Image,
    Fold,
    Heading,
    /// Any kind not modelled above, kept verbatim
    Other(String),
}

/// Kinds whose fields may be offered as list filters.
const FILTERABLE: [FieldType; 10] = [
    FieldType::Check,
    FieldType::Data,
    FieldType::Float,
    FieldType::Int,
    FieldType::Link,
    FieldType::LongText,
    FieldType::Select,
    FieldType::SmallText,
    FieldType::TextEditor,
    FieldType::Text,
];

impl FieldType {
    /// Display name of the kind.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Check => "Check",
            Self::Data => "Data",
            Self::Float => "Float",
            Self::Int => "Int",
            Self::Currency => "Currency",
            Self::Percent => "Percent",
            Self::Link => "Link",
            Self::DynamicLink => "Dynamic Link",
            Self::LongText => "Long Text",
            Self::Select => "Select",
            Self::SmallText => "Small Text",
            Self::TextEditor => "Text Editor",
            Self::Text => "Text",
            Self::Date => "Date",
            Self::Datetime => "Datetime",
            Self::Time => "Time",
            Self::Duration => "Duration",
            Self::Rating => "Rating",
            Self::Attach => "Attach",
            Self::AttachImage => "Attach Image",
            Self::Table => "Table",
            Self::TableMultiSelect => "Table MultiSelect",
            Self::SectionBreak => "Section Break",
            Self::ColumnBreak => "Column Break",
            Self::TabBreak => "Tab Break",
            Self::Html => "HTML",
            Self::Button => "Button",
            Self::Image => "Image",
            Self::Fold => "Fold",
            Self::Heading => "Heading",
            Self::Other(name) => name,
        }
    }

    /// Returns true for layout-only kinds that never carry a value.
    pub fn is_no_value(&self) -> bool {
        matches!(
            self,
            Self::SectionBreak
                | Self::ColumnBreak
                | Self::TabBreak
                | Self::Html
                | Self::Table
                | Self::TableMultiSelect
                | Self::Button
                | Self::Image
                | Self::Fold
                | Self::Heading
        )
    }

    /// Returns true if fields of this kind may be used as list filters.
    pub fn is_filterable(&self) -> bool {
        FILTERABLE.contains(self)
    }
}

impl From<&str> for FieldType {
    fn from(name: &str) -> Self {
        match name {
            "Check" => Self::Check,
            "Data" => Self::Data,
            "Float" => Self::Float,
            "Int" => Self::Int,
            "Currency" => Self::Currency,
            "Percent" => Self::Percent,
            "Link" => Self::Link,
            "Dynamic Link" => Self::DynamicLink,
            "Long Text" => Self::LongText,
            "Select" => Self::Select,
            "Small Text" => Self::SmallText,
            "Text Editor" => Self::TextEditor,
            "Text" => Self::Text,
            "Date" => Self::Date,
            "Datetime" => Self::Datetime,
            "Time" => Self::Time,
            "Duration" => Self::Duration,
            "Rating" => Self::Rating,
            "Attach" => Self::Attach,
            "Attach Image" => Self::AttachImage,
            "Table" => Self::Table,
            "Table MultiSelect" => Self::TableMultiSelect,
            "Section Break" => Self::SectionBreak,
            "Column Break" => Self::ColumnBreak,
            "Tab Break" => Self::TabBreak,
            "HTML" => Self::Html,
            "Button" => Self::Button,
            "Image" => Self::Image,
            "Fold" => Self::Fold,
            "Heading" => Self::Heading,
            other => Self::Other(other.to_string()),
        }
    }
}

impl From<String> for FieldType {
    fn from(name: String) -> Self {
        FieldType::from(name.as_str())
    }
}

impl From<FieldType> for String {
    fn from(kind: FieldType) -> Self {
        kind.as_str().to_string()
    }
}

impl std::fmt::Display for FieldType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
