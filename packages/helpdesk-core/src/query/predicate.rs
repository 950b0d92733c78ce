//! Filter predicates over records.

use regex::Regex;
use serde_json::Value;

use super::value::{as_text, compare, loose_eq};
use crate::error::{DeskError, Result};
use crate::meta::DocMeta;
use crate::store::Record;

/// Comparison operator of a filter condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Eq,
    Ne,
    Gt,
    Lt,
    Ge,
    Le,
    Like,
    NotLike,
    In,
    NotIn,
    Is,
}

impl Operator {
    /// Parses an operator token such as `"not like"` (case-insensitive).
    pub fn parse(token: &str) -> Option<Self> {
        let normalized = token.trim().to_ascii_lowercase();
        let op = match normalized.as_str() {
            "=" | "==" => Self::Eq,
            "!=" | "<>" => Self::Ne,
            ">" => Self::Gt,
            "<" => Self::Lt,
            ">=" => Self::Ge,
            "<=" => Self::Le,
            "like" => Self::Like,
            "not like" => Self::NotLike,
            "in" => Self::In,
            "not in" => Self::NotIn,
            "is" => Self::Is,
            _ => return None,
        };
        Some(op)
    }
}

/// Single `field op value` test.
#[derive(Debug, Clone, PartialEq)]
pub struct Condition {
    pub field: String,
    pub op: Operator,
    pub value: Value,
}

impl Condition {
    /// Creates a condition, checking that `value` suits the operator.
    ///
    /// # Errors
    /// `ValidationError` when the value shape does not fit the operator.
    pub fn new(field: &str, op: Operator, value: Value) -> Result<Self> {
        let field = field.trim();
        if field.is_empty() {
            return Err(DeskError::validation("Filter field name is empty"));
        }
        match op {
            Operator::In | Operator::NotIn => {
                if !matches!(value, Value::Array(_) | Value::String(_)) {
                    return Err(DeskError::validation(format!(
                        "Filter on '{}' expects a list of values",
                        field
                    )));
                }
            }
            Operator::Is => {
                let keyword = value.as_str().map(|s| s.trim().to_ascii_lowercase());
                if !matches!(keyword.as_deref(), Some("set") | Some("not set")) {
                    return Err(DeskError::validation(format!(
                        "Filter 'is' on '{}' expects \"set\" or \"not set\"",
                        field
                    )));
                }
            }
            _ => {
                if matches!(value, Value::Array(_) | Value::Object(_)) {
                    return Err(DeskError::validation(format!(
                        "Filter on '{}' expects a single value",
                        field
                    )));
                }
            }
        }
        Ok(Self {
            field: field.to_string(),
            op,
            value,
        })
    }

    /// Evaluates the condition against a record. Missing fields read as null.
    pub fn matches(&self, record: &Record) -> bool {
        let actual = record.get(&self.field).unwrap_or(&Value::Null);
        match self.op {
            Operator::Eq => loose_eq(actual, &self.value),
            Operator::Ne => !loose_eq(actual, &self.value),
            Operator::Gt => compare(actual, &self.value).is_some_and(|o| o.is_gt()),
            Operator::Lt => compare(actual, &self.value).is_some_and(|o| o.is_lt()),
            Operator::Ge => compare(actual, &self.value).is_some_and(|o| o.is_ge()),
            Operator::Le => compare(actual, &self.value).is_some_and(|o| o.is_le()),
            Operator::Like => like(&as_text(actual), &as_text(&self.value)),
            Operator::NotLike => !like(&as_text(actual), &as_text(&self.value)),
            Operator::In => self.candidates().iter().any(|c| loose_eq(actual, c)),
            Operator::NotIn => !self.candidates().iter().any(|c| loose_eq(actual, c)),
            Operator::Is => {
                let is_set = !as_text(actual).is_empty();
                let wants_set = self
                    .value
                    .as_str()
                    .is_some_and(|s| s.trim().eq_ignore_ascii_case("set"));
                is_set == wants_set
            }
        }
    }

    /// Values of an `in` / `not in` list; strings are split on commas.
    fn candidates(&self) -> Vec<Value> {
        match &self.value {
            Value::Array(items) => items.clone(),
            Value::String(s) => s
                .split(',')
                .map(|item| Value::String(item.trim().to_string()))
                .collect(),
            other => vec![other.clone()],
        }
    }
}

/// Boolean combination of conditions.
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    /// Matches every record
    All,
    Condition(Condition),
    And(Vec<Predicate>),
    Or(Vec<Predicate>),
}

impl Predicate {
    /// A fresh predicate that matches everything.
    pub fn empty() -> Self {
        Predicate::All
    }

    /// `field = value`.
    pub fn eq(field: &str, value: impl Into<Value>) -> Self {
        Predicate::Condition(Condition {
            field: field.to_string(),
            op: Operator::Eq,
            value: value.into(),
        })
    }

    /// Generic condition, validated against the operator.
    pub fn condition(field: &str, op: Operator, value: Value) -> Result<Self> {
        Ok(Predicate::Condition(Condition::new(field, op, value)?))
    }

    /// Parses caller filters.
    ///
    /// Accepted shapes:
    /// - `null`, `""`, `{}` or `[]`: no filtering
    /// - `{"status": "Open", "priority": ["in", ["High", "Urgent"]]}`
    /// - `[["status", "=", "Open"], ["HD Ticket", "priority", "!=", "Low"]]`
    /// - either of the above serialized into a JSON string
    ///
    /// # Errors
    /// `ValidationError` for any other shape or an unknown operator.
    pub fn from_filters(filters: &Value) -> Result<Self> {
        let conditions = match filters {
            Value::Null => Vec::new(),
            Value::String(s) if s.trim().is_empty() => Vec::new(),
            Value::String(s) => {
                let parsed: Value = serde_json::from_str(s).map_err(|e| {
                    DeskError::validation(format!("Filters are not valid JSON: {}", e))
                })?;
                if parsed.is_string() {
                    return Err(DeskError::validation("Filters must be an object or a list"));
                }
                return Self::from_filters(&parsed);
            }
            Value::Object(map) => map
                .iter()
                .map(|(field, value)| parse_mapping_entry(field, value))
                .collect::<Result<Vec<_>>>()?,
            Value::Array(items) => items
                .iter()
                .map(parse_list_entry)
                .collect::<Result<Vec<_>>>()?,
            other => {
                return Err(DeskError::validation(format!(
                    "Filters must be an object or a list, got {}",
                    other
                )))
            }
        };
        Ok(Self::and(
            conditions.into_iter().map(Predicate::Condition).collect(),
        ))
    }

    /// Conjunction, collapsing trivial cases.
    pub fn and(mut parts: Vec<Predicate>) -> Self {
        parts.retain(|part| *part != Predicate::All);
        match parts.len() {
            0 => Predicate::All,
            1 => parts.remove(0),
            _ => Predicate::And(parts),
        }
    }

    /// Disjunction. An empty disjunction matches nothing.
    pub fn or(parts: Vec<Predicate>) -> Self {
        if parts.len() == 1 {
            return parts.into_iter().next().unwrap_or(Predicate::All);
        }
        Predicate::Or(parts)
    }

    /// Evaluates the predicate against a record.
    pub fn matches(&self, record: &Record) -> bool {
        match self {
            Predicate::All => true,
            Predicate::Condition(condition) => condition.matches(record),
            Predicate::And(parts) => parts.iter().all(|part| part.matches(record)),
            Predicate::Or(parts) => parts.iter().any(|part| part.matches(record)),
        }
    }

    /// Collects every field name the predicate refers to.
    pub fn fields(&self) -> Vec<&str> {
        let mut out = Vec::new();
        self.collect_fields(&mut out);
        out
    }

    fn collect_fields<'a>(&'a self, out: &mut Vec<&'a str>) {
        match self {
            Predicate::All => {}
            Predicate::Condition(condition) => out.push(&condition.field),
            Predicate::And(parts) | Predicate::Or(parts) => {
                for part in parts {
                    part.collect_fields(out);
                }
            }
        }
    }

    /// Looks up the value of an equality condition on `field`, if any.
    pub fn equality_value(&self, field: &str) -> Option<&Value> {
        match self {
            Predicate::Condition(c) if c.field == field && c.op == Operator::Eq => Some(&c.value),
            Predicate::And(parts) => parts.iter().find_map(|part| part.equality_value(field)),
            _ => None,
        }
    }

    /// Checks that every referenced field exists on `meta`.
    ///
    /// # Errors
    /// `ValidationError` naming the first unknown field.
    pub fn validate(&self, meta: &DocMeta) -> Result<()> {
        for field in self.fields() {
            if !meta.is_valid_fieldname(field) {
                return Err(DeskError::validation(format!(
                    "Unknown field '{}' in filters for '{}'",
                    field, meta.name
                )));
            }
        }
        Ok(())
    }
}

impl Default for Predicate {
    fn default() -> Self {
        Predicate::empty()
    }
}

fn parse_mapping_entry(field: &str, value: &Value) -> Result<Condition> {
    match value {
        Value::Array(pair) => {
            let op = pair
                .first()
                .and_then(Value::as_str)
                .and_then(Operator::parse)
                .ok_or_else(|| {
                    DeskError::validation(format!(
                        "Filter on '{}' must be [operator, value]",
                        field
                    ))
                })?;
            let operand = match pair.len() {
                2 => pair[1].clone(),
                // `["is", "set"]` style operators sometimes arrive without a value
                1 if op == Operator::Is => Value::String("set".to_string()),
                _ => {
                    return Err(DeskError::validation(format!(
                        "Filter on '{}' must be [operator, value]",
                        field
                    )))
                }
            };
            Condition::new(field, op, operand)
        }
        other => Condition::new(field, Operator::Eq, other.clone()),
    }
}

fn parse_list_entry(entry: &Value) -> Result<Condition> {
    let parts = entry
        .as_array()
        .ok_or_else(|| DeskError::validation(format!("Filter entry {} is not a list", entry)))?;
    let (field, op, value) = match parts.as_slice() {
        [field, op, value] | [_, field, op, value] => (field, op, value),
        _ => {
            return Err(DeskError::validation(format!(
                "Filter entry {} must have 3 or 4 items",
                entry
            )))
        }
    };
    let field = field
        .as_str()
        .ok_or_else(|| DeskError::validation(format!("Filter field {} is not a string", field)))?;
    let op = op
        .as_str()
        .and_then(Operator::parse)
        .ok_or_else(|| DeskError::validation(format!("Unknown filter operator {}", op)))?;
    Condition::new(field, op, value.clone())
}

/// SQL `LIKE` match ignoring case: `%` matches any run, `_` one character.
pub(crate) fn like(text: &str, pattern: &str) -> bool {
    match Regex::new(&like_to_regex(pattern)) {
        Ok(re) => re.is_match(text),
        Err(err) => {
            tracing::warn!("Unusable like pattern {:?}: {}", pattern, err);
            false
        }
    }
}

/// Anchored, case-insensitive regex for a `LIKE` pattern. Every other
/// character is matched literally.
fn like_to_regex(pattern: &str) -> String {
    let mut out = String::with_capacity(pattern.len() + 8);
    out.push_str("(?is)^");
    let mut buf = [0u8; 4];
    for ch in pattern.chars() {
        match ch {
            '%' => out.push_str(".*"),
            '_' => out.push('.'),
            other => out.push_str(&regex::escape(other.encode_utf8(&mut buf))),
        }
    }
    out.push('$');
    out
}
