//! In-memory record store holding one table per doctype.

use std::collections::{BTreeMap, HashMap};
use std::sync::RwLock;

use serde_json::Value;

use crate::error::{DeskError, Result};
use crate::query::{ListQuery, Predicate};
use crate::store::{Record, RecordStore};

/// User stamped on records written without an explicit owner.
pub const SYSTEM_USER: &str = "Administrator";

/// Records of one doctype in insertion order, indexed by name.
#[derive(Debug, Default)]
struct RecordTable {
    records: Vec<Record>,
    index: HashMap<String, usize>,
}

impl RecordTable {
    fn push(&mut self, name: String, record: Record) {
        self.index.insert(name, self.records.len());
        self.records.push(record);
    }
}

/// Database container holding the records of every doctype.
#[derive(Debug, Default)]
pub struct Database {
    /// Map of doctype name to its records
    tables: RwLock<HashMap<String, RecordTable>>,
}

impl Database {
    /// Creates a new empty database.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a database from previously dumped records.
    ///
    /// # Errors
    /// `DataCorruption` if a record has no name or a name repeats within a doctype.
    pub fn from_records(records: BTreeMap<String, Vec<Record>>) -> Result<Self> {
        let mut tables = HashMap::with_capacity(records.len());
        for (doctype, rows) in records {
            let mut table = RecordTable::default();
            for record in rows {
                let name = record_name(&record).ok_or_else(|| {
                    DeskError::DataCorruption(format!("{} record without a name", doctype))
                })?;
                if table.index.contains_key(&name) {
                    return Err(DeskError::DataCorruption(format!(
                        "{} '{}' stored twice",
                        doctype, name
                    )));
                }
                table.push(name, record);
            }
            tables.insert(doctype, table);
        }
        Ok(Self {
            tables: RwLock::new(tables),
        })
    }

    /// Copies every record out, grouped by doctype.
    pub fn dump(&self) -> Result<BTreeMap<String, Vec<Record>>> {
        let tables = self.tables.read().map_err(|_| DeskError::LockPoisoned)?;
        Ok(tables
            .iter()
            .map(|(doctype, table)| (doctype.clone(), table.records.clone()))
            .collect())
    }

    /// Fetches a single record by name.
    pub fn get(&self, doctype: &str, name: &str) -> Result<Record> {
        let tables = self.tables.read().map_err(|_| DeskError::LockPoisoned)?;
        tables
            .get(doctype)
            .and_then(|table| table.index.get(name).map(|&i| table.records[i].clone()))
            .ok_or_else(|| DeskError::RecordNotFound {
                doctype: doctype.to_string(),
                name: name.to_string(),
            })
    }

    /// Returns the number of records stored for `doctype`.
    pub fn record_count(&self, doctype: &str) -> usize {
        match self.tables.read() {
            Ok(tables) => tables.get(doctype).map_or(0, |table| table.records.len()),
            Err(_) => 0,
        }
    }
}

impl RecordStore for Database {
    fn get_list(&self, doctype: &str, query: &ListQuery) -> Result<Vec<Record>> {
        let tables = self.tables.read().map_err(|_| DeskError::LockPoisoned)?;
        let Some(table) = tables.get(doctype) else {
            return Ok(Vec::new());
        };

        let mut matching: Vec<&Record> = table
            .records
            .iter()
            .filter(|record| query.predicate.matches(record))
            .collect();
        matching.sort_by(|a, b| query.order_by.compare(a, b));

        let limit = query.page_length.unwrap_or(usize::MAX);
        Ok(matching
            .into_iter()
            .take(limit)
            .map(|record| query.project(record))
            .collect())
    }

    fn count(&self, doctype: &str, predicate: &Predicate) -> Result<usize> {
        let tables = self.tables.read().map_err(|_| DeskError::LockPoisoned)?;
        Ok(tables.get(doctype).map_or(0, |table| {
            table
                .records
                .iter()
                .filter(|record| predicate.matches(record))
                .count()
        }))
    }

    fn exists(&self, doctype: &str, name: &str) -> Result<bool> {
        let tables = self.tables.read().map_err(|_| DeskError::LockPoisoned)?;
        Ok(tables
            .get(doctype)
            .is_some_and(|table| table.index.contains_key(name)))
    }

    fn insert(&self, doctype: &str, mut record: Record) -> Result<()> {
        let name = record_name(&record).ok_or_else(|| {
            DeskError::validation(format!("New {} record needs a name", doctype))
        })?;

        let mut tables = self.tables.write().map_err(|_| DeskError::LockPoisoned)?;
        let table = tables.entry(doctype.to_string()).or_default();
        if table.index.contains_key(&name) {
            return Err(DeskError::DuplicateEntry {
                doctype: doctype.to_string(),
                name,
            });
        }

        let now = timestamp();
        for (field, default) in [
            ("owner", Value::from(SYSTEM_USER)),
            ("modified_by", Value::from(SYSTEM_USER)),
            ("creation", Value::from(now.clone())),
            ("modified", Value::from(now)),
            ("docstatus", Value::from(0)),
            ("idx", Value::from(0)),
        ] {
            record.entry(field).or_insert(default);
        }

        tracing::debug!("Inserting {} '{}'", doctype, name);
        table.push(name, record);
        Ok(())
    }

    fn set_value_many(
        &self,
        doctype: &str,
        names: &[String],
        field: &str,
        value: Value,
    ) -> Result<usize> {
        let mut tables = self.tables.write().map_err(|_| DeskError::LockPoisoned)?;
        let table = tables.get_mut(doctype);

        // Resolve every name before touching anything so a miss leaves the batch unapplied.
        let positions = match table.as_ref() {
            Some(table) => names
                .iter()
                .map(|name| {
                    table.index.get(name).copied().ok_or_else(|| DeskError::RecordNotFound {
                        doctype: doctype.to_string(),
                        name: name.clone(),
                    })
                })
                .collect::<Result<Vec<usize>>>()?,
            None if names.is_empty() => Vec::new(),
            None => {
                return Err(DeskError::RecordNotFound {
                    doctype: doctype.to_string(),
                    name: names[0].clone(),
                })
            }
        };

        if let Some(table) = table {
            let now = timestamp();
            for &position in &positions {
                let record = &mut table.records[position];
                record.insert(field.to_string(), value.clone());
                record.insert("modified".to_string(), Value::from(now.clone()));
            }
        }

        tracing::debug!(
            "Set {}.{} on {} records",
            doctype,
            field,
            positions.len()
        );
        Ok(positions.len())
    }

    fn doctype_names(&self) -> Result<Vec<String>> {
        let tables = self.tables.read().map_err(|_| DeskError::LockPoisoned)?;
        let mut names: Vec<String> = tables
            .iter()
            .filter(|(_, table)| !table.records.is_empty())
            .map(|(doctype, _)| doctype.clone())
            .collect();
        names.sort();
        Ok(names)
    }
}

fn record_name(record: &Record) -> Option<String> {
    record
        .get("name")
        .and_then(Value::as_str)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
}

/// Current time in the store's timestamp format.
pub fn timestamp() -> String {
    chrono::Utc::now()
        .naive_utc()
        .format("%Y-%m-%d %H:%M:%S%.6f")
        .to_string()
}
