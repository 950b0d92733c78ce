//! Schema registry: doctype metadata and controllers.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, RwLock};

use arc_swap::ArcSwap;

use super::{DocField, DocMeta, HasDefaultListData};
use crate::error::{DeskError, Result};

/// Read access to doctype schemas and their controllers.
pub trait SchemaRegistry: Send + Sync {
    /// Returns the schema of `doctype`.
    ///
    /// # Errors
    /// `DocTypeNotFound` if the doctype is not registered.
    fn get_meta(&self, doctype: &str) -> Result<Arc<DocMeta>>;

    /// Returns the default-list capability of `doctype`, if its controller has one.
    fn controller(&self, doctype: &str) -> Option<Arc<dyn HasDefaultListData>>;

    /// Names of all registered doctypes.
    fn doctypes(&self) -> Vec<String>;
}

type MetaMap = HashMap<String, Arc<DocMeta>>;

/// In-memory schema registry.
///
/// Readers load an immutable snapshot of all schemas without locking; writers
/// are serialized and publish a fresh snapshot.
pub struct InMemorySchemaRegistry {
    doctypes: ArcSwap<MetaMap>,
    /// Serializes snapshot writers
    writer: Mutex<()>,
    controllers: RwLock<HashMap<String, Arc<dyn HasDefaultListData>>>,
}

impl InMemorySchemaRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self {
            doctypes: ArcSwap::from_pointee(HashMap::new()),
            writer: Mutex::new(()),
            controllers: RwLock::new(HashMap::new()),
        }
    }

    /// Registers or replaces a doctype schema.
    pub fn register(&self, meta: DocMeta) -> Result<()> {
        let _guard = self.writer.lock().map_err(|_| DeskError::LockPoisoned)?;
        let mut next = MetaMap::clone(&self.doctypes.load());
        tracing::debug!(
            "Registering doctype {} with {} fields",
            meta.name,
            meta.fields.len()
        );
        next.insert(meta.name.clone(), Arc::new(meta));
        self.doctypes.store(Arc::new(next));
        Ok(())
    }

    /// Attaches a custom field to a registered doctype.
    ///
    /// Readers holding an older snapshot keep seeing the previous schema.
    ///
    /// # Errors
    /// `DocTypeNotFound` for unknown doctypes, `ValidationError` for a clashing fieldname.
    pub fn add_custom_field(&self, doctype: &str, field: DocField) -> Result<()> {
        let _guard = self.writer.lock().map_err(|_| DeskError::LockPoisoned)?;
        let current = self.doctypes.load();
        let mut meta = current
            .get(doctype)
            .map(|meta| DocMeta::clone(meta))
            .ok_or_else(|| DeskError::DocTypeNotFound {
                doctype: doctype.to_string(),
            })?;
        tracing::info!("Adding custom field {} to {}", field.fieldname, doctype);
        meta.add_custom_field(field)?;

        let mut next = MetaMap::clone(&current);
        next.insert(doctype.to_string(), Arc::new(meta));
        self.doctypes.store(Arc::new(next));
        Ok(())
    }

    /// Installs the controller of a doctype.
    pub fn set_controller(
        &self,
        doctype: &str,
        controller: Arc<dyn HasDefaultListData>,
    ) -> Result<()> {
        let mut controllers = self
            .controllers
            .write()
            .map_err(|_| DeskError::LockPoisoned)?;
        controllers.insert(doctype.to_string(), controller);
        Ok(())
    }

    /// Returns every registered schema, sorted by doctype name.
    pub fn metas(&self) -> Vec<DocMeta> {
        let snapshot = self.doctypes.load();
        let mut metas: Vec<DocMeta> = snapshot.values().map(|meta| DocMeta::clone(meta)).collect();
        metas.sort_by(|a, b| a.name.cmp(&b.name));
        metas
    }
}

impl Default for InMemorySchemaRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl SchemaRegistry for InMemorySchemaRegistry {
    fn get_meta(&self, doctype: &str) -> Result<Arc<DocMeta>> {
        self.doctypes
            .load()
            .get(doctype)
            .cloned()
            .ok_or_else(|| DeskError::DocTypeNotFound {
                doctype: doctype.to_string(),
            })
    }

    fn controller(&self, doctype: &str) -> Option<Arc<dyn HasDefaultListData>> {
        let controllers = self.controllers.read().ok()?;
        controllers.get(doctype).cloned()
    }

    fn doctypes(&self) -> Vec<String> {
        let mut names: Vec<String> = self.doctypes.load().keys().cloned().collect();
        names.sort();
        names
    }
}
