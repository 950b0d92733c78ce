//! Collaborators passed to every operation.

use std::sync::Arc;

use crate::cache::{Cache, TtlCache};
use crate::config::DeskConfig;
use crate::database::Database;
use crate::meta::{InMemorySchemaRegistry, SchemaRegistry};
use crate::permission::{PermissionChecker, RolePermissions};
use crate::store::RecordStore;

/// Injected collaborators of the list operations.
#[derive(Clone)]
pub struct Services {
    pub schema: Arc<dyn SchemaRegistry>,
    pub store: Arc<dyn RecordStore>,
    pub permissions: Arc<dyn PermissionChecker>,
    pub cache: Arc<dyn Cache>,
}

/// Concrete in-memory collaborators of one helpdesk site.
///
/// Keeps the concrete types reachable for fixtures, seeding and snapshots
/// while operations only see the [`Services`] traits.
#[derive(Clone)]
pub struct Site {
    pub registry: Arc<InMemorySchemaRegistry>,
    pub database: Arc<Database>,
    pub permissions: Arc<RolePermissions>,
    pub cache: Arc<TtlCache>,
}

impl Site {
    /// Creates an empty site.
    pub fn new(config: &DeskConfig) -> Self {
        Self::from_parts(
            InMemorySchemaRegistry::new(),
            Database::new(),
            RolePermissions::new(),
            config,
        )
    }

    /// Assembles a site from already populated parts.
    pub fn from_parts(
        registry: InMemorySchemaRegistry,
        database: Database,
        permissions: RolePermissions,
        config: &DeskConfig,
    ) -> Self {
        Self {
            registry: Arc::new(registry),
            database: Arc::new(database),
            permissions: Arc::new(permissions),
            cache: Arc::new(TtlCache::new(config.cache_ttl())),
        }
    }

    /// Trait-object view handed to operations.
    pub fn services(&self) -> Services {
        Services {
            schema: self.registry.clone(),
            store: self.database.clone(),
            permissions: self.permissions.clone(),
            cache: self.cache.clone(),
        }
    }
}
