//! Site snapshot: schemas, role grants and records in one JSON file.

use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::PathBuf;

use crc32fast::Hasher;
use serde::{Deserialize, Serialize};

use super::io_utils::{classify_io_error, retry_io_operation};
use crate::config::DeskConfig;
use crate::database::Database;
use crate::error::{DeskError, Result};
use crate::fixtures;
use crate::meta::{DocMeta, InMemorySchemaRegistry};
use crate::permission::{PermissionTable, RolePermissions};
use crate::services::Site;
use crate::store::Record;

/// Snapshot format version.
pub const SNAPSHOT_VERSION: u32 = 1;

const SNAPSHOT_FILE: &str = "site.json";
const SNAPSHOT_TEMP_FILE: &str = "site.json.tmp";

/// Serialized state of a site.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SiteSnapshot {
    pub version: u32,
    pub doctypes: Vec<DocMeta>,
    #[serde(default)]
    pub permissions: PermissionTable,
    pub records: BTreeMap<String, Vec<Record>>,
    /// CRC32 of the serialized `records` section
    pub checksum: u32,
}

impl SiteSnapshot {
    /// Captures the current state of `site`.
    pub fn capture(site: &Site) -> Result<Self> {
        let records = site.database.dump()?;
        Ok(Self {
            version: SNAPSHOT_VERSION,
            doctypes: site.registry.metas(),
            permissions: site.permissions.to_table()?,
            checksum: records_checksum(&records)?,
            records,
        })
    }

    /// Rebuilds a site. Controllers are not part of the snapshot and are
    /// attached from the built-in fixtures.
    ///
    /// # Errors
    /// `DataCorruption` if the checksum does not match or records are inconsistent.
    pub fn into_site(self, config: &DeskConfig) -> Result<Site> {
        let actual = records_checksum(&self.records)?;
        if actual != self.checksum {
            return Err(DeskError::DataCorruption(format!(
                "Snapshot checksum mismatch: expected {:08x}, found {:08x}",
                self.checksum, actual
            )));
        }

        let registry = InMemorySchemaRegistry::new();
        for meta in self.doctypes {
            registry.register(meta)?;
        }
        let site = Site::from_parts(
            registry,
            Database::from_records(self.records)?,
            RolePermissions::from_table(self.permissions),
            config,
        );
        fixtures::install_controllers(&site.registry)?;
        Ok(site)
    }
}

fn records_checksum(records: &BTreeMap<String, Vec<Record>>) -> Result<u32> {
    let bytes = serde_json::to_vec(records)?;
    let mut hasher = Hasher::new();
    hasher.update(&bytes);
    Ok(hasher.finalize())
}

/// Reads and writes the site snapshot in the data directory.
#[derive(Debug, Clone)]
pub struct SnapshotManager {
    /// Data directory path
    data_dir: PathBuf,
    /// Maximum retry attempts for transient I/O errors
    max_retries: u32,
    /// Delay between retry attempts in milliseconds
    retry_delay_ms: u64,
}

impl SnapshotManager {
    pub fn new(config: &DeskConfig) -> Self {
        Self {
            data_dir: config.data_dir.clone(),
            max_retries: config.persistence_max_retries,
            retry_delay_ms: config.persistence_retry_delay_ms,
        }
    }

    /// Path of the snapshot file.
    pub fn path(&self) -> PathBuf {
        self.data_dir.join(SNAPSHOT_FILE)
    }

    /// Writes the snapshot of `site`, replacing the previous one atomically.
    pub fn save(&self, site: &Site) -> Result<()> {
        let snapshot = SiteSnapshot::capture(site)?;
        let json = serde_json::to_string_pretty(&snapshot)?;
        retry_io_operation(
            || self.write_file(json.as_bytes()),
            self.max_retries,
            self.retry_delay_ms,
            "save_snapshot",
        )?;
        tracing::info!(
            "Saved snapshot with {} doctypes to {}",
            snapshot.doctypes.len(),
            self.path().display()
        );
        Ok(())
    }

    fn write_file(&self, contents: &[u8]) -> Result<()> {
        fs::create_dir_all(&self.data_dir)
            .map_err(|e| classify_io_error(e, "Failed to create data directory"))?;

        let temp_path = self.data_dir.join(SNAPSHOT_TEMP_FILE);
        let mut file = File::create(&temp_path)
            .map_err(|e| classify_io_error(e, "Failed to create temp file"))?;
        file.write_all(contents)
            .map_err(|e| classify_io_error(e, "Failed to write snapshot"))?;
        file.sync_all()
            .map_err(|e| classify_io_error(e, "Failed to sync snapshot"))?;

        fs::rename(&temp_path, self.path())
            .map_err(|e| classify_io_error(e, "Failed to rename snapshot file"))
    }

    /// Reads the snapshot, or `None` when there is none yet.
    ///
    /// # Errors
    /// `SerializationError` for unparsable files or unsupported versions.
    pub fn load(&self) -> Result<Option<SiteSnapshot>> {
        let path = self.path();
        if !path.exists() {
            return Ok(None);
        }

        let contents = retry_io_operation(
            || {
                let mut file = File::open(&path)
                    .map_err(|e| classify_io_error(e, "Failed to open snapshot"))?;
                let mut contents = String::new();
                file.read_to_string(&mut contents)
                    .map_err(|e| classify_io_error(e, "Failed to read snapshot"))?;
                Ok(contents)
            },
            self.max_retries,
            self.retry_delay_ms,
            "load_snapshot",
        )?;

        let snapshot: SiteSnapshot = serde_json::from_str(&contents).map_err(|e| {
            DeskError::SerializationError(format!("Failed to parse snapshot: {}", e))
        })?;
        if snapshot.version != SNAPSHOT_VERSION {
            return Err(DeskError::SerializationError(format!(
                "Unsupported snapshot version: {}",
                snapshot.version
            )));
        }
        Ok(Some(snapshot))
    }

    /// Opens the stored site, or a fresh site with the built-in fixtures when
    /// no snapshot exists.
    pub fn open_site(&self, config: &DeskConfig) -> Result<Site> {
        match self.load()? {
            Some(snapshot) => {
                tracing::info!("Loading site from {}", self.path().display());
                snapshot.into_site(config)
            }
            None => {
                tracing::info!("No snapshot in {}, installing fixtures", self.data_dir.display());
                let site = Site::new(config);
                fixtures::install(&site)?;
                Ok(site)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::RecordStore;
    use serde_json::json;

    #[test]
    fn test_checksum_detects_tampering() {
        let config = DeskConfig::default();
        let site = Site::new(&config);
        fixtures::install(&site).unwrap();
        site.database
            .insert(
                "HD Ticket",
                json!({"name": "1", "subject": "Printer"})
                    .as_object()
                    .cloned()
                    .unwrap(),
            )
            .unwrap();

        let mut snapshot = SiteSnapshot::capture(&site).unwrap();
        snapshot.records.get_mut("HD Ticket").unwrap()[0]
            .insert("subject".to_string(), json!("Scanner"));
        let err = snapshot.into_site(&config).err().unwrap();
        assert!(matches!(err, DeskError::DataCorruption(_)));
    }
}
