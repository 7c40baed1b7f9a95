//! Durable registry snapshots
//!
//! The registry is persisted as a JSON object keyed by address:
//!
//! ```json
//! { "4AdUndX...": { "created_at": "2024-03-01T12:00:00Z" } }
//! ```
//!
//! Backend handles are never written. Saves are atomic
//! (write temp file, fsync, rename over the target), so a crash mid-save
//! leaves the previous snapshot in place.

use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Result, WalletError};

/// Address → `created_at`
pub type RegistrySnapshot = BTreeMap<String, DateTime<Utc>>;

/// Persistence for the wallet registry
pub trait RegistryStore: Send + Sync {
    /// Last saved snapshot; empty when nothing usable is stored
    fn load(&self) -> RegistrySnapshot;

    /// Replace the stored snapshot
    fn save(&self, snapshot: &RegistrySnapshot) -> Result<()>;
}

#[derive(Debug, Serialize, Deserialize)]
struct StoredRecord {
    created_at: String,
}

/// [`RegistryStore`] backed by a single JSON file
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn tmp_path(&self) -> PathBuf {
        let file_name = self
            .path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "wallet_data.json".to_string());
        self.path
            .with_file_name(format!(".{file_name}.{}.tmp", uuid::Uuid::new_v4().simple()))
    }

    fn write_atomically(&self, bytes: &[u8]) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let tmp_path = self.tmp_path();
        let written = (|| {
            let mut file = fs::File::create(&tmp_path)?;
            file.write_all(bytes)?;
            file.sync_all()?;
            fs::rename(&tmp_path, &self.path)
        })();

        if written.is_err() {
            let _ = fs::remove_file(&tmp_path);
        }
        written
    }
}

impl RegistryStore for JsonFileStore {
    fn load(&self) -> RegistrySnapshot {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!("No registry file at {}, starting empty", self.path.display());
                return RegistrySnapshot::new();
            }
            Err(e) => {
                tracing::warn!(
                    "Failed to read registry file {}: {}, starting empty",
                    self.path.display(),
                    e
                );
                return RegistrySnapshot::new();
            }
        };

        if raw.trim().is_empty() {
            return RegistrySnapshot::new();
        }

        let entries: BTreeMap<String, serde_json::Value> = match serde_json::from_str(&raw) {
            Ok(entries) => entries,
            Err(e) => {
                tracing::warn!(
                    "Registry file {} is corrupt ({}), starting empty",
                    self.path.display(),
                    e
                );
                return RegistrySnapshot::new();
            }
        };

        let mut snapshot = RegistrySnapshot::new();
        for (address, value) in entries {
            let created_at = value
                .get("created_at")
                .and_then(|v| v.as_str())
                .and_then(parse_timestamp);
            match created_at {
                Some(created_at) => {
                    snapshot.insert(address, created_at);
                }
                None => {
                    tracing::warn!(address = %address, "Skipping registry entry without a valid created_at");
                }
            }
        }

        tracing::info!(
            "Loaded {} wallet(s) from {}",
            snapshot.len(),
            self.path.display()
        );
        snapshot
    }

    fn save(&self, snapshot: &RegistrySnapshot) -> Result<()> {
        let stored: BTreeMap<&str, StoredRecord> = snapshot
            .iter()
            .map(|(address, created_at)| {
                (
                    address.as_str(),
                    StoredRecord {
                        created_at: created_at.to_rfc3339(),
                    },
                )
            })
            .collect();

        let bytes = serde_json::to_vec_pretty(&stored)
            .map_err(|e| WalletError::PersistenceFailure(format!("serialize registry: {e}")))?;

        self.write_atomically(&bytes).map_err(|e| {
            WalletError::PersistenceFailure(format!(
                "write registry to {}: {e}",
                self.path.display()
            ))
        })
    }
}

/// Parse RFC 3339, or a naive ISO-8601 timestamp interpreted as local time
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }
    let naive = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f").ok()?;
    Local
        .from_local_datetime(&naive)
        .earliest()
        .map(|local| local.with_timezone(&Utc))
}
