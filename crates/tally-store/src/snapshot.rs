use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::Path;

use serde_json::Value;
use tracing::{debug, info, warn};

use tally_ledger::Ledger;
use tally_types::{quantity_from_json, ItemName};

use crate::config::StoreConfig;
use crate::error::{StoreError, StoreResult};

/// Result of a successful [`SnapshotStore::load`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoadOutcome {
    /// No snapshot file exists; the ledger was left as it was.
    Missing,
    /// The ledger was replaced with the snapshot's `items` entries.
    Loaded { items: usize },
}

/// Saves and loads whole-ledger JSON snapshots.
///
/// Each call is a self-contained transaction against the filesystem; the
/// store itself only holds configuration.
#[derive(Clone, Debug, Default)]
pub struct SnapshotStore {
    config: StoreConfig,
}

impl SnapshotStore {
    pub fn new(config: StoreConfig) -> StoreResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Write `ledger` to `path` with write-then-rename.
    ///
    /// On failure the target is left untouched. A temporary file created by
    /// this call is removed on a best-effort basis.
    pub fn save(&self, ledger: &Ledger, path: &Path) -> StoreResult<()> {
        let temp = self.config.temp_path_for(path)?;

        let file = File::create(&temp)?;
        if let Err(e) = self.write_snapshot(file, ledger) {
            discard_temp(&temp);
            return Err(e);
        }

        if let Err(e) = fs::rename(&temp, path) {
            discard_temp(&temp);
            return Err(e.into());
        }

        info!(path = %path.display(), items = ledger.len(), "snapshot saved");
        Ok(())
    }

    /// Replace `ledger` with the snapshot at `path`.
    ///
    /// A missing file yields [`LoadOutcome::Missing`] and leaves `ledger`
    /// alone. A file that is not a flat object of item names to non-negative
    /// integers yields [`StoreError::SchemaInvalid`] and leaves `ledger`
    /// **empty**, whatever it held before: a bad snapshot never produces a
    /// half-loaded ledger. Read errors other than "not found" are returned as
    /// [`StoreError::Io`] without touching `ledger`.
    pub fn load(&self, ledger: &mut Ledger, path: &Path) -> StoreResult<LoadOutcome> {
        let bytes = match fs::read(path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "no snapshot to load");
                return Ok(LoadOutcome::Missing);
            }
            Err(e) => return Err(e.into()),
        };

        match parse_snapshot(&bytes) {
            Ok(restored) => {
                let items = restored.len();
                *ledger = restored;
                info!(path = %path.display(), items, "snapshot loaded");
                Ok(LoadOutcome::Loaded { items })
            }
            Err(reason) => {
                ledger.clear();
                warn!(path = %path.display(), %reason, "snapshot rejected; ledger cleared");
                Err(StoreError::SchemaInvalid {
                    path: path.to_path_buf(),
                    reason,
                })
            }
        }
    }

    fn write_snapshot(&self, file: File, ledger: &Ledger) -> StoreResult<()> {
        let mut writer = BufWriter::new(file);
        serde_json::to_writer(&mut writer, ledger).map_err(|e| {
            if e.is_io() {
                StoreError::Io(e.into())
            } else {
                StoreError::Serialization(e.to_string())
            }
        })?;
        writer.flush()?;

        let file = writer.into_inner().map_err(|e| e.into_error())?;
        if self.config.sync_on_save {
            file.sync_all()?;
        }
        debug!(items = ledger.len(), synced = self.config.sync_on_save, "temp snapshot written");
        Ok(())
    }
}

/// Save with the default configuration.
pub fn save(ledger: &Ledger, path: &Path) -> StoreResult<()> {
    SnapshotStore::default().save(ledger, path)
}

/// Load with the default configuration.
pub fn load(ledger: &mut Ledger, path: &Path) -> StoreResult<LoadOutcome> {
    SnapshotStore::default().load(ledger, path)
}

/// Validate a snapshot document and build the ledger it describes.
fn parse_snapshot(bytes: &[u8]) -> Result<Ledger, String> {
    let document: Value =
        serde_json::from_slice(bytes).map_err(|e| format!("not a JSON document: {e}"))?;

    let Value::Object(map) = document else {
        return Err("top-level value must be an object".into());
    };

    let mut entries = Vec::with_capacity(map.len());
    for (key, value) in map {
        let name = ItemName::new(key.as_str()).map_err(|e| format!("key {key:?}: {e}"))?;
        let qty = quantity_from_json(&value).map_err(|e| format!("value of {key:?}: {e}"))?;
        entries.push((name, qty));
    }
    Ok(Ledger::restore(entries))
}

fn discard_temp(temp: &Path) {
    if let Err(e) = fs::remove_file(temp) {
        if e.kind() != io::ErrorKind::NotFound {
            warn!(path = %temp.display(), error = %e, "could not remove temp snapshot");
        }
    }
}
