use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{StoreError, StoreResult};

/// Configuration for snapshot persistence.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Snapshot file used when the caller does not name one.
    pub default_path: PathBuf,
    /// Appended to the target's file name to form the temporary file.
    pub temp_suffix: String,
    /// `fsync` the temporary file before renaming it over the target.
    pub sync_on_save: bool,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            default_path: PathBuf::from("inventory.json"),
            temp_suffix: ".tmp".into(),
            sync_on_save: true,
        }
    }
}

impl StoreConfig {
    /// Parse a TOML document. Missing keys take their default values.
    pub fn from_toml_str(text: &str) -> StoreResult<Self> {
        let config: Self =
            toml::from_str(text).map_err(|e| StoreError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse a TOML configuration file.
    pub fn from_toml_file(path: &Path) -> StoreResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    /// Reject settings that would break the write-then-rename protocol.
    ///
    /// The temporary file must sit in the target's directory, so the suffix
    /// may not be empty or contain a path separator.
    pub fn validate(&self) -> StoreResult<()> {
        if self.temp_suffix.is_empty() {
            return Err(StoreError::Config("temp_suffix must not be empty".into()));
        }
        if self.temp_suffix.contains(['/', '\\']) {
            return Err(StoreError::Config(format!(
                "temp_suffix must not contain a path separator: {:?}",
                self.temp_suffix
            )));
        }
        if self.default_path.as_os_str().is_empty() {
            return Err(StoreError::Config("default_path must not be empty".into()));
        }
        Ok(())
    }

    /// Temporary file path for a save to `target`: same directory, the
    /// target's file name plus [`temp_suffix`](Self::temp_suffix).
    pub fn temp_path_for(&self, target: &Path) -> StoreResult<PathBuf> {
        let Some(name) = target.file_name() else {
            return Err(StoreError::Io(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                format!("snapshot path has no file name: {}", target.display()),
            )));
        };
        let mut temp_name = name.to_os_string();
        temp_name.push(&self.temp_suffix);
        Ok(target.with_file_name(temp_name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let c = StoreConfig::default();
        assert_eq!(c.default_path, PathBuf::from("inventory.json"));
        assert_eq!(c.temp_suffix, ".tmp");
        assert!(c.sync_on_save);
        c.validate().unwrap();
    }

    #[test]
    fn toml_overrides_only_given_keys() {
        let c = StoreConfig::from_toml_str("default_path = \"stock/ledger.json\"\n").unwrap();
        assert_eq!(c.default_path, PathBuf::from("stock/ledger.json"));
        assert_eq!(c.temp_suffix, ".tmp");
        assert!(c.sync_on_save);
    }

    #[test]
    fn toml_full_document() {
        let c = StoreConfig::from_toml_str(
            "default_path = \"a.json\"\ntemp_suffix = \".partial\"\nsync_on_save = false\n",
        )
        .unwrap();
        assert_eq!(c.temp_suffix, ".partial");
        assert!(!c.sync_on_save);
    }

    #[test]
    fn toml_syntax_error_is_config_error() {
        let err = StoreConfig::from_toml_str("default_path = ").unwrap_err();
        assert!(matches!(err, StoreError::Config(_)));
    }

    #[test]
    fn rejects_unusable_suffixes() {
        for suffix in ["", "/tmp", "..\\x"] {
            let c = StoreConfig {
                temp_suffix: suffix.into(),
                ..Default::default()
            };
            assert!(matches!(c.validate(), Err(StoreError::Config(_))));
        }
    }

    #[test]
    fn temp_path_appends_suffix_to_full_name() {
        let c = StoreConfig::default();
        assert_eq!(
            c.temp_path_for(Path::new("data/inventory.json")).unwrap(),
            PathBuf::from("data/inventory.json.tmp")
        );
        assert_eq!(
            c.temp_path_for(Path::new("ledger")).unwrap(),
            PathBuf::from("ledger.tmp")
        );
    }

    #[test]
    fn temp_path_requires_file_name() {
        let c = StoreConfig::default();
        assert!(matches!(
            c.temp_path_for(Path::new("/")),
            Err(StoreError::Io(_))
        ));
    }

    #[test]
    fn reads_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tally.toml");
        std::fs::write(&path, "sync_on_save = false\n").unwrap();

        let c = StoreConfig::from_toml_file(&path).unwrap();
        assert!(!c.sync_on_save);
        assert_eq!(c.default_path, PathBuf::from("inventory.json"));
    }
}
