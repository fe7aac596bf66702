//! File-backed document store.
//!
//! Implements both [`ConfigPort`] and [`StoragePort`] on top of a plain
//! directory tree:
//!
//! ```text
//!   <root>/<namespace>/<key>.json
//! ```
//!
//! # Guarantees
//!
//! - Atomic writes: every document is written to `<key>.json.tmp`, synced,
//!   then renamed over the target.  A crash leaves either the old or the new
//!   document, never a torn one.
//! - Namespace isolation: each subsystem uses its own directory.
//! - Config validation: the station config is range-checked before it is
//!   persisted.

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use log::{debug, info};

use crate::app::ports::{ConfigError, ConfigPort, StorageError, StoragePort};
use crate::config::StationConfig;

const CONFIG_NAMESPACE: &str = "station";
const CONFIG_KEY: &str = "config";

const DOCUMENT_EXT: &str = ".json";
const TEMP_EXT: &str = ".json.tmp";

/// Directory-rooted store.  Cloning yields another handle on the same tree.
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    /// Open (and create if needed) a store rooted at `root`.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        info!("FileStore: opened {}", root.display());
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of the document for `namespace`/`key`.
    pub fn document_path(&self, namespace: &str, key: &str) -> Result<PathBuf, StorageError> {
        check_segment(namespace)?;
        check_segment(key)?;
        Ok(self
            .root
            .join(namespace)
            .join(format!("{key}{DOCUMENT_EXT}")))
    }

    fn write_document(&self, namespace: &str, key: &str, data: &[u8]) -> Result<(), StorageError> {
        let path = self.document_path(namespace, key)?;
        let dir = self.root.join(namespace);
        fs::create_dir_all(&dir)?;

        let tmp = dir.join(format!("{key}{TEMP_EXT}"));
        {
            let mut file = File::create(&tmp)?;
            file.write_all(data)?;
            file.sync_all()?;
        }
        fs::rename(&tmp, &path)?;
        debug!(
            "FileStore: wrote {}/{} ({} bytes)",
            namespace,
            key,
            data.len()
        );
        Ok(())
    }
}

/// A namespace or key must map onto exactly one file name.
fn check_segment(segment: &str) -> Result<(), StorageError> {
    let bad = segment.is_empty()
        || segment == "."
        || segment == ".."
        || segment.contains(['/', '\\'])
        || segment.chars().any(char::is_control);
    if bad {
        Err(StorageError::InvalidKey)
    } else {
        Ok(())
    }
}

impl StoragePort for FileStore {
    fn read(&self, namespace: &str, key: &str) -> Result<Vec<u8>, StorageError> {
        let path = self.document_path(namespace, key)?;
        Ok(fs::read(path)?)
    }

    fn write(&mut self, namespace: &str, key: &str, data: &[u8]) -> Result<(), StorageError> {
        self.write_document(namespace, key, data)
    }

    fn delete(&mut self, namespace: &str, key: &str) -> Result<(), StorageError> {
        let path = self.document_path(namespace, key)?;
        match fs::remove_file(path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    fn exists(&self, namespace: &str, key: &str) -> bool {
        self.document_path(namespace, key)
            .map(|p| p.is_file())
            .unwrap_or(false)
    }

    fn keys(&self, namespace: &str) -> Result<Vec<String>, StorageError> {
        check_segment(namespace)?;
        let entries = match fs::read_dir(self.root.join(namespace)) {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut keys = Vec::new();
        for entry in entries {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }
            let file_name = entry.file_name();
            if let Some(key) = file_name
                .to_str()
                .and_then(|name| name.strip_suffix(DOCUMENT_EXT))
            {
                keys.push(key.to_owned());
            }
        }
        keys.sort();
        Ok(keys)
    }
}

impl ConfigPort for FileStore {
    fn load(&self) -> Result<StationConfig, ConfigError> {
        match StoragePort::read(self, CONFIG_NAMESPACE, CONFIG_KEY) {
            Ok(bytes) => {
                let cfg: StationConfig =
                    serde_json::from_slice(&bytes).map_err(|_| ConfigError::Corrupted)?;
                cfg.validate()?;
                info!("FileStore: loaded config from store");
                Ok(cfg)
            }
            Err(StorageError::NotFound) => {
                info!("FileStore: no stored config, using defaults");
                Ok(StationConfig::default())
            }
            Err(e) => Err(e.into()),
        }
    }

    fn save(&self, config: &StationConfig) -> Result<(), ConfigError> {
        config.validate()?;
        let bytes = serde_json::to_vec_pretty(config).map_err(|_| ConfigError::IoError)?;
        self.write_document(CONFIG_NAMESPACE, CONFIG_KEY, &bytes)?;
        info!("FileStore: config saved");
        Ok(())
    }
}
