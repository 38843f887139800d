//! Layer catalog backed by a JSON index file.

use std::io::Write;
use std::path::{Path, PathBuf};

use meteo_common::{LayerKey, LayerRecord};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{StorageError, StorageResult};

/// The whole index document.
///
/// Records are kept in insertion order and are unique by [`LayerKey`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CatalogIndex {
    #[serde(default)]
    pub layers: Vec<LayerRecord>,
}

impl CatalogIndex {
    /// Insert a record, replacing any existing record with the same key.
    ///
    /// The new record goes to the end of the list. Returns `true` when an
    /// older record was replaced.
    pub fn upsert(&mut self, record: LayerRecord) -> bool {
        let key = record.key();
        let before = self.layers.len();
        self.layers.retain(|existing| existing.key() != key);
        let replaced = self.layers.len() != before;
        self.layers.push(record);
        replaced
    }

    pub fn get(&self, key: &LayerKey) -> Option<&LayerRecord> {
        self.layers.iter().find(|r| &r.key() == key)
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }
}

/// Catalog operations on an index file.
///
/// Each update is a whole-file read-modify-write; runs sharing one index
/// must not overlap.
#[derive(Debug, Clone)]
pub struct Catalog {
    path: PathBuf,
}

impl Catalog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the index; a missing file is an empty catalog.
    pub fn load(&self) -> StorageResult<CatalogIndex> {
        let text = match std::fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "No catalog index yet");
                return Ok(CatalogIndex::default());
            }
            Err(e) => return Err(StorageError::io(&self.path, e)),
        };

        serde_json::from_str(&text).map_err(|e| StorageError::Corrupt {
            path: self.path.clone(),
            message: e.to_string(),
        })
    }

    /// Write the index atomically: temp file in the same directory, then rename.
    pub fn save(&self, index: &CatalogIndex) -> StorageResult<()> {
        let dir = match self.path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
            _ => PathBuf::from("."),
        };
        std::fs::create_dir_all(&dir).map_err(|e| StorageError::io(&dir, e))?;

        let mut json = serde_json::to_string_pretty(index)?;
        json.push('\n');
        let mut tmp = tempfile::NamedTempFile::new_in(&dir).map_err(|e| StorageError::io(&dir, e))?;
        tmp.write_all(json.as_bytes())
            .map_err(|e| StorageError::io(&dir, e))?;
        tmp.persist(&self.path)
            .map_err(|e| StorageError::io(&self.path, e.error))?;
        Ok(())
    }

    /// Register a layer, replacing any earlier record for the same key.
    pub fn register_layer(&self, record: LayerRecord) -> StorageResult<CatalogIndex> {
        let key = record.key();
        let mut index = self.load()?;
        let replaced = index.upsert(record);
        self.save(&index)?;

        info!(
            layer = %key,
            replaced,
            layers = index.len(),
            path = %self.path.display(),
            "Updated catalog index"
        );
        Ok(index)
    }
}
