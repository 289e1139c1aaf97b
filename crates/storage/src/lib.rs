//! Durable storage for annotations, annotator settings and the document library.
//!
//! [`Storage`] keeps everything as JSON files under one root directory. Each
//! document's annotations go into their own `<key>.annotations.json` file and
//! are read and written through [`AnnotationRepository`].

mod backend;
mod key;
pub mod path_codec;
pub mod record;
mod repository;
mod write_behind;

pub use backend::{KeyValueBackend, MemoryBackend};
pub use key::DocumentKey;
pub use record::{AnnotationRecord, RecordDefaults, RECORD_VERSION};
pub use repository::AnnotationRepository;
pub use write_behind::{WriteBehind, WriteStats};

use directories::ProjectDirs;
use doc_model::{AnnotatorConfig, LibraryTree};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

const CONFIG_SCHEMA_VERSION: u32 = 1;
const LIBRARY_SCHEMA_VERSION: u32 = 1;
const ANNOTATION_SUFFIX: &str = ".annotations.json";

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("unable to resolve local data directory")]
    NoDataDirectory,
    #[error("invalid document key {0:?}")]
    InvalidKey(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

#[derive(Debug, Clone)]
pub struct Storage {
    root: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct ConfigEnvelope {
    version: u32,
    config: AnnotatorConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct LibraryEnvelope {
    version: u32,
    library: LibraryTree,
}

impl Storage {
    pub fn from_default_project() -> Result<Self, StorageError> {
        let dirs = ProjectDirs::from("dev", "Inkleaf", "Inkleaf")
            .ok_or(StorageError::NoDataDirectory)?;

        Ok(Self { root: dirs.data_local_dir().to_path_buf() })
    }

    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn load_config(&self) -> Result<AnnotatorConfig, StorageError> {
        let path = self.config_path();
        if !path.exists() {
            return Ok(AnnotatorConfig::default());
        }

        let bytes = fs::read(path)?;
        let envelope: ConfigEnvelope = serde_json::from_slice(&bytes)?;

        Ok(envelope.config)
    }

    pub fn save_config(&self, config: &AnnotatorConfig) -> Result<(), StorageError> {
        let envelope = ConfigEnvelope { version: CONFIG_SCHEMA_VERSION, config: config.clone() };
        let bytes = serde_json::to_vec_pretty(&envelope)?;
        write_atomic(&self.config_path(), &bytes)
    }

    pub fn load_library(&self) -> Result<LibraryTree, StorageError> {
        let path = self.library_path();
        if !path.exists() {
            return Ok(LibraryTree::default());
        }

        let bytes = fs::read(path)?;
        let envelope: LibraryEnvelope = serde_json::from_slice(&bytes)?;

        Ok(envelope.library)
    }

    pub fn save_library(&self, library: &LibraryTree) -> Result<(), StorageError> {
        let envelope =
            LibraryEnvelope { version: LIBRARY_SCHEMA_VERSION, library: library.clone() };
        let bytes = serde_json::to_vec_pretty(&envelope)?;
        write_atomic(&self.library_path(), &bytes)
    }

    fn config_path(&self) -> PathBuf {
        self.root.join("config.json")
    }

    fn library_path(&self) -> PathBuf {
        self.root.join("library.json")
    }

    fn annotations_dir(&self) -> PathBuf {
        self.root.join("annotations")
    }

    fn annotation_path(&self, key: &DocumentKey) -> PathBuf {
        self.annotations_dir().join(format!("{key}{ANNOTATION_SUFFIX}"))
    }
}

impl KeyValueBackend for Storage {
    fn read(&self, key: &DocumentKey) -> Result<Option<Vec<u8>>, StorageError> {
        match fs::read(self.annotation_path(key)) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    fn write(&self, key: &DocumentKey, bytes: &[u8]) -> Result<(), StorageError> {
        write_atomic(&self.annotation_path(key), bytes)
    }

    fn remove(&self, key: &DocumentKey) -> Result<(), StorageError> {
        match fs::remove_file(self.annotation_path(key)) {
            Err(err) if err.kind() != std::io::ErrorKind::NotFound => Err(err.into()),
            _ => Ok(()),
        }
    }

    fn keys(&self) -> Result<Vec<DocumentKey>, StorageError> {
        let entries = match fs::read_dir(self.annotations_dir()) {
            Ok(entries) => entries,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => return Err(err.into()),
        };

        let mut keys = Vec::new();
        for entry in entries {
            let name = entry?.file_name();
            let key = name.to_str().and_then(|name| name.strip_suffix(ANNOTATION_SUFFIX));
            let Some(key) = key else {
                continue;
            };
            if let Ok(key) = DocumentKey::new(key) {
                keys.push(key);
            }
        }
        keys.sort();
        Ok(keys)
    }
}

/// Write through a temporary sibling and rename it into place
fn write_atomic(path: &Path, bytes: &[u8]) -> Result<(), StorageError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let mut temp_name = path.file_name().map(|name| name.to_os_string()).unwrap_or_default();
    temp_name.push(".tmp");
    let temp_path = path.with_file_name(temp_name);

    fs::write(&temp_path, bytes)?;
    fs::rename(&temp_path, path)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use doc_model::{apply_library_action, FolderId, LibraryAction};

    #[test]
    fn config_round_trip() {
        let temp = tempfile::tempdir().expect("temp dir should be created");
        let store = Storage::with_root(temp.path());

        let config = AnnotatorConfig::default().with_hit_threshold(24.0);
        store.save_config(&config).expect("save should succeed");
        let loaded = store.load_config().expect("load should succeed");

        assert_eq!(loaded, config);
    }

    #[test]
    fn load_config_defaults_when_file_absent() {
        let temp = tempfile::tempdir().expect("temp dir should be created");
        let store = Storage::with_root(temp.path());

        let loaded = store.load_config().expect("load should succeed");
        assert_eq!(loaded, AnnotatorConfig::default());
    }

    #[test]
    fn library_round_trip() {
        let temp = tempfile::tempdir().expect("temp dir should be created");
        let store = Storage::with_root(temp.path());

        let mut library = store.load_library().expect("fresh library should load");
        apply_library_action(
            &mut library,
            LibraryAction::CreateFolder { parent: FolderId::ROOT, name: "Contracts".to_owned() },
        )
        .expect("folder should be created");

        store.save_library(&library).expect("save should succeed");
        assert_eq!(store.load_library().expect("load should succeed"), library);
    }

    #[test]
    fn annotation_files_are_listed_by_key() {
        let temp = tempfile::tempdir().expect("temp dir should be created");
        let store = Storage::with_root(temp.path());
        let key = DocumentKey::from_uri("manual.pdf");

        assert!(store.keys().expect("listing should succeed").is_empty());
        assert_eq!(store.read(&key).expect("read should succeed"), None);

        store.write(&key, b"{}").expect("write should succeed");
        assert!(temp.path().join("annotations/manual.pdf.annotations.json").exists());
        assert_eq!(store.keys().expect("listing should succeed"), vec![key.clone()]);

        store.remove(&key).expect("remove should succeed");
        store.remove(&key).expect("removing twice should succeed");
        assert_eq!(store.read(&key).expect("read should succeed"), None);
    }
}
