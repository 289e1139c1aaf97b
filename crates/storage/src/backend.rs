use crate::{DocumentKey, StorageError};
use std::collections::BTreeMap;
use std::sync::{Mutex, PoisonError};

/// Durable byte store holding one record per document
pub trait KeyValueBackend: Send + Sync {
    /// Bytes stored under `key`, or `None` if nothing was saved yet
    fn read(&self, key: &DocumentKey) -> Result<Option<Vec<u8>>, StorageError>;

    /// Replace whatever is stored under `key`
    fn write(&self, key: &DocumentKey, bytes: &[u8]) -> Result<(), StorageError>;

    /// Delete the record; deleting a missing record is not an error
    fn remove(&self, key: &DocumentKey) -> Result<(), StorageError>;

    /// Every key that currently has a record, sorted
    fn keys(&self) -> Result<Vec<DocumentKey>, StorageError>;
}

/// In-process backend for tests and sessions that should not touch disk
#[derive(Debug, Default)]
pub struct MemoryBackend {
    records: Mutex<BTreeMap<DocumentKey, Vec<u8>>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    fn records(&self) -> std::sync::MutexGuard<'_, BTreeMap<DocumentKey, Vec<u8>>> {
        self.records.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl KeyValueBackend for MemoryBackend {
    fn read(&self, key: &DocumentKey) -> Result<Option<Vec<u8>>, StorageError> {
        Ok(self.records().get(key).cloned())
    }

    fn write(&self, key: &DocumentKey, bytes: &[u8]) -> Result<(), StorageError> {
        self.records().insert(key.clone(), bytes.to_vec());
        Ok(())
    }

    fn remove(&self, key: &DocumentKey) -> Result<(), StorageError> {
        self.records().remove(key);
        Ok(())
    }

    fn keys(&self) -> Result<Vec<DocumentKey>, StorageError> {
        Ok(self.records().keys().cloned().collect())
    }
}

impl<B: KeyValueBackend + ?Sized> KeyValueBackend for std::sync::Arc<B> {
    fn read(&self, key: &DocumentKey) -> Result<Option<Vec<u8>>, StorageError> {
        (**self).read(key)
    }

    fn write(&self, key: &DocumentKey, bytes: &[u8]) -> Result<(), StorageError> {
        (**self).write(key, bytes)
    }

    fn remove(&self, key: &DocumentKey) -> Result<(), StorageError> {
        (**self).remove(key)
    }

    fn keys(&self) -> Result<Vec<DocumentKey>, StorageError> {
        (**self).keys()
    }
}
