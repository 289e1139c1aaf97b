use crate::record::{AnnotationRecord, RecordDefaults};
use crate::{DocumentKey, KeyValueBackend, StorageError};
use doc_model::{AnnotationSet, AnnotatorConfig};

/// Loads and saves whole annotation sets, one record per document
#[derive(Debug)]
pub struct AnnotationRepository<B> {
    backend: B,
    defaults: RecordDefaults,
}

impl<B: KeyValueBackend> AnnotationRepository<B> {
    pub fn new(backend: B, config: &AnnotatorConfig) -> Self {
        Self { backend, defaults: RecordDefaults::from(config) }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Load a document's annotations, falling back to an empty set
    ///
    /// Missing records, unreadable storage and corrupt JSON all yield an empty
    /// set so annotating can always continue.
    pub fn load(&self, key: &DocumentKey) -> AnnotationSet {
        match self.try_load(key) {
            Ok(Some(set)) => {
                log::debug!("loaded {} annotation(s) for {key}", set.len());
                set
            }
            Ok(None) => AnnotationSet::new(),
            Err(err) => {
                log::warn!("failed to load annotations for {key}, starting empty: {err}");
                AnnotationSet::new()
            }
        }
    }

    pub fn try_load(&self, key: &DocumentKey) -> Result<Option<AnnotationSet>, StorageError> {
        Ok(self.load_record(key)?.map(|record| record.into_set(self.defaults)))
    }

    pub fn load_record(&self, key: &DocumentKey) -> Result<Option<AnnotationRecord>, StorageError> {
        let Some(bytes) = self.backend.read(key)? else {
            return Ok(None);
        };
        Ok(Some(serde_json::from_slice(&bytes)?))
    }

    /// Serialize the full set and replace the stored record
    pub fn save(&self, key: &DocumentKey, set: &AnnotationSet) -> Result<(), StorageError> {
        let record = AnnotationRecord::from_set(set);
        let bytes = serde_json::to_vec_pretty(&record)?;
        self.backend.write(key, &bytes)?;
        log::debug!("saved {} annotation(s) for {key}", set.len());
        Ok(())
    }

    /// Drop a document's record entirely
    pub fn clear(&self, key: &DocumentKey) -> Result<(), StorageError> {
        self.backend.remove(key)
    }
}
