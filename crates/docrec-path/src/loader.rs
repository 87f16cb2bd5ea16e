//! Record loading for lazy documents and links

use docrec_diagnostics::{RecordError, Result};
use docrec_types::{Document, LoadStatus, RecordId};
use parking_lot::RwLock;
use std::collections::HashMap;

/// Materializes records referenced by id
///
/// Called for links traversed by a path and for embedded documents that are
/// not loaded yet. Implementations block until the record is available.
pub trait RecordLoader: Send + Sync {
    /// Load a record, failing with [`RecordError::RecordNotFound`] when it does not exist
    fn load(&self, rid: &RecordId) -> Result<Document>;
}

/// Loader with no records; every load fails
#[derive(Debug, Clone, Copy, Default)]
pub struct NoLoader;

impl RecordLoader for NoLoader {
    fn load(&self, rid: &RecordId) -> Result<Document> {
        Err(RecordError::record_not_found(rid))
    }
}

/// Thread-safe map of records keyed by identity
#[derive(Debug, Default)]
pub struct InMemoryLoader {
    records: RwLock<HashMap<RecordId, Document>>,
}

impl InMemoryLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_documents(documents: impl IntoIterator<Item = Document>) -> Self {
        let loader = Self::new();
        for document in documents {
            loader.insert(document);
        }
        loader
    }

    /// Store a record under its identity, returning the one it replaces
    pub fn insert(&self, document: Document) -> Option<Document> {
        self.records.write().insert(document.identity(), document)
    }

    pub fn remove(&self, rid: &RecordId) -> Option<Document> {
        self.records.write().remove(rid)
    }

    pub fn contains(&self, rid: &RecordId) -> bool {
        self.records.read().contains_key(rid)
    }

    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.read().is_empty()
    }
}

impl RecordLoader for InMemoryLoader {
    fn load(&self, rid: &RecordId) -> Result<Document> {
        let mut document = self
            .records
            .read()
            .get(rid)
            .cloned()
            .ok_or_else(|| RecordError::record_not_found(rid))?;
        document.set_status(LoadStatus::Loaded);
        Ok(document)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_no_loader_fails() {
        let rid = RecordId::new(1, 1);
        assert_eq!(
            NoLoader.load(&rid),
            Err(RecordError::record_not_found("#1:1"))
        );
    }

    #[test]
    fn test_in_memory_round_trip() {
        let rid = RecordId::new(2, 9);
        let loader = InMemoryLoader::from_documents([
            Document::with_class("Person").with_identity(rid)
        ]);

        let loaded = loader.load(&rid).unwrap();
        assert_eq!(loaded.class_name(), Some("Person"));
        assert!(loaded.is_loaded());
        assert!(loader.load(&RecordId::new(2, 10)).is_err());
    }

    #[test]
    fn test_shared_between_threads() {
        let loader = Arc::new(InMemoryLoader::new());
        let handles: Vec<_> = (0..4)
            .map(|i| {
                let loader = Arc::clone(&loader);
                thread::spawn(move || {
                    loader.insert(Document::new().with_identity(RecordId::new(1, i)));
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(loader.len(), 4);
    }
}
