//! Per-document error storage.
//!
//! A document key, once registered, keeps its first version and error list
//! until it is evicted. Later registrations for the same key are ignored,
//! which also absorbs hosts that classify one document more than once.

use std::sync::Arc;

use loglens_rules::ErrorRecord;
use parking_lot::RwLock;
use serde::Serialize;
use tracing::{debug, info};

/// Errors extracted from one document, with the version that produced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DocumentErrorLog {
    /// Version label of the code that wrote the log.
    pub version: String,
    /// Error records in extraction order.
    pub errors: Vec<ErrorRecord>,
}

/// A referencing error record together with its document's version.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorMatch {
    /// The matching record; always carries a source reference.
    pub record: ErrorRecord,
    /// Version label registered for the document.
    pub version: String,
}

/// Thread-safe store of [`DocumentErrorLog`]s keyed by document.
///
/// Documents are kept in registration order.
#[derive(Debug, Default)]
pub struct ErrorRegistry {
    documents: RwLock<Vec<(String, DocumentErrorLog)>>,
}

impl ErrorRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores the errors for `key` unless the key is already registered.
    ///
    /// Returns `true` if the entry was newly stored.
    pub fn register(&self, key: &str, errors: Vec<ErrorRecord>, version: &str) -> bool {
        let mut documents = self.documents.write();
        if documents.iter().any(|(k, _)| k == key) {
            debug!(document = key, "document already registered, keeping first entry");
            return false;
        }

        info!(document = key, version, errors = errors.len(), "document registered");
        documents.push((
            key.to_string(),
            DocumentErrorLog {
                version: version.to_string(),
                errors,
            },
        ));
        true
    }

    /// Finds the first record on `line_index` that carries a source reference.
    #[must_use]
    pub fn lookup(&self, key: &str, line_index: u32) -> Option<ErrorMatch> {
        let documents = self.documents.read();
        let (_, log) = documents.iter().find(|(k, _)| k == key)?;

        log.errors
            .iter()
            .find(|e| e.line_index == line_index && e.source_reference.is_some())
            .map(|record| ErrorMatch {
                record: record.clone(),
                version: log.version.clone(),
            })
    }

    /// Returns the registered entry for `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<DocumentErrorLog> {
        self.documents
            .read()
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, log)| log.clone())
    }

    /// Removes `key`, returning whether it was present.
    pub fn evict(&self, key: &str) -> bool {
        let mut documents = self.documents.write();
        let before = documents.len();
        documents.retain(|(k, _)| k != key);
        let removed = documents.len() != before;
        if removed {
            debug!(document = key, "document evicted");
        }
        removed
    }

    /// Returns true if `key` is registered.
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.documents.read().iter().any(|(k, _)| k == key)
    }

    /// All entries in registration order, for display.
    #[must_use]
    pub fn snapshot(&self) -> Vec<(String, DocumentErrorLog)> {
        self.documents.read().clone()
    }

    /// Number of registered documents.
    #[must_use]
    pub fn len(&self) -> usize {
        self.documents.read().len()
    }

    /// Returns true if no document is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.documents.read().is_empty()
    }

    /// Removes every entry.
    pub fn clear(&self) {
        self.documents.write().clear();
    }
}

/// Shared registry handle.
pub type SharedRegistry = Arc<ErrorRegistry>;

/// Creates a new shared registry.
#[must_use]
pub fn shared_registry() -> SharedRegistry {
    Arc::new(ErrorRegistry::new())
}
