//! Documents under per-document edit locks

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use rayon::prelude::*;

use crate::analyzer::Analyzer;
use crate::batch::BatchOutcome;
use crate::cancel::CancellationToken;
use crate::semantic::SemanticResolver;
use crate::syntax::Document;
use crate::{FixpointError, Result};

/// Open documents keyed by path
///
/// Analysis works on snapshots. A batch fix holds the document's lock from the
/// first analysis to the final write-back, so two batch passes on one document
/// never interleave while other documents proceed in parallel. Each path keeps
/// one lock for as long as it is open.
#[derive(Default)]
pub struct Workspace {
    documents: DashMap<PathBuf, Arc<Mutex<Document>>>,
}

impl Workspace {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a document, returning the previous version
    ///
    /// An open document is replaced in place under its lock, so a batch
    /// running on it finishes and stores its result first.
    pub fn insert(&self, document: Document) -> Option<Document> {
        let path = document.path().to_path_buf();
        loop {
            let slot = match self.documents.entry(path.clone()) {
                Entry::Vacant(vacant) => {
                    vacant.insert(Arc::new(Mutex::new(document)));
                    return None;
                }
                Entry::Occupied(occupied) => Arc::clone(occupied.get()),
            };

            let mut guard = slot.lock().unwrap_or_else(PoisonError::into_inner);
            if !self.holds(&path, &slot) {
                // removed while we waited for the lock
                continue;
            }
            let previous = std::mem::replace(&mut *guard, document);
            drop(guard);
            slot.clear_poison();
            return Some(previous);
        }
    }

    pub fn remove(&self, path: &Path) -> Option<Document> {
        self.documents
            .remove(path)
            .and_then(|(_, entry)| entry.lock().ok().map(|doc| doc.clone()))
    }

    /// Current version of a document
    pub fn snapshot(&self, path: &Path) -> Result<Document> {
        let entry = self.entry(path)?;
        let guard = entry.lock().map_err(|_| poisoned(path))?;
        Ok(guard.clone())
    }

    pub fn paths(&self) -> Vec<PathBuf> {
        let mut paths: Vec<_> = self.documents.iter().map(|e| e.key().clone()).collect();
        paths.sort();
        paths
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// Analyze and batch-fix one document under its exclusive lock
    ///
    /// The stored document is replaced only when the batch was not cancelled.
    pub fn fix_all(
        &self,
        path: &Path,
        analyzer: &Analyzer,
        semantic: &dyn SemanticResolver,
        cancel: &CancellationToken,
    ) -> Result<BatchOutcome> {
        let entry = self.entry(path)?;
        let mut guard = entry.lock().map_err(|_| poisoned(path))?;

        let report = analyzer.analyze(&guard, semantic, cancel)?;
        let outcome = analyzer.fix_all(&guard, &report.diagnostics, semantic, cancel)?;
        if !outcome.cancelled {
            *guard = outcome.document.clone();
        }
        Ok(outcome)
    }

    /// [`Workspace::fix_all`] for every document, in parallel across documents
    pub fn fix_all_documents(
        &self,
        analyzer: &Analyzer,
        semantic: &dyn SemanticResolver,
        cancel: &CancellationToken,
    ) -> Vec<(PathBuf, Result<BatchOutcome>)> {
        self.paths()
            .into_par_iter()
            .map(|path| {
                let outcome = self.fix_all(&path, analyzer, semantic, cancel);
                (path, outcome)
            })
            .collect()
    }

    fn holds(&self, path: &Path, slot: &Arc<Mutex<Document>>) -> bool {
        self.documents
            .get(path)
            .is_some_and(|entry| Arc::ptr_eq(entry.value(), slot))
    }

    fn entry(&self, path: &Path) -> Result<Arc<Mutex<Document>>> {
        self.documents
            .get(path)
            .map(|entry| Arc::clone(entry.value()))
            .ok_or_else(|| {
                FixpointError::internal_error(format!("Unknown document '{}'", path.display()))
            })
    }
}

fn poisoned(path: &Path) -> FixpointError {
    FixpointError::internal_error(format!("Edit lock for '{}' is poisoned", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::{Dialect, SyntaxKind, TreeBuilder};

    fn document(path: &str) -> Document {
        let mut builder = TreeBuilder::new();
        builder
            .start_node(SyntaxKind::CompilationUnit)
            .token(SyntaxKind::Identifier, "x")
            .finish_node();
        Document::new(path, Dialect::Brace, builder.finish())
    }

    #[test]
    fn test_insert_snapshot_remove() {
        let workspace = Workspace::new();
        assert!(workspace.insert(document("b.cs")).is_none());
        assert!(workspace.insert(document("a.cs")).is_none());
        assert!(workspace.insert(document("a.cs")).is_some());

        assert_eq!(workspace.len(), 2);
        assert_eq!(workspace.paths(), [PathBuf::from("a.cs"), PathBuf::from("b.cs")]);
        assert_eq!(workspace.snapshot(Path::new("a.cs")).unwrap().text(), "x");

        assert!(workspace.remove(Path::new("a.cs")).is_some());
        assert!(matches!(
            workspace.snapshot(Path::new("a.cs")),
            Err(FixpointError::InternalError { .. })
        ));
    }
}
