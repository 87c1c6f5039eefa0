//! Versioned, immutable source units

use std::path::{Path, PathBuf};

use rowan::GreenNode;

use super::{Dialect, SyntaxNode};

/// One source unit as supplied by the host
///
/// A document is a value: rewriting produces a new document with the next
/// version number and leaves the original untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    path: PathBuf,
    dialect: Dialect,
    version: u64,
    green: GreenNode,
}

impl Document {
    /// Create version 0 of a document from a host-built green tree
    pub fn new(path: impl Into<PathBuf>, dialect: Dialect, green: GreenNode) -> Self {
        Self {
            path: path.into(),
            dialect,
            version: 0,
            green,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    /// Tree version; diagnostics remember the version they were computed against
    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn green(&self) -> &GreenNode {
        &self.green
    }

    /// Fresh red view over the tree, owned by the calling thread
    pub fn syntax(&self) -> SyntaxNode {
        SyntaxNode::new_root(self.green.clone())
    }

    pub fn text(&self) -> String {
        self.syntax().text().to_string()
    }

    pub fn text_len(&self) -> u32 {
        self.green.text_len().into()
    }

    /// Number of nodes in the tree, root included
    pub fn node_count(&self) -> usize {
        self.syntax().descendants().count()
    }

    /// Successor document with a new root
    pub fn with_root(&self, green: GreenNode) -> Document {
        Self {
            path: self.path.clone(),
            dialect: self.dialect,
            version: self.version + 1,
            green,
        }
    }
}
