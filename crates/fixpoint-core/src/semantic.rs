//! Semantic resolver facade and its concurrent cache
//!
//! Rules never see the host's semantic model. They get the narrow
//! [`SemanticResolver`] capability, which answers one question: what symbol, if
//! any, does this node declare or reference? `None` is an ordinary outcome and
//! predicates must treat it as "cannot confirm".

use std::sync::atomic::{AtomicUsize, Ordering};

use dashmap::DashMap;
use serde::{Deserialize, Serialize};

use crate::syntax::{Dialect, SyntaxKind, SyntaxNode};

/// Declared accessibility of a symbol
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Accessibility {
    Public,
    Internal,
    Protected,
    ProtectedInternal,
    PrivateProtected,
    Private,
    /// Symbols that carry no accessibility (locals, namespaces)
    NotApplicable,
}

impl Accessibility {
    /// Keyword tokens spelling this accessibility in `dialect`, in source order
    ///
    /// Empty for [`Accessibility::NotApplicable`].
    pub fn keywords(self, dialect: Dialect) -> &'static [(SyntaxKind, &'static str)] {
        use SyntaxKind::*;
        match (dialect, self) {
            (_, Accessibility::NotApplicable) => &[],
            (Dialect::Brace, Accessibility::Public) => &[(PublicKw, "public")],
            (Dialect::Brace, Accessibility::Internal) => &[(InternalKw, "internal")],
            (Dialect::Brace, Accessibility::Protected) => &[(ProtectedKw, "protected")],
            (Dialect::Brace, Accessibility::ProtectedInternal) => {
                &[(ProtectedKw, "protected"), (InternalKw, "internal")]
            }
            (Dialect::Brace, Accessibility::PrivateProtected) => {
                &[(PrivateKw, "private"), (ProtectedKw, "protected")]
            }
            (Dialect::Brace, Accessibility::Private) => &[(PrivateKw, "private")],
            (Dialect::Basic, Accessibility::Public) => &[(PublicKw, "Public")],
            (Dialect::Basic, Accessibility::Internal) => &[(FriendKw, "Friend")],
            (Dialect::Basic, Accessibility::Protected) => &[(ProtectedKw, "Protected")],
            (Dialect::Basic, Accessibility::ProtectedInternal) => {
                &[(ProtectedKw, "Protected"), (FriendKw, "Friend")]
            }
            (Dialect::Basic, Accessibility::PrivateProtected) => {
                &[(PrivateKw, "Private"), (ProtectedKw, "Protected")]
            }
            (Dialect::Basic, Accessibility::Private) => &[(PrivateKw, "Private")],
        }
    }

    /// Accessibility spelled by a run of keyword kinds, if it is a valid combination
    pub fn from_keywords(kinds: &[SyntaxKind]) -> Option<Accessibility> {
        use SyntaxKind::*;
        let has = |kind| kinds.contains(&kind);
        let internal = has(InternalKw) || has(FriendKw);
        match (has(PublicKw), has(PrivateKw), has(ProtectedKw), internal) {
            (true, false, false, false) => Some(Accessibility::Public),
            (false, true, false, false) => Some(Accessibility::Private),
            (false, false, true, false) => Some(Accessibility::Protected),
            (false, false, false, true) => Some(Accessibility::Internal),
            (false, false, true, true) => Some(Accessibility::ProtectedInternal),
            (false, true, true, false) => Some(Accessibility::PrivateProtected),
            _ => None,
        }
    }
}

const ROOT_TYPES: &[&str] = &["Object", "ValueType"];

/// Read-only projection of a resolved symbol
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SemanticSymbol {
    pub name: String,
    /// Metadata name of the containing type; for a marker reference this is
    /// the marker's type
    pub containing_type: Option<String>,
    pub interfaces: Vec<String>,
    pub base_type: Option<String>,
    pub accessibility: Accessibility,
}

impl SemanticSymbol {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            containing_type: None,
            interfaces: Vec::new(),
            base_type: None,
            accessibility: Accessibility::NotApplicable,
        }
    }

    pub fn with_containing_type(mut self, containing_type: impl Into<String>) -> Self {
        self.containing_type = Some(containing_type.into());
        self
    }

    pub fn with_interface(mut self, interface: impl Into<String>) -> Self {
        self.interfaces.push(interface.into());
        self
    }

    pub fn with_base_type(mut self, base_type: impl Into<String>) -> Self {
        self.base_type = Some(base_type.into());
        self
    }

    pub fn with_accessibility(mut self, accessibility: Accessibility) -> Self {
        self.accessibility = accessibility;
        self
    }

    /// Whether `interface` is among the implemented interfaces
    ///
    /// Hosts sometimes report the first listed interface as the base type
    /// instead, so the base type is checked too.
    pub fn implements(&self, interface: &str) -> bool {
        self.interfaces.iter().any(|name| name == interface)
            || self.base_type.as_deref() == Some(interface)
    }

    /// Whether this type is `type_name` or derives directly from it
    ///
    /// The universal roots `Object` and `ValueType` never match.
    pub fn inherits_from(&self, type_name: &str) -> bool {
        if ROOT_TYPES.contains(&type_name) {
            return false;
        }
        self.name == type_name || self.base_type.as_deref() == Some(type_name)
    }
}

/// Host-supplied symbol resolution for one tree version
pub trait SemanticResolver: Send + Sync {
    /// Symbol declared or referenced by `node`, `None` when unresolvable
    fn resolve_symbol(&self, node: &SyntaxNode) -> Option<SemanticSymbol>;
}

impl<F> SemanticResolver for F
where
    F: Fn(&SyntaxNode) -> Option<SemanticSymbol> + Send + Sync,
{
    fn resolve_symbol(&self, node: &SyntaxNode) -> Option<SemanticSymbol> {
        self(node)
    }
}

/// Resolver that never resolves anything
#[derive(Debug, Clone, Copy, Default)]
pub struct NullResolver;

impl SemanticResolver for NullResolver {
    fn resolve_symbol(&self, _node: &SyntaxNode) -> Option<SemanticSymbol> {
        None
    }
}

/// Cache hit/miss counters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolverCacheStats {
    pub entries: usize,
    pub hits: usize,
    pub misses: usize,
}

/// Memoizing front for a resolver, valid for a single tree version
///
/// Entries are keyed by the node's child-index path from the root, so every
/// red view of the same green tree shares them, and a node wrapping a single
/// child of the same kind and range keeps its own entry. Concurrent misses on
/// the same node may both hit the inner resolver; the last write wins and both
/// results are equal.
pub struct CachedResolver<'a> {
    inner: &'a dyn SemanticResolver,
    entries: DashMap<Vec<usize>, Option<SemanticSymbol>>,
    hits: AtomicUsize,
    misses: AtomicUsize,
}

impl<'a> CachedResolver<'a> {
    pub fn new(inner: &'a dyn SemanticResolver) -> Self {
        Self {
            inner,
            entries: DashMap::new(),
            hits: AtomicUsize::new(0),
            misses: AtomicUsize::new(0),
        }
    }

    pub fn stats(&self) -> ResolverCacheStats {
        ResolverCacheStats {
            entries: self.entries.len(),
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
        }
    }
}

impl SemanticResolver for CachedResolver<'_> {
    fn resolve_symbol(&self, node: &SyntaxNode) -> Option<SemanticSymbol> {
        let key = node_path(node);
        if let Some(entry) = self.entries.get(&key) {
            self.hits.fetch_add(1, Ordering::Relaxed);
            return entry.value().clone();
        }

        self.misses.fetch_add(1, Ordering::Relaxed);
        let resolved = self.inner.resolve_symbol(node);
        self.entries.insert(key, resolved.clone());
        resolved
    }
}

/// Child indices from the root down to `node`
fn node_path(node: &SyntaxNode) -> Vec<usize> {
    let mut path: Vec<usize> = node.ancestors().map(|ancestor| ancestor.index()).collect();
    path.reverse();
    path
}
