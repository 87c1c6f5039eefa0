//! Fix actions and the provider surface rules implement

use serde::{Deserialize, Serialize};

use crate::diagnostics::Diagnostic;
use crate::rewriter::{NodeEdit, TreeRewriter};
use crate::semantic::SemanticResolver;
use crate::syntax::{Dialect, Document, GreenNode, SyntaxKind, SyntaxNode};
use crate::Result;

/// How a provider wants "fix all" handled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FixAllStrategy {
    /// Apply every non-conflicting fix, re-analyze, and repeat until nothing
    /// applicable remains
    BatchFixedPoint,
}

/// A located, synthesized fix for one diagnostic
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixAction {
    pub rule_id: String,
    pub title: String,
    pub diagnostic: Diagnostic,
    pub edit: NodeEdit,
}

impl FixAction {
    /// New document with this fix applied; `document` is left untouched
    pub fn apply(&self, document: &Document) -> Result<Document> {
        TreeRewriter::apply_edit(document, &self.edit)
    }
}

/// Fix synthesis for one or more rules
pub trait FixProvider: Send + Sync {
    /// Rule ids this provider can fix
    fn fixable_ids(&self) -> &[&str];

    /// Node kinds a fix for `rule_id` rewrites, nearest ancestor first
    fn compatible_kinds(&self, rule_id: &str) -> &[SyntaxKind];

    /// Human-readable title of the fix offered for `diagnostic`
    fn title(&self, diagnostic: &Diagnostic) -> String;

    /// Replacement for `node`, or `None` when no fix applies
    fn synthesize(
        &self,
        node: &SyntaxNode,
        diagnostic: &Diagnostic,
        dialect: Dialect,
        semantic: &dyn SemanticResolver,
    ) -> anyhow::Result<Option<GreenNode>>;

    fn fix_all_provider(&self) -> FixAllStrategy {
        FixAllStrategy::BatchFixedPoint
    }
}
