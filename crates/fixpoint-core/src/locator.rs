//! Mapping diagnostics back onto nodes

use crate::diagnostics::Diagnostic;
use crate::syntax::{Document, NodeOrToken, Span, SyntaxElement, SyntaxKind, SyntaxNode, TextRange};

/// Node of `kind` whose range is exactly `span`
pub fn find_node(root: &SyntaxNode, span: Span, kind: SyntaxKind) -> Option<SyntaxNode> {
    let range: TextRange = span.into();
    let covering = covering(root, range)?;
    let start = match covering {
        NodeOrToken::Node(node) => node,
        NodeOrToken::Token(token) => token.parent()?,
    };
    start
        .ancestors()
        .take_while(|node| node.text_range() == range)
        .find(|node| node.kind() == kind)
}

/// Smallest element covering `range`, `None` when out of bounds
fn covering(root: &SyntaxNode, range: TextRange) -> Option<SyntaxElement> {
    if !root.text_range().contains_range(range) {
        return None;
    }
    Some(root.covering_element(range))
}

/// Element with exactly this range and kind; tokens win over nodes
fn anchor(root: &SyntaxNode, span: Span, kind: SyntaxKind) -> Option<SyntaxElement> {
    let range: TextRange = span.into();
    match covering(root, range)? {
        NodeOrToken::Token(token) if token.text_range() == range && token.kind() == kind => {
            Some(NodeOrToken::Token(token))
        }
        NodeOrToken::Token(token) => find_node(&token.parent()?, span, kind).map(NodeOrToken::Node),
        NodeOrToken::Node(_) => find_node(root, span, kind).map(NodeOrToken::Node),
    }
}

/// Re-resolves diagnostics against the current version of a document
pub struct FixLocator;

impl FixLocator {
    /// Node a fix for `diagnostic` should rewrite
    ///
    /// The diagnostic's anchor (span plus kind) must still exist; from there
    /// the nearest ancestor-or-self whose kind is in `compatible_kinds` is the
    /// target. An empty `compatible_kinds` accepts the anchor node itself, or
    /// the parent of an anchor token. `None` means the location went stale.
    pub fn locate(
        diagnostic: &Diagnostic,
        document: &Document,
        compatible_kinds: &[SyntaxKind],
    ) -> Option<SyntaxNode> {
        let root = document.syntax();
        let span = diagnostic.span();
        let Some(anchor) = anchor(&root, span, diagnostic.anchor_kind) else {
            tracing::debug!(
                "Stale location for '{}' at {} in version {}",
                diagnostic.rule_id,
                span,
                document.version()
            );
            return None;
        };

        let base = match anchor {
            NodeOrToken::Node(node) => node,
            NodeOrToken::Token(token) => token.parent()?,
        };
        if compatible_kinds.is_empty() {
            return Some(base);
        }
        base.ancestors()
            .find(|node| compatible_kinds.contains(&node.kind()))
    }
}
