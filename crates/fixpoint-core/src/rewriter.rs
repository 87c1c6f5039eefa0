//! Producing new documents from replacement subtrees
//!
//! Rewrites never touch the input tree. Replacing a node rebuilds the green
//! spine from that node up to the root and shares every other subtree with the
//! previous version.

use crate::locator::find_node;
use crate::syntax::{
    Dialect, Document, GreenElement, GreenNode, NodeOrToken, Span, SyntaxKind, SyntaxNode,
    SyntaxToken, green_node, green_token,
};
use crate::{FixpointError, Result};

/// Replace the node of `kind` spanning `span` with `replacement`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeEdit {
    pub rule_id: String,
    pub span: Span,
    pub kind: SyntaxKind,
    pub replacement: GreenNode,
}

impl NodeEdit {
    pub fn new(rule_id: impl Into<String>, target: &SyntaxNode, replacement: GreenNode) -> Self {
        Self {
            rule_id: rule_id.into(),
            span: target.text_range().into(),
            kind: target.kind(),
            replacement,
        }
    }

    /// Signed change in text length once applied
    pub fn delta(&self) -> i64 {
        i64::from(u32::from(self.replacement.text_len())) - i64::from(self.span.len())
    }

    /// Span the replacement occupies in the rewritten document
    pub fn replaced_span(&self) -> Span {
        Span::new(
            self.span.start,
            self.span.start + u32::from(self.replacement.text_len()),
        )
    }
}

pub struct TreeRewriter;

impl TreeRewriter {
    /// New document with `node` swapped for `replacement`
    ///
    /// `node` may come from any red view of `document`'s current tree.
    pub fn apply_replacement(
        document: &Document,
        node: &SyntaxNode,
        replacement: GreenNode,
    ) -> Result<Document> {
        let root = document.syntax();
        let span: Span = node.text_range().into();
        let target = find_node(&root, span, node.kind()).ok_or_else(|| {
            FixpointError::internal_error(format!(
                "{:?} at {} is not part of version {} of {}",
                node.kind(),
                span,
                document.version(),
                document.path().display()
            ))
        })?;
        Ok(document.with_root(target.replace_with(replacement)))
    }

    /// Apply one edit, re-locating its target first
    pub fn apply_edit(document: &Document, edit: &NodeEdit) -> Result<Document> {
        let green = Self::splice(document.green().clone(), edit)?;
        Ok(document.with_root(green))
    }

    /// Apply non-overlapping edits as one new document version
    ///
    /// Edits are applied from the end of the document backwards so earlier
    /// spans stay valid. Any overlap rejects the whole set.
    pub fn apply_edits(document: &Document, edits: &[NodeEdit]) -> Result<Document> {
        let mut ordered: Vec<&NodeEdit> = edits.iter().collect();
        ordered.sort_by(|a, b| b.span.cmp(&a.span));

        for (index, edit) in ordered.iter().enumerate() {
            if let Some(other) = ordered[index + 1..]
                .iter()
                .find(|other| other.span.overlaps(edit.span))
            {
                tracing::debug!(
                    "Edit for '{}' at {} overlaps '{}' at {}",
                    edit.rule_id,
                    edit.span,
                    other.rule_id,
                    other.span
                );
                return Err(FixpointError::edit_conflict(&edit.rule_id, edit.span));
            }
        }

        let mut green = document.green().clone();
        for edit in ordered {
            green = Self::splice(green, edit)?;
        }
        Ok(document.with_root(green))
    }

    fn splice(green: GreenNode, edit: &NodeEdit) -> Result<GreenNode> {
        let root = SyntaxNode::new_root(green);
        let target = find_node(&root, edit.span, edit.kind)
            .ok_or_else(|| FixpointError::stale_location(&edit.rule_id, edit.span))?;
        Ok(target.replace_with(edit.replacement.clone()))
    }
}

/// Index of the first child that is not trivia
fn first_significant_child(node: &SyntaxNode) -> usize {
    node.children_with_tokens()
        .position(|child| !child.kind().is_trivia())
        .unwrap_or(0)
}

/// Copy of `node` with `elements` inserted before its first non-trivia child
pub fn insert_at_start(node: &SyntaxNode, elements: Vec<GreenElement>) -> GreenNode {
    let index = first_significant_child(node);
    node.green().splice_children(index..index, elements)
}

/// Copy of `node` with `elements` inserted after its leading marker lists
///
/// Trivia following the last marker list stays in front of the inserted
/// elements. Without marker lists this behaves like [`insert_at_start`].
pub fn insert_after_markers(node: &SyntaxNode, elements: Vec<GreenElement>) -> GreenNode {
    let children: Vec<_> = node.children_with_tokens().collect();
    let last_marker = children
        .iter()
        .take_while(|child| child.kind().is_trivia() || child.kind() == SyntaxKind::AttributeList)
        .enumerate()
        .filter(|(_, child)| child.kind() == SyntaxKind::AttributeList)
        .map(|(index, _)| index)
        .last();

    let index = match last_marker {
        Some(marker) => {
            let trailing_trivia = children[marker + 1..]
                .iter()
                .take_while(|child| child.kind().is_trivia())
                .count();
            marker + 1 + trailing_trivia
        }
        None => first_significant_child(node),
    };
    node.green().splice_children(index..index, elements)
}

/// Copy of `node` with its direct child `token` replaced
///
/// `None` when `token` is not a direct child of `node`.
pub fn replace_token(node: &SyntaxNode, token: &SyntaxToken, text: &str) -> Option<GreenNode> {
    if token.parent().as_ref() != Some(node) {
        return None;
    }
    Some(
        node.green()
            .replace_child(token.index(), green_token(token.kind(), text)),
    )
}

/// A single-marker list: `[Name]` in the brace dialect, `<Name>` in the basic one
pub fn marker_list(dialect: Dialect, name: &str) -> GreenNode {
    let (open, close) = match dialect {
        Dialect::Brace => ((SyntaxKind::OpenBracket, "["), (SyntaxKind::CloseBracket, "]")),
        Dialect::Basic => ((SyntaxKind::LessThan, "<"), (SyntaxKind::GreaterThan, ">")),
    };
    green_node(
        SyntaxKind::AttributeList,
        vec![
            green_token(open.0, open.1),
            NodeOrToken::Node(green_node(
                SyntaxKind::Attribute,
                vec![green_token(SyntaxKind::Identifier, name)],
            )),
            green_token(close.0, close.1),
        ],
    )
}

/// Keyword tokens, each followed by a single space
pub fn keywords_with_space(keywords: &[(SyntaxKind, &str)]) -> Vec<GreenElement> {
    keywords
        .iter()
        .flat_map(|&(kind, text)| {
            [green_token(kind, text), green_token(SyntaxKind::Whitespace, " ")]
        })
        .collect()
}
