//! Immutable syntax trees supplied by the host
//!
//! Trees use Rowan's green/red pattern:
//!
//! - **Green tree**: immutable, position-independent, cheap to clone and
//!   `Send + Sync`. A [`Document`] owns its green root, so documents can move
//!   freely between worker threads.
//! - **Red tree**: [`SyntaxNode`] views created on demand with parent pointers
//!   and absolute offsets. Red nodes are thread-local; workers build their own
//!   view from the shared green root.
//!
//! Trivia (whitespace, line breaks, comments) are ordinary tokens, so
//! `document.text()` reproduces the host's source exactly. Any change builds a
//! new green root; the original tree is never touched.

mod builder;
mod document;
mod kind;
mod language;

use std::fmt;

use serde::{Deserialize, Serialize};

pub use builder::{TreeBuilder, green_node, green_token};
pub use document::Document;
pub use kind::SyntaxKind;
pub use language::FixpointLanguage;

pub use rowan::{GreenNode, GreenToken, NodeOrToken, TextRange, TextSize, WalkEvent};

pub type SyntaxNode = rowan::SyntaxNode<FixpointLanguage>;
pub type SyntaxToken = rowan::SyntaxToken<FixpointLanguage>;
pub type SyntaxElement = rowan::SyntaxElement<FixpointLanguage>;
pub type GreenElement = NodeOrToken<GreenNode, GreenToken>;

/// The two syntactic front-ends sharing one rule surface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
    /// Brace-delimited dialect with `[Marker]` lists
    Brace,
    /// Keyword-delimited dialect with `<Marker>` lists and `End` blocks
    Basic,
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Dialect::Brace => write!(f, "brace"),
            Dialect::Basic => write!(f, "basic"),
        }
    }
}

/// Byte span inside one tree version, half-open `start..end`
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct Span {
    pub start: u32,
    pub end: u32,
}

impl Span {
    pub fn new(start: u32, end: u32) -> Self {
        debug_assert!(start <= end, "span start after end");
        Self { start, end }
    }

    pub fn len(&self) -> u32 {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    pub fn contains(&self, other: Span) -> bool {
        self.start <= other.start && other.end <= self.end
    }

    /// Two spans overlap when they share at least one byte or one contains the other.
    /// Spans that merely touch at a boundary do not overlap.
    pub fn overlaps(&self, other: Span) -> bool {
        if self.is_empty() || other.is_empty() {
            return self.contains(other) || other.contains(*self);
        }
        self.start < other.end && other.start < self.end
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

impl From<TextRange> for Span {
    fn from(range: TextRange) -> Self {
        Self::new(range.start().into(), range.end().into())
    }
}

impl From<Span> for TextRange {
    fn from(span: Span) -> Self {
        TextRange::new(TextSize::from(span.start), TextSize::from(span.end))
    }
}

/// Children of `node` that are tokens, trivia included
pub fn child_tokens(node: &SyntaxNode) -> impl Iterator<Item = SyntaxToken> + '_ {
    node.children_with_tokens()
        .filter_map(|element| element.into_token())
}

/// First direct child token of the given kind
pub fn child_token(node: &SyntaxNode, kind: SyntaxKind) -> Option<SyntaxToken> {
    child_tokens(node).find(|token| token.kind() == kind)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_span_overlap_rules() {
        let outer = Span::new(0, 20);
        let inner = Span::new(5, 10);
        let after = Span::new(20, 25);
        let partial = Span::new(15, 22);

        assert!(outer.overlaps(inner));
        assert!(inner.overlaps(outer));
        assert!(!outer.overlaps(after));
        assert!(outer.overlaps(partial));
        assert!(partial.overlaps(after));
        assert!(Span::new(5, 5).overlaps(inner));
        assert!(Span::new(10, 10).overlaps(Span::new(0, 10)));
        assert!(!Span::new(11, 11).overlaps(Span::new(0, 10)));
    }

    #[test]
    fn test_span_text_range_conversion() {
        let span = Span::new(4, 9);
        let range: TextRange = span.into();
        assert_eq!(Span::from(range), span);
        assert_eq!(span.to_string(), "4..9");
        assert_eq!(span.len(), 5);
    }
}
