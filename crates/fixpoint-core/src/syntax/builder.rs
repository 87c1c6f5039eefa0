//! Host-facing tree construction
//!
//! The engine never parses source text. Hosts translate their own parse trees
//! into green trees through [`TreeBuilder`]; rule fixes use [`green_token`] and
//! [`green_node`] to synthesize replacement subtrees.

use rowan::{GreenNode, GreenNodeBuilder, GreenToken, NodeOrToken};

use super::{GreenElement, SyntaxKind};

/// Thin wrapper over rowan's builder speaking [`SyntaxKind`]
pub struct TreeBuilder {
    inner: GreenNodeBuilder<'static>,
}

impl Default for TreeBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TreeBuilder {
    pub fn new() -> Self {
        Self {
            inner: GreenNodeBuilder::new(),
        }
    }

    /// Open a node; every call must be matched by [`TreeBuilder::finish_node`]
    pub fn start_node(&mut self, kind: SyntaxKind) -> &mut Self {
        self.inner.start_node(kind.into());
        self
    }

    pub fn token(&mut self, kind: SyntaxKind, text: &str) -> &mut Self {
        self.inner.token(kind.into(), text);
        self
    }

    pub fn whitespace(&mut self, text: &str) -> &mut Self {
        self.token(SyntaxKind::Whitespace, text)
    }

    pub fn finish_node(&mut self) -> &mut Self {
        self.inner.finish_node();
        self
    }

    /// Consume the builder and return the root green node
    pub fn finish(self) -> GreenNode {
        self.inner.finish()
    }
}

/// Build a standalone token for use in a replacement subtree
pub fn green_token(kind: SyntaxKind, text: &str) -> GreenElement {
    NodeOrToken::Token(GreenToken::new(kind.into(), text))
}

/// Build a standalone node for use in a replacement subtree
pub fn green_node(kind: SyntaxKind, children: Vec<GreenElement>) -> GreenNode {
    GreenNode::new(kind.into(), children)
}
