//! Per-dialect views over declarations
//!
//! Both front-ends produce the same kind of information (marker lists,
//! modifiers, a declared name, an enclosing type) but arrange it differently.
//! Brace declarations are single nodes whose members sit between the braces.
//! Basic declarations are a header statement inside a block that also holds the
//! members and the closing `End` statement; markers and modifiers live on the
//! header. Rules query a [`DialectAdapter`] instead of matching on kinds.

use fixpoint_core::syntax::{Dialect, SyntaxKind, SyntaxNode, SyntaxToken, child_tokens};
use fixpoint_core::Accessibility;

/// Structural queries a rule needs, answered per dialect
pub trait DialectAdapter: Send + Sync {
    fn dialect(&self) -> Dialect;

    /// Kinds that declare an enum
    fn enum_kinds(&self) -> &'static [SyntaxKind];

    /// Kinds that declare a method
    fn method_kinds(&self) -> &'static [SyntaxKind];

    /// Kinds that may carry an accessibility modifier
    fn declaration_kinds(&self) -> &'static [SyntaxKind];

    /// Nearest enclosing type declaration, `None` at top level
    fn container(&self, declaration: &SyntaxNode) -> Option<SyntaxNode>;

    fn is_interface(&self, container: &SyntaxNode) -> bool;

    /// Accessibility the language assumes when none is written
    fn default_accessibility(
        &self,
        declaration: &SyntaxNode,
        container: Option<&SyntaxNode>,
    ) -> Accessibility;

    /// Marker lists attached to a declaration, in source order
    fn attribute_lists(&self, declaration: &SyntaxNode) -> Vec<SyntaxNode> {
        declaration
            .children()
            .filter(|child| child.kind() == SyntaxKind::AttributeList)
            .collect()
    }

    fn attributes(&self, list: &SyntaxNode) -> Vec<SyntaxNode> {
        list.children()
            .filter(|child| child.kind() == SyntaxKind::Attribute)
            .collect()
    }

    /// Marker name as written, qualifiers included (`Test`, `NUnit.Test`)
    fn attribute_name(&self, attribute: &SyntaxNode) -> Option<String> {
        let name: String = child_tokens(attribute)
            .filter(|token| matches!(token.kind(), SyntaxKind::Identifier | SyntaxKind::Dot))
            .map(|token| token.text().to_string())
            .collect();
        (!name.is_empty()).then_some(name)
    }

    /// Token holding the declared name
    ///
    /// The last identifier of the declaration header, so return types and
    /// field types in front of the name are skipped.
    fn identifier(&self, declaration: &SyntaxNode) -> Option<SyntaxToken> {
        declaration
            .children_with_tokens()
            .take_while(|element| !ends_header(element.kind()))
            .filter_map(|element| element.into_token())
            .filter(|token| token.kind() == SyntaxKind::Identifier)
            .last()
    }

    fn has_accessibility_keyword(&self, declaration: &SyntaxNode) -> bool {
        child_tokens(declaration).any(|token| token.kind().is_accessibility_keyword())
    }
}

fn ends_header(kind: SyntaxKind) -> bool {
    use SyntaxKind::*;
    matches!(
        kind,
        ParameterList | Block | OpenBrace | Semicolon | Equals | Colon | AsKw | Newline
    )
}

#[derive(Debug, Clone, Copy, Default)]
pub struct BraceAdapter;

impl DialectAdapter for BraceAdapter {
    fn dialect(&self) -> Dialect {
        Dialect::Brace
    }

    fn enum_kinds(&self) -> &'static [SyntaxKind] {
        &[SyntaxKind::EnumDeclaration]
    }

    fn method_kinds(&self) -> &'static [SyntaxKind] {
        &[SyntaxKind::MethodDeclaration]
    }

    fn declaration_kinds(&self) -> &'static [SyntaxKind] {
        use SyntaxKind::*;
        &[
            ClassDeclaration,
            StructDeclaration,
            InterfaceDeclaration,
            EnumDeclaration,
            MethodDeclaration,
            FieldDeclaration,
            PropertyDeclaration,
        ]
    }

    fn container(&self, declaration: &SyntaxNode) -> Option<SyntaxNode> {
        declaration.parent().filter(|parent| {
            matches!(
                parent.kind(),
                SyntaxKind::ClassDeclaration
                    | SyntaxKind::StructDeclaration
                    | SyntaxKind::InterfaceDeclaration
            )
        })
    }

    fn is_interface(&self, container: &SyntaxNode) -> bool {
        container.kind() == SyntaxKind::InterfaceDeclaration
    }

    fn default_accessibility(
        &self,
        _declaration: &SyntaxNode,
        container: Option<&SyntaxNode>,
    ) -> Accessibility {
        match container {
            Some(_) => Accessibility::Private,
            None => Accessibility::Internal,
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct BasicAdapter;

impl BasicAdapter {
    fn is_block(kind: SyntaxKind) -> bool {
        use SyntaxKind::*;
        matches!(
            kind,
            ClassBlock | StructureBlock | InterfaceBlock | ModuleBlock | EnumBlock | MethodBlock
        )
    }

    fn is_type_block(kind: SyntaxKind) -> bool {
        use SyntaxKind::*;
        matches!(kind, ClassBlock | StructureBlock | InterfaceBlock | ModuleBlock)
    }
}

impl DialectAdapter for BasicAdapter {
    fn dialect(&self) -> Dialect {
        Dialect::Basic
    }

    fn enum_kinds(&self) -> &'static [SyntaxKind] {
        &[SyntaxKind::EnumStatement]
    }

    fn method_kinds(&self) -> &'static [SyntaxKind] {
        &[SyntaxKind::SubStatement, SyntaxKind::FunctionStatement]
    }

    fn declaration_kinds(&self) -> &'static [SyntaxKind] {
        use SyntaxKind::*;
        &[
            ClassStatement,
            StructureStatement,
            InterfaceStatement,
            ModuleStatement,
            EnumStatement,
            SubStatement,
            FunctionStatement,
        ]
    }

    fn container(&self, declaration: &SyntaxNode) -> Option<SyntaxNode> {
        let mut parent = declaration.parent()?;
        // A header statement's own block is not its container
        if Self::is_block(parent.kind()) && parent.first_child().as_ref() == Some(declaration) {
            parent = parent.parent()?;
        }
        Self::is_type_block(parent.kind()).then_some(parent)
    }

    fn is_interface(&self, container: &SyntaxNode) -> bool {
        container.kind() == SyntaxKind::InterfaceBlock
    }

    fn default_accessibility(
        &self,
        _declaration: &SyntaxNode,
        container: Option<&SyntaxNode>,
    ) -> Accessibility {
        match container {
            Some(_) => Accessibility::Public,
            None => Accessibility::Internal,
        }
    }
}

/// Both adapters, brace first
pub static ADAPTERS: [&dyn DialectAdapter; 2] = [&BraceAdapter, &BasicAdapter];

pub fn adapter(dialect: Dialect) -> &'static dyn DialectAdapter {
    match dialect {
        Dialect::Brace => &BraceAdapter,
        Dialect::Basic => &BasicAdapter,
    }
}

/// Adapter owning `kind`, `None` for kinds both dialects share
pub fn adapter_for_kind(kind: SyntaxKind) -> Option<&'static dyn DialectAdapter> {
    kind.dialect().map(adapter)
}
