//! Declarations without an explicit accessibility modifier
//!
//! Types and members that rely on the language default are reported on their
//! identifier, except members of interfaces, which cannot carry one. The fix
//! writes out the accessibility the symbol already has, so applying it never
//! changes meaning.

use fixpoint_core::rewriter::{insert_after_markers, keywords_with_space};
use fixpoint_core::syntax::{Dialect, GreenNode, SyntaxKind, SyntaxNode};
use fixpoint_core::{
    Accessibility, AnalyzerBuilder, Diagnostic, Finding, FixProvider, Result, RuleCategory,
    RuleDescriptor, SemanticResolver, Severity,
};

use crate::dialect::{ADAPTERS, DialectAdapter, adapter};

/// Rule ID for declarations relying on default accessibility
pub const EXPLICIT_ACCESS_MODIFIERS: &str = "general/explicit-access-modifiers";

const TARGET_KINDS: &[SyntaxKind] = &[
    SyntaxKind::ClassDeclaration,
    SyntaxKind::StructDeclaration,
    SyntaxKind::InterfaceDeclaration,
    SyntaxKind::EnumDeclaration,
    SyntaxKind::MethodDeclaration,
    SyntaxKind::FieldDeclaration,
    SyntaxKind::PropertyDeclaration,
    SyntaxKind::ClassStatement,
    SyntaxKind::StructureStatement,
    SyntaxKind::InterfaceStatement,
    SyntaxKind::ModuleStatement,
    SyntaxKind::EnumStatement,
    SyntaxKind::SubStatement,
    SyntaxKind::FunctionStatement,
];

pub fn descriptor() -> RuleDescriptor {
    RuleDescriptor::new(
        EXPLICIT_ACCESS_MODIFIERS,
        "Explicit access modifiers",
        "Declare an explicit accessibility modifier on '{0}'",
    )
    .with_category(RuleCategory::General)
    .with_severity(Severity::Info)
}

pub fn register(builder: &mut AnalyzerBuilder) -> Result<()> {
    builder.register(descriptor())?;
    for &dialect in ADAPTERS.iter() {
        for &kind in dialect.declaration_kinds() {
            builder.subscribe(kind, EXPLICIT_ACCESS_MODIFIERS, move |node, _semantic| {
                Ok(check_declaration(dialect, node))
            })?;
        }
    }
    builder.register_fix_provider(ExplicitAccessModifiersFix)
}

pub fn check_declaration(dialect: &dyn DialectAdapter, node: &SyntaxNode) -> Vec<Finding> {
    if dialect.has_accessibility_keyword(node) {
        return Vec::new();
    }
    if dialect
        .container(node)
        .is_some_and(|container| dialect.is_interface(&container))
    {
        return Vec::new();
    }

    match dialect.identifier(node) {
        Some(identifier) => vec![Finding::token(&identifier, vec![identifier.text().to_string()])],
        None => Vec::new(),
    }
}

/// Accessibility to write on `node`
///
/// The resolved symbol's declared accessibility when there is one, otherwise
/// the dialect's default for the declaration's position.
pub fn effective_accessibility(
    dialect: &dyn DialectAdapter,
    node: &SyntaxNode,
    semantic: &dyn SemanticResolver,
) -> Accessibility {
    match semantic.resolve_symbol(node).map(|symbol| symbol.accessibility) {
        Some(accessibility) if accessibility != Accessibility::NotApplicable => accessibility,
        _ => {
            let container = dialect.container(node);
            dialect.default_accessibility(node, container.as_ref())
        }
    }
}

/// Inserts the effective accessibility keyword after any marker lists
pub struct ExplicitAccessModifiersFix;

impl FixProvider for ExplicitAccessModifiersFix {
    fn fixable_ids(&self) -> &[&str] {
        &[EXPLICIT_ACCESS_MODIFIERS]
    }

    fn compatible_kinds(&self, _rule_id: &str) -> &[SyntaxKind] {
        TARGET_KINDS
    }

    fn title(&self, _diagnostic: &Diagnostic) -> String {
        "Add explicit accessibility modifier".to_string()
    }

    fn synthesize(
        &self,
        node: &SyntaxNode,
        _diagnostic: &Diagnostic,
        dialect: Dialect,
        semantic: &dyn SemanticResolver,
    ) -> anyhow::Result<Option<GreenNode>> {
        let dialect = adapter(dialect);
        if dialect.has_accessibility_keyword(node) {
            return Ok(None);
        }

        let accessibility = effective_accessibility(dialect, node, semantic);
        let keywords = accessibility.keywords(dialect.dialect());
        if keywords.is_empty() {
            return Ok(None);
        }
        Ok(Some(insert_after_markers(node, keywords_with_space(keywords))))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fixpoint_core::syntax::TreeBuilder;
    use fixpoint_core::{NullResolver, SemanticSymbol};

    /// `<container> Box { [Obsolete] static int count; }`
    fn nested_field(container: SyntaxKind, keyword: SyntaxKind) -> SyntaxNode {
        let mut builder = TreeBuilder::new();
        builder
            .start_node(SyntaxKind::CompilationUnit)
            .start_node(container)
            .token(keyword, "type")
            .whitespace(" ")
            .token(SyntaxKind::Identifier, "Box")
            .whitespace(" ")
            .token(SyntaxKind::OpenBrace, "{")
            .whitespace(" ")
            .start_node(SyntaxKind::FieldDeclaration)
            .start_node(SyntaxKind::AttributeList)
            .token(SyntaxKind::OpenBracket, "[")
            .start_node(SyntaxKind::Attribute)
            .token(SyntaxKind::Identifier, "Obsolete")
            .finish_node()
            .token(SyntaxKind::CloseBracket, "]")
            .finish_node()
            .whitespace(" ")
            .token(SyntaxKind::StaticKw, "static")
            .whitespace(" ")
            .token(SyntaxKind::Identifier, "int")
            .whitespace(" ")
            .token(SyntaxKind::Identifier, "count")
            .token(SyntaxKind::Semicolon, ";")
            .finish_node()
            .whitespace(" ")
            .token(SyntaxKind::CloseBrace, "}")
            .finish_node()
            .finish_node();
        SyntaxNode::new_root(builder.finish())
    }

    fn field(root: &SyntaxNode) -> SyntaxNode {
        root.descendants()
            .find(|node| node.kind() == SyntaxKind::FieldDeclaration)
            .unwrap()
    }

    fn dummy_diagnostic() -> Diagnostic {
        use fixpoint_core::{Location, Span};
        Diagnostic {
            rule_id: EXPLICIT_ACCESS_MODIFIERS.to_string(),
            severity: Severity::Info,
            message: String::new(),
            args: vec!["count".to_string()],
            location: Location {
                file: "a.cs".into(),
                span: Span::default(),
                version: 0,
            },
            anchor_kind: SyntaxKind::Identifier,
        }
    }

    #[test]
    fn test_reports_on_identifier() {
        let root = nested_field(SyntaxKind::ClassDeclaration, SyntaxKind::ClassKw);
        let findings = check_declaration(adapter(Dialect::Brace), &field(&root));
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].args, ["count"]);
        assert_eq!(findings[0].anchor_kind, SyntaxKind::Identifier);
    }

    #[test]
    fn test_interface_members_are_skipped() {
        let root = nested_field(SyntaxKind::InterfaceDeclaration, SyntaxKind::InterfaceKw);
        assert!(check_declaration(adapter(Dialect::Brace), &field(&root)).is_empty());
    }

    #[test]
    fn test_fix_uses_resolved_accessibility() {
        let root = nested_field(SyntaxKind::ClassDeclaration, SyntaxKind::ClassKw);
        let node = field(&root);
        let resolver = |node: &SyntaxNode| {
            (node.kind() == SyntaxKind::FieldDeclaration).then(|| {
                SemanticSymbol::new("count").with_accessibility(Accessibility::ProtectedInternal)
            })
        };

        let fixed = ExplicitAccessModifiersFix
            .synthesize(&node, &dummy_diagnostic(), Dialect::Brace, &resolver)
            .unwrap()
            .unwrap();
        let fixed = SyntaxNode::new_root(fixed);
        assert_eq!(
            fixed.text().to_string(),
            "[Obsolete] protected internal static int count;"
        );
        assert!(check_declaration(adapter(Dialect::Brace), &fixed).is_empty());
    }

    #[test]
    fn test_fix_falls_back_to_default() {
        let root = nested_field(SyntaxKind::ClassDeclaration, SyntaxKind::ClassKw);
        let fixed = ExplicitAccessModifiersFix
            .synthesize(&field(&root), &dummy_diagnostic(), Dialect::Brace, &NullResolver)
            .unwrap()
            .unwrap();
        assert_eq!(
            SyntaxNode::new_root(fixed).text().to_string(),
            "[Obsolete] private static int count;"
        );
    }
}
