//! Redundant "Test" suffix on test methods
//!
//! A method whose name ends in "Test" (any casing) and whose first marker list
//! holds a recognized test marker is reported on its identifier. Markers are
//! matched by the name written in source; later marker lists are not consulted.

use fixpoint_core::rewriter::replace_token;
use fixpoint_core::syntax::{Dialect, GreenNode, Span, SyntaxKind, SyntaxNode, child_tokens};
use fixpoint_core::{
    AnalyzerBuilder, Diagnostic, Finding, FixProvider, MarkerKind, MarkerTable, Result,
    RuleCategory, RuleDescriptor, SemanticResolver, Severity,
};

use crate::dialect::{ADAPTERS, DialectAdapter};

/// Rule ID for test methods carrying a redundant suffix
pub const REMOVE_TEST_SUFFIX: &str = "tests/remove-test-suffix";

const SUFFIX: &str = "Test";

const TARGET_KINDS: &[SyntaxKind] = &[
    SyntaxKind::MethodDeclaration,
    SyntaxKind::SubStatement,
    SyntaxKind::FunctionStatement,
];

pub fn descriptor() -> RuleDescriptor {
    RuleDescriptor::new(
        REMOVE_TEST_SUFFIX,
        "Test methods do not need a \"Test\" suffix",
        "Test method \"{0}\" might not need the \"Test\" suffix",
    )
    .with_category(RuleCategory::Tests)
    .with_severity(Severity::Warning)
}

pub fn register(builder: &mut AnalyzerBuilder, markers: MarkerTable) -> Result<()> {
    builder.register(descriptor())?;
    for &dialect in ADAPTERS.iter() {
        for &kind in dialect.method_kinds() {
            builder.subscribe(kind, REMOVE_TEST_SUFFIX, move |node, _semantic| {
                Ok(check_method(dialect, markers, node))
            })?;
        }
    }
    builder.register_fix_provider(RemoveTestSuffixFix)
}

/// Check one method declaration
pub fn check_method(
    dialect: &dyn DialectAdapter,
    markers: MarkerTable,
    node: &SyntaxNode,
) -> Vec<Finding> {
    let Some(identifier) = dialect.identifier(node) else {
        return Vec::new();
    };
    let name = identifier.text();
    if stripped(name).is_none() || !is_test_method(dialect, markers, node) {
        return Vec::new();
    }
    vec![Finding::token(&identifier, vec![name.to_string()])]
}

fn is_test_method(dialect: &dyn DialectAdapter, markers: MarkerTable, node: &SyntaxNode) -> bool {
    let Some(first) = dialect.attribute_lists(node).into_iter().next() else {
        return false;
    };
    dialect
        .attributes(&first)
        .iter()
        .filter_map(|attribute| dialect.attribute_name(attribute))
        .any(|name| markers.classify_syntactic(&name) == Some(MarkerKind::TestMethod))
}

/// `name` without any trailing suffixes, `None` when it does not end in one
///
/// Repeated suffixes are all removed so the renamed method is not reported
/// again.
fn stripped(name: &str) -> Option<&str> {
    let mut rest = strip_once(name)?;
    while let Some(shorter) = strip_once(rest) {
        rest = shorter;
    }
    Some(rest)
}

fn strip_once(name: &str) -> Option<&str> {
    let cut = name.len().checked_sub(SUFFIX.len())?;
    let tail = name.get(cut..)?;
    tail.eq_ignore_ascii_case(SUFFIX).then(|| &name[..cut])
}

/// Renames the method without its suffix
pub struct RemoveTestSuffixFix;

impl FixProvider for RemoveTestSuffixFix {
    fn fixable_ids(&self) -> &[&str] {
        &[REMOVE_TEST_SUFFIX]
    }

    fn compatible_kinds(&self, _rule_id: &str) -> &[SyntaxKind] {
        TARGET_KINDS
    }

    fn title(&self, _diagnostic: &Diagnostic) -> String {
        "Remove \"Test\" suffix".to_string()
    }

    fn synthesize(
        &self,
        node: &SyntaxNode,
        diagnostic: &Diagnostic,
        _dialect: Dialect,
        _semantic: &dyn SemanticResolver,
    ) -> anyhow::Result<Option<GreenNode>> {
        let span = diagnostic.span();
        let Some(identifier) = child_tokens(node)
            .find(|token| Span::from(token.text_range()) == span)
        else {
            anyhow::bail!("no identifier at {span} in {:?}", node.kind());
        };

        match stripped(identifier.text()) {
            Some(name) if !name.is_empty() => Ok(replace_token(node, &identifier, name)),
            _ => {
                tracing::debug!("'{}' has nothing left after the suffix", identifier.text());
                Ok(None)
            }
        }
    }
}
