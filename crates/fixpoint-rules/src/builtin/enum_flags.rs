//! Enums that could carry the Flags marker
//!
//! Reported at hidden severity on every enum declaration without a marker
//! resolving to the Flags type. A marker that does not resolve at all counts
//! as present: the rule only fires when it can see every marker.

use fixpoint_core::rewriter::{insert_at_start, marker_list};
use fixpoint_core::syntax::{Dialect, GreenNode, NodeOrToken, SyntaxKind, SyntaxNode, green_token};
use fixpoint_core::{
    AnalyzerBuilder, Diagnostic, Finding, FixProvider, MarkerKind, MarkerTable, Result,
    RuleCategory, RuleDescriptor, SemanticResolver, Severity,
};

use crate::dialect::{ADAPTERS, DialectAdapter, adapter};

/// Rule ID for enums that can have the Flags attribute
pub const ENUM_CAN_HAVE_FLAGS: &str = "attributes/enum-can-have-flags";

const TARGET_KINDS: &[SyntaxKind] = &[SyntaxKind::EnumDeclaration, SyntaxKind::EnumStatement];

pub fn descriptor() -> RuleDescriptor {
    RuleDescriptor::new(
        ENUM_CAN_HAVE_FLAGS,
        "Enum can have Flags attribute",
        "An enum can be marked with the Flags attribute",
    )
    .with_category(RuleCategory::Attributes)
    .with_severity(Severity::Hidden)
}

pub fn register(builder: &mut AnalyzerBuilder, markers: MarkerTable) -> Result<()> {
    builder.register(descriptor())?;
    for &dialect in ADAPTERS.iter() {
        for &kind in dialect.enum_kinds() {
            builder.subscribe(kind, ENUM_CAN_HAVE_FLAGS, move |node, semantic| {
                Ok(check_enum(dialect, markers, node, semantic))
            })?;
        }
    }
    builder.register_fix_provider(EnumFlagsFix { markers })
}

/// Check one enum declaration
pub fn check_enum(
    dialect: &dyn DialectAdapter,
    markers: MarkerTable,
    node: &SyntaxNode,
    semantic: &dyn SemanticResolver,
) -> Vec<Finding> {
    if carries_flags(dialect, markers, node, semantic) {
        return Vec::new();
    }
    vec![Finding::node(node, Vec::new())]
}

/// Whether any marker on `node` is, or might be, the Flags marker
fn carries_flags(
    dialect: &dyn DialectAdapter,
    markers: MarkerTable,
    node: &SyntaxNode,
    semantic: &dyn SemanticResolver,
) -> bool {
    dialect
        .attribute_lists(node)
        .iter()
        .flat_map(|list| dialect.attributes(list))
        .any(|attribute| match semantic.resolve_symbol(&attribute) {
            None => true,
            Some(symbol) => {
                symbol
                    .containing_type
                    .as_deref()
                    .and_then(|name| markers.classify_resolved(name))
                    == Some(MarkerKind::Flags)
            }
        })
}

/// Inserts the Flags marker in front of the declaration
pub struct EnumFlagsFix {
    markers: MarkerTable,
}

impl EnumFlagsFix {
    pub fn new(markers: MarkerTable) -> Self {
        Self { markers }
    }

    /// Name written in source, `Flags` for the `FlagsAttribute` type
    fn marker_name(&self) -> &'static str {
        let name = self
            .markers
            .resolved_name(MarkerKind::Flags)
            .unwrap_or("FlagsAttribute");
        name.strip_suffix("Attribute").unwrap_or(name)
    }
}

impl Default for EnumFlagsFix {
    fn default() -> Self {
        Self::new(MarkerTable::builtin())
    }
}

impl FixProvider for EnumFlagsFix {
    fn fixable_ids(&self) -> &[&str] {
        &[ENUM_CAN_HAVE_FLAGS]
    }

    fn compatible_kinds(&self, _rule_id: &str) -> &[SyntaxKind] {
        TARGET_KINDS
    }

    fn title(&self, _diagnostic: &Diagnostic) -> String {
        format!("Add [{}] attribute", self.marker_name())
    }

    fn synthesize(
        &self,
        node: &SyntaxNode,
        _diagnostic: &Diagnostic,
        dialect: Dialect,
        semantic: &dyn SemanticResolver,
    ) -> anyhow::Result<Option<GreenNode>> {
        if carries_flags(adapter(dialect), self.markers, node, semantic) {
            return Ok(None);
        }

        let marker = marker_list(dialect, self.marker_name());
        Ok(Some(insert_at_start(
            node,
            vec![
                NodeOrToken::Node(marker),
                green_token(SyntaxKind::Whitespace, " "),
            ],
        )))
    }
}
