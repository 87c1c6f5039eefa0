//! Compile-time table of recognized markers
//!
//! Markers (attribute-like annotations) are recognized either by the type
//! name their reference resolves to, or, for rules that do not consult
//! semantics, by the name written in source.

use serde::Serialize;

/// Semantic meaning of a recognized marker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum MarkerKind {
    /// Enum members may be combined as bit flags
    Flags,
    /// Method is a unit test entry point
    TestMethod,
}

/// How a marker entry is matched
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerMatch {
    /// Against the metadata name of the resolved marker type
    ResolvedType,
    /// Against the name as written in source
    SyntacticName,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MarkerEntry {
    pub name: &'static str,
    pub kind: MarkerKind,
    pub matched_by: MarkerMatch,
}

pub const BUILTIN_MARKERS: &[MarkerEntry] = &[
    MarkerEntry {
        name: "FlagsAttribute",
        kind: MarkerKind::Flags,
        matched_by: MarkerMatch::ResolvedType,
    },
    MarkerEntry {
        name: "Test",
        kind: MarkerKind::TestMethod,
        matched_by: MarkerMatch::SyntacticName,
    },
    MarkerEntry {
        name: "TestMethod",
        kind: MarkerKind::TestMethod,
        matched_by: MarkerMatch::SyntacticName,
    },
    MarkerEntry {
        name: "Fact",
        kind: MarkerKind::TestMethod,
        matched_by: MarkerMatch::SyntacticName,
    },
];

/// Lookup over a static marker table
#[derive(Debug, Clone, Copy)]
pub struct MarkerTable {
    entries: &'static [MarkerEntry],
}

impl Default for MarkerTable {
    fn default() -> Self {
        Self::builtin()
    }
}

impl MarkerTable {
    pub const fn new(entries: &'static [MarkerEntry]) -> Self {
        Self { entries }
    }

    pub const fn builtin() -> Self {
        Self::new(BUILTIN_MARKERS)
    }

    /// Classify a resolved marker type by its metadata name
    pub fn classify_resolved(&self, type_name: &str) -> Option<MarkerKind> {
        self.classify(type_name, MarkerMatch::ResolvedType)
    }

    /// Classify a marker by the name written in source, compared exactly
    pub fn classify_syntactic(&self, written_name: &str) -> Option<MarkerKind> {
        self.classify(written_name, MarkerMatch::SyntacticName)
    }

    /// Canonical resolved-type name for `kind`, if the table has one
    pub fn resolved_name(&self, kind: MarkerKind) -> Option<&'static str> {
        self.entries
            .iter()
            .find(|entry| entry.kind == kind && entry.matched_by == MarkerMatch::ResolvedType)
            .map(|entry| entry.name)
    }

    pub fn entries(&self) -> &'static [MarkerEntry] {
        self.entries
    }

    fn classify(&self, name: &str, matched_by: MarkerMatch) -> Option<MarkerKind> {
        self.entries
            .iter()
            .find(|entry| entry.matched_by == matched_by && entry.name == name)
            .map(|entry| entry.kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_classification() {
        let table = MarkerTable::builtin();
        assert_eq!(table.classify_resolved("FlagsAttribute"), Some(MarkerKind::Flags));
        assert_eq!(table.classify_resolved("Flags"), None);
        assert_eq!(table.classify_syntactic("Fact"), Some(MarkerKind::TestMethod));
        assert_eq!(table.classify_syntactic("TestMethod"), Some(MarkerKind::TestMethod));
        assert_eq!(table.classify_syntactic("test"), None);
        assert_eq!(table.classify_syntactic("FlagsAttribute"), None);
        assert_eq!(table.resolved_name(MarkerKind::Flags), Some("FlagsAttribute"));
        assert_eq!(table.resolved_name(MarkerKind::TestMethod), None);
    }

    #[test]
    fn test_custom_table() {
        static ENTRIES: &[MarkerEntry] = &[MarkerEntry {
            name: "Theory",
            kind: MarkerKind::TestMethod,
            matched_by: MarkerMatch::SyntacticName,
        }];
        let table = MarkerTable::new(ENTRIES);
        assert_eq!(table.classify_syntactic("Theory"), Some(MarkerKind::TestMethod));
        assert_eq!(table.classify_syntactic("Fact"), None);
    }
}
