//! Rowan language implementation
//!
//! Connects [`SyntaxKind`] to Rowan's generic CST infrastructure.

use rowan::Language;

use super::SyntaxKind;

/// Zero-sized marker type tying rowan trees to [`SyntaxKind`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FixpointLanguage;

impl Language for FixpointLanguage {
    type Kind = SyntaxKind;

    fn kind_from_raw(raw: rowan::SyntaxKind) -> Self::Kind {
        SyntaxKind::from_raw(raw.0).unwrap_or_else(|| {
            tracing::warn!("Unknown syntax kind: {}", raw.0);
            SyntaxKind::Error
        })
    }

    fn kind_to_raw(kind: Self::Kind) -> rowan::SyntaxKind {
        kind.into()
    }
}
