//! Fixpoint Rules
//!
//! Built-in rules for the fixpoint engine, written once against both
//! front-end dialects through [`dialect::DialectAdapter`].

pub mod builtin;
pub mod dialect;

pub use builtin::BUILTIN_RULE_IDS;
pub use dialect::{BasicAdapter, BraceAdapter, DialectAdapter};

use fixpoint_core::{AnalyzerBuilder, MarkerTable, Result};

/// Register every built-in rule with the builtin marker table
pub fn register_builtin(builder: &mut AnalyzerBuilder) -> Result<()> {
    register_builtin_with_markers(builder, MarkerTable::builtin())
}

/// Register every built-in rule, recognizing markers through `markers`
pub fn register_builtin_with_markers(
    builder: &mut AnalyzerBuilder,
    markers: MarkerTable,
) -> Result<()> {
    builtin::enum_flags::register(builder, markers)?;
    builtin::test_suffix::register(builder, markers)?;
    builtin::access_modifiers::register(builder)?;
    tracing::debug!("Registered {} built-in rules", BUILTIN_RULE_IDS.len());
    Ok(())
}
