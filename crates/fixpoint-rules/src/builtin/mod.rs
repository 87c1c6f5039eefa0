//! Built-in rules
//!
//! Each module owns one rule: its descriptor, its predicates for both
//! dialects and its fix provider.

pub mod access_modifiers;
pub mod enum_flags;
pub mod test_suffix;

pub use access_modifiers::{EXPLICIT_ACCESS_MODIFIERS, ExplicitAccessModifiersFix};
pub use enum_flags::{ENUM_CAN_HAVE_FLAGS, EnumFlagsFix};
pub use test_suffix::{REMOVE_TEST_SUFFIX, RemoveTestSuffixFix};

/// Ids of every built-in rule, sorted
pub const BUILTIN_RULE_IDS: &[&str] = &[
    ENUM_CAN_HAVE_FLAGS,
    EXPLICIT_ACCESS_MODIFIERS,
    REMOVE_TEST_SUFFIX,
];
