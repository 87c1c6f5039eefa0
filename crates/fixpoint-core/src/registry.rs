//! Rule descriptor registry
//!
//! Static metadata for every rule, keyed by a unique id. Writes need
//! `&mut RuleRegistry` and only happen while the analyzer is being assembled;
//! afterwards the registry sits behind an `Arc` and is read concurrently.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{FixpointError, Result};

/// Diagnostic severity, ordered from least to most severe
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Reported to the host but not surfaced to users by default
    Hidden,
    Info,
    Warning,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Severity::Hidden => "hidden",
            Severity::Info => "info",
            Severity::Warning => "warning",
            Severity::Error => "error",
        };
        f.write_str(name)
    }
}

/// Categories for organizing rules
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RuleCategory {
    /// Marker usage on declarations
    Attributes,
    /// Naming and shape of test code
    Tests,
    /// General style conventions
    General,
    /// Naming conventions
    Naming,
    /// Custom category using a bespoke slug
    Custom(String),
}

impl RuleCategory {
    /// Return the kebab-case slug used for IDs and filtering
    pub fn slug(&self) -> &str {
        match self {
            RuleCategory::Attributes => "attributes",
            RuleCategory::Tests => "tests",
            RuleCategory::General => "general",
            RuleCategory::Naming => "naming",
            RuleCategory::Custom(name) => name.as_str(),
        }
    }

    /// Create a category from its slug, mapping unknown slugs to custom categories
    pub fn from_slug(slug: &str) -> Self {
        match slug {
            "attributes" => RuleCategory::Attributes,
            "tests" => RuleCategory::Tests,
            "general" | "style" => RuleCategory::General,
            "naming" => RuleCategory::Naming,
            other => RuleCategory::Custom(other.to_string()),
        }
    }
}

impl Serialize for RuleCategory {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.slug())
    }
}

impl<'de> Deserialize<'de> for RuleCategory {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let slug = String::deserialize(deserializer)?;
        Ok(RuleCategory::from_slug(&slug))
    }
}

/// Immutable metadata describing one rule
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleDescriptor {
    pub id: String,
    pub title: String,
    /// Message with positional `{0}`, `{1}`, ... placeholders
    pub message_template: String,
    pub category: RuleCategory,
    pub default_severity: Severity,
    pub enabled_by_default: bool,
}

impl RuleDescriptor {
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        message_template: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            message_template: message_template.into(),
            category: RuleCategory::General,
            default_severity: Severity::Warning,
            enabled_by_default: true,
        }
    }

    pub fn with_category(mut self, category: RuleCategory) -> Self {
        self.category = category;
        self
    }

    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.default_severity = severity;
        self
    }

    pub fn disabled_by_default(mut self) -> Self {
        self.enabled_by_default = false;
        self
    }
}

/// Position of a descriptor in registration order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RuleHandle(usize);

impl RuleHandle {
    pub fn index(self) -> usize {
        self.0
    }
}

/// Registry for rule descriptors
#[derive(Debug, Default)]
pub struct RuleRegistry {
    descriptors: Vec<RuleDescriptor>,
    by_id: HashMap<String, RuleHandle>,
}

impl RuleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a descriptor; ids are unique for the life of the registry
    pub fn register(&mut self, descriptor: RuleDescriptor) -> Result<RuleHandle> {
        if self.by_id.contains_key(&descriptor.id) {
            tracing::error!("Rule '{}' is already registered", descriptor.id);
            return Err(FixpointError::duplicate_rule_id(descriptor.id));
        }

        let handle = RuleHandle(self.descriptors.len());
        tracing::debug!(
            "Registered rule '{}' ({}, {})",
            descriptor.id,
            descriptor.category.slug(),
            descriptor.default_severity
        );
        self.by_id.insert(descriptor.id.clone(), handle);
        self.descriptors.push(descriptor);
        Ok(handle)
    }

    pub fn lookup(&self, id: &str) -> Result<&RuleDescriptor> {
        self.by_id
            .get(id)
            .map(|handle| &self.descriptors[handle.0])
            .ok_or_else(|| FixpointError::unknown_rule_id(id))
    }

    pub fn get(&self, handle: RuleHandle) -> Option<&RuleDescriptor> {
        self.descriptors.get(handle.0)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.by_id.contains_key(id)
    }

    /// Descriptors in registration order
    pub fn descriptors(&self) -> impl Iterator<Item = &RuleDescriptor> {
        self.descriptors.iter()
    }

    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn descriptor(id: &str) -> RuleDescriptor {
        RuleDescriptor::new(id, "Title", "Message {0}")
    }

    #[test]
    fn test_register_and_lookup() {
        let mut registry = RuleRegistry::new();
        let first = registry.register(descriptor("general/a")).unwrap();
        let second = registry
            .register(descriptor("general/b").with_severity(Severity::Hidden))
            .unwrap();

        assert_eq!(first.index(), 0);
        assert_eq!(second.index(), 1);
        assert_eq!(registry.len(), 2);
        assert_eq!(
            registry.lookup("general/b").unwrap().default_severity,
            Severity::Hidden
        );
        assert_eq!(registry.get(first).map(|d| d.id.as_str()), Some("general/a"));

        let ids: Vec<_> = registry.descriptors().map(|d| d.id.as_str()).collect();
        assert_eq!(ids, ["general/a", "general/b"]);
    }

    #[test]
    fn test_duplicate_id_rejected() {
        let mut registry = RuleRegistry::new();
        registry.register(descriptor("general/a")).unwrap();
        let err = registry.register(descriptor("general/a")).unwrap_err();
        assert!(matches!(
            err,
            FixpointError::DuplicateRuleId { ref rule_id } if rule_id == "general/a"
        ));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_unknown_id() {
        let registry = RuleRegistry::new();
        assert!(matches!(
            registry.lookup("missing"),
            Err(FixpointError::UnknownRuleId { .. })
        ));
    }

    #[test]
    fn test_severity_order_and_category_slug() {
        assert!(Severity::Hidden < Severity::Info);
        assert!(Severity::Info < Severity::Warning);
        assert!(Severity::Warning < Severity::Error);
        assert_eq!(RuleCategory::from_slug("attributes"), RuleCategory::Attributes);
        assert_eq!(RuleCategory::from_slug("perf").slug(), "perf");
    }
}
