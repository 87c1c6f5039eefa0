//! Engine configuration
//!
//! Severity overrides per rule id plus the limits the batch coordinator and
//! analyzer honor. Files are TOML, JSON or YAML with camelCase keys:
//!
//! ```toml
//! maxBatchPasses = 16
//! parallel = true
//!
//! [rules]
//! "tests/remove-test-suffix" = "off"
//! "attributes/enum-can-have-flags" = "info"
//! ```

mod loader;

pub use loader::ConfigLoader;

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::registry::{RuleDescriptor, Severity};
use crate::{FixpointError, Result};

/// Configured severity for a rule, `off` disables it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuleSeverity {
    Off,
    Hidden,
    Info,
    #[serde(alias = "warning")]
    Warn,
    Error,
}

impl RuleSeverity {
    pub fn to_severity(self) -> Option<Severity> {
        match self {
            RuleSeverity::Off => None,
            RuleSeverity::Hidden => Some(Severity::Hidden),
            RuleSeverity::Info => Some(Severity::Info),
            RuleSeverity::Warn => Some(Severity::Warning),
            RuleSeverity::Error => Some(Severity::Error),
        }
    }
}

/// Top-level engine configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct EngineConfig {
    /// Per-rule severity overrides keyed by rule id
    pub rules: HashMap<String, RuleSeverity>,

    /// Upper bound on fixed-point passes in one batch application
    pub max_batch_passes: usize,

    /// Split dispatch of one document across worker threads
    pub parallel: bool,

    /// Memoize semantic lookups during a pass
    pub cache_symbols: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            rules: HashMap::new(),
            max_batch_passes: 32,
            parallel: false,
            cache_symbols: true,
        }
    }
}

impl EngineConfig {
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)
            .map_err(|e| FixpointError::config_error(format!("Invalid TOML config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_str(content: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(content)
            .map_err(|e| FixpointError::config_error(format!("Invalid JSON config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_yaml_str(content: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(content)
            .map_err(|e| FixpointError::config_error(format!("Invalid YAML config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_batch_passes == 0 {
            return Err(FixpointError::config_error(
                "maxBatchPasses must be at least 1",
            ));
        }
        Ok(())
    }

    pub fn with_rule(mut self, rule_id: impl Into<String>, severity: RuleSeverity) -> Self {
        self.rules.insert(rule_id.into(), severity);
        self
    }

    /// Effective severity for a rule, `None` when the rule is disabled
    pub fn effective_severity(&self, descriptor: &RuleDescriptor) -> Option<Severity> {
        match self.rules.get(&descriptor.id) {
            Some(configured) => configured.to_severity(),
            None if descriptor.enabled_by_default => Some(descriptor.default_severity),
            None => None,
        }
    }

    pub fn is_enabled(&self, descriptor: &RuleDescriptor) -> bool {
        self.effective_severity(descriptor).is_some()
    }
}
