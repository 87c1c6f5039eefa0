//! Diagnostics, analyzer faults and the reporter that collects them

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::config::EngineConfig;
use crate::registry::{RuleRegistry, Severity};
use crate::syntax::{Document, Span, SyntaxKind};
use crate::Result;

/// Where a diagnostic points, pinned to the tree version it was computed on
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Location {
    pub file: PathBuf,
    pub span: Span,
    pub version: u64,
}

/// A rule finding rendered for the host
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Diagnostic {
    pub rule_id: String,
    pub severity: Severity,
    pub message: String,
    pub args: Vec<String>,
    pub location: Location,
    /// Kind of the node or token the finding was anchored on
    pub anchor_kind: SyntaxKind,
}

impl Diagnostic {
    pub fn span(&self) -> Span {
        self.location.span
    }

    /// Whether this was computed against `document` or one of its earlier versions
    pub fn belongs_to(&self, document: &Document) -> bool {
        self.location.file == document.path() && self.location.version <= document.version()
    }

    /// Whether `document` is a later version than the one this was computed against
    pub fn is_stale_for(&self, document: &Document) -> bool {
        self.belongs_to(document) && self.location.version < document.version()
    }
}

/// Internal failure of a rule, kept apart from diagnostics
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzerFault {
    pub rule_id: String,
    pub node_kind: SyntaxKind,
    pub span: Span,
    pub message: String,
    /// The predicate panicked rather than returning an error
    pub panicked: bool,
}

/// Everything one analysis pass produced for one document
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisReport {
    pub file: PathBuf,
    pub version: u64,
    pub diagnostics: Vec<Diagnostic>,
    pub faults: Vec<AnalyzerFault>,
}

impl AnalysisReport {
    pub fn for_rule<'a>(&'a self, rule_id: &'a str) -> impl Iterator<Item = &'a Diagnostic> + 'a {
        self.diagnostics.iter().filter(move |d| d.rule_id == rule_id)
    }

    pub fn is_clean(&self) -> bool {
        self.diagnostics.is_empty() && self.faults.is_empty()
    }
}

/// Substitute positional `{0}`, `{1}`, ... placeholders
///
/// Placeholders without a matching argument are left as written.
pub fn render_message(template: &str, args: &[String]) -> String {
    let mut rendered = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        rendered.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let substituted = after.find('}').and_then(|close| {
            let index: usize = after[..close].parse().ok()?;
            let arg = args.get(index)?;
            Some((arg, close))
        });

        match substituted {
            Some((arg, close)) => {
                rendered.push_str(arg);
                rest = &after[close + 1..];
            }
            None => {
                rendered.push('{');
                rest = after;
            }
        }
    }

    rendered.push_str(rest);
    rendered
}

/// Accumulates diagnostics for one document version
pub struct DiagnosticReporter<'a> {
    registry: &'a RuleRegistry,
    config: &'a EngineConfig,
    file: PathBuf,
    version: u64,
    diagnostics: Vec<Diagnostic>,
    faults: Vec<AnalyzerFault>,
}

impl<'a> DiagnosticReporter<'a> {
    pub fn new(
        registry: &'a RuleRegistry,
        config: &'a EngineConfig,
        file: impl Into<PathBuf>,
        version: u64,
    ) -> Self {
        Self {
            registry,
            config,
            file: file.into(),
            version,
            diagnostics: Vec::new(),
            faults: Vec::new(),
        }
    }

    pub fn for_document(
        registry: &'a RuleRegistry,
        config: &'a EngineConfig,
        document: &Document,
    ) -> Self {
        Self::new(registry, config, document.path(), document.version())
    }

    pub fn file(&self) -> &Path {
        &self.file
    }

    /// Render and record a finding
    ///
    /// Returns `Ok(false)` when configuration disables the rule.
    pub fn report(
        &mut self,
        rule_id: &str,
        span: Span,
        anchor_kind: SyntaxKind,
        args: Vec<String>,
    ) -> Result<bool> {
        let descriptor = self.registry.lookup(rule_id)?;
        let Some(severity) = self.config.effective_severity(descriptor) else {
            return Ok(false);
        };

        let message = render_message(&descriptor.message_template, &args);
        tracing::trace!("{} at {}: {}", rule_id, span, message);
        self.diagnostics.push(Diagnostic {
            rule_id: descriptor.id.clone(),
            severity,
            message,
            args,
            location: Location {
                file: self.file.clone(),
                span,
                version: self.version,
            },
            anchor_kind,
        });
        Ok(true)
    }

    pub fn fault(&mut self, fault: AnalyzerFault) {
        tracing::warn!(
            "Rule '{}' faulted on {:?} at {}: {}",
            fault.rule_id,
            fault.node_kind,
            fault.span,
            fault.message
        );
        self.faults.push(fault);
    }

    /// Diagnostics ordered by span start, then rule id
    pub fn finish(mut self) -> AnalysisReport {
        self.diagnostics.sort_by(|a, b| {
            a.span()
                .start
                .cmp(&b.span().start)
                .then_with(|| a.rule_id.cmp(&b.rule_id))
        });
        AnalysisReport {
            file: self.file,
            version: self.version,
            diagnostics: self.diagnostics,
            faults: self.faults,
        }
    }
}
