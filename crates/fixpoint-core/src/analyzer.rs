//! Analyzer assembly and the host-facing analysis surface
//!
//! Rules are registered on an [`AnalyzerBuilder`]. [`AnalyzerBuilder::build`]
//! freezes everything into an [`Analyzer`], which is cheap to clone and safe
//! to share between threads; there is no way to register rules afterwards.

use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use rayon::prelude::*;

use crate::batch::{BatchFixCoordinator, BatchOutcome};
use crate::cancel::CancellationToken;
use crate::config::EngineConfig;
use crate::diagnostics::{AnalysisReport, Diagnostic, DiagnosticReporter};
use crate::dispatcher::{Finding, Predicate, SyntaxDispatcher};
use crate::fix::{FixAction, FixAllStrategy, FixProvider};
use crate::locator::FixLocator;
use crate::registry::{RuleDescriptor, RuleHandle, RuleRegistry};
use crate::rewriter::NodeEdit;
use crate::semantic::{CachedResolver, SemanticResolver};
use crate::syntax::{Document, SyntaxKind, SyntaxNode};
use crate::{FixpointError, Result};

/// Collects descriptors, subscriptions and fix providers
#[derive(Default)]
pub struct AnalyzerBuilder {
    registry: RuleRegistry,
    dispatcher: SyntaxDispatcher,
    providers: HashMap<String, Arc<dyn FixProvider>>,
    config: EngineConfig,
}

impl AnalyzerBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    pub fn register(&mut self, descriptor: RuleDescriptor) -> Result<RuleHandle> {
        self.registry.register(descriptor)
    }

    /// Subscribe a predicate for an already registered rule
    pub fn subscribe<F>(&mut self, kind: SyntaxKind, rule_id: &str, predicate: F) -> Result<()>
    where
        F: Fn(&SyntaxNode, &dyn SemanticResolver) -> anyhow::Result<Vec<Finding>>
            + Send
            + Sync
            + 'static,
    {
        self.subscribe_shared(kind, rule_id, Arc::new(predicate))
    }

    pub fn subscribe_shared(
        &mut self,
        kind: SyntaxKind,
        rule_id: &str,
        predicate: Predicate,
    ) -> Result<()> {
        self.registry.lookup(rule_id)?;
        self.dispatcher.subscribe_shared(kind, rule_id, predicate);
        Ok(())
    }

    /// Register a fix provider; each of its ids must be registered and unclaimed
    pub fn register_fix_provider<P>(&mut self, provider: P) -> Result<()>
    where
        P: FixProvider + 'static,
    {
        let provider: Arc<dyn FixProvider> = Arc::new(provider);
        for id in provider.fixable_ids() {
            self.registry.lookup(id)?;
            if self.providers.contains_key(*id) {
                return Err(FixpointError::duplicate_rule_id(*id));
            }
        }
        for id in provider.fixable_ids() {
            self.providers.insert(id.to_string(), Arc::clone(&provider));
        }
        Ok(())
    }

    pub fn build(self) -> Result<Analyzer> {
        self.config.validate()?;
        for rule_id in self.config.rules.keys() {
            if !self.registry.contains(rule_id) {
                tracing::warn!("Configuration mentions unknown rule '{}'", rule_id);
            }
        }

        tracing::debug!(
            "Built analyzer with {} rules, {} subscriptions and {} fixable ids",
            self.registry.len(),
            self.dispatcher.len(),
            self.providers.len()
        );
        Ok(Analyzer {
            registry: Arc::new(self.registry),
            dispatcher: Arc::new(self.dispatcher),
            providers: Arc::new(self.providers),
            config: Arc::new(self.config),
        })
    }
}

/// Frozen rule set ready for analysis and fixing
#[derive(Clone)]
pub struct Analyzer {
    registry: Arc<RuleRegistry>,
    dispatcher: Arc<SyntaxDispatcher>,
    providers: Arc<HashMap<String, Arc<dyn FixProvider>>>,
    config: Arc<EngineConfig>,
}

impl Analyzer {
    pub fn builder() -> AnalyzerBuilder {
        AnalyzerBuilder::new()
    }

    pub fn registry(&self) -> &RuleRegistry {
        &self.registry
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn dispatcher(&self) -> &SyntaxDispatcher {
        &self.dispatcher
    }

    /// Run every enabled rule over `document`
    pub fn analyze(
        &self,
        document: &Document,
        semantic: &dyn SemanticResolver,
        cancel: &CancellationToken,
    ) -> Result<AnalysisReport> {
        let enabled = |rule_id: &str| self.is_enabled(rule_id);
        self.run(document, semantic, &enabled, cancel)
    }

    /// Run only the listed rules, skipping any that configuration disables
    pub fn analyze_rules(
        &self,
        document: &Document,
        semantic: &dyn SemanticResolver,
        rule_ids: &[&str],
        cancel: &CancellationToken,
    ) -> Result<AnalysisReport> {
        for rule_id in rule_ids {
            self.registry.lookup(rule_id)?;
        }
        let selected =
            |rule_id: &str| rule_ids.iter().any(|id| *id == rule_id) && self.is_enabled(rule_id);
        self.run(document, semantic, &selected, cancel)
    }

    /// Analyze independent documents on the rayon pool
    pub fn analyze_many(
        &self,
        units: &[(&Document, &dyn SemanticResolver)],
        cancel: &CancellationToken,
    ) -> Vec<Result<AnalysisReport>> {
        units
            .par_iter()
            .map(|(document, semantic)| self.analyze(document, *semantic, cancel))
            .collect()
    }

    /// Rule ids with a registered fix provider, sorted
    pub fn fixable_ids(&self) -> BTreeSet<&str> {
        self.providers.keys().map(String::as_str).collect()
    }

    pub fn fix_all_provider(&self, rule_id: &str) -> Option<FixAllStrategy> {
        self.providers
            .get(rule_id)
            .map(|provider| provider.fix_all_provider())
    }

    pub(crate) fn provider(&self, rule_id: &str) -> Option<&Arc<dyn FixProvider>> {
        self.providers.get(rule_id)
    }

    /// Fix for one diagnostic against the current version of `document`
    ///
    /// `Ok(None)` when no provider handles the rule or the provider declines.
    /// A diagnostic from another file or a later version, or whose location no
    /// longer maps onto a compatible node, is `StaleLocation`. Diagnostics from
    /// earlier versions of the same file are re-located.
    pub fn compute_fix(
        &self,
        diagnostic: &Diagnostic,
        document: &Document,
        semantic: &dyn SemanticResolver,
    ) -> Result<Option<FixAction>> {
        let rule_id = diagnostic.rule_id.as_str();
        self.registry.lookup(rule_id)?;
        let Some(provider) = self.providers.get(rule_id) else {
            return Ok(None);
        };

        if !diagnostic.belongs_to(document) {
            tracing::debug!(
                "'{}' from {} (version {}) does not apply to {} (version {})",
                rule_id,
                diagnostic.location.file.display(),
                diagnostic.location.version,
                document.path().display(),
                document.version()
            );
            return Err(FixpointError::stale_location(rule_id, diagnostic.span()));
        }
        if diagnostic.is_stale_for(document) {
            tracing::debug!(
                "Re-locating '{}' from version {} onto version {}",
                rule_id,
                diagnostic.location.version,
                document.version()
            );
        }

        let target =
            FixLocator::locate(diagnostic, document, provider.compatible_kinds(rule_id))
                .ok_or_else(|| FixpointError::stale_location(rule_id, diagnostic.span()))?;

        let replacement = provider
            .synthesize(&target, diagnostic, document.dialect(), semantic)
            .map_err(|e| FixpointError::predicate_failure(rule_id, format!("{e:#}")))?;

        Ok(replacement.map(|replacement| FixAction {
            rule_id: rule_id.to_string(),
            title: provider.title(diagnostic),
            diagnostic: diagnostic.clone(),
            edit: NodeEdit::new(rule_id, &target, replacement),
        }))
    }

    /// Apply fixes for `diagnostics` until a fixed point is reached
    pub fn fix_all(
        &self,
        document: &Document,
        diagnostics: &[Diagnostic],
        semantic: &dyn SemanticResolver,
        cancel: &CancellationToken,
    ) -> Result<BatchOutcome> {
        BatchFixCoordinator::new(self).apply_all(document, diagnostics, semantic, cancel)
    }

    fn is_enabled(&self, rule_id: &str) -> bool {
        self.registry
            .lookup(rule_id)
            .map(|descriptor| self.config.is_enabled(descriptor))
            .unwrap_or(false)
    }

    fn run(
        &self,
        document: &Document,
        semantic: &dyn SemanticResolver,
        filter: &(dyn Fn(&str) -> bool + Sync),
        cancel: &CancellationToken,
    ) -> Result<AnalysisReport> {
        let cached;
        let semantic: &dyn SemanticResolver = if self.config.cache_symbols {
            cached = CachedResolver::new(semantic);
            &cached
        } else {
            semantic
        };

        let output = if self.config.parallel {
            self.dispatcher
                .dispatch_parallel(document.green(), semantic, filter, cancel)?
        } else {
            self.dispatcher
                .dispatch(&document.syntax(), semantic, filter, cancel)?
        };

        let mut reporter = DiagnosticReporter::for_document(&self.registry, &self.config, document);
        for (rule_id, finding) in output.findings {
            reporter.report(&rule_id, finding.span, finding.anchor_kind, finding.args)?;
        }
        for fault in output.faults {
            reporter.fault(fault);
        }

        let report = reporter.finish();
        tracing::debug!(
            "Analyzed {} (version {}): {} diagnostics, {} faults",
            document.path().display(),
            document.version(),
            report.diagnostics.len(),
            report.faults.len()
        );
        Ok(report)
    }
}
