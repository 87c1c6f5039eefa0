//! Batch fix coordinator
//!
//! "Fix all" runs as a fixed-point loop over one document:
//!
//! 1. compute a fix for every pending diagnostic against the current version
//! 2. accept fixes front to back, deferring any whose target overlaps an
//!    already accepted one
//! 3. apply the accepted set as one new version
//! 4. re-run only the targeted rules and check that no fix re-triggers its own
//!    rule on the node it rewrote; locations that do are not retried
//! 5. repeat with the fresh diagnostics until nothing applicable remains
//!
//! The pass count is bounded by configuration and by the document's node count.
//! Cancellation between passes discards every computed version and hands back
//! the original document.

use std::collections::BTreeSet;

use serde::Serialize;

use crate::analyzer::Analyzer;
use crate::cancel::CancellationToken;
use crate::diagnostics::Diagnostic;
use crate::fix::FixAction;
use crate::locator::FixLocator;
use crate::rewriter::{NodeEdit, TreeRewriter};
use crate::semantic::SemanticResolver;
use crate::syntax::{Document, Span};
use crate::{FixpointError, Result, ResultExt};

/// Lifecycle of one diagnostic inside a batch
///
/// `Detected` moves to exactly one of the other states; nothing leaves
/// `Applied`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum DiagnosticState {
    Detected,
    /// Fix applied and the idempotence re-check passed
    Applied,
    /// Location no longer maps onto the current tree; dropped
    Stale,
    /// Overlapped an accepted fix; retried next pass
    Deferred,
}

/// Result of a batch application
#[derive(Debug, Clone)]
pub struct BatchOutcome {
    /// Final document; the input document when cancelled
    pub document: Document,
    /// Rewrite passes performed
    pub passes: usize,
    /// Diagnostics whose fixes were applied, in application order
    pub applied: Vec<Diagnostic>,
    /// Diagnostics dropped because their location went stale
    pub stale: Vec<Diagnostic>,
    /// Diagnostics left at the fixed point: still deferred, declined by their
    /// provider, without a provider, or failing the idempotence re-check
    pub unresolved: Vec<Diagnostic>,
    pub cancelled: bool,
}

impl BatchOutcome {
    fn cancelled(document: &Document, diagnostics: &[Diagnostic], passes: usize) -> Self {
        tracing::info!(
            "Batch fix for {} cancelled after {} passes; original document kept",
            document.path().display(),
            passes
        );
        Self {
            document: document.clone(),
            passes,
            applied: Vec::new(),
            stale: Vec::new(),
            unresolved: diagnostics.to_vec(),
            cancelled: true,
        }
    }

    /// Final state of a diagnostic instance seen during the batch
    pub fn state_of(&self, diagnostic: &Diagnostic) -> DiagnosticState {
        if self.applied.contains(diagnostic) {
            DiagnosticState::Applied
        } else if self.stale.contains(diagnostic) {
            DiagnosticState::Stale
        } else if self.unresolved.contains(diagnostic) {
            DiagnosticState::Deferred
        } else {
            DiagnosticState::Detected
        }
    }
}

/// Classification of the pending diagnostics in one pass
#[derive(Default)]
struct PassPlan {
    accepted: Vec<FixAction>,
    deferred: Vec<Diagnostic>,
    declined: Vec<Diagnostic>,
    stale: Vec<Diagnostic>,
}

/// Drives the fixed-point loop for one analyzer
pub struct BatchFixCoordinator<'a> {
    analyzer: &'a Analyzer,
}

impl<'a> BatchFixCoordinator<'a> {
    pub fn new(analyzer: &'a Analyzer) -> Self {
        Self { analyzer }
    }

    /// Apply fixes for `diagnostics` to `document` until a fixed point
    ///
    /// Unknown rule ids are an error. Everything else degrades to skipping the
    /// affected diagnostic.
    pub fn apply_all(
        &self,
        document: &Document,
        diagnostics: &[Diagnostic],
        semantic: &dyn SemanticResolver,
        cancel: &CancellationToken,
    ) -> Result<BatchOutcome> {
        for diagnostic in diagnostics {
            self.analyzer.registry().lookup(&diagnostic.rule_id)?;
        }

        let (mut pending, without_provider): (Vec<_>, Vec<_>) = diagnostics
            .iter()
            .cloned()
            .partition(|d| self.analyzer.provider(&d.rule_id).is_some());
        let targets: BTreeSet<String> = pending.iter().map(|d| d.rule_id.clone()).collect();
        let target_ids: Vec<&str> = targets.iter().map(String::as_str).collect();

        let limit = self
            .analyzer
            .config()
            .max_batch_passes
            .min(document.node_count() + 1);

        let mut current = document.clone();
        let mut passes = 0;
        let mut applied = Vec::new();
        let mut stale = Vec::new();
        let mut unresolved: Vec<Diagnostic>;
        let mut excluded: Vec<(String, Span)> = Vec::new();
        let mut rejected = Vec::new();

        loop {
            if cancel.is_cancelled() {
                return Ok(BatchOutcome::cancelled(document, diagnostics, passes));
            }

            let (retry, parked): (Vec<_>, Vec<_>) = pending
                .into_iter()
                .partition(|d| !is_excluded(&excluded, d));
            if retry.is_empty() {
                unresolved = parked;
                break;
            }

            let plan = self.plan(&current, retry, semantic)?;
            stale.extend(plan.stale);
            unresolved = parked;
            unresolved.extend(plan.declined);

            if plan.accepted.is_empty() {
                unresolved.extend(plan.deferred);
                break;
            }
            if passes == limit {
                tracing::warn!(
                    "Batch fix for {} stopped at the pass limit ({})",
                    current.path().display(),
                    limit
                );
                unresolved.extend(plan.accepted.into_iter().map(|action| action.diagnostic));
                unresolved.extend(plan.deferred);
                break;
            }

            let edits: Vec<NodeEdit> = plan.accepted.iter().map(|a| a.edit.clone()).collect();
            let Some(next) = TreeRewriter::apply_edits(&current, &edits).recoverable()? else {
                tracing::warn!("Batch pass on {} abandoned", current.path().display());
                unresolved.extend(plan.accepted.into_iter().map(|action| action.diagnostic));
                unresolved.extend(plan.deferred);
                break;
            };
            if next.green() == current.green() {
                tracing::debug!("Batch pass made no progress");
                unresolved.extend(plan.accepted.into_iter().map(|action| action.diagnostic));
                unresolved.extend(plan.deferred);
                break;
            }
            passes += 1;

            for (_, span) in excluded.iter_mut() {
                *span = shift_span(*span, &edits);
            }

            let report = match self
                .analyzer
                .analyze_rules(&next, semantic, &target_ids, cancel)
            {
                Ok(report) => report,
                Err(FixpointError::Cancelled) => {
                    return Ok(BatchOutcome::cancelled(document, diagnostics, passes));
                }
                Err(error) => return Err(error),
            };

            for action in plan.accepted {
                let rewritten = shift_span(action.edit.span, &edits);
                let refired = self.refired(&action, rewritten, &report.diagnostics, &next);
                if refired.is_empty() {
                    applied.push(action.diagnostic);
                } else {
                    tracing::warn!(
                        "Fix for '{}' at {} re-triggers its own rule; excluding {} location(s)",
                        action.rule_id,
                        rewritten,
                        refired.len()
                    );
                    let rule_id = &action.rule_id;
                    excluded.extend(refired.into_iter().map(|span| (rule_id.clone(), span)));
                    rejected.push(action.diagnostic);
                }
            }

            tracing::debug!(
                "Batch pass {} on {}: {} applied, {} deferred",
                passes,
                next.path().display(),
                edits.len(),
                plan.deferred.len()
            );
            pending = report.diagnostics;
            current = next;
        }

        unresolved.extend(rejected);
        unresolved.extend(without_provider);
        tracing::info!(
            "Batch fix for {}: {} passes, {} applied, {} stale, {} unresolved",
            document.path().display(),
            passes,
            applied.len(),
            stale.len(),
            unresolved.len()
        );
        Ok(BatchOutcome {
            document: current,
            passes,
            applied,
            stale,
            unresolved,
            cancelled: false,
        })
    }

    /// Compute fixes and split them into accepted and deferred sets
    fn plan(
        &self,
        document: &Document,
        pending: Vec<Diagnostic>,
        semantic: &dyn SemanticResolver,
    ) -> Result<PassPlan> {
        let mut plan = PassPlan::default();
        let mut candidates = Vec::new();

        for diagnostic in pending {
            match self.analyzer.compute_fix(&diagnostic, document, semantic) {
                Err(FixpointError::StaleLocation { .. }) => {
                    tracing::warn!(
                        "Dropping stale diagnostic '{}' at {}",
                        diagnostic.rule_id,
                        diagnostic.span()
                    );
                    plan.stale.push(diagnostic);
                }
                fix => match fix.recoverable()?.flatten() {
                    Some(action) => candidates.push(action),
                    None => plan.declined.push(diagnostic),
                },
            }
        }

        candidates.sort_by(|a, b| {
            a.edit
                .span
                .start
                .cmp(&b.edit.span.start)
                .then_with(|| b.edit.span.len().cmp(&a.edit.span.len()))
        });
        for candidate in candidates {
            if let Some(blocker) = plan
                .accepted
                .iter()
                .find(|accepted| accepted.edit.span.overlaps(candidate.edit.span))
            {
                let conflict =
                    FixpointError::edit_conflict(&candidate.rule_id, candidate.edit.span);
                tracing::debug!("{} (blocked by '{}'), deferring", conflict, blocker.rule_id);
                plan.deferred.push(candidate.diagnostic);
            } else {
                plan.accepted.push(candidate);
            }
        }
        Ok(plan)
    }

    /// Spans where re-analysis flags the same rule on the node this fix rewrote
    fn refired(
        &self,
        action: &FixAction,
        rewritten: Span,
        diagnostics: &[Diagnostic],
        document: &Document,
    ) -> Vec<Span> {
        let Some(provider) = self.analyzer.provider(&action.rule_id) else {
            return Vec::new();
        };
        let kinds = provider.compatible_kinds(&action.rule_id);
        diagnostics
            .iter()
            .filter(|d| d.rule_id == action.rule_id && rewritten.contains(d.span()))
            .filter(|d| {
                FixLocator::locate(d, document, kinds).is_some_and(|target| {
                    target.kind() == action.edit.kind
                        && Span::from(target.text_range()) == rewritten
                })
            })
            .map(Diagnostic::span)
            .collect()
    }
}

fn is_excluded(excluded: &[(String, Span)], diagnostic: &Diagnostic) -> bool {
    excluded
        .iter()
        .any(|(rule_id, span)| *rule_id == diagnostic.rule_id && *span == diagnostic.span())
}

/// Where `span` lands after `edits` were applied to the version it belongs to
///
/// Spans after an edit shift by its length delta. A span an edit touches maps
/// onto that edit's replacement.
fn shift_span(span: Span, edits: &[NodeEdit]) -> Span {
    let mut shift: i64 = 0;
    let mut covered_by = None;
    for edit in edits {
        if edit.span.end <= span.start && !edit.span.overlaps(span) {
            shift += edit.delta();
        } else if edit.span.overlaps(span) {
            covered_by = Some(edit);
        }
    }

    let moved = |offset: u32| u32::try_from(i64::from(offset) + shift).unwrap_or(offset);
    match covered_by {
        Some(edit) if edit.span.contains(span) => {
            let start = moved(edit.span.start);
            Span::new(start, start + edit.replaced_span().len())
        }
        _ => Span::new(moved(span.start), moved(span.end)),
    }
}
