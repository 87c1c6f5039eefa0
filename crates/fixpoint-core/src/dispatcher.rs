//! Syntax dispatcher
//!
//! Rules subscribe predicates to node kinds. A dispatch pass walks the tree in
//! preorder and, at every node, runs the predicates subscribed to its kind in
//! registration order. Predicates that fail, by error or by panic, become
//! [`AnalyzerFault`]s and the walk carries on.

use std::collections::HashMap;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use rayon::prelude::*;

use crate::cancel::CancellationToken;
use crate::diagnostics::AnalyzerFault;
use crate::semantic::SemanticResolver;
use crate::syntax::{GreenNode, Span, SyntaxKind, SyntaxNode, SyntaxToken};
use crate::{FixpointError, Result};

/// What a predicate reports: a span, the kind anchored on, and message arguments
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Finding {
    pub span: Span,
    pub anchor_kind: SyntaxKind,
    pub args: Vec<String>,
}

impl Finding {
    pub fn node(node: &SyntaxNode, args: Vec<String>) -> Self {
        Self {
            span: node.text_range().into(),
            anchor_kind: node.kind(),
            args,
        }
    }

    pub fn token(token: &SyntaxToken, args: Vec<String>) -> Self {
        Self {
            span: token.text_range().into(),
            anchor_kind: token.kind(),
            args,
        }
    }
}

/// Predicate signature: a node plus the semantic facade, yielding findings
pub type Predicate =
    Arc<dyn Fn(&SyntaxNode, &dyn SemanticResolver) -> anyhow::Result<Vec<Finding>> + Send + Sync>;

/// Decides which rule ids take part in a pass
pub type RuleFilter<'a> = &'a (dyn Fn(&str) -> bool + Sync);

#[derive(Clone)]
struct Subscription {
    rule_id: Arc<str>,
    predicate: Predicate,
}

/// Output of a completed pass
#[derive(Debug, Default)]
pub struct DispatchOutput {
    /// Findings in traversal order, tagged with their rule id
    pub findings: Vec<(Arc<str>, Finding)>,
    pub faults: Vec<AnalyzerFault>,
}

impl DispatchOutput {
    fn extend(&mut self, other: DispatchOutput) {
        self.findings.extend(other.findings);
        self.faults.extend(other.faults);
    }
}

/// Node-kind subscriptions for every registered predicate
#[derive(Clone, Default)]
pub struct SyntaxDispatcher {
    subscriptions: HashMap<SyntaxKind, Vec<Subscription>>,
    count: usize,
}

impl std::fmt::Debug for SyntaxDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SyntaxDispatcher")
            .field("kinds", &self.subscriptions.len())
            .field("subscriptions", &self.count)
            .finish()
    }
}

impl SyntaxDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribe `predicate` to nodes of `kind` on behalf of `rule_id`
    pub fn subscribe<F>(&mut self, kind: SyntaxKind, rule_id: &str, predicate: F)
    where
        F: Fn(&SyntaxNode, &dyn SemanticResolver) -> anyhow::Result<Vec<Finding>>
            + Send
            + Sync
            + 'static,
    {
        self.subscribe_shared(kind, rule_id, Arc::new(predicate));
    }

    /// Subscribe an already shared predicate, e.g. one body for several kinds
    pub fn subscribe_shared(&mut self, kind: SyntaxKind, rule_id: &str, predicate: Predicate) {
        self.subscriptions.entry(kind).or_default().push(Subscription {
            rule_id: Arc::from(rule_id),
            predicate,
        });
        self.count += 1;
    }

    pub fn len(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Rule ids subscribed to `kind`, in registration order
    pub fn subscribers(&self, kind: SyntaxKind) -> impl Iterator<Item = &str> {
        self.subscriptions
            .get(&kind)
            .into_iter()
            .flatten()
            .map(|subscription| subscription.rule_id.as_ref())
    }

    /// Walk `root` on the calling thread
    pub fn dispatch(
        &self,
        root: &SyntaxNode,
        semantic: &dyn SemanticResolver,
        filter: RuleFilter<'_>,
        cancel: &CancellationToken,
    ) -> Result<DispatchOutput> {
        let mut output = DispatchOutput::default();
        self.walk(root, semantic, filter, cancel, &mut output)?;
        Ok(output)
    }

    /// Walk a tree with its top-level subtrees spread across the rayon pool
    ///
    /// Each worker builds its own red view of `green`. Findings come back in
    /// the same order [`SyntaxDispatcher::dispatch`] would produce.
    pub fn dispatch_parallel(
        &self,
        green: &GreenNode,
        semantic: &dyn SemanticResolver,
        filter: RuleFilter<'_>,
        cancel: &CancellationToken,
    ) -> Result<DispatchOutput> {
        let root = SyntaxNode::new_root(green.clone());
        let mut output = DispatchOutput::default();
        cancel.check()?;
        self.visit(&root, semantic, filter, &mut output);
        let child_count = root.children().count();

        let parts = (0..child_count)
            .into_par_iter()
            .map(|index| -> Result<DispatchOutput> {
                let root = SyntaxNode::new_root(green.clone());
                let mut part = DispatchOutput::default();
                if let Some(child) = root.children().nth(index) {
                    self.walk(&child, semantic, filter, cancel, &mut part)?;
                }
                Ok(part)
            })
            .collect::<Result<Vec<_>>>()?;

        for part in parts {
            output.extend(part);
        }
        Ok(output)
    }

    fn walk(
        &self,
        root: &SyntaxNode,
        semantic: &dyn SemanticResolver,
        filter: RuleFilter<'_>,
        cancel: &CancellationToken,
        output: &mut DispatchOutput,
    ) -> Result<()> {
        for node in root.descendants() {
            if cancel.is_cancelled() {
                tracing::debug!("Dispatch cancelled at {:?}", node.text_range());
                return Err(FixpointError::Cancelled);
            }
            self.visit(&node, semantic, filter, output);
        }
        Ok(())
    }

    fn visit(
        &self,
        node: &SyntaxNode,
        semantic: &dyn SemanticResolver,
        filter: RuleFilter<'_>,
        output: &mut DispatchOutput,
    ) {
        let Some(subscriptions) = self.subscriptions.get(&node.kind()) else {
            return;
        };

        for subscription in subscriptions {
            if !filter(subscription.rule_id.as_ref()) {
                continue;
            }

            let outcome =
                panic::catch_unwind(AssertUnwindSafe(|| (subscription.predicate)(node, semantic)));
            match outcome {
                Ok(Ok(findings)) => output.findings.extend(
                    findings
                        .into_iter()
                        .map(|finding| (Arc::clone(&subscription.rule_id), finding)),
                ),
                Ok(Err(error)) => {
                    let failure = FixpointError::predicate_failure(
                        subscription.rule_id.as_ref(),
                        format!("{error:#}"),
                    );
                    tracing::warn!("{}", failure);
                    output.faults.push(fault(subscription, node, format!("{error:#}"), false));
                }
                Err(payload) => {
                    let message = panic_message(payload.as_ref());
                    tracing::warn!(
                        "Predicate for '{}' panicked on {:?}: {}",
                        subscription.rule_id,
                        node.kind(),
                        message
                    );
                    output.faults.push(fault(subscription, node, message, true));
                }
            }
        }
    }
}

fn fault(
    subscription: &Subscription,
    node: &SyntaxNode,
    message: String,
    panicked: bool,
) -> AnalyzerFault {
    AnalyzerFault {
        rule_id: subscription.rule_id.to_string(),
        node_kind: node.kind(),
        span: node.text_range().into(),
        message,
        panicked,
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "predicate panicked".to_string()
    }
}
