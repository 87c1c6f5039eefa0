//! Fixpoint Core
//!
//! Rule dispatch and fix application over immutable syntax trees supplied by
//! a host. Rules register descriptors and subscribe predicates to node kinds;
//! the engine walks trees, collects diagnostics, maps them back onto nodes,
//! synthesizes replacements, and merges many fixes into one document through a
//! fixed-point batch loop.

pub mod analyzer;
pub mod batch;
pub mod cancel;
pub mod config;
pub mod diagnostics;
pub mod dispatcher;
pub mod error;
pub mod fix;
pub mod locator;
pub mod markers;
pub mod registry;
pub mod result;
pub mod rewriter;
pub mod semantic;
pub mod syntax;
pub mod workspace;

// Re-export commonly used types
pub use analyzer::{Analyzer, AnalyzerBuilder};
pub use batch::{BatchFixCoordinator, BatchOutcome, DiagnosticState};
pub use cancel::CancellationToken;
pub use config::{ConfigLoader, EngineConfig, RuleSeverity};
pub use diagnostics::{
    AnalysisReport, AnalyzerFault, Diagnostic, DiagnosticReporter, Location, render_message,
};
pub use dispatcher::{DispatchOutput, Finding, Predicate, SyntaxDispatcher};
pub use error::{ErrorKind, FixpointError};
pub use fix::{FixAction, FixAllStrategy, FixProvider};
pub use locator::{FixLocator, find_node};
pub use markers::{MarkerKind, MarkerTable};
pub use registry::{RuleCategory, RuleDescriptor, RuleHandle, RuleRegistry, Severity};
pub use result::{Result, ResultExt};
pub use rewriter::{NodeEdit, TreeRewriter};
pub use semantic::{
    Accessibility, CachedResolver, NullResolver, ResolverCacheStats, SemanticResolver,
    SemanticSymbol,
};
pub use syntax::{
    Dialect, Document, GreenNode, Span, SyntaxKind, SyntaxNode, SyntaxToken, TreeBuilder,
};
pub use workspace::Workspace;

/// Initialize the tracing subscriber for logging
pub fn init_tracing() {
    use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("fixpoint=info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_thread_ids(false)
                .with_file(true)
                .with_line_number(true),
        )
        .init();
}

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
