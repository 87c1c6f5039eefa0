//! Error types and handling for rule dispatch and fix application

use std::path::PathBuf;
use thiserror::Error;

use crate::syntax::Span;

/// Main error type for the engine
#[derive(Debug, Error)]
pub enum FixpointError {
    /// A descriptor with this id is already registered. Fatal to startup.
    #[error("Duplicate rule id '{rule_id}'")]
    DuplicateRuleId { rule_id: String },

    /// A report or fix was requested for an id with no registered descriptor
    #[error("Unknown rule id '{rule_id}'")]
    UnknownRuleId { rule_id: String },

    /// A rule predicate failed internally while analyzing a node
    #[error("Predicate for '{rule_id}' failed: {message}")]
    PredicateFailure { rule_id: String, message: String },

    /// A diagnostic span no longer maps onto a compatible node of the current tree
    #[error("Stale location for '{rule_id}' at {span}")]
    StaleLocation { rule_id: String, span: Span },

    /// Two candidate edits in one batch pass touch overlapping spans
    #[error("Edit conflict for '{rule_id}' at {span}")]
    EditConflict { rule_id: String, span: Span },

    /// The host signalled cancellation
    #[error("Operation cancelled")]
    Cancelled,

    /// Configuration loading or validation errors
    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    /// File system I/O errors
    #[error("IO error for path '{path}': {source}")]
    IoError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Generic internal errors
    #[error("Internal error: {message}")]
    InternalError { message: String },
}

/// Error kind enumeration for categorizing errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    DuplicateRuleId,
    UnknownRuleId,
    PredicateFailure,
    StaleLocation,
    EditConflict,
    Cancelled,
    Config,
    Io,
    Internal,
}

impl FixpointError {
    /// Get the error kind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            FixpointError::DuplicateRuleId { .. } => ErrorKind::DuplicateRuleId,
            FixpointError::UnknownRuleId { .. } => ErrorKind::UnknownRuleId,
            FixpointError::PredicateFailure { .. } => ErrorKind::PredicateFailure,
            FixpointError::StaleLocation { .. } => ErrorKind::StaleLocation,
            FixpointError::EditConflict { .. } => ErrorKind::EditConflict,
            FixpointError::Cancelled => ErrorKind::Cancelled,
            FixpointError::ConfigError { .. } => ErrorKind::Config,
            FixpointError::IoError { .. } => ErrorKind::Io,
            FixpointError::InternalError { .. } => ErrorKind::Internal,
        }
    }

    /// Check if this error only affects a single item (the pass can skip it and continue)
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self.kind(),
            ErrorKind::PredicateFailure | ErrorKind::StaleLocation | ErrorKind::EditConflict
        )
    }

    pub fn duplicate_rule_id(rule_id: impl Into<String>) -> Self {
        Self::DuplicateRuleId {
            rule_id: rule_id.into(),
        }
    }

    pub fn unknown_rule_id(rule_id: impl Into<String>) -> Self {
        Self::UnknownRuleId {
            rule_id: rule_id.into(),
        }
    }

    pub fn predicate_failure(rule_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self::PredicateFailure {
            rule_id: rule_id.into(),
            message: message.into(),
        }
    }

    pub fn stale_location(rule_id: impl Into<String>, span: Span) -> Self {
        Self::StaleLocation {
            rule_id: rule_id.into(),
            span,
        }
    }

    pub fn edit_conflict(rule_id: impl Into<String>, span: Span) -> Self {
        Self::EditConflict {
            rule_id: rule_id.into(),
            span,
        }
    }

    /// Create a configuration error
    pub fn config_error(message: impl Into<String>) -> Self {
        Self::ConfigError {
            message: message.into(),
        }
    }

    /// Create an IO error with path context
    pub fn io_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::IoError {
            path: path.into(),
            source,
        }
    }

    /// Create an internal error
    pub fn internal_error(message: impl Into<String>) -> Self {
        Self::InternalError {
            message: message.into(),
        }
    }
}

/// Convert from std::io::Error
impl From<std::io::Error> for FixpointError {
    fn from(err: std::io::Error) -> Self {
        Self::IoError {
            path: PathBuf::new(),
            source: err,
        }
    }
}
