//! Benchwrap error types
//!
//! Every failure aborts the run. Variants are grouped by the stage that
//! produced them: revision resolution, checkout, benchmark runs, temporary
//! storage, the comparison tool, and configuration.

use std::path::PathBuf;
use thiserror::Error;

use crate::process::CommandFailure;

/// Result type alias for benchwrap operations
pub type BenchResult<T> = Result<T, BenchError>;

/// Errors that can occur during a benchwrap run
#[derive(Error, Debug)]
pub enum BenchError {
    /// Git could not resolve a revision token (or the current position)
    #[error("cannot resolve revision '{rev}'")]
    Resolution {
        rev: String,
        #[source]
        source: CommandFailure,
    },

    /// Revision token or git answer rejected before or after asking git
    #[error("cannot resolve revision '{rev}': {reason}")]
    InvalidRevision { rev: String, reason: &'static str },

    /// Switching the working tree failed
    #[error("cannot check out '{target}'")]
    Checkout {
        target: String,
        #[source]
        source: CommandFailure,
    },

    /// A benchmark invocation failed to start or exited non-zero
    #[error("benchmark run {iteration}/{count} for '{rev}' failed")]
    Run {
        rev: String,
        iteration: usize,
        count: usize,
        #[source]
        source: CommandFailure,
    },

    /// Temporary directory or result file could not be created or written
    #[error("cannot {operation} {}", path.display())]
    Storage {
        operation: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Writing the final report to stdout failed
    #[error("cannot write report")]
    Output(#[source] std::io::Error),

    /// Comparison tool is not on the search path
    #[error("no {tool} binary in $PATH")]
    ToolMissing { tool: String },

    /// Comparison tool failed to start or exited non-zero
    #[error("{tool} failed")]
    ToolFailed {
        tool: String,
        #[source]
        source: CommandFailure,
    },

    /// Invalid run configuration
    #[error("invalid configuration: {message}")]
    Config { message: String },
}

impl BenchError {
    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a storage error for `path`
    pub fn storage(
        operation: &'static str,
        path: impl Into<PathBuf>,
        source: std::io::Error,
    ) -> Self {
        Self::Storage {
            operation,
            path: path.into(),
            source,
        }
    }

    /// Follow-up line printed under the error, if there is something the
    /// user can do about it.
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            Self::ToolMissing { .. } => {
                Some("go install golang.org/x/perf/cmd/benchstat@latest")
            }
            Self::Checkout { .. } => {
                Some("commit or stash local changes before benchmarking: git status")
            }
            Self::Run { .. } => Some("rerun with -v to see every command and its output"),
            _ => None,
        }
    }
}
