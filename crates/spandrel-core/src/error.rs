//! # Tracing Error Types
//!
//! Failures surfaced by tracing backends. The facade itself never fails:
//! untraced operations degrade to no-ops, so every error here originates
//! in a [`TraceClient`](crate::TraceClient) implementation.

use std::error::Error;

/// Boxed error type backends use to report arbitrary failures.
pub type BoxError = Box<dyn Error + Send + Sync + 'static>;

/// Errors reported by tracing backends.
#[derive(Debug, thiserror::Error)]
pub enum TraceError {
    /// The backend was asked to finish a span it is not tracking.
    ///
    /// Typically the result of handing a backend a context it never
    /// derived, or of a backend losing state between span creation and
    /// completion.
    #[error("span not tracked by backend: {0}")]
    SpanNotTracked(String),

    /// The backend failed internally (export failure, transport error,
    /// serialization error, and so on).
    #[error("backend failure: {source}")]
    Backend {
        /// Underlying backend failure
        source: BoxError,
    },
}

impl TraceError {
    /// Wrap an arbitrary backend failure.
    pub fn backend(err: impl Into<BoxError>) -> Self {
        TraceError::Backend { source: err.into() }
    }

    /// Check whether this is a lost-span report.
    pub fn is_span_not_tracked(&self) -> bool {
        matches!(self, TraceError::SpanNotTracked(_))
    }

    /// Check whether this is an internal backend failure.
    pub fn is_backend(&self) -> bool {
        matches!(self, TraceError::Backend { .. })
    }
}

/// Result type for backend operations.
pub type TraceResult<T> = Result<T, TraceError>;
