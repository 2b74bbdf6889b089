//! Span Records
//!
//! Identifier newtypes and the immutable records the recorder exports.
//! Everything here serializes with serde so recorded traces can be
//! snapshotted or shipped to tooling as JSON.

use std::fmt;

use serde::{Deserialize, Serialize};
use spandrel_core::{LabelValue, Labels};

/// Trace identifier, shared by every span in one trace tree.
///
/// Formats as zero-padded hex, the way trace ids appear in log lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TraceId(pub u64);

/// Span identifier, unique within one recorder instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SpanId(pub u64);

impl fmt::Display for TraceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:016x}", self.0)
    }
}

impl fmt::Display for SpanId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:016x}", self.0)
    }
}

/// Span coordinates the recorder stores in every context it derives.
///
/// This is the recorder's propagation state: a child span reads its
/// parent's coordinates from here, and log entries are correlated
/// through it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpanContext {
    /// Trace this span belongs to
    pub trace_id: TraceId,
    /// The span itself
    pub span_id: SpanId,
}

impl fmt::Display for SpanContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.trace_id, self.span_id)
    }
}

/// A completed span, as exported by the recorder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinishedSpan {
    /// Trace this span belongs to
    pub trace_id: TraceId,
    /// Span identifier
    pub span_id: SpanId,
    /// Parent span, `None` for trace roots
    pub parent_id: Option<SpanId>,
    /// Name the span was created with
    pub name: String,
    /// Final label set flushed at completion
    pub labels: Labels,
}

impl FinishedSpan {
    /// Whether this span started its trace.
    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }
}

/// One entry captured through the logger contract.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    /// Span the entry was correlated with, if the context carried one
    pub span: Option<SpanContext>,
    /// Logged values, in call order
    pub values: Vec<LabelValue>,
}
