//! # Backend Contracts
//!
//! Capability traits a tracing backend implements to receive span
//! lifecycle events from the facade. Backends are opaque to the facade:
//! every call is synchronous from the caller's perspective, and backends
//! that talk to collectors are expected to buffer internally.

use crate::context::Context;
use crate::error::TraceResult;
use crate::label::{LabelValue, Labels};

/// Span lifecycle contract.
///
/// The facade invokes these methods only on contexts that carry a
/// binding to this client; a backend never sees untraced traffic.
/// Implementations must be shareable across threads, as one client
/// instance serves every span created under it.
pub trait TraceClient: Send + Sync {
    /// Start a span named `name`, parented on whatever span `ctx`
    /// already carries, and return the context the new span lives in.
    ///
    /// The returned context must carry a fresh binding for this client
    /// (attach one with [`with_client`](crate::with_client)), so that
    /// labels set under the new span never leak into the parent's set.
    /// If `ctx` carries no recognizable span state, the new span starts
    /// a fresh trace.
    fn new_span(&self, ctx: &Context, name: &str) -> Context;

    /// Opaque, backend-defined identifier for the trace and span bound
    /// to `ctx`, e.g. for cross-process propagation or log correlation.
    /// Returns an empty value when `ctx` carries no span this backend
    /// recognizes.
    fn info(&self, ctx: &Context) -> Vec<u8>;

    /// Complete the span bound to `ctx`. `labels` is the final label
    /// set accumulated on the span's context.
    fn finish(&self, ctx: &Context, labels: &Labels) -> TraceResult<()>;
}

/// Log entry sink correlated with trace state.
///
/// Kept separate from [`TraceClient`]: a backend may trace without
/// logging, log without tracing, or do both from one type.
pub trait TraceLogger: Send + Sync {
    /// Record `values` against whatever trace state `ctx` carries.
    fn log(&self, ctx: &Context, values: &[LabelValue]) -> TraceResult<()>;
}
