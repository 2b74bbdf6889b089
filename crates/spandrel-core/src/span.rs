//! # Span Lifecycle
//!
//! The propagation protocol that binds a tracing backend to an execution
//! context and drives spans from creation to completion. Every operation
//! here is nil-safe in the tracing sense: on a context with no backend
//! binding it degrades to a no-op, so instrumented code never needs to
//! know whether tracing is enabled.

use std::borrow::Cow;
use std::fmt;
use std::panic::Location;
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{debug, warn};

use crate::context::Context;
use crate::error::TraceResult;
use crate::label::{LabelValue, Labels};
use crate::traits::TraceClient;

/// Context entry tying a backend client and the current span's mutable
/// label set to an execution context. One binding per span: backends
/// attach a fresh one when they create a span, so label writes stay
/// scoped to the span they were made under.
struct TraceBinding {
    client: Arc<dyn TraceClient>,
    labels: Mutex<Labels>,
}

impl TraceBinding {
    fn new(client: Arc<dyn TraceClient>) -> Self {
        Self {
            client,
            labels: Mutex::new(Labels::new()),
        }
    }

    /// Clone the label set out from under the lock. Finishing works on
    /// a snapshot so a concurrent `set_label` can never observe the map
    /// mid-flush.
    fn snapshot(&self) -> Labels {
        self.labels.lock().clone()
    }
}

/// Bind `client` as the tracing backend for `ctx` and everything derived
/// from it. The returned context starts with an empty label set.
///
/// Attaching a client to an already-bound context shadows the previous
/// binding: spans created from the returned context report to `client`,
/// while contexts derived before the call keep reporting to the old one.
pub fn with_client(ctx: &Context, client: Arc<dyn TraceClient>) -> Context {
    debug!("binding trace client to context");
    ctx.with_value(TraceBinding::new(client))
}

/// Whether `ctx` carries a backend binding.
///
/// Rarely needed: all operations degrade to no-ops on unbound contexts.
/// Useful for skipping expensive label computation up front.
pub fn is_traced(ctx: &Context) -> bool {
    ctx.contains::<TraceBinding>()
}

/// Start a span named `name` and return the context it lives in together
/// with its completion handle.
///
/// The span is parented on whatever span `ctx` already carries, so
/// nesting `with_span` calls builds the trace tree. Callees receive the
/// returned context; the caller keeps the handle and calls
/// [`FinishHandle::finish`] when the operation completes.
///
/// An empty `name` is replaced with the caller's source location
/// (`file:line`). On an unbound context the original context is returned
/// unchanged alongside a no-op handle, and the backend is never invoked.
#[track_caller]
pub fn with_span(ctx: &Context, name: &str) -> (Context, FinishHandle) {
    let Some(binding) = ctx.get::<TraceBinding>() else {
        return (ctx.clone(), FinishHandle::noop());
    };

    let name: Cow<'_, str> = if name.is_empty() {
        let caller = Location::caller();
        Cow::Owned(format!("{}:{}", caller.file(), caller.line()))
    } else {
        Cow::Borrowed(name)
    };

    debug!("starting span: {}", name);
    let scoped = binding.client.new_span(ctx, &name);
    let handle = FinishHandle::armed(scoped.clone(), Arc::clone(&binding.client));
    (scoped, handle)
}

/// Set label `key` to `value` on the span bound to `ctx`, overwriting
/// any previous value for that key. Ignored on unbound contexts.
///
/// Labels accumulate on the context's binding and reach the backend as
/// one batch when the span finishes.
pub fn set_label(ctx: &Context, key: impl Into<String>, value: impl Into<LabelValue>) {
    if let Some(binding) = ctx.get::<TraceBinding>() {
        binding.labels.lock().insert(key.into(), value.into());
    }
}

/// Opaque identifier for the trace and span bound to `ctx`, in whatever
/// format the backend uses, e.g. for cross-process propagation or log
/// correlation. Empty on unbound contexts. Read-only and safe to call
/// repeatedly.
pub fn info(ctx: &Context) -> Vec<u8> {
    match ctx.get::<TraceBinding>() {
        Some(binding) => binding.client.info(ctx),
        None => Vec::new(),
    }
}

/// Completion handle for an in-flight span.
///
/// `finish` consumes the handle, so a span cannot be completed twice.
/// Dropping the handle without finishing leaks the span at the backend;
/// the `must_use` lint catches the common accident.
#[must_use = "dropping a FinishHandle leaks its span; call finish()"]
pub struct FinishHandle {
    state: HandleState,
}

enum HandleState {
    /// Created on an unbound context; finishing is a successful no-op.
    Noop,
    /// Holds the span's own context and the client that created the
    /// span; the context's binding supplies the labels at finish time.
    Armed {
        ctx: Context,
        client: Arc<dyn TraceClient>,
    },
}

impl FinishHandle {
    fn noop() -> Self {
        Self {
            state: HandleState::Noop,
        }
    }

    fn armed(ctx: Context, client: Arc<dyn TraceClient>) -> Self {
        Self {
            state: HandleState::Armed { ctx, client },
        }
    }

    /// True when span creation was skipped because the context carried
    /// no backend binding.
    pub fn is_noop(&self) -> bool {
        matches!(self.state, HandleState::Noop)
    }

    /// Complete the span, flushing its accumulated labels to the backend
    /// in one batch.
    ///
    /// Completion always goes to the client that created the span; the
    /// label set is read from the span context's own binding. Errors come
    /// straight from the backend. A backend that returned a span context
    /// with no reachable binding is tolerated: the handle logs a warning
    /// and reports success, keeping instrumented code insulated from
    /// backend misbehavior.
    pub fn finish(self) -> TraceResult<()> {
        match self.state {
            HandleState::Noop => Ok(()),
            HandleState::Armed { ctx, client } => match ctx.get::<TraceBinding>() {
                Some(binding) => {
                    let labels = binding.snapshot();
                    client.finish(&ctx, &labels)
                }
                None => {
                    warn!("span context lost its backend binding; dropping span");
                    Ok(())
                }
            },
        }
    }
}

impl fmt::Debug for FinishHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = match &self.state {
            HandleState::Noop => "noop",
            HandleState::Armed { .. } => "armed",
        };
        f.debug_struct("FinishHandle").field("state", &state).finish()
    }
}
