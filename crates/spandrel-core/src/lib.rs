//! Spandrel Core
//!
//! # Overview
//!
//! `spandrel-core` is a backend-agnostic tracing facade. It defines the
//! propagation protocol that ties a tracing backend to an execution
//! context and the span lifecycle built on top of it; actual trace
//! collection, sampling, and export live behind the [`TraceClient`]
//! contract in backend crates.
//!
//! # Propagation Model
//!
//! All tracing state is carried by an explicit [`Context`] value:
//!
//! - [`with_client`] binds a backend to a context.
//! - [`with_span`] starts a span and returns the derived context the
//!   span lives in, plus a [`FinishHandle`] that completes it.
//! - [`set_label`] annotates the span bound to a context.
//! - [`info`] asks the backend to identify the current span for log
//!   correlation.
//!
//! There is no process-global registry and no thread-local current
//! span. A context reaches exactly the code it is passed to, which
//! keeps concurrent callers isolated by construction.
//!
//! # Degradation
//!
//! Every operation is a no-op on a context without a backend binding.
//! Libraries can instrument unconditionally and leave the decision to
//! trace to whoever owns the entry point.
//!
//! # Usage
//!
//! ```
//! use std::sync::Arc;
//! use spandrel_core::{set_label, with_client, with_span, Context};
//! use spandrel_recorder::SpanRecorder;
//!
//! let recorder = Arc::new(SpanRecorder::new());
//! let ctx = with_client(&Context::new(), recorder.clone());
//!
//! let (ctx, span) = with_span(&ctx, "load-profile");
//! set_label(&ctx, "user", "u-1042");
//! set_label(&ctx, "cache-hit", true);
//! span.finish()?;
//!
//! assert_eq!(recorder.finished_spans().len(), 1);
//! # Ok::<(), spandrel_core::TraceError>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod context;
pub mod error;
pub mod label;
pub mod span;
pub mod traits;

// Re-export the protocol surface
pub use context::Context;
pub use error::{BoxError, TraceError, TraceResult};
pub use label::{LabelValue, Labels};
pub use span::{info, is_traced, set_label, with_client, with_span, FinishHandle};
pub use traits::{TraceClient, TraceLogger};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
