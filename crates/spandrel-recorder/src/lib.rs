//! Spandrel Recorder
//!
//! # Overview
//!
//! `spandrel-recorder` is the in-memory reference backend for the
//! [`spandrel-core`](spandrel_core) tracing facade. It implements the
//! full backend contract, keeps every span and log entry in process
//! memory, and exposes the recorded state for inspection. Use it to
//! verify instrumentation in tests, or as the model to follow when
//! writing a backend that exports somewhere real.
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
//! let (ctx, span) = with_span(&ctx, "checkout");
//! set_label(&ctx, "items", 3i64);
//! span.finish()?;
//!
//! let finished = recorder.finished_span("checkout").unwrap();
//! assert_eq!(finished.labels["items"].as_int(), Some(3));
//! # Ok::<(), spandrel_core::TraceError>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod record;
pub mod recorder;

pub use record::{FinishedSpan, LogEntry, SpanContext, SpanId, TraceId};
pub use recorder::SpanRecorder;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
