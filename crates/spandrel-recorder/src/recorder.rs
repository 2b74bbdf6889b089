//! In-memory Recorder Backend
//!
//! A fully observable backend for the spandrel facade. It keeps every
//! span and log entry it sees in process memory, which makes it the
//! reference implementation of the backend contract and the test double
//! instrumented code verifies itself against.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use dashmap::DashMap;
use parking_lot::Mutex;
use tracing::trace;

use spandrel_core::{
    with_client, Context, LabelValue, Labels, TraceClient, TraceError, TraceLogger, TraceResult,
};

use crate::record::{FinishedSpan, LogEntry, SpanContext, SpanId, TraceId};

/// In-memory tracing backend.
///
/// Spans move through two stores: a concurrent map of active spans and
/// an ordered list of finished ones. Identifiers are allocated from
/// atomic counters, so one recorder instance can serve spans created
/// from any number of threads.
///
/// Cloning is shallow: clones observe the same recorded state, which is
/// also how the recorder hands itself out when it derives span contexts.
#[derive(Clone, Default)]
pub struct SpanRecorder {
    inner: Arc<RecorderInner>,
}

struct RecorderInner {
    next_trace: AtomicU64,
    next_span: AtomicU64,
    active: DashMap<SpanId, ActiveSpan>,
    finished: Mutex<Vec<FinishedSpan>>,
    logs: Mutex<Vec<LogEntry>>,
}

/// Span bookkeeping kept between creation and completion.
struct ActiveSpan {
    trace_id: TraceId,
    parent_id: Option<SpanId>,
    name: String,
}

impl Default for RecorderInner {
    fn default() -> Self {
        // Identifiers start at 1; zero is reserved as "never assigned".
        Self {
            next_trace: AtomicU64::new(1),
            next_span: AtomicU64::new(1),
            active: DashMap::new(),
            finished: Mutex::new(Vec::new()),
            logs: Mutex::new(Vec::new()),
        }
    }
}

impl SpanRecorder {
    /// Create an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of spans started but not yet finished.
    pub fn active_count(&self) -> usize {
        self.inner.active.len()
    }

    /// Completed spans, in completion order.
    pub fn finished_spans(&self) -> Vec<FinishedSpan> {
        self.inner.finished.lock().clone()
    }

    /// The first completed span with the given name, if any.
    pub fn finished_span(&self, name: &str) -> Option<FinishedSpan> {
        self.inner
            .finished
            .lock()
            .iter()
            .find(|span| span.name == name)
            .cloned()
    }

    /// Entries captured through the logger contract, in arrival order.
    pub fn log_entries(&self) -> Vec<LogEntry> {
        self.inner.logs.lock().clone()
    }

    /// Drop all recorded state. Identifier counters keep running so,
    /// across a clear, no span id is ever reissued.
    pub fn clear(&self) {
        self.inner.active.clear();
        self.inner.finished.lock().clear();
        self.inner.logs.lock().clear();
    }
}

impl TraceClient for SpanRecorder {
    fn new_span(&self, ctx: &Context, name: &str) -> Context {
        let parent = ctx.get::<SpanContext>().copied();
        let trace_id = match parent {
            Some(span) => span.trace_id,
            None => TraceId(self.inner.next_trace.fetch_add(1, Ordering::Relaxed)),
        };
        let span_id = SpanId(self.inner.next_span.fetch_add(1, Ordering::Relaxed));

        self.inner.active.insert(
            span_id,
            ActiveSpan {
                trace_id,
                parent_id: parent.map(|span| span.span_id),
                name: name.to_string(),
            },
        );
        trace!("span {} started in trace {}", span_id, trace_id);

        let scoped = ctx.with_value(SpanContext { trace_id, span_id });
        with_client(&scoped, Arc::new(self.clone()))
    }

    fn info(&self, ctx: &Context) -> Vec<u8> {
        match ctx.get::<SpanContext>() {
            Some(span) => span.to_string().into_bytes(),
            None => Vec::new(),
        }
    }

    fn finish(&self, ctx: &Context, labels: &Labels) -> TraceResult<()> {
        let Some(span) = ctx.get::<SpanContext>() else {
            return Err(TraceError::SpanNotTracked(
                "context carries no span coordinates".to_string(),
            ));
        };
        let Some((_, active)) = self.inner.active.remove(&span.span_id) else {
            return Err(TraceError::SpanNotTracked(format!(
                "span {} already finished or unknown",
                span.span_id
            )));
        };

        trace!("span {} finished with {} labels", span.span_id, labels.len());
        self.inner.finished.lock().push(FinishedSpan {
            trace_id: active.trace_id,
            span_id: span.span_id,
            parent_id: active.parent_id,
            name: active.name,
            labels: labels.clone(),
        });
        Ok(())
    }
}

impl TraceLogger for SpanRecorder {
    fn log(&self, ctx: &Context, values: &[LabelValue]) -> TraceResult<()> {
        // Entries without an active span are kept too; pre-span
        // diagnostics still deserve a sink.
        let span = ctx.get::<SpanContext>().copied();
        self.inner.logs.lock().push(LogEntry {
            span,
            values: values.to_vec(),
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_root_span_opens_fresh_trace() {
        let recorder = SpanRecorder::new();
        let ctx = recorder.new_span(&Context::new(), "root");

        let span = ctx.get::<SpanContext>().expect("span coordinates attached");
        assert_eq!(span.trace_id, TraceId(1));
        assert_eq!(span.span_id, SpanId(1));
        assert_eq!(recorder.active_count(), 1);
    }

    #[test]
    fn test_child_span_continues_trace() {
        let recorder = SpanRecorder::new();
        let root = recorder.new_span(&Context::new(), "root");
        let child = recorder.new_span(&root, "child");

        let root_span = root.get::<SpanContext>().unwrap();
        let child_span = child.get::<SpanContext>().unwrap();
        assert_eq!(child_span.trace_id, root_span.trace_id);
        assert_ne!(child_span.span_id, root_span.span_id);
    }

    #[test]
    fn test_separate_roots_get_separate_traces() {
        let recorder = SpanRecorder::new();
        let a = recorder.new_span(&Context::new(), "a");
        let b = recorder.new_span(&Context::new(), "b");

        let a_span = a.get::<SpanContext>().unwrap();
        let b_span = b.get::<SpanContext>().unwrap();
        assert_ne!(a_span.trace_id, b_span.trace_id);
    }

    #[test]
    fn test_finish_moves_span_to_finished() {
        let recorder = SpanRecorder::new();
        let ctx = recorder.new_span(&Context::new(), "work");

        let mut labels = Labels::new();
        labels.insert("outcome".into(), LabelValue::from("ok"));
        recorder.finish(&ctx, &labels).unwrap();

        assert_eq!(recorder.active_count(), 0);
        let finished = recorder.finished_spans();
        assert_eq!(finished.len(), 1);
        assert_eq!(finished[0].name, "work");
        assert!(finished[0].is_root());
        assert_eq!(finished[0].labels["outcome"].as_str(), Some("ok"));
    }

    #[test]
    fn test_finish_rejects_foreign_context() {
        let recorder = SpanRecorder::new();
        let err = recorder
            .finish(&Context::new(), &Labels::new())
            .unwrap_err();
        assert!(err.is_span_not_tracked());
    }

    #[test]
    fn test_double_finish_rejected() {
        let recorder = SpanRecorder::new();
        let ctx = recorder.new_span(&Context::new(), "once");

        recorder.finish(&ctx, &Labels::new()).unwrap();
        let err = recorder.finish(&ctx, &Labels::new()).unwrap_err();
        assert!(err.is_span_not_tracked());
    }

    #[test]
    fn test_info_reports_coordinates() {
        let recorder = SpanRecorder::new();
        let ctx = recorder.new_span(&Context::new(), "lookup");
        assert_eq!(
            recorder.info(&ctx),
            b"0000000000000001/0000000000000001"
        );
        assert!(recorder.info(&Context::new()).is_empty());
    }

    #[test]
    fn test_logger_correlates_entries() {
        let recorder = SpanRecorder::new();
        let ctx = recorder.new_span(&Context::new(), "op");

        recorder
            .log(&ctx, &[LabelValue::from("checkpoint"), LabelValue::from(1i64)])
            .unwrap();
        recorder.log(&Context::new(), &[LabelValue::from("startup")]).unwrap();

        let entries = recorder.log_entries();
        assert_eq!(entries.len(), 2);
        assert!(entries[0].span.is_some());
        assert_eq!(entries[0].values.len(), 2);
        assert!(entries[1].span.is_none());
    }

    #[test]
    fn test_clear_keeps_counters_running() {
        let recorder = SpanRecorder::new();
        let first = recorder.new_span(&Context::new(), "first");
        recorder.finish(&first, &Labels::new()).unwrap();
        recorder.clear();

        assert!(recorder.finished_spans().is_empty());
        let next = recorder.new_span(&Context::new(), "second");
        let span = next.get::<SpanContext>().unwrap();
        assert!(span.span_id.0 > 1);
    }
}
