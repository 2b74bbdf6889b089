//! # Context Propagation v0.1.0
//!
//! Immutable execution context threaded explicitly through traced call
//! paths. All tracing state is context-scoped: operations receive an
//! explicit `ctx: &Context` parameter, and there is no thread-local or
//! process-global fallback.

use std::any::{Any, TypeId};
use std::fmt;
use std::sync::Arc;

/// Execution context: an immutable, typed key-value carrier.
///
/// Each entry is keyed by its Rust type, so a context holds at most one
/// *visible* value per type: deriving a context with [`Context::with_value`]
/// shadows any value of the same type reachable through the parent chain
/// without mutating the parent. Cloning is cheap (the entry chain is
/// reference-counted and shared).
///
/// Contexts are `Send + Sync` and intended to be passed by reference down
/// a call path, crossing thread boundaries by clone.
///
/// # Examples
///
/// ```
/// use spandrel_core::Context;
///
/// #[derive(Debug, PartialEq)]
/// struct Deadline(u64);
///
/// let root = Context::new();
/// let scoped = root.with_value(Deadline(250));
///
/// assert_eq!(scoped.get::<Deadline>(), Some(&Deadline(250)));
/// assert_eq!(root.get::<Deadline>(), None);
/// ```
#[derive(Clone, Default)]
pub struct Context {
    head: Option<Arc<Entry>>,
}

/// One link in the context chain. The chain is append-only: derived
/// contexts point at their parent's head, so existing contexts never
/// observe later derivations.
struct Entry {
    type_id: TypeId,
    value: Arc<dyn Any + Send + Sync>,
    parent: Option<Arc<Entry>>,
}

impl Context {
    /// Create an empty root context.
    pub fn new() -> Self {
        Self { head: None }
    }

    /// Derive a new context carrying `value`, leaving `self` untouched.
    ///
    /// The derived context sees `value` for lookups of type `T`; any `T`
    /// stored further up the chain is shadowed, not replaced.
    pub fn with_value<T: Any + Send + Sync>(&self, value: T) -> Context {
        Context {
            head: Some(Arc::new(Entry {
                type_id: TypeId::of::<T>(),
                value: Arc::new(value),
                parent: self.head.clone(),
            })),
        }
    }

    /// Look up the nearest value of type `T`, walking from this context
    /// toward the root. Returns `None` if no ancestor carries one.
    pub fn get<T: Any + Send + Sync>(&self) -> Option<&T> {
        let target = TypeId::of::<T>();
        let mut cursor = self.head.as_deref();
        while let Some(entry) = cursor {
            if entry.type_id == target {
                return entry.value.downcast_ref::<T>();
            }
            cursor = entry.parent.as_deref();
        }
        None
    }

    /// Check whether a value of type `T` is reachable from this context.
    pub fn contains<T: Any + Send + Sync>(&self) -> bool {
        self.get::<T>().is_some()
    }

    /// Number of entries reachable from this context, shadowed ones
    /// included. Diagnostic only.
    fn chain_len(&self) -> usize {
        let mut n = 0;
        let mut cursor = self.head.as_deref();
        while let Some(entry) = cursor {
            n += 1;
            cursor = entry.parent.as_deref();
        }
        n
    }
}

impl fmt::Debug for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Context")
            .field("entries", &self.chain_len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    struct RequestId(&'static str);

    #[derive(Debug, PartialEq)]
    struct Tenant(&'static str);

    #[test]
    fn context_value_retrieval() {
        let ctx = Context::new().with_value(RequestId("req-123"));
        assert_eq!(ctx.get::<RequestId>(), Some(&RequestId("req-123")));
        assert!(ctx.contains::<RequestId>());
    }

    #[test]
    fn context_empty_lookup() {
        let ctx = Context::new();
        assert_eq!(ctx.get::<RequestId>(), None);
        assert!(!ctx.contains::<RequestId>());
    }

    #[test]
    fn context_shadowing() {
        let outer = Context::new().with_value(RequestId("outer"));
        let inner = outer.with_value(RequestId("inner"));
        assert_eq!(inner.get::<RequestId>(), Some(&RequestId("inner")));
        // Deriving never mutates the parent.
        assert_eq!(outer.get::<RequestId>(), Some(&RequestId("outer")));
    }

    #[test]
    fn context_type_isolation() {
        let ctx = Context::new()
            .with_value(RequestId("req-456"))
            .with_value(Tenant("tenant-1"));
        assert_eq!(ctx.get::<RequestId>(), Some(&RequestId("req-456")));
        assert_eq!(ctx.get::<Tenant>(), Some(&Tenant("tenant-1")));
    }

    #[test]
    fn context_clone_shares_entries() {
        let ctx = Context::new().with_value(RequestId("shared"));
        let cloned = ctx.clone();
        let a: *const RequestId = ctx.get::<RequestId>().unwrap();
        let b: *const RequestId = cloned.get::<RequestId>().unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn context_debug_reports_depth() {
        let ctx = Context::new()
            .with_value(RequestId("a"))
            .with_value(RequestId("b"));
        assert_eq!(format!("{ctx:?}"), "Context { entries: 2 }");
    }

    #[test]
    fn context_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Context>();
    }
}
