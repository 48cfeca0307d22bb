//! Invocation recording for stand-in behaviors.

use std::sync::Arc;

use kagemusha_core::Behavior;
use parking_lot::RwLock;

/// Records every invocation that flows through a wrapped behavior.
///
/// A spy hands out recording wrappers via [`Spy::wrap`]; all wrappers
/// created from one spy feed the same log, so a single spy can watch a
/// behavior installed on several doubles at once.
pub struct Spy<A> {
    calls: Arc<RwLock<Vec<A>>>,
}

impl<A> Spy<A> {
    /// Create a spy with an empty call log.
    pub fn new() -> Self {
        Self {
            calls: Arc::new(RwLock::new(Vec::new())),
        }
    }

    /// Number of recorded invocations.
    pub fn call_count(&self) -> usize {
        self.calls.read().len()
    }

    /// Whether anything was recorded.
    pub fn was_called(&self) -> bool {
        self.call_count() > 0
    }

    /// Clear the call log.
    pub fn reset(&self) {
        tracing::debug!("resetting spy call log");
        self.calls.write().clear();
    }

    /// Assert that exactly `times` invocations were recorded.
    pub fn verify_called(&self, times: usize) {
        let count = self.call_count();
        assert_eq!(
            count, times,
            "expected {} recorded calls, got {}",
            times, count
        );
    }
}

impl<A: Clone> Spy<A> {
    /// Snapshot of the recorded arguments, in call order.
    pub fn calls(&self) -> Vec<A> {
        self.calls.read().clone()
    }

    /// Argument of the `n`th recorded call.
    pub fn nth_call(&self, n: usize) -> Option<A> {
        self.calls.read().get(n).cloned()
    }
}

impl<A: Clone + Send + Sync + 'static> Spy<A> {
    /// Wrap `inner` so every call is recorded before being forwarded.
    pub fn wrap<C: 'static, R: 'static>(&self, inner: Behavior<C, A, R>) -> Behavior<C, A, R> {
        let calls = Arc::clone(&self.calls);
        Behavior::new(move |ctx, args: A| {
            calls.write().push(args.clone());
            inner.call(ctx, args)
        })
    }
}

impl<A> Clone for Spy<A> {
    fn clone(&self) -> Self {
        Self {
            calls: Arc::clone(&self.calls),
        }
    }
}

impl<A> Default for Spy<A> {
    fn default() -> Self {
        Self::new()
    }
}
