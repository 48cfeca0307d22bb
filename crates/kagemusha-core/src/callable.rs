//! Callables and the cloning operation that isolates them.

use std::any::Any;
use std::fmt;

use crate::behavior::{Augmentation, Behavior, BehaviorSet};
use crate::error::{Error, Result};
use crate::metadata::Metadata;

/// An invocable value carrying attached metadata and a behavior set.
///
/// A `Callable` bundles the three things the cloning operation has to
/// preserve: the invocation behavior itself, the own properties attached
/// directly to the value, and the name-to-behavior table shared with
/// everything derived from it.
pub struct Callable<C, A, R> {
    invoke: Behavior<C, A, R>,
    metadata: Metadata,
    behaviors: BehaviorSet<C, A, R>,
}

impl<C, A, R> Callable<C, A, R> {
    /// Create a callable from a function, with empty metadata and an empty
    /// root behavior set.
    pub fn new(f: impl Fn(&mut C, A) -> R + Send + Sync + 'static) -> Self {
        Self::from_behavior(Behavior::new(f))
    }

    /// Create a callable from an existing behavior.
    pub fn from_behavior(invoke: Behavior<C, A, R>) -> Self {
        Self {
            invoke,
            metadata: Metadata::new(),
            behaviors: BehaviorSet::new(),
        }
    }

    /// Start building a callable with initial metadata and behaviors.
    pub fn builder(f: impl Fn(&mut C, A) -> R + Send + Sync + 'static) -> CallableBuilder<C, A, R> {
        CallableBuilder { inner: Self::new(f) }
    }

    /// Invoke the callable.
    ///
    /// The context and arguments are forwarded unchanged. Nothing is
    /// captured at construction or clone time, so the same callable runs
    /// against whatever context each call site supplies.
    pub fn call(&self, ctx: &mut C, args: A) -> R {
        self.invoke.call(ctx, args)
    }

    /// The invocation behavior itself.
    pub fn invocation(&self) -> &Behavior<C, A, R> {
        &self.invoke
    }

    /// Attached own properties.
    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    /// Mutable access to the own properties.
    pub fn metadata_mut(&mut self) -> &mut Metadata {
        &mut self.metadata
    }

    /// The behavior set associated with this callable.
    pub fn behaviors(&self) -> &BehaviorSet<C, A, R> {
        &self.behaviors
    }

    /// Look up a behavior along the delegation chain.
    pub fn behavior(&self, name: &str) -> Option<Behavior<C, A, R>> {
        self.behaviors.get(name)
    }

    /// Look up and invoke a behavior.
    pub fn invoke_behavior(&self, name: &str, ctx: &mut C, args: A) -> Result<R> {
        let behavior = self
            .behaviors
            .get(name)
            .ok_or_else(|| Error::unknown_behavior(name))?;
        Ok(behavior.call(ctx, args))
    }

    /// Clone this callable without overrides.
    ///
    /// Equivalent to [`Callable::isolate_with`] with an empty augmentation:
    /// the clone still gets a behavior-set layer of its own.
    pub fn isolate(&self) -> Self {
        self.isolate_with(Augmentation::new())
    }

    /// Clone this callable, overriding behaviors on the clone only.
    ///
    /// The clone invokes the same underlying function, carries a shallow
    /// snapshot of the metadata taken now, and resolves behaviors through a
    /// fresh layer delegating to this callable's set. Overrides land on the
    /// fresh layer; this callable and everything previously cloned from it
    /// are never touched.
    pub fn isolate_with(&self, augmentation: Augmentation<C, A, R>) -> Self {
        let behaviors = self.behaviors.derived();
        for (name, behavior) in augmentation {
            behaviors.insert(name, behavior);
        }
        tracing::debug!(overrides = behaviors.local_len(), "derived isolated callable");
        Self {
            invoke: self.invoke.clone(),
            metadata: self.metadata.clone(),
            behaviors,
        }
    }
}

impl<C, A, R> fmt::Debug for Callable<C, A, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Callable")
            .field("metadata", &self.metadata.len())
            .field("behaviors", &self.behaviors)
            .finish()
    }
}

/// Builder for callables with initial metadata and behaviors.
pub struct CallableBuilder<C, A, R> {
    inner: Callable<C, A, R>,
}

impl<C, A, R> CallableBuilder<C, A, R> {
    /// Attach a metadata value.
    pub fn meta<T: Any + Send + Sync>(mut self, key: impl Into<String>, value: T) -> Self {
        self.inner.metadata.insert(key, value);
        self
    }

    /// Define a behavior on the callable's own set.
    pub fn behavior(
        self,
        name: impl Into<String>,
        f: impl Fn(&mut C, A) -> R + Send + Sync + 'static,
    ) -> Self {
        self.inner.behaviors.insert(name, Behavior::new(f));
        self
    }

    /// Define a behavior from an existing handle.
    pub fn behavior_entry(self, name: impl Into<String>, behavior: Behavior<C, A, R>) -> Self {
        self.inner.behaviors.insert(name, behavior);
        self
    }

    /// Finish building.
    pub fn build(self) -> Callable<C, A, R> {
        self.inner
    }
}
