//! Canned behaviors for standing in on a clone.

use std::collections::VecDeque;

use kagemusha_core::Behavior;
use parking_lot::Mutex;

/// A behavior that returns a clone of `value` on every call.
pub fn returning<C, A, R>(value: R) -> Behavior<C, A, R>
where
    R: Clone + Send + Sync + 'static,
{
    Behavior::new(move |_, _| value.clone())
}

/// A behavior that yields `values` in order, one per call.
///
/// Panics when invoked past the last value; running a sequence dry is a bug
/// in the test driving it.
pub fn sequence<C, A, R>(values: impl IntoIterator<Item = R>) -> Behavior<C, A, R>
where
    R: Send + 'static,
{
    let remaining = Mutex::new(values.into_iter().collect::<VecDeque<_>>());
    Behavior::new(move |_, _| {
        remaining
            .lock()
            .pop_front()
            .expect("stub sequence exhausted")
    })
}

/// A behavior that succeeds with a clone of `value` on every call.
pub fn succeeding<C, A, T, E>(value: T) -> Behavior<C, A, Result<T, E>>
where
    T: Clone + Send + Sync + 'static,
{
    Behavior::new(move |_, _| Ok(value.clone()))
}

/// A behavior that fails with a clone of `error` on every call.
pub fn failing<C, A, T, E>(error: E) -> Behavior<C, A, Result<T, E>>
where
    E: Clone + Send + Sync + 'static,
{
    Behavior::new(move |_, _| Err(error.clone()))
}

/// A behavior computed from the passed context and arguments.
///
/// Thin alias for [`Behavior::new`], for symmetry at stub sites.
pub fn from_fn<C, A, R>(f: impl Fn(&mut C, A) -> R + Send + Sync + 'static) -> Behavior<C, A, R> {
    Behavior::new(f)
}

/// A behavior that echoes its arguments back.
pub fn echo<C, A>() -> Behavior<C, A, A> {
    Behavior::new(|_, args| args)
}
