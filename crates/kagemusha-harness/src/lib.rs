//! Kagemusha Test Harness
//!
//! Test-facing layer over `kagemusha-core`: canned stub behaviors,
//! invocation recording, assertion helpers, and shared tracing setup for
//! suites that stand doubles in for shared callables.

pub mod assertions;
pub mod macros;
pub mod spy;
pub mod stubs;

use kagemusha_core::{Augmentation, Callable};
use once_cell::sync::Lazy;
use parking_lot::Mutex;
use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing_subscriber::EnvFilter;

/// Global counter for unique double labels
static DOUBLE_COUNTER: AtomicUsize = AtomicUsize::new(0);

/// Labels of doubles currently registered, for leak tracking
static ACTIVE_DOUBLES: Lazy<Mutex<HashSet<String>>> = Lazy::new(|| Mutex::new(HashSet::new()));

/// Initialize the harness with tracing support
pub fn init() {
    static INIT: Lazy<()> = Lazy::new(|| {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| {
                EnvFilter::new("warn,kagemusha_core=debug,kagemusha_harness=debug")
            });

        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .with_file(true)
            .with_line_number(true)
            .try_init()
            .ok();
    });

    Lazy::force(&INIT);
}

/// Generate a unique label for an anonymous double
pub fn unique_label() -> String {
    HarnessConfig::default().label()
}

/// Register a live double under its label
pub fn register_double(label: &str) {
    ACTIVE_DOUBLES.lock().insert(label.to_string());
}

/// Deregister a double (on test teardown)
pub fn deregister_double(label: &str) {
    ACTIVE_DOUBLES.lock().remove(label);
}

/// Get count of doubles currently registered
pub fn active_double_count() -> usize {
    ACTIVE_DOUBLES.lock().len()
}

/// Harness configuration
#[derive(Debug, Clone)]
pub struct HarnessConfig {
    /// Whether to enable verbose output
    pub verbose: bool,
    /// Prefix for generated double labels
    pub label_prefix: String,
}

impl HarnessConfig {
    /// Generate the next label with the configured prefix
    pub fn label(&self) -> String {
        let count = DOUBLE_COUNTER.fetch_add(1, Ordering::SeqCst);
        format!("{}_{}", self.label_prefix, count)
    }
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            verbose: std::env::var("KAGEMUSHA_TEST_VERBOSE").is_ok(),
            label_prefix: "double".to_string(),
        }
    }
}

/// A labelled double that stays registered for as long as it lives.
///
/// Dropping the guard deregisters the label, so
/// [`active_double_count`] can flag doubles leaking across test cases.
pub struct ScopedDouble<C, A, R> {
    label: String,
    callable: Callable<C, A, R>,
}

impl<C, A, R> ScopedDouble<C, A, R> {
    /// Isolate `original` and register the double under a fresh label.
    pub fn isolate(original: &Callable<C, A, R>) -> Self {
        Self::isolate_with(original, Augmentation::new())
    }

    /// Isolate `original` with overrides and register under a fresh label.
    pub fn isolate_with(original: &Callable<C, A, R>, augmentation: Augmentation<C, A, R>) -> Self {
        let label = unique_label();
        register_double(&label);
        tracing::debug!(double = %label, "registered scoped double");
        Self {
            label,
            callable: original.isolate_with(augmentation),
        }
    }

    /// The double's label
    pub fn label(&self) -> &str {
        &self.label
    }

    /// The isolated callable
    pub fn callable(&self) -> &Callable<C, A, R> {
        &self.callable
    }
}

impl<C, A, R> std::ops::Deref for ScopedDouble<C, A, R> {
    type Target = Callable<C, A, R>;

    fn deref(&self) -> &Self::Target {
        &self.callable
    }
}

impl<C, A, R> Drop for ScopedDouble<C, A, R> {
    fn drop(&mut self) {
        deregister_double(&self.label);
        tracing::debug!(double = %self.label, "deregistered scoped double");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_are_unique_and_prefixed() {
        let config = HarnessConfig {
            verbose: false,
            label_prefix: "stand_in".to_string(),
        };
        let first = config.label();
        let second = config.label();
        assert!(first.starts_with("stand_in_"));
        assert_ne!(first, second);
    }

    #[test]
    fn registry_tracks_doubles_by_label() {
        let label = unique_label();
        let before = active_double_count();

        register_double(&label);
        assert_eq!(active_double_count(), before + 1);

        deregister_double(&label);
        assert_eq!(active_double_count(), before);
    }
}
