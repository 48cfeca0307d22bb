//! Own-property storage attached directly to a callable.

use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::error::{Error, Result};

/// A single attached value, held by reference.
///
/// Cloning a `MetaValue` copies the handle, never the value, so a metadata
/// snapshot taken at clone time aliases the same underlying data as the
/// original map.
#[derive(Clone)]
pub struct MetaValue {
    inner: Arc<dyn Any + Send + Sync>,
}

impl MetaValue {
    /// Wrap a value.
    pub fn new<T: Any + Send + Sync>(value: T) -> Self {
        Self {
            inner: Arc::new(value),
        }
    }

    /// Borrow the value as `T`, if it holds one.
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.inner.downcast_ref::<T>()
    }

    /// Whether the value holds a `T`.
    pub fn is<T: Any>(&self) -> bool {
        self.inner.is::<T>()
    }

    /// Whether two handles alias the same underlying value.
    pub fn ptr_eq(&self, other: &MetaValue) -> bool {
        std::ptr::eq(
            Arc::as_ptr(&self.inner) as *const u8,
            Arc::as_ptr(&other.inner) as *const u8,
        )
    }
}

impl fmt::Debug for MetaValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("MetaValue(..)")
    }
}

/// The enumerable own properties of a callable.
///
/// `clone()` takes a shallow snapshot: every value is carried over by
/// reference, and later inserts or removals on either map never reach the
/// other.
#[derive(Clone, Debug, Default)]
pub struct Metadata {
    entries: HashMap<String, MetaValue>,
}

impl Metadata {
    /// Create an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a value under `key`, returning the handle it replaced.
    pub fn insert<T: Any + Send + Sync>(
        &mut self,
        key: impl Into<String>,
        value: T,
    ) -> Option<MetaValue> {
        self.entries.insert(key.into(), MetaValue::new(value))
    }

    /// Attach an existing handle under `key`.
    pub fn insert_value(&mut self, key: impl Into<String>, value: MetaValue) -> Option<MetaValue> {
        self.entries.insert(key.into(), value)
    }

    /// Get the handle under `key`.
    pub fn get(&self, key: &str) -> Option<&MetaValue> {
        self.entries.get(key)
    }

    /// Borrow the value under `key` as `T`.
    pub fn get_as<T: Any>(&self, key: &str) -> Option<&T> {
        self.entries.get(key).and_then(|v| v.downcast_ref::<T>())
    }

    /// Like [`Metadata::get_as`], but a missing key or a type mismatch is
    /// a typed error.
    pub fn try_get_as<T: Any>(&self, key: &str) -> Result<&T> {
        let value = self.entries.get(key).ok_or_else(|| Error::MetadataMissing {
            key: key.to_string(),
        })?;
        value.downcast_ref::<T>().ok_or_else(|| Error::MetadataType {
            key: key.to_string(),
            expected: std::any::type_name::<T>(),
        })
    }

    /// Detach the value under `key`.
    pub fn remove(&mut self, key: &str) -> Option<MetaValue> {
        self.entries.remove(key)
    }

    /// Whether anything is attached under `key`.
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Number of attached values.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the map is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over the attached keys.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Iterate over attached entries.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &MetaValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn typed_access_roundtrip() {
        let mut meta = Metadata::new();
        meta.insert("tag", "shared".to_string());
        meta.insert("count", 3_u64);

        assert_eq!(meta.get_as::<String>("tag").unwrap(), "shared");
        assert_eq!(*meta.get_as::<u64>("count").unwrap(), 3);
        assert!(meta.get_as::<u64>("tag").is_none());
    }

    #[test]
    fn try_get_distinguishes_missing_from_mismatch() {
        let mut meta = Metadata::new();
        meta.insert("tag", "shared".to_string());

        let missing = meta.try_get_as::<String>("absent").unwrap_err();
        assert!(matches!(missing, Error::MetadataMissing { .. }));

        let mismatch = meta.try_get_as::<u64>("tag").unwrap_err();
        assert!(matches!(mismatch, Error::MetadataType { .. }));
    }

    #[test]
    fn clone_is_shallow() {
        let mut meta = Metadata::new();
        meta.insert("payload", vec![1_i64, 2, 3]);

        let snapshot = meta.clone();
        assert!(meta.get("payload").unwrap().ptr_eq(snapshot.get("payload").unwrap()));

        meta.insert("payload", vec![9_i64]);
        assert_eq!(snapshot.get_as::<Vec<i64>>("payload").unwrap(), &vec![1, 2, 3]);
    }
}
