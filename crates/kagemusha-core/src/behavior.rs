//! Invocation behaviors and the delegating behavior set.

use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;

/// A shared invocation behavior.
///
/// The context `C` plays the role of the receiver: callers supply one at
/// every invocation and the behavior never captures one of its own, so the
/// same behavior can run against any context the call site provides.
pub struct Behavior<C, A, R> {
    func: Arc<dyn Fn(&mut C, A) -> R + Send + Sync>,
}

impl<C, A, R> Behavior<C, A, R> {
    /// Wrap a function as a behavior.
    pub fn new(f: impl Fn(&mut C, A) -> R + Send + Sync + 'static) -> Self {
        Self { func: Arc::new(f) }
    }

    /// Invoke with the caller-supplied context and arguments.
    pub fn call(&self, ctx: &mut C, args: A) -> R {
        (self.func)(ctx, args)
    }

    /// Whether two handles share the same underlying function.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        std::ptr::eq(
            Arc::as_ptr(&self.func) as *const u8,
            Arc::as_ptr(&other.func) as *const u8,
        )
    }
}

impl<C, A, R> Clone for Behavior<C, A, R> {
    fn clone(&self) -> Self {
        Self {
            func: Arc::clone(&self.func),
        }
    }
}

impl<C, A, R> fmt::Debug for Behavior<C, A, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Behavior")
    }
}

struct SetInner<C, A, R> {
    entries: RwLock<HashMap<String, Behavior<C, A, R>>>,
    parent: Option<BehaviorSet<C, A, R>>,
}

/// A name-to-behavior table with delegation.
///
/// Handles are shared views: cloning a `BehaviorSet` yields another view of
/// the same layer, and a set created with [`BehaviorSet::derived`] keeps a
/// live link to its parent, so a name the layer does not define resolves to
/// whatever the parent holds at lookup time. Writes land only on the layer
/// written.
pub struct BehaviorSet<C, A, R> {
    inner: Arc<SetInner<C, A, R>>,
}

impl<C, A, R> BehaviorSet<C, A, R> {
    /// Create an empty root set.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(SetInner {
                entries: RwLock::new(HashMap::new()),
                parent: None,
            }),
        }
    }

    /// Create a fresh layer whose lookups fall through to `self`.
    pub fn derived(&self) -> Self {
        Self {
            inner: Arc::new(SetInner {
                entries: RwLock::new(HashMap::new()),
                parent: Some(self.clone()),
            }),
        }
    }

    /// Install a behavior on this layer, returning the one it shadowed
    /// locally, if any.
    pub fn insert(
        &self,
        name: impl Into<String>,
        behavior: Behavior<C, A, R>,
    ) -> Option<Behavior<C, A, R>> {
        let name = name.into();
        tracing::debug!(behavior = %name, "installing behavior");
        self.inner.entries.write().insert(name, behavior)
    }

    /// Remove a behavior from this layer.
    ///
    /// Delegated entries are untouched; after removal the name may still
    /// resolve through the parent chain.
    pub fn remove(&self, name: &str) -> Option<Behavior<C, A, R>> {
        self.inner.entries.write().remove(name)
    }

    /// Look `name` up on this layer, then along the delegation chain.
    pub fn get(&self, name: &str) -> Option<Behavior<C, A, R>> {
        if let Some(found) = self.inner.entries.read().get(name) {
            return Some(found.clone());
        }
        self.inner.parent.as_ref().and_then(|parent| parent.get(name))
    }

    /// Whether `name` resolves anywhere along the chain.
    pub fn contains(&self, name: &str) -> bool {
        if self.inner.entries.read().contains_key(name) {
            return true;
        }
        self.inner
            .parent
            .as_ref()
            .is_some_and(|parent| parent.contains(name))
    }

    /// Whether `name` is defined on this layer itself.
    pub fn contains_local(&self, name: &str) -> bool {
        self.inner.entries.read().contains_key(name)
    }

    /// All names visible through this set, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names = BTreeSet::new();
        self.collect_names(&mut names);
        names.into_iter().collect()
    }

    fn collect_names(&self, into: &mut BTreeSet<String>) {
        for name in self.inner.entries.read().keys() {
            into.insert(name.clone());
        }
        if let Some(parent) = &self.inner.parent {
            parent.collect_names(into);
        }
    }

    /// Number of behaviors defined on this layer.
    pub fn local_len(&self) -> usize {
        self.inner.entries.read().len()
    }

    /// Whether this layer defines nothing itself.
    pub fn is_empty(&self) -> bool {
        self.inner.entries.read().is_empty()
    }

    /// Whether this set delegates to a parent.
    pub fn has_parent(&self) -> bool {
        self.inner.parent.is_some()
    }

    /// Whether two handles are views of the same layer.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl<C, A, R> Clone for BehaviorSet<C, A, R> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<C, A, R> Default for BehaviorSet<C, A, R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C, A, R> fmt::Debug for BehaviorSet<C, A, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BehaviorSet")
            .field("local", &self.local_len())
            .field("delegated", &self.has_parent())
            .finish()
    }
}

/// Behavior overrides to install on a freshly derived layer.
///
/// Built caller-side and consumed by [`Callable::isolate_with`]; entries
/// are applied in insertion order, so a later entry for the same name wins.
///
/// [`Callable::isolate_with`]: crate::Callable::isolate_with
pub struct Augmentation<C, A, R> {
    entries: Vec<(String, Behavior<C, A, R>)>,
}

impl<C, A, R> Augmentation<C, A, R> {
    /// Create an empty override map.
    pub fn new() -> Self {
        Self { entries: Vec::new() }
    }

    /// Override `name` with a function.
    pub fn set(
        mut self,
        name: impl Into<String>,
        f: impl Fn(&mut C, A) -> R + Send + Sync + 'static,
    ) -> Self {
        self.entries.push((name.into(), Behavior::new(f)));
        self
    }

    /// Override `name` with an existing behavior.
    pub fn set_behavior(mut self, name: impl Into<String>, behavior: Behavior<C, A, R>) -> Self {
        self.entries.push((name.into(), behavior));
        self
    }

    /// Number of overrides.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no overrides are present.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<C, A, R> Clone for Augmentation<C, A, R> {
    fn clone(&self) -> Self {
        Self {
            entries: self.entries.clone(),
        }
    }
}

impl<C, A, R> Default for Augmentation<C, A, R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C, A, R> fmt::Debug for Augmentation<C, A, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Augmentation")
            .field("overrides", &self.len())
            .finish()
    }
}

impl<C, A, R> IntoIterator for Augmentation<C, A, R> {
    type Item = (String, Behavior<C, A, R>);
    type IntoIter = std::vec::IntoIter<Self::Item>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<C, A, R> FromIterator<(String, Behavior<C, A, R>)> for Augmentation<C, A, R> {
    fn from_iter<I: IntoIterator<Item = (String, Behavior<C, A, R>)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_falls_through_to_the_parent() {
        let root: BehaviorSet<(), (), &'static str> = BehaviorSet::new();
        root.insert("base", Behavior::new(|_, _| "from root"));

        let derived = root.derived();
        assert!(derived.is_empty());
        assert_eq!(derived.get("base").unwrap().call(&mut (), ()), "from root");
    }

    #[test]
    fn writes_stay_on_the_written_layer() {
        let root: BehaviorSet<(), (), &'static str> = BehaviorSet::new();
        let derived = root.derived();

        derived.insert("only_here", Behavior::new(|_, _| "derived"));
        assert!(derived.contains_local("only_here"));
        assert!(!root.contains("only_here"));
    }

    #[test]
    fn shadowing_hides_the_parent_entry_without_touching_it() {
        let root: BehaviorSet<(), (), &'static str> = BehaviorSet::new();
        root.insert("speak", Behavior::new(|_, _| "root"));

        let derived = root.derived();
        derived.insert("speak", Behavior::new(|_, _| "derived"));

        assert_eq!(derived.get("speak").unwrap().call(&mut (), ()), "derived");
        assert_eq!(root.get("speak").unwrap().call(&mut (), ()), "root");
    }

    #[test]
    fn names_walk_the_whole_chain() {
        let root: BehaviorSet<(), (), ()> = BehaviorSet::new();
        root.insert("a", Behavior::new(|_, _| ()));

        let derived = root.derived();
        derived.insert("b", Behavior::new(|_, _| ()));
        derived.insert("a", Behavior::new(|_, _| ()));

        assert_eq!(derived.names(), vec!["a".to_string(), "b".to_string()]);
    }

    #[test]
    fn removal_uncovers_the_delegated_entry() {
        let root: BehaviorSet<(), (), &'static str> = BehaviorSet::new();
        root.insert("speak", Behavior::new(|_, _| "root"));

        let derived = root.derived();
        derived.insert("speak", Behavior::new(|_, _| "derived"));
        assert!(derived.remove("speak").is_some());

        assert_eq!(derived.get("speak").unwrap().call(&mut (), ()), "root");
    }
}
