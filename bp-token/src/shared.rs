use parking_lot::RwLock;
use std::borrow::Borrow;
use std::collections::HashMap;
use std::fmt::{self, Debug, Formatter};
use std::hash::Hash;

/// A map shared between request threads behind a single lock.
///
/// Every operation takes the lock once, so each value is observed either
/// entirely before or entirely after any concurrent write to it. Closures
/// passed in run under the lock and must not block.
pub struct SharedMap<K, V> {
    inner: RwLock<HashMap<K, V>>,
}

impl<K, V> Default for SharedMap<K, V> {
    fn default() -> Self {
        Self {
            inner: RwLock::new(HashMap::new()),
        }
    }
}

impl<K: Eq + Hash, V> SharedMap<K, V> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or overwrites, returning the previous value.
    pub fn insert(&self, key: K, value: V) -> Option<V> {
        self.inner.write().insert(key, value)
    }

    pub fn remove<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Eq + Hash + ?Sized,
    {
        self.inner.write().remove(key)
    }

    /// Runs `f` on the value for `key`, if any.
    pub fn read<Q, R, F>(&self, key: &Q, f: F) -> Option<R>
    where
        K: Borrow<Q>,
        Q: Eq + Hash + ?Sized,
        F: FnOnce(&V) -> R,
    {
        self.inner.read().get(key).map(f)
    }

    /// Keeps the entries for which `keep` returns `true` and reports how many
    /// were removed.
    pub fn retain<F>(&self, mut keep: F) -> usize
    where
        F: FnMut(&K, &V) -> bool,
    {
        let mut map = self.inner.write();
        let before = map.len();
        map.retain(|key, value| keep(key, value));
        before - map.len()
    }

    pub fn len(&self) -> usize {
        self.inner.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.read().is_empty()
    }
}

impl<K, V> Debug for SharedMap<K, V> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("SharedMap")
            .field("len", &self.inner.read().len())
            .finish()
    }
}
