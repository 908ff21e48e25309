use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;

use super::{set_in, Dictionary};
use crate::guard::ValueGuard;

/// A map guarded by a spinlock that is copied whenever the container is.
///
/// Within one instance every operation is serialized by the spinlock. A clone,
/// however, starts out with a copy of the map and a lock of its own: clones
/// never exclude each other and never see each other's updates. Handing clones
/// to several threads in the hope of sharing one map silently loses every
/// update made through the other clones.
///
/// # Examples
///
/// ```
/// use tsmap::dictionary::{Dictionary, ValueGuardDict};
///
/// let mut dict = ValueGuardDict::new();
/// dict.insert("a", 1);
///
/// let mut copy = dict.clone();
/// copy.insert("b", 2);
///
/// // The copy diverged from the original.
/// assert_eq!(dict.len(), 1);
/// assert_eq!(copy.len(), 2);
/// ```
pub struct ValueGuardDict<K, V> {
    map: ValueGuard<HashMap<K, V>>,
}

impl<K: Eq + Hash, V: Clone> Dictionary for ValueGuardDict<K, V> {
    type Key = K;
    type Value = V;

    fn from_map(map: HashMap<K, V>) -> Self {
        Self {
            map: ValueGuard::new(map),
        }
    }

    fn get(&self, key: &K) -> Option<V> {
        self.map.with_lock(|map| map.get(key).cloned())
    }

    fn set(&mut self, key: K, value: Option<V>) {
        self.map.with_lock(|map| set_in(map, key, value))
    }

    fn remove(&mut self, key: &K) -> Option<V> {
        self.map.with_lock(|map| map.remove(key))
    }

    fn remove_all(&mut self) {
        self.map.with_lock(|map| map.clear())
    }

    fn len(&self) -> usize {
        self.map.with_lock(|map| map.len())
    }
}

impl<K: Clone, V: Clone> Clone for ValueGuardDict<K, V> {
    fn clone(&self) -> Self {
        Self {
            map: self.map.clone(),
        }
    }
}

impl<K, V> fmt::Debug for ValueGuardDict<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValueGuardDict")
            .field("map", &self.map)
            .finish()
    }
}
