use std::collections::HashMap;
use std::hash::Hash;

use super::{set_in, Dictionary};

/// A thin wrapper around a [`HashMap`], with no synchronization.
///
/// Mutation needs `&mut self`, so sharing an `UnsyncDict` between threads
/// requires synchronization from the outside.
#[derive(Clone, Debug, Default)]
pub struct UnsyncDict<K, V> {
    map: HashMap<K, V>,
}

impl<K: Eq + Hash, V: Clone> Dictionary for UnsyncDict<K, V> {
    type Key = K;
    type Value = V;

    fn from_map(map: HashMap<K, V>) -> Self {
        Self { map }
    }

    fn get(&self, key: &K) -> Option<V> {
        self.map.get(key).cloned()
    }

    fn set(&mut self, key: K, value: Option<V>) {
        set_in(&mut self.map, key, value)
    }

    fn remove(&mut self, key: &K) -> Option<V> {
        self.map.remove(key)
    }

    fn remove_all(&mut self) {
        self.map.clear()
    }

    fn len(&self) -> usize {
        self.map.len()
    }
}
