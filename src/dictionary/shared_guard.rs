use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;

use super::{set_in, Dictionary};
use crate::guard::SharedGuard;

/// A map guarded by a spinlock, both shared by every clone of the container.
///
/// Clones are handles to the same map: at most one operation, across all
/// clones, is inside the critical section at any instant. To share the map
/// between threads, give each thread its own clone.
///
/// # Examples
///
/// ```
/// use std::thread;
/// use tsmap::dictionary::{Dictionary, SharedGuardDict};
///
/// let dict: SharedGuardDict<u32, u32> = SharedGuardDict::new();
///
/// let handles: Vec<_> = (0..4)
///     .map(|i| {
///         let mut dict = dict.clone();
///         thread::spawn(move || {
///             for key in (i * 10)..((i + 1) * 10) {
///                 dict.insert(key, key * 2);
///             }
///         })
///     })
///     .collect();
///
/// for handle in handles {
///     handle.join().unwrap();
/// }
/// assert_eq!(dict.len(), 40);
/// assert_eq!(dict.get(&7), Some(14));
/// ```
pub struct SharedGuardDict<K, V> {
    map: SharedGuard<HashMap<K, V>>,
}

impl<K, V> SharedGuardDict<K, V> {
    /// Returns whether both containers are handles to the same map.
    pub fn shares_map_with(&self, other: &Self) -> bool {
        self.map.shares_lock_with(&other.map)
    }
}

impl<K: Eq + Hash, V: Clone> Dictionary for SharedGuardDict<K, V> {
    type Key = K;
    type Value = V;

    fn from_map(map: HashMap<K, V>) -> Self {
        Self {
            map: SharedGuard::new(map),
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

impl<K, V> Clone for SharedGuardDict<K, V> {
    fn clone(&self) -> Self {
        Self {
            map: self.map.clone(),
        }
    }
}

impl<K, V> fmt::Debug for SharedGuardDict<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SharedGuardDict")
            .field("map", &self.map)
            .finish()
    }
}

#[cfg(all(test, not(feature = "shuttle")))]
mod tests {
    use super::*;
    use std::thread;

    crate::dictionary_tests! {
        integers: SharedGuardDict<u32, u32>,
    }

    #[test]
    fn clones_share_the_map() {
        let mut dict: SharedGuardDict<&str, u32> = SharedGuardDict::new();
        let mut clone = dict.clone();
        clone.insert("a", 1);
        assert_eq!(dict.get(&"a"), Some(1));
        dict.remove_all();
        assert!(clone.is_empty());
        assert!(dict.shares_map_with(&clone));
    }

    #[test]
    fn concurrent_disjoint_inserts_are_not_lost() {
        const NUM_THREADS: u32 = 8;
        const KEYS_PER_THREAD: u32 = 1_000;

        let dict: SharedGuardDict<u32, u32> = SharedGuardDict::new();
        let handles: Vec<_> = (0..NUM_THREADS)
            .map(|i| {
                let mut dict = dict.clone();
                thread::spawn(move || {
                    for key in (i * KEYS_PER_THREAD)..((i + 1) * KEYS_PER_THREAD) {
                        dict.insert(key, i);
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(dict.len(), (NUM_THREADS * KEYS_PER_THREAD) as usize);
    }
}
