use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;

use super::{set_in, Dictionary};
use crate::guard::Unguarded;

/// A map shared by every clone of the container, with no lock.
///
/// This has the same shape as [`SharedGuardDict`](super::SharedGuardDict)
/// with the locking removed, which makes it a baseline for the cost of the
/// spinlock. It is neither `Send` nor `Sync`, so clones can only be used from
/// the thread that created them.
///
/// ```compile_fail
/// use std::thread;
/// use tsmap::dictionary::{Dictionary, UnguardedDict};
///
/// let dict: UnguardedDict<u32, u32> = UnguardedDict::new();
/// let mut clone = dict.clone();
/// thread::spawn(move || clone.insert(1, 1));
/// ```
pub struct UnguardedDict<K, V> {
    map: Unguarded<HashMap<K, V>>,
}

impl<K: Eq + Hash, V: Clone> Dictionary for UnguardedDict<K, V> {
    type Key = K;
    type Value = V;

    fn from_map(map: HashMap<K, V>) -> Self {
        Self {
            map: Unguarded::new(map),
        }
    }

    fn get(&self, key: &K) -> Option<V> {
        self.map.with(|map| map.get(key).cloned())
    }

    fn set(&mut self, key: K, value: Option<V>) {
        self.map.with(|map| set_in(map, key, value))
    }

    fn remove(&mut self, key: &K) -> Option<V> {
        self.map.with(|map| map.remove(key))
    }

    fn remove_all(&mut self) {
        self.map.with(|map| map.clear())
    }

    fn len(&self) -> usize {
        self.map.with(|map| map.len())
    }
}

impl<K, V> Clone for UnguardedDict<K, V> {
    fn clone(&self) -> Self {
        Self {
            map: self.map.clone(),
        }
    }
}

impl<K, V> fmt::Debug for UnguardedDict<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UnguardedDict")
            .field("map", &self.map)
            .finish()
    }
}

#[cfg(all(test, not(feature = "shuttle")))]
mod tests {
    use super::*;

    crate::dictionary_tests! {
        integers: UnguardedDict<u32, u32>,
    }

    #[test]
    fn clones_share_the_map() {
        let mut dict: UnguardedDict<u32, u32> = UnguardedDict::new();
        let mut clone = dict.clone();
        clone.insert(1, 10);
        assert_eq!(dict.remove(&1), Some(10));
        assert!(clone.is_empty());
    }
}
