//! Key-value containers with different synchronization strategies.
//!
//! Every container implements [`Dictionary`]:
//!
//! | Container          | Synchronization                         | Clones            |
//! |--------------------|-----------------------------------------|-------------------|
//! | [`HashMap`]        | none                                    | independent       |
//! | [`UnsyncDict`]     | none                                    | independent       |
//! | [`QueueDict`]      | [`DispatchQueue`](crate::queue::DispatchQueue) with barrier writes | shared |
//! | [`ValueGuardDict`] | spinlock copied along with the map      | independent       |
//! | [`SharedGuardDict`]| spinlock shared with the map            | shared            |
//! | [`UnguardedDict`]  | none                                    | shared, one thread |
use std::collections::HashMap;
use std::hash::Hash;

mod queue;
pub use self::queue::QueueDict;
mod shared_guard;
pub use self::shared_guard::SharedGuardDict;
mod unguarded;
pub use self::unguarded::UnguardedDict;
mod unsync;
pub use self::unsync::UnsyncDict;
mod value_guard;
pub use self::value_guard::ValueGuardDict;

/// A mutable key-value container.
pub trait Dictionary: Sized {
    type Key: Eq + Hash;
    type Value: Clone;

    /// Creates a container holding the entries of `map`.
    fn from_map(map: HashMap<Self::Key, Self::Value>) -> Self;

    /// Creates an empty container.
    fn new() -> Self {
        Self::from_map(HashMap::new())
    }

    /// Returns a copy of the value stored for `key`.
    fn get(&self, key: &Self::Key) -> Option<Self::Value>;

    /// Stores `value` for `key`, overwriting any previous value. Setting
    /// `None` removes the key.
    fn set(&mut self, key: Self::Key, value: Option<Self::Value>);

    /// Removes `key`, returning the value it had.
    fn remove(&mut self, key: &Self::Key) -> Option<Self::Value>;

    /// Removes every entry.
    fn remove_all(&mut self);

    /// Returns the number of entries.
    fn len(&self) -> usize;

    fn insert(&mut self, key: Self::Key, value: Self::Value) {
        self.set(key, Some(value))
    }

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<K: Eq + Hash, V: Clone> Dictionary for HashMap<K, V> {
    type Key = K;
    type Value = V;

    fn from_map(map: HashMap<K, V>) -> Self {
        map
    }

    fn get(&self, key: &K) -> Option<V> {
        HashMap::get(self, key).cloned()
    }

    fn set(&mut self, key: K, value: Option<V>) {
        set_in(self, key, value)
    }

    fn remove(&mut self, key: &K) -> Option<V> {
        HashMap::remove(self, key)
    }

    fn remove_all(&mut self) {
        self.clear()
    }

    fn len(&self) -> usize {
        HashMap::len(self)
    }
}

/// Applies `set` semantics to a plain map. Shared by the containers that wrap
/// one.
pub(crate) fn set_in<K: Eq + Hash, V>(map: &mut HashMap<K, V>, key: K, value: Option<V>) {
    match value {
        Some(value) => {
            map.insert(key, value);
        }
        None => {
            map.remove(&key);
        }
    }
}

// Generates the behavioural tests shared by every implementation of the trait.
// `get` is called through the trait, since `HashMap::get` returns a reference.
#[macro_export]
macro_rules! dictionary_tests {
    ($($name:ident: $type:ty,)*) => {
    $(
        mod $name {
            use super::*;
            use std::collections::HashMap;
            use $crate::dictionary::Dictionary;

            #[test]
            fn test_new_is_empty() {
                let dict = <$type>::new();
                assert_eq!(dict.len(), 0);
                assert!(dict.is_empty());
            }

            #[test]
            fn test_new_through_trait() {
                let dict = <$type as Dictionary>::new();
                assert_eq!(Dictionary::len(&dict), 0);
            }

            #[test]
            fn test_from_map_keeps_entries() {
                let dict = <$type>::from_map(HashMap::from([(1, 10), (2, 20)]));
                assert_eq!(dict.len(), 2);
                assert_eq!(Dictionary::get(&dict, &1), Some(10));
                assert_eq!(Dictionary::get(&dict, &2), Some(20));
            }

            #[test]
            fn test_get_missing_key() {
                let dict = <$type>::from_map(HashMap::from([(1, 10)]));
                assert_eq!(Dictionary::get(&dict, &2), None);
            }

            #[test]
            fn test_remove_missing_key() {
                let mut dict = <$type>::from_map(HashMap::from([(1, 10)]));
                assert_eq!(dict.remove(&2), None);
                assert_eq!(dict.len(), 1);
            }

            #[test]
            fn test_remove_from_empty() {
                let mut dict = <$type>::new();
                assert_eq!(dict.remove(&1), None);
                dict.remove_all();
                assert_eq!(dict.len(), 0);
            }

            #[test]
            fn test_set_then_get() {
                let mut dict = <$type>::new();
                dict.set(1, Some(10));
                assert_eq!(Dictionary::get(&dict, &1), Some(10));
                assert_eq!(dict.len(), 1);
            }

            #[test]
            fn test_set_overwrites() {
                let mut dict = <$type>::new();
                dict.insert(1, 10);
                dict.insert(1, 11);
                assert_eq!(Dictionary::get(&dict, &1), Some(11));
                assert_eq!(dict.len(), 1);
            }

            #[test]
            fn test_set_none_removes() {
                let mut dict = <$type>::new();
                dict.insert(1, 10);
                dict.set(1, None);
                assert_eq!(Dictionary::get(&dict, &1), None);
                assert_eq!(dict.len(), 0);
            }

            #[test]
            fn test_remove_twice() {
                let mut dict = <$type>::new();
                dict.insert(1, 10);
                assert_eq!(dict.remove(&1), Some(10));
                assert_eq!(dict.remove(&1), None);
            }

            #[test]
            fn test_remove_all() {
                let mut dict = <$type>::new();
                for i in 0..10 {
                    dict.insert(i, i * 10);
                }
                dict.remove_all();
                assert_eq!(dict.len(), 0);
                for i in 0..10 {
                    assert_eq!(Dictionary::get(&dict, &i), None);
                }
            }

            #[test]
            fn test_insert_then_remove_in_shuffled_order() {
                let keys = [1, 2, 3, 4, 5];
                let values = [10, 20, 30, 40, 50];
                let mut dict = <$type>::new();
                for (key, value) in keys.into_iter().zip(values) {
                    dict.insert(key, value);
                }
                assert_eq!(dict.len(), 5);
                assert_eq!(Dictionary::get(&dict, &3), Some(30));

                for key in [5, 3, 1, 2, 4] {
                    assert_eq!(dict.remove(&key), Some(key * 10));
                }
                assert_eq!(dict.len(), 0);
            }
        }
    )*
    }
}
