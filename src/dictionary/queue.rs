use std::cell::UnsafeCell;
use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;
use std::sync::Arc;

use super::{set_in, Dictionary};
use crate::queue::{DispatchQueue, QueueConfig};

/// A map that is only ever touched from inside tasks of one dispatch queue.
struct QueueCell<K, V> {
    map: UnsafeCell<HashMap<K, V>>,
}

// SAFETY: Shared references to the map are handed out to concurrent
// non-barrier tasks, which needs `Sync` contents, and exclusive ones to
// barrier tasks on worker threads, which needs `Send` contents.
unsafe impl<K: Send + Sync, V: Send + Sync> Sync for QueueCell<K, V> {}

impl<K, V> QueueCell<K, V> {
    /// # Safety
    ///
    /// Must only be called from a task of the queue that owns this cell.
    unsafe fn read(&self) -> &HashMap<K, V> {
        &*self.map.get()
    }

    /// # Safety
    ///
    /// Must only be called from a barrier task of the queue that owns this
    /// cell.
    #[allow(clippy::mut_from_ref)]
    unsafe fn write(&self) -> &mut HashMap<K, V> {
        &mut *self.map.get()
    }
}

/// A map protected by a [`DispatchQueue`], used as a reader/writer lock.
///
/// - [`get`](Dictionary::get) and [`len`](Dictionary::len) are synchronous
///   non-barrier tasks: they run concurrently with each other on the calling
///   thread.
/// - [`set`](Dictionary::set) and [`remove_all`](Dictionary::remove_all) are
///   asynchronous barrier tasks: they return at once and are applied later on
///   a worker thread, with nothing else running.
/// - [`remove`](Dictionary::remove) is a synchronous barrier task, so that it
///   can return the removed value.
///
/// All operations on a container, and on its clones, which share the queue,
/// are applied in the order they were submitted. A read therefore observes
/// every write submitted before it.
///
/// # Examples
///
/// ```
/// use tsmap::dictionary::{Dictionary, QueueDict};
///
/// let mut dict = QueueDict::new();
/// dict.insert(1, "one");
///
/// // Applied asynchronously, but ordered before this read.
/// assert_eq!(dict.get(&1), Some("one"));
/// assert_eq!(dict.remove(&1), Some("one"));
/// ```
pub struct QueueDict<K, V> {
    map: Arc<QueueCell<K, V>>,
    queue: Arc<DispatchQueue>,
}

impl<K, V> QueueDict<K, V>
where
    K: Eq + Hash + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    /// Creates a container holding the entries of `map`, whose queue is
    /// configured by `config`.
    pub fn with_config(map: HashMap<K, V>, config: QueueConfig) -> Self {
        Self {
            map: Arc::new(QueueCell {
                map: UnsafeCell::new(map),
            }),
            queue: Arc::new(DispatchQueue::with_config(config)),
        }
    }

    /// Blocks until every write submitted so far has been applied.
    pub fn flush(&self) {
        self.queue.sync_barrier(|| ())
    }

    /// Submits `f` as a barrier task with exclusive access to the map.
    fn write(&self, f: impl FnOnce(&mut HashMap<K, V>) + Send + 'static) {
        let cell = Arc::clone(&self.map);
        self.queue.spawn_barrier(move || {
            // SAFETY: Runs as a barrier task of the owning queue.
            f(unsafe { cell.write() })
        });
    }
}

impl<K, V> QueueDict<K, V> {
    /// Returns whether both containers are handles to the same map.
    pub fn shares_map_with(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.map, &other.map)
    }
}

impl<K, V> Dictionary for QueueDict<K, V>
where
    K: Eq + Hash + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    type Key = K;
    type Value = V;

    fn from_map(map: HashMap<K, V>) -> Self {
        Self::with_config(map, QueueConfig::default().with_label("tsmap.queue-dict"))
    }

    fn get(&self, key: &K) -> Option<V> {
        // SAFETY: Runs as a task of the owning queue.
        self.queue
            .sync(|| unsafe { self.map.read() }.get(key).cloned())
    }

    fn set(&mut self, key: K, value: Option<V>) {
        self.write(move |map| set_in(map, key, value))
    }

    fn remove(&mut self, key: &K) -> Option<V> {
        // SAFETY: Runs as a barrier task of the owning queue.
        self.queue
            .sync_barrier(|| unsafe { self.map.write() }.remove(key))
    }

    fn remove_all(&mut self) {
        self.write(|map| map.clear())
    }

    fn len(&self) -> usize {
        // SAFETY: Runs as a task of the owning queue.
        self.queue.sync(|| unsafe { self.map.read() }.len())
    }
}

impl<K, V> Clone for QueueDict<K, V> {
    fn clone(&self) -> Self {
        Self {
            map: Arc::clone(&self.map),
            queue: Arc::clone(&self.queue),
        }
    }
}

impl<K, V> fmt::Debug for QueueDict<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QueueDict")
            .field("queue", &self.queue)
            .finish_non_exhaustive()
    }
}
