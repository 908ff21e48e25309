//! A concurrent task queue with barrier tasks.
//!
//! See [`DispatchQueue`].
use std::collections::VecDeque;
use std::fmt;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;

use tracing::{debug, trace};

use crate::error::Error;
use crate::sync::{thread, Condvar, Mutex};

const DEFAULT_LABEL: &str = "tsmap.dispatch-queue";
const MIN_WORKERS: usize = 2;
const MAX_DEFAULT_WORKERS: usize = 8;

/// Configuration of a [`DispatchQueue`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QueueConfig {
    workers: usize,
    label: String,
}

impl QueueConfig {
    /// Creates a configuration with a concurrency limit of `workers` threads.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConcurrencyLimit`] if `workers` is less than 2, as the
    /// queue would no longer be concurrent.
    pub fn new(workers: usize) -> Result<Self, Error> {
        if workers < MIN_WORKERS {
            return Err(Error::ConcurrencyLimit(workers));
        }
        Ok(Self {
            workers,
            label: DEFAULT_LABEL.to_string(),
        })
    }

    /// Sets the label used when logging about the queue.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    pub fn label(&self) -> &str {
        &self.label
    }
}

impl Default for QueueConfig {
    /// One worker per available core, between 2 and 8.
    fn default() -> Self {
        let workers = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(MIN_WORKERS)
            .clamp(MIN_WORKERS, MAX_DEFAULT_WORKERS);
        Self {
            workers,
            label: DEFAULT_LABEL.to_string(),
        }
    }
}

type Task = Box<dyn FnOnce() + Send + 'static>;

/// An asynchronous task waiting for a worker.
struct Job {
    ticket: u64,
    barrier: bool,
    task: Task,
}

#[derive(Default)]
struct State {
    /// Ticket handed to the next submitted task.
    next_ticket: u64,
    /// Every task with a smaller ticket has started.
    admitted: u64,
    /// Number of non-barrier tasks currently running.
    running: usize,
    barrier_running: bool,
    jobs: VecDeque<Job>,
    panicked: usize,
    shutdown: bool,
}

impl State {
    fn take_ticket(&mut self) -> u64 {
        let ticket = self.next_ticket;
        self.next_ticket += 1;
        ticket
    }

    /// Returns whether the task holding `ticket` may start.
    ///
    /// Tasks start strictly in ticket order. Nothing starts while a barrier
    /// runs, and a barrier waits until every running task has finished.
    fn can_start(&self, ticket: u64, barrier: bool) -> bool {
        self.admitted == ticket && !self.barrier_running && (!barrier || self.running == 0)
    }

    fn start(&mut self, barrier: bool) {
        self.admitted += 1;
        if barrier {
            self.barrier_running = true;
        } else {
            self.running += 1;
        }
    }

    fn finish(&mut self, barrier: bool) {
        if barrier {
            self.barrier_running = false;
        } else {
            self.running -= 1;
        }
    }

    fn next_ready_job(&mut self) -> Option<Job> {
        let ready = self
            .jobs
            .front()
            .map_or(false, |job| self.can_start(job.ticket, job.barrier));
        if ready {
            self.jobs.pop_front()
        } else {
            None
        }
    }
}

struct Shared {
    state: Mutex<State>,
    changed: Condvar,
}

impl Shared {
    fn finish(&self, barrier: bool) {
        self.state.lock().unwrap().finish(barrier);
        self.changed.notify_all();
    }
}

/// Marks a task run on the calling thread as finished, even if it panics.
struct Finish<'a> {
    shared: &'a Shared,
    barrier: bool,
}

impl Drop for Finish<'_> {
    fn drop(&mut self) {
        self.shared.finish(self.barrier);
    }
}

/// A concurrent task queue.
///
/// Tasks are admitted in the order they are submitted. Ordinary tasks may run
/// concurrently with each other; a _barrier_ task waits for every earlier
/// task to finish and nothing else starts until it is done. Taken together,
/// ordinary tasks behave like readers and barriers like writers of a
/// reader/writer lock that is fair in submission order.
///
/// Synchronous tasks ([`sync`](Self::sync), [`sync_barrier`](Self::sync_barrier))
/// run on the calling thread, which blocks until the task is complete.
/// Asynchronous tasks ([`spawn`](Self::spawn), [`spawn_barrier`](Self::spawn_barrier))
/// return immediately and run later on one of the queue's worker threads.
///
/// Submitting a synchronous task from inside a task of the same queue
/// deadlocks.
///
/// # Examples
///
/// ```
/// use std::sync::atomic::{AtomicUsize, Ordering};
/// use std::sync::Arc;
/// use tsmap::queue::DispatchQueue;
///
/// let queue = DispatchQueue::new();
/// let total = Arc::new(AtomicUsize::new(0));
///
/// for i in 1..=3 {
///     let total = total.clone();
///     queue.spawn_barrier(move || {
///         total.fetch_add(i, Ordering::SeqCst);
///     });
/// }
///
/// // Ordered after the three barriers above.
/// assert_eq!(queue.sync(|| total.load(Ordering::SeqCst)), 6);
/// ```
pub struct DispatchQueue {
    shared: Arc<Shared>,
    workers: Vec<thread::JoinHandle<()>>,
    label: String,
}

impl DispatchQueue {
    /// Creates a queue with the default [`QueueConfig`].
    pub fn new() -> Self {
        Self::with_config(QueueConfig::default())
    }

    /// Creates a queue and starts its worker threads.
    pub fn with_config(config: QueueConfig) -> Self {
        let shared = Arc::new(Shared {
            state: Mutex::new(State::default()),
            changed: Condvar::new(),
        });
        let workers = (0..config.workers)
            .map(|index| {
                let shared = Arc::clone(&shared);
                let label = config.label.clone();
                thread::spawn(move || work(&shared, &label, index))
            })
            .collect();
        debug!(label = %config.label, workers = config.workers, "dispatch queue started");
        Self {
            shared,
            workers,
            label: config.label,
        }
    }

    /// Runs `f` on the calling thread, concurrently with other non-barrier
    /// tasks, once every earlier task has started and no barrier is running.
    pub fn sync<R>(&self, f: impl FnOnce() -> R) -> R {
        self.run_on_caller(false, f)
    }

    /// Runs `f` on the calling thread, with no other task running, once every
    /// earlier task has finished.
    pub fn sync_barrier<R>(&self, f: impl FnOnce() -> R) -> R {
        self.run_on_caller(true, f)
    }

    /// Submits `f` to run on a worker thread, concurrently with other
    /// non-barrier tasks.
    pub fn spawn(&self, f: impl FnOnce() + Send + 'static) {
        self.submit(false, Box::new(f))
    }

    /// Submits `f` to run on a worker thread as a barrier.
    pub fn spawn_barrier(&self, f: impl FnOnce() + Send + 'static) {
        self.submit(true, Box::new(f))
    }

    /// Returns the number of asynchronous tasks that have not started yet.
    pub fn pending(&self) -> usize {
        self.shared.state.lock().unwrap().jobs.len()
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    fn run_on_caller<R>(&self, barrier: bool, f: impl FnOnce() -> R) -> R {
        let mut state = self.shared.state.lock().unwrap();
        let ticket = state.take_ticket();
        while !state.can_start(ticket, barrier) {
            state = self.shared.changed.wait(state).unwrap();
        }
        state.start(barrier);
        drop(state);
        self.shared.changed.notify_all();

        let _finish = Finish {
            shared: &self.shared,
            barrier,
        };
        f()
    }

    fn submit(&self, barrier: bool, task: Task) {
        let mut state = self.shared.state.lock().unwrap();
        let ticket = state.take_ticket();
        state.jobs.push_back(Job {
            ticket,
            barrier,
            task,
        });
        drop(state);
        self.shared.changed.notify_all();
    }
}

/// The loop run by each worker thread.
///
/// Workers exit once the queue is shut down and no jobs remain, so every
/// submitted task runs before the queue is gone.
fn work(shared: &Shared, label: &str, index: usize) {
    trace!(label, index, "worker started");
    let mut state = shared.state.lock().unwrap();
    loop {
        if let Some(job) = state.next_ready_job() {
            state.start(job.barrier);
            drop(state);
            shared.changed.notify_all();

            let outcome = catch_unwind(AssertUnwindSafe(job.task));

            state = shared.state.lock().unwrap();
            state.finish(job.barrier);
            if outcome.is_err() {
                state.panicked += 1;
            }
            shared.changed.notify_all();
            continue;
        }
        if state.shutdown && state.jobs.is_empty() {
            break;
        }
        state = shared.changed.wait(state).unwrap();
    }
    trace!(label, index, "worker exited");
}

impl Default for DispatchQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for DispatchQueue {
    /// Runs every pending task, then stops the worker threads.
    ///
    /// # Panics
    ///
    /// Panics if any asynchronous task panicked.
    fn drop(&mut self) {
        self.shared.state.lock().unwrap().shutdown = true;
        self.shared.changed.notify_all();
        for worker in self.workers.drain(..) {
            // Task panics are caught inside the worker loop.
            let _ = worker.join();
        }

        let state = self.shared.state.lock().unwrap();
        let (tasks, panicked) = (state.next_ticket, state.panicked);
        drop(state);
        debug!(label = %self.label, tasks, panicked, "dispatch queue stopped");

        if panicked > 0 && !std::thread::panicking() {
            panic!(
                "{} asynchronous task(s) on dispatch queue `{}` panicked",
                panicked, self.label
            );
        }
    }
}

impl fmt::Debug for DispatchQueue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DispatchQueue")
            .field("label", &self.label)
            .field("workers", &self.workers.len())
            .finish_non_exhaustive()
    }
}
