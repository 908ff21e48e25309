//! Synchronization strategies for a key-value map shared between threads.
//!
//! The containers in [`dictionary`] all implement the same
//! [`Dictionary`](dictionary::Dictionary) trait, and differ only in how they
//! protect their map: not at all, with a [`queue::DispatchQueue`] used as a
//! reader/writer lock, or with a [`spin::SpinLock`] whose ownership is given by
//! one of the [`guard`] types.
pub mod dictionary;
pub mod guard;
pub mod queue;
pub mod spin;
pub(crate) mod sync;

mod error;
pub use error::Error;
