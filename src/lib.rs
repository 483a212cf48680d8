//! # tickflow
//!
//! Lock-free ring buffers for passing fixed-size, trivially-copyable values
//! between threads with minimal and predictable latency, the handoff
//! primitive of market-data and other latency-sensitive pipelines.
//!
//! ## Features
//!
//! - **SPSC**: Single-producer single-consumer queue with drop accounting
//!   and no compare-and-swap on any path
//! - **Policy ring**: Bounded ring buffer with a compile-time overflow
//!   policy, either [`Reject`](ring::Reject) or [`Overwrite`](ring::Overwrite)
//!
//! ## Design Goals
//!
//! - Sub-microsecond latency on the hot path
//! - Predictable performance (no blocking, no internal retries beyond the
//!   overwrite reclaim loop)
//! - No allocations after construction
//! - Cache-line isolation of every stateful field to prevent false sharing
//!
//! ## Example
//!
//! ```
//! use tickflow::spsc;
//!
//! // Capacity must be a power of two; one slot is reserved, so a
//! // capacity-1024 queue holds up to 1023 elements.
//! let (mut tx, mut rx) = spsc::RingBuffer::<u64, 1024>::new();
//!
//! tx.push(42).unwrap();
//! assert_eq!(rx.pop(), Some(42));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

use std::fmt;

pub mod ring;
pub mod spsc;

mod sync;

/// Error returned when a push is rejected because the buffer is full.
///
/// Contains the value that could not be pushed, allowing the caller to
/// retry or handle the value differently.
///
/// # Example
///
/// ```
/// use tickflow::spsc;
///
/// let (mut tx, _rx) = spsc::RingBuffer::<u32, 2>::new();
///
/// tx.push(1).unwrap();
///
/// // One slot is reserved, so a capacity-2 queue holds one element.
/// let err = tx.push(2).unwrap_err();
/// assert_eq!(err.into_inner(), 2);
/// ```
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Full<T>(pub T);

impl<T> Full<T> {
    /// Returns the value that could not be pushed.
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T> fmt::Display for Full<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ring buffer is full")
    }
}

impl<T> fmt::Debug for Full<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Full").finish_non_exhaustive()
    }
}

impl<T> std::error::Error for Full<T> {}
