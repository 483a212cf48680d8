//! Single-producer single-consumer (SPSC) lock-free queue.
//!
//! This is the fastest variant: each index is owned by exactly one thread,
//! so the hot path needs no compare-and-swap: one acquire load to admit
//! the operation and one release store to publish it.
//!
//! # Example
//!
//! ```
//! use tickflow::spsc;
//!
//! let (mut tx, mut rx) = spsc::RingBuffer::<u64, 8>::new();
//!
//! tx.push(1).unwrap();
//! tx.push(2).unwrap();
//!
//! assert_eq!(rx.pop(), Some(1));
//! assert_eq!(rx.pop(), Some(2));
//! ```
//!
//! # Compile-Time Enforcement
//!
//! Non-power-of-2 capacities will fail to compile:
//! ```compile_fail
//! use tickflow::spsc::RingBuffer;
//! let (tx, rx) = RingBuffer::<u64, 100>::new(); // ERROR: 100 is not a power of 2
//! ```
//!
//! # Memory Layout
//!
//! The buffer array, tail, head, and drop counter each live on their own
//! cache line. Producer and consumer write to disjoint lines, so neither
//! invalidates the other's cache on the hot path.
//!
//! # Overflow Accounting
//!
//! A push against a full queue is a normal, counted condition: it returns
//! [`Full`] and increments a drop counter readable from either endpoint.
//! The queue never blocks; callers poll or back off externally.

use std::cell::UnsafeCell;
use std::fmt;
use std::mem::MaybeUninit;
use std::sync::Arc;

use crossbeam_utils::CachePadded;

use crate::Full;
use crate::sync::{AtomicUsize, Ordering};

/// A fixed-capacity SPSC ring buffer.
///
/// `N` must be a power of 2 (enforced at compile time). One slot is
/// reserved to distinguish full from empty, so the queue holds at most
/// `N - 1` elements.
///
/// Construction returns a [`Producer`]/[`Consumer`] pair; exactly one
/// thread may hold each. `T: Copy` keeps elements trivially movable:
/// values are copied in on push and copied out on pop, and no slot is
/// ever dropped.
#[repr(C)]
pub struct RingBuffer<T, const N: usize> {
    /// Storage. Slot `i` is initialized only while `i` lies in
    /// `[head, tail)` circularly.
    buffer: CachePadded<[UnsafeCell<MaybeUninit<T>>; N]>,
    /// Next slot to write. Advanced only by the producer.
    tail: CachePadded<AtomicUsize>,
    /// Next slot to read. Advanced only by the consumer.
    head: CachePadded<AtomicUsize>,
    /// Pushes rejected because the queue was full.
    dropped: CachePadded<AtomicUsize>,
}

// Safety: the index protocol guarantees producer and consumer never touch
// the same slot concurrently, and `T: Copy` means slots never need dropping.
unsafe impl<T: Copy + Send, const N: usize> Send for RingBuffer<T, N> {}
unsafe impl<T: Copy + Send, const N: usize> Sync for RingBuffer<T, N> {}

impl<T: Copy, const N: usize> RingBuffer<T, N> {
    /// Compile-time assertion that N is a power of 2.
    const _ASSERT_POW2: () = assert!(N > 0 && (N & (N - 1)) == 0, "N must be a power of 2");

    /// Creates a new ring buffer, returning `(Producer, Consumer)`.
    #[must_use]
    pub fn new() -> (Producer<T, N>, Consumer<T, N>) {
        // Force the compile-time assertion to be evaluated
        let _ = Self::_ASSERT_POW2;

        let rb = Arc::new(Self {
            // Safety: an array of `UnsafeCell<MaybeUninit<T>>` does not
            // require initialization.
            buffer: CachePadded::new(unsafe {
                MaybeUninit::<[UnsafeCell<MaybeUninit<T>>; N]>::uninit().assume_init()
            }),
            tail: CachePadded::new(AtomicUsize::new(0)),
            head: CachePadded::new(AtomicUsize::new(0)),
            dropped: CachePadded::new(AtomicUsize::new(0)),
        });

        (Producer { rb: Arc::clone(&rb) }, Consumer { rb })
    }

    #[inline]
    fn slot(&self, index: usize) -> *mut MaybeUninit<T> {
        self.buffer[index].get()
    }
}

/// The producer half of an SPSC ring buffer.
///
/// Use [`push`](Producer::push) to add elements. Takes `&mut self` to
/// statically ensure single-producer access; the handle can be sent to
/// another thread.
pub struct Producer<T, const N: usize> {
    rb: Arc<RingBuffer<T, N>>,
}

impl<T: Copy, const N: usize> Producer<T, N> {
    /// Mask for index wrapping. Compile-time constant.
    const MASK: usize = N - 1;

    /// Attempts to push a value into the queue.
    ///
    /// Returns `Err(Full(value))` if the queue is full, giving the value
    /// back to the caller and incrementing the drop counter. The rejected
    /// push does not touch storage.
    ///
    /// # Example
    ///
    /// ```
    /// use tickflow::spsc;
    ///
    /// let (mut tx, mut rx) = spsc::RingBuffer::<u32, 4>::new();
    ///
    /// assert!(tx.push(1).is_ok());
    /// assert!(tx.push(2).is_ok());
    /// assert!(tx.push(3).is_ok());
    ///
    /// // Queue is full (one slot reserved)
    /// assert!(tx.push(4).is_err());
    /// assert_eq!(tx.drop_count(), 1);
    /// ```
    #[inline]
    pub fn push(&mut self, value: T) -> Result<(), Full<T>> {
        let rb = &*self.rb;
        let tail = rb.tail.load(Ordering::Relaxed);
        let next_tail = (tail + 1) & Self::MASK;

        // head is owned by the consumer; acquire pairs with its release
        // store in `pop`, so the slot being reused is truly consumed.
        if next_tail == rb.head.load(Ordering::Acquire) {
            rb.dropped.fetch_add(1, Ordering::Relaxed);
            return Err(Full(value));
        }

        unsafe { (*rb.slot(tail)).write(value) };
        // Publishes the payload write above to the consumer.
        rb.tail.store(next_tail, Ordering::Release);
        Ok(())
    }

    /// Returns the capacity of the ring buffer.
    ///
    /// The queue holds at most `capacity() - 1` elements.
    #[inline]
    #[must_use]
    pub const fn capacity(&self) -> usize {
        N
    }

    /// Returns the number of elements currently in the queue.
    ///
    /// Snapshot only; may be stale the instant it returns.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        let tail = self.rb.tail.load(Ordering::Relaxed);
        let head = self.rb.head.load(Ordering::Relaxed);
        tail.wrapping_sub(head) & Self::MASK
    }

    /// Returns `true` if the queue is empty.
    ///
    /// Advisory only, never a substitute for checking `pop`'s return.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the cumulative number of rejected pushes.
    ///
    /// Monotonically non-decreasing. Approximate while the producer is
    /// running, exact once it has quiesced.
    #[inline]
    #[must_use]
    pub fn drop_count(&self) -> usize {
        self.rb.dropped.load(Ordering::Relaxed)
    }

    /// Returns `true` if the consumer has been dropped.
    #[inline]
    #[must_use]
    pub fn is_disconnected(&self) -> bool {
        Arc::strong_count(&self.rb) == 1
    }
}

impl<T: Copy, const N: usize> fmt::Debug for Producer<T, N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Producer")
            .field("capacity", &self.capacity())
            .field("len", &self.len())
            .finish_non_exhaustive()
    }
}

/// The consumer half of an SPSC ring buffer.
///
/// Use [`pop`](Consumer::pop) to remove elements. Takes `&mut self` to
/// statically ensure single-consumer access; the handle can be sent to
/// another thread.
pub struct Consumer<T, const N: usize> {
    rb: Arc<RingBuffer<T, N>>,
}

impl<T: Copy, const N: usize> Consumer<T, N> {
    /// Mask for index wrapping. Compile-time constant.
    const MASK: usize = N - 1;

    /// Attempts to pop a value from the queue.
    ///
    /// Returns `None` if the queue is empty. Values arrive in FIFO order,
    /// exactly once.
    ///
    /// # Example
    ///
    /// ```
    /// use tickflow::spsc;
    ///
    /// let (mut tx, mut rx) = spsc::RingBuffer::<u32, 8>::new();
    ///
    /// assert_eq!(rx.pop(), None);
    ///
    /// tx.push(42).unwrap();
    /// assert_eq!(rx.pop(), Some(42));
    /// ```
    #[inline]
    pub fn pop(&mut self) -> Option<T> {
        let rb = &*self.rb;
        let head = rb.head.load(Ordering::Relaxed);

        // tail is owned by the producer; acquire pairs with its release
        // store in `push`, so the payload is fully written before we copy.
        if head == rb.tail.load(Ordering::Acquire) {
            return None;
        }

        let value = unsafe { (*rb.slot(head)).assume_init_read() };
        // Hands the slot back to the producer.
        rb.head.store((head + 1) & Self::MASK, Ordering::Release);
        Some(value)
    }

    /// Returns the capacity of the ring buffer.
    ///
    /// The queue holds at most `capacity() - 1` elements.
    #[inline]
    #[must_use]
    pub const fn capacity(&self) -> usize {
        N
    }

    /// Returns the number of elements currently in the queue.
    ///
    /// Snapshot only; may be stale the instant it returns.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        let tail = self.rb.tail.load(Ordering::Relaxed);
        let head = self.rb.head.load(Ordering::Relaxed);
        tail.wrapping_sub(head) & Self::MASK
    }

    /// Returns `true` if the queue is empty.
    ///
    /// Advisory only, never a substitute for checking `pop`'s return.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the cumulative number of rejected pushes.
    ///
    /// Monotonically non-decreasing. Exact once the producer has quiesced.
    #[inline]
    #[must_use]
    pub fn drop_count(&self) -> usize {
        self.rb.dropped.load(Ordering::Relaxed)
    }

    /// Returns `true` if the producer has been dropped.
    #[inline]
    #[must_use]
    pub fn is_disconnected(&self) -> bool {
        Arc::strong_count(&self.rb) == 1
    }
}

impl<T: Copy, const N: usize> fmt::Debug for Consumer<T, N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Consumer")
            .field("capacity", &self.capacity())
            .field("len", &self.len())
            .finish_non_exhaustive()
    }
}
