//! Bounded ring buffer with a compile-time overflow policy.
//!
//! Same physical layout as the [`spsc`](crate::spsc) queue (one array,
//! one tail, one head), generalized by what a push does against a full
//! buffer:
//!
//! - [`Reject`]: the push fails and returns the value, no mutation.
//! - [`Overwrite`]: the push evicts the oldest unread element to make room
//!   for the newest. Lossy: the newest data stays fresh at the cost of
//!   the oldest, the right trade for latest-price style feeds.
//!
//! # Design
//!
//! Under [`Overwrite`] the producer may advance head to reclaim a slot, so
//! head is no longer owned by a single thread. Both the reclaim in
//! [`push`](RingBuffer::push) and the advance in [`pop`](RingBuffer::pop)
//! go through compare-and-swap, release on success and acquire on the
//! failed observation. ABA cannot arise: indices only move forward modulo
//! capacity and slots are reused, never freed.
//!
//! Operations take `&self`; share the buffer across threads with an `Arc`
//! or a scope.
//!
//! # Example
//!
//! ```
//! use tickflow::ring::{Overwrite, RingBuffer};
//!
//! let rb = RingBuffer::<u64, 4, Overwrite>::new();
//!
//! rb.push(1).unwrap();
//! rb.push(2).unwrap();
//! rb.push(3).unwrap();
//!
//! // Full: the oldest element is evicted to admit the newest.
//! rb.push(4).unwrap();
//!
//! assert_eq!(rb.pop(), Some(2));
//! ```
//!
//! # Compile-Time Enforcement
//!
//! Non-power-of-2 capacities will fail to compile:
//! ```compile_fail
//! use tickflow::ring::RingBuffer;
//! let rb = RingBuffer::<u64, 24>::new(); // ERROR: 24 is not a power of 2
//! ```

use std::cell::UnsafeCell;
use std::fmt;
use std::marker::PhantomData;
use std::mem::MaybeUninit;

use crossbeam_utils::CachePadded;

use crate::Full;
use crate::sync::{AtomicUsize, Ordering};

mod sealed {
    pub trait Sealed {}
    impl Sealed for super::Reject {}
    impl Sealed for super::Overwrite {}
}

/// Behavior of [`RingBuffer::push`] against a full buffer.
///
/// Selected at compile time through the buffer's third type parameter, so
/// the policy branch folds away. The set of policies is closed.
pub trait OverflowPolicy: sealed::Sealed {
    /// Whether a full push evicts the oldest element instead of failing.
    const OVERWRITE: bool;
}

/// Fail the push and hand the value back.
pub enum Reject {}

/// Evict the oldest unread element to make room for the newest.
///
/// Pushes under this policy never fail, but the oldest entries may be
/// silently discarded under overflow: at-most-once delivery for them,
/// FIFO order preserved among the retained.
pub enum Overwrite {}

impl OverflowPolicy for Reject {
    const OVERWRITE: bool = false;
}

impl OverflowPolicy for Overwrite {
    const OVERWRITE: bool = true;
}

/// A fixed-capacity lock-free ring buffer with overflow policy `P`.
///
/// `N` must be a power of 2 (enforced at compile time). One slot is
/// reserved to distinguish full from empty, so the buffer holds at most
/// `N - 1` elements. `T: Copy` keeps elements trivially movable: values
/// are copied in on push and copied out on pop, and no slot is ever
/// dropped.
///
/// The policy defaults to [`Reject`].
#[repr(C)]
pub struct RingBuffer<T, const N: usize, P = Reject> {
    /// Storage. Slot `i` is initialized only while `i` lies in
    /// `[head, tail)` circularly; under `Overwrite` a reclaimed slot may
    /// be rewritten while a stale reader still holds its copy.
    buffer: CachePadded<[UnsafeCell<MaybeUninit<T>>; N]>,
    /// Next slot to write. Advanced only by the producer side.
    tail: CachePadded<AtomicUsize>,
    /// Next slot to read. Advanced by pop, and by push when reclaiming.
    head: CachePadded<AtomicUsize>,
    _policy: PhantomData<P>,
}

// Safety: all cross-thread coordination goes through the atomic indices;
// `T: Copy` means slots never need dropping, so a racy speculative copy of
// a reclaimed slot is discarded without side effects.
unsafe impl<T: Copy + Send, const N: usize, P> Send for RingBuffer<T, N, P> {}
unsafe impl<T: Copy + Send, const N: usize, P> Sync for RingBuffer<T, N, P> {}

impl<T: Copy, const N: usize, P: OverflowPolicy> RingBuffer<T, N, P> {
    /// Mask for index wrapping. Compile-time constant.
    const MASK: usize = N - 1;

    /// Compile-time assertion that N is a power of 2.
    const _ASSERT_POW2: () = assert!(N > 0 && (N & (N - 1)) == 0, "N must be a power of 2");

    /// Creates an empty ring buffer.
    #[must_use]
    pub fn new() -> Self {
        // Force the compile-time assertion to be evaluated
        let _ = Self::_ASSERT_POW2;

        Self {
            // Safety: an array of `UnsafeCell<MaybeUninit<T>>` does not
            // require initialization.
            buffer: CachePadded::new(unsafe {
                MaybeUninit::<[UnsafeCell<MaybeUninit<T>>; N]>::uninit().assume_init()
            }),
            tail: CachePadded::new(AtomicUsize::new(0)),
            head: CachePadded::new(AtomicUsize::new(0)),
            _policy: PhantomData,
        }
    }

    #[inline]
    fn slot(&self, index: usize) -> *mut MaybeUninit<T> {
        self.buffer[index].get()
    }

    /// Attempts to push a value into the buffer.
    ///
    /// Under [`Reject`], returns `Err(Full(value))` if the buffer is full,
    /// with no mutation. Under [`Overwrite`], always returns `Ok(())`: a
    /// full buffer reclaims its oldest unread slot first, discarding that
    /// element.
    ///
    /// # Example
    ///
    /// ```
    /// use tickflow::ring::RingBuffer;
    ///
    /// let rb = RingBuffer::<u32, 4>::new();
    ///
    /// rb.push(1).unwrap();
    /// rb.push(2).unwrap();
    /// rb.push(3).unwrap();
    ///
    /// // Full under the default Reject policy (one slot reserved)
    /// assert!(rb.push(4).is_err());
    /// ```
    #[inline]
    pub fn push(&self, value: T) -> Result<(), Full<T>> {
        let tail = self.tail.load(Ordering::Relaxed);
        let next_tail = (tail + 1) & Self::MASK;
        let mut head = self.head.load(Ordering::Acquire);

        if next_tail == head {
            if !P::OVERWRITE {
                return Err(Full(value));
            }

            // Reclaim the oldest unread slot. Pop also advances head, so
            // the advance must be a CAS; a failed attempt re-checks whether
            // the other party already freed a slot before retrying.
            let mut next_head = (head + 1) & Self::MASK;
            while let Err(current) =
                self.head
                    .compare_exchange(head, next_head, Ordering::Release, Ordering::Acquire)
            {
                head = current;
                if next_tail != head {
                    break;
                }
                next_head = (head + 1) & Self::MASK;
            }
        }

        unsafe { (*self.slot(tail)).write(value) };
        // Publishes the payload write above to the consumer.
        self.tail.store(next_tail, Ordering::Release);
        Ok(())
    }

    /// Attempts to pop the oldest value from the buffer.
    ///
    /// Returns `None` if the buffer is empty. Head is contended under
    /// [`Overwrite`], so the advance is a CAS; a failed attempt means the
    /// producer reclaimed the slot first, and the pop retries from the
    /// next oldest element.
    ///
    /// # Example
    ///
    /// ```
    /// use tickflow::ring::RingBuffer;
    ///
    /// let rb = RingBuffer::<u32, 8>::new();
    ///
    /// assert_eq!(rb.pop(), None);
    ///
    /// rb.push(42).unwrap();
    /// assert_eq!(rb.pop(), Some(42));
    /// ```
    #[inline]
    pub fn pop(&self) -> Option<T> {
        let mut head = self.head.load(Ordering::Acquire);

        loop {
            if head == self.tail.load(Ordering::Acquire) {
                return None;
            }

            // Speculative copy; the CAS below confirms the slot was still
            // ours. On failure the copy is discarded and the loop restarts
            // from the empty check.
            let value = unsafe { (*self.slot(head)).assume_init_read() };
            let next_head = (head + 1) & Self::MASK;

            match self
                .head
                .compare_exchange(head, next_head, Ordering::Release, Ordering::Acquire)
            {
                Ok(_) => return Some(value),
                Err(current) => head = current,
            }
        }
    }

    /// Returns the oldest value without removing it.
    ///
    /// Advisory under concurrency; intended for single-threaded or
    /// externally-synchronized inspection.
    ///
    /// # Panics
    ///
    /// Panics if the buffer is empty.
    #[inline]
    #[must_use]
    pub fn front(&self) -> T {
        assert!(!self.is_empty(), "front on empty ring buffer");
        let head = self.head.load(Ordering::Relaxed);
        unsafe { (*self.slot(head)).assume_init_read() }
    }

    /// Returns the capacity of the ring buffer.
    ///
    /// The buffer holds at most `capacity() - 1` elements.
    #[inline]
    #[must_use]
    pub const fn capacity(&self) -> usize {
        N
    }

    /// Returns the number of elements currently in the buffer.
    ///
    /// Snapshot only; may be stale under concurrent mutation, but always
    /// internally consistent: the masked wrapping subtraction keeps the
    /// result within `[0, N - 1]`.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        let tail = self.tail.load(Ordering::Relaxed);
        let head = self.head.load(Ordering::Relaxed);
        tail.wrapping_sub(head) & Self::MASK
    }

    /// Returns `true` if the buffer is empty.
    ///
    /// Advisory only, never a substitute for checking `pop`'s return.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        let head = self.head.load(Ordering::Relaxed);
        let tail = self.tail.load(Ordering::Relaxed);
        head == tail
    }
}

impl<T: Copy, const N: usize, P: OverflowPolicy> Default for RingBuffer<T, N, P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Copy, const N: usize, P: OverflowPolicy> fmt::Debug for RingBuffer<T, N, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RingBuffer")
            .field("capacity", &self.capacity())
            .field("len", &self.len())
            .finish_non_exhaustive()
    }
}
