//! Atomics indirection so `--cfg loom` routes the queues through loom's
//! model-checked primitives while normal builds use the real ones.

#[cfg(loom)]
pub(crate) use loom::sync::atomic::{AtomicUsize, Ordering};

#[cfg(not(loom))]
pub(crate) use std::sync::atomic::{AtomicUsize, Ordering};
