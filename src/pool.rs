//! Per-instance pool of reusable buffers.
//!
//! [`BufferPool::acquire`] hands out a [`Pooled`] guard holding a buffer that
//! has already been reset. Dropping the guard returns the buffer to the pool,
//! so release happens on every exit path, including `?` returns and panics.

use std::fmt;
use std::ops::{Deref, DerefMut};

use parking_lot::Mutex;

/// Default number of idle buffers retained by a pool.
pub const DEFAULT_MAX_IDLE: usize = 16;

/// Types that can be cleared and handed out again.
pub trait Reusable: Default + Send {
    /// Discard previous contents while keeping allocated capacity.
    fn reset(&mut self);
}

impl Reusable for Vec<u8> {
    fn reset(&mut self) {
        self.clear();
    }
}

pub struct BufferPool<T> {
    idle: Mutex<Vec<T>>,
    max_idle: usize,
}

impl<T: Reusable> BufferPool<T> {
    pub fn new() -> Self {
        Self::with_max_idle(DEFAULT_MAX_IDLE)
    }

    /// Create a pool keeping at most `max_idle` buffers between uses.
    pub fn with_max_idle(max_idle: usize) -> Self {
        Self {
            idle: Mutex::new(Vec::new()),
            max_idle,
        }
    }

    /// Take an idle buffer, or allocate one, and reset it.
    pub fn acquire(&self) -> Pooled<'_, T> {
        let mut item = self.idle.lock().pop().unwrap_or_default();
        item.reset();
        Pooled { pool: self, item }
    }

    /// Number of buffers waiting for reuse.
    pub fn idle(&self) -> usize {
        self.idle.lock().len()
    }

    fn release(&self, item: T) {
        let mut idle = self.idle.lock();
        if idle.len() < self.max_idle {
            idle.push(item);
        }
    }
}

impl<T: Reusable> Default for BufferPool<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for BufferPool<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BufferPool")
            .field("idle", &self.idle.lock().len())
            .field("max_idle", &self.max_idle)
            .finish()
    }
}

/// Exclusive handle to a pooled buffer.
pub struct Pooled<'a, T: Reusable> {
    pool: &'a BufferPool<T>,
    item: T,
}

impl<T: Reusable> Deref for Pooled<'_, T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.item
    }
}

impl<T: Reusable> DerefMut for Pooled<'_, T> {
    fn deref_mut(&mut self) -> &mut T {
        &mut self.item
    }
}

impl<T: Reusable> Drop for Pooled<'_, T> {
    fn drop(&mut self) {
        self.pool.release(std::mem::take(&mut self.item));
    }
}
