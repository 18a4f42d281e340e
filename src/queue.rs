//! Lock-guarded double-ended queue.
//!
//! Every worker owns one [`DeQueue`] as its local queue and the executor keeps one
//! more as the global intake queue. The owner pushes and pops at the bottom, while
//! thieves, balancers and drainers take from the top. Each operation takes the
//! queue's mutex for its whole duration and never touches another queue while
//! holding it.

use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard, PoisonError};

struct Inner<T> {
    items: VecDeque<T>,
    // Set once the owning worker has terminated.
    closed: bool,
}

pub struct DeQueue<T> {
    inner: Mutex<Inner<T>>,
}

impl<T> DeQueue<T> {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Inner {
                items: VecDeque::new(),
                closed: false,
            }),
        }
    }

    // Tasks never run under this lock, so a poisoned guard still holds a
    // consistent queue.
    fn lock(&self) -> MutexGuard<'_, Inner<T>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Appends `item` at the bottom. Always succeeds, even on a closed queue.
    pub fn push_bottom(&self, item: T) {
        self.lock().items.push_back(item);
    }

    /// Appends `item` at the bottom unless the queue has been closed, in which
    /// case the item is handed back.
    pub fn try_push_bottom(&self, item: T) -> Result<(), T> {
        let mut inner = self.lock();
        if inner.closed {
            return Err(item);
        }
        inner.items.push_back(item);
        Ok(())
    }

    /// Removes the bottom (most recently pushed) item.
    pub fn pop_bottom(&self) -> Option<T> {
        self.lock().items.pop_back()
    }

    /// Removes the top (oldest) item.
    pub fn pop_top(&self) -> Option<T> {
        self.lock().items.pop_front()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().items.is_empty()
    }

    pub fn size(&self) -> usize {
        self.lock().items.len()
    }

    /// Closes the queue if it is empty at this instant and reports whether it
    /// did. The check and the close happen under a single lock acquisition.
    pub fn close_if_empty(&self) -> bool {
        let mut inner = self.lock();
        if inner.items.is_empty() {
            inner.closed = true;
        }
        inner.closed
    }

    pub fn is_closed(&self) -> bool {
        self.lock().closed
    }
}

impl<T> Default for DeQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}
