//! One-shot result handles.
//!
//! A [`Future`] is written exactly once by the worker that runs its task and can then
//! be read any number of times. Waiting callers park on a condition variable rather
//! than draining a channel, so every `get` after completion sees the same value.

use std::sync::{Arc, Condvar, Mutex, OnceLock, PoisonError};

pub(crate) struct Promise<T> {
    value: OnceLock<Option<T>>,
    done: Mutex<bool>,
    ready: Condvar,
}

impl<T> Promise<T> {
    pub(crate) fn new() -> Arc<Self> {
        Arc::new(Self {
            value: OnceLock::new(),
            done: Mutex::new(false),
            ready: Condvar::new(),
        })
    }

    /// Stores the task's outcome and wakes every waiter. Only the first call has an
    /// effect.
    pub(crate) fn complete(&self, value: Option<T>) {
        if self.value.set(value).is_err() {
            return;
        }
        let mut done = self.done.lock().unwrap_or_else(PoisonError::into_inner);
        *done = true;
        self.ready.notify_all();
    }
}

/// The eventual outcome of a submitted task.
///
/// `get` returns `Some(&value)` for a callable task and `None` for a runnable one.
/// Cloning the handle shares the same underlying result.
///
/// If the task panics its future is never completed, and `get` on it blocks forever.
pub struct Future<T> {
    promise: Arc<Promise<T>>,
}

impl<T> Future<T> {
    pub(crate) fn new(promise: Arc<Promise<T>>) -> Self {
        Self { promise }
    }

    /// Blocks until the task has run, then returns its result.
    pub fn get(&self) -> Option<&T> {
        self.wait();
        self.promise.value.get().and_then(Option::as_ref)
    }

    /// Blocks until the task has run.
    pub fn wait(&self) {
        let mut done = self
            .promise
            .done
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        while !*done {
            done = self
                .promise
                .ready
                .wait(done)
                .unwrap_or_else(PoisonError::into_inner);
        }
    }

    /// Returns the result without blocking: `None` while the task is pending,
    /// `Some(None)` for a finished runnable, `Some(Some(&v))` for a finished callable.
    pub fn try_get(&self) -> Option<Option<&T>> {
        self.promise.value.get().map(Option::as_ref)
    }

    pub fn is_done(&self) -> bool {
        self.promise.value.get().is_some()
    }
}

impl<T> Clone for Future<T> {
    fn clone(&self) -> Self {
        Self {
            promise: Arc::clone(&self.promise),
        }
    }
}

impl<T> std::fmt::Debug for Future<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Future")
            .field("done", &self.is_done())
            .finish()
    }
}
