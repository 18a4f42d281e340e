//! Task abstraction for the executor.

use std::sync::Arc;

use super::future::{Future, Promise};

/// A unit of work: either a runnable that produces nothing, or a callable that
/// produces a `T`.
pub enum Task<T> {
    Runnable(Box<dyn FnOnce() + Send + 'static>),
    Callable(Box<dyn FnOnce() -> T + Send + 'static>),
}

impl<T> Task<T> {
    pub fn callable<F>(f: F) -> Self
    where
        F: FnOnce() -> T + Send + 'static,
    {
        Task::Callable(Box::new(f))
    }

    /// Runs the task and returns its value, or `None` for a runnable.
    pub(crate) fn invoke(self) -> Option<T> {
        match self {
            Task::Callable(f) => Some(f()),
            Task::Runnable(f) => {
                f();
                None
            }
        }
    }
}

impl Task<()> {
    pub fn runnable<F>(f: F) -> Self
    where
        F: FnOnce() + Send + 'static,
    {
        Task::Runnable(Box::new(f))
    }
}

/// A queued task, erased over its result type so that a single queue can carry
/// tasks of any kind.
pub(crate) trait Execute: Send {
    fn execute(self: Box<Self>);
}

pub(crate) type BoxedTask = Box<dyn Execute>;

struct FutureTask<T> {
    task: Task<T>,
    promise: Arc<Promise<T>>,
}

impl<T: Send + Sync + 'static> Execute for FutureTask<T> {
    fn execute(self: Box<Self>) {
        let FutureTask { task, promise } = *self;
        promise.complete(task.invoke());
    }
}

/// Pairs `task` with a fresh future.
pub(crate) fn bind_task<T>(task: Task<T>) -> (BoxedTask, Future<T>)
where
    T: Send + Sync + 'static,
{
    let promise = Promise::new();
    let future = Future::new(Arc::clone(&promise));
    (Box::new(FutureTask { task, promise }), future)
}
