//! # Thread Guard
//!
//! Move-only owner of a spawned thread. The thread is joined when the guard
//! is dropped, so a scope cannot exit while its worker is still running.

use std::any::Any;
use std::io;
use std::thread::{self, JoinHandle};
use tracing::warn;

/// Joins the wrapped thread on drop.
///
/// Not `Clone`; moving the guard moves the join obligation with it.
#[derive(Debug)]
pub struct ThreadGuard<T = ()> {
    handle: Option<JoinHandle<T>>,
}

impl<T> ThreadGuard<T> {
    /// Take ownership of an already spawned thread.
    #[must_use]
    pub fn new(handle: JoinHandle<T>) -> Self {
        Self {
            handle: Some(handle),
        }
    }

    /// Whether the thread has finished running.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.handle.as_ref().map_or(true, JoinHandle::is_finished)
    }

    /// Name of the guarded thread, if it has one.
    #[must_use]
    pub fn thread_name(&self) -> Option<&str> {
        self.handle.as_ref().and_then(|handle| handle.thread().name())
    }

    /// Wait for the thread and return its result.
    ///
    /// # Errors
    ///
    /// Returns the panic payload if the thread panicked.
    pub fn join(mut self) -> thread::Result<T> {
        match self.handle.take() {
            Some(handle) => handle.join(),
            None => Err(Box::new("thread already joined") as Box<dyn Any + Send>),
        }
    }
}

impl<T: Send + 'static> ThreadGuard<T> {
    /// Spawn `f` on a new thread and guard it.
    pub fn spawn<F>(f: F) -> Self
    where
        F: FnOnce() -> T + Send + 'static,
    {
        Self::new(thread::spawn(f))
    }

    /// Spawn `f` on a new named thread and guard it.
    ///
    /// # Errors
    ///
    /// Returns the OS error if the thread could not be created.
    pub fn spawn_named<F>(name: impl Into<String>, f: F) -> io::Result<Self>
    where
        F: FnOnce() -> T + Send + 'static,
    {
        thread::Builder::new().name(name.into()).spawn(f).map(Self::new)
    }
}

impl<T> From<JoinHandle<T>> for ThreadGuard<T> {
    fn from(handle: JoinHandle<T>) -> Self {
        Self::new(handle)
    }
}

impl<T> Drop for ThreadGuard<T> {
    fn drop(&mut self) {
        let Some(handle) = self.handle.take() else {
            return;
        };
        let name = handle.thread().name().map(str::to_owned);
        if handle.join().is_err() {
            warn!(thread = ?name, "Guarded thread panicked");
        }
    }
}
