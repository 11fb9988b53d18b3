//! Sinks for the errors discovered while resolving constraints.
//!
//! Resolution outcomes are values; the resolver only pushes the ones that
//! must be reported exactly once (structural errors of a constraint kind)
//! into a [`Handler`]. Which handler is used is the host's decision.

use std::sync::atomic::{AtomicUsize, Ordering};

use parking_lot::{RwLock, RwLockReadGuard};

/// Represents a trait responsible for receiving errors discovered by the
/// resolver.
pub trait Handler<T>: Send + Sync {
    /// Receives an error and handles it.
    fn receive(&self, error: T);
}

/// Implements [`Handler`] by storing all errors in a vector.
#[derive(Debug)]
pub struct Storage<T: Send + Sync> {
    errors: RwLock<Vec<T>>,
}

impl<T: Send + Sync> Storage<T> {
    /// Creates a new empty [`Storage`]
    #[must_use]
    pub const fn new() -> Self { Self { errors: RwLock::new(Vec::new()) } }

    /// Consumes the [`Storage`] and returns the underlying vector of errors.
    pub fn into_vec(self) -> Vec<T> { self.errors.into_inner() }

    /// Returns a reference to the underlying vector of errors.
    pub fn as_vec(&self) -> RwLockReadGuard<Vec<T>> { self.errors.read() }
}

impl<T: Send + Sync> Default for Storage<T> {
    fn default() -> Self { Self::new() }
}

impl<T: Send + Sync, U> Handler<U> for Storage<T>
where
    U: Into<T>,
{
    fn receive(&self, error: U) { self.errors.write().push(error.into()); }
}

/// Implements [`Handler`] by counting the number of errors received.
#[derive(Debug, Default)]
pub struct Counter {
    counter: AtomicUsize,
}

impl Counter {
    /// Returns the number of errors received.
    #[must_use]
    pub fn count(&self) -> usize { self.counter.load(Ordering::Relaxed) }
}

impl<T> Handler<T> for Counter {
    fn receive(&self, _error: T) {
        self.counter.fetch_add(1, Ordering::Relaxed);
    }
}

#[cfg(test)]
mod test;
