//! Deferred values resolved on demand.

use crate::errors::LateError;
use std::any::Any;
use std::fmt;
use std::sync::Arc;
use tokio::sync::oneshot;

/// A one-shot handle to a value produced asynchronously.
///
/// `join` is the only blocking operation in the crate: it suspends the
/// calling thread until the paired [`LatePromise`] resolves. No timeout or
/// cancellation semantics are defined; callers wanting a deadline wrap the
/// join externally.
///
/// Must not be joined from inside an async runtime thread; use
/// `spawn_blocking` there.
pub struct Late<T> {
    rx: oneshot::Receiver<Result<T, LateError>>,
}

/// The producing side of a [`Late`] value.
pub struct LatePromise<T> {
    tx: oneshot::Sender<Result<T, LateError>>,
}

impl<T: Send + 'static> Late<T> {
    /// Creates a promise/handle pair.
    #[must_use]
    pub fn channel() -> (LatePromise<T>, Late<T>) {
        let (tx, rx) = oneshot::channel();
        (LatePromise { tx }, Late { rx })
    }

    /// Creates an already-resolved handle.
    #[must_use]
    pub fn ready(value: T) -> Self {
        let (promise, late) = Self::channel();
        promise.resolve(value);
        late
    }

    /// Creates an already-failed handle.
    #[must_use]
    pub fn failed(error: impl Into<String>) -> Self {
        let (promise, late) = Self::channel();
        promise.fail(error);
        late
    }

    /// Runs the producer on a background thread and returns the handle.
    #[must_use]
    pub fn spawn<F>(produce: F) -> Self
    where
        F: FnOnce() -> Result<T, LateError> + Send + 'static,
    {
        let (promise, late) = Self::channel();
        std::thread::spawn(move || promise.send(produce()));
        late
    }

    /// Blocks the calling thread until the value resolves.
    ///
    /// # Errors
    ///
    /// Returns the producer's failure, or [`LateError::Abandoned`] if the
    /// promise was dropped unresolved.
    pub fn join(self) -> Result<T, LateError> {
        match self.rx.blocking_recv() {
            Ok(result) => result,
            Err(_) => Err(LateError::Abandoned),
        }
    }
}

impl<T> LatePromise<T> {
    /// Resolves the handle with a value.
    pub fn resolve(self, value: T) {
        self.send(Ok(value));
    }

    /// Fails the handle with a message.
    pub fn fail(self, error: impl Into<String>) {
        self.send(Err(LateError::Failed(error.into())));
    }

    // The joining side may already be gone; that is not our problem.
    fn send(self, result: Result<T, LateError>) {
        let _ = self.tx.send(result);
    }
}

impl<T> fmt::Debug for Late<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Late")
            .field("value_type", &std::any::type_name::<T>())
            .finish()
    }
}

impl<T> fmt::Debug for LatePromise<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LatePromise")
            .field("value_type", &std::any::type_name::<T>())
            .finish()
    }
}

/// Type-erased late entry held in a storage slot.
pub(crate) trait LateSlot: Send + Sync {
    fn join_boxed(self: Box<Self>) -> Result<Arc<dyn Any + Send + Sync>, LateError>;
}

impl<T: Send + Sync + 'static> LateSlot for Late<T> {
    fn join_boxed(self: Box<Self>) -> Result<Arc<dyn Any + Send + Sync>, LateError> {
        Ok(Arc::new((*self).join()?))
    }
}
