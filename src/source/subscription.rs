//! Cancellable subscription handles.
//!
//! Every observer registration in this crate returns a [`Subscription`], a
//! handle owning the matching unregistration. Pairing the two in one value
//! structurally prevents leaked callbacks: cancellation runs exactly once,
//! whether through an explicit [`Subscription::cancel`], a session teardown,
//! or simply dropping the handle.

/// Handle to a live observer registration.
///
/// Holds the closure that unregisters the observer. The closure is consumed on
/// first cancellation; later cancels and the eventual drop are no-ops.
///
/// # Examples
///
/// ```
/// use rolodex::source::Subscription;
/// use std::cell::Cell;
/// use std::rc::Rc;
///
/// let cancelled = Rc::new(Cell::new(0));
/// let counter = cancelled.clone();
/// let mut sub = Subscription::new(move || counter.set(counter.get() + 1));
///
/// sub.cancel();
/// sub.cancel();
/// drop(sub);
/// assert_eq!(cancelled.get(), 1);
/// ```
pub struct Subscription {
    cancel: Option<Box<dyn FnOnce()>>,
}

impl Subscription {
    /// Wraps an unregistration closure into a handle.
    #[must_use]
    pub fn new(cancel: impl FnOnce() + 'static) -> Self {
        Self {
            cancel: Some(Box::new(cancel)),
        }
    }

    /// Unregisters the observer.
    ///
    /// Idempotent: only the first call runs the closure.
    pub fn cancel(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            tracing::debug!("cancelling subscription");
            cancel();
        }
    }

    /// Reports whether the observer is still registered.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.cancel.is_some()
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.cancel();
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.is_active())
            .finish()
    }
}
