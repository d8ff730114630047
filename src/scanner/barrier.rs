//! Counted completion barrier.
//!
//! A [`CompletionBarrier`] is a counter-with-wait: workers register before
//! they start, deregister when they finish, and a single waiter blocks until
//! the count returns to zero. The scan uses two independent barriers, one for
//! outstanding traversal work and one for the detector.
//!
//! Registration and deregistration may happen on different threads, which is
//! why the traversal pool registers a directory when it is queued and
//! deregisters it from whichever worker processed it.

use std::sync::{Arc, Condvar, Mutex, PoisonError};
use std::time::Duration;

/// Counter-with-wait primitive.
#[derive(Debug, Default)]
pub struct CompletionBarrier {
    count: Mutex<usize>,
    zero: Condvar,
}

impl CompletionBarrier {
    /// Create a barrier with no registered workers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `n` units of work.
    pub fn add(&self, n: usize) {
        let mut count = self.count.lock().unwrap_or_else(PoisonError::into_inner);
        *count += n;
    }

    /// Deregister one unit of work, waking the waiter when the count hits zero.
    pub fn done(&self) {
        let mut count = self.count.lock().unwrap_or_else(PoisonError::into_inner);
        match count.checked_sub(1) {
            Some(remaining) => *count = remaining,
            None => {
                log::error!("Completion barrier deregistered more times than registered");
                return;
            }
        }
        if *count == 0 {
            self.zero.notify_all();
        }
    }

    /// Block until every registered unit has deregistered.
    ///
    /// Returns immediately if nothing is registered.
    pub fn wait(&self) {
        let count = self.count.lock().unwrap_or_else(PoisonError::into_inner);
        let _count = self
            .zero
            .wait_while(count, |c| *c > 0)
            .unwrap_or_else(PoisonError::into_inner);
    }

    /// Block until the count reaches zero or the timeout elapses.
    ///
    /// Returns `true` if the barrier reached zero.
    pub fn wait_timeout(&self, timeout: Duration) -> bool {
        let count = self.count.lock().unwrap_or_else(PoisonError::into_inner);
        let (count, _) = self
            .zero
            .wait_timeout_while(count, timeout, |c| *c > 0)
            .unwrap_or_else(PoisonError::into_inner);
        *count == 0
    }

    /// Current number of registered units.
    #[must_use]
    pub fn count(&self) -> usize {
        *self.count.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Register one unit and return a guard that deregisters it on drop.
    #[must_use]
    pub fn register(this: &Arc<Self>) -> BarrierGuard {
        this.add(1);
        BarrierGuard::adopt(Arc::clone(this))
    }
}

/// RAII guard for one registered unit of work.
///
/// Deregisters on drop, including during unwinding, so a panicking worker
/// cannot leave the waiter blocked forever.
#[derive(Debug)]
pub struct BarrierGuard {
    barrier: Arc<CompletionBarrier>,
}

impl BarrierGuard {
    /// Take ownership of a unit that was already registered with `add`.
    #[must_use]
    pub fn adopt(barrier: Arc<CompletionBarrier>) -> Self {
        Self { barrier }
    }
}

impl Drop for BarrierGuard {
    fn drop(&mut self) {
        self.barrier.done();
    }
}
