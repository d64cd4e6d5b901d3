//! Mutual exclusion backends
//!
//! The engine treats the whole address space as a single exclusive resource
//! while storing. What actually provides that exclusion (a process-local
//! mutex, an advisory file lock, a remote lock service) sits behind
//! [`LockBackend`]; the engine's own contribution is the poll-then-acquire
//! protocol in `StorageEngine::store`.

use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::{Condvar, Mutex};

use crate::error::{Result, StoreError};

/// An exclusive lock over the whole address space
pub trait LockBackend: Send + Sync {
    /// Externally observable lock status, polled by waiters
    fn is_locked(&self) -> bool;

    /// Block until the lock is held, for at most `timeout`
    fn acquire(&self, timeout: Duration) -> Result<()>;

    /// Release a held lock
    fn release(&self);
}

impl<L: LockBackend + ?Sized> LockBackend for Arc<L> {
    fn is_locked(&self) -> bool {
        (**self).is_locked()
    }

    fn acquire(&self, timeout: Duration) -> Result<()> {
        (**self).acquire(timeout)
    }

    fn release(&self) {
        (**self).release()
    }
}

/// Process-local lock backend
///
/// A flag guarded by a parking_lot mutex, with a condvar to wake blocked
/// acquirers on release. No fairness: whoever wakes first wins.
pub struct LocalLock {
    held: Mutex<bool>,
    released: Condvar,
}

impl LocalLock {
    pub fn new() -> Self {
        Self {
            held: Mutex::new(false),
            released: Condvar::new(),
        }
    }
}

impl Default for LocalLock {
    fn default() -> Self {
        Self::new()
    }
}

impl LockBackend for LocalLock {
    fn is_locked(&self) -> bool {
        *self.held.lock()
    }

    fn acquire(&self, timeout: Duration) -> Result<()> {
        let deadline = Instant::now() + timeout;
        let mut held = self.held.lock();
        while *held {
            if self.released.wait_until(&mut held, deadline).timed_out() {
                return Err(StoreError::LockTimeout {
                    timeout_ms: timeout.as_millis() as u64,
                });
            }
        }
        *held = true;
        Ok(())
    }

    fn release(&self) {
        let mut held = self.held.lock();
        *held = false;
        self.released.notify_one();
    }
}
