mod filesystem;

pub use filesystem::FileLock;

use crate::errors::ApcError;
use core::time::Duration;
use log::{
    debug,
    error,
};
use std::thread;

/// `SessionLock` is the mutual exclusion backend guarding the single device connection. It is
/// advisory -- it only works if every process talking to the device goes through the same lock.
pub trait SessionLock {
    /// Try to take the lock once, without waiting. Returns `Ok(false)` if somebody else holds it.
    ///
    /// # Errors
    ///
    /// Returns an `ApcError` if the backend itself fails.
    fn try_lock(&mut self) -> Result<bool, ApcError>;

    /// Release a lock previously taken with `try_lock`.
    ///
    /// # Errors
    ///
    /// Returns an `ApcError` if the backend itself fails.
    fn unlock(&mut self) -> Result<(), ApcError>;

    /// Describes the lock for messages, typically its path.
    fn describe(&self) -> String;
}

/// Retry settings for `acquire`.
#[derive(Debug, Clone, Copy)]
pub struct LockArgs {
    /// Number of `try_lock` attempts before giving up.
    pub attempts: u32,
    /// Delay after each failed attempt.
    pub poll_interval: Duration,
}

impl Default for LockArgs {
    fn default() -> Self {
        Self {
            attempts: crate::config::DEFAULT_LOCK_ATTEMPTS,
            poll_interval: Duration::from_millis(crate::config::DEFAULT_LOCK_POLL_INTERVAL_MS),
        }
    }
}

/// Acquire `lock`, retrying once per `poll_interval` for up to `attempts` attempts.
///
/// # Errors
///
/// Returns `ApcError::LockTimeout` if every attempt failed, or whatever error the backend raised.
pub fn acquire(
    mut lock: Box<dyn SessionLock>,
    args: &LockArgs,
) -> Result<LockGuard, ApcError> {
    let attempts = args.attempts.max(1);

    for attempt in 1..=attempts {
        if lock.try_lock()? {
            debug!("acquired lock {} on attempt {}", lock.describe(), attempt);

            return Ok(LockGuard {
                lock,
                released: false,
            });
        }

        debug!(
            "lock {} is held elsewhere, attempt {}/{}",
            lock.describe(),
            attempt,
            attempts
        );

        thread::sleep(args.poll_interval);
    }

    Err(ApcError::LockTimeout {
        path: lock.describe(),
        attempts,
    })
}

/// A held `SessionLock`. The lock is released exactly once -- by `release` or, failing that, when
/// the guard is dropped.
pub struct LockGuard {
    lock: Box<dyn SessionLock>,
    released: bool,
}

impl LockGuard {
    /// Release the lock; calling this more than once is a no-op.
    ///
    /// # Errors
    ///
    /// Returns an `ApcError` if the backend fails to release the lock.
    pub fn release(&mut self) -> Result<(), ApcError> {
        if self.released {
            return Ok(());
        }

        self.released = true;

        debug!("releasing lock {}", self.lock.describe());

        self.lock.unlock()
    }

    /// Indicates if the lock has been released.
    #[must_use]
    pub const fn is_released(&self) -> bool {
        self.released
    }
}

impl Drop for LockGuard {
    fn drop(&mut self) {
        if let Err(err) = self.release() {
            error!("failed releasing lock, error: {err}");
        }
    }
}
