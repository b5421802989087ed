use crate::driver::Driver;
use crate::errors::ApcError;
use crate::lock::{
    acquire,
    LockArgs,
    LockGuard,
    SessionLock,
};
use log::{
    debug,
    error,
};

/// A locked, connected APC session. The lock is taken first and the connection opened second;
/// teardown (logout, close, then lock release) runs exactly once, either from `close` or when the
/// session is dropped -- whichever comes first.
pub struct Session {
    driver: Driver,
    guard: LockGuard,
    torn_down: bool,
}

impl Session {
    /// Acquire `lock` and then open `driver`. If the connection or handshake fails the session is
    /// torn down before the error is returned, so the lock is never left held.
    ///
    /// # Errors
    ///
    /// Returns `ApcError::LockTimeout` (nothing was connected), or whatever opening the driver
    /// raised.
    pub fn open(
        driver: Driver,
        lock: Box<dyn SessionLock>,
        lock_args: &LockArgs,
    ) -> Result<Self, ApcError> {
        driver
            .notifier()
            .info(&format!("Acquiring lock {}", lock.describe()));

        let guard = acquire(lock, lock_args)?;

        let mut session = Self {
            driver,
            guard,
            torn_down: false,
        };

        session.driver.open()?;

        Ok(session)
    }

    /// The connected driver.
    pub fn driver(&mut self) -> &mut Driver {
        &mut self.driver
    }

    /// Tear the session down now, surfacing any teardown error instead of only logging it.
    ///
    /// # Errors
    ///
    /// Returns the disconnect error if there was one, otherwise the lock release error.
    pub fn close(mut self) -> Result<(), ApcError> {
        self.teardown()
    }

    fn teardown(&mut self) -> Result<(), ApcError> {
        if self.torn_down {
            return Ok(());
        }

        self.torn_down = true;

        debug!("tearing down session with {}", self.driver.args.host);

        let closed = self.driver.close();
        let released = self.guard.release();

        closed.and(released)
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        if let Err(err) = self.teardown() {
            error!("failed tearing down session, error: {err}");
        }
    }
}

/// Run `f` against a locked, connected driver, then tear the session down whatever `f` returned.
/// An error from `f` wins over a teardown error; the latter is logged.
///
/// # Errors
///
/// Returns the error from opening the session, from `f`, or from teardown, in that order of
/// preference.
pub fn run<T, F>(
    driver: Driver,
    lock: Box<dyn SessionLock>,
    lock_args: &LockArgs,
    f: F,
) -> Result<T, ApcError>
where
    F: FnOnce(&mut Driver) -> Result<T, ApcError>,
{
    let mut session = Session::open(driver, lock, lock_args)?;

    let result = f(session.driver());
    let closed = session.close();

    match (result, closed) {
        (Ok(value), Ok(())) => Ok(value),
        (Ok(_), Err(err)) | (Err(err), Ok(())) => Err(err),
        (Err(err), Err(teardown_err)) => {
            error!("teardown after failed action also failed, error: {teardown_err}");

            Err(err)
        }
    }
}
