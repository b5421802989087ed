use core::time::Duration;

/// `ApcError` is the error returned by every fallible apcrs operation. Each variant's display
/// output is a single, user facing line.
#[derive(Debug, thiserror::Error)]
pub enum ApcError {
    /// The session lock could not be acquired within the configured number of attempts.
    #[error("cannot acquire {path} after {attempts} attempts")]
    LockTimeout {
        /// Description of the lock (typically its filesystem path).
        path: String,
        /// How many acquisition attempts were made.
        attempts: u32,
    },

    /// The lock backend failed in a way that is not simply "somebody else holds it".
    #[error("lock {path} failed, error: {details}")]
    Lock {
        /// Description of the lock (typically its filesystem path).
        path: String,
        /// A string holding details about the error.
        details: String,
    },

    /// A login handshake step did not see its expected prompt in time.
    #[error("timeout connecting to APC @ {host} while {step}")]
    ConnectionTimeout {
        /// The host being connected to.
        host: String,
        /// The handshake step that timed out.
        step: String,
    },

    /// The remote end went away -- typically the telnet client gave up and exited. `output` is
    /// whatever the device (or the client) said last.
    #[error("connection to APC @ {host} closed: {output}")]
    ConnectionClosed {
        /// The host being connected to.
        host: String,
        /// Output received before the connection closed.
        output: String,
    },

    /// The outlet token could not be parsed, or the device rejected the outlet reference.
    #[error("bad outlet: [{0}]")]
    BadOutlet(String),

    /// Reboot delay outside of the accepted range.
    #[error("invalid reboot delay {0}, enter time delay in seconds between 5 and 60")]
    InvalidDelay(u32),

    /// A raw pattern wait expired -- callers generally re-map this into `ConnectionTimeout` or
    /// `CommandTimeout`.
    #[error("timed out after {timeout:?} waiting for {waiting_for}")]
    Timeout {
        /// Description of the pattern(s) being waited for.
        waiting_for: String,
        /// The timeout that elapsed.
        timeout: Duration,
    },

    /// A command's expected response never arrived.
    #[error("APC command '{command}' timed out waiting for {waiting_for}")]
    CommandTimeout {
        /// The command(s) sent.
        command: String,
        /// Description of the pattern(s) being waited for.
        waiting_for: String,
    },

    /// The device answered a command with an unexpected result code.
    #[error("APC command '{command}' failed: {details}")]
    CommandFailure {
        /// The command(s) sent.
        command: String,
        /// A string holding details about the error.
        details: String,
    },

    /// The underlying transport (pty, process, io) failed.
    #[error("transport error: {details}")]
    Transport {
        /// A string holding details about the error.
        details: String,
    },

    /// Configuration could not be read or parsed.
    #[error("config error: {details}")]
    Config {
        /// A string holding details about the error.
        details: String,
    },
}

impl ApcError {
    /// Shorthand for building a `Transport` error.
    pub(crate) fn transport(details: impl Into<String>) -> Self {
        Self::Transport {
            details: details.into(),
        }
    }

    /// Returns true if this error is a raw pattern wait timeout.
    #[must_use]
    pub const fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }

    /// Returns true if this error means the connection is gone.
    #[must_use]
    pub const fn is_closed(&self) -> bool {
        matches!(self, Self::ConnectionClosed { .. })
    }
}
