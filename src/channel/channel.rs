use super::constants::ANSI_ESCAPE_BYTE;
use super::util::strip_ansi;
use super::{
    Args,
    SessionState,
};
use crate::errors::ApcError;
use crate::transport::base::Transport;
use core::str;
use log::{
    debug,
    info,
};

/// The apcrs `Channel` object -- the channel "wraps" the transport object, runs the login
/// handshake, and handles sending to and pattern-reading from the transport.
///
/// Everything happens on the calling thread: reads poll the transport and accumulate into an
/// internal buffer, and pattern waits consume that buffer up to the end of each match.
pub struct Channel {
    /// The arguments that the channel was created with.
    pub args: Args,
    pub(super) transport: Box<dyn Transport>,
    pub(super) buffer: Vec<u8>,
    pub(super) state: SessionState,
    pub(super) opened: bool,
    pub(super) firmware_version: Option<String>,
    pub(super) last_output: Vec<u8>,
}

impl Channel {
    /// Returns a new instance of `Channel` wrapping the given transport.
    #[must_use]
    pub fn new(
        args: Args,
        t: impl Transport + 'static,
    ) -> Self {
        Self {
            args,
            transport: Box::new(t),
            buffer: vec![],
            state: SessionState::Disconnected,
            opened: false,
            firmware_version: None,
            last_output: vec![],
        }
    }

    /// Open the underlying transport and run the login handshake. On failure the channel is left
    /// `Disconnected`, but the transport may still need closing -- `close` is always safe to call.
    ///
    /// # Errors
    ///
    /// Returns `ApcError::ConnectionTimeout` if a handshake prompt does not show up in time, or a
    /// transport error.
    pub fn open(&mut self) -> Result<(), ApcError> {
        self.state = SessionState::Connecting;

        debug!(
            "opening transport to {}:{}",
            self.transport.get_host(),
            self.transport.get_port()
        );

        if let Err(err) = self.transport.open() {
            self.state = SessionState::Disconnected;

            return Err(err);
        }

        self.opened = true;

        let result = self.handshake();

        if result.is_err() {
            self.state = SessionState::Disconnected;
        }

        result
    }

    /// Close the channel and underlying transport. Closing more than once, or closing a channel
    /// that never opened, is a no-op.
    ///
    /// # Errors
    ///
    /// Returns an `ApcError` if the transport fails to close.
    pub fn close(&mut self) -> Result<(), ApcError> {
        self.state = SessionState::Disconnected;

        if !self.opened {
            return Ok(());
        }

        info!("channel closing...");

        self.opened = false;

        self.transport.close()
    }

    /// Pull whatever the transport has right now into the buffer; returns how many bytes arrived.
    /// A transport that has hung up is reported as `ApcError::ConnectionClosed` carrying whatever
    /// was still buffered, usually the client's own complaint.
    ///
    /// # Errors
    ///
    /// Returns an `ApcError` if the transport read fails or the connection is gone.
    pub fn read(&mut self) -> Result<usize, ApcError> {
        let mut b = match self.transport.read() {
            Ok(b) => b,
            Err(err) if err.is_closed() => {
                let output = String::from_utf8_lossy(&self.buffer).trim().to_owned();

                return Err(ApcError::ConnectionClosed {
                    host: self.transport.get_host(),
                    output: if output.is_empty() {
                        String::from("no output")
                    } else {
                        output
                    },
                });
            }
            Err(err) => return Err(err),
        };

        if b.is_empty() {
            return Ok(0);
        }

        if b.contains(&ANSI_ESCAPE_BYTE) {
            b = strip_ansi(&b);
        }

        debug!(
            "channel read\n{}",
            str::from_utf8(&b).unwrap_or("failed decoding bytes, cannot log")
        );

        self.buffer.extend(&b);

        Ok(b.len())
    }

    /// Take everything buffered so far (after one last read), leaving the buffer empty.
    pub fn drain(&mut self) -> Vec<u8> {
        if self.opened {
            if let Err(err) = self.read() {
                debug!("ignoring read error while draining, error: {err}");
            }
        }

        core::mem::take(&mut self.buffer)
    }

    /// The current handshake state.
    #[must_use]
    pub const fn state(&self) -> SessionState {
        self.state
    }

    /// Indicates if the underlying transport has been opened (and not yet closed).
    #[must_use]
    pub const fn is_open(&self) -> bool {
        self.opened
    }

    /// Output that preceded the most recent pattern match.
    #[must_use]
    pub fn last_output(&self) -> &[u8] {
        &self.last_output
    }

    /// The firmware version found in the login banner, if any.
    #[must_use]
    pub fn firmware_version(&self) -> Option<&str> {
        self.firmware_version.as_deref()
    }

    /// The host of the underlying transport.
    #[must_use]
    pub fn host(&self) -> String {
        self.transport.get_host()
    }
}
