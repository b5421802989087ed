use crate::config::DEFAULT_PORT;
use crate::errors::ApcError;

/// The default transport read size -- 8,192 bytes.
pub const DEFAULT_READ_SIZE: u16 = 8_192;

/// Transport is the trait all apcrs transports must implement in order to be consumed by a
/// `Channel`. Anything that can carry the APC console -- a spawned telnet client, a raw socket, or
/// a scripted console in tests -- can be a transport.
pub trait Transport {
    /// Open the underlying transport.
    ///
    /// # Errors
    ///
    /// Returns an `ApcError` if any issues occur.
    fn open(&mut self) -> Result<(), ApcError>;
    /// Close the underlying transport. Closing a transport that was never opened, or is already
    /// dead, must be a no-op.
    ///
    /// # Errors
    ///
    /// Returns an `ApcError` if any issues occur.
    fn close(&mut self) -> Result<(), ApcError>;
    /// Indicates if the transport is "alive".
    fn alive(&mut self) -> bool;
    /// Read default read amount of bytes from the underlying transport. Like `read_n` the
    /// implementation must be non-blocking.
    ///
    /// # Errors
    ///
    /// Returns an `ApcError` if any issues occur.
    fn read(&mut self) -> Result<Vec<u8>, ApcError>;
    /// Read up to `n` bytes from the underlying transport. Implementations *must be non blocking*
    /// -- return an empty vec if there is nothing to read right now.
    ///
    /// # Errors
    ///
    /// Returns an `ApcError` if any issues occur.
    fn read_n(
        &mut self,
        n: u16,
    ) -> Result<Vec<u8>, ApcError>;
    /// Write to the underlying transport.
    ///
    /// # Errors
    ///
    /// Returns an `ApcError` if any issues occur.
    fn write(
        &mut self,
        b: &[u8],
    ) -> Result<(), ApcError>;
    /// Returns the host of the transport.
    fn get_host(&self) -> String;
    /// Returns the port of the transport.
    fn get_port(&self) -> u16;
    /// Returns the credentials the channel uses for the login handshake.
    fn in_channel_auth_data(&self) -> InChannelAuthData;
}

/// A struct holding generic arguments that apply to all transport flavors.
pub struct TransportArgs {
    /// The actual host to connect to.
    pub host: String,
    /// The port to connect to the host on.
    pub port: u16,
    /// The username used during the login handshake.
    pub user: String,
    /// The password used during the login handshake.
    pub password: String,
    /// The read size for each read of the transport (can leave this to the default!).
    pub read_size: u16,
}

impl TransportArgs {
    /// Return a new instance of `TransportArgs` -- would be just a default impl but we require the
    /// host be set, so we just have this method.
    #[must_use]
    pub fn new(host: &str) -> Self {
        Self {
            host: host.to_owned(),
            port: DEFAULT_PORT,
            user: String::new(),
            password: String::new(),
            read_size: DEFAULT_READ_SIZE,
        }
    }
}

/// Credentials a `Channel` needs to run the login handshake for a given transport.
pub struct InChannelAuthData {
    /// The user to log in as.
    pub user: String,
    /// The password to log in with.
    pub password: String,
}
