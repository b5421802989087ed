use super::constants::EOF_BYTE;
use super::Channel;
use crate::errors::ApcError;
use log::info;

impl Channel {
    /// Write `b` bytes to the device -- typically you should use `write_and_return` instead.
    ///
    /// # Errors
    ///
    /// Returns an `ApcError` if the transport write fails.
    pub fn write(
        &mut self,
        b: &[u8],
    ) -> Result<(), ApcError> {
        self.transport.write(b)
    }

    /// Writes a return -- "\r\n" by default, but can be configured.
    ///
    /// # Errors
    ///
    /// Returns an `ApcError` if the transport write fails.
    pub fn write_return(&mut self) -> Result<(), ApcError> {
        let return_char = self.args.return_char.clone();

        self.transport.write(return_char.as_bytes())
    }

    /// Write `b` bytes to the device followed by a return. With `verbose` set, the output that
    /// preceded the last match is echoed first.
    ///
    /// # Errors
    ///
    /// Returns an `ApcError` if the transport write fails.
    pub fn write_and_return(
        &mut self,
        b: &[u8],
    ) -> Result<(), ApcError> {
        if self.args.verbose {
            info!("{}", String::from_utf8_lossy(&self.last_output));
        }

        self.write(b)?;
        self.write_return()
    }

    /// Signal end-of-input by writing the terminal EOF character.
    ///
    /// # Errors
    ///
    /// Returns an `ApcError` if the transport write fails.
    pub fn send_eof(&mut self) -> Result<(), ApcError> {
        self.write(&[EOF_BYTE])
    }
}
