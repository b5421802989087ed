use crate::config::DEFAULT_TELNET_BIN;
use crate::errors::ApcError;
use crate::transport::base::{
    InChannelAuthData,
    Transport,
    TransportArgs,
};
use crate::util::ptyprocess::PtyProcess;
use log::debug;
use nix::poll::{
    poll,
    PollFd,
    PollFlags,
};
use nix::libc::EIO;
use nix::sys::wait::WaitStatus;
use nix::unistd::dup;
use std::fs::File;
use std::io::{
    ErrorKind,
    Read,
    Write,
};
use std::os::unix::io::{
    AsRawFd,
    FromRawFd,
};
use std::process::Command;

/// How long (in milliseconds) a single read polls the pty before reporting "nothing yet".
const READ_POLL_TIMEOUT_MS: i32 = 5;

/// A struct holding arguments specific to the `System` transport implementation.
#[allow(clippy::module_name_repetitions)]
pub struct SystemArgs {
    /// The binary used to open the session -- "telnet" by default.
    pub open_bin: String,
    /// Arguments passed to `open_bin`, if empty they are built from the transport args (host and
    /// port).
    pub open_args: Vec<String>,
    /// Extra arguments placed before the host/port arguments.
    pub extra_args: Vec<String>,
}

impl Default for SystemArgs {
    fn default() -> Self {
        Self {
            open_bin: String::from(DEFAULT_TELNET_BIN),
            open_args: vec![],
            extra_args: vec![],
        }
    }
}

/// The "system" transport -- runs the system telnet client on a pty and talks to it.
pub struct System {
    args: TransportArgs,
    system_args: SystemArgs,
    process: Option<PtyProcess>,
    file: Option<File>,
}

impl System {
    /// Returns a new `System` instance.
    #[must_use]
    pub const fn new(
        args: TransportArgs,
        system_args: SystemArgs,
    ) -> Self {
        Self {
            args,
            system_args,
            process: None,
            file: None,
        }
    }

    fn build_open_args(&mut self) {
        let mut open_args = self.system_args.extra_args.clone();

        open_args.extend([self.args.host.clone(), format!("{}", self.args.port)]);

        self.system_args.open_args = open_args;
    }

    fn spawn(&mut self) -> Result<(), ApcError> {
        let mut open_cmd = Command::new(&self.system_args.open_bin);
        open_cmd.args(&self.system_args.open_args);

        let process = PtyProcess::new(open_cmd).map_err(|err| {
            ApcError::transport(format!("encountered error spawning pty process, error: {err}"))
        })?;

        let fd = dup(process.pty.as_raw_fd()).map_err(|err| {
            ApcError::transport(format!(
                "encountered error duplicating pty process file handle, error: {err}"
            ))
        })?;

        self.process = Some(process);

        // SAFETY: fd was just returned by dup and nothing else owns it.
        self.file = Some(unsafe { File::from_raw_fd(fd) });

        Ok(())
    }

    fn closed(&self) -> ApcError {
        debug!("telnet client for {} has gone away", self.args.host);

        ApcError::ConnectionClosed {
            host: self.args.host.clone(),
            output: String::new(),
        }
    }

    fn file(&mut self) -> Result<&mut File, ApcError> {
        self.file
            .as_mut()
            .ok_or_else(|| ApcError::transport("attempting to use transport with no process!"))
    }
}

impl Transport for System {
    fn open(&mut self) -> Result<(), ApcError> {
        if self.system_args.open_args.is_empty() {
            self.build_open_args();
        }

        debug!(
            "opening system transport with bin '{}' and args '{:?}'",
            self.system_args.open_bin, self.system_args.open_args
        );

        self.spawn()
    }

    fn close(&mut self) -> Result<(), ApcError> {
        self.file = None;

        let Some(mut process) = self.process.take() else {
            debug!("system transport already closed");

            return Ok(());
        };

        process
            .exit()
            .map(|_| ())
            .map_err(|err| ApcError::transport(format!("failed closing pty process, error: {err}")))
    }

    fn alive(&mut self) -> bool {
        self.process.as_ref().map_or(false, |process| {
            matches!(
                process.status(),
                Some(WaitStatus::Continued(_) | WaitStatus::StillAlive)
            )
        })
    }

    fn read(&mut self) -> Result<Vec<u8>, ApcError> {
        self.read_n(self.args.read_size)
    }

    fn read_n(
        &mut self,
        n: u16,
    ) -> Result<Vec<u8>, ApcError> {
        let file = self.file()?;

        let fd = PollFd::new(file.as_raw_fd(), PollFlags::POLLIN);

        match poll(&mut [fd], READ_POLL_TIMEOUT_MS) {
            Ok(1) => {}
            Ok(_) => return Ok(vec![]),
            Err(err) => {
                return Err(ApcError::transport(format!(
                    "error while polling fd, error: {err}"
                )))
            }
        }

        let mut b = vec![0_u8; n as usize];

        match file.read(b.as_mut_slice()) {
            // readable but nothing there, the client hung up
            Ok(0) => Err(self.closed()),
            Ok(read_n) => {
                b.truncate(read_n);

                Ok(b)
            }
            Err(err) if err.kind() == ErrorKind::WouldBlock => Ok(vec![]),
            // linux reports a pty whose slave side is gone as EIO
            Err(err) if err.raw_os_error() == Some(EIO) => Err(self.closed()),
            Err(err) => Err(ApcError::transport(format!(
                "error when reading after polling fd, error: {err}"
            ))),
        }
    }

    fn write(
        &mut self,
        b: &[u8],
    ) -> Result<(), ApcError> {
        let file = self.file()?;

        file.write_all(b)
            .and_then(|()| file.flush())
            .map_err(|err| ApcError::transport(format!("failed writing to transport, error: {err}")))
    }

    fn get_host(&self) -> String {
        self.args.host.clone()
    }

    fn get_port(&self) -> u16 {
        self.args.port
    }

    fn in_channel_auth_data(&self) -> InChannelAuthData {
        InChannelAuthData {
            user: self.args.user.clone(),
            password: self.args.password.clone(),
        }
    }
}
