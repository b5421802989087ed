//! Run a child process (the telnet client) on a pseudo terminal.

/// Derived from rexpect's `PtyProcess`, used under the following license:
///
/// MIT License
///
/// Copyright (c) 2018 Philipp Keller
///
/// Permission is hereby granted, free of charge, to any person obtaining a copy
/// of this software and associated documentation files (the "Software"), to deal
/// in the Software without restriction, including without limitation the rights
/// to use, copy, modify, merge, publish, distribute, sublicense, and/or sell
/// copies of the Software, and to permit persons to whom the Software is
/// furnished to do so, subject to the following conditions:
///
/// The above copyright notice and this permission notice shall be included in all
/// copies or substantial portions of the Software.
///
/// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
/// IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
/// FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE
/// AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
/// LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM,
/// OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE
/// SOFTWARE.
use core::time::Duration;
use nix::errno::Errno;
use nix::fcntl::{
    open,
    OFlag,
};
use nix::libc::{
    _exit,
    STDERR_FILENO,
    STDIN_FILENO,
    STDOUT_FILENO,
};
use nix::pty::{
    grantpt,
    posix_openpt,
    unlockpt,
    PtyMaster,
};
use nix::sys::signal::{
    self,
    Signal,
};
use nix::sys::wait::{
    waitpid,
    WaitPidFlag,
    WaitStatus,
};
use nix::sys::{
    stat,
    termios,
};
use nix::unistd::{
    dup2,
    write,
    fork,
    setsid,
    ForkResult,
    Pid,
};
use std::os::unix::process::CommandExt;
use std::path::Path;
use std::process::Command;
use std::thread;
use std::time::Instant;

/// How long `exit` keeps sending SIGTERM before escalating to SIGKILL.
const DEFAULT_KILL_TIMEOUT: Duration = Duration::from_secs(2);

#[derive(Debug, thiserror::Error)]
/// Errors raised while spawning or reaping the pty child.
pub enum PtyProcessError {
    #[error(transparent)]
    /// Wrapper around nix errors.
    Nix(#[from] nix::Error),

    #[error(transparent)]
    /// Wrapper around std::io errors.
    Io(#[from] std::io::Error),
}

/// Exit status of a child that could not exec the requested program, as shells use.
const EXEC_FAILED: i32 = 127;

/// Runs in the forked child: put the pty slave on stdin/stdout/stderr, then exec. Only returns if
/// something failed.
fn attach_and_exec(
    slave: &str,
    command: &mut Command,
) -> PtyProcessError {
    let attach = || -> Result<(), PtyProcessError> {
        setsid()?;

        let slave_fd = open(Path::new(slave), OFlag::O_RDWR, stat::Mode::empty())?;

        dup2(slave_fd, STDIN_FILENO)?;
        dup2(slave_fd, STDOUT_FILENO)?;
        dup2(slave_fd, STDERR_FILENO)?;

        // the remote console does its own echoing
        let mut flags = termios::tcgetattr(STDIN_FILENO)?;
        flags.local_flags &= !termios::LocalFlags::ECHO;
        termios::tcsetattr(STDIN_FILENO, termios::SetArg::TCSANOW, &flags)?;

        Ok(())
    };

    match attach() {
        Ok(()) => PtyProcessError::Io(command.exec()),
        Err(err) => err,
    }
}

#[cfg(target_os = "linux")]
fn slave_name(master: &PtyMaster) -> nix::Result<String> {
    nix::pty::ptsname_r(master)
}

#[cfg(not(target_os = "linux"))]
fn slave_name(master: &PtyMaster) -> nix::Result<String> {
    // SAFETY: ptsname is not thread safe, apcrs only ever spawns from the main thread.
    unsafe { nix::pty::ptsname(master) }
}

/// A child process attached to the slave side of a pty; the parent reads and writes `pty`.
///
/// The child is terminated when the `PtyProcess` is dropped.
pub struct PtyProcess {
    /// The master side of the pty.
    pub pty: PtyMaster,
    child_pid: Pid,
    kill_timeout: Duration,
}

impl PtyProcess {
    /// Fork and exec `command` with stdin/stdout/stderr on a fresh, non-blocking pty.
    ///
    /// # Errors
    ///
    /// Returns a `PtyProcessError` if the pty cannot be allocated or the fork fails.
    pub fn new(mut command: Command) -> Result<Self, PtyProcessError> {
        let master = posix_openpt(OFlag::O_RDWR | OFlag::O_NOCTTY | OFlag::O_NONBLOCK)?;

        grantpt(&master)?;
        unlockpt(&master)?;

        let slave = slave_name(&master)?;

        // formatted up front, the child must not allocate
        let failure = format!(
            "failed executing {}\r\n",
            command.get_program().to_string_lossy()
        );

        // SAFETY: only async-signal-safe functions should be called from the fork.
        match unsafe { fork()? } {
            ForkResult::Child => {
                let _err = attach_and_exec(&slave, &mut command);

                // the child must never unwind back into the caller
                let _ = write(STDERR_FILENO, failure.as_bytes());

                // SAFETY: _exit skips atexit handlers and destructors owned by the parent image.
                unsafe { _exit(EXEC_FAILED) }
            }
            ForkResult::Parent { child } => Ok(Self {
                pty: master,
                child_pid: child,
                kill_timeout: DEFAULT_KILL_TIMEOUT,
            }),
        }
    }

    /// Non-blocking status check (runs `waitpid` with `WNOHANG`). Returns `None` once the child
    /// has already been reaped.
    #[must_use]
    pub fn status(&self) -> Option<WaitStatus> {
        waitpid(self.child_pid, Some(WaitPidFlag::WNOHANG)).ok()
    }

    /// Terminate the child, blocking until it is gone.
    ///
    /// # Errors
    ///
    /// Returns a `PtyProcessError` if the process cannot be signalled.
    pub fn exit(&mut self) -> Result<WaitStatus, PtyProcessError> {
        self.kill(Signal::SIGTERM)
    }

    /// Repeatedly send `sig` until the child dies, escalating to SIGKILL once `kill_timeout` has
    /// elapsed. A child that is already gone counts as killed.
    ///
    /// # Errors
    ///
    /// Returns a `PtyProcessError` if the process cannot be signalled.
    pub fn kill(
        &mut self,
        sig: Signal,
    ) -> Result<WaitStatus, PtyProcessError> {
        let start = Instant::now();

        loop {
            let sig = if start.elapsed() > self.kill_timeout {
                Signal::SIGKILL
            } else {
                sig
            };

            match signal::kill(self.child_pid, sig) {
                Ok(()) => {}
                Err(Errno::ESRCH) => return Ok(WaitStatus::Exited(self.child_pid, 0)),
                Err(err) => return Err(PtyProcessError::from(err)),
            }

            match self.status() {
                Some(status) if status != WaitStatus::StillAlive => return Ok(status),
                Some(_) => thread::sleep(Duration::from_millis(100)),
                None => return Ok(WaitStatus::Exited(self.child_pid, 0)),
            }
        }
    }
}

impl Drop for PtyProcess {
    fn drop(&mut self) {
        if self.status() == Some(WaitStatus::StillAlive) {
            if let Err(err) = self.exit() {
                log::error!("failed terminating pty child, error: {err}");
            }
        }
    }
}
