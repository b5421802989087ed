use super::SessionLock;
use crate::errors::ApcError;
use log::{
    debug,
    warn,
};
use nix::errno::Errno;
use nix::sys::signal::{
    kill,
    Signal,
};
use nix::unistd::{
    getpid,
    Pid,
};
use std::fs;
use std::io::ErrorKind;
use std::os::unix::fs::symlink;
use std::path::{
    Path,
    PathBuf,
};

/// A filesystem lock -- the lock artifact is a symbolic link whose target is the pid of the
/// holder. A link naming a pid that no longer exists is stale and gets cleaned up.
pub struct FileLock {
    path: PathBuf,
    locked: bool,
}

impl FileLock {
    /// Returns a new (unlocked) `FileLock` for `path`.
    #[must_use]
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            locked: false,
        }
    }

    fn error(
        &self,
        details: String,
    ) -> ApcError {
        ApcError::Lock {
            path: self.describe(),
            details,
        }
    }

    /// Returns the pid recorded in the lock artifact, `None` if the artifact does not exist.
    fn holder(&self) -> Result<Option<i32>, ApcError> {
        let target = match fs::read_link(&self.path) {
            Ok(target) => target,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
            Err(err) => {
                return Err(self.error(format!("failed reading lock artifact, error: {err}")))
            }
        };

        let pid = target
            .to_string_lossy()
            .parse::<i32>()
            .map_err(|err| self.error(format!("lock artifact does not name a pid, error: {err}")))?;

        Ok(Some(pid))
    }
}

fn pid_alive(pid: i32) -> bool {
    // signal 0 only checks for existence/permission
    !matches!(kill(Pid::from_raw(pid), None::<Signal>), Err(Errno::ESRCH))
}

impl SessionLock for FileLock {
    fn try_lock(&mut self) -> Result<bool, ApcError> {
        let me = getpid().to_string();

        // second pass only happens after removing a stale artifact
        for _ in 0..2 {
            match symlink(&me, &self.path) {
                Ok(()) => {
                    self.locked = true;

                    return Ok(true);
                }
                Err(err) if err.kind() == ErrorKind::AlreadyExists => {}
                Err(err) => {
                    return Err(self.error(format!("failed creating lock artifact, error: {err}")))
                }
            }

            let Some(pid) = self.holder()? else {
                // removed between our symlink and read_link; just try again
                continue;
            };

            if pid_alive(pid) {
                debug!("lock {} held by pid {}", self.describe(), pid);

                return Ok(false);
            }

            warn!(
                "removing stale lock {} left behind by pid {}",
                self.describe(),
                pid
            );

            match fs::remove_file(&self.path) {
                Ok(()) => {}
                Err(err) if err.kind() == ErrorKind::NotFound => {}
                Err(err) => {
                    return Err(self.error(format!("failed removing stale lock, error: {err}")))
                }
            }
        }

        Ok(false)
    }

    fn unlock(&mut self) -> Result<(), ApcError> {
        if !self.locked {
            return Ok(());
        }

        let me = getpid().as_raw();

        match self.holder()? {
            Some(pid) if pid == me => {}
            Some(pid) => {
                return Err(self.error(format!("lock is held by pid {pid}, not by us")));
            }
            None => {
                return Err(self.error(String::from("lock artifact vanished while held")));
            }
        }

        fs::remove_file(&self.path)
            .map_err(|err| self.error(format!("failed removing lock artifact, error: {err}")))?;

        self.locked = false;

        Ok(())
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}
