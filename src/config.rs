use crate::errors::ApcError;
use core::time::Duration;
use serde::{
    Deserialize,
    Serialize,
};
use std::fs;
use std::path::Path;

/// The default APC host.
pub const DEFAULT_HOST: &str = "192.168.9.6";

/// The default (factory) APC user.
pub const DEFAULT_USER: &str = "apc";

/// The default (factory) APC password.
pub const DEFAULT_PASSWORD: &str = "apc";

/// The default telnet port.
pub const DEFAULT_PORT: u16 = 23;

/// The default binary used to open the telnet session.
pub const DEFAULT_TELNET_BIN: &str = "telnet";

/// The default path of the session lock artifact.
pub const DEFAULT_LOCK_PATH: &str = "/tmp/apc.lock";

/// The default number of lock acquisition attempts before giving up.
pub const DEFAULT_LOCK_ATTEMPTS: u32 = 60;

/// The default delay between lock acquisition attempts, in milliseconds.
pub const DEFAULT_LOCK_POLL_INTERVAL_MS: u64 = 1_000;

/// The default timeout for each handshake step and command, in seconds.
pub const DEFAULT_TIMEOUT_OPS_SECS: u64 = 10;

/// Environment variable overriding the default host.
pub const ENV_HOST: &str = "APC_HOST";

/// Environment variable overriding the default user.
pub const ENV_USER: &str = "APC_USER";

/// Environment variable overriding the default password.
pub const ENV_PASSWORD: &str = "APC_PASSWORD";

/// `Config` holds everything needed to lock, connect to, and drive an APC. It is built once at
/// startup and handed to the builders; nothing else reads process state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct Config {
    /// The APC host.
    pub host: String,
    /// The telnet port.
    pub port: u16,
    /// The user to log in as.
    pub user: String,
    /// The password to log in with.
    pub password: String,
    /// Echo the device output preceding the last match before each send.
    pub verbose: bool,
    /// Suppress progress messages.
    pub quiet: bool,
    /// The telnet binary to spawn.
    pub telnet_bin: String,
    /// Extra options for the telnet binary, placed before host and port.
    pub telnet_args: Vec<String>,
    /// Path of the session lock artifact.
    pub lock_path: String,
    /// Number of lock acquisition attempts.
    pub lock_attempts: u32,
    /// Delay between lock acquisition attempts, in milliseconds.
    pub lock_poll_interval_ms: u64,
    /// Timeout for each handshake step and command, in seconds.
    pub timeout_ops_secs: u64,
    /// Line terminator sent after every line.
    pub return_char: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_owned(),
            port: DEFAULT_PORT,
            user: DEFAULT_USER.to_owned(),
            password: DEFAULT_PASSWORD.to_owned(),
            verbose: false,
            quiet: false,
            telnet_bin: DEFAULT_TELNET_BIN.to_owned(),
            telnet_args: vec![],
            lock_path: DEFAULT_LOCK_PATH.to_owned(),
            lock_attempts: DEFAULT_LOCK_ATTEMPTS,
            lock_poll_interval_ms: DEFAULT_LOCK_POLL_INTERVAL_MS,
            timeout_ops_secs: DEFAULT_TIMEOUT_OPS_SECS,
            return_char: String::from("\r\n"),
        }
    }
}

impl Config {
    /// Parse a YAML config document; missing keys keep their defaults.
    ///
    /// # Errors
    ///
    /// Returns `ApcError::Config` if the document is not valid.
    pub fn from_yaml_str(s: &str) -> Result<Self, ApcError> {
        serde_yaml::from_str(s).map_err(|err| ApcError::Config {
            details: format!("failed parsing config, error: {err}"),
        })
    }

    /// Read and parse a YAML config file.
    ///
    /// # Errors
    ///
    /// Returns `ApcError::Config` if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self, ApcError> {
        let contents = fs::read_to_string(path).map_err(|err| ApcError::Config {
            details: format!("failed reading config file '{}', error: {err}", path.display()),
        })?;

        Self::from_yaml_str(&contents)
    }

    /// Apply the `APC_HOST`, `APC_USER` and `APC_PASSWORD` defaults using the given lookup. The
    /// lookup is injected so that only the caller decides where the values come from.
    #[must_use]
    pub fn apply_env<F>(
        mut self,
        lookup: F,
    ) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = lookup(ENV_HOST) {
            self.host = host;
        }

        if let Some(user) = lookup(ENV_USER) {
            self.user = user;
        }

        if let Some(password) = lookup(ENV_PASSWORD) {
            self.password = password;
        }

        self
    }

    /// The per-step timeout as a `Duration`.
    #[must_use]
    pub const fn timeout_ops(&self) -> Duration {
        Duration::from_secs(self.timeout_ops_secs)
    }

    /// The lock poll interval as a `Duration`.
    #[must_use]
    pub const fn lock_poll_interval(&self) -> Duration {
        Duration::from_millis(self.lock_poll_interval_ms)
    }
}
