use super::constants::{
    DEFAULT_READ_DELAY,
    DEFAULT_RETURN_CHAR,
    DEFAULT_TIMEOUT_OPS,
};
use crate::channel::patterns::{
    default_password_pattern,
    default_prompt_pattern,
    default_username_pattern,
};
use core::time::Duration;
use regex::bytes::Regex;

/// A struct to hold args/settings for a `Channel` object.
#[allow(clippy::module_name_repetitions)]
pub struct Args {
    /// Pattern used to find the username prompt during the handshake.
    pub username_pattern: Regex,
    /// Pattern used to find the password prompt during the handshake.
    pub password_pattern: Regex,
    /// Pattern used to find the command prompt.
    pub prompt_pattern: Regex,
    /// Return character(s) sent after every line.
    pub return_char: String,
    /// Delay between reads of the underlying transport when nothing was available.
    pub read_delay: Duration,
    /// Timeout for each handshake step and each command exchange.
    pub timeout_ops: Duration,
    /// Echo the output that preceded the last match before each send.
    pub verbose: bool,
}

impl Default for Args {
    fn default() -> Self {
        Self {
            username_pattern: default_username_pattern(),
            password_pattern: default_password_pattern(),
            prompt_pattern: default_prompt_pattern(),
            return_char: DEFAULT_RETURN_CHAR.to_owned(),
            read_delay: DEFAULT_READ_DELAY,
            timeout_ops: DEFAULT_TIMEOUT_OPS,
            verbose: false,
        }
    }
}
