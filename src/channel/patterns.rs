use super::constants::{
    COMMAND_PROMPT,
    OUTLET_ERROR_CODE,
    PASSWORD_PROMPT,
    SUCCESS_CODE,
    USERNAME_PROMPT,
};
use once_cell::sync::OnceCell;
use regex::bytes::Regex;

/// Compile a pattern matching `s` literally.
///
/// # Panics
///
/// Never in practice -- an escaped literal is always a valid pattern.
#[allow(clippy::expect_used)]
#[must_use]
pub fn literal(s: &str) -> Regex {
    Regex::new(&regex::escape(s)).expect("failed compiling literal pattern, this is a bug")
}

/// Returns (once), the compiled username prompt pattern.
pub fn default_username_pattern() -> Regex {
    static RE: OnceCell<Regex> = OnceCell::new();

    RE.get_or_init(|| literal(USERNAME_PROMPT)).clone()
}

/// Returns (once), the compiled password prompt pattern.
pub fn default_password_pattern() -> Regex {
    static RE: OnceCell<Regex> = OnceCell::new();

    RE.get_or_init(|| literal(PASSWORD_PROMPT)).clone()
}

/// Returns (once), the compiled command prompt pattern.
pub fn default_prompt_pattern() -> Regex {
    static RE: OnceCell<Regex> = OnceCell::new();

    RE.get_or_init(|| literal(COMMAND_PROMPT)).clone()
}

/// Returns (once), the compiled generic success code pattern.
pub fn success_pattern() -> Regex {
    static RE: OnceCell<Regex> = OnceCell::new();

    RE.get_or_init(|| literal(SUCCESS_CODE)).clone()
}

/// Returns (once), the compiled outlet reference error code pattern.
pub fn outlet_error_pattern() -> Regex {
    static RE: OnceCell<Regex> = OnceCell::new();

    RE.get_or_init(|| literal(OUTLET_ERROR_CODE)).clone()
}

/// # Panics
///
///  Returns (once), a pattern matching any error code (E1xx) and the rest of its line. This should
///  realistically never panic.
#[allow(clippy::expect_used)]
pub fn device_error_pattern() -> Regex {
    static RE: OnceCell<Regex> = OnceCell::new();

    RE.get_or_init(|| {
        Regex::new(r"E[1-9][0-9]{2}:[^\r\n]*").expect("failed compiling pattern, this is a bug")
    })
    .clone()
}

/// # Panics
///
///  Returns (once), the pattern used to dig the firmware version out of the login banner. This
///  should realistically never panic.
#[allow(clippy::expect_used)]
pub fn version_pattern() -> Regex {
    static RE: OnceCell<Regex> = OnceCell::new();

    RE.get_or_init(|| {
        Regex::new(r" v(\d+\.\d+\.\d+)").expect("failed compiling pattern, this is a bug")
    })
    .clone()
}

/// # Panics
///
///  Returns (once), a pattern matching a line terminator. This should realistically never panic.
#[allow(clippy::expect_used)]
pub fn line_end_pattern() -> Regex {
    static RE: OnceCell<Regex> = OnceCell::new();

    RE.get_or_init(|| Regex::new(r"\r?\n").expect("failed compiling pattern, this is a bug"))
        .clone()
}

/// # Panics
///
///  Returns (once), the compiled ansi matching pattern. This should realistically never panic.
#[allow(clippy::expect_used)]
pub fn ansi_pattern() -> Regex {
    static RE: OnceCell<Regex> = OnceCell::new();

    RE.get_or_init(|| {
        Regex::new(r"\x1b(?:\[[0-9;?]*[ -/]*[@-~]|[()][0-9A-Za-z]|[=>78])")
            .expect("failed compiling pattern, this is a bug")
    })
    .clone()
}

/// A pattern matching the status line of outlet `n`, anchored on the outlet number followed by a
/// colon. The word boundary keeps "E102:" from matching outlet 2.
///
/// # Panics
///
/// Never in practice, the only variable part is an integer.
#[allow(clippy::expect_used)]
#[must_use]
pub fn outlet_status_pattern(n: i64) -> Regex {
    Regex::new(&format!(r"\b{}:", regex::escape(&n.to_string())))
        .expect("failed compiling outlet pattern, this is a bug")
}
