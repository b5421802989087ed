use core::time::Duration;

/// Prompt printed by the console when it wants the user name.
pub const USERNAME_PROMPT: &str = "User Name : ";

/// Prompt printed by the console when it wants the password.
pub const PASSWORD_PROMPT: &str = "Password  : ";

/// The console command prompt.
pub const COMMAND_PROMPT: &str = "apc>";

/// Printed after a command completed successfully.
pub const SUCCESS_CODE: &str = "E000: Success";

/// Printed when a command referenced an outlet (or other parameter) the device does not have.
pub const OUTLET_ERROR_CODE: &str = "E102:";

/// The command that ends a console session.
pub const LOGOUT_COMMAND: &str = "bye";

/// The default line terminator.
pub const DEFAULT_RETURN_CHAR: &str = "\r\n";

/// The default delay between reads from the underlying transport object when nothing arrived.
pub const DEFAULT_READ_DELAY: Duration = Duration::from_micros(250);

/// Default timeout for each handshake step and each command.
pub const DEFAULT_TIMEOUT_OPS: Duration = Duration::from_secs(10);

/// The ANSI escape byte.
pub const ANSI_ESCAPE_BYTE: u8 = 0x1b;

/// The terminal end-of-file character (ctrl-d).
pub const EOF_BYTE: u8 = 0x04;
