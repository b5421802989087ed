use core::fmt::{
    Display,
    Formatter,
    Result,
};

/// Where a `Channel` is in its login handshake. Only a `Ready` channel accepts commands.
///
/// `Disconnected -> Connecting -> AwaitingUsername -> AwaitingPassword -> AwaitingPrompt -> Ready`,
/// and back to `Disconnected` on close or on any handshake failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// No connection (initial, closed, or failed).
    Disconnected,
    /// The transport is being opened.
    Connecting,
    /// Waiting for the username prompt.
    AwaitingUsername,
    /// Username sent, waiting for the password prompt.
    AwaitingPassword,
    /// Password sent, waiting for the command prompt.
    AwaitingPrompt,
    /// Logged in at the command prompt.
    Ready,
}

impl Display for SessionState {
    fn fmt(
        &self,
        f: &mut Formatter<'_>,
    ) -> Result {
        let s = match self {
            Self::Disconnected => "disconnected",
            Self::Connecting => "connecting",
            Self::AwaitingUsername => "waiting for the username prompt",
            Self::AwaitingPassword => "waiting for the password prompt",
            Self::AwaitingPrompt => "waiting for the command prompt",
            Self::Ready => "ready",
        };

        write!(f, "{s}")
    }
}
