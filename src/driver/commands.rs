use crate::channel::constants::LOGOUT_COMMAND;
use crate::errors::ApcError;
use crate::outlet::Outlet;
use core::fmt::{
    Display,
    Formatter,
    Result,
};

/// Shortest reboot delay the device accepts, in seconds.
pub const MIN_REBOOT_DELAY: u32 = 5;

/// Longest reboot delay the device accepts, in seconds.
pub const MAX_REBOOT_DELAY: u32 = 60;

/// Reboot delay used when none is given.
pub const DEFAULT_REBOOT_DELAY: u32 = 5;

/// Check a reboot delay against the accepted `[5, 60]` second range.
///
/// # Errors
///
/// Returns `ApcError::InvalidDelay` if `secs` is out of range.
pub fn validate_reboot_delay(secs: u32) -> core::result::Result<u32, ApcError> {
    if secs < MIN_REBOOT_DELAY || secs > MAX_REBOOT_DELAY {
        return Err(ApcError::InvalidDelay(secs));
    }

    Ok(secs)
}

/// The console commands apcrs knows how to send.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// `olStatus <outlet>`
    Status(Outlet),
    /// `olOn <outlet>`
    On(Outlet),
    /// `olOff <outlet>`
    Off(Outlet),
    /// `olRbootTime <outlet> <secs>` -- how long the outlet stays off during a reboot.
    RebootDelay(Outlet, u32),
    /// `olReboot <outlet>`
    Reboot(Outlet),
    /// `bye`
    Logout,
}

impl Display for Command {
    fn fmt(
        &self,
        f: &mut Formatter<'_>,
    ) -> Result {
        match self {
            Self::Status(outlet) => write!(f, "olStatus {}", outlet.argument()),
            Self::On(outlet) => write!(f, "olOn {}", outlet.argument()),
            Self::Off(outlet) => write!(f, "olOff {}", outlet.argument()),
            Self::RebootDelay(outlet, secs) => {
                write!(f, "olRbootTime {} {secs}", outlet.argument())
            }
            Self::Reboot(outlet) => write!(f, "olReboot {}", outlet.argument()),
            Self::Logout => write!(f, "{LOGOUT_COMMAND}"),
        }
    }
}
