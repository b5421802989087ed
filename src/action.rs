use crate::driver::commands::{
    validate_reboot_delay,
    DEFAULT_REBOOT_DELAY,
};
use crate::driver::Driver;
use crate::errors::ApcError;
use crate::response::Response;

/// The one operation an invocation performs against the device.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Reboot an outlet, keeping it off for `delay_secs`.
    Reboot {
        /// Outlet token, e.g. "2" or "all".
        outlet: String,
        /// Seconds the outlet stays off.
        delay_secs: u32,
    },
    /// Switch an outlet on.
    On(String),
    /// Switch an outlet off.
    Off(String),
    /// Query an outlet's (or all outlets') status.
    Get(String),
}

impl Action {
    /// Parse a reboot argument of the form `outlet[,secs]`; the delay defaults to five seconds.
    /// The delay is range checked here, before any lock is taken or connection made; the outlet
    /// token is resolved when the action runs.
    ///
    /// # Errors
    ///
    /// Returns `ApcError::Config` if `secs` is present but not a number, `ApcError::InvalidDelay`
    /// if it is outside `[5, 60]`.
    pub fn reboot_from_arg(arg: &str) -> Result<Self, ApcError> {
        let (outlet, delay_secs) = match arg.split_once(',') {
            Some((outlet, secs)) => {
                let secs = secs.trim();
                let delay_secs = secs.parse::<u32>().map_err(|_| ApcError::Config {
                    details: format!("bad reboot delay: [{secs}]"),
                })?;

                (outlet, delay_secs)
            }
            None => (arg, DEFAULT_REBOOT_DELAY),
        };

        Ok(Self::Reboot {
            outlet: outlet.trim().to_owned(),
            delay_secs: validate_reboot_delay(delay_secs)?,
        })
    }

    /// Perform the action against an open driver.
    ///
    /// # Errors
    ///
    /// Returns whatever the underlying driver operation returns.
    pub fn apply(
        &self,
        driver: &mut Driver,
    ) -> Result<Response, ApcError> {
        match self {
            Self::Reboot { outlet, delay_secs } => driver.reboot(outlet, *delay_secs),
            Self::On(outlet) => driver.on(outlet),
            Self::Off(outlet) => driver.off(outlet),
            Self::Get(outlet) => driver.status(outlet),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reboot_from_arg() {
        assert_eq!(
            Action::reboot_from_arg("2,30").unwrap(),
            Action::Reboot {
                outlet: String::from("2"),
                delay_secs: 30
            }
        );
        assert_eq!(
            Action::reboot_from_arg("all").unwrap(),
            Action::Reboot {
                outlet: String::from("all"),
                delay_secs: 5
            }
        );
    }

    #[test]
    fn test_reboot_from_arg_bad_delay() {
        assert!(matches!(
            Action::reboot_from_arg("2,soon"),
            Err(ApcError::Config { .. })
        ));
    }

    #[test]
    fn test_reboot_from_arg_out_of_range_delay() {
        assert!(matches!(
            Action::reboot_from_arg("2,99"),
            Err(ApcError::InvalidDelay(99))
        ));
        assert!(matches!(
            Action::reboot_from_arg("2,4"),
            Err(ApcError::InvalidDelay(4))
        ));
    }
}
