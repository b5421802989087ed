use log::info;

/// Formats an outcome line: `"<host>: <outlet label> <state>"`.
#[must_use]
pub fn format_outcome(
    host: &str,
    outlet_label: &str,
    state: &str,
) -> String {
    format!("{host}: {outlet_label} {state}")
}

/// Something that reports what happened to the operator. Notifiers never fail.
pub trait Notifier {
    /// Report the outcome of an outlet operation, e.g. ("Outlet #2", "Rebooted").
    fn notify(
        &self,
        outlet_label: &str,
        state: &str,
    );

    /// Report progress (lock acquisition, connecting, disconnecting). Implementations may choose
    /// to stay silent.
    fn info(
        &self,
        msg: &str,
    );
}

/// Prints outcome lines to stdout, and progress lines too unless `quiet` is set.
pub struct Console {
    host: String,
    quiet: bool,
}

impl Console {
    /// Returns a new `Console` notifier for `host`.
    #[must_use]
    pub fn new(
        host: &str,
        quiet: bool,
    ) -> Self {
        Self {
            host: host.to_owned(),
            quiet,
        }
    }
}

impl Notifier for Console {
    fn notify(
        &self,
        outlet_label: &str,
        state: &str,
    ) {
        println!("{}", format_outcome(&self.host, outlet_label, state));
    }

    fn info(
        &self,
        msg: &str,
    ) {
        info!("{}", msg);

        if !self.quiet {
            println!("{msg}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_outcome() {
        assert_eq!(
            format_outcome("10.0.0.5", "Outlet #2", "Rebooted"),
            "10.0.0.5: Outlet #2 Rebooted"
        );
        assert_eq!(
            format_outcome("pdu", "ALL outlets", "Off"),
            "pdu: ALL outlets Off"
        );
    }
}
