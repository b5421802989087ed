use crate::channel::constants::SUCCESS_CODE;
use crate::channel::patterns::{
    device_error_pattern,
    outlet_error_pattern,
    outlet_status_pattern,
    success_pattern,
};
use crate::channel::Channel;
use crate::codes::ResultCode;
use crate::config::DEFAULT_PORT;
use crate::driver::commands::{
    validate_reboot_delay,
    Command,
};
use crate::errors::ApcError;
use crate::notifier::Notifier;
use crate::outlet::Outlet;
use crate::response::{
    MatchKind,
    Response,
};
use log::{
    debug,
    info,
    warn,
};
use regex::bytes::Regex;

/// Args are standard driver args that will be stored with a driver object.
pub struct Args {
    /// The host the driver is connecting to.
    pub host: String,
    /// The port on the host the driver is connecting to.
    pub port: u16,
}

impl Args {
    /// Return a new instance of `Args` -- would be just a default impl but we require the host be
    /// set, so we just have this method.
    #[must_use]
    pub fn new(host: &str) -> Self {
        Self {
            host: host.to_owned(),
            port: DEFAULT_PORT,
        }
    }
}

/// A pattern to wait for, and what it means when it is the one that shows up.
type Expect = (Regex, MatchKind);

/// The usual race after an outlet command: success, bad outlet reference, or any other error
/// code.
fn outcome_expectations() -> Vec<Expect> {
    vec![
        (success_pattern(), MatchKind::Success),
        (outlet_error_pattern(), MatchKind::OutletError),
        (device_error_pattern(), MatchKind::DeviceError),
    ]
}

/// Pulls the state (e.g. "On") off the end of an outlet status line like " 5: Outlet 5: On".
fn status_state(line: &str) -> &str {
    let state = line.rsplit(':').next().unwrap_or(line).trim();

    if state.is_empty() {
        line.trim()
    } else {
        state
    }
}

/// Driver is the APC command dispatcher -- it knows the console's outlet commands and what the
/// device answers to each of them, and reports outcomes through its `Notifier`.
pub struct Driver {
    /// The standard driver args.
    pub args: Args,
    /// The channel the driver interacts with.
    pub channel: Channel,
    notifier: Box<dyn Notifier>,
}

impl Driver {
    /// Create a new Driver instance.
    #[must_use]
    pub fn new(
        args: Args,
        channel: Channel,
        notifier: Box<dyn Notifier>,
    ) -> Self {
        Self {
            args,
            channel,
            notifier,
        }
    }

    /// The notifier outcomes are reported through.
    #[must_use]
    pub fn notifier(&self) -> &dyn Notifier {
        self.notifier.as_ref()
    }

    /// Open the driver -- connect and log in.
    ///
    /// # Errors
    ///
    /// Returns `ApcError::ConnectionTimeout` if the login handshake stalls, or a transport error.
    pub fn open(&mut self) -> Result<(), ApcError> {
        self.notifier
            .info(&format!("Connecting to APC @ {}", self.args.host));

        debug!(
            "opening connection to host {} on port {}",
            self.args.host, self.args.port
        );

        self.channel.open()?;

        info!("connection opened successfully");

        Ok(())
    }

    /// Log out and close the connection. Failing to send the logout or end-of-input (the
    /// connection may already be dead) is logged, not returned; closing an already closed driver
    /// is a no-op.
    ///
    /// # Errors
    ///
    /// Returns an `ApcError` if the underlying transport fails to close.
    pub fn close(&mut self) -> Result<(), ApcError> {
        if !self.channel.is_open() {
            return self.channel.close();
        }

        debug!(
            "closing connection to host {} on port {}",
            self.args.host, self.args.port
        );

        if let Err(err) = self
            .channel
            .write_and_return(Command::Logout.to_string().as_bytes())
        {
            warn!("failed sending logout, error: {err}");
        }

        if let Err(err) = self.channel.send_eof() {
            warn!("failed sending end of input, error: {err}");
        }

        if self.channel.args.verbose {
            info!("[{}]", String::from_utf8_lossy(&self.channel.drain()));
        }

        self.channel.close()?;

        self.notifier
            .info(&format!("DISCONNECTED from {}", self.args.host));

        info!("connection closed successfully");

        Ok(())
    }

    /// Send `commands` in order, then wait once for whichever of `expectations` shows up first.
    /// A wait that times out is recorded in the returned `Response` rather than raised.
    ///
    /// # Errors
    ///
    /// Returns an `ApcError` if writing or reading the transport fails.
    fn exchange(
        &mut self,
        commands: &[Command],
        expectations: &[Expect],
    ) -> Result<Response, ApcError> {
        let input = commands
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<String>>()
            .join("; ");

        info!("sending '{}'", input);

        let mut resp = Response::new(&input, &self.args.host);

        for command in commands {
            self.channel
                .write_and_return(command.to_string().as_bytes())?;
        }

        let patterns = expectations
            .iter()
            .map(|(pattern, _)| pattern.clone())
            .collect::<Vec<Regex>>();

        let timeout = self.channel.args.timeout_ops;

        match self.channel.read_until_any(&patterns, timeout) {
            Ok(found) => {
                let kind = expectations
                    .get(found.index)
                    .map_or(MatchKind::DeviceError, |(_, kind)| *kind);

                resp.record(kind, found.before, &found.matched);
            }
            Err(err) if err.is_timeout() => {
                warn!("'{}' timed out, error: {err}", input);

                resp.record_timeout();
            }
            Err(err) => return Err(err),
        }

        debug!("'{}' ended with {:?}", input, resp.kind);

        Ok(resp)
    }

    /// Turn a finished exchange into the operation result: success passes through, anything
    /// else becomes the matching error.
    fn check(
        resp: Response,
        outlet: &Outlet,
        waiting_for: &str,
    ) -> Result<Response, ApcError> {
        match resp.kind {
            MatchKind::Success => Ok(resp),
            MatchKind::OutletError => Err(ApcError::BadOutlet(outlet.argument())),
            MatchKind::DeviceError => {
                let code = resp.matched.split(':').next().unwrap_or_default();

                let details = ResultCode::from_code(code)
                    .map_or_else(|| resp.matched.clone(), |code| code.to_string());

                Err(ApcError::CommandFailure {
                    command: resp.input,
                    details,
                })
            }
            MatchKind::Timeout => Err(ApcError::CommandTimeout {
                command: resp.input,
                waiting_for: waiting_for.to_owned(),
            }),
        }
    }

    /// Query the status of an outlet (or of all outlets).
    ///
    /// For one outlet the outlet's status line is raced against the "bad reference" code; the
    /// status line wins if the outlet exists. For all outlets exactly one raw line following the
    /// success code is returned, unparsed.
    ///
    /// # Errors
    ///
    /// Returns `ApcError::BadOutlet` for an unparseable token or an outlet the device rejects,
    /// `ApcError::CommandTimeout` if the device does not answer in time.
    pub fn status(
        &mut self,
        token: &str,
    ) -> Result<Response, ApcError> {
        let outlet = Outlet::resolve(token)?;
        let timeout = self.channel.args.timeout_ops;

        match outlet {
            Outlet::Indexed(n) => {
                let status = outlet_status_pattern(n);
                let waiting_for = format!("'{n}:'");

                let resp = self.exchange(
                    &[Command::Status(outlet)],
                    &[
                        (status, MatchKind::Success),
                        (outlet_error_pattern(), MatchKind::OutletError),
                    ],
                )?;

                let mut resp = Self::check(resp, &outlet, &waiting_for)?;

                let rest = self.channel.read_line(timeout).map_err(|err| {
                    if err.is_timeout() {
                        ApcError::CommandTimeout {
                            command: resp.input.clone(),
                            waiting_for: String::from("end of the status line"),
                        }
                    } else {
                        err
                    }
                })?;

                resp.result = format!("{}{}", resp.matched, rest).trim().to_owned();

                self.notifier
                    .notify(&outlet.label(), status_state(&resp.result));

                Ok(resp)
            }
            Outlet::All => {
                let resp = self.exchange(&[Command::Status(outlet)], &outcome_expectations())?;

                let mut resp = Self::check(resp, &outlet, SUCCESS_CODE)?;

                let line = self
                    .channel
                    .read_line(timeout)
                    .and_then(|_| self.channel.read_line(timeout))
                    .map_err(|err| {
                        if err.is_timeout() {
                            ApcError::CommandTimeout {
                                command: resp.input.clone(),
                                waiting_for: String::from("a status line"),
                            }
                        } else {
                            err
                        }
                    })?;

                resp.result = line.trim().to_owned();

                self.notifier.notify(&outlet.label(), &resp.result);

                Ok(resp)
            }
        }
    }

    /// Switch an outlet (or all outlets) on or off.
    ///
    /// # Errors
    ///
    /// Returns `ApcError::BadOutlet` for an unparseable token or an outlet the device rejects,
    /// `ApcError::CommandFailure` for any other error code, `ApcError::CommandTimeout` if no
    /// success code arrives in time.
    pub fn set_power(
        &mut self,
        token: &str,
        on: bool,
    ) -> Result<Response, ApcError> {
        let outlet = Outlet::resolve(token)?;

        let (command, state) = if on {
            (Command::On(outlet), "On")
        } else {
            (Command::Off(outlet), "Off")
        };

        let resp = self.exchange(&[command], &outcome_expectations())?;
        let resp = Self::check(resp, &outlet, SUCCESS_CODE)?;

        self.notifier.notify(&outlet.label(), state);

        Ok(resp)
    }

    /// Switch an outlet on -- see `set_power`.
    ///
    /// # Errors
    ///
    /// See `set_power`.
    pub fn on(
        &mut self,
        token: &str,
    ) -> Result<Response, ApcError> {
        self.set_power(token, true)
    }

    /// Switch an outlet off -- see `set_power`.
    ///
    /// # Errors
    ///
    /// See `set_power`.
    pub fn off(
        &mut self,
        token: &str,
    ) -> Result<Response, ApcError> {
        self.set_power(token, false)
    }

    /// Reboot an outlet: set its reboot delay to `delay_secs`, trigger the reboot, then wait once
    /// for the success code. Nothing is sent if the delay is outside `[5, 60]`.
    ///
    /// # Errors
    ///
    /// Returns `ApcError::InvalidDelay` for an out of range delay, otherwise as `set_power`.
    pub fn reboot(
        &mut self,
        token: &str,
        delay_secs: u32,
    ) -> Result<Response, ApcError> {
        let outlet = Outlet::resolve(token)?;
        let delay_secs = validate_reboot_delay(delay_secs)?;

        let resp = self.exchange(
            &[
                Command::RebootDelay(outlet, delay_secs),
                Command::Reboot(outlet),
            ],
            &outcome_expectations(),
        )?;
        let resp = Self::check(resp, &outlet, SUCCESS_CODE)?;

        self.notifier.notify(&outlet.label(), "Rebooted");

        Ok(resp)
    }
}
