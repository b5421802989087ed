use super::read_until::Expectation;
use super::{
    Channel,
    SessionState,
};
use crate::channel::patterns::version_pattern;
use crate::errors::ApcError;
use log::{
    debug,
    info,
};
use regex::bytes::Regex;

impl Channel {
    /// Wait for the prompt that ends the current handshake step. A timeout becomes a
    /// `ConnectionTimeout` naming the step.
    fn await_step(
        &mut self,
        pattern: &Regex,
    ) -> Result<Expectation, ApcError> {
        let step = self.state.to_string();
        let timeout = self.args.timeout_ops;

        self.read_until_any(&[pattern.clone()], timeout)
            .map_err(|err| {
                if err.is_timeout() {
                    ApcError::ConnectionTimeout {
                        host: self.transport.get_host(),
                        step,
                    }
                } else {
                    err
                }
            })
    }

    fn record_banner(
        &mut self,
        banner: &[u8],
    ) {
        self.firmware_version = version_pattern()
            .captures(banner)
            .and_then(|caps| caps.get(1))
            .map(|m| String::from_utf8_lossy(m.as_bytes()).into_owned());

        match &self.firmware_version {
            Some(version) => info!("device reports firmware v{}", version),
            None => debug!("no firmware version found in login banner"),
        }
    }

    /// Drive the login handshake from `AwaitingUsername` to `Ready`. Each step waits (bounded by
    /// `timeout_ops`) for its prompt before sending anything, so a missing prompt stops the
    /// handshake right there.
    pub(super) fn handshake(&mut self) -> Result<(), ApcError> {
        let auth = self.transport.in_channel_auth_data();

        self.state = SessionState::AwaitingUsername;

        loop {
            let next = match self.state {
                SessionState::AwaitingUsername => {
                    let pattern = self.args.username_pattern.clone();
                    self.await_step(&pattern)?;

                    self.write_and_return(auth.user.as_bytes())?;

                    SessionState::AwaitingPassword
                }
                SessionState::AwaitingPassword => {
                    let pattern = self.args.password_pattern.clone();
                    self.await_step(&pattern)?;

                    self.write_and_return(auth.password.as_bytes())?;
                    // the console wants one more (empty) line before it shows the prompt
                    self.write_return()?;

                    SessionState::AwaitingPrompt
                }
                SessionState::AwaitingPrompt => {
                    let pattern = self.args.prompt_pattern.clone();
                    let found = self.await_step(&pattern)?;

                    self.record_banner(&found.before);

                    SessionState::Ready
                }
                SessionState::Ready => return Ok(()),
                SessionState::Disconnected | SessionState::Connecting => {
                    return Err(ApcError::transport(format!(
                        "handshake cannot continue from state '{}'",
                        self.state
                    )));
                }
            };

            debug!("session state '{}' -> '{}'", self.state, next);

            self.state = next;
        }
    }
}
