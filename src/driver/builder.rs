use crate::channel::{
    Args as ChannelArgs,
    Channel,
};
use crate::config::Config;
use crate::driver::driver::{
    Args,
    Driver,
};
use crate::notifier::{
    Console,
    Notifier,
};
use crate::transport::base::{
    Transport,
    TransportArgs,
};
use crate::transport::system::{
    System,
    SystemArgs,
};
use core::time::Duration;

/// `Builder` is a struct that holds a bunch of settings/defaults that can be used to build a
/// `Driver` object.
pub struct Builder {
    args: Args,
    channel_args: ChannelArgs,
    transport_args: TransportArgs,
    transport_system_args: SystemArgs,
    quiet: bool,
    notifier: Option<Box<dyn Notifier>>,
}

#[allow(clippy::missing_const_for_fn)]
#[allow(clippy::return_self_not_must_use)]
#[allow(clippy::must_use_candidate)]
impl Builder {
    /// Return a new instance of `Builder` with sane defaults set.
    pub fn new(host: &str) -> Self {
        Self {
            args: Args::new(host),
            channel_args: ChannelArgs::default(),
            transport_args: TransportArgs::new(host),
            transport_system_args: SystemArgs::default(),
            quiet: false,
            notifier: None,
        }
    }

    /// Return a `Builder` with everything set from `config`.
    pub fn from_config(config: &Config) -> Self {
        Self::new(&config.host)
            .port(config.port)
            .user(&config.user)
            .password(&config.password)
            .verbose(config.verbose)
            .quiet(config.quiet)
            .timeout_ops(config.timeout_ops())
            .return_char(&config.return_char)
            .system_open_bin(&config.telnet_bin)
            .system_extra_args(config.telnet_args.clone())
    }

    /// Sets the port to connect to.
    pub fn port(
        mut self,
        i: u16,
    ) -> Self {
        self.args.port = i;
        self.transport_args.port = i;

        self
    }

    /// Sets the user(name) to log in as.
    pub fn user(
        mut self,
        s: &str,
    ) -> Self {
        self.transport_args.user = s.to_owned();

        self
    }

    /// Sets the password to log in with.
    pub fn password(
        mut self,
        s: &str,
    ) -> Self {
        self.transport_args.password = s.to_owned();

        self
    }

    /// Sets the `timeout_ops` of the underlying channel -- the bound on every handshake step and
    /// every command exchange.
    pub fn timeout_ops(
        mut self,
        d: Duration,
    ) -> Self {
        self.channel_args.timeout_ops = d;

        self
    }

    /// Sets the `read_delay` of the underlying channel.
    pub fn read_delay(
        mut self,
        d: Duration,
    ) -> Self {
        self.channel_args.read_delay = d;

        self
    }

    /// Sets the `return_char` of the channel object.
    pub fn return_char(
        mut self,
        s: &str,
    ) -> Self {
        self.channel_args.return_char = s.to_owned();

        self
    }

    /// Echo the device output that preceded the last match before every send.
    pub fn verbose(
        mut self,
        b: bool,
    ) -> Self {
        self.channel_args.verbose = b;

        self
    }

    /// Suppress progress messages of the default console notifier.
    pub fn quiet(
        mut self,
        b: bool,
    ) -> Self {
        self.quiet = b;

        self
    }

    /// Report outcomes through `n` instead of the default console notifier.
    pub fn notifier(
        mut self,
        n: Box<dyn Notifier>,
    ) -> Self {
        self.notifier = Some(n);

        self
    }

    /// Set the `open_bin` setting of the `System` transport.
    pub fn system_open_bin(
        mut self,
        s: &str,
    ) -> Self {
        self.transport_system_args.open_bin = s.to_owned();

        self
    }

    /// Set the `extra_args` setting of the `System` transport -- options for the telnet client,
    /// placed before the host and port.
    pub fn system_extra_args(
        mut self,
        v: Vec<String>,
    ) -> Self {
        self.transport_system_args.extra_args = v;

        self
    }

    /// Build "builds" and returns a Driver object talking through the system telnet client.
    #[must_use]
    pub fn build(mut self) -> Driver {
        let transport_args = core::mem::replace(
            &mut self.transport_args,
            TransportArgs::new(&self.args.host),
        );
        let system_args = core::mem::take(&mut self.transport_system_args);

        self.build_with_transport(System::new(transport_args, system_args))
    }

    /// Builds a Driver object talking through `t`; the credentials set on the builder are ignored
    /// in favor of the ones `t` reports.
    #[must_use]
    pub fn build_with_transport(
        self,
        t: impl Transport + 'static,
    ) -> Driver {
        let notifier = self
            .notifier
            .unwrap_or_else(|| Box::new(Console::new(&self.args.host, self.quiet)));

        Driver::new(self.args, Channel::new(self.channel_args, t), notifier)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_config() {
        let config = Config {
            host: String::from("pdu.lab"),
            port: 2323,
            verbose: true,
            timeout_ops_secs: 3,
            telnet_args: vec![String::from("-E")],
            ..Config::default()
        };

        let builder = Builder::from_config(&config);

        assert_eq!(builder.args.host, "pdu.lab");
        assert_eq!(builder.args.port, 2323);
        assert_eq!(builder.transport_args.port, 2323);
        assert_eq!(builder.transport_args.user, "apc");
        assert_eq!(builder.channel_args.timeout_ops, Duration::from_secs(3));
        assert!(builder.channel_args.verbose);
        assert_eq!(builder.transport_system_args.open_bin, "telnet");
        assert_eq!(builder.transport_system_args.extra_args, vec!["-E"]);
    }
}
