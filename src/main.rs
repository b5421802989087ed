use apcrs::action::Action;
use apcrs::config::Config;
use apcrs::driver::Builder;
use apcrs::errors::ApcError;
use apcrs::lock::{
    FileLock,
    LockArgs,
};
use apcrs::session;
use clap::{
    ArgGroup,
    Parser,
};
use env_logger::Target;
use log::LevelFilter;
use std::env;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser, Debug)]
#[command(name = "apc", about = "APC switched PDU command line", version)]
#[command(group(ArgGroup::new("action").required(true)))]
struct Cli {
    /// Override the host
    #[arg(long)]
    host: Option<String>,

    /// Override the username
    #[arg(long)]
    user: Option<String>,

    /// Override the password
    #[arg(long)]
    password: Option<String>,

    /// Override the telnet port
    #[arg(long)]
    port: Option<u16>,

    /// Read settings from a yaml file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Verbose messages
    #[arg(short, long)]
    verbose: bool,

    /// Quiet
    #[arg(long)]
    quiet: bool,

    /// Reboot an outlet, optionally with the off time in seconds (5 to 60, default 5)
    #[arg(long, value_name = "OUTLET[,SECS]", group = "action")]
    reboot: Option<String>,

    /// Turn on an outlet
    #[arg(long, value_name = "OUTLET", group = "action")]
    on: Option<String>,

    /// Turn off an outlet
    #[arg(long, value_name = "OUTLET", group = "action")]
    off: Option<String>,

    /// Get the status of an outlet. Enter number 1 to 8 or all
    #[arg(long, value_name = "OUTLET", group = "action")]
    get: Option<String>,
}

/// Log to stderr at warn, debug with --verbose, error with --quiet; RUST_LOG directives win.
fn enable_logging(cli: &Cli) {
    let level = if cli.verbose {
        LevelFilter::Debug
    } else if cli.quiet {
        LevelFilter::Error
    } else {
        LevelFilter::Warn
    };

    let mut builder = env_logger::Builder::new();

    builder.target(Target::Stderr);
    builder.filter_level(level);
    builder.parse_default_env();

    builder.init();
}

/// Defaults, then the config file, then the environment, then flags.
fn load_config(cli: &Cli) -> Result<Config, ApcError> {
    let config = match &cli.config {
        Some(path) => Config::from_file(path)?,
        None => Config::default(),
    };

    let mut config = config.apply_env(|key| env::var(key).ok());

    if let Some(host) = &cli.host {
        config.host = host.clone();
    }

    if let Some(user) = &cli.user {
        config.user = user.clone();
    }

    if let Some(password) = &cli.password {
        config.password = password.clone();
    }

    if let Some(port) = cli.port {
        config.port = port;
    }

    config.verbose |= cli.verbose;
    config.quiet |= cli.quiet;

    Ok(config)
}

fn requested_action(cli: &Cli) -> Result<Action, ApcError> {
    if let Some(arg) = &cli.reboot {
        return Action::reboot_from_arg(arg);
    }

    if let Some(outlet) = &cli.on {
        return Ok(Action::On(outlet.clone()));
    }

    if let Some(outlet) = &cli.off {
        return Ok(Action::Off(outlet.clone()));
    }

    cli.get
        .as_ref()
        .map(|outlet| Action::Get(outlet.clone()))
        .ok_or_else(|| ApcError::Config {
            details: String::from("no action requested"),
        })
}

fn run(cli: &Cli) -> Result<(), ApcError> {
    let config = load_config(cli)?;
    let action = requested_action(cli)?;

    let driver = Builder::from_config(&config).build();
    let lock = Box::new(FileLock::new(&config.lock_path));
    let lock_args = LockArgs {
        attempts: config.lock_attempts,
        poll_interval: config.lock_poll_interval(),
    };

    session::run(driver, lock, &lock_args, |driver| action.apply(driver))?;

    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    enable_logging(&cli);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("ERROR: {err}");

            ExitCode::FAILURE
        }
    }
}
