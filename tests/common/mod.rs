#![allow(dead_code)]

use apcrs::driver::{
    Builder,
    Driver,
};
use apcrs::errors::ApcError;
use apcrs::lock::{
    LockArgs,
    SessionLock,
};
use apcrs::notifier::{
    format_outcome,
    Notifier,
};
use apcrs::transport::base::{
    InChannelAuthData,
    Transport,
};
use std::sync::{
    Arc,
    Mutex,
};
use std::time::Duration;

pub const HOST: &str = "pdu.test";
pub const OUTLETS: i64 = 8;

const BANNER: &str = "\r\n\r\nAmerican Power Conversion               Network Management Card AOS      v3.7.4\r\n\
(c) Copyright 2011 All Rights Reserved    Rack PDU APP                     v3.7.4\r\n\
-------------------------------------------------------------------------------\r\n\
Name      : pdu-lab                                   Date : 10/19/2026\r\n\
Type 'help' for a list of commands\r\n\r\napc>";

/// Where the scripted console stops talking during the login.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stall {
    Username,
    Password,
    Prompt,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stage {
    Username,
    Password,
    Blank,
    Ready,
    LoggedOut,
}

/// Everything the scripted console saw and did, shared with the test.
#[derive(Debug)]
pub struct ConsoleState {
    pub sent: Vec<String>,
    pub eof: bool,
    pub opened: bool,
    pub closed: bool,
    pub close_calls: u32,
    pub outlets: Vec<bool>,
    partial: String,
    pending: Vec<u8>,
    stage: Stage,
    dead: bool,
    hung_up: bool,
}

/// A scripted APC console implementing `Transport` entirely in memory.
#[derive(Clone)]
pub struct FakeConsole {
    pub state: Arc<Mutex<ConsoleState>>,
    stall: Option<Stall>,
    silent_commands: bool,
    die_on_command: bool,
    device_error: Option<&'static str>,
    refuse_with: Option<&'static str>,
}

impl FakeConsole {
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(ConsoleState {
                sent: vec![],
                eof: false,
                opened: false,
                closed: false,
                close_calls: 0,
                outlets: vec![true; OUTLETS as usize],
                partial: String::new(),
                pending: vec![],
                stage: Stage::Username,
                dead: false,
                hung_up: false,
            })),
            stall: None,
            silent_commands: false,
            die_on_command: false,
            device_error: None,
            refuse_with: None,
        }
    }

    /// Print `message` and hang up as soon as the connection is opened, the way a telnet client
    /// does when the device cannot be reached.
    pub fn refuse_with(
        mut self,
        message: &'static str,
    ) -> Self {
        self.refuse_with = Some(message);

        self
    }

    /// Never show the given login prompt.
    pub fn stall_at(
        mut self,
        stall: Stall,
    ) -> Self {
        self.stall = Some(stall);

        self
    }

    /// Log in fine, but never answer an outlet command.
    pub fn silent_commands(mut self) -> Self {
        self.silent_commands = true;

        self
    }

    /// Drop the connection as soon as an outlet command arrives.
    pub fn die_on_command(mut self) -> Self {
        self.die_on_command = true;

        self
    }

    /// Answer every outlet command with this error code line.
    pub fn device_error(
        mut self,
        line: &'static str,
    ) -> Self {
        self.device_error = Some(line);

        self
    }

    pub fn sent(&self) -> Vec<String> {
        self.state.lock().unwrap().sent.clone()
    }

    pub fn closed(&self) -> bool {
        self.state.lock().unwrap().closed
    }

    pub fn opened(&self) -> bool {
        self.state.lock().unwrap().opened
    }

    pub fn eof(&self) -> bool {
        self.state.lock().unwrap().eof
    }

    pub fn outlet_on(
        &self,
        n: usize,
    ) -> bool {
        self.state.lock().unwrap().outlets[n - 1]
    }

    fn stalls_at(
        &self,
        stall: Stall,
    ) -> bool {
        self.stall == Some(stall)
    }

    fn respond(
        &self,
        state: &mut ConsoleState,
        line: &str,
    ) {
        state.sent.push(line.to_owned());

        match state.stage {
            Stage::Username => {
                state.stage = Stage::Password;

                if !self.stalls_at(Stall::Password) {
                    state.pending.extend(b"\r\nPassword  : ");
                }
            }
            Stage::Password => {
                state.stage = Stage::Blank;
            }
            Stage::Blank => {
                state.stage = Stage::Ready;

                if !self.stalls_at(Stall::Prompt) {
                    state.pending.extend(BANNER.as_bytes());
                }
            }
            Stage::Ready => self.run_command(state, line),
            Stage::LoggedOut => {}
        }
    }

    fn run_command(
        &self,
        state: &mut ConsoleState,
        line: &str,
    ) {
        state.pending.extend(format!("{line}\r\n").as_bytes());

        if line == "bye" {
            state.stage = Stage::LoggedOut;
            state.pending.extend(b"\r\nBye.\r\n\r\nConnection Closed - Bye\r\n");

            return;
        }

        if self.die_on_command {
            state.dead = true;

            return;
        }

        if self.silent_commands {
            return;
        }

        let words = line.split_whitespace().collect::<Vec<&str>>();
        let (command, outlet) = match words.as_slice() {
            [command, outlet, ..] => (*command, *outlet),
            [command] => (*command, ""),
            [] => {
                state.pending.extend(b"\r\napc>");

                return;
            }
        };

        let targets = match outlet {
            "all" => Some((1..=OUTLETS).collect::<Vec<i64>>()),
            n => n
                .parse::<i64>()
                .ok()
                .filter(|n| (1..=OUTLETS).contains(n))
                .map(|n| vec![n]),
        };

        let reply = match (targets, self.device_error) {
            (_, Some(error)) => format!("{error}\r\n"),
            (None, None) => String::from("E102: Parameter Error\r\n"),
            (Some(targets), None) => {
                let mut reply = String::from("E000: Success\r\n");

                for n in targets {
                    let index = (n - 1) as usize;

                    match command {
                        "olOn" => state.outlets[index] = true,
                        "olOff" => state.outlets[index] = false,
                        "olStatus" => {
                            let status = if state.outlets[index] { "On" } else { "Off" };
                            reply.push_str(&format!(" {n}: Outlet {n}: {status}\r\n"));
                        }
                        _ => {}
                    }
                }

                reply
            }
        };

        state.pending.extend(reply.as_bytes());
        state.pending.extend(b"\r\napc>");
    }
}

fn dead_connection() -> ApcError {
    ApcError::Transport {
        details: String::from("connection reset by peer"),
    }
}

impl Transport for FakeConsole {
    fn open(&mut self) -> Result<(), ApcError> {
        let mut state = self.state.lock().unwrap();

        state.opened = true;

        if let Some(message) = self.refuse_with {
            state.pending.extend(format!("Trying 192.0.2.1...\r\n{message}\r\n").as_bytes());
            state.hung_up = true;

            return Ok(());
        }

        if !self.stalls_at(Stall::Username) {
            state.pending.extend(b"\r\nUser Name : ");
        }

        Ok(())
    }

    fn close(&mut self) -> Result<(), ApcError> {
        let mut state = self.state.lock().unwrap();

        state.closed = true;
        state.close_calls += 1;

        Ok(())
    }

    fn alive(&mut self) -> bool {
        let state = self.state.lock().unwrap();

        state.opened && !state.closed && !state.dead
    }

    fn read(&mut self) -> Result<Vec<u8>, ApcError> {
        self.read_n(u16::MAX)
    }

    fn read_n(
        &mut self,
        n: u16,
    ) -> Result<Vec<u8>, ApcError> {
        let mut state = self.state.lock().unwrap();

        if state.dead {
            return Err(dead_connection());
        }

        if state.hung_up && state.pending.is_empty() {
            return Err(ApcError::ConnectionClosed {
                host: HOST.to_owned(),
                output: String::new(),
            });
        }

        let n = state.pending.len().min(n as usize);

        Ok(state.pending.drain(..n).collect())
    }

    fn write(
        &mut self,
        b: &[u8],
    ) -> Result<(), ApcError> {
        let mut state = self.state.lock().unwrap();

        if state.dead || state.closed || state.hung_up {
            return Err(dead_connection());
        }

        for byte in b {
            match byte {
                0x04 => state.eof = true,
                b'\n' => {
                    let line = core::mem::take(&mut state.partial);
                    let line = line.trim_end_matches('\r').to_owned();

                    self.respond(&mut state, &line);
                }
                _ => state.partial.push(char::from(*byte)),
            }
        }

        Ok(())
    }

    fn get_host(&self) -> String {
        HOST.to_owned()
    }

    fn get_port(&self) -> u16 {
        23
    }

    fn in_channel_auth_data(&self) -> InChannelAuthData {
        InChannelAuthData {
            user: String::from("apc"),
            password: String::from("apc"),
        }
    }
}

#[derive(Debug, Default)]
pub struct LockState {
    pub held_elsewhere: bool,
    pub held: bool,
    pub tries: u32,
    pub acquisitions: u32,
    pub releases: u32,
}

/// An in-memory `SessionLock` recording what happened to it.
#[derive(Clone, Default)]
pub struct MemoryLock {
    pub state: Arc<Mutex<LockState>>,
}

impl MemoryLock {
    pub fn held_elsewhere() -> Self {
        let lock = Self::default();

        lock.state.lock().unwrap().held_elsewhere = true;

        lock
    }

    pub fn held(&self) -> bool {
        self.state.lock().unwrap().held
    }

    pub fn acquisitions(&self) -> u32 {
        self.state.lock().unwrap().acquisitions
    }

    pub fn releases(&self) -> u32 {
        self.state.lock().unwrap().releases
    }

    pub fn tries(&self) -> u32 {
        self.state.lock().unwrap().tries
    }
}

impl SessionLock for MemoryLock {
    fn try_lock(&mut self) -> Result<bool, ApcError> {
        let mut state = self.state.lock().unwrap();

        state.tries += 1;

        if state.held_elsewhere || state.held {
            return Ok(false);
        }

        state.held = true;
        state.acquisitions += 1;

        Ok(true)
    }

    fn unlock(&mut self) -> Result<(), ApcError> {
        let mut state = self.state.lock().unwrap();

        state.held = false;
        state.releases += 1;

        Ok(())
    }

    fn describe(&self) -> String {
        String::from("memory")
    }
}

/// A `Notifier` keeping every line it was handed.
#[derive(Clone, Default)]
pub struct RecordingNotifier {
    pub outcomes: Arc<Mutex<Vec<String>>>,
    pub progress: Arc<Mutex<Vec<String>>>,
}

impl RecordingNotifier {
    pub fn outcomes(&self) -> Vec<String> {
        self.outcomes.lock().unwrap().clone()
    }

    pub fn progress(&self) -> Vec<String> {
        self.progress.lock().unwrap().clone()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(
        &self,
        outlet_label: &str,
        state: &str,
    ) {
        self.outcomes
            .lock()
            .unwrap()
            .push(format_outcome(HOST, outlet_label, state));
    }

    fn info(
        &self,
        msg: &str,
    ) {
        self.progress.lock().unwrap().push(msg.to_owned());
    }
}

/// A driver over `console` with short timeouts, reporting to `notifier`.
pub fn driver(
    console: &FakeConsole,
    notifier: &RecordingNotifier,
) -> Driver {
    Builder::new(HOST)
        .timeout_ops(Duration::from_millis(300))
        .read_delay(Duration::from_millis(1))
        .notifier(Box::new(notifier.clone()))
        .build_with_transport(console.clone())
}

pub fn lock_args() -> LockArgs {
    LockArgs {
        attempts: 3,
        poll_interval: Duration::from_millis(5),
    }
}
