mod common;

use apcrs::channel::SessionState;
use apcrs::errors::ApcError;
use apcrs::response::MatchKind;
use common::{
    driver,
    FakeConsole,
    RecordingNotifier,
    Stall,
    HOST,
};

#[test]
fn test_handshake_order() {
    let console = FakeConsole::new();
    let notifier = RecordingNotifier::default();
    let mut driver = driver(&console, &notifier);

    driver.open().unwrap();

    assert_eq!(console.sent(), vec!["apc", "apc", ""]);
    assert_eq!(driver.channel.state(), SessionState::Ready);
    assert_eq!(driver.channel.firmware_version(), Some("3.7.4"));
    assert_eq!(notifier.progress(), vec![format!("Connecting to APC @ {HOST}")]);
}

#[test]
fn test_handshake_stops_at_missing_prompt() {
    for (stall, sent, step) in [
        (Stall::Username, vec![], "username"),
        (Stall::Password, vec!["apc"], "password"),
        (Stall::Prompt, vec!["apc", "apc", ""], "command prompt"),
    ] {
        let console = FakeConsole::new().stall_at(stall);
        let notifier = RecordingNotifier::default();
        let mut driver = driver(&console, &notifier);

        let err = driver.open().unwrap_err();

        match err {
            ApcError::ConnectionTimeout { host, step: at } => {
                assert_eq!(host, HOST);
                assert!(at.contains(step), "{at} should name the {step} step");
            }
            other => panic!("expected a connection timeout, got {other:?}"),
        }

        assert_eq!(console.sent(), sent);
        assert_eq!(driver.channel.state(), SessionState::Disconnected);
    }
}

#[test]
fn test_reboot() {
    let console = FakeConsole::new();
    let notifier = RecordingNotifier::default();
    let mut driver = driver(&console, &notifier);

    driver.open().unwrap();
    let resp = driver.reboot("2", 30).unwrap();

    assert_eq!(resp.kind, MatchKind::Success);
    assert_eq!(resp.input, "olRbootTime 2 30; olReboot 2");
    assert_eq!(
        &console.sent()[3..],
        &["olRbootTime 2 30", "olReboot 2"]
    );
    assert_eq!(notifier.outcomes(), vec![format!("{HOST}: Outlet #2 Rebooted")]);
}

#[test]
fn test_reboot_all_outlets() {
    let console = FakeConsole::new();
    let notifier = RecordingNotifier::default();
    let mut driver = driver(&console, &notifier);

    driver.open().unwrap();
    driver.reboot("+", 5).unwrap();

    assert_eq!(&console.sent()[3..], &["olRbootTime all 5", "olReboot all"]);
    assert_eq!(notifier.outcomes(), vec![format!("{HOST}: ALL outlets Rebooted")]);
}

#[test]
fn test_reboot_invalid_delay_sends_nothing() {
    let console = FakeConsole::new();
    let notifier = RecordingNotifier::default();
    let mut driver = driver(&console, &notifier);

    driver.open().unwrap();

    for secs in [4, 61] {
        assert!(matches!(
            driver.reboot("2", secs),
            Err(ApcError::InvalidDelay(s)) if s == secs
        ));
    }

    assert_eq!(console.sent().len(), 3);
    assert!(notifier.outcomes().is_empty());
}

#[test]
fn test_on_off() {
    let console = FakeConsole::new();
    let notifier = RecordingNotifier::default();
    let mut driver = driver(&console, &notifier);

    driver.open().unwrap();
    driver.off("1").unwrap();

    assert!(!console.outlet_on(1));
    assert_eq!(console.sent().last().unwrap(), "olOff 1");

    driver.on(" 1 ").unwrap();

    assert!(console.outlet_on(1));
    assert_eq!(
        notifier.outcomes(),
        vec![
            format!("{HOST}: Outlet #1 Off"),
            format!("{HOST}: Outlet #1 On"),
        ]
    );
}

#[test]
fn test_device_rejects_outlet() {
    let console = FakeConsole::new();
    let notifier = RecordingNotifier::default();
    let mut driver = driver(&console, &notifier);

    driver.open().unwrap();

    assert!(matches!(
        driver.off("12"),
        Err(ApcError::BadOutlet(outlet)) if outlet == "12"
    ));
    assert!(notifier.outcomes().is_empty());
}

#[test]
fn test_unparseable_outlet_sends_nothing() {
    let console = FakeConsole::new();
    let notifier = RecordingNotifier::default();
    let mut driver = driver(&console, &notifier);

    driver.open().unwrap();

    assert!(matches!(
        driver.on("x"),
        Err(ApcError::BadOutlet(outlet)) if outlet == "x"
    ));
    assert_eq!(console.sent().len(), 3);
}

#[test]
fn test_device_error_code() {
    let console = FakeConsole::new().device_error("E104: User Level Denial");
    let notifier = RecordingNotifier::default();
    let mut driver = driver(&console, &notifier);

    driver.open().unwrap();

    match driver.on("3").unwrap_err() {
        ApcError::CommandFailure { command, details } => {
            assert_eq!(command, "olOn 3");
            assert!(details.contains("E104"));
        }
        other => panic!("expected a command failure, got {other:?}"),
    }
}

#[test]
fn test_command_timeout() {
    let console = FakeConsole::new().silent_commands();
    let notifier = RecordingNotifier::default();
    let mut driver = driver(&console, &notifier);

    driver.open().unwrap();

    assert!(matches!(
        driver.off("1"),
        Err(ApcError::CommandTimeout { command, .. }) if command == "olOff 1"
    ));
}

#[test]
fn test_status_one_outlet() {
    let console = FakeConsole::new();
    let notifier = RecordingNotifier::default();
    let mut driver = driver(&console, &notifier);

    driver.open().unwrap();
    driver.off("5").unwrap();
    let resp = driver.status("5").unwrap();

    assert_eq!(resp.result, "5: Outlet 5: Off");
    assert_eq!(console.sent().last().unwrap(), "olStatus 5");
    assert_eq!(
        notifier.outcomes().last().unwrap(),
        &format!("{HOST}: Outlet #5 Off")
    );
}

#[test]
fn test_status_rejected_outlet() {
    let console = FakeConsole::new();
    let notifier = RecordingNotifier::default();
    let mut driver = driver(&console, &notifier);

    driver.open().unwrap();

    assert!(matches!(
        driver.status("9"),
        Err(ApcError::BadOutlet(outlet)) if outlet == "9"
    ));
}

#[test]
fn test_status_all_outlets() {
    let console = FakeConsole::new();
    let notifier = RecordingNotifier::default();
    let mut driver = driver(&console, &notifier);

    driver.open().unwrap();
    let resp = driver.status("all").unwrap();

    assert_eq!(console.sent().last().unwrap(), "olStatus all");
    assert_eq!(resp.result, "1: Outlet 1: On");
    assert_eq!(
        notifier.outcomes(),
        vec![format!("{HOST}: ALL outlets 1: Outlet 1: On")]
    );
}

#[test]
fn test_close_logs_out_once() {
    let console = FakeConsole::new();
    let notifier = RecordingNotifier::default();
    let mut driver = driver(&console, &notifier);

    driver.open().unwrap();
    driver.close().unwrap();
    driver.close().unwrap();

    assert_eq!(console.sent().last().unwrap(), "bye");
    assert!(console.eof());
    assert!(console.closed());
    assert_eq!(console.state.lock().unwrap().close_calls, 1);
    assert_eq!(
        notifier.progress().last().unwrap(),
        &format!("DISCONNECTED from {HOST}")
    );
}

#[test]
fn test_close_dead_connection() {
    let console = FakeConsole::new().die_on_command();
    let notifier = RecordingNotifier::default();
    let mut driver = driver(&console, &notifier);

    driver.open().unwrap();

    assert!(matches!(
        driver.off("1"),
        Err(ApcError::Transport { .. })
    ));

    driver.close().unwrap();

    assert!(console.closed());
    assert!(!console.eof());
}

#[test]
fn test_connection_closed_before_login() {
    let console = FakeConsole::new()
        .refuse_with("telnet: Unable to connect to remote host: Connection refused");
    let notifier = RecordingNotifier::default();
    let mut driver = driver(&console, &notifier);

    match driver.open().unwrap_err() {
        ApcError::ConnectionClosed { host, output } => {
            assert_eq!(host, HOST);
            assert!(output.contains("Connection refused"), "unexpected output: {output}");
        }
        other => panic!("expected a closed connection, got {other:?}"),
    }

    assert!(console.sent().is_empty());
    assert_eq!(driver.channel.state(), SessionState::Disconnected);

    driver.close().unwrap();

    assert!(console.closed());
}

#[test]
fn test_last_output_is_text_before_last_match() {
    let console = FakeConsole::new();
    let notifier = RecordingNotifier::default();
    let mut driver = driver(&console, &notifier);

    driver.open().unwrap();

    let banner = String::from_utf8_lossy(driver.channel.last_output()).into_owned();
    assert!(banner.contains("Network Management Card AOS"));

    driver.off("1").unwrap();

    let output = String::from_utf8_lossy(driver.channel.last_output()).into_owned();
    assert!(output.contains("olOff 1"));
    assert!(!output.contains("Network Management Card"));
}
