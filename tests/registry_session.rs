//! Integration tests over the settings registry and the session engine,
//! using the mock port in place of hardware.

use comterm::port::MockSerialPort;
use comterm::session::{PortMode, SerialSession};
use comterm::settings::{keys, SettingsRegistry};
use comterm::{DataBits, Parity, StopBits};
use pretty_assertions::assert_eq;
use std::sync::mpsc;
use std::time::{Duration, Instant};

fn drain(rx: &mpsc::Receiver<Vec<u8>>, at_least: usize) -> Vec<u8> {
    let mut out = Vec::new();
    let deadline = Instant::now() + Duration::from_secs(2);
    while out.len() < at_least && Instant::now() < deadline {
        if let Ok(chunk) = rx.recv_timeout(Duration::from_millis(20)) {
            out.extend(chunk);
        }
    }
    out
}

#[test]
fn registry_snapshot_feeds_the_session_config() {
    let mut registry = SettingsRegistry::with_defaults();
    registry.get_mut(keys::PORT).set("/dev/ttyUSB0").unwrap();

    let config = registry.serial_config();
    assert_eq!(config.port, "/dev/ttyUSB0");
    assert_eq!(config.baud_rate, 9600);
    assert_eq!(config.parity, Parity::None);
    assert_eq!(config.data_bits, DataBits::Eight);
    assert_eq!(config.stop_bits, StopBits::One);
}

#[test]
fn raw_session_round_trip_over_mock_device() {
    let mock = MockSerialPort::new("MOCK0");
    let mut session =
        SerialSession::from_adapter(Box::new(mock.clone()), PortMode::Raw, PortMode::Raw);

    let (tx, rx) = mpsc::channel();
    session
        .start_reading(move |bytes| {
            let _ = tx.send(bytes);
        })
        .unwrap();

    mock.enqueue_read(b"pong\r\n");
    assert_eq!(drain(&rx, 6), b"pong\r\n");

    session.write_encoded("ping").unwrap();
    assert_eq!(mock.written_bytes(), b"ping");

    session.close().unwrap();
    assert!(!session.is_running());
}

#[test]
fn hex_session_encodes_rx_and_decodes_tx() {
    let mock = MockSerialPort::new("MOCK0");
    let mut session =
        SerialSession::from_adapter(Box::new(mock.clone()), PortMode::Hex, PortMode::Hex);

    let (tx, rx) = mpsc::channel();
    session
        .start_reading(move |bytes| {
            let _ = tx.send(bytes);
        })
        .unwrap();

    // RX is forwarded as lowercase hex text.
    mock.enqueue_read(&[0x0a, 0xff]);
    assert_eq!(drain(&rx, 4), b"0aff");

    // TX "0a ff" reaches the device as the two decoded bytes.
    session.write_encoded("0a ff").unwrap();
    assert_eq!(mock.written_bytes(), vec![0x0a, 0xff]);

    session.close().unwrap();
}

#[test]
fn hex_text_round_trips_through_the_codec() {
    let original = [0x0a, 0xff];
    let encoded = hex::encode(original);
    assert_eq!(encoded, "0aff");

    let spaced = "0a ff".replace(' ', "");
    assert_eq!(hex::decode(spaced).unwrap(), original);

    assert!(hex::decode("0af").is_err());
    assert!(hex::decode("zz").is_err());
}

#[test]
fn session_settings_are_frozen_at_connect_time() {
    let mut registry = SettingsRegistry::with_defaults();
    registry.get_mut(keys::INPUT_MODE).set("HEX").unwrap();

    let mock = MockSerialPort::new("MOCK0");
    let mut session = SerialSession::from_adapter(
        Box::new(mock.clone()),
        registry.display_mode(),
        registry.input_mode(),
    );

    // Changing the registry afterwards must not affect the running session.
    registry.get_mut(keys::INPUT_MODE).set("RAW").unwrap();

    session.write_encoded("41").unwrap();
    assert_eq!(mock.written_bytes(), b"A");
}
