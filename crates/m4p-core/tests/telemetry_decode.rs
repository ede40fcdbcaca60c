//! Integration tests for the m4p-core decode-and-map pipeline.
//!
//! These tests drive raw datagram bytes through [`decode_datagram`] and the
//! [`ActionMapper`], the same path the session loop takes for every frame.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use m4p_core::protocol::datagram::{decode_datagram, Datagram};
use m4p_core::protocol::telemetry::{encode_telemetry, TelemetryField};
use m4p_core::{
    ActionMapper, CalibrationProfile, InboundEvent, KeyName, PointerButton, SemanticAction,
    TelemetryRecord,
};

fn event(bytes: &[u8]) -> InboundEvent {
    match decode_datagram(bytes).expect("datagram must decode") {
        Datagram::Event(event) => event,
        Datagram::KeepAlive => panic!("unexpected keepalive"),
    }
}

/// Wraps a telemetry payload the way the device's companion app sends it.
fn remote_update(payload: &[u8]) -> Vec<u8> {
    format!(
        r#"{{"t":"remote_update","remoteUpdate":{{"payload":"{}"}}}}"#,
        STANDARD.encode(payload)
    )
    .into_bytes()
}

#[test]
fn test_remote_update_datagram_moves_calibrated_pointer() {
    // Arrange
    let mapper = ActionMapper::new(CalibrationProfile::new(2.0, 0.5).unwrap());
    let record = TelemetryRecord {
        return_value: 0x01,
        device_id: 0x02,
        coordinate: [100, 200],
        ..Default::default()
    };
    let datagram = remote_update(&encode_telemetry(&record));

    // Act
    let actions = mapper.map(&event(&datagram));

    // Assert
    assert_eq!(actions, vec![SemanticAction::PointerMove { x: 200, y: 100 }]);
}

#[test]
fn test_short_remote_update_reports_field_and_still_moves() {
    // Arrange – 12 bytes: header, coordinate, two bytes of gyroscope
    let mapper = ActionMapper::default();
    let bytes = encode_telemetry(&TelemetryRecord {
        coordinate: [1914, 1074],
        ..Default::default()
    });
    let datagram = remote_update(&bytes[..12]);

    // Act
    let translation = mapper.translate(&event(&datagram));

    // Assert
    assert_eq!(translation.actions, vec![SemanticAction::PointerMove { x: 1914, y: 1074 }]);
    let err = translation.incomplete.expect("short payload must be flagged");
    assert_eq!(err.field, TelemetryField::Gyroscope);
    assert_eq!(err.available, 2);
}

#[test]
fn test_key_datagram_sequence_maps_in_order() {
    let mapper = ActionMapper::default();
    let frames: [&[u8]; 4] = [
        br#"{"t":"input","input":{"parameters":{"keyCode":415,"isDown":true}}}"#,
        br#"{"t":"input","input":{"parameters":{"keyCode":415,"isDown":false}}}"#,
        br#"{"t":"input","input":{"parameters":{"keyCode":1200,"isDown":true}}}"#,
        br#"{"t":"input","input":{"parameters":{"keyCode":458,"isDown":true}}}"#,
    ];

    let actions: Vec<SemanticAction> = frames.iter().flat_map(|f| mapper.map(&event(f))).collect();

    assert_eq!(
        actions,
        vec![
            SemanticAction::KeyToggle { key: KeyName::Named("audio_play"), down: true },
            SemanticAction::KeyToggle { key: KeyName::Named("audio_play"), down: false },
            SemanticAction::ButtonToggle { button: PointerButton::Right, down: true },
        ]
    );
}

#[test]
fn test_wheel_and_mouse_datagrams() {
    let mapper = ActionMapper::default();

    assert_eq!(
        mapper.map(&event(br#"{"t":"wheel","wheel":{"delta":150}}"#)),
        vec![SemanticAction::Scroll { amount: 2 }]
    );
    assert_eq!(
        mapper.map(&event(br#"{"t":"wheel","wheel":{"delta":30}}"#)),
        vec![SemanticAction::Scroll { amount: 0 }]
    );
    assert_eq!(
        mapper.map(&event(br#"{"t":"mouse","mouse":{"type":"mousedown"}}"#)),
        vec![SemanticAction::ButtonToggle { button: PointerButton::Left, down: true }]
    );
}

#[test]
fn test_unknown_datagram_kind_maps_to_nothing() {
    let mapper = ActionMapper::default();
    assert!(mapper.map(&event(br#"{"t":"battery"}"#)).is_empty());
}
