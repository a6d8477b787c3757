#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
//! Edge-case tests for the codec
//! Tests boundary conditions, malformed frames, size limits, and revision gaps

use bancho_protocol::config::{DEFAULT_MAX_PAYLOAD_SIZE, HEADER_SIZE, LARGE_MAX_PAYLOAD_SIZE};
use bancho_protocol::core::cursor::ByteCursor;
use bancho_protocol::error::ProtocolError;
use bancho_protocol::protocol::{PacketType, Payload, Role};
use bancho_protocol::types::{Message, Status, UserStatus};
use bancho_protocol::utils::compression::compress;
use bancho_protocol::{
    is_version_supported, read_many_packets, read_packet, select_client, select_latest_client,
    supported_versions, write_many_packets, write_packet,
};

fn header(id: u16, length: u32) -> Vec<u8> {
    let mut bytes = id.to_le_bytes().to_vec();
    bytes.extend_from_slice(&length.to_le_bytes());
    bytes
}

fn frame(id: u16, body: &[u8]) -> Vec<u8> {
    let compressed = compress(body, 6).unwrap();
    let mut bytes = header(id, compressed.len() as u32);
    bytes.extend_from_slice(&compressed);
    bytes
}

// ============================================================================
// PRIMITIVE EDGE CASES
// ============================================================================

#[test]
fn test_read_past_end_never_panics() {
    let mut cursor = ByteCursor::from(&[0x01u8][..]);
    assert!(matches!(
        cursor.read_u32(),
        Err(ProtocolError::BoundsViolation {
            requested: 4,
            available: 1
        })
    ));
    assert!(cursor.read_string().is_err());
    assert!(cursor.read_f64().is_err());
}

#[test]
fn test_varint_boundaries() {
    for value in [0u64, 127, 128, 16_383, 16_384, u64::MAX] {
        let mut cursor = ByteCursor::new();
        cursor.write_uleb128(value);
        assert_eq!(cursor.read_uleb128().unwrap(), value);
    }
}

#[test]
fn test_string_wire_bytes() {
    let mut cursor = ByteCursor::new();
    cursor.write_string("");
    assert_eq!(cursor.as_bytes(), &[0x00]);

    let mut cursor = ByteCursor::new();
    cursor.write_string("hi");
    assert_eq!(cursor.as_bytes(), &[0x0B, 0x02, b'h', b'i']);
    assert_eq!(cursor.read_string().unwrap(), "hi");
}

#[test]
fn test_string_length_past_end() {
    let mut cursor = ByteCursor::from(&[0x0Bu8, 0x10, b'a'][..]);
    assert!(matches!(
        cursor.read_string(),
        Err(ProtocolError::BoundsViolation { .. })
    ));
}

#[test]
fn test_huge_list_count_does_not_preallocate() {
    // Declares i32::MAX elements but carries none
    let mut cursor = ByteCursor::from(&[0xFFu8, 0xFF, 0xFF, 0x7F][..]);
    assert!(matches!(
        cursor.read_list_s32(),
        Err(ProtocolError::BoundsViolation { .. })
    ));
}

#[test]
fn test_negative_list_count() {
    let mut cursor = ByteCursor::from(&[0xFFu8, 0xFF, 0xFF, 0xFF][..]);
    assert!(matches!(
        cursor.read_list_s32(),
        Err(ProtocolError::MalformedPayload(_))
    ));
}

// ============================================================================
// FRAME EDGE CASES
// ============================================================================

#[test]
fn test_oversized_frame_rejected() {
    let server = select_latest_client();
    let mut cursor = ByteCursor::from(header(
        PacketType::OsuMessage.id(),
        LARGE_MAX_PAYLOAD_SIZE as u32,
    ));

    match read_packet(&server, &mut cursor) {
        Err(ProtocolError::OversizedPacket {
            packet,
            length,
            limit,
        }) => {
            assert_eq!(packet, PacketType::OsuMessage);
            assert_eq!(length, LARGE_MAX_PAYLOAD_SIZE);
            assert_eq!(limit, DEFAULT_MAX_PAYLOAD_SIZE);
        }
        other => panic!("Unexpected result: {other:?}"),
    }
}

#[test]
fn test_beatmap_info_request_accepts_large_frame() {
    let server = select_latest_client();
    let mut cursor = ByteCursor::from(header(
        PacketType::OsuBeatmapInfoRequest.id(),
        LARGE_MAX_PAYLOAD_SIZE as u32,
    ));

    // The header passes; only the missing body stops the read
    assert!(matches!(
        read_packet(&server, &mut cursor),
        Err(ProtocolError::BoundsViolation { .. })
    ));
    assert_eq!(cursor.position(), 0);
}

#[test]
fn test_unknown_packet_id() {
    let server = select_latest_client();
    for id in [45u16, 84, 110, 0xFFFD] {
        let mut cursor = ByteCursor::from(header(id, 0));
        assert!(matches!(
            read_packet(&server, &mut cursor),
            Err(ProtocolError::UnknownPacket(unknown)) if unknown == id
        ));
    }
}

#[test]
fn test_legacy_identifiers_are_known() {
    assert_eq!(PacketType::from_id(0xFFFF), Some(PacketType::BanchoIrcJoin));
    assert_eq!(
        PacketType::from_id(0xFFFE),
        Some(PacketType::OsuMatchChangeBeatmap)
    );
}

#[test]
fn test_empty_body_for_bodyless_packet() {
    let server = select_latest_client();
    let mut cursor = ByteCursor::from(frame(PacketType::OsuPong.id(), &[]));
    assert_eq!(
        read_packet(&server, &mut cursor).unwrap(),
        (PacketType::OsuPong, Payload::Pong)
    );
}

#[test]
fn test_truncated_body_is_bounds_violation() {
    let server = select_latest_client();
    // OsuExit needs one byte
    let mut cursor = ByteCursor::from(frame(PacketType::OsuExit.id(), &[]));
    assert!(matches!(
        read_packet(&server, &mut cursor),
        Err(ProtocolError::BoundsViolation { .. })
    ));
}

#[test]
fn test_garbage_body_is_decompression_failure() {
    let server = select_latest_client();
    let mut bytes = header(PacketType::OsuPong.id(), 3);
    bytes.extend_from_slice(&[1, 2, 3]);
    let mut cursor = ByteCursor::from(bytes);
    assert!(matches!(
        read_packet(&server, &mut cursor),
        Err(ProtocolError::DecompressionFailure)
    ));
}

#[test]
fn test_invalid_utf8_in_message() {
    let server = select_latest_client();
    let body = [0x0B, 0x02, 0xC3, 0x28, 0x00, 0x00];
    let mut cursor = ByteCursor::from(frame(PacketType::OsuMessage.id(), &body));
    assert!(matches!(
        read_packet(&server, &mut cursor),
        Err(ProtocolError::MalformedPayload(_))
    ));
}

#[test]
fn test_trailing_body_bytes_are_ignored() {
    let server = select_latest_client();
    let body = [9, 0, 0, 0, 0xAA];
    let mut cursor = ByteCursor::from(frame(PacketType::OsuStartSpectating.id(), &body));
    assert_eq!(
        read_packet(&server, &mut cursor).unwrap().1,
        Payload::StartSpectating(9)
    );
}

// ============================================================================
// BATCH EDGE CASES
// ============================================================================

#[test]
fn test_empty_batch() {
    let batch = read_many_packets(&select_latest_client(), &[]);
    assert!(batch.is_complete());
    assert!(batch.packets.is_empty());
}

#[test]
fn test_batch_shorter_than_header() {
    let batch = read_many_packets(&select_latest_client(), &[0u8; HEADER_SIZE - 1]);
    assert!(batch.is_complete());
    assert!(batch.packets.is_empty());
}

#[test]
fn test_batch_write_is_concatenation() {
    let server = select_latest_client();
    let payloads = [
        Payload::Ping,
        Payload::Message(Message::new("a", "b", "#osu", 1)),
    ];

    let batch = write_many_packets(&server, &payloads).unwrap();
    let mut separate = ByteCursor::new();
    for payload in &payloads {
        write_packet(&server, &mut separate, payload.packet_type(), payload).unwrap();
    }
    assert_eq!(batch, separate.into_vec());
}

#[test]
fn test_batch_write_fails_atomically_per_call() {
    let server = select_latest_client();
    // The second payload belongs to the client direction
    let result = write_many_packets(&server, &[Payload::Ping, Payload::Pong]);
    assert!(matches!(
        result,
        Err(ProtocolError::DirectionMismatch { .. })
    ));
}

// ============================================================================
// VERSION SELECTION EDGE CASES
// ============================================================================

#[test]
fn test_version_selection() {
    assert!(matches!(
        select_client(281),
        Err(ProtocolError::UnsupportedProtocolVersion(281))
    ));
    assert_eq!(select_client(282).unwrap().version(), 282);
    assert_eq!(select_client(489).unwrap().version(), 282);
    assert_eq!(select_client(490).unwrap().version(), 490);
    assert_eq!(select_client(i64::MAX).unwrap().version(), 490);
    assert!(select_client(i64::MIN).is_err());
}

#[test]
fn test_supported_versions() {
    assert_eq!(supported_versions(), vec![282, 490]);
    assert!(is_version_supported(282));
    assert!(!is_version_supported(489));
}

// ============================================================================
// STATUS DIVERGENCE
// ============================================================================

#[test]
fn test_idle_status_with_checksum_diverges() {
    let status = UserStatus {
        action: Status::IDLE,
        beatmap_checksum: "d41d8cd98f00b204e9800998ecf8427e".into(),
        ..Default::default()
    };
    let payload = Payload::StatusChange(status.clone());

    let base = select_client(282).unwrap().with_role(Role::Client);
    let derived = select_client(490).unwrap().with_role(Role::Client);
    let base_body = base
        .encode_payload(PacketType::OsuUserStatus, &payload)
        .unwrap();
    let derived_body = derived
        .encode_payload(PacketType::OsuUserStatus, &payload)
        .unwrap();
    assert_ne!(base_body.len(), derived_body.len());

    assert_eq!(
        base.decode_payload(PacketType::OsuUserStatus, &base_body)
            .unwrap(),
        payload
    );
    assert_eq!(
        derived
            .decode_payload(PacketType::OsuUserStatus, &derived_body)
            .unwrap(),
        payload
    );
}
