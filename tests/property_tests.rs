//! Property-based tests using proptest
//!
//! These tests validate codec invariants across randomly generated inputs:
//! primitive round-trips, gzip framing, and that arbitrary bytes never panic
//! the frame reader.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use bancho_protocol::config::DEFAULT_MAX_PAYLOAD_SIZE;
use bancho_protocol::core::cursor::ByteCursor;
use bancho_protocol::protocol::{PacketType, Payload, Role};
use bancho_protocol::types::{BeatmapInfoRequest, Message, UserInfo, UserStats, UserStatus};
use bancho_protocol::utils::compression::{compress, decompress};
use bancho_protocol::{
    read_many_packets, read_packet, select_client, select_latest_client, write_packet,
};
use proptest::prelude::*;

// Property: Strings survive the marker + ULEB128 layout
proptest! {
    #[test]
    fn prop_string_roundtrip(value in ".{0,300}") {
        let mut cursor = ByteCursor::new();
        cursor.write_string(&value);
        prop_assert_eq!(cursor.read_string().expect("String should decode"), value);
        prop_assert_eq!(cursor.remaining(), 0);
    }
}

// Property: ULEB128 round-trips every u64 and uses the minimal byte count
proptest! {
    #[test]
    fn prop_uleb128_roundtrip(value in any::<u64>()) {
        let mut cursor = ByteCursor::new();
        cursor.write_uleb128(value);

        let bits = 64 - value.leading_zeros() as usize;
        let expected_len = bits.div_ceil(7).max(1);
        prop_assert_eq!(cursor.len(), expected_len);
        prop_assert_eq!(cursor.read_uleb128().expect("Varint should decode"), value);
    }
}

// Property: Out-of-range integer writes clamp to the target width
proptest! {
    #[test]
    fn prop_integer_writes_clamp(value in any::<i64>()) {
        let mut cursor = ByteCursor::new();
        cursor.write_u16(value);
        cursor.write_s8(value);

        let expected_u16 = value.clamp(0, i64::from(u16::MAX)) as u16;
        let expected_s8 = value.clamp(i64::from(i8::MIN), i64::from(i8::MAX)) as i8;
        prop_assert_eq!(cursor.read_u16().unwrap(), expected_u16);
        prop_assert_eq!(cursor.read_s8().unwrap(), expected_s8);
    }
}

// Property: Gzip compression roundtrip preserves data
proptest! {
    #[test]
    fn prop_gzip_roundtrip(data in prop::collection::vec(any::<u8>(), 0..20000), level in 0u32..=9) {
        let compressed = compress(&data, level).expect("Compression should not fail");
        let decompressed = decompress(&compressed, data.len()).expect("Decompression should not fail");

        prop_assert_eq!(decompressed, data);
    }
}

// Property: Decompression of invalid data returns error (doesn't panic)
proptest! {
    #[test]
    fn prop_decompression_invalid_data_never_panics(data in prop::collection::vec(any::<u8>(), 0..1000)) {
        let _ = decompress(&data, DEFAULT_MAX_PAYLOAD_SIZE);
    }
}

// Property: Arbitrary bytes never panic the batch reader, and errors stop the batch
proptest! {
    #[test]
    fn prop_random_bytes_never_panic(data in prop::collection::vec(any::<u8>(), 0..2000)) {
        for variant in [select_latest_client(), select_latest_client().with_role(Role::Client)] {
            let batch = read_many_packets(&variant, &data);
            // Every frame needs at least a header
            prop_assert!(batch.packets.len() <= data.len() / 6);
        }
    }
}

// Property: Arbitrary bytes with a valid header never panic a single read
proptest! {
    #[test]
    fn prop_random_body_never_panics(
        id in 0u16..=109,
        body in prop::collection::vec(any::<u8>(), 0..512),
    ) {
        let mut bytes = id.to_le_bytes().to_vec();
        bytes.extend_from_slice(&(body.len() as u32).to_le_bytes());
        bytes.extend_from_slice(&body);

        let mut cursor = ByteCursor::from(bytes);
        let _ = read_packet(&select_latest_client(), &mut cursor);
    }
}

// Property: Chat messages survive a server-to-client frame
proptest! {
    #[test]
    fn prop_message_roundtrip(
        sender in "[a-zA-Z0-9_ ]{0,32}",
        content in ".{0,200}",
        target in "#[a-z]{1,16}",
        sender_id in any::<i32>(),
    ) {
        let server = select_latest_client();
        let client = select_latest_client().with_role(Role::Client);
        let payload = Payload::Message(Message::new(sender, content, target, sender_id));

        let mut wire = ByteCursor::new();
        write_packet(&server, &mut wire, PacketType::BanchoMessage, &payload).unwrap();
        let (packet, decoded) = read_packet(&client, &mut wire).unwrap();

        prop_assert_eq!(packet, PacketType::BanchoMessage);
        prop_assert_eq!(decoded, payload);
    }
}

// Property: User stats survive both revisions
proptest! {
    #[test]
    fn prop_user_stats_roundtrip(
        version in prop::sample::select(vec![282i64, 490]),
        id in any::<i32>(),
        rank in any::<u32>(),
        rscore in any::<u64>(),
        tscore in any::<u64>(),
        accuracy in 0.0f32..=1.0,
        playcount in any::<u32>(),
    ) {
        let server = select_client(version).unwrap();
        let client = select_client(version).unwrap().with_role(Role::Client);
        let payload = Payload::UserStats(UserInfo {
            id,
            status: UserStatus::default(),
            stats: UserStats { rank, rscore, tscore, accuracy, playcount },
        });

        let body = server.encode_payload(PacketType::BanchoUserStats, &payload).unwrap();
        prop_assert_eq!(client.decode_payload(PacketType::BanchoUserStats, &body).unwrap(), payload);
    }
}

// Property: Beatmap info requests keep order and content
proptest! {
    #[test]
    fn prop_beatmap_info_request_roundtrip(
        filenames in prop::collection::vec("[a-z0-9 ]{0,40}\\.osu", 0..50),
        ids in prop::collection::vec(any::<i32>(), 0..50),
    ) {
        let client = select_latest_client().with_role(Role::Client);
        let server = select_latest_client();
        let payload = Payload::BeatmapInfoRequest(BeatmapInfoRequest { filenames, ids });

        let mut wire = ByteCursor::new();
        write_packet(&client, &mut wire, PacketType::OsuBeatmapInfoRequest, &payload).unwrap();
        prop_assert_eq!(read_packet(&server, &mut wire).unwrap().1, payload);
    }
}

// Property: Encoding is deterministic
proptest! {
    #[test]
    fn prop_frame_encoding_deterministic(content in ".{0,100}") {
        let server = select_latest_client();
        let payload = Payload::Message(Message::new("BanchoBot", content, "#osu", 1));

        let first = server.encode_frame(PacketType::BanchoMessage, &payload).unwrap();
        let second = server.encode_frame(PacketType::BanchoMessage, &payload).unwrap();
        prop_assert_eq!(first, second);
    }
}
