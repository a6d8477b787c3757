//! # Revision b490
//!
//! Derived from b282. User statuses now carry the game mode and beatmap id behind a
//! presence flag, and clients can ask for ranking information on their beatmaps.
//! Every other packet is inherited unchanged.

use crate::core::cursor::ByteCursor;
use crate::error::Result;
use crate::protocol::b282;
use crate::protocol::packet_type::PacketType;
use crate::protocol::payload::Payload;
use crate::protocol::variant::{unpack, PacketRule, ProtocolVariant, Revision, StatusRule};
use crate::types::{BeatmapInfoRequest, Mode, Mods, Status, UserStatus};

pub static REVISION: Revision = Revision {
    version: 490,
    name: "b490",
    description: "Beatmap ids in user statuses and beatmap info requests",
    rules: RULES,
    status: Some(StatusRule {
        read: read_status,
        write: write_status,
    }),
    parent: Some(&b282::REVISION),
};

const RULES: &[PacketRule] = &[PacketRule {
    packet: PacketType::OsuBeatmapInfoRequest,
    read: read_beatmap_info_request,
    write: write_beatmap_info_request,
}];

/// `action u8, has_beatmap bool`, then the beatmap block when the flag is set
pub fn read_status(cursor: &mut ByteCursor) -> Result<UserStatus> {
    let mut status = UserStatus {
        action: Status(cursor.read_u8()?),
        ..Default::default()
    };

    if cursor.read_bool()? {
        status.text = cursor.read_string()?;
        status.beatmap_checksum = cursor.read_string()?;
        status.mods = Mods(u32::from(cursor.read_u16()?));
        status.mode = Mode::try_from(cursor.read_u8()?)?;
        status.beatmap_id = cursor.read_s32()?;
    }
    Ok(status)
}

/// Always writes the beatmap block
pub fn write_status(status: &UserStatus, cursor: &mut ByteCursor) {
    cursor.write_u8(status.wire_action().code());
    cursor.write_bool(true);
    cursor.write_string(&status.text);
    cursor.write_string(&status.beatmap_checksum);
    cursor.write_u16(status.mods.bits());
    cursor.write_u8(status.mode as u8);
    cursor.write_s32(status.beatmap_id);
}

fn read_beatmap_info_request(_: &ProtocolVariant, cursor: &mut ByteCursor) -> Result<Payload> {
    let filenames = cursor.read_string_list()?;

    let ids = cursor.read_list_s32_long()?;

    Ok(Payload::BeatmapInfoRequest(BeatmapInfoRequest { filenames, ids }))
}

fn write_beatmap_info_request(
    _: &ProtocolVariant,
    _: PacketType,
    payload: &Payload,
    cursor: &mut ByteCursor,
) -> Result<()> {
    let request = unpack!(
        payload,
        PacketType::OsuBeatmapInfoRequest,
        Payload::BeatmapInfoRequest(r) => r
    );

    cursor.write_string_list(&request.filenames);
    cursor.write_list_s32_long(&request.ids);
    Ok(())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn test_status_always_has_beatmap_block() {
        let status = UserStatus {
            action: Status::UNKNOWN,
            ..Default::default()
        };
        let mut cursor = ByteCursor::new();
        write_status(&status, &mut cursor);
        // action, flag, two empty strings, mods, mode, beatmap id
        assert_eq!(cursor.len(), 1 + 1 + 1 + 1 + 2 + 1 + 4);
        assert_eq!(read_status(&mut cursor).unwrap(), status);
    }

    #[test]
    fn test_status_without_beatmap_block() {
        let mut cursor = ByteCursor::from(&[1u8, 0][..]);
        let status = read_status(&mut cursor).unwrap();
        assert_eq!(status.action, Status::AFK);
        assert_eq!(status.beatmap_id, -1);
    }

    #[test]
    fn test_unknown_mode_is_malformed() {
        let mut cursor = ByteCursor::new();
        write_status(&UserStatus::default(), &mut cursor);
        let mut bytes = cursor.into_vec();
        // mode byte sits before the trailing beatmap id
        let mode = bytes.len() - 5;
        bytes[mode] = 9;

        let mut cursor = ByteCursor::from(bytes);
        assert!(matches!(
            read_status(&mut cursor),
            Err(crate::error::ProtocolError::MalformedPayload(_))
        ));
    }

    #[test]
    fn test_beatmap_info_request_layout() {
        let variant = ProtocolVariant::new(&REVISION).with_role(crate::protocol::Role::Client);
        let request = BeatmapInfoRequest {
            filenames: vec!["a.osu".into()],
            ids: vec![1, -1],
        };
        let mut cursor = ByteCursor::new();
        write_beatmap_info_request(
            &variant,
            PacketType::OsuBeatmapInfoRequest,
            &Payload::BeatmapInfoRequest(request.clone()),
            &mut cursor,
        )
        .unwrap();

        let mut expected = vec![1, 0, 0, 0, 0x0B, 5];
        expected.extend_from_slice(b"a.osu");
        expected.extend_from_slice(&[2, 0, 0, 0, 1, 0, 0, 0, 0xFF, 0xFF, 0xFF, 0xFF]);
        assert_eq!(cursor.as_bytes(), expected.as_slice());

        assert_eq!(
            read_beatmap_info_request(&variant, &mut cursor).unwrap(),
            Payload::BeatmapInfoRequest(request)
        );
    }
}
