//! # Revision b282
//!
//! The initial layout of the protocol. Every later revision derives from it.

use crate::core::cursor::ByteCursor;
use crate::error::{ProtocolError, Result};
use crate::protocol::packet_type::PacketType;
use crate::protocol::payload::Payload;
use crate::protocol::variant::{unpack, PacketRule, ProtocolVariant, Revision, StatusRule};
use crate::types::{
    ButtonState, LoginReply, Message, Mods, ReplayAction, ReplayFrame, ReplayFrameBundle,
    Status, UserInfo, UserStats, UserStatus, UsernameChange,
};

pub static REVISION: Revision = Revision {
    version: 282,
    name: "b282",
    description: "Initial implementation of the bancho protocol",
    rules: RULES,
    status: Some(StatusRule {
        read: read_status,
        write: write_status,
    }),
    parent: None,
};

const RULES: &[PacketRule] = &[
    PacketRule {
        packet: PacketType::OsuUserStatus,
        read: read_user_status,
        write: write_user_status,
    },
    PacketRule {
        packet: PacketType::OsuMessage,
        read: read_osu_message,
        write: write_osu_message,
    },
    PacketRule {
        packet: PacketType::OsuExit,
        read: read_exit,
        write: write_exit,
    },
    PacketRule {
        packet: PacketType::OsuStatusUpdateRequest,
        read: read_status_update_request,
        write: write_empty,
    },
    PacketRule {
        packet: PacketType::OsuPong,
        read: read_pong,
        write: write_empty,
    },
    PacketRule {
        packet: PacketType::OsuStartSpectating,
        read: read_start_spectating,
        write: write_user_id,
    },
    PacketRule {
        packet: PacketType::OsuStopSpectating,
        read: read_stop_spectating,
        write: write_empty,
    },
    PacketRule {
        packet: PacketType::OsuSpectateFrames,
        read: read_osu_frames,
        write: write_frames,
    },
    PacketRule {
        packet: PacketType::OsuCantSpectate,
        read: read_cant_spectate,
        write: write_empty,
    },
    PacketRule {
        packet: PacketType::BanchoLoginReply,
        read: read_login_reply,
        write: write_login_reply,
    },
    PacketRule {
        packet: PacketType::BanchoMessage,
        read: read_bancho_message,
        write: write_bancho_message,
    },
    PacketRule {
        packet: PacketType::BanchoPing,
        read: read_ping,
        write: write_empty,
    },
    PacketRule {
        packet: PacketType::BanchoIrcChangeUsername,
        read: read_irc_change_username,
        write: write_irc_change_username,
    },
    PacketRule {
        packet: PacketType::BanchoIrcQuit,
        read: read_irc_quit,
        write: write_irc_quit,
    },
    PacketRule {
        packet: PacketType::BanchoUserStats,
        read: read_user_stats,
        write: write_user_info,
    },
    PacketRule {
        packet: PacketType::BanchoUserQuit,
        read: read_user_quit,
        write: write_user_info,
    },
    PacketRule {
        packet: PacketType::BanchoSpectatorJoined,
        read: read_spectator_joined,
        write: write_user_id,
    },
    PacketRule {
        packet: PacketType::BanchoSpectatorLeft,
        read: read_spectator_left,
        write: write_user_id,
    },
    PacketRule {
        packet: PacketType::BanchoSpectateFrames,
        read: read_bancho_frames,
        write: write_frames,
    },
    PacketRule {
        packet: PacketType::BanchoVersionUpdate,
        read: read_version_update,
        write: write_empty,
    },
    PacketRule {
        packet: PacketType::BanchoSpectatorCantSpectate,
        read: read_spectator_cant_spectate,
        write: write_user_id,
    },
];

// Status fragment

/// `action u8`, then text, checksum and mods unless the action is unknown
pub fn read_status(cursor: &mut ByteCursor) -> Result<UserStatus> {
    let mut status = UserStatus {
        action: Status(cursor.read_u8()?),
        ..Default::default()
    };

    if status.action != Status::UNKNOWN {
        status.text = cursor.read_string()?;
        status.beatmap_checksum = cursor.read_string()?;
        status.mods = Mods(u32::from(cursor.read_u16()?));
    }
    Ok(status)
}

pub fn write_status(status: &UserStatus, cursor: &mut ByteCursor) {
    let action = status.wire_action();
    cursor.write_u8(action.code());

    if action != Status::UNKNOWN {
        cursor.write_string(&status.text);
        cursor.write_string(&status.beatmap_checksum);
        cursor.write_u16(status.mods.bits());
    }
}

// Readers

fn read_user_status(variant: &ProtocolVariant, cursor: &mut ByteCursor) -> Result<Payload> {
    variant.read_status(cursor).map(Payload::StatusChange)
}

fn read_osu_message(_: &ProtocolVariant, cursor: &mut ByteCursor) -> Result<Payload> {
    Ok(Payload::SendMessage(Message {
        sender: cursor.read_string()?,
        content: cursor.read_string()?,
        target: cursor.read_string()?,
        sender_id: 0,
    }))
}

fn read_exit(_: &ProtocolVariant, cursor: &mut ByteCursor) -> Result<Payload> {
    cursor.read_bool().map(Payload::Exit)
}

fn read_status_update_request(_: &ProtocolVariant, _: &mut ByteCursor) -> Result<Payload> {
    Ok(Payload::RequestStatusUpdate)
}

fn read_pong(_: &ProtocolVariant, _: &mut ByteCursor) -> Result<Payload> {
    Ok(Payload::Pong)
}

fn read_start_spectating(_: &ProtocolVariant, cursor: &mut ByteCursor) -> Result<Payload> {
    cursor.read_s32().map(Payload::StartSpectating)
}

fn read_stop_spectating(_: &ProtocolVariant, _: &mut ByteCursor) -> Result<Payload> {
    Ok(Payload::StopSpectating)
}

fn read_osu_frames(_: &ProtocolVariant, cursor: &mut ByteCursor) -> Result<Payload> {
    read_frame_bundle(cursor).map(Payload::SendFrames)
}

fn read_cant_spectate(_: &ProtocolVariant, _: &mut ByteCursor) -> Result<Payload> {
    Ok(Payload::CantSpectate)
}

fn read_login_reply(_: &ProtocolVariant, cursor: &mut ByteCursor) -> Result<Payload> {
    LoginReply::from_code(cursor.read_s32()?).map(Payload::LoginReply)
}

fn read_bancho_message(_: &ProtocolVariant, cursor: &mut ByteCursor) -> Result<Payload> {
    Ok(Payload::Message(Message {
        sender: cursor.read_string()?,
        content: cursor.read_string()?,
        target: cursor.read_string()?,
        sender_id: cursor.read_s32()?,
    }))
}

fn read_ping(_: &ProtocolVariant, _: &mut ByteCursor) -> Result<Payload> {
    Ok(Payload::Ping)
}

fn read_irc_change_username(_: &ProtocolVariant, cursor: &mut ByteCursor) -> Result<Payload> {
    UsernameChange::parse(&cursor.read_string()?).map(Payload::IrcChangeUsername)
}

fn read_irc_quit(_: &ProtocolVariant, cursor: &mut ByteCursor) -> Result<Payload> {
    cursor.read_string().map(Payload::IrcQuit)
}

fn read_user_stats(variant: &ProtocolVariant, cursor: &mut ByteCursor) -> Result<Payload> {
    read_user_info(variant, cursor).map(Payload::UserStats)
}

fn read_user_quit(variant: &ProtocolVariant, cursor: &mut ByteCursor) -> Result<Payload> {
    read_user_info(variant, cursor).map(Payload::UserQuit)
}

fn read_spectator_joined(_: &ProtocolVariant, cursor: &mut ByteCursor) -> Result<Payload> {
    cursor.read_s32().map(Payload::SpectatorJoined)
}

fn read_spectator_left(_: &ProtocolVariant, cursor: &mut ByteCursor) -> Result<Payload> {
    cursor.read_s32().map(Payload::SpectatorLeft)
}

fn read_bancho_frames(_: &ProtocolVariant, cursor: &mut ByteCursor) -> Result<Payload> {
    read_frame_bundle(cursor).map(Payload::SpectateFrames)
}

fn read_version_update(_: &ProtocolVariant, _: &mut ByteCursor) -> Result<Payload> {
    Ok(Payload::VersionUpdate)
}

fn read_spectator_cant_spectate(_: &ProtocolVariant, cursor: &mut ByteCursor) -> Result<Payload> {
    cursor.read_s32().map(Payload::SpectatorCantSpectate)
}

fn read_user_info(variant: &ProtocolVariant, cursor: &mut ByteCursor) -> Result<UserInfo> {
    let id = cursor.read_s32()?;
    let status = variant.read_status(cursor)?;
    let rscore = cursor.read_u64()?;
    let accuracy = cursor.read_f32()?;
    let playcount = cursor.read_u32()?;
    let tscore = cursor.read_u64()?;
    let rank = cursor.read_u32()?;

    Ok(UserInfo {
        id,
        status,
        stats: UserStats {
            rank,
            rscore,
            tscore,
            accuracy,
            playcount,
        },
    })
}

fn read_frame_bundle(cursor: &mut ByteCursor) -> Result<ReplayFrameBundle> {
    let count = usize::from(cursor.read_u16()?);
    // Each frame occupies 14 bytes
    let mut frames = Vec::with_capacity(count.min(cursor.remaining() / 14));

    for _ in 0..count {
        let left = cursor.read_bool()?;
        let right = cursor.read_bool()?;
        let mut frame = ReplayFrame {
            button_state: ButtonState::NO_BUTTON,
            x: cursor.read_f32()?,
            y: cursor.read_f32()?,
            time: cursor.read_s32()?,
        };

        if left {
            frame.button_state |= ButtonState::LEFT1;
        }
        if right {
            frame.button_state |= ButtonState::RIGHT1;
        }
        frames.push(frame);
    }

    let action = ReplayAction::try_from(cursor.read_u8()?)?;
    Ok(ReplayFrameBundle { frames, action })
}

// Writers

/// Packets without a body
fn write_empty(_: &ProtocolVariant, _: PacketType, _: &Payload, _: &mut ByteCursor) -> Result<()> {
    Ok(())
}

fn write_user_status(
    variant: &ProtocolVariant,
    _: PacketType,
    payload: &Payload,
    cursor: &mut ByteCursor,
) -> Result<()> {
    let status = unpack!(payload, PacketType::OsuUserStatus, Payload::StatusChange(s) => s);
    variant.write_status(status, cursor)
}

fn write_osu_message(
    _: &ProtocolVariant,
    _: PacketType,
    payload: &Payload,
    cursor: &mut ByteCursor,
) -> Result<()> {
    let message = unpack!(payload, PacketType::OsuMessage, Payload::SendMessage(m) => m);
    cursor.write_string(&message.sender);
    cursor.write_string(&message.content);
    cursor.write_string(&message.target);
    Ok(())
}

fn write_exit(
    _: &ProtocolVariant,
    _: PacketType,
    payload: &Payload,
    cursor: &mut ByteCursor,
) -> Result<()> {
    let updating = unpack!(payload, PacketType::OsuExit, Payload::Exit(u) => *u);
    cursor.write_bool(updating);
    Ok(())
}

/// Packets whose body is a single user id
fn write_user_id(
    _: &ProtocolVariant,
    packet: PacketType,
    payload: &Payload,
    cursor: &mut ByteCursor,
) -> Result<()> {
    let user_id = match payload {
        Payload::StartSpectating(id)
        | Payload::SpectatorJoined(id)
        | Payload::SpectatorLeft(id)
        | Payload::SpectatorCantSpectate(id) => *id,
        other => {
            return Err(ProtocolError::InvalidPayloadVariant {
                expected: packet,
                actual: other.packet_type(),
            })
        }
    };
    cursor.write_s32(user_id);
    Ok(())
}

fn write_frames(
    _: &ProtocolVariant,
    packet: PacketType,
    payload: &Payload,
    cursor: &mut ByteCursor,
) -> Result<()> {
    let bundle = match payload {
        Payload::SendFrames(bundle) | Payload::SpectateFrames(bundle) => bundle,
        other => {
            return Err(ProtocolError::InvalidPayloadVariant {
                expected: packet,
                actual: other.packet_type(),
            })
        }
    };

    let count = u16::try_from(bundle.frames.len()).map_err(|_| {
        ProtocolError::EncodingRangeViolation(format!(
            "{} replay frames do not fit a u16 count",
            bundle.frames.len()
        ))
    })?;

    cursor.write_u16(count);
    for frame in &bundle.frames {
        cursor.write_bool(frame.button_state.left());
        cursor.write_bool(frame.button_state.right());
        cursor.write_f32(frame.x);
        cursor.write_f32(frame.y);
        cursor.write_s32(frame.time);
    }
    cursor.write_u8(bundle.action as u8);
    Ok(())
}

fn write_login_reply(
    _: &ProtocolVariant,
    _: PacketType,
    payload: &Payload,
    cursor: &mut ByteCursor,
) -> Result<()> {
    let reply = unpack!(payload, PacketType::BanchoLoginReply, Payload::LoginReply(r) => *r);
    cursor.write_s32(reply.code());
    Ok(())
}

fn write_bancho_message(
    _: &ProtocolVariant,
    _: PacketType,
    payload: &Payload,
    cursor: &mut ByteCursor,
) -> Result<()> {
    let message = unpack!(payload, PacketType::BanchoMessage, Payload::Message(m) => m);
    cursor.write_string(&message.sender);
    cursor.write_string(&message.content);
    cursor.write_string(&message.target);
    cursor.write_s32(message.sender_id);
    Ok(())
}

fn write_irc_change_username(
    _: &ProtocolVariant,
    _: PacketType,
    payload: &Payload,
    cursor: &mut ByteCursor,
) -> Result<()> {
    let change = unpack!(
        payload,
        PacketType::BanchoIrcChangeUsername,
        Payload::IrcChangeUsername(c) => c
    );
    cursor.write_string(&change.to_wire());
    Ok(())
}

fn write_irc_quit(
    _: &ProtocolVariant,
    _: PacketType,
    payload: &Payload,
    cursor: &mut ByteCursor,
) -> Result<()> {
    let username = unpack!(payload, PacketType::BanchoIrcQuit, Payload::IrcQuit(name) => name);
    cursor.write_string(username);
    Ok(())
}

/// Body shared by user stats and user quit
fn write_user_info(
    variant: &ProtocolVariant,
    packet: PacketType,
    payload: &Payload,
    cursor: &mut ByteCursor,
) -> Result<()> {
    let info = match payload {
        Payload::UserStats(info) | Payload::UserQuit(info) => info,
        other => {
            return Err(ProtocolError::InvalidPayloadVariant {
                expected: packet,
                actual: other.packet_type(),
            })
        }
    };

    cursor.write_s32(info.id);
    variant.write_status(&info.status, cursor)?;
    cursor.write_u64(info.stats.rscore);
    cursor.write_f32(info.stats.accuracy);
    cursor.write_u32(info.stats.playcount);
    cursor.write_u64(info.stats.tscore);
    cursor.write_u32(info.stats.rank);
    Ok(())
}
