//! Typed packet payloads.
//!
//! [`Payload`] has exactly one variant per packet that some protocol revision can
//! encode, so a payload always knows which packet type it belongs to.

use crate::protocol::packet_type::PacketType;
use crate::types::{
    BeatmapInfoRequest, LoginReply, Message, ReplayFrameBundle, UserInfo, UserStatus,
    UsernameChange,
};
use serde::{Deserialize, Serialize};

/// Decoded content of a packet
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Payload {
    // Client-originated
    StatusChange(UserStatus),
    SendMessage(Message),
    /// `true` when the client is only updating and will reconnect
    Exit(bool),
    RequestStatusUpdate,
    Pong,
    StartSpectating(i32),
    StopSpectating,
    SendFrames(ReplayFrameBundle),
    CantSpectate,
    BeatmapInfoRequest(BeatmapInfoRequest),

    // Server-originated
    LoginReply(LoginReply),
    Message(Message),
    Ping,
    IrcChangeUsername(UsernameChange),
    IrcQuit(String),
    UserStats(UserInfo),
    UserQuit(UserInfo),
    SpectatorJoined(i32),
    SpectatorLeft(i32),
    SpectateFrames(ReplayFrameBundle),
    VersionUpdate,
    SpectatorCantSpectate(i32),
}

impl Payload {
    /// The one packet type this payload is valid for
    pub fn packet_type(&self) -> PacketType {
        match self {
            Payload::StatusChange(_) => PacketType::OsuUserStatus,
            Payload::SendMessage(_) => PacketType::OsuMessage,
            Payload::Exit(_) => PacketType::OsuExit,
            Payload::RequestStatusUpdate => PacketType::OsuStatusUpdateRequest,
            Payload::Pong => PacketType::OsuPong,
            Payload::StartSpectating(_) => PacketType::OsuStartSpectating,
            Payload::StopSpectating => PacketType::OsuStopSpectating,
            Payload::SendFrames(_) => PacketType::OsuSpectateFrames,
            Payload::CantSpectate => PacketType::OsuCantSpectate,
            Payload::BeatmapInfoRequest(_) => PacketType::OsuBeatmapInfoRequest,
            Payload::LoginReply(_) => PacketType::BanchoLoginReply,
            Payload::Message(_) => PacketType::BanchoMessage,
            Payload::Ping => PacketType::BanchoPing,
            Payload::IrcChangeUsername(_) => PacketType::BanchoIrcChangeUsername,
            Payload::IrcQuit(_) => PacketType::BanchoIrcQuit,
            Payload::UserStats(_) => PacketType::BanchoUserStats,
            Payload::UserQuit(_) => PacketType::BanchoUserQuit,
            Payload::SpectatorJoined(_) => PacketType::BanchoSpectatorJoined,
            Payload::SpectatorLeft(_) => PacketType::BanchoSpectatorLeft,
            Payload::SpectateFrames(_) => PacketType::BanchoSpectateFrames,
            Payload::VersionUpdate => PacketType::BanchoVersionUpdate,
            Payload::SpectatorCantSpectate(_) => PacketType::BanchoSpectatorCantSpectate,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::packet_type::Direction;

    #[test]
    fn test_payload_direction_matches_packet() {
        let client = [
            Payload::Pong,
            Payload::Exit(false),
            Payload::StartSpectating(3),
            Payload::BeatmapInfoRequest(BeatmapInfoRequest::default()),
        ];
        for payload in &client {
            assert_eq!(
                payload.packet_type().direction(),
                Direction::ClientToServer
            );
        }

        let server = [
            Payload::Ping,
            Payload::IrcQuit("someone".into()),
            Payload::UserQuit(UserInfo::default()),
        ];
        for payload in &server {
            assert_eq!(
                payload.packet_type().direction(),
                Direction::ServerToClient
            );
        }
    }
}
