//! # Packet Type Table
//!
//! Every packet identifier of the protocol, its direction, and its size limit.
//!
//! Direction is derived from the namespace: `Osu*` packets originate at the game
//! client and are read by servers, `Bancho*` packets originate at the server and are
//! read by clients. A reader rejects any packet that is not addressed to its role.

use crate::config::{DEFAULT_MAX_PAYLOAD_SIZE, LARGE_MAX_PAYLOAD_SIZE};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Which side of a connection a packet originates from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Sent by the game client, read by the server
    ClientToServer,
    /// Sent by the server, read by the game client
    ServerToClient,
}

/// The side a codec instance reads for.
///
/// A server reads client-originated packets and writes server-originated ones; a
/// client does the converse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    Server,
    Client,
}

impl Role {
    /// Direction of packets this role may read
    pub fn inbound(self) -> Direction {
        match self {
            Role::Server => Direction::ClientToServer,
            Role::Client => Direction::ServerToClient,
        }
    }

    /// Direction of packets this role may write
    pub fn outbound(self) -> Direction {
        match self {
            Role::Server => Direction::ServerToClient,
            Role::Client => Direction::ClientToServer,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Server => f.write_str("server"),
            Role::Client => f.write_str("client"),
        }
    }
}

macro_rules! packet_types {
    ($($name:ident = $id:literal,)*) => {
        /// Every packet identifier of the protocol
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[repr(u16)]
        pub enum PacketType {
            $($name = $id,)*
        }

        impl PacketType {
            /// Every known packet type, in id order
            pub const ALL: &'static [PacketType] = &[$(PacketType::$name,)*];

            /// Resolve a wire identifier
            pub fn from_id(id: u16) -> Option<Self> {
                match id {
                    $($id => Some(PacketType::$name),)*
                    _ => None,
                }
            }

            /// Name of the packet, including its namespace prefix
            pub fn name(self) -> &'static str {
                match self {
                    $(PacketType::$name => stringify!($name),)*
                }
            }
        }
    };
}

packet_types! {
    OsuUserStatus = 0,
    OsuMessage = 1,
    OsuExit = 2,
    OsuStatusUpdateRequest = 3,
    OsuPong = 4,
    BanchoLoginReply = 5,
    BanchoCommandError = 6,
    BanchoMessage = 7,
    BanchoPing = 8,
    BanchoIrcChangeUsername = 9,
    BanchoIrcQuit = 10,
    BanchoUserStats = 11,
    BanchoUserQuit = 12,
    BanchoSpectatorJoined = 13,
    BanchoSpectatorLeft = 14,
    BanchoSpectateFrames = 15,
    OsuStartSpectating = 16,
    OsuStopSpectating = 17,
    OsuSpectateFrames = 18,
    BanchoVersionUpdate = 19,
    OsuErrorReport = 20,
    OsuCantSpectate = 21,
    BanchoSpectatorCantSpectate = 22,
    BanchoGetAttention = 23,
    BanchoAnnounce = 24,
    OsuPrivateMessage = 25,
    BanchoMatchUpdate = 26,
    BanchoMatchNew = 27,
    BanchoMatchDisband = 28,
    OsuLobbyPart = 29,
    OsuLobbyJoin = 30,
    OsuMatchCreate = 31,
    OsuMatchJoin = 32,
    OsuMatchPart = 33,
    BanchoLobbyJoin = 34,
    BanchoLobbyPart = 35,
    BanchoMatchJoinSuccess = 36,
    BanchoMatchJoinFail = 37,
    OsuMatchChangeSlot = 38,
    OsuMatchReady = 39,
    OsuMatchLock = 40,
    OsuMatchChangeSettings = 41,
    BanchoFellowSpectatorJoined = 42,
    BanchoFellowSpectatorLeft = 43,
    OsuMatchStart = 44,
    BanchoMatchStart = 46,
    OsuMatchScoreUpdate = 47,
    BanchoMatchScoreUpdate = 48,
    OsuMatchComplete = 49,
    BanchoMatchTransferHost = 50,
    OsuMatchChangeMods = 51,
    OsuMatchLoadComplete = 52,
    BanchoMatchAllPlayersLoaded = 53,
    OsuMatchNoBeatmap = 54,
    OsuMatchNotReady = 55,
    OsuMatchFailed = 56,
    BanchoMatchPlayerFailed = 57,
    BanchoMatchComplete = 58,
    OsuMatchHasBeatmap = 59,
    OsuMatchSkipRequest = 60,
    BanchoMatchSkip = 61,
    BanchoUnauthorized = 62,
    OsuChannelJoin = 63,
    BanchoChannelJoinSuccess = 64,
    BanchoChannelAvailable = 65,
    BanchoChannelRevoked = 66,
    BanchoChannelAvailableAutojoin = 67,
    OsuBeatmapInfoRequest = 68,
    BanchoBeatmapInfoReply = 69,
    OsuMatchTransferHost = 70,
    BanchoLoginPermissions = 71,
    BanchoFriendsList = 72,
    OsuFriendsAdd = 73,
    OsuFriendsRemove = 74,
    BanchoProtocolNegotiation = 75,
    BanchoTitleUpdate = 76,
    OsuMatchChangeTeam = 77,
    OsuChannelLeave = 78,
    OsuReceiveUpdates = 79,
    BanchoMonitor = 80,
    BanchoMatchPlayerSkipped = 81,
    OsuSetIrcAwayMessage = 82,
    BanchoUserPresence = 83,
    OsuUserStatsRequest = 85,
    BanchoRestart = 86,
    OsuInvite = 87,
    BanchoInvite = 88,
    BanchoChannelInfoComplete = 89,
    OsuMatchChangePassword = 90,
    BanchoMatchChangePassword = 91,
    BanchoSilenceInfo = 92,
    OsuTournamentMatchInfo = 93,
    BanchoUserSilenced = 94,
    BanchoUserPresenceSingle = 95,
    BanchoUserPresenceBundle = 96,
    OsuPresenceRequest = 97,
    OsuPresenceRequestAll = 98,
    OsuChangeFriendOnlyDms = 99,
    BanchoUserDmsBlocked = 100,
    BanchoTargetIsSilenced = 101,
    BanchoVersionUpdateForced = 102,
    BanchoSwitchServer = 103,
    BanchoAccountRestricted = 104,
    BanchoRtx = 105,
    BanchoMatchAbort = 106,
    BanchoSwitchTournamentServer = 107,
    OsuTournamentJoinMatchChannel = 108,
    OsuTournamentLeaveMatchChannel = 109,
    // Unused today, only sent by legacy clients and servers
    OsuMatchChangeBeatmap = 0xFFFE,
    BanchoIrcJoin = 0xFFFF,
}

impl PacketType {
    /// Wire identifier
    pub fn id(self) -> u16 {
        self as u16
    }

    pub fn direction(self) -> Direction {
        if self.name().starts_with("Osu") {
            Direction::ClientToServer
        } else {
            Direction::ServerToClient
        }
    }

    pub fn is_client_packet(self) -> bool {
        self.direction() == Direction::ClientToServer
    }

    pub fn is_server_packet(self) -> bool {
        self.direction() == Direction::ServerToClient
    }

    /// Largest payload this packet may declare
    pub fn max_size(self) -> usize {
        // Beatmap info requests list every beatmap in the client's library
        match self {
            PacketType::OsuBeatmapInfoRequest => LARGE_MAX_PAYLOAD_SIZE,
            _ => DEFAULT_MAX_PAYLOAD_SIZE,
        }
    }

    /// Whether a reader in `role` may decode this packet
    pub fn readable_by(self, role: Role) -> bool {
        self.direction() == role.inbound()
    }

    /// Whether a writer in `role` may encode this packet
    pub fn writable_by(self, role: Role) -> bool {
        self.direction() == role.outbound()
    }
}

impl fmt::Display for PacketType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
