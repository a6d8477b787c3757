//! Data holders exchanged as packet payloads.

use crate::error::{ProtocolError, Result};
use crate::types::constants::{ButtonState, LoginError, Mode, Mods, ReplayAction, Status};
use serde::{Deserialize, Serialize};

/// Separator between the old and new name of an IRC rename notice
pub const USERNAME_CHANGE_SEPARATOR: &str = ">>>>";

/// A player's current activity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserStatus {
    pub action: Status,
    pub text: String,
    pub mods: Mods,
    pub mode: Mode,
    pub beatmap_checksum: String,
    pub beatmap_id: i32,
    /// Encode the stats-update action code instead of `action`
    #[serde(default)]
    pub update_stats: bool,
}

impl Default for UserStatus {
    fn default() -> Self {
        Self {
            action: Status::IDLE,
            text: String::new(),
            mods: Mods::NO_MOD,
            mode: Mode::Osu,
            beatmap_checksum: String::new(),
            beatmap_id: -1,
            update_stats: false,
        }
    }
}

impl UserStatus {
    /// Return to the idle state
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Action code as it goes on the wire
    pub fn wire_action(&self) -> Status {
        if self.update_stats {
            Status::STATS_UPDATE
        } else {
            self.action
        }
    }
}

/// Ranking statistics shown next to a player
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserStats {
    pub rank: u32,
    pub rscore: u64,
    pub tscore: u64,
    pub accuracy: f32,
    pub playcount: u32,
}

/// Everything a stats or quit notice carries about one player
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserInfo {
    pub id: i32,
    pub status: UserStatus,
    pub stats: UserStats,
}

/// A chat message
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub sender: String,
    pub content: String,
    pub target: String,
    pub sender_id: i32,
}

impl Message {
    pub fn new(
        sender: impl Into<String>,
        content: impl Into<String>,
        target: impl Into<String>,
        sender_id: i32,
    ) -> Self {
        Self {
            sender: sender.into(),
            content: content.into(),
            target: target.into(),
            sender_id,
        }
    }

    /// Channels start with `#`; anything else is addressed to a player
    pub fn is_direct_message(&self) -> bool {
        !self.target.starts_with('#')
    }
}

/// Outcome of a login attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LoginReply {
    Authenticated(i32),
    Rejected(LoginError),
}

impl LoginReply {
    pub fn code(self) -> i32 {
        match self {
            LoginReply::Authenticated(user_id) => user_id,
            LoginReply::Rejected(error) => error.code(),
        }
    }

    /// Non-negative codes are user ids, negative ones are login errors
    pub fn from_code(code: i32) -> Result<Self> {
        if code >= 0 {
            Ok(LoginReply::Authenticated(code))
        } else {
            LoginError::try_from(code).map(LoginReply::Rejected)
        }
    }
}

/// An IRC user renamed themselves
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsernameChange {
    pub old_name: String,
    pub new_name: String,
}

impl UsernameChange {
    pub fn new(old_name: impl Into<String>, new_name: impl Into<String>) -> Self {
        Self {
            old_name: old_name.into(),
            new_name: new_name.into(),
        }
    }

    pub fn to_wire(&self) -> String {
        format!(
            "{}{USERNAME_CHANGE_SEPARATOR}{}",
            self.old_name, self.new_name
        )
    }

    pub fn parse(text: &str) -> Result<Self> {
        text.split_once(USERNAME_CHANGE_SEPARATOR)
            .map(|(old, new)| Self::new(old, new))
            .ok_or_else(|| {
                ProtocolError::MalformedPayload(format!(
                    "username change '{text}' has no '{USERNAME_CHANGE_SEPARATOR}' separator"
                ))
            })
    }
}

/// One sampled cursor position of a spectated play
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ReplayFrame {
    pub button_state: ButtonState,
    pub x: f32,
    pub y: f32,
    pub time: i32,
}

/// Frames relayed from a spectated player
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReplayFrameBundle {
    pub frames: Vec<ReplayFrame>,
    pub action: ReplayAction,
}

/// Beatmaps a client wants ranking information for
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BeatmapInfoRequest {
    pub filenames: Vec<String>,
    pub ids: Vec<i32>,
}
