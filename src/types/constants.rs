//! Enumerations carried inside packet payloads.
//!
//! Codes that the protocol treats as open-ended bitmasks or that deliberately share
//! values (`Status::PAUSED` and `Status::STATS_UPDATE`) are newtypes with associated
//! constants; closed code sets are plain enums and reject unknown values on decode.

use crate::error::{ProtocolError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{BitOr, BitOrAssign};

/// What a player is currently doing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Status(pub u8);

impl Status {
    pub const IDLE: Status = Status(0);
    pub const AFK: Status = Status(1);
    pub const PLAYING: Status = Status(2);
    pub const EDITING: Status = Status(3);
    pub const MODDING: Status = Status(4);
    pub const MULTIPLAYER: Status = Status(5);
    pub const WATCHING: Status = Status(6);
    pub const UNKNOWN: Status = Status(7);
    pub const TESTING: Status = Status(8);
    pub const SUBMITTING: Status = Status(9);
    pub const PAUSED: Status = Status(10);
    pub const LOBBY: Status = Status(11);
    pub const MULTIPLAYING: Status = Status(12);
    pub const OSU_DIRECT: Status = Status(13);

    /// Legacy clients use the paused code to ask for a statistics refresh
    pub const STATS_UPDATE: Status = Status(10);

    pub fn code(self) -> u8 {
        self.0
    }
}

impl From<u8> for Status {
    fn from(code: u8) -> Self {
        Status(code)
    }
}

/// Game mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[repr(u8)]
pub enum Mode {
    #[default]
    Osu = 0,
    Taiko = 1,
    Catch = 2,
    Mania = 3,
}

impl TryFrom<u8> for Mode {
    type Error = ProtocolError;

    fn try_from(code: u8) -> Result<Self> {
        match code {
            0 => Ok(Mode::Osu),
            1 => Ok(Mode::Taiko),
            2 => Ok(Mode::Catch),
            3 => Ok(Mode::Mania),
            other => Err(ProtocolError::MalformedPayload(format!(
                "unknown game mode {other}"
            ))),
        }
    }
}

/// Gameplay modifier bitmask
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Mods(pub u32);

impl Mods {
    pub const NO_MOD: Mods = Mods(0);
    pub const NO_FAIL: Mods = Mods(1 << 0);
    pub const EASY: Mods = Mods(1 << 1);
    pub const TOUCH_DEVICE: Mods = Mods(1 << 2);
    pub const HIDDEN: Mods = Mods(1 << 3);
    pub const HARD_ROCK: Mods = Mods(1 << 4);
    pub const SUDDEN_DEATH: Mods = Mods(1 << 5);
    pub const DOUBLE_TIME: Mods = Mods(1 << 6);
    pub const RELAX: Mods = Mods(1 << 7);
    pub const HALF_TIME: Mods = Mods(1 << 8);
    pub const NIGHTCORE: Mods = Mods(1 << 9);
    pub const FLASHLIGHT: Mods = Mods(1 << 10);
    pub const AUTOPLAY: Mods = Mods(1 << 11);
    pub const SPUN_OUT: Mods = Mods(1 << 12);
    pub const AUTOPILOT: Mods = Mods(1 << 13);
    pub const PERFECT: Mods = Mods(1 << 14);
    pub const KEY4: Mods = Mods(1 << 15);
    pub const KEY5: Mods = Mods(1 << 16);
    pub const KEY6: Mods = Mods(1 << 17);
    pub const KEY7: Mods = Mods(1 << 18);
    pub const KEY8: Mods = Mods(1 << 19);
    pub const FADE_IN: Mods = Mods(1 << 20);
    pub const RANDOM: Mods = Mods(1 << 21);
    pub const CINEMA: Mods = Mods(1 << 22);
    pub const TARGET: Mods = Mods(1 << 23);
    pub const KEY9: Mods = Mods(1 << 24);
    pub const KEY_COOP: Mods = Mods(1 << 25);
    pub const KEY1: Mods = Mods(1 << 26);
    pub const KEY3: Mods = Mods(1 << 27);
    pub const KEY2: Mods = Mods(1 << 28);
    pub const SCORE_V2: Mods = Mods(1 << 29);
    pub const MIRROR: Mods = Mods(1 << 30);

    pub fn bits(self) -> u32 {
        self.0
    }

    pub fn contains(self, other: Mods) -> bool {
        self.0 & other.0 == other.0
    }
}

impl BitOr for Mods {
    type Output = Mods;

    fn bitor(self, rhs: Mods) -> Mods {
        Mods(self.0 | rhs.0)
    }
}

impl BitOrAssign for Mods {
    fn bitor_assign(&mut self, rhs: Mods) {
        self.0 |= rhs.0;
    }
}

/// Mouse and key buttons held during a replay frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ButtonState(pub u8);

impl ButtonState {
    pub const NO_BUTTON: ButtonState = ButtonState(0);
    pub const LEFT1: ButtonState = ButtonState(1 << 0);
    pub const RIGHT1: ButtonState = ButtonState(1 << 1);
    pub const LEFT2: ButtonState = ButtonState(1 << 2);
    pub const RIGHT2: ButtonState = ButtonState(1 << 3);
    pub const SMOKE: ButtonState = ButtonState(1 << 4);

    /// True when any bit of `other` is held
    pub fn intersects(self, other: ButtonState) -> bool {
        self.0 & other.0 != 0
    }

    /// Either left button, as legacy frames only know one of each side
    pub fn left(self) -> bool {
        self.intersects(ButtonState::LEFT1 | ButtonState::LEFT2)
    }

    pub fn right(self) -> bool {
        self.intersects(ButtonState::RIGHT1 | ButtonState::RIGHT2)
    }
}

impl BitOr for ButtonState {
    type Output = ButtonState;

    fn bitor(self, rhs: ButtonState) -> ButtonState {
        ButtonState(self.0 | rhs.0)
    }
}

impl BitOrAssign for ButtonState {
    fn bitor_assign(&mut self, rhs: ButtonState) {
        self.0 |= rhs.0;
    }
}

/// What a spectated player's client is doing alongside a frame bundle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[repr(u8)]
pub enum ReplayAction {
    #[default]
    Standard = 0,
    NewSong = 1,
    Skip = 2,
    Completion = 3,
    Fail = 4,
    Pause = 5,
    Unpause = 6,
    SongSelect = 7,
    WatchingOther = 8,
}

impl TryFrom<u8> for ReplayAction {
    type Error = ProtocolError;

    fn try_from(code: u8) -> Result<Self> {
        Ok(match code {
            0 => ReplayAction::Standard,
            1 => ReplayAction::NewSong,
            2 => ReplayAction::Skip,
            3 => ReplayAction::Completion,
            4 => ReplayAction::Fail,
            5 => ReplayAction::Pause,
            6 => ReplayAction::Unpause,
            7 => ReplayAction::SongSelect,
            8 => ReplayAction::WatchingOther,
            other => {
                return Err(ProtocolError::MalformedPayload(format!(
                    "unknown replay action {other}"
                )))
            }
        })
    }
}

/// Why the server refused a login
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(i32)]
pub enum LoginError {
    InvalidLogin = -1,
    InvalidVersion = -2,
    UserBanned = -3,
    UserInactive = -4,
    ServerError = -5,
    UnauthorizedTestBuild = -6,
    PasswordReset = -7,
    VerificationRequired = -8,
}

impl LoginError {
    pub fn code(self) -> i32 {
        self as i32
    }
}

impl TryFrom<i32> for LoginError {
    type Error = ProtocolError;

    fn try_from(code: i32) -> Result<Self> {
        Ok(match code {
            -1 => LoginError::InvalidLogin,
            -2 => LoginError::InvalidVersion,
            -3 => LoginError::UserBanned,
            -4 => LoginError::UserInactive,
            -5 => LoginError::ServerError,
            -6 => LoginError::UnauthorizedTestBuild,
            -7 => LoginError::PasswordReset,
            -8 => LoginError::VerificationRequired,
            other => {
                return Err(ProtocolError::MalformedPayload(format!(
                    "unknown login error code {other}"
                )))
            }
        })
    }
}

impl fmt::Display for LoginError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paused_and_stats_update_share_a_code() {
        assert_eq!(Status::PAUSED, Status::STATS_UPDATE);
        assert_eq!(Status::STATS_UPDATE.code(), 10);
    }

    #[test]
    fn test_unknown_mode_rejected() {
        assert_eq!(Mode::try_from(3).ok(), Some(Mode::Mania));
        assert!(matches!(
            Mode::try_from(4),
            Err(ProtocolError::MalformedPayload(_))
        ));
    }

    #[test]
    fn test_button_sides_fold_secondary_keys() {
        assert!(ButtonState::LEFT2.left());
        assert!(ButtonState::RIGHT2.right());
        assert!(!ButtonState::SMOKE.left());
        assert!(!ButtonState::SMOKE.right());
    }

    #[test]
    fn test_login_error_codes() {
        for code in -8..=-1 {
            let error = LoginError::try_from(code).ok();
            assert_eq!(error.map(LoginError::code), Some(code));
        }
        assert!(LoginError::try_from(-9).is_err());
    }

    #[test]
    fn test_mods_combine() {
        let mods = Mods::HIDDEN | Mods::DOUBLE_TIME;
        assert!(mods.contains(Mods::HIDDEN));
        assert!(!mods.contains(Mods::HARD_ROCK));
        assert_eq!(mods.bits(), 72);
    }
}
