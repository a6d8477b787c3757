//! # Payload Types
//!
//! Enumerations and data holders that packet payloads are built from. They carry no
//! encoding logic; each protocol revision decides how they are laid out on the wire.

pub mod constants;
pub mod objects;

pub use constants::{ButtonState, LoginError, Mode, Mods, ReplayAction, Status};
pub use objects::{
    BeatmapInfoRequest, LoginReply, Message, ReplayFrame, ReplayFrameBundle, UserInfo,
    UserStats, UserStatus, UsernameChange,
};
