use ecolor::Color32;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::PlayerId;

pub const MAX_NICKNAME_LEN: usize = 16;

/// Nickname colours, handed out in join order.
pub const COLORS: [(u8, u8, u8); 6] = [
    (239, 68, 68),
    (245, 158, 11),
    (16, 185, 129),
    (59, 130, 246),
    (168, 85, 247),
    (236, 72, 153),
];

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum PlayerError {
    #[error("Nickname can't be empty")]
    EmptyNickname,
    #[error("Nickname is longer than {MAX_NICKNAME_LEN} characters")]
    NicknameTooLong,
}

#[derive(Default, Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct PlayerOptions {
    pub nickname: String,
}

impl PlayerOptions {
    pub fn new(nickname: impl Into<String>) -> Self {
        Self {
            nickname: nickname.into(),
        }
    }

    /// Trims the nickname and checks that it can be shown in the lobby.
    pub fn validated(mut self) -> Result<Self, PlayerError> {
        let trimmed = self.nickname.trim();
        if trimmed.is_empty() {
            return Err(PlayerError::EmptyNickname);
        }
        if trimmed.chars().count() > MAX_NICKNAME_LEN {
            return Err(PlayerError::NicknameTooLong);
        }
        self.nickname = trimmed.to_owned();
        Ok(self)
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct Player {
    pub id: PlayerId,
    pub nickname: String,
    pub nickname_colour: Color32,
    pub is_host: bool,
}

impl Player {
    pub fn new(id: impl Into<PlayerId>, options: PlayerOptions, join_order: usize) -> Self {
        Self {
            id: id.into(),
            nickname: options.nickname,
            nickname_colour: colour_for(join_order),
            is_host: false,
        }
    }
}

pub fn colour_for(join_order: usize) -> Color32 {
    let (r, g, b) = COLORS[join_order % COLORS.len()];
    Color32::from_rgb(r, g, b)
}
