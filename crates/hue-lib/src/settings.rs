use std::{fmt::Display, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const MIN_SPEED: u8 = 1;
pub const MAX_SPEED: u8 = 10;
pub const MIN_ROUNDS: u8 = 1;
pub const MAX_ROUNDS: u8 = 10;
pub const DEFAULT_ROUNDS: u8 = 3;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum SettingsError {
    #[error("Speed must be between {MIN_SPEED} and {MAX_SPEED}, got {0}")]
    SpeedOutOfRange(u8),
    #[error("Round count must be between {MIN_ROUNDS} and {MAX_ROUNDS}, got {0}")]
    RoundsOutOfRange(u8),
    #[error("Unknown difficulty '{0}'")]
    UnknownDifficulty(String),
}

pub type SettingsResult<T> = Result<T, SettingsError>;

/// Settings for a single game. Always within range, there is no way to construct one that isn't.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawGameSettings")]
pub struct GameSettings {
    speed: u8,
    rounds: u8,
}

#[derive(Deserialize)]
struct RawGameSettings {
    speed: u8,
    rounds: u8,
}

impl TryFrom<RawGameSettings> for GameSettings {
    type Error = SettingsError;

    fn try_from(raw: RawGameSettings) -> Result<Self, Self::Error> {
        Self::new(raw.speed, raw.rounds)
    }
}

impl Default for GameSettings {
    fn default() -> Self {
        Self {
            speed: Difficulty::default().speed(),
            rounds: DEFAULT_ROUNDS,
        }
    }
}

impl GameSettings {
    /// # Errors
    ///
    /// Returns an error if either value is outside of `1..=10`.
    pub fn new(speed: u8, rounds: u8) -> SettingsResult<Self> {
        if !(MIN_SPEED..=MAX_SPEED).contains(&speed) {
            return Err(SettingsError::SpeedOutOfRange(speed));
        }
        if !(MIN_ROUNDS..=MAX_ROUNDS).contains(&rounds) {
            return Err(SettingsError::RoundsOutOfRange(rounds));
        }
        Ok(Self { speed, rounds })
    }

    pub fn from_difficulty(difficulty: Difficulty, rounds: u8) -> SettingsResult<Self> {
        Self::new(difficulty.speed(), rounds)
    }

    pub fn speed(&self) -> u8 {
        self.speed
    }

    pub fn rounds(&self) -> u8 {
        self.rounds
    }
}

/// Difficulty presets offered when creating a room.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Difficulty {
    Easy,
    #[default]
    Normal,
    Difficult,
}

impl Difficulty {
    pub fn speed(self) -> u8 {
        match self {
            Difficulty::Easy => 3,
            Difficulty::Normal => 5,
            Difficulty::Difficult => 8,
        }
    }
}

impl Display for Difficulty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Difficulty::Easy => "easy",
            Difficulty::Normal => "normal",
            Difficulty::Difficult => "difficult",
        })
    }
}

impl FromStr for Difficulty {
    type Err = SettingsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "easy" => Ok(Difficulty::Easy),
            "normal" => Ok(Difficulty::Normal),
            "difficult" | "hard" => Ok(Difficulty::Difficult),
            _ => Err(SettingsError::UnknownDifficulty(s.to_owned())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Difficulty, GameSettings, SettingsError};

    #[test]
    fn rejects_out_of_range() {
        assert_eq!(
            GameSettings::new(0, 3),
            Err(SettingsError::SpeedOutOfRange(0))
        );
        assert_eq!(
            GameSettings::new(11, 3),
            Err(SettingsError::SpeedOutOfRange(11))
        );
        assert_eq!(
            GameSettings::new(5, 0),
            Err(SettingsError::RoundsOutOfRange(0))
        );
        assert_eq!(
            GameSettings::new(5, 11),
            Err(SettingsError::RoundsOutOfRange(11))
        );

        let settings = GameSettings::new(10, 1).unwrap();
        assert_eq!(settings.speed(), 10);
        assert_eq!(settings.rounds(), 1);
    }

    #[test]
    fn default_is_normal_three_rounds() {
        let settings = GameSettings::default();
        assert_eq!(settings.speed(), Difficulty::Normal.speed());
        assert_eq!(settings.rounds(), 3);
    }

    #[test]
    fn deserialize_validates() {
        let bytes = bincode::serialize(&(12u8, 3u8)).unwrap();
        assert!(bincode::deserialize::<GameSettings>(&bytes).is_err());

        let bytes = bincode::serialize(&GameSettings::new(7, 4).unwrap()).unwrap();
        let settings: GameSettings = bincode::deserialize(&bytes).unwrap();
        assert_eq!(settings, GameSettings::new(7, 4).unwrap());
    }

    #[test]
    fn parse_difficulty() {
        assert_eq!("Easy".parse(), Ok(Difficulty::Easy));
        assert_eq!(" difficult ".parse(), Ok(Difficulty::Difficult));
        assert!("nightmare".parse::<Difficulty>().is_err());
    }
}
