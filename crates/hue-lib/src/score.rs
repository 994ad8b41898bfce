use std::collections::HashMap;

use ecolor::Color32;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{player::Player, settings::GameSettings, PlayerId};

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct PlayerScore {
    pub nickname: String,
    pub nickname_colour: Color32,
    pub total_score: u32,
}

/// Decides which roster entries receive the score earned by the engine's input.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub enum Attribution {
    /// Only the player driving the engine is credited; everyone else is reported with 0.
    Local(PlayerId),
    /// Every player on the roster is credited with the full total.
    Shared,
}

impl Attribution {
    /// Credits the host, or the first player if the roster has no host.
    pub fn for_roster(players: &[Player]) -> Option<Self> {
        players
            .iter()
            .find(|p| p.is_host)
            .or_else(|| players.first())
            .map(|p| Self::Local(p.id))
    }

    pub fn credits(&self, player_id: PlayerId) -> bool {
        match self {
            Attribution::Local(id) => *id == player_id,
            Attribution::Shared => true,
        }
    }
}

/// Result of a round that wasn't the last one.
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq)]
pub struct RoundSummary {
    pub round: u8,
    pub round_score: u32,
    pub total_score: u32,
}

/// Final scores, handed to the caller once the last round is over.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct ScoreReport {
    pub settings: GameSettings,
    pub rounds_played: u8,
    pub total_score: u32,
    pub players: HashMap<PlayerId, PlayerScore>,
}

impl ScoreReport {
    /// Players sorted by score, highest first. Ties are broken by nickname.
    pub fn leaderboard(&self) -> Vec<(PlayerId, &PlayerScore)> {
        let mut entries = self
            .players
            .iter()
            .map(|(&id, score)| (id, score))
            .collect::<Vec<_>>();
        entries.sort_by(|(_, a), (_, b)| {
            b.total_score
                .cmp(&a.total_score)
                .then_with(|| a.nickname.cmp(&b.nickname))
        });
        entries
    }
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("Score sink rejected the report: {0}")]
pub struct SinkError(pub String);

/// Receives scores from the engine. The engine never retries a failed call.
pub trait ScoreSink {
    fn round_ended(&mut self, summary: &RoundSummary) -> Result<(), SinkError>;

    fn game_ended(&mut self, report: &ScoreReport) -> Result<(), SinkError>;
}

/// Keeps everything it is given. Handy for tests and for callers that poll.
#[derive(Debug, Default, Clone)]
pub struct RecordingSink {
    pub rounds: Vec<RoundSummary>,
    pub reports: Vec<ScoreReport>,
}

impl ScoreSink for RecordingSink {
    fn round_ended(&mut self, summary: &RoundSummary) -> Result<(), SinkError> {
        self.rounds.push(*summary);
        Ok(())
    }

    fn game_ended(&mut self, report: &ScoreReport) -> Result<(), SinkError> {
        self.reports.push(report.clone());
        Ok(())
    }
}

impl<S: ScoreSink + ?Sized> ScoreSink for &mut S {
    fn round_ended(&mut self, summary: &RoundSummary) -> Result<(), SinkError> {
        (**self).round_ended(summary)
    }

    fn game_ended(&mut self, report: &ScoreReport) -> Result<(), SinkError> {
        (**self).game_ended(report)
    }
}
