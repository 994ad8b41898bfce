use serde::{Deserialize, Serialize};

use crate::{color::ButtonOrder, prompt::Prompt, Epoch};

use super::{Flash, Phase};

/// Read-only view of everything a front-end needs to draw the game screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineSnapshot {
    pub epoch: Epoch,
    pub phase: Phase,
    pub current_round: u8,
    pub total_rounds: u8,
    pub total_score: u32,
    pub round_score: u32,
    pub prompts_answered: u32,
    pub round_time_remaining_ms: u32,
    pub prompt_time_remaining_ms: Option<u32>,
    pub button_order: ButtonOrder,
    pub prompt: Option<Prompt>,
    pub flash: Option<Flash>,
}

impl EngineSnapshot {
    /// True when the two snapshots would be drawn differently, ignoring the countdowns.
    pub fn differs_visibly(&self, other: &EngineSnapshot) -> bool {
        self.phase != other.phase
            || self.current_round != other.current_round
            || self.prompt != other.prompt
            || self.flash != other.flash
            || self.button_order != other.button_order
    }
}
