use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::{
    color::ButtonOrder,
    player::Player,
    prompt::Prompt,
    score::{Attribution, PlayerScore},
    timing, PlayerId,
};

#[derive(Debug, Copy, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum Phase {
    NotStarted,
    InRound,
    RoundEndSummary,
    Complete,
}

/// Transient feedback shown after each answer. Has no effect on scoring.
#[derive(Debug, Copy, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum Flash {
    Green,
    Red,
}

/// How a prompt was resolved.
#[derive(Debug, Copy, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum Verdict {
    Correct,
    Incorrect,
    TimedOut,
}

impl Verdict {
    pub fn flash(self) -> Flash {
        match self {
            Verdict::Correct => Flash::Green,
            Verdict::Incorrect | Verdict::TimedOut => Flash::Red,
        }
    }
}

/// Everything that lives for exactly one round.
#[derive(Debug, Clone)]
pub(crate) struct RoundState {
    pub(crate) round_number: u8,
    pub(crate) prompts_answered: u32,
    pub(crate) round_score: u32,
    pub(crate) round_time_remaining_ms: u32,
    pub(crate) prompt_time_remaining_ms: Option<u32>,
    pub(crate) button_order: ButtonOrder,
    pub(crate) prompt: Option<Prompt>,
    pub(crate) feedback_remaining_ms: u32,
    pub(crate) shuffle_elapsed_ms: u32,
}

impl RoundState {
    pub(crate) fn new(round_number: u8) -> Self {
        Self {
            round_number,
            prompts_answered: 0,
            round_score: 0,
            round_time_remaining_ms: timing::total_round_time(round_number),
            prompt_time_remaining_ms: None,
            button_order: ButtonOrder::canonical(),
            prompt: None,
            feedback_remaining_ms: 0,
            shuffle_elapsed_ms: 0,
        }
    }

    pub(crate) fn shuffles(&self) -> bool {
        self.round_number > 1
    }

    pub(crate) fn show_prompt(&mut self, prompt: Prompt) {
        self.prompt = Some(prompt);
        self.prompt_time_remaining_ms = Some(timing::time_per_word(
            self.round_number,
            self.prompts_answered,
        ));
        self.feedback_remaining_ms = 0;
    }

    /// Scores the current prompt and starts the feedback pause.
    pub(crate) fn resolve(&mut self, verdict: Verdict) {
        if verdict == Verdict::Correct {
            self.round_score += 1;
        }
        self.prompts_answered += 1;
        self.prompt = None;
        self.prompt_time_remaining_ms = None;
        self.feedback_remaining_ms = timing::FEEDBACK_DELAY_MS;
    }

    /// Stops every countdown. Called once the round is no longer active.
    pub(crate) fn halt(&mut self) {
        self.round_time_remaining_ms = 0;
        self.prompt = None;
        self.prompt_time_remaining_ms = None;
        self.feedback_remaining_ms = 0;
        self.shuffle_elapsed_ms = 0;
        self.button_order = ButtonOrder::canonical();
    }
}

/// State that spans the whole game.
#[derive(Debug, Clone)]
pub(crate) struct GameRunState {
    pub(crate) current_round: u8,
    pub(crate) total_score: u32,
    pub(crate) player_scores: HashMap<PlayerId, PlayerScore>,
    pub(crate) phase: Phase,
}

impl GameRunState {
    pub(crate) fn new(players: &[Player]) -> Self {
        let player_scores = players
            .iter()
            .map(|p| {
                (
                    p.id,
                    PlayerScore {
                        nickname: p.nickname.clone(),
                        nickname_colour: p.nickname_colour,
                        total_score: 0,
                    },
                )
            })
            .collect();

        Self {
            current_round: 1,
            total_score: 0,
            player_scores,
            phase: Phase::NotStarted,
        }
    }

    pub(crate) fn attribute(&mut self, attribution: Attribution) {
        let total = self.total_score;
        for (&id, score) in self.player_scores.iter_mut() {
            score.total_score = if attribution.credits(id) { total } else { 0 };
        }
    }
}
