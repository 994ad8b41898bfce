//! The round engine: prompts, nested countdowns, scoring and round transitions.
//!
//! The engine never looks at a clock. A caller drives it by calling [`Engine::tick`] every
//! [`TICK_MS`] with the [`Epoch`] it was given, and forwards player input through
//! [`Engine::select_color`]. Every transition into or out of a round moves to a new epoch, so a
//! tick scheduled for an earlier round can't touch the current one.

use rand::Rng;
use thiserror::Error;
use tracing::instrument;

use crate::{
    color::{ButtonOrder, Color},
    player::Player,
    prompt::{Prompt, PromptGenerator},
    score::{Attribution, PlayerScore, RoundSummary, ScoreReport, ScoreSink, SinkError},
    settings::GameSettings,
    timing::{self, TICK_MS},
    Epoch, PlayerId,
};

use self::round::{GameRunState, RoundState};

mod round;
mod snapshot;

pub use round::{Flash, Phase, Verdict};
pub use snapshot::EngineSnapshot;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum EngineError {
    #[error("A game needs at least one player")]
    EmptyRoster,
    #[error("Player {0:#} is not on the roster")]
    UnknownPlayer(PlayerId),
    #[error("Can't {action} while the game is {phase:?}")]
    InvalidAction { action: &'static str, phase: Phase },
    #[error(transparent)]
    Sink(#[from] SinkError),
}

pub type EngineResult<T> = Result<T, EngineError>;

/// What a call to [`Engine::tick`] did.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum TickOutcome {
    /// The tick belonged to an earlier epoch and was dropped.
    Stale,
    /// No round is running.
    Idle,
    Running,
    /// A round that wasn't the last one ran out of time.
    RoundEnded,
    /// The last round ran out of time and the final report was handed off.
    GameCompleted,
}

pub struct Engine<R, S> {
    settings: GameSettings,
    players: Vec<Player>,
    attribution: Attribution,
    prompts: PromptGenerator<R>,
    sink: S,
    run: GameRunState,
    round: RoundState,
    flash: Option<Flash>,
    epoch: Epoch,
}

impl<R, S> std::fmt::Debug for Engine<R, S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("epoch", &self.epoch)
            .field("phase", &self.run.phase)
            .field("round", &self.run.current_round)
            .finish_non_exhaustive()
    }
}

impl<R: Rng, S: ScoreSink> Engine<R, S> {
    /// # Errors
    ///
    /// Fails if `players` is empty or if `attribution` credits a player who isn't in `players`.
    pub fn new(
        settings: GameSettings,
        players: Vec<Player>,
        attribution: Attribution,
        rng: R,
        sink: S,
    ) -> EngineResult<Self> {
        if players.is_empty() {
            return Err(EngineError::EmptyRoster);
        }
        if let Attribution::Local(id) = attribution {
            if !players.iter().any(|p| p.id == id) {
                return Err(EngineError::UnknownPlayer(id));
            }
        }

        let run = GameRunState::new(&players);
        Ok(Self {
            settings,
            players,
            attribution,
            prompts: PromptGenerator::new(rng),
            sink,
            run,
            round: RoundState::new(1),
            flash: None,
            epoch: Epoch(0),
        })
    }

    /// Starts the first round.
    #[instrument(skip_all, fields(engine = ?self))]
    pub fn start_round(&mut self) -> EngineResult<()> {
        self.expect_phase("start the game", Phase::NotStarted)?;
        self.begin_round(1);
        Ok(())
    }

    /// Leaves the round summary and starts the following round.
    #[instrument(skip_all, fields(engine = ?self))]
    pub fn start_next_round(&mut self) -> EngineResult<()> {
        self.expect_phase("start the next round", Phase::RoundEndSummary)?;
        if self.run.current_round >= self.settings.rounds() {
            return Err(EngineError::InvalidAction {
                action: "start the next round",
                phase: self.run.phase,
            });
        }
        self.begin_round(self.run.current_round + 1);
        Ok(())
    }

    /// Throws away the current game and goes back to a fresh, unstarted one.
    #[instrument(skip_all, fields(engine = ?self))]
    pub fn restart(&mut self) {
        self.run = GameRunState::new(&self.players);
        self.round = RoundState::new(1);
        self.flash = None;
        self.epoch = self.epoch.next();
        tracing::info!("Game reset");
    }

    /// Answers the current prompt.
    ///
    /// Returns `None` when the input is ignored: no round is running, or the previous answer is
    /// still being shown.
    pub fn select_color(&mut self, color: Color) -> Option<Verdict> {
        if self.run.phase != Phase::InRound {
            return None;
        }
        let prompt = self.round.prompt?;
        let verdict = if prompt.is_correct(color) {
            Verdict::Correct
        } else {
            Verdict::Incorrect
        };
        self.resolve(verdict);
        Some(verdict)
    }

    /// Advances the game by one [`TICK_MS`] step.
    ///
    /// The round timer is checked first. When it runs out the round ends and nothing else
    /// happens on this tick, even if the prompt timer would also have expired.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Sink`] if the score sink rejects a summary or the final report.
    /// The transition has already happened by then and is not undone.
    pub fn tick(&mut self, epoch: Epoch) -> EngineResult<TickOutcome> {
        if epoch != self.epoch {
            tracing::debug!(%epoch, current = %self.epoch, "Dropped stale tick");
            return Ok(TickOutcome::Stale);
        }
        if self.run.phase != Phase::InRound {
            return Ok(TickOutcome::Idle);
        }

        self.round.round_time_remaining_ms =
            self.round.round_time_remaining_ms.saturating_sub(TICK_MS);
        if self.round.round_time_remaining_ms == 0 {
            return self.end_round();
        }

        if self.round.feedback_remaining_ms > 0 {
            self.round.feedback_remaining_ms =
                self.round.feedback_remaining_ms.saturating_sub(TICK_MS);
            if self.round.feedback_remaining_ms == 0 {
                self.next_prompt();
            }
        } else if let Some(remaining) = self.round.prompt_time_remaining_ms {
            let remaining = remaining.saturating_sub(TICK_MS);
            self.round.prompt_time_remaining_ms = Some(remaining);
            if remaining == 0 {
                self.resolve(Verdict::TimedOut);
            }
        }

        if self.round.shuffles() {
            self.round.shuffle_elapsed_ms += TICK_MS;
            if self.round.shuffle_elapsed_ms >= timing::shuffle_interval(self.round.round_number) {
                self.round.shuffle_elapsed_ms = 0;
                self.round.button_order.rotate();
                tracing::trace!(order = ?self.round.button_order, "Shuffled buttons");
            }
        }

        Ok(TickOutcome::Running)
    }

    /// Ticks the current epoch for `ms` worth of time, stopping early if the round ends.
    pub fn advance(&mut self, ms: u32) -> EngineResult<TickOutcome> {
        let mut outcome = TickOutcome::Idle;
        for _ in 0..ms / TICK_MS {
            outcome = self.tick(self.epoch)?;
            if outcome != TickOutcome::Running {
                break;
            }
        }
        Ok(outcome)
    }

    pub fn score_report(&self) -> ScoreReport {
        ScoreReport {
            settings: self.settings,
            rounds_played: self.run.current_round,
            total_score: self.run.total_score,
            players: self.run.player_scores.clone(),
        }
    }

    pub fn snapshot(&self) -> EngineSnapshot {
        EngineSnapshot {
            epoch: self.epoch,
            phase: self.run.phase,
            current_round: self.run.current_round,
            total_rounds: self.settings.rounds(),
            total_score: self.run.total_score,
            round_score: self.round.round_score,
            prompts_answered: self.round.prompts_answered,
            round_time_remaining_ms: self.round.round_time_remaining_ms,
            prompt_time_remaining_ms: self.round.prompt_time_remaining_ms,
            button_order: self.round.button_order,
            prompt: self.round.prompt,
            flash: self.flash,
        }
    }

    fn expect_phase(&self, action: &'static str, phase: Phase) -> EngineResult<()> {
        if self.run.phase != phase {
            tracing::warn!("Attempted to {action} during {:?}", self.run.phase);
            return Err(EngineError::InvalidAction {
                action,
                phase: self.run.phase,
            });
        }
        Ok(())
    }

    fn begin_round(&mut self, round_number: u8) {
        self.run.current_round = round_number;
        self.run.phase = Phase::InRound;
        self.round = RoundState::new(round_number);
        self.epoch = self.epoch.next();
        self.next_prompt();
        tracing::info!(
            round_time_ms = self.round.round_time_remaining_ms,
            "Round {round_number} started"
        );
    }

    fn next_prompt(&mut self) {
        let prompt = self.prompts.next();
        self.round.show_prompt(prompt);
        self.flash = None;
    }

    fn resolve(&mut self, verdict: Verdict) {
        self.round.resolve(verdict);
        self.flash = Some(verdict.flash());
        tracing::debug!(
            ?verdict,
            round_score = self.round.round_score,
            answered = self.round.prompts_answered,
            "Prompt resolved"
        );
    }

    fn end_round(&mut self) -> EngineResult<TickOutcome> {
        let round = self.run.current_round;
        let round_score = self.round.round_score;
        self.run.total_score += round_score;
        self.run.attribute(self.attribution);
        self.round.halt();
        self.flash = None;
        self.epoch = self.epoch.next();

        if round >= self.settings.rounds() {
            self.run.phase = Phase::Complete;
            tracing::info!(total_score = self.run.total_score, "Game complete");
            let report = self.score_report();
            self.sink.game_ended(&report)?;
            Ok(TickOutcome::GameCompleted)
        } else {
            self.run.phase = Phase::RoundEndSummary;
            tracing::info!(round_score, "Round {round} over");
            self.sink.round_ended(&RoundSummary {
                round,
                round_score,
                total_score: self.run.total_score,
            })?;
            Ok(TickOutcome::RoundEnded)
        }
    }
}

impl<R, S> Engine<R, S> {
    pub fn epoch(&self) -> Epoch {
        self.epoch
    }

    pub fn phase(&self) -> Phase {
        self.run.phase
    }

    pub fn settings(&self) -> GameSettings {
        self.settings
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn current_round(&self) -> u8 {
        self.run.current_round
    }

    pub fn total_score(&self) -> u32 {
        self.run.total_score
    }

    pub fn round_score(&self) -> u32 {
        self.round.round_score
    }

    pub fn prompts_answered(&self) -> u32 {
        self.round.prompts_answered
    }

    pub fn round_time_remaining_ms(&self) -> u32 {
        self.round.round_time_remaining_ms
    }

    pub fn prompt_time_remaining_ms(&self) -> Option<u32> {
        self.round.prompt_time_remaining_ms
    }

    pub fn button_order(&self) -> ButtonOrder {
        self.round.button_order
    }

    pub fn current_prompt(&self) -> Option<Prompt> {
        self.round.prompt
    }

    pub fn flash(&self) -> Option<Flash> {
        self.flash
    }

    pub fn player_scores(&self) -> impl Iterator<Item = (&PlayerId, &PlayerScore)> {
        self.run.player_scores.iter()
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }
}
