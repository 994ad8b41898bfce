use std::time::Duration;

use hue_lib::color::Color;
use hue_lib::engine::{Engine, EngineSnapshot, TickOutcome, Verdict};
use hue_lib::score::{RoundSummary, ScoreReport, ScoreSink, SinkError};
use hue_lib::timing::TICK_MS;
use hue_lib::Epoch;
use rand::Rng;
use tokio::sync::{broadcast, mpsc, oneshot};
use tokio::time::{self, MissedTickBehavior};
use tracing::instrument;

use super::{SessionEvent, SessionResult};

/// Publishes round results and the final report to every front-end listening to the session.
#[derive(Debug)]
pub struct BroadcastSink {
    pub(super) sender: broadcast::Sender<SessionEvent>,
}

impl ScoreSink for BroadcastSink {
    fn round_ended(&mut self, summary: &RoundSummary) -> Result<(), SinkError> {
        self.sender
            .send(SessionEvent::RoundOver(*summary))
            .map(|_| ())
            .map_err(|_| SinkError("nobody is listening for round results".to_owned()))
    }

    fn game_ended(&mut self, report: &ScoreReport) -> Result<(), SinkError> {
        self.sender
            .send(SessionEvent::GameOver(report.clone()))
            .map(|_| ())
            .map_err(|_| SinkError("nobody is listening for the final scores".to_owned()))
    }
}

pub struct SessionActor<R> {
    receiver: mpsc::Receiver<SessionAction>,
    engine: Engine<R, BroadcastSink>,
    sender: broadcast::Sender<SessionEvent>,
    /// Epoch of the round the clock is currently driving, if any.
    armed: Option<Epoch>,
}

#[derive(Debug)]
pub enum SessionAction {
    StartRound {
        respond_to: oneshot::Sender<SessionResult<()>>,
    },
    StartNextRound {
        respond_to: oneshot::Sender<SessionResult<()>>,
    },
    Restart {
        respond_to: oneshot::Sender<SessionResult<()>>,
    },
    SelectColor {
        respond_to: oneshot::Sender<SessionResult<Option<Verdict>>>,
        color: Color,
    },
    Snapshot {
        respond_to: oneshot::Sender<SessionResult<EngineSnapshot>>,
    },
}

impl<R: Rng> SessionActor<R> {
    pub fn new(
        receiver: mpsc::Receiver<SessionAction>,
        engine: Engine<R, BroadcastSink>,
        sender: broadcast::Sender<SessionEvent>,
    ) -> Self {
        Self {
            receiver,
            engine,
            sender,
            armed: None,
        }
    }

    #[instrument(skip_all)]
    pub async fn run(mut self) {
        tracing::info!("Session opened");
        let mut ticker = time::interval(Duration::from_millis(TICK_MS.into()));
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                msg = self.receiver.recv() => {
                    let Some(msg) = msg else { break };
                    self.handle(msg);
                }
                _ = ticker.tick() => self.tick(),
            }
        }

        tracing::info!("Closing session");
    }

    fn handle(&mut self, msg: SessionAction) {
        match msg {
            SessionAction::StartRound { respond_to } => {
                let _ = respond_to.send(self.start_round());
            }
            SessionAction::StartNextRound { respond_to } => {
                let _ = respond_to.send(self.start_next_round());
            }
            SessionAction::Restart { respond_to } => {
                let _ = respond_to.send(self.restart());
            }
            SessionAction::SelectColor { respond_to, color } => {
                let _ = respond_to.send(self.select_color(color));
            }
            SessionAction::Snapshot { respond_to } => {
                let _ = respond_to.send(Ok(self.engine.snapshot()));
            }
        }
    }

    /// Drives the armed round by one step. Once the engine reports the epoch as finished the
    /// clock is disarmed until the next round is started.
    fn tick(&mut self) {
        let Some(epoch) = self.armed else {
            return;
        };

        match self.engine.tick(epoch) {
            Ok(TickOutcome::Running) => self.send_snapshot(),
            Ok(TickOutcome::RoundEnded | TickOutcome::GameCompleted) => {
                self.armed = None;
                self.send_snapshot();
            }
            Ok(TickOutcome::Stale | TickOutcome::Idle) => self.armed = None,
            Err(error) => {
                tracing::warn!(%error, "Failed to hand off scores");
                self.armed = None;
                self.send_snapshot();
            }
        }
    }

    fn send_snapshot(&mut self) {
        let _ = self.sender.send(SessionEvent::Snapshot(self.engine.snapshot()));
    }
}

// ----------------------------------------------------------------------------
// Message Handlers
// ----------------------------------------------------------------------------
impl<R: Rng> SessionActor<R> {
    #[instrument(skip(self))]
    fn start_round(&mut self) -> SessionResult<()> {
        self.engine.start_round()?;
        self.armed = Some(self.engine.epoch());
        self.send_snapshot();
        Ok(())
    }

    #[instrument(skip(self))]
    fn start_next_round(&mut self) -> SessionResult<()> {
        self.engine.start_next_round()?;
        self.armed = Some(self.engine.epoch());
        self.send_snapshot();
        Ok(())
    }

    #[instrument(skip(self))]
    fn restart(&mut self) -> SessionResult<()> {
        self.engine.restart();
        self.armed = None;
        self.send_snapshot();
        Ok(())
    }

    #[instrument(skip(self))]
    fn select_color(&mut self, color: Color) -> SessionResult<Option<Verdict>> {
        let verdict = self.engine.select_color(color);
        if verdict.is_some() {
            self.send_snapshot();
        }
        Ok(verdict)
    }
}
