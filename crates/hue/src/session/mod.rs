use hue_lib::{
    engine::{Engine, EngineError, EngineSnapshot},
    player::Player,
    score::{Attribution, RoundSummary, ScoreReport},
    settings::GameSettings,
};
use rand::Rng;
use thiserror::Error;
use tokio::sync::{broadcast, mpsc};

use self::{
    session_actor::{BroadcastSink, SessionActor},
    session_handle::SessionHandle,
};

mod session_actor;
pub mod session_handle;

/// Everything a front-end needs to follow a running game.
#[derive(Debug, Clone)]
pub enum SessionEvent {
    Snapshot(EngineSnapshot),
    RoundOver(RoundSummary),
    GameOver(ScoreReport),
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error(transparent)]
    Engine(#[from] EngineError),
    #[error("The Session Handle is no longer connected to a game.")]
    HandleInvalid,
}

pub type SessionResult<T> = Result<T, SessionError>;

/// Spawns a session actor for a new game. The session runs until the last handle is dropped.
pub fn start_session<R: Rng + Send + 'static>(
    settings: GameSettings,
    players: Vec<Player>,
    attribution: Attribution,
    rng: R,
) -> SessionResult<(SessionHandle, broadcast::Receiver<SessionEvent>)> {
    let (sender, receiver) = mpsc::channel(64);
    let (events, event_receiver) = broadcast::channel(100);
    let sink = BroadcastSink {
        sender: events.clone(),
    };
    let engine = Engine::new(settings, players, attribution, rng, sink)?;
    let actor = SessionActor::new(receiver, engine, events);
    tokio::spawn(actor.run());

    Ok((SessionHandle { sender }, event_receiver))
}
