use hue_lib::{
    color::Color,
    engine::{EngineSnapshot, Verdict},
};
use tokio::sync::{mpsc, oneshot};

use super::session_actor::SessionAction;
use super::{SessionError, SessionResult};

#[derive(Clone, Debug)]
pub struct SessionHandle {
    pub(super) sender: mpsc::Sender<SessionAction>,
}

impl SessionHandle {
    async fn execute<T>(
        &self,
        msg: SessionAction,
        rx: oneshot::Receiver<SessionResult<T>>,
    ) -> SessionResult<T> {
        // Ignore first error, if there is an error, rx.await will fail as well since it's sender
        // will have been dropped
        let _ = self.sender.send(msg).await;
        rx.await.unwrap_or(Err(SessionError::HandleInvalid))
    }

    pub async fn start_round(&self) -> SessionResult<()> {
        let (tx, rx) = oneshot::channel();
        let msg = SessionAction::StartRound { respond_to: tx };
        self.execute(msg, rx).await
    }

    pub async fn start_next_round(&self) -> SessionResult<()> {
        let (tx, rx) = oneshot::channel();
        let msg = SessionAction::StartNextRound { respond_to: tx };
        self.execute(msg, rx).await
    }

    /// "Play Again": throws away the finished game and waits for a new start.
    pub async fn restart(&self) -> SessionResult<()> {
        let (tx, rx) = oneshot::channel();
        let msg = SessionAction::Restart { respond_to: tx };
        self.execute(msg, rx).await
    }

    pub async fn select_color(&self, color: Color) -> SessionResult<Option<Verdict>> {
        let (tx, rx) = oneshot::channel();
        let msg = SessionAction::SelectColor {
            respond_to: tx,
            color,
        };
        self.execute(msg, rx).await
    }

    pub async fn snapshot(&self) -> SessionResult<EngineSnapshot> {
        let (tx, rx) = oneshot::channel();
        let msg = SessionAction::Snapshot { respond_to: tx };
        self.execute(msg, rx).await
    }
}
