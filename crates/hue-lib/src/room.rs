use std::collections::HashMap;

use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    player::{Player, PlayerError, PlayerOptions},
    room_code::RoomCode,
    score::{PlayerScore, ScoreReport},
    settings::GameSettings,
    PlayerId, MAX_PLAYERS,
};

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum RoomError {
    #[error("Attempted to add a player to a full room")]
    RoomFull,
    #[error("Action attempted by Player {0:#} who is not in this room")]
    PlayerInvalid(PlayerId),
    #[error("Non-host attempted a host-only action")]
    NeedsHost,
    #[error("Action isn't possible while the room is {0:?}")]
    InvalidStatus(RoomStatus),
    #[error(transparent)]
    Player(#[from] PlayerError),
}

pub type RoomResult<T> = Result<T, RoomError>;

#[derive(Debug, Copy, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum RoomStatus {
    Waiting,
    Playing,
    Finished,
}

/// A room as seen from this device: who has joined, the settings for the next game and the
/// scores of the last one.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Room {
    pub code: RoomCode,
    pub settings: GameSettings,
    pub status: RoomStatus,
    host_id: PlayerId,
    players: Vec<Player>,
    scores: HashMap<PlayerId, PlayerScore>,
    next_join_order: usize,
}

impl Room {
    /// Opens a room with the host as its only player.
    pub fn open(
        code: RoomCode,
        host: PlayerOptions,
        settings: GameSettings,
        rng: &mut impl Rng,
    ) -> RoomResult<Self> {
        let host = host.validated()?;
        let host_id = PlayerId(rng.gen());
        let mut player = Player::new(host_id, host, 0);
        player.is_host = true;

        tracing::info!(%code, "Room opened");
        Ok(Self {
            code,
            settings,
            status: RoomStatus::Waiting,
            host_id,
            players: vec![player],
            scores: HashMap::new(),
            next_join_order: 1,
        })
    }

    pub fn host_id(&self) -> PlayerId {
        self.host_id
    }

    /// Players in the order they joined.
    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn player(&self, player_id: PlayerId) -> Option<&Player> {
        self.players.iter().find(|p| p.id == player_id)
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    /// # Errors
    ///
    /// Fails if the room is full, a game is in progress or the nickname is unusable.
    pub fn add_player(&mut self, options: PlayerOptions, rng: &mut impl Rng) -> RoomResult<PlayerId> {
        self.expect_status(RoomStatus::Waiting)?;
        if self.players.len() >= MAX_PLAYERS {
            return Err(RoomError::RoomFull);
        }
        let options = options.validated()?;

        let player_id = self.gen_player_id(rng);
        self.players
            .push(Player::new(player_id, options, self.next_join_order));
        self.next_join_order += 1;
        tracing::info!(%player_id, "Player joined room");
        Ok(player_id)
    }

    /// Removes a player. If the host leaves, the next player in join order becomes host.
    pub fn remove_player(&mut self, player_id: PlayerId) -> RoomResult<()> {
        let idx = self
            .players
            .iter()
            .position(|p| p.id == player_id)
            .ok_or(RoomError::PlayerInvalid(player_id))?;
        self.players.remove(idx);
        self.scores.remove(&player_id);
        tracing::info!(%player_id, "Player left room");

        if self.host_id == player_id {
            if let Some(next) = self.players.first_mut() {
                next.is_host = true;
                self.host_id = next.id;
                tracing::info!("Player {} is now the host", self.host_id);
            }
        }
        Ok(())
    }

    pub fn set_player_options(
        &mut self,
        player_id: PlayerId,
        options: PlayerOptions,
    ) -> RoomResult<()> {
        let options = options.validated()?;
        let player = self
            .players
            .iter_mut()
            .find(|p| p.id == player_id)
            .ok_or(RoomError::PlayerInvalid(player_id))?;
        player.nickname = options.nickname;
        Ok(())
    }

    pub fn set_settings(&mut self, player_id: PlayerId, settings: GameSettings) -> RoomResult<()> {
        self.expect_host(player_id)?;
        self.expect_status(RoomStatus::Waiting)?;
        self.settings = settings;
        tracing::info!("Set room settings to {:?}", self.settings);
        Ok(())
    }

    pub fn start_game(&mut self, player_id: PlayerId) -> RoomResult<()> {
        self.expect_host(player_id)?;
        self.expect_status(RoomStatus::Waiting)?;
        self.scores.clear();
        self.status = RoomStatus::Playing;
        tracing::info!("Started game");
        Ok(())
    }

    /// Records the final scores of the game in progress.
    pub fn finish(&mut self, report: &ScoreReport) -> RoomResult<()> {
        self.expect_status(RoomStatus::Playing)?;
        self.scores = report
            .players
            .iter()
            .filter(|(id, _)| self.player(**id).is_some())
            .map(|(&id, score)| (id, score.clone()))
            .collect();
        self.status = RoomStatus::Finished;
        tracing::info!(total_score = report.total_score, "Game finished");
        Ok(())
    }

    /// Goes back to the waiting room for another game with the same players.
    pub fn play_again(&mut self, player_id: PlayerId) -> RoomResult<()> {
        self.expect_host(player_id)?;
        self.expect_status(RoomStatus::Finished)?;
        self.scores.clear();
        self.status = RoomStatus::Waiting;
        Ok(())
    }

    pub fn score_of(&self, player_id: PlayerId) -> u32 {
        self.scores
            .get(&player_id)
            .map_or(0, |score| score.total_score)
    }

    /// Players ordered by their score in the last game, highest first.
    /// Players without a score count as 0 and keep their join order.
    pub fn leaderboard(&self) -> Vec<(&Player, u32)> {
        let mut board = self
            .players
            .iter()
            .map(|p| (p, self.score_of(p.id)))
            .collect::<Vec<_>>();
        board.sort_by(|(_, a), (_, b)| b.cmp(a));
        board
    }

    fn expect_host(&self, player_id: PlayerId) -> RoomResult<()> {
        if self.player(player_id).is_none() {
            return Err(RoomError::PlayerInvalid(player_id));
        }
        if self.host_id != player_id {
            return Err(RoomError::NeedsHost);
        }
        Ok(())
    }

    fn expect_status(&self, status: RoomStatus) -> RoomResult<()> {
        if self.status != status {
            return Err(RoomError::InvalidStatus(self.status));
        }
        Ok(())
    }

    fn gen_player_id(&self, rng: &mut impl Rng) -> PlayerId {
        let mut player_id;
        loop {
            player_id = PlayerId(rng.gen());
            if self.player(player_id).is_none() {
                break;
            };
        }
        player_id
    }
}
