use std::{str::FromStr, time::Duration};

use crossterm::style::{Color as TermColor, Stylize};
use ecolor::Color32;
use hue_lib::{
    color::Color,
    countdown::{Countdown, CountdownDisplay},
    engine::{EngineSnapshot, Flash, Phase},
    player::Player,
    prompt::Instruction,
    room::Room,
    score::RoundSummary,
    timing::TICK_MS,
};
use thiserror::Error;
use tokio::{
    io::{AsyncBufRead, Lines},
    sync::broadcast::{self, error::RecvError},
    time,
};

use crate::session::{session_handle::SessionHandle, SessionError, SessionEvent, SessionResult};

pub const HELP: &str = "Answer with r/g/b or 1/2/3 for the button in that slot. \
Other commands: start, next, again, quit";

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Command {
    Pick(Color),
    /// Zero based slot of an answer button.
    Press(usize),
    Start,
    Next,
    Again,
    Quit,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("Unknown command '{0}'. {HELP}")]
pub struct UnknownCommand(String);

impl FromStr for Command {
    type Err = UnknownCommand;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let command = match s.trim().to_ascii_lowercase().as_str() {
            "r" | "red" => Self::Pick(Color::Red),
            "g" | "green" => Self::Pick(Color::Green),
            "b" | "blue" => Self::Pick(Color::Blue),
            "1" => Self::Press(0),
            "2" => Self::Press(1),
            "3" => Self::Press(2),
            "s" | "start" => Self::Start,
            "n" | "next" => Self::Next,
            "a" | "again" => Self::Again,
            "q" | "quit" | "exit" => Self::Quit,
            _ => return Err(UnknownCommand(s.trim().to_owned())),
        };
        Ok(command)
    }
}

fn term_colour(colour: Color32) -> TermColor {
    TermColor::Rgb {
        r: colour.r(),
        g: colour.g(),
        b: colour.b(),
    }
}

/// Styles `text` bold in the 24-bit foreground colour `colour`.
pub fn paint(text: &str, colour: Color32) -> String {
    text.with(term_colour(colour)).bold().to_string()
}

fn paint_color(color: Color) -> String {
    paint(color.label(), color.display_value())
}

/// The game screen for a snapshot, or `None` when there is nothing to draw for its phase.
pub fn render_snapshot(snapshot: &EngineSnapshot) -> Option<String> {
    match snapshot.phase {
        Phase::NotStarted => Some("Type 'start' when you're ready.".to_owned()),
        Phase::InRound => {
            let status = format!(
                "Round {}/{}  Score {}  {:.1}s left",
                snapshot.current_round,
                snapshot.total_rounds,
                snapshot.total_score + snapshot.round_score,
                f64::from(snapshot.round_time_remaining_ms) / 1000.0
            );
            let body = match (snapshot.prompt, snapshot.flash) {
                (Some(prompt), _) => {
                    let instruction = match prompt.instruction {
                        Instruction::Word => "WORD",
                        Instruction::Color => "COLOR",
                    };
                    let buttons = snapshot
                        .button_order
                        .as_slice()
                        .iter()
                        .enumerate()
                        .map(|(slot, &color)| format!("[{}] {}", slot + 1, paint_color(color)))
                        .collect::<Vec<_>>()
                        .join("  ");
                    format!(
                        "Click the {instruction}: {}    {buttons}",
                        paint(prompt.word.label(), prompt.display_color.display_value())
                    )
                }
                (None, Some(Flash::Green)) => paint("Correct!", Color::Green.display_value()),
                (None, Some(Flash::Red)) => paint("Miss!", Color::Red.display_value()),
                (None, None) => return Some(status),
            };
            Some(format!("{status}  |  {body}"))
        }
        Phase::RoundEndSummary | Phase::Complete => None,
    }
}

pub fn render_summary(summary: &RoundSummary) -> String {
    format!(
        "Round {} over! You scored {} this round, {} in total. Type 'next' to continue.",
        summary.round, summary.round_score, summary.total_score
    )
}

pub fn render_leaderboard(board: &[(&Player, u32)]) -> String {
    board
        .iter()
        .enumerate()
        .map(|(rank, (player, score))| {
            format!(
                "{:>2}. {} {score}",
                rank + 1,
                paint(&player.nickname, player.nickname_colour)
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Plays the "3, 2, 1, GO!" intro in real time.
async fn countdown() {
    let mut countdown = Countdown::default();
    let mut ticker = time::interval(Duration::from_millis(TICK_MS.into()));
    let mut shown = countdown.display();
    println!("{shown}");
    while !countdown.is_done() {
        ticker.tick().await;
        let now = countdown.tick();
        if now != shown && now != CountdownDisplay::Done {
            println!("{now}");
        }
        shown = now;
    }
}

/// Line based front-end driving one session from stdin.
pub struct Terminal<L> {
    handle: SessionHandle,
    room: Room,
    input: Lines<L>,
    last: Option<EngineSnapshot>,
}

impl<L: AsyncBufRead + Unpin> Terminal<L> {
    pub fn new(handle: SessionHandle, room: Room, input: Lines<L>) -> Self {
        Self {
            handle,
            room,
            input,
            last: None,
        }
    }

    /// Runs until the player quits or input ends.
    pub async fn run(mut self, mut events: broadcast::Receiver<SessionEvent>) -> anyhow::Result<Room> {
        println!("Room {}. {HELP}", self.room.code);

        loop {
            tokio::select! {
                line = self.input.next_line() => {
                    let Some(line) = line? else { break };
                    if line.trim().is_empty() {
                        continue;
                    }
                    if !self.command(&line).await? {
                        break;
                    }
                }
                event = events.recv() => match event {
                    Ok(event) => self.event(event)?,
                    Err(RecvError::Lagged(skipped)) => tracing::debug!(skipped, "Display fell behind"),
                    Err(RecvError::Closed) => break,
                },
            }
        }

        Ok(self.room)
    }

    /// Returns `false` once the player wants to leave.
    async fn command(&mut self, line: &str) -> anyhow::Result<bool> {
        let command = match line.parse::<Command>() {
            Ok(command) => command,
            Err(e) => {
                println!("{e}");
                return Ok(true);
            }
        };

        let host = self.room.host_id();
        let result = match command {
            Command::Quit => return Ok(false),
            Command::Pick(color) => self.pick(color).await,
            Command::Press(slot) => {
                match self.last.as_ref().and_then(|s| s.button_order.get(slot)) {
                    Some(color) => self.pick(color).await,
                    None => Ok(()),
                }
            }
            Command::Start => self.start().await,
            Command::Next => self.handle.start_next_round().await,
            Command::Again => {
                if let Err(e) = self.room.play_again(host) {
                    println!("{e}");
                    return Ok(true);
                }
                self.handle.restart().await?;
                self.start().await
            }
        };

        match result {
            Ok(()) => Ok(true),
            Err(SessionError::Engine(e)) => {
                println!("{e}");
                Ok(true)
            }
            Err(e @ SessionError::HandleInvalid) => Err(e.into()),
        }
    }

    async fn start(&mut self) -> SessionResult<()> {
        let snapshot = self.handle.snapshot().await?;
        if snapshot.phase == Phase::NotStarted {
            if let Err(e) = self.room.start_game(self.room.host_id()) {
                tracing::warn!(%e, "Room was not ready for a new game");
            }
            countdown().await;
        }
        self.handle.start_round().await
    }

    async fn pick(&mut self, color: Color) -> SessionResult<()> {
        if let Some(verdict) = self.handle.select_color(color).await? {
            tracing::debug!(?verdict, %color, "Answered");
        }
        Ok(())
    }

    fn event(&mut self, event: SessionEvent) -> anyhow::Result<()> {
        match event {
            SessionEvent::Snapshot(snapshot) => {
                let changed = self
                    .last
                    .as_ref()
                    .map_or(true, |last| snapshot.differs_visibly(last));
                if changed {
                    if let Some(screen) = render_snapshot(&snapshot) {
                        println!("{screen}");
                    }
                }
                self.last = Some(snapshot);
            }
            SessionEvent::RoundOver(summary) => println!("{}", render_summary(&summary)),
            SessionEvent::GameOver(report) => {
                self.room.finish(&report)?;
                println!("Game over! Final score: {}", report.total_score);
                println!("{}", render_leaderboard(&self.room.leaderboard()));
                println!("Type 'again' to play again or 'quit' to leave.");
            }
        }
        Ok(())
    }
}
