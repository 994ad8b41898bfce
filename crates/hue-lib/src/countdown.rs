use std::fmt::Display;

use crate::timing::TICK_MS;

const STEP_MS: u32 = 1_000;
const GO_MS: u32 = 500;

/// What the countdown screen is currently showing.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum CountdownDisplay {
    Count(u32),
    Go,
    Done,
}

impl Display for CountdownDisplay {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CountdownDisplay::Count(n) => write!(f, "{n}"),
            CountdownDisplay::Go => f.write_str("GO!"),
            CountdownDisplay::Done => Ok(()),
        }
    }
}

/// The "3, 2, 1, GO!" shown before the first round.
#[derive(Debug, Clone)]
pub struct Countdown {
    remaining_ms: u32,
}

impl Default for Countdown {
    fn default() -> Self {
        Self::new(3)
    }
}

impl Countdown {
    pub fn new(from: u32) -> Self {
        Self {
            remaining_ms: from * STEP_MS + GO_MS,
        }
    }

    pub fn display(&self) -> CountdownDisplay {
        match self.remaining_ms {
            0 => CountdownDisplay::Done,
            ms if ms <= GO_MS => CountdownDisplay::Go,
            ms => CountdownDisplay::Count((ms - GO_MS).div_ceil(STEP_MS)),
        }
    }

    /// Advances by one tick and returns what should be shown now.
    pub fn tick(&mut self) -> CountdownDisplay {
        self.remaining_ms = self.remaining_ms.saturating_sub(TICK_MS);
        self.display()
    }

    pub fn is_done(&self) -> bool {
        self.remaining_ms == 0
    }
}
