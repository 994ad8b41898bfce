//! Timer budgets for rounds and prompts.
//!
//! All durations are whole milliseconds. Every budget shrinks as the game goes on, but each one
//! bottoms out at a floor so the game never becomes impossible.

/// Length of one clock step. Both countdowns and the shuffle cadence advance by this much per tick.
pub const TICK_MS: u32 = 100;

/// Pause after an answer or timeout before the next prompt appears. Input is ignored meanwhile.
pub const FEEDBACK_DELAY_MS: u32 = 400;

pub const BASE_ROUND_TIME_MS: u32 = 20_000;
pub const BASE_WORD_TIME_MS: u32 = 5_000;
pub const MIN_WORD_TIME_MS: u32 = 1_000;

const MIN_ROUND_TIME_MULTIPLIER: f64 = 0.7;
const MIN_ROUND_SPEED_MULTIPLIER: f64 = 0.6;
const MIN_WORD_SPEED_MULTIPLIER: f64 = 0.3;

/// Later rounds are shorter, flooring out at 70% of the base from round 6 onward.
pub fn round_time_multiplier(round: u8) -> f64 {
    let r = f64::from(round.max(1) - 1);
    (1.2 - r * 0.1).max(MIN_ROUND_TIME_MULTIPLIER)
}

pub fn total_round_time(round: u8) -> u32 {
    (f64::from(BASE_ROUND_TIME_MS) * round_time_multiplier(round)).round() as u32
}

pub fn round_speed_multiplier(round: u8) -> f64 {
    let r = f64::from(round.max(1) - 1);
    (1.2 - r * 0.15).max(MIN_ROUND_SPEED_MULTIPLIER)
}

/// `prompts_answered` counts prompts resolved so far in the current round, timeouts included.
pub fn word_speed_multiplier(prompts_answered: u32) -> f64 {
    (1.5 - f64::from(prompts_answered) * 0.04).max(MIN_WORD_SPEED_MULTIPLIER)
}

/// Reaction budget for the next prompt. Never below [`MIN_WORD_TIME_MS`].
pub fn time_per_word(round: u8, prompts_answered: u32) -> u32 {
    let time = f64::from(BASE_WORD_TIME_MS)
        * round_speed_multiplier(round)
        * word_speed_multiplier(prompts_answered);
    (time.round() as u32).max(MIN_WORD_TIME_MS)
}

/// How often the answer buttons rotate. Only used from round 2 onward.
pub fn shuffle_interval(round: u8) -> u32 {
    2_000 + u32::from(round) * 500
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn word_time_has_floor() {
        for round in 1..=10 {
            for answered in 0..=50 {
                assert!(time_per_word(round, answered) >= MIN_WORD_TIME_MS);
            }
        }
        // Deep into a late round the floor is what's left
        assert_eq!(time_per_word(10, 500), MIN_WORD_TIME_MS);
    }

    #[test]
    fn word_time_values() {
        assert_eq!(time_per_word(1, 0), 9_000);
        assert_eq!(time_per_word(1, 1), 8_760);
        assert_eq!(time_per_word(2, 0), 7_875);
        // Round speed floors at 0.6 from round 5
        assert_eq!(time_per_word(5, 0), time_per_word(9, 0));
        // Word speed floors at 0.3 after 30 prompts
        assert_eq!(time_per_word(1, 30), 1_800);
        assert_eq!(time_per_word(1, 45), 1_800);
    }

    #[test]
    fn round_time_is_non_increasing() {
        let mut previous = u32::MAX;
        for round in 1..=10 {
            let time = total_round_time(round);
            assert!(time <= previous, "round {round} grew to {time}");
            assert!(time >= 14_000);
            previous = time;
        }
        assert_eq!(total_round_time(1), 24_000);
        assert_eq!(total_round_time(2), 22_000);
        assert_eq!(total_round_time(6), 14_000);
        assert_eq!(total_round_time(10), 14_000);
    }

    #[test]
    fn shuffle_interval_grows_with_round() {
        assert_eq!(shuffle_interval(2), 3_000);
        assert_eq!(shuffle_interval(5), 4_500);
    }
}
