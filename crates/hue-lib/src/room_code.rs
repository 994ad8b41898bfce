use std::fmt::Display;

use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const CODE_LEN: usize = 6;
pub const DEFAULT_ATTEMPTS: u32 = 10;
const ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum RoomCodeError {
    #[error("Room codes are {CODE_LEN} letters or digits, got '{0}'")]
    Malformed(String),
    #[error("Failed to generate a unique room code after {0} attempts")]
    Exhausted(u32),
}

/// Six upper-case letters or digits that identify a room.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RoomCode(String);

impl RoomCode {
    pub fn generate(rng: &mut impl Rng) -> Self {
        let code = (0..CODE_LEN)
            .map(|_| char::from(ALPHABET[rng.gen_range(0..ALPHABET.len())]))
            .collect();
        Self(code)
    }

    /// Keeps generating codes until `registry` accepts one.
    pub fn generate_unique(
        rng: &mut impl Rng,
        registry: &impl CodeRegistry,
        max_attempts: u32,
    ) -> Result<Self, RoomCodeError> {
        for attempt in 1..=max_attempts {
            let code = Self::generate(rng);
            if registry.is_unique(&code) {
                return Ok(code);
            }
            tracing::debug!(%code, attempt, "Room code already taken");
        }
        Err(RoomCodeError::Exhausted(max_attempts))
    }

    /// Parses a code typed in by a player. Case doesn't matter.
    pub fn parse(input: &str) -> Result<Self, RoomCodeError> {
        let code = input.trim().to_ascii_uppercase();
        if code.len() != CODE_LEN || !code.bytes().all(|b| ALPHABET.contains(&b)) {
            return Err(RoomCodeError::Malformed(input.to_owned()));
        }
        Ok(Self(code))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for RoomCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Knows which room codes are already in use.
pub trait CodeRegistry {
    fn is_unique(&self, code: &RoomCode) -> bool;
}

/// Accepts every code. There is no shared room directory to check against.
#[derive(Debug, Default, Clone, Copy)]
pub struct AlwaysUnique;

impl CodeRegistry for AlwaysUnique {
    fn is_unique(&self, _code: &RoomCode) -> bool {
        true
    }
}

impl CodeRegistry for std::collections::HashSet<RoomCode> {
    fn is_unique(&self, code: &RoomCode) -> bool {
        !self.contains(code)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use rand::{rngs::StdRng, SeedableRng};

    use super::{AlwaysUnique, CodeRegistry, RoomCode, RoomCodeError, CODE_LEN};

    #[test]
    fn generated_codes_are_well_formed() {
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..100 {
            let code = RoomCode::generate(&mut rng);
            assert_eq!(code.as_str().len(), CODE_LEN);
            assert_eq!(RoomCode::parse(code.as_str()), Ok(code));
        }
    }

    #[test]
    fn parse_normalises_case() {
        assert_eq!(RoomCode::parse(" ab12cd ").unwrap().as_str(), "AB12CD");
        assert!(matches!(
            RoomCode::parse("ABC"),
            Err(RoomCodeError::Malformed(_))
        ));
        assert!(matches!(
            RoomCode::parse("ABC-12"),
            Err(RoomCodeError::Malformed(_))
        ));
    }

    #[test]
    fn unique_against_placeholder() {
        let mut rng = StdRng::seed_from_u64(1);
        assert!(RoomCode::generate_unique(&mut rng, &AlwaysUnique, 10).is_ok());
    }

    struct NothingIsUnique;

    impl CodeRegistry for NothingIsUnique {
        fn is_unique(&self, _code: &RoomCode) -> bool {
            false
        }
    }

    #[test]
    fn gives_up_after_max_attempts() {
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(
            RoomCode::generate_unique(&mut rng, &NothingIsUnique, 10),
            Err(RoomCodeError::Exhausted(10))
        );
    }

    #[test]
    fn skips_taken_codes() {
        let taken = RoomCode::generate(&mut StdRng::seed_from_u64(9));
        let registry = HashSet::from([taken.clone()]);

        // Same seed, so the first candidate is the taken one
        let code = RoomCode::generate_unique(&mut StdRng::seed_from_u64(9), &registry, 10).unwrap();
        assert_ne!(code, taken);
    }
}
