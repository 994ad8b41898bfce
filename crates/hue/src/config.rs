use std::path::PathBuf;

use anyhow::Context;
use hue_lib::{settings::Difficulty, store::Preferences};

const NICKNAME_VAR: &str = "HUE_NICKNAME";
const DIFFICULTY_VAR: &str = "HUE_DIFFICULTY";
const ROUNDS_VAR: &str = "HUE_ROUNDS";
const SEED_VAR: &str = "HUE_SEED";
const STORE_DIR_VAR: &str = "HUE_STORE_DIR";
const DEFAULT_STORE_DIR: &str = ".hue";

/// Overrides taken from the environment. Anything left unset falls back to saved preferences.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub nickname: Option<String>,
    pub difficulty: Option<Difficulty>,
    pub rounds: Option<u8>,
    pub seed: Option<u64>,
    pub store_dir: PathBuf,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let difficulty = lookup(DIFFICULTY_VAR)
            .map(|v| v.parse::<Difficulty>())
            .transpose()
            .with_context(|| format!("Invalid {DIFFICULTY_VAR}"))?;
        let rounds = lookup(ROUNDS_VAR)
            .map(|v| v.trim().parse::<u8>())
            .transpose()
            .with_context(|| format!("{ROUNDS_VAR} must be a number"))?;
        let seed = lookup(SEED_VAR)
            .map(|v| v.trim().parse::<u64>())
            .transpose()
            .with_context(|| format!("{SEED_VAR} must be a number"))?;

        Ok(Self {
            nickname: lookup(NICKNAME_VAR),
            difficulty,
            rounds,
            seed,
            store_dir: lookup(STORE_DIR_VAR)
                .unwrap_or_else(|| DEFAULT_STORE_DIR.to_owned())
                .into(),
        })
    }

    /// Writes the overrides into `prefs` so they are remembered next time.
    pub fn apply(&self, prefs: &mut Preferences) {
        if let Some(nickname) = &self.nickname {
            prefs.nickname = nickname.clone();
        }
        if let Some(difficulty) = self.difficulty {
            prefs.difficulty = difficulty;
        }
        if let Some(rounds) = self.rounds {
            prefs.rounds = rounds;
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use hue_lib::{settings::Difficulty, store::Preferences};

    use super::Config;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect::<HashMap<_, _>>();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn defaults() {
        let config = Config::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.nickname, None);
        assert_eq!(config.difficulty, None);
        assert_eq!(config.store_dir.to_str(), Some(".hue"));

        let mut prefs = Preferences::default();
        config.apply(&mut prefs);
        assert_eq!(prefs, Preferences::default());
    }

    #[test]
    fn overrides() {
        let config = Config::from_lookup(lookup(&[
            ("HUE_NICKNAME", "Teal"),
            ("HUE_DIFFICULTY", "difficult"),
            ("HUE_ROUNDS", "7"),
            ("HUE_SEED", "99"),
            ("HUE_STORE_DIR", "/tmp/hue"),
        ]))
        .unwrap();
        assert_eq!(config.seed, Some(99));

        let mut prefs = Preferences::default();
        config.apply(&mut prefs);
        assert_eq!(prefs.nickname, "Teal");
        assert_eq!(prefs.difficulty, Difficulty::Difficult);
        assert_eq!(prefs.rounds, 7);
    }

    #[test]
    fn garbage_is_rejected() {
        assert!(Config::from_lookup(lookup(&[("HUE_DIFFICULTY", "impossible")])).is_err());
        assert!(Config::from_lookup(lookup(&[("HUE_ROUNDS", "lots")])).is_err());
        assert!(Config::from_lookup(lookup(&[("HUE_SEED", "-1")])).is_err());
    }
}
