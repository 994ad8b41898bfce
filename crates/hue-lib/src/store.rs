use std::{
    collections::HashMap,
    io::ErrorKind,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    player::PlayerOptions,
    settings::{Difficulty, GameSettings, SettingsResult, DEFAULT_ROUNDS},
};

pub const PREFERENCES_KEY: &str = "preferences";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Invalid store key '{0}'")]
    InvalidKey(String),
    #[error("Failed to access the store: {0}")]
    Io(#[from] std::io::Error),
    #[error("Stored value for '{key}' is corrupt: {source}")]
    Decode {
        key: String,
        #[source]
        source: bincode::Error,
    },
    #[error("Failed to encode value for '{key}': {source}")]
    Encode {
        key: String,
        #[source]
        source: bincode::Error,
    },
}

pub type StoreResult<T> = Result<T, StoreError>;

/// A tiny key-value store for things that should survive a restart.
pub trait KeyValueStore {
    fn load(&self, key: &str) -> StoreResult<Option<Vec<u8>>>;

    fn save(&mut self, key: &str, value: Vec<u8>) -> StoreResult<()>;
}

#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    values: HashMap<String, Vec<u8>>,
}

impl KeyValueStore for MemoryStore {
    fn load(&self, key: &str) -> StoreResult<Option<Vec<u8>>> {
        Ok(self.values.get(key).cloned())
    }

    fn save(&mut self, key: &str, value: Vec<u8>) -> StoreResult<()> {
        self.values.insert(key.to_owned(), value);
        Ok(())
    }
}

/// Stores each key as its own file inside a directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Opens the store, creating `dir` if needed.
    pub fn open(dir: impl AsRef<Path>) -> StoreResult<Self> {
        let dir = dir.as_ref().to_path_buf();
        std::fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    fn path_for(&self, key: &str) -> StoreResult<PathBuf> {
        let valid = !key.is_empty()
            && key
                .bytes()
                .all(|b| b.is_ascii_alphanumeric() || b == b'_' || b == b'-');
        if !valid {
            return Err(StoreError::InvalidKey(key.to_owned()));
        }
        Ok(self.dir.join(format!("{key}.bin")))
    }
}

impl KeyValueStore for FileStore {
    fn load(&self, key: &str) -> StoreResult<Option<Vec<u8>>> {
        match std::fs::read(self.path_for(key)?) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Writes to a temporary file first and renames it over the old one, so an interrupted
    /// save never leaves a truncated value behind.
    fn save(&mut self, key: &str, value: Vec<u8>) -> StoreResult<()> {
        let path = self.path_for(key)?;
        let tmp_path = path.with_extension("bin.tmp");
        std::fs::write(&tmp_path, value)?;
        std::fs::rename(&tmp_path, &path)?;
        Ok(())
    }
}

/// What the player chose last time: their nickname and how they like to play.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preferences {
    pub nickname: String,
    pub difficulty: Difficulty,
    pub rounds: u8,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            nickname: String::new(),
            difficulty: Difficulty::default(),
            rounds: DEFAULT_ROUNDS,
        }
    }
}

impl Preferences {
    /// Loads saved preferences, falling back to defaults if nothing was saved yet.
    ///
    /// # Errors
    ///
    /// Corrupt data is reported rather than replaced with defaults.
    pub fn load(store: &impl KeyValueStore) -> StoreResult<Self> {
        let Some(bytes) = store.load(PREFERENCES_KEY)? else {
            return Ok(Self::default());
        };
        bincode::deserialize(&bytes).map_err(|source| StoreError::Decode {
            key: PREFERENCES_KEY.to_owned(),
            source,
        })
    }

    pub fn save(&self, store: &mut impl KeyValueStore) -> StoreResult<()> {
        let bytes = bincode::serialize(self).map_err(|source| StoreError::Encode {
            key: PREFERENCES_KEY.to_owned(),
            source,
        })?;
        store.save(PREFERENCES_KEY, bytes)
    }

    pub fn game_settings(&self) -> SettingsResult<GameSettings> {
        GameSettings::from_difficulty(self.difficulty, self.rounds)
    }

    pub fn player_options(&self) -> PlayerOptions {
        PlayerOptions::new(self.nickname.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::{FileStore, KeyValueStore, MemoryStore, Preferences, StoreError, PREFERENCES_KEY};
    use crate::settings::{Difficulty, SettingsError};

    #[test]
    fn defaults_when_nothing_saved() {
        let store = MemoryStore::default();
        assert_eq!(Preferences::load(&store).unwrap(), Preferences::default());
    }

    #[test]
    fn save_and_load() {
        let mut store = MemoryStore::default();
        let prefs = Preferences {
            nickname: "Vermilion".to_owned(),
            difficulty: Difficulty::Difficult,
            rounds: 5,
        };
        prefs.save(&mut store).unwrap();
        assert_eq!(Preferences::load(&store).unwrap(), prefs);

        let settings = prefs.game_settings().unwrap();
        assert_eq!(settings.speed(), Difficulty::Difficult.speed());
        assert_eq!(settings.rounds(), 5);
    }

    #[test]
    fn corrupt_data_is_an_error() {
        let mut store = MemoryStore::default();
        store.save(PREFERENCES_KEY, vec![0xff]).unwrap();
        assert!(matches!(
            Preferences::load(&store),
            Err(StoreError::Decode { .. })
        ));
    }

    #[test]
    fn bad_rounds_are_rejected_not_clamped() {
        let prefs = Preferences {
            rounds: 40,
            ..Default::default()
        };
        assert_eq!(
            prefs.game_settings(),
            Err(SettingsError::RoundsOutOfRange(40))
        );
    }

    #[test]
    fn file_store() {
        let dir = std::env::temp_dir().join(format!("hue-store-test-{}", std::process::id()));
        let mut store = FileStore::open(&dir).unwrap();

        assert_eq!(store.load("missing").unwrap(), None);
        store.save("nickname", b"Cyan".to_vec()).unwrap();
        assert_eq!(store.load("nickname").unwrap(), Some(b"Cyan".to_vec()));

        // Reopening sees the same data
        let reopened = FileStore::open(&dir).unwrap();
        assert_eq!(reopened.load("nickname").unwrap(), Some(b"Cyan".to_vec()));

        assert!(matches!(
            store.save("../escape", vec![]),
            Err(StoreError::InvalidKey(_))
        ));

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn file_store_replaces_whole_value() {
        let dir = std::env::temp_dir().join(format!("hue-store-replace-{}", std::process::id()));
        let mut store = FileStore::open(&dir).unwrap();

        let first = Preferences {
            nickname: "Magenta".to_owned(),
            difficulty: Difficulty::Easy,
            rounds: 10,
        };
        first.save(&mut store).unwrap();
        let second = Preferences {
            nickname: "Ox".to_owned(),
            ..Default::default()
        };
        second.save(&mut store).unwrap();

        // A shorter value leaves nothing of the longer one behind
        assert_eq!(Preferences::load(&store).unwrap(), second);

        let files = std::fs::read_dir(&dir)
            .unwrap()
            .map(|entry| entry.unwrap().file_name().into_string().unwrap())
            .collect::<Vec<_>>();
        assert_eq!(files, vec![format!("{PREFERENCES_KEY}.bin")]);

        std::fs::remove_dir_all(&dir).unwrap();
    }
}
