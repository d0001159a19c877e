//! Browser LocalStorage backend

use serde::Serialize;
use serde::de::DeserializeOwned;

use super::{LeaderboardStore, Result, StorageError};
use crate::highscores::Leaderboard;

/// Leaderboard stored under a LocalStorage key
#[derive(Debug, Clone)]
pub struct LocalStorageStore {
    key: String,
}

impl LocalStorageStore {
    /// LocalStorage key
    pub const DEFAULT_KEY: &'static str = "leaderboard";

    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into() }
    }
}

impl Default for LocalStorageStore {
    fn default() -> Self {
        Self::new(Self::DEFAULT_KEY)
    }
}

impl LeaderboardStore for LocalStorageStore {
    fn load(&self) -> Result<Leaderboard> {
        Ok(read_item(&self.key)?.unwrap_or_default())
    }

    fn save(&mut self, board: &Leaderboard) -> Result<()> {
        write_item(&self.key, board)
    }
}

fn storage() -> Result<web_sys::Storage> {
    web_sys::window()
        .and_then(|w| w.local_storage().ok())
        .flatten()
        .ok_or_else(|| StorageError::Unavailable("localStorage".into()))
}

/// Read a JSON document; a missing key is `Ok(None)`
pub fn read_item<T: DeserializeOwned>(key: &str) -> Result<Option<T>> {
    let item = storage()?
        .get_item(key)
        .map_err(|_| StorageError::Unavailable(format!("read {key}")))?;
    match item {
        Some(json) => Ok(Some(serde_json::from_str(&json)?)),
        None => Ok(None),
    }
}

pub fn write_item<T: Serialize>(key: &str, value: &T) -> Result<()> {
    let json = serde_json::to_string(value)?;
    storage()?
        .set_item(key, &json)
        .map_err(|_| StorageError::Unavailable(format!("write {key}")))
}
