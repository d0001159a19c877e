//! JSON file backend

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde::de::DeserializeOwned;

use super::{LeaderboardStore, Result};
use crate::highscores::Leaderboard;

/// Leaderboard stored as a JSON file
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl LeaderboardStore for JsonFileStore {
    fn load(&self) -> Result<Leaderboard> {
        Ok(read_json(&self.path)?.unwrap_or_default())
    }

    fn save(&mut self, board: &Leaderboard) -> Result<()> {
        write_json(&self.path, board)
    }
}

/// Read a JSON document; a missing file is `Ok(None)`
pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<Option<T>> {
    match fs::read_to_string(path) {
        Ok(json) => Ok(Some(serde_json::from_str(&json)?)),
        Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
        Err(err) => Err(err.into()),
    }
}

/// Write a JSON document, replacing the file via a temporary sibling
pub fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let json = serde_json::to_string_pretty(value)?;
    let tmp = path.with_extension("tmp");
    fs::write(&tmp, json)?;
    fs::rename(&tmp, path)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::{StorageError, load_or_empty};
    use tempfile::tempdir;

    #[test]
    fn test_missing_file_is_empty() {
        let dir = tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("scores.json"));
        assert!(store.load().unwrap().is_empty());
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempdir().unwrap();
        let mut store = JsonFileStore::new(dir.path().join("nested/scores.json"));

        let mut board = Leaderboard::new();
        board.upsert("ada", 40);
        board.upsert("bob", 12);
        store.save(&board).unwrap();

        let loaded = JsonFileStore::new(store.path()).load().unwrap();
        assert_eq!(loaded, board);
    }

    #[test]
    fn test_malformed_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("scores.json");
        fs::write(&path, "{ broken").unwrap();

        let store = JsonFileStore::new(&path);
        assert!(matches!(store.load(), Err(StorageError::Json(_))));
        assert!(load_or_empty(&store).is_empty());
    }

    #[test]
    fn test_directory_path_is_io_error() {
        let dir = tempdir().unwrap();
        let store = JsonFileStore::new(dir.path());
        assert!(matches!(store.load(), Err(StorageError::Io(_))));
    }
}
