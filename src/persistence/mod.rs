//! Leaderboard and preference persistence
//!
//! Backends:
//! - `MemoryStore`: in-process, used by tests and the headless runner
//! - `JsonFileStore`: JSON file on disk (native only)
//! - `LocalStorageStore`: browser LocalStorage (wasm only)
//!
//! Loading is forgiving at the session boundary: see [`load_or_empty`].

#[cfg(not(target_arch = "wasm32"))]
mod file;
#[cfg(target_arch = "wasm32")]
mod local_storage;

#[cfg(not(target_arch = "wasm32"))]
pub use file::{JsonFileStore, read_json, write_json};
#[cfg(target_arch = "wasm32")]
pub use local_storage::{LocalStorageStore, read_item, write_item};

use crate::highscores::Leaderboard;

/// Errors from a storage backend
#[derive(thiserror::Error, Debug)]
pub enum StorageError {
    /// IO error from filesystem
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Stored data could not be parsed or serialized
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The backing store cannot be reached
    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}

/// Result type for storage operations
pub type Result<T> = std::result::Result<T, StorageError>;

/// Somewhere a leaderboard can be loaded from and saved to.
/// A store with nothing saved yet loads as an empty leaderboard.
pub trait LeaderboardStore {
    fn load(&self) -> Result<Leaderboard>;
    fn save(&mut self, board: &Leaderboard) -> Result<()>;
}

/// Load a leaderboard, degrading to an empty one on any failure
pub fn load_or_empty(store: &dyn LeaderboardStore) -> Leaderboard {
    match store.load() {
        Ok(board) => {
            log::info!("Loaded {} leaderboard entries", board.len());
            board.normalized()
        }
        Err(err) => {
            log::warn!("Could not load leaderboard, starting fresh: {err}");
            Leaderboard::new()
        }
    }
}

/// Save a leaderboard, logging instead of failing
pub fn save_or_warn(store: &mut dyn LeaderboardStore, board: &Leaderboard) -> bool {
    match store.save(board) {
        Ok(()) => {
            log::info!("Leaderboard saved ({} entries)", board.len());
            true
        }
        Err(err) => {
            log::warn!("Could not save leaderboard: {err}");
            false
        }
    }
}

/// In-memory store
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    pub saved: Option<Leaderboard>,
    /// Number of successful saves
    pub saves: usize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(board: Leaderboard) -> Self {
        Self {
            saved: Some(board),
            saves: 0,
        }
    }
}

impl LeaderboardStore for MemoryStore {
    fn load(&self) -> Result<Leaderboard> {
        Ok(self.saved.clone().unwrap_or_default())
    }

    fn save(&mut self, board: &Leaderboard) -> Result<()> {
        self.saved = Some(board.clone());
        self.saves += 1;
        Ok(())
    }
}

/// Store that is never reachable (private browsing, read-only disk...)
#[derive(Debug, Clone, Copy, Default)]
pub struct UnavailableStore;

impl LeaderboardStore for UnavailableStore {
    fn load(&self) -> Result<Leaderboard> {
        Err(StorageError::Unavailable("no backing store".into()))
    }

    fn save(&mut self, _board: &Leaderboard) -> Result<()> {
        Err(StorageError::Unavailable("no backing store".into()))
    }
}
