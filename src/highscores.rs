//! High score leaderboard
//!
//! One entry per player name, sorted by score (descending) then name. Storage
//! backends live in [`crate::persistence`].

use serde::{Deserialize, Serialize};

/// Maximum number of entries to keep
pub const MAX_ENTRIES: usize = 100;

/// A single leaderboard entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    /// Player name (unique within a leaderboard)
    pub name: String,
    /// Best score for this name
    pub score: u64,
}

/// High score leaderboard, stored as a plain array of entries
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct Leaderboard {
    pub entries: Vec<LeaderboardEntry>,
}

impl Leaderboard {
    /// Create empty leaderboard
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Build from arbitrary entries: duplicates collapse to their best score,
    /// then the usual ordering and size limit apply
    pub fn from_entries(entries: impl IntoIterator<Item = LeaderboardEntry>) -> Self {
        let mut board = Self::new();
        for entry in entries {
            board.upsert(&entry.name, entry.score);
        }
        board
    }

    /// Record `score` for `name`, keeping the higher of the old and new score.
    /// Returns the 1-indexed rank of `name` afterwards, or None if it fell off
    /// the bottom of a full table.
    pub fn upsert(&mut self, name: &str, score: u64) -> Option<usize> {
        match self.entries.iter_mut().find(|e| e.name == name) {
            Some(entry) => entry.score = entry.score.max(score),
            None => self.entries.push(LeaderboardEntry {
                name: name.to_string(),
                score,
            }),
        }
        self.sort();
        self.entries.truncate(MAX_ENTRIES);
        self.rank_of(name)
    }

    /// Make sure `name` is listed, recording 0 if it has no entry yet
    pub fn register(&mut self, name: &str) -> Option<usize> {
        self.upsert(name, 0)
    }

    /// Rank (1-indexed) of `name`
    pub fn rank_of(&self, name: &str) -> Option<usize> {
        self.entries.iter().position(|e| e.name == name).map(|i| i + 1)
    }

    /// Best recorded score for `name`
    pub fn score_of(&self, name: &str) -> Option<u64> {
        self.entries.iter().find(|e| e.name == name).map(|e| e.score)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the leaderboard is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Get the top score (if any)
    pub fn top_score(&self) -> Option<u64> {
        self.entries.first().map(|e| e.score)
    }

    /// Restore ordering and limits on data loaded from storage
    pub fn normalized(self) -> Self {
        Self::from_entries(self.entries)
    }

    fn sort(&mut self) {
        self.entries
            .sort_by(|a, b| b.score.cmp(&a.score).then_with(|| a.name.cmp(&b.name)));
    }
}
