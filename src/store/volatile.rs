//! In-memory score store
//!
//! BTreeMap-based store with RwLock for concurrency.

use std::collections::BTreeMap;

use parking_lot::RwLock;

use crate::error::{Result, ScoreError};

use super::{sort_league, Player, ScoreStore};

/// Scores kept in memory for the lifetime of the instance
///
/// Each `record_win` holds the write lock across its read-modify-write, so
/// concurrent wins for the same player are never lost.
#[derive(Debug, Default)]
pub struct VolatileStore {
    scores: RwLock<BTreeMap<String, u32>>,
}

impl VolatileStore {
    /// Create a new empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of players with at least one win
    pub fn player_count(&self) -> usize {
        self.scores.read().len()
    }
}

impl ScoreStore for VolatileStore {
    fn get_score(&self, name: &str) -> Result<u32> {
        Ok(self.scores.read().get(name).copied().unwrap_or(0))
    }

    fn record_win(&self, name: &str) -> Result<u32> {
        let mut scores = self.scores.write();
        let current = scores.get(name).copied().unwrap_or(0);
        let next = current.checked_add(1).ok_or_else(|| ScoreError::ScoreOverflow {
            name: name.to_string(),
        })?;
        scores.insert(name.to_string(), next);
        Ok(next)
    }

    fn league(&self) -> Result<Vec<Player>> {
        let mut players: Vec<Player> = self
            .scores
            .read()
            .iter()
            .map(|(name, wins)| Player::new(name.clone(), *wins))
            .collect();
        sort_league(&mut players);
        Ok(players)
    }
}

#[cfg(test)]
impl VolatileStore {
    fn with_score(name: &str, wins: u32) -> Self {
        let store = Self::new();
        store.scores.write().insert(name.to_string(), wins);
        store
    }
}
