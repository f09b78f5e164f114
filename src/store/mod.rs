//! Store Module
//!
//! The score-tracking capability and its two backends.
//!
//! ## Responsibilities
//! - Report a player's win count (0 for players never seen)
//! - Record a win as an exact +1 increment
//! - List every player for the league table
//!
//! ## Backends
//! - [`VolatileStore`]: ordered map behind an RwLock, gone on exit
//! - [`PersistentStore`]: redb file with a single "Scores" table,
//!   values stored as 4-byte big-endian u32

mod persistent;
mod volatile;

use serde::{Deserialize, Serialize};

use crate::error::Result;

pub use persistent::{PersistentStore, SCORES_TABLE};
pub use volatile::VolatileStore;

/// Read-score / record-win capability shared by every backend
///
/// Implementations are shared across worker threads behind an `Arc`.
pub trait ScoreStore: Send + Sync {
    /// Current win count for `name`, or 0 if no win was ever recorded
    fn get_score(&self, name: &str) -> Result<u32>;

    /// Increment `name`'s win count by one and return the new count
    ///
    /// Fails with `ScoreOverflow` instead of wrapping at `u32::MAX`.
    fn record_win(&self, name: &str) -> Result<u32>;

    /// Every player with at least one win, best first
    fn league(&self) -> Result<Vec<Player>>;
}

/// A league table row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub name: String,
    pub wins: u32,
}

impl Player {
    pub fn new(name: impl Into<String>, wins: u32) -> Self {
        Self {
            name: name.into(),
            wins,
        }
    }
}

/// Order league rows by wins descending, ties broken by name
pub(crate) fn sort_league(players: &mut [Player]) {
    players.sort_by(|a, b| b.wins.cmp(&a.wins).then_with(|| a.name.cmp(&b.name)));
}
