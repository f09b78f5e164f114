//! redb-backed score store
//!
//! ## File Layout
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │ redb database file                           │
//! │   Table "Scores"                             │
//! │   ┌──────────────────┬─────────────────────┐ │
//! │   │ Key: name bytes  │ Value: u32 BE (4)   │ │
//! │   └──────────────────┴─────────────────────┘ │
//! │   ... one row per player with a win ...      │
//! └──────────────────────────────────────────────┘
//! ```
//!
//! Every call runs in its own transaction: `get_score` and `league` in a read
//! transaction (snapshot), `record_win` in a write transaction that reads,
//! increments and commits. redb admits one write transaction at a time, so
//! concurrent wins are serialized by the engine.

use std::fs;
use std::path::{Path, PathBuf};
use std::thread;
use std::time::{Duration, Instant};

use redb::{Database, DatabaseError, ReadableTable, TableDefinition};

use crate::config::Config;
use crate::error::{Result, ScoreError};

use super::{sort_league, Player, ScoreStore};

/// Name of the single table holding all scores
pub const SCORES_TABLE: &str = "Scores";

const SCORES: TableDefinition<&[u8], &[u8]> = TableDefinition::new(SCORES_TABLE);

/// Width of an encoded score
const SCORE_WIDTH: usize = 4;

/// Pause between attempts to take the file lock
const OPEN_RETRY_INTERVAL: Duration = Duration::from_millis(25);

/// Scores persisted in a single redb file
///
/// No cache sits in front of the file: each instance reads what is on disk.
pub struct PersistentStore {
    db: Database,
    path: PathBuf,
}

impl PersistentStore {
    /// Open or create the database at `path`
    ///
    /// On startup:
    /// 1. Create the parent directory if needed
    /// 2. Open the file, retrying while another handle holds its lock
    /// 3. Create the "Scores" table if it does not exist yet
    pub fn open(path: impl AsRef<Path>, open_timeout: Duration) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let db = Self::open_database(&path, open_timeout)?;
        Self::ensure_namespace(&db)?;

        tracing::info!("Opened score database at {}", path.display());

        Ok(Self { db, path })
    }

    /// Open using `db_path` and `open_timeout_ms` from the config
    pub fn open_with_config(config: &Config) -> Result<Self> {
        Self::open(&config.db_path, config.open_timeout())
    }

    /// Release the database handle and its file lock
    pub fn close(self) -> Result<()> {
        let Self { db, path } = self;
        drop(db);
        tracing::info!("Closed score database at {}", path.display());
        Ok(())
    }

    /// Get the database file path
    pub fn path(&self) -> &Path {
        &self.path
    }

    // =========================================================================
    // Private Helpers
    // =========================================================================

    fn open_database(path: &Path, timeout: Duration) -> Result<Database> {
        let started = Instant::now();

        loop {
            match Database::create(path) {
                Ok(db) => return Ok(db),
                Err(DatabaseError::DatabaseAlreadyOpen) => {
                    let waited = started.elapsed();
                    if waited >= timeout {
                        return Err(ScoreError::OpenTimeout {
                            path: path.to_path_buf(),
                            waited,
                        });
                    }
                    tracing::debug!("{} is locked, retrying", path.display());
                    thread::sleep(OPEN_RETRY_INTERVAL.min(timeout - waited));
                }
                Err(source) => {
                    return Err(ScoreError::Open {
                        path: path.to_path_buf(),
                        source,
                    })
                }
            }
        }
    }

    fn ensure_namespace(db: &Database) -> Result<()> {
        let txn = db
            .begin_write()
            .map_err(|e| ScoreError::namespace(SCORES_TABLE, e))?;

        // Opening a table inside a write transaction creates it if missing
        txn.open_table(SCORES)
            .map_err(|e| ScoreError::namespace(SCORES_TABLE, e))?;

        txn.commit()
            .map_err(|e| ScoreError::namespace(SCORES_TABLE, e))?;
        Ok(())
    }
}

impl ScoreStore for PersistentStore {
    fn get_score(&self, name: &str) -> Result<u32> {
        let txn = self.db.begin_read().map_err(|e| ScoreError::read(name, e))?;
        let table = txn.open_table(SCORES).map_err(|e| ScoreError::read(name, e))?;

        let score = current_score(&table, name)?;
        Ok(score)
    }

    fn record_win(&self, name: &str) -> Result<u32> {
        let txn = self.db.begin_write().map_err(|e| ScoreError::write(name, e))?;

        // Returning early drops `txn` uncommitted, which aborts it
        let next = {
            let mut table = txn.open_table(SCORES).map_err(|e| ScoreError::write(name, e))?;

            let next = current_score(&table, name)?
                .checked_add(1)
                .ok_or_else(|| ScoreError::ScoreOverflow {
                    name: name.to_string(),
                })?;

            table
                .insert(name.as_bytes(), encode_score(next).as_slice())
                .map_err(|e| ScoreError::write(name, e))?;
            next
        };

        txn.commit().map_err(|e| ScoreError::write(name, e))?;

        tracing::trace!("Recorded win for {:?}, now {}", name, next);
        Ok(next)
    }

    fn league(&self) -> Result<Vec<Player>> {
        let txn = self.db.begin_read().map_err(|e| ScoreError::scan(SCORES_TABLE, e))?;
        let table = txn
            .open_table(SCORES)
            .map_err(|e| ScoreError::scan(SCORES_TABLE, e))?;

        let mut players = Vec::new();
        for entry in table.iter().map_err(|e| ScoreError::scan(SCORES_TABLE, e))? {
            let (key, value) = entry.map_err(|e| ScoreError::scan(SCORES_TABLE, e))?;
            let name = String::from_utf8_lossy(key.value()).into_owned();
            players.push(Player::new(name, decode_score(value.value())?));
        }

        sort_league(&mut players);
        Ok(players)
    }
}

/// Look up `name` in an open table, 0 if absent
fn current_score<T>(table: &T, name: &str) -> Result<u32>
where
    T: ReadableTable<&'static [u8], &'static [u8]>,
{
    match table.get(name.as_bytes()).map_err(|e| ScoreError::read(name, e))? {
        Some(value) => decode_score(value.value()),
        None => Ok(0),
    }
}

fn encode_score(score: u32) -> [u8; SCORE_WIDTH] {
    score.to_be_bytes()
}

fn decode_score(bytes: &[u8]) -> Result<u32> {
    let raw: [u8; SCORE_WIDTH] = bytes
        .try_into()
        .map_err(|_| ScoreError::CorruptScore { len: bytes.len() })?;
    Ok(u32::from_be_bytes(raw))
}
