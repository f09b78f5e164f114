//! Poker game session
//!
//! Runs one game: start the blind clock, wait for the result line, record
//! the winner.

use std::io::BufRead;
use std::sync::Arc;
use std::time::Duration;

use crate::error::{Result, ScoreError};
use crate::store::ScoreStore;

use super::BlindAlerter;

/// Blind levels, raised one step per `BLIND_INTERVAL`
pub const BLIND_AMOUNTS: [u32; 11] = [100, 200, 300, 400, 500, 600, 800, 1000, 2000, 4000, 8000];

/// Time between blind increases
pub const BLIND_INTERVAL: Duration = Duration::from_secs(10 * 60);

const WIN_SUFFIX: &str = " wins";

/// Player name from a result line such as `"Chris wins"`
///
/// Only the first `" wins"` is removed; anything else is kept verbatim.
pub fn extract_winner(input: &str) -> String {
    input.replacen(WIN_SUFFIX, "", 1)
}

/// One poker game reading its result from `input`
pub struct Game<R> {
    store: Arc<dyn ScoreStore>,
    input: R,
    alerter: Arc<dyn BlindAlerter>,
}

impl<R: BufRead> Game<R> {
    pub fn new(store: Arc<dyn ScoreStore>, input: R, alerter: Arc<dyn BlindAlerter>) -> Self {
        Self {
            store,
            input,
            alerter,
        }
    }

    /// Play one game and return the recorded winner
    pub fn play(&mut self) -> Result<String> {
        self.schedule_blind_alerts();

        let line = self
            .read_line()?
            .ok_or_else(|| ScoreError::Protocol("no winner entered".to_string()))?;
        let winner = extract_winner(&line);

        let wins = self.store.record_win(&winner)?;
        tracing::info!("{} now has {} wins", winner, wins);

        Ok(winner)
    }

    fn schedule_blind_alerts(&self) {
        let mut blind_time = Duration::ZERO;
        for amount in BLIND_AMOUNTS {
            self.alerter.schedule_alert_at(blind_time, amount);
            blind_time += BLIND_INTERVAL;
        }
    }

    /// Next line without its line ending, `None` at end of input
    fn read_line(&mut self) -> Result<Option<String>> {
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        let trimmed = line.trim_end_matches(['\r', '\n']).len();
        line.truncate(trimmed);
        Ok(Some(line))
    }
}
