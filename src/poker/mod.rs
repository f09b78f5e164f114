//! Poker Module
//!
//! Command-line poker night on top of a `ScoreStore`: the blind clock and
//! the "<name> wins" result line.

mod alerter;
mod game;

pub use alerter::{BlindAlerter, ScheduledAlerter};
pub use game::{extract_winner, Game, BLIND_AMOUNTS, BLIND_INTERVAL};
