//! # playerscore
//!
//! Per-player win tracking with:
//! - A `ScoreStore` capability with volatile and persistent backends
//! - redb-backed persistence (one file, one "Scores" table)
//! - A small HTTP/1.1-style text protocol over TCP
//! - A command-line poker game that records winners
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      TCP Server                              │
//! │              (acceptor + worker threads)                     │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │ Request
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                   PlayerHandler                              │
//! │        GET/POST /players/{name}, GET /league                 │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │ Arc<dyn ScoreStore>
//!          ┌────────────┴────────────┐
//!          │                         │
//!          ▼                         ▼
//!   ┌─────────────┐          ┌─────────────────┐
//!   │  Volatile   │          │   Persistent    │
//!   │  (RwLock)   │          │ (redb "Scores") │
//!   └─────────────┘          └─────────────────┘
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod config;
pub mod error;

pub mod handler;
pub mod network;
pub mod poker;
pub mod protocol;
pub mod store;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use config::{Config, StoreBackend};
pub use error::{Result, ScoreError};
pub use handler::{ErrorPolicy, PlayerHandler};
pub use store::{PersistentStore, Player, ScoreStore, VolatileStore};

// =============================================================================
// Version Info
// =============================================================================

/// Current version of playerscore
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
