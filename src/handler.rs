//! Request Handler
//!
//! Maps protocol requests onto `ScoreStore` calls.
//!
//! ## Routes
//! ```text
//! GET  /players/{name}  → 200 + score, or 404 + "0" when the score is 0
//! POST /players/{name}  → 202, records one win
//! GET  /league          → 200 + JSON array of {name, wins}
//! ```
//! Other methods on a known path get 405, unknown paths get 404. A name
//! whose escapes decode to invalid UTF-8 gets 400.
//!
//! A player whose score is 0 cannot be told apart from an unknown player:
//! both read as 404 with body "0".

use std::fmt;
use std::sync::Arc;

use crate::error::ScoreError;
use crate::protocol::{percent_decode, Method, Request, Response, Status};
use crate::store::ScoreStore;

/// Path prefix for per-player routes; the rest of the path is the name
pub const PLAYERS_PREFIX: &str = "/players/";

/// Path of the league listing
pub const LEAGUE_PATH: &str = "/league";

/// What to do when a store call fails
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ErrorPolicy {
    /// Log and carry on: failed reads count as 0, failed wins still get 202
    #[default]
    Lenient,

    /// Answer 500 with the error text
    Strict,
}

/// Routes requests to an injected score store
///
/// Holds no per-request state; clones share the same store.
#[derive(Clone)]
pub struct PlayerHandler {
    store: Arc<dyn ScoreStore>,
    policy: ErrorPolicy,
}

impl PlayerHandler {
    /// Create a handler with the lenient error policy
    pub fn new(store: Arc<dyn ScoreStore>) -> Self {
        Self {
            store,
            policy: ErrorPolicy::default(),
        }
    }

    /// Set the error policy
    pub fn with_policy(mut self, policy: ErrorPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn policy(&self) -> ErrorPolicy {
        self.policy
    }

    /// Handle one request
    pub fn handle(&self, request: &Request) -> Response {
        let path = request.path();

        if let Some(raw_name) = path.strip_prefix(PLAYERS_PREFIX) {
            let name = match percent_decode(raw_name) {
                Ok(name) => name,
                Err(e) => {
                    tracing::debug!("Rejecting player path {:?}: {}", path, e);
                    return Response::bad_request(&e.to_string());
                }
            };
            return match request.method {
                Method::Get => self.show_score(&name),
                Method::Post => self.process_win(&name),
                Method::Other(_) => Response::method_not_allowed(),
            };
        }

        if path == LEAGUE_PATH {
            return match request.method {
                Method::Get => self.show_league(),
                _ => Response::method_not_allowed(),
            };
        }

        Response::not_found()
    }

    fn show_score(&self, name: &str) -> Response {
        let score = match self.store.get_score(name) {
            Ok(score) => score,
            Err(e) => match self.on_store_error("get score", name, e) {
                Some(response) => return response,
                None => 0,
            },
        };

        let status = if score == 0 {
            Status::NotFound
        } else {
            Status::Ok
        };
        Response::text(status, score.to_string())
    }

    fn process_win(&self, name: &str) -> Response {
        if let Err(e) = self.store.record_win(name) {
            if let Some(response) = self.on_store_error("record win", name, e) {
                return response;
            }
        }
        Response::accepted()
    }

    fn show_league(&self) -> Response {
        let players = match self.store.league() {
            Ok(players) => players,
            Err(e) => match self.on_store_error("list league", "*", e) {
                Some(response) => return response,
                None => Vec::new(),
            },
        };

        match serde_json::to_vec(&players) {
            Ok(body) => Response::json(body),
            Err(e) => Response::internal_error(&e.to_string()),
        }
    }

    /// `Some` when the error should replace the normal response
    fn on_store_error(&self, action: &str, name: &str, error: ScoreError) -> Option<Response> {
        match self.policy {
            ErrorPolicy::Lenient => {
                tracing::warn!("Failed to {} for {:?}: {}", action, name, error);
                None
            }
            ErrorPolicy::Strict => {
                tracing::error!("Failed to {} for {:?}: {}", action, name, error);
                Some(Response::internal_error(&error.to_string()))
            }
        }
    }
}

impl fmt::Debug for PlayerHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PlayerHandler")
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}
