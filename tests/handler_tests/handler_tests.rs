//! Tests for PlayerHandler
//!
//! These tests verify:
//! - The GET/POST scenario against both backends
//! - 0-score and unknown players both answering 404 "0"
//! - Routing: 405 for unsupported methods, 404 for unknown paths
//! - 400 for names that are not valid UTF-8 once unescaped
//! - League JSON
//! - Lenient vs strict handling of store failures

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use playerscore::protocol::{Method, Request, Response, Status};
use playerscore::{
    ErrorPolicy, PersistentStore, Player, PlayerHandler, Result, ScoreError, ScoreStore,
    VolatileStore,
};
use tempfile::TempDir;

// =============================================================================
// Helper Functions
// =============================================================================

fn volatile_handler() -> PlayerHandler {
    PlayerHandler::new(Arc::new(VolatileStore::new()))
}

fn get(handler: &PlayerHandler, target: &str) -> Response {
    handler.handle(&Request::get(target))
}

fn post(handler: &PlayerHandler, target: &str) -> Response {
    handler.handle(&Request::post(target))
}

/// Store stub that records calls and fails every one of them
#[derive(Default)]
struct FailingStore {
    calls: Mutex<Vec<String>>,
}

impl ScoreStore for FailingStore {
    fn get_score(&self, name: &str) -> Result<u32> {
        self.calls.lock().push(format!("get {}", name));
        Err(ScoreError::CorruptScore { len: 2 })
    }

    fn record_win(&self, name: &str) -> Result<u32> {
        self.calls.lock().push(format!("win {}", name));
        Err(ScoreError::ScoreOverflow {
            name: name.to_string(),
        })
    }

    fn league(&self) -> Result<Vec<Player>> {
        self.calls.lock().push("league".to_string());
        Err(ScoreError::CorruptScore { len: 7 })
    }
}

/// Store stub with fixed scores, as a test double for the routing
struct StubStore;

impl ScoreStore for StubStore {
    fn get_score(&self, name: &str) -> Result<u32> {
        Ok(match name {
            "Pepper" => 20,
            "Floyd" => 10,
            _ => 0,
        })
    }

    fn record_win(&self, _name: &str) -> Result<u32> {
        Ok(1)
    }

    fn league(&self) -> Result<Vec<Player>> {
        Ok(vec![Player::new("Pepper", 20), Player::new("Floyd", 10)])
    }
}

// =============================================================================
// Score Scenario Tests
// =============================================================================

#[test]
fn test_returns_scores_from_store() {
    let handler = PlayerHandler::new(Arc::new(StubStore));

    let response = get(&handler, "/players/Pepper");
    assert_eq!(response.status, Status::Ok);
    assert_eq!(response.body_text(), "20");

    let response = get(&handler, "/players/Floyd");
    assert_eq!(response.status, Status::Ok);
    assert_eq!(response.body_text(), "10");
}

#[test]
fn test_record_then_read_volatile() {
    let handler = volatile_handler();

    let response = get(&handler, "/players/Pepper");
    assert_eq!(response.status, Status::NotFound);
    assert_eq!(response.body_text(), "0");

    let response = post(&handler, "/players/Pepper");
    assert_eq!(response.status, Status::Accepted);
    assert!(response.body.is_empty());

    let response = get(&handler, "/players/Pepper");
    assert_eq!(response.status, Status::Ok);
    assert_eq!(response.body_text(), "1");
}

#[test]
fn test_record_then_read_persistent() {
    let temp_dir = TempDir::new().unwrap();
    let store = PersistentStore::open(temp_dir.path().join("game.db"), Duration::from_secs(1)).unwrap();
    let handler = PlayerHandler::new(Arc::new(store));

    assert_eq!(get(&handler, "/players/Pepper").status, Status::NotFound);
    for _ in 0..3 {
        assert_eq!(post(&handler, "/players/Pepper").status, Status::Accepted);
    }

    let response = get(&handler, "/players/Pepper");
    assert_eq!(response.status, Status::Ok);
    assert_eq!(response.body_text(), "3");
}

#[test]
fn test_zero_score_reads_as_not_found() {
    // A known player with 0 wins looks exactly like an unknown one
    let handler = PlayerHandler::new(Arc::new(StubStore));

    let response = get(&handler, "/players/Nobody");

    assert_eq!(response.status, Status::NotFound);
    assert_eq!(response.body_text(), "0");
}

#[test]
fn test_name_is_rest_of_path() {
    let store = Arc::new(VolatileStore::new());
    let handler = PlayerHandler::new(store.clone());

    post(&handler, "/players/Chris%20Jones");
    post(&handler, "/players/a/b");
    post(&handler, "/players/Bob?source=web");
    post(&handler, "/players/");

    assert_eq!(store.get_score("Chris Jones").unwrap(), 1);
    assert_eq!(store.get_score("a/b").unwrap(), 1);
    assert_eq!(store.get_score("Bob").unwrap(), 1);
    assert_eq!(store.get_score("").unwrap(), 1);
}

#[test]
fn test_invalid_utf8_names_are_rejected() {
    let store = Arc::new(VolatileStore::new());
    let handler = PlayerHandler::new(store.clone());

    for target in ["/players/%FF", "/players/%FE", "/players/caf%C3"] {
        assert_eq!(post(&handler, target).status, Status::BadRequest, "target {}", target);
        assert_eq!(get(&handler, target).status, Status::BadRequest, "target {}", target);
    }

    // Nothing was recorded under a replacement character or anything else
    assert_eq!(store.player_count(), 0);
    assert_eq!(store.get_score("\u{FFFD}").unwrap(), 0);
}

#[test]
fn test_distinct_escaped_names_stay_distinct() {
    let store = Arc::new(VolatileStore::new());
    let handler = PlayerHandler::new(store.clone());

    post(&handler, "/players/%C3%BF");
    post(&handler, "/players/%C3%BE");

    assert_eq!(get(&handler, "/players/%C3%BF").body_text(), "1");
    assert_eq!(
        store.league().unwrap(),
        vec![Player::new("\u{FE}", 1), Player::new("\u{FF}", 1)]
    );
}

#[test]
fn test_names_are_case_sensitive() {
    let handler = volatile_handler();

    post(&handler, "/players/Bob");

    assert_eq!(get(&handler, "/players/Bob").body_text(), "1");
    assert_eq!(get(&handler, "/players/bob").status, Status::NotFound);
}

// =============================================================================
// Routing Tests
// =============================================================================

#[test]
fn test_unsupported_method_is_not_allowed() {
    let store = Arc::new(VolatileStore::new());
    let handler = PlayerHandler::new(store.clone());

    let request = Request::new(Method::Other("DELETE".to_string()), "/players/Pepper");
    let response = handler.handle(&request);

    assert_eq!(response.status, Status::MethodNotAllowed);
    assert!(response.body.is_empty());
    assert_eq!(store.player_count(), 0);

    let response = post(&handler, "/league");
    assert_eq!(response.status, Status::MethodNotAllowed);
}

#[test]
fn test_unknown_paths_are_not_found() {
    let handler = volatile_handler();

    for target in ["/", "/players", "/player/Pepper", "/leagues", "/league/extra"] {
        let response = get(&handler, target);
        assert_eq!(response.status, Status::NotFound, "target {}", target);
        assert!(response.body.is_empty());
    }
}

// =============================================================================
// League Tests
// =============================================================================

#[test]
fn test_league_returns_json() {
    let handler = volatile_handler();

    for name in ["Cleo", "Chris", "Chris"] {
        post(&handler, &format!("/players/{}", name));
    }

    let response = get(&handler, "/league");
    assert_eq!(response.status, Status::Ok);
    assert_eq!(response.content_type.as_deref(), Some("application/json"));

    let players: Vec<Player> = serde_json::from_slice(&response.body).unwrap();
    assert_eq!(players, vec![Player::new("Chris", 2), Player::new("Cleo", 1)]);
}

#[test]
fn test_empty_league_is_empty_array() {
    let response = get(&volatile_handler(), "/league");

    assert_eq!(response.status, Status::Ok);
    assert_eq!(response.body_text(), "[]");
}

// =============================================================================
// Error Policy Tests
// =============================================================================

#[test]
fn test_lenient_policy_hides_store_errors() {
    let store = Arc::new(FailingStore::default());
    let handler = PlayerHandler::new(store.clone());
    assert_eq!(handler.policy(), ErrorPolicy::Lenient);

    let response = get(&handler, "/players/Pepper");
    assert_eq!(response.status, Status::NotFound);
    assert_eq!(response.body_text(), "0");

    let response = post(&handler, "/players/Pepper");
    assert_eq!(response.status, Status::Accepted);

    let response = get(&handler, "/league");
    assert_eq!(response.status, Status::Ok);
    assert_eq!(response.body_text(), "[]");

    assert_eq!(
        *store.calls.lock(),
        vec!["get Pepper", "win Pepper", "league"]
    );
}

#[test]
fn test_strict_policy_surfaces_store_errors() {
    let handler =
        PlayerHandler::new(Arc::new(FailingStore::default())).with_policy(ErrorPolicy::Strict);

    let response = get(&handler, "/players/Pepper");
    assert_eq!(response.status, Status::InternalServerError);
    assert_eq!(response.body_text(), "Stored score is 2 bytes, expected 4");

    let response = post(&handler, "/players/Pepper");
    assert_eq!(response.status, Status::InternalServerError);
    assert_eq!(
        response.body_text(),
        "Score for \"Pepper\" is already at the maximum of 4294967295"
    );

    let response = get(&handler, "/league");
    assert_eq!(response.status, Status::InternalServerError);
    assert_eq!(response.body_text(), "Stored score is 7 bytes, expected 4");
}

#[test]
fn test_strict_policy_passes_through_success() {
    let handler = volatile_handler().with_policy(ErrorPolicy::Strict);

    assert_eq!(get(&handler, "/players/Pepper").status, Status::NotFound);
    assert_eq!(post(&handler, "/players/Pepper").status, Status::Accepted);
    assert_eq!(get(&handler, "/players/Pepper").status, Status::Ok);
}
