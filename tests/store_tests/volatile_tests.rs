//! Tests for VolatileStore

use std::sync::Arc;
use std::thread;

use playerscore::{Player, ScoreStore, VolatileStore};

#[test]
fn test_new_store_is_empty() {
    let store = VolatileStore::new();

    assert_eq!(store.player_count(), 0);
    assert!(store.league().unwrap().is_empty());
}

#[test]
fn test_reads_do_not_create_entries() {
    let store = VolatileStore::new();

    store.get_score("Pepper").unwrap();

    assert_eq!(store.player_count(), 0);
}

#[test]
fn test_instances_do_not_share_state() {
    let first = VolatileStore::new();
    let second = VolatileStore::new();

    first.record_win("Pepper").unwrap();

    assert_eq!(first.get_score("Pepper").unwrap(), 1);
    assert_eq!(second.get_score("Pepper").unwrap(), 0);
}

#[test]
fn test_concurrent_wins_same_player() {
    let store = Arc::new(VolatileStore::new());

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let store = Arc::clone(&store);
            thread::spawn(move || {
                for _ in 0..1000 {
                    store.record_win("Pepper").unwrap();
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(store.get_score("Pepper").unwrap(), 8000);
}

#[test]
fn test_concurrent_wins_many_players() {
    let store = Arc::new(VolatileStore::new());

    let handles: Vec<_> = (0..4)
        .map(|i| {
            let store = Arc::clone(&store);
            thread::spawn(move || {
                let name = format!("player_{}", i);
                for _ in 0..=i {
                    store.record_win(&name).unwrap();
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(
        store.league().unwrap(),
        vec![
            Player::new("player_3", 4),
            Player::new("player_2", 3),
            Player::new("player_1", 2),
            Player::new("player_0", 1),
        ]
    );
}
