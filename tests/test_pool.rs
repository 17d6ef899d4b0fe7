//! Tests for round-robin peer selection
//!
//! Selection here deliberately implements the skip-dead policy: a
//! candidate that is not alive is passed over and the scan continues for
//! up to one full lap, rather than returning the first candidate
//! unconditionally. The rotation tests below pin that choice down.

use rotor::config::BackendConfig;
use rotor::proxy::{Backend, ServerPool};
use std::sync::Arc;
use std::time::Duration;

fn make_backend(url: &str) -> Backend {
    Backend::new(
        BackendConfig {
            url: url.to_string(),
            name: None,
        },
        Duration::from_secs(5),
        Duration::from_secs(30),
    )
    .unwrap()
}

fn make_pool(urls: &[&str]) -> ServerPool {
    ServerPool::new(urls.iter().map(|&u| make_backend(u)).collect())
}

#[test]
fn test_pool_creation() {
    let pool = make_pool(&["http://localhost:3000", "http://localhost:3001"]);

    assert_eq!(pool.len(), 2);
    assert_eq!(pool.alive_count(), 2);
    assert!(!pool.is_empty());
}

#[test]
fn test_empty_pool_returns_none() {
    let pool = ServerPool::new(vec![]);

    assert!(pool.is_empty());
    assert!(pool.select_next().is_none());
}

#[test]
fn test_rotation_order_is_deterministic() {
    // The cursor is incremented before the modulo, so a fresh pool of
    // two starts at index 1 and alternates from there
    let pool = make_pool(&["http://localhost:3000", "http://localhost:3001"]);

    let first = pool.select_next().unwrap();
    let second = pool.select_next().unwrap();
    let third = pool.select_next().unwrap();
    let fourth = pool.select_next().unwrap();

    assert_eq!(first.url(), "http://localhost:3001/");
    assert_eq!(second.url(), "http://localhost:3000/");
    assert_eq!(third.url(), "http://localhost:3001/");
    assert_eq!(fourth.url(), "http://localhost:3000/");
}

#[test]
fn test_selection_returns_some_with_one_alive_backend() {
    let pool = make_pool(&["http://localhost:3000"]);

    for _ in 0..10 {
        assert!(pool.select_next().is_some());
    }
}

#[test]
fn test_selection_skips_dead_backend() {
    let pool = make_pool(&["http://localhost:3000", "http://localhost:3001"]);

    // Kill the first backend; every selection must land on the second,
    // regardless of where the cursor is
    pool.backends()[0].set_alive(false);

    for _ in 0..10 {
        let selected = pool.select_next().unwrap();
        assert_eq!(selected.url(), "http://localhost:3001/");
    }
}

#[test]
fn test_selection_rotates_over_remaining_alive_backends() {
    let pool = make_pool(&[
        "http://localhost:3000",
        "http://localhost:3001",
        "http://localhost:3002",
    ]);

    pool.backends()[1].set_alive(false);

    for _ in 0..12 {
        let selected = pool.select_next().unwrap();
        assert_ne!(selected.url(), "http://localhost:3001/");
    }
}

#[test]
fn test_all_dead_returns_none() {
    let pool = make_pool(&["http://localhost:3000", "http://localhost:3001"]);

    for backend in pool.backends() {
        backend.set_alive(false);
    }

    // One full lap finds nothing; the call terminates with None
    assert!(pool.select_next().is_none());
    assert_eq!(pool.alive_count(), 0);
}

#[test]
fn test_dead_backend_becomes_selectable_again() {
    let pool = make_pool(&["http://localhost:3000"]);

    pool.backends()[0].set_alive(false);
    assert!(pool.select_next().is_none());

    pool.backends()[0].set_alive(true);
    assert!(pool.select_next().is_some());
}

#[test]
fn test_concurrent_selection_terminates_and_stays_in_pool() {
    let pool = Arc::new(make_pool(&[
        "http://localhost:3000",
        "http://localhost:3001",
        "http://localhost:3002",
    ]));

    let expected: Vec<String> = pool.backends().iter().map(|b| b.url().to_string()).collect();

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let pool = Arc::clone(&pool);
            let expected = expected.clone();
            std::thread::spawn(move || {
                for _ in 0..1000 {
                    let selected = pool.select_next().expect("pool has alive backends");
                    assert!(expected.iter().any(|url| url.as_str() == selected.url()));
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }
}

#[test]
fn test_concurrent_selection_with_liveness_churn() {
    let pool = Arc::new(make_pool(&[
        "http://localhost:3000",
        "http://localhost:3001",
    ]));

    // Backend 0 flaps while selectors run; backend 1 stays alive, so
    // every selection must still return something
    let flapper = {
        let pool = Arc::clone(&pool);
        std::thread::spawn(move || {
            for i in 0..5000 {
                pool.backends()[0].set_alive(i % 2 == 0);
            }
        })
    };

    let selectors: Vec<_> = (0..4)
        .map(|_| {
            let pool = Arc::clone(&pool);
            std::thread::spawn(move || {
                for _ in 0..5000 {
                    assert!(pool.select_next().is_some());
                }
            })
        })
        .collect();

    flapper.join().unwrap();
    for selector in selectors {
        selector.join().unwrap();
    }
}
