//! Integration tests for the cache store and cached sources

use chrono::{DateTime, Duration, Utc};
use fantasy_xi::{
    core::{CacheStatus, CachedSource, Clock, MatchDataSource},
    CacheKey, CacheSettings, CacheStore, FantasyError, ScrapeRequestKey,
};
use serde_json::{json, Value};
use std::{
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc, Mutex,
    },
    thread,
    time::Duration as StdDuration,
};
use tempfile::TempDir;

struct TestClock(Mutex<DateTime<Utc>>);

impl Clock for TestClock {
    fn now(&self) -> DateTime<Utc> {
        *self.0.lock().unwrap()
    }
}

fn settings(dir: &TempDir, expiry_secs: u64) -> CacheSettings {
    CacheSettings {
        enabled: true,
        directory: Some(dir.path().to_path_buf()),
        expiry_secs,
        memory_capacity: 16,
    }
}

/// Slow upstream that counts how often it is actually hit.
struct SlowScraper {
    hits: AtomicUsize,
}

impl MatchDataSource for SlowScraper {
    fn fetch(&self, request: &ScrapeRequestKey) -> fantasy_xi::Result<Value> {
        self.hits.fetch_add(1, Ordering::SeqCst);
        thread::sleep(StdDuration::from_millis(25));
        if request.url.ends_with("/404") {
            return Err(FantasyError::InvalidPool {
                message: "page not found".to_string(),
            });
        }
        Ok(json!({ "players": [], "source": request.url }))
    }
}

#[test]
fn test_round_trip_within_expiry() {
    let dir = TempDir::new().unwrap();
    let cache = CacheStore::new(&settings(&dir, 3600));
    let key = ScrapeRequestKey::for_url("https://www.cricbuzz.com/live-cricket-scores/1").cache_key();
    let payload = json!({ "match": { "team1": "RCB", "team2": "PBKS" }, "players": [] });

    cache.set(&key, payload.clone());

    assert_eq!(cache.get(&key), Some(payload));
    let stats = cache.stats();
    assert_eq!(stats.total_entries, 1);
    assert_eq!(stats.expired_entries, 0);
    assert!(stats.total_size > 0);
}

#[test]
fn test_expired_entry_is_a_miss() {
    let dir = TempDir::new().unwrap();
    let clock = Arc::new(TestClock(Mutex::new(Utc::now())));
    let cache = CacheStore::with_clock(&settings(&dir, 60), clock.clone());

    cache.set("k", json!("v"));
    *clock.0.lock().unwrap() += Duration::seconds(61);

    assert_eq!(cache.get("k"), None);
    assert_eq!(cache.stats().expired_entries, 1);

    cache.set("k", json!("v2"));
    assert_eq!(cache.get("k"), Some(json!("v2")));
    assert_eq!(cache.stats().expired_entries, 0);
}

#[test]
fn test_entries_persist_across_stores() {
    let dir = TempDir::new().unwrap();
    CacheStore::new(&settings(&dir, 3600)).set("k", json!([1, 2, 3]));

    let reopened = CacheStore::new(&settings(&dir, 3600));
    assert_eq!(reopened.get("k"), Some(json!([1, 2, 3])));

    reopened.clear(None);
    assert_eq!(CacheStore::new(&settings(&dir, 3600)).get("k"), None);
}

#[test]
fn test_concurrent_identical_requests_fetch_once() {
    let dir = TempDir::new().unwrap();
    let source = CachedSource::new(
        SlowScraper {
            hits: AtomicUsize::new(0),
        },
        Arc::new(CacheStore::new(&settings(&dir, 3600))),
    );
    let source = &source;

    let statuses: Vec<CacheStatus> = thread::scope(|s| {
        let handles: Vec<_> = (0..6)
            .map(|i| {
                s.spawn(move || {
                    // same request, options spelled in a different order per thread
                    let options = if i % 2 == 0 {
                        json!({ "formats": ["markdown"], "onlyMainContent": true })
                    } else {
                        json!({ "onlyMainContent": true, "formats": ["markdown"] })
                    };
                    let request = ScrapeRequestKey::new("https://scores.test/match/42", options);
                    source.fetch_with_status(&request, false).unwrap().1
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    assert_eq!(statuses.iter().filter(|s| **s == CacheStatus::Miss).count(), 1);
    assert_eq!(statuses.iter().filter(|s| **s == CacheStatus::Hit).count(), 5);
}

#[test]
fn test_failed_fetch_is_retried_next_time() {
    let dir = TempDir::new().unwrap();
    let scraper = SlowScraper {
        hits: AtomicUsize::new(0),
    };
    let source = CachedSource::new(scraper, Arc::new(CacheStore::new(&settings(&dir, 3600))));
    let request = ScrapeRequestKey::for_url("https://scores.test/404");

    assert_eq!(source.fetch(&request).unwrap_err().kind(), "invalid_pool");
    assert_eq!(source.fetch(&request).unwrap_err().kind(), "invalid_pool");
    assert_eq!(source.cache().stats().total_entries, 0);
}
