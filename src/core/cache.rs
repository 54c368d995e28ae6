//! Expiring key-value cache for upstream lookups
//!
//! Two tiers:
//! - L1: in-memory LRU for repeat lookups within one process
//! - L2: one JSON file per key under the cache directory
//!
//! Entries older than the configured expiry read as misses in both tiers.
//! The cache never fails its caller: unreadable entries are misses and
//! failed writes are logged and dropped.

use chrono::{DateTime, Duration, Utc};
use lru::LruCache;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sha2::{Digest, Sha256};
use std::{
    collections::HashMap,
    fs,
    io::{self, Write},
    num::NonZeroUsize,
    path::{Path, PathBuf},
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};
use tempfile::NamedTempFile;


const CACHE_DIR_NAME: &str = "fantasy-xi";
const ENTRY_EXTENSION: &str = "json";

/// Path: ~/.cache/fantasy-xi
pub fn default_cache_dir() -> PathBuf {
    let base = dirs::cache_dir().unwrap_or_else(|| {
        let mut home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
        home.push(".cache");
        home
    });
    base.join(CACHE_DIR_NAME)
}

/// Write a string to file, creating parent directories. The contents land
/// in a uniquely named temporary file first so readers never see a torn
/// file, even with several writers on the same path. The temporary file is
/// removed if any step fails.
pub fn write_string(path: &Path, contents: &str) -> io::Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir)?;

    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(contents.as_bytes())?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|err| err.error)?;
    Ok(())
}

/// Source of "now" for expiry checks.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheSettings {
    pub enabled: bool,
    /// Defaults to [`default_cache_dir`] when unset
    pub directory: Option<PathBuf>,
    pub expiry_secs: u64,
    pub memory_capacity: usize,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            directory: None,
            expiry_secs: 3600,
            memory_capacity: 128,
        }
    }
}

impl CacheSettings {
    pub fn resolved_directory(&self) -> PathBuf {
        self.directory.clone().unwrap_or_else(default_cache_dir)
    }

    pub fn expiry(&self) -> Duration {
        let secs = i64::try_from(self.expiry_secs).unwrap_or(i64::MAX);
        Duration::seconds(secs.min(i64::MAX / 1000))
    }
}

/// Anything that maps to a stable cache key.
pub trait CacheKey {
    fn cache_key(&self) -> String;
}

/// Cache key for a scrape request: target URL plus request options.
///
/// Logically identical requests produce the same key: the URL is
/// normalized and option objects are encoded with sorted keys.
#[derive(Debug, Clone, PartialEq)]
pub struct ScrapeRequestKey {
    pub url: String,
    pub options: Value,
}

impl ScrapeRequestKey {
    pub fn new(url: impl Into<String>, options: Value) -> Self {
        Self {
            url: url.into(),
            options,
        }
    }

    pub fn for_url(url: impl Into<String>) -> Self {
        Self::new(url, Value::Null)
    }
}

impl CacheKey for ScrapeRequestKey {
    fn cache_key(&self) -> String {
        let mut options = String::new();
        match &self.options {
            Value::Null => options.push_str("{}"),
            other => write_canonical(other, &mut options),
        }
        format!("scrape:{}:{}", normalize_url(&self.url), options)
    }
}

/// Trim, drop any fragment and trailing slash, lowercase scheme and host.
pub fn normalize_url(url: &str) -> String {
    let url = url.trim();
    let url = url.split_once('#').map_or(url, |(before, _)| before);

    let mut normalized = match url.split_once("://") {
        Some((scheme, rest)) => {
            let (host, path) = match rest.find('/') {
                Some(i) => rest.split_at(i),
                None => (rest, ""),
            };
            format!(
                "{}://{}{}",
                scheme.to_ascii_lowercase(),
                host.to_ascii_lowercase(),
                path
            )
        }
        None => url.to_string(),
    };

    while normalized.ends_with('/') && !normalized.ends_with("://") {
        normalized.pop();
    }
    normalized
}

/// JSON encoding with object keys sorted at every level.
pub fn write_canonical(value: &Value, out: &mut String) {
    match value {
        Value::Object(map) => {
            let mut keys: Vec<&String> = map.keys().collect();
            keys.sort();
            out.push('{');
            for (i, k) in keys.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                out.push_str(&Value::String((*k).clone()).to_string());
                out.push(':');
                write_canonical(&map[k.as_str()], out);
            }
            out.push('}');
        }
        Value::Array(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_canonical(item, out);
            }
            out.push(']');
        }
        scalar => out.push_str(&scalar.to_string()),
    }
}

/// One stored value with the time it was written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheEntry {
    pub key: String,
    pub stored_at: DateTime<Utc>,
    pub value: Value,
}

impl CacheEntry {
    pub fn is_expired(&self, now: DateTime<Utc>, expiry: Duration) -> bool {
        now - self.stored_at > expiry
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    pub total_entries: usize,
    pub total_size: u64,
    pub expired_entries: usize,
}

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(PoisonError::into_inner)
}

/// File name for a key: SHA-256 of the key, hex encoded.
pub fn hash_key(key: &str) -> String {
    format!("{:x}", Sha256::digest(key.as_bytes()))
}

pub struct CacheStore {
    enabled: bool,
    directory: PathBuf,
    expiry: Duration,
    memory: Mutex<LruCache<String, CacheEntry>>,
    key_locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
    clock: Arc<dyn Clock>,
}

impl CacheStore {
    pub fn new(settings: &CacheSettings) -> Self {
        Self::with_clock(settings, Arc::new(SystemClock))
    }

    pub fn with_clock(settings: &CacheSettings, clock: Arc<dyn Clock>) -> Self {
        let capacity = NonZeroUsize::new(settings.memory_capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            enabled: settings.enabled,
            directory: settings.resolved_directory(),
            expiry: settings.expiry(),
            memory: Mutex::new(LruCache::new(capacity)),
            key_locks: Mutex::new(HashMap::new()),
            clock,
        }
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    fn entry_path(&self, key: &str) -> PathBuf {
        self.directory
            .join(format!("{}.{}", hash_key(key), ENTRY_EXTENSION))
    }

    /// Fresh value for `key`, or `None` when absent, expired, or unreadable.
    pub fn get(&self, key: &str) -> Option<Value> {
        if !self.enabled {
            return None;
        }
        let now = self.clock.now();

        {
            let mut memory = lock(&self.memory);
            if let Some(entry) = memory.get(key) {
                if !entry.is_expired(now, self.expiry) {
                    tracing::debug!(key, "cache hit (memory)");
                    return Some(entry.value.clone());
                }
                memory.pop(key);
            }
        }

        let entry = self.read_entry(&self.entry_path(key))?;
        if entry.key != key {
            tracing::warn!(key, stored = %entry.key, "cache file belongs to another key");
            return None;
        }
        if entry.is_expired(now, self.expiry) {
            tracing::debug!(key, stored_at = %entry.stored_at, "cache miss (expired)");
            return None;
        }

        tracing::debug!(key, "cache hit (disk)");
        let value = entry.value.clone();
        lock(&self.memory).put(key.to_string(), entry);
        Some(value)
    }

    /// Store `value` under `key`, replacing any previous entry.
    pub fn set(&self, key: &str, value: Value) {
        if !self.enabled {
            return;
        }

        let entry = CacheEntry {
            key: key.to_string(),
            stored_at: self.clock.now(),
            value,
        };

        let path = self.entry_path(key);
        match serde_json::to_string_pretty(&entry) {
            Ok(json) => {
                if let Err(err) = write_string(&path, &json) {
                    tracing::warn!(key, path = %path.display(), error = %err, "cache write failed");
                }
            }
            Err(err) => tracing::warn!(key, error = %err, "cache entry not serializable"),
        }

        lock(&self.memory).put(key.to_string(), entry);
    }

    /// Drop one entry, or every entry when `key` is `None`.
    pub fn clear(&self, key: Option<&str>) {
        match key {
            Some(key) => {
                lock(&self.memory).pop(key);
                remove_quietly(&self.entry_path(key));
            }
            None => {
                lock(&self.memory).clear();
                for path in self.entry_files() {
                    remove_quietly(&path);
                }
            }
        }
    }

    /// Counts over the persisted entries. Unreadable files count as expired.
    pub fn stats(&self) -> CacheStats {
        let now = self.clock.now();
        let mut stats = CacheStats::default();

        for path in self.entry_files() {
            stats.total_entries += 1;
            stats.total_size += fs::metadata(&path).map(|m| m.len()).unwrap_or(0);

            let fresh = fs::read_to_string(&path)
                .ok()
                .and_then(|s| serde_json::from_str::<CacheEntry>(&s).ok())
                .is_some_and(|entry| !entry.is_expired(now, self.expiry));
            if !fresh {
                stats.expired_entries += 1;
            }
        }

        stats
    }

    /// Return the cached value for `key`, or run `fetch` and cache its result.
    ///
    /// Callers asking for the same key are serialized, so concurrent misses
    /// trigger one fetch. Other keys are not blocked. Fetch errors are
    /// returned as-is and nothing is stored.
    pub fn get_or_fetch<F, E>(&self, key: &str, fetch: F) -> Result<Value, E>
    where
        F: FnOnce() -> Result<Value, E>,
    {
        self.fetch_locked(key, false, fetch)
    }

    /// Like [`get_or_fetch`](Self::get_or_fetch) but always runs `fetch`.
    ///
    /// The old entry is dropped under the key's lock, so a concurrent
    /// caller cannot slip a cached copy back in before the fetch runs.
    pub fn refetch<F, E>(&self, key: &str, fetch: F) -> Result<Value, E>
    where
        F: FnOnce() -> Result<Value, E>,
    {
        self.fetch_locked(key, true, fetch)
    }

    fn fetch_locked<F, E>(&self, key: &str, force: bool, fetch: F) -> Result<Value, E>
    where
        F: FnOnce() -> Result<Value, E>,
    {
        let slot = self.key_slot(key);
        let result = {
            let _guard = lock(&*slot);
            if force {
                self.clear(Some(key));
            }
            match self.get(key) {
                Some(value) => Ok(value),
                None => fetch().map(|value| {
                    self.set(key, value.clone());
                    value
                }),
            }
        };
        self.release_slot(key, slot);
        result
    }

    fn key_slot(&self, key: &str) -> Arc<Mutex<()>> {
        lock(&self.key_locks)
            .entry(key.to_string())
            .or_default()
            .clone()
    }

    fn release_slot(&self, key: &str, slot: Arc<Mutex<()>>) {
        let mut locks = lock(&self.key_locks);
        // the table and `slot` are the only holders: nobody is waiting
        if Arc::strong_count(&slot) == 2 {
            locks.remove(key);
        }
    }

    fn read_entry(&self, path: &Path) -> Option<CacheEntry> {
        let contents = match fs::read_to_string(path) {
            Ok(s) => s,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return None,
            Err(err) => {
                tracing::warn!(path = %path.display(), error = %err, "cache read failed");
                return None;
            }
        };

        match serde_json::from_str(&contents) {
            Ok(entry) => Some(entry),
            Err(err) => {
                tracing::warn!(path = %path.display(), error = %err, "cache entry unreadable");
                None
            }
        }
    }

    fn entry_files(&self) -> Vec<PathBuf> {
        let Ok(dir) = fs::read_dir(&self.directory) else {
            return Vec::new();
        };

        let mut files: Vec<PathBuf> = dir
            .filter_map(|e| e.ok())
            .map(|e| e.path())
            .filter(|p| p.is_file() && p.extension().is_some_and(|ext| ext == ENTRY_EXTENSION))
            .collect();
        files.sort();
        files
    }
}

fn remove_quietly(path: &Path) {
    if let Err(err) = fs::remove_file(path) {
        if err.kind() != io::ErrorKind::NotFound {
            tracing::warn!(path = %path.display(), error = %err, "cache delete failed");
        }
    }
}
