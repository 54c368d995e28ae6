//! Match data sources and the caching wrapper in front of them.

use serde_json::Value;
use std::{fs, path::Path, sync::Arc};

use super::cache::{CacheKey, CacheStore, ScrapeRequestKey};
use crate::error::Result;

/// Whether a lookup was served from the cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheStatus {
    Hit,
    Miss,
    Refreshed,
}

/// Anything that can produce the raw JSON for a request.
pub trait MatchDataSource: Send + Sync {
    fn fetch(&self, request: &ScrapeRequestKey) -> Result<Value>;
}

/// Reads the request URL as a local file path.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileSource;

impl MatchDataSource for FileSource {
    fn fetch(&self, request: &ScrapeRequestKey) -> Result<Value> {
        let path = Path::new(request.url.trim());
        tracing::debug!(path = %path.display(), "reading match data");
        let contents = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&contents)?)
    }
}

/// A source with a [`CacheStore`] in front of it.
///
/// Identical requests issued concurrently reach the inner source once.
pub struct CachedSource<S> {
    inner: S,
    cache: Arc<CacheStore>,
}

impl<S: MatchDataSource> CachedSource<S> {
    pub fn new(inner: S, cache: Arc<CacheStore>) -> Self {
        Self { inner, cache }
    }

    pub fn cache(&self) -> &CacheStore {
        &self.cache
    }

    /// Fetch through the cache. `refresh` drops any cached copy first.
    pub fn fetch_with_status(
        &self,
        request: &ScrapeRequestKey,
        refresh: bool,
    ) -> Result<(Value, CacheStatus)> {
        let key = request.cache_key();

        let mut fetched = false;
        let fetch = || {
            fetched = true;
            self.inner.fetch(request)
        };
        let value = if refresh {
            self.cache.refetch(&key, fetch)?
        } else {
            self.cache.get_or_fetch(&key, fetch)?
        };

        let status = match (fetched, refresh) {
            (false, _) => CacheStatus::Hit,
            (true, false) => CacheStatus::Miss,
            (true, true) => CacheStatus::Refreshed,
        };
        tracing::debug!(key = %key, ?status, "match data loaded");
        Ok((value, status))
    }
}

impl<S: MatchDataSource> MatchDataSource for CachedSource<S> {
    fn fetch(&self, request: &ScrapeRequestKey) -> Result<Value> {
        self.fetch_with_status(request, false).map(|(value, _)| value)
    }
}
