//! Core plumbing shared by the commands
//!
//! - `cache`: two-tier expiring key-value store
//! - `source`: match data sources and the cached wrapper

pub mod cache;
pub mod source;

// Re-export commonly used items for convenience
pub use cache::{
    default_cache_dir, CacheEntry, CacheKey, CacheSettings, CacheStats, CacheStore, Clock,
    ScrapeRequestKey, SystemClock,
};
pub use source::{CacheStatus, CachedSource, FileSource, MatchDataSource};
