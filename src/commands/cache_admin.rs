//! Cache inspection and cleanup commands

use std::path::Path;

use crate::{core::CacheStats, Result};

use super::common::{pool_cache_key, CommandContext};

/// Handle `cache stats`
pub fn handle_cache_stats(ctx: &CommandContext, as_json: bool) -> Result<CacheStats> {
    let stats = ctx.cache.stats();

    if as_json {
        println!("{}", serde_json::to_string_pretty(&stats)?); // tarpaulin::skip
        return Ok(stats);
    }

    println!("Cache directory: {}", ctx.cache.directory().display());
    if !ctx.cache.is_enabled() {
        println!("Caching is disabled in the config");
    }
    println!("Entries: {}", stats.total_entries);
    println!("Expired: {}", stats.expired_entries);
    println!("Size: {} bytes", stats.total_size);

    Ok(stats)
}

/// Handle `cache clear`: one raw key, the entry for one pool file, or everything.
pub fn handle_cache_clear(ctx: &CommandContext, key: Option<&str>, pool: Option<&Path>) {
    match (key, pool) {
        (Some(key), _) => {
            ctx.cache.clear(Some(key));
            println!("✓ Cleared cache entry {}", key);
        }
        (None, Some(path)) => {
            ctx.cache.clear(Some(&pool_cache_key(path)));
            println!("✓ Cleared cached pool {}", path.display());
        }
        (None, None) => {
            let removed = ctx.cache.stats().total_entries;
            ctx.cache.clear(None);
            println!("✓ Cleared {} cache entries", removed);
        }
    }
}
