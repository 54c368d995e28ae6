//! Common utilities and helper functions shared across commands.

use std::{
    fmt::Write as _,
    fs,
    path::{Path, PathBuf},
    sync::Arc,
};

use crate::{
    config::{load_config, AppConfig},
    core::{CacheKey, CacheStatus, CacheStore, CachedSource, FileSource, ScrapeRequestKey},
    engine::{parse_pool, MatchInfo, MatchPool, Roster},
    Result,
};

/// Context containing common resources needed by most commands
pub struct CommandContext {
    pub config: AppConfig,
    pub cache: Arc<CacheStore>,
}

impl CommandContext {
    /// Load configuration and open the cache.
    pub fn new(config_path: Option<&Path>) -> Result<Self> {
        Ok(Self::from_config(load_config(config_path)?))
    }

    pub fn from_config(config: AppConfig) -> Self {
        let cache = Arc::new(CacheStore::new(&config.cache));
        Self { config, cache }
    }

    /// Read a pool file through the cache.
    pub fn load_pool(&self, path: &Path, refresh: bool) -> Result<(MatchPool, CacheStatus)> {
        let source = CachedSource::new(FileSource, Arc::clone(&self.cache));
        let (value, status) = source.fetch_with_status(&pool_request(path), refresh)?;
        let pool = parse_pool(&value)?;
        tracing::debug!(
            path = %path.display(),
            players = pool.players.len(),
            ?status,
            "pool loaded"
        );
        Ok((pool, status))
    }
}

/// Cache request for a pool file. Relative and absolute spellings of the
/// same file share one entry.
pub fn pool_request(path: &Path) -> ScrapeRequestKey {
    let resolved: PathBuf = fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf());
    ScrapeRequestKey::for_url(resolved.to_string_lossy())
}

/// Cache key for a pool file.
pub fn pool_cache_key(path: &Path) -> String {
    pool_request(path).cache_key()
}

/// One line describing the fixture, if the pool carried match metadata.
pub fn format_match_info(info: &MatchInfo) -> Option<String> {
    let (Some(team1), Some(team2)) = (&info.team1, &info.team2) else {
        return None;
    };

    let mut line = format!("{} vs {}", team1, team2);
    if let Some(venue) = &info.venue {
        let _ = write!(line, " at {}", venue);
    }
    if let Some(date) = &info.date {
        let _ = write!(line, " ({})", date);
    }
    Some(line)
}

/// Render a roster as a fixed-width table.
pub fn format_roster(roster: &Roster, max_credits: f64) -> String {
    let name_width = roster
        .players
        .iter()
        .map(|p| p.player.name.chars().count() + 5)
        .max()
        .unwrap_or(0)
        .max("Player".len());

    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:>2}  {:<4}  {:<name_width$}  {:<6}  {:>7}  {:>7}",
        "#", "Role", "Player", "Team", "Credits", "Points"
    );

    for (i, selected) in roster.players.iter().enumerate() {
        let p = &selected.player;
        let mut name = p.name.clone();
        if p.name == roster.captain {
            name.push_str(" (C)");
        } else if p.name == roster.vice_captain {
            name.push_str(" (VC)");
        }
        let _ = writeln!(
            out,
            "{:>2}  {:<4}  {:<name_width$}  {:<6}  {:>7.1}  {:>7.1}",
            i + 1,
            p.role.abbreviation(),
            name,
            p.team,
            p.credits,
            selected.score
        );
    }

    let _ = writeln!(out);
    let _ = writeln!(out, "Captain: {}", roster.captain);
    let _ = writeln!(out, "Vice-captain: {}", roster.vice_captain);
    let _ = write!(
        out,
        "Credits: {:.1} / {:.1}   Points: {:.1}",
        roster.total_credits, max_credits, roster.total_score
    );
    out
}

/// How the pool was obtained, for the status line.
pub fn describe_status(status: CacheStatus) -> &'static str {
    match status {
        CacheStatus::Hit => "from cache",
        CacheStatus::Miss => "read from disk",
        CacheStatus::Refreshed => "refreshed",
    }
}
