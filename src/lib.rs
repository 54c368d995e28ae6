//! Fantasy Cricket XI Library
//!
//! Builds fantasy cricket teams from a pool of candidate players: scores each
//! player's match stats against a configurable point table, then picks the
//! highest-scoring XI that satisfies the credit budget, per-team cap and role
//! quotas, and names a captain and vice-captain by recent form.
//!
//! ## Features
//!
//! - **Scoring**: Configurable points per run, boundary, wicket, catch and milestone
//! - **Selection**: Deterministic constrained XI selection with bounded backtracking
//! - **Validation**: Every broken roster rule reported, for generated or proposed teams
//! - **Caching**: Two-tier expiring cache with per-key fetch deduplication
//!
//! ## Quick Start
//!
//! ```rust
//! use fantasy_xi::{select_team, PlayerRecord, RosterConstraints, ScoringWeights};
//!
//! # fn example(pool: Vec<PlayerRecord>) -> fantasy_xi::Result<()> {
//! let roster = select_team(&pool, &ScoringWeights::default(), &RosterConstraints::default())?;
//! println!("Captain: {}", roster.captain);
//! # Ok(())
//! # }
//! ```
//!
//! ## Environment Configuration
//!
//! Point at a config file to avoid passing `--config` to every command:
//! ```bash
//! export FANTASY_XI_CONFIG=~/fantasy/config.json
//! ```

pub mod cli;
pub mod commands;
pub mod config;
pub mod core;
pub mod engine;
pub mod error;

// Re-export commonly used types
pub use cli::types::role::Role;
pub use config::{load_config, AppConfig, CONFIG_ENV_VAR};
pub use crate::core::cache::{CacheKey, CacheSettings, CacheStats, CacheStore, ScrapeRequestKey};
pub use engine::{
    compute_score, roster_violations, select_team, select_team_at, validate_roster, MatchStats,
    PlayerRecord, RoleQuota, Roster, RosterConstraints, ScoringWeights, SelectedPlayer, Violation,
};
pub use error::{ErrorReport, FantasyError, Result};
