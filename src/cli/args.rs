//! CLI argument definitions and parsing structures.

use super::types::role::Role;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Where the player pool comes from.
#[derive(Debug, Args)]
pub struct PoolArgs {
    /// Player pool JSON: a bare array of players or a match payload with a `players` array.
    #[clap(long, short)]
    pub pool: PathBuf,

    /// Re-read the pool file even if a cached copy exists.
    #[clap(long)]
    pub refresh: bool,
}

#[derive(Debug, Parser)]
#[clap(name = "fantasy-xi", about = "Fantasy cricket XI builder")]
pub struct FantasyXi {
    /// Config file (or set `FANTASY_XI_CONFIG` env var).
    #[clap(long, short, global = true)]
    pub config: Option<PathBuf>,

    #[clap(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Pick the highest scoring XI that satisfies the roster rules.
    BuildTeam {
        #[clap(flatten)]
        pool: PoolArgs,

        /// Override the credit budget from the config.
        #[clap(long)]
        max_credits: Option<f64>,

        /// Override the per-team player cap from the config.
        #[clap(long)]
        max_per_team: Option<usize>,

        /// Output the roster as JSON instead of a table.
        #[clap(long)]
        json: bool,
    },

    /// Score every player in the pool, best first.
    Score {
        #[clap(flatten)]
        pool: PoolArgs,

        /// Only list players in this role (repeatable): `-r wk -r bowler`.
        #[clap(short = 'r', long = "role", value_parser = clap::value_parser!(Role))]
        roles: Option<Vec<Role>>,

        /// Output results as JSON instead of text lines.
        #[clap(long)]
        json: bool,
    },

    /// Check a proposed XI against the pool and the roster rules.
    ///
    /// The proposal file may be free text (e.g. a model reply) containing a
    /// JSON object with `players`, `captain` and optionally `vice_captain`.
    CheckTeam {
        #[clap(flatten)]
        pool: PoolArgs,

        /// File holding the proposed team.
        #[clap(long)]
        proposal: PathBuf,

        /// Output the resolved roster as JSON.
        #[clap(long)]
        json: bool,
    },

    /// Inspect or clear the local cache.
    Cache {
        #[clap(subcommand)]
        cmd: CacheCmd,
    },
}

#[derive(Debug, Subcommand)]
pub enum CacheCmd {
    /// Show entry counts and on-disk size.
    Stats {
        /// Output stats as JSON.
        #[clap(long)]
        json: bool,
    },

    /// Remove cached entries (all of them unless narrowed down).
    Clear {
        /// Remove only this raw cache key.
        #[clap(long, conflicts_with = "pool")]
        key: Option<String>,

        /// Remove only the cached copy of this pool file.
        #[clap(long)]
        pool: Option<PathBuf>,
    },
}
