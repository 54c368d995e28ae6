//! Team construction and scoring engine
//!
//! Everything in here is pure and synchronous:
//! - `types`: player, stats and roster records
//! - `pool`: pool parsing and sanity checks
//! - `scoring`: point table and per-player fantasy score
//! - `constraints`: roster rules and the validator
//! - `selector`: constrained XI selection and captaincy
//! - `proposal`: checking an externally proposed XI

pub mod constraints;
pub mod pool;
pub mod proposal;
pub mod scoring;
pub mod selector;
pub mod types;

pub use constraints::{roster_violations, validate_roster, RoleQuota, RosterConstraints, Violation};
pub use pool::{check_pool, parse_pool, MatchInfo, MatchPool};
pub use proposal::{extract_json_block, parse_proposal, resolve_proposal, TeamProposal};
pub use scoring::{compute_score, BattingPoints, BowlingPoints, FieldingPoints, ScoringWeights};
pub use selector::{rank_by_form, rank_players, select_team, select_team_at, RankedPlayer};
pub use types::{MatchStats, PlayerRecord, Roster, SelectedPlayer};
