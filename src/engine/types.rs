use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::cli::types::role::Role;

/// Raw per-match counting stats. Absent fields deserialize as zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchStats {
    pub runs: i32,
    pub fours: i32,
    pub sixes: i32,
    pub wickets: i32,
    pub maidens: i32,
    pub catches: i32,
    pub stumpings: i32,
    pub run_outs: i32,
}

/// One candidate in a selection pool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerRecord {
    pub name: String,
    pub team: String,
    pub role: Role,
    pub credits: f64,
    #[serde(default)]
    pub match_stats: MatchStats,
    /// Scores from prior matches, most recent first.
    #[serde(default, alias = "last_3_matches")]
    pub recent_form: Vec<f64>,
}

impl PlayerRecord {
    /// Sum of recent form scores, the captaincy ranking signal.
    pub fn form_total(&self) -> f64 {
        self.recent_form.iter().sum()
    }
}

/// A roster member together with the score it was selected on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectedPlayer {
    #[serde(flatten)]
    pub player: PlayerRecord,
    pub score: f64,
}

/// A finished XI. Built once per request and never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Roster {
    pub players: Vec<SelectedPlayer>,
    pub captain: String,
    pub vice_captain: String,
    pub total_credits: f64,
    pub total_score: f64,
    pub created_at: DateTime<Utc>,
}

impl Roster {
    pub fn records(&self) -> impl Iterator<Item = &PlayerRecord> {
        self.players.iter().map(|p| &p.player)
    }

    pub fn get(&self, name: &str) -> Option<&SelectedPlayer> {
        self.players.iter().find(|p| p.player.name == name)
    }

    pub fn captain(&self) -> Option<&SelectedPlayer> {
        self.get(&self.captain)
    }

    pub fn vice_captain(&self) -> Option<&SelectedPlayer> {
        self.get(&self.vice_captain)
    }

    pub fn count_role(&self, role: Role) -> usize {
        self.records().filter(|p| p.role == role).count()
    }
}
