use serde::{Deserialize, Serialize};

use crate::engine::types::MatchStats;


#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BattingPoints {
    pub run: f64,
    pub four: f64,
    pub six: f64,
    /// Bonus for 50..=99 runs
    pub fifty: f64,
    /// Bonus for 100+ runs, replaces the fifty bonus
    pub hundred: f64,
}

impl Default for BattingPoints {
    fn default() -> Self {
        Self {
            run: 1.0,
            four: 1.0,
            six: 2.0,
            fifty: 8.0,
            hundred: 16.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BowlingPoints {
    pub wicket: f64,
    pub maiden: f64,
    pub four_wickets: f64,
    pub five_wickets: f64,
}

impl Default for BowlingPoints {
    fn default() -> Self {
        Self {
            wicket: 25.0,
            maiden: 12.0,
            four_wickets: 8.0,
            five_wickets: 16.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldingPoints {
    pub catch: f64,
    pub stumping: f64,
    pub run_out: f64,
}

impl Default for FieldingPoints {
    fn default() -> Self {
        Self {
            catch: 8.0,
            stumping: 12.0,
            run_out: 6.0,
        }
    }
}

/// Fantasy point table. Loaded once and shared read-only.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringWeights {
    pub batting: BattingPoints,
    pub bowling: BowlingPoints,
    pub fielding: FieldingPoints,
}

/// Compute fantasy points for one player's match stats.
///
/// Milestone bonuses only pay the highest threshold reached: a century earns
/// the hundred bonus and not the fifty bonus, a five-wicket haul earns the
/// five-wicket bonus and not the four-wicket bonus.
pub fn compute_score(stats: &MatchStats, weights: &ScoringWeights) -> f64 {
    let bat = &weights.batting;
    let bowl = &weights.bowling;
    let field = &weights.fielding;

    let mut total = f64::from(stats.runs) * bat.run
        + f64::from(stats.fours) * bat.four
        + f64::from(stats.sixes) * bat.six;

    if stats.runs >= 100 {
        total += bat.hundred;
    } else if stats.runs >= 50 {
        total += bat.fifty;
    }

    total += f64::from(stats.wickets) * bowl.wicket + f64::from(stats.maidens) * bowl.maiden;

    if stats.wickets >= 5 {
        total += bowl.five_wickets;
    } else if stats.wickets >= 4 {
        total += bowl.four_wickets;
    }

    total
        + f64::from(stats.catches) * field.catch
        + f64::from(stats.stumpings) * field.stumping
        + f64::from(stats.run_outs) * field.run_out
}
