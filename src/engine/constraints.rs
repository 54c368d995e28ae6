//! Roster legality rules and the validator that checks them.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::fmt;

use crate::cli::types::role::Role;
use crate::engine::types::PlayerRecord;
use crate::error::{FantasyError, Result};


/// Tolerance applied when comparing summed credits against the budget.
pub const CREDIT_EPSILON: f64 = 1e-9;

/// Inclusive count range for one role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleQuota {
    pub min: usize,
    pub max: usize,
}

impl RoleQuota {
    pub fn new(min: usize, max: usize) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, count: usize) -> bool {
        (self.min..=self.max).contains(&count)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct RawConstraints {
    team_size: usize,
    max_credits: f64,
    max_per_team: usize,
    #[serde(default)]
    role_constraints: BTreeMap<Role, RoleQuota>,
}

/// Validated roster rules. Construction fails for configurations no pool
/// could ever satisfy, so every instance in circulation is satisfiable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawConstraints", into = "RawConstraints")]
pub struct RosterConstraints {
    team_size: usize,
    max_credits: f64,
    max_per_team: usize,
    role_constraints: BTreeMap<Role, RoleQuota>,
}

impl RosterConstraints {
    pub fn new(
        team_size: usize,
        max_credits: f64,
        max_per_team: usize,
        role_constraints: BTreeMap<Role, RoleQuota>,
    ) -> Result<Self> {
        let config_err = |message: String| Err(FantasyError::Configuration { message });

        if team_size < 2 {
            return config_err(format!(
                "team_size must be at least 2 to name a captain and vice-captain, got {}",
                team_size
            ));
        }
        if !max_credits.is_finite() || max_credits <= 0.0 {
            return config_err(format!("max_credits must be positive, got {}", max_credits));
        }
        if max_per_team == 0 {
            return config_err("max_per_team must be at least 1".to_string());
        }
        for (role, quota) in &role_constraints {
            if quota.min > quota.max {
                return config_err(format!(
                    "{} quota has min {} above max {}",
                    role, quota.min, quota.max
                ));
            }
        }

        let min_total: usize = role_constraints.values().map(|q| q.min).sum();
        if min_total > team_size {
            return config_err(format!(
                "role minimums add up to {} which exceeds team_size {}",
                min_total, team_size
            ));
        }

        // Unconstrained roles have no ceiling, so the max sum only binds when
        // every role is listed.
        if Role::ALL.iter().all(|r| role_constraints.contains_key(r)) {
            let max_total: usize = role_constraints.values().map(|q| q.max).sum();
            if max_total < team_size {
                return config_err(format!(
                    "role maximums add up to {} which is below team_size {}",
                    max_total, team_size
                ));
            }
        }

        Ok(Self {
            team_size,
            max_credits,
            max_per_team,
            role_constraints,
        })
    }

    pub fn team_size(&self) -> usize {
        self.team_size
    }

    pub fn max_credits(&self) -> f64 {
        self.max_credits
    }

    pub fn max_per_team(&self) -> usize {
        self.max_per_team
    }

    pub fn role_constraints(&self) -> &BTreeMap<Role, RoleQuota> {
        &self.role_constraints
    }

    pub fn quota(&self, role: Role) -> Option<RoleQuota> {
        self.role_constraints.get(&role).copied()
    }

    /// Minimum count for a role, zero when unconstrained.
    pub fn min_for(&self, role: Role) -> usize {
        self.quota(role).map_or(0, |q| q.min)
    }

    /// Maximum count for a role, `team_size` when unconstrained.
    pub fn max_for(&self, role: Role) -> usize {
        self.quota(role).map_or(self.team_size, |q| q.max)
    }

    /// Copy with a different budget, revalidated.
    pub fn with_max_credits(&self, max_credits: f64) -> Result<Self> {
        Self::new(
            self.team_size,
            max_credits,
            self.max_per_team,
            self.role_constraints.clone(),
        )
    }

    /// Copy with a different per-team cap, revalidated.
    pub fn with_max_per_team(&self, max_per_team: usize) -> Result<Self> {
        Self::new(
            self.team_size,
            self.max_credits,
            max_per_team,
            self.role_constraints.clone(),
        )
    }
}

impl Default for RosterConstraints {
    fn default() -> Self {
        let role_constraints = BTreeMap::from([
            (Role::WicketKeeper, RoleQuota::new(1, 2)),
            (Role::Batsman, RoleQuota::new(3, 5)),
            (Role::AllRounder, RoleQuota::new(1, 3)),
            (Role::Bowler, RoleQuota::new(3, 5)),
        ]);
        Self {
            team_size: 11,
            max_credits: 100.0,
            max_per_team: 7,
            role_constraints,
        }
    }
}

impl TryFrom<RawConstraints> for RosterConstraints {
    type Error = FantasyError;

    fn try_from(raw: RawConstraints) -> Result<Self> {
        Self::new(
            raw.team_size,
            raw.max_credits,
            raw.max_per_team,
            raw.role_constraints,
        )
    }
}

impl From<RosterConstraints> for RawConstraints {
    fn from(c: RosterConstraints) -> Self {
        Self {
            team_size: c.team_size,
            max_credits: c.max_credits,
            max_per_team: c.max_per_team,
            role_constraints: c.role_constraints,
        }
    }
}

/// A single broken roster rule.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "rule", rename_all = "snake_case")]
pub enum Violation {
    TeamSize { expected: usize, actual: usize },
    MaxCredits { total: f64, max: f64 },
    MaxPerTeam { team: String, count: usize, max: usize },
    RoleMin { role: Role, count: usize, min: usize },
    RoleMax { role: Role, count: usize, max: usize },
    DuplicatePlayer { name: String },
}

impl Violation {
    /// Stable rule identifier.
    pub fn rule(&self) -> &'static str {
        match self {
            Violation::TeamSize { .. } => "team_size",
            Violation::MaxCredits { .. } => "max_credits",
            Violation::MaxPerTeam { .. } => "max_per_team",
            Violation::RoleMin { .. } => "role_min",
            Violation::RoleMax { .. } => "role_max",
            Violation::DuplicatePlayer { .. } => "duplicate_player",
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Violation::TeamSize { expected, actual } => {
                write!(f, "roster has {} players, expected {}", actual, expected)
            }
            Violation::MaxCredits { total, max } => {
                write!(f, "roster costs {:.1} credits, budget is {:.1}", total, max)
            }
            Violation::MaxPerTeam { team, count, max } => {
                write!(f, "{} players from {}, at most {} allowed", count, team, max)
            }
            Violation::RoleMin { role, count, min } => {
                write!(f, "{} {} selected, at least {} required", count, role, min)
            }
            Violation::RoleMax { role, count, max } => {
                write!(f, "{} {} selected, at most {} allowed", count, role, max)
            }
            Violation::DuplicatePlayer { name } => write!(f, "{} selected more than once", name),
        }
    }
}

/// Evaluate every roster rule and report all that fail, in check order:
/// size, budget, per-team cap, role quotas, duplicates.
pub fn roster_violations<'a, I>(players: I, constraints: &RosterConstraints) -> Vec<Violation>
where
    I: IntoIterator<Item = &'a PlayerRecord>,
{
    let players: Vec<&PlayerRecord> = players.into_iter().collect();
    let mut violations = Vec::new();

    if players.len() != constraints.team_size {
        violations.push(Violation::TeamSize {
            expected: constraints.team_size,
            actual: players.len(),
        });
    }

    let total: f64 = players.iter().map(|p| p.credits).sum();
    if total > constraints.max_credits + CREDIT_EPSILON {
        violations.push(Violation::MaxCredits {
            total,
            max: constraints.max_credits,
        });
    }

    let mut team_counts: BTreeMap<&str, usize> = BTreeMap::new();
    for p in &players {
        *team_counts.entry(p.team.as_str()).or_default() += 1;
    }
    for (team, count) in team_counts {
        if count > constraints.max_per_team {
            violations.push(Violation::MaxPerTeam {
                team: team.to_string(),
                count,
                max: constraints.max_per_team,
            });
        }
    }

    for (&role, quota) in &constraints.role_constraints {
        let count = players.iter().filter(|p| p.role == role).count();
        if count < quota.min {
            violations.push(Violation::RoleMin {
                role,
                count,
                min: quota.min,
            });
        } else if count > quota.max {
            violations.push(Violation::RoleMax {
                role,
                count,
                max: quota.max,
            });
        }
    }

    let mut seen = HashSet::new();
    for p in &players {
        if !seen.insert(p.name.as_str()) {
            violations.push(Violation::DuplicatePlayer {
                name: p.name.clone(),
            });
        }
    }

    violations
}

/// True when the roster breaks no rule.
pub fn validate_roster<'a, I>(players: I, constraints: &RosterConstraints) -> bool
where
    I: IntoIterator<Item = &'a PlayerRecord>,
{
    roster_violations(players, constraints).is_empty()
}
