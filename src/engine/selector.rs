//! Constrained XI selection.
//!
//! Candidates are ranked by fantasy score (name breaks ties). Each role's
//! minimum is filled from the top of that role's ranking, then the remaining
//! slots come from the overall ranking, all while respecting the running
//! credit budget, the per-team cap and role maxima. When a slot cannot be
//! filled the search steps back one slot and tries that slot's next-best
//! candidate. The first complete roster wins, which is the plain greedy
//! roster whenever greedy succeeds.

use chrono::{DateTime, Utc};
use rayon::prelude::*;
use std::cmp::Ordering;
use std::collections::HashMap;

use crate::cli::types::role::Role;
use crate::engine::constraints::{RosterConstraints, CREDIT_EPSILON};
use crate::engine::pool::check_pool;
use crate::engine::scoring::{compute_score, ScoringWeights};
use crate::engine::types::{PlayerRecord, Roster, SelectedPlayer};
use crate::error::{FantasyError, Result};


/// Upper bound on candidate placements tried before giving up.
pub const SEARCH_BUDGET: usize = 250_000;

/// A pool entry paired with its computed score.
#[derive(Debug, Clone, Copy)]
pub struct RankedPlayer<'a> {
    pub player: &'a PlayerRecord,
    pub score: f64,
}

/// Score descending, then name ascending. Never insertion order.
fn by_score_then_name(a: &RankedPlayer<'_>, b: &RankedPlayer<'_>) -> Ordering {
    b.score
        .total_cmp(&a.score)
        .then_with(|| a.player.name.cmp(&b.player.name))
}

/// Score every candidate and sort into selection order.
pub fn rank_players<'a>(pool: &'a [PlayerRecord], weights: &ScoringWeights) -> Vec<RankedPlayer<'a>> {
    let mut ranked: Vec<RankedPlayer<'a>> = pool
        .par_iter()
        .map(|player| RankedPlayer {
            player,
            score: compute_score(&player.match_stats, weights),
        })
        .collect();
    ranked.sort_by(by_score_then_name);
    ranked
}

/// Order players for captaincy: recent form total descending, name ascending.
pub fn rank_by_form<'a, I>(players: I) -> Vec<&'a PlayerRecord>
where
    I: IntoIterator<Item = &'a PlayerRecord>,
{
    let mut ordered: Vec<&PlayerRecord> = players.into_iter().collect();
    ordered.sort_by(|a, b| {
        b.form_total()
            .total_cmp(&a.form_total())
            .then_with(|| a.name.cmp(&b.name))
    });
    ordered
}

/// Select a roster, stamped with the current time.
pub fn select_team(
    pool: &[PlayerRecord],
    weights: &ScoringWeights,
    constraints: &RosterConstraints,
) -> Result<Roster> {
    select_team_at(pool, weights, constraints, Utc::now())
}

/// Select a roster with an explicit creation time. Identical inputs give an
/// identical roster.
pub fn select_team_at(
    pool: &[PlayerRecord],
    weights: &ScoringWeights,
    constraints: &RosterConstraints,
    created_at: DateTime<Utc>,
) -> Result<Roster> {
    check_pool(pool)?;
    check_supply(pool, constraints)?;

    let ranked = rank_players(pool, weights);
    let mut search = Search::new(&ranked, constraints);

    if !search.fill(0, 0) {
        let message = if search.exhausted {
            format!(
                "gave up after trying {} candidate placements",
                SEARCH_BUDGET
            )
        } else {
            format!(
                "no {}-player combination fits {:.1} credits, {} per team and the role quotas",
                constraints.team_size(),
                constraints.max_credits(),
                constraints.max_per_team()
            )
        };
        tracing::debug!(steps = search.steps, "selection failed");
        return Err(FantasyError::NoFeasibleRoster { message });
    }

    tracing::debug!(
        steps = search.steps,
        pool = pool.len(),
        "roster selected"
    );

    let players: Vec<SelectedPlayer> = search
        .chosen
        .iter()
        .map(|&i| SelectedPlayer {
            player: ranked[i].player.clone(),
            score: ranked[i].score,
        })
        .collect();

    build_roster(players, created_at)
}

/// Order roster members for display and name the captains.
pub(crate) fn build_roster(
    mut players: Vec<SelectedPlayer>,
    created_at: DateTime<Utc>,
) -> Result<Roster> {
    players.sort_by(|a, b| {
        a.player
            .role
            .cmp(&b.player.role)
            .then_with(|| b.score.total_cmp(&a.score))
            .then_with(|| a.player.name.cmp(&b.player.name))
    });

    let (captain, vice_captain) = {
        let ordered = rank_by_form(players.iter().map(|p| &p.player));
        match ordered.as_slice() {
            [first, second, ..] => (first.name.clone(), second.name.clone()),
            _ => {
                return Err(FantasyError::NoFeasibleRoster {
                    message: "a roster needs at least two players".to_string(),
                })
            }
        }
    };

    Ok(Roster {
        total_credits: players.iter().map(|p| p.player.credits).sum(),
        total_score: players.iter().map(|p| p.score).sum(),
        players,
        captain,
        vice_captain,
        created_at,
    })
}

/// Fail fast when the pool cannot cover the team size or a role minimum.
fn check_supply(pool: &[PlayerRecord], constraints: &RosterConstraints) -> Result<()> {
    if pool.len() < constraints.team_size() {
        return Err(FantasyError::InsufficientPool {
            role: None,
            required: constraints.team_size(),
            available: pool.len(),
        });
    }

    for role in Role::ALL {
        let required = constraints.min_for(role);
        let available = pool.iter().filter(|p| p.role == role).count();
        if available < required {
            return Err(FantasyError::InsufficientPool {
                role: Some(role),
                required,
                available,
            });
        }
    }

    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Slot {
    Quota(Role),
    Open,
}

struct Search<'r, 'a> {
    ranked: &'r [RankedPlayer<'a>],
    constraints: &'r RosterConstraints,
    slots: Vec<Slot>,
    role_index: HashMap<Role, Vec<usize>>,
    open_index: Vec<usize>,
    cheapest: f64,

    chosen: Vec<usize>,
    taken: Vec<bool>,
    spent: f64,
    team_counts: HashMap<&'a str, usize>,
    role_counts: HashMap<Role, usize>,

    steps: usize,
    exhausted: bool,
}

impl<'r, 'a> Search<'r, 'a> {
    fn new(ranked: &'r [RankedPlayer<'a>], constraints: &'r RosterConstraints) -> Self {
        let mut slots = Vec::with_capacity(constraints.team_size());
        for role in Role::ALL {
            slots.extend(std::iter::repeat(Slot::Quota(role)).take(constraints.min_for(role)));
        }
        let open = constraints.team_size().saturating_sub(slots.len());
        slots.extend(std::iter::repeat(Slot::Open).take(open));

        let mut role_index: HashMap<Role, Vec<usize>> = HashMap::new();
        for (i, rp) in ranked.iter().enumerate() {
            role_index.entry(rp.player.role).or_default().push(i);
        }

        let cheapest = ranked
            .iter()
            .map(|rp| rp.player.credits)
            .fold(f64::INFINITY, f64::min);

        Self {
            ranked,
            constraints,
            slots,
            role_index,
            open_index: (0..ranked.len()).collect(),
            cheapest,
            chosen: Vec::with_capacity(constraints.team_size()),
            taken: vec![false; ranked.len()],
            spent: 0.0,
            team_counts: HashMap::new(),
            role_counts: HashMap::new(),
            steps: 0,
            exhausted: false,
        }
    }

    /// Fill `slots[depth..]`, trying candidates for this slot from position
    /// `from` of the slot's ranking. Consecutive slots of the same kind only
    /// look further down the ranking, so each combination is tried once per
    /// block.
    fn fill(&mut self, depth: usize, from: usize) -> bool {
        if depth == self.slots.len() {
            return true;
        }

        let slot = self.slots[depth];
        let remaining_after = self.slots.len() - depth - 1;
        let same_next = self.slots.get(depth + 1) == Some(&slot);

        let ranking_len = self.ranking(slot).len();
        for pos in from..ranking_len {
            self.steps += 1;
            if self.steps > SEARCH_BUDGET {
                self.exhausted = true;
                return false;
            }

            let idx = self.ranking(slot)[pos];
            if self.taken[idx] || !self.admits(idx, remaining_after) {
                continue;
            }

            self.push(idx);
            let next_from = if same_next { pos + 1 } else { 0 };
            if self.fill(depth + 1, next_from) {
                return true;
            }
            self.pop();

            if self.exhausted {
                return false;
            }
        }

        false
    }

    fn ranking(&self, slot: Slot) -> &[usize] {
        match slot {
            Slot::Quota(role) => self.role_index.get(&role).map(Vec::as_slice).unwrap_or(&[]),
            Slot::Open => &self.open_index,
        }
    }

    fn admits(&self, idx: usize, remaining_after: usize) -> bool {
        let player = self.ranked[idx].player;

        let floor = self.spent + player.credits + remaining_after as f64 * self.cheapest;
        if floor > self.constraints.max_credits() + CREDIT_EPSILON {
            return false;
        }

        let on_team = self.team_counts.get(player.team.as_str()).copied().unwrap_or(0);
        if on_team >= self.constraints.max_per_team() {
            return false;
        }

        let in_role = self.role_counts.get(&player.role).copied().unwrap_or(0);
        in_role < self.constraints.max_for(player.role)
    }

    fn push(&mut self, idx: usize) {
        let player = self.ranked[idx].player;
        self.taken[idx] = true;
        self.chosen.push(idx);
        self.spent += player.credits;
        *self.team_counts.entry(player.team.as_str()).or_default() += 1;
        *self.role_counts.entry(player.role).or_default() += 1;
    }

    fn pop(&mut self) {
        if let Some(idx) = self.chosen.pop() {
            let player = self.ranked[idx].player;
            self.taken[idx] = false;
            self.spent -= player.credits;
            if let Some(n) = self.team_counts.get_mut(player.team.as_str()) {
                *n -= 1;
            }
            if let Some(n) = self.role_counts.get_mut(&player.role) {
                *n -= 1;
            }
        }
    }
}
