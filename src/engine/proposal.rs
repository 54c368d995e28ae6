//! Resolve an externally proposed XI (names only) against a pool.
//!
//! Proposals typically come back from a language model as free text with a
//! JSON object somewhere inside it. Only the checking lives here; producing
//! the proposal is the caller's business.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::engine::constraints::{roster_violations, RosterConstraints};
use crate::engine::pool::check_pool;
use crate::engine::scoring::{compute_score, ScoringWeights};
use crate::engine::selector::{build_roster, rank_by_form};
use crate::engine::types::{PlayerRecord, Roster, SelectedPlayer};
use crate::error::{FantasyError, Result};

/// A team named by player names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamProposal {
    pub players: Vec<String>,
    pub captain: String,
    #[serde(default)]
    pub vice_captain: Option<String>,
    #[serde(default)]
    pub strategy: Option<String>,
}

/// Cut the JSON object out of surrounding prose or a fenced code block.
///
/// Returns the input trimmed when no braces are found.
pub fn extract_json_block(text: &str) -> &str {
    let mut text = text.trim();

    if text.contains("```") {
        for block in text.split("```") {
            let block = block.trim();
            let body = block.strip_prefix("json").unwrap_or(block).trim_start();
            if body.starts_with('{') {
                text = body;
                break;
            }
        }
    }

    match (text.find('{'), text.rfind('}')) {
        (Some(start), Some(end)) if start < end => &text[start..=end],
        _ => text,
    }
}

/// Parse a proposal from model output.
pub fn parse_proposal(text: &str) -> Result<TeamProposal> {
    serde_json::from_str(extract_json_block(text)).map_err(|e| FantasyError::InvalidProposal {
        message: format!("response is not a team object: {}", e),
    })
}

fn find_player<'a>(pool: &'a [PlayerRecord], name: &str) -> Result<&'a PlayerRecord> {
    let wanted = name.trim();
    pool.iter()
        .find(|p| p.name == wanted)
        .or_else(|| pool.iter().find(|p| p.name.eq_ignore_ascii_case(wanted)))
        .ok_or_else(|| FantasyError::PlayerNotFound {
            name: wanted.to_string(),
        })
}

/// Turn a proposal into a roster, checking every name, the captaincy, and
/// every roster rule. A missing vice-captain is filled in by recent form.
pub fn resolve_proposal(
    proposal: &TeamProposal,
    pool: &[PlayerRecord],
    weights: &ScoringWeights,
    constraints: &RosterConstraints,
    created_at: DateTime<Utc>,
) -> Result<Roster> {
    check_pool(pool)?;

    let members = proposal
        .players
        .iter()
        .map(|name| find_player(pool, name))
        .collect::<Result<Vec<_>>>()?;

    let violations = roster_violations(members.iter().copied(), constraints);
    if !violations.is_empty() {
        return Err(FantasyError::ConstraintViolations(violations));
    }

    let in_team: HashSet<&str> = members.iter().map(|p| p.name.as_str()).collect();
    let captain = find_player(pool, &proposal.captain)?;
    if !in_team.contains(captain.name.as_str()) {
        return Err(FantasyError::InvalidProposal {
            message: format!("captain {} is not one of the selected players", captain.name),
        });
    }

    let vice_captain = match &proposal.vice_captain {
        Some(name) => {
            let vc = find_player(pool, name)?;
            if !in_team.contains(vc.name.as_str()) {
                return Err(FantasyError::InvalidProposal {
                    message: format!("vice-captain {} is not one of the selected players", vc.name),
                });
            }
            if vc.name == captain.name {
                return Err(FantasyError::InvalidProposal {
                    message: "captain and vice-captain must be different players".to_string(),
                });
            }
            vc
        }
        None => rank_by_form(members.iter().copied())
            .into_iter()
            .find(|p| p.name != captain.name)
            .ok_or_else(|| FantasyError::InvalidProposal {
                message: "no candidate left for vice-captain".to_string(),
            })?,
    };

    let players: Vec<SelectedPlayer> = members
        .iter()
        .map(|p| SelectedPlayer {
            player: (*p).clone(),
            score: compute_score(&p.match_stats, weights),
        })
        .collect();

    let mut roster = build_roster(players, created_at)?;
    roster.captain = captain.name.clone();
    roster.vice_captain = vice_captain.name.clone();
    Ok(roster)
}
