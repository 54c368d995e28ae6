//! Pool parsing and sanity checks.

use serde::Deserialize;
use serde_json::Value;
use std::collections::HashSet;

use crate::engine::types::PlayerRecord;
use crate::error::{FantasyError, Result};

/// Match metadata carried alongside a scraped pool.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MatchInfo {
    #[serde(default)]
    pub team1: Option<String>,
    #[serde(default)]
    pub team2: Option<String>,
    #[serde(default)]
    pub venue: Option<String>,
    #[serde(default)]
    pub date: Option<String>,
}

/// Handles both shapes a pool arrives in:
/// - Match payload with a `players` array (and optional `match` block)
/// - Bare array of players
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum PoolPayload {
    Envelope {
        #[serde(rename = "match", default)]
        match_info: Option<MatchInfo>,
        players: Vec<PlayerRecord>,
    },
    Direct(Vec<PlayerRecord>),
}

/// A parsed pool with whatever match metadata came with it.
#[derive(Debug, Clone)]
pub struct MatchPool {
    pub match_info: Option<MatchInfo>,
    pub players: Vec<PlayerRecord>,
}

/// Parse either pool shape from JSON.
pub fn parse_pool(value: &Value) -> Result<MatchPool> {
    let payload = PoolPayload::deserialize(value).map_err(|e| FantasyError::InvalidPool {
        message: format!("could not read players: {}", e),
    })?;

    Ok(match payload {
        PoolPayload::Envelope {
            match_info,
            players,
        } => MatchPool {
            match_info,
            players,
        },
        PoolPayload::Direct(players) => MatchPool {
            match_info: None,
            players,
        },
    })
}

/// Reject pools with repeated names or non-positive credit costs.
pub fn check_pool(players: &[PlayerRecord]) -> Result<()> {
    let mut seen = HashSet::new();
    for p in players {
        let name = p.name.trim();
        if name.is_empty() {
            return Err(FantasyError::InvalidPool {
                message: "player with empty name".to_string(),
            });
        }
        if !seen.insert(name) {
            return Err(FantasyError::InvalidPool {
                message: format!("duplicate player name: {}", name),
            });
        }
        if !p.credits.is_finite() || p.credits <= 0.0 {
            return Err(FantasyError::InvalidPool {
                message: format!("{} has invalid credits {}", name, p.credits),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::types::role::Role;
    use crate::engine::types::MatchStats;
    use serde_json::json;

    fn player(name: &str, credits: f64) -> PlayerRecord {
        PlayerRecord {
            name: name.to_string(),
            team: "RCB".to_string(),
            role: Role::Batsman,
            credits,
            match_stats: MatchStats::default(),
            recent_form: vec![],
        }
    }

    #[test]
    fn test_parse_match_envelope() {
        let value = json!({
            "match": { "team1": "RCB", "team2": "PBKS", "venue": "Bengaluru" },
            "players": [
                { "name": "V Kohli", "team": "RCB", "role": "Batsman", "credits": 10.5 },
                { "name": "A Singh", "team": "PBKS", "role": "Bowler", "credits": 8.5 }
            ]
        });

        let pool = parse_pool(&value).unwrap();
        assert_eq!(pool.players.len(), 2);
        let info = pool.match_info.unwrap();
        assert_eq!(info.team1.as_deref(), Some("RCB"));
        assert_eq!(info.venue.as_deref(), Some("Bengaluru"));
        assert_eq!(info.date, None);
    }

    #[test]
    fn test_parse_bare_array() {
        let value = json!([
            { "name": "J Sharma", "team": "PBKS", "role": "wk", "credits": 7.0 }
        ]);

        let pool = parse_pool(&value).unwrap();
        assert!(pool.match_info.is_none());
        assert_eq!(pool.players[0].role, Role::WicketKeeper);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        let err = parse_pool(&json!({ "teams": [] })).unwrap_err();
        assert_eq!(err.kind(), "invalid_pool");

        let err = parse_pool(&json!([{ "name": "X", "team": "A", "role": "coach", "credits": 1 }]))
            .unwrap_err();
        assert_eq!(err.kind(), "invalid_pool");
    }

    #[test]
    fn test_check_pool_accepts_unique_names() {
        assert!(check_pool(&[player("A", 8.0), player("B", 9.0)]).is_ok());
        assert!(check_pool(&[]).is_ok());
    }

    #[test]
    fn test_check_pool_rejects_duplicates() {
        let err = check_pool(&[player("A", 8.0), player(" A ", 9.0)]).unwrap_err();
        assert!(err.to_string().contains("duplicate player name: A"));
    }

    #[test]
    fn test_check_pool_rejects_bad_credits() {
        assert!(check_pool(&[player("A", 0.0)]).is_err());
        assert!(check_pool(&[player("A", -3.0)]).is_err());
        assert!(check_pool(&[player("A", f64::INFINITY)]).is_err());
        assert!(check_pool(&[player("", 8.0)]).is_err());
    }
}
