//! Cricket playing roles.

use crate::error::FantasyError;
use serde::{de::Error, Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Playing role of a candidate player.
///
/// The derived ordering (`WicketKeeper < Batsman < AllRounder < Bowler`) is the
/// order roles are visited in when filling quotas and when printing a roster.
///
/// # Examples
///
/// ```rust
/// use fantasy_xi::Role;
///
/// let wk: Role = "Wicket-Keeper".parse().unwrap();
/// assert_eq!(wk, Role::WicketKeeper);
/// assert_eq!(wk.to_string(), "wicket-keeper");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Role {
    WicketKeeper,
    Batsman,
    AllRounder,
    Bowler,
}

impl Role {
    pub const ALL: [Role; 4] = [
        Role::WicketKeeper,
        Role::Batsman,
        Role::AllRounder,
        Role::Bowler,
    ];

    /// Short label used in tabular output.
    pub fn abbreviation(&self) -> &'static str {
        match self {
            Role::WicketKeeper => "WK",
            Role::Batsman => "BAT",
            Role::AllRounder => "AR",
            Role::Bowler => "BOWL",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Role::WicketKeeper => "wicket-keeper",
            Role::Batsman => "batsman",
            Role::AllRounder => "all-rounder",
            Role::Bowler => "bowler",
        };
        write!(f, "{}", s)
    }
}

impl FromStr for Role {
    type Err = FantasyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .trim()
            .chars()
            .filter(|c| !matches!(c, '-' | '_' | ' '))
            .collect::<String>()
            .to_lowercase();

        match normalized.as_str() {
            "wicketkeeper" | "wk" | "keeper" | "wicketkeeperbatsman" => Ok(Role::WicketKeeper),
            "batsman" | "batter" | "bat" | "batsmen" => Ok(Role::Batsman),
            "allrounder" | "ar" | "all" => Ok(Role::AllRounder),
            "bowler" | "bowl" => Ok(Role::Bowler),
            _ => Err(FantasyError::InvalidRole {
                role: s.to_string(),
            }),
        }
    }
}

impl Serialize for Role {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Role {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(D::Error::custom)
    }
}
