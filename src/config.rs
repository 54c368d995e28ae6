//! Application configuration: scoring table, roster rules, cache settings.

use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::core::cache::CacheSettings;
use crate::engine::{constraints::RosterConstraints, scoring::ScoringWeights};
use crate::error::{FantasyError, Result};

pub const CONFIG_ENV_VAR: &str = "FANTASY_XI_CONFIG";

/// Everything the commands need, loaded once at startup. Sections left out
/// of the file take their defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub scoring: ScoringWeights,
    pub roster: RosterConstraints,
    pub cache: CacheSettings,
}

impl AppConfig {
    pub fn from_json_str(contents: &str) -> Result<Self> {
        serde_json::from_str(contents).map_err(|e| FantasyError::Configuration {
            message: e.to_string(),
        })
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path).map_err(|e| FantasyError::Configuration {
            message: format!("cannot read {}: {}", path.display(), e),
        })?;
        Self::from_json_str(&contents).map_err(|e| match e {
            FantasyError::Configuration { message } => FantasyError::Configuration {
                message: format!("{}: {}", path.display(), message),
            },
            other => other,
        })
    }
}

/// Path: ~/.config/fantasy-xi/config.json
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("fantasy-xi").join("config.json"))
}

/// Resolve and load the configuration.
///
/// Order: `explicit`, then `FANTASY_XI_CONFIG`, then the default path if a
/// file exists there, then built-in defaults. A named file that is missing
/// is an error; only the default location is optional.
pub fn load_config(explicit: Option<&Path>) -> Result<AppConfig> {
    if let Some(path) = explicit {
        return AppConfig::from_file(path);
    }

    if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
        if !path.trim().is_empty() {
            return AppConfig::from_file(Path::new(path.trim()));
        }
    }

    match default_config_path() {
        Some(path) if path.is_file() => AppConfig::from_file(&path),
        _ => {
            tracing::debug!("no config file found, using defaults");
            Ok(AppConfig::default())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::types::role::Role;
    use tempfile::TempDir;

    #[test]
    fn test_empty_object_is_default() {
        let config = AppConfig::from_json_str("{}").unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.roster.team_size(), 11);
        assert_eq!(config.cache.expiry_secs, 3600);
    }

    #[test]
    fn test_partial_sections() {
        let config = AppConfig::from_json_str(
            r#"{
                "scoring": { "bowling": { "wicket": 30 } },
                "cache": { "enabled": false }
            }"#,
        )
        .unwrap();

        assert_eq!(config.scoring.bowling.wicket, 30.0);
        assert_eq!(config.scoring.bowling.maiden, 12.0);
        assert!(!config.cache.enabled);
        assert_eq!(config.cache.memory_capacity, 128);
    }

    #[test]
    fn test_custom_roster() {
        let config = AppConfig::from_json_str(
            r#"{
                "roster": {
                    "team_size": 4,
                    "max_credits": 40,
                    "max_per_team": 3,
                    "role_constraints": {
                        "wicket-keeper": { "min": 1, "max": 1 },
                        "bowler": { "min": 1, "max": 2 }
                    }
                }
            }"#,
        )
        .unwrap();

        assert_eq!(config.roster.team_size(), 4);
        assert_eq!(config.roster.max_credits(), 40.0);
        assert_eq!(config.roster.min_for(Role::Bowler), 1);
        assert_eq!(config.roster.min_for(Role::Batsman), 0);
    }

    #[test]
    fn test_unsatisfiable_roster_is_rejected() {
        let err = AppConfig::from_json_str(
            r#"{
                "roster": {
                    "team_size": 3,
                    "max_credits": 40,
                    "max_per_team": 3,
                    "role_constraints": {
                        "batsman": { "min": 2, "max": 3 },
                        "bowler": { "min": 2, "max": 3 }
                    }
                }
            }"#,
        )
        .unwrap_err();
        assert_eq!(err.kind(), "configuration");
    }

    #[test]
    fn test_malformed_json_is_configuration_error() {
        let err = AppConfig::from_json_str("{ not json").unwrap_err();
        assert_eq!(err.kind(), "configuration");
    }

    #[test]
    fn test_explicit_path_wins() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{ "cache": { "expiry_secs": 5 } }"#).unwrap();

        let config = load_config(Some(&path)).unwrap();
        assert_eq!(config.cache.expiry_secs, 5);
    }

    #[test]
    fn test_missing_explicit_path_is_error() {
        let dir = TempDir::new().unwrap();
        let err = load_config(Some(&dir.path().join("absent.json"))).unwrap_err();
        assert_eq!(err.kind(), "configuration");
        assert!(err.to_string().contains("absent.json"));
    }
}
