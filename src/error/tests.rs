//! Unit tests for error handling

use super::*;
use std::io;

#[cfg(test)]
mod conversion_tests {
    use super::*;

    #[test]
    fn test_json_error_conversion() {
        let json_error = serde_json::from_str::<serde_json::Value>("invalid json").unwrap_err();
        let error = FantasyError::from(json_error);

        match error {
            FantasyError::Json(_) => (),
            _ => panic!("Expected Json error variant"),
        }
    }

    #[test]
    fn test_io_error_conversion() {
        let io_error = io::Error::new(io::ErrorKind::NotFound, "File not found");
        let error = FantasyError::from(io_error);

        match error {
            FantasyError::Io(_) => (),
            _ => panic!("Expected Io error variant"),
        }
    }

    #[test]
    fn test_question_mark_converts() {
        fn read() -> Result<String> {
            Ok(std::fs::read_to_string("/definitely/not/here.json")?)
        }
        assert_eq!(read().unwrap_err().kind(), "io");
    }
}

#[cfg(test)]
mod display_tests {
    use super::*;

    #[test]
    fn test_insufficient_pool_for_role() {
        let error = FantasyError::InsufficientPool {
            role: Some(Role::WicketKeeper),
            required: 1,
            available: 0,
        };
        assert_eq!(
            error.to_string(),
            "Insufficient pool: need at least 1 wicket-keeper candidate(s), pool has 0"
        );
    }

    #[test]
    fn test_insufficient_pool_overall() {
        let error = FantasyError::InsufficientPool {
            role: None,
            required: 11,
            available: 9,
        };
        assert_eq!(
            error.to_string(),
            "Insufficient pool: need at least 11 players, pool has 9"
        );
    }

    #[test]
    fn test_constraint_violations_are_joined() {
        let error = FantasyError::ConstraintViolations(vec![
            Violation::TeamSize {
                expected: 11,
                actual: 10,
            },
            Violation::RoleMin {
                role: Role::Bowler,
                count: 2,
                min: 3,
            },
        ]);
        let message = error.to_string();

        assert!(message.starts_with("Roster breaks 2 constraint(s): "));
        assert_eq!(message.matches("; ").count(), 1);
    }

    #[test]
    fn test_simple_messages() {
        let error = FantasyError::PlayerNotFound {
            name: "Ghost".to_string(),
        };
        assert_eq!(error.to_string(), "Player not found in pool: Ghost");

        let error = FantasyError::InvalidRole {
            role: "goalkeeper".to_string(),
        };
        assert_eq!(error.to_string(), "Invalid player role: goalkeeper");
    }
}

#[cfg(test)]
mod report_tests {
    use super::*;

    #[test]
    fn test_kinds_are_distinct() {
        let errors = [
            FantasyError::Configuration {
                message: String::new(),
            },
            FantasyError::InsufficientPool {
                role: None,
                required: 1,
                available: 0,
            },
            FantasyError::NoFeasibleRoster {
                message: String::new(),
            },
            FantasyError::InvalidPool {
                message: String::new(),
            },
            FantasyError::InvalidRole {
                role: String::new(),
            },
            FantasyError::PlayerNotFound {
                name: String::new(),
            },
            FantasyError::InvalidProposal {
                message: String::new(),
            },
            FantasyError::ConstraintViolations(Vec::new()),
            FantasyError::Io(io::Error::new(io::ErrorKind::Other, "x")),
        ];

        let mut kinds: Vec<&str> = errors.iter().map(|e| e.kind()).collect();
        kinds.sort();
        kinds.dedup();
        assert_eq!(kinds.len(), errors.len());
    }

    #[test]
    fn test_report_serializes() {
        let report = FantasyError::NoFeasibleRoster {
            message: "budget too small".to_string(),
        }
        .report();

        assert_eq!(report.kind, "no_feasible_roster");
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["kind"], "no_feasible_roster");
        assert_eq!(json["message"], "No feasible roster: budget too small");
    }
}
