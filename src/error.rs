//! Error types for the fantasy XI engine

use serde::Serialize;
use thiserror::Error;

use crate::cli::types::role::Role;
use crate::engine::constraints::Violation;

#[cfg(test)]
mod tests;

pub type Result<T> = std::result::Result<T, FantasyError>;

#[derive(Error, Debug)]
pub enum FantasyError {
    #[error("Invalid configuration: {message}")]
    Configuration { message: String },

    #[error("{}", insufficient_pool_message(.role, .required, .available))]
    InsufficientPool {
        role: Option<Role>,
        required: usize,
        available: usize,
    },

    #[error("No feasible roster: {message}")]
    NoFeasibleRoster { message: String },

    #[error("Invalid player pool: {message}")]
    InvalidPool { message: String },

    #[error("Invalid player role: {role}")]
    InvalidRole { role: String },

    #[error("Player not found in pool: {name}")]
    PlayerNotFound { name: String },

    #[error("Invalid team proposal: {message}")]
    InvalidProposal { message: String },

    #[error("Roster breaks {} constraint(s): {}", .0.len(), join_violations(.0))]
    ConstraintViolations(Vec<Violation>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parsing failed: {0}")]
    Json(#[from] serde_json::Error),
}

fn insufficient_pool_message(role: &Option<Role>, required: &usize, available: &usize) -> String {
    match role {
        Some(role) => format!(
            "Insufficient pool: need at least {} {} candidate(s), pool has {}",
            required, role, available
        ),
        None => format!(
            "Insufficient pool: need at least {} players, pool has {}",
            required, available
        ),
    }
}

fn join_violations(violations: &[Violation]) -> String {
    violations
        .iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

impl FantasyError {
    /// Stable identifier for the failure class, used in structured reports.
    pub fn kind(&self) -> &'static str {
        match self {
            FantasyError::Configuration { .. } => "configuration",
            FantasyError::InsufficientPool { .. } => "insufficient_pool",
            FantasyError::NoFeasibleRoster { .. } => "no_feasible_roster",
            FantasyError::InvalidPool { .. } => "invalid_pool",
            FantasyError::InvalidRole { .. } => "invalid_role",
            FantasyError::PlayerNotFound { .. } => "player_not_found",
            FantasyError::InvalidProposal { .. } => "invalid_proposal",
            FantasyError::ConstraintViolations(_) => "constraint_violations",
            FantasyError::Io(_) => "io",
            FantasyError::Json(_) => "json",
        }
    }

    pub fn report(&self) -> ErrorReport {
        ErrorReport {
            kind: self.kind(),
            message: self.to_string(),
        }
    }
}

/// Structured, serializable form of a [`FantasyError`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorReport {
    pub kind: &'static str,
    pub message: String,
}
