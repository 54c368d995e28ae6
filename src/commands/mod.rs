//! Command implementations for the fantasy-xi CLI

pub mod build_team;
pub mod cache_admin;
pub mod check_team;
pub mod common;
pub mod score;
