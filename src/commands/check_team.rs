//! Check-team command implementation
//!
//! Resolves a proposed XI (typically a language model's reply) against the
//! pool and reports either the resolved roster or every rule it breaks.

use chrono::Utc;
use std::{fs, path::PathBuf};

use crate::{
    engine::{parse_proposal, resolve_proposal, Roster},
    Result,
};

use super::common::{format_roster, CommandContext};

#[derive(Debug)]
pub struct CheckTeamParams {
    pub pool: PathBuf,
    pub refresh: bool,
    pub proposal: PathBuf,
    pub as_json: bool,
}

/// Resolve the proposal file against the pool file.
pub fn check_team(ctx: &CommandContext, params: &CheckTeamParams) -> Result<Roster> {
    let text = fs::read_to_string(&params.proposal)?;
    let proposal = parse_proposal(&text)?;
    let (pool, _) = ctx.load_pool(&params.pool, params.refresh)?;

    resolve_proposal(
        &proposal,
        &pool.players,
        &ctx.config.scoring,
        &ctx.config.roster,
        Utc::now(),
    )
}

/// Handle the check-team command
pub fn handle_check_team(ctx: &CommandContext, params: CheckTeamParams) -> Result<()> {
    let roster = check_team(ctx, &params)?;

    if params.as_json {
        println!("{}", serde_json::to_string_pretty(&roster)?); // tarpaulin::skip
        return Ok(());
    }

    println!("✓ Proposed team is valid");
    println!();
    println!(
        "{}",
        format_roster(&roster, ctx.config.roster.max_credits())
    ); // tarpaulin::skip

    Ok(())
}
