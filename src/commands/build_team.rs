//! Build-team command implementation

use std::path::PathBuf;

use crate::{
    core::CacheStatus,
    engine::{select_team, MatchPool, Roster, RosterConstraints},
    Result,
};

use super::common::{describe_status, format_match_info, format_roster, CommandContext};

/// Options for [`handle_build_team`].
#[derive(Debug)]
pub struct BuildTeamParams {
    pub pool: PathBuf,
    pub refresh: bool,
    pub max_credits: Option<f64>,
    pub max_per_team: Option<usize>,
    pub as_json: bool,
}

/// A selected roster plus what it was selected from.
#[derive(Debug)]
pub struct TeamBuild {
    pub roster: Roster,
    pub pool: MatchPool,
    pub status: CacheStatus,
    pub constraints: RosterConstraints,
}

/// Configured roster rules with any command-line overrides applied.
pub fn effective_constraints(
    ctx: &CommandContext,
    params: &BuildTeamParams,
) -> Result<RosterConstraints> {
    let mut constraints = ctx.config.roster.clone();
    if let Some(max_credits) = params.max_credits {
        constraints = constraints.with_max_credits(max_credits)?;
    }
    if let Some(max_per_team) = params.max_per_team {
        constraints = constraints.with_max_per_team(max_per_team)?;
    }
    Ok(constraints)
}

/// Select a roster from the pool file.
pub fn build_team(ctx: &CommandContext, params: &BuildTeamParams) -> Result<TeamBuild> {
    let constraints = effective_constraints(ctx, params)?;
    let (pool, status) = ctx.load_pool(&params.pool, params.refresh)?;
    let roster = select_team(&pool.players, &ctx.config.scoring, &constraints)?;

    Ok(TeamBuild {
        roster,
        pool,
        status,
        constraints,
    })
}

/// Handle the build-team command
pub fn handle_build_team(ctx: &CommandContext, params: BuildTeamParams) -> Result<()> {
    let build = build_team(ctx, &params)?;

    if params.as_json {
        println!("{}", serde_json::to_string_pretty(&build.roster)?); // tarpaulin::skip
        return Ok(());
    }

    if let Some(line) = build.pool.match_info.as_ref().and_then(format_match_info) {
        println!("{}", line);
    }
    println!(
        "Pool: {} players ({})",
        build.pool.players.len(),
        describe_status(build.status)
    );
    println!();
    println!(
        "{}",
        format_roster(&build.roster, build.constraints.max_credits())
    ); // tarpaulin::skip

    Ok(())
}
