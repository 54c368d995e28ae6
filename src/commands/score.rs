//! Score command implementation

use serde::Serialize;
use std::path::PathBuf;

use crate::{
    cli::types::role::Role,
    engine::{check_pool, rank_players},
    Result,
};

use super::common::CommandContext;

#[derive(Debug)]
pub struct ScoreParams {
    pub pool: PathBuf,
    pub refresh: bool,
    pub roles: Option<Vec<Role>>,
    pub as_json: bool,
}

/// One line of the score table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayerScore {
    pub rank: usize,
    pub name: String,
    pub team: String,
    pub role: Role,
    pub credits: f64,
    pub score: f64,
    /// Points per credit
    pub value: f64,
}

/// Score the pool in selection order, optionally keeping only some roles.
/// Ranks are positions in the full ranking, so they survive filtering.
pub fn score_pool(ctx: &CommandContext, params: &ScoreParams) -> Result<Vec<PlayerScore>> {
    let (pool, _) = ctx.load_pool(&params.pool, params.refresh)?;
    check_pool(&pool.players)?;

    let scores = rank_players(&pool.players, &ctx.config.scoring)
        .into_iter()
        .enumerate()
        .filter(|(_, r)| {
            params
                .roles
                .as_ref()
                .map_or(true, |roles| roles.contains(&r.player.role))
        })
        .map(|(i, r)| PlayerScore {
            rank: i + 1,
            name: r.player.name.clone(),
            team: r.player.team.clone(),
            role: r.player.role,
            credits: r.player.credits,
            score: r.score,
            value: r.score / r.player.credits,
        })
        .collect();

    Ok(scores)
}

/// Handle the score command
pub fn handle_score(ctx: &CommandContext, params: ScoreParams) -> Result<()> {
    let scores = score_pool(ctx, &params)?;

    if params.as_json {
        println!("{}", serde_json::to_string_pretty(&scores)?); // tarpaulin::skip
        return Ok(());
    }

    if scores.is_empty() {
        println!("No players match the given filters.");
        return Ok(());
    }

    for s in &scores {
        println!(
            "{:>3}. {:<28} {:<6} {:<4} {:>5.1} cr  {:>6.1} pts  {:>5.2} pts/cr",
            s.rank,
            s.name,
            s.team,
            s.role.abbreviation(),
            s.credits,
            s.score,
            s.value
        ); // tarpaulin::skip
    }

    Ok(())
}
