//! Entry point: parse CLI and dispatch to command handlers.

use clap::Parser;
use fantasy_xi::{
    cli::{CacheCmd, Commands, FantasyXi},
    commands::{
        build_team::{handle_build_team, BuildTeamParams},
        cache_admin::{handle_cache_clear, handle_cache_stats},
        check_team::{handle_check_team, CheckTeamParams},
        common::CommandContext,
        score::{handle_score, ScoreParams},
    },
    Result,
};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();
    if tracing::subscriber::set_global_default(subscriber).is_err() {
        eprintln!("warning: logging already initialized");
    }
}

fn run(app: FantasyXi) -> Result<()> {
    let ctx = CommandContext::new(app.config.as_deref())?;

    match app.command {
        Commands::BuildTeam {
            pool,
            max_credits,
            max_per_team,
            json,
        } => handle_build_team(
            &ctx,
            BuildTeamParams {
                pool: pool.pool,
                refresh: pool.refresh,
                max_credits,
                max_per_team,
                as_json: json,
            },
        )?,

        Commands::Score { pool, roles, json } => handle_score(
            &ctx,
            ScoreParams {
                pool: pool.pool,
                refresh: pool.refresh,
                roles,
                as_json: json,
            },
        )?,

        Commands::CheckTeam {
            pool,
            proposal,
            json,
        } => handle_check_team(
            &ctx,
            CheckTeamParams {
                pool: pool.pool,
                refresh: pool.refresh,
                proposal,
                as_json: json,
            },
        )?,

        Commands::Cache { cmd } => match cmd {
            CacheCmd::Stats { json } => {
                handle_cache_stats(&ctx, json)?;
            }
            CacheCmd::Clear { key, pool } => {
                handle_cache_clear(&ctx, key.as_deref(), pool.as_deref())
            }
        },
    }

    Ok(())
}

/// Run the CLI.
fn main() {
    init_logging();
    let app = FantasyXi::parse();

    if let Err(e) = run(app) {
        eprintln!("error[{}]: {}", e.kind(), e);
        std::process::exit(1);
    }
}
