//! Headless match runner
//!
//! Plays greedy AI against greedy AI and prints the match as JSON or text.

use battle_core::prelude::*;
use battle_core::ConfigError as ConstantsError;
use clap::Parser;
use serde::Serialize;
use shop_core::{ConfigError as CatalogError, Shop, UnitCatalog};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use thiserror::Error;

/// Headless match runner - greedy AI vs greedy AI
#[derive(Parser, Debug)]
#[command(name = "sim_runner")]
#[command(about = "Simulate an auto-battler match between two greedy shoppers")]
struct Args {
    /// Random seed for deterministic runs
    #[arg(long)]
    seed: Option<u64>,

    /// Override the number of rounds
    #[arg(long)]
    rounds: Option<u32>,

    /// Stop once a player has this many wins
    #[arg(long)]
    win_threshold: Option<u32>,

    /// Game constants TOML file
    #[arg(long)]
    constants: Option<PathBuf>,

    /// Directory of unit TOML files (defaults to the built-in roster)
    #[arg(long)]
    catalog: Option<PathBuf>,

    /// Output format: json or text
    #[arg(long, default_value = "json")]
    format: String,

    /// Include the full battle logs
    #[arg(long, short = 'v')]
    verbose: bool,
}

#[derive(Debug, Error)]
enum RunnerError {
    #[error("constants: {0}")]
    Constants(#[from] ConstantsError),
    #[error("catalog: {0}")]
    Catalog(#[from] CatalogError),
    #[error("output: {0}")]
    Json(#[from] serde_json::Error),
    #[error("catalog directory not found: {0}")]
    MissingCatalog(PathBuf),
    #[error("no units found in catalog directory {0}")]
    EmptyCatalog(PathBuf),
    #[error("unknown output format '{0}' (expected json or text)")]
    Format(String),
}

/// JSON output structure
#[derive(Serialize)]
struct MatchOutput<'a> {
    seed: u64,
    result: &'a MatchResult,
    #[serde(skip_serializing_if = "Option::is_none")]
    rounds: Option<&'a [MatchRound]>,
}

fn main() -> ExitCode {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<(), RunnerError> {
    let mut constants = match &args.constants {
        Some(path) => GameConstants::load_from_path(path)?,
        None => GameConstants::default(),
    };
    if let Some(rounds) = args.rounds {
        constants.match_rules.rounds = rounds;
    }
    if args.win_threshold.is_some() {
        constants.match_rules.win_threshold = args.win_threshold;
    }
    constants.validate()?;

    let catalog = load_catalog(args.catalog.as_deref())?;
    tracing::info!(units = catalog.len(), "catalog loaded");
    let merge = constants.merge.clone();

    let seed = args.seed.unwrap_or_else(rand::random);
    let mut rng = seeded_rng(seed);
    let mut game = Match::with_names(Shop::new(catalog), constants, "Player 1", "AI");
    let (rounds, result) = game.play(
        &mut GreedyBuyer::new(merge.clone()),
        &mut GreedyBuyer::new(merge),
        &mut rng,
    );

    match args.format.as_str() {
        "json" => {
            let output = MatchOutput {
                seed,
                result: &result,
                rounds: args.verbose.then_some(rounds.as_slice()),
            };
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        "text" => print!("{}", render_text(&game, seed, &rounds, &result, args.verbose)),
        other => return Err(RunnerError::Format(other.to_string())),
    }
    Ok(())
}

/// Built-in roster, or every unit file under `dir`. A match needs units to
/// shop from, so a missing or empty directory is an error here.
fn load_catalog(dir: Option<&Path>) -> Result<UnitCatalog, RunnerError> {
    let Some(dir) = dir else {
        return Ok(UnitCatalog::builtin()?);
    };
    if !dir.is_dir() {
        return Err(RunnerError::MissingCatalog(dir.to_path_buf()));
    }
    let catalog = UnitCatalog::load(dir)?;
    if catalog.is_empty() {
        return Err(RunnerError::EmptyCatalog(dir.to_path_buf()));
    }
    Ok(catalog)
}

fn render_text(
    game: &Match,
    seed: u64,
    rounds: &[MatchRound],
    result: &MatchResult,
    verbose: bool,
) -> String {
    let mut out = format!("Seed {}\n", seed);
    for round in rounds {
        out.push_str(&format!("\n===== Round {} =====\n", round.round));
        for (side, phase) in [Side::Team1, Side::Team2].iter().zip(round.shop.iter()) {
            let bought: Vec<&str> = phase.bought().map(|p| p.unit.as_str()).collect();
            out.push_str(&format!(
                "{} +{} gold, bought [{}]\n",
                game.roster(*side).name(),
                phase.income.total(),
                bought.join(", ")
            ));
        }

        let report = &round.battle;
        if verbose {
            for line in report.events().filter_map(|e| describe_event(report, e)) {
                out.push_str(&format!("  {}\n", line));
            }
        }
        out.push_str(&format!(
            "Battle: {} after {} rounds ({} - {} survivors)\n",
            describe_outcome(game, report.outcome),
            report.rounds,
            report.survivors(Side::Team1),
            report.survivors(Side::Team2)
        ));
    }

    out.push_str(&format!(
        "\nFinal: {} {} - {} {} ({} draws)\n",
        game.roster(Side::Team1).name(),
        result.wins_for(Side::Team1),
        result.wins_for(Side::Team2),
        game.roster(Side::Team2).name(),
        result.draws
    ));
    out.push_str(&match result.winner {
        Some(side) => format!("Winner: {}\n", game.roster(side).name()),
        None => "Match drawn\n".to_string(),
    });
    for side in [Side::Team1, Side::Team2] {
        let roster = game.roster(side);
        out.push_str(&format!("{} reserve:\n", roster.name()));
        for unit in roster.reserve() {
            out.push_str(&format!("  {}\n", unit));
        }
    }
    out
}

fn describe_outcome(game: &Match, outcome: BattleState) -> String {
    match outcome.winner() {
        Some(side) => format!("{} wins", game.roster(side).name()),
        None => "draw".to_string(),
    }
}

fn label(report: &BattleReport, unit: UnitRef) -> String {
    report
        .unit(unit)
        .map(|u| format!("{}{}", u.element.symbol(), u.label()))
        .unwrap_or_else(|| format!("{}#{}", unit.side, unit.slot))
}

fn describe_event(report: &BattleReport, event: &BattleEvent) -> Option<String> {
    let line = match event {
        BattleEvent::SynergyApplied { side, synergies } => {
            if synergies.is_empty() {
                return None;
            }
            let names: Vec<String> = synergies.iter().map(|s| s.to_string()).collect();
            format!("{}: {}", side, names.join(", "))
        }
        BattleEvent::RoundStart { round } => format!("-- round {} --", round),
        BattleEvent::SkillCast { actor, skill, .. } => {
            format!("{} casts {}", label(report, *actor), skill)
        }
        BattleEvent::Damage {
            actor,
            target,
            damage,
            effectiveness,
            remaining_hp,
        } => {
            let tag = match effectiveness {
                Effectiveness::Effective => " EFFECTIVE",
                Effectiveness::Resisted => " RESIST",
                Effectiveness::Normal => "",
            };
            format!(
                "{} hits {} for {}{} (HP {})",
                label(report, *actor),
                label(report, *target),
                damage,
                tag,
                remaining_hp
            )
        }
        BattleEvent::Restore {
            actor,
            target,
            amount,
            hp,
        } => format!(
            "{} restores {} HP to {} (HP {})",
            label(report, *actor),
            amount,
            label(report, *target),
            hp
        ),
        BattleEvent::Defeated { unit } => format!("{} is defeated", label(report, *unit)),
        BattleEvent::RoundCapReached { round } => format!("round cap reached at {}", round),
        BattleEvent::BattleEnd { .. } => return None,
    };
    Some(line)
}
