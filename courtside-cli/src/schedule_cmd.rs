//! Schedule commands - generate session schedules from a roster
//!
//! ## Architecture (4-layer granularity)
//!
//! - Level 1: run(), run_king() - orchestration
//! - Level 2: build_config(), save_schedule(), report_schedule()
//! - Level 3: format_rotation()
//! - Level 4: formatting utilities

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;

use courtside_core::{load_roster, roster_ids, Court, Rotation, Schedule};
use courtside_rotation::{generate_king_of_the_court, generate_schedule, PairingStrategy, ScheduleConfig};

// ============================================================================
// COMMAND ARGUMENTS (Level 4 - Configuration)
// ============================================================================

#[derive(Args)]
pub struct ScheduleArgs {
    /// Roster JSON file (names and/or player records)
    #[arg(long, value_name = "FILE")]
    pub roster: PathBuf,

    /// Number of rotations to generate
    #[arg(long, default_value = "6")]
    pub rounds: usize,

    /// Courts available (default: as many as the roster fills)
    #[arg(long)]
    pub courts: Option<usize>,

    /// Minimize repeated partnerships instead of pairing randomly
    #[arg(long)]
    pub optimal: bool,

    /// Write the schedule JSON to this file
    #[arg(long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Output results as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args)]
pub struct KingArgs {
    /// Roster JSON file (names and/or player records)
    #[arg(long, value_name = "FILE")]
    pub roster: PathBuf,

    /// Courts available (default: as many as the roster fills)
    #[arg(long)]
    pub courts: Option<usize>,

    /// Write the schedule JSON to this file
    #[arg(long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Output results as JSON
    #[arg(long)]
    pub json: bool,
}

// ============================================================================
// LEVEL 1 - ORCHESTRATION
// ============================================================================

/// Run schedule command
///
/// 1. Load the roster
/// 2. Generate the rotations
/// 3. Save and report
pub fn run(args: ScheduleArgs, seed: Option<u64>) -> Result<()> {
    let players = load_roster(&args.roster)?;
    let config = build_config(&args, seed);

    tracing::info!(
        "Scheduling {} players: {} rounds, {:?} pairing",
        players.len(),
        config.rounds,
        config.strategy
    );

    let schedule = generate_schedule(&roster_ids(&players), &config)
        .with_context(|| format!("Failed to schedule roster: {}", args.roster.display()))?;

    if let Some(path) = &args.output {
        save_schedule(&schedule, path)?;
    }
    report_schedule(&schedule, args.json)
}

/// Run king-of-the-court command
pub fn run_king(args: KingArgs, seed: Option<u64>) -> Result<()> {
    let players = load_roster(&args.roster)?;

    let mut config = ScheduleConfig::round_robin(1);
    config.courts = args.courts;
    config.seed = seed;

    let schedule = generate_king_of_the_court(&roster_ids(&players), &config)
        .with_context(|| format!("Failed to schedule roster: {}", args.roster.display()))?;

    if let Some(path) = &args.output {
        save_schedule(&schedule, path)?;
    }
    report_schedule(&schedule, args.json)
}

// ============================================================================
// LEVEL 2 - PHASES
// ============================================================================

/// Map command arguments onto a schedule configuration
fn build_config(args: &ScheduleArgs, seed: Option<u64>) -> ScheduleConfig {
    let strategy = if args.optimal {
        PairingStrategy::Optimal
    } else {
        PairingStrategy::Random
    };

    ScheduleConfig {
        courts: args.courts,
        rounds: args.rounds,
        strategy,
        seed,
        ..Default::default()
    }
}

fn save_schedule(schedule: &Schedule, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(schedule)?;
    std::fs::write(path, json)
        .with_context(|| format!("Failed to write schedule: {}", path.display()))?;
    tracing::info!("Saved schedule to {}", path.display());
    Ok(())
}

fn report_schedule(schedule: &Schedule, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(schedule)?);
    } else {
        print_text_schedule(schedule);
    }
    Ok(())
}

// ============================================================================
// LEVEL 3 - STEPS
// ============================================================================

/// Text lines for one rotation: a header, one line per court, then resters
fn format_rotation(rotation: &Rotation) -> Vec<String> {
    let mut lines = vec![format!("=== Rotation {} ===", rotation.number)];
    for (i, court) in rotation.courts.iter().enumerate() {
        lines.push(format!("  Court {}: {}", i + 1, format_court(court)));
    }
    if !rotation.resting.is_empty() {
        lines.push(format!("  Resting: {}", join_names(rotation.resting.iter())));
    }
    lines
}

// ============================================================================
// LEVEL 4 - UTILITIES
// ============================================================================

fn format_court(court: &Court) -> String {
    format!(
        "{} & {} vs {} & {}",
        court.team1[0], court.team1[1], court.team2[0], court.team2[1]
    )
}

fn join_names<'a, T: std::fmt::Display + 'a>(names: impl Iterator<Item = &'a T>) -> String {
    names.map(|n| n.to_string()).collect::<Vec<_>>().join(", ")
}

fn print_text_schedule(schedule: &Schedule) {
    for rotation in &schedule.rotations {
        for line in format_rotation(rotation) {
            println!("{}", line);
        }
    }

    let rests = schedule.rest_counts();
    if rests.values().any(|&n| n > 0) {
        println!("\nRests per player:");
        for (player, count) in &rests {
            println!("  {:<16} {}", player.to_string(), count);
        }
    }
    println!(
        "\nMost repeated partnership: {} rounds",
        schedule.max_partnership_repeats()
    );
}

// ============================================================================
// TESTS
// ============================================================================
