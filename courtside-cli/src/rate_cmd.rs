//! Rate command - update player ratings from a session's recorded scores
//!
//! ## Architecture (4-layer granularity)
//!
//! - Level 1: run() - orchestration
//! - Level 2: build_engine(), rate_players(), save_roster(), report_updates()
//! - Level 4: formatting utilities

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;

use courtside_core::{load_roster, load_scores, rate_session, Player, RatingConfig, RatingEngine, RatingUpdate, ScoreBook};

// ============================================================================
// COMMAND ARGUMENTS (Level 4 - Configuration)
// ============================================================================

#[derive(Args)]
pub struct RateArgs {
    /// Roster JSON file with current ratings
    #[arg(long, value_name = "FILE")]
    pub roster: PathBuf,

    /// Scores JSON file (list of per-court game scores)
    #[arg(long, value_name = "FILE")]
    pub scores: PathBuf,

    /// System volatility constant
    #[arg(long, default_value = "0.5")]
    pub tau: f64,

    /// Write the updated roster to this file
    #[arg(long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Output results as a text table instead of JSON
    #[arg(long)]
    pub text: bool,
}

// ============================================================================
// LEVEL 1 - ORCHESTRATION
// ============================================================================

/// Run rate command
///
/// 1. Check settings, load roster and scores
/// 2. Rate every player who played
/// 3. Save and report
pub fn run(args: RateArgs) -> Result<()> {
    let engine = build_engine(args.tau)?;
    let mut players = load_roster(&args.roster)?;
    let book = load_scores(&args.scores)?;

    tracing::info!("Rating {} players from {} court scores", players.len(), book.len());

    let before = players.clone();
    let updates = rate_players(&mut players, &book, &engine)?;

    if let Some(path) = &args.output {
        save_roster(&players, path)?;
    }
    report_updates(&before, &updates, args.text)
}

// ============================================================================
// LEVEL 2 - PHASES
// ============================================================================

/// Rating engine for the given tau, checked before any scores are read
fn build_engine(tau: f64) -> Result<RatingEngine> {
    let config = RatingConfig::default().with_tau(tau);
    config.validate().context("Invalid rating settings")?;
    Ok(RatingEngine::new(config))
}

/// Compute updates and write them onto the roster
fn rate_players(players: &mut [Player], book: &ScoreBook, engine: &RatingEngine) -> Result<Vec<RatingUpdate>> {
    let updates = rate_session(players, book.scores(), engine).context("Failed to rate session")?;

    for update in &updates {
        if let Some(player) = players.iter_mut().find(|p| p.id == update.player) {
            update.apply_to(player);
        }
    }
    Ok(updates)
}

fn save_roster(players: &[Player], path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(players)?;
    std::fs::write(path, json)
        .with_context(|| format!("Failed to write roster: {}", path.display()))?;
    tracing::info!("Saved updated roster to {}", path.display());
    Ok(())
}

fn report_updates(before: &[Player], updates: &[RatingUpdate], text: bool) -> Result<()> {
    if text {
        print_text_updates(before, updates);
    } else {
        println!("{}", serde_json::to_string_pretty(updates)?);
    }
    Ok(())
}

// ============================================================================
// LEVEL 4 - UTILITIES
// ============================================================================

/// One table row: name, old -> new rating, confidence, games
fn format_update(before: Option<&Player>, update: &RatingUpdate) -> String {
    let old_rating = before.map_or(update.rating, |p| p.rating);
    format!(
        "{:<16} {:>5.2} -> {:>5.2} ({:+.2})  conf {:.2}  vol {:.2}  games {}",
        update.player.to_string(),
        old_rating,
        update.rating,
        update.rating - old_rating,
        update.confidence,
        update.volatility,
        update.total_games
    )
}

fn print_text_updates(before: &[Player], updates: &[RatingUpdate]) {
    println!("\n=== Rating Updates ===");
    for update in updates {
        let old = before.iter().find(|p| p.id == update.player);
        println!("{}", format_update(old, update));
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use courtside_core::{GameScore, PlayerId};

    fn four_players() -> Vec<Player> {
        ["ana", "ben", "cat", "dan"].iter().map(|n| Player::guest(*n)).collect()
    }

    #[test]
    fn test_rate_players_applies_updates() {
        let mut players = four_players();
        let mut book = ScoreBook::new();
        book.submit(GameScore::new(
            1,
            1,
            vec![PlayerId::from("ana"), PlayerId::from("ben")],
            vec![PlayerId::from("cat"), PlayerId::from("dan")],
            vec![(11, 7)],
        ))
        .unwrap();

        let updates = rate_players(&mut players, &book, &RatingEngine::default()).unwrap();
        assert_eq!(updates.len(), 4);
        assert!(players[0].rating > 4.0);
        assert!(players[2].rating < 4.0);
        assert!(players.iter().all(|p| p.total_games == 1));
    }

    #[test]
    fn test_rate_players_rejects_unknown_player() {
        let mut players = four_players();
        let mut book = ScoreBook::new();
        book.submit(GameScore::new(
            1,
            1,
            vec![PlayerId::from("ana"), PlayerId::from("zed")],
            vec![PlayerId::from("cat"), PlayerId::from("dan")],
            vec![(11, 7)],
        ))
        .unwrap();

        assert!(rate_players(&mut players, &book, &RatingEngine::default()).is_err());
        assert_eq!(players, four_players());
    }

    #[test]
    fn test_build_engine_checks_tau() {
        assert_eq!(build_engine(0.3).unwrap().config().tau, 0.3);
        assert!(build_engine(0.0).is_err());
        assert!(build_engine(-1.0).is_err());
    }

    #[test]
    fn test_format_update() {
        let before = Player::guest("ana");
        let update = RatingUpdate {
            player: PlayerId::from("ana"),
            rating: 4.5,
            confidence: 0.1,
            volatility: 0.06,
            total_games: 1,
        };
        let line = format_update(Some(&before), &update);
        assert!(line.starts_with("ana"));
        assert!(line.contains("4.00 ->  4.50 (+0.50)"));
        assert!(line.ends_with("games 1"));
    }
}
