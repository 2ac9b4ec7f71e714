//! Swap command - exchange two players in a saved rotation or schedule

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::Args;
use serde::Deserialize;

use courtside_core::{PlayerId, Rotation, Schedule};
use courtside_rotation::{swap_in_schedule, swap_players};

#[derive(Args)]
pub struct SwapArgs {
    /// Rotation or schedule JSON file
    #[arg(long, value_name = "FILE")]
    pub rotation: PathBuf,

    /// Rotation number to edit when the file holds a whole schedule
    #[arg(long)]
    pub round: Option<usize>,

    /// Player to move
    #[arg(long)]
    pub selected: String,

    /// Player to exchange with
    #[arg(long)]
    pub target: String,

    /// Write the result back to this file instead of stdout
    #[arg(long, value_name = "FILE")]
    pub output: Option<PathBuf>,
}

/// What a swap file may hold
#[derive(Clone, Debug, Deserialize)]
#[serde(untagged)]
pub enum SwapDocument {
    Schedule(Schedule),
    Rotation(Rotation),
}

pub fn run(args: SwapArgs) -> Result<()> {
    let document = load_rotation(&args.rotation)?;
    let selected = PlayerId::new(args.selected.as_str());
    let target = PlayerId::new(args.target.as_str());

    let json = apply_swap(document, args.round, &selected, &target)?;

    match &args.output {
        Some(path) => {
            std::fs::write(path, json)
                .with_context(|| format!("Failed to write rotation: {}", path.display()))?;
            tracing::info!("Swapped {} and {}; saved to {}", selected, target, path.display());
        }
        None => println!("{}", json),
    }
    Ok(())
}

/// Load a rotation, or a schedule of rotations, from a JSON file
pub fn load_rotation(path: &Path) -> Result<SwapDocument> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read rotation: {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse rotation: {}", path.display()))
}

/// Swap and serialize the updated document
fn apply_swap(
    document: SwapDocument,
    round: Option<usize>,
    selected: &PlayerId,
    target: &PlayerId,
) -> Result<String> {
    let json = match (document, round) {
        (SwapDocument::Rotation(rotation), _) => {
            let swapped = swap_players(&rotation, selected, target)?;
            serde_json::to_string_pretty(&swapped)?
        }
        (SwapDocument::Schedule(schedule), Some(number)) => {
            let swapped = swap_in_schedule(&schedule, number, selected, target)?;
            serde_json::to_string_pretty(&swapped)?
        }
        (SwapDocument::Schedule(_), None) => {
            bail!("file holds a whole schedule; pass --round to pick a rotation")
        }
    };
    Ok(json)
}

#[cfg(test)]
mod tests {
    use super::*;
    use courtside_core::{Court, ScheduleKind};

    fn rotation() -> Rotation {
        Rotation::new(
            1,
            vec![Court::from_four(["ana", "ben", "cat", "dan"].map(PlayerId::from))],
            vec![PlayerId::from("eve")],
        )
    }

    #[test]
    fn test_document_parses_rotation_and_schedule() {
        let json = serde_json::to_string(&rotation()).unwrap();
        assert!(matches!(serde_json::from_str::<SwapDocument>(&json).unwrap(), SwapDocument::Rotation(_)));

        let schedule = Schedule::new(ScheduleKind::RoundRobin, vec![rotation()]);
        let json = serde_json::to_string(&schedule).unwrap();
        assert!(matches!(serde_json::from_str::<SwapDocument>(&json).unwrap(), SwapDocument::Schedule(_)));
    }

    #[test]
    fn test_apply_swap_to_rotation() {
        let json = apply_swap(
            SwapDocument::Rotation(rotation()),
            None,
            &PlayerId::from("eve"),
            &PlayerId::from("ana"),
        )
        .unwrap();

        let swapped: Rotation = serde_json::from_str(&json).unwrap();
        assert_eq!(swapped.courts[0].team1[0], PlayerId::from("eve"));
        assert_eq!(swapped.resting, vec![PlayerId::from("ana")]);
        assert!(swapped.manually_modified);
    }

    #[test]
    fn test_apply_swap_schedule_needs_round() {
        let schedule = Schedule::new(ScheduleKind::RoundRobin, vec![rotation()]);
        let document = SwapDocument::Schedule(schedule);
        let (a, b) = (PlayerId::from("eve"), PlayerId::from("ana"));

        assert!(apply_swap(document.clone(), None, &a, &b).is_err());
        let json = apply_swap(document, Some(1), &a, &b).unwrap();
        let swapped: Schedule = serde_json::from_str(&json).unwrap();
        assert!(swapped.rotations[0].manually_modified);
    }

    #[test]
    fn test_apply_swap_reports_rejection() {
        let err = apply_swap(
            SwapDocument::Rotation(rotation()),
            None,
            &PlayerId::from("ana"),
            &PlayerId::from("ana"),
        )
        .unwrap_err();
        assert!(err.to_string().contains("themselves"));
    }
}
