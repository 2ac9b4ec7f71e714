//! Manual swaps - exchange two players' slots after generation
//!
//! Level 2 - Phases

use courtside_core::{PlayerId, Result, Rotation, Schedule, Slot, SwapRejection, TeamSide};

/// Where `player` sits in `rotation`, scanning courts then resters
pub fn locate(rotation: &Rotation, player: &PlayerId) -> Option<Slot> {
    for (court, c) in rotation.courts.iter().enumerate() {
        for team in [TeamSide::Team1, TeamSide::Team2] {
            if let Some(seat) = c.team(team).iter().position(|p| p == player) {
                return Some(Slot::OnCourt { court, team, seat });
            }
        }
    }
    rotation
        .resting
        .iter()
        .position(|p| p == player)
        .map(|index| Slot::Resting { index })
}

/// Exchange the slots of `selected` and `target`.
///
/// The input is left untouched; on success the returned copy differs only in
/// the two slots and is flagged as manually modified.
pub fn swap_players(rotation: &Rotation, selected: &PlayerId, target: &PlayerId) -> Result<Rotation> {
    if selected == target {
        return Err(SwapRejection::SelfSwap.into());
    }
    let from = locate(rotation, selected).ok_or_else(|| SwapRejection::SelectedNotFound(selected.clone()))?;
    let to = locate(rotation, target).ok_or_else(|| SwapRejection::TargetNotFound(target.clone()))?;

    if same_slot(from, to) {
        return Err(SwapRejection::SameSlot.into());
    }

    let mut swapped = rotation.clone();
    *seat_mut(&mut swapped, from) = target.clone();
    *seat_mut(&mut swapped, to) = selected.clone();

    for slot in [from, to] {
        if let Slot::OnCourt { court, .. } = slot {
            if let Some(dup) = swapped.courts[court].duplicate_player() {
                return Err(SwapRejection::DuplicateOnCourt(dup.clone()).into());
            }
        }
    }

    swapped.manually_modified = true;
    tracing::debug!("Rotation {}: swapped {} and {}", rotation.number, selected, target);
    Ok(swapped)
}

/// Apply [`swap_players`] to rotation `number` of `schedule`
pub fn swap_in_schedule(
    schedule: &Schedule,
    number: usize,
    selected: &PlayerId,
    target: &PlayerId,
) -> Result<Schedule> {
    let index = schedule
        .rotations
        .iter()
        .position(|r| r.number == number)
        .ok_or(SwapRejection::RotationNotFound(number))?;

    let swapped = swap_players(&schedule.rotations[index], selected, target)?;
    let mut updated = schedule.clone();
    updated.rotations[index] = swapped;
    Ok(updated)
}

/// Same (court, team), or both resting
fn same_slot(a: Slot, b: Slot) -> bool {
    match (a, b) {
        (Slot::Resting { .. }, Slot::Resting { .. }) => true,
        (
            Slot::OnCourt { court: c1, team: t1, .. },
            Slot::OnCourt { court: c2, team: t2, .. },
        ) => c1 == c2 && t1 == t2,
        _ => false,
    }
}

fn seat_mut(rotation: &mut Rotation, slot: Slot) -> &mut PlayerId {
    match slot {
        Slot::Resting { index } => &mut rotation.resting[index],
        Slot::OnCourt { court, team, seat } => &mut rotation.courts[court].team_mut(team)[seat],
    }
}
