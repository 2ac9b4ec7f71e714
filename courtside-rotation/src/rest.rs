//! Rest-priority allocation - who sits out each round
//!
//! Level 3 - Steps

use std::cmp::Ordering;

use courtside_core::{Error, PlayerId, Result, PLAYERS_PER_COURT};
use rand::Rng;
use rustc_hash::FxHashMap;

/// Weight of one past rest; larger than any recency contribution
const REST_COUNT_WEIGHT: f64 = 10.0;

/// Rest history of one player
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RestRecord {
    /// Rounds sat out so far
    pub count: usize,
    /// Index of the most recent round sat out
    pub last_rested: Option<usize>,
}

/// Rest history of a generation run, threaded from round to round
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RestState {
    records: FxHashMap<PlayerId, RestRecord>,
}

impl RestState {
    pub fn new() -> Self {
        Self::default()
    }

    /// History for a player (empty if they have never rested)
    pub fn record(&self, player: &PlayerId) -> RestRecord {
        self.records.get(player).copied().unwrap_or_default()
    }

    pub fn rest_count(&self, player: &PlayerId) -> usize {
        self.record(player).count
    }

    fn mark_rested(&mut self, player: &PlayerId, round: usize) {
        let record = self.records.entry(player.clone()).or_default();
        record.count += 1;
        record.last_rested = Some(round);
    }
}

/// Players split into those on court and those resting for one round
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RoundAllocation {
    /// Active players, roster order
    pub active: Vec<PlayerId>,
    /// Resting players, roster order
    pub resting: Vec<PlayerId>,
}

/// Priority to stay on court; the lowest values rest first.
///
/// Never rested is always 0. Otherwise each past rest adds
/// `REST_COUNT_WEIGHT` and a more recent rest adds up to 1 more.
pub fn rest_priority(record: &RestRecord, round: usize) -> f64 {
    match record.last_rested {
        None => 0.0,
        Some(last) => {
            let rounds_since = round.saturating_sub(last).max(1) as f64;
            record.count as f64 * REST_COUNT_WEIGHT + 1.0 / rounds_since
        }
    }
}

/// Choose the resters for round `round` (0-based).
///
/// Exactly `roster.len() - capacity` players rest (none when the capacity
/// covers everyone). Returns the allocation and the updated history.
pub fn allocate_round<R: Rng>(
    roster: &[PlayerId],
    capacity: usize,
    round: usize,
    state: RestState,
    rng: &mut R,
) -> Result<(RoundAllocation, RestState)> {
    if roster.len() < PLAYERS_PER_COURT {
        return Err(Error::InsufficientPlayers { found: roster.len() });
    }

    let resters = roster.len().saturating_sub(capacity);
    if resters == 0 {
        let allocation = RoundAllocation {
            active: roster.to_vec(),
            resting: Vec::new(),
        };
        return Ok((allocation, state));
    }

    let order = rest_order(roster, round, &state, rng);
    let mut resting_flags = vec![false; roster.len()];
    for &i in order.iter().take(resters) {
        resting_flags[i] = true;
    }

    let mut next = state;
    let mut active = Vec::with_capacity(roster.len() - resters);
    let mut resting = Vec::with_capacity(resters);
    for (player, &rests) in roster.iter().zip(&resting_flags) {
        if rests {
            next.mark_rested(player, round);
            resting.push(player.clone());
        } else {
            active.push(player.clone());
        }
    }

    tracing::debug!("Round {}: resting {:?}", round + 1, resting);

    Ok((RoundAllocation { active, resting }, next))
}

/// Roster indices sorted so that the first entries should rest
fn rest_order<R: Rng>(
    roster: &[PlayerId],
    round: usize,
    state: &RestState,
    rng: &mut R,
) -> Vec<usize> {
    let records: Vec<RestRecord> = roster.iter().map(|p| state.record(p)).collect();
    let priorities: Vec<f64> = records.iter().map(|r| rest_priority(r, round)).collect();
    let tie_breaks: Vec<u64> = roster.iter().map(|_| rng.gen()).collect();

    let mut indices: Vec<usize> = (0..roster.len()).collect();
    indices.sort_by(|&a, &b| {
        priorities[a]
            .partial_cmp(&priorities[b])
            .unwrap_or(Ordering::Equal)
            .then_with(|| records[a].last_rested.cmp(&records[b].last_rested))
            .then_with(|| tie_breaks[a].cmp(&tie_breaks[b]))
    });
    indices
}
