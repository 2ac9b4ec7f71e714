//! Rotation sequencing - multi-round schedules and king of the court
//!
//! Level 1 - Orchestration and Level 2 - Phases

use courtside_core::{Error, PlayerId, Result, Rotation, Schedule, ScheduleKind, PLAYERS_PER_COURT};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;

use crate::config::{PairingStrategy, ScheduleConfig};
use crate::pairing::{pair_optimal, pair_random, PartnershipState};
use crate::rest::{allocate_round, RestState};

/// History carried from one round to the next within a generation run
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SessionState {
    /// 0-based index of the next round to generate
    pub round: usize,
    pub rest: RestState,
    pub partnerships: PartnershipState,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }
}

/// One independent schedule to generate
#[derive(Clone, Debug)]
pub struct ScheduleRequest {
    pub roster: Vec<PlayerId>,
    pub config: ScheduleConfig,
}

// ============================================================================
// Level 1 - Orchestration
// ============================================================================

/// Generate a multi-round schedule.
///
/// Rounds are produced strictly in order: each one depends on the rest and
/// partnership history of all earlier rounds.
pub fn generate_schedule(roster: &[PlayerId], config: &ScheduleConfig) -> Result<Schedule> {
    validate_roster(roster)?;
    config.validate()?;

    let mut rng = create_rng(config.seed);
    let mut state = SessionState::new();
    let mut rotations = Vec::with_capacity(config.rounds);

    for _ in 0..config.rounds {
        let (rotation, next) = step(roster, config, state, &mut rng)?;
        rotations.push(rotation);
        state = next;
    }

    tracing::info!(
        "Generated {} rotations for {} players ({:?} pairing, capacity {})",
        rotations.len(),
        roster.len(),
        config.strategy,
        config.capacity(roster.len())
    );

    Ok(Schedule::new(ScheduleKind::RoundRobin, rotations))
}

/// Generate a single king-of-the-court rotation: random pairing, no history
pub fn generate_king_of_the_court(roster: &[PlayerId], config: &ScheduleConfig) -> Result<Schedule> {
    validate_roster(roster)?;

    // Always one round, so only the court limit matters
    let single = ScheduleConfig {
        rounds: 1,
        strategy: PairingStrategy::Random,
        ..config.clone()
    };
    single.validate()?;
    let mut rng = create_rng(single.seed);
    let (rotation, _) = step(roster, &single, SessionState::new(), &mut rng)?;

    tracing::info!(
        "Generated king of the court: {} courts, {} resting",
        rotation.courts.len(),
        rotation.resting.len()
    );

    Ok(Schedule::new(ScheduleKind::KingOfTheCourt, vec![rotation]))
}

/// Generate several independent schedules, optionally in parallel.
///
/// Requests share no state, so results match a sequential run with the same seeds.
pub fn generate_schedules(requests: &[ScheduleRequest], parallel: bool) -> Vec<Result<Schedule>> {
    if parallel {
        requests
            .par_iter()
            .map(|r| generate_schedule(&r.roster, &r.config))
            .collect()
    } else {
        requests
            .iter()
            .map(|r| generate_schedule(&r.roster, &r.config))
            .collect()
    }
}

// ============================================================================
// Level 2 - Phases
// ============================================================================

/// Generate the next round from `state` and return the advanced state
pub fn step<R: Rng>(
    roster: &[PlayerId],
    config: &ScheduleConfig,
    state: SessionState,
    rng: &mut R,
) -> Result<(Rotation, SessionState)> {
    let SessionState {
        round,
        rest,
        partnerships,
    } = state;

    let capacity = config.capacity(roster.len());
    let (allocation, rest) = allocate_round(roster, capacity, round, rest, rng)?;

    let (courts, partnerships) = match config.strategy {
        PairingStrategy::Random => (pair_random(&allocation.active, rng)?, partnerships),
        PairingStrategy::Optimal => {
            pair_optimal(&allocation.active, partnerships, config.max_optimal_pool, rng)?
        }
    };

    let rotation = Rotation::new(round + 1, courts, allocation.resting);
    debug_assert!(rotation.check_partition(roster));

    tracing::debug!(
        "Rotation {}: {} courts, {} resting",
        rotation.number,
        rotation.courts.len(),
        rotation.resting.len()
    );

    let next = SessionState {
        round: round + 1,
        rest,
        partnerships,
    };
    Ok((rotation, next))
}

// ============================================================================
// Level 4 - Utilities
// ============================================================================

/// Reject rosters too small for a court or with repeated players
fn validate_roster(roster: &[PlayerId]) -> Result<()> {
    if roster.len() < PLAYERS_PER_COURT {
        return Err(Error::InsufficientPlayers { found: roster.len() });
    }
    for (i, player) in roster.iter().enumerate() {
        if roster[i + 1..].contains(player) {
            return Err(Error::InvalidConfig(format!("{} appears twice in the roster", player)));
        }
    }
    Ok(())
}

/// Create RNG from seed or random
fn create_rng(seed: Option<u64>) -> ChaCha8Rng {
    match seed {
        Some(s) => ChaCha8Rng::seed_from_u64(s),
        None => ChaCha8Rng::from_entropy(),
    }
}
