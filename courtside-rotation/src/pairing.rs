//! Pairing - split the active players of a round into courts
//!
//! Level 3 - Steps

use courtside_core::{Court, Error, PlayerId, Result, PLAYERS_PER_COURT};
use rand::seq::SliceRandom;
use rand::Rng;
use rustc_hash::FxHashMap;

/// The three ways to split four players into two teams (positions in the quad)
const SPLITS: [[usize; 4]; 3] = [[0, 1, 2, 3], [0, 2, 1, 3], [0, 3, 1, 2]];

/// How often each pair of players has been teammates in this generation run
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PartnershipState {
    counts: FxHashMap<(PlayerId, PlayerId), u32>,
}

impl PartnershipState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Times `a` and `b` were partners (symmetric)
    pub fn count(&self, a: &PlayerId, b: &PlayerId) -> u32 {
        self.counts.get(&pair_key(a, b)).copied().unwrap_or(0)
    }

    /// Record one more round with `a` and `b` on the same team
    pub fn record(&mut self, a: &PlayerId, b: &PlayerId) {
        *self.counts.entry(pair_key(a, b)).or_insert(0) += 1;
    }

    /// Record both teams of a court
    pub fn record_court(&mut self, court: &Court) {
        self.record(&court.team1[0], &court.team1[1]);
        self.record(&court.team2[0], &court.team2[1]);
    }

    /// Largest count over all pairs
    pub fn max_count(&self) -> u32 {
        self.counts.values().copied().max().unwrap_or(0)
    }
}

fn pair_key(a: &PlayerId, b: &PlayerId) -> (PlayerId, PlayerId) {
    if a <= b {
        (a.clone(), b.clone())
    } else {
        (b.clone(), a.clone())
    }
}

/// Shuffle, then chunk into fours: first two vs last two.
///
/// `active` must fill whole courts.
pub fn pair_random<R: Rng>(active: &[PlayerId], rng: &mut R) -> Result<Vec<Court>> {
    check_full_courts(active)?;

    let mut shuffled = active.to_vec();
    shuffled.shuffle(rng);

    let courts = shuffled
        .chunks_exact(PLAYERS_PER_COURT)
        .map(|c| Court::new([c[0].clone(), c[1].clone()], [c[2].clone(), c[3].clone()]))
        .collect();
    Ok(courts)
}

/// Greedy exhaustive search for the courts that repeat the fewest partnerships.
///
/// Each court is the lowest-scoring (4-subset, split) over the remaining pool,
/// where a split scores the past partnership counts of both teams. Ties go to
/// the first combination in enumeration order. The search is O(pool^4) per
/// court; pools above `max_pool` fall back to [`pair_random`].
pub fn pair_optimal<R: Rng>(
    active: &[PlayerId],
    state: PartnershipState,
    max_pool: usize,
    rng: &mut R,
) -> Result<(Vec<Court>, PartnershipState)> {
    check_full_courts(active)?;

    let mut state = state;

    if active.len() > max_pool {
        tracing::warn!(
            "Optimal pairing limited to {} players, got {}; using random pairing",
            max_pool,
            active.len()
        );
        let courts = pair_random(active, rng)?;
        for court in &courts {
            state.record_court(court);
        }
        return Ok((courts, state));
    }

    let mut matrix = partnership_matrix(active, &state);
    let mut pool: Vec<usize> = (0..active.len()).collect();
    let mut courts = Vec::with_capacity(active.len() / PLAYERS_PER_COURT);

    while pool.len() >= PLAYERS_PER_COURT {
        let (quad, split, score) = best_court(&pool, &matrix);
        let [a, b, c, d] = split.map(|s| quad[s]);

        matrix[a][b] += 1;
        matrix[b][a] += 1;
        matrix[c][d] += 1;
        matrix[d][c] += 1;
        pool.retain(|p| !quad.contains(p));

        let court = Court::new(
            [active[a].clone(), active[b].clone()],
            [active[c].clone(), active[d].clone()],
        );
        tracing::debug!("Court {}: repeat score {}", courts.len() + 1, score);
        state.record_court(&court);
        courts.push(court);
    }

    Ok((courts, state))
}

/// Reject an active list that would leave a partial court
fn check_full_courts(active: &[PlayerId]) -> Result<()> {
    if active.len() % PLAYERS_PER_COURT != 0 {
        return Err(Error::InvalidConfig(format!(
            "{} active players do not fill whole courts of {}",
            active.len(),
            PLAYERS_PER_COURT
        )));
    }
    Ok(())
}

/// Local count matrix over the active players, indexed by position in `active`
fn partnership_matrix(active: &[PlayerId], state: &PartnershipState) -> Vec<Vec<u32>> {
    active
        .iter()
        .map(|a| active.iter().map(|b| if a == b { 0 } else { state.count(a, b) }).collect())
        .collect()
}

/// Lowest-scoring quad and split over the pool; earliest wins ties
fn best_court(pool: &[usize], matrix: &[Vec<u32>]) -> ([usize; 4], [usize; 4], u32) {
    let n = pool.len();
    let mut best: Option<([usize; 4], [usize; 4], u32)> = None;

    for i in 0..n {
        for j in (i + 1)..n {
            for k in (j + 1)..n {
                for l in (k + 1)..n {
                    let quad = [pool[i], pool[j], pool[k], pool[l]];
                    for split in SPLITS {
                        let score = matrix[quad[split[0]]][quad[split[1]]]
                            + matrix[quad[split[2]]][quad[split[3]]];
                        if best.map_or(true, |(_, _, s)| score < s) {
                            if score == 0 {
                                return (quad, split, 0);
                            }
                            best = Some((quad, split, score));
                        }
                    }
                }
            }
        }
    }

    // pool holds at least four players, so some quad was scored
    best.unwrap_or(([pool[0], pool[1], pool[2], pool[3]], SPLITS[0], 0))
}
