//! Configuration types for schedule generation
//!
//! Level 4 - Utilities and configuration

use courtside_core::{Error, Result, PLAYERS_PER_COURT};

/// Largest active pool the optimal pairing search will take on
pub const MAX_OPTIMAL_POOL: usize = 24;

/// How active players are split into courts
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PairingStrategy {
    /// Shuffle and chunk into fours; no partnership accounting
    #[default]
    Random,
    /// Exhaustive search minimizing repeated partnerships
    Optimal,
}

/// Schedule generation configuration
#[derive(Clone, Debug, PartialEq)]
pub struct ScheduleConfig {
    /// Courts available (None = as many as the roster fills)
    pub courts: Option<usize>,
    /// Number of rotations to generate
    pub rounds: usize,
    /// Pairing strategy
    pub strategy: PairingStrategy,
    /// Random seed for reproducibility (None = random)
    pub seed: Option<u64>,
    /// Active players above which optimal pairing falls back to random
    pub max_optimal_pool: usize,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            courts: None,
            rounds: 1,
            strategy: PairingStrategy::Random,
            seed: None,
            max_optimal_pool: MAX_OPTIMAL_POOL,
        }
    }
}

impl ScheduleConfig {
    /// Round-robin schedule with fast random pairing
    pub fn round_robin(rounds: usize) -> Self {
        Self {
            rounds,
            ..Default::default()
        }
    }

    /// Session schedule with partnership-minimizing pairing
    pub fn session(rounds: usize) -> Self {
        Self {
            rounds,
            strategy: PairingStrategy::Optimal,
            ..Default::default()
        }
    }

    /// Set the number of courts
    pub fn with_courts(mut self, courts: usize) -> Self {
        self.courts = Some(courts);
        self
    }

    /// Set random seed
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Set pairing strategy
    pub fn with_strategy(mut self, strategy: PairingStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Reject configurations that cannot describe a session
    pub fn validate(&self) -> Result<()> {
        if self.rounds == 0 {
            return Err(Error::InvalidConfig("rounds must be at least 1".to_string()));
        }
        if self.courts == Some(0) {
            return Err(Error::InvalidConfig("courts must be at least 1".to_string()));
        }
        Ok(())
    }

    /// Active slots per round for a roster of `roster_size` players.
    ///
    /// Always a multiple of 4 and never more than the roster can fill.
    pub fn capacity(&self, roster_size: usize) -> usize {
        let fillable = roster_size / PLAYERS_PER_COURT * PLAYERS_PER_COURT;
        match self.courts {
            Some(courts) => (courts * PLAYERS_PER_COURT).min(fillable),
            None => fillable,
        }
    }
}
