//! Courtside Rotation - fair rotation scheduling for club sessions
//!
//! This crate turns a roster into playable rounds:
//! - Rest allocation that spreads sit-outs evenly
//! - Pairing into courts of two teams of two (random or partnership-minimizing)
//! - Multi-round schedules and single-round king of the court
//! - Manual swaps on generated rotations
//!
//! ## Architecture (4-layer granularity)
//!
//! - Level 1: generate_schedule, generate_king_of_the_court (orchestration)
//! - Level 2: step, swap_players (phases)
//! - Level 3: allocate_round, pair_random, pair_optimal (steps)
//! - Level 4: utilities, configuration

mod config;
mod pairing;
mod rest;
mod sequencer;
mod swap;

pub use config::{PairingStrategy, ScheduleConfig, MAX_OPTIMAL_POOL};
pub use pairing::{pair_optimal, pair_random, PartnershipState};
pub use rest::{allocate_round, rest_priority, RestRecord, RestState, RoundAllocation};
pub use sequencer::{
    generate_king_of_the_court, generate_schedule, generate_schedules, step, ScheduleRequest,
    SessionState,
};
pub use swap::{locate, swap_in_schedule, swap_players};
