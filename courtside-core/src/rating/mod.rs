//! Rating engine - Glicko-2 adapted to the club's public rating scale
//!
//! ## Architecture (4-layer granularity)
//!
//! - Level 1: rate_session (score book -> updates for every player)
//! - Level 2: RatingEngine::rate (one player, one batch)
//! - Level 3: solve_volatility, g/expected_score (numeric steps)
//! - Level 4: scale conversion and configuration

mod config;
mod glicko;
pub mod scale;
mod session;
mod volatility;

pub use config::RatingConfig;
pub use glicko::{OpponentResult, RatingEngine, RatingUpdate};
pub use session::{rate_session, TeamRating};
pub use volatility::{solve_volatility, VolatilityInputs, MAX_ITERATIONS};
