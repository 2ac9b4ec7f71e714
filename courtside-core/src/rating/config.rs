//! Rating configuration
//!
//! Level 4 - Utilities and configuration

use crate::error::{Error, Result};
use crate::player::{DEFAULT_RATING, MAX_RATING, MIN_RATING};

/// Constants of the rating system
#[derive(Clone, Debug, PartialEq)]
pub struct RatingConfig {
    /// System volatility constraint (Glicko-2 tau)
    pub tau: f64,
    /// Convergence tolerance of the volatility solver
    pub epsilon: f64,
    /// Lowest public rating
    pub min_rating: f64,
    /// Highest public rating
    pub max_rating: f64,
    /// Public rating that maps onto Glicko 1500
    pub center_rating: f64,
    /// Glicko points per public rating point
    pub scale_factor: f64,
    /// Rating deviation at confidence 0
    pub max_deviation: f64,
    /// Rating deviation at confidence 1
    pub min_deviation: f64,
    /// Confidence floor gained per lifetime game
    pub confidence_per_game: f64,
    /// Volatility never drops below this
    pub min_volatility: f64,
}

impl Default for RatingConfig {
    fn default() -> Self {
        Self {
            tau: 0.5,
            epsilon: 1e-6,
            min_rating: MIN_RATING,
            max_rating: MAX_RATING,
            center_rating: DEFAULT_RATING,
            scale_factor: 200.0,
            max_deviation: 350.0,
            min_deviation: 30.0,
            confidence_per_game: 0.01,
            min_volatility: 0.01,
        }
    }
}

impl RatingConfig {
    /// Set the system volatility constraint
    pub fn with_tau(mut self, tau: f64) -> Self {
        self.tau = tau;
        self
    }

    /// Set public rating bounds
    pub fn with_bounds(mut self, min_rating: f64, max_rating: f64) -> Self {
        self.min_rating = min_rating;
        self.max_rating = max_rating;
        self
    }

    /// Reject constants the Glicko-2 step cannot work with
    pub fn validate(&self) -> Result<()> {
        if !(self.tau.is_finite() && self.tau > 0.0) {
            return Err(Error::InvalidConfig(format!("tau must be positive, got {}", self.tau)));
        }
        if !(self.epsilon.is_finite() && self.epsilon > 0.0) {
            return Err(Error::InvalidConfig(format!(
                "epsilon must be positive, got {}",
                self.epsilon
            )));
        }
        if !(self.min_rating < self.max_rating) {
            return Err(Error::InvalidConfig(format!(
                "rating bounds {}..{} are empty",
                self.min_rating, self.max_rating
            )));
        }
        if !(self.scale_factor.is_finite() && self.scale_factor > 0.0) {
            return Err(Error::InvalidConfig(format!(
                "scale factor must be positive, got {}",
                self.scale_factor
            )));
        }
        if !(0.0 < self.min_deviation && self.min_deviation <= self.max_deviation) {
            return Err(Error::InvalidConfig(format!(
                "deviation range {}..{} is invalid",
                self.min_deviation, self.max_deviation
            )));
        }
        Ok(())
    }

    /// Confidence floor implied by lifetime games played
    pub fn games_confidence_floor(&self, total_games: u32) -> f64 {
        (total_games as f64 * self.confidence_per_game).min(1.0)
    }
}
