//! Single-player Glicko-2 update over one batch of results
//!
//! Level 2 - Phases

use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

use super::config::RatingConfig;
use super::scale::{from_mu, from_phi, round2, to_mu, to_phi};
use super::volatility::{solve_volatility, VolatilityInputs};
use crate::error::{ConvergenceStage, Error, Result};
use crate::player::{Player, PlayerId};

/// One result against an opponent (or an opposing team's averaged values)
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct OpponentResult {
    /// 0.0 loss, 0.5 tie, 1.0 win; fractions allowed for multi-game matches
    pub score: f64,
    pub opponent_rating: f64,
    pub opponent_confidence: f64,
}

impl OpponentResult {
    pub fn new(score: f64, opponent_rating: f64, opponent_confidence: f64) -> Self {
        Self {
            score,
            opponent_rating,
            opponent_confidence,
        }
    }
}

/// New rating values for one player
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RatingUpdate {
    pub player: PlayerId,
    pub rating: f64,
    pub confidence: f64,
    pub volatility: f64,
    pub total_games: u32,
}

impl RatingUpdate {
    /// The player's current values, untouched
    pub fn unchanged(player: &Player) -> Self {
        Self {
            player: player.id.clone(),
            rating: player.rating,
            confidence: player.confidence,
            volatility: player.volatility,
            total_games: player.total_games,
        }
    }

    /// Write the new values back onto a player record
    pub fn apply_to(&self, player: &mut Player) {
        player.rating = self.rating;
        player.confidence = self.confidence;
        player.volatility = self.volatility;
        player.total_games = self.total_games;
    }
}

/// Opponent converted to the Glicko-2 scale
#[derive(Clone, Copy, Debug)]
struct ScaledOpponent {
    mu: f64,
    phi: f64,
    score: f64,
}

/// Raw Glicko-2 output before mapping back to the public scale
#[derive(Clone, Copy, Debug)]
struct Glicko2State {
    mu: f64,
    phi: f64,
    sigma: f64,
}

/// Glicko-2 rating engine
#[derive(Clone, Debug, Default)]
pub struct RatingEngine {
    config: RatingConfig,
}

impl RatingEngine {
    pub fn new(config: RatingConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RatingConfig {
        &self.config
    }

    /// Rate one player against a batch of results.
    ///
    /// An empty batch returns the player's current values unchanged.
    /// An unusable configuration is rejected before anything else.
    pub fn rate(&self, player: &Player, results: &[OpponentResult]) -> Result<RatingUpdate> {
        self.config.validate()?;
        if results.is_empty() {
            return Ok(RatingUpdate::unchanged(player));
        }
        validate_results(results)?;

        let config = &self.config;
        let current = Glicko2State {
            mu: to_mu(player.rating, config),
            phi: to_phi(player.confidence, config),
            sigma: player.volatility.max(config.min_volatility),
        };
        let opponents: Vec<ScaledOpponent> = results
            .iter()
            .map(|r| ScaledOpponent {
                mu: to_mu(r.opponent_rating, config),
                phi: to_phi(r.opponent_confidence, config),
                score: r.score,
            })
            .collect();

        let next = glicko2_step(current, &opponents, config.tau, config.epsilon)?;

        let total_games = player.total_games + results.len() as u32;
        let rating = from_mu(next.mu, config).clamp(config.min_rating, config.max_rating);
        let confidence = from_phi(next.phi, config).max(config.games_confidence_floor(total_games));
        let volatility = next.sigma.max(config.min_volatility);

        let update = RatingUpdate {
            player: player.id.clone(),
            rating: round2(rating),
            confidence: round2(confidence),
            volatility: round2(volatility),
            total_games,
        };

        tracing::debug!(
            "Rated {}: {:.2} -> {:.2} (confidence {:.2} -> {:.2}, {} results)",
            player.id,
            player.rating,
            update.rating,
            player.confidence,
            update.confidence,
            results.len()
        );

        Ok(update)
    }
}

// ============================================================================
// Level 3 - Steps
// ============================================================================

fn validate_results(results: &[OpponentResult]) -> Result<()> {
    for r in results {
        if !(0.0..=1.0).contains(&r.score) {
            return Err(Error::MalformedScoreBatch(format!(
                "result score {} outside [0, 1]",
                r.score
            )));
        }
        if !r.opponent_rating.is_finite() || !r.opponent_confidence.is_finite() {
            return Err(Error::MalformedScoreBatch(
                "opponent rating values must be finite".to_string(),
            ));
        }
    }
    Ok(())
}

/// Glicko-2 steps 3 to 7 on the internal scale
fn glicko2_step(
    current: Glicko2State,
    opponents: &[ScaledOpponent],
    tau: f64,
    epsilon: f64,
) -> Result<Glicko2State> {
    let mut v_inv = 0.0;
    let mut performance = 0.0;
    for opp in opponents {
        let g_phi = g(opp.phi);
        let e = expected_score(current.mu, opp.mu, opp.phi);
        v_inv += g_phi * g_phi * e * (1.0 - e);
        performance += g_phi * (opp.score - e);
    }
    if v_inv <= 0.0 || !v_inv.is_finite() {
        return Err(Error::NonConvergentVolatility {
            stage: ConvergenceStage::Bracketing,
            iterations: 0,
        });
    }

    let variance = 1.0 / v_inv;
    let delta = variance * performance;

    let sigma = solve_volatility(&VolatilityInputs {
        delta,
        phi: current.phi,
        variance,
        sigma: current.sigma,
        tau,
        epsilon,
    })?;

    let phi_star = (current.phi * current.phi + sigma * sigma).sqrt();
    let phi = 1.0 / (1.0 / (phi_star * phi_star) + 1.0 / variance).sqrt();
    let mu = current.mu + phi * phi * performance;

    Ok(Glicko2State { mu, phi, sigma })
}

/// De-weighting by opponent deviation
fn g(phi: f64) -> f64 {
    1.0 / (1.0 + 3.0 * phi * phi / (PI * PI)).sqrt()
}

/// Expected score against an opponent
fn expected_score(mu: f64, opponent_mu: f64, opponent_phi: f64) -> f64 {
    1.0 / (1.0 + (-g(opponent_phi) * (mu - opponent_mu)).exp())
}
