//! Conversion between the public rating/confidence scale and Glicko-2 internals
//!
//! Level 4 - Utilities

use super::config::RatingConfig;

/// Glicko-2 scaling constant (400 / ln 10)
pub const GLICKO2_SCALE: f64 = 173.7178;

/// Glicko rating at the center of the scale
pub const GLICKO_CENTER: f64 = 1500.0;

/// Public rating -> Glicko-2 mu
pub fn to_mu(rating: f64, config: &RatingConfig) -> f64 {
    let glicko = GLICKO_CENTER + (rating - config.center_rating) * config.scale_factor;
    (glicko - GLICKO_CENTER) / GLICKO2_SCALE
}

/// Glicko-2 mu -> public rating (unclamped)
pub fn from_mu(mu: f64, config: &RatingConfig) -> f64 {
    let glicko = mu * GLICKO2_SCALE + GLICKO_CENTER;
    config.center_rating + (glicko - GLICKO_CENTER) / config.scale_factor
}

/// Confidence -> Glicko-2 phi. Confidence 0 is the widest deviation.
pub fn to_phi(confidence: f64, config: &RatingConfig) -> f64 {
    let confidence = confidence.clamp(0.0, 1.0);
    let rd = config.max_deviation - confidence * (config.max_deviation - config.min_deviation);
    rd / GLICKO2_SCALE
}

/// Glicko-2 phi -> confidence in [0, 1]
pub fn from_phi(phi: f64, config: &RatingConfig) -> f64 {
    let rd = phi * GLICKO2_SCALE;
    let span = config.max_deviation - config.min_deviation;
    ((config.max_deviation - rd) / span).clamp(0.0, 1.0)
}

/// Round to two decimals
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_center_maps_to_zero() {
        let config = RatingConfig::default();
        assert_eq!(to_mu(config.center_rating, &config), 0.0);
        assert!((from_mu(0.0, &config) - config.center_rating).abs() < 1e-12);
    }

    #[test]
    fn test_rating_conversion_inverts() {
        let config = RatingConfig::default();
        for rating in [1.0, 2.75, 4.0, 6.2, 8.0] {
            let back = from_mu(to_mu(rating, &config), &config);
            assert!((back - rating).abs() < 1e-9, "{} -> {}", rating, back);
        }
    }

    #[test]
    fn test_confidence_bounds_map_to_deviation_bounds() {
        let config = RatingConfig::default();
        assert!((to_phi(0.0, &config) * GLICKO2_SCALE - 350.0).abs() < 1e-9);
        assert!((to_phi(1.0, &config) * GLICKO2_SCALE - 30.0).abs() < 1e-9);
        assert!((from_phi(to_phi(0.4, &config), &config) - 0.4).abs() < 1e-9);
    }

    #[test]
    fn test_from_phi_clamps() {
        let config = RatingConfig::default();
        assert_eq!(from_phi(1000.0 / GLICKO2_SCALE, &config), 0.0);
        assert_eq!(from_phi(1.0 / GLICKO2_SCALE, &config), 1.0);
    }

    #[test]
    fn test_round2() {
        assert_eq!(round2(4.126), 4.13);
        assert_eq!(round2(4.124), 4.12);
        assert_eq!(round2(0.0), 0.0);
    }
}
