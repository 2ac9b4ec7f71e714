//! Volatility update - Illinois-method root finding (Glicko-2 step 5)
//!
//! Level 3 - Steps

use crate::error::{ConvergenceStage, Error, Result};

/// Hard cap for both the bracket search and the bisection loop
pub const MAX_ITERATIONS: usize = 100;

/// Quantities the volatility equation depends on (all on the Glicko-2 scale)
#[derive(Clone, Copy, Debug)]
pub struct VolatilityInputs {
    /// Estimated improvement (Delta)
    pub delta: f64,
    /// Current deviation (phi)
    pub phi: f64,
    /// Estimated variance of performance (v)
    pub variance: f64,
    /// Current volatility (sigma)
    pub sigma: f64,
    /// System volatility constraint
    pub tau: f64,
    /// Bracket width at which the search stops
    pub epsilon: f64,
}

/// Solve for the new volatility sigma'.
///
/// Finds the root of
/// `f(x) = e^x (Δ² - φ² - v - e^x) / (2 (φ² + v + e^x)²) - (x - a) / τ²`
/// with `a = ln σ²`. The first bracket endpoint is `a`. The second is
/// `ln(Δ² - φ² - v)` when that is defined, otherwise it is found by stepping
/// down from `a` in multiples of τ until `f` is non-negative, so the pair
/// always straddles a sign change before narrowing begins.
///
/// Fails with `NonConvergentVolatility` when inputs are non-finite, when no
/// bracket is found, or when narrowing needs more than [`MAX_ITERATIONS`].
pub fn solve_volatility(inputs: &VolatilityInputs) -> Result<f64> {
    let VolatilityInputs {
        delta,
        phi,
        variance,
        sigma,
        tau,
        epsilon,
    } = *inputs;

    let finite = [delta, phi, variance, sigma, tau, epsilon]
        .iter()
        .all(|x| x.is_finite());
    if !finite || sigma <= 0.0 || tau <= 0.0 || epsilon <= 0.0 {
        return Err(non_convergent(ConvergenceStage::Bracketing, 0));
    }

    let a = (sigma * sigma).ln();
    let phi_sq = phi * phi;
    let f = |x: f64| {
        let ex = x.exp();
        let denom = phi_sq + variance + ex;
        ex * (delta * delta - phi_sq - variance - ex) / (2.0 * denom * denom) - (x - a) / (tau * tau)
    };

    let b = find_bracket(a, delta, phi_sq, variance, tau, &f)?;
    let a_new = narrow_bracket(a, b, epsilon, &f)?;

    Ok((a_new / 2.0).exp())
}

/// Second bracket endpoint such that `f(a)` and `f(b)` differ in sign
fn find_bracket<F: Fn(f64) -> f64>(
    a: f64,
    delta: f64,
    phi_sq: f64,
    variance: f64,
    tau: f64,
    f: &F,
) -> Result<f64> {
    let excess = delta * delta - phi_sq - variance;
    if excess > 0.0 {
        return Ok(excess.ln());
    }

    for k in 1..=MAX_ITERATIONS {
        let x = a - k as f64 * tau;
        let f_x = f(x);
        if !f_x.is_finite() {
            return Err(non_convergent(ConvergenceStage::Bracketing, k));
        }
        if f_x >= 0.0 {
            return Ok(x);
        }
    }
    Err(non_convergent(ConvergenceStage::Bracketing, MAX_ITERATIONS))
}

/// Illinois variant of regula falsi; returns the converged endpoint
fn narrow_bracket<F: Fn(f64) -> f64>(a: f64, b: f64, epsilon: f64, f: &F) -> Result<f64> {
    let mut big_a = a;
    let mut big_b = b;
    let mut f_a = f(big_a);
    let mut f_b = f(big_b);
    let mut iterations = 0;

    while (big_b - big_a).abs() > epsilon {
        if iterations >= MAX_ITERATIONS {
            return Err(non_convergent(ConvergenceStage::Bisection, iterations));
        }

        let c = big_a + (big_a - big_b) * f_a / (f_b - f_a);
        let f_c = f(c);
        if !c.is_finite() || !f_c.is_finite() {
            return Err(non_convergent(ConvergenceStage::Bisection, iterations));
        }

        if f_c * f_b <= 0.0 {
            big_a = big_b;
            f_a = f_b;
        } else {
            f_a /= 2.0;
        }
        big_b = c;
        f_b = f_c;
        iterations += 1;
    }

    Ok(big_a)
}

fn non_convergent(stage: ConvergenceStage, iterations: usize) -> Error {
    tracing::warn!("Volatility solver failed during {} after {} iterations", stage, iterations);
    Error::NonConvergentVolatility { stage, iterations }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inputs(delta: f64, phi: f64, variance: f64, sigma: f64) -> VolatilityInputs {
        VolatilityInputs {
            delta,
            phi,
            variance,
            sigma,
            tau: 0.5,
            epsilon: 1e-6,
        }
    }

    #[test]
    fn test_glickman_worked_example() {
        // Worked example from Glickman's Glicko-2 paper
        let sigma = solve_volatility(&inputs(-0.4834, 1.1513, 1.7785, 0.06)).unwrap();
        assert!((sigma - 0.05999).abs() < 1e-4, "sigma = {}", sigma);
    }

    #[test]
    fn test_large_surprise_uses_direct_bracket() {
        // delta^2 exceeds phi^2 + v, so the log bracket applies and volatility rises
        let sigma = solve_volatility(&inputs(4.0, 0.5, 2.0, 0.06)).unwrap();
        assert!(sigma > 0.06);
        assert!(sigma.is_finite());
    }

    #[test]
    fn test_expected_result_lowers_volatility() {
        // Scenario of two fresh players with high starting volatility
        let sigma = solve_volatility(&inputs(2.989, 2.0148, 8.935, 1.0)).unwrap();
        assert!(sigma < 1.0);
        assert!(sigma > 0.0);
    }

    #[test]
    fn test_non_finite_input_is_rejected() {
        let err = solve_volatility(&inputs(f64::NAN, 1.0, 1.0, 0.06)).unwrap_err();
        assert!(matches!(
            err,
            Error::NonConvergentVolatility {
                stage: ConvergenceStage::Bracketing,
                ..
            }
        ));

        let err = solve_volatility(&inputs(0.1, 1.0, f64::INFINITY, 0.06)).unwrap_err();
        assert!(matches!(err, Error::NonConvergentVolatility { .. }));
    }

    #[test]
    fn test_bisection_cap_surfaces_error() {
        // A tolerance no f64 bracket can reach
        let mut tight = inputs(-0.4834, 1.1513, 1.7785, 0.06);
        tight.epsilon = 1e-300;
        let err = solve_volatility(&tight).unwrap_err();
        assert_eq!(
            err,
            Error::NonConvergentVolatility {
                stage: ConvergenceStage::Bisection,
                iterations: MAX_ITERATIONS,
            }
        );
    }

    #[test]
    fn test_bracketing_cap_surfaces_error() {
        // f never turns non-negative below a
        let err = find_bracket(0.0, 0.0, 1.0, 1.0, 0.5, &|_| -1.0).unwrap_err();
        assert_eq!(
            err,
            Error::NonConvergentVolatility {
                stage: ConvergenceStage::Bracketing,
                iterations: MAX_ITERATIONS,
            }
        );
    }

    #[test]
    fn test_bracketing_stops_on_undefined_function() {
        // Zero deviation and variance: e^x underflows one step below a and f is 0/0
        let mut degenerate = inputs(0.0, 0.0, 0.0, 0.06);
        degenerate.tau = 1e3;
        let err = solve_volatility(&degenerate).unwrap_err();
        assert_eq!(
            err,
            Error::NonConvergentVolatility {
                stage: ConvergenceStage::Bracketing,
                iterations: 1,
            }
        );
    }

    #[test]
    fn test_zero_sigma_is_rejected() {
        assert!(solve_volatility(&inputs(0.1, 1.0, 1.0, 0.0)).is_err());
    }
}
