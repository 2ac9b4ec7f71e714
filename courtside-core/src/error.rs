//! Error taxonomy shared by scheduling, swapping and rating

use crate::player::PlayerId;

/// Result alias used across the courtside crates
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced by the scheduling and rating cores.
///
/// All variants are recoverable at the call boundary: nothing in the core
/// panics on bad input.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Error {
    #[error("at least 4 players are required to build a rotation, got {found}")]
    InsufficientPlayers { found: usize },

    #[error("invalid swap: {0}")]
    InvalidSwapTarget(SwapRejection),

    #[error("volatility did not converge during {stage} after {iterations} iterations")]
    NonConvergentVolatility {
        stage: ConvergenceStage,
        iterations: usize,
    },

    #[error("malformed score batch: {0}")]
    MalformedScoreBatch(String),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Reason a manual swap was refused
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SwapRejection {
    #[error("a player cannot be swapped with themselves")]
    SelfSwap,

    #[error("selected player {0} is not part of this rotation")]
    SelectedNotFound(PlayerId),

    #[error("target player {0} is not part of this rotation")]
    TargetNotFound(PlayerId),

    #[error("both players already occupy the same slot")]
    SameSlot,

    #[error("swap would place {0} twice on the same court")]
    DuplicateOnCourt(PlayerId),

    #[error("schedule has no rotation {0}")]
    RotationNotFound(usize),
}

/// Phase of the volatility solver that failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConvergenceStage {
    /// Searching for a second bracket endpoint
    Bracketing,
    /// Narrowing the bracket with the Illinois method
    Bisection,
}

impl std::fmt::Display for ConvergenceStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConvergenceStage::Bracketing => write!(f, "bracketing"),
            ConvergenceStage::Bisection => write!(f, "bisection"),
        }
    }
}

impl From<SwapRejection> for Error {
    fn from(rejection: SwapRejection) -> Self {
        Error::InvalidSwapTarget(rejection)
    }
}
