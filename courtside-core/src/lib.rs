//! Courtside Core - data model and rating engine
//!
//! This crate provides the shared building blocks of the club-session tools:
//! - Players, courts, rotations and schedules
//! - The error taxonomy used by scheduling, swapping and rating
//! - Recorded game scores and the score book
//! - Glicko-2 rating updates on the club's public rating scale

pub mod error;
pub mod player;
pub mod rating;
pub mod schedule;
pub mod score;

// Re-exports for convenient access
pub use error::{ConvergenceStage, Error, Result, SwapRejection};
pub use player::{load_roster, parse_roster, roster_ids, Gender, Player, PlayerId, RosterEntry};
pub use rating::{rate_session, OpponentResult, RatingConfig, RatingEngine, RatingUpdate, TeamRating};
pub use schedule::{Court, Rotation, Schedule, ScheduleKind, Slot, TeamSide, PLAYERS_PER_COURT};
pub use score::{load_scores, GameScore, ScoreBook};
