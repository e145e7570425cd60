//! Terra Guess - a landmark-guessing geography game core
//!
//! Core modules:
//! - `geo`: Pure math (haversine distance, distance-to-score curve)
//! - `catalog`: Static landmark catalog with random selection
//! - `round`: Single-round resolution (distance, score, multiplier)
//! - `session`: Game session state machine (modes, timers, termination)
//! - `highscores`: Local leaderboard persisted to LocalStorage

pub mod catalog;
pub mod geo;
pub mod highscores;
pub mod round;
pub mod session;

pub use catalog::{Location, LocationCatalog};
pub use geo::Coordinate;
pub use highscores::HighScores;
pub use round::{RoundResult, resolve_round};
pub use session::{
    Difficulty, EndReason, GameConfig, Mode, Session, SessionError, SessionPhase, SessionResults,
};

/// Game balance constants
pub mod consts {
    /// Mean Earth radius in kilometers (haversine)
    pub const EARTH_RADIUS_KM: f64 = 6371.0;
    /// Points for a perfect guess
    pub const MAX_SCORE: u32 = 5000;
    /// Distance at or beyond which a guess scores zero (~half Earth circumference)
    pub const MAX_SCORING_DISTANCE_KM: f64 = 20_000.0;
    /// Decay constant of the score curve - at this distance a guess is
    /// worth `MAX_SCORE / e`
    pub const SCORE_DECAY_KM: f64 = 2_000.0;
    /// Rounds per session in classic and speed modes
    pub const TOTAL_ROUNDS: u32 = 5;
    /// Global session timer for speed mode (seconds), all difficulties
    pub const SPEED_SESSION_SECS: u32 = 300;
    /// Seconds the failing round stays on screen before a survival
    /// session ends
    pub const SURVIVAL_END_DELAY_SECS: u32 = 2;
}
