//! Single-round resolution
//!
//! Turns a location/guess pair into a scored [`RoundResult`]. Total
//! function: a missing guess is a forfeit, not an error, and coordinates
//! are assumed pre-validated by the map layer.

use serde::{Deserialize, Serialize};

use crate::catalog::Location;
use crate::consts::MAX_SCORING_DISTANCE_KM;
use crate::geo::{Coordinate, distance_km, score_for};

/// Outcome of one location-guess-score cycle, immutable once created
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoundResult {
    /// 1-based round number
    pub round: u32,
    /// The location that was shown
    pub location: Location,
    /// `None` means no guess was submitted (timeout forfeits the round)
    pub guess: Option<Coordinate>,
    /// Great-circle error in whole kilometers
    pub distance_km: u32,
    /// Points awarded, after the difficulty multiplier
    pub score: u32,
    /// Seconds left on the clock when the round resolved
    pub time_remaining: u32,
}

/// Resolve a round against the shown location.
///
/// A forfeit (`guess == None`) scores zero at the maximum scoring distance
/// regardless of multiplier. Otherwise the base score from the decay curve
/// is scaled by the difficulty multiplier and re-rounded, with no second
/// clamp - a near-perfect guess on hard difficulty can exceed 5000 points.
pub fn resolve_round(
    round: u32,
    location: Location,
    guess: Option<Coordinate>,
    multiplier: f64,
    time_remaining: u32,
) -> RoundResult {
    let (distance, score) = match guess {
        Some(g) => {
            let d = distance_km(location.lat, location.lng, g.lat, g.lng);
            let base = score_for(d);
            (d, (base as f64 * multiplier).round() as u32)
        }
        None => (MAX_SCORING_DISTANCE_KM, 0),
    };

    RoundResult {
        round,
        location,
        guess,
        distance_km: distance.round() as u32,
        score,
        time_remaining,
    }
}
