//! Great-circle distance and the distance-to-score curve
//!
//! Pure math, no game state. Inputs are decimal degrees; NaN coordinates
//! propagate through rather than being rejected - callers validate.

use serde::{Deserialize, Serialize};

use crate::consts::{EARTH_RADIUS_KM, MAX_SCORE, MAX_SCORING_DISTANCE_KM, SCORE_DECAY_KM};

/// A point on the globe in decimal degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinate {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

/// Great-circle distance in kilometers between two points, via the
/// haversine formula with mean Earth radius [`EARTH_RADIUS_KM`].
///
/// Symmetric in its arguments; exactly zero for identical points.
pub fn distance_km(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let d_lat = (lat2 - lat1).to_radians();
    let d_lon = (lon2 - lon1).to_radians();

    let a = (d_lat / 2.0).sin().powi(2)
        + lat1.to_radians().cos() * lat2.to_radians().cos() * (d_lon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_KM * c
}

/// Map a distance to points on the exponential decay curve:
/// `round(5000 * exp(-d / 2000))`, clamped to `[0, 5000]`.
///
/// A perfect guess scores exactly [`MAX_SCORE`]; anything at or beyond
/// [`MAX_SCORING_DISTANCE_KM`] scores exactly zero (explicit floor, not a
/// formula artifact).
pub fn score_for(distance_km: f64) -> u32 {
    if distance_km == 0.0 {
        return MAX_SCORE;
    }
    if distance_km >= MAX_SCORING_DISTANCE_KM {
        return 0;
    }

    let score = (MAX_SCORE as f64 * (-distance_km / SCORE_DECAY_KM).exp()).round();
    // Saturating cast clamps the low end (and any NaN) to 0
    (score as u32).min(MAX_SCORE)
}
