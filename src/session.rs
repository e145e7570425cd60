//! Game session state machine
//!
//! One [`Session`] owns all mutable state for a run: round sequencing, the
//! countdown timer, score aggregation, and the termination rules for each
//! mode. Time only advances through [`Session::tick_second`], driven by the
//! embedder at 1 Hz, so the whole machine runs deterministically under test
//! without wall-clock waits. Dropping a session at any point is
//! cancellation - nothing is persisted unless the embedder saves the
//! results itself.

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::catalog::{Location, LocationCatalog};
use crate::consts::{SPEED_SESSION_SECS, SURVIVAL_END_DELAY_SECS, TOTAL_ROUNDS};
use crate::geo::Coordinate;
use crate::round::{RoundResult, resolve_round};

/// Game mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Five rounds, per-round timer
    #[default]
    Classic,
    /// Five rounds against a single global timer
    Speed,
    /// Unbounded rounds, one miss beyond tolerance ends the run
    Survival,
}

impl Mode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Classic => "classic",
            Mode::Speed => "speed",
            Mode::Survival => "survival",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "classic" => Some(Mode::Classic),
            "speed" => Some(Mode::Speed),
            "survival" => Some(Mode::Survival),
            _ => None,
        }
    }
}

/// Difficulty tier - affects timing, scoring, and survival tolerance,
/// never the location pool
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "easy" => Some(Difficulty::Easy),
            "medium" | "med" => Some(Difficulty::Medium),
            "hard" => Some(Difficulty::Hard),
            _ => None,
        }
    }

    /// Per-round time budget in seconds (classic and survival modes)
    pub fn round_time_secs(&self) -> u32 {
        match self {
            Difficulty::Easy => 120,
            Difficulty::Medium => 60,
            Difficulty::Hard => 30,
        }
    }

    /// Scale factor applied to the base score of every round
    pub fn score_multiplier(&self) -> f64 {
        match self {
            Difficulty::Easy => 0.8,
            Difficulty::Medium => 1.0,
            Difficulty::Hard => 1.5,
        }
    }

    /// Maximum allowed distance error before a survival run ends
    pub fn survival_tolerance_km(&self) -> u32 {
        match self {
            Difficulty::Easy => 3000,
            Difficulty::Medium => 2000,
            Difficulty::Hard => 1000,
        }
    }
}

/// Session configuration, supplied once at start and immutable thereafter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct GameConfig {
    pub mode: Mode,
    pub difficulty: Difficulty,
}

/// Lifecycle phase of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionPhase {
    /// Waiting for a guess; the timer is running
    Playing,
    /// Round outcome on display; waiting for advance (or a scheduled
    /// survival termination)
    RoundResolved,
    /// Terminal; results are ready to collect
    SessionEnded,
}

/// Why a session ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EndReason {
    /// All rounds played (classic/speed)
    #[serde(rename = "Complete")]
    Complete,
    /// Speed-mode global timer expired
    #[serde(rename = "Time Up!")]
    TimeUp,
    /// A survival round missed beyond tolerance or timed out
    #[serde(rename = "Survival Failed")]
    SurvivalFailed,
}

impl EndReason {
    /// Display string, shown verbatim on the results screen
    pub fn as_str(&self) -> &'static str {
        match self {
            EndReason::Complete => "Complete",
            EndReason::TimeUp => "Time Up!",
            EndReason::SurvivalFailed => "Survival Failed",
        }
    }
}

/// Session creation errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    /// The catalog has no locations; refuse to start rather than run with
    /// an undefined current location
    #[error("location catalog is empty; cannot start a session")]
    EmptyCatalog,
}

/// Terminal payload handed to the results/leaderboard collaborators
#[derive(Debug, Clone, Serialize)]
pub struct SessionResults {
    pub score: u32,
    pub rounds: Vec<RoundResult>,
    pub config: GameConfig,
    pub reason: EndReason,
}

/// A single game run from start to termination
#[derive(Debug, Clone)]
pub struct Session {
    config: GameConfig,
    catalog: LocationCatalog,
    rng: Pcg32,
    /// 1-based
    round: u32,
    current: Location,
    pending_guess: Option<Coordinate>,
    history: Vec<RoundResult>,
    total_score: u32,
    time_left: u32,
    phase: SessionPhase,
    /// Seconds until a scheduled survival termination fires
    end_delay: Option<u32>,
    reason: Option<EndReason>,
}

impl Session {
    /// Start a session. Fails only if the catalog is empty.
    pub fn new(
        config: GameConfig,
        catalog: LocationCatalog,
        seed: u64,
    ) -> Result<Self, SessionError> {
        let mut rng = Pcg32::seed_from_u64(seed);
        let current = catalog
            .random_location(&mut rng)
            .cloned()
            .ok_or(SessionError::EmptyCatalog)?;

        let time_left = match config.mode {
            Mode::Speed => SPEED_SESSION_SECS,
            _ => config.difficulty.round_time_secs(),
        };

        log::info!(
            "session start: mode={} difficulty={} seed={}",
            config.mode.as_str(),
            config.difficulty.as_str(),
            seed
        );

        Ok(Self {
            config,
            catalog,
            rng,
            round: 1,
            current,
            pending_guess: None,
            history: Vec::new(),
            total_score: 0,
            time_left,
            phase: SessionPhase::Playing,
            end_delay: None,
            reason: None,
        })
    }

    pub fn config(&self) -> GameConfig {
        self.config
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    /// Current 1-based round number
    pub fn round(&self) -> u32 {
        self.round
    }

    /// The location the player is being asked to identify
    pub fn current_location(&self) -> &Location {
        &self.current
    }

    pub fn pending_guess(&self) -> Option<Coordinate> {
        self.pending_guess
    }

    pub fn history(&self) -> &[RoundResult] {
        &self.history
    }

    pub fn last_result(&self) -> Option<&RoundResult> {
        self.history.last()
    }

    pub fn total_score(&self) -> u32 {
        self.total_score
    }

    /// Seconds remaining - per round in classic/survival, global in speed
    pub fn time_left(&self) -> u32 {
        self.time_left
    }

    /// Whether the map view should show the true location
    pub fn reveal_answer(&self) -> bool {
        !matches!(self.phase, SessionPhase::Playing)
    }

    /// True when advancing from the current resolved round would end the
    /// session (drives the "view results" button label)
    pub fn is_last_round(&self) -> bool {
        self.config.mode != Mode::Survival && self.round >= TOTAL_ROUNDS
    }

    /// Advance the clock by one second.
    ///
    /// While playing, counts the timer down; at zero, speed mode ends the
    /// whole session and other modes forfeit the round. While a round is on
    /// display, counts down a scheduled survival termination, if any.
    pub fn tick_second(&mut self) {
        match self.phase {
            SessionPhase::Playing => {
                self.time_left = self.time_left.saturating_sub(1);
                if self.time_left == 0 {
                    if self.config.mode == Mode::Speed {
                        self.finish(EndReason::TimeUp);
                    } else {
                        // Timeout forfeits the round, even if a marker was
                        // placed but never confirmed
                        self.resolve(None);
                    }
                }
            }
            SessionPhase::RoundResolved => {
                if let Some(delay) = self.end_delay {
                    if delay <= 1 {
                        self.finish(EndReason::SurvivalFailed);
                    } else {
                        self.end_delay = Some(delay - 1);
                    }
                }
            }
            SessionPhase::SessionEnded => {}
        }
    }

    /// Record (or move) the pending guess marker. Ignored outside of play.
    pub fn place_guess(&mut self, guess: Coordinate) {
        if self.phase == SessionPhase::Playing {
            self.pending_guess = Some(guess);
        }
    }

    /// Resolve the current round with the pending guess. A confirm without
    /// a placed marker counts as a forfeit, same as a timeout.
    pub fn confirm_guess(&mut self) {
        if self.phase != SessionPhase::Playing {
            return;
        }
        let guess = self.pending_guess.take();
        self.resolve(guess);
    }

    fn resolve(&mut self, guess: Option<Coordinate>) {
        let result = resolve_round(
            self.round,
            self.current.clone(),
            guess,
            self.config.difficulty.score_multiplier(),
            self.time_left,
        );

        log::debug!(
            "round {} resolved: {} km off, {} pts",
            result.round,
            result.distance_km,
            result.score
        );

        // A forfeit's 20000 km always exceeds every tolerance, so timed-out
        // survival rounds fail without a separate check
        let survival_failed = self.config.mode == Mode::Survival
            && result.distance_km > self.config.difficulty.survival_tolerance_km();

        self.total_score += result.score;
        self.history.push(result);
        self.pending_guess = None;
        self.phase = SessionPhase::RoundResolved;

        if survival_failed {
            // Leave the failing round on screen briefly before ending
            self.end_delay = Some(SURVIVAL_END_DELAY_SECS);
        }
    }

    /// Move on from a resolved round: either the next round begins, or the
    /// session completes after the final round. Ignored while playing, after
    /// the end, or while a survival termination is pending.
    pub fn advance(&mut self) {
        if self.phase != SessionPhase::RoundResolved || self.end_delay.is_some() {
            return;
        }

        if self.is_last_round() {
            self.finish(EndReason::Complete);
            return;
        }

        self.round += 1;
        self.pending_guess = None;
        if let Some(next) = self.catalog.random_location(&mut self.rng) {
            self.current = next.clone();
        }
        // The speed timer is global and keeps running across rounds
        if self.config.mode != Mode::Speed {
            self.time_left = self.config.difficulty.round_time_secs();
        }
        self.phase = SessionPhase::Playing;
    }

    fn finish(&mut self, reason: EndReason) {
        log::info!(
            "session ended: {} ({} rounds, {} pts)",
            reason.as_str(),
            self.history.len(),
            self.total_score
        );
        self.end_delay = None;
        self.reason = Some(reason);
        self.phase = SessionPhase::SessionEnded;
    }

    /// Collect the terminal payload. `None` until the session has ended.
    pub fn into_results(self) -> Option<SessionResults> {
        let reason = self.reason?;
        Some(SessionResults {
            score: self.total_score,
            rounds: self.history,
            config: self.config,
            reason,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Single-location catalog so tests control exactly what gets shown
    fn catalog_at(lat: f64, lng: f64) -> LocationCatalog {
        LocationCatalog::new(vec![Location {
            lat,
            lng,
            name: "Test Landmark".into(),
            description: String::new(),
            image_url: String::new(),
        }])
    }

    fn config(mode: Mode, difficulty: Difficulty) -> GameConfig {
        GameConfig { mode, difficulty }
    }

    fn session(mode: Mode, difficulty: Difficulty) -> Session {
        Session::new(config(mode, difficulty), catalog_at(0.0, 0.0), 99).unwrap()
    }

    // At the equator one degree of longitude is ~111.2 km, so these guesses
    // land at known distances from (0, 0)
    const GUESS_1446_KM: Coordinate = Coordinate { lat: 0.0, lng: 13.0 };
    const GUESS_2502_KM: Coordinate = Coordinate { lat: 0.0, lng: 22.5 };

    #[test]
    fn test_empty_catalog_refuses_to_start() {
        let err = Session::new(GameConfig::default(), LocationCatalog::default(), 1);
        assert_eq!(err.unwrap_err(), SessionError::EmptyCatalog);
    }

    #[test]
    fn test_classic_five_rounds_then_complete() {
        let mut s = session(Mode::Classic, Difficulty::Medium);

        for expected_round in 1..=5 {
            assert_eq!(s.phase(), SessionPhase::Playing);
            assert_eq!(s.round(), expected_round);
            s.place_guess(Coordinate::new(0.0, 0.0));
            s.confirm_guess();
            assert_eq!(s.phase(), SessionPhase::RoundResolved);
            s.advance();
        }

        assert_eq!(s.phase(), SessionPhase::SessionEnded);
        // No sixth round was ever started
        assert_eq!(s.round(), 5);

        let results = s.into_results().unwrap();
        assert_eq!(results.reason, EndReason::Complete);
        assert_eq!(results.reason.as_str(), "Complete");
        assert_eq!(results.rounds.len(), 5);
        assert_eq!(results.score, 5 * 5000);
    }

    #[test]
    fn test_total_score_matches_history_sum() {
        let mut s = session(Mode::Classic, Difficulty::Hard);

        s.place_guess(GUESS_1446_KM);
        s.confirm_guess();
        s.advance();

        // Round 2 times out with no guess
        for _ in 0..30 {
            s.tick_second();
        }
        assert_eq!(s.phase(), SessionPhase::RoundResolved);
        s.advance();

        s.place_guess(Coordinate::new(0.0, 0.0));
        s.confirm_guess();

        assert_eq!(s.history().len(), 3);
        let sum: u32 = s.history().iter().map(|r| r.score).sum();
        assert_eq!(s.total_score(), sum);
    }

    #[test]
    fn test_classic_timeout_forfeits_round() {
        let mut s = session(Mode::Classic, Difficulty::Medium);
        assert_eq!(s.time_left(), 60);

        // A placed but unconfirmed marker does not survive the timeout
        s.place_guess(GUESS_1446_KM);
        for _ in 0..60 {
            s.tick_second();
        }

        assert_eq!(s.phase(), SessionPhase::RoundResolved);
        let result = s.last_result().unwrap();
        assert!(result.guess.is_none());
        assert_eq!(result.distance_km, 20_000);
        assert_eq!(result.score, 0);
        assert_eq!(s.total_score(), 0);

        // Session continues - classic only forfeits the round
        s.advance();
        assert_eq!(s.phase(), SessionPhase::Playing);
        assert_eq!(s.round(), 2);
        assert_eq!(s.time_left(), 60);
    }

    #[test]
    fn test_speed_global_timer_ends_session() {
        let mut s = session(Mode::Speed, Difficulty::Hard);
        // Speed mode ignores difficulty for timing
        assert_eq!(s.time_left(), 300);

        for _ in 0..300 {
            s.tick_second();
        }

        assert_eq!(s.phase(), SessionPhase::SessionEnded);
        let results = s.into_results().unwrap();
        assert_eq!(results.reason, EndReason::TimeUp);
        assert_eq!(results.reason.as_str(), "Time Up!");
        assert!(results.rounds.is_empty());
    }

    #[test]
    fn test_speed_timer_not_reset_between_rounds() {
        let mut s = session(Mode::Speed, Difficulty::Medium);

        for _ in 0..10 {
            s.tick_second();
        }
        assert_eq!(s.time_left(), 290);

        s.place_guess(Coordinate::new(0.0, 0.0));
        s.confirm_guess();
        s.advance();

        assert_eq!(s.round(), 2);
        assert_eq!(s.time_left(), 290);
    }

    #[test]
    fn test_survival_within_tolerance_continues() {
        let mut s = session(Mode::Survival, Difficulty::Medium);

        // 1446 km is inside the 2000 km medium tolerance
        s.place_guess(GUESS_1446_KM);
        s.confirm_guess();
        assert_eq!(s.phase(), SessionPhase::RoundResolved);

        // No termination pending: display ticks change nothing
        s.tick_second();
        s.tick_second();
        s.tick_second();
        assert_eq!(s.phase(), SessionPhase::RoundResolved);

        s.advance();
        assert_eq!(s.phase(), SessionPhase::Playing);
        assert_eq!(s.round(), 2);
    }

    #[test]
    fn test_survival_beyond_tolerance_ends_after_display_delay() {
        let mut s = session(Mode::Survival, Difficulty::Medium);

        // 2502 km exceeds the 2000 km medium tolerance
        s.place_guess(GUESS_2502_KM);
        s.confirm_guess();

        // The failing round stays visible for the 2-second delay
        assert_eq!(s.phase(), SessionPhase::RoundResolved);
        s.tick_second();
        assert_eq!(s.phase(), SessionPhase::RoundResolved);
        s.tick_second();
        assert_eq!(s.phase(), SessionPhase::SessionEnded);

        let results = s.into_results().unwrap();
        assert_eq!(results.reason, EndReason::SurvivalFailed);
        assert_eq!(results.reason.as_str(), "Survival Failed");
        // The failing round still scored and is part of history
        assert_eq!(results.rounds.len(), 1);
        assert_eq!(results.score, results.rounds[0].score);
        assert!(results.score > 0);
    }

    #[test]
    fn test_survival_timeout_counts_as_failure() {
        let mut s = session(Mode::Survival, Difficulty::Easy);
        assert_eq!(s.time_left(), 120);

        for _ in 0..120 {
            s.tick_second();
        }
        assert_eq!(s.phase(), SessionPhase::RoundResolved);

        s.tick_second();
        s.tick_second();
        assert_eq!(s.phase(), SessionPhase::SessionEnded);
        assert_eq!(
            s.into_results().unwrap().reason,
            EndReason::SurvivalFailed
        );
    }

    #[test]
    fn test_survival_unbounded_rounds() {
        let mut s = session(Mode::Survival, Difficulty::Medium);

        // Survival never completes by round count
        for round in 1..=8 {
            assert_eq!(s.round(), round);
            s.place_guess(Coordinate::new(0.0, 0.0));
            s.confirm_guess();
            assert!(!s.is_last_round());
            s.advance();
        }
        assert_eq!(s.phase(), SessionPhase::Playing);
        assert_eq!(s.round(), 9);
    }

    #[test]
    fn test_advance_ignored_while_survival_end_pending() {
        let mut s = session(Mode::Survival, Difficulty::Hard);

        s.place_guess(GUESS_2502_KM);
        s.confirm_guess();
        s.advance();

        // Still on the failing round, and the termination still fires
        assert_eq!(s.phase(), SessionPhase::RoundResolved);
        s.tick_second();
        s.tick_second();
        assert_eq!(s.phase(), SessionPhase::SessionEnded);
    }

    #[test]
    fn test_confirm_without_marker_is_forfeit() {
        let mut s = session(Mode::Classic, Difficulty::Easy);
        s.confirm_guess();

        let result = s.last_result().unwrap();
        assert!(result.guess.is_none());
        assert_eq!(result.distance_km, 20_000);
        assert_eq!(result.score, 0);
    }

    #[test]
    fn test_actions_ignored_outside_their_phase() {
        let mut s = session(Mode::Classic, Difficulty::Medium);

        // Advance does nothing while playing
        s.advance();
        assert_eq!(s.phase(), SessionPhase::Playing);
        assert_eq!(s.round(), 1);

        s.confirm_guess();
        assert_eq!(s.history().len(), 1);

        // Neither guessing nor a second confirm changes a resolved round
        s.place_guess(Coordinate::new(1.0, 1.0));
        assert!(s.pending_guess().is_none());
        s.confirm_guess();
        assert_eq!(s.history().len(), 1);
    }

    #[test]
    fn test_reveal_answer_follows_phase() {
        let mut s = session(Mode::Classic, Difficulty::Medium);
        assert!(!s.reveal_answer());
        s.confirm_guess();
        assert!(s.reveal_answer());
    }

    #[test]
    fn test_round_timer_resets_per_round_in_classic() {
        let mut s = session(Mode::Classic, Difficulty::Hard);

        for _ in 0..12 {
            s.tick_second();
        }
        assert_eq!(s.time_left(), 18);
        s.place_guess(Coordinate::new(0.0, 0.0));
        s.confirm_guess();
        s.advance();
        assert_eq!(s.time_left(), 30);
    }

    #[test]
    fn test_results_serialize_with_display_reason() {
        let mut s = session(Mode::Speed, Difficulty::Medium);
        for _ in 0..300 {
            s.tick_second();
        }
        let json = serde_json::to_value(s.into_results().unwrap()).unwrap();
        assert_eq!(json["reason"], "Time Up!");
        assert_eq!(json["config"]["mode"], "speed");
        assert_eq!(json["config"]["difficulty"], "medium");
    }

    #[test]
    fn test_mode_and_difficulty_round_trip() {
        for mode in [Mode::Classic, Mode::Speed, Mode::Survival] {
            assert_eq!(Mode::from_str(mode.as_str()), Some(mode));
        }
        for difficulty in [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard] {
            assert_eq!(Difficulty::from_str(difficulty.as_str()), Some(difficulty));
        }
        assert_eq!(Mode::from_str("ranked"), None);
    }
}
