//! SimConfig - Simulation Tunables
//!
//! TigerStyle: explicit configuration, validated once, logged seed.

use crate::constants::{
    CONFIRM_TIMEOUT_SECS, DST_SEED_ENV, FLIGHT_SPEED_MPS, LAUNCH_DELAY_SECS_MAX,
    MISSION_FAILURE_RATE, PAYLOAD_MASS_G_MAX,
};
use crate::error::{NestError, NestResult};

use super::clock::ClockMode;

/// Configuration for a simulated nest.
#[derive(Debug, Clone, PartialEq)]
pub struct SimConfig {
    /// Seed for mission outcome and timing draws
    pub seed: u64,
    /// Maximum combined payload mass in grams
    pub payload_mass_g_max: f64,
    /// Cruise speed in meters per second
    pub flight_speed_mps: f64,
    /// Seconds a flight may stay PENDING
    pub confirm_timeout_secs: i64,
    /// Probability of a predetermined mission failure
    pub mission_failure_rate: f64,
    /// Maximum random launch delay in seconds
    pub launch_delay_secs_max: i64,
    /// Clock time source
    pub clock_mode: ClockMode,
}

impl SimConfig {
    /// Defaults with a fresh random seed.
    #[must_use]
    pub fn new() -> Self {
        Self::with_seed(rand::random())
    }

    /// Defaults with the given seed and a manual clock.
    #[must_use]
    pub fn with_seed(seed: u64) -> Self {
        Self {
            seed,
            payload_mass_g_max: PAYLOAD_MASS_G_MAX,
            flight_speed_mps: FLIGHT_SPEED_MPS,
            confirm_timeout_secs: CONFIRM_TIMEOUT_SECS,
            mission_failure_rate: MISSION_FAILURE_RATE,
            launch_delay_secs_max: LAUNCH_DELAY_SECS_MAX,
            clock_mode: ClockMode::Manual,
        }
    }

    /// Defaults seeded from `DST_SEED` when set, otherwise random.
    ///
    /// # Errors
    /// Returns `InvalidArgument` if `DST_SEED` is set but not a `u64`.
    pub fn from_env() -> NestResult<Self> {
        let config = match std::env::var(DST_SEED_ENV) {
            Ok(raw) => {
                let seed = raw.trim().parse::<u64>().map_err(|e| {
                    NestError::InvalidArgument(format!("{DST_SEED_ENV}={raw:?}: {e}"))
                })?;
                Self::with_seed(seed)
            }
            Err(_) => Self::new(),
        };
        tracing::info!(seed = config.seed, "DST seed (replay with {}={})", DST_SEED_ENV, config.seed);
        Ok(config)
    }

    /// Set the clock mode.
    #[must_use]
    pub fn with_clock_mode(mut self, clock_mode: ClockMode) -> Self {
        self.clock_mode = clock_mode;
        self
    }

    /// Set the mission failure rate.
    #[must_use]
    pub fn with_failure_rate(mut self, rate: f64) -> Self {
        self.mission_failure_rate = rate;
        self
    }

    /// Set the PENDING timeout.
    #[must_use]
    pub fn with_confirm_timeout_secs(mut self, secs: i64) -> Self {
        self.confirm_timeout_secs = secs;
        self
    }

    /// Set the maximum launch delay.
    #[must_use]
    pub fn with_launch_delay_secs_max(mut self, secs: i64) -> Self {
        self.launch_delay_secs_max = secs;
        self
    }

    /// Set the payload limit.
    #[must_use]
    pub fn with_payload_mass_g_max(mut self, grams: f64) -> Self {
        self.payload_mass_g_max = grams;
        self
    }

    /// Set the cruise speed.
    #[must_use]
    pub fn with_flight_speed_mps(mut self, mps: f64) -> Self {
        self.flight_speed_mps = mps;
        self
    }

    /// Check that every tunable is usable.
    ///
    /// # Errors
    /// Returns `InvalidArgument` naming the first bad field.
    pub fn validate(&self) -> NestResult<()> {
        if !(0.0..=1.0).contains(&self.mission_failure_rate) {
            return Err(invalid("mission_failure_rate", self.mission_failure_rate));
        }
        if !(self.flight_speed_mps.is_finite() && self.flight_speed_mps > 0.0) {
            return Err(invalid("flight_speed_mps", self.flight_speed_mps));
        }
        if !(self.payload_mass_g_max.is_finite() && self.payload_mass_g_max > 0.0) {
            return Err(invalid("payload_mass_g_max", self.payload_mass_g_max));
        }
        if self.confirm_timeout_secs < 0 {
            return Err(invalid("confirm_timeout_secs", self.confirm_timeout_secs));
        }
        if self.launch_delay_secs_max < 0 {
            return Err(invalid("launch_delay_secs_max", self.launch_delay_secs_max));
        }
        Ok(())
    }
}

impl Default for SimConfig {
    fn default() -> Self {
        Self::new()
    }
}

fn invalid(field: &str, value: impl std::fmt::Display) -> NestError {
    NestError::InvalidArgument(format!("{field} out of range: {value}"))
}
