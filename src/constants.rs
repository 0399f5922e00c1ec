//! Constants
//!
//! TigerStyle: every limit and tunable default has a name and a unit.

/// Maximum combined product mass a drone can carry, in grams
pub const PAYLOAD_MASS_G_MAX: f64 = 1800.0;

/// Cruise speed used to derive hospital flight times, in meters per second
pub const FLIGHT_SPEED_MPS: f64 = 30.0;

/// How long a flight may stay PENDING before it times out, in seconds
pub const CONFIRM_TIMEOUT_SECS: i64 = 5 * 60;

/// Probability that a confirmed flight is predetermined to fail
pub const MISSION_FAILURE_RATE: f64 = 0.1;

/// Upper bound of the random wait between confirm and launch, in seconds
pub const LAUNCH_DELAY_SECS_MAX: i64 = 5 * 60;

/// Environment variable holding a fixed RNG seed
pub const DST_SEED_ENV: &str = "DST_SEED";

/// Note set when a PENDING flight is never confirmed
pub const NOTE_TIMED_OUT: &str = "Flight Timed Out";

/// Note set when a PENDING flight is canceled
pub const NOTE_CANCELED: &str = "Flight Canceled";

/// Note set when a delivered flight returns
pub const NOTE_DELIVERED: &str = "Flight delivered successfully";

/// Note set when a failed flight returns
pub const NOTE_FAILED: &str = "Flight failed to deliver";
