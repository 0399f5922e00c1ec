//! DST - Deterministic Simulation Testing
//!
//! Injectable time and randomness for the flight engine.
//!
//! Nothing in the engine reads the wall clock or a global RNG directly.
//! A test driver builds a [`SimClock`] in manual mode and a seeded
//! [`DeterministicRng`], then steps time explicitly:
//!
//! ```rust
//! use nest_sim::dst::{ClockMode, SimClock};
//!
//! let mut clock = SimClock::new(ClockMode::Manual);
//! clock.advance_secs(30).unwrap();
//! assert_eq!(clock.now_secs(), 30);
//! ```
//!
//! Run with explicit seed for reproducibility:
//! ```bash
//! DST_SEED=12345 nest-sim --manual-clock
//! ```

mod clock;
mod config;
mod rng;

pub use clock::{ClockMode, SimClock};
pub use config::SimConfig;
pub use rng::DeterministicRng;
