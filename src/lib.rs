//! Nest Sim - Drone Delivery Dispatch Simulator
//!
//! TigerStyle simulation of a drone nest: flights are requested, confirmed,
//! launched, and either deliver or fail, all on simulated time.
//!
//! # Philosophy
//!
//! A client under test should see realistic mission timing and stochastic
//! failure without real hardware, and every run should be replayable:
//! 1. Time is a [`SimClock`] that moves only when told to (or with the wall)
//! 2. Randomness is a seeded [`DeterministicRng`]
//! 3. Flights advance only when a read pulls a tick
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │               HTTP API (axum)               │
//! ├─────────────────────────────────────────────┤
//! │  NestSim                │ Mutex boundary    │
//! │  ├─ Flight lifecycle    │ forward-only FSM  │
//! │  ├─ Tick coordinator    │ pull-based        │
//! │  ├─ Inventory ledger    │ reserve / release │
//! │  └─ Hospital directory  │ read-only         │
//! ├─────────────────────────────────────────────┤
//! │  DST: SimClock, DeterministicRng, SimConfig │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust
//! use nest_sim::{FlightState, HospitalRecord, NestSim, Product, SimConfig};
//!
//! let mut sim = NestSim::new(
//!     SimConfig::with_seed(42),
//!     vec![HospitalRecord { id: 1, name: "Bigogwe".into(), distance_m: 600.0 }],
//!     vec![Product { id: 1, name: "RBC A+ Adult".into(), mass_g: 100.0, quantity: 1 }],
//! )
//! .unwrap();
//!
//! let flight = sim.create_flight(1, vec![1]).unwrap();
//! sim.confirm_flight(flight.id, Some(false)).unwrap();
//! sim.step_time(1_000).unwrap();
//!
//! let view = sim.get_flight(flight.id).unwrap();
//! assert_eq!(view.state, FlightState::Complete);
//! assert!(view.delivered);
//! ```

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod api;
pub mod constants;
pub mod dst;
pub mod engine;
pub mod error;
pub mod flight;
pub mod hospital;
pub mod inventory;
pub mod seed;

// Re-export common types
pub use dst::{ClockMode, DeterministicRng, SimClock, SimConfig};
pub use engine::{new_shared, NestSim, SharedNestSim, TransitionEvent};
pub use error::{NestError, NestResult};
pub use flight::{Flight, FlightId, FlightState, FlightView, MissionPlan};
pub use hospital::{HospitalDirectory, HospitalId, HospitalRecord, HospitalView};
pub use inventory::{InventoryLedger, Product, ProductId, ProductView};
pub use seed::SeedError;
