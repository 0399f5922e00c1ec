//! Flight Lifecycle Engine
//!
//! TigerStyle: one owner for clock, randomness, registries and flights.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────┐
//! │                       NestSim                        │
//! ├──────────────────────────────────────────────────────┤
//! │  SimClock          │ stepped explicitly              │
//! │  DeterministicRng  │ mission outcome and timing      │
//! │  HospitalDirectory │ read-only                       │
//! │  InventoryLedger   │ reserve / release               │
//! │  flights           │ BTreeMap, creation order        │
//! └──────────────────────────────────────────────────────┘
//! ```
//!
//! Mutations (create, cancel, confirm, step time) act immediately. Reads
//! that show flight or stock state run a [tick](NestSim::tick) first.
//!
//! `NestSim` assumes a single serialized caller. Share it behind a mutex
//! (see [`SharedNestSim`]).

mod tick;

use std::collections::BTreeMap;
use std::sync::Arc;

use tokio::sync::Mutex;

use crate::constants::NOTE_CANCELED;
use crate::dst::{DeterministicRng, SimClock, SimConfig};
use crate::error::{NestError, NestResult};
use crate::flight::{Flight, FlightId, FlightState, FlightView, MissionPlan};
use crate::hospital::{HospitalDirectory, HospitalId, HospitalRecord, HospitalView};
use crate::inventory::{InventoryLedger, Product, ProductId, ProductView};

pub use tick::TransitionEvent;

/// The simulated nest.
#[derive(Debug)]
pub struct NestSim {
    config: SimConfig,
    clock: SimClock,
    rng: DeterministicRng,
    hospitals: HospitalDirectory,
    inventory: InventoryLedger,
    flights: BTreeMap<FlightId, Flight>,
    next_flight_id: FlightId,
}

impl NestSim {
    /// Build a nest from config and seed records.
    ///
    /// # Errors
    /// Returns `InvalidArgument` for bad config and `Validation` for bad records.
    pub fn new(
        config: SimConfig,
        hospitals: Vec<HospitalRecord>,
        products: Vec<Product>,
    ) -> NestResult<Self> {
        config.validate()?;

        let hospitals = HospitalDirectory::load(hospitals, config.flight_speed_mps)?;
        let inventory = InventoryLedger::load(products, config.payload_mass_g_max)?;

        tracing::info!(
            seed = config.seed,
            clock = ?config.clock_mode,
            hospitals = hospitals.len(),
            products = inventory.list().len(),
            "nest ready"
        );

        Ok(Self {
            clock: SimClock::new(config.clock_mode),
            rng: DeterministicRng::new(config.seed),
            config,
            hospitals,
            inventory,
            flights: BTreeMap::new(),
            next_flight_id: 1,
        })
    }

    // =========================================================================
    // Flights
    // =========================================================================

    /// Request a flight, reserving one unit per listed product.
    ///
    /// # Errors
    /// - `Validation` for an empty product list
    /// - `HospitalNotFound`, `ProductsNotFound`
    /// - `CapacityExceeded`, `InsufficientStock`
    ///
    /// No flight is recorded and no stock moves on error.
    pub fn create_flight(
        &mut self,
        hospital_id: HospitalId,
        product_ids: Vec<ProductId>,
    ) -> NestResult<FlightView> {
        if product_ids.is_empty() {
            return Err(NestError::Validation(
                "flight must carry at least one product".to_string(),
            ));
        }
        if self.hospitals.get(hospital_id).is_none() {
            return Err(NestError::HospitalNotFound(hospital_id));
        }

        let mass_g = self.inventory.reserve(&product_ids)?;

        let now = self.clock.now_secs();
        let id = self.next_flight_id;
        self.next_flight_id += 1;

        let flight = Flight::new(id, hospital_id, product_ids, now);
        let view = flight.view(now);
        self.flights.insert(id, flight);

        tracing::info!(flight_id = id, hospital_id, mass_g, now, "flight created");
        Ok(view)
    }

    /// Cancel a PENDING flight and restock its products.
    ///
    /// # Errors
    /// `FlightNotFound`, or `InvalidStateTransition` outside PENDING.
    pub fn cancel_flight(&mut self, id: FlightId) -> NestResult<()> {
        let flight = self.pending_flight_mut(id, "canceled")?;

        flight.complete(NOTE_CANCELED);
        let product_ids = flight.product_ids.clone();
        self.inventory.release(&product_ids);

        tracing::info!(flight_id = id, "flight canceled");
        Ok(())
    }

    /// Confirm a PENDING flight, fixing its fate and timing.
    ///
    /// `fail_override` forces the mission outcome; otherwise it is drawn
    /// with the configured failure rate.
    ///
    /// # Errors
    /// `FlightNotFound`, `InvalidStateTransition` outside PENDING, or
    /// `HospitalNotFound` if the destination vanished.
    pub fn confirm_flight(&mut self, id: FlightId, fail_override: Option<bool>) -> NestResult<()> {
        let now = self.clock.now_secs();
        let hospital_id = self.pending_flight_mut(id, "confirmed")?.hospital_id;
        let flight_time_secs = self
            .hospitals
            .get(hospital_id)
            .ok_or(NestError::HospitalNotFound(hospital_id))?
            .flight_time_secs;

        let plan = MissionPlan::draw(
            now,
            flight_time_secs,
            fail_override,
            self.config.mission_failure_rate,
            self.config.launch_delay_secs_max,
            &mut self.rng,
        );

        self.pending_flight_mut(id, "confirmed")?.confirm(plan);

        tracing::info!(
            flight_id = id,
            now,
            launch_at = plan.launch_at,
            overridden = fail_override.is_some(),
            "flight confirmed"
        );
        Ok(())
    }

    /// Current view of a flight. Ticks first.
    ///
    /// # Errors
    /// `FlightNotFound`.
    pub fn get_flight(&mut self, id: FlightId) -> NestResult<FlightView> {
        self.tick();
        let now = self.clock.now_secs();
        self.flights
            .get(&id)
            .map(|flight| flight.view(now))
            .ok_or(NestError::FlightNotFound(id))
    }

    /// Every flight ever requested, in creation order. Ticks first.
    pub fn list_flights(&mut self) -> Vec<FlightView> {
        self.tick();
        let now = self.clock.now_secs();
        self.flights.values().map(|flight| flight.view(now)).collect()
    }

    /// Hidden state of a flight, including its mission plan. Does not tick.
    #[must_use]
    pub fn flight(&self, id: FlightId) -> Option<&Flight> {
        self.flights.get(&id)
    }

    fn pending_flight_mut(&mut self, id: FlightId, action: &'static str) -> NestResult<&mut Flight> {
        let flight = self
            .flights
            .get_mut(&id)
            .ok_or(NestError::FlightNotFound(id))?;

        if flight.state != FlightState::Pending {
            return Err(NestError::InvalidStateTransition {
                id,
                state: flight.state,
                action,
            });
        }
        Ok(flight)
    }

    // =========================================================================
    // Registries
    // =========================================================================

    /// All hospitals.
    #[must_use]
    pub fn list_hospitals(&self) -> Vec<HospitalView> {
        self.hospitals.list()
    }

    /// Current stock. Ticks first, since completions may restock.
    pub fn list_inventory(&mut self) -> Vec<ProductView> {
        self.tick();
        self.inventory.list()
    }

    // =========================================================================
    // Time
    // =========================================================================

    /// Simulated seconds since start.
    #[must_use]
    pub fn now(&self) -> i64 {
        self.clock.now_secs()
    }

    /// Step simulated time forward. Flights react on the next read.
    ///
    /// # Errors
    /// `InvalidArgument` for a negative step.
    pub fn step_time(&mut self, delta_secs: i64) -> NestResult<i64> {
        let now = self.clock.advance_secs(delta_secs)?;
        tracing::debug!(delta_secs, now, "time stepped");
        Ok(now)
    }
}

/// Engine behind an explicit mutual-exclusion boundary.
pub type SharedNestSim = Arc<Mutex<NestSim>>;

/// Wrap a nest for shared use.
pub fn new_shared(sim: NestSim) -> SharedNestSim {
    Arc::new(Mutex::new(sim))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sim() -> NestSim {
        NestSim::new(
            SimConfig::with_seed(42),
            vec![HospitalRecord {
                id: 1,
                name: "Bigogwe".to_string(),
                distance_m: 600.0,
            }],
            vec![Product {
                id: 1,
                name: "RBC A+ Adult".to_string(),
                mass_g: 100.0,
                quantity: 2,
            }],
        )
        .unwrap()
    }

    #[test]
    fn test_create_assigns_sequential_ids() {
        let mut sim = sim();

        let a = sim.create_flight(1, vec![1]).unwrap();
        let b = sim.create_flight(1, vec![1]).unwrap();

        assert_eq!(a.id, 1);
        assert_eq!(b.id, 2);
        assert_eq!(a.state, FlightState::Pending);
        assert_eq!(sim.list_inventory()[0].quantity, 0);
    }

    #[test]
    fn test_create_rejects_unknown_hospital_before_reserving() {
        let mut sim = sim();

        let err = sim.create_flight(9, vec![1]).unwrap_err();

        assert_eq!(err, NestError::HospitalNotFound(9));
        assert_eq!(sim.list_inventory()[0].quantity, 2);
        assert!(sim.list_flights().is_empty());
    }

    #[test]
    fn test_create_rejects_empty_products() {
        let mut sim = sim();
        assert!(matches!(
            sim.create_flight(1, vec![]),
            Err(NestError::Validation(_))
        ));
    }

    #[test]
    fn test_cancel_restocks_once() {
        let mut sim = sim();
        let flight = sim.create_flight(1, vec![1, 1]).unwrap();
        assert_eq!(sim.list_inventory()[0].quantity, 0);

        sim.cancel_flight(flight.id).unwrap();

        let view = sim.get_flight(flight.id).unwrap();
        assert_eq!(view.state, FlightState::Complete);
        assert_eq!(view.note.as_deref(), Some(NOTE_CANCELED));
        assert_eq!(sim.list_inventory()[0].quantity, 2);

        let err = sim.cancel_flight(flight.id).unwrap_err();
        assert!(matches!(err, NestError::InvalidStateTransition { .. }));
        assert_eq!(sim.list_inventory()[0].quantity, 2);
    }

    #[test]
    fn test_confirm_only_from_pending() {
        let mut sim = sim();
        let flight = sim.create_flight(1, vec![1]).unwrap();

        sim.confirm_flight(flight.id, Some(false)).unwrap();
        let plan = sim.flight(flight.id).unwrap().plan.unwrap();

        let err = sim.confirm_flight(flight.id, Some(true)).unwrap_err();
        assert!(matches!(
            err,
            NestError::InvalidStateTransition {
                state: FlightState::Confirmed,
                ..
            }
        ));
        assert!(sim.cancel_flight(flight.id).is_err());

        // Plan untouched by the rejected calls
        assert_eq!(sim.flight(flight.id).unwrap().plan, Some(plan));
    }

    #[test]
    fn test_unknown_flight() {
        let mut sim = sim();
        assert_eq!(sim.get_flight(5).unwrap_err(), NestError::FlightNotFound(5));
        assert_eq!(sim.cancel_flight(5).unwrap_err(), NestError::FlightNotFound(5));
        assert_eq!(
            sim.confirm_flight(5, None).unwrap_err(),
            NestError::FlightNotFound(5)
        );
    }

    #[test]
    fn test_step_time() {
        let mut sim = sim();

        assert_eq!(sim.step_time(10).unwrap(), 10);
        assert!(matches!(
            sim.step_time(-1),
            Err(NestError::InvalidArgument(_))
        ));
        assert_eq!(sim.now(), 10);
    }

    #[test]
    fn test_step_time_overflow_rejected() {
        let mut sim = sim();

        assert_eq!(sim.step_time(i64::MAX).unwrap(), i64::MAX);
        assert!(matches!(
            sim.step_time(1),
            Err(NestError::InvalidArgument(_))
        ));
        assert_eq!(sim.now(), i64::MAX);
    }

    #[test]
    fn test_flights_near_end_of_time() {
        let mut sim = sim();
        sim.step_time(i64::MAX - 10).unwrap();

        let a = sim.create_flight(1, vec![1]).unwrap().id;
        let b = sim.create_flight(1, vec![1]).unwrap().id;
        assert_eq!(sim.get_flight(a).unwrap().state, FlightState::Pending);

        sim.confirm_flight(b, Some(false)).unwrap();
        sim.step_time(10).unwrap();

        // Deadlines saturate at the last representable second
        assert_eq!(sim.get_flight(a).unwrap().state, FlightState::Pending);
        let state = sim.get_flight(b).unwrap().state;
        assert!(matches!(state, FlightState::Confirmed | FlightState::Shipped));
        assert_eq!(sim.now(), i64::MAX);
    }

    #[test]
    fn test_bad_config_rejected() {
        let result = NestSim::new(SimConfig::with_seed(1).with_failure_rate(-0.5), vec![], vec![]);
        assert!(matches!(result, Err(NestError::InvalidArgument(_))));
    }
}
