//! Tick Coordinator
//!
//! Pull-based simulation step. There is no background timer: flights move
//! only when a read calls [`NestSim::tick`].

use super::NestSim;
use crate::flight::{FlightId, FlightState};

/// One state change observed during a tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransitionEvent {
    pub flight_id: FlightId,
    pub from: FlightState,
    pub to: FlightState,
    /// Simulated time of the tick
    pub at: i64,
}

impl NestSim {
    /// Bring every non-terminal flight up to the current simulated time.
    ///
    /// Flights are visited in creation order. Each flight steps one
    /// transition at a time until nothing more is due, so no state is ever
    /// skipped but a single read is enough to catch up.
    ///
    /// # Returns
    /// Every transition taken, in order.
    pub fn tick(&mut self) -> Vec<TransitionEvent> {
        let now = self.clock.now_secs();
        let confirm_timeout_secs = self.config.confirm_timeout_secs;
        let mut events = Vec::new();

        for flight in self.flights.values_mut().filter(|f| !f.state.is_terminal()) {
            loop {
                let from = flight.state;
                let Some(to) = flight.step(now, confirm_timeout_secs) else {
                    break;
                };

                // Postcondition
                debug_assert!(to > from, "flight state must only move forward");

                tracing::debug!(flight_id = flight.id, %from, %to, now, "flight transition");
                events.push(TransitionEvent {
                    flight_id: flight.id,
                    from,
                    to,
                    at: now,
                });

                if to.is_terminal() {
                    if flight.needs_restock() {
                        self.inventory.release(&flight.product_ids);
                    }
                    tracing::info!(
                        flight_id = flight.id,
                        note = flight.note.as_deref().unwrap_or_default(),
                        restocked = !flight.delivered,
                        "flight complete"
                    );
                    break;
                }
            }
        }

        if !events.is_empty() {
            tracing::debug!(now, transitions = events.len(), "tick");
        }
        events
    }
}

#[cfg(test)]
mod tests {
    use crate::dst::SimConfig;
    use crate::engine::NestSim;
    use crate::flight::FlightState;
    use crate::hospital::HospitalRecord;
    use crate::inventory::Product;

    fn sim() -> NestSim {
        NestSim::new(
            SimConfig::with_seed(9),
            vec![HospitalRecord {
                id: 1,
                name: "Bigogwe".to_string(),
                distance_m: 600.0,
            }],
            vec![Product {
                id: 1,
                name: "RBC A+ Adult".to_string(),
                mass_g: 100.0,
                quantity: 5,
            }],
        )
        .unwrap()
    }

    #[test]
    fn test_tick_without_time_passing_is_quiet() {
        let mut sim = sim();
        sim.create_flight(1, vec![1]).unwrap();

        assert!(sim.tick().is_empty());
    }

    #[test]
    fn test_one_tick_catches_up_through_every_state() {
        let mut sim = sim();
        let id = sim.create_flight(1, vec![1]).unwrap().id;
        sim.confirm_flight(id, Some(false)).unwrap();
        sim.step_time(10_000).unwrap();

        let events = sim.tick();

        let path: Vec<_> = events.iter().map(|e| e.to).collect();
        assert_eq!(
            path,
            vec![
                FlightState::Shipped,
                FlightState::Delivered,
                FlightState::Complete
            ]
        );
        assert_eq!(events[0].from, FlightState::Confirmed);
        assert!(events.iter().all(|e| e.flight_id == id && e.at == 10_000));
        assert!(sim.tick().is_empty());
    }

    #[test]
    fn test_tick_visits_in_creation_order() {
        let mut sim = sim();
        let a = sim.create_flight(1, vec![1]).unwrap().id;
        let b = sim.create_flight(1, vec![1]).unwrap().id;
        sim.step_time(301).unwrap();

        let events = sim.tick();

        assert_eq!(events.len(), 2);
        assert_eq!(events[0].flight_id, a);
        assert_eq!(events[1].flight_id, b);
        assert!(events.iter().all(|e| e.to == FlightState::Complete));
    }

    #[test]
    fn test_completed_flights_are_skipped() {
        let mut sim = sim();
        let id = sim.create_flight(1, vec![1]).unwrap().id;
        sim.cancel_flight(id).unwrap();
        sim.step_time(1_000).unwrap();

        assert!(sim.tick().is_empty());
        assert_eq!(sim.list_inventory()[0].quantity, 5);
    }
}
