//! Flight Lifecycle
//!
//! TigerStyle: a strictly forward state machine.
//!
//! ```text
//! PENDING ──confirm──▶ CONFIRMED ──launch──▶ SHIPPED ──▶ DELIVERED ───────▶ COMPLETE
//!    │                                          └──────▶ MISSION_FAILURE ─▶ COMPLETE
//!    └──cancel / timeout──────────────────────────────────────────────────▶ COMPLETE
//! ```
//!
//! The outcome and every milestone time are drawn once at confirm and
//! stored in a [`MissionPlan`]. After that the flight only moves when
//! [`Flight::step`] sees that simulated time has passed a milestone.

use serde::{Deserialize, Serialize};

use crate::constants::{NOTE_DELIVERED, NOTE_FAILED, NOTE_TIMED_OUT};
use crate::dst::DeterministicRng;
use crate::hospital::HospitalId;
use crate::inventory::ProductId;

/// Flight identifier, assigned sequentially from 1.
pub type FlightId = u64;

/// Lifecycle state, in forward order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FlightState {
    Pending,
    Confirmed,
    Shipped,
    Delivered,
    MissionFailure,
    Complete,
}

impl FlightState {
    /// Wire name.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Confirmed => "CONFIRMED",
            Self::Shipped => "SHIPPED",
            Self::Delivered => "DELIVERED",
            Self::MissionFailure => "MISSION_FAILURE",
            Self::Complete => "COMPLETE",
        }
    }

    /// Whether no further transition is possible.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Complete)
    }
}

impl std::fmt::Display for FlightState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Fate and timing of a flight, fixed at confirm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MissionPlan {
    pub mission_failure: bool,
    pub launch_at: i64,
    pub delivery_at: i64,
    /// Set only when `mission_failure`
    pub failure_at: Option<i64>,
    pub return_at: i64,
}

impl MissionPlan {
    /// Draw a plan for a flight confirmed at `now`.
    ///
    /// Draw order: outcome (skipped when overridden), launch delay, then the
    /// failure point.
    pub fn draw(
        now: i64,
        flight_time_secs: i64,
        fail_override: Option<bool>,
        failure_rate: f64,
        launch_delay_secs_max: i64,
        rng: &mut DeterministicRng,
    ) -> Self {
        let mission_failure = fail_override.unwrap_or_else(|| rng.next_bool(failure_rate));

        let launch_at = now.saturating_add(rng.next_in_range(0, launch_delay_secs_max));
        let delivery_at = launch_at.saturating_add(flight_time_secs);

        if mission_failure {
            // The trip home takes as long as the leg flown before failing
            let failure_at = rng.next_in_range(launch_at, delivery_at);
            Self {
                mission_failure,
                launch_at,
                delivery_at,
                failure_at: Some(failure_at),
                return_at: failure_at.saturating_add(failure_at - launch_at),
            }
        } else {
            Self {
                mission_failure,
                launch_at,
                delivery_at,
                failure_at: None,
                return_at: delivery_at.saturating_add(flight_time_secs),
            }
        }
    }
}

/// A delivery mission. Kept after completion as an audit record.
#[derive(Debug, Clone, PartialEq)]
pub struct Flight {
    pub id: FlightId,
    pub state: FlightState,
    pub hospital_id: HospitalId,
    /// Reserved products; repeats carry several units
    pub product_ids: Vec<ProductId>,
    pub delivered: bool,
    pub note: Option<String>,
    pub created_at: i64,
    /// Set exactly once, at confirm
    pub plan: Option<MissionPlan>,
}

impl Flight {
    /// A new PENDING flight.
    #[must_use]
    pub fn new(
        id: FlightId,
        hospital_id: HospitalId,
        product_ids: Vec<ProductId>,
        created_at: i64,
    ) -> Self {
        Self {
            id,
            state: FlightState::Pending,
            hospital_id,
            product_ids,
            delivered: false,
            note: None,
            created_at,
            plan: None,
        }
    }

    /// Move PENDING to CONFIRMED with its plan.
    ///
    /// # Panics
    /// Panics unless PENDING without a plan.
    pub fn confirm(&mut self, plan: MissionPlan) {
        // Preconditions
        assert_eq!(self.state, FlightState::Pending, "can only confirm pending flights");
        assert!(self.plan.is_none(), "mission plan already set");

        self.plan = Some(plan);
        self.state = FlightState::Confirmed;
    }

    /// Move to COMPLETE with a note.
    ///
    /// # Panics
    /// Panics if already COMPLETE.
    pub fn complete(&mut self, note: &str) {
        assert!(!self.state.is_terminal(), "flight {} already complete", self.id);

        self.state = FlightState::Complete;
        self.note = Some(note.to_string());
    }

    /// Whether products go back to stock on completion.
    #[must_use]
    pub fn needs_restock(&self) -> bool {
        self.state.is_terminal() && !self.delivered
    }

    /// Take at most one transition due at `now`.
    ///
    /// Every milestone fires only once `now` is strictly past it.
    ///
    /// # Returns
    /// The new state, or `None` if nothing was due.
    pub fn step(&mut self, now: i64, confirm_timeout_secs: i64) -> Option<FlightState> {
        if self.state == FlightState::Pending {
            if now > self.created_at.saturating_add(confirm_timeout_secs) {
                self.complete(NOTE_TIMED_OUT);
                return Some(self.state);
            }
            return None;
        }

        let plan = self.plan?;
        let next = match self.state {
            FlightState::Pending | FlightState::Complete => None,
            FlightState::Confirmed => (now > plan.launch_at).then_some(FlightState::Shipped),
            FlightState::Shipped => match plan.failure_at {
                Some(failure_at) if plan.mission_failure => {
                    (now > failure_at).then_some(FlightState::MissionFailure)
                }
                _ => (now > plan.delivery_at).then_some(FlightState::Delivered),
            },
            FlightState::Delivered | FlightState::MissionFailure => {
                (now > plan.return_at).then_some(FlightState::Complete)
            }
        }?;

        match next {
            FlightState::Delivered => {
                self.delivered = true;
                self.state = next;
            }
            FlightState::Complete if self.delivered => self.complete(NOTE_DELIVERED),
            FlightState::Complete => self.complete(NOTE_FAILED),
            _ => self.state = next,
        }

        Some(self.state)
    }

    /// External view with ETAs relative to `now`.
    #[must_use]
    pub fn view(&self, now: i64) -> FlightView {
        let delivery_eta_s = match (self.state, self.plan) {
            (FlightState::Shipped, Some(plan)) => Some(plan.delivery_at.saturating_sub(now)),
            _ => None,
        };
        let return_eta_s = match (self.state, self.plan) {
            (FlightState::Delivered | FlightState::MissionFailure, Some(plan)) => {
                Some(plan.return_at.saturating_sub(now))
            }
            _ => None,
        };

        FlightView {
            id: self.id,
            state: self.state,
            hospital: self.hospital_id,
            products: self.product_ids.clone(),
            delivered: self.delivered,
            note: self.note.clone(),
            delivery_eta_s,
            return_eta_s,
        }
    }
}

/// What clients see of a flight.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlightView {
    pub id: FlightId,
    pub state: FlightState,
    pub hospital: HospitalId,
    pub products: Vec<ProductId>,
    pub delivered: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    /// Seconds until delivery, while SHIPPED
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delivery_eta_s: Option<i64>,
    /// Seconds until return, while DELIVERED or MISSION_FAILURE
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub return_eta_s: Option<i64>,
}
