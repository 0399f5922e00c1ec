//! Errors
//!
//! TigerStyle: one error type for every rejected engine call.
//!
//! No variant is fatal. The engine stays usable after any of them.

use crate::flight::{FlightId, FlightState};
use crate::hospital::HospitalId;
use crate::inventory::ProductId;

/// Result alias for engine operations.
pub type NestResult<T> = Result<T, NestError>;

/// Errors surfaced by the simulator.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum NestError {
    /// Malformed input shape or values
    #[error("{0}")]
    Validation(String),

    /// Unknown hospital id
    #[error("No such hospital id {0}")]
    HospitalNotFound(HospitalId),

    /// One or more unknown product ids, in request order
    #[error("No such products ids {0:?}")]
    ProductsNotFound(Vec<ProductId>),

    /// Unknown flight id
    #[error("No such flight {0}")]
    FlightNotFound(FlightId),

    /// Combined product mass over the payload limit
    #[error("Combined weight of products ({mass_g} grams) exceeds threshold: {max_g} grams")]
    CapacityExceeded { mass_g: f64, max_g: f64 },

    /// Products that ran out of stock, once per missing unit
    #[error("Insufficient inventory to fill order for: {0:?}")]
    InsufficientStock(Vec<ProductId>),

    /// Cancel or confirm attempted outside PENDING
    #[error("Only PENDING flight can be {action} (flight {id} is {state})")]
    InvalidStateTransition {
        id: FlightId,
        state: FlightState,
        action: &'static str,
    },

    /// Argument out of range, e.g. a negative time step
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}
