//! Hospital Directory
//!
//! Static delivery destinations. Each hospital's one-way flight time is
//! derived once from its distance and the cruise speed, then never changes.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{NestError, NestResult};

/// Hospital identifier.
pub type HospitalId = i64;

/// Seed record for a hospital.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HospitalRecord {
    pub id: HospitalId,
    pub name: String,
    pub distance_m: f64,
}

/// A delivery destination.
#[derive(Debug, Clone, PartialEq)]
pub struct Hospital {
    pub id: HospitalId,
    pub name: String,
    pub distance_m: f64,
    /// One-way flight time, `floor(distance_m / speed)`
    pub flight_time_secs: i64,
}

impl Hospital {
    /// Build from a seed record at the given cruise speed.
    ///
    /// # Errors
    /// Returns `Validation` for a negative or non-finite distance.
    #[allow(clippy::cast_possible_truncation)]
    pub fn from_record(record: HospitalRecord, flight_speed_mps: f64) -> NestResult<Self> {
        if !(record.distance_m.is_finite() && record.distance_m >= 0.0) {
            return Err(NestError::Validation(format!(
                "hospital {} has invalid distance {}",
                record.id, record.distance_m
            )));
        }

        let flight_time_secs = (record.distance_m / flight_speed_mps).floor() as i64;

        Ok(Self {
            id: record.id,
            name: record.name,
            distance_m: record.distance_m,
            flight_time_secs,
        })
    }

    /// External view.
    #[must_use]
    pub fn view(&self) -> HospitalView {
        HospitalView {
            id: self.id,
            name: self.name.clone(),
            flight_time_s: self.flight_time_secs,
        }
    }
}

/// What clients see of a hospital.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HospitalView {
    pub id: HospitalId,
    pub name: String,
    pub flight_time_s: i64,
}

/// Read-only lookup of hospitals by id.
#[derive(Debug, Default)]
pub struct HospitalDirectory {
    hospitals: BTreeMap<HospitalId, Hospital>,
}

impl HospitalDirectory {
    /// Build a directory, rejecting duplicate ids or names.
    ///
    /// # Errors
    /// Returns `Validation` on duplicates or a bad distance.
    pub fn load(records: Vec<HospitalRecord>, flight_speed_mps: f64) -> NestResult<Self> {
        let mut directory = Self::default();

        for record in records {
            if directory.hospitals.contains_key(&record.id) {
                return Err(NestError::Validation(format!(
                    "duplicate hospital id {}",
                    record.id
                )));
            }
            if directory.hospitals.values().any(|h| h.name == record.name) {
                return Err(NestError::Validation(format!(
                    "duplicate hospital name {:?}",
                    record.name
                )));
            }

            let hospital = Hospital::from_record(record, flight_speed_mps)?;
            directory.hospitals.insert(hospital.id, hospital);
        }

        Ok(directory)
    }

    /// Look up a hospital.
    #[must_use]
    pub fn get(&self, id: HospitalId) -> Option<&Hospital> {
        self.hospitals.get(&id)
    }

    /// All hospitals in id order.
    #[must_use]
    pub fn list(&self) -> Vec<HospitalView> {
        self.hospitals.values().map(Hospital::view).collect()
    }

    /// Number of hospitals.
    #[must_use]
    pub fn len(&self) -> usize {
        self.hospitals.len()
    }

    /// Whether the directory is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.hospitals.is_empty()
    }
}
