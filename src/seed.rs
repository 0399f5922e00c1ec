//! Seed Loading
//!
//! Hospitals and products come from CSV files with a header row, loaded
//! once before the nest starts serving.
//!
//! ```text
//! id, name, distance_m          id, product, mass_g, quantity
//! 1, Bigogwe, 64020             1, RBC A+ Adult, 700, 30
//! ```

use std::io::Read;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;

use crate::hospital::HospitalRecord;
use crate::inventory::Product;

/// Seed file errors.
#[derive(Debug, thiserror::Error)]
pub enum SeedError {
    #[error("failed to open seed file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed seed data in {origin}: {source}")]
    Csv {
        origin: String,
        #[source]
        source: csv::Error,
    },
}

/// Read hospital records from a CSV file.
///
/// # Errors
/// Returns `SeedError` if the file cannot be opened or parsed.
pub fn load_hospitals(path: &Path) -> Result<Vec<HospitalRecord>, SeedError> {
    load_file(path)
}

/// Read product records from a CSV file.
///
/// # Errors
/// Returns `SeedError` if the file cannot be opened or parsed.
pub fn load_products(path: &Path) -> Result<Vec<Product>, SeedError> {
    load_file(path)
}

fn load_file<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>, SeedError> {
    let file = std::fs::File::open(path).map_err(|source| SeedError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let records = read_records(file, &path.display().to_string())?;
    tracing::info!(path = %path.display(), count = records.len(), "loaded seed file");
    Ok(records)
}

/// Deserialize every row of a headered CSV stream.
///
/// Whitespace around fields is ignored.
///
/// # Errors
/// Returns `SeedError::Csv` on the first bad row, naming `origin`.
pub fn read_records<T: DeserializeOwned, R: Read>(
    reader: R,
    origin: &str,
) -> Result<Vec<T>, SeedError> {
    csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader)
        .deserialize()
        .collect::<Result<Vec<T>, _>>()
        .map_err(|source| SeedError::Csv {
            origin: origin.to_string(),
            source,
        })
}
