//! Calibration persistence backends
//!
//! ## Overview
//!
//! The control core reads and writes its two tornado calibration records
//! through `airroll_core::CalibrationRepository`. This crate provides
//! repositories on top of a plain string key-value store, the same shape as a
//! browser's local storage:
//!
//! | Store | Durability | Use |
//! |-------|------------|-----|
//! | [`MemoryStore`] | Process lifetime | Tests, headless runs |
//! | [`JsonFileStore`] | One JSON object on disk | Desktop front ends, tooling |
//!
//! Each record is stored under its slot key as a JSON object of seven numbers:
//!
//! ```text
//! airroll.axis_calibration.max = {"centerLocal":{"x":..,"y":..,"z":..},"axisLocal":{..},"radius":..}
//! ```
//!
//! ## Failure Policy
//!
//! Storage is best effort. A key that is missing, unreadable or does not parse
//! loads as `None` ("not calibrated"). A failed write is reported to the core
//! as `ControlError::StorageUnavailable`, which the core logs and ignores.
//!
//! ## Example Usage
//!
//! ```rust
//! use airroll_core::Simulation;
//! use airroll_store::{KeyValueRepository, MemoryStore};
//!
//! let repository = KeyValueRepository::new(MemoryStore::new());
//! let sim = Simulation::new(repository);
//! assert!(sim.interpolate_calibration(0.5).is_none());
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod file;
pub mod memory;
pub mod repository;

pub use error::{StoreError, StoreResult};
pub use file::JsonFileStore;
pub use memory::MemoryStore;
pub use repository::KeyValueRepository;

/// String key-value storage
pub trait KeyValueStore {
    /// Backend error
    type Error: std::error::Error;

    /// Value under `key`, `None` if absent
    fn get(&self, key: &str) -> Result<Option<String>, Self::Error>;

    /// Insert or replace the value under `key`
    fn set(&mut self, key: &str, value: &str) -> Result<(), Self::Error>;

    /// Delete `key`; deleting an absent key is not an error
    fn remove(&mut self, key: &str) -> Result<(), Self::Error>;
}

/// Open a JSON calibration file as a repository, creating it on first save
pub fn open_calibration_file(
    path: impl Into<std::path::PathBuf>,
) -> StoreResult<KeyValueRepository<JsonFileStore>> {
    Ok(KeyValueRepository::new(JsonFileStore::open(path)?))
}

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_exists() {
        assert!(!VERSION.is_empty());
    }
}
