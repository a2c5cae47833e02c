//! `CalibrationRepository` over any key-value store

use airroll_core::{
    CalibrationRecord, CalibrationRepository, CalibrationSlot, ControlError, ControlResult,
};

use crate::KeyValueStore;

/// Stores each calibration record as JSON under its slot key
#[derive(Debug, Clone, Default)]
pub struct KeyValueRepository<S> {
    store: S,
}

impl<S: KeyValueStore> KeyValueRepository<S> {
    /// Wrap a key-value store
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Underlying store
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Unwrap the underlying store
    pub fn into_inner(self) -> S {
        self.store
    }

    /// Delete one record
    pub fn clear(&mut self, slot: CalibrationSlot) -> Result<(), S::Error> {
        self.store.remove(slot.key())
    }
}

impl<S: KeyValueStore> CalibrationRepository for KeyValueRepository<S> {
    fn load(&self, slot: CalibrationSlot) -> Option<CalibrationRecord> {
        let text = match self.store.get(slot.key()) {
            Ok(Some(text)) => text,
            Ok(None) => {
                log::debug!("No {:?} calibration stored", slot);
                return None;
            }
            Err(e) => {
                log::warn!("Reading {} failed: {}", slot.key(), e);
                return None;
            }
        };

        match serde_json::from_str(&text) {
            Ok(record) => Some(record),
            Err(e) => {
                log::warn!("Ignoring malformed {} record: {}", slot.key(), e);
                None
            }
        }
    }

    fn save(&mut self, slot: CalibrationSlot, record: &CalibrationRecord) -> ControlResult<()> {
        let text = serde_json::to_string(record).map_err(|e| {
            log::warn!("Serializing {:?} calibration failed: {}", slot, e);
            ControlError::StorageUnavailable { reason: "record could not be serialized" }
        })?;

        self.store.set(slot.key(), &text).map_err(|e| {
            log::warn!("Writing {} failed: {}", slot.key(), e);
            ControlError::StorageUnavailable { reason: "key-value store write failed" }
        })
    }
}
