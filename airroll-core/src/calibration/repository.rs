//! Calibration persistence seam

use crate::errors::ControlResult;

use super::{CalibrationRecord, CalibrationSlot};

/// Key-value persistence for the two calibration records
///
/// Implementations are best effort. `load` returns `None` for anything it
/// cannot read; `save` may fail, and callers log and carry on.
pub trait CalibrationRepository {
    /// Read one record
    fn load(&self, slot: CalibrationSlot) -> Option<CalibrationRecord>;

    /// Write one record
    fn save(&mut self, slot: CalibrationSlot, record: &CalibrationRecord) -> ControlResult<()>;
}

impl<R: CalibrationRepository + ?Sized> CalibrationRepository for &mut R {
    fn load(&self, slot: CalibrationSlot) -> Option<CalibrationRecord> {
        (**self).load(slot)
    }

    fn save(&mut self, slot: CalibrationSlot, record: &CalibrationRecord) -> ControlResult<()> {
        (**self).save(slot, record)
    }
}

/// Two fixed slots in memory, no allocation
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InMemoryRepository {
    min: Option<CalibrationRecord>,
    max: Option<CalibrationRecord>,
}

impl InMemoryRepository {
    /// Empty repository
    pub const fn new() -> Self {
        Self { min: None, max: None }
    }

    /// Repository preloaded with one record
    pub fn with_record(mut self, slot: CalibrationSlot, record: CalibrationRecord) -> Self {
        *self.slot_mut(slot) = Some(record);
        self
    }

    fn slot_mut(&mut self, slot: CalibrationSlot) -> &mut Option<CalibrationRecord> {
        match slot {
            CalibrationSlot::Min => &mut self.min,
            CalibrationSlot::Max => &mut self.max,
        }
    }
}

impl CalibrationRepository for InMemoryRepository {
    fn load(&self, slot: CalibrationSlot) -> Option<CalibrationRecord> {
        match slot {
            CalibrationSlot::Min => self.min,
            CalibrationSlot::Max => self.max,
        }
    }

    fn save(&mut self, slot: CalibrationSlot, record: &CalibrationRecord) -> ControlResult<()> {
        *self.slot_mut(slot) = Some(*record);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn save_then_load() {
        let mut repo = InMemoryRepository::new();
        assert!(repo.load(CalibrationSlot::Max).is_none());

        let record = CalibrationRecord { radius: 7.0, ..CalibrationRecord::default() };
        repo.save(CalibrationSlot::Max, &record).unwrap();

        assert_eq!(repo.load(CalibrationSlot::Max), Some(record));
        assert!(repo.load(CalibrationSlot::Min).is_none());
    }
}
