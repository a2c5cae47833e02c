//! Reference samples and interpolation between them

use nalgebra::{Unit, Vector3};

use crate::constants::calibration::{MAX_REFERENCE_MAGNITUDE, MIN_REFERENCE_MAGNITUDE};

use super::{CalibrationRecord, CalibrationRepository, CalibrationSample, CalibrationSlot};

/// The two reference measurements
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct AxisCalibrationStore {
    min: Option<CalibrationSample>,
    max: Option<CalibrationSample>,
}

impl AxisCalibrationStore {
    /// Empty store
    pub const fn new() -> Self {
        Self { min: None, max: None }
    }

    /// Store populated from a repository
    ///
    /// Missing and malformed records both leave their slot empty.
    pub fn load<R: CalibrationRepository + ?Sized>(repository: &R) -> Self {
        let mut store = Self::new();
        for slot in CalibrationSlot::ALL {
            let sample = repository.load(slot).and_then(|record| {
                let sample = record.to_sample();
                if sample.is_none() {
                    log_warn!("Ignoring malformed calibration record for {:?}", slot);
                }
                sample
            });
            store.set(slot, sample);
        }
        store
    }

    /// Sample in one slot
    pub fn get(&self, slot: CalibrationSlot) -> Option<&CalibrationSample> {
        match slot {
            CalibrationSlot::Min => self.min.as_ref(),
            CalibrationSlot::Max => self.max.as_ref(),
        }
    }

    /// Replace one slot in memory only
    pub fn set(&mut self, slot: CalibrationSlot, sample: Option<CalibrationSample>) {
        match slot {
            CalibrationSlot::Min => self.min = sample,
            CalibrationSlot::Max => self.max = sample,
        }
    }

    /// Replace one slot and persist it
    ///
    /// The in-memory value is kept even when the write fails.
    pub fn commit<R: CalibrationRepository + ?Sized>(
        &mut self,
        slot: CalibrationSlot,
        sample: CalibrationSample,
        repository: &mut R,
    ) {
        self.set(slot, Some(sample));
        if let Err(_e) = repository.save(slot, &CalibrationRecord::from(&sample)) {
            log_warn!("Failed to persist {:?} calibration: {}", slot, _e);
        }
    }

    /// Drop both samples from memory
    pub fn clear(&mut self) {
        self.min = None;
        self.max = None;
    }

    /// True when both reference samples are present
    pub fn is_complete(&self) -> bool {
        self.min.is_some() && self.max.is_some()
    }

    /// Tornado geometry for an arbitrary stick magnitude
    ///
    /// `t = clamp((m − 0.10) / 0.90, 0, 1)`; center and radius are lerped, the
    /// axis is lerped then renormalized. `None` until both slots are filled.
    pub fn interpolate(&self, stick_magnitude: f32) -> Option<CalibrationSample> {
        let (min, max) = (self.min.as_ref()?, self.max.as_ref()?);

        let span = MAX_REFERENCE_MAGNITUDE - MIN_REFERENCE_MAGNITUDE;
        let t = ((stick_magnitude - MIN_REFERENCE_MAGNITUDE) / span).clamp(0.0, 1.0);
        // NaN magnitude survives clamp
        let t = if t.is_nan() { 0.0 } else { t };

        let center_local = min.center_local.lerp(&max.center_local, t);
        let radius = min.radius + (max.radius - min.radius) * t;
        let axis_local = blend_axis(&min.axis_local, &max.axis_local, t);

        Some(CalibrationSample { center_local, axis_local, radius })
    }
}

/// Lerp two unit axes and renormalize
///
/// Antiparallel axes cancel at the midpoint; the nearer endpoint stands in.
fn blend_axis(a: &Unit<Vector3<f32>>, b: &Unit<Vector3<f32>>, t: f32) -> Unit<Vector3<f32>> {
    let blended = a.into_inner().lerp(&b.into_inner(), t);
    Unit::try_new(blended, 1.0e-6).unwrap_or(if t < 0.5 { *a } else { *b })
}
