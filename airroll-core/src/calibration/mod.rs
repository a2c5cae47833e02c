//! Tornado Spin Calibration
//!
//! ## Overview
//!
//! During a sustained directional air roll with some stick deflection, the
//! vehicle's nose traces a circle: the "tornado". Where that circle sits
//! depends on body shape and mass distribution, which the control core does
//! not model, so the geometry is measured instead of derived.
//!
//! ```text
//!            start nose
//!                ●
//!              ╱   ╲
//!             │  ✕  │   ✕ = center, midpoint of the two nose samples
//!              ╲   ╱    axis = start → opposite, radius = half the distance
//!                ●
//!          opposite nose (after 180° of accumulated rotation)
//! ```
//!
//! ## Components
//!
//! - [`MeasurementFsm`]: multi-tick procedure that records the antipodal nose
//!   sample during a commanded half turn.
//! - [`AxisCalibrationStore`]: holds the two reference samples (stick 0.10 and
//!   1.00) and interpolates between them.
//! - [`CalibrationRepository`]: persistence seam; a missing or malformed record
//!   reads as "not calibrated".
//!
//! Calibration feeds the tornado visualization only. It never feeds back into
//! the dynamics.

mod measurement;
mod repository;
mod store;

pub use measurement::{
    CompletedMeasurement, MeasurementEvent, MeasurementFsm, MeasurementInput, MeasurementState,
};
pub use repository::{CalibrationRepository, InMemoryRepository};
pub use store::AxisCalibrationStore;

use nalgebra::{Unit, Vector3};

use crate::constants::calibration::{
    MAX_BUCKET_TOLERANCE, MAX_REFERENCE_MAGNITUDE, MIN_BUCKET_TOLERANCE, MIN_REFERENCE_MAGNITUDE,
};

/// Which reference sample a record belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CalibrationSlot {
    /// Stick magnitude 0.10
    Min,
    /// Stick magnitude 1.00
    Max,
}

impl CalibrationSlot {
    /// Both slots
    pub const ALL: [CalibrationSlot; 2] = [CalibrationSlot::Min, CalibrationSlot::Max];

    /// Nominal stick magnitude of this slot
    pub fn reference_magnitude(self) -> f32 {
        match self {
            Self::Min => MIN_REFERENCE_MAGNITUDE,
            Self::Max => MAX_REFERENCE_MAGNITUDE,
        }
    }

    /// Persistence key
    pub fn key(self) -> &'static str {
        match self {
            Self::Min => "airroll.axis_calibration.min",
            Self::Max => "airroll.axis_calibration.max",
        }
    }

    /// Slot a measured magnitude belongs to, if any
    ///
    /// Within ±0.05 of 0.10 is "min", within ±0.1 of 1.00 is "max"; anything
    /// else is not a reference measurement.
    pub fn for_magnitude(magnitude: f32) -> Option<Self> {
        if libm::fabsf(magnitude - MIN_REFERENCE_MAGNITUDE) <= MIN_BUCKET_TOLERANCE {
            Some(Self::Min)
        } else if libm::fabsf(magnitude - MAX_REFERENCE_MAGNITUDE) <= MAX_BUCKET_TOLERANCE {
            Some(Self::Max)
        } else {
            None
        }
    }
}

/// Measured tornado geometry in the vehicle's local frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CalibrationSample {
    /// Circle center relative to the body origin
    pub center_local: Vector3<f32>,
    /// Spin axis, unit length
    pub axis_local: Unit<Vector3<f32>>,
    /// Circle radius
    pub radius: f32,
}

impl CalibrationSample {
    /// Sample from raw parts; `None` if the axis is degenerate or anything is non-finite
    pub fn new(center_local: Vector3<f32>, axis_local: Vector3<f32>, radius: f32) -> Option<Self> {
        let finite = center_local.iter().chain(axis_local.iter()).all(|c| c.is_finite())
            && radius.is_finite();
        if !finite || radius < 0.0 {
            return None;
        }

        let axis_local = Unit::try_new(axis_local, 1.0e-6)?;
        Some(Self { center_local, axis_local, radius })
    }
}

/// Three numeric fields
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Vec3Record {
    #[allow(missing_docs)]
    pub x: f32,
    #[allow(missing_docs)]
    pub y: f32,
    #[allow(missing_docs)]
    pub z: f32,
}

impl From<Vector3<f32>> for Vec3Record {
    fn from(v: Vector3<f32>) -> Self {
        Self { x: v.x, y: v.y, z: v.z }
    }
}

impl From<Vec3Record> for Vector3<f32> {
    fn from(r: Vec3Record) -> Self {
        Vector3::new(r.x, r.y, r.z)
    }
}

/// Persisted form of a sample: seven plain numbers
///
/// ```json
/// {"centerLocal":{"x":0.0,"y":-3.1,"z":12.0},"axisLocal":{"x":0.0,"y":0.2,"z":-0.98},"radius":48.5}
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct CalibrationRecord {
    /// Circle center, body frame
    pub center_local: Vec3Record,
    /// Spin axis, body frame; normalized on load
    pub axis_local: Vec3Record,
    /// Circle radius
    pub radius: f32,
}

impl CalibrationRecord {
    /// Validate into a sample; malformed records read as absent
    pub fn to_sample(&self) -> Option<CalibrationSample> {
        CalibrationSample::new(self.center_local.into(), self.axis_local.into(), self.radius)
    }
}

impl From<&CalibrationSample> for CalibrationRecord {
    fn from(sample: &CalibrationSample) -> Self {
        Self {
            center_local: sample.center_local.into(),
            axis_local: sample.axis_local.into_inner().into(),
            radius: sample.radius,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bucket_tolerances() {
        assert_eq!(CalibrationSlot::for_magnitude(0.10), Some(CalibrationSlot::Min));
        assert_eq!(CalibrationSlot::for_magnitude(0.14), Some(CalibrationSlot::Min));
        assert_eq!(CalibrationSlot::for_magnitude(0.2), None);
        assert_eq!(CalibrationSlot::for_magnitude(0.95), Some(CalibrationSlot::Max));
        assert_eq!(CalibrationSlot::for_magnitude(0.85), None);
    }

    #[test]
    fn malformed_records_are_absent() {
        let zero_axis = CalibrationRecord {
            radius: 10.0,
            ..CalibrationRecord::default()
        };
        assert!(zero_axis.to_sample().is_none());

        let nan = CalibrationRecord {
            axis_local: Vec3Record { x: 0.0, y: 0.0, z: 1.0 },
            radius: f32::NAN,
            ..CalibrationRecord::default()
        };
        assert!(nan.to_sample().is_none());
    }

    #[test]
    fn record_normalizes_axis() {
        let record = CalibrationRecord {
            center_local: Vec3Record { x: 1.0, y: 2.0, z: 3.0 },
            axis_local: Vec3Record { x: 0.0, y: 0.0, z: 2.0 },
            radius: 4.0,
        };
        let sample = record.to_sample().expect("valid record");
        assert_eq!(sample.axis_local.into_inner(), Vector3::z());
        assert_eq!(CalibrationRecord::from(&sample).axis_local.z, 1.0);
    }
}
