//! Tornado radius sweeps
//!
//! Runs the half-turn measurement at several stick directions and magnitudes
//! on a fresh body each time, then summarizes how much the measured radius
//! moves with direction. A low coefficient of variation means one radius per
//! magnitude describes the spin; a high one means the radius depends on where
//! the stick points.
//!
//! Sweeps run the control state and the measurement machine directly, so
//! nothing is written to a calibration repository.

use airroll_core::{
    calibration::{CompletedMeasurement, MeasurementFsm, MeasurementInput},
    ControlFlags, ControlInput, ControlSettings, ControlState, MeasurementEvent, RigidBody,
    RollDirection, StickSample,
};

use crate::error::{TelemetryError, TelemetryResult};

/// Coefficient of variation below which the radius is treated as fixed
pub const CONSISTENT_CV: f32 = 0.05;

/// Coefficient of variation below which a fixed radius needs a tolerance
pub const MODERATE_CV: f32 = 0.15;

/// Sweep grid and timing
#[derive(Debug, Clone, PartialEq)]
pub struct SweepConfig {
    /// DAR direction held throughout
    pub direction: RollDirection,
    /// Stick magnitudes to measure
    pub magnitudes: Vec<f32>,
    /// Stick directions, 0° up and 90° right
    pub angles_deg: Vec<f32>,
    /// Fine enough that the capture window sees several frames
    pub dt: f32,
    /// Spin time before the measurement starts
    pub spin_up_secs: f32,
    /// Give up on a point after this long
    pub timeout_secs: f32,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            direction: RollDirection::Left,
            magnitudes: vec![0.10, 1.0],
            angles_deg: (0..=4).map(|i| i as f32 * 22.5).collect(),
            dt: 0.002,
            spin_up_secs: 1.5,
            timeout_secs: 15.0,
        }
    }
}

impl SweepConfig {
    fn frames(&self, secs: f32) -> TelemetryResult<u32> {
        if !self.dt.is_finite() || self.dt <= 0.0 {
            return Err(TelemetryError::InvalidManeuver("sweep dt must be positive"));
        }
        if !secs.is_finite() || secs < 0.0 {
            return Err(TelemetryError::InvalidManeuver("sweep timing must be non-negative"));
        }
        Ok((secs / self.dt).round() as u32)
    }
}

/// One measured grid point
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SweepPoint {
    /// Stick direction
    pub angle_deg: f32,
    /// Stick magnitude
    pub magnitude: f32,
    /// The finished half turn
    pub measurement: CompletedMeasurement,
}

/// Spin up at one grid point and measure a half turn
///
/// `Ok(None)` when the measurement fails or times out.
pub fn measure_spin(
    settings: &ControlSettings,
    config: &SweepConfig,
    magnitude: f32,
    angle_deg: f32,
) -> TelemetryResult<Option<CompletedMeasurement>> {
    let spin_up = config.frames(config.spin_up_secs)?;
    let timeout = config.frames(config.timeout_secs)?;

    let mut state = ControlState::new();
    let mut body = RigidBody::default();
    let mut fsm = MeasurementFsm::new();
    let input = ControlInput::new(StickSample::polar(magnitude, angle_deg), 0.0)
        .with_flags(ControlFlags::directional(config.direction))
        .automated();

    for _ in 0..spin_up {
        state.step(config.dt, settings, &input, &mut body)?;
    }

    fsm.start(magnitude, &body)?;
    for _ in 0..timeout {
        let report = state.step(config.dt, settings, &input, &mut body)?;
        let event = fsm.update(
            MeasurementInput {
                stick_magnitude: report.shaped.magnitude,
                automated: true,
            },
            &body,
        );

        match event {
            Some(MeasurementEvent::Completed(done)) => return Ok(Some(done)),
            Some(MeasurementEvent::Failed { reason }) => {
                log::warn!("{angle_deg:.1}° @ {magnitude:.2}: measurement failed ({reason})");
                return Ok(None);
            }
            Some(MeasurementEvent::Cancelled) => return Ok(None),
            Some(MeasurementEvent::Progress { .. }) | None => {}
        }
    }

    log::warn!("{angle_deg:.1}° @ {magnitude:.2}: no half turn within {}s", config.timeout_secs);
    Ok(None)
}

/// Measure every angle at every magnitude; failed points are skipped
pub fn sweep(settings: &ControlSettings, config: &SweepConfig) -> TelemetryResult<Vec<SweepPoint>> {
    let mut points = Vec::with_capacity(config.magnitudes.len() * config.angles_deg.len());

    for &angle_deg in &config.angles_deg {
        for &magnitude in &config.magnitudes {
            if let Some(measurement) = measure_spin(settings, config, magnitude, angle_deg)? {
                log::info!(
                    "Measured {angle_deg:.1}° @ {magnitude:.2} → radius {:.2}",
                    measurement.sample.radius
                );
                points.push(SweepPoint { angle_deg, magnitude, measurement });
            }
        }
    }
    Ok(points)
}

/// How much the radius moves with stick direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RadiusConsistency {
    /// Under 5 % variation, one fixed radius
    Consistent,
    /// Under 15 % variation, a fixed radius with tolerance
    Moderate,
    /// Radius depends on stick direction
    DirectionDependent,
}

/// Radius statistics over a set of measurements
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RadiusSummary {
    /// Number of radii
    pub count: usize,
    /// Mean radius
    pub mean: f32,
    /// Smallest radius
    pub min: f32,
    /// Largest radius
    pub max: f32,
    /// Population standard deviation
    pub std_dev: f32,
}

impl RadiusSummary {
    /// `None` for an empty set
    pub fn from_radii(radii: impl IntoIterator<Item = f32>) -> Option<Self> {
        let radii: Vec<f32> = radii.into_iter().collect();
        if radii.is_empty() {
            return None;
        }

        let count = radii.len();
        let mean = radii.iter().sum::<f32>() / count as f32;
        let variance = radii.iter().map(|r| (r - mean).powi(2)).sum::<f32>() / count as f32;

        Some(Self {
            count,
            mean,
            min: radii.iter().copied().fold(f32::INFINITY, f32::min),
            max: radii.iter().copied().fold(f32::NEG_INFINITY, f32::max),
            std_dev: variance.sqrt(),
        })
    }

    /// Summary of the points measured at `magnitude`
    pub fn at_magnitude(points: &[SweepPoint], magnitude: f32) -> Option<Self> {
        Self::from_radii(
            points
                .iter()
                .filter(|p| (p.magnitude - magnitude).abs() < 1e-4)
                .map(|p| p.measurement.sample.radius),
        )
    }

    /// Spread between largest and smallest
    pub fn range(&self) -> f32 {
        self.max - self.min
    }

    /// `std_dev / mean`, zero for a non-positive mean
    pub fn coefficient_of_variation(&self) -> f32 {
        if self.mean > 0.0 {
            self.std_dev / self.mean
        } else {
            0.0
        }
    }

    /// Classify the coefficient of variation
    pub fn consistency(&self) -> RadiusConsistency {
        let cv = self.coefficient_of_variation();
        if cv < CONSISTENT_CV {
            RadiusConsistency::Consistent
        } else if cv < MODERATE_CV {
            RadiusConsistency::Moderate
        } else {
            RadiusConsistency::DirectionDependent
        }
    }
}
