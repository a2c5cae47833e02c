//! Half-turn measurement procedure
//!
//! ## States
//!
//! ```text
//!            start()                   accumulated > 181°, samples captured
//!   Idle ─────────────▶ Measuring ─────────────────────────────────────▶ Idle (Completed)
//!    ▲                    │   │
//!    │  stick < 0.01      │   │  accumulated > 181°, nothing captured
//!    └──── (Cancelled) ───┘   └────────────────────────────────────────▶ Idle (Failed)
//! ```
//!
//! Each update adds the rotation since the previous update to a running total.
//! While that total sits inside the 179° to 181° window the world-space nose
//! position is captured; their average is the point opposite the start.
//!
//! A tick only advances while the stick is deflected past 0.01. An automated
//! caller (a script holding the stick for the operator) is never cancelled by a
//! centered stick; the measurement just waits.

use heapless::Vec;
use nalgebra::{Point3, UnitQuaternion, Vector3};

use crate::{
    constants::{
        calibration::{
            CANCEL_STICK_MAGNITUDE, CAPTURE_BUFFER_CAPACITY, CAPTURE_WINDOW_MAX_DEG,
            CAPTURE_WINDOW_MIN_DEG,
        },
        control::RAD_TO_DEG,
    },
    errors::{ControlError, ControlResult},
    traits::VehicleBody,
};

use super::{CalibrationSample, CalibrationSlot};

/// Per-tick input to the measurement
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MeasurementInput {
    /// Raw stick deflection this tick
    pub stick_magnitude: f32,
    /// Stick is driven by a script rather than a person
    pub automated: bool,
}

/// Data carried while a measurement runs
#[derive(Debug, Clone, PartialEq)]
pub struct MeasurementState {
    /// Stick magnitude the operator was asked to hold
    pub target_magnitude: f32,
    /// Nose position when the measurement started
    pub start_nose: Point3<f32>,
    /// Total rotation since start, degrees
    pub accumulated_deg: f32,
    /// Nose positions captured inside the window
    pub samples: Vec<Point3<f32>, CAPTURE_BUFFER_CAPACITY>,
    /// Orientation at the previous update
    pub previous_orientation: UnitQuaternion<f32>,
}

/// Geometry of a finished measurement
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CompletedMeasurement {
    /// Stick magnitude the measurement was started with
    pub target_magnitude: f32,
    /// Reference slot the magnitude falls in, if any
    pub slot: Option<CalibrationSlot>,
    /// Circle center in world space
    pub center_world: Point3<f32>,
    /// Geometry in body coordinates
    pub sample: CalibrationSample,
}

/// What an update did
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MeasurementEvent {
    /// Still measuring
    Progress {
        /// Total rotation so far, degrees
        accumulated_deg: f32,
    },
    /// Half turn complete
    Completed(CompletedMeasurement),
    /// Stick released by a person
    Cancelled,
    /// Half turn passed without a usable capture
    Failed {
        /// Short cause
        reason: &'static str,
    },
}

/// Tornado measurement state machine
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeasurementFsm {
    state: Option<MeasurementState>,
}

impl MeasurementFsm {
    /// Idle machine
    pub const fn new() -> Self {
        Self { state: None }
    }

    /// True while a measurement is running
    pub fn is_measuring(&self) -> bool {
        self.state.is_some()
    }

    /// Running measurement data, if any
    pub fn state(&self) -> Option<&MeasurementState> {
        self.state.as_ref()
    }

    /// Begin measuring from the body's current pose
    pub fn start<B: VehicleBody + ?Sized>(
        &mut self,
        target_magnitude: f32,
        body: &B,
    ) -> ControlResult<()> {
        if self.state.is_some() {
            return Err(ControlError::MeasurementInProgress);
        }
        if !target_magnitude.is_finite() {
            return Err(ControlError::InvalidInput { reason: "calibration target magnitude" });
        }

        log_info!("Tornado measurement started at stick {:.2}", target_magnitude);
        self.state = Some(MeasurementState {
            target_magnitude,
            start_nose: body.nose_world(),
            accumulated_deg: 0.0,
            samples: Vec::new(),
            previous_orientation: body.orientation(),
        });
        Ok(())
    }

    /// Abort without producing a result; true if something was running
    pub fn cancel(&mut self) -> bool {
        self.state.take().is_some()
    }

    /// Advance with this tick's pose, after the orientation update
    ///
    /// Returns `None` while idle, and for ticks where the stick is at or below
    /// the cancel threshold without cancelling.
    pub fn update<B: VehicleBody + ?Sized>(
        &mut self,
        input: MeasurementInput,
        body: &B,
    ) -> Option<MeasurementEvent> {
        let state = self.state.as_mut()?;
        let magnitude = input.stick_magnitude;

        if !input.automated && !(magnitude >= CANCEL_STICK_MAGNITUDE) {
            self.state = None;
            log_info!("Tornado measurement cancelled: stick released");
            return Some(MeasurementEvent::Cancelled);
        }
        if !(magnitude > CANCEL_STICK_MAGNITUDE) {
            return None;
        }

        let orientation = body.orientation();
        state.accumulated_deg += rotation_between(&state.previous_orientation, &orientation);
        state.previous_orientation = orientation;

        let accumulated = state.accumulated_deg;
        if (CAPTURE_WINDOW_MIN_DEG..=CAPTURE_WINDOW_MAX_DEG).contains(&accumulated) {
            if state.samples.push(body.nose_world()).is_err() {
                log_debug!("Capture buffer full at {:.2}°", accumulated);
            }
        }

        if accumulated <= CAPTURE_WINDOW_MAX_DEG {
            return Some(MeasurementEvent::Progress { accumulated_deg: accumulated });
        }

        let state = self.state.take()?;
        Some(match finish(&state, body) {
            Ok(done) => {
                log_info!(
                    "Tornado measurement complete: radius {:.2}, slot {:?}",
                    done.sample.radius,
                    done.slot
                );
                MeasurementEvent::Completed(done)
            }
            Err(reason) => {
                log_warn!("Tornado measurement failed: {}", reason);
                MeasurementEvent::Failed { reason }
            }
        })
    }
}

/// Rotation angle between two orientations in degrees
///
/// Equal to `2·acos(min(1, |Δq.w|))`, computed through `atan2` so that the
/// sub-degree steps of a single tick keep their precision in f32.
pub fn rotation_between(from: &UnitQuaternion<f32>, to: &UnitQuaternion<f32>) -> f32 {
    let delta = from.inverse() * to;
    let q = delta.quaternion();
    2.0 * libm::atan2f(q.imag().norm(), libm::fabsf(q.scalar())) * RAD_TO_DEG
}

fn finish<B: VehicleBody + ?Sized>(
    state: &MeasurementState,
    body: &B,
) -> Result<CompletedMeasurement, &'static str> {
    if state.samples.is_empty() {
        return Err("no nose sample captured in the 179°..181° window");
    }

    let sum = state
        .samples
        .iter()
        .fold(Vector3::zeros(), |acc, p| acc + p.coords);
    let opposite = Point3::from(sum / state.samples.len() as f32);

    let diameter = opposite - state.start_nose;
    let center_world = nalgebra::center(&state.start_nose, &opposite);

    let to_local = body.orientation().inverse();
    let center_local = to_local * (center_world - body.position());
    let axis_local = to_local * diameter;

    let sample = CalibrationSample::new(center_local, axis_local, diameter.norm() * 0.5)
        .ok_or("start and opposite nose positions coincide")?;

    Ok(CompletedMeasurement {
        target_magnitude: state.target_magnitude,
        slot: CalibrationSlot::for_magnitude(state.target_magnitude),
        center_world,
        sample,
    })
}
