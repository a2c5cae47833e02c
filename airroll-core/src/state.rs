//! Owned rotational state and the per-tick pipeline
//!
//! ```text
//! stick ─▶ InputShaper ─▶ ModeResolver ─▶ RateController ─▶ VelocityIntegrator ─▶ OrientationIntegrator
//!                              │                 ▲                   ▲
//!                              └── accel caps ───┘      locks ───────┘
//! ```
//!
//! `ControlState` is the single owner of angular velocity and lock flags. It
//! writes the body's orientation once per step and reads nothing else from it.

use nalgebra::Vector3;

use crate::{
    calibration::MeasurementEvent,
    constants::control::{MAX_DT_S, MIN_DT_S},
    errors::{ControlError, ControlResult},
    input::{InputHistory, InputShaper, ShapedInput, StickSample},
    integrator::VelocityIntegrator,
    locks::{Axis, AxisLocks},
    mode::{ControlFlags, ControlMode, ModeResolver},
    orientation::OrientationIntegrator,
    rate::RateController,
    settings::ControlSettings,
    traits::{Validatable, VehicleBody},
};

/// Everything the input collaborator hands over for one tick
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ControlInput {
    /// Raw stick, fractions of the joystick radius
    pub stick: StickSample,
    /// Deadzone radius in the same units, [0, 1)
    pub deadzone: f32,
    /// DAR button and air-roll selector
    pub flags: ControlFlags,
    /// Stick is driven by a script, not a person
    pub automated: bool,
}

impl ControlInput {
    /// Input with default flags
    pub fn new(stick: StickSample, deadzone: f32) -> Self {
        Self { stick, deadzone, ..Self::default() }
    }

    /// Replace the mode flags
    pub fn with_flags(mut self, flags: ControlFlags) -> Self {
        self.flags = flags;
        self
    }

    /// Mark as script-driven
    pub fn automated(mut self) -> Self {
        self.automated = true;
        self
    }

    fn validate(&self) -> ControlResult<()> {
        if !self.stick.is_finite() {
            return Err(ControlError::InvalidInput { reason: "stick sample is not finite" });
        }
        if !self.deadzone.is_valid() || !(0.0..1.0).contains(&self.deadzone) {
            return Err(ControlError::InvalidInput { reason: "deadzone outside [0, 1)" });
        }
        Ok(())
    }
}

/// What one advanced tick computed
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickReport {
    /// Timestep after clamping
    pub dt: f32,
    /// Shaped stick
    pub shaped: ShapedInput,
    /// Resolved control mode
    pub mode: ControlMode,
    /// Target angular velocity
    pub target: Vector3<f32>,
    /// Clamped PD acceleration
    pub acceleration: Vector3<f32>,
    /// Angular velocity after integration
    pub angular_velocity: Vector3<f32>,
    /// Calibration progress, when a measurement is running
    pub measurement: Option<MeasurementEvent>,
}

/// Clamp a timestep into the supported range; non-finite values are rejected
pub fn clamp_dt(dt: f32) -> ControlResult<f32> {
    if !dt.is_valid() {
        return Err(ControlError::InvalidTimestep { dt });
    }

    let clamped = dt.clamp(MIN_DT_S, MAX_DT_S);
    if clamped != dt {
        log_debug!("dt {} clamped to {}", dt, clamped);
    }
    Ok(clamped)
}

/// Angular velocity, locks and raw input history
#[derive(Debug, Clone)]
pub struct ControlState {
    angular_velocity: Vector3<f32>,
    locks: AxisLocks,
    history: InputHistory,
    controller: RateController,
}

impl Default for ControlState {
    fn default() -> Self {
        Self::new()
    }
}

impl ControlState {
    /// At rest, nothing locked
    pub fn new() -> Self {
        Self {
            angular_velocity: Vector3::zeros(),
            locks: AxisLocks::default(),
            history: InputHistory::new(),
            controller: RateController::default(),
        }
    }

    /// Current angular velocity (rad/s, body frame)
    pub fn angular_velocity(&self) -> Vector3<f32> {
        self.angular_velocity
    }

    /// Overwrite angular velocity
    pub fn set_angular_velocity(&mut self, w: Vector3<f32>) {
        self.angular_velocity = w;
    }

    /// Lock flags
    pub fn locks(&self) -> &AxisLocks {
        &self.locks
    }

    /// Flip one lock; returns the new state
    pub fn toggle_lock(&mut self, axis: Axis) -> bool {
        self.locks.toggle(axis)
    }

    /// Most recent raw stick samples, oldest first
    ///
    /// Recorded for diagnostics; shaping does not read it.
    pub fn input_history(&self) -> &InputHistory {
        &self.history
    }

    /// Zero velocity and forget input history; locks are kept
    pub fn reset(&mut self) {
        self.angular_velocity = Vector3::zeros();
        self.history.clear();
    }

    /// Run one tick of the control pipeline
    ///
    /// Settings, dt and input are all checked before anything is mutated, so
    /// an `Err` leaves both this state and the body untouched.
    pub fn step<B: VehicleBody + ?Sized>(
        &mut self,
        dt: f32,
        settings: &ControlSettings,
        input: &ControlInput,
        body: &mut B,
    ) -> ControlResult<TickReport> {
        settings.validate()?;
        let dt = clamp_dt(dt)?;
        input.validate()?;

        self.history.push(input.stick);

        let shaped = InputShaper::new(input.deadzone, settings.input_pow).shape(input.stick);
        let mode = ControlMode::from_flags(input.flags, settings.dar_direction);
        let target = ModeResolver::target_rates(mode, &shaped, settings);
        let caps = ModeResolver::accel_caps(mode, settings);

        let acceleration = self.controller.acceleration(&target, &self.angular_velocity, &caps);

        let dar_damping = mode.is_dar() || input.flags.dar_button;
        VelocityIntegrator::new(settings, dar_damping).step(
            &mut self.angular_velocity,
            &acceleration,
            shaped.effort,
            &self.locks,
            dt,
        );

        let orientation =
            OrientationIntegrator::integrate(&body.orientation(), &self.angular_velocity, dt);
        body.set_orientation(orientation);

        Ok(TickReport {
            dt,
            shaped,
            mode,
            target,
            acceleration,
            angular_velocity: self.angular_velocity,
            measurement: None,
        })
    }
}
