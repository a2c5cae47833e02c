//! Public facade
//!
//! `Simulation` bundles the owned control state, the calibration store and
//! measurement, a persistence backend and the game-mode hook. It is the only
//! type a front end needs to drive the rotational core.
//!
//! ```rust
//! use airroll_core::{
//!     ControlFlags, ControlInput, ControlSettings, InMemoryRepository, RigidBody,
//!     RollDirection, Simulation, StickSample, TickOutcome,
//! };
//!
//! let mut sim = Simulation::new(InMemoryRepository::new());
//! let mut body = RigidBody::default();
//! let settings = ControlSettings::default();
//! let input = ControlInput::new(StickSample::new(0.0, 1.0), 0.1)
//!     .with_flags(ControlFlags::directional(RollDirection::Right));
//!
//! for _ in 0..60 {
//!     sim.tick(1.0 / 60.0, &settings, &input, &mut body, false)?;
//! }
//! assert!(sim.angular_velocity().z > 0.0);
//!
//! assert_eq!(sim.tick(1.0 / 60.0, &settings, &input, &mut body, true)?, TickOutcome::Paused);
//! # Ok::<(), airroll_core::ControlError>(())
//! ```

use nalgebra::Vector3;

use crate::{
    calibration::{
        AxisCalibrationStore, CalibrationRepository, CalibrationSample, CalibrationSlot,
        MeasurementEvent, MeasurementFsm, MeasurementInput, MeasurementState,
    },
    errors::ControlResult,
    input::InputHistory,
    locks::{Axis, AxisLocks},
    settings::ControlSettings,
    state::{ControlInput, ControlState, TickReport},
    traits::{ModePhysicsHook, NoHook, VehicleBody},
};

/// Result of a tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TickOutcome {
    /// Paused; nothing changed
    Paused,
    /// State advanced
    Advanced(TickReport),
}

impl TickOutcome {
    /// Report of an advanced tick
    pub fn report(&self) -> Option<&TickReport> {
        match self {
            Self::Paused => None,
            Self::Advanced(report) => Some(report),
        }
    }
}

/// Rotational control engine with calibration
pub struct Simulation<R: CalibrationRepository, H: ModePhysicsHook = NoHook> {
    state: ControlState,
    calibration: AxisCalibrationStore,
    measurement: MeasurementFsm,
    repository: R,
    hook: H,
}

impl<R: CalibrationRepository> Simulation<R> {
    /// Engine without a game-mode hook
    pub fn new(repository: R) -> Self {
        Self::with_hook(repository, NoHook)
    }
}

impl<R: CalibrationRepository, H: ModePhysicsHook> Simulation<R, H> {
    /// Engine that calls `hook` after every advanced tick
    ///
    /// Calibration samples are read from `repository` here, once.
    pub fn with_hook(repository: R, hook: H) -> Self {
        let calibration = AxisCalibrationStore::load(&repository);
        log_debug!(
            "Calibration loaded: min {}, max {}",
            calibration.get(CalibrationSlot::Min).is_some(),
            calibration.get(CalibrationSlot::Max).is_some()
        );

        Self {
            state: ControlState::new(),
            calibration,
            measurement: MeasurementFsm::new(),
            repository,
            hook,
        }
    }

    /// Current angular velocity (rad/s, body frame)
    pub fn angular_velocity(&self) -> Vector3<f32> {
        self.state.angular_velocity()
    }

    /// Overwrite angular velocity
    pub fn set_angular_velocity(&mut self, x: f32, y: f32, z: f32) {
        self.state.set_angular_velocity(Vector3::new(x, y, z));
    }

    /// Stop all rotation
    pub fn reset_angular_velocity(&mut self) {
        self.state.set_angular_velocity(Vector3::zeros());
    }

    /// Stop rotation, forget input history and abandon any measurement
    pub fn reset_physics_state(&mut self) {
        self.state.reset();
        if self.measurement.cancel() {
            log_info!("Tornado measurement discarded by reset");
        }
    }

    /// Advance one frame
    ///
    /// A paused tick is a no-op. Otherwise the control pipeline runs, the
    /// body's orientation is updated, a running measurement observes the new
    /// pose and the hook is called, in that order.
    pub fn tick<B: VehicleBody + ?Sized>(
        &mut self,
        dt: f32,
        settings: &ControlSettings,
        input: &ControlInput,
        body: &mut B,
        paused: bool,
    ) -> ControlResult<TickOutcome> {
        if paused {
            return Ok(TickOutcome::Paused);
        }

        let mut report = self.state.step(dt, settings, input, body)?;

        let measurement_input = MeasurementInput {
            stick_magnitude: report.shaped.magnitude,
            automated: input.automated,
        };
        report.measurement = self.measurement.update(measurement_input, &*body);

        if let Some(MeasurementEvent::Completed(done)) = report.measurement {
            match done.slot {
                Some(slot) => self.calibration.commit(slot, done.sample, &mut self.repository),
                None => {
                    log_warn!(
                        "Measured stick {:.2} is not a reference magnitude; sample discarded",
                        done.target_magnitude
                    );
                }
            }
        }

        self.hook.on_tick(report.dt, &report.angular_velocity);

        Ok(TickOutcome::Advanced(report))
    }

    /// Flip the pitch lock
    pub fn toggle_pitch_lock(&mut self) -> bool {
        self.state.toggle_lock(Axis::Pitch)
    }

    /// Flip the yaw lock
    pub fn toggle_yaw_lock(&mut self) -> bool {
        self.state.toggle_lock(Axis::Yaw)
    }

    /// Flip the roll lock
    pub fn toggle_roll_lock(&mut self) -> bool {
        self.state.toggle_lock(Axis::Roll)
    }

    /// Current lock flags
    pub fn locks(&self) -> &AxisLocks {
        self.state.locks()
    }

    /// Begin measuring the 0.10 reference sample
    pub fn start_min_calibration<B: VehicleBody + ?Sized>(&mut self, body: &B) -> ControlResult<()> {
        self.measurement
            .start(CalibrationSlot::Min.reference_magnitude(), body)
    }

    /// Begin measuring the 1.00 reference sample
    pub fn start_max_calibration<B: VehicleBody + ?Sized>(&mut self, body: &B) -> ControlResult<()> {
        self.measurement
            .start(CalibrationSlot::Max.reference_magnitude(), body)
    }

    /// Abandon a running measurement; true if one was running
    pub fn cancel_calibration(&mut self) -> bool {
        self.measurement.cancel()
    }

    /// Tornado geometry for a stick magnitude, once both references exist
    pub fn interpolate_calibration(&self, stick_magnitude: f32) -> Option<CalibrationSample> {
        self.calibration.interpolate(stick_magnitude)
    }

    /// Reference samples held in memory
    pub fn calibration(&self) -> &AxisCalibrationStore {
        &self.calibration
    }

    /// Running measurement, if any
    pub fn measurement_state(&self) -> Option<&MeasurementState> {
        self.measurement.state()
    }

    /// Raw stick history, oldest first
    pub fn input_history(&self) -> &InputHistory {
        self.state.input_history()
    }

    /// Persistence backend
    pub fn repository(&self) -> &R {
        &self.repository
    }

    /// Game-mode hook
    pub fn hook(&self) -> &H {
        &self.hook
    }
}
