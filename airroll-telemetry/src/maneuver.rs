//! Scripted maneuvers
//!
//! A maneuver runs the simulation headless through three fixed phases and
//! records every tick:
//!
//! ```text
//! STABILIZE (stick centered) → INPUT (stick + flags held) → RELEASE (stick centered)
//!      2 s                           5 s                          3 s
//! ```
//!
//! The stick is marked automated, so a calibration measurement started before
//! the run pauses through the centered phases instead of cancelling.

use airroll_core::{
    Axis, CalibrationRepository, ControlFlags, ControlInput, ControlSettings, ModePhysicsHook,
    RigidBody, RollDirection, Simulation, StickSample, TickOutcome,
};

use crate::{
    error::{TelemetryError, TelemetryResult},
    record::{Capture, ManeuverPhase, TelemetryRecorder},
};

/// Default frame time, 60 FPS
pub const DEFAULT_DT: f32 = 1.0 / 60.0;

/// Default STABILIZE length in seconds
pub const DEFAULT_STABILIZE_SECS: f32 = 2.0;
/// Default INPUT length
pub const DEFAULT_INPUT_SECS: f32 = 5.0;
/// Default RELEASE length
pub const DEFAULT_RELEASE_SECS: f32 = 3.0;

/// A three-phase scripted run
#[derive(Debug, Clone, PartialEq)]
pub struct Maneuver {
    /// Label used in logs and file names
    pub name: String,
    /// Stick held during INPUT
    pub stick: StickSample,
    /// Flags held during INPUT
    pub input_flags: ControlFlags,
    /// Flags held during STABILIZE and RELEASE
    pub idle_flags: ControlFlags,
    /// Stick deadzone passed to every tick
    pub deadzone: f32,
    /// Fixed frame time in seconds
    pub dt: f32,
    /// Length of STABILIZE
    pub stabilize_secs: f32,
    /// Length of INPUT
    pub input_secs: f32,
    /// Length of RELEASE
    pub release_secs: f32,
}

impl Maneuver {
    /// Hold `stick` during INPUT, default timing, no flags
    pub fn new(name: impl Into<String>, stick: StickSample) -> Self {
        Self {
            name: name.into(),
            stick,
            input_flags: ControlFlags::default(),
            idle_flags: ControlFlags::default(),
            deadzone: 0.0,
            dt: DEFAULT_DT,
            stabilize_secs: DEFAULT_STABILIZE_SECS,
            input_secs: DEFAULT_INPUT_SECS,
            release_secs: DEFAULT_RELEASE_SECS,
        }
    }

    /// Full-rate step on one axis, optionally with DAR held the whole run
    ///
    /// Pitch and yaw hold the DAR button through RELEASE. Roll is driven
    /// through free air roll, which only lasts for INPUT.
    pub fn axis_step(axis: Axis, dar: bool) -> Self {
        let suffix = if dar { "dar" } else { "nodar" };
        let dar_only = ControlFlags {
            dar_button: dar,
            ..ControlFlags::default()
        };

        match axis {
            Axis::Pitch => Self::new(format!("pitch_{suffix}"), StickSample::new(0.0, 1.0))
                .with_flags(dar_only, dar_only),
            Axis::Yaw => Self::new(format!("yaw_{suffix}"), StickSample::new(1.0, 0.0))
                .with_flags(dar_only, dar_only),
            Axis::Roll => {
                let mut free = ControlFlags::free();
                free.dar_button = dar;
                Self::new(format!("roll_{suffix}"), StickSample::new(1.0, 0.0))
                    .with_flags(free, dar_only)
            }
        }
    }

    /// Tornado spin: DAR in `direction` with the stick at `magnitude` along `angle_deg`
    pub fn tornado(direction: RollDirection, magnitude: f32, angle_deg: f32) -> Self {
        Self::new(
            format!("tornado_{:?}_{magnitude:.2}_{angle_deg:.1}", direction).to_lowercase(),
            StickSample::polar(magnitude, angle_deg),
        )
        .with_flags(ControlFlags::directional(direction), ControlFlags::default())
    }

    /// Replace the INPUT and idle flags
    pub fn with_flags(mut self, input: ControlFlags, idle: ControlFlags) -> Self {
        self.input_flags = input;
        self.idle_flags = idle;
        self
    }

    /// Replace frame time and phase lengths, all in seconds
    pub fn with_timing(mut self, dt: f32, stabilize: f32, input: f32, release: f32) -> Self {
        self.dt = dt;
        self.stabilize_secs = stabilize;
        self.input_secs = input;
        self.release_secs = release;
        self
    }

    /// Ticks spent in each phase
    pub fn frame_counts(&self) -> TelemetryResult<[(ManeuverPhase, u32); 3]> {
        if !self.dt.is_finite() || self.dt <= 0.0 {
            return Err(TelemetryError::InvalidManeuver("dt must be positive"));
        }
        let frames = |secs: f32| -> TelemetryResult<u32> {
            if !secs.is_finite() || secs < 0.0 {
                return Err(TelemetryError::InvalidManeuver("phase length must be non-negative"));
            }
            Ok((secs / self.dt).round() as u32)
        };

        Ok([
            (ManeuverPhase::Stabilize, frames(self.stabilize_secs)?),
            (ManeuverPhase::Input, frames(self.input_secs)?),
            (ManeuverPhase::Release, frames(self.release_secs)?),
        ])
    }

    /// Input handed to the tick in `phase`
    pub fn input_for(&self, phase: ManeuverPhase) -> ControlInput {
        let (stick, flags) = match phase {
            ManeuverPhase::Input => (self.stick, self.input_flags),
            ManeuverPhase::Stabilize | ManeuverPhase::Release => {
                (StickSample::centered(), self.idle_flags)
            }
        };
        ControlInput::new(stick, self.deadzone)
            .with_flags(flags)
            .automated()
    }

    /// Drive `sim` through all three phases, one recorded frame per tick
    pub fn run<R, H>(
        &self,
        sim: &mut Simulation<R, H>,
        body: &mut RigidBody,
        settings: &ControlSettings,
    ) -> TelemetryResult<Capture>
    where
        R: CalibrationRepository,
        H: ModePhysicsHook,
    {
        let counts = self.frame_counts()?;
        let total: u32 = counts.iter().map(|(_, n)| n).sum();
        let mut recorder = TelemetryRecorder::with_capacity(total as usize);

        log::info!("Running maneuver {} ({} frames)", self.name, total);
        for (phase, frames) in counts {
            let input = self.input_for(phase);
            for _ in 0..frames {
                match sim.tick(self.dt, settings, &input, body, false)? {
                    TickOutcome::Advanced(report) => {
                        recorder.record(report.dt, &input, &report, phase)
                    }
                    TickOutcome::Paused => {}
                }
            }
        }

        let capture = recorder.finish();
        if let Some(peak) = capture.frames().iter().map(|f| f.magnitude).reduce(f32::max) {
            log::info!(
                "Maneuver {} peak rate {:.3} rad/s ({:.1}°/s)",
                self.name,
                peak,
                peak.to_degrees()
            );
        }
        Ok(capture)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use airroll_core::{ControlMode, InMemoryRepository};
    use approx::assert_relative_eq;

    #[test]
    fn default_timing_is_600_frames() {
        let counts = Maneuver::axis_step(Axis::Pitch, false).frame_counts().unwrap();
        assert_eq!(counts[0], (ManeuverPhase::Stabilize, 120));
        assert_eq!(counts[1], (ManeuverPhase::Input, 300));
        assert_eq!(counts[2], (ManeuverPhase::Release, 180));
    }

    #[test]
    fn bad_timing_is_rejected() {
        let m = Maneuver::axis_step(Axis::Yaw, false).with_timing(0.0, 1.0, 1.0, 1.0);
        assert!(matches!(m.frame_counts(), Err(TelemetryError::InvalidManeuver(_))));

        let m = Maneuver::axis_step(Axis::Yaw, false).with_timing(0.01, -1.0, 1.0, 1.0);
        assert!(m.frame_counts().is_err());
    }

    #[test]
    fn roll_step_drops_free_air_roll_on_release() {
        let m = Maneuver::axis_step(Axis::Roll, true);
        let input = m.input_for(ManeuverPhase::Input);
        let release = m.input_for(ManeuverPhase::Release);

        assert_eq!(
            ControlMode::from_flags(input.flags, RollDirection::Left),
            ControlMode::FreeAirRoll
        );
        assert!(release.flags.dar_button);
        assert_eq!(release.stick, StickSample::centered());
        assert!(release.automated);
    }

    #[test]
    fn run_records_every_tick_in_phase_order() {
        let mut sim = Simulation::new(InMemoryRepository::new());
        let mut body = RigidBody::default();
        let m = Maneuver::axis_step(Axis::Pitch, false).with_timing(0.02, 0.1, 0.5, 0.2);

        let capture = m.run(&mut sim, &mut body, &ControlSettings::default()).unwrap();
        assert_eq!(capture.len(), 5 + 25 + 10);
        assert_eq!(capture.phase(ManeuverPhase::Input).len(), 25);

        let first_input = capture.phase(ManeuverPhase::Input)[0];
        assert_eq!(first_input.frame, 5);
        assert_relative_eq!(first_input.time, 0.1, epsilon = 1e-5);
        assert_relative_eq!(first_input.input_pitch, 1.0);
        assert!(first_input.wx > 0.0);

        assert!(capture.phase(ManeuverPhase::Stabilize).iter().all(|f| f.magnitude == 0.0));
    }
}
