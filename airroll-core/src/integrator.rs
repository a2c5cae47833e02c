//! Angular velocity integration
//!
//! One step, in this order:
//!
//! 1. Euler update `w += a·dt`
//! 2. Locked axes forced to 0
//! 3. Release damping `w *= exp(-c·dt)`, only while effort < 0.08
//! 4. Hard per-axis clamp of pitch and yaw
//! 5. Global cap on `|w|`
//!
//! After a step with [`ClampPolicy::Hard`]: `|w| <= w_max`,
//! `|w.pitch| <= w_max_pitch`, `|w.yaw| <= w_max_yaw`.
//!
//! The damping coefficient is `damp_dar` while DAR is active, otherwise
//! `damp + brake_on_release`. Roll has no per-axis clamp; the global cap is the
//! only thing bounding it.

use nalgebra::Vector3;

use crate::{
    constants::control::RELEASE_EFFORT_THRESHOLD,
    locks::AxisLocks,
    settings::ControlSettings,
};

/// How the global speed cap is enforced
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ClampPolicy {
    /// Rescale to exactly `w_max` when exceeded
    #[default]
    Hard,
    /// Remove only part of the excess; `retain` in [0, 1] is the fraction kept
    ///
    /// `retain = 0` behaves like `Hard`. Speeds above `w_max` can persist over
    /// several ticks under this policy.
    Soft {
        /// Fraction of the excess magnitude kept each tick
        retain: f32,
    },
}

/// Graduated speed limiter
///
/// Shrinks `w` so that `|w'| = w_max + retain·(|w| − w_max)`; vectors already
/// under the cap are returned unchanged.
pub fn soft_clamp(w: Vector3<f32>, w_max: f32, retain: f32) -> Vector3<f32> {
    let speed = w.norm();
    if speed <= w_max || speed == 0.0 {
        return w;
    }

    let limited = w_max + retain * (speed - w_max);
    w * (limited / speed)
}

/// Hard limiter: rescale to exactly `w_max` when exceeded
pub fn hard_clamp(w: Vector3<f32>, w_max: f32) -> Vector3<f32> {
    let speed = w.norm();
    if speed > w_max {
        w * (w_max / speed)
    } else {
        w
    }
}

/// Integrates acceleration into angular velocity for one tick
#[derive(Debug, Clone, Copy)]
pub struct VelocityIntegrator<'a> {
    settings: &'a ControlSettings,
    dar_active: bool,
}

impl<'a> VelocityIntegrator<'a> {
    /// Integrator for this tick's settings and DAR state
    pub fn new(settings: &'a ControlSettings, dar_active: bool) -> Self {
        Self { settings, dar_active }
    }

    /// Exponential decay rate applied while the stick is released (1/s)
    pub fn damping_coefficient(&self) -> f32 {
        if self.dar_active {
            self.settings.damp_dar
        } else {
            self.settings.damp + self.settings.brake_on_release
        }
    }

    /// Run steps 1 to 5 on `w` in place
    pub fn step(
        &self,
        w: &mut Vector3<f32>,
        accel: &Vector3<f32>,
        effort: f32,
        locks: &AxisLocks,
        dt: f32,
    ) {
        *w += accel * dt;

        locks.apply(w);

        if effort < RELEASE_EFFORT_THRESHOLD {
            *w *= libm::expf(-self.damping_coefficient() * dt);
        }

        w.x = w.x.clamp(-self.settings.w_max_pitch, self.settings.w_max_pitch);
        w.y = w.y.clamp(-self.settings.w_max_yaw, self.settings.w_max_yaw);

        *w = match self.settings.clamp_policy {
            ClampPolicy::Hard => hard_clamp(*w, self.settings.w_max),
            ClampPolicy::Soft { retain } => soft_clamp(*w, self.settings.w_max, retain),
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn wide_open() -> ControlSettings {
        ControlSettings {
            w_max: 100.0,
            w_max_pitch: 100.0,
            w_max_yaw: 100.0,
            ..ControlSettings::default()
        }
    }

    #[test]
    fn euler_update_under_input() {
        let settings = wide_open();
        let mut w = Vector3::new(1.0, 0.0, 0.0);
        VelocityIntegrator::new(&settings, false).step(
            &mut w,
            &Vector3::new(10.0, -5.0, 2.0),
            1.0,
            &AxisLocks::default(),
            0.1,
        );
        assert_relative_eq!(w, Vector3::new(2.0, -0.5, 0.2), epsilon = 1e-6);
    }

    #[test]
    fn release_damping_decays_roll() {
        let settings = ControlSettings {
            damp: 2.96,
            ..wide_open()
        };
        let mut w = Vector3::new(0.0, 0.0, 5.0);
        VelocityIntegrator::new(&settings, false).step(
            &mut w,
            &Vector3::zeros(),
            0.0,
            &AxisLocks::default(),
            0.1,
        );
        assert_relative_eq!(w.z, 5.0 * libm::expf(-0.296), epsilon = 1e-5);
        assert_relative_eq!(w.z, 3.719, epsilon = 1e-3);
    }

    #[test]
    fn no_damping_while_stick_held() {
        let settings = wide_open();
        let mut w = Vector3::new(0.0, 0.0, 5.0);
        VelocityIntegrator::new(&settings, false).step(
            &mut w,
            &Vector3::zeros(),
            0.08,
            &AxisLocks::default(),
            0.1,
        );
        assert_eq!(w.z, 5.0);
    }

    #[test]
    fn dar_damping_skips_brake() {
        let settings = ControlSettings {
            brake_on_release: 1.0,
            ..ControlSettings::default()
        };
        assert_relative_eq!(VelocityIntegrator::new(&settings, true).damping_coefficient(), 4.35);
        assert_relative_eq!(VelocityIntegrator::new(&settings, false).damping_coefficient(), 3.96);
    }

    #[test]
    fn locks_override_acceleration() {
        let settings = wide_open();
        let locks = AxisLocks { pitch: true, ..AxisLocks::default() };
        let mut w = Vector3::new(3.0, 0.0, 0.0);
        VelocityIntegrator::new(&settings, false).step(
            &mut w,
            &Vector3::new(50.0, 1.0, 0.0),
            1.0,
            &locks,
            0.016,
        );
        assert_eq!(w.x, 0.0);
        assert!(w.y > 0.0);
    }

    #[test]
    fn per_axis_then_global_caps() {
        let settings = ControlSettings {
            w_max_pitch: 2.0,
            w_max_yaw: 2.0,
            w_max: 2.5,
            ..ControlSettings::default()
        };
        let mut w = Vector3::new(10.0, -10.0, 0.0);
        VelocityIntegrator::new(&settings, false).step(
            &mut w,
            &Vector3::zeros(),
            1.0,
            &AxisLocks::default(),
            0.016,
        );

        // (2, -2, 0) has length 2.83, rescaled to 2.5
        assert_relative_eq!(w.norm(), 2.5, epsilon = 1e-5);
        assert_relative_eq!(w.x, -w.y, epsilon = 1e-6);
    }

    #[test]
    fn soft_clamp_keeps_part_of_excess() {
        let w = Vector3::new(0.0, 0.0, 10.0);
        assert_relative_eq!(soft_clamp(w, 6.0, 0.5).norm(), 8.0, epsilon = 1e-5);
        assert_relative_eq!(soft_clamp(w, 6.0, 0.0).norm(), 6.0, epsilon = 1e-5);
        assert_eq!(soft_clamp(w, 12.0, 0.5), w);
    }

    #[test]
    fn soft_policy_is_opt_in() {
        let mut settings = ControlSettings {
            w_max: 1.0,
            ..ControlSettings::default()
        };
        let start = Vector3::new(0.0, 0.0, 3.0);

        let mut hard = start;
        VelocityIntegrator::new(&settings, false).step(&mut hard, &Vector3::zeros(), 1.0, &AxisLocks::default(), 0.016);
        assert_relative_eq!(hard.norm(), 1.0, epsilon = 1e-6);

        settings.clamp_policy = ClampPolicy::Soft { retain: 0.5 };
        let mut soft = start;
        VelocityIntegrator::new(&settings, false).step(&mut soft, &Vector3::zeros(), 1.0, &AxisLocks::default(), 0.016);
        assert_relative_eq!(soft.norm(), 2.0, epsilon = 1e-5);
    }
}
