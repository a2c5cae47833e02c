//! PD rate controller
//!
//! Per axis: `a = Kp·(w_des − w) − Kd·w`, clamped to `±cap`.
//!
//! The derivative term acts on the measured rate, not on the error, so there
//! is no derivative kick when the target steps. Without an integral term there
//! is no windup to manage, but also no zero steady-state error: with nothing
//! else acting, an axis settles at `Kp / (Kp + Kd) · w_des`.

use nalgebra::Vector3;

use crate::constants::control::{KD_PITCH, KD_ROLL, KD_YAW, KP_PITCH, KP_ROLL, KP_YAW};

/// Proportional and derivative gain for one axis
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PdGains {
    /// Proportional gain (1/s)
    pub kp: f32,
    /// Derivative gain (1/s)
    pub kd: f32,
}

impl PdGains {
    /// Gain pair
    pub const fn new(kp: f32, kd: f32) -> Self {
        Self { kp, kd }
    }

    /// Unclamped commanded acceleration
    #[inline]
    pub fn command(&self, target: f32, current: f32) -> f32 {
        self.kp * (target - current) - self.kd * current
    }

    /// Rate an isolated axis settles at for a constant target
    pub fn steady_state(&self, target: f32) -> f32 {
        self.kp / (self.kp + self.kd) * target
    }
}

/// Fixed-gain three-axis PD controller
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RateController {
    pitch: PdGains,
    yaw: PdGains,
    roll: PdGains,
}

impl Default for RateController {
    fn default() -> Self {
        Self {
            pitch: PdGains::new(KP_PITCH, KD_PITCH),
            yaw: PdGains::new(KP_YAW, KD_YAW),
            roll: PdGains::new(KP_ROLL, KD_ROLL),
        }
    }
}

impl RateController {
    /// Pitch gains
    pub fn pitch(&self) -> PdGains {
        self.pitch
    }

    /// Yaw gains
    pub fn yaw(&self) -> PdGains {
        self.yaw
    }

    /// Roll gains
    pub fn roll(&self) -> PdGains {
        self.roll
    }

    /// Clamped angular acceleration `(pitch, yaw, roll)` in rad/s²
    ///
    /// `caps` must be non-negative; each axis is clamped independently.
    pub fn acceleration(
        &self,
        target: &Vector3<f32>,
        current: &Vector3<f32>,
        caps: &Vector3<f32>,
    ) -> Vector3<f32> {
        let raw = Vector3::new(
            self.pitch.command(target.x, current.x),
            self.yaw.command(target.y, current.y),
            self.roll.command(target.z, current.z),
        );

        raw.zip_map(caps, |a, cap| a.clamp(-cap, cap))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn unclamped_law() {
        let controller = RateController::default();
        let caps = Vector3::repeat(1.0e6);

        let a = controller.acceleration(
            &Vector3::new(1.0, 0.0, 2.0),
            &Vector3::new(0.5, 1.0, 0.0),
            &caps,
        );

        assert_relative_eq!(a.x, 36.0 * 0.5 - 4.0 * 0.5);
        assert_relative_eq!(a.y, 36.0 * -1.0 - 4.0 * 1.0);
        assert_relative_eq!(a.z, 12.0 * 2.0);
    }

    #[test]
    fn clamped_per_axis() {
        let controller = RateController::default();
        let caps = Vector3::new(12.48, 5.0, 1.0);

        let a = controller.acceleration(
            &Vector3::new(8.5, -8.5, 0.0),
            &Vector3::zeros(),
            &caps,
        );

        assert_relative_eq!(a.x, 12.48);
        assert_relative_eq!(a.y, -5.0);
        assert_eq!(a.z, 0.0);
    }

    #[test]
    fn steady_state_fraction() {
        let roll = RateController::default().roll();
        assert_relative_eq!(roll.steady_state(10.0), 8.0);
        // At the steady state the command vanishes
        let w = roll.steady_state(10.0);
        assert_relative_eq!(roll.command(10.0, w), 0.0, epsilon = 1e-5);
    }
}
