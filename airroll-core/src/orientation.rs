//! Orientation integration
//!
//! First-order quaternion kinematics with the angular velocity in body frame:
//!
//! ```text
//! q̇ = ½ · q ⊗ (0, ωx, ωy, ωz)
//! q ← normalize(q + q̇·dt)
//! ```
//!
//! This is not the exact exponential map; the error per step grows with
//! `|ω|·dt`, which the velocity caps and the 33 ms dt ceiling keep small. The
//! sum drifts off the unit sphere every step, so it is renormalized every step.

use nalgebra::{Quaternion, UnitQuaternion, Vector3};

/// Integrates body-frame angular velocity into orientation
#[derive(Debug, Clone, Copy, Default)]
pub struct OrientationIntegrator;

impl OrientationIntegrator {
    /// Quaternion derivative `½ · q ⊗ (0, ω)`
    pub fn derivative(q: &Quaternion<f32>, w: &Vector3<f32>) -> Quaternion<f32> {
        let omega = Quaternion::from_imag(*w);
        (q * omega) * 0.5
    }

    /// Advance `q` by `dt` seconds of rotation at `w`
    pub fn integrate(
        q: &UnitQuaternion<f32>,
        w: &Vector3<f32>,
        dt: f32,
    ) -> UnitQuaternion<f32> {
        let current = q.quaternion();
        let next = current + Self::derivative(current, w) * dt;

        // A zero-norm sum cannot come out of a unit input with finite w·dt,
        // but keep the previous pose rather than emit NaN if it ever does.
        UnitQuaternion::try_new(next, f32::EPSILON).unwrap_or(*q)
    }
}
