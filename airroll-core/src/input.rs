//! Stick input shaping
//!
//! Turns a raw 2-axis stick sample into an effort scalar and a direction:
//!
//! ```text
//! mag  = hypot(jx, jy)
//! mag <= deadzone  →  eff = 0, (ux, uy) = (0, 0)
//! otherwise        →  m2  = (mag - deadzone) / (1 - deadzone)
//!                     eff = max(0, m2) ^ input_pow
//!                     ux  = -jx,  uy = jy
//! ```
//!
//! The direction is taken from the raw components, not from a normalized
//! vector, and magnitudes above 1 are not re-clamped. A diagonal past the rim
//! therefore commands slightly more than full rate on both axes, which is what
//! the reference game does.

use crate::{buffer::RingBuffer, traits::Validatable};

/// Capacity of the raw stick history
pub const INPUT_HISTORY_CAPACITY: usize = 3;

/// Raw stick history, kept for diagnostics only
///
/// Shaping never reads it; see `ControlState::input_history`.
pub type InputHistory = RingBuffer<StickSample, INPUT_HISTORY_CAPACITY>;

/// One raw stick reading in fractions of the joystick radius
///
/// `y` is already up-positive when it reaches the core.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StickSample {
    /// Horizontal deflection
    pub x: f32,
    /// Vertical deflection, up positive
    pub y: f32,
}

impl StickSample {
    /// Sample from fractional components
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Centered stick
    pub const fn centered() -> Self {
        Self { x: 0.0, y: 0.0 }
    }

    /// Sample from an on-screen offset and the joystick radius, both in pixels
    pub fn from_radius_units(dx: f32, dy: f32, radius: f32) -> Self {
        if radius <= 0.0 {
            return Self::centered();
        }
        Self {
            x: dx / radius,
            y: dy / radius,
        }
    }

    /// Sample at `magnitude` along `angle_deg`, 0° up and 90° right
    pub fn polar(magnitude: f32, angle_deg: f32) -> Self {
        let rad = angle_deg.to_radians();
        Self {
            x: magnitude * libm::sinf(rad),
            y: magnitude * libm::cosf(rad),
        }
    }

    /// Euclidean deflection
    pub fn magnitude(&self) -> f32 {
        libm::hypotf(self.x, self.y)
    }

    /// True when both components are finite
    pub fn is_finite(&self) -> bool {
        self.x.is_valid() && self.y.is_valid()
    }
}

/// Shaped stick: effort plus the direction used by the mode resolver
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ShapedInput {
    /// Raw deflection before the deadzone
    pub magnitude: f32,
    /// Shaped effort in [0, ∞), 1 at the rim
    pub effort: f32,
    /// Yaw direction, `-jx`
    pub ux: f32,
    /// Pitch direction, `jy`
    pub uy: f32,
}

impl ShapedInput {
    /// True when the stick counts as released for damping purposes
    pub fn is_released(&self, threshold: f32) -> bool {
        self.effort < threshold
    }
}

/// Deadzone and response curve
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InputShaper {
    deadzone: f32,
    input_pow: f32,
}

impl InputShaper {
    /// Shaper for one tick's deadzone and exponent
    ///
    /// `input_pow = 1` is linear; above 1 the response is soft near center
    /// and steep near the rim.
    pub fn new(deadzone: f32, input_pow: f32) -> Self {
        Self { deadzone, input_pow }
    }

    /// Deadzone radius
    pub fn deadzone(&self) -> f32 {
        self.deadzone
    }

    /// Response exponent
    pub fn input_pow(&self) -> f32 {
        self.input_pow
    }

    /// Shape one stick sample
    pub fn shape(&self, stick: StickSample) -> ShapedInput {
        let magnitude = stick.magnitude();

        if magnitude <= self.deadzone {
            return ShapedInput {
                magnitude,
                ..ShapedInput::default()
            };
        }

        let rescaled = (magnitude - self.deadzone) / (1.0 - self.deadzone);
        let effort = libm::powf(rescaled.max(0.0), self.input_pow);

        ShapedInput {
            magnitude,
            effort,
            ux: -stick.x,
            uy: stick.y,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn inside_deadzone_is_silent() {
        let shaper = InputShaper::new(0.1, 1.5);
        let shaped = shaper.shape(StickSample::new(0.05, 0.05));

        assert_eq!(shaped.effort, 0.0);
        assert_eq!((shaped.ux, shaped.uy), (0.0, 0.0));
        assert_relative_eq!(shaped.magnitude, 0.0707, epsilon = 1e-4);
    }

    #[test]
    fn full_deflection_is_unit_effort() {
        let shaper = InputShaper::new(0.1, 1.5);
        let shaped = shaper.shape(StickSample::new(0.0, 1.0));

        assert_relative_eq!(shaped.effort, 1.0, epsilon = 1e-6);
        assert_eq!(shaped.uy, 1.0);
        assert_eq!(shaped.ux, 0.0);
    }

    #[test]
    fn horizontal_sign_is_flipped() {
        let shaper = InputShaper::new(0.0, 1.0);
        let shaped = shaper.shape(StickSample::new(0.5, 0.0));

        assert_relative_eq!(shaped.effort, 0.5);
        assert_eq!(shaped.ux, -0.5);
    }

    #[test]
    fn exponent_softens_mid_range() {
        let linear = InputShaper::new(0.0, 1.0).shape(StickSample::new(0.0, 0.5));
        let curved = InputShaper::new(0.0, 1.5).shape(StickSample::new(0.0, 0.5));

        assert_relative_eq!(linear.effort, 0.5);
        assert_relative_eq!(curved.effort, libm::powf(0.5, 1.5), epsilon = 1e-6);
        assert!(curved.effort < linear.effort);
    }

    #[test]
    fn out_of_range_propagates() {
        let shaped = InputShaper::new(0.0, 1.0).shape(StickSample::new(1.2, 0.9));

        // hypot(1.2, 0.9) = 1.5, not clamped
        assert_relative_eq!(shaped.effort, 1.5, epsilon = 1e-5);
        assert_relative_eq!(shaped.ux, -1.2);
    }

    #[test]
    fn radius_units() {
        let stick = StickSample::from_radius_units(30.0, -60.0, 60.0);
        assert_relative_eq!(stick.x, 0.5);
        assert_relative_eq!(stick.y, -1.0);
        assert_eq!(StickSample::from_radius_units(3.0, 3.0, 0.0), StickSample::centered());
    }

    #[test]
    fn polar_sample() {
        let right = StickSample::polar(1.0, 90.0);
        assert_relative_eq!(right.x, 1.0, epsilon = 1e-6);
        assert_relative_eq!(right.y, 0.0, epsilon = 1e-6);
    }
}
