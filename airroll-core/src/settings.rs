//! User-tunable control settings
//!
//! Delivered fresh each tick by the configuration collaborator. Nothing here is
//! cached by the core beyond the tick it is passed into, so a UI slider can
//! change any field between frames.
//!
//! Defaults are the values measured against the reference game:
//!
//! | Field | Default | Unit |
//! |-------|---------|------|
//! | `max_accel_pitch_deg` | 714 | deg/s² |
//! | `max_accel_yaw_deg` | 521 | deg/s² |
//! | `max_accel_roll_deg` | 2153 | deg/s² |
//! | `w_max_pitch` / `w_max_yaw` / `w_max_roll` | 8.5 | rad/s |
//! | `w_max` | 5.5 | rad/s |
//! | `damp` / `damp_dar` | 2.96 / 4.35 | 1/s |
//! | `brake_on_release` | 0 | 1/s |
//! | `input_pow` | 1.5 | – |

use crate::{
    constants::DEG_TO_RAD,
    errors::{ControlError, ControlResult},
    integrator::ClampPolicy,
    mode::RollDirection,
    traits::Validatable,
};

/// Tunable caps, damping and input shaping
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ControlSettings {
    /// Pitch acceleration cap (deg/s²)
    pub max_accel_pitch_deg: f32,
    /// Yaw acceleration cap (deg/s²)
    pub max_accel_yaw_deg: f32,
    /// Roll acceleration cap (deg/s²)
    pub max_accel_roll_deg: f32,

    /// Pitch rate at full stick, also the pitch velocity cap (rad/s)
    pub w_max_pitch: f32,
    /// Yaw rate at full stick, also the yaw velocity cap (rad/s)
    pub w_max_yaw: f32,
    /// Roll rate at full stick in free air roll (rad/s)
    pub w_max_roll: f32,
    /// Global angular speed cap (rad/s)
    pub w_max: f32,

    /// Release damping outside DAR (1/s)
    pub damp: f32,
    /// Release damping while DAR is active (1/s)
    pub damp_dar: f32,
    /// Extra release damping added outside DAR (1/s)
    pub brake_on_release: f32,

    /// Exponent applied to the rescaled stick magnitude
    pub input_pow: f32,

    /// Spin direction when the DAR button is held without a directional roll
    pub dar_direction: RollDirection,

    /// How the global speed cap is enforced
    pub clamp_policy: ClampPolicy,
}

impl Default for ControlSettings {
    fn default() -> Self {
        Self {
            max_accel_pitch_deg: 714.0,
            max_accel_yaw_deg: 521.0,
            max_accel_roll_deg: 2153.0,
            w_max_pitch: 8.5,
            w_max_yaw: 8.5,
            w_max_roll: 8.5,
            w_max: 5.5,
            damp: 2.96,
            damp_dar: 4.35,
            brake_on_release: 0.0,
            input_pow: 1.5,
            dar_direction: RollDirection::Left,
            clamp_policy: ClampPolicy::Hard,
        }
    }
}

impl ControlSettings {
    /// Pitch acceleration cap in rad/s²
    pub fn max_accel_pitch_rad(&self) -> f32 {
        self.max_accel_pitch_deg * DEG_TO_RAD
    }

    /// Yaw acceleration cap in rad/s²
    pub fn max_accel_yaw_rad(&self) -> f32 {
        self.max_accel_yaw_deg * DEG_TO_RAD
    }

    /// Roll acceleration cap in rad/s²
    pub fn max_accel_roll_rad(&self) -> f32 {
        self.max_accel_roll_deg * DEG_TO_RAD
    }

    /// Reject values that would corrupt the integrator
    ///
    /// Every field must be finite; caps and damping must be non-negative and
    /// the shaping exponent strictly positive.
    pub fn validate(&self) -> ControlResult<()> {
        let non_negative: [(&'static str, f32); 10] = [
            ("max_accel_pitch_deg", self.max_accel_pitch_deg),
            ("max_accel_yaw_deg", self.max_accel_yaw_deg),
            ("max_accel_roll_deg", self.max_accel_roll_deg),
            ("w_max_pitch", self.w_max_pitch),
            ("w_max_yaw", self.w_max_yaw),
            ("w_max_roll", self.w_max_roll),
            ("w_max", self.w_max),
            ("damp", self.damp),
            ("damp_dar", self.damp_dar),
            ("brake_on_release", self.brake_on_release),
        ];

        for (field, value) in non_negative {
            if !value.is_valid() || value < 0.0 {
                return Err(ControlError::InvalidSetting { field });
            }
        }

        if !self.input_pow.is_valid() || self.input_pow <= 0.0 {
            return Err(ControlError::InvalidSetting { field: "input_pow" });
        }

        if let ClampPolicy::Soft { retain } = self.clamp_policy {
            if !retain.is_valid() || !(0.0..=1.0).contains(&retain) {
                return Err(ControlError::InvalidSetting { field: "clamp_policy" });
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn defaults_are_valid() {
        assert!(ControlSettings::default().validate().is_ok());
    }

    #[test]
    fn degree_conversion() {
        let settings = ControlSettings {
            max_accel_pitch_deg: 715.0,
            ..ControlSettings::default()
        };
        assert_relative_eq!(settings.max_accel_pitch_rad(), 12.479, epsilon = 1e-3);
    }

    #[test]
    fn nan_is_rejected() {
        let settings = ControlSettings {
            w_max: f32::NAN,
            ..ControlSettings::default()
        };
        assert_eq!(
            settings.validate(),
            Err(ControlError::InvalidSetting { field: "w_max" })
        );
    }

    #[test]
    fn exponent_must_be_positive() {
        let settings = ControlSettings {
            input_pow: 0.0,
            ..ControlSettings::default()
        };
        assert!(settings.validate().is_err());
    }

    #[test]
    fn soft_retain_in_unit_range() {
        let settings = ControlSettings {
            clamp_policy: ClampPolicy::Soft { retain: 1.5 },
            ..ControlSettings::default()
        };
        assert_eq!(
            settings.validate(),
            Err(ControlError::InvalidSetting { field: "clamp_policy" })
        );
    }
}
