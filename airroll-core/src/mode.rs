//! Control mode resolution
//!
//! Three mutually exclusive modes decide what the stick commands:
//!
//! | Mode | pitch target | yaw target | roll target |
//! |------|--------------|------------|-------------|
//! | Normal | `w_max_pitch·eff·uy` | `w_max_yaw·eff·ux` | 0 |
//! | Directional air roll | `w_max_pitch·eff·uy` | `w_max_yaw·eff·ux` | `±2π/0.74` |
//! | Free air roll | `w_max_pitch·eff·uy` | 0 | `w_max_roll·eff·(-ux)` |
//!
//! The DAR roll rate is a constant spin, independent of stick effort. While DAR
//! is active the acceleration caps (not the rates) get small fitted multipliers.

use nalgebra::Vector3;

use crate::{
    constants::control::{
        DAR_PITCH_ACCEL_SCALE, DAR_ROLL_ACCEL_SCALE, DAR_ROLL_RATE, DAR_YAW_ACCEL_SCALE,
    },
    input::ShapedInput,
    settings::ControlSettings,
};

/// Spin direction of a directional air roll
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RollDirection {
    /// Counter-clockwise seen from behind, sign -1
    Left,
    /// Clockwise seen from behind, sign +1
    Right,
}

impl RollDirection {
    /// -1 for left, +1 for right
    pub fn sign(self) -> f32 {
        match self {
            Self::Left => -1.0,
            Self::Right => 1.0,
        }
    }
}

/// Air-roll selector as reported by the input collaborator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AirRoll {
    /// No air-roll binding held
    #[default]
    None,
    /// Air roll left binding held
    Left,
    /// Air roll right binding held
    Right,
    /// Free air roll binding held
    Free,
}

/// Raw mode flags from the input collaborator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ControlFlags {
    /// DAR toggle/button
    pub dar_button: bool,
    /// Air-roll selector
    pub air_roll: AirRoll,
}

impl ControlFlags {
    /// Flags for a held directional roll
    pub fn directional(direction: RollDirection) -> Self {
        Self {
            dar_button: true,
            air_roll: match direction {
                RollDirection::Left => AirRoll::Left,
                RollDirection::Right => AirRoll::Right,
            },
        }
    }

    /// Flags for a held free air roll
    pub fn free() -> Self {
        Self {
            dar_button: false,
            air_roll: AirRoll::Free,
        }
    }
}

/// Resolved control mode for one tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ControlMode {
    /// Pitch + yaw rate control
    #[default]
    Normal,
    /// Pitch + yaw rate control plus a constant roll spin
    DirectionalAirRoll(RollDirection),
    /// Pitch + roll rate control, no yaw
    FreeAirRoll,
}

impl ControlMode {
    /// Resolve the flags into one mode
    ///
    /// Free air roll wins over everything. A directional binding selects DAR in
    /// its own direction; the DAR button alone selects DAR in
    /// `default_direction`.
    pub fn from_flags(flags: ControlFlags, default_direction: RollDirection) -> Self {
        match flags.air_roll {
            AirRoll::Free => Self::FreeAirRoll,
            AirRoll::Left => Self::DirectionalAirRoll(RollDirection::Left),
            AirRoll::Right => Self::DirectionalAirRoll(RollDirection::Right),
            AirRoll::None if flags.dar_button => Self::DirectionalAirRoll(default_direction),
            AirRoll::None => Self::Normal,
        }
    }

    /// True while a directional air roll is active
    pub fn is_dar(self) -> bool {
        matches!(self, Self::DirectionalAirRoll(_))
    }
}

/// Maps shaped input and mode to target rates and acceleration caps
#[derive(Debug, Clone, Copy, Default)]
pub struct ModeResolver;

impl ModeResolver {
    /// Desired angular velocity `(pitch, yaw, roll)` in rad/s
    pub fn target_rates(
        mode: ControlMode,
        input: &ShapedInput,
        settings: &ControlSettings,
    ) -> Vector3<f32> {
        let eff = input.effort;
        let pitch = settings.w_max_pitch * eff * input.uy;

        match mode {
            ControlMode::Normal => Vector3::new(pitch, settings.w_max_yaw * eff * input.ux, 0.0),
            ControlMode::DirectionalAirRoll(direction) => Vector3::new(
                pitch,
                settings.w_max_yaw * eff * input.ux,
                direction.sign() * DAR_ROLL_RATE,
            ),
            ControlMode::FreeAirRoll => {
                Vector3::new(pitch, 0.0, settings.w_max_roll * eff * -input.ux)
            }
        }
    }

    /// Per-axis acceleration caps `(pitch, yaw, roll)` in rad/s²
    pub fn accel_caps(mode: ControlMode, settings: &ControlSettings) -> Vector3<f32> {
        let caps = Vector3::new(
            settings.max_accel_pitch_rad(),
            settings.max_accel_yaw_rad(),
            settings.max_accel_roll_rad(),
        );

        if mode.is_dar() {
            caps.component_mul(&Vector3::new(
                DAR_PITCH_ACCEL_SCALE,
                DAR_YAW_ACCEL_SCALE,
                DAR_ROLL_ACCEL_SCALE,
            ))
        } else {
            caps
        }
    }
}
