//! Control Law Constants
//!
//! Fixed parameters of the rotational control law. None of these are user
//! tunable; the tunable caps and damping live in [`crate::ControlSettings`].
//! The fitted values come from frame-by-frame captures of the reference game
//! and must be kept exactly as written for the response to match.

use core::f32::consts::PI;

// ===== PD GAINS =====

/// Proportional gain for pitch (1/s).
///
/// Pitch and yaw share gains; the reference response is symmetric on those axes.
pub const KP_PITCH: f32 = 36.0;

/// Derivative gain for pitch (1/s).
pub const KD_PITCH: f32 = 4.0;

/// Proportional gain for yaw (1/s).
pub const KP_YAW: f32 = 36.0;

/// Derivative gain for yaw (1/s).
pub const KD_YAW: f32 = 4.0;

/// Proportional gain for roll (1/s).
///
/// Roll is softer than pitch/yaw; the DAR spin-up is visibly slower in captures.
pub const KP_ROLL: f32 = 12.0;

/// Derivative gain for roll (1/s).
pub const KD_ROLL: f32 = 3.0;

// ===== DIRECTIONAL AIR ROLL =====

/// Period of one full directional-air-roll revolution (s).
///
/// Source: stopwatch captures of a held air-roll input, 0.74 s per turn.
pub const DAR_ROLL_PERIOD_S: f32 = 0.74;

/// Constant DAR roll rate magnitude (rad/s), `2π / 0.74 ≈ 8.49`.
pub const DAR_ROLL_RATE: f32 = 2.0 * PI / DAR_ROLL_PERIOD_S;

/// Pitch acceleration cap multiplier while DAR is active.
///
/// Source: 714 → 712 deg/s² measured with the air-roll button held.
pub const DAR_PITCH_ACCEL_SCALE: f32 = 0.997;

/// Yaw acceleration cap multiplier while DAR is active (unchanged).
pub const DAR_YAW_ACCEL_SCALE: f32 = 1.000;

/// Roll acceleration cap multiplier while DAR is active.
///
/// Source: 2153 → 2110 deg/s² measured with the air-roll button held.
pub const DAR_ROLL_ACCEL_SCALE: f32 = 0.98;

// ===== RELEASE DAMPING =====

/// Effort below which the stick counts as released and damping kicks in.
pub const RELEASE_EFFORT_THRESHOLD: f32 = 0.08;

// ===== TIMESTEP =====

/// Smallest accepted frame delta (s). Guards zero and negative deltas.
pub const MIN_DT_S: f32 = 0.001;

/// Largest accepted frame delta (s). Guards time jumps after a backgrounded tab.
pub const MAX_DT_S: f32 = 0.033;

// ===== UNIT CONVERSION =====

/// Degrees to radians.
pub const DEG_TO_RAD: f32 = PI / 180.0;

/// Radians to degrees.
pub const RAD_TO_DEG: f32 = 180.0 / PI;
