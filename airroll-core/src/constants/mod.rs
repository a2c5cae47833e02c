//! Constants for the Airroll Core
//!
//! Every fixed number of the control law and the calibration procedure lives
//! here, grouped by domain:
//! - **Control**: PD gains, DAR rate and acceleration multipliers, timestep clamps
//! - **Calibration**: reference magnitudes, bucket tolerances, capture window
//!
//! User-tunable values (acceleration caps, velocity caps, damping) are not
//! constants; see [`crate::settings::ControlSettings`].

/// PD gains, DAR parameters and timestep limits.
pub mod control;

/// Tornado calibration reference points and capture window.
pub mod calibration;

pub use control::{
    KP_PITCH, KD_PITCH, KP_YAW, KD_YAW, KP_ROLL, KD_ROLL,
    DAR_ROLL_PERIOD_S, DAR_ROLL_RATE,
    RELEASE_EFFORT_THRESHOLD, MIN_DT_S, MAX_DT_S,
    DEG_TO_RAD, RAD_TO_DEG,
};

pub use calibration::{
    MIN_REFERENCE_MAGNITUDE, MAX_REFERENCE_MAGNITUDE,
    CAPTURE_WINDOW_MIN_DEG, CAPTURE_WINDOW_MAX_DEG,
    CANCEL_STICK_MAGNITUDE, DEFAULT_HALF_LENGTH,
};
