//! Tornado Calibration Constants
//!
//! Parameters of the calibration-by-observation procedure. The two reference
//! magnitudes bracket the usable stick range: 0.10 is just past a typical
//! deadzone, 1.00 is full deflection.

/// Stick magnitude of the "min" reference sample.
pub const MIN_REFERENCE_MAGNITUDE: f32 = 0.10;

/// Stick magnitude of the "max" reference sample.
pub const MAX_REFERENCE_MAGNITUDE: f32 = 1.00;

/// A measurement within this distance of 0.10 fills the "min" bucket.
pub const MIN_BUCKET_TOLERANCE: f32 = 0.05;

/// A measurement within this distance of 1.00 fills the "max" bucket.
pub const MAX_BUCKET_TOLERANCE: f32 = 0.1;

/// Lower edge of the opposite-point capture window (degrees of accumulated rotation).
pub const CAPTURE_WINDOW_MIN_DEG: f32 = 179.0;

/// Upper edge of the capture window; exceeding it finishes the measurement.
///
/// The window is two degrees wide so a discrete timestep that overshoots 180°
/// still lands a sample.
pub const CAPTURE_WINDOW_MAX_DEG: f32 = 181.0;

/// Stick magnitude below which a manual measurement is considered abandoned.
pub const CANCEL_STICK_MAGNITUDE: f32 = 0.01;

/// Maximum number of nose positions buffered inside the capture window.
///
/// At 60 Hz even a slow spin spends only a handful of frames in a 2° window.
pub const CAPTURE_BUFFER_CAPACITY: usize = 64;

/// Default vehicle half-length along its forward axis (game units).
///
/// Source: Octane hitbox length 118.01 uu.
pub const DEFAULT_HALF_LENGTH: f32 = 118.01 / 2.0;
