//! Error Types for the Rotational Control Core
//!
//! ## Design Philosophy
//!
//! The control core runs once per rendered frame, so its errors follow the same
//! rules as any hot-path error type on a small target:
//!
//! 1. **Small Size**: Variants carry at most one scalar or a `&'static str`.
//!
//! 2. **No Heap Allocation**: No `String` payloads, the core builds without `alloc`.
//!
//! 3. **Copy Semantics**: Errors are `Copy` so they can be returned from the tick
//!    and stored in reports without ownership juggling.
//!
//! ## What Is (and Is Not) an Error
//!
//! Only conditions that would corrupt the owned state are errors:
//!
//! - `InvalidTimestep`: a non-finite `dt` would poison the orientation quaternion.
//! - `InvalidSetting`: a NaN slipped in from a UI field.
//! - `InvalidInput`: a non-finite stick sample.
//!
//! Expected control flow is never an error. A paused simulation returns
//! `TickOutcome::Paused`, and a missing calibration sample is `None`.
//!
//! ```rust
//! use airroll_core::{ControlError, ControlSettings};
//!
//! let mut settings = ControlSettings::default();
//! settings.damp = f32::NAN;
//!
//! match settings.validate() {
//!     Err(ControlError::InvalidSetting { field }) => assert_eq!(field, "damp"),
//!     other => panic!("unexpected {:?}", other),
//! }
//! ```

use thiserror_no_std::Error;

/// Result type for control operations
pub type ControlResult<T> = Result<T, ControlError>;

/// Errors surfaced by the control core
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum ControlError {
    /// Timestep is NaN or infinite. Finite values are clamped instead.
    #[error("Invalid timestep {dt}: must be finite")]
    InvalidTimestep {
        /// The rejected timestep in seconds
        dt: f32,
    },

    /// A settings field is non-finite or outside its legal domain
    #[error("Invalid setting: {field}")]
    InvalidSetting {
        /// Name of the offending `ControlSettings` field
        field: &'static str,
    },

    /// Stick sample or other per-tick input is unusable
    #[error("Invalid input: {reason}")]
    InvalidInput {
        /// What was wrong with it
        reason: &'static str,
    },

    /// A calibration measurement is already running
    #[error("A calibration measurement is already in progress")]
    MeasurementInProgress,

    /// Calibration persistence backend refused a write
    #[error("Calibration storage unavailable: {reason}")]
    StorageUnavailable {
        /// Backend-specific cause
        reason: &'static str,
    },
}

#[cfg(feature = "defmt")]
impl defmt::Format for ControlError {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            Self::InvalidTimestep { dt } =>
                defmt::write!(fmt, "Invalid timestep {}", dt),
            Self::InvalidSetting { field } =>
                defmt::write!(fmt, "Invalid setting: {}", field),
            Self::InvalidInput { reason } =>
                defmt::write!(fmt, "Invalid input: {}", reason),
            Self::MeasurementInProgress =>
                defmt::write!(fmt, "Measurement in progress"),
            Self::StorageUnavailable { reason } =>
                defmt::write!(fmt, "Storage unavailable: {}", reason),
        }
    }
}
