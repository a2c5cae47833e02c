//! Headless telemetry for the Airroll control core
//!
//! ## Overview
//!
//! Tuning the control core means comparing its step responses against
//! captures recorded in the reference game. This crate closes that loop
//! without a front end:
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`maneuver`] | STABILIZE → INPUT → RELEASE scripts driving a `Simulation` |
//! | [`record`] | One `FrameRecord` per tick, CSV read/write |
//! | [`analysis`] | Peak rate, rise time, decay, acceleration limit, comparison |
//! | [`sweep`] | Tornado radius across stick directions |
//!
//! ## Example Usage
//!
//! ```rust
//! use airroll_core::{Axis, ControlSettings, InMemoryRepository, RigidBody, Simulation};
//! use airroll_telemetry::{Maneuver, ResponseProfile, Signal};
//!
//! let mut sim = Simulation::new(InMemoryRepository::new());
//! let mut body = RigidBody::default();
//!
//! let capture = Maneuver::axis_step(Axis::Yaw, false)
//!     .run(&mut sim, &mut body, &ControlSettings::default())
//!     .unwrap();
//!
//! let profile = ResponseProfile::measure(&capture, Signal::Axis(Axis::Yaw)).unwrap();
//! assert!(profile.peak > 0.0);
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod analysis;
pub mod error;
pub mod maneuver;
pub mod record;
pub mod sweep;

pub use analysis::{compare, Comparison, ResponseProfile, Signal};
pub use error::{TelemetryError, TelemetryResult};
pub use maneuver::Maneuver;
pub use record::{Capture, FrameRecord, ManeuverPhase, TelemetryRecorder};
pub use sweep::{sweep, RadiusConsistency, RadiusSummary, SweepConfig, SweepPoint};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_exists() {
        assert!(!VERSION.is_empty());
    }
}
