//! Rotational control core for Airroll
//!
//! Drives a vehicle's orientation from a 2-axis stick through rate control:
//! shaped stick → target angular velocity → PD acceleration → damped, capped
//! velocity → quaternion orientation. Includes the directional air roll (DAR)
//! spin mode and the tornado calibration that measures its geometry.
//!
//! Key constraints:
//! - One tick per rendered frame, dt clamped to [1 ms, 33 ms]
//! - No heap allocation, builds without `std`
//! - Unit orientation quaternion and capped angular velocity after every tick
//!
//! ```no_run
//! use airroll_core::{ControlInput, ControlSettings, InMemoryRepository, RigidBody, Simulation, StickSample};
//!
//! let mut sim = Simulation::new(InMemoryRepository::new());
//! let mut body = RigidBody::default();
//! let settings = ControlSettings::default();
//!
//! // Full stick up for one frame
//! let input = ControlInput::new(StickSample::new(0.0, 1.0), 0.1);
//! match sim.tick(1.0 / 60.0, &settings, &input, &mut body, false) {
//!     Ok(_) => {},  // body.orientation advanced
//!     Err(e) => {}, // non-finite dt, settings or stick
//! }
//! ```

#![cfg_attr(not(feature = "std"), no_std)]
#![deny(unsafe_code)]
#![warn(missing_docs)]

#[macro_use]
mod macros;

pub mod body;
pub mod buffer;
pub mod calibration;
pub mod constants;
pub mod errors;
pub mod input;
pub mod integrator;
pub mod locks;
pub mod mode;
pub mod orientation;
pub mod rate;
pub mod settings;
pub mod simulation;
pub mod state;
pub mod traits;

// Public API
pub use body::RigidBody;
pub use calibration::{
    AxisCalibrationStore, CalibrationRecord, CalibrationRepository, CalibrationSample,
    CalibrationSlot, InMemoryRepository, MeasurementEvent, MeasurementFsm,
};
pub use errors::{ControlError, ControlResult};
pub use input::{InputShaper, ShapedInput, StickSample};
pub use integrator::{ClampPolicy, VelocityIntegrator};
pub use locks::{Axis, AxisLocks};
pub use mode::{AirRoll, ControlFlags, ControlMode, ModeResolver, RollDirection};
pub use orientation::OrientationIntegrator;
pub use rate::RateController;
pub use settings::ControlSettings;
pub use simulation::{Simulation, TickOutcome};
pub use state::{ControlInput, ControlState, TickReport};
pub use traits::{ModePhysicsHook, NoHook, VehicleBody};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
