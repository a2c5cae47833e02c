//! Telemetry errors

use std::path::PathBuf;

use airroll_core::ControlError;
use thiserror::Error;

/// Result type for telemetry operations
pub type TelemetryResult<T> = Result<T, TelemetryError>;

/// Errors from running, reading or writing captures
#[derive(Debug, Error)]
pub enum TelemetryError {
    /// Reading or writing a capture file failed
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        /// File being accessed
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// Malformed CSV or a field that does not parse
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// The control core rejected a tick
    #[error("Control error: {0}")]
    Control(#[from] ControlError),

    /// Timing or grid values that cannot be run
    #[error("Invalid maneuver: {0}")]
    InvalidManeuver(&'static str),
}
