//! Error types for the fusion core.
//!
//! The spec this crate implements treats most failure modes as sentinel
//! return values (`false`, `NaN`) rather than exceptions — see the error
//! handling design in `SPEC_FULL.md` §7. `FusionError` exists only for the
//! two cases that are genuinely fatal: a data source missing a required
//! quantity at construction time, and an I/O failure while snapshotting a
//! history to disk.

use thiserror::Error;

/// Convenience alias for results using the crate's error type.
pub type FusionResult<T> = std::result::Result<T, FusionError>;

/// Primary error type for the fusion core.
#[derive(Error, Debug)]
pub enum FusionError {
    /// A [`crate::sensor_source::SensorDataSource`] does not expose a quantity
    /// required to construct an [`crate::orientation::OrientationHistory`].
    ///
    /// **Error Type**: Permanent — the data source's info list never gained
    /// the quantity after construction; the facade is unusable.
    ///
    /// **Recovery Strategy**: None at runtime. Fix the driver/adapter to
    /// publish the missing quantity, or point the facade at a source that
    /// does.
    #[error("sensor data source has no quantity named '{name}'")]
    MissingQuantity {
        /// The quantity name that was required but absent (e.g. `"Quaternion"`).
        name: String,
    },

    /// Writing a CSV snapshot to disk failed.
    ///
    /// **Error Type**: Usually transient (disk full, permission denied,
    /// directory missing).
    ///
    /// **Recovery Strategy**: Inspect the wrapped `io::Error` and retry, or
    /// report to the caller — the history itself is unaffected; no samples
    /// are lost.
    #[error("I/O error writing time history snapshot: {0}")]
    Io(#[from] std::io::Error),

    /// A configuration file or environment failed to parse into a
    /// [`crate::config::HistoryConfig`].
    #[error("configuration error: {0}")]
    Config(#[from] config::ConfigError),

    /// A CSV record failed to serialize while writing a snapshot.
    #[error("CSV write error: {0}")]
    Csv(#[from] csv::Error),
}
