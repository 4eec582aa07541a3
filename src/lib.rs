//! A thread-safe, fixed-capacity, interpolating time history for sensor
//! fusion (orientation/IMU) data, plus the publish/subscribe plumbing that
//! feeds it from a live sensor driver.
//!
//! # Modules
//!
//! - [`timestamp`]: multi-resolution timestamps and clock metadata (C1).
//! - [`units`]: a flat unit/family model used to tag quantities.
//! - [`quantity`]: the [`quantity::Sample`] capability trait and the
//!   [`quantity::Scalar`] value type (C2).
//! - [`quaternion`]: unit quaternions with SLERP interpolation (C3).
//! - [`timestamped_value`]: a value bundled with a raw timestamp and
//!   validity/interpolation flags.
//! - [`history`]: the fixed-capacity, interpolating ring buffer itself (C4).
//! - [`config`]: loading a history's configuration from TOML/environment.
//! - [`sensor_source`]: the publish/subscribe fan-out driving a history
//!   from live sensor data (C5).
//! - [`orientation`]: an orientation-specific facade over a quaternion
//!   history (C5).
//! - [`error`]: the crate's error type.

pub mod config;
pub mod error;
pub mod history;
pub mod orientation;
pub mod quantity;
pub mod quaternion;
pub mod sensor_source;
pub mod timestamp;
pub mod timestamped_value;
pub mod units;

pub use error::{FusionError, FusionResult};
