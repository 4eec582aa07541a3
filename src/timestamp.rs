//! Multi-resolution timestamp values and the metadata describing a clock.
//!
//! A [`Timestamp`] is an integer count plus a [`Resolution`] tag. Conversion
//! between resolutions is lossless when upscaling (multiplying) and lossy
//! (truncating) when downscaling, matching how the original `sf2` sources
//! converted between `Second`/`Millisecond`/`Microsecond`/`Nanosecond`.

use serde::{Deserialize, Serialize};

const MILLISECONDS_PER_SECOND: i64 = 1_000;
const MICROSECONDS_PER_SECOND: i64 = MILLISECONDS_PER_SECOND * 1_000;
const NANOSECONDS_PER_SECOND: i64 = MICROSECONDS_PER_SECOND * 1_000;
const NANOSECONDS_PER_MICROSECOND: i64 = 1_000;
const MICROSECONDS_PER_MILLISECOND: i64 = 1_000;
const NANOSECONDS_PER_MILLISECOND: i64 = NANOSECONDS_PER_MICROSECOND * 1_000;

/// The granularity at which a [`Timestamp`]'s integer count is expressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Resolution {
    /// Whole seconds.
    Second,
    /// Milliseconds (1e-3 s). The default resolution when unspecified.
    Millisecond,
    /// Microseconds (1e-6 s).
    Microsecond,
    /// Nanoseconds (1e-9 s).
    Nanosecond,
}

impl Default for Resolution {
    fn default() -> Self {
        Resolution::Millisecond
    }
}

/// An integer timestamp at a given [`Resolution`].
///
/// Accessors convert between resolutions by integer multiplication
/// (upscaling, lossless) or integer division (downscaling, truncating
/// toward zero). `set_resolution` rewrites the resolution tag without
/// rescaling the stored count — it is intended only for initializing a
/// freshly constructed timestamp before it is ever assigned a value drawn
/// from a clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timestamp {
    count: i64,
    resolution: Resolution,
}

impl Default for Timestamp {
    fn default() -> Self {
        Self {
            count: 0,
            resolution: Resolution::default(),
        }
    }
}

impl Timestamp {
    /// Constructs a `Timestamp` from an integer count at the given resolution.
    pub fn new(count: i64, resolution: Resolution) -> Self {
        Self { count, resolution }
    }

    /// Constructs a `Timestamp` from a floating-point second count, converted
    /// into the given resolution.
    pub fn new_from_seconds(seconds: f64, resolution: Resolution) -> Self {
        let count = match resolution {
            Resolution::Second => seconds as i64,
            Resolution::Millisecond => (seconds * MILLISECONDS_PER_SECOND as f64) as i64,
            Resolution::Microsecond => (seconds * MICROSECONDS_PER_SECOND as f64) as i64,
            Resolution::Nanosecond => (seconds * NANOSECONDS_PER_SECOND as f64) as i64,
        };
        Self { count, resolution }
    }

    /// The raw integer count, in this timestamp's own resolution.
    pub fn count(&self) -> i64 {
        self.count
    }

    /// The resolution this timestamp's count is expressed in.
    pub fn resolution(&self) -> Resolution {
        self.resolution
    }

    /// Rewrites the resolution tag without rescaling the stored count.
    ///
    /// This does *not* convert `count` — callers use it only to tag a
    /// freshly constructed timestamp with the correct resolution before its
    /// first real assignment. Calling it on a timestamp already carrying a
    /// meaningful count silently changes what that count means.
    pub fn set_resolution(&mut self, resolution: Resolution) {
        self.resolution = resolution;
    }

    /// This timestamp's count converted to nanoseconds.
    pub fn nanoseconds(&self) -> i64 {
        match self.resolution {
            Resolution::Second => self.count * NANOSECONDS_PER_SECOND,
            Resolution::Millisecond => self.count * NANOSECONDS_PER_MILLISECOND,
            Resolution::Microsecond => self.count * NANOSECONDS_PER_MICROSECOND,
            Resolution::Nanosecond => self.count,
        }
    }

    /// This timestamp's count converted to microseconds (downscaling truncates).
    pub fn microseconds(&self) -> i64 {
        match self.resolution {
            Resolution::Second => self.count * MICROSECONDS_PER_SECOND,
            Resolution::Millisecond => self.count * MICROSECONDS_PER_MILLISECOND,
            Resolution::Microsecond => self.count,
            Resolution::Nanosecond => self.count / NANOSECONDS_PER_MICROSECOND,
        }
    }

    /// This timestamp's count converted to milliseconds (downscaling truncates).
    pub fn milliseconds(&self) -> i64 {
        match self.resolution {
            Resolution::Second => self.count * MILLISECONDS_PER_SECOND,
            Resolution::Millisecond => self.count,
            Resolution::Microsecond => self.count / MICROSECONDS_PER_MILLISECOND,
            Resolution::Nanosecond => self.count / NANOSECONDS_PER_MILLISECOND,
        }
    }

    /// This timestamp's count converted to fractional seconds.
    pub fn seconds(&self) -> f64 {
        match self.resolution {
            Resolution::Second => self.count as f64,
            Resolution::Millisecond => self.count as f64 / MILLISECONDS_PER_SECOND as f64,
            Resolution::Microsecond => self.count as f64 / MICROSECONDS_PER_SECOND as f64,
            Resolution::Nanosecond => self.count as f64 / NANOSECONDS_PER_SECOND as f64,
        }
    }
}

/// The scope across which a clock's readings are comparable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClockScope {
    /// Only comparable to other readings from the same sensor.
    PerSensor,
    /// Comparable across the host processor (e.g. a monotonic system clock).
    PerProcessor,
    /// Comparable across a network of synchronized clocks.
    NetworkSynchronized,
}

/// The epoch a clock's readings are measured from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClockBasis {
    /// Measured from the Unix (or other well-known) epoch.
    Epoch,
    /// Measured from the most recent boot/reset of the clock source.
    SinceLastBoot,
}

/// Immutable metadata describing a clock: its scope, basis, nominal
/// resolution, accuracy, drift, and average latency, plus a default
/// [`Timestamp`] prototype used to initialize fresh ring slots.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimestampInfo {
    /// How widely readings from this clock are comparable.
    pub scope: ClockScope,
    /// The epoch readings are measured from.
    pub basis: ClockBasis,
    /// Nominal resolution of the clock, in seconds.
    pub resolution_seconds: f64,
    /// Nominal accuracy of the clock, in seconds (±).
    pub accuracy_seconds: f64,
    /// Expected drift, in seconds per hour.
    pub drift_seconds_per_hour: f64,
    /// Average latency between a physical event and its timestamp, in seconds.
    pub average_latency_seconds: f64,
    /// Prototype used to instantiate fresh [`Timestamp`] values for this clock.
    pub default_timestamp: Timestamp,
}

impl TimestampInfo {
    /// A reasonable default for a sensor reporting integer milliseconds
    /// since its own boot, with no particular accuracy claims.
    pub fn sensor_millis() -> Self {
        Self {
            scope: ClockScope::PerSensor,
            basis: ClockBasis::SinceLastBoot,
            resolution_seconds: 1e-3,
            accuracy_seconds: 0.0,
            drift_seconds_per_hour: 0.0,
            average_latency_seconds: 0.0,
            default_timestamp: Timestamp::new(0, Resolution::Millisecond),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip_through_finer_resolution() {
        let ts = Timestamp::new(7, Resolution::Second);
        assert_eq!(ts.milliseconds(), 7_000);
        assert_eq!(ts.microseconds(), 7_000_000);
        assert_eq!(ts.nanoseconds(), 7_000_000_000);
        assert_eq!(ts.seconds(), 7.0);
    }

    #[test]
    fn test_downscale_truncates() {
        let ts = Timestamp::new(1_500_999, Resolution::Microsecond);
        assert_eq!(ts.milliseconds(), 1_500);
        assert_eq!(ts.seconds(), 1.500999);
    }

    #[test]
    fn test_set_resolution_does_not_rescale() {
        let mut ts = Timestamp::new(100, Resolution::Millisecond);
        ts.set_resolution(Resolution::Second);
        assert_eq!(ts.count(), 100);
        assert_eq!(ts.seconds(), 100.0);
    }

    #[test]
    fn test_from_seconds() {
        let ts = Timestamp::new_from_seconds(1.5, Resolution::Millisecond);
        assert_eq!(ts.count(), 1_500);
    }

    #[test]
    fn test_default_resolution_is_millisecond() {
        assert_eq!(Resolution::default(), Resolution::Millisecond);
        assert_eq!(Timestamp::default().resolution(), Resolution::Millisecond);
    }
}
