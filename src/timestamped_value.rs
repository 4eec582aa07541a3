//! A value paired with an `i64` timestamp and validity/interpolation flags.
//!
//! Grounded on `original_source/core/c++/src/time/TimestampedValue.h`: the
//! original stores a raw `long` timestamp (not a [`crate::timestamp::Timestamp`])
//! alongside the value and a bitmask of flags, and this crate keeps that
//! shape — the richer `Timestamp` type is used at the `TimeHistory` API
//! boundary, but the slot itself stores the cheaper raw count.

use crate::quantity::Sample;

/// Bit set on [`TimestampedValue::flags`] when the slot holds a real
/// inserted sample (as opposed to an empty/reset slot).
pub const FLAG_VALID: u8 = 0x01;

/// Bit set on [`TimestampedValue::flags`] when the value was produced by
/// interpolation rather than being a directly-inserted sample.
pub const FLAG_INTERPOLATED: u8 = 0x02;

/// A value, its timestamp, and validity/interpolation flags.
#[derive(Debug, Clone)]
pub struct TimestampedValue<T> {
    value: T,
    timestamp: i64,
    flags: u8,
}

impl<T: Sample> TimestampedValue<T> {
    /// Constructs a valid, non-interpolated timestamped value.
    pub fn new(value: T, timestamp: i64) -> Self {
        Self {
            value,
            timestamp,
            flags: FLAG_VALID,
        }
    }

    /// Constructs an empty slot: a default value, zero timestamp, and no
    /// flags set.
    pub fn empty(default_value: T) -> Self {
        Self {
            value: default_value,
            timestamp: 0,
            flags: 0,
        }
    }

    /// The stored value.
    pub fn value(&self) -> &T {
        &self.value
    }

    /// The raw `i64` timestamp count.
    pub fn timestamp(&self) -> i64 {
        self.timestamp
    }

    /// `true` if [`FLAG_VALID`] is set.
    pub fn is_valid(&self) -> bool {
        self.flags & FLAG_VALID != 0
    }

    /// `true` if [`FLAG_INTERPOLATED`] is set.
    pub fn is_interpolated(&self) -> bool {
        self.flags & FLAG_INTERPOLATED != 0
    }

    /// Overwrites this slot in place with a fresh, valid, non-interpolated
    /// sample — used by the ring buffer to reuse a slot's allocation.
    pub fn set(&mut self, value: &T, timestamp: i64) {
        self.value.copy_from(value);
        self.timestamp = timestamp;
        self.flags = FLAG_VALID;
    }

    /// Produces the value interpolated between `from` and `to` at the
    /// timestamp corresponding to fractional position `ratio`, flagged as
    /// interpolated.
    ///
    /// Corrected per `spec.md` §9: the original computed
    /// `timestamp = (long)(delta_t * ratio)` without adding `from`'s
    /// timestamp back in, so every interpolated sample reported a
    /// timestamp near zero instead of between `from` and `to`. This adds
    /// `from.timestamp`.
    pub fn interpolate(from: &Self, to: &Self, ratio: f64) -> Self {
        let delta_t = to.timestamp - from.timestamp;
        let timestamp = from.timestamp + (delta_t as f64 * ratio) as i64;
        Self {
            value: T::interpolate(&from.value, &to.value, ratio),
            timestamp,
            flags: FLAG_VALID | FLAG_INTERPOLATED,
        }
    }
}
