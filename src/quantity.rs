//! The `Sample` capability trait and the `Scalar` quantity.
//!
//! `spec.md` §9 rejects the original's `Quantity`/`Sample` inheritance
//! hierarchy in favor of a single capability trait that concrete value
//! types implement directly — the same flattening the reference applies
//! when it prefers a trait object's method set over a class hierarchy for
//! its pipeline stages (`daq-core/src/pipeline.rs`).

use crate::units::{registry, Unit};

/// A value type that can live inside a [`crate::history::TimeHistory`]:
/// copyable, linearly (or otherwise) interpolable between two timestamped
/// instances, and able to describe its own scalar parts for CSV export.
pub trait Sample: Clone + Send + Sync + 'static {
    /// Overwrites `self` with `other`'s value.
    fn copy_from(&mut self, other: &Self);

    /// Produces the value at fractional position `ratio` (0.0 at `from`,
    /// 1.0 at `to`) between two samples. `ratio` is not required to be
    /// clamped to `[0, 1]` by implementors; callers are expected to pass a
    /// value in range.
    fn interpolate(from: &Self, to: &Self, ratio: f64) -> Self;

    /// Returns a new value equal to `self`, without requiring `Self: Sized`
    /// at the call site the way a bare `.clone()` would in a trait-object
    /// context.
    fn clone_new(&self) -> Self
    where
        Self: Sized,
    {
        self.clone()
    }

    /// The named, unit-tagged scalar parts making up this value, in stable
    /// field order — e.g. a quaternion yields `[("W", w, dimensionless),
    /// ("X", x, dimensionless), ...]`. Used to build CSV header/row pairs.
    fn printable_parts(&self) -> Vec<(&'static str, f64, Unit)>;

    /// `true` if this type is a compound quantity with more than one
    /// scalar part (matches the original's
    /// `getContainedQuantities`/`getContainedQuantityNames` distinction
    /// between compound and scalar types).
    fn contained_quantities(&self) -> bool {
        self.printable_parts().len() > 1
    }

    /// The field names this value's `printable_parts` will report, without
    /// needing an instance (used to build CSV headers before any sample has
    /// been inserted).
    fn contained_names() -> Vec<&'static str>
    where
        Self: Sized;
}

/// A single scalar measurement with a unit tag.
///
/// `value` is `f32`, matching the original's `Scalar.h` (`float value;`) per
/// `spec.md` §3 — the interpolation ratio stays `f64` (callers compute it
/// from wider timestamp arithmetic) and is only narrowed back to `f32` once
/// the interpolated value is known, the same "compute wide, store narrow"
/// split `TimestampedValue::interpolate` uses for its timestamp field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Scalar {
    value: f32,
    unit: Unit,
}

impl Scalar {
    /// Constructs a scalar with the given value and unit.
    pub fn new(value: f32, unit: Unit) -> Self {
        Self { value, unit }
    }

    /// The scalar's numeric value.
    pub fn value(&self) -> f32 {
        self.value
    }

    /// The scalar's unit.
    pub fn unit(&self) -> Unit {
        self.unit
    }
}

impl Default for Scalar {
    fn default() -> Self {
        Self {
            value: 0.0,
            unit: registry::DIMENSIONLESS,
        }
    }
}

impl Sample for Scalar {
    fn copy_from(&mut self, other: &Self) {
        self.value = other.value;
        self.unit = other.unit;
    }

    /// Corrected per `spec.md` §9: the original C++ `Scalar::interpolate`
    /// computed the ratio but never multiplied it into the delta, so
    /// interpolated scalars always equal `from`. This multiplies.
    fn interpolate(from: &Self, to: &Self, ratio: f64) -> Self {
        let delta = to.value - from.value;
        Self {
            value: from.value + (delta as f64 * ratio) as f32,
            unit: from.unit,
        }
    }

    fn printable_parts(&self) -> Vec<(&'static str, f64, Unit)> {
        vec![("Value", self.value as f64, self.unit)]
    }

    fn contained_quantities(&self) -> bool {
        false
    }

    fn contained_names() -> Vec<&'static str> {
        vec!["Value"]
    }
}
