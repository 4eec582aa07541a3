//! A flat unit model.
//!
//! The original C++ sources modeled units as a small inheritance hierarchy
//! (`Unit` base, `LengthUnit`, `AngleUnit`, ... subclasses). `spec.md` §9
//! calls that out as unnecessary for the handful of unit families this
//! crate actually needs, and asks for a flat record plus a const registry
//! instead — the same flattening the reference applies to its own
//! `DaqError` enum rather than a trait-object hierarchy of error types.

use serde::{Deserialize, Serialize};

/// The physical family a [`Unit`] belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UnitFamily {
    /// Dimensionless quantities (e.g. quaternion components).
    Dimensionless,
    /// Planar angle.
    Angle,
    /// Acceleration.
    Acceleration,
    /// Angular velocity.
    AngularVelocity,
    /// Magnetic flux density.
    MagneticFluxDensity,
}

/// A concrete unit: a family plus a short symbol, display name, and the
/// pair of pure linear conversion factors to/from that family's primary
/// unit (`spec.md` §3/§9: `toPrimary(x)`/`fromPrimary(x)`, collapsed from
/// the original's per-family conversion-function pair into two `f64`
/// factors since every unit family this crate models converts linearly).
///
/// Unlike the original's class-per-family hierarchy, every unit the crate
/// needs is one `Unit` value drawn from the [`registry`] consts below —
/// there is no subtype to match on, just a family tag plus its factors.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Unit {
    /// The physical family this unit measures.
    pub family: UnitFamily,
    /// Short symbol, e.g. `"rad"`, `"deg"`, `"m/s^2"`.
    pub symbol: &'static str,
    /// Human-readable name, e.g. `"radian"`.
    pub name: &'static str,
    /// Multiplicative factor converting a value in this unit to the
    /// family's primary unit. `1.0` for the primary unit itself.
    pub to_primary_factor: f64,
    /// Multiplicative factor converting a value in the family's primary
    /// unit back into this unit. `1.0` for the primary unit itself.
    pub from_primary_factor: f64,
}

impl Unit {
    /// Converts `value` (expressed in this unit) to the family's primary
    /// unit.
    pub fn to_primary(&self, value: f64) -> f64 {
        value * self.to_primary_factor
    }

    /// Converts `value` (expressed in the family's primary unit) to this
    /// unit.
    pub fn from_primary(&self, value: f64) -> f64 {
        value * self.from_primary_factor
    }
}

/// Const registry of the units this crate's quantities use. Each
/// `UnitFamily` has exactly one primary unit (factors `1.0`/`1.0`); every
/// other member of the family carries the linear factor pair converting
/// to and from that primary, per `spec.md` §3's `UnitFamily` grouping.
pub mod registry {
    use super::{Unit, UnitFamily};
    use std::f64::consts::PI;

    /// Dimensionless unit, used for quaternion components. Primary (and
    /// only) member of its family.
    pub const DIMENSIONLESS: Unit = Unit {
        family: UnitFamily::Dimensionless,
        symbol: "1",
        name: "dimensionless",
        to_primary_factor: 1.0,
        from_primary_factor: 1.0,
    };

    /// Radians. Primary unit of the `Angle` family.
    pub const RADIAN: Unit = Unit {
        family: UnitFamily::Angle,
        symbol: "rad",
        name: "radian",
        to_primary_factor: 1.0,
        from_primary_factor: 1.0,
    };

    /// Degrees, a secondary unit of the `Angle` family.
    pub const DEGREE: Unit = Unit {
        family: UnitFamily::Angle,
        symbol: "deg",
        name: "degree",
        to_primary_factor: PI / 180.0,
        from_primary_factor: 180.0 / PI,
    };

    /// Meters per second squared. Primary unit of the `Acceleration` family.
    pub const METERS_PER_SECOND_SQUARED: Unit = Unit {
        family: UnitFamily::Acceleration,
        symbol: "m/s^2",
        name: "meter per second squared",
        to_primary_factor: 1.0,
        from_primary_factor: 1.0,
    };

    /// Radians per second. Primary unit of the `AngularVelocity` family.
    pub const RADIANS_PER_SECOND: Unit = Unit {
        family: UnitFamily::AngularVelocity,
        symbol: "rad/s",
        name: "radian per second",
        to_primary_factor: 1.0,
        from_primary_factor: 1.0,
    };

    /// Microtesla. Primary unit of the `MagneticFluxDensity` family.
    pub const MICROTESLA: Unit = Unit {
        family: UnitFamily::MagneticFluxDensity,
        symbol: "uT",
        name: "microtesla",
        to_primary_factor: 1.0,
        from_primary_factor: 1.0,
    };
}

#[cfg(test)]
mod tests {
    use super::registry::*;
    use super::UnitFamily;

    #[test]
    fn test_registry_families() {
        assert_eq!(RADIAN.family, UnitFamily::Angle);
        assert_eq!(DEGREE.family, UnitFamily::Angle);
        assert_eq!(DIMENSIONLESS.family, UnitFamily::Dimensionless);
    }

    #[test]
    fn test_symbols_are_distinct() {
        assert_ne!(RADIAN.symbol, DEGREE.symbol);
    }

    #[test]
    fn test_primary_unit_is_identity_conversion() {
        assert_eq!(RADIAN.to_primary(1.0), 1.0);
        assert_eq!(RADIAN.from_primary(1.0), 1.0);
    }

    #[test]
    fn test_degree_round_trips_through_radian() {
        let degrees = 180.0;
        let radians = DEGREE.to_primary(degrees);
        assert!((radians - std::f64::consts::PI).abs() < 1e-12);
        assert!((DEGREE.from_primary(radians) - degrees).abs() < 1e-12);
    }
}
