//! Unit quaternions for orientation, with SLERP interpolation.
//!
//! Grounded on `original_source/core/c++/src/orientation/Quaternion.h`:
//! Hamilton product `multiply`, `conjugate`/`inverse`, gravity extraction,
//! yaw/pitch/roll derivation, and the `difference` relative-rotation
//! helper are all carried over with the same public surface, expressed as
//! an idiomatic Rust value type implementing [`Sample`] rather than the
//! original's mutable-setter class. Components are `f32` (the original's
//! `float w, x, y, z`); `slerp` there takes its interpolation ratio as
//! `double` and computes `cosHalfTheta`/`halfTheta`/`sinHalfTheta` in
//! `double`, narrowing only the final per-axis ratios back to `float`
//! before the last multiply-accumulate — this mirrors that split exactly
//! rather than doing the whole interpolation in `f32`.

use crate::quantity::Sample;
use crate::units::{registry, Unit};

/// The `|sin(theta/2)|` threshold below which two quaternions are treated
/// as antipodal (or identical) for SLERP purposes, matching the original's
/// `0.001` constant.
const SLERP_SIN_EPSILON: f64 = 0.001;

/// A unit quaternion `w + xi + yj + zk` representing an orientation.
///
/// Fields are private; construct with [`Quaternion::new`]. The default
/// value is the identity rotation `(1, 0, 0, 0)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Quaternion {
    w: f32,
    x: f32,
    y: f32,
    z: f32,
}

impl Default for Quaternion {
    fn default() -> Self {
        Self {
            w: 1.0,
            x: 0.0,
            y: 0.0,
            z: 0.0,
        }
    }
}

impl Quaternion {
    /// Constructs a quaternion from its four components. Does not
    /// normalize — callers are expected to supply unit quaternions.
    pub fn new(w: f32, x: f32, y: f32, z: f32) -> Self {
        Self { w, x, y, z }
    }

    /// The scalar (real) component.
    pub fn w(&self) -> f32 {
        self.w
    }

    /// The `i` component.
    pub fn x(&self) -> f32 {
        self.x
    }

    /// The `j` component.
    pub fn y(&self) -> f32 {
        self.y
    }

    /// The `k` component.
    pub fn z(&self) -> f32 {
        self.z
    }

    /// The Euclidean norm of the four components.
    pub fn norm(&self) -> f32 {
        (self.w * self.w + self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
    }

    /// Returns `self` rescaled to unit norm. If the norm is zero, returns
    /// the identity quaternion rather than dividing by zero.
    pub fn normalized(&self) -> Self {
        let n = self.norm();
        if n == 0.0 {
            return Self::default();
        }
        Self {
            w: self.w / n,
            x: self.x / n,
            y: self.y / n,
            z: self.z / n,
        }
    }

    /// Hamilton product `self * other`.
    pub fn multiply(&self, other: &Self) -> Self {
        Self {
            w: self.w * other.w - self.x * other.x - self.y * other.y - self.z * other.z,
            x: self.w * other.x + self.x * other.w + self.y * other.z - self.z * other.y,
            y: self.w * other.y - self.x * other.z + self.y * other.w + self.z * other.x,
            z: self.w * other.z + self.x * other.y - self.y * other.x + self.z * other.w,
        }
    }

    /// The conjugate `(w, -x, -y, -z)`.
    pub fn conjugate(&self) -> Self {
        Self {
            w: self.w,
            x: -self.x,
            y: -self.y,
            z: -self.z,
        }
    }

    /// The multiplicative inverse. For a unit quaternion this equals the
    /// conjugate; computed generally as `conjugate / norm^2`.
    pub fn inverse(&self) -> Self {
        let n2 = self.w * self.w + self.x * self.x + self.y * self.y + self.z * self.z;
        let c = self.conjugate();
        if n2 == 0.0 {
            return c;
        }
        Self {
            w: c.w / n2,
            x: c.x / n2,
            y: c.y / n2,
            z: c.z / n2,
        }
    }

    /// The rotation from `self` to `other`: `out = self.inverse() * other`.
    pub fn difference(&self, other: &Self) -> Self {
        self.inverse().multiply(other)
    }

    /// The gravity (down) vector in the body frame implied by this
    /// orientation, as `(g_x, g_y, g_z)`, per the closed-form
    /// `g_x = 2(xz - wy)`, `g_y = 2(wx + yz)`, `g_z = w^2 - x^2 - y^2 + z^2`.
    pub fn gravity(&self) -> (f32, f32, f32) {
        let (w, x, y, z) = (self.w, self.x, self.y, self.z);
        let g_x = 2.0 * (x * z - w * y);
        let g_y = 2.0 * (w * x + y * z);
        let g_z = w * w - x * x - y * y + z * z;
        (g_x, g_y, g_z)
    }

    /// Yaw, pitch, and roll in degrees, derived from the closed-form
    /// formulas: `yaw = atan2(2(xy - wz), 2(w^2 + x^2) - 1)`,
    /// `pitch = atan(g_y / sqrt(g_x^2 + g_z^2))`,
    /// `roll = atan(g_x / sqrt(g_y^2 + g_z^2))`. The trig itself runs in
    /// `f32`, matching the original's `(float)atan2(...)`/`(float)atan(...)`
    /// casts; only the final degrees conversion widens to `f64` for the
    /// public reporting surface.
    pub fn yaw_pitch_roll_deg(&self) -> (f64, f64, f64) {
        let (w, x, y, z) = (self.w, self.x, self.y, self.z);
        let (g_x, g_y, g_z) = self.gravity();

        let yaw = (2.0 * (x * y - w * z)).atan2(2.0 * (w * w + x * x) - 1.0);
        let pitch = (g_y / (g_x * g_x + g_z * g_z).sqrt()).atan();
        let roll = (g_x / (g_y * g_y + g_z * g_z).sqrt()).atan();

        (
            (yaw as f64).to_degrees(),
            (pitch as f64).to_degrees(),
            (roll as f64).to_degrees(),
        )
    }

    /// Yaw in degrees.
    pub fn yaw_deg(&self) -> f64 {
        self.yaw_pitch_roll_deg().0
    }

    /// Pitch in degrees.
    pub fn pitch_deg(&self) -> f64 {
        self.yaw_pitch_roll_deg().1
    }

    /// Roll in degrees.
    pub fn roll_deg(&self) -> f64 {
        self.yaw_pitch_roll_deg().2
    }
}

impl Sample for Quaternion {
    fn copy_from(&mut self, other: &Self) {
        *self = *other;
    }

    /// Spherical linear interpolation, per `spec.md` §4.3 exactly:
    ///
    /// 1. `cos(theta) = dot(from, to)`. If its magnitude genuinely exceeds
    ///    1 (floating-point overshoot on an already-colinear pair), clamp
    ///    by returning `from` unchanged rather than feeding an out-of-domain
    ///    value to `acos`.
    /// 2. `sin(theta) = sqrt(1 - cos(theta)^2)`. If its magnitude is below
    ///    [`SLERP_SIN_EPSILON`], the pair is antipodal or identical;
    ///    return the **unnormalized** componentwise average `0.5*from +
    ///    0.5*to`. Deliberately not shortest-arc-corrected and not
    ///    renormalized: the spec's antipodal scenario (`from = (1,0,0,0)`,
    ///    `to = (-1,0,0,0)`) must average to exactly `(0,0,0,0)`, not an
    ///    identity fallback — the branch taken matters more than the
    ///    result's geometric usefulness here.
    /// 3. Otherwise, the standard SLERP formula, with `cos_theta`/`theta`/
    ///    `sin_theta` carried in `f64` and only the final per-axis ratios
    ///    narrowed to `f32` before the multiply-accumulate, matching the
    ///    original's `double` half-angle trig over `float` components.
    fn interpolate(from: &Self, to: &Self, ratio: f64) -> Self {
        let cos_theta: f64 =
            (from.w * to.w + from.x * to.x + from.y * to.y + from.z * to.z) as f64;

        if cos_theta.abs() > 1.0 {
            return *from;
        }

        let sin_theta = (1.0 - cos_theta * cos_theta).max(0.0).sqrt();

        if sin_theta.abs() < SLERP_SIN_EPSILON {
            return Self {
                w: 0.5 * from.w + 0.5 * to.w,
                x: 0.5 * from.x + 0.5 * to.x,
                y: 0.5 * from.y + 0.5 * to.y,
                z: 0.5 * from.z + 0.5 * to.z,
            };
        }

        let theta = cos_theta.acos();
        let a = (((1.0 - ratio) * theta).sin() / sin_theta) as f32;
        let b = ((ratio * theta).sin() / sin_theta) as f32;

        Self {
            w: from.w * a + to.w * b,
            x: from.x * a + to.x * b,
            y: from.y * a + to.y * b,
            z: from.z * a + to.z * b,
        }
    }

    fn printable_parts(&self) -> Vec<(&'static str, f64, Unit)> {
        vec![
            ("W", self.w as f64, registry::DIMENSIONLESS),
            ("X", self.x as f64, registry::DIMENSIONLESS),
            ("Y", self.y as f64, registry::DIMENSIONLESS),
            ("Z", self.z as f64, registry::DIMENSIONLESS),
        ]
    }

    fn contained_quantities(&self) -> bool {
        true
    }

    fn contained_names() -> Vec<&'static str> {
        vec!["W", "X", "Y", "Z"]
    }
}
