//! Orientation-specific facade over a quaternion time history.
//!
//! Grounded on `original_source/core/c++/src/orientation/OrientationHistory.h`:
//! the original wraps a generic time history, locating its `Quaternion` and
//! `Timestamp` columns by scanning the data source's published quantity
//! list once at construction, then exposes yaw/pitch/roll convenience
//! accessors on top of the same interpolating lookup the generic history
//! provides. `relative_rotation_at` is a supplemented convenience method
//! (see `SPEC_FULL.md` §4.5) composing two lookups with
//! `Quaternion::difference`.

use std::path::Path;
use std::sync::Arc;

use crate::error::{FusionError, FusionResult};
use crate::history::TimeHistory;
use crate::quantity::Scalar;
use crate::quaternion::Quaternion;
use crate::sensor_source::{QuantityShape, SensorDataSource, SensorDataSourceInfo, SensorDataSubscriber};
use crate::timestamped_value::TimestampedValue;

const QUATERNION_QUANTITY_NAME: &str = "Quaternion";
const TIMESTAMP_QUANTITY_NAME: &str = "Timestamp";

/// Number of scalar columns a compound `Quaternion` quantity occupies in a
/// published sample vector (`W, X, Y, Z`, per `Quaternion::contained_names`).
const QUATERNION_COLUMN_WIDTH: usize = 4;

/// Column positions of the `Quaternion` and `Timestamp` quantities within
/// a published sample vector, discovered once from a source's
/// `data_source_infos()`.
struct ColumnLayout {
    quaternion_start: usize,
    timestamp_index: usize,
}

fn discover_columns(infos: &[SensorDataSourceInfo]) -> FusionResult<ColumnLayout> {
    let mut offset = 0usize;
    let mut quaternion_start = None;
    let mut timestamp_index = None;

    for info in infos {
        let width = match info.shape {
            QuantityShape::Scalar => 1,
            QuantityShape::Compound => QUATERNION_COLUMN_WIDTH,
        };
        if info.name == QUATERNION_QUANTITY_NAME {
            quaternion_start = Some(offset);
        } else if info.name == TIMESTAMP_QUANTITY_NAME {
            timestamp_index = Some(offset);
        }
        offset += width;
    }

    let quaternion_start = quaternion_start.ok_or_else(|| FusionError::MissingQuantity {
        name: QUATERNION_QUANTITY_NAME.to_string(),
    })?;
    let timestamp_index = timestamp_index.ok_or_else(|| FusionError::MissingQuantity {
        name: TIMESTAMP_QUANTITY_NAME.to_string(),
    })?;

    Ok(ColumnLayout {
        quaternion_start,
        timestamp_index,
    })
}

/// Subscriber adapter that extracts the quaternion and timestamp columns
/// from each published sample and inserts them into the backing
/// [`TimeHistory`].
struct OrientationSubscriber {
    history: Arc<TimeHistory<Quaternion>>,
    layout: ColumnLayout,
}

impl SensorDataSubscriber for OrientationSubscriber {
    fn publish(&mut self, quantities: &[Scalar], processor_timestamp: i64) {
        let start = self.layout.quaternion_start;
        if quantities.len() < start + QUATERNION_COLUMN_WIDTH {
            tracing::warn!("published sample too short for quaternion columns, dropped");
            return;
        }
        let w = quantities[start].value();
        let x = quantities[start + 1].value();
        let y = quantities[start + 2].value();
        let z = quantities[start + 3].value();
        let timestamp = quantities
            .get(self.layout.timestamp_index)
            .map(|s| s.value() as i64)
            .unwrap_or(processor_timestamp);

        self.history.add(Quaternion::new(w, x, y, z), timestamp);
    }
}

/// A queryable, interpolating history of orientation samples drawn from a
/// [`SensorDataSource`].
///
/// Construction discovers the `Quaternion` and `Timestamp` columns in the
/// source's published quantity layout and subscribes an internal adapter
/// that feeds a backing [`TimeHistory<Quaternion>`]; queries delegate to
/// that history.
pub struct OrientationHistory {
    history: Arc<TimeHistory<Quaternion>>,
}

impl OrientationHistory {
    /// Constructs a facade over `source`, with `capacity` slots of
    /// backing history, subscribing under `subscriber_id`.
    ///
    /// Fails with [`FusionError::MissingQuantity`] if `source` does not
    /// publish both a `"Quaternion"` and a `"Timestamp"` quantity.
    pub fn new(
        source: &SensorDataSource,
        capacity: usize,
        subscriber_id: impl Into<String>,
    ) -> FusionResult<Self> {
        let layout = discover_columns(source.data_source_infos())?;
        let history = Arc::new(TimeHistory::with_name(
            capacity,
            Quaternion::default(),
            "Quaternion",
        ));

        let adapter = OrientationSubscriber {
            history: Arc::clone(&history),
            layout,
        };
        source.subscribe(subscriber_id, Box::new(adapter));

        Ok(Self { history })
    }

    /// Looks up the orientation at `timestamp`, returning `None` if it
    /// falls outside the currently held window.
    pub fn quaternion_at(&self, timestamp: i64) -> Option<Quaternion> {
        let mut out = TimestampedValue::empty(Quaternion::default());
        self.history
            .get(timestamp, &mut out)
            .then(|| *out.value())
    }

    /// Yaw in degrees at `timestamp`, or `NaN` if outside the held window.
    pub fn yaw_deg_at(&self, timestamp: i64) -> f64 {
        self.quaternion_at(timestamp)
            .map(|q| q.yaw_deg())
            .unwrap_or(f64::NAN)
    }

    /// Pitch in degrees at `timestamp`, or `NaN` if outside the held window.
    pub fn pitch_deg_at(&self, timestamp: i64) -> f64 {
        self.quaternion_at(timestamp)
            .map(|q| q.pitch_deg())
            .unwrap_or(f64::NAN)
    }

    /// Roll in degrees at `timestamp`, or `NaN` if outside the held window.
    pub fn roll_deg_at(&self, timestamp: i64) -> f64 {
        self.quaternion_at(timestamp)
            .map(|q| q.roll_deg())
            .unwrap_or(f64::NAN)
    }

    /// The rotation that takes the orientation at `t_a` to the orientation
    /// at `t_b`, or `None` if either timestamp falls outside the held
    /// window. Composes two lookups with [`Quaternion::difference`].
    pub fn relative_rotation_at(&self, t_a: i64, t_b: i64) -> Option<Quaternion> {
        let a = self.quaternion_at(t_a)?;
        let b = self.quaternion_at(t_b)?;
        Some(a.difference(&b))
    }

    /// Writes a CSV snapshot of the backing history into `directory`. See
    /// [`TimeHistory::snapshot_to_directory`].
    pub fn write_to_directory(&self, directory: &Path) -> FusionResult<std::path::PathBuf> {
        self.history.snapshot_to_directory(directory)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sensor_source::QuantityShape;
    use crate::units::registry::{DIMENSIONLESS, MICROTESLA};

    fn source_with_quaternion_and_timestamp() -> SensorDataSource {
        SensorDataSource::new(vec![
            SensorDataSourceInfo {
                name: "Quaternion".to_string(),
                shape: QuantityShape::Compound,
                unit: DIMENSIONLESS,
            },
            SensorDataSourceInfo {
                name: "Timestamp".to_string(),
                shape: QuantityShape::Scalar,
                unit: DIMENSIONLESS,
            },
        ])
    }

    /// A pure yaw rotation about the body z-axis, chosen so that
    /// `Quaternion::yaw_deg` reports `yaw_deg` for the resulting sample
    /// (see `Quaternion::yaw_pitch_roll_deg`'s closed-form derivation).
    fn quat_for_yaw_deg(yaw_deg: f64) -> Vec<Scalar> {
        let half = (-yaw_deg).to_radians() / 2.0;
        vec![
            Scalar::new(half.cos() as f32, DIMENSIONLESS),
            Scalar::new(0.0, DIMENSIONLESS),
            Scalar::new(0.0, DIMENSIONLESS),
            Scalar::new(half.sin() as f32, DIMENSIONLESS),
        ]
    }

    #[test]
    fn test_missing_quaternion_errors() {
        let source = SensorDataSource::new(vec![SensorDataSourceInfo {
            name: "Field".to_string(),
            shape: QuantityShape::Scalar,
            unit: MICROTESLA,
        }]);
        let result = OrientationHistory::new(&source, 16, "orientation");
        assert!(matches!(
            result,
            Err(FusionError::MissingQuantity { name }) if name == "Quaternion"
        ));
    }

    #[test]
    fn test_publish_then_query() {
        let source = source_with_quaternion_and_timestamp();
        let history = OrientationHistory::new(&source, 16, "orientation").unwrap();

        source.publish(
            &[
                Scalar::new(1.0, DIMENSIONLESS),
                Scalar::new(0.0, DIMENSIONLESS),
                Scalar::new(0.0, DIMENSIONLESS),
                Scalar::new(0.0, DIMENSIONLESS),
                Scalar::new(100.0, DIMENSIONLESS),
            ],
            100,
        );

        let q = history.quaternion_at(100).expect("sample should be present");
        assert_eq!(q.w(), 1.0);
        assert_eq!(history.yaw_deg_at(100), 0.0);
    }

    #[test]
    fn test_query_outside_window_is_nan() {
        let source = source_with_quaternion_and_timestamp();
        let history = OrientationHistory::new(&source, 16, "orientation").unwrap();
        assert!(history.yaw_deg_at(100).is_nan());
    }

    #[test]
    fn test_relative_rotation() {
        let source = source_with_quaternion_and_timestamp();
        let history = OrientationHistory::new(&source, 16, "orientation").unwrap();

        source.publish(
            &[
                Scalar::new(1.0, DIMENSIONLESS),
                Scalar::new(0.0, DIMENSIONLESS),
                Scalar::new(0.0, DIMENSIONLESS),
                Scalar::new(0.0, DIMENSIONLESS),
                Scalar::new(0.0, DIMENSIONLESS),
            ],
            0,
        );
        source.publish(
            &[
                Scalar::new(1.0, DIMENSIONLESS),
                Scalar::new(0.0, DIMENSIONLESS),
                Scalar::new(0.0, DIMENSIONLESS),
                Scalar::new(0.0, DIMENSIONLESS),
                Scalar::new(100.0, DIMENSIONLESS),
            ],
            100,
        );

        let relative = history.relative_rotation_at(0, 100).unwrap();
        assert_eq!(relative.w(), 1.0);
    }

    #[test]
    fn test_yaw_interpolates_between_bracketing_samples() {
        // Scenario F: yaw=30deg at t=1000, yaw=60deg at t=2000; yaw_deg_at
        // the midpoint timestamp must land within 0.5deg of the linear
        // interpolant, 45deg.
        let source = source_with_quaternion_and_timestamp();
        let history = OrientationHistory::new(&source, 16, "orientation").unwrap();

        let mut first = quat_for_yaw_deg(30.0);
        first.push(Scalar::new(1000.0, DIMENSIONLESS));
        source.publish(&first, 1000);

        let mut second = quat_for_yaw_deg(60.0);
        second.push(Scalar::new(2000.0, DIMENSIONLESS));
        source.publish(&second, 2000);

        let yaw = history.yaw_deg_at(1500);
        assert!((yaw - 45.0).abs() < 0.5, "yaw at midpoint was {yaw}");
    }
}
