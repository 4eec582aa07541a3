//! End-to-end integration tests covering the public surface: timestamps,
//! a sensor data source publishing quaternion samples, the orientation
//! facade querying them, and CSV snapshot export.

use fusion_core::orientation::OrientationHistory;
use fusion_core::quantity::Scalar;
use fusion_core::sensor_source::{
    QuantityShape, RawImuSample, SensorDataSource, SensorDataSourceInfo,
};
use fusion_core::timestamp::{Resolution, Timestamp};
use fusion_core::units::registry::DIMENSIONLESS;

fn orientation_source() -> SensorDataSource {
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

fn identity_sample(timestamp_ms: f32) -> Vec<Scalar> {
    vec![
        Scalar::new(1.0, DIMENSIONLESS),
        Scalar::new(0.0, DIMENSIONLESS),
        Scalar::new(0.0, DIMENSIONLESS),
        Scalar::new(0.0, DIMENSIONLESS),
        Scalar::new(timestamp_ms, DIMENSIONLESS),
    ]
}

#[test]
fn test_timestamp_resolution_conversions_agree() {
    let one_second = Timestamp::new(1, Resolution::Second);
    let as_millis = Timestamp::new(one_second.milliseconds(), Resolution::Millisecond);
    assert_eq!(as_millis.seconds(), one_second.seconds());
}

#[test]
fn test_sensor_source_feeds_orientation_history_end_to_end() {
    let source = orientation_source();
    let history = OrientationHistory::new(&source, 64, "orientation-under-test").unwrap();

    for t in (0..1_000).step_by(100) {
        source.publish(&identity_sample(t as f32), t);
    }

    let q = history.quaternion_at(500).expect("sample within window");
    assert_eq!(q.w(), 1.0);
    assert_eq!(history.yaw_deg_at(500), 0.0);
    assert_eq!(history.pitch_deg_at(500), 0.0);
    assert_eq!(history.roll_deg_at(500), 0.0);
}

#[test]
fn test_orientation_history_csv_snapshot_round_trip() {
    let source = orientation_source();
    let history = OrientationHistory::new(&source, 16, "csv-under-test").unwrap();

    for t in [0, 100, 200] {
        source.publish(&identity_sample(t as f32), t);
    }

    let dir = tempfile::tempdir().unwrap();
    let path = history.write_to_directory(dir.path()).unwrap();
    assert!(path.ends_with("QuaternionHistory1.csv"));

    let mut reader = csv::Reader::from_path(&path).unwrap();
    let headers = reader.headers().unwrap().clone();
    assert_eq!(
        headers.iter().collect::<Vec<_>>(),
        vec![
            "Timestamp",
            "Quaternion.W",
            "Quaternion.X",
            "Quaternion.Y",
            "Quaternion.Z"
        ]
    );

    let rows: Vec<_> = reader.records().collect::<Result<_, _>>().unwrap();
    assert_eq!(rows.len(), 3);
    assert_eq!(&rows[0][0], "0");
    assert_eq!(&rows[2][0], "200");
}

#[test]
fn test_missing_quantity_is_reported_as_error() {
    let source = SensorDataSource::new(vec![SensorDataSourceInfo {
        name: "Temperature".to_string(),
        shape: QuantityShape::Scalar,
        unit: DIMENSIONLESS,
    }]);
    let result = OrientationHistory::new(&source, 16, "bad-source");
    assert!(result.is_err());
}

#[test]
fn test_driver_callback_feeds_orientation_history_through_on_sample() {
    // Exercises the actual driver-callback adapter (`on_sample`), rather
    // than a test harness publishing a pre-built quantity vector directly.
    let source = SensorDataSource::new(SensorDataSource::standard_imu_infos());
    let history = OrientationHistory::new(&source, 64, "on-sample-under-test").unwrap();

    source.on_sample(
        500,
        500,
        RawImuSample {
            quat_w: 1.0,
            quat_x: 0.0,
            quat_y: 0.0,
            quat_z: 0.0,
            yaw_deg: 0.0,
            pitch_deg: 0.0,
            roll_deg: 0.0,
        },
    );

    let q = history.quaternion_at(500).expect("sample within window");
    assert_eq!(q.w(), 1.0);
    assert_eq!(history.yaw_deg_at(500), 0.0);
}

#[test]
fn test_duplicate_subscriber_id_is_rejected_by_second_facade() {
    let source = orientation_source();
    let _first = OrientationHistory::new(&source, 16, "shared-id").unwrap();
    // A second facade using the same subscriber id cannot subscribe, but
    // construction still succeeds since discovery happens independent of
    // the subscribe outcome — this exercises the `subscribe` boolean
    // result is consulted at the sensor-source level, not surfaced here.
    let second = OrientationHistory::new(&source, 16, "shared-id");
    assert!(second.is_ok());
}
