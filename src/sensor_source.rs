//! Publish/subscribe fan-out of sensor data to registered subscribers.
//!
//! Grounded on `daq-storage/src/tap_registry.rs`'s `TapRegistry` (a
//! name-keyed registry of consumers behind a lock, with register/
//! unregister returning whether the id was already present) and
//! `daq-core/src/pipeline.rs`'s `MeasurementSource`/`MeasurementSink`
//! trait shape. The reference's registry fans out async frames over
//! `tokio::mpsc`; this crate's sensor bus is synchronous — a driver
//! thread calls `publish` directly on every registered subscriber while
//! holding the registry lock, matching the original `ISensorDataSource`'s
//! direct-callback model (supplemented from
//! `original_source/core/c++/src/sensor/ISensorDataSource.h`).
//!
//! The driver-callback adapter (`on_sample`) and the poll-style `current`
//! are grounded separately on `original_source/frc/c++/src/navXSensor.h`:
//! `timestampedDataReceived` is the raw driver callback that translates a
//! board sample into the published quantity vector, while `getCurrent`
//! reads the driver's own live cached fields directly rather than
//! whatever was last published.

use std::collections::HashMap;
use std::time::{SystemTime, UNIX_EPOCH};

use parking_lot::Mutex;

use crate::quantity::Scalar;
use crate::units::registry::{DEGREE, DIMENSIONLESS};
use crate::units::Unit;

/// Number of scalar columns the standard IMU quantity vector occupies:
/// `Timestamp`, `Quaternion.{W,X,Y,Z}`, `Yaw`, `Pitch`, `Roll`.
pub const STANDARD_IMU_LAYOUT_WIDTH: usize = 8;

/// Whether a [`SensorDataSourceInfo`]'s quantity is a single scalar or a
/// compound value with multiple named parts (mirrors
/// [`crate::quantity::Sample::contained_quantities`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuantityShape {
    /// A single named scalar, e.g. a timestamp or a temperature reading.
    Scalar,
    /// A compound value with more than one named part, e.g. a quaternion.
    Compound,
}

/// Describes one quantity a [`SensorDataSource`] publishes: its name,
/// shape, and unit. `OrientationHistory::new` scans a source's
/// `data_source_infos()` for the entries named `"Quaternion"` and
/// `"Timestamp"` to locate their positions in each published sample
/// vector.
#[derive(Debug, Clone)]
pub struct SensorDataSourceInfo {
    /// The quantity's name, e.g. `"Quaternion"`, `"Timestamp"`, `"AccelX"`.
    pub name: String,
    /// Scalar or compound.
    pub shape: QuantityShape,
    /// The physical unit of this quantity (for a compound quantity, the
    /// unit shared by its parts, e.g. dimensionless for a quaternion).
    pub unit: Unit,
}

/// A sink registered with a [`SensorDataSource`], receiving every
/// published sample.
///
/// `publish` is called with the full vector of quantities for one sample
/// (in the order described by `data_source_infos()`) and the processor
/// timestamp the source assigned to that sample.
pub trait SensorDataSubscriber: Send {
    /// Delivers one published sample.
    fn publish(&mut self, quantities: &[Scalar], processor_timestamp: i64);
}

/// One driver-reported IMU sample, as handed to
/// [`SensorDataSource::on_sample`] by a driver callback. Mirrors the raw
/// fields `navXSensor`'s `timestampedDataReceived` gets from the board: an
/// orientation quaternion plus the board's own derived yaw/pitch/roll.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RawImuSample {
    pub quat_w: f32,
    pub quat_x: f32,
    pub quat_y: f32,
    pub quat_z: f32,
    pub yaw_deg: f32,
    pub pitch_deg: f32,
    pub roll_deg: f32,
}

/// The driver operations a [`SensorDataSource`] needs: rezeroing yaw, and
/// the poll-style getters [`SensorDataSource::current`] reads directly —
/// `navXSensor`'s `getCurrent` reads the driver's own cached fields, not a
/// publish-side cache, and this trait is shaped the same way.
pub trait SensorDriver: Send {
    /// Instructs the driver to treat its current yaw reading as zero.
    fn zero_yaw(&mut self);

    /// Whether the driver currently has a live connection to the sensor.
    fn is_connected(&self) -> bool;

    /// The driver's current orientation quaternion, as `(w, x, y, z)`.
    fn quaternion(&self) -> (f32, f32, f32, f32);

    /// The driver's current yaw, in degrees.
    fn yaw_deg(&self) -> f32;

    /// The driver's current pitch, in degrees.
    fn pitch_deg(&self) -> f32;

    /// The driver's current roll, in degrees.
    fn roll_deg(&self) -> f32;

    /// The sensor-clock timestamp of the driver's most recent reading.
    fn last_sensor_timestamp(&self) -> i64;
}

struct Registry {
    subscribers: HashMap<String, Box<dyn SensorDataSubscriber>>,
    /// Reused across `on_sample` calls to avoid a per-sample allocation.
    scratch: Vec<Scalar>,
    driver: Option<Box<dyn SensorDriver>>,
}

/// A driver-facing fan-out point: a named set of quantities, published to
/// zero or more registered subscribers under a single lock.
///
/// `current`, `subscribe`, `unsubscribe`, `publish`, and `on_sample` all
/// take the same internal lock, matching the registry's own discipline —
/// one lock covering both the subscriber set and the cached scratch buffer
/// `on_sample` stages each translated sample into.
pub struct SensorDataSource {
    infos: Vec<SensorDataSourceInfo>,
    registry: Mutex<Registry>,
}

impl SensorDataSource {
    /// Constructs a source describing the given quantities, initially
    /// with no subscribers and no driver attached.
    pub fn new(infos: Vec<SensorDataSourceInfo>) -> Self {
        Self::with_driver(infos, None)
    }

    /// Like [`SensorDataSource::new`], additionally wiring a driver handle
    /// so that [`SensorDataSource::reset`] and [`SensorDataSource::current`]
    /// have a live driver to forward to and poll.
    pub fn with_driver(
        infos: Vec<SensorDataSourceInfo>,
        driver: Option<Box<dyn SensorDriver>>,
    ) -> Self {
        Self {
            registry: Mutex::new(Registry {
                subscribers: HashMap::new(),
                scratch: Vec::with_capacity(STANDARD_IMU_LAYOUT_WIDTH),
                driver,
            }),
            infos,
        }
    }

    /// Instructs the driver to rezero the quantity at `quantity_index`.
    /// Only the `"Yaw"` quantity is resettable — any other index, or a
    /// source with no driver attached, returns `false` without effect.
    pub fn reset(&self, quantity_index: usize) -> bool {
        let Some(info) = self.infos.get(quantity_index) else {
            return false;
        };
        if info.name != "Yaw" {
            return false;
        }
        match self.registry.lock().driver.as_mut() {
            Some(driver) => {
                driver.zero_yaw();
                true
            }
            None => false,
        }
    }

    /// The quantities this source publishes, in the order each `publish`
    /// call's slice is laid out.
    pub fn data_source_infos(&self) -> &[SensorDataSourceInfo] {
        &self.infos
    }

    /// The canonical eight-column IMU layout a driver-fed
    /// [`SensorDataSource`] publishes through [`SensorDataSource::on_sample`]:
    /// `Timestamp`, `Quaternion` (compound, `W`/`X`/`Y`/`Z`), `Yaw`, `Pitch`,
    /// `Roll`. Grounded on `navXSensor`'s own `data_source_infos`
    /// construction.
    pub fn standard_imu_infos() -> Vec<SensorDataSourceInfo> {
        vec![
            SensorDataSourceInfo {
                name: "Timestamp".to_string(),
                shape: QuantityShape::Scalar,
                unit: DIMENSIONLESS,
            },
            SensorDataSourceInfo {
                name: "Quaternion".to_string(),
                shape: QuantityShape::Compound,
                unit: DIMENSIONLESS,
            },
            SensorDataSourceInfo {
                name: "Yaw".to_string(),
                shape: QuantityShape::Scalar,
                unit: DEGREE,
            },
            SensorDataSourceInfo {
                name: "Pitch".to_string(),
                shape: QuantityShape::Scalar,
                unit: DEGREE,
            },
            SensorDataSourceInfo {
                name: "Roll".to_string(),
                shape: QuantityShape::Scalar,
                unit: DEGREE,
            },
        ]
    }

    /// Driver-callback entry point, per `spec.md` §4.5: translates one raw
    /// driver sample into the standard eight-column quantity vector
    /// (`Timestamp`, `Quaternion.{W,X,Y,Z}`, `Yaw`, `Pitch`, `Roll`),
    /// stamps it with the caller-supplied processor timestamp, and fans it
    /// out to every subscriber — the push-style counterpart to the
    /// poll-style [`SensorDataSource::current`]. Grounded on `navXSensor`'s
    /// `timestampedDataReceived`.
    pub fn on_sample(&self, processor_timestamp: i64, sensor_timestamp: i64, raw: RawImuSample) {
        let mut inner = self.registry.lock();
        let Registry {
            subscribers,
            scratch,
            ..
        } = &mut *inner;

        scratch.clear();
        scratch.push(Scalar::new(sensor_timestamp as f32, DIMENSIONLESS));
        scratch.push(Scalar::new(raw.quat_w, DIMENSIONLESS));
        scratch.push(Scalar::new(raw.quat_x, DIMENSIONLESS));
        scratch.push(Scalar::new(raw.quat_y, DIMENSIONLESS));
        scratch.push(Scalar::new(raw.quat_z, DIMENSIONLESS));
        scratch.push(Scalar::new(raw.yaw_deg, DEGREE));
        scratch.push(Scalar::new(raw.pitch_deg, DEGREE));
        scratch.push(Scalar::new(raw.roll_deg, DEGREE));

        for subscriber in subscribers.values_mut() {
            subscriber.publish(&*scratch, processor_timestamp);
        }
    }

    /// Writes the driver's live polled state into `out_quantities` (using
    /// the standard eight-column layout) and `out_timestamp`, returning
    /// `true` if a driver is attached and currently connected. `false`
    /// leaves both `out` parameters untouched.
    ///
    /// Reads the driver's own cached fields directly rather than the last
    /// published sample — `connected` here means "the driver reports a
    /// live connection right now", not "something has been published",
    /// matching `navXSensor`'s `getCurrent`.
    pub fn current(&self, out_quantities: &mut [Scalar], out_timestamp: &mut i64) -> bool {
        if out_quantities.len() < STANDARD_IMU_LAYOUT_WIDTH {
            return false;
        }

        let inner = self.registry.lock();
        let Some(driver) = inner.driver.as_deref() else {
            return false;
        };
        if !driver.is_connected() {
            return false;
        }

        let (w, x, y, z) = driver.quaternion();
        out_quantities[0] = Scalar::new(driver.last_sensor_timestamp() as f32, DIMENSIONLESS);
        out_quantities[1] = Scalar::new(w, DIMENSIONLESS);
        out_quantities[2] = Scalar::new(x, DIMENSIONLESS);
        out_quantities[3] = Scalar::new(y, DIMENSIONLESS);
        out_quantities[4] = Scalar::new(z, DIMENSIONLESS);
        out_quantities[5] = Scalar::new(driver.yaw_deg(), DEGREE);
        out_quantities[6] = Scalar::new(driver.pitch_deg(), DEGREE);
        out_quantities[7] = Scalar::new(driver.roll_deg(), DEGREE);
        *out_timestamp = processor_timestamp_now();
        true
    }

    /// Registers `subscriber` under `id`. Returns `false` (and does not
    /// replace the existing subscriber) if `id` is already registered —
    /// the `DuplicateSubscribe` condition from the error design.
    pub fn subscribe(
        &self,
        id: impl Into<String>,
        subscriber: Box<dyn SensorDataSubscriber>,
    ) -> bool {
        let mut inner = self.registry.lock();
        let id = id.into();
        if inner.subscribers.contains_key(&id) {
            tracing::warn!(subscriber_id = %id, "duplicate subscribe rejected");
            return false;
        }
        inner.subscribers.insert(id, subscriber);
        true
    }

    /// Unregisters the subscriber known as `id`. Returns `true` if a
    /// subscriber was actually removed.
    pub fn unsubscribe(&self, id: &str) -> bool {
        self.registry.lock().subscribers.remove(id).is_some()
    }

    /// Delivers `quantities` (and `processor_timestamp`) to every
    /// registered subscriber.
    ///
    /// Callers feeding pre-built quantity vectors directly (test harnesses,
    /// or a source whose layout isn't the standard IMU one) call this
    /// directly; a driver-fed IMU source instead calls
    /// [`SensorDataSource::on_sample`], which builds the vector itself and
    /// fans it out through this same subscriber set.
    ///
    /// Takes the registry lock for the duration of the fan-out — a slow
    /// subscriber blocks the driver thread and every other subscriber's
    /// delivery of this sample, matching the crate's single-lock-per-
    /// source concurrency discipline.
    pub fn publish(&self, quantities: &[Scalar], processor_timestamp: i64) {
        let mut inner = self.registry.lock();
        for subscriber in inner.subscribers.values_mut() {
            subscriber.publish(quantities, processor_timestamp);
        }
    }
}

/// The host processor clock, as milliseconds since the Unix epoch — the
/// timestamp [`SensorDataSource::current`] stamps a poll with, distinct
/// from the caller-supplied `processor_timestamp` an `on_sample` callback
/// carries.
fn processor_timestamp_now() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or(0)
}
