//! Fixed-capacity, interpolating time history of timestamped samples.
//!
//! This module implements the ring buffer at the center of the crate: a
//! fixed-size array of [`TimestampedValue`] slots, a write cursor, and a
//! count of valid slots, all guarded by a single [`parking_lot::Mutex`].
//!
//! # Features
//! - Fixed capacity, clamped to a sane maximum at construction
//! - Backward-walking, bracketed linear/SLERP interpolation on lookup
//! - CSV snapshot export, with automatic numbered filenames
//! - No dynamic resize, no persistence across process lifetime
//!
//! # Architecture
//!
//! Samples are inserted at a write cursor that advances circularly through
//! a fixed `Vec<TimestampedValue<T>>`. Once the buffer has wrapped, the
//! oldest sample is overwritten on the next insert. A query walks backward
//! from the cursor, stopping as soon as it finds a bracketing pair of
//! samples (or an exact match), so lookups near the write cursor are cheap
//! regardless of capacity.
//!
//! # Thread Safety
//!
//! - **Inserts and queries**: serialized via a single internal
//!   `parking_lot::Mutex` covering the slot array, cursor, and valid count.
//!   `parking_lot`'s mutex carries no poison flag, so a panicking producer
//!   does not wedge every future consumer.
//! - **Snapshot export**: the lock is held for the duration of the CSV
//!   write, matching the "exclusive access during iteration" rule this
//!   crate documents rather than hides — a snapshot always reflects a
//!   single consistent state of the buffer, at the cost of blocking
//!   concurrent inserts while it runs.

use std::fs;
use std::io::Write as _;
use std::path::Path;

use parking_lot::Mutex;

use crate::error::FusionResult;
use crate::quantity::Sample;
use crate::timestamp::TimestampInfo;
use crate::timestamped_value::TimestampedValue;
use crate::units::Unit;

/// Capacity above which [`TimeHistory::new`] silently clamps, logging a
/// warning rather than erroring (capacity is a policy choice, not a
/// correctness constraint).
const MAX_CAPACITY: usize = 1000;

struct Inner<T> {
    slots: Vec<TimestampedValue<T>>,
    /// Index the next `add` will write to.
    cursor: usize,
    /// Number of slots holding a real inserted sample (saturates at capacity).
    valid_count: usize,
}

/// A thread-safe, fixed-capacity, interpolating time history of `T`.
///
/// `T` must implement [`Sample`]. Construct with [`TimeHistory::new`],
/// insert with [`TimeHistory::add`], and query with [`TimeHistory::get`] or
/// [`TimeHistory::most_recent`].
///
/// # Example
///
/// ```
/// use fusion_core::history::TimeHistory;
/// use fusion_core::quantity::Scalar;
/// use fusion_core::timestamped_value::TimestampedValue;
/// use fusion_core::units::registry::RADIAN;
///
/// let history: TimeHistory<Scalar> = TimeHistory::new(16, Scalar::default());
/// history.add(Scalar::new(1.0, RADIAN), 100);
/// history.add(Scalar::new(2.0, RADIAN), 200);
///
/// let mut out = TimestampedValue::empty(Scalar::default());
/// assert!(history.get(150, &mut out));
/// assert_eq!(out.value().value(), 1.5);
/// assert!(out.is_interpolated());
/// ```
pub struct TimeHistory<T> {
    value_name: &'static str,
    capacity: usize,
    ts_info: TimestampInfo,
    units: Vec<Unit>,
    inner: Mutex<Inner<T>>,
}

impl<T: Sample> TimeHistory<T> {
    /// Constructs a history with room for `requested_capacity` samples,
    /// each initialized to `default_value` before any real insert.
    ///
    /// A `requested_capacity` of zero is clamped up to 1; one above
    /// [`MAX_CAPACITY`] is clamped down, with a `tracing::warn!`.
    pub fn new(requested_capacity: usize, default_value: T) -> Self {
        Self::with_name(requested_capacity, default_value, "Value")
    }

    /// Like [`TimeHistory::new`], but tags the history with a name used as
    /// the CSV column prefix and snapshot filename stem.
    pub fn with_name(requested_capacity: usize, default_value: T, value_name: &'static str) -> Self {
        Self::with_metadata(
            requested_capacity,
            default_value,
            value_name,
            TimestampInfo::sensor_millis(),
            Vec::new(),
        )
    }

    /// Full constructor, per `spec.md` §4.4/§6's configuration table: a
    /// sample prototype, fixed capacity, the clock metadata describing the
    /// timestamps that will be passed to [`TimeHistory::add`], a value
    /// name, and a per-field unit list. `ts_info` and `units` are pure
    /// metadata — carried for introspection and CSV/config round-tripping
    /// but never consulted by `add`/`get`/`interpolate`.
    pub fn with_metadata(
        requested_capacity: usize,
        default_value: T,
        value_name: &'static str,
        ts_info: TimestampInfo,
        units: Vec<Unit>,
    ) -> Self {
        let capacity = requested_capacity.clamp(1, MAX_CAPACITY);
        if requested_capacity > MAX_CAPACITY {
            tracing::warn!(
                requested_capacity,
                clamped_to = MAX_CAPACITY,
                "time history capacity clamped"
            );
        }
        let slots = (0..capacity)
            .map(|_| TimestampedValue::empty(default_value.clone()))
            .collect();
        Self {
            value_name,
            capacity,
            ts_info,
            units,
            inner: Mutex::new(Inner {
                slots,
                cursor: 0,
                valid_count: 0,
            }),
        }
    }

    /// The fixed capacity this history was constructed with (after
    /// clamping).
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// The clock metadata this history was constructed with.
    pub fn ts_info(&self) -> &TimestampInfo {
        &self.ts_info
    }

    /// The per-field unit metadata this history was constructed with, if
    /// any was supplied. Descriptive only — never used in arithmetic.
    pub fn units(&self) -> &[Unit] {
        &self.units
    }

    /// The number of valid samples currently held, up to [`capacity`](Self::capacity).
    pub fn len(&self) -> usize {
        self.inner.lock().valid_count
    }

    /// `true` if no sample has been inserted yet.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Discards all samples, returning the history to its freshly
    /// constructed state.
    pub fn reset(&self) {
        let mut inner = self.inner.lock();
        inner.cursor = 0;
        inner.valid_count = 0;
    }

    /// Inserts a new sample at `timestamp`.
    ///
    /// Callers are required to insert in non-decreasing timestamp order;
    /// this crate does not detect or reject out-of-order inserts (see the
    /// module's Non-goals) — a violation silently corrupts the backward
    /// walk in [`get`](Self::get), since it assumes monotonicity.
    pub fn add(&self, value: T, timestamp: i64) {
        let mut inner = self.inner.lock();
        let cursor = inner.cursor;
        let capacity = self.capacity;
        inner.slots[cursor].set(&value, timestamp);
        inner.cursor = (cursor + 1) % capacity;
        if inner.valid_count < capacity {
            inner.valid_count += 1;
        }
        tracing::trace!(timestamp, value_name = self.value_name, "sample inserted");
    }

    /// Looks up the value at `timestamp`, writing it into `out` and
    /// returning `true` on success.
    ///
    /// Walks backward from the write cursor through valid slots. If
    /// `timestamp` exactly matches a stored sample's timestamp, that
    /// sample is copied directly into `out` with `INTERPOLATED` clear.
    /// Otherwise, if `timestamp` falls strictly between two adjacent
    /// stored samples, the bracketing pair is interpolated via
    /// `T::interpolate` and `out` is flagged `INTERPOLATED`. If
    /// `timestamp` falls outside the window currently held (older than
    /// the oldest sample, or newer than the newest), returns `false` and
    /// leaves `out` unchanged.
    pub fn get(&self, timestamp: i64, out: &mut TimestampedValue<T>) -> bool {
        let inner = self.inner.lock();
        if inner.valid_count == 0 {
            return false;
        }

        let capacity = self.capacity;
        let newest_index = (inner.cursor + capacity - 1) % capacity;

        let mut next_index = newest_index;
        let mut next = &inner.slots[newest_index];

        if timestamp > next.timestamp() {
            return false;
        }

        for step in 0..inner.valid_count {
            let index = (newest_index + capacity - step) % capacity;
            let candidate = &inner.slots[index];

            if candidate.timestamp() == timestamp {
                out.set(candidate.value(), candidate.timestamp());
                return true;
            }

            if candidate.timestamp() < timestamp {
                *out = TimestampedValue::interpolate(
                    candidate,
                    next,
                    ratio(candidate.timestamp(), next.timestamp(), timestamp),
                );
                return true;
            }

            next_index = index;
            next = &inner.slots[next_index];
        }

        false
    }

    /// Writes the most recently inserted sample into `out`, returning
    /// `true` if the history holds at least one sample.
    pub fn most_recent(&self, out: &mut T) -> bool {
        let inner = self.inner.lock();
        if inner.valid_count == 0 {
            return false;
        }
        let capacity = self.capacity;
        let newest_index = (inner.cursor + capacity - 1) % capacity;
        out.copy_from(inner.slots[newest_index].value());
        true
    }

    /// The timestamp of the most recently inserted sample, if any.
    pub fn most_recent_timestamp(&self) -> Option<i64> {
        let inner = self.inner.lock();
        if inner.valid_count == 0 {
            return None;
        }
        let capacity = self.capacity;
        let newest_index = (inner.cursor + capacity - 1) % capacity;
        Some(inner.slots[newest_index].timestamp())
    }

    /// Writes every valid sample, oldest to newest, as CSV to `writer`.
    ///
    /// The header row is `Timestamp,<value_name>.<Field>,...` for
    /// compound quantities, or `Timestamp,<value_name>` for scalar ones.
    /// The lock is held for the whole write, so concurrent inserts block
    /// until the snapshot completes (see the module's Thread Safety
    /// section).
    pub fn snapshot_to_writer<W: std::io::Write>(&self, writer: W) -> FusionResult<()> {
        let inner = self.inner.lock();
        let mut csv_writer = csv::Writer::from_writer(writer);

        let field_names = T::contained_names();
        if field_names.len() > 1 {
            let mut header = vec!["Timestamp".to_string()];
            header.extend(
                field_names
                    .iter()
                    .map(|field| format!("{}.{}", self.value_name, field)),
            );
            csv_writer.write_record(&header)?;
        } else {
            csv_writer.write_record(["Timestamp", self.value_name])?;
        }

        let capacity = self.capacity;
        let count = inner.valid_count;
        if count > 0 {
            let newest_index = (inner.cursor + capacity - 1) % capacity;
            let oldest_step = count - 1;
            for step in 0..=oldest_step {
                let index = (newest_index + capacity - (oldest_step - step)) % capacity;
                let slot = &inner.slots[index];
                let mut record = vec![slot.timestamp().to_string()];
                for (_, value, _) in slot.value().printable_parts() {
                    record.push(value.to_string());
                }
                csv_writer.write_record(&record)?;
            }
        }

        csv_writer.flush()?;
        tracing::debug!(
            value_name = self.value_name,
            rows = count,
            "wrote time history snapshot"
        );
        Ok(())
    }

    /// Writes a CSV snapshot into `directory`, choosing a filename of the
    /// form `<value_name>History<N>.csv`, where `N` is one greater than
    /// the highest `N` already present for this `value_name` in that
    /// directory (starting at 1 if none exist).
    ///
    /// Returns the path written to.
    pub fn snapshot_to_directory(&self, directory: &Path) -> FusionResult<std::path::PathBuf> {
        let next_index = next_snapshot_index(directory, self.value_name)?;
        let filename = format!("{}History{}.csv", self.value_name, next_index);
        let path = directory.join(filename);

        let file = fs::File::create(&path)?;
        self.snapshot_to_writer(file)?;
        Ok(path)
    }
}

/// Scans `directory` for files named `<value_name>History<N>.csv` and
/// returns `max(N) + 1`, or `1` if none are found. Mirrors
/// `writeToDiskInDirectory`'s numbering scheme from the original sources.
fn next_snapshot_index(directory: &Path, value_name: &str) -> FusionResult<u64> {
    let prefix = format!("{value_name}History");
    let mut max_found: u64 = 0;

    if directory.is_dir() {
        for entry in fs::read_dir(directory)? {
            let entry = entry?;
            let name = entry.file_name();
            let Some(name) = name.to_str() else {
                continue;
            };
            if let Some(rest) = name.strip_prefix(&prefix) {
                if let Some(number) = rest.strip_suffix(".csv") {
                    if let Ok(parsed) = number.parse::<u64>() {
                        max_found = max_found.max(parsed);
                    }
                }
            }
        }
    }

    Ok(max_found + 1)
}

/// Fractional position of `at` between `from` and `to`, in `[0, 1]` for
/// `from <= at <= to`.
fn ratio(from: i64, to: i64, at: i64) -> f64 {
    let span = (to - from) as f64;
    if span == 0.0 {
        return 0.0;
    }
    (at - from) as f64 / span
}
