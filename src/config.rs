//! Loading a [`TimeHistory`] configuration from TOML or the environment.
//!
//! Grounded on the reference's use of the `config` crate for its own
//! `Settings` type — layered sources (file, then environment overrides),
//! deserialized into a plain struct via `serde`.

use serde::Deserialize;

use crate::error::FusionResult;
use crate::history::TimeHistory;
use crate::quantity::Sample;
use crate::timestamp::Resolution;

/// Declarative configuration for constructing a [`TimeHistory`].
///
/// # Example TOML
///
/// ```toml
/// [history]
/// capacity = 500
/// value_name = "Quaternion"
/// resolution = "millisecond"
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct HistoryConfig {
    /// Requested slot capacity (clamped by [`TimeHistory::new`] at build time).
    pub capacity: usize,
    /// Name used for CSV column prefixes and snapshot filenames.
    pub value_name: String,
    /// Nominal clock resolution for timestamps fed into this history.
    #[serde(default)]
    pub resolution: ConfigResolution,
}

/// TOML-friendly mirror of [`Resolution`] (serde can't derive
/// string-keyed enum parsing directly onto the crate's own type without
/// pinning its wire representation, so this is kept distinct).
#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfigResolution {
    /// Whole seconds.
    Second,
    /// Milliseconds. The default when the field is omitted from TOML.
    #[default]
    Millisecond,
    /// Microseconds.
    Microsecond,
    /// Nanoseconds.
    Nanosecond,
}

impl From<ConfigResolution> for Resolution {
    fn from(value: ConfigResolution) -> Self {
        match value {
            ConfigResolution::Second => Resolution::Second,
            ConfigResolution::Millisecond => Resolution::Millisecond,
            ConfigResolution::Microsecond => Resolution::Microsecond,
            ConfigResolution::Nanosecond => Resolution::Nanosecond,
        }
    }
}

impl HistoryConfig {
    /// Loads configuration from a TOML file at `path`, with no
    /// environment override layer.
    pub fn from_file(path: &str) -> FusionResult<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(path))
            .build()?;
        Ok(settings.get::<Self>("history")?)
    }

    /// Loads configuration from a TOML file at `path`, with environment
    /// variables prefixed `FUSION_HISTORY_` overriding individual fields
    /// (e.g. `FUSION_HISTORY_CAPACITY=1000`).
    pub fn from_file_and_env(path: &str) -> FusionResult<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(path))
            .add_source(config::Environment::with_prefix("FUSION_HISTORY"))
            .build()?;
        Ok(settings.get::<Self>("history")?)
    }

    /// Builds a [`TimeHistory`] from this configuration, using
    /// `default_value` to pre-fill empty slots. `value_name` is leaked to
    /// obtain the `'static` lifetime `TimeHistory` requires for its
    /// column-name tag; this is a one-time allocation per distinct
    /// configured history, acceptable for a value set once at startup. The
    /// history's clock metadata is built from this config's `resolution`
    /// field, with the rest of [`crate::timestamp::TimestampInfo`] left at
    /// [`crate::timestamp::TimestampInfo::sensor_millis`]'s defaults.
    pub fn build<T: Sample>(&self, default_value: T) -> TimeHistory<T> {
        let name: &'static str = Box::leak(self.value_name.clone().into_boxed_str());
        let mut ts_info = crate::timestamp::TimestampInfo::sensor_millis();
        ts_info.default_timestamp.set_resolution(self.resolution.into());
        TimeHistory::with_metadata(self.capacity, default_value, name, ts_info, Vec::new())
    }
}
