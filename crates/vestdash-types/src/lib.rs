//! Data model for the wearable sensor vest dashboard.
//!
//! This crate provides the types shared by the measurement access layer
//! (vestdash-core) and the command-line dashboard (vestdash-cli).
//!
//! # Features
//!
//! - Wire types for vests, sensors and measurements as the remote API returns them
//! - Request bodies for creating vests, sensors and measurements
//! - The normalized [`MeasurementTable`] used for charting
//! - Lenient id and flag decoding (numbers or numeric strings, `0`/`1` flags)
//!
//! # Example
//!
//! ```
//! use vestdash_types::Measurement;
//!
//! let raw = r#"{"sensor_id": "7", "timestamp": "2024-01-01 10:00:00", "value": "21.5"}"#;
//! let measurement: Measurement = serde_json::from_str(raw).unwrap();
//!
//! assert_eq!(measurement.sensor_id, Some(7));
//! assert_eq!(measurement.value_f64(), Some(21.5));
//! assert!(!measurement.is_simulated());
//! ```

pub mod lenient;
pub mod table;
pub mod types;

pub use table::{MeasurementRow, MeasurementTable, SensorSeries};
pub use types::{
    Measurement, MeasurementId, NewMeasurement, NewSensor, NewVest, Sensor, SensorId, Vest,
    VestId,
};

/// Label used when a measurement carries no position or sensor type.
pub const UNKNOWN_LABEL: &str = "unknown";
