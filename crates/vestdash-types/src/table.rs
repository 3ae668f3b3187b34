//! Normalized measurement table used for charting.

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::types::SensorId;

/// One normalized measurement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeasurementRow {
    #[serde(with = "time::serde::rfc3339")]
    pub timestamp: OffsetDateTime,
    pub value: f64,
    pub sensor_id: Option<SensorId>,
    pub position: String,
    pub sensor_type: String,
    /// Set when the source timestamp could not be parsed and the row was
    /// stamped with the time of normalization instead.
    #[serde(default)]
    pub timestamp_estimated: bool,
}

/// Rows of normalized measurements, in the order they were received.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MeasurementTable {
    rows: Vec<MeasurementRow>,
}

/// The values of one sensor, ready to be plotted.
#[derive(Debug, Clone, PartialEq)]
pub struct SensorSeries {
    pub sensor_id: Option<SensorId>,
    pub position: String,
    pub sensor_type: String,
    pub points: Vec<(OffsetDateTime, f64)>,
}

impl SensorSeries {
    /// Chart label, e.g. `"chest (IMU) #3"`.
    #[must_use]
    pub fn label(&self) -> String {
        match self.sensor_id {
            Some(id) => format!("{} ({}) #{}", self.position, self.sensor_type, id),
            None => format!("{} ({})", self.position, self.sensor_type),
        }
    }

    #[must_use]
    pub fn values(&self) -> Vec<f64> {
        self.points.iter().map(|(_, v)| *v).collect()
    }
}

impl MeasurementTable {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, row: MeasurementRow) {
        self.rows.push(row);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    #[must_use]
    pub fn rows(&self) -> &[MeasurementRow] {
        &self.rows
    }

    pub fn iter(&self) -> std::slice::Iter<'_, MeasurementRow> {
        self.rows.iter()
    }

    /// Number of rows whose timestamp had to be estimated.
    #[must_use]
    pub fn estimated_count(&self) -> usize {
        self.rows.iter().filter(|r| r.timestamp_estimated).count()
    }

    /// Split the table into one series per sensor.
    ///
    /// Series appear in the order their sensor was first seen and points keep
    /// the table order; nothing is sorted.
    #[must_use]
    pub fn series(&self) -> Vec<SensorSeries> {
        let mut series: Vec<SensorSeries> = Vec::new();
        for row in &self.rows {
            let existing = series.iter_mut().find(|s| {
                s.sensor_id == row.sensor_id
                    && (row.sensor_id.is_some()
                        || (s.position == row.position && s.sensor_type == row.sensor_type))
            });
            match existing {
                Some(s) => s.points.push((row.timestamp, row.value)),
                None => series.push(SensorSeries {
                    sensor_id: row.sensor_id,
                    position: row.position.clone(),
                    sensor_type: row.sensor_type.clone(),
                    points: vec![(row.timestamp, row.value)],
                }),
            }
        }
        series
    }
}

impl FromIterator<MeasurementRow> for MeasurementTable {
    fn from_iter<I: IntoIterator<Item = MeasurementRow>>(iter: I) -> Self {
        Self {
            rows: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a MeasurementTable {
    type Item = &'a MeasurementRow;
    type IntoIter = std::slice::Iter<'a, MeasurementRow>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}
