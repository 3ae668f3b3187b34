//! Submitting new measurements.
//!
//! The API has accepted measurements in three different body shapes over
//! time. The writer tries them in a fixed order and stops at the first one
//! answered with 200 or 201. Each shape is sent at most once.

use std::fmt;

use serde_json::{Value, json};
use tracing::{debug, info};

use vestdash_types::{NewMeasurement, SensorId};

use crate::dashboard::Dashboard;
use crate::session::{Notice, Session};

/// Request body shape for `POST /measurements`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayloadShape {
    /// `{"measurements": [record]}`
    Batch,
    /// `[record]`
    BareList,
    /// `record`
    BareObject,
}

impl PayloadShape {
    /// Shapes in the order they are tried.
    pub const ALL: [PayloadShape; 3] = [
        PayloadShape::Batch,
        PayloadShape::BareList,
        PayloadShape::BareObject,
    ];

    /// Wrap `record` in this shape.
    #[must_use]
    pub fn wrap(self, record: &Value) -> Value {
        match self {
            PayloadShape::Batch => json!({ "measurements": [record] }),
            PayloadShape::BareList => json!([record]),
            PayloadShape::BareObject => record.clone(),
        }
    }
}

impl fmt::Display for PayloadShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PayloadShape::Batch => write!(f, "batch object"),
            PayloadShape::BareList => write!(f, "bare list"),
            PayloadShape::BareObject => write!(f, "bare object"),
        }
    }
}

/// The record the dashboard submits for a manual entry.
#[must_use]
pub fn dashboard_record(sensor_id: SensorId, value: f64) -> NewMeasurement {
    NewMeasurement {
        sensor_id,
        vest_id: None,
        timestamp: None,
        value,
        additional_data: json!({ "source": "dashboard" }),
    }
}

impl Dashboard {
    /// Submit one measurement for `sensor_id`.
    ///
    /// Returns `true` once a shape is accepted. Returns `false` after all
    /// three shapes were rejected, or as soon as a request fails to get a
    /// response; both cases are reported.
    pub async fn add_measurement(&self, session: &Session, sensor_id: SensorId, value: f64) -> bool {
        const OP: &str = "add_measurement";

        let record = match serde_json::to_value(dashboard_record(sensor_id, value)) {
            Ok(record) => record,
            Err(e) => {
                session.report(Notice::error(OP, format!("Could not encode measurement: {e}")));
                return false;
            }
        };

        let mut last_status = None;
        for shape in PayloadShape::ALL {
            let response = match self.client.post_measurements(&shape.wrap(&record)).await {
                Ok(response) => response,
                Err(e) => {
                    Self::report_error(session, OP, &e);
                    return false;
                }
            };

            if response.is_accepted() {
                info!(
                    "Measurement for sensor {} accepted as {} ({})",
                    sensor_id, shape, response.status
                );
                session.report(Notice::success(
                    OP,
                    format!("Added measurement {value} for sensor {sensor_id}"),
                ));
                return true;
            }

            debug!(
                "Measurement shape {} rejected with {}: {}",
                shape,
                response.status,
                response.error_message()
            );
            last_status = Some(response.status);
        }

        let status = last_status.map_or_else(|| "no response".to_string(), |s| s.to_string());
        session.report(Notice::error(
            OP,
            format!(
                "The API rejected the measurement in every supported format (last status {status})"
            ),
        ));
        false
    }
}
