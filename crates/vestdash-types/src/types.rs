//! Wire types for vests, sensors and measurements.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::lenient;

/// Identifier of a vest.
pub type VestId = i64;

/// Identifier of a sensor.
pub type SensorId = i64;

/// Identifier of a stored measurement.
pub type MeasurementId = i64;

fn default_true() -> bool {
    true
}

/// A physical wearable unit containing one or more sensors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vest {
    #[serde(deserialize_with = "lenient::id")]
    pub vest_id: VestId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default = "default_true", deserialize_with = "lenient::flag")]
    pub is_active: bool,
}

impl Vest {
    /// Name for display, falling back to the id when the API left it empty.
    #[must_use]
    pub fn display_name(&self) -> String {
        if self.name.trim().is_empty() {
            format!("Vest {}", self.vest_id)
        } else {
            self.name.clone()
        }
    }
}

/// A measurement-producing device mounted at a position on a vest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sensor {
    #[serde(deserialize_with = "lenient::id")]
    pub sensor_id: SensorId,
    /// Owning vest. The API does not always echo it.
    #[serde(default, deserialize_with = "lenient::opt_id")]
    pub vest_id: Option<VestId>,
    /// Human-readable type name (e.g. "IMU", "FlexSensor").
    #[serde(default)]
    pub sensor_type: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_id")]
    pub sensor_type_id: Option<i64>,
    #[serde(default)]
    pub position: Option<String>,
    #[serde(default = "default_true", deserialize_with = "lenient::flag")]
    pub is_active: bool,
    /// Opaque calibration blob; the API stores it as a JSON-encoded string.
    #[serde(default)]
    pub calibration_data: Option<Value>,
}

impl Sensor {
    /// Sensor type label, using the numeric type id when no name is known.
    #[must_use]
    pub fn type_label(&self) -> String {
        match (&self.sensor_type, self.sensor_type_id) {
            (Some(name), _) if !name.trim().is_empty() => name.clone(),
            (_, Some(id)) => format!("type {id}"),
            _ => crate::UNKNOWN_LABEL.to_string(),
        }
    }

    /// Mounting position, or `"unknown"`.
    #[must_use]
    pub fn position_label(&self) -> &str {
        self.position
            .as_deref()
            .filter(|p| !p.trim().is_empty())
            .unwrap_or(crate::UNKNOWN_LABEL)
    }
}

/// One raw measurement record as the API returns it.
///
/// Records are heterogeneous: timestamps come as `"YYYY-MM-DD HH:MM:SS"` or
/// ISO-8601 with a `Z` suffix, values as numbers or strings, and
/// `additional_data` as an object or a JSON-encoded string. Fields are kept
/// raw here and interpreted by the normalizer; fields this type does not know
/// about are preserved in `extra` so records round-trip unchanged.
///
/// Decoding never fails for a JSON object. A known field whose value does not
/// fit its type (say a UUID `measurement_id`) is left in `extra` untouched and
/// the typed field stays `None`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Map<String, Value>")]
pub struct Measurement {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub measurement_id: Option<MeasurementId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sensor_id: Option<SensorId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vest_id: Option<VestId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sensor_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub additional_data: Option<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Move `key` out of `fields` when `convert` accepts its value.
fn take<T>(
    fields: &mut Map<String, Value>,
    key: &str,
    convert: impl FnOnce(&Value) -> Option<T>,
) -> Option<T> {
    let taken = convert(fields.get(key)?)?;
    fields.remove(key);
    Some(taken)
}

fn non_null(value: &Value) -> Option<Value> {
    (!value.is_null()).then(|| value.clone())
}

fn text(value: &Value) -> Option<String> {
    value.as_str().map(String::from)
}

impl From<Map<String, Value>> for Measurement {
    fn from(mut fields: Map<String, Value>) -> Self {
        Self {
            measurement_id: take(&mut fields, "measurement_id", lenient::id_from_value),
            sensor_id: take(&mut fields, "sensor_id", lenient::id_from_value),
            vest_id: take(&mut fields, "vest_id", lenient::id_from_value),
            timestamp: take(&mut fields, "timestamp", non_null),
            value: take(&mut fields, "value", non_null),
            position: take(&mut fields, "position", text),
            sensor_type: take(&mut fields, "sensor_type", text),
            additional_data: take(&mut fields, "additional_data", non_null),
            extra: fields,
        }
    }
}

impl Measurement {
    /// The timestamp, if it was sent as a string.
    #[must_use]
    pub fn timestamp_str(&self) -> Option<&str> {
        self.timestamp.as_ref().and_then(Value::as_str)
    }

    /// Coerce the value to a finite float.
    ///
    /// Numbers are used directly and numeric strings are parsed. Anything
    /// else (missing, null, booleans, garbage, NaN) yields `None`.
    #[must_use]
    pub fn value_f64(&self) -> Option<f64> {
        let value = match self.value.as_ref()? {
            Value::Number(n) => n.as_f64()?,
            Value::String(s) => s.trim().parse::<f64>().ok()?,
            _ => return None,
        };
        value.is_finite().then_some(value)
    }

    /// Look up a key in `additional_data`, decoding it first when the API
    /// stored it as a JSON string.
    #[must_use]
    pub fn additional(&self, key: &str) -> Option<Value> {
        match self.additional_data.as_ref()? {
            Value::Object(map) => map.get(key).cloned(),
            Value::String(encoded) => serde_json::from_str::<Map<String, Value>>(encoded)
                .ok()
                .and_then(|map| map.get(key).cloned()),
            _ => None,
        }
    }

    /// Whether this record was synthesized by the degraded-mode fallback.
    ///
    /// Simulated values are placeholders, not real readings.
    #[must_use]
    pub fn is_simulated(&self) -> bool {
        self.additional("simulated")
            .and_then(|v| v.as_bool())
            .unwrap_or(false)
    }
}

/// Request body for `POST /vests`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewVest {
    pub name: String,
    pub description: String,
    pub is_active: bool,
}

/// Request body for `POST /sensors`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewSensor {
    pub vest_id: VestId,
    pub sensor_type_id: i64,
    pub position: String,
    pub is_active: bool,
    /// Sent as a JSON-encoded string, which is how the API stores it.
    pub calibration_data: String,
}

/// Request body entry for `POST /measurements`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewMeasurement {
    pub sensor_id: SensorId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vest_id: Option<VestId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
    pub value: f64,
    pub additional_data: Value,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_vest_minimal_echo() {
        let vest: Vest = serde_json::from_str(r#"{"vest_id": 12}"#).unwrap();
        assert_eq!(vest.vest_id, 12);
        assert!(vest.is_active);
        assert_eq!(vest.display_name(), "Vest 12");
    }

    #[test]
    fn test_vest_full() {
        let vest: Vest = serde_json::from_value(json!({
            "vest_id": "3",
            "name": "Left team",
            "description": "Sparring vest",
            "is_active": 0
        }))
        .unwrap();
        assert_eq!(vest.vest_id, 3);
        assert_eq!(vest.display_name(), "Left team");
        assert_eq!(vest.description.as_deref(), Some("Sparring vest"));
        assert!(!vest.is_active);
    }

    #[test]
    fn test_sensor_labels() {
        let sensor: Sensor = serde_json::from_value(json!({
            "sensor_id": 5,
            "vest_id": 1,
            "sensor_type_id": 2,
            "calibration_data": "{\"offset\": 0.5}"
        }))
        .unwrap();
        assert_eq!(sensor.type_label(), "type 2");
        assert_eq!(sensor.position_label(), "unknown");

        let named = Sensor {
            sensor_type: Some("IMU".into()),
            position: Some("chest".into()),
            ..sensor
        };
        assert_eq!(named.type_label(), "IMU");
        assert_eq!(named.position_label(), "chest");
    }

    #[test]
    fn test_measurement_value_coercion() {
        let cases = [
            (json!(21.5), Some(21.5)),
            (json!(7), Some(7.0)),
            (json!(" 3.25 "), Some(3.25)),
            (json!("abc"), None),
            (json!(true), None),
            (json!(null), None),
            (json!("NaN"), None),
        ];
        for (raw, expected) in cases {
            let m = Measurement {
                value: Some(raw.clone()),
                ..Default::default()
            };
            assert_eq!(m.value_f64(), expected, "value {raw}");
        }
        assert_eq!(Measurement::default().value_f64(), None);
    }

    #[test]
    fn test_measurement_simulated_flag_object_and_string() {
        let object = Measurement {
            additional_data: Some(json!({"simulated": true})),
            ..Default::default()
        };
        let encoded = Measurement {
            additional_data: Some(json!("{\"simulated\": true}")),
            ..Default::default()
        };
        let real = Measurement {
            additional_data: Some(json!({"source": "dashboard"})),
            ..Default::default()
        };
        assert!(object.is_simulated());
        assert!(encoded.is_simulated());
        assert!(!real.is_simulated());
        assert_eq!(real.additional("source"), Some(json!("dashboard")));
    }

    #[test]
    fn test_measurement_preserves_unknown_fields() {
        let raw = json!({
            "measurement_id": 1,
            "sensor_id": 2,
            "timestamp": "2024-01-01T10:00:00Z",
            "value": 1.5,
            "quality": "good"
        });
        let m: Measurement = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(m.extra.get("quality"), Some(&json!("good")));
        assert_eq!(m.timestamp_str(), Some("2024-01-01T10:00:00Z"));
        assert_eq!(serde_json::to_value(&m).unwrap(), raw);
    }

    #[test]
    fn test_measurement_keeps_ill_typed_fields_raw() {
        let raw = json!({
            "measurement_id": "7f3a-uuid",
            "sensor_id": 3.0,
            "vest_id": "1",
            "position": 4,
            "timestamp": null,
            "value": "20.5"
        });
        let m: Measurement = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(m.measurement_id, None);
        assert_eq!(m.sensor_id, Some(3));
        assert_eq!(m.vest_id, Some(1));
        assert_eq!(m.position, None);
        assert_eq!(m.timestamp, None);
        assert_eq!(m.extra.get("measurement_id"), Some(&json!("7f3a-uuid")));
        assert_eq!(m.extra.get("position"), Some(&json!(4)));

        let out = serde_json::to_value(&m).unwrap();
        assert_eq!(out["measurement_id"], "7f3a-uuid");
        assert_eq!(out["position"], 4);
        assert_eq!(out["sensor_id"], 3);
        assert_eq!(out["value"], "20.5");
    }

    #[test]
    fn test_measurement_list_survives_odd_ids() {
        let list: Vec<Measurement> = serde_json::from_str(
            r#"[{"measurement_id": "7f3a-uuid", "sensor_id": 1, "value": 2},
                {"measurement_id": 8, "sensor_id": 1.0, "value": 3}]"#,
        )
        .unwrap();
        assert_eq!(list.len(), 2);
        assert_eq!(list[1].measurement_id, Some(8));
        assert_eq!(list[1].sensor_id, Some(1));
    }

    #[test]
    fn test_new_measurement_skips_empty_fields() {
        let body = NewMeasurement {
            sensor_id: 4,
            vest_id: None,
            timestamp: None,
            value: 20.0,
            additional_data: json!({"source": "dashboard"}),
        };
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            json!({"sensor_id": 4, "value": 20.0, "additional_data": {"source": "dashboard"}})
        );
    }
}
