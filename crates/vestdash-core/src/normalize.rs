//! Conversion of raw measurement records into a chartable table.
//!
//! Records from the API are not uniform. Timestamps arrive either as
//! `"YYYY-MM-DD HH:MM:SS"` or as ISO-8601 with a `Z` suffix, values as numbers
//! or strings, and position/type may be missing. [`format_measurements`]
//! accepts all of them and never fails:
//!
//! | Field | Rule |
//! |-------|------|
//! | `timestamp` | plain format, then ISO-8601 (`Z` read as `+00:00`, `T` or space separator, minute to sub-second precision, or a bare date), else the current time |
//! | `value` | number or numeric string, else `0.0` |
//! | `position`, `sensor_type` | as given, else `"unknown"` |
//!
//! Timestamps without an offset are taken to be UTC. Rows whose timestamp
//! could not be parsed are flagged with `timestamp_estimated` and logged.

use time::format_description::BorrowedFormatItem;
use time::format_description::well_known::Rfc3339;
use time::macros::format_description;
use time::{Date, OffsetDateTime, PrimitiveDateTime, UtcOffset};
use tracing::warn;

use vestdash_types::{Measurement, MeasurementRow, MeasurementTable, UNKNOWN_LABEL};

/// `YYYY-MM-DD HH:MM:SS`, the format the API stores.
pub const PLAIN_TIMESTAMP: &[BorrowedFormatItem<'static>] =
    format_description!("[year]-[month]-[day] [hour]:[minute]:[second]");

/// ISO-8601 date-times with an explicit offset, `T` or space separated,
/// seconds and fraction optional.
const ISO_OFFSET: [&[BorrowedFormatItem<'static>]; 2] = [
    format_description!(
        "[year]-[month]-[day]T[hour]:[minute][optional [:[second][optional [.[subsecond]]]]][offset_hour sign:mandatory]:[offset_minute]"
    ),
    format_description!(
        "[year]-[month]-[day] [hour]:[minute][optional [:[second][optional [.[subsecond]]]]][offset_hour sign:mandatory]:[offset_minute]"
    ),
];

/// ISO-8601 local date-times without an offset.
const ISO_LOCAL: [&[BorrowedFormatItem<'static>]; 2] = [
    format_description!(
        "[year]-[month]-[day]T[hour]:[minute][optional [:[second][optional [.[subsecond]]]]]"
    ),
    format_description!(
        "[year]-[month]-[day] [hour]:[minute][optional [:[second][optional [.[subsecond]]]]]"
    ),
];

/// ISO-8601 calendar date, read as midnight.
const ISO_DATE: &[BorrowedFormatItem<'static>] = format_description!("[year]-[month]-[day]");

/// Parse a timestamp in any of the formats the API produces.
///
/// Returns `None` when no format matches.
#[must_use]
pub fn parse_timestamp(raw: &str) -> Option<OffsetDateTime> {
    let raw = raw.trim();

    if let Ok(dt) = PrimitiveDateTime::parse(raw, PLAIN_TIMESTAMP) {
        return Some(dt.assume_utc());
    }

    let iso = match raw.strip_suffix(['Z', 'z']) {
        Some(stripped) => format!("{stripped}+00:00"),
        None => raw.to_string(),
    };
    if let Ok(dt) = OffsetDateTime::parse(&iso, &Rfc3339) {
        return Some(dt.to_offset(UtcOffset::UTC));
    }
    if let Some(dt) = ISO_OFFSET
        .iter()
        .find_map(|format| OffsetDateTime::parse(&iso, *format).ok())
    {
        return Some(dt.to_offset(UtcOffset::UTC));
    }
    if let Some(dt) = ISO_LOCAL
        .iter()
        .find_map(|format| PrimitiveDateTime::parse(&iso, *format).ok())
    {
        return Some(dt.assume_utc());
    }

    Date::parse(&iso, ISO_DATE)
        .ok()
        .map(|date| date.midnight().assume_utc())
}

/// Normalize raw records into a [`MeasurementTable`], in input order.
#[must_use]
pub fn format_measurements(records: &[Measurement]) -> MeasurementTable {
    format_measurements_at(records, OffsetDateTime::now_utc())
}

/// Like [`format_measurements`], stamping unparsable timestamps with `now`.
#[must_use]
pub fn format_measurements_at(records: &[Measurement], now: OffsetDateTime) -> MeasurementTable {
    records.iter().map(|m| normalize_record(m, now)).collect()
}

fn normalize_record(record: &Measurement, now: OffsetDateTime) -> MeasurementRow {
    let parsed = record.timestamp_str().and_then(parse_timestamp);
    if parsed.is_none() {
        warn!(
            sensor_id = ?record.sensor_id,
            timestamp = ?record.timestamp,
            "Unparsable measurement timestamp, using current time"
        );
    }

    MeasurementRow {
        timestamp: parsed.unwrap_or(now),
        value: record.value_f64().unwrap_or(0.0),
        sensor_id: record.sensor_id,
        position: label_or_unknown(record.position.as_deref()),
        sensor_type: label_or_unknown(record.sensor_type.as_deref()),
        timestamp_estimated: parsed.is_none(),
    }
}

fn label_or_unknown(label: Option<&str>) -> String {
    label
        .filter(|l| !l.trim().is_empty())
        .unwrap_or(UNKNOWN_LABEL)
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use time::macros::datetime;

    fn record(timestamp: serde_json::Value, value: serde_json::Value) -> Measurement {
        Measurement {
            sensor_id: Some(1),
            timestamp: Some(timestamp),
            value: Some(value),
            ..Default::default()
        }
    }

    #[test]
    fn test_empty_input_empty_table() {
        assert!(format_measurements(&[]).is_empty());
    }

    #[test]
    fn test_plain_and_iso_timestamps_agree() {
        let expected = datetime!(2024-01-01 10:00:00 UTC);
        assert_eq!(parse_timestamp("2024-01-01 10:00:00"), Some(expected));
        assert_eq!(parse_timestamp("2024-01-01T10:00:00Z"), Some(expected));
        assert_eq!(parse_timestamp("2024-01-01T10:00:00+00:00"), Some(expected));
        assert_eq!(parse_timestamp("2024-01-01T10:00:00"), Some(expected));
    }

    #[test]
    fn test_iso_with_offset_and_fraction() {
        assert_eq!(
            parse_timestamp("2024-01-01T12:00:00.500+02:00"),
            Some(datetime!(2024-01-01 10:00:00.5 UTC))
        );
        assert_eq!(
            parse_timestamp("2024-01-01T10:00:00.123456Z"),
            Some(datetime!(2024-01-01 10:00:00.123456 UTC))
        );
    }

    #[test]
    fn test_space_separated_fraction_without_offset() {
        assert_eq!(
            parse_timestamp("2024-01-01 10:00:00.500"),
            Some(datetime!(2024-01-01 10:00:00.5 UTC))
        );
    }

    #[test]
    fn test_minute_precision() {
        let expected = datetime!(2024-01-01 10:00:00 UTC);
        assert_eq!(parse_timestamp("2024-01-01T10:00"), Some(expected));
        assert_eq!(parse_timestamp("2024-01-01 10:00"), Some(expected));
        assert_eq!(parse_timestamp("2024-01-01T12:00+02:00"), Some(expected));
        assert_eq!(parse_timestamp("2024-01-01T10:00Z"), Some(expected));
    }

    #[test]
    fn test_space_separated_with_offset() {
        assert_eq!(
            parse_timestamp("2024-01-01 11:00:00.25+01:00"),
            Some(datetime!(2024-01-01 10:00:00.25 UTC))
        );
    }

    #[test]
    fn test_date_only_is_midnight() {
        assert_eq!(
            parse_timestamp("2024-01-01"),
            Some(datetime!(2024-01-01 00:00:00 UTC))
        );
    }

    #[test]
    fn test_garbage_timestamp_rejected() {
        assert_eq!(parse_timestamp("garbage"), None);
        assert_eq!(parse_timestamp(""), None);
        assert_eq!(parse_timestamp("2024-13-01 10:00:00"), None);
    }

    #[test]
    fn test_garbage_timestamp_falls_back_to_now() {
        let now = datetime!(2025-06-01 08:00:00 UTC);
        let table = format_measurements_at(&[record(json!("garbage"), json!(1.0))], now);
        let row = &table.rows()[0];
        assert_eq!(row.timestamp, now);
        assert!(row.timestamp_estimated);
        assert_eq!(table.estimated_count(), 1);
    }

    #[test]
    fn test_non_string_timestamp_falls_back() {
        let now = datetime!(2025-06-01 08:00:00 UTC);
        let table = format_measurements_at(&[record(json!(1704103200), json!(1.0))], now);
        assert_eq!(table.rows()[0].timestamp, now);
    }

    #[test]
    fn test_value_coercion_defaults_to_zero() {
        let records = vec![
            record(json!("2024-01-01 10:00:00"), json!("12.5")),
            record(json!("2024-01-01 10:00:00"), json!("n/a")),
            Measurement {
                timestamp: Some(json!("2024-01-01 10:00:00")),
                ..Default::default()
            },
        ];
        let values: Vec<f64> = format_measurements(&records)
            .iter()
            .map(|r| r.value)
            .collect();
        assert_eq!(values, vec![12.5, 0.0, 0.0]);
    }

    #[test]
    fn test_labels_default_to_unknown() {
        let mut with_labels = record(json!("2024-01-01 10:00:00"), json!(1));
        with_labels.position = Some("chest".into());
        with_labels.sensor_type = Some("IMU".into());
        let mut blank = record(json!("2024-01-01 10:00:00"), json!(1));
        blank.position = Some("  ".into());

        let table = format_measurements(&[with_labels, blank]);
        assert_eq!(table.rows()[0].position, "chest");
        assert_eq!(table.rows()[0].sensor_type, "IMU");
        assert_eq!(table.rows()[1].position, "unknown");
        assert_eq!(table.rows()[1].sensor_type, "unknown");
    }

    #[test]
    fn test_order_preserved_without_dedup() {
        let records = vec![
            record(json!("2024-01-01 12:00:00"), json!(3)),
            record(json!("2024-01-01 10:00:00"), json!(1)),
            record(json!("2024-01-01 12:00:00"), json!(3)),
        ];
        let table = format_measurements(&records);
        assert_eq!(table.len(), 3);
        let values: Vec<f64> = table.iter().map(|r| r.value).collect();
        assert_eq!(values, vec![3.0, 1.0, 3.0]);
        assert_eq!(table.estimated_count(), 0);
    }
}
