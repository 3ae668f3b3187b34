//! Output formatting utilities for text, JSON, and CSV output.

use anyhow::Result;
use owo_colors::OwoColorize;
use serde::Serialize;
use tabled::builder::Builder;
use tabled::settings::Style;
use time::format_description::BorrowedFormatItem;
use time::macros::format_description;
use vestdash_core::{Notice, NoticeLevel};
use vestdash_types::{MeasurementTable, Sensor, SensorSeries, Vest, VestId};

/// Timestamp format used in tables and CSV.
const TABLE_TIMESTAMP: &[BorrowedFormatItem<'static>] =
    format_description!("[year]-[month]-[day] [hour]:[minute]:[second]");

/// Sparkline glyphs from lowest to highest.
const SPARK_BARS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

/// Formatting options for output.
#[derive(Debug, Clone, Copy, Default)]
pub struct FormatOptions {
    /// Disable colored output.
    pub no_color: bool,
    /// Omit header row in CSV output.
    pub no_header: bool,
    /// Use compact JSON output (no pretty-printing).
    pub compact: bool,
}

impl FormatOptions {
    pub fn new(no_color: bool, compact: bool) -> Self {
        Self {
            no_color,
            no_header: false,
            compact,
        }
    }

    /// Create with no_header option for CSV output.
    pub fn with_no_header(mut self, no_header: bool) -> Self {
        self.no_header = no_header;
        self
    }

    /// Serialize value to JSON string, respecting compact option.
    pub fn as_json<T: Serialize + ?Sized>(&self, value: &T) -> Result<String> {
        let json = if self.compact {
            serde_json::to_string(value)?
        } else {
            serde_json::to_string_pretty(value)?
        };
        Ok(json + "\n")
    }

    fn title(&self, text: &str) -> String {
        if self.no_color {
            text.to_string()
        } else {
            text.bold().to_string()
        }
    }

    fn dim(&self, text: &str) -> String {
        if self.no_color {
            text.to_string()
        } else {
            text.dimmed().to_string()
        }
    }
}

/// Escape a CSV field.
#[must_use]
pub fn csv_escape(s: &str) -> String {
    if s.contains(',') || s.contains('"') || s.contains('\n') {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}

fn yes_no(flag: bool) -> &'static str {
    if flag { "yes" } else { "no" }
}

fn opt_id(id: Option<i64>) -> String {
    id.map(|i| i.to_string()).unwrap_or_default()
}

/// Format a notice for the terminal.
#[must_use]
pub fn format_notice(notice: &Notice, no_color: bool) -> String {
    let (icon, label) = match notice.level {
        NoticeLevel::Success => ("+", "OK"),
        NoticeLevel::Warning => ("!", "WARNING"),
        NoticeLevel::Error => ("x", "ERROR"),
    };
    if no_color {
        return format!("{} {}: {}", icon, label, notice.message);
    }
    match notice.level {
        NoticeLevel::Success => format!("{} {}", icon.green(), notice.message),
        NoticeLevel::Warning => format!("{} {}", icon.yellow(), notice.message.yellow()),
        NoticeLevel::Error => format!("{} {}", icon.red().bold(), notice.message.red()),
    }
}

// ============================================================================
// Vests
// ============================================================================

#[must_use]
pub fn format_vests_text(vests: &[Vest], opts: &FormatOptions) -> String {
    if vests.is_empty() {
        return "No vests found.\n".to_string();
    }

    let mut builder = Builder::default();
    builder.push_record(["ID", "Name", "Description", "Active"]);
    for vest in vests {
        builder.push_record([
            vest.vest_id.to_string(),
            vest.display_name(),
            vest.description.clone().unwrap_or_default(),
            yes_no(vest.is_active).to_string(),
        ]);
    }

    let mut table = builder.build();
    table.with(Style::rounded());
    format!(
        "{}\n{}\n",
        opts.title(&format!("Vests ({})", vests.len())),
        table
    )
}

#[must_use]
pub fn format_vests_csv(vests: &[Vest], opts: &FormatOptions) -> String {
    let mut output = if opts.no_header {
        String::new()
    } else {
        "vest_id,name,description,is_active\n".to_string()
    };
    for vest in vests {
        output.push_str(&format!(
            "{},{},{},{}\n",
            vest.vest_id,
            csv_escape(&vest.name),
            csv_escape(vest.description.as_deref().unwrap_or("")),
            vest.is_active
        ));
    }
    output
}

/// One vest with its sensor metadata.
#[must_use]
pub fn format_vest_detail_text(vest: &Vest, sensors: &[Sensor], opts: &FormatOptions) -> String {
    let mut output = format!(
        "{}\n",
        opts.title(&format!("{} (#{})", vest.display_name(), vest.vest_id))
    );
    if let Some(description) = vest.description.as_deref().filter(|d| !d.is_empty()) {
        output.push_str(&format!("  {}\n", description));
    }
    output.push_str(&format!("  Active: {}\n\n", yes_no(vest.is_active)));
    output.push_str(&format_sensors_text(sensors, opts));
    output
}

#[derive(Serialize)]
struct VestDetailJson<'a> {
    #[serde(flatten)]
    vest: &'a Vest,
    sensors: &'a [Sensor],
}

pub fn format_vest_detail_json(vest: &Vest, sensors: &[Sensor], opts: &FormatOptions) -> Result<String> {
    opts.as_json(&VestDetailJson { vest, sensors })
}

// ============================================================================
// Sensors
// ============================================================================

/// Calibration blob as a single line.
fn calibration_text(sensor: &Sensor) -> String {
    match &sensor.calibration_data {
        None | Some(serde_json::Value::Null) => String::new(),
        Some(serde_json::Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

#[must_use]
pub fn format_sensors_text(sensors: &[Sensor], opts: &FormatOptions) -> String {
    if sensors.is_empty() {
        return "No sensors found.\n".to_string();
    }

    let mut builder = Builder::default();
    builder.push_record(["ID", "Type", "Position", "Active", "Calibration"]);
    for sensor in sensors {
        builder.push_record([
            sensor.sensor_id.to_string(),
            sensor.type_label(),
            sensor.position_label().to_string(),
            yes_no(sensor.is_active).to_string(),
            calibration_text(sensor),
        ]);
    }

    let mut table = builder.build();
    table.with(Style::rounded());
    format!(
        "{}\n{}\n",
        opts.title(&format!("Sensors ({})", sensors.len())),
        table
    )
}

#[must_use]
pub fn format_sensors_csv(sensors: &[Sensor], opts: &FormatOptions) -> String {
    let mut output = if opts.no_header {
        String::new()
    } else {
        "sensor_id,vest_id,sensor_type,position,is_active,calibration_data\n".to_string()
    };
    for sensor in sensors {
        output.push_str(&format!(
            "{},{},{},{},{},{}\n",
            sensor.sensor_id,
            opt_id(sensor.vest_id),
            csv_escape(&sensor.type_label()),
            csv_escape(sensor.position_label()),
            sensor.is_active,
            csv_escape(&calibration_text(sensor))
        ));
    }
    output
}

// ============================================================================
// Measurements
// ============================================================================

fn table_timestamp(ts: time::OffsetDateTime) -> String {
    ts.format(TABLE_TIMESTAMP)
        .unwrap_or_else(|_| "Unknown".to_string())
}

/// Measurements as a table, newest rows last, capped at `max_rows` (0 = all).
#[must_use]
pub fn format_measurements_text(
    table: &MeasurementTable,
    simulated: bool,
    max_rows: usize,
    opts: &FormatOptions,
) -> String {
    if table.is_empty() {
        return "No measurements found.\n".to_string();
    }

    let mut output = opts.title(&format!("Measurements ({} records)", table.len()));
    if simulated {
        output.push_str(&opts.dim("  [simulated]"));
    }
    output.push('\n');

    let mut builder = Builder::default();
    builder.push_record(["Timestamp", "Sensor", "Position", "Type", "Value"]);
    let shown = if max_rows == 0 {
        table.len()
    } else {
        max_rows.min(table.len())
    };
    for row in table.iter().take(shown) {
        let mut ts = table_timestamp(row.timestamp);
        if row.timestamp_estimated {
            ts.push_str(" *");
        }
        builder.push_record([
            ts,
            opt_id(row.sensor_id),
            row.position.clone(),
            row.sensor_type.clone(),
            format!("{:.2}", row.value),
        ]);
    }

    let mut rendered = builder.build();
    rendered.with(Style::rounded());
    output.push_str(&rendered.to_string());
    output.push('\n');

    if table.len() > shown {
        output.push_str(&format!("... and {} more records\n", table.len() - shown));
        output.push_str("(Use --format csv or --format json for full data)\n");
    }
    if table.estimated_count() > 0 {
        output.push_str(&opts.dim("* timestamp could not be parsed; time of retrieval shown"));
        output.push('\n');
    }

    output
}

#[must_use]
pub fn format_measurements_csv(table: &MeasurementTable, opts: &FormatOptions) -> String {
    let mut output = if opts.no_header {
        String::new()
    } else {
        "timestamp,sensor_id,position,sensor_type,value,timestamp_estimated\n".to_string()
    };
    for row in table {
        let ts = row
            .timestamp
            .format(&time::format_description::well_known::Rfc3339)
            .unwrap_or_default();
        output.push_str(&format!(
            "{},{},{},{},{},{}\n",
            ts,
            opt_id(row.sensor_id),
            csv_escape(&row.position),
            csv_escape(&row.sensor_type),
            row.value,
            row.timestamp_estimated
        ));
    }
    output
}

#[derive(Serialize)]
struct MeasurementsJson<'a> {
    vest_id: VestId,
    simulated: bool,
    count: usize,
    measurements: &'a MeasurementTable,
}

pub fn format_measurements_json(
    vest_id: VestId,
    table: &MeasurementTable,
    simulated: bool,
    opts: &FormatOptions,
) -> Result<String> {
    opts.as_json(&MeasurementsJson {
        vest_id,
        simulated,
        count: table.len(),
        measurements: table,
    })
}

// ============================================================================
// Charts
// ============================================================================

/// Resample `data` to exactly `width` points.
///
/// Shorter series are stretched by repeating values; longer ones are averaged
/// into buckets.
#[must_use]
pub fn resample(data: &[f64], width: usize) -> Vec<f64> {
    if data.is_empty() || width == 0 {
        return Vec::new();
    }
    if data.len() == width {
        return data.to_vec();
    }

    if data.len() < width {
        (0..width)
            .map(|i| data[(i * (data.len() - 1) / (width - 1).max(1)).min(data.len() - 1)])
            .collect()
    } else {
        let bucket = data.len() as f64 / width as f64;
        (0..width)
            .map(|i| {
                let start = (i as f64 * bucket) as usize;
                let end = (((i + 1) as f64 * bucket) as usize).clamp(start + 1, data.len());
                data[start..end].iter().sum::<f64>() / (end - start) as f64
            })
            .collect()
    }
}

/// Render values as a one-line sparkline at most `width` glyphs wide.
#[must_use]
pub fn sparkline(values: &[f64], width: usize) -> String {
    let width = width.min(values.len().max(1) * 4);
    let data = resample(values, width);
    let (min, max) = data
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(*v), hi.max(*v))
        });
    let span = max - min;

    data.iter()
        .map(|v| {
            if span <= f64::EPSILON {
                SPARK_BARS[SPARK_BARS.len() / 2]
            } else {
                let level = ((v - min) / span * (SPARK_BARS.len() - 1) as f64).round() as usize;
                SPARK_BARS[level.min(SPARK_BARS.len() - 1)]
            }
        })
        .collect()
}

/// One labelled sparkline per sensor with min/max/last values.
#[must_use]
pub fn format_charts(series: &[SensorSeries], width: usize, opts: &FormatOptions) -> String {
    let mut output = String::new();
    for s in series {
        let values = s.values();
        let Some(last) = values.last() else {
            continue;
        };
        let min = values.iter().copied().fold(f64::INFINITY, f64::min);
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);

        let line = sparkline(&values, width);
        let line = if opts.no_color {
            line
        } else {
            line.cyan().to_string()
        };
        output.push_str(&format!("{}\n", opts.title(&s.label())));
        output.push_str(&format!("  {}\n", line));
        output.push_str(&opts.dim(&format!(
            "  min {:.2}  max {:.2}  last {:.2}  ({} points)",
            min,
            max,
            last,
            values.len()
        )));
        output.push_str("\n\n");
    }
    output
}
