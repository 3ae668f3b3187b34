//! API exerciser: calls every endpoint once and prints each response.

use anyhow::{Context as _, Result};
use serde_json::{Value, json};
use time::{Duration, OffsetDateTime};
use vestdash_core::normalize::PLAIN_TIMESTAMP;
use vestdash_core::{ApiClient, ApiResponse, NewMeasurement, NewSensor, NewVest, Sensor, Vest};

use super::Context;
use crate::util::write_output;

/// Sensors created on the test vest: (type id, position).
const TEST_SENSORS: [(i64, &str); 2] = [(1, "chest"), (2, "left_shoulder")];

/// Size of the measurement batch posted for the first sensor.
const TEST_BATCH: i64 = 5;

pub async fn cmd_exercise(ctx: &Context) -> Result<()> {
    let mut transcript = Transcript::default();
    let result = run(ctx.dashboard.client(), &mut transcript).await;
    write_output(ctx.output.as_ref(), &transcript.text)?;
    result
}

#[derive(Default)]
struct Transcript {
    text: String,
}

impl Transcript {
    fn line(&mut self, line: &str) {
        self.text.push_str(line);
        self.text.push('\n');
    }

    /// Record a response's status and pretty-printed body.
    fn record(&mut self, method: &str, path: &str, response: &ApiResponse) {
        tracing::debug!("{} {} -> {}", method, path, response.status);
        self.line(&format!("{} {} status: {}", method, path, response.status));
        let body = response.json_value();
        let pretty = serde_json::to_string_pretty(&body).unwrap_or_else(|_| response.body.clone());
        self.line(&pretty);
    }
}

async fn run(client: &ApiClient, out: &mut Transcript) -> Result<()> {
    out.line("=== STARTING FULL API TEST ===");

    let response = client.get("/vests").await?;
    out.record("GET", "/vests", &response);

    let now = OffsetDateTime::now_utc();
    let vest = NewVest {
        name: format!("Test Vest {}", now.unix_timestamp()),
        description: "Automatically created test vest".to_string(),
        is_active: true,
    };
    let response = client.create_vest(&vest).await?;
    out.record("POST", "/vests", &response);
    let vest_id = response
        .expect_accepted::<Vest>()
        .context("POST /vests did not echo a vest_id")?
        .vest_id;

    let path = format!("/vests/{}", vest_id);
    let response = client.get(&path).await?;
    out.record("GET", &path, &response);

    let calibration = json!({ "offset": 0.5, "scale": 1.2 }).to_string();
    let mut sensor_ids = Vec::new();
    for (sensor_type_id, position) in TEST_SENSORS {
        let sensor = NewSensor {
            vest_id,
            sensor_type_id,
            position: position.to_string(),
            is_active: true,
            calibration_data: calibration.clone(),
        };
        let response = client.create_sensor(&sensor).await?;
        out.record("POST", "/sensors", &response);
        let created = response
            .expect_accepted::<Sensor>()
            .context("POST /sensors did not echo a sensor_id")?;
        sensor_ids.push(created.sensor_id);
    }

    let path = format!("/vests/{}/sensors", vest_id);
    let response = client.get(&path).await?;
    out.record("GET", &path, &response);

    let first_sensor = sensor_ids[0];
    let batch = test_batch(first_sensor, vest_id, now)?;
    let response = client.add_measurements(&batch).await?;
    out.record("POST", "/measurements", &response);

    let response = client.recent_measurements(vest_id, None).await?;
    out.record("GET", &format!("/vests/{}/measurements/recent", vest_id), &response);

    out.line("=== API TEST COMPLETED ===");
    Ok(())
}

/// Measurements one second apart going back from `now`, rising by 0.5.
fn test_batch(sensor_id: i64, vest_id: i64, now: OffsetDateTime) -> Result<Vec<NewMeasurement>> {
    let additional = json!({ "temperature": 22.5, "humidity": 40 }).to_string();
    (0..TEST_BATCH)
        .map(|i| {
            let timestamp = (now - Duration::seconds(i))
                .format(PLAIN_TIMESTAMP)
                .context("Failed to format timestamp")?;
            Ok(NewMeasurement {
                sensor_id,
                vest_id: Some(vest_id),
                timestamp: Some(timestamp),
                value: 20.0 + i as f64 * 0.5,
                additional_data: Value::String(additional.clone()),
            })
        })
        .collect()
}
