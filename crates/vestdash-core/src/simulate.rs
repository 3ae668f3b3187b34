//! Placeholder measurements for degraded mode.
//!
//! When the recent-measurements endpoint fails with a server error the reader
//! shows synthetic readings instead of an empty chart. Every synthetic record
//! carries `additional_data = {"simulated": true}` so it can be told apart from
//! real data with [`Measurement::is_simulated`].

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde_json::{Value, json};
use time::{Duration, OffsetDateTime};

use vestdash_types::{Measurement, Sensor, VestId};

use crate::normalize::PLAIN_TIMESTAMP;

/// Synthetic readings generated per sensor.
pub const SIMULATED_POINTS: usize = 10;

/// Spacing between synthetic readings.
pub const SIMULATED_SPACING: Duration = Duration::hours(1);

/// Mean of synthetic values.
pub const SIMULATED_MEAN: f64 = 20.0;

/// Standard deviation of synthetic values.
pub const SIMULATED_STDDEV: f64 = 5.0;

/// Generator of placeholder measurements.
#[derive(Debug, Clone)]
pub struct Simulator<R = StdRng> {
    rng: R,
}

impl Simulator<StdRng> {
    /// Simulator seeded from the thread-local generator.
    #[must_use]
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_rng(&mut rand::rng()))
    }

    /// Deterministic simulator for tests and reproducible demos.
    #[must_use]
    pub fn seeded(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }
}

impl Default for Simulator<StdRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Rng> Simulator<R> {
    pub fn with_rng(rng: R) -> Self {
        Self { rng }
    }

    /// Standard normal sample (Box-Muller transform).
    pub fn standard_normal(&mut self) -> f64 {
        // 1 - [0, 1) keeps u1 away from zero so ln(u1) is finite.
        let u1 = 1.0 - self.rng.random::<f64>();
        let u2 = self.rng.random::<f64>();
        (-2.0 * u1.ln()).sqrt() * (std::f64::consts::TAU * u2).cos()
    }

    /// One synthetic value: baseline plus Gaussian noise.
    pub fn value(&mut self) -> f64 {
        SIMULATED_MEAN + SIMULATED_STDDEV * self.standard_normal()
    }

    /// Synthesize [`SIMULATED_POINTS`] readings for each sensor, one hour
    /// apart, oldest first, the last one stamped `now`.
    pub fn measurements(
        &mut self,
        vest_id: VestId,
        sensors: &[Sensor],
        now: OffsetDateTime,
    ) -> Vec<Measurement> {
        let now = now.replace_nanosecond(0).unwrap_or(now);
        let mut out = Vec::with_capacity(sensors.len() * SIMULATED_POINTS);

        for sensor in sensors {
            for step in (0..SIMULATED_POINTS).rev() {
                let at = now - SIMULATED_SPACING * step as i32;
                out.push(Measurement {
                    sensor_id: Some(sensor.sensor_id),
                    vest_id: Some(sensor.vest_id.unwrap_or(vest_id)),
                    timestamp: at.format(PLAIN_TIMESTAMP).ok().map(Value::String),
                    value: Some(json!(self.value())),
                    position: Some(sensor.position_label().to_string()),
                    sensor_type: Some(sensor.type_label()),
                    additional_data: Some(json!({ "simulated": true })),
                    ..Default::default()
                });
            }
        }

        out
    }
}
