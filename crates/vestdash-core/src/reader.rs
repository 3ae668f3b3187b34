//! Recent measurements with the degraded-mode fallback.

use time::OffsetDateTime;
use tracing::warn;

use vestdash_types::{Measurement, VestId};

use crate::dashboard::Dashboard;
use crate::session::{Notice, Session};
use crate::simulate::{SIMULATED_POINTS, Simulator};

/// Status the recent-measurements endpoint is known to fail with.
const DEGRADED_STATUS: u16 = 500;

impl Dashboard {
    /// Fetch the recent measurements of `vest_id`.
    ///
    /// - 200: the records as the API sent them. Entries that are not JSON
    ///   objects are skipped with a log line.
    /// - 500: placeholder readings for each of the vest's sensors, tagged
    ///   `{"simulated": true}`, plus a warning notice. An empty sensor list
    ///   yields no placeholders.
    /// - anything else: an error notice and an empty list.
    pub async fn get_recent_measurements(
        &self,
        session: &Session,
        vest_id: VestId,
    ) -> Vec<Measurement> {
        self.get_recent_measurements_with(session, vest_id, &mut Simulator::new())
            .await
    }

    /// [`Dashboard::get_recent_measurements`] with a caller-supplied simulator.
    pub async fn get_recent_measurements_with<R: rand::Rng>(
        &self,
        session: &Session,
        vest_id: VestId,
        simulator: &mut Simulator<R>,
    ) -> Vec<Measurement> {
        const OP: &str = "get_recent_measurements";

        let response = match self
            .client
            .recent_measurements(vest_id, Some(self.recent_seconds))
            .await
        {
            Ok(response) => response,
            Err(e) => {
                Self::report_error(session, OP, &e);
                return Vec::new();
            }
        };

        if response.is_ok() {
            return match response.json_list() {
                Ok(measurements) => measurements,
                Err(e) => {
                    Self::report_error(session, OP, &e);
                    Vec::new()
                }
            };
        }

        if response.status != DEGRADED_STATUS {
            Self::report_error(session, OP, &response.into_error());
            return Vec::new();
        }

        warn!(
            "Recent measurements for vest {} failed with {}, substituting simulated data",
            vest_id, response.status
        );
        let sensors = self.get_vest_sensors(session, vest_id).await;
        if sensors.is_empty() {
            session.report(Notice::warning(
                OP,
                format!(
                    "Server error fetching measurements for vest {vest_id}, and no sensors to simulate readings for."
                ),
            ));
            return Vec::new();
        }

        let simulated = simulator.measurements(vest_id, &sensors, OffsetDateTime::now_utc());
        session.report(Notice::warning(
            OP,
            format!(
                "Server error fetching measurements; showing {} simulated readings ({} per sensor) for {} sensor(s). These values are not real.",
                simulated.len(),
                SIMULATED_POINTS,
                sensors.len()
            ),
        ));
        simulated
    }
}
