//! Vest and sensor directory reads.

use tracing::warn;

use vestdash_types::{Sensor, Vest, VestId};

use crate::dashboard::Dashboard;
use crate::session::{Notice, Session};

impl Dashboard {
    /// List every vest. Failures are reported and yield an empty list.
    pub async fn list_vests(&self, session: &Session) -> Vec<Vest> {
        match self.client.list_vests().await {
            Ok(vests) => vests,
            Err(e) => {
                Self::report_error(session, "list_vests", &e);
                Vec::new()
            }
        }
    }

    /// List the vests assigned to the logged-in user.
    ///
    /// A user without an assignment list sees every vest. Without a logged-in
    /// user nothing is listed.
    pub async fn list_user_vests(&self, session: &Session) -> Vec<Vest> {
        let Some(user) = session.user() else {
            session.report(Notice::error("list_user_vests", "Not logged in"));
            return Vec::new();
        };
        let mut vests = self.list_vests(session).await;
        vests.retain(|v| user.is_assigned(v.vest_id));
        vests
    }

    /// Fetch one vest. Failures are reported and yield `None`.
    pub async fn get_vest(&self, session: &Session, vest_id: VestId) -> Option<Vest> {
        match self.client.get_vest(vest_id).await {
            Ok(vest) => Some(vest),
            Err(e) => {
                Self::report_error(session, "get_vest", &e);
                None
            }
        }
    }

    /// List the sensors mounted on `vest_id`.
    ///
    /// Sensors the API attributes to a different vest are dropped, so every
    /// returned sensor either belongs to `vest_id` or carries no vest at all.
    /// Failures are reported and yield an empty list.
    pub async fn get_vest_sensors(&self, session: &Session, vest_id: VestId) -> Vec<Sensor> {
        match self.client.get_vest_sensors(vest_id).await {
            Ok(mut sensors) => {
                let before = sensors.len();
                sensors.retain(|s| s.vest_id.is_none_or(|id| id == vest_id));
                if sensors.len() != before {
                    warn!(
                        "Dropped {} sensor(s) belonging to other vests from vest {} listing",
                        before - sensors.len(),
                        vest_id
                    );
                }
                sensors
            }
            Err(e) => {
                Self::report_error(session, "get_vest_sensors", &e);
                Vec::new()
            }
        }
    }
}
