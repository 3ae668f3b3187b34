//! Measurement access layer for the wearable sensor vest dashboard.
//!
//! This crate sits between a presentation layer (the `vestdash` CLI) and the
//! remote vest API. It lists vests and their sensors, fetches recent
//! measurements, normalizes them for charting and submits new values.
//!
//! # Features
//!
//! - **Directory reads**: vests, a single vest, a vest's sensors
//! - **Recent measurements**: with simulated placeholder data when the API
//!   fails with a server error
//! - **Normalization**: tolerant timestamp and value parsing into a table
//! - **Writes**: measurement submission probing the accepted body shape
//! - **Sessions**: explicit login state, selected vest and error reporting
//!
//! Dashboard operations never return errors. Each failure is reported to the
//! session's [`Reporter`] and the operation returns an empty value.
//!
//! # Quick Start
//!
//! ```no_run
//! use vestdash_core::{ApiClient, Dashboard, Session, format_measurements};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let dashboard = Dashboard::new(ApiClient::new("http://localhost:8000")?);
//!     let session = Session::with_tracing();
//!
//!     for vest in dashboard.list_vests(&session).await {
//!         let raw = dashboard.get_recent_measurements(&session, vest.vest_id).await;
//!         let table = format_measurements(&raw);
//!         println!("{}: {} measurements", vest.display_name(), table.len());
//!     }
//!
//!     Ok(())
//! }
//! ```

pub mod auth;
pub mod client;
pub mod dashboard;
pub mod directory;
pub mod error;
pub mod normalize;
pub mod reader;
pub mod session;
pub mod simulate;
pub mod writer;

pub use vestdash_types as types;

pub use auth::{CredentialTable, User, UserEntry};
pub use client::{ApiClient, ApiResponse, DEFAULT_TIMEOUT};
pub use dashboard::{DEFAULT_RECENT_SECONDS, Dashboard};
pub use error::{Error, Result};
pub use normalize::{format_measurements, format_measurements_at, parse_timestamp};
pub use session::{CollectingReporter, Notice, NoticeLevel, Reporter, Session, TracingReporter};
pub use simulate::Simulator;
pub use writer::{PayloadShape, dashboard_record};

pub use vestdash_types::{
    Measurement, MeasurementRow, MeasurementTable, NewMeasurement, NewSensor, NewVest, Sensor,
    SensorId, SensorSeries, Vest, VestId,
};
