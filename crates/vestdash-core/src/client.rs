//! HTTP client for the remote vest API.
//!
//! [`ApiClient`] is a thin typed wrapper over the API's JSON endpoints. Its
//! methods return [`Result`]; the error-swallowing, report-and-default
//! behavior the dashboard needs lives in [`crate::Dashboard`].
//!
//! # Example
//!
//! ```no_run
//! use vestdash_core::ApiClient;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = ApiClient::new("http://localhost:8000")?;
//!
//! for vest in client.list_vests().await? {
//!     println!("{}: {}", vest.vest_id, vest.display_name());
//! }
//! # Ok(())
//! # }
//! ```

use std::time::Duration;

use reqwest::header::{CONTENT_TYPE, HeaderValue};
use reqwest::{Client, Method, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn};

use vestdash_types::{NewMeasurement, NewSensor, NewVest, Sensor, Vest, VestId};

use crate::error::{Error, Result};

/// Default request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// HTTP client for the vest API.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
}

/// A response whose status has not been judged yet.
#[derive(Debug, Clone)]
pub struct ApiResponse {
    /// Full URL that was requested.
    pub url: String,
    pub status: u16,
    /// Raw response body.
    pub body: String,
}

impl ApiResponse {
    /// Whether the API answered with exactly 200 OK.
    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.status == StatusCode::OK.as_u16()
    }

    /// Whether the API answered 200 OK or 201 Created.
    #[must_use]
    pub fn is_accepted(&self) -> bool {
        self.is_ok() || self.status == StatusCode::CREATED.as_u16()
    }

    /// Decode the body as JSON.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        serde_json::from_str(&self.body).map_err(|source| Error::Decode {
            url: self.url.clone(),
            source,
        })
    }

    /// Decode the body as a JSON array, skipping entries that do not decode
    /// as `T`. Only a body that is not an array at all is an error.
    pub fn json_list<T: DeserializeOwned>(&self) -> Result<Vec<T>> {
        let entries: Vec<Value> = self.json()?;
        Ok(entries
            .into_iter()
            .enumerate()
            .filter_map(|(index, entry)| match serde_json::from_value(entry) {
                Ok(item) => Some(item),
                Err(e) => {
                    warn!("Skipping entry {} from {}: {}", index, self.url, e);
                    None
                }
            })
            .collect())
    }

    /// Decode the body as untyped JSON, keeping non-JSON bodies as a string.
    #[must_use]
    pub fn json_value(&self) -> Value {
        serde_json::from_str(&self.body).unwrap_or_else(|_| Value::String(self.body.clone()))
    }

    /// Best-effort error message from the body.
    #[must_use]
    pub fn error_message(&self) -> String {
        let from_json = serde_json::from_str::<Value>(&self.body).ok().and_then(|v| {
            ["error", "message", "detail"]
                .iter()
                .find_map(|key| v.get(key).and_then(Value::as_str).map(String::from))
        });
        from_json.unwrap_or_else(|| {
            let trimmed = self.body.trim();
            if trimmed.is_empty() {
                StatusCode::from_u16(self.status)
                    .map(|s| s.to_string())
                    .unwrap_or_else(|_| self.status.to_string())
            } else {
                trimmed.chars().take(200).collect()
            }
        })
    }

    /// Turn this response into an error.
    #[must_use]
    pub fn into_error(self) -> Error {
        let message = self.error_message();
        Error::from_status(&self.url, self.status, message)
    }

    /// Decode the body if the status is 200 OK.
    pub fn expect_ok<T: DeserializeOwned>(self) -> Result<T> {
        if self.is_ok() {
            self.json()
        } else {
            Err(self.into_error())
        }
    }

    /// Decode the body as a list if the status is 200 OK.
    pub fn expect_ok_list<T: DeserializeOwned>(self) -> Result<Vec<T>> {
        if self.is_ok() {
            self.json_list()
        } else {
            Err(self.into_error())
        }
    }

    /// Decode the body if the status is 200 OK or 201 Created.
    pub fn expect_accepted<T: DeserializeOwned>(self) -> Result<T> {
        if self.is_accepted() {
            self.json()
        } else {
            Err(self.into_error())
        }
    }
}

impl ApiClient {
    /// Create a new client with the default timeout.
    ///
    /// # Arguments
    ///
    /// * `base_url` - Base URL of the API (e.g., "http://localhost:8000/dev")
    pub fn new(base_url: &str) -> Result<Self> {
        Self::with_timeout(base_url, DEFAULT_TIMEOUT)
    }

    /// Create a new client with a custom request timeout.
    pub fn with_timeout(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|source| Error::Transport {
                url: base_url.to_string(),
                source,
            })?;
        Self::with_client(base_url, client)
    }

    /// Create a client with a custom reqwest Client.
    pub fn with_client(base_url: &str, client: Client) -> Result<Self> {
        let base_url = normalize_base_url(base_url)?;
        Ok(Self { client, base_url })
    }

    /// Get the base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `GET /vests`
    pub async fn list_vests(&self) -> Result<Vec<Vest>> {
        self.get("/vests").await?.expect_ok_list()
    }

    /// `GET /vests/{id}`
    pub async fn get_vest(&self, vest_id: VestId) -> Result<Vest> {
        self.get(&format!("/vests/{vest_id}")).await?.expect_ok()
    }

    /// `GET /vests/{id}/sensors`
    pub async fn get_vest_sensors(&self, vest_id: VestId) -> Result<Vec<Sensor>> {
        self.get(&format!("/vests/{vest_id}/sensors"))
            .await?
            .expect_ok_list()
    }

    /// `GET /vests/{id}/measurements/recent[?seconds=N]`
    ///
    /// Returns the unjudged response: the reader treats 500 differently from
    /// other failures.
    pub async fn recent_measurements(
        &self,
        vest_id: VestId,
        seconds: Option<u64>,
    ) -> Result<ApiResponse> {
        let path = match seconds {
            Some(seconds) => format!("/vests/{vest_id}/measurements/recent?seconds={seconds}"),
            None => format!("/vests/{vest_id}/measurements/recent"),
        };
        self.get(&path).await
    }

    /// `POST /vests`
    ///
    /// The API echoes the created vest with its `vest_id`; decode it with
    /// [`ApiResponse::expect_accepted`]. The response is returned as is so
    /// callers can show the raw exchange.
    pub async fn create_vest(&self, vest: &NewVest) -> Result<ApiResponse> {
        self.post("/vests", vest).await
    }

    /// `POST /sensors`; the echo carries the new `sensor_id`.
    pub async fn create_sensor(&self, sensor: &NewSensor) -> Result<ApiResponse> {
        self.post("/sensors", sensor).await
    }

    /// `POST /measurements` with a `{"measurements": [...]}` batch.
    pub async fn add_measurements(&self, measurements: &[NewMeasurement]) -> Result<ApiResponse> {
        let body = serde_json::json!({ "measurements": measurements });
        self.post("/measurements", &body).await
    }

    /// `POST /measurements` with an arbitrary body, returning the unjudged
    /// response.
    pub async fn post_measurements<B: Serialize + ?Sized>(&self, body: &B) -> Result<ApiResponse> {
        self.post("/measurements", body).await
    }

    // ======================================================================
    // Internal HTTP helpers
    // ======================================================================

    /// Send a GET request to `path` (relative to the base URL).
    pub async fn get(&self, path: &str) -> Result<ApiResponse> {
        self.send::<()>(Method::GET, path, None).await
    }

    /// Send a JSON POST request to `path` (relative to the base URL).
    pub async fn post<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<ApiResponse> {
        self.send(Method::POST, path, Some(body)).await
    }

    async fn send<B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<ApiResponse> {
        let url = format!("{}{}", self.base_url, path);
        debug!("{} {}", method, url);

        let mut request = self
            .client
            .request(method.clone(), &url)
            .header(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await.map_err(|source| Error::Transport {
            url: url.clone(),
            source,
        })?;

        let status = response.status().as_u16();
        let body = response.text().await.map_err(|source| Error::Transport {
            url: url.clone(),
            source,
        })?;
        debug!("{} {} -> {}", method, url, status);

        Ok(ApiResponse { url, status, body })
    }
}

fn normalize_base_url(base_url: &str) -> Result<String> {
    let base_url = base_url.trim().trim_end_matches('/').to_string();

    if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
        return Err(Error::InvalidUrl(format!(
            "URL must start with http:// or https://, got: {}",
            base_url
        )));
    }

    Ok(base_url)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(status: u16, body: &str) -> ApiResponse {
        ApiResponse {
            url: "http://api/vests".to_string(),
            status,
            body: body.to_string(),
        }
    }

    #[test]
    fn test_client_creation() {
        let client = ApiClient::new("http://localhost:8000");
        assert!(client.is_ok());

        let client = client.unwrap();
        assert_eq!(client.base_url(), "http://localhost:8000");
    }

    #[test]
    fn test_client_normalizes_url() {
        let client = ApiClient::new("https://example.com/dev/").unwrap();
        assert_eq!(client.base_url(), "https://example.com/dev");
    }

    #[test]
    fn test_client_invalid_url() {
        let result = ApiClient::new("localhost:8000");
        assert!(matches!(result, Err(Error::InvalidUrl(_))));
    }

    #[test]
    fn test_response_accepted_statuses() {
        assert!(response(200, "").is_ok());
        assert!(response(200, "").is_accepted());
        assert!(!response(201, "").is_ok());
        assert!(response(201, "").is_accepted());
        assert!(!response(202, "").is_accepted());
        assert!(!response(400, "").is_accepted());
    }

    #[test]
    fn test_error_message_prefers_json_fields() {
        assert_eq!(
            response(400, r#"{"error": "bad shape"}"#).error_message(),
            "bad shape"
        );
        assert_eq!(
            response(500, r#"{"message": "Internal server error"}"#).error_message(),
            "Internal server error"
        );
        assert_eq!(response(502, "gateway down").error_message(), "gateway down");
        assert_eq!(response(404, "").error_message(), "404 Not Found");
    }

    #[test]
    fn test_expect_ok_rejects_created() {
        let result: Result<Value> = response(201, "{}").expect_ok();
        assert!(matches!(result, Err(Error::UnexpectedStatus { status: 201, .. })));
    }

    #[test]
    fn test_expect_ok_decode_error() {
        let result: Result<Vec<Vest>> = response(200, "<html>").expect_ok();
        assert!(matches!(result, Err(Error::Decode { .. })));
    }

    #[test]
    fn test_json_list_skips_bad_entries() {
        let body = r#"[{"vest_id": 1, "name": "Red"}, {"vest_id": "V-2"}, {"vest_id": 3.0}]"#;
        let vests: Vec<Vest> = response(200, body).expect_ok_list().unwrap();
        let ids: Vec<VestId> = vests.iter().map(|v| v.vest_id).collect();
        assert_eq!(ids, vec![1, 3]);

        let result: Result<Vec<Vest>> = response(200, r#"{"vest_id": 1}"#).json_list();
        assert!(matches!(result, Err(Error::Decode { .. })));
    }

    #[test]
    fn test_json_value_keeps_plain_text() {
        assert_eq!(response(200, "ok").json_value(), Value::String("ok".into()));
        assert_eq!(response(200, "[1]").json_value(), serde_json::json!([1]));
    }
}
