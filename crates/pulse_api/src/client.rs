use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};
use url::Url;

use crate::error::Error;
use crate::models::{Hub, LatestSensorData};

/// Default vendor API endpoint.
pub const DEFAULT_BASE_URL: &str = "https://api.pulsegrow.com";

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

const API_KEY_HEADER: &str = "x-api-key";

/// Client for the Pulse Grow cloud API.
///
/// Authentication is a fixed `x-api-key` header on every request. Requests
/// are never retried; the bridge polls on a schedule and the next cycle
/// retries naturally.
#[derive(Debug, Clone)]
pub struct PulseClient {
    http: reqwest::Client,
    base_url: Url,
    lenient: bool,
}

impl PulseClient {
    /// Create a client against [`DEFAULT_BASE_URL`] with [`DEFAULT_TIMEOUT`].
    pub fn new(api_key: &str) -> Result<Self, Error> {
        Self::with_base_url(DEFAULT_BASE_URL, api_key, DEFAULT_TIMEOUT)
    }

    /// Create a client against a specific endpoint, e.g. a local proxy or a
    /// mock server in tests.
    pub fn with_base_url(base_url: &str, api_key: &str, timeout: Duration) -> Result<Self, Error> {
        let mut base_url = Url::parse(base_url)?;
        // Url::join replaces the last path segment unless the base ends in
        // a slash.
        if !base_url.path().ends_with('/') {
            base_url.set_path(&format!("{}/", base_url.path()));
        }

        let mut api_key = HeaderValue::from_str(api_key).map_err(|_| Error::InvalidApiKey)?;
        api_key.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(API_KEY_HEADER, api_key);

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()?;

        Ok(Self {
            http,
            base_url,
            lenient: false,
        })
    }

    /// Substitute empty results for transport failures instead of returning
    /// them. Validation failures are unaffected: those decode to the absent
    /// value in either mode.
    pub fn lenient(mut self, lenient: bool) -> Self {
        self.lenient = lenient;
        self
    }

    /// Fetch the ids of every hub on the account.
    ///
    /// An account with no hubs is an empty list, not an error; so is a
    /// response that is not a list of integers at all.
    pub async fn hub_ids(&self) -> Result<Vec<i64>, Error> {
        let body = match self.get_json("hubs/ids").await {
            Ok(body) => body,
            Err(err) if self.lenient => {
                warn!(error = %err, "transport failure listing hubs, substituting empty list");
                return Ok(Vec::new());
            }
            Err(err) => return Err(err),
        };

        match serde_json::from_value(body) {
            Ok(ids) => Ok(ids),
            Err(err) => {
                warn!(error = %err, "hub id list failed validation, treating as no hubs");
                Ok(Vec::new())
            }
        }
    }

    /// Fetch the full details of one hub.
    ///
    /// Returns `None` when the response fails schema validation.
    pub async fn hub_details(&self, hub_id: i64) -> Result<Option<Hub>, Error> {
        self.get_validated(&format!("hubs/{hub_id}")).await
    }

    /// Fetch the most recent reading of one sensor device.
    ///
    /// Returns `None` when the response fails schema validation.
    pub async fn latest_sensor_data(
        &self,
        sensor_id: i64,
    ) -> Result<Option<LatestSensorData>, Error> {
        self.get_validated(&format!("sensors/{sensor_id}/recent-data"))
            .await
    }

    /// GET a path and decode the body into `T`, treating schema mismatches
    /// as an absent value rather than an error.
    async fn get_validated<T: DeserializeOwned>(&self, path: &str) -> Result<Option<T>, Error> {
        let body = match self.get_json(path).await {
            Ok(body) => body,
            Err(err) if self.lenient => {
                warn!(path, error = %err, "transport failure, substituting absent value");
                return Ok(None);
            }
            Err(err) => return Err(err),
        };

        if body.is_null() {
            warn!(path, "empty response body");
            return Ok(None);
        }

        match serde_json::from_value(body) {
            Ok(value) => Ok(Some(value)),
            Err(err) => {
                warn!(path, error = %err, "response failed validation");
                Ok(None)
            }
        }
    }

    /// GET a path under the base URL and parse the body as JSON. Non-success
    /// statuses and unparseable bodies are transport errors.
    async fn get_json(&self, path: &str) -> Result<serde_json::Value, Error> {
        let url = self.base_url.join(path)?;
        debug!(%url, "GET");

        let response = self
            .http
            .get(url.clone())
            .send()
            .await
            .map_err(|source| Error::Transport {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::Status {
                status,
                url: url.to_string(),
            });
        }

        let body = response.text().await.map_err(|source| Error::Transport {
            url: url.to_string(),
            source,
        })?;

        serde_json::from_str(&body).map_err(|source| Error::MalformedBody {
            url: url.to_string(),
            source,
        })
    }
}
