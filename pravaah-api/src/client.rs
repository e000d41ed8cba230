use crate::error::{ApiError, Result};
use crate::model::{AmenityUpdate, StationRecord};
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, Response};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, info, warn};
use url::Url;

pub const DEFAULT_BASE_URL: &str = "https://api.pravaah.xyz";

const SEARCH_FALLBACK_MESSAGE: &str = "Failed to fetch station data";
const UPDATE_FALLBACK_MESSAGE: &str = "Failed to update amenity visibility";

/// Client for the two station endpoints: search and amenity update.
///
/// Cheap to clone; clones share the underlying connection pool.
#[derive(Debug, Clone)]
pub struct StationClient {
    client: Client,
    base_url: String,
}

impl StationClient {
    pub fn new() -> Result<Self> {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    pub fn with_base_url(base_url: &str) -> Result<Self> {
        Self::with_timeout(base_url, None)
    }

    /// `timeout` of `None` leaves the transport defaults in place.
    pub fn with_timeout(base_url: &str, timeout: Option<Duration>) -> Result<Self> {
        let parsed = Url::parse(base_url)
            .map_err(|e| ApiError::InvalidUrl(format!("{}: {}", base_url, e)))?;
        if parsed.scheme() != "http" && parsed.scheme() != "https" {
            return Err(ApiError::InvalidUrl(format!(
                "{}: unsupported scheme '{}'",
                base_url,
                parsed.scheme()
            )));
        }

        let mut builder = Client::builder().user_agent(concat!(
            "pravaah-admin/",
            env!("CARGO_PKG_VERSION")
        ));
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `GET {base}/api/stations/search/{key}`
    ///
    /// Every byte outside `A-Z a-z 0-9 - _ . ~` is percent-encoded, including
    /// `! ' ( ) *`. The server decodes these to the same key.
    pub fn search_url(&self, station_key: &str) -> Result<Url> {
        self.endpoint(&format!(
            "/api/stations/search/{}",
            urlencoding::encode(station_key)
        ))
    }

    /// `PUT {base}/api/stations/{key}/amenities`
    pub fn amenities_url(&self, station_key: &str) -> Result<Url> {
        self.endpoint(&format!(
            "/api/stations/{}/amenities",
            urlencoding::encode(station_key)
        ))
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        let raw = format!("{}{}", self.base_url, path);
        Url::parse(&raw).map_err(|e| ApiError::InvalidUrl(format!("{}: {}", raw, e)))
    }

    /// Looks up a station by name.
    ///
    /// A 2xx response is only accepted when its content type is JSON and the
    /// body parses as a [`StationRecord`].
    pub async fn search_station(&self, station_key: &str) -> Result<StationRecord> {
        let url = self.search_url(station_key)?;
        debug!("GET {}", url);

        let response = self.client.get(url).send().await?;
        if !response.status().is_success() {
            return Err(Self::server_error(response, SEARCH_FALLBACK_MESSAGE).await);
        }

        let is_json = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|ct| ct.contains("application/json"))
            .unwrap_or(false);
        if !is_json {
            warn!("Search for '{}' returned a non-JSON response", station_key);
            return Err(ApiError::InvalidFormat);
        }

        let body = response.text().await?;
        let record: StationRecord =
            serde_json::from_str(&body).map_err(|e| ApiError::ParseError(e.to_string()))?;

        info!(
            "Found station '{}' with {} vertices",
            record.name,
            record.vertices().len()
        );
        Ok(record)
    }

    /// Sets the visibility flag of one vertex. The acknowledgement body must be
    /// JSON but is otherwise returned untouched.
    pub async fn set_amenity_visibility(
        &self,
        station_key: &str,
        vertex_id: &str,
        visible: bool,
    ) -> Result<Value> {
        let url = self.amenities_url(station_key)?;
        debug!("PUT {} vertex={} visible={}", url, vertex_id, visible);

        let body = AmenityUpdate {
            vertex_id: vertex_id.to_string(),
            visible,
        };
        let response = self.client.put(url).json(&body).send().await?;
        if !response.status().is_success() {
            return Err(Self::server_error(response, UPDATE_FALLBACK_MESSAGE).await);
        }

        let text = response.text().await?;
        serde_json::from_str(&text).map_err(|e| ApiError::ParseError(e.to_string()))
    }

    /// Builds the error for a non-2xx response: the JSON `message` field if the
    /// body has one, `fallback` for JSON without it, and the status line when
    /// the body is not JSON at all.
    async fn server_error(response: Response, fallback: &str) -> ApiError {
        let status = response.status();
        let text = match response.text().await {
            Ok(text) => text,
            Err(e) => return ApiError::HttpError(e),
        };

        let message = match serde_json::from_str::<Value>(&text) {
            Ok(json) => json
                .get("message")
                .and_then(Value::as_str)
                .filter(|m| !m.is_empty())
                .map(str::to_string)
                .unwrap_or_else(|| fallback.to_string()),
            Err(_) => format!(
                "Server error: {} {}",
                status.as_u16(),
                status.canonical_reason().unwrap_or_default()
            )
            .trim_end()
            .to_string(),
        };

        warn!("Request failed with {}: {}", status, message);
        ApiError::ServerError {
            status: status.as_u16(),
            message,
        }
    }
}
