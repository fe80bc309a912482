//! Nominatim search API client

use crate::error::{Error, Result};
use crate::models::{GeocodeCandidate, GeocodeQuery, ProviderPlace};
use reqwest::{header, Client};
use std::time::Duration;

pub const DEFAULT_PROVIDER_URL: &str = "https://nominatim.openstreetmap.org/search";
pub const DEFAULT_USER_AGENT: &str = concat!("sportmap/", env!("CARGO_PKG_VERSION"));
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Client for a Nominatim-compatible search endpoint.
///
/// One bounded request per lookup. No retries and no caching.
#[derive(Debug, Clone)]
pub struct GeocodingClient {
    client: Client,
    base_url: String,
    timeout: Duration,
}

impl GeocodingClient {
    /// Create a client against the public Nominatim instance.
    pub fn new() -> Result<Self> {
        Self::with_options(DEFAULT_PROVIDER_URL, DEFAULT_USER_AGENT, DEFAULT_TIMEOUT)
    }

    /// Create a client with a custom provider URL, user agent and timeout.
    pub fn with_options(base_url: &str, user_agent: &str, timeout: Duration) -> Result<Self> {
        if base_url.trim().is_empty() {
            return Err(Error::InvalidConfig("provider URL is empty".to_string()));
        }
        if timeout.is_zero() {
            return Err(Error::InvalidConfig("timeout must be positive".to_string()));
        }

        let client = Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()
            .map_err(|e| Error::InvalidConfig(e.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout,
        })
    }

    /// Look up candidate coordinates for a free-text query.
    pub async fn search(&self, query: &GeocodeQuery) -> Result<Vec<GeocodeCandidate>> {
        let url = format!(
            "{}?format=jsonv2&addressdetails=1&q={}&limit={}&countrycodes={}",
            self.base_url,
            urlencoding::encode(&query.text),
            query.limit,
            urlencoding::encode(&query.country_codes),
        );

        tracing::debug!(url = %url, "Sending geocoding request");

        let response = self
            .client
            .get(&url)
            .header(header::ACCEPT, "application/json")
            .header(header::ACCEPT_LANGUAGE, "fr")
            .send()
            .await
            .map_err(|e| self.classify(e))?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(status = status.as_u16(), "Geocoding provider returned an error");
            return Err(Error::BadStatus {
                status: status.as_u16(),
            });
        }

        let payload: serde_json::Value = response.json().await.map_err(|e| self.classify(e))?;

        // Anything other than an array is treated as "no results".
        let places: Vec<ProviderPlace> = match payload {
            serde_json::Value::Array(items) => items
                .into_iter()
                .filter_map(|item| serde_json::from_value(item).ok())
                .collect(),
            _ => Vec::new(),
        };

        let total = places.len();
        let candidates: Vec<GeocodeCandidate> = places
            .into_iter()
            .filter_map(GeocodeCandidate::from_place)
            .collect();

        if candidates.len() < total {
            tracing::warn!(
                dropped = total - candidates.len(),
                "Dropped geocoding results with unparseable coordinates"
            );
        }

        Ok(candidates)
    }

    fn classify(&self, err: reqwest::Error) -> Error {
        if err.is_timeout() {
            Error::Timeout {
                seconds: self.timeout.as_secs(),
            }
        } else {
            Error::Request(err)
        }
    }
}
