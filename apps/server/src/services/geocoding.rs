//! Text-to-coordinate lookup through the configured provider

use serde::Serialize;
use std::collections::HashMap;
use std::time::Duration;

use sportmap_geocoding::{GeocodeCandidate, GeocodeQuery, GeocodingClient};

use crate::{config::GeocodingConfig, metrics, Error, Result};

#[derive(Debug, Clone, Serialize)]
pub struct GeocodeResult {
    pub query: String,
    pub count: usize,
    pub data: Vec<GeocodeCandidate>,
}

pub struct GeocodingService {
    client: GeocodingClient,
    config: GeocodingConfig,
}

impl GeocodingService {
    pub fn new(config: GeocodingConfig) -> Result<Self> {
        let client = GeocodingClient::with_options(
            &config.provider_url,
            &config.user_agent,
            Duration::from_secs(config.timeout_seconds),
        )?;
        Ok(Self { client, config })
    }

    /// Resolve `query` (required) with optional `countrycodes` and `limit`.
    pub fn parse_query(&self, params: &HashMap<String, String>) -> Result<GeocodeQuery> {
        let text = params
            .get("query")
            .map(|q| q.trim())
            .filter(|q| !q.is_empty())
            .ok_or_else(|| Error::Validation("query parameter is required".to_string()))?
            .to_string();

        let country_codes = params
            .get("countrycodes")
            .map(|c| c.trim())
            .filter(|c| !c.is_empty())
            .unwrap_or(self.config.country_codes.as_str())
            .to_string();

        let limit = params
            .get("limit")
            .and_then(|l| l.trim().parse::<u32>().ok())
            .filter(|l| *l > 0)
            .map(|l| l.min(self.config.max_limit))
            .unwrap_or(self.config.default_limit);

        Ok(GeocodeQuery {
            text,
            country_codes,
            limit,
        })
    }

    #[tracing::instrument(skip(self, params))]
    pub async fn geocode(&self, params: &HashMap<String, String>) -> Result<GeocodeResult> {
        let query = self.parse_query(params)?;

        let data = match self.client.search(&query).await {
            Ok(data) => {
                metrics::GEOCODING_REQUESTS_TOTAL.with_label_values(&["ok"]).inc();
                data
            }
            Err(e) => {
                let outcome = match &e {
                    sportmap_geocoding::Error::Timeout { .. } => "timeout",
                    sportmap_geocoding::Error::BadStatus { .. } => "bad_status",
                    _ => "error",
                };
                metrics::GEOCODING_REQUESTS_TOTAL
                    .with_label_values(&[outcome])
                    .inc();
                return Err(e.into());
            }
        };

        Ok(GeocodeResult {
            query: query.text,
            count: data.len(),
            data,
        })
    }
}
