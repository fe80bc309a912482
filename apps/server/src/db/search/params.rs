//! Windowing parameters for listing and nearby search.
//!
//! Page size, radius and limit are clamped to configured maxima rather than
//! rejected. Non-numeric, zero or negative values fall back to the default.
//! Only the nearby reference coordinate is validated hard.

use std::collections::HashMap;

use serde::Serialize;
use sportmap_geo::Coordinate;

use crate::config::SearchConfig;
use crate::Result;

/// Page window for the listing path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListParams {
    /// 1-based page number, no upper bound.
    pub page: u64,
    pub limit: u32,
}

impl ListParams {
    pub fn from_query(query: &HashMap<String, String>, config: &SearchConfig) -> Self {
        let page = positive_int(query.get("page")).unwrap_or(1);
        let limit = positive_int(query.get("limit"))
            .map(|l| l.min(u64::from(config.list_max_limit)) as u32)
            .unwrap_or(config.list_default_limit);
        Self { page, limit }
    }

    pub fn offset(&self) -> i64 {
        let offset = (self.page - 1).saturating_mul(u64::from(self.limit));
        i64::try_from(offset).unwrap_or(i64::MAX)
    }

    /// `ceil(total / limit)`.
    pub fn pages(&self, total: u64) -> u64 {
        total.div_ceil(u64::from(self.limit))
    }
}

/// A validated nearby request.
#[derive(Debug, Clone, PartialEq)]
pub struct GeoQuery {
    pub origin: Coordinate,
    pub sport: Option<String>,
    pub radius_km: f64,
    pub limit: u32,
}

/// Resolved nearby inputs echoed back to the client.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GeoQueryEcho {
    pub lat: f64,
    pub lon: f64,
    pub sport: Option<String>,
    pub radius: f64,
    pub limit: u32,
}

impl GeoQuery {
    /// Parse `lat`, `lon`, `sport`, `radius` (alias `radius_km`) and `limit`.
    ///
    /// Missing or out-of-range coordinates are a validation error; everything
    /// else is clamped or defaulted.
    pub fn from_query(query: &HashMap<String, String>, config: &SearchConfig) -> Result<Self> {
        let origin = Coordinate::parse(
            query.get("lat").map(String::as_str),
            query.get("lon").map(String::as_str),
        )?;

        let sport = query
            .get("sport")
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .map(str::to_string);

        let radius_km = query
            .get("radius")
            .or_else(|| query.get("radius_km"))
            .and_then(|raw| raw.trim().parse::<f64>().ok())
            .filter(|r| r.is_finite() && *r > 0.0)
            .map(|r| r.min(config.nearby_max_radius_km))
            .unwrap_or(config.nearby_default_radius_km);

        let limit = positive_int(query.get("limit"))
            .map(|l| l.min(u64::from(config.nearby_max_limit)) as u32)
            .unwrap_or(config.nearby_default_limit);

        Ok(Self {
            origin,
            sport,
            radius_km,
            limit,
        })
    }

    pub fn echo(&self) -> GeoQueryEcho {
        GeoQueryEcho {
            lat: self.origin.latitude(),
            lon: self.origin.longitude(),
            sport: self.sport.clone(),
            radius: self.radius_km,
            limit: self.limit,
        }
    }
}

fn positive_int(raw: Option<&String>) -> Option<u64> {
    raw.and_then(|v| v.trim().parse::<u64>().ok())
        .filter(|v| *v > 0)
}
