//! Provider payloads and the normalized candidate returned to callers

use serde::{Deserialize, Serialize};

/// Provider label attached to every candidate.
pub const PROVIDER_NAME: &str = "nominatim";

/// One place from a `format=jsonv2` search response.
///
/// Nominatim encodes coordinates as strings.
#[derive(Debug, Clone, Deserialize)]
pub struct ProviderPlace {
    pub lat: String,
    pub lon: String,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub importance: Option<f64>,
    #[serde(default)]
    pub address: Option<ProviderAddress>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProviderAddress {
    pub city: Option<String>,
    pub town: Option<String>,
    pub village: Option<String>,
    pub municipality: Option<String>,
    pub postcode: Option<String>,
    pub country: Option<String>,
}

impl ProviderAddress {
    /// Locality name, preferring the largest settlement kind present.
    pub fn locality(&self) -> Option<&str> {
        [&self.city, &self.town, &self.village, &self.municipality]
            .into_iter()
            .find_map(|v| v.as_deref().filter(|s| !s.is_empty()))
    }
}

/// A candidate coordinate for a free-text query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeocodeCandidate {
    pub provider: String,
    pub lat: f64,
    pub lon: f64,
    pub display_name: String,
    pub city: Option<String>,
    pub postcode: Option<String>,
    pub country: Option<String>,
    pub importance: Option<f64>,
}

impl GeocodeCandidate {
    /// Normalize a provider place. Returns `None` when its coordinates do not parse.
    pub fn from_place(place: ProviderPlace) -> Option<Self> {
        let lat = place.lat.trim().parse::<f64>().ok().filter(|v| v.is_finite())?;
        let lon = place.lon.trim().parse::<f64>().ok().filter(|v| v.is_finite())?;
        let address = place.address.unwrap_or_default();

        Some(Self {
            provider: PROVIDER_NAME.to_string(),
            lat,
            lon,
            display_name: place.display_name.unwrap_or_default(),
            city: address.locality().map(str::to_string),
            postcode: address.postcode.clone().filter(|s| !s.is_empty()),
            country: address.country.clone().filter(|s| !s.is_empty()),
            importance: place.importance,
        })
    }
}

/// Search parameters for one geocoding lookup.
#[derive(Debug, Clone)]
pub struct GeocodeQuery {
    pub text: String,
    pub country_codes: String,
    pub limit: u32,
}
