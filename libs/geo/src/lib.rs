//! Geographic primitives for facility search.
//!
//! - [`Coordinate`] with range validation and parsing from raw request strings
//! - Great-circle distance on a spherical Earth ([`great_circle_km`])
//! - Rounding helper used for the published `distance_km` value
//!
//! ```
//! use sportmap_geo::{great_circle_km, Coordinate};
//!
//! let paris = Coordinate::new(48.8566, 2.3522).unwrap();
//! let lyon = Coordinate::new(45.7640, 4.8357).unwrap();
//!
//! let km = great_circle_km(paris, lyon);
//! assert!((km - 392.0).abs() < 5.0);
//! ```
#![forbid(unsafe_code)]

mod distance;
mod error;

pub use distance::{great_circle_km, round_km, EARTH_RADIUS_KM};
pub use error::{GeoError, Result};

/// A validated latitude/longitude pair in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Coordinate {
    latitude: f64,
    longitude: f64,
}

impl Coordinate {
    /// Build a coordinate, rejecting non-finite or out-of-range values.
    pub fn new(latitude: f64, longitude: f64) -> Result<Self> {
        if !latitude.is_finite() || !(-90.0..=90.0).contains(&latitude) {
            return Err(GeoError::LatitudeOutOfRange(latitude));
        }
        if !longitude.is_finite() || !(-180.0..=180.0).contains(&longitude) {
            return Err(GeoError::LongitudeOutOfRange(longitude));
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }

    /// Parse a coordinate from raw `lat`/`lon` request values.
    ///
    /// Both values are required. Surrounding whitespace is ignored.
    pub fn parse(lat: Option<&str>, lon: Option<&str>) -> Result<Self> {
        let latitude = parse_component("lat", lat)?;
        let longitude = parse_component("lon", lon)?;
        Self::new(latitude, longitude)
    }

    /// Build a coordinate from optional stored parts.
    ///
    /// Rows missing either part, or holding out-of-range values, yield `None`
    /// and never take part in a distance computation.
    pub fn from_parts(latitude: Option<f64>, longitude: Option<f64>) -> Option<Self> {
        Self::new(latitude?, longitude?).ok()
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    #[inline]
    pub(crate) fn to_radians(self) -> (f64, f64) {
        (self.latitude.to_radians(), self.longitude.to_radians())
    }
}

fn parse_component(name: &'static str, raw: Option<&str>) -> Result<f64> {
    let raw = raw.map(str::trim).filter(|s| !s.is_empty());
    let Some(raw) = raw else {
        return Err(GeoError::Missing(name));
    };
    match raw.parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(GeoError::NotANumber {
            name,
            raw: raw.to_string(),
        }),
    }
}
