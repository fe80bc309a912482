//! Great-circle distance (spherical law of cosines).

use crate::Coordinate;

/// Mean Earth radius in kilometers.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Great-circle distance between two coordinates, in kilometers.
///
/// The `acos` argument is clamped to `[-1, 1]`: rounding can push it to
/// `1.0000000000000002` for (nearly) identical points, which would be NaN.
#[inline]
pub fn great_circle_km(from: Coordinate, to: Coordinate) -> f64 {
    let (lat1, lon1) = from.to_radians();
    let (lat2, lon2) = to.to_radians();

    let cos_angle = lat1.cos() * lat2.cos() * (lon2 - lon1).cos() + lat1.sin() * lat2.sin();

    EARTH_RADIUS_KM * cos_angle.clamp(-1.0, 1.0).acos()
}

/// Round a distance to 3 decimals (meter precision).
#[inline]
pub fn round_km(km: f64) -> f64 {
    (km * 1000.0).round() / 1000.0
}
