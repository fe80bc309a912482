//! In-process distance ranking, for stores that cannot push the formula down.

use sportmap_geo::{great_circle_km, round_km, Coordinate};

use crate::models::{Facility, RankedFacility};

/// Rank `candidates` by distance from `origin`.
///
/// Rows without a coordinate are skipped. The radius cut is applied to the
/// rounded distance before truncating to `limit`; equal distances keep
/// ascending `id` order.
pub fn rank<'a, I>(origin: Coordinate, candidates: I, radius_km: f64, limit: usize) -> Vec<RankedFacility>
where
    I: IntoIterator<Item = &'a Facility>,
{
    let mut ranked: Vec<RankedFacility> = candidates
        .into_iter()
        .filter_map(|facility| {
            let at = facility.coordinate()?;
            let distance_km = round_km(great_circle_km(origin, at));
            (distance_km <= radius_km).then(|| RankedFacility::new(facility.clone(), distance_km))
        })
        .collect();

    ranked.sort_by(|a, b| {
        a.distance_km
            .total_cmp(&b.distance_km)
            .then_with(|| a.facility.id.cmp(&b.facility.id))
    });
    ranked.truncate(limit);
    ranked
}
