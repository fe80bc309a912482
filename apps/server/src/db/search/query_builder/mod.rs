//! SQL builders for facility listing and nearby ranking.
//!
//! Both consume a compiled [`FilterSet`] and produce `(sql, binds)` pairs with
//! PostgreSQL `$n` placeholders. Only fixed SQL text is ever formatted into the
//! statement; all caller input travels as bind values.

use sportmap_geo::{Coordinate, EARTH_RADIUS_KM};

use super::filter::FilterSet;

pub(crate) mod bind;

use bind::{push_float, push_int};

/// Bind values for `sqlx` queries.
#[derive(Debug, Clone, PartialEq)]
pub enum BindValue {
    Text(String),
    Float(f64),
    Int(i64),
}

/// Column list shared by every facility read.
pub(crate) const FACILITY_COLUMNS: &str = "f.id, f.equip_numero, f.equip_nom, f.inst_numero, \
    f.inst_nom, f.equip_type_name, f.equip_type_famille, f.equip_nature, f.inst_adresse, \
    f.inst_cp, f.commune_nom, f.dep_nom, f.latitude, f.longitude, f.equip_surf, \
    f.inst_acc_handi_bool, f.equip_pmr_acc, f.equip_ouv_public_bool, f.aps_name, \
    f.equip_gest_type, f.created_at, f.updated_at";

/// Paged listing, newest first.
#[derive(Debug, Clone)]
pub struct ListingQuery<'a> {
    filters: &'a FilterSet,
    limit: i64,
    offset: i64,
}

impl<'a> ListingQuery<'a> {
    pub fn new(filters: &'a FilterSet, limit: i64, offset: i64) -> Self {
        Self {
            filters,
            limit,
            offset,
        }
    }

    fn where_clause(&self) -> String {
        self.filters
            .render(1)
            .map(|clauses| format!(" WHERE {clauses}"))
            .unwrap_or_default()
    }

    /// Window of rows. LIMIT and OFFSET take the two slots after the filters.
    pub fn build_sql(&self) -> (String, Vec<BindValue>) {
        let mut binds = self.filters.values().to_vec();
        let limit_idx = push_int(&mut binds, self.limit);
        let offset_idx = push_int(&mut binds, self.offset);

        let sql = format!(
            "SELECT {FACILITY_COLUMNS} FROM equipements f{} ORDER BY f.id DESC LIMIT ${limit_idx} OFFSET ${offset_idx}",
            self.where_clause()
        );
        (sql, binds)
    }

    /// Total matches for the same filters.
    pub fn build_count_sql(&self) -> (String, Vec<BindValue>) {
        let sql = format!("SELECT COUNT(*) FROM equipements f{}", self.where_clause());
        (sql, self.filters.values().to_vec())
    }
}

/// Facilities within `radius_km` of `origin`, nearest first.
///
/// `$1`/`$2` hold the reference latitude/longitude; filter values follow, then
/// the radius and the limit. The radius cut and the ordering both use the
/// rounded distance, so no returned `distance_km` exceeds the radius.
#[derive(Debug, Clone)]
pub struct NearbyQuery<'a> {
    filters: &'a FilterSet,
    origin: Coordinate,
    radius_km: f64,
    limit: i64,
}

impl<'a> NearbyQuery<'a> {
    pub fn new(filters: &'a FilterSet, origin: Coordinate, radius_km: f64, limit: i64) -> Self {
        Self {
            filters,
            origin,
            radius_km,
            limit,
        }
    }

    pub fn build_sql(&self) -> (String, Vec<BindValue>) {
        let mut binds = Vec::with_capacity(self.filters.values().len() + 4);
        let lat_idx = push_float(&mut binds, self.origin.latitude());
        let lon_idx = push_float(&mut binds, self.origin.longitude());

        let filter_clause = self
            .filters
            .render(binds.len() + 1)
            .map(|clauses| format!(" AND {clauses}"))
            .unwrap_or_default();
        binds.extend_from_slice(self.filters.values());

        let radius_idx = push_float(&mut binds, self.radius_km);
        let limit_idx = push_int(&mut binds, self.limit);

        // acos input is clamped to [-1, 1]; float error can push it just outside.
        let distance = format!(
            "ROUND(({EARTH_RADIUS_KM} * acos(LEAST(1.0, GREATEST(-1.0, \
             cos(radians(${lat_idx})) * cos(radians(f.latitude)) * cos(radians(f.longitude) - radians(${lon_idx})) \
             + sin(radians(${lat_idx})) * sin(radians(f.latitude))))))::numeric, 3)::float8"
        );

        let sql = format!(
            "SELECT * FROM (\
             SELECT {FACILITY_COLUMNS}, {distance} AS distance_km \
             FROM equipements f \
             WHERE f.latitude IS NOT NULL AND f.longitude IS NOT NULL{filter_clause}\
             ) ranked \
             WHERE ranked.distance_km <= ${radius_idx} \
             ORDER BY ranked.distance_km ASC, ranked.id ASC \
             LIMIT ${limit_idx}"
        );
        (sql, binds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::search::filter::FilterOptions;

    fn paris() -> Coordinate {
        Coordinate::new(48.8566, 2.3522).unwrap()
    }

    #[test]
    fn listing_without_filters() {
        let filters = FilterSet::default();
        let (sql, binds) = ListingQuery::new(&filters, 20, 40).build_sql();
        assert!(sql.ends_with("FROM equipements f ORDER BY f.id DESC LIMIT $1 OFFSET $2"));
        assert_eq!(binds, vec![BindValue::Int(20), BindValue::Int(40)]);

        let (count_sql, count_binds) = ListingQuery::new(&filters, 20, 40).build_count_sql();
        assert_eq!(count_sql, "SELECT COUNT(*) FROM equipements f");
        assert!(count_binds.is_empty());
    }

    #[test]
    fn listing_binds_window_after_filters() {
        let filters = FilterSet::compile(&FilterOptions {
            commune: Some("Paris".into()),
            accessible: Some("true".into()),
            ..Default::default()
        });
        let (sql, binds) = ListingQuery::new(&filters, 10, 0).build_sql();
        assert!(sql.contains(
            " WHERE f.commune_nom ILIKE $1 AND f.equip_pmr_acc = true ORDER BY f.id DESC LIMIT $2 OFFSET $3"
        ));
        assert_eq!(
            binds,
            vec![
                BindValue::Text("%Paris%".into()),
                BindValue::Int(10),
                BindValue::Int(0)
            ]
        );

        let (count_sql, count_binds) = ListingQuery::new(&filters, 10, 0).build_count_sql();
        assert!(count_sql.ends_with("WHERE f.commune_nom ILIKE $1 AND f.equip_pmr_acc = true"));
        assert_eq!(count_binds.len(), 1);
    }

    #[test]
    fn nearby_reserves_coordinate_slots() {
        let filters = FilterSet::compile(&FilterOptions::sport(Some("Football".into())));
        let (sql, binds) = NearbyQuery::new(&filters, paris(), 5.0, 10).build_sql();

        assert!(sql.contains("radians($1)"));
        assert!(sql.contains("radians($2)"));
        assert!(sql.contains("aps.name ILIKE $3"));
        assert!(sql.contains("ranked.distance_km <= $4"));
        assert!(sql.ends_with("ORDER BY ranked.distance_km ASC, ranked.id ASC LIMIT $5"));
        assert!(sql.contains("f.latitude IS NOT NULL AND f.longitude IS NOT NULL"));
        assert_eq!(
            binds,
            vec![
                BindValue::Float(48.8566),
                BindValue::Float(2.3522),
                BindValue::Text("%Football%".into()),
                BindValue::Float(5.0),
                BindValue::Int(10),
            ]
        );
    }

    #[test]
    fn nearby_without_sport() {
        let filters = FilterSet::default();
        let (sql, binds) = NearbyQuery::new(&filters, paris(), 10.0, 10).build_sql();
        assert!(sql.contains("ranked.distance_km <= $3"));
        assert!(sql.ends_with("LIMIT $4"));
        assert_eq!(binds.len(), 4);
    }
}
