//! PostgreSQL facility store

use async_trait::async_trait;
use serde_json::Value as JsonValue;
use sqlx::{postgres::PgRow, types::Json, PgPool, Row};
use sportmap_geo::Coordinate;
use std::future::Future;
use std::time::Instant;

use super::search::{BindValue, FilterSet, ListingQuery, NearbyQuery};
use super::search::query_builder::FACILITY_COLUMNS;
use super::traits::FacilityStore;
use crate::metrics;
use crate::models::{
    CommuneCount, Facility, FacilityPatch, NewFacility, RankedFacility, TypeFamilyCount,
};
use crate::Result;

#[derive(Clone)]
pub struct PostgresFacilityStore {
    pool: PgPool,
}

impl PostgresFacilityStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn fetch_rows(&self, sql: &str, bind_values: Vec<BindValue>) -> sqlx::Result<Vec<PgRow>> {
        let mut query = sqlx::query(sql);
        for value in bind_values {
            query = match value {
                BindValue::Text(v) => query.bind(v),
                BindValue::Float(v) => query.bind(v),
                BindValue::Int(v) => query.bind(v),
            };
        }
        query.fetch_all(&self.pool).await
    }

    async fn fetch_count(&self, sql: &str, bind_values: Vec<BindValue>) -> sqlx::Result<i64> {
        let mut query = sqlx::query_scalar::<_, i64>(sql);
        for value in bind_values {
            query = match value {
                BindValue::Text(v) => query.bind(v),
                BindValue::Float(v) => query.bind(v),
                BindValue::Int(v) => query.bind(v),
            };
        }
        query.fetch_one(&self.pool).await
    }
}

/// Await a query and record its duration, whether it succeeded or failed.
async fn timed<T>(
    query_type: &str,
    query: impl Future<Output = sqlx::Result<T>>,
) -> Result<T> {
    let started = Instant::now();
    let result = query.await;
    metrics::DB_QUERY_DURATION_SECONDS
        .with_label_values(&[query_type])
        .observe(started.elapsed().as_secs_f64());
    Ok(result?)
}

/// Map a row selected with [`FACILITY_COLUMNS`].
fn facility_from_row(row: &PgRow) -> Result<Facility> {
    // Imported rows are not guaranteed to hold an array; anything else reads as empty.
    let activities = match row.try_get::<Option<JsonValue>, _>("aps_name")? {
        Some(JsonValue::Array(items)) => items
            .into_iter()
            .filter_map(|v| match v {
                JsonValue::String(s) => Some(s),
                _ => None,
            })
            .collect(),
        _ => Vec::new(),
    };

    Ok(Facility {
        id: row.try_get("id")?,
        registry_number: row.try_get("equip_numero")?,
        name: row.try_get("equip_nom")?,
        installation_number: row.try_get("inst_numero")?,
        installation_name: row.try_get("inst_nom")?,
        type_name: row.try_get("equip_type_name")?,
        type_family: row.try_get("equip_type_famille")?,
        nature: row.try_get("equip_nature")?,
        address: row.try_get("inst_adresse")?,
        postal_code: row.try_get("inst_cp")?,
        commune: row.try_get("commune_nom")?,
        department: row.try_get("dep_nom")?,
        latitude: row.try_get("latitude")?,
        longitude: row.try_get("longitude")?,
        surface_area: row.try_get("equip_surf")?,
        installation_accessible: row.try_get("inst_acc_handi_bool")?,
        equipment_accessible: row.try_get("equip_pmr_acc")?,
        open_to_public: row.try_get("equip_ouv_public_bool")?,
        activities,
        management_type: row.try_get("equip_gest_type")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

#[async_trait]
impl FacilityStore for PostgresFacilityStore {
    async fn get(&self, id: i64) -> Result<Option<Facility>> {
        let sql = format!("SELECT {FACILITY_COLUMNS} FROM equipements f WHERE f.id = $1");
        let row = timed(
            "get",
            sqlx::query(&sql).bind(id).fetch_optional(&self.pool),
        )
        .await?;
        row.as_ref().map(facility_from_row).transpose()
    }

    async fn create(&self, input: NewFacility) -> Result<Facility> {
        let sql = format!(
            r#"
            INSERT INTO equipements AS f (
                equip_numero, equip_nom, inst_numero, inst_nom, equip_type_name,
                equip_type_famille, equip_nature, inst_adresse, inst_cp, commune_nom,
                dep_nom, latitude, longitude, equip_surf, inst_acc_handi_bool,
                equip_pmr_acc, equip_ouv_public_bool, aps_name, equip_gest_type
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17,
                    COALESCE($18, '[]'::jsonb), $19)
            RETURNING {FACILITY_COLUMNS}
            "#
        );
        let query = sqlx::query(&sql)
            .bind(input.registry_number)
            .bind(input.name)
            .bind(input.installation_number)
            .bind(input.installation_name)
            .bind(input.type_name)
            .bind(input.type_family)
            .bind(input.nature)
            .bind(input.address)
            .bind(input.postal_code)
            .bind(input.commune)
            .bind(input.department)
            .bind(input.latitude)
            .bind(input.longitude)
            .bind(input.surface_area)
            .bind(input.installation_accessible)
            .bind(input.equipment_accessible)
            .bind(input.open_to_public)
            .bind(input.activities.map(Json))
            .bind(input.management_type);
        let row = timed("create", query.fetch_one(&self.pool)).await?;
        facility_from_row(&row)
    }

    async fn update(&self, id: i64, patch: FacilityPatch) -> Result<Option<Facility>> {
        let sql = format!(
            r#"
            UPDATE equipements AS f SET
                equip_nom = COALESCE($2, f.equip_nom),
                inst_numero = COALESCE($3, f.inst_numero),
                inst_nom = COALESCE($4, f.inst_nom),
                equip_type_name = COALESCE($5, f.equip_type_name),
                equip_type_famille = COALESCE($6, f.equip_type_famille),
                equip_nature = COALESCE($7, f.equip_nature),
                inst_adresse = COALESCE($8, f.inst_adresse),
                inst_cp = COALESCE($9, f.inst_cp),
                commune_nom = COALESCE($10, f.commune_nom),
                dep_nom = COALESCE($11, f.dep_nom),
                latitude = COALESCE($12, f.latitude),
                longitude = COALESCE($13, f.longitude),
                equip_surf = COALESCE($14, f.equip_surf),
                inst_acc_handi_bool = COALESCE($15, f.inst_acc_handi_bool),
                equip_pmr_acc = COALESCE($16, f.equip_pmr_acc),
                equip_ouv_public_bool = COALESCE($17, f.equip_ouv_public_bool),
                aps_name = COALESCE($18, f.aps_name),
                equip_gest_type = COALESCE($19, f.equip_gest_type),
                updated_at = NOW()
            WHERE f.id = $1
            RETURNING {FACILITY_COLUMNS}
            "#
        );
        let query = sqlx::query(&sql)
            .bind(id)
            .bind(patch.name)
            .bind(patch.installation_number)
            .bind(patch.installation_name)
            .bind(patch.type_name)
            .bind(patch.type_family)
            .bind(patch.nature)
            .bind(patch.address)
            .bind(patch.postal_code)
            .bind(patch.commune)
            .bind(patch.department)
            .bind(patch.latitude)
            .bind(patch.longitude)
            .bind(patch.surface_area)
            .bind(patch.installation_accessible)
            .bind(patch.equipment_accessible)
            .bind(patch.open_to_public)
            .bind(patch.activities.map(Json))
            .bind(patch.management_type);
        let row = timed("update", query.fetch_optional(&self.pool)).await?;
        row.as_ref().map(facility_from_row).transpose()
    }

    async fn delete(&self, id: i64) -> Result<Option<Facility>> {
        let sql = format!("DELETE FROM equipements AS f WHERE f.id = $1 RETURNING {FACILITY_COLUMNS}");
        let row = timed(
            "delete",
            sqlx::query(&sql).bind(id).fetch_optional(&self.pool),
        )
        .await?;
        row.as_ref().map(facility_from_row).transpose()
    }

    async fn count(&self, filters: &FilterSet) -> Result<i64> {
        let (sql, binds) = ListingQuery::new(filters, 0, 0).build_count_sql();
        timed("count", self.fetch_count(&sql, binds)).await
    }

    async fn list(&self, filters: &FilterSet, limit: i64, offset: i64) -> Result<Vec<Facility>> {
        let (sql, binds) = ListingQuery::new(filters, limit, offset).build_sql();
        tracing::debug!(sql = %sql, binds = binds.len(), "Listing facilities");
        let rows = timed("list", self.fetch_rows(&sql, binds)).await?;
        rows.iter().map(facility_from_row).collect()
    }

    async fn nearby(
        &self,
        filters: &FilterSet,
        origin: Coordinate,
        radius_km: f64,
        limit: i64,
    ) -> Result<Vec<RankedFacility>> {
        let (sql, binds) = NearbyQuery::new(filters, origin, radius_km, limit).build_sql();
        tracing::debug!(sql = %sql, binds = binds.len(), "Ranking facilities by distance");
        let rows = timed("nearby", self.fetch_rows(&sql, binds)).await?;

        rows.iter()
            .map(|row| -> Result<RankedFacility> {
                let facility = facility_from_row(row)?;
                let distance_km: f64 = row.try_get("distance_km")?;
                Ok(RankedFacility::new(facility, distance_km))
            })
            .collect()
    }

    async fn count_all(&self) -> Result<i64> {
        timed(
            "count_all",
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM equipements").fetch_one(&self.pool),
        )
        .await
    }

    async fn count_distinct_communes(&self) -> Result<i64> {
        timed(
            "count_communes",
            sqlx::query_scalar::<_, i64>("SELECT COUNT(DISTINCT commune_nom) FROM equipements")
                .fetch_one(&self.pool),
        )
        .await
    }

    async fn count_accessible(&self) -> Result<i64> {
        timed(
            "count_accessible",
            sqlx::query_scalar::<_, i64>(
                "SELECT COUNT(*) FROM equipements WHERE equip_pmr_acc = true",
            )
            .fetch_one(&self.pool),
        )
        .await
    }

    async fn top_type_families(&self, limit: i64) -> Result<Vec<TypeFamilyCount>> {
        let query = sqlx::query_as::<_, (String, i64)>(
            r#"
            SELECT equip_type_famille, COUNT(*) AS count
            FROM equipements
            WHERE equip_type_famille IS NOT NULL
            GROUP BY equip_type_famille
            ORDER BY count DESC, equip_type_famille ASC
            LIMIT $1
            "#,
        )
        .bind(limit);
        let rows = timed("top_type_families", query.fetch_all(&self.pool)).await?;

        Ok(rows
            .into_iter()
            .map(|(equip_type_famille, count)| TypeFamilyCount {
                equip_type_famille,
                count,
            })
            .collect())
    }

    async fn top_communes(&self, limit: i64) -> Result<Vec<CommuneCount>> {
        let query = sqlx::query_as::<_, (String, i64)>(
            r#"
            SELECT commune_nom, COUNT(*) AS count
            FROM equipements
            WHERE commune_nom IS NOT NULL
            GROUP BY commune_nom
            ORDER BY count DESC, commune_nom ASC
            LIMIT $1
            "#,
        )
        .bind(limit);
        let rows = timed("top_communes", query.fetch_all(&self.pool)).await?;

        Ok(rows
            .into_iter()
            .map(|(commune_nom, count)| CommuneCount { commune_nom, count })
            .collect())
    }

    async fn ping(&self) -> Result<()> {
        timed("ping", sqlx::query("SELECT 1").execute(&self.pool)).await?;
        Ok(())
    }
}
