//! In-memory facility store
//!
//! Evaluates the same [`FilterSet`] predicates in process and ranks with
//! `sportmap-geo`. Backs the integration tests and `--in-memory` server runs.

use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use super::search::{ranking, FilterSet};
use super::traits::FacilityStore;
use crate::models::{
    CommuneCount, Facility, FacilityPatch, NewFacility, RankedFacility, TypeFamilyCount,
};
use crate::{Error, Result};
use sportmap_geo::Coordinate;

#[derive(Debug, Default)]
struct Inner {
    /// Ascending id order.
    rows: Vec<Facility>,
    next_id: i64,
}

#[derive(Debug, Clone, Default)]
pub struct InMemoryFacilityStore {
    inner: Arc<RwLock<Inner>>,
}

impl InMemoryFacilityStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.rows.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

fn top_counts<'a>(values: impl Iterator<Item = &'a str>, limit: i64) -> Vec<(String, i64)> {
    let mut counts: HashMap<&str, i64> = HashMap::new();
    for value in values {
        *counts.entry(value).or_default() += 1;
    }
    let mut counts: Vec<(String, i64)> = counts
        .into_iter()
        .map(|(name, count)| (name.to_string(), count))
        .collect();
    counts.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    counts.truncate(usize::try_from(limit).unwrap_or(0));
    counts
}

#[async_trait]
impl FacilityStore for InMemoryFacilityStore {
    async fn get(&self, id: i64) -> Result<Option<Facility>> {
        let inner = self.inner.read().await;
        Ok(inner.rows.iter().find(|f| f.id == id).cloned())
    }

    async fn create(&self, input: NewFacility) -> Result<Facility> {
        let registry_number = input
            .registry_number
            .ok_or_else(|| Error::Validation("equip_numero is required".to_string()))?;

        let mut inner = self.inner.write().await;
        if inner
            .rows
            .iter()
            .any(|f| f.registry_number == registry_number)
        {
            return Err(Error::Conflict(
                "A facility with this equip_numero already exists".to_string(),
            ));
        }

        inner.next_id += 1;
        let now = Utc::now();
        let facility = Facility {
            id: inner.next_id,
            registry_number,
            name: input.name,
            installation_number: input.installation_number,
            installation_name: input.installation_name,
            type_name: input.type_name,
            type_family: input.type_family,
            nature: input.nature,
            address: input.address,
            postal_code: input.postal_code,
            commune: input.commune,
            department: input.department,
            latitude: input.latitude,
            longitude: input.longitude,
            surface_area: input.surface_area,
            installation_accessible: input.installation_accessible,
            equipment_accessible: input.equipment_accessible,
            open_to_public: input.open_to_public,
            activities: input.activities.unwrap_or_default(),
            management_type: input.management_type,
            created_at: now,
            updated_at: now,
        };
        inner.rows.push(facility.clone());
        Ok(facility)
    }

    async fn update(&self, id: i64, patch: FacilityPatch) -> Result<Option<Facility>> {
        let mut inner = self.inner.write().await;
        let Some(facility) = inner.rows.iter_mut().find(|f| f.id == id) else {
            return Ok(None);
        };
        patch.apply_to(facility);
        facility.updated_at = Utc::now();
        Ok(Some(facility.clone()))
    }

    async fn delete(&self, id: i64) -> Result<Option<Facility>> {
        let mut inner = self.inner.write().await;
        let Some(pos) = inner.rows.iter().position(|f| f.id == id) else {
            return Ok(None);
        };
        Ok(Some(inner.rows.remove(pos)))
    }

    async fn count(&self, filters: &FilterSet) -> Result<i64> {
        let inner = self.inner.read().await;
        Ok(inner.rows.iter().filter(|f| filters.matches(f)).count() as i64)
    }

    async fn list(&self, filters: &FilterSet, limit: i64, offset: i64) -> Result<Vec<Facility>> {
        let inner = self.inner.read().await;
        Ok(inner
            .rows
            .iter()
            .rev()
            .filter(|f| filters.matches(f))
            .skip(usize::try_from(offset).unwrap_or(usize::MAX))
            .take(usize::try_from(limit).unwrap_or(0))
            .cloned()
            .collect())
    }

    async fn nearby(
        &self,
        filters: &FilterSet,
        origin: Coordinate,
        radius_km: f64,
        limit: i64,
    ) -> Result<Vec<RankedFacility>> {
        let inner = self.inner.read().await;
        let candidates = inner.rows.iter().filter(|f| filters.matches(f));
        Ok(ranking::rank(
            origin,
            candidates,
            radius_km,
            usize::try_from(limit).unwrap_or(0),
        ))
    }

    async fn count_all(&self) -> Result<i64> {
        Ok(self.inner.read().await.rows.len() as i64)
    }

    async fn count_distinct_communes(&self) -> Result<i64> {
        let inner = self.inner.read().await;
        let mut communes: Vec<&str> = inner
            .rows
            .iter()
            .filter_map(|f| f.commune.as_deref())
            .collect();
        communes.sort_unstable();
        communes.dedup();
        Ok(communes.len() as i64)
    }

    async fn count_accessible(&self) -> Result<i64> {
        let inner = self.inner.read().await;
        Ok(inner
            .rows
            .iter()
            .filter(|f| f.equipment_accessible == Some(true))
            .count() as i64)
    }

    async fn top_type_families(&self, limit: i64) -> Result<Vec<TypeFamilyCount>> {
        let inner = self.inner.read().await;
        let families = inner.rows.iter().filter_map(|f| f.type_family.as_deref());
        Ok(top_counts(families, limit)
            .into_iter()
            .map(|(equip_type_famille, count)| TypeFamilyCount {
                equip_type_famille,
                count,
            })
            .collect())
    }

    async fn top_communes(&self, limit: i64) -> Result<Vec<CommuneCount>> {
        let inner = self.inner.read().await;
        let communes = inner.rows.iter().filter_map(|f| f.commune.as_deref());
        Ok(top_counts(communes, limit)
            .into_iter()
            .map(|(commune_nom, count)| CommuneCount { commune_nom, count })
            .collect())
    }

    async fn ping(&self) -> Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::search::FilterOptions;

    fn new_facility(number: &str, commune: &str, accessible: bool) -> NewFacility {
        NewFacility {
            registry_number: Some(number.to_string()),
            name: Some(format!("Stade {number}")),
            commune: Some(commune.to_string()),
            equipment_accessible: Some(accessible),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn create_assigns_increasing_ids_and_rejects_duplicates() {
        let store = InMemoryFacilityStore::new();
        let a = store.create(new_facility("E1", "Paris", true)).await.unwrap();
        let b = store.create(new_facility("E2", "Lyon", false)).await.unwrap();
        assert!(b.id > a.id);

        let err = store
            .create(new_facility("E1", "Nice", false))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Conflict(_)));
        assert_eq!(store.len().await, 2);
    }

    #[tokio::test]
    async fn list_is_newest_first_and_filtered() {
        let store = InMemoryFacilityStore::new();
        for (n, commune, acc) in [("E1", "Paris", true), ("E2", "Lyon", true), ("E3", "Paris", false)] {
            store.create(new_facility(n, commune, acc)).await.unwrap();
        }

        let all = store.list(&FilterSet::default(), 10, 0).await.unwrap();
        let numbers: Vec<&str> = all.iter().map(|f| f.registry_number.as_str()).collect();
        assert_eq!(numbers, vec!["E3", "E2", "E1"]);

        let filters = FilterSet::compile(&FilterOptions {
            commune: Some("paris".into()),
            accessible: Some("true".into()),
            ..Default::default()
        });
        assert_eq!(store.count(&filters).await.unwrap(), 1);
        let rows = store.list(&filters, 10, 0).await.unwrap();
        assert_eq!(rows[0].registry_number, "E1");
    }

    #[tokio::test]
    async fn top_counts_exclude_nulls_and_break_ties_by_name() {
        let store = InMemoryFacilityStore::new();
        for (n, commune) in [("E1", "Lyon"), ("E2", "Brest"), ("E3", "Lyon"), ("E4", "Angers")] {
            store.create(new_facility(n, commune, false)).await.unwrap();
        }
        store
            .create(NewFacility {
                registry_number: Some("E5".into()),
                name: Some("Sans commune".into()),
                ..Default::default()
            })
            .await
            .unwrap();

        let top = store.top_communes(10).await.unwrap();
        let names: Vec<&str> = top.iter().map(|c| c.commune_nom.as_str()).collect();
        assert_eq!(names, vec!["Lyon", "Angers", "Brest"]);
        assert_eq!(top[0].count, 2);
        assert_eq!(store.count_distinct_communes().await.unwrap(), 3);
        assert!(store.top_type_families(10).await.unwrap().is_empty());
    }
}
