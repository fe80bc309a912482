//! Facility CRUD

use std::sync::Arc;
use validator::Validate;

use crate::{
    db::FacilityStore,
    models::{Facility, FacilityPatch, NewFacility},
    Error, Result,
};

pub struct FacilityService {
    store: Arc<dyn FacilityStore>,
}

impl FacilityService {
    pub fn new(store: Arc<dyn FacilityStore>) -> Self {
        Self { store }
    }

    pub async fn get(&self, id: i64) -> Result<Facility> {
        self.store
            .get(id)
            .await?
            .ok_or(Error::FacilityNotFound(id))
    }

    /// Validate and insert. A duplicate `equip_numero` is a conflict and writes nothing.
    #[tracing::instrument(skip(self, input), fields(equip_numero = ?input.registry_number))]
    pub async fn create(&self, input: NewFacility) -> Result<Facility> {
        input.validate()?;
        let facility = self.store.create(input).await?;
        tracing::info!(id = facility.id, "Facility created");
        Ok(facility)
    }

    /// Partial update: omitted fields keep their stored value.
    #[tracing::instrument(skip(self, patch))]
    pub async fn update(&self, id: i64, patch: FacilityPatch) -> Result<Facility> {
        patch.validate()?;
        let facility = self
            .store
            .update(id, patch)
            .await?
            .ok_or(Error::FacilityNotFound(id))?;
        tracing::info!(id, "Facility updated");
        Ok(facility)
    }

    #[tracing::instrument(skip(self))]
    pub async fn delete(&self, id: i64) -> Result<Facility> {
        let facility = self
            .store
            .delete(id)
            .await?
            .ok_or(Error::FacilityNotFound(id))?;
        tracing::info!(id, "Facility deleted");
        Ok(facility)
    }
}
