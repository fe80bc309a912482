//! Facility records and their projections
//!
//! JSON field names follow the national sports equipment registry columns
//! (`equip_numero`, `commune_nom`, ...) so imported rows and API payloads line up.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sportmap_geo::Coordinate;
use validator::{Validate, ValidationError};

/// One registered sports installation/equipment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Facility {
    pub id: i64,
    #[serde(rename = "equip_numero")]
    pub registry_number: String,
    #[serde(rename = "equip_nom")]
    pub name: Option<String>,
    #[serde(rename = "inst_numero")]
    pub installation_number: Option<String>,
    #[serde(rename = "inst_nom")]
    pub installation_name: Option<String>,
    #[serde(rename = "equip_type_name")]
    pub type_name: Option<String>,
    #[serde(rename = "equip_type_famille")]
    pub type_family: Option<String>,
    #[serde(rename = "equip_nature")]
    pub nature: Option<String>,
    #[serde(rename = "inst_adresse")]
    pub address: Option<String>,
    #[serde(rename = "inst_cp")]
    pub postal_code: Option<String>,
    #[serde(rename = "commune_nom")]
    pub commune: Option<String>,
    #[serde(rename = "dep_nom")]
    pub department: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    #[serde(rename = "equip_surf")]
    pub surface_area: Option<f64>,
    #[serde(rename = "inst_acc_handi_bool")]
    pub installation_accessible: Option<bool>,
    #[serde(rename = "equip_pmr_acc")]
    pub equipment_accessible: Option<bool>,
    #[serde(rename = "equip_ouv_public_bool")]
    pub open_to_public: Option<bool>,
    /// Sports practiced at the facility. Free text, no fixed vocabulary.
    #[serde(rename = "aps_name")]
    pub activities: Vec<String>,
    #[serde(rename = "equip_gest_type")]
    pub management_type: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Facility {
    /// Stored coordinate, if both parts are present and in range.
    pub fn coordinate(&self) -> Option<Coordinate> {
        Coordinate::from_parts(self.latitude, self.longitude)
    }

    /// "address, commune", or whichever part exists.
    pub fn full_address(&self) -> Option<String> {
        let address = non_empty(self.address.as_deref());
        let commune = non_empty(self.commune.as_deref());
        match (address, commune) {
            (Some(a), Some(c)) => Some(format!("{a}, {c}")),
            (Some(a), None) => Some(a.to_string()),
            (None, Some(c)) => Some(c.to_string()),
            (None, None) => None,
        }
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|s| !s.is_empty())
}

/// A facility annotated with its distance from a reference point. Never persisted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedFacility {
    #[serde(flatten)]
    pub facility: Facility,
    /// Great-circle distance in km, rounded to 3 decimals.
    pub distance_km: f64,
    pub full_address: Option<String>,
}

impl RankedFacility {
    /// `distance_km` must already be rounded.
    pub fn new(facility: Facility, distance_km: f64) -> Self {
        let full_address = facility.full_address();
        Self {
            facility,
            distance_km,
            full_address,
        }
    }
}

/// Body of a create request. `equip_numero` and `equip_nom` are required.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct NewFacility {
    #[serde(rename = "equip_numero")]
    #[validate(required(message = "is required"), custom(function = "non_blank"))]
    pub registry_number: Option<String>,
    #[serde(rename = "equip_nom")]
    #[validate(required(message = "is required"), custom(function = "non_blank"))]
    pub name: Option<String>,
    #[serde(rename = "inst_numero")]
    pub installation_number: Option<String>,
    #[serde(rename = "inst_nom")]
    pub installation_name: Option<String>,
    #[serde(rename = "equip_type_name")]
    pub type_name: Option<String>,
    #[serde(rename = "equip_type_famille")]
    pub type_family: Option<String>,
    #[serde(rename = "equip_nature")]
    pub nature: Option<String>,
    #[serde(rename = "inst_adresse")]
    pub address: Option<String>,
    #[serde(rename = "inst_cp")]
    pub postal_code: Option<String>,
    #[serde(rename = "commune_nom")]
    pub commune: Option<String>,
    #[serde(rename = "dep_nom")]
    pub department: Option<String>,
    #[validate(range(min = -90.0, max = 90.0, message = "must be between -90 and 90"))]
    pub latitude: Option<f64>,
    #[validate(range(min = -180.0, max = 180.0, message = "must be between -180 and 180"))]
    pub longitude: Option<f64>,
    #[serde(rename = "equip_surf")]
    pub surface_area: Option<f64>,
    #[serde(rename = "inst_acc_handi_bool")]
    pub installation_accessible: Option<bool>,
    #[serde(rename = "equip_pmr_acc")]
    pub equipment_accessible: Option<bool>,
    #[serde(rename = "equip_ouv_public_bool")]
    pub open_to_public: Option<bool>,
    #[serde(rename = "aps_name")]
    pub activities: Option<Vec<String>>,
    #[serde(rename = "equip_gest_type")]
    pub management_type: Option<String>,
}

/// Body of an update request. Omitted (or null) fields keep their stored value.
///
/// The registry number is a business key and cannot be changed.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct FacilityPatch {
    #[serde(rename = "equip_nom")]
    #[validate(custom(function = "non_blank"))]
    pub name: Option<String>,
    #[serde(rename = "inst_numero")]
    pub installation_number: Option<String>,
    #[serde(rename = "inst_nom")]
    pub installation_name: Option<String>,
    #[serde(rename = "equip_type_name")]
    pub type_name: Option<String>,
    #[serde(rename = "equip_type_famille")]
    pub type_family: Option<String>,
    #[serde(rename = "equip_nature")]
    pub nature: Option<String>,
    #[serde(rename = "inst_adresse")]
    pub address: Option<String>,
    #[serde(rename = "inst_cp")]
    pub postal_code: Option<String>,
    #[serde(rename = "commune_nom")]
    pub commune: Option<String>,
    #[serde(rename = "dep_nom")]
    pub department: Option<String>,
    #[validate(range(min = -90.0, max = 90.0, message = "must be between -90 and 90"))]
    pub latitude: Option<f64>,
    #[validate(range(min = -180.0, max = 180.0, message = "must be between -180 and 180"))]
    pub longitude: Option<f64>,
    #[serde(rename = "equip_surf")]
    pub surface_area: Option<f64>,
    #[serde(rename = "inst_acc_handi_bool")]
    pub installation_accessible: Option<bool>,
    #[serde(rename = "equip_pmr_acc")]
    pub equipment_accessible: Option<bool>,
    #[serde(rename = "equip_ouv_public_bool")]
    pub open_to_public: Option<bool>,
    #[serde(rename = "aps_name")]
    pub activities: Option<Vec<String>>,
    #[serde(rename = "equip_gest_type")]
    pub management_type: Option<String>,
}

impl FacilityPatch {
    /// Apply present fields onto `facility`, leaving the others untouched.
    pub fn apply_to(&self, facility: &mut Facility) {
        fn keep<T: Clone>(slot: &mut Option<T>, value: &Option<T>) {
            if let Some(v) = value {
                *slot = Some(v.clone());
            }
        }

        keep(&mut facility.name, &self.name);
        keep(&mut facility.installation_number, &self.installation_number);
        keep(&mut facility.installation_name, &self.installation_name);
        keep(&mut facility.type_name, &self.type_name);
        keep(&mut facility.type_family, &self.type_family);
        keep(&mut facility.nature, &self.nature);
        keep(&mut facility.address, &self.address);
        keep(&mut facility.postal_code, &self.postal_code);
        keep(&mut facility.commune, &self.commune);
        keep(&mut facility.department, &self.department);
        keep(&mut facility.latitude, &self.latitude);
        keep(&mut facility.longitude, &self.longitude);
        keep(&mut facility.surface_area, &self.surface_area);
        keep(
            &mut facility.installation_accessible,
            &self.installation_accessible,
        );
        keep(
            &mut facility.equipment_accessible,
            &self.equipment_accessible,
        );
        keep(&mut facility.open_to_public, &self.open_to_public);
        keep(&mut facility.management_type, &self.management_type);
        if let Some(activities) = &self.activities {
            facility.activities = activities.clone();
        }
    }
}

/// JSON name of a model field, for messages that quote the request body.
pub fn wire_field_name(field: &str) -> &str {
    match field {
        "registry_number" => "equip_numero",
        "name" => "equip_nom",
        "installation_number" => "inst_numero",
        "installation_name" => "inst_nom",
        "type_name" => "equip_type_name",
        "type_family" => "equip_type_famille",
        "nature" => "equip_nature",
        "address" => "inst_adresse",
        "postal_code" => "inst_cp",
        "commune" => "commune_nom",
        "department" => "dep_nom",
        "surface_area" => "equip_surf",
        "installation_accessible" => "inst_acc_handi_bool",
        "equipment_accessible" => "equip_pmr_acc",
        "open_to_public" => "equip_ouv_public_bool",
        "activities" => "aps_name",
        "management_type" => "equip_gest_type",
        other => other,
    }
}

fn non_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut err = ValidationError::new("blank");
        err.message = Some("must not be blank".into());
        return Err(err);
    }
    Ok(())
}
