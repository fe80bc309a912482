use serde::Serialize;

/// Aggregate figures over the whole, unfiltered registry.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FacilityStats {
    pub total: i64,
    /// Distinct non-null communes.
    pub communes: i64,
    /// Facilities with `equip_pmr_acc = true`.
    pub accessible: i64,
    pub by_type: Vec<TypeFamilyCount>,
    pub by_commune: Vec<CommuneCount>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TypeFamilyCount {
    pub equip_type_famille: String,
    pub count: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommuneCount {
    pub commune_nom: String,
    pub count: i64,
}
