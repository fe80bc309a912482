use axum::body::Bytes;
use serde_json::{json, Map, Value};

pub fn to_json_body(value: &Value) -> anyhow::Result<Bytes> {
    Ok(Bytes::from(serde_json::to_vec(value)?))
}

/// Builder for facility create bodies.
pub struct FacilityBuilder {
    fields: Map<String, Value>,
}

impl FacilityBuilder {
    pub fn new(equip_numero: impl Into<String>) -> Self {
        let equip_numero = equip_numero.into();
        let mut fields = Map::new();
        fields.insert("equip_nom".into(), json!(format!("Equipement {equip_numero}")));
        fields.insert("equip_numero".into(), json!(equip_numero));
        Self { fields }
    }

    fn set(mut self, key: &str, value: Value) -> Self {
        self.fields.insert(key.to_string(), value);
        self
    }

    pub fn name(self, name: &str) -> Self {
        self.set("equip_nom", json!(name))
    }

    pub fn installation(self, name: &str) -> Self {
        self.set("inst_nom", json!(name))
    }

    pub fn commune(self, commune: &str) -> Self {
        self.set("commune_nom", json!(commune))
    }

    pub fn address(self, address: &str) -> Self {
        self.set("inst_adresse", json!(address))
    }

    pub fn type_name(self, type_name: &str) -> Self {
        self.set("equip_type_name", json!(type_name))
    }

    pub fn family(self, family: &str) -> Self {
        self.set("equip_type_famille", json!(family))
    }

    pub fn accessible(self, accessible: bool) -> Self {
        self.set("equip_pmr_acc", json!(accessible))
    }

    pub fn at(self, latitude: f64, longitude: f64) -> Self {
        self.set("latitude", json!(latitude))
            .set("longitude", json!(longitude))
    }

    pub fn sports(self, sports: &[&str]) -> Self {
        self.set("aps_name", json!(sports))
    }

    pub fn build(self) -> Value {
        Value::Object(self.fields)
    }
}
