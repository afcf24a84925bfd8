use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use crate::errors::ModelError;

/// Body of `POST /api/add_service`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceCreate {
    pub name: String,
    pub price: f64,
    pub code: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub user_type: Option<String>,
}

impl ServiceCreate {
    pub fn into_row(self, now: DateTime<Utc>) -> Value {
        let stamp = now.to_rfc3339();
        let mut row = Map::new();
        row.insert("name".into(), json!(self.name));
        row.insert("price".into(), json!(self.price));
        row.insert("code".into(), json!(self.code));
        row.insert("description".into(), json!(self.description));
        row.insert("created_at".into(), json!(stamp));
        row.insert("updated_at".into(), json!(stamp));
        if let Some(user_type) = self.user_type {
            row.insert("user_type".into(), json!(user_type));
        }
        Value::Object(row)
    }
}

/// Body of `POST /api/edit_services`.
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceUpdate {
    pub code: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub user_type: Option<String>,
}

impl ServiceUpdate {
    pub fn require_code(&self) -> Result<String, ModelError> {
        let code = self.code.trim();
        if code.is_empty() {
            return Err(ModelError::Validation("Service code is required".into()));
        }
        Ok(code.to_string())
    }

    /// Same merge semantics as products; `user_type` becomes `edited_by` and
    /// is not written through as-is.
    pub fn into_patch(self, now: DateTime<Utc>) -> Option<Value> {
        let mut patch = Map::new();
        if let Some(v) = self.name {
            patch.insert("name".into(), json!(v));
        }
        if let Some(v) = self.price {
            patch.insert("price".into(), json!(v));
        }
        if let Some(v) = self.description {
            patch.insert("description".into(), json!(v));
        }
        if let Some(v) = self.user_type {
            patch.insert("edited_by".into(), json!(v));
        }
        if patch.is_empty() {
            return None;
        }
        let stamp = json!(now.to_rfc3339());
        patch.insert("updated_at".into(), stamp.clone());
        patch.insert("edited_at".into(), stamp);
        Some(Value::Object(patch))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_row_includes_user_type_only_when_present() {
        let service: ServiceCreate =
            serde_json::from_str(r#"{"name": "Wash", "price": 15.0, "code": "S-1"}"#).unwrap();
        let row = service.into_row(Utc::now());
        assert!(row.get("user_type").is_none());
        assert_eq!(row["created_at"], row["updated_at"]);
    }

    #[test]
    fn update_with_only_code_yields_no_patch() {
        let update: ServiceUpdate = serde_json::from_str(r#"{"code": "S-1"}"#).unwrap();
        assert!(update.into_patch(Utc::now()).is_none());
    }

    #[test]
    fn user_type_alone_still_counts_as_update_data() {
        let update: ServiceUpdate =
            serde_json::from_str(r#"{"code": "S-1", "user_type": "staff"}"#).unwrap();
        let patch = update.into_patch(Utc::now()).unwrap();
        assert_eq!(patch["edited_by"], json!("staff"));
        assert!(patch.get("user_type").is_none());
    }
}
