use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use crate::errors::ModelError;

/// Body of `POST /api/add_products`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductCreate {
    pub name: String,
    pub price: f64,
    pub code: String,
    pub quantity: i64,
    #[serde(default)]
    pub discount: f64,
    #[serde(default)]
    pub user_type: Option<String>,
}

impl ProductCreate {
    /// Row shape for the `products` table; new rows start with
    /// `edited_by: "no"`.
    pub fn into_row(self) -> Value {
        json!({
            "name": self.name,
            "price": self.price,
            "code": self.code,
            "quantity": self.quantity,
            "discount": self.discount,
            "user_type": self.user_type,
            "edited_by": "no",
        })
    }
}

/// Body of `POST /api/edit_products`. Only `code` identifies the row; every
/// other field is a merge-if-present update.
#[derive(Debug, Clone, Deserialize)]
pub struct ProductUpdate {
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default)]
    pub quantity: Option<i64>,
    #[serde(default)]
    pub discount: Option<f64>,
    #[serde(default)]
    pub user_type: Option<String>,
}

impl ProductUpdate {
    pub fn require_code(&self) -> Result<String, ModelError> {
        match self.code.as_deref().map(str::trim) {
            Some(code) if !code.is_empty() => Ok(code.to_string()),
            _ => Err(ModelError::Validation("Product code is required".into())),
        }
    }

    /// Patch built from caller-supplied fields only; `None` when the caller
    /// sent nothing to update. Audit stamps are added only once at least one
    /// real field is present.
    pub fn into_patch(self, now: DateTime<Utc>) -> Option<Value> {
        let mut patch = Map::new();
        if let Some(v) = self.name {
            patch.insert("name".into(), json!(v));
        }
        if let Some(v) = self.price {
            patch.insert("price".into(), json!(v));
        }
        if let Some(v) = self.quantity {
            patch.insert("quantity".into(), json!(v));
        }
        if let Some(v) = self.discount {
            patch.insert("discount".into(), json!(v));
        }
        if let Some(v) = self.user_type {
            patch.insert("user_type".into(), json!(v.clone()));
            patch.insert("edited_by".into(), json!(v));
        }
        if patch.is_empty() {
            return None;
        }
        patch.insert("edited_at".into(), json!(now.to_rfc3339()));
        Some(Value::Object(patch))
    }
}
