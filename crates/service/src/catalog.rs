use std::sync::Arc;

use chrono::Utc;
use serde_json::{json, Value};
use tracing::info;

use models::product::{ProductCreate, ProductUpdate};
use models::service::{ServiceCreate, ServiceUpdate};
use store::{Filter, TableStore};

use crate::errors::ServiceError;

/// CRUD over the `products` and `services` tables.
#[derive(Clone)]
pub struct CatalogService {
    store: Arc<dyn TableStore>,
}

impl CatalogService {
    pub fn new(store: Arc<dyn TableStore>) -> Self {
        Self { store }
    }

    pub async fn list_products(&self) -> Result<Vec<Value>, ServiceError> {
        Ok(self.store.select("products", "*", &[]).await?)
    }

    pub async fn add_product(&self, input: ProductCreate) -> Result<Value, ServiceError> {
        info!(code = %input.code, "adding product");
        let rows = self
            .store
            .insert("products", input.into_row())
            .await
            .map_err(|e| {
                if e.is_duplicate_code() {
                    ServiceError::Validation("Product code already exists".into())
                } else {
                    e.into()
                }
            })?;
        rows.into_iter()
            .next()
            .ok_or_else(|| ServiceError::Validation("Failed to add product".into()))
    }

    pub async fn edit_product(&self, input: ProductUpdate) -> Result<Value, ServiceError> {
        let code = input.require_code()?;
        let patch = input
            .into_patch(Utc::now())
            .ok_or_else(|| ServiceError::Validation("No valid update data provided".into()))?;
        info!(%code, "editing product");
        let rows = self
            .store
            .update("products", patch, &[Filter::eq("code", code)])
            .await?;
        rows.into_iter().next().ok_or_else(|| ServiceError::not_found("Product"))
    }

    pub async fn list_services(&self) -> Result<Vec<Value>, ServiceError> {
        Ok(self.store.select("services", "*", &[]).await?)
    }

    pub async fn add_service(&self, input: ServiceCreate) -> Result<Value, ServiceError> {
        info!(code = %input.code, "adding service");
        let rows = self
            .store
            .insert("services", input.into_row(Utc::now()))
            .await
            .map_err(|e| {
                if e.is_duplicate_code() {
                    ServiceError::Validation("Service code already exists".into())
                } else {
                    e.into()
                }
            })?;
        rows.into_iter()
            .next()
            .ok_or_else(|| ServiceError::Upstream("Failed to add service".into()))
    }

    pub async fn edit_service(&self, input: ServiceUpdate) -> Result<Value, ServiceError> {
        let code = input.require_code()?;
        let patch = input
            .into_patch(Utc::now())
            .ok_or_else(|| ServiceError::Validation("No valid update data provided".into()))?;
        info!(%code, "editing service");
        let rows = self
            .store
            .update("services", patch, &[Filter::eq("code", code)])
            .await?;
        rows.into_iter().next().ok_or_else(|| ServiceError::not_found("Service"))
    }

    /// Combined payload for `GET /api/get_all_data`.
    pub async fn all_data(&self) -> Result<Value, ServiceError> {
        let products = self.store.select("products", "*", &[]).await?;
        let services = self.store.select("services", "*", &[]).await?;
        Ok(json!({ "products": products, "services": services }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use store::MemoryStore;

    fn catalog() -> CatalogService {
        CatalogService::new(Arc::new(MemoryStore::new()))
    }

    fn product(code: &str) -> ProductCreate {
        serde_json::from_value(json!({
            "name": "Engine oil",
            "price": 24.5,
            "code": code,
            "quantity": 12
        }))
        .unwrap()
    }

    #[tokio::test]
    async fn add_product_returns_created_row() {
        let svc = catalog();
        let row = svc.add_product(product("P-001")).await.unwrap();
        assert_eq!(row["code"], json!("P-001"));
        assert_eq!(row["edited_by"], json!("no"));
        assert!(row["id"].is_number());
    }

    #[tokio::test]
    async fn duplicate_product_code_is_a_validation_error() {
        let svc = catalog();
        svc.add_product(product("P-001")).await.unwrap();
        let err = svc.add_product(product("P-001")).await.unwrap_err();
        match err {
            ServiceError::Validation(msg) => assert_eq!(msg, "Product code already exists"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn edit_product_with_only_code_is_rejected() {
        let svc = catalog();
        svc.add_product(product("P-001")).await.unwrap();
        let update: ProductUpdate = serde_json::from_value(json!({"code": "P-001"})).unwrap();
        let err = svc.edit_product(update).await.unwrap_err();
        match err {
            ServiceError::Validation(msg) => assert_eq!(msg, "No valid update data provided"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn edit_product_merges_fields_and_stamps_audit() {
        let svc = catalog();
        svc.add_product(product("P-001")).await.unwrap();
        let update: ProductUpdate =
            serde_json::from_value(json!({"code": "P-001", "price": 30.0, "user_type": "admin"}))
                .unwrap();
        let row = svc.edit_product(update).await.unwrap();
        assert_eq!(row["price"], json!(30.0));
        assert_eq!(row["edited_by"], json!("admin"));
        assert_eq!(row["quantity"], json!(12));
        assert!(row["edited_at"].is_string());
    }

    #[tokio::test]
    async fn edit_unknown_product_is_not_found() {
        let svc = catalog();
        let update: ProductUpdate =
            serde_json::from_value(json!({"code": "missing", "price": 1.0})).unwrap();
        let err = svc.edit_product(update).await.unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(_)));
    }

    #[tokio::test]
    async fn all_data_returns_both_tables() {
        let svc = catalog();
        svc.add_product(product("P-001")).await.unwrap();
        let service: ServiceCreate = serde_json::from_value(json!({
            "name": "Full wash",
            "price": 15.0,
            "code": "S-001"
        }))
        .unwrap();
        svc.add_service(service).await.unwrap();
        let data = svc.all_data().await.unwrap();
        assert_eq!(data["products"].as_array().unwrap().len(), 1);
        assert_eq!(data["services"].as_array().unwrap().len(), 1);
    }
}
