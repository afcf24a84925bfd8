use axum::{extract::State, Json};
use serde_json::Value;

use models::product::{ProductCreate, ProductUpdate};
use models::service::{ServiceCreate, ServiceUpdate};

use crate::errors::ApiError;
use crate::state::ServerState;

pub async fn get_products(State(state): State<ServerState>) -> Result<Json<Vec<Value>>, ApiError> {
    Ok(Json(state.catalog.list_products().await?))
}

pub async fn add_product(
    State(state): State<ServerState>,
    Json(input): Json<ProductCreate>,
) -> Result<Json<Value>, ApiError> {
    Ok(Json(state.catalog.add_product(input).await?))
}

pub async fn edit_product(
    State(state): State<ServerState>,
    Json(input): Json<ProductUpdate>,
) -> Result<Json<Value>, ApiError> {
    Ok(Json(state.catalog.edit_product(input).await?))
}

pub async fn get_services(State(state): State<ServerState>) -> Result<Json<Vec<Value>>, ApiError> {
    Ok(Json(state.catalog.list_services().await?))
}

pub async fn add_service(
    State(state): State<ServerState>,
    Json(input): Json<ServiceCreate>,
) -> Result<Json<Value>, ApiError> {
    Ok(Json(state.catalog.add_service(input).await?))
}

pub async fn edit_service(
    State(state): State<ServerState>,
    Json(input): Json<ServiceUpdate>,
) -> Result<Json<Value>, ApiError> {
    Ok(Json(state.catalog.edit_service(input).await?))
}

pub async fn get_all_data(State(state): State<ServerState>) -> Result<Json<Value>, ApiError> {
    Ok(Json(state.catalog.all_data().await?))
}
