use axum::{extract::State, Json};
use serde_json::Value;

use models::billing::{BillPayload, BillReceipt};

use crate::errors::ApiError;
use crate::state::ServerState;

pub async fn submit_bill(
    State(state): State<ServerState>,
    Json(payload): Json<BillPayload>,
) -> Result<Json<BillReceipt>, ApiError> {
    Ok(Json(state.billing.submit_bill(payload).await?))
}

pub async fn get_customers(State(state): State<ServerState>) -> Result<Json<Vec<Value>>, ApiError> {
    Ok(Json(state.billing.customers().await?))
}
