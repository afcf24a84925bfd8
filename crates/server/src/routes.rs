pub mod billing;
pub mod catalog;
pub mod reports;

use axum::{
    routing::{get, post},
    Json, Router,
};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

use common::types::Health;

use crate::state::ServerState;

pub async fn health() -> Json<Health> {
    Json(Health::now())
}

/// Build the full application router. Paths are fixed; existing frontends
/// depend on them verbatim.
pub fn build_router(cors: CorsLayer, state: ServerState) -> Router {
    let api = Router::new()
        .route("/api/get_products", get(catalog::get_products))
        .route("/api/add_products", post(catalog::add_product))
        .route("/api/edit_products", post(catalog::edit_product))
        .route("/api/get_services", get(catalog::get_services))
        .route("/api/add_service", post(catalog::add_service))
        .route("/api/edit_services", post(catalog::edit_service))
        .route("/api/get_all_data", get(catalog::get_all_data))
        .route("/api/get_summary_data", get(reports::get_summary_data))
        .route("/api/submit_bill", post(billing::submit_bill))
        .route("/api/get_customers", get(billing::get_customers))
        .route("/api/get_daily_report", get(reports::get_daily_report))
        .route("/api/get_report", get(reports::get_report));

    Router::new()
        .route("/health", get(health))
        .merge(api)
        .with_state(state)
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(
                    DefaultMakeSpan::new()
                        .level(Level::INFO)
                        .include_headers(false),
                )
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(
                    DefaultOnResponse::new()
                        .level(Level::INFO)
                        .include_headers(false),
                )
                .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
        )
}
