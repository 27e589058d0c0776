use axum::{
    routing::{get, post},
    Router,
};

use crate::{handlers::*, middleware::require_api_token, AppState};

pub fn create_api_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/health/detailed", get(detailed_health_check))
        .nest("/bom", bom_routes(state))
}

fn bom_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/chat", post(chat))
        .route("/search", post(search_model))
        .route("/models", get(list_models))
        .route("/sample-data", get(sample_data))
        .route("/upload", post(upload_components))
        .route("/export", post(export_report))
        .route_layer(axum::middleware::from_fn_with_state(state, require_api_token))
}
