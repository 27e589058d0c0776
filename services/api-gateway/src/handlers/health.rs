use axum::{extract::State, response::Json};
use serde_json::{json, Value};

use crate::AppState;

pub async fn detailed_health_check(State(state): State<AppState>) -> Json<Value> {
    let catalog_check = match state.catalog.unavailable_reason() {
        None => json!({"status": "healthy", "models": state.catalog.len()}),
        Some(reason) => json!({"status": "unavailable", "message": reason}),
    };

    let status = if state.catalog.is_available() {
        "healthy"
    } else {
        // The generative fallback still works without a catalog.
        "degraded"
    };

    Json(json!({
        "status": status,
        "service": "lumera-api-gateway",
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "version": env!("CARGO_PKG_VERSION"),
        "checks": {
            "catalog": catalog_check
        }
    }))
}
