use axum::extract::{Query, State};
use axum::http::header;
use axum::response::IntoResponse;
use axum::Json;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{info, instrument};

use lumera_engine::{BomAssembler, ModelResolver, ReportRenderer};
use lumera_models::BomDocument;
use lumera_utils::{LumeraError, UploadRow};

use crate::{ApiError, AppState};

const SUGGESTION_LIMIT: usize = 5;
const DEFAULT_MODEL_LIMIT: usize = 50;

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub response: String,
    pub bom: BomDocument,
    pub model_found: bool,
}

/// Conversational entry point: try the catalog first, fall back to the
/// completion service when nothing matches.
#[instrument(skip(state, request))]
pub async fn chat(
    State(state): State<AppState>,
    Json(request): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, ApiError> {
    let query = request.message.trim();
    if query.is_empty() {
        return Err(LumeraError::validation("message", "Message must not be empty").into());
    }

    let resolver = ModelResolver::new(&state.catalog);
    if let Some(record) = resolver.resolve(query) {
        info!(model = %record.model, "Catalog hit");
        let bom = BomAssembler::from_catalog_record(record, None);
        return Ok(Json(ChatResponse {
            response: format!("BOM generated for model: {}", record.model),
            bom,
            model_found: true,
        }));
    }

    info!("No catalog match, using generative fallback");
    let rows = vec![free_form_row(query)];
    let bom = state.fallback.generate(&rows, query).await?;

    Ok(Json(ChatResponse {
        response: "BOM generated from your requirements".to_string(),
        bom,
        model_found: false,
    }))
}

/// A single synthetic row standing in for uploaded data when the request is
/// pure free text.
fn free_form_row(message: &str) -> UploadRow {
    UploadRow {
        row_number: 1,
        model: None,
        description: Some(message.to_string()),
        raw_data: [
            ("type".to_string(), "LED Light".to_string()),
            ("description".to_string(), message.to_string()),
            ("wattage".to_string(), "Unknown".to_string()),
            ("color_temperature".to_string(), "Unknown".to_string()),
            ("luminous_flux".to_string(), "Unknown".to_string()),
        ]
        .into_iter()
        .collect(),
    }
}

#[derive(Debug, Deserialize)]
pub struct SearchRequest {
    pub query: String,
    #[serde(default)]
    pub po_number: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub model: Value,
    /// Present only once a P.O. number has been confirmed.
    pub bom: Option<BomDocument>,
    pub message: String,
}

/// Two-phase catalog search: the first call (no P.O. number) returns the
/// matched record so the client can confirm, the second call carries the
/// P.O. number and receives the assembled BOM.
///
/// A store that failed to load matches nothing, so lookups against it
/// degrade to not found with an empty suggestion list.
#[instrument(skip(state, request))]
pub async fn search_model(
    State(state): State<AppState>,
    Json(request): Json<SearchRequest>,
) -> Result<Json<SearchResponse>, ApiError> {
    let query = request.query.trim();
    if query.is_empty() {
        return Err(LumeraError::validation("query", "Query must not be empty").into());
    }

    let resolver = ModelResolver::new(&state.catalog);
    let record = resolver.resolve(query).ok_or_else(|| {
        ApiError::with_details(
            LumeraError::not_found(format!("Model '{query}'")),
            json!({ "suggestions": resolver.suggest(query, SUGGESTION_LIMIT) }),
        )
    })?;

    let po_number = request
        .po_number
        .as_deref()
        .map(str::trim)
        .filter(|po| !po.is_empty());

    let (bom, message) = match po_number {
        Some(po) => {
            let bom = BomAssembler::from_catalog_record(record, Some(po));
            (Some(bom), "BOM ready for export.".to_string())
        }
        None => (None, "Please enter P.O. number.".to_string()),
    };

    Ok(Json(SearchResponse {
        model: serde_json::to_value(record).map_err(LumeraError::from)?,
        bom,
        message,
    }))
}

#[derive(Debug, Deserialize)]
pub struct ListModelsQuery {
    pub limit: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct ModelEntry {
    pub model: String,
    pub code: String,
}

#[derive(Debug, Serialize)]
pub struct ListModelsResponse {
    pub total: usize,
    pub models: Vec<ModelEntry>,
}

/// List catalog models for client-side autocomplete.
pub async fn list_models(
    State(state): State<AppState>,
    Query(params): Query<ListModelsQuery>,
) -> Result<Json<ListModelsResponse>, ApiError> {
    if let Some(reason) = state.catalog.unavailable_reason() {
        return Err(LumeraError::catalog_unavailable(reason).into());
    }

    let limit = params.limit.unwrap_or(DEFAULT_MODEL_LIMIT);
    let models: Vec<ModelEntry> = state
        .catalog
        .records()
        .iter()
        .take(limit)
        .map(|record| ModelEntry {
            model: record.model.clone(),
            code: record.code.clone(),
        })
        .collect();

    Ok(Json(ListModelsResponse {
        total: state.catalog.len(),
        models,
    }))
}

/// Static example rows showing the expected upload column layout.
pub async fn sample_data() -> Json<Value> {
    Json(json!({
        "description": "Example component rows for CSV or Excel upload",
        "columns": ["model", "type", "wattage", "color_temperature", "luminous_flux"],
        "rows": [
            {
                "model": "LED-001",
                "type": "High Power LED",
                "wattage": "10W",
                "color_temperature": "3000K",
                "luminous_flux": "1000lm"
            },
            {
                "model": "LED-002",
                "type": "COB LED",
                "wattage": "20W",
                "color_temperature": "4000K",
                "luminous_flux": "2000lm"
            },
            {
                "model": "LED-003",
                "type": "SMD LED",
                "wattage": "5W",
                "color_temperature": "6500K",
                "luminous_flux": "500lm"
            }
        ]
    }))
}

#[derive(Debug, Deserialize)]
pub struct ExportRequest {
    pub bom: BomDocument,
}

/// Render a BOM document into the printable report and return it as a file
/// attachment.
#[instrument(skip(state, request))]
pub async fn export_report(
    State(state): State<AppState>,
    Json(request): Json<ExportRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let generated_at = Utc::now();
    let bytes = state.renderer.render_at(&request.bom, generated_at)?;
    let filename = ReportRenderer::export_filename(&request.bom, generated_at);

    info!(%filename, size = bytes.len(), "Report rendered");

    Ok((
        [
            (
                header::CONTENT_TYPE,
                "text/html; charset=utf-8".to_string(),
            ),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{filename}\""),
            ),
        ],
        bytes,
    ))
}
