use axum::extract::{Multipart, State};
use axum::Json;
use serde::Serialize;
use tracing::{info, instrument};

use lumera_models::BomDocument;
use lumera_utils::{LumeraError, UploadFormat, UploadParser};

use crate::{ApiError, AppState};

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub filename: String,
    pub rows_parsed: usize,
    pub parse_warnings: Vec<String>,
    pub bom: BomDocument,
}

/// Ingest an uploaded component table (CSV or Excel, raw bytes or a base64
/// data URI) and hand the rows to the generative path.
#[instrument(skip(state, multipart))]
pub async fn upload_components(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, ApiError> {
    let field = multipart
        .next_field()
        .await
        .map_err(|e| LumeraError::malformed_upload(format!("Invalid multipart body: {e}")))?
        .ok_or_else(|| LumeraError::malformed_upload("No file field in request"))?;

    let filename = field
        .file_name()
        .unwrap_or("upload.csv")
        .to_string();
    let format = field
        .content_type()
        .and_then(UploadFormat::from_content_type);
    let data = field
        .bytes()
        .await
        .map_err(|e| LumeraError::malformed_upload(format!("Failed to read upload: {e}")))?;

    let parsed = UploadParser::new().parse_bytes(&filename, &data, format)?;
    info!(
        filename = %parsed.filename,
        rows = parsed.total_rows,
        warnings = parsed.parse_warnings.len(),
        "Upload parsed"
    );

    if parsed.rows.is_empty() {
        return Err(LumeraError::malformed_upload("Upload contains no data rows").into());
    }

    let bom = state.fallback.generate(&parsed.rows, "").await?;

    Ok(Json(UploadResponse {
        filename: parsed.filename,
        rows_parsed: parsed.total_rows,
        parse_warnings: parsed.parse_warnings,
        bom,
    }))
}
