use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use lumera_utils::{ErrorResponse, LumeraError};

/// A core error plus optional response details (e.g. suggestions on a
/// failed model lookup), mapped to HTTP by the shared taxonomy.
#[derive(Debug)]
pub struct ApiError {
    error: LumeraError,
    details: Option<serde_json::Value>,
}

impl ApiError {
    pub fn with_details(error: LumeraError, details: serde_json::Value) -> Self {
        Self {
            error,
            details: Some(details),
        }
    }
}

impl From<LumeraError> for ApiError {
    fn from(error: LumeraError) -> Self {
        Self {
            error,
            details: None,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.error.http_status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let mut body = ErrorResponse::from(self.error);
        body.details = self.details;
        (status, Json(body)).into_response()
    }
}
