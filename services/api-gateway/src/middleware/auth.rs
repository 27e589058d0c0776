use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};
use lumera_utils::LumeraError;

use crate::{ApiError, AppState};

/// Bearer-token gate for the BOM routes. The expected token comes from
/// configuration; there is no per-user identity.
pub async fn require_api_token(
    State(state): State<AppState>,
    headers: HeaderMap,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let auth_header = headers
        .get("authorization")
        .and_then(|header| header.to_str().ok());

    match auth_header {
        Some(header) if header.starts_with("Bearer ") => {
            let token = &header[7..];
            if token == state.config.auth.api_token {
                Ok(next.run(request).await)
            } else {
                Err(LumeraError::authentication("Invalid token").into())
            }
        }
        Some(_) => Err(LumeraError::authentication("Invalid authorization header format").into()),
        None => Err(LumeraError::authentication("Missing authorization header").into()),
    }
}
