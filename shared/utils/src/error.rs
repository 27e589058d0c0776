use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug, Clone, Serialize, Deserialize)]
pub enum LumeraError {
    #[error("Catalog unavailable: {message}")]
    CatalogUnavailable { message: String },

    #[error("Not found: {resource}")]
    NotFound { resource: String },

    #[error("Malformed upload: {message}")]
    MalformedUpload { message: String },

    #[error("Generation error: {message}")]
    Generation { message: String },

    #[error("Render error: {message}")]
    Render { message: String },

    #[error("Validation error: {field} - {message}")]
    Validation { field: String, message: String },

    #[error("Authentication error: {message}")]
    Authentication { message: String },

    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("External service error: {service} - {message}")]
    ExternalService { service: String, message: String },

    #[error("Internal server error: {message}")]
    Internal { message: String },
}

impl LumeraError {
    pub fn catalog_unavailable(message: impl Into<String>) -> Self {
        Self::CatalogUnavailable {
            message: message.into(),
        }
    }

    pub fn not_found(resource: impl Into<String>) -> Self {
        Self::NotFound {
            resource: resource.into(),
        }
    }

    pub fn malformed_upload(message: impl Into<String>) -> Self {
        Self::MalformedUpload {
            message: message.into(),
        }
    }

    pub fn generation(message: impl Into<String>) -> Self {
        Self::Generation {
            message: message.into(),
        }
    }

    pub fn render(message: impl Into<String>) -> Self {
        Self::Render {
            message: message.into(),
        }
    }

    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn authentication(message: impl Into<String>) -> Self {
        Self::Authentication {
            message: message.into(),
        }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    pub fn external_service(service: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ExternalService {
            service: service.into(),
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            Self::CatalogUnavailable { .. } => "CATALOG_UNAVAILABLE",
            Self::NotFound { .. } => "NOT_FOUND",
            Self::MalformedUpload { .. } => "MALFORMED_UPLOAD",
            Self::Generation { .. } => "GENERATION_ERROR",
            Self::Render { .. } => "RENDER_ERROR",
            Self::Validation { .. } => "VALIDATION_ERROR",
            Self::Authentication { .. } => "AUTHENTICATION_ERROR",
            Self::Configuration { .. } => "CONFIGURATION_ERROR",
            Self::ExternalService { .. } => "EXTERNAL_SERVICE_ERROR",
            Self::Internal { .. } => "INTERNAL_SERVER_ERROR",
        }
    }

    pub fn http_status_code(&self) -> u16 {
        match self {
            Self::CatalogUnavailable { .. } => 503,
            Self::NotFound { .. } => 404,
            Self::MalformedUpload { .. } => 400,
            Self::Generation { .. } => 502,
            Self::Render { .. } => 422,
            Self::Validation { .. } => 400,
            Self::Authentication { .. } => 401,
            Self::Configuration { .. } => 500,
            Self::ExternalService { .. } => 502,
            Self::Internal { .. } => 500,
        }
    }
}

pub type LumeraResult<T> = Result<T, LumeraError>;

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
    pub message: String,
    pub details: Option<serde_json::Value>,
}

impl From<LumeraError> for ErrorResponse {
    fn from(error: LumeraError) -> Self {
        Self {
            error: error.to_string(),
            code: error.error_code().to_string(),
            message: error.to_string(),
            details: None,
        }
    }
}

// Conversion from common error types
impl From<reqwest::Error> for LumeraError {
    fn from(error: reqwest::Error) -> Self {
        Self::external_service("HTTP Client", error.to_string())
    }
}

impl From<serde_json::Error> for LumeraError {
    fn from(error: serde_json::Error) -> Self {
        Self::validation("JSON", error.to_string())
    }
}

impl From<csv::Error> for LumeraError {
    fn from(error: csv::Error) -> Self {
        Self::malformed_upload(error.to_string())
    }
}
