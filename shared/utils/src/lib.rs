pub mod config;
pub mod error;
pub mod ingest;
pub mod logging;

pub use config::*;
pub use error::*;
pub use ingest::*;
pub use logging::*;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_loading() {
        let config = AppConfig::default();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.completion.max_tokens, 2000);
    }

    #[test]
    fn test_error_handling() {
        let error = LumeraError::malformed_upload("bad bytes");
        assert_eq!(error.error_code(), "MALFORMED_UPLOAD");
        assert_eq!(error.http_status_code(), 400);

        let error = LumeraError::generation("no braces in reply");
        assert_eq!(error.http_status_code(), 502);
    }
}
