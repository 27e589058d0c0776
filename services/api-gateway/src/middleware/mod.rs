pub mod auth;
pub mod request_id;

pub use auth::require_api_token;
pub use request_id::request_id_middleware;
