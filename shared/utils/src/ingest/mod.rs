//! Upload Ingestion Module
//!
//! Decodes delimited-text and spreadsheet uploads (optionally base64
//! data-URI wrapped) into generic rows for the free-form BOM path.

pub mod parser;

pub use parser::{ParsedUpload, UploadFormat, UploadParser, UploadRow};
