//! Upload Parser
//!
//! Decodes uploaded component data (CSV or Excel bytes, optionally wrapped
//! in a base64 data URI) into generic rows for the free-form BOM path.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use std::collections::HashMap;
use std::path::Path;
use uuid::Uuid;

use crate::error::{LumeraError, LumeraResult};

/// Supported upload formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadFormat {
    Csv,
    Excel, // XLSX/XLS
}

impl UploadFormat {
    /// Detect format from file extension
    pub fn from_extension(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_lowercase();
        match ext.as_str() {
            "csv" => Some(Self::Csv),
            "xlsx" | "xls" => Some(Self::Excel),
            _ => None,
        }
    }

    /// Detect format from content type header
    pub fn from_content_type(content_type: &str) -> Option<Self> {
        match content_type {
            "text/csv" | "application/csv" => Some(Self::Csv),
            "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet" => Some(Self::Excel),
            "application/vnd.ms-excel" => Some(Self::Excel),
            _ => None,
        }
    }
}

/// One uploaded row: the columns we recognize plus everything else verbatim.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct UploadRow {
    pub row_number: usize,
    pub model: Option<String>,
    pub description: Option<String>,
    pub raw_data: HashMap<String, String>,
}

/// Complete parsed upload with metadata
#[derive(Debug, Clone)]
pub struct ParsedUpload {
    pub id: Uuid,
    pub filename: String,
    pub format: UploadFormat,
    pub rows: Vec<UploadRow>,
    pub column_headers: Vec<String>,
    pub total_rows: usize,
    pub parse_warnings: Vec<String>,
}

/// Upload parser with column-name candidate matching
pub struct UploadParser {
    model_columns: Vec<String>,
    description_columns: Vec<String>,
}

impl Default for UploadParser {
    fn default() -> Self {
        Self {
            model_columns: vec![
                "model".to_string(),
                "model_name".to_string(),
                "fixture".to_string(),
            ],
            description_columns: vec![
                "description".to_string(),
                "desc".to_string(),
                "type".to_string(),
            ],
        }
    }
}

impl UploadParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse upload content from bytes.
    ///
    /// A `data:...;base64,<payload>` prefix is stripped and decoded before
    /// format parsing. Undecodable content is a `MalformedUpload` error; no
    /// partial row list is ever returned.
    pub fn parse_bytes(
        &self,
        filename: &str,
        data: &[u8],
        format: Option<UploadFormat>,
    ) -> LumeraResult<ParsedUpload> {
        let format = format
            .or_else(|| UploadFormat::from_extension(Path::new(filename)))
            .ok_or_else(|| {
                LumeraError::malformed_upload(format!("Could not determine format of '{filename}'"))
            })?;

        let decoded = strip_data_uri(data)?;
        let data = decoded.as_deref().unwrap_or(data);

        match format {
            UploadFormat::Csv => self.parse_csv(filename, data),
            UploadFormat::Excel => self.parse_excel(filename, data),
        }
    }

    /// Parse CSV format
    fn parse_csv(&self, filename: &str, data: &[u8]) -> LumeraResult<ParsedUpload> {
        let mut reader = csv::ReaderBuilder::new().flexible(true).from_reader(data);

        let headers: Vec<String> = reader
            .headers()
            .map_err(|e| LumeraError::malformed_upload(format!("Failed to read CSV headers: {e}")))?
            .iter()
            .map(|h| h.to_lowercase().trim().to_string())
            .collect();

        let mut rows = Vec::new();
        let mut warnings = Vec::new();

        for (idx, result) in reader.records().enumerate() {
            match result {
                Ok(record) => {
                    let raw_data: HashMap<String, String> = headers
                        .iter()
                        .enumerate()
                        .filter_map(|(i, h)| record.get(i).map(|v| (h.clone(), v.to_string())))
                        .collect();

                    rows.push(self.map_row(idx + 2, &raw_data));
                }
                Err(e) => {
                    warnings.push(format!("Row {}: Parse error - {}", idx + 2, e));
                }
            }
        }

        Ok(ParsedUpload {
            id: Uuid::new_v4(),
            filename: filename.to_string(),
            format: UploadFormat::Csv,
            total_rows: rows.len(),
            rows,
            column_headers: headers,
            parse_warnings: warnings,
        })
    }

    /// Parse Excel format
    fn parse_excel(&self, filename: &str, data: &[u8]) -> LumeraResult<ParsedUpload> {
        use calamine::{open_workbook_from_rs, DataType, Reader, Xlsx};

        let cursor = std::io::Cursor::new(data);
        let mut workbook: Xlsx<_> = open_workbook_from_rs(cursor)
            .map_err(|e| LumeraError::malformed_upload(format!("Failed to open workbook: {e}")))?;

        let sheet_name = workbook
            .sheet_names()
            .first()
            .cloned()
            .ok_or_else(|| LumeraError::malformed_upload("No sheets found in workbook"))?;

        let range = workbook
            .worksheet_range(&sheet_name)
            .ok_or_else(|| LumeraError::malformed_upload("Worksheet is missing"))?
            .map_err(|e| LumeraError::malformed_upload(format!("Failed to read worksheet: {e}")))?;

        let mut rows_iter = range.rows();

        // First row is headers
        let headers: Vec<String> = rows_iter
            .next()
            .ok_or_else(|| LumeraError::malformed_upload("Empty worksheet"))?
            .iter()
            .map(|cell: &DataType| cell.to_string().to_lowercase().trim().to_string())
            .collect();

        let mut rows = Vec::new();

        for (idx, row) in rows_iter.enumerate() {
            let raw_data: HashMap<String, String> = headers
                .iter()
                .enumerate()
                .filter_map(|(i, h)| {
                    row.get(i)
                        .filter(|cell| !cell.is_empty())
                        .map(|cell| (h.clone(), cell.to_string()))
                })
                .collect();

            rows.push(self.map_row(idx + 2, &raw_data));
        }

        Ok(ParsedUpload {
            id: Uuid::new_v4(),
            filename: filename.to_string(),
            format: UploadFormat::Excel,
            total_rows: rows.len(),
            rows,
            column_headers: headers,
            parse_warnings: Vec::new(),
        })
    }

    /// Map raw data to a structured UploadRow
    fn map_row(&self, row_number: usize, raw_data: &HashMap<String, String>) -> UploadRow {
        UploadRow {
            row_number,
            model: find_value(&self.model_columns, raw_data),
            description: find_value(&self.description_columns, raw_data),
            raw_data: raw_data.clone(),
        }
    }
}

/// Find value by checking multiple possible column names
fn find_value(candidates: &[String], data: &HashMap<String, String>) -> Option<String> {
    for candidate in candidates {
        if let Some(value) = data.get(candidate) {
            let trimmed = value.trim();
            if !trimmed.is_empty() {
                return Some(trimmed.to_string());
            }
        }
    }
    None
}

/// Strip a `data:...;base64,` prefix and decode the payload.
///
/// Returns `None` when the content is not a data URI, so the caller keeps
/// the original bytes.
fn strip_data_uri(data: &[u8]) -> LumeraResult<Option<Vec<u8>>> {
    if !data.starts_with(b"data:") {
        return Ok(None);
    }

    let text = std::str::from_utf8(data)
        .map_err(|_| LumeraError::malformed_upload("Data URI is not valid UTF-8"))?;
    let payload = text
        .split_once(',')
        .map(|(_, payload)| payload)
        .ok_or_else(|| LumeraError::malformed_upload("Data URI has no payload"))?;

    let decoded = BASE64
        .decode(payload.trim())
        .map_err(|e| LumeraError::malformed_upload(format!("Invalid base64 payload: {e}")))?;

    Ok(Some(decoded))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_detection() {
        assert_eq!(UploadFormat::from_extension(Path::new("leds.csv")), Some(UploadFormat::Csv));
        assert_eq!(UploadFormat::from_extension(Path::new("leds.xlsx")), Some(UploadFormat::Excel));
        assert_eq!(UploadFormat::from_extension(Path::new("leds.txt")), None);
        assert_eq!(UploadFormat::from_content_type("text/csv"), Some(UploadFormat::Csv));
        assert_eq!(
            UploadFormat::from_content_type("application/vnd.ms-excel"),
            Some(UploadFormat::Excel)
        );
    }

    #[test]
    fn test_csv_parsing() {
        let csv_data = b"model,type,wattage\nLED-001,High Power LED,10W\nLED-002,COB LED,20W";

        let parser = UploadParser::new();
        let result = parser.parse_bytes("leds.csv", csv_data, None).unwrap();

        assert_eq!(result.total_rows, 2);
        assert_eq!(result.rows[0].model, Some("LED-001".to_string()));
        assert_eq!(result.rows[0].description, Some("High Power LED".to_string()));
        assert_eq!(result.rows[1].raw_data.get("wattage"), Some(&"20W".to_string()));
    }

    #[test]
    fn test_data_uri_is_decoded_before_parsing() {
        let csv = "model,wattage\nLED-001,10W";
        let encoded = format!("data:text/csv;base64,{}", BASE64.encode(csv));

        let parser = UploadParser::new();
        let result = parser
            .parse_bytes("leds.csv", encoded.as_bytes(), None)
            .unwrap();

        assert_eq!(result.total_rows, 1);
        assert_eq!(result.rows[0].model, Some("LED-001".to_string()));
    }

    #[test]
    fn test_bad_base64_payload_is_rejected() {
        let parser = UploadParser::new();
        let err = parser
            .parse_bytes("leds.csv", b"data:text/csv;base64,@@not-base64@@", None)
            .unwrap_err();
        assert_eq!(err.error_code(), "MALFORMED_UPLOAD");
    }

    #[test]
    fn test_unknown_format_is_rejected() {
        let parser = UploadParser::new();
        let err = parser.parse_bytes("notes.txt", b"hello", None).unwrap_err();
        assert_eq!(err.error_code(), "MALFORMED_UPLOAD");
    }

    #[test]
    fn test_excel_bytes_must_be_a_workbook() {
        let parser = UploadParser::new();
        let err = parser
            .parse_bytes("leds.xlsx", b"definitely not a zip archive", None)
            .unwrap_err();
        assert_eq!(err.error_code(), "MALFORMED_UPLOAD");
    }
}
