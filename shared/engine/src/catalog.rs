//! Catalog Store
//!
//! Loads the luminaire reference catalog once at startup and builds the
//! lookup indexes the resolver works against. The store is read-only for
//! the process lifetime; a reload means building a new store and swapping
//! the shared reference, never mutating in place.

use std::collections::{HashMap, HashSet};
use std::path::Path;

use calamine::{open_workbook_auto, DataType, Reader};
use tracing::{info, warn};

use lumera_models::{CatalogRecord, ComponentSlot};
use lumera_utils::{LumeraError, LumeraResult};

/// Lookup indexes over the deduplicated catalog snapshot.
///
/// `by_model` and `by_code` hold positions into the load-ordered record
/// vector, so exact lookups and ordered scans share one copy of the data.
#[derive(Debug, Clone)]
pub struct CatalogIndexes {
    records: Vec<CatalogRecord>,
    by_model: HashMap<String, usize>,
    by_code: HashMap<String, usize>,
}

/// The reference catalog, or the reason it could not be loaded.
///
/// An unavailable store answers every lookup with "not found" instead of
/// propagating the load error, so callers always reach the fallback path.
#[derive(Debug, Clone)]
pub enum CatalogStore {
    Ready(CatalogIndexes),
    Unavailable { reason: String },
}

impl CatalogStore {
    /// Load the catalog from an XLSX or CSV source.
    ///
    /// Never fails outward: a missing, unparsable, or empty source yields
    /// an `Unavailable` store and a warning in the log.
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match read_source(path) {
            Ok(records) => {
                let store = Self::from_records(records);
                match &store {
                    CatalogStore::Ready(indexes) => {
                        info!(models = indexes.records.len(), source = %path.display(), "Catalog loaded");
                    }
                    CatalogStore::Unavailable { reason } => {
                        warn!(source = %path.display(), %reason, "Catalog unavailable");
                    }
                }
                store
            }
            Err(e) => {
                warn!(source = %path.display(), error = %e, "Catalog unavailable");
                CatalogStore::Unavailable { reason: e.to_string() }
            }
        }
    }

    /// Build a store from already-parsed records, applying the cleaning
    /// policy: drop rows without a model, then dedup by model keep-first,
    /// then dedup the survivors by code keep-first. The pass order matters;
    /// a record removed by the model pass cannot resurrect a code collision.
    pub fn from_records(records: Vec<CatalogRecord>) -> Self {
        let mut seen_models = HashSet::new();
        let mut seen_codes = HashSet::new();
        let mut kept = Vec::new();

        let model_deduped: Vec<CatalogRecord> = records
            .into_iter()
            .filter(|r| !r.model.trim().is_empty())
            .filter(|r| seen_models.insert(r.model.clone()))
            .collect();

        for record in model_deduped {
            if seen_codes.insert(record.code.clone()) {
                kept.push(record);
            }
        }

        if kept.is_empty() {
            return CatalogStore::Unavailable {
                reason: "catalog source is empty after cleaning".to_string(),
            };
        }

        let mut by_model = HashMap::with_capacity(kept.len());
        let mut by_code = HashMap::with_capacity(kept.len());
        for (idx, record) in kept.iter().enumerate() {
            by_model.insert(record.model.clone(), idx);
            by_code.insert(record.code.clone(), idx);
        }

        CatalogStore::Ready(CatalogIndexes {
            records: kept,
            by_model,
            by_code,
        })
    }

    pub fn is_available(&self) -> bool {
        matches!(self, CatalogStore::Ready(_))
    }

    pub fn unavailable_reason(&self) -> Option<&str> {
        match self {
            CatalogStore::Ready(_) => None,
            CatalogStore::Unavailable { reason } => Some(reason),
        }
    }

    pub fn len(&self) -> usize {
        self.records().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records().is_empty()
    }

    /// Records in post-dedup load order. Empty when unavailable.
    pub fn records(&self) -> &[CatalogRecord] {
        match self {
            CatalogStore::Ready(indexes) => &indexes.records,
            CatalogStore::Unavailable { .. } => &[],
        }
    }

    pub fn get_by_model(&self, model: &str) -> Option<&CatalogRecord> {
        match self {
            CatalogStore::Ready(indexes) => {
                indexes.by_model.get(model).map(|&idx| &indexes.records[idx])
            }
            CatalogStore::Unavailable { .. } => None,
        }
    }

    pub fn get_by_code(&self, code: &str) -> Option<&CatalogRecord> {
        match self {
            CatalogStore::Ready(indexes) => {
                indexes.by_code.get(code).map(|&idx| &indexes.records[idx])
            }
            CatalogStore::Unavailable { .. } => None,
        }
    }
}

fn read_source(path: &Path) -> LumeraResult<Vec<CatalogRecord>> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_lowercase)
        .unwrap_or_default();

    match ext.as_str() {
        "csv" => read_csv(path),
        "xlsx" | "xls" => read_workbook(path),
        other => Err(LumeraError::catalog_unavailable(format!(
            "unsupported catalog format '{other}'"
        ))),
    }
}

fn read_csv(path: &Path) -> LumeraResult<Vec<CatalogRecord>> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_path(path)
        .map_err(|e| LumeraError::catalog_unavailable(e.to_string()))?;

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| LumeraError::catalog_unavailable(e.to_string()))?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let mut records = Vec::new();
    for result in reader.records() {
        let row = result.map_err(|e| LumeraError::catalog_unavailable(e.to_string()))?;
        let cells: Vec<String> = row.iter().map(|c| c.to_string()).collect();
        records.push(record_from_cells(&headers, &cells));
    }
    Ok(records)
}

fn read_workbook(path: &Path) -> LumeraResult<Vec<CatalogRecord>> {
    let mut workbook =
        open_workbook_auto(path).map_err(|e| LumeraError::catalog_unavailable(e.to_string()))?;

    let sheet_name = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or_else(|| LumeraError::catalog_unavailable("workbook has no sheets"))?;

    let range = workbook
        .worksheet_range(&sheet_name)
        .ok_or_else(|| LumeraError::catalog_unavailable("worksheet is missing"))?
        .map_err(|e| LumeraError::catalog_unavailable(e.to_string()))?;

    let mut rows = range.rows();
    let headers: Vec<String> = rows
        .next()
        .ok_or_else(|| LumeraError::catalog_unavailable("worksheet is empty"))?
        .iter()
        .map(|cell| cell_text(cell).trim().to_string())
        .collect();

    let mut records = Vec::new();
    for row in rows {
        let cells: Vec<String> = row.iter().map(cell_text).collect();
        records.push(record_from_cells(&headers, &cells));
    }
    Ok(records)
}

/// Spreadsheet cells holding codes come back as floats; render whole
/// numbers without the fractional part so "1001.0" keys as "1001".
fn cell_text(cell: &DataType) -> String {
    match cell {
        DataType::Empty => String::new(),
        DataType::Float(f) if f.fract() == 0.0 => format!("{}", *f as i64),
        other => other.to_string(),
    }
}

fn record_from_cells(headers: &[String], cells: &[String]) -> CatalogRecord {
    let mut record = CatalogRecord::new("", "");

    for (header, cell) in headers.iter().zip(cells.iter()) {
        let value = cell.trim();
        if value.is_empty() {
            continue;
        }

        let normalized = header.to_lowercase();
        if normalized == "model" {
            record.model = value.to_string();
        } else if normalized == "qr code" || normalized == "code" {
            record.code = value.to_string();
        } else if let Some(slot) = ComponentSlot::from_column(header) {
            record.set_slot(slot, value);
        } else {
            record.extra.insert(header.clone(), value.to_string());
        }
    }

    record
}
