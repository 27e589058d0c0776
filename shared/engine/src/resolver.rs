//! Model Resolver
//!
//! Turns a free-text query into zero or one catalog record, plus a
//! suggestion list for failed lookups. Exact stages compare case-sensitively,
//! the partial stage does not; that asymmetry is part of the contract.

use lumera_models::CatalogRecord;

use crate::catalog::CatalogStore;

/// Number of characters used by the prefix fallback in `suggest`.
const SUGGESTION_PREFIX_LEN: usize = 3;

/// Resolver over a borrowed catalog snapshot; construct one per request.
pub struct ModelResolver<'a> {
    store: &'a CatalogStore,
}

impl<'a> ModelResolver<'a> {
    pub fn new(store: &'a CatalogStore) -> Self {
        Self { store }
    }

    /// Resolve a query to a catalog record.
    ///
    /// Stages, first match wins:
    /// 1. exact model name (case-sensitive)
    /// 2. exact code (case-sensitive)
    /// 3. first record in store order whose model contains the query,
    ///    compared case-insensitively
    pub fn resolve(&self, query: &str) -> Option<&'a CatalogRecord> {
        let query = query.trim();
        if query.is_empty() {
            return None;
        }

        if let Some(record) = self.store.get_by_model(query) {
            return Some(record);
        }

        if let Some(record) = self.store.get_by_code(query) {
            return Some(record);
        }

        let needle = query.to_lowercase();
        self.store
            .records()
            .iter()
            .find(|record| record.model.to_lowercase().contains(&needle))
    }

    /// Model-name suggestions for a failed resolution.
    ///
    /// Case-insensitive substring containment first; when that yields
    /// nothing, fall back to a prefix match on the first three characters of
    /// the lowercased query. Store order, truncated to `limit`. This is a
    /// usability aid, not a ranked search.
    pub fn suggest(&self, query: &str, limit: usize) -> Vec<String> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() || limit == 0 {
            return Vec::new();
        }

        let contains: Vec<String> = self
            .store
            .records()
            .iter()
            .filter(|record| record.model.to_lowercase().contains(&needle))
            .map(|record| record.model.clone())
            .take(limit)
            .collect();

        if !contains.is_empty() {
            return contains;
        }

        let prefix: String = needle.chars().take(SUGGESTION_PREFIX_LEN).collect();
        self.store
            .records()
            .iter()
            .filter(|record| record.model.to_lowercase().starts_with(&prefix))
            .map(|record| record.model.clone())
            .take(limit)
            .collect()
    }
}
