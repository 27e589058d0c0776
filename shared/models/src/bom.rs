//! Bill of Materials domain models.
//!
//! A `BomDocument` is constructed once per request and never mutated
//! afterwards. It keeps both the flat `raw_components` list and the grouped
//! `categories` view so the grouping step stays auditable.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use validator::Validate;

/// Sentinel value used when no purchase-order number was supplied.
pub const PO_NOT_APPLICABLE: &str = "N/A";

/// Prefix for catalog-derived BOM identifiers.
pub const BOM_ID_PREFIX: &str = "BOM-";

/// Code placeholder for records without a usable QR code.
pub const UNKNOWN_CODE: &str = "UNKNOWN";

/// One line item in a BOM.
///
/// On the catalog path `description` equals `part_number` and the cost,
/// supplier and specification fields are absent; they are cosmetic
/// extensions only the generative path produces.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct Component {
    #[validate(length(min = 1, max = 100, message = "Part number must be between 1 and 100 characters"))]
    pub part_number: String,
    #[validate(length(min = 1, max = 500, message = "Description must be between 1 and 500 characters"))]
    pub description: String,
    pub category: String,
    #[validate(range(min = 1, message = "Quantity must be at least 1"))]
    pub quantity: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit_cost: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_cost: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub supplier: Option<String>,
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub specifications: HashMap<String, serde_json::Value>,
}

impl Component {
    /// Catalog-path line item: the part identifier doubles as the
    /// description and presence in the record means quantity 1.
    pub fn from_part(part_number: impl Into<String>, category: impl Into<String>) -> Self {
        let part_number = part_number.into();
        Self {
            description: part_number.clone(),
            part_number,
            category: category.into(),
            quantity: 1,
            unit_cost: None,
            total_cost: None,
            supplier: None,
            specifications: HashMap::new(),
        }
    }
}

/// Components sharing one category, in emission order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryGroup {
    pub category: String,
    pub components: Vec<Component>,
}

/// A normalized Bill of Materials document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct BomDocument {
    #[validate(length(min = 1))]
    pub bom_id: String,
    pub project_name: String,
    pub model_name: String,
    pub qr_code: String,
    pub po_number: String,
    pub total_components: usize,
    pub categories: Vec<CategoryGroup>,
    pub raw_components: Vec<Component>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimated_cost: Option<String>,
}

impl BomDocument {
    /// Sum of component counts across all category groups.
    pub fn grouped_component_count(&self) -> usize {
        self.categories.iter().map(|g| g.components.len()).sum()
    }

    /// A document is well-shaped when `total_components` matches both the
    /// raw list and the grouped view. The renderer refuses anything else.
    pub fn is_consistent(&self) -> bool {
        self.total_components == self.raw_components.len()
            && self.grouped_component_count() == self.total_components
    }

    pub fn category_names(&self) -> Vec<&str> {
        self.categories.iter().map(|g| g.category.as_str()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    fn sample_doc() -> BomDocument {
        let led = Component::from_part("CREE-XPL", "LED");
        let trim = Component::from_part("T-100B", "Trim");
        BomDocument {
            bom_id: "BOM-1001".to_string(),
            project_name: "LED Model: TX-100".to_string(),
            model_name: "TX-100".to_string(),
            qr_code: "1001".to_string(),
            po_number: PO_NOT_APPLICABLE.to_string(),
            total_components: 2,
            categories: vec![
                CategoryGroup { category: "LED".to_string(), components: vec![led.clone()] },
                CategoryGroup { category: "Trim".to_string(), components: vec![trim.clone()] },
            ],
            raw_components: vec![led, trim],
            estimated_cost: None,
        }
    }

    #[test]
    fn test_catalog_component_mirrors_part_number() {
        let component = Component::from_part("HS-40", "Heatsink");
        assert_eq!(component.description, "HS-40");
        assert_eq!(component.quantity, 1);
        assert!(component.unit_cost.is_none());
        assert!(component.validate().is_ok());
    }

    #[test]
    fn test_zero_quantity_fails_validation() {
        let mut component = Component::from_part("HS-40", "Heatsink");
        component.quantity = 0;
        assert!(component.validate().is_err());
    }

    #[test]
    fn test_document_consistency() {
        let mut doc = sample_doc();
        assert!(doc.is_consistent());
        assert_eq!(doc.category_names(), vec!["LED", "Trim"]);

        doc.total_components = 3;
        assert!(!doc.is_consistent());
    }
}
