//! BOM Assembler
//!
//! Maps a matched catalog record into the normalized BOM document shape.
//! This path is purely local and deterministic; the free-form path lives in
//! the generative adapter and only shares the grouping step defined here.

use lumera_models::{
    BomDocument, CategoryGroup, Component, ComponentSlot, CatalogRecord, BOM_ID_PREFIX,
    PO_NOT_APPLICABLE, UNKNOWN_CODE,
};

pub struct BomAssembler;

impl BomAssembler {
    /// Build a BOM from a catalog record.
    ///
    /// One component per populated slot, quantity always 1 (the catalog
    /// models presence, not count), category names taken verbatim from the
    /// slot labels. Calling this twice with the same inputs yields
    /// field-for-field equal documents.
    pub fn from_catalog_record(record: &CatalogRecord, po_number: Option<&str>) -> BomDocument {
        let components: Vec<Component> = ComponentSlot::ALL
            .into_iter()
            .filter_map(|slot| {
                record
                    .slot(slot)
                    .map(|value| Component::from_part(value, slot.label()))
            })
            .collect();

        let code = record.code.trim();
        let bom_id = if code.is_empty() {
            format!("{BOM_ID_PREFIX}{UNKNOWN_CODE}")
        } else {
            format!("{BOM_ID_PREFIX}{code}")
        };

        BomDocument {
            bom_id,
            project_name: format!("LED Model: {}", record.model),
            model_name: record.model.clone(),
            qr_code: if code.is_empty() {
                UNKNOWN_CODE.to_string()
            } else {
                code.to_string()
            },
            po_number: po_number
                .map(str::trim)
                .filter(|po| !po.is_empty())
                .unwrap_or(PO_NOT_APPLICABLE)
                .to_string(),
            total_components: components.len(),
            categories: Self::group_components(&components),
            raw_components: components,
            estimated_cost: None,
        }
    }

    /// Group components into category groups by first-seen category order.
    ///
    /// Shared by both assembly paths so grouping is identical regardless of
    /// where the component list came from.
    pub fn group_components(components: &[Component]) -> Vec<CategoryGroup> {
        let mut groups: Vec<CategoryGroup> = Vec::new();

        for component in components {
            match groups.iter_mut().find(|g| g.category == component.category) {
                Some(group) => group.components.push(component.clone()),
                None => groups.push(CategoryGroup {
                    category: component.category.clone(),
                    components: vec![component.clone()],
                }),
            }
        }

        groups
    }
}
