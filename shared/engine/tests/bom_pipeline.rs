//! End-to-end engine tests: catalog load, resolution, assembly, rendering.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{TimeZone, Utc};

use lumera_engine::{
    BomAssembler, CatalogStore, CompletionClient, GenerativeFallbackAdapter, ModelResolver,
    ReportRenderer,
};
use lumera_models::PO_NOT_APPLICABLE;
use lumera_utils::{LumeraResult, UploadParser};

fn fixture_store() -> CatalogStore {
    let path = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/catalog.csv");
    CatalogStore::load(path)
}

#[test]
fn test_fixture_load_applies_cleaning_policy() {
    let store = fixture_store();
    assert!(store.is_available());
    // Six source rows: one has no model, one duplicates TX-100's model,
    // one duplicates TX-200's code. Three survive.
    assert_eq!(store.len(), 3);
    assert_eq!(store.get_by_model("TX-100").unwrap().code, "1001");
    assert_eq!(store.get_by_code("1002").unwrap().model, "TX-200");
    assert!(store.get_by_model("TX-300").is_none());
}

#[test]
fn test_resolve_then_assemble_worked_example() {
    let store = fixture_store();
    let resolver = ModelResolver::new(&store);

    let record = resolver.resolve("TX-100").unwrap();
    let doc = BomAssembler::from_catalog_record(record, None);

    assert_eq!(doc.bom_id, "BOM-1001");
    assert_eq!(doc.total_components, 3);
    assert_eq!(doc.category_names(), vec!["LED", "Heatsink", "Trim"]);
    assert_eq!(doc.po_number, PO_NOT_APPLICABLE);
    assert!(doc.is_consistent());
}

#[test]
fn test_lowercase_query_falls_through_to_substring_stage() {
    let store = fixture_store();
    let resolver = ModelResolver::new(&store);

    let direct = resolver.resolve("TX-100").unwrap();
    let relaxed = resolver.resolve("tx-100").unwrap();
    assert_eq!(direct, relaxed);
}

#[test]
fn test_unresolved_query_yields_suggestions_or_nothing() {
    let store = fixture_store();
    let resolver = ModelResolver::new(&store);

    assert!(resolver.resolve("ZZZ-999").is_none());
    assert!(resolver.suggest("ZZZ-999", 5).is_empty());

    let suggestions = resolver.suggest("tx", 5);
    assert_eq!(suggestions, vec!["TX-100".to_string(), "TX-200".to_string()]);
}

#[test]
fn test_two_phase_po_confirmation() {
    let store = fixture_store();
    let resolver = ModelResolver::new(&store);
    let record = resolver.resolve("TX-200").unwrap();

    // First call without a PO number must not bake a default into a BOM
    // that the confirming call would contradict.
    let preview = BomAssembler::from_catalog_record(record, None);
    let confirmed = BomAssembler::from_catalog_record(record, Some("PO-2024-17"));

    assert_eq!(preview.po_number, PO_NOT_APPLICABLE);
    assert_eq!(confirmed.po_number, "PO-2024-17");
    assert_eq!(preview.raw_components, confirmed.raw_components);
}

#[test]
fn test_catalog_document_renders() {
    let store = fixture_store();
    let resolver = ModelResolver::new(&store);
    let doc = BomAssembler::from_catalog_record(resolver.resolve("TX-200").unwrap(), Some("PO-7"));

    let renderer = ReportRenderer::new().unwrap();
    let stamp = Utc.with_ymd_and_hms(2025, 9, 2, 8, 0, 0).unwrap();
    let html = String::from_utf8(renderer.render_at(&doc, stamp).unwrap()).unwrap();

    assert!(html.contains("BOM-1002"));
    assert!(html.contains("PO-7"));
    for component in &doc.raw_components {
        assert!(html.contains(&component.part_number));
    }
}

struct CannedClient(String);

#[async_trait]
impl CompletionClient for CannedClient {
    async fn complete(&self, _: &str, _: u32, _: f32) -> LumeraResult<String> {
        Ok(self.0.clone())
    }
}

#[tokio::test]
async fn test_upload_to_generative_path() {
    let csv = b"model,type,wattage\nNOVA-9,COB LED,20W";
    let upload = UploadParser::new().parse_bytes("leds.csv", csv, None).unwrap();

    let reply = r#"{
        "bom_id": "BOM-GEN-1",
        "project_name": "COB Assembly",
        "categories": [
            {"category": "LED Chips", "components": [{"part_number": "COB-20", "quantity": 1}]}
        ]
    }"#;
    let adapter = GenerativeFallbackAdapter::new(Arc::new(CannedClient(reply.to_string())), 2000, 0.7);

    let doc = adapter.generate(&upload.rows, "").await.unwrap();
    assert_eq!(doc.bom_id, "BOM-GEN-1");
    assert_eq!(doc.total_components, 1);
    assert!(doc.is_consistent());

    // The generative document renders through the same template.
    let renderer = ReportRenderer::new().unwrap();
    assert!(renderer.render(&doc).is_ok());
}
