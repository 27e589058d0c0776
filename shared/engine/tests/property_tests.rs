//! Property-based tests for the catalog and assembly invariants.

use proptest::prelude::*;
use std::collections::HashSet;

use lumera_engine::{BomAssembler, CatalogStore, ModelResolver};
use lumera_models::{CatalogRecord, Component};

fn record_strategy() -> impl Strategy<Value = CatalogRecord> {
    ("[A-Z]{2}-[0-9]{2,4}", "[0-9]{3,5}", proptest::option::of("[A-Z]{2,6}-[0-9]{1,3}"))
        .prop_map(|(model, code, led)| {
            let mut record = CatalogRecord::new(model, code);
            record.led = led;
            record
        })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// After load, `by_model` and `by_code` contain no duplicate keys and
    /// every key maps to exactly one record.
    #[test]
    fn prop_indexes_have_unique_keys(records in proptest::collection::vec(record_strategy(), 0..40)) {
        let store = CatalogStore::from_records(records);

        let models: HashSet<_> = store.records().iter().map(|r| r.model.clone()).collect();
        let codes: HashSet<_> = store.records().iter().map(|r| r.code.clone()).collect();
        prop_assert_eq!(models.len(), store.len());
        prop_assert_eq!(codes.len(), store.len());

        for record in store.records() {
            prop_assert_eq!(store.get_by_model(&record.model).unwrap(), record);
            prop_assert_eq!(store.get_by_code(&record.code).unwrap(), record);
        }
    }

    /// Deduplication keeps the first occurrence of a model.
    #[test]
    fn prop_dedup_keeps_first(records in proptest::collection::vec(record_strategy(), 1..40)) {
        let originals = records.clone();
        let store = CatalogStore::from_records(records);

        for kept in store.records() {
            let first = originals.iter().find(|r| r.model == kept.model).unwrap();
            prop_assert_eq!(&first.code, &kept.code);
        }
    }

    /// Assembly is idempotent and its counts are internally consistent.
    #[test]
    fn prop_assembly_counts_are_consistent(record in record_strategy(), po in proptest::option::of("[A-Z]{2}-[0-9]{3}")) {
        let first = BomAssembler::from_catalog_record(&record, po.as_deref());
        let second = BomAssembler::from_catalog_record(&record, po.as_deref());

        prop_assert_eq!(&first, &second);
        prop_assert_eq!(first.total_components, first.raw_components.len());
        prop_assert_eq!(first.grouped_component_count(), first.total_components);
    }

    /// Grouping never loses or invents components, and category order is
    /// first-seen.
    #[test]
    fn prop_grouping_preserves_components(
        parts in proptest::collection::vec(("[A-Z]{2}-[0-9]{2}", "(LED|Trim|Optics|Thermal)"), 0..30)
    ) {
        let components: Vec<Component> = parts
            .iter()
            .map(|(part, category)| Component::from_part(part.clone(), category.clone()))
            .collect();

        let groups = BomAssembler::group_components(&components);

        let grouped: usize = groups.iter().map(|g| g.components.len()).sum();
        prop_assert_eq!(grouped, components.len());

        // First-seen category order matches the order of first appearance.
        let mut seen = Vec::new();
        for component in &components {
            if !seen.contains(&component.category) {
                seen.push(component.category.clone());
            }
        }
        let group_order: Vec<String> = groups.iter().map(|g| g.category.clone()).collect();
        prop_assert_eq!(group_order, seen);
    }

    /// Suggestions are bounded by `limit` and drawn from existing models.
    #[test]
    fn prop_suggestions_are_bounded(
        records in proptest::collection::vec(record_strategy(), 0..40),
        query in "[A-Za-z0-9-]{1,8}",
        limit in 0usize..10
    ) {
        let store = CatalogStore::from_records(records);
        let resolver = ModelResolver::new(&store);

        let suggestions = resolver.suggest(&query, limit);
        prop_assert!(suggestions.len() <= limit);

        let models: HashSet<_> = store.records().iter().map(|r| r.model.clone()).collect();
        for suggestion in &suggestions {
            prop_assert!(models.contains(suggestion));
        }
    }
}
