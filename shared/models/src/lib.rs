//! Shared domain models for the Lumera BOM platform.

pub mod bom;
pub mod catalog;

pub use bom::{BomDocument, CategoryGroup, Component, BOM_ID_PREFIX, PO_NOT_APPLICABLE, UNKNOWN_CODE};
pub use catalog::{CatalogRecord, ComponentSlot};
