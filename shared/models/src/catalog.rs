//! Catalog domain models for the Lumera BOM platform.
//!
//! A catalog record is one row of the luminaire reference table: a model
//! name, its QR code, and a fixed set of component slots mapped from the
//! source spreadsheet columns.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// The fixed component-slot columns of the reference catalog.
///
/// `ALL` defines the canonical iteration order used when a record is
/// assembled into a BOM, so category order is stable across requests. The
/// LED leads: it is the defining component of a luminaire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ComponentSlot {
    Heatsink,
    Trim,
    LensReflector,
    LensHolder,
    LedBracket,
    Led,
}

impl ComponentSlot {
    pub const ALL: [ComponentSlot; 6] = [
        ComponentSlot::Led,
        ComponentSlot::Heatsink,
        ComponentSlot::Trim,
        ComponentSlot::LensReflector,
        ComponentSlot::LensHolder,
        ComponentSlot::LedBracket,
    ];

    /// The source spreadsheet column header, used verbatim as the BOM
    /// category name.
    pub fn label(self) -> &'static str {
        match self {
            ComponentSlot::Heatsink => "Heatsink",
            ComponentSlot::Trim => "Trim",
            ComponentSlot::LensReflector => "Lens / reflector",
            ComponentSlot::LensHolder => "Lens holder or glass",
            ComponentSlot::LedBracket => "LED bracket",
            ComponentSlot::Led => "LED",
        }
    }

    /// Match a source column header to a slot, ignoring case and
    /// surrounding whitespace.
    pub fn from_column(name: &str) -> Option<Self> {
        let normalized = name.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|slot| slot.label().to_lowercase() == normalized)
    }
}

/// One row of the reference catalog.
///
/// `model` and `code` are unique within a loaded snapshot (enforced by
/// keep-first deduplication at load time). `code` is always stored as text,
/// even when the source cell is numeric, so lookups compare consistently.
/// Columns that are not the model, the code, or a known component slot are
/// kept in `extra` rather than silently dropped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogRecord {
    pub model: String,
    pub code: String,
    pub heatsink: Option<String>,
    pub trim: Option<String>,
    pub lens_reflector: Option<String>,
    pub lens_holder: Option<String>,
    pub led_bracket: Option<String>,
    pub led: Option<String>,
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub extra: HashMap<String, String>,
}

impl CatalogRecord {
    pub fn new(model: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            code: code.into(),
            heatsink: None,
            trim: None,
            lens_reflector: None,
            lens_holder: None,
            led_bracket: None,
            led: None,
            extra: HashMap::new(),
        }
    }

    pub fn slot(&self, slot: ComponentSlot) -> Option<&str> {
        let value = match slot {
            ComponentSlot::Heatsink => &self.heatsink,
            ComponentSlot::Trim => &self.trim,
            ComponentSlot::LensReflector => &self.lens_reflector,
            ComponentSlot::LensHolder => &self.lens_holder,
            ComponentSlot::LedBracket => &self.led_bracket,
            ComponentSlot::Led => &self.led,
        };
        value.as_deref().map(str::trim).filter(|v| !v.is_empty())
    }

    pub fn set_slot(&mut self, slot: ComponentSlot, value: impl Into<String>) {
        let value = Some(value.into());
        match slot {
            ComponentSlot::Heatsink => self.heatsink = value,
            ComponentSlot::Trim => self.trim = value,
            ComponentSlot::LensReflector => self.lens_reflector = value,
            ComponentSlot::LensHolder => self.lens_holder = value,
            ComponentSlot::LedBracket => self.led_bracket = value,
            ComponentSlot::Led => self.led = value,
        }
    }

    /// Populated slots in canonical order, with the slot label attached.
    pub fn populated_slots(&self) -> impl Iterator<Item = (ComponentSlot, &str)> {
        ComponentSlot::ALL
            .into_iter()
            .filter_map(|slot| self.slot(slot).map(|value| (slot, value)))
    }
}
