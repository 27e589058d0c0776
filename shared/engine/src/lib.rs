//! Lumera BOM Engine
//!
//! The two-path BOM assembly core: catalog lookup with suggestion fallback
//! on one side, generative completion on the other, both funneling into the
//! same normalized document shape.

pub mod assembler;
pub mod catalog;
pub mod generative;
pub mod report;
pub mod resolver;

pub use assembler::BomAssembler;
pub use catalog::CatalogStore;
pub use generative::{CompletionClient, GenerativeFallbackAdapter, OpenAiClient};
pub use report::ReportRenderer;
pub use resolver::ModelResolver;
