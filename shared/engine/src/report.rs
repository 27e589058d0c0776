//! Report Renderer
//!
//! Formats a BOM document into a paginated, print-ready byte stream using a
//! fixed handlebars template. Pure formatting: section order is fixed and
//! there is no decision logic beyond the empty-category notice.

use chrono::{DateTime, Utc};
use handlebars::Handlebars;
use serde::Serialize;

use lumera_models::BomDocument;
use lumera_utils::{LumeraError, LumeraResult};

const TEMPLATE_NAME: &str = "bom_report";

/// Fixed section order: title, project metadata table, one heading plus
/// component table per category (explicit notice for an empty category),
/// sign-off block, footer.
const REPORT_TEMPLATE: &str = r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8">
<title>{{bom_id}}</title>
<style>
@page { size: A4; margin: 25mm 18mm; }
body { font-family: Helvetica, Arial, sans-serif; color: #1f2937; font-size: 10pt; }
h1 { text-align: center; color: #1e3a8a; font-size: 14pt; margin-bottom: 12pt; }
h2 { color: #1e3a8a; font-size: 10pt; margin: 10pt 0 4pt 0; }
table { border-collapse: collapse; margin-bottom: 8pt; }
td, th { border: 1px solid #111; padding: 4pt 6pt; font-size: 8pt; text-align: left; }
.meta th { background: #e5e7eb; font-weight: bold; width: 110pt; }
.meta td { background: #f5f5dc; width: 220pt; }
.components th { background: #1e3a8a; color: #f8fafc; text-align: center; }
.components td { background: #f5f5dc; text-align: center; font-size: 7pt; }
.category { page-break-inside: avoid; }
.empty { font-size: 9pt; }
.signoff td { border: none; border-bottom: 1px solid #111; padding: 10pt 0; font-size: 9pt; width: 220pt; }
.footer { text-align: center; font-size: 8pt; margin-top: 10pt; }
</style>
</head>
<body>
<h1>LED BILL OF MATERIALS</h1>
<table class="meta">
<tr><th>BOM ID:</th><td>{{bom_id}}</td></tr>
<tr><th>Project:</th><td>{{project_name}}</td></tr>
<tr><th>Model:</th><td>{{model_name}}</td></tr>
<tr><th>QR Code:</th><td>{{qr_code}}</td></tr>
<tr><th>P.O. Number:</th><td>{{po_number}}</td></tr>
<tr><th>Total Components:</th><td>{{total_components}}</td></tr>
<tr><th>Generated:</th><td>{{generated}}</td></tr>
</table>
{{#each categories}}
<div class="category">
<h2>{{category}}</h2>
{{#if empty}}
<p class="empty">No components in this section.</p>
{{else}}
<table class="components">
<tr><th>Part Number</th><th>Quantity</th></tr>
{{#each components}}
<tr><td>{{part_number}}</td><td>{{quantity}}</td></tr>
{{/each}}
</table>
{{/if}}
</div>
{{/each}}
<table class="signoff">
<tr><td>Done By: _________________________</td><td>Date: _________________________</td></tr>
</table>
<p class="footer">Generated by Lumera BOM Generator</p>
</body>
</html>
"#;

#[derive(Debug, Serialize)]
struct ReportContext {
    bom_id: String,
    project_name: String,
    model_name: String,
    qr_code: String,
    po_number: String,
    total_components: usize,
    generated: String,
    categories: Vec<CategoryContext>,
}

#[derive(Debug, Serialize)]
struct CategoryContext {
    category: String,
    empty: bool,
    components: Vec<ComponentRow>,
}

#[derive(Debug, Serialize)]
struct ComponentRow {
    part_number: String,
    quantity: u32,
}

pub struct ReportRenderer {
    handlebars: Handlebars<'static>,
}

impl ReportRenderer {
    pub fn new() -> LumeraResult<Self> {
        let mut handlebars = Handlebars::new();
        handlebars
            .register_template_string(TEMPLATE_NAME, REPORT_TEMPLATE)
            .map_err(|e| LumeraError::render(format!("Failed to register template: {e}")))?;
        Ok(Self { handlebars })
    }

    /// Render the document with the current time as the generation stamp.
    pub fn render(&self, doc: &BomDocument) -> LumeraResult<Vec<u8>> {
        self.render_at(doc, Utc::now())
    }

    /// Render with an explicit generation stamp; output is deterministic for
    /// a given document and timestamp.
    pub fn render_at(&self, doc: &BomDocument, generated_at: DateTime<Utc>) -> LumeraResult<Vec<u8>> {
        if !doc.is_consistent() {
            return Err(LumeraError::render(format!(
                "Document shape is inconsistent: total_components={} raw={} grouped={}",
                doc.total_components,
                doc.raw_components.len(),
                doc.grouped_component_count()
            )));
        }

        let context = ReportContext {
            bom_id: doc.bom_id.clone(),
            project_name: doc.project_name.clone(),
            model_name: doc.model_name.clone(),
            qr_code: doc.qr_code.clone(),
            po_number: doc.po_number.clone(),
            total_components: doc.total_components,
            generated: generated_at.format("%Y-%m-%d %H:%M:%S").to_string(),
            categories: doc
                .categories
                .iter()
                .map(|group| CategoryContext {
                    category: group.category.clone(),
                    empty: group.components.is_empty(),
                    components: group
                        .components
                        .iter()
                        .map(|c| ComponentRow {
                            part_number: c.part_number.clone(),
                            quantity: c.quantity,
                        })
                        .collect(),
                })
                .collect(),
        };

        let html = self
            .handlebars
            .render(TEMPLATE_NAME, &context)
            .map_err(|e| LumeraError::render(format!("Template rendering failed: {e}")))?;

        Ok(html.into_bytes())
    }

    /// Deterministic export filename: bom id, model name with spaces
    /// replaced, and the generation timestamp.
    pub fn export_filename(doc: &BomDocument, generated_at: DateTime<Utc>) -> String {
        format!(
            "{}_{}_{}.html",
            doc.bom_id.replace(' ', "_"),
            doc.model_name.replace(' ', "_"),
            generated_at.format("%Y%m%d_%H%M%S")
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use lumera_models::{CategoryGroup, Component, PO_NOT_APPLICABLE};

    fn sample_doc() -> BomDocument {
        let led = Component::from_part("CREE-XPL", "LED");
        BomDocument {
            bom_id: "BOM-1001".to_string(),
            project_name: "LED Model: TX-100".to_string(),
            model_name: "TX-100 Pro Max".to_string(),
            qr_code: "1001".to_string(),
            po_number: PO_NOT_APPLICABLE.to_string(),
            total_components: 1,
            categories: vec![
                CategoryGroup { category: "LED".to_string(), components: vec![led.clone()] },
                CategoryGroup { category: "Trim".to_string(), components: vec![] },
            ],
            raw_components: vec![led],
            estimated_cost: None,
        }
    }

    fn stamp() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 9, 2, 10, 30, 0).unwrap()
    }

    #[test]
    fn test_sections_appear_in_fixed_order() {
        let mut doc = sample_doc();
        // An empty categories entry is legal as long as the counts agree;
        // drop the empty Trim group for this check.
        doc.categories.pop();

        let renderer = ReportRenderer::new().unwrap();
        let bytes = renderer.render_at(&doc, stamp()).unwrap();
        let html = String::from_utf8(bytes).unwrap();

        let title = html.find("LED BILL OF MATERIALS").unwrap();
        let meta = html.find("BOM ID:").unwrap();
        let category = html.find("<h2>LED</h2>").unwrap();
        let signoff = html.find("Done By:").unwrap();
        let footer = html.find("Generated by Lumera BOM Generator").unwrap();
        assert!(title < meta && meta < category && category < signoff && signoff < footer);
        assert!(html.contains("CREE-XPL"));
        assert!(html.contains("2025-09-02 10:30:00"));
    }

    #[test]
    fn test_empty_category_gets_explicit_notice() {
        let renderer = ReportRenderer::new().unwrap();
        let bytes = renderer.render_at(&sample_doc(), stamp()).unwrap();
        let html = String::from_utf8(bytes).unwrap();

        assert!(html.contains("<h2>Trim</h2>"));
        assert!(html.contains("No components in this section."));
    }

    #[test]
    fn test_rendering_is_deterministic_for_fixed_stamp() {
        let renderer = ReportRenderer::new().unwrap();
        let doc = sample_doc();
        let first = renderer.render_at(&doc, stamp()).unwrap();
        let second = renderer.render_at(&doc, stamp()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_inconsistent_document_is_rejected() {
        let mut doc = sample_doc();
        doc.total_components = 5;

        let renderer = ReportRenderer::new().unwrap();
        let err = renderer.render_at(&doc, stamp()).unwrap_err();
        assert_eq!(err.error_code(), "RENDER_ERROR");
    }

    #[test]
    fn test_export_filename_contract() {
        let filename = ReportRenderer::export_filename(&sample_doc(), stamp());
        assert_eq!(filename, "BOM-1001_TX-100_Pro_Max_20250902_103000.html");
    }
}
