//! Generative Fallback Adapter
//!
//! When no catalog match exists, a text-completion service synthesizes the
//! BOM. The engine depends only on the `CompletionClient` signature, not on
//! any specific provider. This path is non-deterministic; the only promise
//! is decode-or-fail with no silent defaults.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use lumera_models::{BomDocument, Component, PO_NOT_APPLICABLE};
use lumera_utils::{CompletionConfig, LumeraError, LumeraResult, UploadRow};

use crate::assembler::BomAssembler;

/// Abstract completion capability.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    async fn complete(&self, prompt: &str, max_tokens: u32, temperature: f32)
        -> LumeraResult<String>;
}

/// OpenAI-style chat-completions client.
pub struct OpenAiClient {
    client: reqwest::Client,
    api_url: String,
    api_key: String,
    model: String,
}

impl OpenAiClient {
    pub fn new(config: &CompletionConfig) -> LumeraResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| LumeraError::configuration(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            api_url: config.api_url.clone(),
            api_key: config.api_key.clone(),
            model: config.model.clone(),
        })
    }
}

#[async_trait]
impl CompletionClient for OpenAiClient {
    async fn complete(
        &self,
        prompt: &str,
        max_tokens: u32,
        temperature: f32,
    ) -> LumeraResult<String> {
        let request = ChatRequest {
            model: self.model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: SYSTEM_PROMPT.to_string(),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: prompt.to_string(),
                },
            ],
            max_tokens,
            temperature,
        };

        let response = self
            .client
            .post(&self.api_url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| LumeraError::external_service("Completion API", e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(LumeraError::external_service(
                "Completion API",
                format!("{status}: {error_text}"),
            ));
        }

        let result: ChatResponse = response
            .json()
            .await
            .map_err(|e| LumeraError::external_service("Completion API", e.to_string()))?;

        result
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| LumeraError::external_service("Completion API", "No response content"))
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    content: String,
}

/// Fallback BOM generation over uploaded or free-form component rows.
pub struct GenerativeFallbackAdapter {
    client: Arc<dyn CompletionClient>,
    max_tokens: u32,
    temperature: f32,
}

impl GenerativeFallbackAdapter {
    pub fn new(client: Arc<dyn CompletionClient>, max_tokens: u32, temperature: f32) -> Self {
        Self {
            client,
            max_tokens,
            temperature,
        }
    }

    /// Generate a BOM from generic rows and a user hint.
    ///
    /// A malformed reply (no braces, undecodable JSON) is a hard
    /// `Generation` error, never an empty document: the reply cannot be
    /// repaired locally and "no data" must not look like "zero components".
    pub async fn generate(&self, rows: &[UploadRow], hint: &str) -> LumeraResult<BomDocument> {
        let prompt = build_prompt(rows, hint)?;
        debug!(rows = rows.len(), "Requesting BOM completion");

        let reply = self
            .client
            .complete(&prompt, self.max_tokens, self.temperature)
            .await?;

        let payload = extract_json(&reply)?;
        let generated: GeneratedBom = serde_json::from_str(payload)
            .map_err(|e| LumeraError::generation(format!("Reply could not be decoded: {e}")))?;

        Ok(generated.into_document())
    }
}

const SYSTEM_PROMPT: &str =
    "You are an expert LED lighting engineer specializing in Bill of Materials creation.";

fn build_prompt(rows: &[UploadRow], hint: &str) -> LumeraResult<String> {
    let serialized = serde_json::to_string_pretty(rows)
        .map_err(|e| LumeraError::generation(format!("Failed to serialize input rows: {e}")))?;

    Ok(format!(
        r#"You are an expert LED lighting engineer creating a Bill of Materials (BOM) for LED light components.

LED Data provided:
{serialized}

User requirements: {hint}

Please create a comprehensive BOM that includes:
1. Component categories (LED Chips, Optics, Thermal Management, Electrical, Mechanical, Control)
2. Specific part numbers, descriptions, quantities, and suppliers
3. Cost estimates where applicable
4. Technical specifications

Format the response as a structured JSON with the following structure:
{{
    "bom_id": "BOM-001",
    "project_name": "LED Light Assembly",
    "total_components": 0,
    "estimated_cost": "$0.00",
    "categories": [
        {{
            "category": "LED Chips",
            "components": [
                {{
                    "part_number": "string",
                    "description": "string",
                    "quantity": 0,
                    "unit_cost": "$0.00",
                    "total_cost": "$0.00",
                    "supplier": "string",
                    "specifications": {{}}
                }}
            ]
        }}
    ]
}}"#
    ))
}

/// Locate the JSON object embedded in a free-text reply.
///
/// Deliberately isolated: the first-`{` / last-`}` contract is brittle and
/// slated for replacement with a schema-validated one, without touching
/// callers.
fn extract_json(text: &str) -> LumeraResult<&str> {
    let start = text.find('{');
    let end = text.rfind('}');
    match (start, end) {
        (Some(start), Some(end)) if start < end => Ok(&text[start..=end]),
        _ => Err(LumeraError::generation(
            "Reply contains no JSON object to decode",
        )),
    }
}

/// The shape the completion service is asked to produce.
///
/// `bom_id` and `categories` are required: a JSON object without them is
/// not a BOM, and decoding it into an empty document would turn "no data"
/// into "zero components".
#[derive(Debug, Deserialize)]
struct GeneratedBom {
    bom_id: String,
    #[serde(default = "default_project_name")]
    project_name: String,
    #[serde(default)]
    estimated_cost: Option<String>,
    categories: Vec<GeneratedCategory>,
}

#[derive(Debug, Deserialize)]
struct GeneratedCategory {
    category: String,
    #[serde(default)]
    components: Vec<GeneratedComponent>,
}

#[derive(Debug, Deserialize)]
struct GeneratedComponent {
    part_number: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default = "default_quantity")]
    quantity: u32,
    #[serde(default)]
    unit_cost: Option<String>,
    #[serde(default)]
    total_cost: Option<String>,
    #[serde(default)]
    supplier: Option<String>,
    #[serde(default)]
    specifications: std::collections::HashMap<String, serde_json::Value>,
}

fn default_project_name() -> String {
    "LED Light Assembly".to_string()
}

fn default_quantity() -> u32 {
    1
}

impl GeneratedBom {
    /// Coerce the decoded reply into the normalized document shape.
    ///
    /// Counts are recomputed from the decoded components rather than
    /// trusted, so the counting invariants hold on this path too.
    fn into_document(self) -> BomDocument {
        let raw_components: Vec<Component> = self
            .categories
            .into_iter()
            .flat_map(|group| {
                let category = group.category;
                group.components.into_iter().map(move |c| Component {
                    description: c
                        .description
                        .filter(|d| !d.trim().is_empty())
                        .unwrap_or_else(|| c.part_number.clone()),
                    part_number: c.part_number,
                    category: category.clone(),
                    quantity: c.quantity.max(1),
                    unit_cost: c.unit_cost,
                    total_cost: c.total_cost,
                    supplier: c.supplier,
                    specifications: c.specifications,
                })
            })
            .collect();

        BomDocument {
            bom_id: self.bom_id,
            model_name: "Unknown".to_string(),
            qr_code: "Unknown".to_string(),
            po_number: PO_NOT_APPLICABLE.to_string(),
            total_components: raw_components.len(),
            categories: BomAssembler::group_components(&raw_components),
            raw_components,
            estimated_cost: self.estimated_cost,
            project_name: self.project_name,
        }
    }
}
