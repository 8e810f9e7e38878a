//! Structured extraction: raw resume text in, candidate structured JSON out.
//!
//! `AppState` holds an `Arc<dyn StructuredExtractor>`; the default backend is the LLM.

use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, warn};

use crate::extraction::prompts::build_extraction_prompt;
use crate::llm_client::prompts::JSON_ONLY_SYSTEM;
use crate::llm_client::{LlmClient, LlmError};

// ────────────────────────────────────────────────────────────────────────────
// Result type
// ────────────────────────────────────────────────────────────────────────────

/// Outcome of one extraction call. Failures are data, not errors: the ingest path turns
/// them into an empty-payload record.
#[derive(Debug, Clone, PartialEq)]
pub enum ExtractionResult {
    Success(Value),
    Failure(String),
}

// ────────────────────────────────────────────────────────────────────────────
// Trait definition
// ────────────────────────────────────────────────────────────────────────────

#[async_trait]
pub trait StructuredExtractor: Send + Sync {
    async fn extract(&self, text: &str) -> ExtractionResult;
}

// ────────────────────────────────────────────────────────────────────────────
// LlmExtractor: default implementation
// ────────────────────────────────────────────────────────────────────────────

pub const EXTRACTION_TEMPERATURE: f32 = 0.3;

pub struct LlmExtractor {
    llm: LlmClient,
}

impl LlmExtractor {
    pub fn new(llm: LlmClient) -> Self {
        Self { llm }
    }
}

#[async_trait]
impl StructuredExtractor for LlmExtractor {
    async fn extract(&self, text: &str) -> ExtractionResult {
        let prompt = build_extraction_prompt(text);
        classify_reply(self.llm.call_json(&prompt, JSON_ONLY_SYSTEM).await)
    }
}

/// Only a JSON object counts as a structured reply.
fn classify_reply(reply: Result<Value, LlmError>) -> ExtractionResult {
    match reply {
        Ok(Value::Object(map)) => {
            debug!("Structured extraction returned {} top-level keys", map.len());
            ExtractionResult::Success(Value::Object(map))
        }
        Ok(_) => {
            warn!("Structured extraction returned JSON that is not an object");
            ExtractionResult::Failure("extraction reply was not a JSON object".to_string())
        }
        Err(e) => {
            warn!("Structured extraction failed: {e}");
            ExtractionResult::Failure(e.to_string())
        }
    }
}
