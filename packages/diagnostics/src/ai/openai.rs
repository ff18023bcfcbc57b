//! OpenAI implementation of the `FieldExtractor` trait.
//!
//! Sends the excerpt to the chat completions endpoint with a strict
//! `json_schema` response format generated from [`FallbackSchema`].
//!
//! # Example
//!
//! ```rust,ignore
//! use diagnostics::ai::OpenAiFieldExtractor;
//!
//! let extractor = OpenAiFieldExtractor::new("sk-...").with_model("gpt-4o-mini");
//! let processor = Processor::new(store, extractor);
//! ```

use async_trait::async_trait;
use reqwest::Client;
use schemars::schema_for;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::error::{DiagnosticsError, Result};
use crate::pipeline::fallback::FallbackSchema;
use crate::traits::extractor::FieldExtractor;

const SYSTEM_PROMPT: &str = "\
You read hardware diagnostic logs (CrystalDiskInfo, smartctl, AIDA64, HWiNFO, HWMonitor), \
in English or Portuguese, and report hardware attributes. \
Use null for anything the log does not state. Do not guess. \
Sizes are in gigabytes (1 TB = 1024 GB), temperatures in Celsius, \
speeds in MHz, percentages as numbers from 0 to 100. \
cpu_temp_max_c is the highest CPU temperature in the log. \
battery_wear_percent is battery wear, not remaining capacity.";

/// OpenAI-backed field extractor.
#[derive(Clone)]
pub struct OpenAiFieldExtractor {
    client: Client,
    api_key: SecretString,
    model: String,
    base_url: String,
}

impl OpenAiFieldExtractor {
    /// Create a new extractor with the given API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: SecretString::from(api_key.into()),
            model: "gpt-4o-mini".to_string(),
            base_url: "https://api.openai.com/v1".to_string(),
        }
    }

    /// Create from environment variable `OPENAI_API_KEY`.
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("OPENAI_API_KEY")
            .map_err(|_| DiagnosticsError::Config("OPENAI_API_KEY not set".into()))?;
        Ok(Self::new(api_key))
    }

    /// Set the chat model (default: gpt-4o-mini).
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Set a custom base URL (for Azure, proxies, etc.).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Use a preconfigured HTTP client (timeouts, proxies).
    pub fn with_client(mut self, client: Client) -> Self {
        self.client = client;
        self
    }

    /// Get the current model name.
    pub fn model(&self) -> &str {
        &self.model
    }
}

/// Strict-mode schema for the fallback response.
///
/// OpenAI strict mode wants `additionalProperties: false` and every
/// property listed in `required`; nullability comes from the types.
pub fn response_schema() -> Result<Value> {
    let mut value = serde_json::to_value(schema_for!(FallbackSchema))?;
    if let Value::Object(map) = &mut value {
        map.remove("$schema");
        map.remove("definitions");
        map.insert("additionalProperties".to_string(), Value::Bool(false));
        let keys: Vec<Value> = map
            .get("properties")
            .and_then(Value::as_object)
            .map(|props| props.keys().cloned().map(Value::String).collect())
            .unwrap_or_default();
        map.insert("required".to_string(), Value::Array(keys));
    }
    Ok(value)
}

#[derive(Serialize)]
struct StructuredRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f32,
    response_format: ResponseFormat,
}

#[derive(Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    format_type: String,
    json_schema: JsonSchemaFormat,
}

#[derive(Serialize)]
struct JsonSchemaFormat {
    name: String,
    strict: bool,
    schema: Value,
}

#[derive(Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[async_trait]
impl FieldExtractor for OpenAiFieldExtractor {
    async fn extract_fields(&self, excerpt: &str) -> Result<Value> {
        let request = StructuredRequest {
            model: self.model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: SYSTEM_PROMPT.to_string(),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: excerpt.to_string(),
                },
            ],
            temperature: 0.0,
            response_format: ResponseFormat {
                format_type: "json_schema".to_string(),
                json_schema: JsonSchemaFormat {
                    name: "hardware_fields".to_string(),
                    strict: true,
                    schema: response_schema()?,
                },
            },
        };

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .header(
                "Authorization",
                format!("Bearer {}", self.api_key.expose_secret()),
            )
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| DiagnosticsError::Fallback(e.to_string().into()))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(DiagnosticsError::Fallback(
                format!("OpenAI API error ({status}): {error_text}").into(),
            ));
        }

        let chat_response: ChatResponse = response
            .json()
            .await
            .map_err(|e| DiagnosticsError::Fallback(e.to_string().into()))?;

        let content = chat_response
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| DiagnosticsError::Fallback("No response from OpenAI".into()))?;

        debug!(model = %self.model, response_len = content.len(), "Fallback service responded");

        serde_json::from_str(&content).map_err(|e| DiagnosticsError::Schema {
            reason: format!("response is not JSON: {e}"),
        })
    }
}
