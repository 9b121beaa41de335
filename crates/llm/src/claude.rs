//! Claude messages API client for report extraction

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use fieldreport_core::{ExtractionError, ExtractionRequest, ExtractionService};

const ANTHROPIC_VERSION: &str = "2023-06-01";
const DEFAULT_BASE_URL: &str = "https://api.anthropic.com";
const DEFAULT_MODEL: &str = "claude-3-5-haiku-latest";
const DEFAULT_MAX_TOKENS: u32 = 2048;

/// Extraction service backed by the Anthropic messages endpoint.
#[derive(Debug, Clone)]
pub struct ClaudeExtractor {
    client: Client,
    base_url: String,
    api_key: String,
    model: String,
    max_tokens: u32,
    system_prompt: String,
}

#[derive(Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    system: &'a str,
    messages: Vec<Message<'a>>,
}

#[derive(Serialize)]
struct Message<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Deserialize)]
struct MessagesResponse {
    content: Vec<ContentBlock>,
}

#[derive(Deserialize)]
struct ContentBlock {
    #[serde(default)]
    text: String,
}

impl ClaudeExtractor {
    pub fn new(api_key: impl Into<String>, system_prompt: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: api_key.into(),
            model: DEFAULT_MODEL.to_string(),
            max_tokens: DEFAULT_MAX_TOKENS,
            system_prompt: system_prompt.into(),
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    /// System text for one call: the base prompt plus the request's
    /// expected-sections description, when one is given.
    fn system_for(&self, sections: &str) -> String {
        if sections.is_empty() {
            return self.system_prompt.clone();
        }
        format!(
            "{}\n\nSections attendues dans le rapport: {}",
            self.system_prompt, sections
        )
    }
}

#[async_trait]
impl ExtractionService for ClaudeExtractor {
    #[instrument(skip_all, fields(model = %self.model))]
    async fn extract(&self, request: ExtractionRequest) -> Result<String, ExtractionError> {
        let system = self.system_for(&request.sections);
        let body = MessagesRequest {
            model: &self.model,
            max_tokens: self.max_tokens,
            system: &system,
            messages: vec![Message {
                role: "user",
                content: &request.transcript,
            }],
        };

        let response = self
            .client
            .post(format!("{}/v1/messages", self.base_url))
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&body)
            .send()
            .await
            .map_err(|err| ExtractionError::Request(err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ExtractionError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: MessagesResponse = response
            .json()
            .await
            .map_err(|err| ExtractionError::Malformed(err.to_string()))?;

        let text = parsed
            .content
            .into_iter()
            .map(|block| block.text)
            .collect::<String>();
        if text.is_empty() {
            return Err(ExtractionError::Malformed("empty content".into()));
        }
        debug!(chars = text.len(), "extraction response received");
        Ok(text)
    }
}
