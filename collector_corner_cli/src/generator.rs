use crate::error::GenerationError;
use crate::month::EditionMonth;
use crate::sections::{GeneratedDocument, SectionLabel};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use serde::Deserialize;
use serde_json::json;
use std::{sync::Arc, time::Duration};
use tracing::{info, warn};

pub const TEMPERATURE: f64 = 0.7;
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_COMPLETION_TIMEOUT: Duration = Duration::from_secs(60);

/// Opaque text completion backend: one prompt in, free text out.
#[async_trait]
pub trait CompletionService: Send + Sync {
    async fn complete(&self, prompt: &str) -> Result<String, GenerationError>;
}

/// OpenAI chat completions, one user message per call.
pub struct OpenAiCompletion {
    client: reqwest::Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl OpenAiCompletion {
    pub fn new(api_key: String, timeout: Duration) -> Result<Self, reqwest::Error> {
        Ok(Self {
            client: reqwest::Client::builder().timeout(timeout).build()?,
            api_key,
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
        })
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Deserialize)]
struct ChatMessage {
    content: Option<String>,
}

#[async_trait]
impl CompletionService for OpenAiCompletion {
    async fn complete(&self, prompt: &str) -> Result<String, GenerationError> {
        let mut headers = HeaderMap::new();
        let bearer = HeaderValue::from_str(&format!("Bearer {}", self.api_key))
            .map_err(|e| GenerationError::InvalidApiKey(e.to_string()))?;
        headers.insert(AUTHORIZATION, bearer);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let payload = json!({
            "model": self.model,
            "messages": [
                { "role": "user", "content": prompt }
            ],
            "temperature": TEMPERATURE,
        });

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .headers(headers)
            .json(&payload)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = match response.text().await {
                Ok(body) => body,
                Err(e) => {
                    warn!(%status, error = %e, "could not read completion error body");
                    String::new()
                }
            };
            return Err(GenerationError::Status { status, body });
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|e| GenerationError::MalformedResponse(e.to_string()))?;

        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| GenerationError::MalformedResponse("no message content in choices".into()))
    }
}

/// Builds the newsletter prompt and runs it through a [`CompletionService`].
#[derive(Clone)]
pub struct NarrativeGenerator {
    service: Arc<dyn CompletionService>,
}

impl NarrativeGenerator {
    pub fn new(service: Arc<dyn CompletionService>) -> Self {
        Self { service }
    }

    /// Exactly one completion call, no retry, no cache. The text comes back
    /// untouched.
    pub async fn generate(
        &self,
        raw_text: &str,
        month: EditionMonth,
    ) -> Result<GeneratedDocument, GenerationError> {
        let prompt = build_prompt(raw_text, month);
        info!(%month, input_chars = raw_text.chars().count(), "requesting newsletter draft");

        match self.service.complete(&prompt).await {
            Ok(text) => {
                info!(output_chars = text.chars().count(), "newsletter draft received");
                Ok(GeneratedDocument::new(text))
            }
            Err(e) => {
                warn!(error = %e, "newsletter generation failed");
                Err(e)
            }
        }
    }
}

pub fn build_prompt(raw_text: &str, month: EditionMonth) -> String {
    let [featured, valuation, just_in, buzz] = SectionLabel::ALL.map(SectionLabel::heading);
    format!(
        "You are writing the {month} edition of \"Collector's Corner\", the monthly newsletter of an independent vinyl record shop.\n\
         \n\
         Using the shop notes below, write exactly four sections, in this order, each starting with a markdown level-2 heading written exactly as shown:\n\
         \n\
         ## {featured}\n\
         One to three sentences spotlighting the standout pressing.\n\
         \n\
         ## {valuation}\n\
         One to three sentences of practical advice on valuing or identifying a pressing.\n\
         \n\
         ## {just_in}\n\
         A bulleted list of two or three new arrivals.\n\
         \n\
         ## {buzz}\n\
         One to three sentences of collector or industry news.\n\
         \n\
         Do not add any other headings, introductions or closing remarks.\n\
         \n\
         Shop notes:\n\
         {raw_text}\n"
    )
}
