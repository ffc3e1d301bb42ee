use super::TextGenerator;
use crate::config::GeneratorConfig;
use crate::error::AugmentError;
use log::{debug, trace};
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

const MAX_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 1],
    temperature: f32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

/// Chat-completions client for OpenAI-compatible endpoints.
///
/// Every request is bounded by the configured timeout; a slow service fails
/// the call like any other error.
pub struct OpenAiGenerator {
    client: Client,
    endpoint: String,
    api_key: String,
    model: String,
    temperature: f32,
}

impl OpenAiGenerator {
    pub fn new(config: &GeneratorConfig) -> Result<Self, AugmentError> {
        let api_key = config.api_key.clone().ok_or(AugmentError::MissingApiKey)?;

        let mut builder = Client::builder()
            .connect_timeout(config.timeout.min(MAX_CONNECT_TIMEOUT))
            .timeout(config.timeout)
            .user_agent(concat!("docaudit/", env!("CARGO_PKG_VERSION")));
        if !config.use_proxy {
            builder = builder.no_proxy();
        }
        let client = builder
            .build()
            .map_err(|e| AugmentError::Client(e.to_string()))?;

        Ok(Self {
            client,
            endpoint: format!("{}/chat/completions", config.base_url.trim_end_matches('/')),
            api_key,
            model: config.model.clone(),
            temperature: config.temperature,
        })
    }
}

impl TextGenerator for OpenAiGenerator {
    fn name(&self) -> &str {
        "openai"
    }

    fn generate(&self, prompt: &str) -> Result<String, AugmentError> {
        debug!(
            "Requesting completion from {} ({} prompt bytes)",
            self.endpoint,
            prompt.len()
        );

        let request = ChatRequest {
            model: &self.model,
            messages: [ChatMessage {
                role: "user",
                content: prompt,
            }],
            temperature: self.temperature,
        };

        let body = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()?
            .error_for_status()?
            .text()?;
        trace!("Completion response: {}", body);

        parse_completion(&body)
    }
}

/// Pulls the first non-empty message out of a chat-completions response body.
pub fn parse_completion(body: &str) -> Result<String, AugmentError> {
    let response: ChatResponse =
        serde_json::from_str(body).map_err(|e| AugmentError::MalformedResponse(e.to_string()))?;

    response
        .choices
        .into_iter()
        .filter_map(|choice| choice.message.content)
        .find(|content| !content.trim().is_empty())
        .ok_or_else(|| AugmentError::MalformedResponse("no completion text".to_string()))
}
