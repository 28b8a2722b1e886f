//! Remote-model-backed interpreter using the OpenAI chat API.

use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue};
use serde::Deserialize;
use serde_json::{Value, json};

use crate::error::{Result, ScenaristError};
use crate::scenario::ChangeSpec;

use super::{InterpretContext, IntentInterpreter, prompts, wire};

/// OpenAI chat completions endpoint.
const API_URL: &str = "https://api.openai.com/v1/chat/completions";

/// Configuration for the model-backed interpreter.
#[derive(Debug, Clone)]
pub struct InterpreterConfig {
    /// Model to use.
    pub model: String,
    /// Maximum tokens in the response.
    pub max_tokens: usize,
    /// Sampling temperature (0.0-1.0).
    pub temperature: f64,
}

impl Default for InterpreterConfig {
    fn default() -> Self {
        Self {
            model: "gpt-4o-mini".to_string(),
            max_tokens: 1024,
            temperature: 0.3,
        }
    }
}

/// Interpreter that asks a remote model to produce wire-format changes.
pub struct OpenAiInterpreter {
    client: Client,
    api_key: String,
    config: InterpreterConfig,
}

impl OpenAiInterpreter {
    /// Create an interpreter with the given API key.
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        Self::with_config(api_key, InterpreterConfig::default())
    }

    /// Create an interpreter with custom configuration.
    pub fn with_config(api_key: impl Into<String>, config: InterpreterConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(60))
            .build()
            .map_err(|e| ScenaristError::Config(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            api_key: api_key.into(),
            config,
        })
    }

    /// Create from the `OPENAI_API_KEY` environment variable.
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("OPENAI_API_KEY").map_err(|_| {
            ScenaristError::Config("OPENAI_API_KEY environment variable not set".to_string())
        })?;
        Self::new(api_key)
    }

    fn build_headers(&self) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(
            "Authorization",
            HeaderValue::from_str(&format!("Bearer {}", self.api_key))
                .map_err(|e| ScenaristError::Config(format!("Invalid API key: {e}")))?,
        );
        Ok(headers)
    }

    fn send_message(&self, system_prompt: &str, user_prompt: &str) -> Result<String> {
        let body = json!({
            "model": self.config.model,
            "max_tokens": self.config.max_tokens,
            "temperature": self.config.temperature,
            "response_format": {"type": "json_object"},
            "messages": [
                {"role": "system", "content": system_prompt},
                {"role": "user", "content": user_prompt}
            ]
        });

        let response = self
            .client
            .post(API_URL)
            .headers(self.build_headers()?)
            .json(&body)
            .send()
            .map_err(|e| ScenaristError::Config(format!("API request failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().unwrap_or_default();
            return Err(ScenaristError::Config(format!(
                "API error ({status}): {error_text}"
            )));
        }

        let api_response: ApiResponse = response
            .json()
            .map_err(|e| ScenaristError::Config(format!("Failed to parse API response: {e}")))?;

        api_response
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| ScenaristError::Config("No choices in API response".to_string()))
    }
}

/// Extract JSON from a model response, tolerating markdown code fences.
fn parse_json_response(response: &str) -> Result<Value> {
    let json_str = if response.contains("```json") {
        response
            .split("```json")
            .nth(1)
            .and_then(|s| s.split("```").next())
            .map(str::trim)
            .unwrap_or(response)
    } else if response.contains("```") {
        response
            .split("```")
            .nth(1)
            .map(str::trim)
            .unwrap_or(response)
    } else {
        response.trim()
    };

    serde_json::from_str(json_str).map_err(|e| {
        ScenaristError::Interpretation(format!("model returned invalid JSON: {e}"))
    })
}

impl IntentInterpreter for OpenAiInterpreter {
    fn interpret(&self, prompt: &str, context: &InterpretContext) -> Result<Vec<ChangeSpec>> {
        let system = prompts::system_prompt(context);
        let content = self.send_message(&system, prompt)?;
        let value = parse_json_response(&content)?;
        let changes = wire::changes_from_value(&value)?;
        if changes.is_empty() {
            return Err(ScenaristError::Interpretation(
                "model returned no changes; try rephrasing the request".to_string(),
            ));
        }
        Ok(changes)
    }

    fn name(&self) -> &str {
        "openai"
    }
}

#[derive(Deserialize)]
struct ApiResponse {
    choices: Vec<ApiChoice>,
}

#[derive(Deserialize)]
struct ApiChoice {
    message: ApiMessage,
}

#[derive(Deserialize)]
struct ApiMessage {
    content: String,
}
