use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use super::{GatewayError, ModelGateway, Reply};

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash-preview-09-2025";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

#[derive(Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
    system_instruction: Content<'a>,
}

#[derive(Deserialize)]
struct GeminiError {
    error: GeminiErrorBody,
}

#[derive(Deserialize)]
struct GeminiErrorBody {
    message: String,
}

/// Client for the Gemini `generateContent` endpoint.
#[derive(Clone)]
pub struct GeminiClient {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl GeminiClient {
    pub fn new(api_key: &str) -> Self {
        Self {
            client: Client::builder()
                .timeout(REQUEST_TIMEOUT)
                .build()
                .unwrap_or_default(),
            api_key: api_key.to_string(),
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    pub fn with_model(mut self, model: &str) -> Self {
        self.model = model.to_string();
        self
    }

    /// Point the client at another host, e.g. a local mock server.
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        )
    }

    /// Make one call and return the first candidate's text, if there is any.
    ///
    /// `Ok(None)` means the service answered with JSON that has no usable
    /// text at `candidates[0].content.parts[0].text`.
    pub async fn generate(
        &self,
        user_prompt: &str,
        system_instruction: &str,
    ) -> Result<Option<String>, GatewayError> {
        let request = GenerateRequest {
            contents: vec![Content {
                parts: vec![Part { text: user_prompt }],
            }],
            system_instruction: Content {
                parts: vec![Part {
                    text: system_instruction,
                }],
            },
        };

        debug!(
            model = %self.model,
            prompt_chars = user_prompt.chars().count(),
            "sending generateContent request"
        );

        // reqwest errors carry the request URL, which holds the key
        let response = self
            .client
            .post(self.endpoint())
            .query(&[("key", self.api_key.as_str())])
            .json(&request)
            .send()
            .await
            .map_err(|e| GatewayError::Http(e.without_url()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<GeminiError>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            return Err(GatewayError::Status {
                status: status.as_u16(),
                message,
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| GatewayError::Http(e.without_url()))?;
        let value: Value = serde_json::from_str(&body)?;

        Ok(first_text(value))
    }
}

/// Pull `candidates[0].content.parts[0].text` out of a response body.
/// Only that path is read; anything else in the body is ignored.
fn first_text(value: Value) -> Option<String> {
    value
        .get("candidates")?
        .get(0)?
        .get("content")?
        .get("parts")?
        .get(0)?
        .get("text")?
        .as_str()
        .filter(|text| !text.is_empty())
        .map(str::to_owned)
}

#[async_trait]
impl ModelGateway for GeminiClient {
    async fn query(&self, user_prompt: &str, system_instruction: &str) -> Reply {
        match self.generate(user_prompt, system_instruction).await {
            Ok(Some(text)) => {
                debug!(reply_chars = text.chars().count(), "model replied");
                Reply::Answer(text)
            }
            Ok(None) => {
                warn!("model response had no usable candidate text");
                Reply::NoContent
            }
            Err(e) => {
                warn!(error = %e, "model request failed");
                Reply::Broken
            }
        }
    }
}
