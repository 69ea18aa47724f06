/// OpenAI chat completions provider
///
/// Sends one user message per call with `response_format = json_object`. Works with any
/// OpenAI-compatible endpoint via `OPENAI_API_URL`.
use crate::{
    config::Config,
    error::{AppError, AppResult},
    services::providers::{CompletionRequest, LlmProvider},
};
use reqwest::Client as HttpClient;
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Clone)]
pub struct OpenAiProvider {
    http_client: HttpClient,
    api_key: Option<String>,
    api_url: String,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    response_format: ResponseFormat,
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    message: String,
}

impl OpenAiProvider {
    /// Creates a provider from configuration; a missing key is reported per call, not here
    pub fn new(config: &Config) -> AppResult<Self> {
        let mut builder = HttpClient::builder();
        if let Some(secs) = config.llm_timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }

        Ok(Self {
            http_client: builder.build()?,
            api_key: config.openai_api_key.clone().filter(|k| !k.trim().is_empty()),
            api_url: config.openai_api_url.trim_end_matches('/').to_string(),
        })
    }

    fn api_key(&self) -> AppResult<&str> {
        self.api_key.as_deref().ok_or_else(|| {
            AppError::Configuration("OpenAI API key is not configured on the server.".to_string())
        })
    }

    fn request_body<'a>(request: &'a CompletionRequest) -> ChatRequest<'a> {
        ChatRequest {
            model: &request.model,
            messages: vec![ChatMessage {
                role: "user",
                content: &request.prompt,
            }],
            response_format: ResponseFormat {
                kind: "json_object",
            },
            temperature: request.temperature,
            max_tokens: request.max_tokens,
        }
    }

    /// Pulls the vendor's error message out of a non-2xx body when it has one
    fn error_message(status: reqwest::StatusCode, body: &str) -> String {
        match serde_json::from_str::<ApiErrorBody>(body) {
            Ok(parsed) => parsed.error.message,
            Err(_) => format!("OpenAI API returned status {}: {}", status, body),
        }
    }
}

#[async_trait::async_trait]
impl LlmProvider for OpenAiProvider {
    fn ensure_configured(&self) -> AppResult<()> {
        self.api_key().map(|_| ())
    }

    async fn complete_json(&self, request: &CompletionRequest) -> AppResult<String> {
        let api_key = self.api_key()?;
        let url = format!("{}/chat/completions", self.api_url);

        tracing::debug!(
            model = %request.model,
            prompt_chars = request.prompt.len(),
            "Calling OpenAI chat completions"
        );

        let response = self
            .http_client
            .post(&url)
            .bearer_auth(api_key)
            .json(&Self::request_body(request))
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::Provider(Self::error_message(status, &body)));
        }

        let response_text = response.text().await?;
        let completion: ChatCompletionResponse =
            serde_json::from_str(&response_text).map_err(|e| {
                tracing::error!(
                    error = %e,
                    response = %response_text,
                    "Failed to deserialize OpenAI response envelope"
                );
                AppError::Provider(format!("Failed to parse OpenAI response envelope: {}", e))
            })?;

        completion
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|content| !content.trim().is_empty())
            .ok_or_else(|| AppError::Provider("OpenAI did not return any content.".to_string()))
    }

    fn name(&self) -> &'static str {
        "openai"
    }
}
