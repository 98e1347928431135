//! OpenAI-compatible HTTP client for the Groq completion service.

use std::time::Duration;

use astra_core::config::LlmConfig;
use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::llm::{ChatMessage, CompletionClient, CompletionError, ToolDeclaration};

const ERROR_BODY_LIMIT: usize = 512;

/// Backoff schedule for retried transport failures.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub base_delay_ms: u64,
    pub max_delay_ms: u64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self { max_retries: 2, base_delay_ms: 250, max_delay_ms: 5_000 }
    }
}

impl RetryPolicy {
    fn backoff(&self, attempt: u32) -> Duration {
        let exponent = attempt.min(16);
        let multiplier = 1_u64 << exponent;
        let delay_ms = self.base_delay_ms.saturating_mul(multiplier).min(self.max_delay_ms);
        Duration::from_millis(delay_ms)
    }
}

pub struct GroqClient {
    client: reqwest::Client,
    base_url: String,
    api_key: SecretString,
    model: String,
    retry: RetryPolicy,
}

impl GroqClient {
    pub fn new(config: &LlmConfig) -> Result<Self, CompletionError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            model: config.model.clone(),
            retry: RetryPolicy { max_retries: config.max_retries, ..RetryPolicy::default() },
        })
    }

    async fn send(&self, request: &CompletionRequest<'_>) -> Result<ChatMessage, CompletionError> {
        let url = format!("{}/chat/completions", self.base_url);
        let response = self
            .client
            .post(&url)
            .bearer_auth(self.api_key.expose_secret())
            .json(request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(CompletionError::Status {
                status: status.as_u16(),
                body: truncate_body(body),
            });
        }

        let payload: CompletionResponse = response.json().await?;
        payload
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message)
            .ok_or_else(|| {
                CompletionError::MalformedResponse("response contained no choices".to_string())
            })
    }
}

#[async_trait]
impl CompletionClient for GroqClient {
    async fn complete(
        &self,
        messages: &[ChatMessage],
        tools: &[ToolDeclaration],
    ) -> Result<ChatMessage, CompletionError> {
        let request = CompletionRequest {
            model: &self.model,
            messages,
            tools: (!tools.is_empty()).then_some(tools),
            tool_choice: (!tools.is_empty()).then_some("auto"),
        };

        let mut attempt = 0;
        loop {
            match self.send(&request).await {
                Ok(message) => return Ok(message),
                Err(error) if attempt < self.retry.max_retries && is_retryable(&error) => {
                    warn!(
                        attempt,
                        max_retries = self.retry.max_retries,
                        error = %error,
                        "completion transport failed; retrying"
                    );
                    tokio::time::sleep(self.retry.backoff(attempt)).await;
                    attempt += 1;
                }
                Err(error) => return Err(error),
            }
        }
    }
}

fn is_retryable(error: &CompletionError) -> bool {
    match error {
        CompletionError::Transport(_) => true,
        CompletionError::Status { status, .. } => *status == 429 || (500..600).contains(status),
        CompletionError::MalformedResponse(_) => false,
    }
}

fn truncate_body(body: String) -> String {
    if body.len() <= ERROR_BODY_LIMIT {
        return body;
    }
    let mut cut = ERROR_BODY_LIMIT;
    while !body.is_char_boundary(cut) {
        cut -= 1;
    }
    format!("{}…", &body[..cut])
}

#[derive(Debug, Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    #[serde(skip_serializing_if = "Option::is_none")]
    tools: Option<&'a [ToolDeclaration]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tool_choice: Option<&'a str>,
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<CompletionChoice>,
}

#[derive(Debug, Deserialize)]
struct CompletionChoice {
    message: ChatMessage,
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use crate::llm::{ChatMessage, CompletionError, ToolDeclaration};

    use super::{is_retryable, CompletionRequest, RetryPolicy};

    #[test]
    fn backoff_grows_exponentially_up_to_the_cap() {
        let policy = RetryPolicy { max_retries: 5, base_delay_ms: 250, max_delay_ms: 5_000 };
        assert_eq!(policy.backoff(0), Duration::from_millis(250));
        assert_eq!(policy.backoff(1), Duration::from_millis(500));
        assert_eq!(policy.backoff(2), Duration::from_millis(1_000));
        assert_eq!(policy.backoff(10), Duration::from_millis(5_000));
    }

    #[test]
    fn only_transport_and_server_failures_are_retryable() {
        assert!(is_retryable(&CompletionError::Status { status: 503, body: String::new() }));
        assert!(is_retryable(&CompletionError::Status { status: 429, body: String::new() }));
        assert!(!is_retryable(&CompletionError::Status { status: 401, body: String::new() }));
        assert!(!is_retryable(&CompletionError::MalformedResponse("no choices".to_string())));
    }

    #[test]
    fn first_round_requests_carry_tools_and_auto_choice() {
        let messages = vec![ChatMessage::user("show me the pipeline")];
        let tools = vec![ToolDeclaration::function("analyze_deals", "Analyze deals.")];
        let request = CompletionRequest {
            model: "llama-3.3-70b-versatile",
            messages: &messages,
            tools: Some(&tools),
            tool_choice: Some("auto"),
        };

        let wire = serde_json::to_value(&request).expect("request should serialize");
        assert_eq!(wire["model"], "llama-3.3-70b-versatile");
        assert_eq!(wire["tool_choice"], "auto");
        assert_eq!(wire["tools"][0]["function"]["name"], "analyze_deals");
    }

    #[test]
    fn final_round_requests_omit_tool_fields() {
        let messages = vec![ChatMessage::user("show me the pipeline")];
        let request = CompletionRequest {
            model: "llama-3.3-70b-versatile",
            messages: &messages,
            tools: None,
            tool_choice: None,
        };

        let wire = serde_json::to_value(&request).expect("request should serialize");
        assert!(wire.get("tools").is_none());
        assert!(wire.get("tool_choice").is_none());
    }
}
