//! OpenAI-compatible `/v1/chat/completions` client

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::http_client::HttpClientTrait;
use crate::domain::{DomainError, FinishReason, LlmProvider, LlmRequest, LlmResponse, Message, Usage};

pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com";

const PROVIDER: &str = "openai";

/// Works against api.openai.com or any server that speaks the same protocol
#[derive(Debug)]
pub struct OpenAiProvider<C: HttpClientTrait> {
    client: C,
    bearer: String,
    completions_url: String,
    models_url: String,
}

impl<C: HttpClientTrait> OpenAiProvider<C> {
    pub fn new(client: C, api_key: impl Into<String>) -> Self {
        Self::with_base_url(client, api_key, DEFAULT_OPENAI_BASE_URL)
    }

    pub fn with_base_url(
        client: C,
        api_key: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Self {
        let base_url = base_url.into();
        let base = base_url.trim_end_matches('/');

        Self {
            client,
            bearer: format!("Bearer {}", api_key.into()),
            completions_url: format!("{}/v1/chat/completions", base),
            models_url: format!("{}/v1/models", base),
        }
    }

    fn decode(json: serde_json::Value) -> Result<LlmResponse, DomainError> {
        let completion: Completion = serde_json::from_value(json)
            .map_err(|e| DomainError::provider(PROVIDER, format!("Malformed completion: {}", e)))?;

        let Some(choice) = completion.choices.into_iter().next() else {
            return Err(DomainError::provider(PROVIDER, "Completion has no choices"));
        };

        let mut response = LlmResponse::new(completion.model, choice.message.content.unwrap_or_default());

        if let Some(reason) = choice.finish_reason.as_deref() {
            response = response.with_finish_reason(FinishReason::parse(reason));
        }

        if let Some(usage) = completion.usage {
            response = response.with_usage(Usage {
                prompt_tokens: usage.prompt_tokens,
                completion_tokens: usage.completion_tokens,
            });
        }

        Ok(response)
    }
}

#[async_trait]
impl<C: HttpClientTrait> LlmProvider for OpenAiProvider<C> {
    async fn chat(&self, model: &str, request: LlmRequest) -> Result<LlmResponse, DomainError> {
        let body = CompletionBody {
            model,
            messages: &request.messages,
            temperature: request.temperature,
            max_tokens: request.max_tokens,
            stream: false,
        };
        let body = serde_json::to_value(&body)
            .map_err(|e| DomainError::internal(format!("Failed to encode request: {}", e)))?;

        let headers = vec![
            ("Authorization", self.bearer.as_str()),
            ("Content-Type", "application/json"),
        ];
        let json = self
            .client
            .post_json(&self.completions_url, headers, &body)
            .await?;

        Self::decode(json)
    }

    async fn ping(&self) -> Result<(), DomainError> {
        self.client
            .get(&self.models_url, vec![("Authorization", self.bearer.as_str())])
            .await
    }

    fn provider_name(&self) -> &'static str {
        PROVIDER
    }
}

#[derive(Serialize)]
struct CompletionBody<'a> {
    model: &'a str,
    messages: &'a [Message],
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    stream: bool,
}

#[derive(Deserialize)]
struct Completion {
    model: String,
    choices: Vec<Choice>,
    usage: Option<CompletionUsage>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
    finish_reason: Option<String>,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

#[derive(Deserialize)]
struct CompletionUsage {
    prompt_tokens: u32,
    completion_tokens: u32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::llm::http_client::mock::MockHttpClient;
    use crate::infrastructure::llm::http_client::HttpClient;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const COMPLETIONS_URL: &str = "https://api.openai.com/v1/chat/completions";

    fn completion(content: &str, finish_reason: &str) -> serde_json::Value {
        json!({
            "id": "chatcmpl-123",
            "model": "gpt-4o-mini",
            "choices": [{
                "message": { "role": "assistant", "content": content },
                "finish_reason": finish_reason
            }],
            "usage": { "prompt_tokens": 10, "completion_tokens": 8, "total_tokens": 18 }
        })
    }

    #[tokio::test]
    async fn test_chat_request_and_response() {
        let client = MockHttpClient::new()
            .with_response(COMPLETIONS_URL, completion("A short summary.", "stop"));
        let provider = OpenAiProvider::new(client, "test-api-key");

        let request = LlmRequest::instruct("Summarize", "Long text").with_temperature(Some(0.2));
        let response = provider.chat("gpt-4o-mini", request).await.unwrap();

        assert_eq!(response.content(), "A short summary.");
        assert_eq!(response.model, "gpt-4o-mini");
        assert_eq!(response.finish_reason, Some(FinishReason::Stop));
        assert_eq!(response.usage.map(|u| u.total()), Some(18));

        let bodies = provider.client.bodies();
        assert_eq!(bodies.len(), 1);
        let body = &bodies[0].1;
        assert_eq!(body["model"], "gpt-4o-mini");
        assert_eq!(body["stream"], false);
        assert_eq!(body["messages"][0]["role"], "system");
        assert_eq!(body["messages"][1]["content"], "Long text");
        assert!(body.get("max_tokens").is_none());
    }

    #[tokio::test]
    async fn test_truncated_completion() {
        let client =
            MockHttpClient::new().with_response(COMPLETIONS_URL, completion("Half a", "length"));
        let provider = OpenAiProvider::new(client, "key");

        let response = provider
            .chat("gpt-4o-mini", LlmRequest::new(vec![Message::user("hi")]))
            .await
            .unwrap();
        assert!(response.is_truncated());
    }

    #[tokio::test]
    async fn test_transport_error() {
        let client = MockHttpClient::new().with_error(COMPLETIONS_URL, "API key invalid");
        let provider = OpenAiProvider::new(client, "invalid-key");

        let result = provider
            .chat("gpt-4o-mini", LlmRequest::new(vec![Message::user("Hello!")]))
            .await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_no_choices() {
        let client = MockHttpClient::new()
            .with_response(COMPLETIONS_URL, json!({ "model": "m", "choices": [] }));
        let provider = OpenAiProvider::new(client, "key");

        let err = provider
            .chat("m", LlmRequest::new(vec![Message::user("hi")]))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("no choices"));
    }

    #[tokio::test]
    async fn test_ping_uses_models_endpoint() {
        let client = MockHttpClient::new()
            .with_error("http://localhost:8080/v1/models", "connection refused");
        let provider = OpenAiProvider::with_base_url(client, "key", "http://localhost:8080/");

        assert!(provider.ping().await.is_err());
        assert_eq!(
            provider.client.last_headers(),
            vec![("Authorization".to_string(), "Bearer key".to_string())]
        );
    }

    #[tokio::test]
    async fn test_against_http_server() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .and(header("Authorization", "Bearer secret"))
            .and(body_partial_json(json!({ "model": "local-model" })))
            .respond_with(ResponseTemplate::new(200).set_body_json(completion("tagged", "stop")))
            .mount(&mock_server)
            .await;
        Mock::given(method("GET"))
            .and(path("/v1/models"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": []})))
            .mount(&mock_server)
            .await;

        let provider =
            OpenAiProvider::with_base_url(HttpClient::new(), "secret", mock_server.uri());

        let response = provider
            .chat("local-model", LlmRequest::instruct("Tag", "text"))
            .await
            .unwrap();
        assert_eq!(response.content(), "tagged");
        assert!(provider.ping().await.is_ok());
    }
}
