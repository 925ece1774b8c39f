use crate::ai::openai::types::{ChatCompletionRequest, ChatCompletionResponse, ChatMessage};
use crate::ai::openai::OpenAiHttpClient;
use crate::ai::PromptService;
use crate::models::{PromptEnhancement, DEFAULT_OPENROUTER_BASE_URL};
use crate::{prompts, Error, Result};
use async_trait::async_trait;
use std::time::Duration;

pub const DEFAULT_EXPLANATION: &str = "Enhanced with AI assistance";

const APP_TITLE: &str = "Lyra's Image Alchemist";
const APP_REFERER: &str = "https://github.com/lyra/image-alchemist";

const ENHANCE_TEMPERATURE: f32 = 0.7;
const ENHANCE_MAX_TOKENS: u32 = 1000;
const SANITIZE_TEMPERATURE: f32 = 0.3;
const SANITIZE_MAX_TOKENS: u32 = 500;

/// How an enhancement reply was interpreted.
#[derive(Debug, Clone, PartialEq)]
pub enum EnhanceReply {
    /// The reply decoded as `{"enhanced_prompt", "explanation"?}`.
    Structured(PromptEnhancement),
    /// Anything else; the whole reply text is the enhanced prompt.
    PlainText(String),
}

impl EnhanceReply {
    /// Structured whenever the reply is a JSON object with a non-empty
    /// string `enhanced_prompt`; `explanation` is kept only if it is a string.
    pub fn parse(content: &str) -> Self {
        let parsed = serde_json::from_str::<serde_json::Value>(content.trim()).ok();
        let enhanced_prompt = parsed
            .as_ref()
            .and_then(|value| value.get("enhanced_prompt"))
            .and_then(|field| field.as_str())
            .filter(|text| !text.trim().is_empty());

        match enhanced_prompt {
            Some(enhanced_prompt) => EnhanceReply::Structured(PromptEnhancement {
                enhanced_prompt: enhanced_prompt.to_string(),
                explanation: parsed
                    .as_ref()
                    .and_then(|value| value.get("explanation"))
                    .and_then(|field| field.as_str())
                    .map(str::to_string),
            }),
            None => EnhanceReply::PlainText(content.trim().to_string()),
        }
    }

    pub fn into_enhancement(self) -> PromptEnhancement {
        match self {
            EnhanceReply::Structured(enhancement) => enhancement,
            EnhanceReply::PlainText(text) => PromptEnhancement {
                enhanced_prompt: text,
                explanation: Some(DEFAULT_EXPLANATION.to_string()),
            },
        }
    }
}

/// Prompt enhancement and sanitization over the OpenRouter chat API.
pub struct OpenRouterPromptClient {
    http: OpenAiHttpClient,
    model: String,
}

impl OpenRouterPromptClient {
    pub fn new(api_key: Option<String>, model: String) -> Self {
        Self {
            http: OpenAiHttpClient::new(
                "OpenRouter",
                "OPENROUTER_API_KEY",
                api_key,
                DEFAULT_OPENROUTER_BASE_URL.to_string(),
                Duration::from_secs(60),
            )
            .with_header("HTTP-Referer", APP_REFERER)
            .with_header("X-Title", APP_TITLE),
            model,
        }
    }

    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.http = self.http.with_base_url(base_url);
        self
    }

    async fn chat(
        &self,
        system: &str,
        user: String,
        temperature: f32,
        max_tokens: u32,
    ) -> Result<ChatCompletionResponse> {
        let request = ChatCompletionRequest {
            model: self.model.clone(),
            messages: vec![ChatMessage::system(system), ChatMessage::user(user)],
            temperature,
            max_tokens,
        };
        self.http.post("/chat/completions", &request).await
    }

    async fn try_sanitize(&self, prompt: &str) -> Result<String> {
        let response = self
            .chat(
                prompts::SANITIZE_SYSTEM,
                prompts::render(prompts::SANITIZE_USER, &[("prompt", prompt)]),
                SANITIZE_TEMPERATURE,
                SANITIZE_MAX_TOKENS,
            )
            .await?;

        response
            .first_content()
            .map(str::trim)
            .filter(|content| !content.is_empty())
            .map(str::to_string)
            .ok_or_else(|| Error::remote("Empty response from OpenRouter"))
    }
}

#[async_trait]
impl PromptService for OpenRouterPromptClient {
    async fn enhance(&self, prompt: &str) -> Result<PromptEnhancement> {
        self.http.require_api_key()?;

        let response = self
            .chat(
                prompts::ENHANCE_SYSTEM,
                prompts::render(prompts::ENHANCE_USER, &[("prompt", prompt)]),
                ENHANCE_TEMPERATURE,
                ENHANCE_MAX_TOKENS,
            )
            .await?;

        if response.choices.is_empty() {
            return Err(Error::remote("No response from OpenRouter"));
        }

        let content = response
            .first_content()
            .filter(|content| !content.trim().is_empty())
            .ok_or_else(|| Error::remote("Empty response from OpenRouter"))?;

        let reply = EnhanceReply::parse(content);
        if let EnhanceReply::PlainText(_) = reply {
            tracing::debug!("Enhancement reply was not structured, using raw text");
        }
        Ok(reply.into_enhancement())
    }

    async fn sanitize(&self, prompt: &str) -> String {
        match self.try_sanitize(prompt).await {
            Ok(sanitized) => sanitized,
            Err(e) => {
                tracing::warn!("Prompt sanitization failed, using original prompt: {}", e);
                prompt.to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn chat_reply(content: &str) -> ResponseTemplate {
        ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "choices": [{
                "message": { "role": "assistant", "content": content },
                "finish_reason": "stop"
            }]
        }))
    }

    fn client_for(server: &MockServer) -> OpenRouterPromptClient {
        OpenRouterPromptClient::new(Some("router-key".to_string()), "test/model".to_string())
            .with_base_url(server.uri())
    }

    #[test]
    fn test_parse_structured_reply() {
        let reply = EnhanceReply::parse(
            r#"{"enhanced_prompt":"a fox, oil painting","explanation":"added medium"}"#,
        );
        assert_eq!(
            reply,
            EnhanceReply::Structured(PromptEnhancement {
                enhanced_prompt: "a fox, oil painting".to_string(),
                explanation: Some("added medium".to_string()),
            })
        );
    }

    #[test]
    fn test_parse_keeps_prompt_when_explanation_is_not_text() {
        let reply = EnhanceReply::parse(
            r#"{"enhanced_prompt":"a fox, oil painting","explanation":["added medium","added light"]}"#,
        );
        assert_eq!(
            reply,
            EnhanceReply::Structured(PromptEnhancement {
                enhanced_prompt: "a fox, oil painting".to_string(),
                explanation: None,
            })
        );
        assert_eq!(reply.into_enhancement().enhanced_prompt, "a fox, oil painting");
    }

    #[test]
    fn test_parse_non_string_prompt_falls_back() {
        let reply = EnhanceReply::parse(r#"{"enhanced_prompt":42}"#);
        assert_eq!(
            reply,
            EnhanceReply::PlainText(r#"{"enhanced_prompt":42}"#.to_string())
        );
    }

    #[test]
    fn test_parse_json_without_field_falls_back() {
        let reply = EnhanceReply::parse(r#"{"prompt":"x"}"#);
        assert!(matches!(reply, EnhanceReply::PlainText(_)));
    }

    #[tokio::test]
    async fn test_enhance_structured_reply() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .and(header("Authorization", "Bearer router-key"))
            .and(header("X-Title", APP_TITLE))
            .and(body_partial_json(serde_json::json!({
                "model": "test/model",
                "max_tokens": 1000
            })))
            .respond_with(chat_reply(
                r#"{"enhanced_prompt":"A misty forest at dawn, volumetric light","explanation":"Added lighting"}"#,
            ))
            .expect(1)
            .mount(&server)
            .await;

        let result = client_for(&server).enhance("a forest").await.unwrap();
        assert_eq!(
            result.enhanced_prompt,
            "A misty forest at dawn, volumetric light"
        );
        assert_eq!(result.explanation.as_deref(), Some("Added lighting"));
    }

    #[tokio::test]
    async fn test_enhance_plain_text_reply_used_verbatim() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(chat_reply("A misty forest at dawn, soft volumetric light"))
            .mount(&server)
            .await;

        let result = client_for(&server).enhance("a forest").await.unwrap();
        assert_eq!(
            result.enhanced_prompt,
            "A misty forest at dawn, soft volumetric light"
        );
        assert_eq!(result.explanation.as_deref(), Some(DEFAULT_EXPLANATION));
    }

    #[tokio::test]
    async fn test_enhance_empty_choices_is_error() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({ "choices": [] })),
            )
            .mount(&server)
            .await;

        let err = client_for(&server).enhance("a forest").await.unwrap_err();
        assert_eq!(err.to_string(), "No response from OpenRouter");
    }

    #[tokio::test]
    async fn test_enhance_empty_content_is_error() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(chat_reply(""))
            .mount(&server)
            .await;

        let err = client_for(&server).enhance("a forest").await.unwrap_err();
        assert_eq!(err.to_string(), "Empty response from OpenRouter");
    }

    #[tokio::test]
    async fn test_enhance_api_error_propagates() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(402).set_body_json(serde_json::json!({
                "error": { "message": "Insufficient credits", "code": 402 }
            })))
            .mount(&server)
            .await;

        let err = client_for(&server).enhance("a forest").await.unwrap_err();
        assert!(matches!(err, Error::RemoteService { .. }));
        assert_eq!(err.to_string(), "Insufficient credits");
    }

    #[tokio::test]
    async fn test_enhance_without_key_is_configuration_error() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(chat_reply("unused"))
            .expect(0)
            .mount(&server)
            .await;

        let client = OpenRouterPromptClient::new(None, "test/model".to_string())
            .with_base_url(server.uri());
        let err = client.enhance("a forest").await.unwrap_err();
        assert!(matches!(err, Error::Configuration(_)));
    }

    #[tokio::test]
    async fn test_sanitize_returns_trimmed_reply() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .and(body_partial_json(serde_json::json!({ "max_tokens": 500 })))
            .respond_with(chat_reply("  a friendly cartoon fox \n"))
            .mount(&server)
            .await;

        let result = client_for(&server).sanitize("a fox").await;
        assert_eq!(result, "a friendly cartoon fox");
    }

    #[tokio::test]
    async fn test_sanitize_failure_returns_original() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .mount(&server)
            .await;

        let result = client_for(&server).sanitize("a fox").await;
        assert_eq!(result, "a fox");
    }

    #[tokio::test]
    async fn test_sanitize_without_key_returns_original() {
        let client = OpenRouterPromptClient::new(None, "test/model".to_string());
        assert_eq!(client.sanitize("a fox").await, "a fox");
    }
}
