//! LLM chat proxy with provider fallback.
//!
//! OpenRouter is the primary provider, Groq the fallback. Both speak the
//! OpenAI-compatible chat-completions shape, so one call helper covers them.
//! Upstream failures are classified by HTTP status code, never by matching on
//! error message text.

use leadgate_core::models::{ChatMessage, ChatResponse};
use leadgate_core::{AppError, Config};
use serde::Deserialize;

const OPENROUTER_API_URL: &str = "https://openrouter.ai/api/v1/chat/completions";
const GROQ_API_URL: &str = "https://api.groq.com/openai/v1/chat/completions";

const OPENROUTER_MODEL: &str = "qwen/qwen3-235b-a22b-07-25:free";
const GROQ_MODEL: &str = "llama3-8b-8192";

const EMPTY_RESPONSE_MESSAGE: &str =
    "I apologize, but I received an empty response. Please try rephrasing your question.";

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<CompletionChoice>,
}

#[derive(Debug, Deserialize)]
struct CompletionChoice {
    message: Option<CompletionMessage>,
}

#[derive(Debug, Deserialize)]
struct CompletionMessage {
    content: Option<String>,
}

struct Provider {
    name: &'static str,
    url: &'static str,
    model: &'static str,
    max_tokens: u32,
    temperature: f64,
    top_p: f64,
}

pub struct ChatService {
    client: reqwest::Client,
    openrouter_api_key: Option<String>,
    groq_api_key: Option<String>,
    referer: String,
}

impl ChatService {
    pub fn from_config(config: &Config) -> Self {
        ChatService {
            client: reqwest::Client::new(),
            openrouter_api_key: config.openrouter_api_key().map(|k| k.to_string()),
            groq_api_key: config.groq_api_key().map(|k| k.to_string()),
            referer: config
                .cors_origin()
                .unwrap_or("https://hommemade.vercel.app")
                .to_string(),
        }
    }

    /// Answer a chat turn: primary provider first, fallback on any error.
    pub async fn complete(
        &self,
        messages: &[ChatMessage],
        bot_type: &str,
    ) -> Result<ChatResponse, AppError> {
        if self.openrouter_api_key.is_none() && self.groq_api_key.is_none() {
            return Err(AppError::Config(
                "No chat provider API keys configured".to_string(),
            ));
        }

        let primary_error = match &self.openrouter_api_key {
            Some(key) => {
                let provider = Provider {
                    name: "openrouter",
                    url: OPENROUTER_API_URL,
                    model: OPENROUTER_MODEL,
                    max_tokens: 1500,
                    temperature: 0.65,
                    top_p: 0.85,
                };
                match self.call_provider(&provider, key, messages).await {
                    Ok(message) => return Ok(self.respond(message, bot_type)),
                    Err(error) => {
                        tracing::warn!(provider = provider.name, %error, "Primary chat provider failed");
                        error
                    }
                }
            }
            None => AppError::Config("OpenRouter API key not configured".to_string()),
        };

        if let Some(key) = &self.groq_api_key {
            let provider = Provider {
                name: "groq",
                url: GROQ_API_URL,
                model: GROQ_MODEL,
                max_tokens: 1000,
                temperature: 0.7,
                top_p: 0.9,
            };
            match self.call_provider(&provider, key, messages).await {
                Ok(message) => return Ok(self.respond(message, bot_type)),
                Err(error) => {
                    tracing::error!(provider = provider.name, %error, "Fallback chat provider failed");
                    return Err(error);
                }
            }
        }

        Err(primary_error)
    }

    fn respond(&self, message: String, bot_type: &str) -> ChatResponse {
        ChatResponse {
            message,
            bot_type: bot_type.to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }

    async fn call_provider(
        &self,
        provider: &Provider,
        api_key: &str,
        messages: &[ChatMessage],
    ) -> Result<String, AppError> {
        let mut request = self
            .client
            .post(provider.url)
            .bearer_auth(api_key)
            .json(&serde_json::json!({
                "model": provider.model,
                "messages": messages,
                "max_tokens": provider.max_tokens,
                "temperature": provider.temperature,
                "top_p": provider.top_p,
                "stream": false,
            }));
        if provider.name == "openrouter" {
            request = request
                .header("HTTP-Referer", &self.referer)
                .header("X-Title", "Homme Made AI Assistants");
        }

        let response = request.send().await.map_err(|e| AppError::Upstream {
            status: 0,
            message: format!("{} request failed: {}", provider.name, e),
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::Upstream {
                status: status.as_u16(),
                message: format!("{} returned {}", provider.name, status),
            });
        }

        let body: CompletionResponse =
            response.json().await.map_err(|e| AppError::Upstream {
                status: status.as_u16(),
                message: format!("{} response parsing failed: {}", provider.name, e),
            })?;

        Ok(body
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message)
            .and_then(|message| message.content)
            .unwrap_or_else(|| EMPTY_RESPONSE_MESSAGE.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn completion_response_extracts_first_choice() {
        let body: CompletionResponse = serde_json::from_str(
            r#"{"choices":[{"message":{"role":"assistant","content":"hello"}}]}"#,
        )
        .unwrap();
        let content = body
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message)
            .and_then(|m| m.content);
        assert_eq!(content.as_deref(), Some("hello"));
    }

    #[test]
    fn empty_choices_fall_back_to_apology() {
        let body: CompletionResponse = serde_json::from_str(r#"{"choices":[]}"#).unwrap();
        let content = body
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message)
            .and_then(|m| m.content)
            .unwrap_or_else(|| EMPTY_RESPONSE_MESSAGE.to_string());
        assert!(content.starts_with("I apologize"));
    }
}
