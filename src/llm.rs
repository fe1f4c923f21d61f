//! Language-model interaction: the chat capability and the query dispatcher.
//!
//! The capability boundary is a trait so sessions can be driven by a mock in
//! tests and by [`OllamaChat`] in production. The trait returns a structured
//! [`DispatchError`] — callers that need to distinguish "model answered"
//! from "model unreachable" can, without string matching.
//!
//! [`dispatch`] sits above the trait and implements the user-facing policy:
//! every failure is caught and rendered as an ordinary answer string of the
//! form `"Error querying <model>: <cause>"`. Nothing thrown by the backend
//! ever crosses the session boundary as an error.

use crate::error::DispatchError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// One role-tagged message in a chat-completion request.
#[derive(Debug, Clone, Serialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    /// A user-role message.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

/// The language-model chat capability.
///
/// Given a model identifier and a list of role-tagged messages, return a
/// single text completion or a structured failure.
#[async_trait]
pub trait ChatCapability: Send + Sync {
    async fn chat(&self, model: &str, messages: &[ChatMessage]) -> Result<String, DispatchError>;
}

// ── Ollama client ────────────────────────────────────────────────────────

#[derive(Serialize)]
struct OllamaChatRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    stream: bool,
}

#[derive(Deserialize)]
struct OllamaChatResponse {
    message: OllamaMessage,
}

#[derive(Deserialize)]
struct OllamaMessage {
    content: String,
}

/// Chat capability backed by an Ollama-compatible `/api/chat` endpoint.
pub struct OllamaChat {
    client: reqwest::Client,
    base_url: String,
}

impl OllamaChat {
    /// Create a client for the given base URL (no trailing slash) with a
    /// per-request timeout.
    pub fn new(base_url: impl Into<String>, timeout_secs: u64) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .unwrap_or_default();

        Self {
            client,
            base_url: base_url.into(),
        }
    }
}

#[async_trait]
impl ChatCapability for OllamaChat {
    async fn chat(&self, model: &str, messages: &[ChatMessage]) -> Result<String, DispatchError> {
        let url = format!("{}/api/chat", self.base_url);
        let request = OllamaChatRequest {
            model,
            messages,
            // One blocking round trip per question; token streaming is a
            // non-goal.
            stream: false,
        };

        debug!("POST {} model={}", url, model);

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| DispatchError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(DispatchError::Http {
                status: status.as_u16(),
            });
        }

        let body: OllamaChatResponse = response
            .json()
            .await
            .map_err(|e| DispatchError::MalformedResponse(e.to_string()))?;

        Ok(body.message.content)
    }
}

// ── Dispatcher ───────────────────────────────────────────────────────────

/// Send one user-role prompt to the chat capability and return its answer.
///
/// By design this function never fails past its boundary: any
/// [`DispatchError`] is caught and converted to a human-readable
/// `"Error querying <model>: <cause>"` string, so callers can append the
/// result to a turn history unconditionally.
pub async fn dispatch(chat: &Arc<dyn ChatCapability>, model: &str, prompt: &str) -> String {
    match chat.chat(model, &[ChatMessage::user(prompt)]).await {
        Ok(answer) => answer,
        Err(e) => {
            warn!("Dispatch failed for model {}: {}", model, e);
            format!("Error querying {}: {}", model, e)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct RefusingChat;

    #[async_trait]
    impl ChatCapability for RefusingChat {
        async fn chat(&self, _: &str, _: &[ChatMessage]) -> Result<String, DispatchError> {
            Err(DispatchError::Request("connection refused".into()))
        }
    }

    struct EchoChat;

    #[async_trait]
    impl ChatCapability for EchoChat {
        async fn chat(
            &self,
            _: &str,
            messages: &[ChatMessage],
        ) -> Result<String, DispatchError> {
            Ok(messages.last().map(|m| m.content.clone()).unwrap_or_default())
        }
    }

    #[test]
    fn dispatch_failure_becomes_answer_text() {
        let chat: Arc<dyn ChatCapability> = Arc::new(RefusingChat);
        let answer = tokio_test::block_on(dispatch(&chat, "llava:7b", "hello"));
        assert_eq!(
            answer,
            "Error querying llava:7b: request failed: connection refused"
        );
    }

    #[test]
    fn dispatch_sends_single_user_message() {
        let chat: Arc<dyn ChatCapability> = Arc::new(EchoChat);
        let answer = tokio_test::block_on(dispatch(&chat, "llava:7b", "the prompt"));
        assert_eq!(answer, "the prompt");
    }

    #[test]
    fn user_message_role() {
        let m = ChatMessage::user("hi");
        assert_eq!(m.role, "user");
        assert_eq!(m.content, "hi");
    }

    #[test]
    fn request_serialises_with_stream_disabled() {
        let messages = [ChatMessage::user("q")];
        let req = OllamaChatRequest {
            model: "llava:7b",
            messages: &messages,
            stream: false,
        };
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["stream"], false);
        assert_eq!(json["messages"][0]["role"], "user");
    }
}
